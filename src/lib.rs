pub mod cli;
pub mod error;
pub mod frequency;
pub mod io_utils;
pub mod layout;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod overview;
pub mod report;
pub mod sheets;
pub mod summary;
pub mod workbook;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, LayoutArgs},
    layout::{Policy, ReportLayout},
    model::Report,
    workbook::ExcelWorkbook,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("wr_profile", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => handle_convert(&args),
        Commands::Sheets(args) => handle_sheets(&args),
        Commands::Summary(args) => handle_summary(&args),
    }
}

fn resolve_layout(args: &LayoutArgs) -> Result<ReportLayout> {
    let mut layout = match &args.layout {
        Some(path) => ReportLayout::load(path)
            .with_context(|| format!("Loading report layout from {path:?}"))?,
        None => ReportLayout::default(),
    };
    if args.strict_tables {
        layout.missing_table_sheet = Policy::Fail;
    }
    if args.strict_fields {
        layout.unknown_field = Policy::Fail;
    }
    if let Some(mode) = args.sheet_match {
        layout.sheet_match = mode.into();
    }
    debug!("Report layout: {layout:?}");
    Ok(layout)
}

fn handle_convert(args: &cli::ConvertArgs) -> Result<()> {
    let layout = resolve_layout(&args.layout)?;
    let (pid, destination) =
        report::plan_output(&args.input, args.pid.as_deref(), args.out.as_deref())
            .context("Resolving dataset identifier")?;
    info!(
        "Converting {:?} ({:?}) for dataset '{pid}'",
        args.input, args.format
    );
    let document = report::build_document(&args.input, &pid, &layout)
        .with_context(|| format!("Parsing scan report {:?}", args.input))?;

    let target = (!args.stdout).then_some(destination.as_path());
    report::write_json(&document, target)
        .with_context(|| format!("Writing profile document to {destination:?}"))?;
    match target {
        Some(path) => info!(
            "Profile for {} table(s), {} field(s) written to {path:?}",
            document.table_count(),
            document.field_count()
        ),
        None => info!("Profile for {} table(s) written to stdout", document.table_count()),
    }
    Ok(())
}

fn handle_sheets(args: &cli::SheetsArgs) -> Result<()> {
    let out_dir = match &args.out {
        Some(dir) => dir.clone(),
        None => args
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let mut workbook = ExcelWorkbook::open(&args.input)
        .with_context(|| format!("Opening workbook {:?}", args.input))?;
    let written = sheets::export_sheets(&mut workbook, &out_dir)
        .with_context(|| format!("Exporting sheets of {:?}", args.input))?;
    info!("Exported {} sheet(s) to {out_dir:?}", written.len());
    Ok(())
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let layout = resolve_layout(&args.layout)?;
    let tables = report::parse_report(&args.input, &layout)
        .with_context(|| format!("Parsing scan report {:?}", args.input))?;
    let document = Report::new(String::new(), tables);
    print!("{}", summary::render_summary(&summary::summarize(&document)));
    Ok(())
}
