use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::layout::SheetMatch;

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert data profile reports into JSON", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a scan report workbook into a JSON profile document
    Convert(ConvertArgs),
    /// Dump every sheet of a workbook to its own JSON file
    Sheets(SheetsArgs),
    /// Print per-table field and frequency counts for a scan report
    Summary(SummaryArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ProfileFormat {
    /// WhiteRabbit scan report (.xlsx)
    #[default]
    WhiteRabbit,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SheetMatchArg {
    First,
    Longest,
}

impl From<SheetMatchArg> for SheetMatch {
    fn from(value: SheetMatchArg) -> Self {
        match value {
            SheetMatchArg::First => SheetMatch::First,
            SheetMatchArg::Longest => SheetMatch::Longest,
        }
    }
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// YAML file overriding sheet names, column headers, and policies
    #[arg(long)]
    pub layout: Option<PathBuf>,
    /// Fail when a declared table has no frequency sheet
    #[arg(long = "strict-tables")]
    pub strict_tables: bool,
    /// Fail when a frequency sheet names a field the overview does not declare
    #[arg(long = "strict-fields")]
    pub strict_fields: bool,
    /// How to choose among several sheets whose names prefix a table name
    #[arg(long = "sheet-match", value_enum)]
    pub sheet_match: Option<SheetMatchArg>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Data profile report file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// Dataset identifier (inferred from profiles/<id>/<file> when omitted)
    #[arg(long)]
    pub pid: Option<String>,
    /// Output directory (defaults to profiles/<id> or the current directory)
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,
    /// Write the document to stdout instead of a file
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,
    /// Profile report format
    #[arg(long, value_enum, default_value_t = ProfileFormat::WhiteRabbit)]
    pub format: ProfileFormat,
    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Debug, Args)]
pub struct SheetsArgs {
    /// Workbook to export
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// Directory for the per-sheet JSON files (defaults to the workbook's directory)
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Data profile report file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    #[command(flatten)]
    pub layout: LayoutArgs,
}
