use std::fmt::Write as _;

use itertools::Itertools;

use crate::model::Report;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub table: String,
    pub fields: usize,
    pub with_frequencies: usize,
    pub values: usize,
}

pub fn summarize(report: &Report) -> Vec<SummaryRow> {
    report
        .data_classes
        .values()
        .map(|table| {
            let histograms = table.fields.values().filter_map(|f| f.frequencies.as_ref());
            let (with_frequencies, values) =
                histograms.fold((0, 0), |(count, total), h| (count + 1, total + h.len()));
            SummaryRow {
                table: table.name.clone(),
                fields: table.fields.len(),
                with_frequencies,
                values,
            }
        })
        .collect()
}

pub fn render_summary(rows: &[SummaryRow]) -> String {
    let headers = ["table", "fields", "with_frequencies", "values"].map(String::from);
    let body: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.table.replace(['\n', '\r', '\t'], " "),
                row.fields.to_string(),
                row.with_frequencies.to_string(),
                row.values.to_string(),
            ]
        })
        .collect();

    let mut widths = headers.each_ref().map(|h| h.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    let _ = writeln!(output, "{}", line(&headers));
    let _ = writeln!(output, "{}", line(&widths.map(|w| "-".repeat(w))));
    for cells in &body {
        let _ = writeln!(output, "{}", line(cells));
    }
    output
}
