use crate::error::Result;
use crate::types::ReportRow;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

/// Render rows as a plain text grid, one line per row, no header.
pub fn render_table(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return String::from("(no rows)");
    }
    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row.cells());
    }
    builder.build().with(Style::blank()).to_string()
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Everything the JSON output carries for one run.
#[derive(Debug, Serialize)]
pub struct DashboardOutput<'a> {
    pub region: &'a str,
    pub date: String,
    pub mode: String,
    pub duplicate_records: usize,
    pub rows: &'a [ReportRow],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary: Option<String>,
}
