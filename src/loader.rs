use crate::error::{Error, Result};
use crate::types::{Cell, RawDataset, Record};
use crate::util::parse_f64_safe;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    pub text_cells: usize,
}

/// Read the delimited source file into an untyped table.
pub fn load_raw(path: &Path) -> Result<(RawDataset, LoadReport)> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (dataset, report) = load_from_reader(file, path)?;
    info!(
        path = %path.display(),
        rows = report.total_rows,
        columns = report.columns,
        "loaded time series"
    );
    Ok((dataset, report))
}

/// Same as [`load_raw`] for any reader; `origin` only labels errors.
pub fn load_from_reader<R: Read>(reader: R, origin: &Path) -> Result<(RawDataset, LoadReport)> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: PathBuf::from(origin),
        source,
    };
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let columns: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records: Vec<Record> = Vec::new();
    let mut missing_cells = 0usize;
    let mut text_cells = 0usize;

    for result in rdr.records() {
        let row = result.map_err(csv_err)?;
        let record: Record = row
            .iter()
            .map(|raw| {
                let cell = classify(raw);
                match cell {
                    Cell::Missing => missing_cells += 1,
                    Cell::Text(_) => text_cells += 1,
                    _ => {}
                }
                cell
            })
            .collect();
        records.push(record);
    }

    debug!(missing_cells, text_cells, "classified raw cells");
    let report = LoadReport {
        total_rows: records.len(),
        columns: columns.len(),
        missing_cells,
        text_cells,
    };
    Ok((RawDataset::new(columns, records), report))
}

/// Empty text is missing, numeric text is a number, anything else stays text.
fn classify(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Missing;
    }
    match parse_f64_safe(Some(trimmed)) {
        Some(v) => Cell::Number(v),
        None => Cell::Text(trimmed.to_string()),
    }
}
