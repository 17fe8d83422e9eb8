//! Table normalizer.
//!
//! Turns the loader's untyped table into a [`NormalizedDataset`]: the date
//! column becomes [`Cell::Date`] and every sentinel-coded column holds only
//! [`Cell::Number`] or [`Cell::Missing`]. Running it on its own output is a
//! no-op.

use crate::config::NormalizerConfig;
use crate::error::{Error, Result};
use crate::types::{Cell, Dataset, NormalizedDataset};
use crate::util::{parse_date_safe, parse_f64_safe};
use tracing::{debug, info};

/// Normalize with the default date column and sentinel rules.
pub fn normalize(raw: &Dataset) -> Result<NormalizedDataset> {
    normalize_with(raw, &NormalizerConfig::default())
}

/// Normalize a copy of `raw`; the input is left untouched.
pub fn normalize_with(raw: &Dataset, config: &NormalizerConfig) -> Result<NormalizedDataset> {
    let width = raw.columns.len();
    if let Some((row, record)) = raw
        .records
        .iter()
        .enumerate()
        .find(|(_, record)| record.len() != width)
    {
        return Err(Error::RowWidth {
            row,
            expected: width,
            found: record.len(),
        });
    }
    let mut dataset = raw.clone();

    let date_idx = dataset.column_index(&config.date_column)?;
    for (row, record) in dataset.records.iter_mut().enumerate() {
        record[date_idx] = to_date(&record[date_idx], &config.date_column, row)?;
    }

    let mut replaced = 0usize;
    for column in &config.sentinel_columns {
        let Ok(idx) = dataset.column_index(column) else {
            debug!(column = %column, "sentinel column absent, skipping");
            continue;
        };
        for (row, record) in dataset.records.iter_mut().enumerate() {
            let (cell, was_sentinel) = to_float(&record[idx], column, row, config)?;
            if was_sentinel {
                replaced += 1;
            }
            record[idx] = cell;
        }
    }

    info!(
        rows = dataset.records.len(),
        sentinels_replaced = replaced,
        "normalized dataset"
    );
    Ok(NormalizedDataset { dataset, date_idx })
}

fn to_date(cell: &Cell, column: &str, row: usize) -> Result<Cell> {
    match cell {
        Cell::Date(d) => Ok(Cell::Date(*d)),
        Cell::Text(s) => parse_date_safe(Some(s))
            .map(Cell::Date)
            .ok_or_else(|| Error::Parse {
                column: column.to_string(),
                row,
                value: s.clone(),
            }),
        other => Err(Error::Parse {
            column: column.to_string(),
            row,
            value: other.to_string(),
        }),
    }
}

/// Returns the coerced cell and whether it was the sentinel.
fn to_float(cell: &Cell, column: &str, row: usize, config: &NormalizerConfig) -> Result<(Cell, bool)> {
    match cell {
        Cell::Missing => Ok((Cell::Missing, false)),
        Cell::Number(v) => Ok((Cell::Number(*v), false)),
        Cell::Text(s) if config.is_sentinel(s) => Ok((Cell::Missing, true)),
        Cell::Text(s) => parse_f64_safe(Some(s))
            .map(|v| (Cell::Number(v), false))
            .ok_or_else(|| Error::TypeCoercion {
                column: column.to_string(),
                row,
                value: s.clone(),
                expected: "a number",
            }),
        Cell::Date(d) => Err(Error::TypeCoercion {
            column: column.to_string(),
            row,
            value: d.to_string(),
            expected: "a number",
        }),
    }
}
