use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// One untyped cell of the source table.
///
/// Numbers compare and hash by bit pattern so that whole records can be used
/// as set keys when counting duplicates.
#[derive(Debug, Clone)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Missing, Cell::Missing) => true,
            (Cell::Number(a), Cell::Number(b)) => a.to_bits() == b.to_bits(),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Date(a), Cell::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Missing => {}
            Cell::Number(v) => v.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => f.write_str(""),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Date(d) => write!(f, "{}", d),
        }
    }
}

/// A record is one row of cells, aligned with [`Dataset::columns`].
pub type Record = Vec<Cell>;

/// An ordered table of records keyed by column name.
///
/// This is the raw shape produced by the loader; see [`NormalizedDataset`] for
/// the cleaned form.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

/// Dataset as read from disk, before any cleaning.
pub type RawDataset = Dataset;

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of `column` in every record.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::MissingColumn {
                column: column.to_string(),
            })
    }
}

/// A dataset whose date column is typed and whose sentinel-coded columns hold
/// only numbers or missing markers. Every record is exactly as wide as the
/// header.
///
/// Only [`crate::normalize::normalize`] builds one, and nothing mutates it
/// afterwards, so it is safe to share behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataset {
    pub(crate) dataset: Dataset,
    pub(crate) date_idx: usize,
}

impl NormalizedDataset {
    pub fn as_dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.dataset.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.dataset.records
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.dataset.column_index(column)
    }

    /// Every record holds a [`Cell::Date`] at this position.
    pub fn date_column_index(&self) -> usize {
        self.date_idx
    }
}

/// Result of looking up one column on the selected day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    NotAvailable,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::NotAvailable => f.write_str("data is not available"),
        }
    }
}

/// One line of a report: a three-level label hierarchy and a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub section: String,
    pub group: String,
    pub metric: String,
    pub value: String,
}

impl ReportRow {
    pub fn new(
        section: impl Into<String>,
        group: impl Into<String>,
        metric: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            group: group.into(),
            metric: metric.into(),
            value: value.into(),
        }
    }

    /// A section banner such as `=BASIC DATA=`.
    pub fn banner(section: &str, filler: &str) -> Self {
        Self::new(section, filler, filler, filler)
    }

    /// A group heading such as `INFECTION`.
    pub fn group(name: &str) -> Self {
        Self::new("", name, "", "")
    }

    pub fn metric(label: &str, value: impl fmt::Display) -> Self {
        Self::new("", "", label, value.to_string())
    }

    pub fn blank() -> Self {
        Self::new("", "", "", "")
    }

    pub fn cells(&self) -> [String; 4] {
        [
            self.section.clone(),
            self.group.clone(),
            self.metric.clone(),
            self.value.clone(),
        ]
    }
}

/// Rows in display order.
pub type Report = Vec<ReportRow>;
