//! Daily regional COVID dashboard.
//!
//! Loads a single-region time series, normalizes its date and sentinel-coded
//! columns, and assembles basic and advanced reports for one day.
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use covid_dashboard::{load_raw, normalize, Dashboard};
//!
//! let (raw, _) = load_raw(Path::new("PA_singlestate_timeseries.csv"))?;
//! let dataset = Arc::new(normalize(&raw)?);
//! let dashboard = Dashboard::for_date_str(dataset, "2021-06-16")?;
//! let rows = dashboard.basic_report()?;
//! ```

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod glossary;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod types;
pub mod util;

pub use config::{DashboardConfig, NormalizerConfig};
pub use dashboard::{Dashboard, Mode};
pub use error::{Error, Result};
pub use glossary::glossary_text;
pub use loader::{load_from_reader, load_raw, LoadReport};
pub use normalize::{normalize, normalize_with};
pub use types::{Cell, Dataset, FieldValue, NormalizedDataset, RawDataset, Report, ReportRow};
