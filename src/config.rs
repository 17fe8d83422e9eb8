//! Defaults for the data source, region and cleaning rules.

use chrono::NaiveDate;
use std::path::PathBuf;

/// File shipped alongside the binary.
pub const DEFAULT_DATA_PATH: &str = "PA_singlestate_timeseries.csv";
pub const DEFAULT_REGION: &str = "Pennsylvania";
pub const DEFAULT_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2021, 6, 16) {
    Some(date) => date,
    None => panic!("default date out of range"),
};

/// Textual marker the source uses instead of an empty numeric cell.
pub const NOT_AVAILABLE_SENTINEL: &str = "Not available";

/// Columns known to carry [`NOT_AVAILABLE_SENTINEL`].
pub const SENTINEL_COLUMNS: &[&str] = &["actuals.contactTracers", "actuals.icuBeds.currentUsageCovid"];

/// Rules applied by [`crate::normalize::normalize_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    pub date_column: String,
    /// Compared ASCII-case-insensitively.
    pub sentinel: String,
    pub sentinel_columns: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            sentinel: NOT_AVAILABLE_SENTINEL.to_string(),
            sentinel_columns: SENTINEL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl NormalizerConfig {
    pub fn is_sentinel(&self, value: &str) -> bool {
        value.trim().eq_ignore_ascii_case(&self.sentinel)
    }
}

/// Everything the CLI needs before it can build a dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub region: String,
    pub default_date: NaiveDate,
    pub normalizer: NormalizerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            region: DEFAULT_REGION.to_string(),
            default_date: DEFAULT_DATE,
            normalizer: NormalizerConfig::default(),
        }
    }
}
