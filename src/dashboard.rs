//! Date-indexed lookups and tiered report assembly over a normalized series.

use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::loader::load_raw;
use crate::normalize::normalize_with;
use crate::types::{Cell, FieldValue, NormalizedDataset, Record, Report, ReportRow};
use crate::util::{format_int, is_integral, parse_date_safe};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Column names of the source table.
pub mod columns {
    pub const DATE: &str = "date";
    pub const NEW_CASES: &str = "actuals.newCases";
    pub const NEW_DEATHS: &str = "actuals.newDeaths";
    pub const CASES: &str = "actuals.cases";
    pub const DEATHS: &str = "actuals.deaths";
    pub const CASE_DENSITY: &str = "metrics.caseDensity";
    pub const VACCINATIONS_COMPLETED_RATIO: &str = "metrics.vaccinationsCompletedRatio";
    pub const VACCINATIONS_COMPLETED: &str = "actuals.vaccinationsCompleted";
    pub const VACCINATIONS_INITIATED_RATIO: &str = "metrics.vaccinationsInitiatedRatio";
    pub const VACCINATIONS_INITIATED: &str = "actuals.vaccinationsInitiated";
    pub const POSITIVE_TESTS: &str = "actuals.positiveTests";
    pub const NEGATIVE_TESTS: &str = "actuals.negativeTests";
    pub const HOSPITAL_CAPACITY: &str = "actuals.hospitalBeds.capacity";
    pub const HOSPITAL_USAGE_TOTAL: &str = "actuals.hospitalBeds.currentUsageTotal";
    pub const HOSPITAL_USAGE_COVID: &str = "actuals.hospitalBeds.currentUsageCovid";
    pub const HOSPITAL_TYPICAL_RATE: &str = "actuals.hospitalBeds.typicalUsageRate";
    pub const ICU_CAPACITY: &str = "actuals.icuBeds.capacity";
    pub const ICU_USAGE_TOTAL: &str = "actuals.icuBeds.currentUsageTotal";
    pub const ICU_USAGE_COVID: &str = "actuals.icuBeds.currentUsageCovid";
    pub const ICU_TYPICAL_RATE: &str = "actuals.icuBeds.typicalUsageRate";
    pub const CONTACT_TRACERS: &str = "actuals.contactTracers";
}

pub const SOURCE_URL: &str = "https://covidactnow.org/?s=21821108";

/// Which tiers the caller is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Basic,
    Advanced,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Basic => f.write_str("BASIC"),
            Mode::Advanced => f.write_str("ADVANCED"),
        }
    }
}

/// Report assembler for a single day.
///
/// The date is fixed at construction; build another `Dashboard` (sharing the
/// same `Arc<NormalizedDataset>`) to report on a different day.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<NormalizedDataset>,
    date: NaiveDate,
    /// Indices into `dataset.records()` whose date equals `date`.
    selection: Vec<usize>,
    region: String,
}

impl Dashboard {
    pub fn new(dataset: Arc<NormalizedDataset>, date: NaiveDate) -> Self {
        let date_idx = dataset.date_column_index();
        let selection: Vec<usize> = dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| matches!(record[date_idx], Cell::Date(d) if d == date))
            .map(|(i, _)| i)
            .collect();
        debug!(%date, matches = selection.len(), "selected day");
        Self {
            dataset,
            date,
            selection,
            region: crate::config::DEFAULT_REGION.to_string(),
        }
    }

    /// Parse a `YYYY-MM-DD` request and select that day.
    pub fn for_date_str(dataset: Arc<NormalizedDataset>, date: &str) -> Result<Self> {
        let parsed = parse_date_safe(Some(date)).ok_or_else(|| Error::Parse {
            column: columns::DATE.to_string(),
            row: 0,
            value: date.to_string(),
        })?;
        Ok(Self::new(dataset, parsed))
    }

    /// Load, normalize and select in one go.
    pub fn load(config: &DashboardConfig, date: NaiveDate) -> Result<Self> {
        let (raw, report) = load_raw(&config.data_path)?;
        info!(
            rows = report.total_rows,
            missing_cells = report.missing_cells,
            text_cells = report.text_cells,
            "raw cell summary"
        );
        let normalized = normalize_with(&raw, &config.normalizer)?;
        Ok(Self::new(Arc::new(normalized), date).with_region(&config.region))
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn dataset(&self) -> &Arc<NormalizedDataset> {
        &self.dataset
    }

    /// Number of records matching the requested date.
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Records that repeat an earlier record exactly, across the whole series.
    pub fn count_duplicate_records(&self) -> usize {
        let mut seen: HashSet<&Record> = HashSet::new();
        self.dataset
            .records()
            .iter()
            .filter(|record| !seen.insert(*record))
            .count()
    }

    /// The single record for the selected day, or a selection error.
    fn record(&self) -> Result<(usize, &Record)> {
        match self.selection.as_slice() {
            [idx] => Ok((*idx, &self.dataset.records()[*idx])),
            other => Err(Error::Selection {
                date: self.date.to_string(),
                matches: other.len(),
            }),
        }
    }

    /// Read `column` from the selected day.
    ///
    /// Missing cells come back as [`FieldValue::NotAvailable`]. Integer reads
    /// refuse fractional values rather than truncating them.
    pub fn lookup(&self, column: &str, as_float: bool) -> Result<FieldValue> {
        let (row, record) = self.record()?;
        let idx = self.dataset.column_index(column)?;
        coerce(&record[idx], column, row, as_float)
    }

    /// Read a count that has no "not available" form.
    ///
    /// Test totals are reported as raw integers; a missing value is an error
    /// for the test section rather than a degraded cell.
    pub fn required_count(&self, column: &str) -> Result<i64> {
        let (row, record) = self.record()?;
        let unavailable = || Error::DataUnavailable {
            column: column.to_string(),
            date: self.date.to_string(),
        };
        let idx = self.dataset.column_index(column).map_err(|_| unavailable())?;
        match coerce(&record[idx], column, row, false)? {
            FieldValue::Int(v) => Ok(v),
            _ => Err(unavailable()),
        }
    }

    /// Infection and vaccination metrics, ten rows in fixed order.
    pub fn basic_report(&self) -> Result<Report> {
        let new_cases = self.lookup(columns::NEW_CASES, false)?;
        let new_deaths = self.lookup(columns::NEW_DEATHS, false)?;
        let cases = self.lookup(columns::CASES, false)?;
        let deaths = self.lookup(columns::DEATHS, false)?;
        let case_density = self.lookup(columns::CASE_DENSITY, true)?;

        let completed_ratio = self.lookup(columns::VACCINATIONS_COMPLETED_RATIO, true)?;
        let completed = self.lookup(columns::VACCINATIONS_COMPLETED, false)?;
        let initiated_ratio = self.lookup(columns::VACCINATIONS_INITIATED_RATIO, true)?;
        let initiated = self.lookup(columns::VACCINATIONS_INITIATED, false)?;

        Ok(vec![
            ReportRow::banner("=BASIC DATA=", "==="),
            ReportRow::group("INFECTION"),
            ReportRow::metric("new cases", new_cases),
            ReportRow::metric("new deaths", new_deaths),
            ReportRow::metric("cumulative cases", cases),
            ReportRow::metric("cumulative deaths", deaths),
            ReportRow::metric("cases per 100k (using 7-day rolling average)", case_density),
            ReportRow::group("VACCINATION"),
            ReportRow::metric("completed ratio (total)", paired(completed_ratio, completed)),
            ReportRow::metric("initiated ratio (total)", paired(initiated_ratio, initiated)),
        ])
    }

    /// Cumulative test results: a heading and two rows.
    pub fn test_section(&self) -> Result<Report> {
        let positive = self.required_count(columns::POSITIVE_TESTS)?;
        let negative = self.required_count(columns::NEGATIVE_TESTS)?;
        Ok(vec![
            ReportRow::group("TEST"),
            ReportRow::metric("number of positive tests (to date)", positive),
            ReportRow::metric("number of negative tests (to date)", negative),
        ])
    }

    /// Acute and ICU bed usage: a heading and eight rows.
    pub fn hospital_section(&self) -> Result<Report> {
        let capacity = self.lookup(columns::HOSPITAL_CAPACITY, false)?;
        let usage = self.lookup(columns::HOSPITAL_USAGE_TOTAL, false)?;
        let usage_covid = self.lookup(columns::HOSPITAL_USAGE_COVID, false)?;
        let typical = self.lookup(columns::HOSPITAL_TYPICAL_RATE, true)?;

        let icu_capacity = self.lookup(columns::ICU_CAPACITY, false)?;
        let icu_usage = self.lookup(columns::ICU_USAGE_TOTAL, false)?;
        let icu_usage_covid = self.lookup(columns::ICU_USAGE_COVID, false)?;
        let icu_typical = self.lookup(columns::ICU_TYPICAL_RATE, true)?;

        Ok(vec![
            ReportRow::group("HOSPITAL"),
            ReportRow::metric(
                "total beds in use (out of them, by COVID patients)",
                paired(usage, usage_covid),
            ),
            ReportRow::metric("total beds available", capacity),
            ReportRow::metric("typical use of beds", typical),
            ReportRow::blank(),
            ReportRow::metric(
                "total ICU beds in use (out of them, by COVID patients)",
                paired(icu_usage, icu_usage_covid),
            ),
            ReportRow::metric("total ICU beds available", icu_capacity),
            ReportRow::metric("typical ICU use of beds", icu_typical),
            ReportRow::blank(),
        ])
    }

    /// Header row plus the requested optional sections.
    pub fn advanced_report(&self, include_tests: bool, include_hospital: bool) -> Result<Report> {
        let mut report = vec![ReportRow::banner("=ADVANCED=", "")];
        if include_tests {
            report.extend(self.test_section()?);
        }
        if include_hospital {
            report.extend(self.hospital_section()?);
        }
        Ok(report)
    }

    /// Informational header printed above the tables.
    pub fn intro_text(&self, mode: Mode) -> String {
        let duplicates = self.count_duplicate_records();
        if duplicates > 0 {
            warn!(duplicates, "time series contains duplicate records");
        }
        format!(
            "-----------------\n\
             The information below is taken from COVID Act Now at {SOURCE_URL}.\n\
             This program has two modes:\n    \
             (1) basic, which displays primary COVID metrics such as cases/deaths and vaccination rates,\n    \
             (2) advanced, which adds metrics about tests and hospital capacity on request.\n\
             You are now in {mode} mode.\n\
             \n\
             Total number of duplicates for the whole time range is {}.\n\
             Below dashboard is for {}, {}.\n",
            format_int(duplicates),
            self.region,
            self.date,
        )
    }
}

/// `ratio (count)` style cell.
fn paired(first: FieldValue, second: FieldValue) -> String {
    format!("{} ({})", first, second)
}

fn coerce(cell: &Cell, column: &str, row: usize, as_float: bool) -> Result<FieldValue> {
    let mismatch = |value: String, expected: &'static str| Error::TypeCoercion {
        column: column.to_string(),
        row,
        value,
        expected,
    };
    match cell {
        Cell::Missing => Ok(FieldValue::NotAvailable),
        Cell::Number(v) if as_float => Ok(FieldValue::Float(*v)),
        Cell::Number(v) if is_integral(*v) => Ok(FieldValue::Int(*v as i64)),
        Cell::Number(v) => Err(mismatch(v.to_string(), "an integer")),
        other => Err(mismatch(other.to_string(), "a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_from_reader;
    use crate::normalize::normalize;
    use std::path::Path;

    const FIXTURE: &str = include_str!("../tests/fixtures/pa_timeseries.csv");

    fn dataset() -> Arc<NormalizedDataset> {
        let (raw, _) = load_from_reader(FIXTURE.as_bytes(), Path::new("fixture.csv")).unwrap();
        Arc::new(normalize(&raw).unwrap())
    }

    fn dashboard(date: &str) -> Dashboard {
        Dashboard::for_date_str(dataset(), date).unwrap()
    }

    #[test]
    fn test_lookup_int_and_float() {
        let d = dashboard("2021-06-16");
        assert_eq!(
            d.lookup(columns::VACCINATIONS_COMPLETED, false).unwrap(),
            FieldValue::Int(5_000_000)
        );
        assert_eq!(
            d.lookup(columns::VACCINATIONS_COMPLETED_RATIO, true).unwrap(),
            FieldValue::Float(0.42)
        );
    }

    #[test]
    fn test_lookup_sentinel_is_not_available() {
        let d = dashboard("2021-06-16");
        assert_eq!(
            d.lookup(columns::ICU_USAGE_COVID, false).unwrap(),
            FieldValue::NotAvailable
        );
        assert_eq!(
            d.lookup(columns::CONTACT_TRACERS, true).unwrap(),
            FieldValue::NotAvailable
        );
    }

    #[test]
    fn test_lookup_empty_cell_is_not_available() {
        let d = dashboard("2021-06-16");
        assert_eq!(
            d.lookup(columns::HOSPITAL_USAGE_COVID, false).unwrap(),
            FieldValue::NotAvailable
        );
    }

    #[test]
    fn test_lookup_fractional_as_integer_fails() {
        let d = dashboard("2021-06-16");
        let err = d.lookup(columns::CASE_DENSITY, false).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeCoercion {
                expected: "an integer",
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_unknown_column() {
        let d = dashboard("2021-06-16");
        assert!(matches!(
            d.lookup("metrics.testPositivityRatio", true),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_absent_date_is_selection_error() {
        let d = dashboard("2021-07-01");
        assert_eq!(d.selection_len(), 0);
        assert!(matches!(
            d.basic_report(),
            Err(Error::Selection { matches: 0, .. })
        ));
    }

    #[test]
    fn test_duplicated_date_is_selection_error() {
        let d = dashboard("2021-06-14");
        assert!(matches!(
            d.lookup(columns::CASES, false),
            Err(Error::Selection { matches: 2, .. })
        ));
    }

    #[test]
    fn test_malformed_request_is_parse_error() {
        let err = Dashboard::for_date_str(dataset(), "16/06/2021").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_count_duplicate_records() {
        assert_eq!(dashboard("2021-06-16").count_duplicate_records(), 1);
    }

    #[test]
    fn test_basic_report_shape() {
        let report = dashboard("2021-06-16").basic_report().unwrap();
        assert_eq!(report.len(), 10);
        assert_eq!(report[0].section, "=BASIC DATA=");
        assert_eq!(report[1].group, "INFECTION");
        assert_eq!(report[2].metric, "new cases");
        assert_eq!(report[2].value, "412");
        assert_eq!(report[6].value, "2.4");
        assert_eq!(report[7].group, "VACCINATION");
        assert_eq!(report[8].metric, "completed ratio (total)");
        assert_eq!(report[8].value, "0.42 (5000000)");
        assert_eq!(report[9].value, "0.53 (6900000)");
    }

    #[test]
    fn test_basic_report_with_missing_values_keeps_shape() {
        let report = dashboard("2021-06-15").basic_report().unwrap();
        assert_eq!(report.len(), 10);
        assert_eq!(report[3].value, "data is not available");
    }

    #[test]
    fn test_advanced_report_sections() {
        let d = dashboard("2021-06-16");
        assert_eq!(d.advanced_report(false, false).unwrap().len(), 1);
        assert_eq!(d.advanced_report(true, false).unwrap().len(), 4);
        assert_eq!(d.advanced_report(false, true).unwrap().len(), 10);

        let full = d.advanced_report(true, true).unwrap();
        assert_eq!(full.len(), 13);
        assert_eq!(full[0].section, "=ADVANCED=");
        assert_eq!(full[2].value, "1210500");
        assert_eq!(full[5].value, "23800 (data is not available)");
        assert_eq!(full[7].value, "0.75");
        assert_eq!(full[9].value, "2850 (data is not available)");
    }

    #[test]
    fn test_missing_test_count_is_data_unavailable() {
        let d = dashboard("2021-06-15");
        let err = d.advanced_report(true, true).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { ref column, .. } if column == columns::POSITIVE_TESTS));
        // The hospital section still renders on its own.
        assert_eq!(d.advanced_report(false, true).unwrap().len(), 10);
    }

    #[test]
    fn test_intro_text() {
        let intro = dashboard("2021-06-16")
            .with_region("Pennsylvania")
            .intro_text(Mode::Advanced);
        assert!(intro.contains("You are now in ADVANCED mode."));
        assert!(intro.contains("duplicates for the whole time range is 1."));
        assert!(intro.contains("Pennsylvania, 2021-06-16."));
        assert!(intro.contains(SOURCE_URL));
    }

    #[test]
    fn test_dashboards_share_dataset() {
        let shared = dataset();
        let a = Dashboard::for_date_str(Arc::clone(&shared), "2021-06-13").unwrap();
        let b = Dashboard::for_date_str(Arc::clone(&shared), "2021-06-16").unwrap();
        assert!(Arc::ptr_eq(a.dataset(), b.dataset()));
        assert_ne!(
            a.lookup(columns::CASES, false).unwrap(),
            b.lookup(columns::CASES, false).unwrap()
        );
    }
}
