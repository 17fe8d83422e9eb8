//! Command-line shell around the dashboard.
//!
//! Argument parsing, the optional interactive questions, and printing. All
//! data work goes through [`crate::dashboard::Dashboard`].

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, Mode};
use crate::error::{Error, Result};
use crate::glossary::glossary_text;
use crate::output::{render_table, to_json, DashboardOutput};
use crate::util::parse_date_safe;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

/// Command-line spelling of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Basic,
    Advanced,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Basic => Mode::Basic,
            ModeArg::Advanced => Mode::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Daily COVID dashboard for a single region.
#[derive(Debug, Clone, Parser)]
#[command(name = "covid-dashboard", version)]
pub struct Args {
    /// Dashboard tier to show
    #[arg(value_enum, default_value = "basic")]
    pub mode: ModeArg,

    /// Day to report on (YYYY-MM-DD); defaults to 2021-06-16
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<String>,

    /// Include cumulative test results (advanced mode)
    #[arg(long)]
    pub tests: bool,

    /// Include hospital and ICU bed usage (advanced mode)
    #[arg(long)]
    pub hospital: bool,

    /// Print the legend after the dashboard
    #[arg(long)]
    pub legend: bool,

    /// Ask for sections, date and legend on the terminal
    #[arg(short, long)]
    pub interactive: bool,

    /// Time series CSV to read
    #[arg(long, value_name = "PATH", env = "COVID_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Region name shown in the header
    #[arg(long)]
    pub region: Option<String>,

    /// Print the dashboard as a text grid or as JSON
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Apply path and region overrides on top of the defaults.
    pub fn config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        if let Some(path) = &self.data {
            config.data_path = path.clone();
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        config
    }
}

/// Choices left after flags and prompts are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub mode: Mode,
    pub date: NaiveDate,
    pub tests: bool,
    pub hospital: bool,
    pub legend: bool,
}

impl Selection {
    /// Test entries belong in the legend only when the advanced test section was shown.
    pub fn glossary_tests(&self) -> bool {
        self.mode == Mode::Advanced && self.tests
    }

    pub fn glossary_hospital(&self) -> bool {
        self.mode == Mode::Advanced && self.hospital
    }
}

/// `y` / `yes` in any case.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Blank input, or a run of a single repeated character, keeps the default.
pub fn resolve_date_answer(answer: &str, default: NaiveDate) -> Result<NaiveDate> {
    let trimmed = answer.trim_end_matches(['\r', '\n']);
    let mut chars = trimmed.chars();
    let accidental = match chars.next() {
        None => true,
        Some(first) => chars.all(|c| c == first),
    };
    if accidental {
        return Ok(default);
    }
    parse_date_safe(Some(trimmed)).ok_or_else(|| Error::Parse {
        column: "date".to_string(),
        row: 0,
        value: trimmed.to_string(),
    })
}

fn prompt<R: BufRead, W: Write>(input: &mut R, prompts: &mut W, question: &str) -> Result<String> {
    let io_err = |source| Error::Io {
        path: PathBuf::from("<stdin>"),
        source,
    };
    write!(prompts, "{}", question).map_err(io_err)?;
    prompts.flush().map_err(io_err)?;
    let mut buf = String::new();
    input.read_line(&mut buf).map_err(io_err)?;
    Ok(buf)
}

/// Merge flags with terminal answers.
///
/// Only advanced mode asks about sections and date; the legend question is
/// asked in both modes unless `--legend` was given. Questions are written to
/// `prompts`, never to the dashboard output.
pub fn resolve_selection<R: BufRead, P: Write>(
    args: &Args,
    default_date: NaiveDate,
    input: &mut R,
    prompts: &mut P,
) -> Result<Selection> {
    let mut selection = Selection {
        mode: args.mode.into(),
        date: match &args.date {
            Some(d) => resolve_date_answer(d, default_date)?,
            None => default_date,
        },
        tests: args.tests,
        hospital: args.hospital,
        legend: args.legend,
    };
    if !args.interactive {
        return Ok(selection);
    }

    if selection.mode == Mode::Advanced {
        writeln!(
            prompts,
            "We will ask you a few questions to display the most suitable dashboard."
        )
        .map_err(|source| Error::Io {
            path: PathBuf::from("<stderr>"),
            source,
        })?;
        if !selection.tests {
            selection.tests = is_yes(&prompt(
                input,
                prompts,
                "\nWould you like to see data about the tests? Type Y for yes and N for no: ",
            )?);
        }
        if !selection.hospital {
            selection.hospital = is_yes(&prompt(
                input,
                prompts,
                "\nWould you like to see data about hospital bed availability? Type Y for yes and N for no: ",
            )?);
        }
        if args.date.is_none() {
            let answer = prompt(
                input,
                prompts,
                &format!(
                    "\nThe default date is {default_date}. Press Enter to keep it, or type YYYY-MM-DD: "
                ),
            )?;
            selection.date = resolve_date_answer(&answer, default_date)?;
        }
    }
    Ok(selection)
}

/// Build the dashboard and write it to `out`; questions go to `prompts`.
pub fn run<R: BufRead, W: Write, P: Write>(
    args: &Args,
    input: &mut R,
    out: &mut W,
    prompts: &mut P,
) -> Result<()> {
    let config = args.config();
    let mut selection = resolve_selection(args, config.default_date, input, prompts)?;
    let dashboard = Dashboard::load(&config, selection.date)?;
    let write_err = |source| Error::Io {
        path: PathBuf::from("<stdout>"),
        source,
    };

    let mut rows = dashboard.basic_report()?;
    let mut notes = Vec::new();
    if selection.mode == Mode::Advanced {
        match dashboard.advanced_report(selection.tests, selection.hospital) {
            Ok(advanced) => rows.extend(advanced),
            Err(err @ Error::DataUnavailable { .. }) => {
                warn!(error = %err, "dropping test section");
                notes.push(format!("Test data skipped: {err}"));
                rows.extend(dashboard.advanced_report(false, selection.hospital)?);
            }
            Err(err) => return Err(err),
        }
    }

    if args.format == OutputFormat::Json {
        let output = DashboardOutput {
            region: dashboard.region(),
            date: dashboard.date().to_string(),
            mode: selection.mode.to_string(),
            duplicate_records: dashboard.count_duplicate_records(),
            rows: &rows,
            notes,
            glossary: selection
                .legend
                .then(|| glossary_text(selection.glossary_tests(), selection.glossary_hospital())),
        };
        writeln!(out, "{}", to_json(&output)?).map_err(write_err)?;
        return Ok(());
    }

    writeln!(out, "{}", dashboard.intro_text(selection.mode)).map_err(write_err)?;
    writeln!(out, "{}", render_table(&rows)).map_err(write_err)?;
    for note in &notes {
        writeln!(out, "{note}").map_err(write_err)?;
    }

    if args.interactive && !selection.legend {
        selection.legend = is_yes(&prompt(
            input,
            prompts,
            "\nWould you like to see the legend? Type Y for yes and N for no: ",
        )?);
    }
    if selection.legend {
        writeln!(
            out,
            "\n{}",
            glossary_text(selection.glossary_tests(), selection.glossary_hospital())
        )
        .map_err(write_err)?;
    }
    writeln!(out, "Thanks for using our program!").map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn default_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, 16).unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["covid-dashboard"]).unwrap();
        assert_eq!(args.mode, ModeArg::Basic);
        assert!(!args.tests && !args.hospital && !args.legend);
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_parse_advanced_flags() {
        let args = Args::try_parse_from([
            "covid-dashboard",
            "advanced",
            "--tests",
            "--hospital",
            "--date",
            "2021-06-15",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.mode, ModeArg::Advanced);
        assert!(args.tests && args.hospital);
        assert_eq!(args.date.as_deref(), Some("2021-06-15"));
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Args::try_parse_from(["covid-dashboard", "advnaced"]).is_err());
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("Y\n"));
        assert!(is_yes(" yes "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }

    #[test]
    fn test_resolve_date_answer() {
        assert_eq!(resolve_date_answer("\n", default_date()).unwrap(), default_date());
        assert_eq!(resolve_date_answer("   ", default_date()).unwrap(), default_date());
        assert_eq!(
            resolve_date_answer("2021-06-14\n", default_date()).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 14).unwrap()
        );
        assert!(matches!(
            resolve_date_answer("June 14", default_date()),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_interactive_advanced_prompts() {
        let args = Args::try_parse_from(["covid-dashboard", "advanced", "-i"]).unwrap();
        let mut input = Cursor::new("y\nno\n2021-06-13\n");
        let mut out = Vec::new();
        let selection = resolve_selection(&args, default_date(), &mut input, &mut out).unwrap();
        assert!(selection.tests);
        assert!(!selection.hospital);
        assert_eq!(selection.date, NaiveDate::from_ymd_opt(2021, 6, 13).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("data about the tests"));
    }

    #[test]
    fn test_non_interactive_skips_prompts() {
        let args = Args::try_parse_from(["covid-dashboard", "advanced", "--hospital"]).unwrap();
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let selection = resolve_selection(&args, default_date(), &mut input, &mut out).unwrap();
        assert!(selection.hospital && !selection.tests);
        assert_eq!(selection.date, default_date());
        assert!(out.is_empty());
    }

    #[test]
    fn test_basic_mode_ignores_section_flags_in_legend() {
        let args = Args::try_parse_from(["covid-dashboard", "--tests", "--hospital"]).unwrap();
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let selection = resolve_selection(&args, default_date(), &mut input, &mut out).unwrap();
        assert_eq!(selection.mode, Mode::Basic);
        assert!(!selection.glossary_tests());
        assert!(!selection.glossary_hospital());
    }
}
