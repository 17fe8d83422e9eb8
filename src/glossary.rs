// Legend printed under the dashboard on request.

pub const API_DOCS_URL: &str = "https://apidocs.covidactnow.org/api/";

const BASIC: &str = "\
BASIC: INFECTION
    * New cases**: New confirmed or suspected cases.
    * New deaths**: New confirmed or suspected COVID-19 deaths.
    * Cumulative cases: Cumulative confirmed or suspected cases.
    * Cumulative deaths: Cumulative deaths that are suspected or confirmed to have been caused by COVID-19.
    * Cases per 100k (using 7-day rolling average)**: also known as case density.

BASIC: VACCINATION
    * Completed ratio (total): Ratio of population that has completed vaccination.
    * Initiated ratio (total): Ratio of population that has initiated vaccination.
";

const TESTS: &str = "
ADVANCED: TEST
    * number of positive tests: Cumulative positive test results to date.
    * number of negative tests: Cumulative negative test results to date.
";

const HOSPITAL: &str = "
ADVANCED: HOSPITAL
    * total beds in use: Total number of acute beds currently in use.
    * total beds available: Current staffed acute bed capacity.
    * typical use of beds: Typical acute bed utilization rate.
    * total ICU beds in use: Total number of ICU beds currently in use.
    * total ICU beds available: Current staffed ICU bed capacity.
    * typical ICU use of beds: Typical ICU utilization rate.
";

/// Definitions for the metrics shown; sections follow the advanced toggles.
pub fn glossary_text(include_tests: bool, include_hospital: bool) -> String {
    let mut text = String::from(BASIC);
    if include_tests {
        text.push_str(TESTS);
    }
    if include_hospital {
        text.push_str(HOSPITAL);
    }
    text.push_str(&format!(
        "\n** For more info on pre-processing & calculation, check {API_DOCS_URL}\n"
    ));
    text
}
