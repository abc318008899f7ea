use crate::error::ConfigError;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

//////////////////////////////////////////////////////////////////////////////////////
//
// Search form -> filings endpoint query parameters
//
//////////////////////////////////////////////////////////////////////////////////////

/// Report types accepted by the `filing_type` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportType {
    Q1,
    Q2,
    Q3,
    Q4,
    MM,
    YY,
    RR,
    RA,
}

impl ReportType {
    pub const ALL: [ReportType; 8] = [
        ReportType::Q1,
        ReportType::Q2,
        ReportType::Q3,
        ReportType::Q4,
        ReportType::MM,
        ReportType::YY,
        ReportType::RR,
        ReportType::RA,
    ];

    /// The code the API uses, e.g. `"Q1"`.
    pub fn code(&self) -> &'static str {
        match self {
            ReportType::Q1 => "Q1",
            ReportType::Q2 => "Q2",
            ReportType::Q3 => "Q3",
            ReportType::Q4 => "Q4",
            ReportType::MM => "MM",
            ReportType::YY => "YY",
            ReportType::RR => "RR",
            ReportType::RA => "RA",
        }
    }

    /// Same wording as the API's `filing_type_display`.
    pub fn description(&self) -> &'static str {
        match self {
            ReportType::Q1 => "1st Quarter - Report",
            ReportType::Q2 => "2nd Quarter - Report",
            ReportType::Q3 => "3rd Quarter - Report",
            ReportType::Q4 => "4th Quarter - Report",
            ReportType::MM => "Mid-Year Report",
            ReportType::YY => "Year-End Report",
            ReportType::RR => "Registration",
            ReportType::RA => "Registration Amendment",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        ReportType::ALL
            .into_iter()
            .find(|rt| rt.code() == code)
            .ok_or_else(|| format!("unknown report type: {s}"))
    }
}

/// One submitted search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub registrant: Option<String>,
    pub client: Option<String>,
    pub report_types: BTreeSet<ReportType>,
    pub amount_min: u64,
    pub amount_max: u64,
    pub posted_after: Option<NaiveDate>,
    pub posted_before: Option<NaiveDate>,
}

impl Query {
    /// At least one of registrant or client must be non-blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if non_blank(&self.registrant).is_none() && non_blank(&self.client).is_none() {
            return Err(ConfigError::MissingName);
        }
        Ok(())
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Non-fatal problems with the form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// Only one end of the posted-date range was given; the date filter is dropped.
    PartialDateRange,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PartialDateRange => f.write_str(
                "Please select both a Start and End date for the date filter to apply.",
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltParams {
    pub params: Vec<(String, String)>,
    pub warnings: Vec<Warning>,
}

impl BuiltParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn push(&mut self, key: &str, val: impl ToString) {
        self.params.push((key.to_string(), val.to_string()));
    }
}

/// Translate a `Query` into filings endpoint parameters. Never rejects input;
/// anything the API cannot express is left out.
pub fn build_params(query: &Query) -> BuiltParams {
    let mut built = BuiltParams::default();

    if let Some(name) = non_blank(&query.registrant) {
        built.push("registrant_name", name);
    }
    if let Some(name) = non_blank(&query.client) {
        built.push("client_name", name);
    }

    // the API takes a single `filing_type`; larger selections are filtered
    // client-side after the fetch
    if query.report_types.len() == 1 {
        if let Some(rt) = query.report_types.first() {
            built.push("filing_type", rt.code());
        }
    }

    if query.amount_min > 0 {
        built.push("filing_amount_reported_min", query.amount_min);
    }
    if query.amount_max > 0 && query.amount_max >= query.amount_min {
        built.push("filing_amount_reported_max", query.amount_max);
    }

    match (query.posted_after, query.posted_before) {
        (Some(after), Some(before)) => {
            built.push("filing_dt_posted_after", after.format("%Y-%m-%d"));
            built.push("filing_dt_posted_before", before.format("%Y-%m-%d"));
        }
        (None, None) => {}
        _ => built.warnings.push(Warning::PartialDateRange),
    }

    built
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named() -> Query {
        Query {
            registrant: Some("  Microsoft ".into()),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn names_are_trimmed_and_blank_names_dropped() {
        let q = Query {
            client: Some("   ".into()),
            ..named()
        };
        let built = build_params(&q);
        assert_eq!(built.get("registrant_name"), Some("Microsoft"));
        assert_eq!(built.get("client_name"), None);
    }

    #[test]
    fn validate_requires_a_name() {
        assert_eq!(Query::default().validate(), Err(ConfigError::MissingName));
        let blank = Query {
            registrant: Some(" ".into()),
            client: Some("".into()),
            ..Default::default()
        };
        assert_eq!(blank.validate(), Err(ConfigError::MissingName));
        assert!(named().validate().is_ok());
        let client_only = Query {
            client: Some("Apple".into()),
            ..Default::default()
        };
        assert!(client_only.validate().is_ok());
    }

    #[test]
    fn single_report_type_is_sent() {
        let q = Query {
            report_types: [ReportType::Q3].into(),
            ..named()
        };
        assert_eq!(build_params(&q).get("filing_type"), Some("Q3"));
    }

    #[test]
    fn multiple_report_types_are_never_sent() {
        for n in 2..=ReportType::ALL.len() {
            let q = Query {
                report_types: ReportType::ALL[..n].iter().copied().collect(),
                ..named()
            };
            assert_eq!(build_params(&q).get("filing_type"), None, "{n} types");
        }
        assert_eq!(build_params(&named()).get("filing_type"), None);
    }

    #[test]
    fn amount_bounds() {
        let q = Query {
            amount_min: 5000,
            amount_max: 20000,
            ..named()
        };
        let built = build_params(&q);
        assert_eq!(built.get("filing_amount_reported_min"), Some("5000"));
        assert_eq!(built.get("filing_amount_reported_max"), Some("20000"));

        // zero means "unset"
        let built = build_params(&named());
        assert_eq!(built.get("filing_amount_reported_min"), None);
        assert_eq!(built.get("filing_amount_reported_max"), None);

        // equal bounds are fine
        let q = Query {
            amount_min: 100,
            amount_max: 100,
            ..named()
        };
        assert_eq!(
            build_params(&q).get("filing_amount_reported_max"),
            Some("100")
        );
    }

    #[test]
    fn max_below_min_is_dropped() {
        let q = Query {
            amount_min: 10000,
            amount_max: 5000,
            ..named()
        };
        let built = build_params(&q);
        assert_eq!(built.get("filing_amount_reported_min"), Some("10000"));
        assert_eq!(built.get("filing_amount_reported_max"), None);
    }

    #[test]
    fn full_date_range_is_sent() {
        let q = Query {
            posted_after: Some(date("2023-01-01")),
            posted_before: Some(date("2023-12-31")),
            ..named()
        };
        let built = build_params(&q);
        assert_eq!(built.get("filing_dt_posted_after"), Some("2023-01-01"));
        assert_eq!(built.get("filing_dt_posted_before"), Some("2023-12-31"));
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn half_date_range_warns_and_is_dropped() {
        let halves = [
            (Some(date("2023-01-01")), None),
            (None, Some(date("2023-12-31"))),
        ];
        for (after, before) in halves {
            let q = Query {
                posted_after: after,
                posted_before: before,
                ..named()
            };
            let built = build_params(&q);
            assert_eq!(built.get("filing_dt_posted_after"), None);
            assert_eq!(built.get("filing_dt_posted_before"), None);
            assert_eq!(built.warnings, vec![Warning::PartialDateRange]);
        }
    }

    #[test]
    fn no_date_range_no_warning() {
        let built = build_params(&named());
        assert!(built.warnings.is_empty());
        assert!(!built.params.iter().any(|(k, _)| k.starts_with("filing_dt")));
    }

    #[test]
    fn report_type_parses_any_case() {
        assert_eq!("mm".parse::<ReportType>(), Ok(ReportType::MM));
        assert_eq!(" Q4 ".parse::<ReportType>(), Ok(ReportType::Q4));
        assert!("Q5".parse::<ReportType>().is_err());
    }
}
