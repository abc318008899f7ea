use crate::api::Http;
use crate::error::{ConfigError, FetchError};
use crate::fetch::{fetch_all, FetchOptions, Progress, StopReason};
use crate::schema::filings::{normalize, Table};
use crate::schema::query::{build_params, Query, Warning};
use crate::MAX_PAGE_CAP;
use tracing::{debug, info};

/// Everything one search produced, including a partial table when the
/// fetch loop failed part-way.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub table: Table,
    pub warnings: Vec<Warning>,
    /// Records received before normalizing and filtering.
    pub records_fetched: usize,
    pub pages: u32,
    pub stop: StopReason,
}

impl SearchReport {
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match &self.stop {
            StopReason::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// The "no matches" state: nothing at all came back from the server.
    pub fn is_empty(&self) -> bool {
        self.records_fetched == 0
    }
}

/// Run one search end to end: validate, build parameters, page through the
/// filings endpoint, normalize, then apply the multi-report-type filter.
///
/// Configuration problems are returned before any request is made; a failing
/// request is reported on the [`SearchReport`] alongside whatever was fetched.
pub async fn search<H, F>(
    http: &H,
    query: &Query,
    options: &FetchOptions,
    on_progress: F,
) -> Result<SearchReport, ConfigError>
where
    H: Http + ?Sized,
    F: FnMut(&Progress),
{
    if !(1..=MAX_PAGE_CAP).contains(&options.page_cap) {
        return Err(ConfigError::PageCap {
            got: options.page_cap,
            max: MAX_PAGE_CAP,
        });
    }
    query.validate()?;

    let built = build_params(query);
    for warning in &built.warnings {
        debug!("{warning}");
    }
    debug!("query parameters: {:?}", built.params);

    let outcome = fetch_all(http, http.base_url(), &built.params, options, on_progress).await;

    let records_fetched = outcome.records.len();
    let mut table = normalize(&outcome.records);
    table.retain_report_types(&query.report_types);
    info!(
        "{} of {records_fetched} fetched filings kept after filtering",
        table.len()
    );

    Ok(SearchReport {
        table,
        warnings: built.warnings,
        records_fetched,
        pages: outcome.pages,
        stop: outcome.stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Page;
    use crate::fetch::tests::{page, Scripted};
    use crate::schema::query::ReportType;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::time::Duration;

    fn options(page_cap: u32) -> FetchOptions {
        FetchOptions {
            page_cap,
            page_delay: Duration::ZERO,
        }
    }

    fn aarp() -> Query {
        Query {
            registrant: Some("AARP".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_name_stops_before_any_request() {
        let http = Scripted::new(vec![]);
        let result = search(&http, &Query::default(), &options(5), |_| {}).await;
        assert_eq!(result, Err(ConfigError::MissingName));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn page_cap_out_of_range_is_rejected() {
        let http = Scripted::new(vec![]);
        for cap in [0, 21] {
            let result = search(&http, &aarp(), &options(cap), |_| {}).await;
            assert_eq!(result, Err(ConfigError::PageCap { got: cap, max: 20 }));
        }
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn forbidden_second_page_returns_partial_table() {
        let http = Scripted::new(vec![
            Ok(page(25, Some("p2"))),
            Err(FetchError::Status {
                status: 403,
                body: "forbidden".into(),
            }),
        ]);
        let report = search(&http, &aarp(), &options(5), |_| {}).await.unwrap();
        assert_eq!(report.table.len(), 25);
        assert_eq!(report.pages, 1);
        assert!(!report.is_empty());
        assert!(matches!(
            report.fetch_error(),
            Some(FetchError::Status { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn no_results_is_empty_not_failed() {
        let http = Scripted::new(vec![Ok(Page::default())]);
        let report = search(&http, &aarp(), &options(5), |_| {}).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.fetch_error(), None);
        assert_eq!(report.stop, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn multiple_report_types_filtered_after_fetch() {
        let http = Scripted::new(vec![Ok(Page {
            results: vec![
                json!({ "filing_type": "Q1", "income": "100.00" }),
                json!({ "filing_type": "Q3", "income": "200.00" }),
                json!({ "filing_type": "Q2", "expenses": "300.00" }),
            ],
            next: None,
        })]);
        let query = Query {
            report_types: [ReportType::Q1, ReportType::Q2].into(),
            ..aarp()
        };

        let report = search(&http, &query, &options(5), |_| {}).await.unwrap();
        assert_eq!(report.records_fetched, 3);
        let types: Vec<_> = report
            .table
            .rows
            .iter()
            .filter_map(|r| r.report_type.clone())
            .collect();
        assert_eq!(types, vec!["Q1", "Q2"]);

        // the API never saw `filing_type`
        let first = http.calls()[0].1.clone().unwrap();
        assert!(!first.iter().any(|(k, _)| k == "filing_type"));
    }

    #[tokio::test]
    async fn partial_date_range_warns_and_searches() {
        let http = Scripted::new(vec![Ok(page(2, None))]);
        let query = Query {
            posted_after: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..aarp()
        };
        let report = search(&http, &query, &options(5), |_| {}).await.unwrap();
        assert_eq!(report.warnings, vec![Warning::PartialDateRange]);
        assert_eq!(report.table.len(), 2);
        assert_eq!(
            http.calls()[0].1,
            Some(vec![("registrant_name".to_string(), "AARP".to_string())])
        );
    }
}
