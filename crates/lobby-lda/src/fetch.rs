use crate::api::Http;
use crate::error::FetchError;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Rate-limit courtesy between consecutive pages.
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Hard upper bound on the number of pages requested.
    pub page_cap: u32,
    pub page_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_cap: 5,
            page_delay: PAGE_DELAY,
        }
    }
}

/// Reported after every page that came back successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub records: usize,
    pub pages: u32,
    pub page_cap: u32,
}

/// Why the fetch loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The server stopped handing out `next` links.
    Exhausted,
    /// `page_cap` pages were fetched and more were on offer.
    PageCap,
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub records: Vec<Value>,
    pub pages: u32,
    pub stop: StopReason,
}

impl FetchOutcome {
    pub fn error(&self) -> Option<&FetchError> {
        match &self.stop {
            StopReason::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Walk the `next` links from `base_url`, concatenating every page's
/// `results`, until the server runs out of pages, `page_cap` is hit, or a
/// request fails. Records gathered before a failure are kept.
pub async fn fetch_all<H, F>(
    http: &H,
    base_url: &str,
    params: &[(String, String)],
    options: &FetchOptions,
    mut on_progress: F,
) -> FetchOutcome
where
    H: Http + ?Sized,
    F: FnMut(&Progress),
{
    let mut next = Some(base_url.to_string());
    let mut pages = 0u32;
    let mut records: Vec<Value> = Vec::new();

    let stop = loop {
        let Some(url) = next.as_deref() else {
            break StopReason::Exhausted;
        };
        if pages >= options.page_cap {
            break StopReason::PageCap;
        }

        let time = Instant::now();

        // filters are encoded into the server's `next` links, so they are only
        // sent with the first request
        let query = (pages == 0).then_some(params);
        let page = match http.get_page(url, query).await {
            Ok(page) => page,
            Err(e) => {
                debug!("stopping after {pages} page(s): {e}");
                break StopReason::Failed(e);
            }
        };

        let added = page.results.len();
        records.extend(page.results);
        next = page.next;
        pages += 1;

        trace!(
            "page {pages}/{} added {added} records. Elapsed time: {} ms",
            options.page_cap,
            time.elapsed().as_millis()
        );
        on_progress(&Progress {
            records: records.len(),
            pages,
            page_cap: options.page_cap,
        });

        if next.is_some() && pages < options.page_cap && !options.page_delay.is_zero() {
            tokio::time::sleep(options.page_delay).await;
        }
    };

    debug!(
        "fetched {} records over {pages} page(s), stopped: {stop:?}",
        records.len()
    );
    FetchOutcome {
        records,
        pages,
        stop,
    }
}
