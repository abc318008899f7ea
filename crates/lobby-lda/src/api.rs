use crate::error::{ConfigError, FetchError};
use async_trait::async_trait;
use dotenv::var;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

/// Source of filings pages.
///
/// The real implementation is [`Lda`]; the fetch loop only depends on this
/// trait so it can be driven by anything that hands back pages.
#[async_trait]
pub trait Http: Send + Sync {
    /// Where pagination starts.
    fn base_url(&self) -> &str;

    /// GET a single page. `params` is only attached to the first request of a
    /// search; later requests follow the server's `next` link as-is.
    async fn get_page(
        &self,
        url: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Page, FetchError>;
}

/// One page of the filings endpoint.
///
/// ```json
/// {
///     "count": 1785074,
///     "next": "https://lda.senate.gov/api/v1/filings/?page=2",
///     "previous": null,
///     "results": [ { "filing_type": "MM", "income": null, ... } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "de_results")]
    pub results: Vec<Value>,
    #[serde(default, deserialize_with = "de_next")]
    pub next: Option<String>,
}

// `"results": null` reads as an empty page
fn de_results<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<Value>> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

// a blank `next` means there are no more pages
fn de_next<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(value.filter(|next| !next.trim().is_empty()))
}

fn base_url_or_default(configured: Option<String>) -> String {
    configured
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| Lda::BASE_URL.to_string())
}

/// Client for the LDA filings endpoint; one per search so the connection is
/// reused across pages.
#[derive(Debug, Clone)]
pub struct Lda {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl Lda {
    pub const BASE_URL: &'static str = "https://lda.senate.gov/api/v1/filings/";

    /// Build a client for the public endpoint, or for `LDA_BASE_URL` if set.
    pub fn new(api_key: &str) -> Result<Self, ConfigError> {
        Self::with_base_url(api_key, &base_url_or_default(var("LDA_BASE_URL").ok()))
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, ConfigError> {
        let user_agent = var("USER_AGENT").unwrap_or_else(|_| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
        });
        let http_client = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        debug!("LDA client built for {base_url}");
        Ok(Self {
            http_client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl Http for Lda {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_page(
        &self,
        url: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Page, FetchError> {
        let mut request = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, "application/json");
        if let Some(params) = params {
            request = request.query(params);
        }

        trace!("http GET requesting {url}");
        let response = request.send().await.map_err(|e| {
            debug!("failed to fetch: {url}");
            FetchError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            debug!("failed to read response body: {url}");
            FetchError::Network(e.to_string())
        })?;

        if !status.is_success() {
            debug!("{url} responded with {status}");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!("failed to parse json: {url}");
            FetchError::Decode(e.to_string())
        })
    }
}
