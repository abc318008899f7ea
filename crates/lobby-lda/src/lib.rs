/////////////////////////////////////////////////////////////////////////////////
//
// Senate Lobbying Disclosure Act (LDA)
// https://lda.senate.gov/api/redoc/v1/#section/About-the-REST-API/Browsable-API
//
/////////////////////////////////////////////////////////////////////////////////

pub mod api;
pub mod credential;
pub mod error;
pub mod fetch;
pub mod schema;
pub mod search;

pub use crate::api::{Http, Lda, Page};
pub use crate::credential::resolve_credential;
pub use crate::error::{ConfigError, FetchError};
pub use crate::fetch::{fetch_all, FetchOptions, FetchOutcome, Progress, StopReason};
pub use crate::schema::filings::{normalize, Column, Row, Table};
pub use crate::schema::query::{build_params, BuiltParams, Query, ReportType, Warning};
pub use crate::search::{search, SearchReport};

/// Upper bound on `--max-pages`.
pub const MAX_PAGE_CAP: u32 = 20;
