pub mod filings;
pub mod query;
