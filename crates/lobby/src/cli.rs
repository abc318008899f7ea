use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lobby_lda::{Query, ReportType, MAX_PAGE_CAP};
use lobby_util::DEFAULT_CSV_FILE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, value_enum, ignore_case = true, default_value_t = TraceLevel::INFO)]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search Senate LDA filings by registrant and/or client.
    Search(SearchArgs),

    /// List the report-type codes accepted by `--report-type`.
    ReportTypes,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Registrant name, e.g. Microsoft, AARP.
    #[arg(long)]
    pub registrant: Option<String>,

    /// Client name, e.g. Apple, Amazon.
    #[arg(long)]
    pub client: Option<String>,

    /// Report type code (Q1, Q2, Q3, Q4, MM, YY, RR, RA); repeat for several.
    #[arg(long = "report-type", value_name = "CODE")]
    pub report_types: Vec<ReportType>,

    /// Minimum amount reported, in dollars (0 = no minimum).
    #[arg(long, default_value_t = 0)]
    pub min: u64,

    /// Maximum amount reported, in dollars (0 = no maximum).
    #[arg(long, default_value_t = 0)]
    pub max: u64,

    /// Only filings posted on or after this date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub posted_after: Option<NaiveDate>,

    /// Only filings posted on or before this date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub posted_before: Option<NaiveDate>,

    /// Max pages to fetch (25 records/page).
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_CAP as i64)
    )]
    pub max_pages: u32,

    /// Senate API key; falls back to LDA_API_KEY.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Filings endpoint to query instead of the public one.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Save the results as CSV.
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CSV_FILE
    )]
    pub csv: Option<PathBuf>,

    /// Don't print the results table.
    #[arg(long)]
    pub no_table: bool,
}

impl SearchArgs {
    pub fn query(&self) -> Query {
        Query {
            registrant: self.registrant.clone(),
            client: self.client.clone(),
            report_types: self.report_types.iter().copied().collect(),
            amount_min: self.min,
            amount_max: self.max,
            posted_after: self.posted_after,
            posted_before: self.posted_before,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<TraceLevel> for tracing::Level {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::DEBUG => tracing::Level::DEBUG,
            TraceLevel::INFO => tracing::Level::INFO,
            TraceLevel::WARN => tracing::Level::WARN,
            TraceLevel::ERROR => tracing::Level::ERROR,
        }
    }
}
