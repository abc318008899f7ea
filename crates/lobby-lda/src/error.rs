use thiserror::Error;

/// Problems caught before any request is sent; a search never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing API Key: pass --api-key or set LDA_API_KEY")]
    MissingCredential,

    #[error("You must provide at least a Registrant Name or a Client Name")]
    MissingName,

    #[error("page cap must be between 1 and {max}, got {got}")]
    PageCap { got: u32, max: u32 },

    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Failure of a single page request. Fatal to the fetch loop, but records
/// already accumulated are kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("API Error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("An error occurred: {0}")]
    Network(String),

    #[error("failed to parse json: {0}")]
    Decode(String),
}
