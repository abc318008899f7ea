use crate::error::ConfigError;
use tracing::debug;

/// Environment variable consulted when no key is given directly.
pub const API_KEY_VAR: &str = "LDA_API_KEY";

/// Pick the API key: an explicit, non-blank `explicit` wins, otherwise fall
/// back to `LDA_API_KEY` (the environment, or `.env` once loaded).
pub fn resolve_credential(explicit: Option<&str>) -> Result<String, ConfigError> {
    resolve_from(explicit, dotenv::var(API_KEY_VAR).ok())
}

fn resolve_from(explicit: Option<&str>, env: Option<String>) -> Result<String, ConfigError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        debug!("using API key from command line");
        return Ok(key.to_string());
    }

    match env.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => {
            debug!("using API key from {API_KEY_VAR}");
            Ok(key.to_string())
        }
        _ => Err(ConfigError::MissingCredential),
    }
}
