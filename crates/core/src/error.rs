#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required setting (e.g. the upstream API key) is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The upstream pool provider could not be reached or answered with an error.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
