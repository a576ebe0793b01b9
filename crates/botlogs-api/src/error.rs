use thiserror::Error;

/// Errors from the log endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, ...
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("unauthorized: access token missing or rejected")]
    Unauthorized,

    /// `success: false` in an otherwise valid response
    #[error("{0}")]
    Application(String),

    /// Body did not have the expected shape
    #[error("unexpected response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the failure happened before the backend produced an answer
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
