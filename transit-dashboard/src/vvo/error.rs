//! VVO client error types.

use crate::provider::ProviderError;

use super::convert::ConversionError;

/// Errors from the VVO HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum VvoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by VVO API")]
    RateLimited,

    #[error("unauthorized")]
    Unauthorized,

    /// The response carried a non-`Ok` status code
    #[error("service status {0}")]
    Service(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl From<VvoError> for ProviderError {
    fn from(err: VvoError) -> Self {
        match err {
            VvoError::Http(e) => ProviderError::Transport(e.to_string()),
            VvoError::Json { message, .. } => ProviderError::Malformed(message),
            VvoError::Api { status, message } => ProviderError::Status { status, message },
            VvoError::RateLimited => ProviderError::Status {
                status: 429,
                message: "rate limited".into(),
            },
            VvoError::Unauthorized => ProviderError::Status {
                status: 401,
                message: "unauthorized".into(),
            },
            VvoError::Service(code) => ProviderError::Rejected(code),
            VvoError::Conversion(e) => ProviderError::Malformed(e.to_string()),
        }
    }
}
