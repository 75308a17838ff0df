//! Provider error types.

/// Failure reported by a transit data provider.
///
/// Rankers catch these and surface them only as "no data" plus a log line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Network failure, timeout or similar.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The provider understood the request but refused it.
    #[error("request rejected: {0}")]
    Rejected(String),
}
