use thiserror::Error;

/// Errors from model gateway calls.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A network error occurred during the API call.
    #[error("network: {0}")]
    Network(String),

    /// The inference service returned an error response.
    #[error("provider api: {0}")]
    Api(String),

    /// The response body could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The response decoded but lacks the expected content structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
