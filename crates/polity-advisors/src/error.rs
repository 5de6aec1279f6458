//! Error type for the advisor transport and response-validation layer.
//!
//! Every variant here is caught at the pipeline boundary and converted to
//! the failing stage's fallback per `spec.md` §4.7 -- nothing in this crate
//! propagates a failure into the deterministic core.

/// Errors that can occur while calling an advisor or validating its reply.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// The HTTP call itself failed (DNS, connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The advisor call did not complete within its timeout.
    #[error("advisor call timed out")]
    Timeout,

    /// The backend returned a non-2xx status.
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not valid JSON, even after recovery attempts.
    #[error("response was not valid JSON: {0}")]
    InvalidJson(String),

    /// The response was valid JSON but missing a required top-level field.
    #[error("response missing required field: {0}")]
    MissingField(&'static str),

    /// The response had all required fields but a value was out of its
    /// documented semantic range.
    #[error("response field out of range: {0}")]
    OutOfRange(String),

    /// The backend's reply body had no extractable text content.
    #[error("backend reply contained no text content")]
    EmptyReply,

    /// A configuration error (e.g. an empty API key).
    #[error("advisor configuration error: {0}")]
    Config(String),
}
