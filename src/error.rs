//! Error types for the raid planner
//!
//! Defines the upstream failure taxonomy plus local plumbing errors.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for raid planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Error type covering upstream exchanges and local plumbing
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The upstream endpoint could not be reached (DNS, connect, transport)
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The bounded wait on an upstream exchange was exceeded
    #[error("upstream request timed out")]
    UpstreamTimeout,

    /// The upstream answered with a structured GraphQL error payload
    #[error("upstream error: {0}")]
    UpstreamError(String),

    /// The upstream response could not be parsed as the expected envelope
    #[error("malformed upstream response: {0}")]
    UpstreamMalformed(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors (for more context)
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        // Timeout check first: a connect timeout reports both is_timeout()
        // and is_connect(), and must surface as the distinct timeout kind.
        if err.is_timeout() {
            PlannerError::UpstreamTimeout
        } else if err.is_connect() {
            PlannerError::UpstreamUnavailable(err.to_string())
        } else if err.is_decode() {
            PlannerError::UpstreamMalformed(err.to_string())
        } else {
            PlannerError::UpstreamUnavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::UpstreamError("rate limited".to_string());
        assert_eq!(err.to_string(), "upstream error: rate limited");

        let err = PlannerError::UpstreamTimeout;
        assert_eq!(err.to_string(), "upstream request timed out");
    }
}
