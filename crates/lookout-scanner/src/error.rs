use std::time::Duration;
use thiserror::Error;

/// Faults inside a single probe or pivot.
///
/// None of these reach the caller of a sweep: executors and pivots log them
/// and resolve to "absent".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("{url} served its not-found page")]
    NotFoundPage { url: String },

    #[error("failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::Status {
            url: "https://a.test/bob".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "unexpected HTTP 404 from https://a.test/bob");

        let err = ProbeError::Timeout {
            url: "https://a.test/bob".to_string(),
            timeout: Duration::from_secs(6),
        };
        assert!(err.to_string().contains("timed out after 6s"));
    }
}
