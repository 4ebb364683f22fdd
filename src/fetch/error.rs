// src/fetch/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure modes of a page fetch. Callers treat every variant as "no content".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unauthorized (check the scrape API key)")]
    Unauthorized,

    #[error("rate limited")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    /// Map a non-success HTTP status (plus body) onto a fetch error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => FetchError::Unauthorized,
            429 => FetchError::RateLimited,
            408 | 504 => FetchError::Timeout,
            _ => FetchError::Status {
                status,
                message: body,
            },
        }
    }

    /// Short machine label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Unauthorized => "unauthorized",
            FetchError::RateLimited => "rate_limited",
            FetchError::Status { .. } => "status",
            FetchError::Timeout => "timeout",
            FetchError::Network(_) => "network",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            FetchError::from_status(429, String::new()),
            FetchError::RateLimited
        ));
        assert!(matches!(
            FetchError::from_status(401, String::new()),
            FetchError::Unauthorized
        ));
        match FetchError::from_status(502, "bad gateway".into()) {
            FetchError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(FetchError::Timeout.kind(), "timeout");
    }
}
