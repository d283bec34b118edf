//! Error types for the Messages API client.

use thiserror::Error;

/// Errors produced when calling the Anthropic API.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The HTTP request failed or the server rejected it.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The API key was rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The API is throttling requests (HTTP 429).
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait before retrying, in milliseconds.
        retry_after_ms: u64,
    },

    /// The requested model does not exist.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The client is missing required configuration.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The response could not be parsed into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } => true,
            ProviderError::Http(_) => true,
            ProviderError::RequestFailed(msg) => {
                msg.starts_with("HTTP 500")
                    || msg.starts_with("HTTP 502")
                    || msg.starts_with("HTTP 503")
                    || msg.starts_with("HTTP 529")
            }
            ProviderError::AuthFailed(_)
            | ProviderError::ModelNotFound(_)
            | ProviderError::NotConfigured(_)
            | ProviderError::InvalidResponse(_) => false,
        }
    }

    /// The provider-suggested retry delay, if this error carries one.
    pub fn suggested_delay_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Convenience alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_request_failed() {
        let err = ProviderError::RequestFailed("connection reset".into());
        assert_eq!(err.to_string(), "request failed: connection reset");
    }

    #[test]
    fn display_rate_limited() {
        let err = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 5000ms");
    }

    #[test]
    fn rate_limit_and_overload_are_transient() {
        assert!(ProviderError::RateLimited { retry_after_ms: 1 }.is_transient());
        // Anthropic signals overload with 529.
        assert!(ProviderError::RequestFailed("HTTP 529: overloaded".into()).is_transient());
        assert!(ProviderError::RequestFailed("HTTP 500: oops".into()).is_transient());
    }

    #[test]
    fn auth_and_parse_failures_are_not_transient() {
        assert!(!ProviderError::AuthFailed("bad key".into()).is_transient());
        assert!(!ProviderError::ModelNotFound("claude-99".into()).is_transient());
        assert!(!ProviderError::NotConfigured("no key".into()).is_transient());
        assert!(!ProviderError::InvalidResponse("no content".into()).is_transient());
        assert!(!ProviderError::RequestFailed("HTTP 400: bad".into()).is_transient());
    }

    #[test]
    fn suggested_delay() {
        let err = ProviderError::RateLimited {
            retry_after_ms: 2500,
        };
        assert_eq!(err.suggested_delay_ms(), Some(2500));
        assert_eq!(ProviderError::AuthFailed("x".into()).suggested_delay_ms(), None);
    }
}
