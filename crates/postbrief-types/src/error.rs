//! Error types shared across the pipeline.
//!
//! [`ConnectorError`] is the failure type for every HTTP connector (Gmail,
//! Notion, Slack). [`ConfigError`] covers startup configuration problems,
//! which are the only errors allowed to terminate the process.

use thiserror::Error;

/// Errors produced by the HTTP connectors.
///
/// Variants are grouped into transient failures (connection, rate limit,
/// server-side request failures) that a retry may resolve, and permanent
/// ones (auth, malformed response, missing resource) that it will not.
/// The retry layer consults [`is_transient`](ConnectorError::is_transient)
/// to decide.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConnectorError {
    /// The HTTP request could not be sent or the connection dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication or authorization was rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The service is throttling requests (HTTP 429).
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait before retrying, in milliseconds.
        retry_after_ms: u64,
    },

    /// The service rejected or failed the request (non-2xx other than the
    /// cases above).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The response could not be parsed into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),
}

impl ConnectorError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Server-side request failures are treated as transient only for
    /// 5xx-style messages; auth and parse failures never are.
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::ConnectionFailed(_) => true,
            ConnectorError::RateLimited { .. } => true,
            ConnectorError::RequestFailed(msg) => {
                msg.starts_with("HTTP 500")
                    || msg.starts_with("HTTP 502")
                    || msg.starts_with("HTTP 503")
                    || msg.starts_with("HTTP 504")
            }
            ConnectorError::AuthFailed(_)
            | ConnectorError::InvalidResponse(_)
            | ConnectorError::NotFound(_) => false,
        }
    }

    /// The provider-suggested retry delay, if this error carries one.
    pub fn suggested_delay_ms(&self) -> Option<u64> {
        match self {
            ConnectorError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Startup configuration errors.
///
/// Raised synchronously by `Config::from_env` before the scheduler loop
/// starts; the process exits with the message.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A mandatory environment variable is unset or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    /// An environment variable is set but could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// The variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_connection_failed() {
        let err = ConnectorError::ConnectionFailed("connection reset".into());
        assert_eq!(err.to_string(), "connection failed: connection reset");
    }

    #[test]
    fn display_rate_limited() {
        let err = ConnectorError::RateLimited {
            retry_after_ms: 2000,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 2000ms");
    }

    #[test]
    fn display_invalid_response() {
        let err = ConnectorError::InvalidResponse("missing id field".into());
        assert_eq!(err.to_string(), "invalid response: missing id field");
    }

    #[test]
    fn connection_and_rate_limit_are_transient() {
        assert!(ConnectorError::ConnectionFailed("reset".into()).is_transient());
        assert!(ConnectorError::RateLimited { retry_after_ms: 1 }.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(ConnectorError::RequestFailed("HTTP 500: oops".into()).is_transient());
        assert!(ConnectorError::RequestFailed("HTTP 503: busy".into()).is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!ConnectorError::RequestFailed("HTTP 400: bad".into()).is_transient());
        assert!(!ConnectorError::AuthFailed("bad token".into()).is_transient());
        assert!(!ConnectorError::InvalidResponse("no body".into()).is_transient());
        assert!(!ConnectorError::NotFound("msg-1".into()).is_transient());
    }

    #[test]
    fn suggested_delay_only_for_rate_limit() {
        assert_eq!(
            ConnectorError::RateLimited {
                retry_after_ms: 750
            }
            .suggested_delay_ms(),
            Some(750)
        );
        assert_eq!(
            ConnectorError::AuthFailed("no".into()).suggested_delay_ms(),
            None
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::MissingVar("NOTION_API_KEY".into());
        assert_eq!(
            err.to_string(),
            "missing required environment variable: NOTION_API_KEY"
        );

        let err = ConfigError::InvalidVar {
            var: "POSTBRIEF_MAX_EMAILS".into(),
            reason: "invalid digit found in string".into(),
        };
        assert!(err.to_string().contains("POSTBRIEF_MAX_EMAILS"));
    }
}
