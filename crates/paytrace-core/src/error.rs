//! Error types for paytrace.

use thiserror::Error;

/// Failure reported by an inner caller before any response was produced.
///
/// The `Display` output is what ends up in a span's `error` tag, so each
/// variant renders its message verbatim.
#[derive(Debug, Error)]
pub enum CallError {
    // Transport errors
    #[error("{0}")]
    Connection(String),

    // Protocol errors
    #[error("{0}")]
    Api(String),

    // Request construction errors
    #[error("{0}")]
    InvalidRequest(String),
}

impl CallError {
    pub fn connection(message: impl Into<String>) -> Self {
        CallError::Connection(message.into())
    }

    pub fn api(message: impl Into<String>) -> Self {
        CallError::Api(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        CallError::InvalidRequest(message.into())
    }

    /// Whether the failure happened on the wire rather than in the payload.
    pub fn is_connection(&self) -> bool {
        matches!(self, CallError::Connection(_))
    }
}

/// Failure while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = CallError::api("exception message");
        assert_eq!(err.to_string(), "exception message");

        let err = CallError::connection("connection refused");
        assert_eq!(err.to_string(), "connection refused");
        assert!(err.is_connection());
    }

    #[test]
    fn test_config_error_from_yaml() {
        let parse = serde_yaml::from_str::<u32>("not: [a number").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(err.to_string().starts_with("Failed to parse config"));
    }
}
