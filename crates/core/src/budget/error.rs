//! Budget fetch error types.

use thiserror::Error;

/// Errors produced while obtaining a budget snapshot.
///
/// Neither kind is fatal: the cache records the failure and the next
/// `load()` retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The fetch collaborator failed to complete.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The collaborator returned data not matching the expected shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a malformed payload error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Returns a stable code for this error kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::transport("connection refused").to_string(),
            "Transport error: connection refused"
        );
        assert_eq!(
            FetchError::malformed("missing field `myBudget`").to_string(),
            "Malformed payload: missing field `myBudget`"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FetchError::transport("x").error_code(), "TRANSPORT_ERROR");
        assert_eq!(FetchError::malformed("x").error_code(), "MALFORMED_PAYLOAD");
    }

    #[test]
    fn test_from_serde_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::MalformedPayload(_)));
    }
}
