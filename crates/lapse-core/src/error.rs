//! Error types for expiration queue operations

/// Result type alias for expiration queue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for expiration queue operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Session identifier failed validation
    #[error("Invalid session identifier: {0}")]
    InvalidSessionId(String),

    /// The identifier argument disagrees with the item's own identifier
    #[error("Session identifier mismatch: scheduled as {scheduled}, item reports {reported}")]
    IdentifierMismatch {
        /// Identifier the caller scheduled under
        scheduled: String,
        /// Identifier the tracked item reports
        reported: String,
    },

    /// A consumer loop is already running
    #[error("Expiration consumer already active: next_expired allows one caller at a time")]
    ConsumerBusy,

    /// Unexpected internal fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid session identifier error
    pub fn invalid_session_id(message: impl Into<String>) -> Self {
        Self::InvalidSessionId(message.into())
    }

    /// Create an identifier mismatch error
    pub fn identifier_mismatch(
        scheduled: impl Into<String>,
        reported: impl Into<String>,
    ) -> Self {
        Self::IdentifierMismatch {
            scheduled: scheduled.into(),
            reported: reported.into(),
        }
    }

    /// Create a consumer busy error
    pub fn consumer_busy() -> Self {
        Self::ConsumerBusy
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if the error is a caller-side programming error
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSessionId(_) | Self::IdentifierMismatch { .. } | Self::ConsumerBusy
        )
    }

    /// Get error category as string
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidSessionId(_) | Self::IdentifierMismatch { .. } | Self::ConsumerBusy => {
                "usage"
            }
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_constructors() {
        let id_err = Error::invalid_session_id("nil identifier");
        assert!(matches!(id_err, Error::InvalidSessionId(_)));

        let mismatch = Error::identifier_mismatch("a", "b");
        if let Error::IdentifierMismatch {
            scheduled,
            reported,
        } = mismatch
        {
            assert_eq!(scheduled, "a");
            assert_eq!(reported, "b");
        } else {
            panic!("Expected IdentifierMismatch error");
        }

        assert!(matches!(Error::consumer_busy(), Error::ConsumerBusy));
        assert!(matches!(Error::internal("boom"), Error::Internal(_)));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::invalid_session_id("x").is_usage_error());
        assert!(Error::identifier_mismatch("a", "b").is_usage_error());
        assert!(Error::consumer_busy().is_usage_error());
        assert!(!Error::internal("x").is_usage_error());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(Error::invalid_session_id("x").category(), "usage");
        assert_eq!(Error::identifier_mismatch("a", "b").category(), "usage");
        assert_eq!(Error::consumer_busy().category(), "usage");
        assert_eq!(Error::internal("x").category(), "internal");
    }

    #[test]
    fn test_error_display() {
        let mismatch = Error::identifier_mismatch("aaa", "bbb");
        assert_eq!(
            mismatch.to_string(),
            "Session identifier mismatch: scheduled as aaa, item reports bbb"
        );

        let id_err = Error::invalid_session_id("nil identifier");
        assert_eq!(
            id_err.to_string(),
            "Invalid session identifier: nil identifier"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::consumer_busy())
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }
}
