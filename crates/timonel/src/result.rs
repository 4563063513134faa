//! Result and error types for Timonel.

use thiserror::Error;

/// Result type for Timonel operations
pub type TimonelResult<T> = Result<T, TimonelError>;

/// Errors that can occur while driving a browser session
#[derive(Debug, Error)]
pub enum TimonelError {
    /// A synchronization condition never held within the session wait window
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Rendered text did not contain the expected substring
    #[error("Expected text of '{selector}' to contain '{expected}' but was '{actual}'")]
    AssertionFailed {
        /// Selector of the element whose text was read
        selector: String,
        /// Substring the caller expected
        expected: String,
        /// Text actually observed, verbatim
        actual: String,
    },

    /// Operation attempted on a released session
    #[error("Invalid session state: {message}")]
    StateError {
        /// Error message
        message: String,
    },

    /// Navigation request rejected by the driver
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Underlying driver fault (transport, protocol, element gone stale)
    #[error("Driver error: {message}")]
    DriverError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimonelError {
    /// Whether this failure is the element-absence class that tolerant
    /// actions absorb into a miss.
    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = TimonelError::Timeout { ms: 15_000 };
        assert_eq!(err.to_string(), "Operation timed out after 15000ms");
    }

    #[test]
    fn test_assertion_failed_carries_both_values() {
        let err = TimonelError::AssertionFailed {
            selector: "#flash".to_string(),
            expected: "Welcome".to_string(),
            actual: "Invalid credentials".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Welcome"));
        assert!(message.contains("Invalid credentials"));
        assert!(message.contains("#flash"));
    }

    #[test]
    fn test_absence_classification() {
        assert!(TimonelError::Timeout { ms: 1 }.is_absence());
        assert!(!TimonelError::StateError {
            message: "released".to_string()
        }
        .is_absence());
        assert!(!TimonelError::DriverError {
            message: "socket closed".to_string()
        }
        .is_absence());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TimonelError = io.into();
        assert!(matches!(err, TimonelError::Io(_)));
    }
}
