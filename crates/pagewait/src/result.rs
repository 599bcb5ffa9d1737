//! Result and error types for pagewait.

use thiserror::Error;

/// Boxed error produced by user-supplied evaluators, locators and messages.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for wait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Error category, set when the error is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Base failure kind, used when no finer category applies
    WebDriver,
    /// A deadline elapsed before the condition was satisfied
    Timeout,
    /// Malformed wait parameters
    InvalidArgument,
    /// An element condition resolved to something other than an element
    InvalidResult,
    /// Failure raised by an evaluator, locator or awaited promise
    Condition,
    /// Configuration could not be loaded
    Config,
}

impl ErrorKind {
    /// Exported name of the kind
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WebDriver => "WebDriverError",
            Self::Timeout => "TimeoutError",
            Self::InvalidArgument => "InvalidArgumentError",
            Self::InvalidResult => "InvalidResultError",
            Self::Condition => "ConditionError",
            Self::Config => "ConfigError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur while waiting
#[derive(Debug, Error)]
pub enum WaitError {
    /// Generic failure
    #[error("{message}")]
    WebDriver {
        /// Error message
        message: String,
    },

    /// The wait timed out. Carries no source: a poll loop has nothing useful
    /// to point back at.
    #[error("{message}")]
    Timeout {
        /// Fully formatted timeout message
        message: String,
    },

    /// Invalid wait parameters, reported before any timer is created
    #[error("{message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// An element condition resolved to a non-element value
    #[error("ElementCondition did not resolve to a Element: {observed}")]
    InvalidResult {
        /// Observed type tag, e.g. `[object String]`
        observed: String,
    },

    /// Error raised by the condition itself, propagated unchanged
    #[error(transparent)]
    Condition(BoxError),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

impl WaitError {
    /// Wrap an evaluator/locator failure
    pub fn condition(err: impl Into<BoxError>) -> Self {
        Self::Condition(err.into())
    }

    /// Build a base-kind error from a message
    pub fn webdriver(message: impl Into<String>) -> Self {
        Self::WebDriver {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// The error category
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WebDriver { .. } => ErrorKind::WebDriver,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InvalidResult { .. } => ErrorKind::InvalidResult,
            Self::Condition(_) => ErrorKind::Condition,
            Self::Io(_) | Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether this is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Borrow the wrapped condition error, if any
    #[must_use]
    pub fn as_condition(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Condition(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("locator exploded")]
    struct Boom;

    #[test]
    fn test_timeout_has_no_source() {
        let err = WaitError::Timeout {
            message: "Wait timed out after 10ms".into(),
        };
        assert!(err.source().is_none());
        assert!(err.is_timeout());
        assert_eq!(err.kind().name(), "TimeoutError");
    }

    #[test]
    fn test_condition_error_is_transparent() {
        let err = WaitError::condition(Boom);
        assert_eq!(err.to_string(), "locator exploded");
        assert_eq!(err.kind(), ErrorKind::Condition);
        assert!(err.as_condition().unwrap().downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn test_invalid_result_message() {
        let err = WaitError::InvalidResult {
            observed: "[object String]".into(),
        };
        assert_eq!(
            err.to_string(),
            "ElementCondition did not resolve to a Element: [object String]"
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::WebDriver.to_string(), "WebDriverError");
        assert_eq!(
            WaitError::webdriver("plain").kind(),
            ErrorKind::WebDriver
        );
    }
}
