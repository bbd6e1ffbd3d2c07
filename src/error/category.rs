//! Error category classification.
//!
//! Categories decide how a failure is surfaced: inline on a form, as a
//! transient notification, or by ending the session.

use std::fmt;

/// High-level categorization of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing, expired or invalid credential. Triggers the refresh flow or
    /// ends the session.
    Auth,

    /// Valid credential, insufficient privilege. Surfaced, never retried.
    Forbidden,

    /// Malformed input. Surfaced inline on the form.
    Validation,

    /// Network or server failure. Surfaced as a transient notification.
    Generic,
}

impl ErrorCategory {
    /// Returns true if errors in this category are worth retrying later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Generic)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Auth => "auth",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Generic => "generic",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Auth => "Sign in again with `tradelog login`",
            ErrorCategory::Forbidden => "Ask an administrator for access",
            ErrorCategory::Validation => "Please check your input and try again",
            ErrorCategory::Generic => {
                "The server may be unavailable. Please try again later"
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Generic.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Forbidden.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
    }

    #[test]
    fn test_category_as_str() {
        assert_eq!(ErrorCategory::Auth.as_str(), "auth");
        assert_eq!(ErrorCategory::Forbidden.as_str(), "forbidden");
        assert_eq!(ErrorCategory::Validation.as_str(), "validation");
        assert_eq!(ErrorCategory::Generic.as_str(), "generic");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Auth.recovery_hint().contains("login"));
        assert!(ErrorCategory::Generic.recovery_hint().contains("try again"));
    }
}
