//! Errors returned by the API client.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::auth::RefreshError;
use crate::traits::{HttpError, StoreError};

/// A form field that failed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every way a call to the backend can fail, as observed by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 that could not be recovered by a refresh.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 403: valid credential, insufficient privilege.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// 400/422: the server rejected the input.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Client-side form validation failed; nothing was sent.
    #[error("Invalid form: {}", format_fields(.fields))]
    InvalidForm { fields: Vec<FieldError> },

    /// The credential could not be refreshed; the session is over.
    #[error("Session expired: {0}")]
    SessionExpired(RefreshError),

    /// Any other non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response.
    #[error(transparent)]
    Network(#[from] HttpError),

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The local session could not be read or written.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Map a non-2xx status and its server message to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            400 | 422 => ApiError::Validation { message },
            _ => ApiError::Server { status, message },
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Unauthorized { .. } | ApiError::SessionExpired(_) => ErrorCategory::Auth,
            ApiError::Forbidden { .. } => ErrorCategory::Forbidden,
            ApiError::Validation { .. } | ApiError::InvalidForm { .. } => {
                ErrorCategory::Validation
            }
            ApiError::Server { .. }
            | ApiError::Network(_)
            | ApiError::Decode(_)
            | ApiError::Storage(_) => ErrorCategory::Generic,
        }
    }

    /// Check if the failed call is worth repeating later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(HttpError::InvalidUrl(_)) => false,
            ApiError::Network(_) => true,
            ApiError::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Whether the session was terminated and the user must sign in again.
    pub fn ends_session(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }

    /// Short headline for notifications.
    pub fn title(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Auth => "Session Expired",
            ErrorCategory::Forbidden => "Access Denied",
            ErrorCategory::Validation => "Invalid Input",
            ErrorCategory::Generic => "Request Failed",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message } if !message.is_empty() => message.clone(),
            ApiError::Unauthorized { .. } => "You are not signed in.".to_string(),
            ApiError::Forbidden { message } if !message.is_empty() => message.clone(),
            ApiError::Forbidden { .. } => {
                "You don't have permission for this action.".to_string()
            }
            ApiError::Validation { message } => message.clone(),
            ApiError::InvalidForm { fields } => format_fields(fields),
            ApiError::SessionExpired(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Server { status, .. } => format!("The server returned {}.", status),
            ApiError::Network(_) => {
                "Could not reach the TradeLog server. Check your connection.".to_string()
            }
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::Storage(err) => format!("Could not access the local session: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "E_API_UNAUTHORIZED",
            ApiError::Forbidden { .. } => "E_API_FORBIDDEN",
            ApiError::Validation { .. } => "E_API_VALIDATION",
            ApiError::InvalidForm { .. } => "E_FORM_INVALID",
            ApiError::SessionExpired(_) => "E_AUTH_REFRESH_FAIL",
            ApiError::Server { .. } => "E_API_SERVER",
            ApiError::Network(_) => "E_NET",
            ApiError::Decode(_) => "E_API_DECODE",
            ApiError::Storage(_) => "E_STORE",
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(
            ApiError::from_status(401, "expired".into()),
            ApiError::Unauthorized { .. }
        ));
        assert!(matches!(
            ApiError::from_status(403, "Admins only".into()),
            ApiError::Forbidden { .. }
        ));
        assert!(matches!(
            ApiError::from_status(400, "bad".into()),
            ApiError::Validation { .. }
        ));
        assert!(matches!(
            ApiError::from_status(500, "boom".into()),
            ApiError::Server { status: 500, .. }
        ));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ApiError::from_status(401, String::new()).category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            ApiError::SessionExpired(RefreshError::abandoned()).category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            ApiError::from_status(403, String::new()).category(),
            ErrorCategory::Forbidden
        );
        assert_eq!(
            ApiError::InvalidForm { fields: vec![] }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ApiError::Network(HttpError::Timeout("30s".into())).category(),
            ErrorCategory::Generic
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Network(HttpError::ConnectionFailed("refused".into())).is_retryable());
        assert!(!ApiError::Network(HttpError::InvalidUrl("x".into())).is_retryable());
        assert!(ApiError::from_status(503, String::new()).is_retryable());
        assert!(!ApiError::from_status(404, String::new()).is_retryable());
        assert!(!ApiError::from_status(403, String::new()).is_retryable());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::from_status(400, "insufficient funds".into());
        assert_eq!(err.user_message(), "insufficient funds");

        let err = ApiError::from_status(403, String::new());
        assert!(err.user_message().contains("permission"));
    }

    #[test]
    fn test_invalid_form_display() {
        let err = ApiError::InvalidForm {
            fields: vec![
                FieldError::new("price", "Price must be positive"),
                FieldError::new("quantity", "Quantity must be positive"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid form: price: Price must be positive; quantity: Quantity must be positive"
        );
        assert_eq!(err.title(), "Invalid Input");
    }

    #[test]
    fn test_session_expired_ends_session() {
        let err = ApiError::SessionExpired(RefreshError::new(Some(401), "Invalid refresh token"));
        assert!(err.ends_session());
        assert_eq!(err.error_code(), "E_AUTH_REFRESH_FAIL");
        assert_eq!(err.to_string(), "Session expired: Invalid refresh token");
        assert!(!ApiError::from_status(401, String::new()).ends_session());
    }
}
