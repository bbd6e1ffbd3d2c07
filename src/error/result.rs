//! Result type alias for client operations.

use super::api_error::ApiError;

/// Type alias for Results using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;
