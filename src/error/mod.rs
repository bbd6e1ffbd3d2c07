//! Error handling for the TradeLog client.
//!
//! Failures observed by the client fall into four categories:
//!
//! | Category | Source | Handling |
//! |----------|--------|----------|
//! | Auth | 401, failed refresh | Refresh once, else end the session |
//! | Forbidden | 403 | Surface, never retry |
//! | Validation | 400/422, local form checks | Surface inline |
//! | Generic | Network, 5xx, bad bodies | Transient notification |

mod api_error;
mod category;
mod result;

pub use api_error::{ApiError, FieldError};
pub use category::ErrorCategory;
pub use result::ApiResult;
