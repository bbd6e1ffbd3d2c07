//! Navigation seam.
//!
//! The client reports view transitions (for example "back to login" after a
//! failed refresh) through a [`Navigator`] instead of touching any UI.

use crate::view::View;

/// Receives view transitions requested by the API client.
pub trait Navigator: Send + Sync {
    /// Switch the user-facing view.
    fn navigate(&self, view: View);
}
