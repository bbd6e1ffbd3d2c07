//! User-facing views the client can be in.

use std::fmt;

/// A screen of the trading journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// Sign-in form. Every unauthenticated path ends here.
    #[default]
    Login,
    /// Account creation form.
    Register,
    /// Portfolio holdings and trade history.
    Dashboard,
    /// Global trade ledger (administrators only).
    Admin,
}

impl View {
    /// Route path of the view.
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Register => "/register",
            View::Dashboard => "/dashboard",
            View::Admin => "/admin",
        }
    }

    /// Whether the view requires an authenticated session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, View::Dashboard | View::Admin)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
