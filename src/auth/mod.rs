//! Authentication state for the TradeLog client.
//!
//! - Session record persisted between runs
//! - Single-flight credential refresh coordination

pub mod refresh;
pub mod session;

pub use refresh::{
    RefreshCoordinator, RefreshError, RefreshLeader, RefreshOutcome, RefreshTicket, RefreshWaiter,
};
pub use session::{parse_refresh_cookie, peek_claims, AuthState, Session, TokenClaims, REFRESH_COOKIE};
