//! Single-flight coordination of credential refreshes.
//!
//! When several requests hit an expired credential at once, only one of them
//! may renew it. [`RefreshCoordinator::begin`] elects that request as the
//! [`RefreshLeader`]; every other caller gets a [`RefreshWaiter`] that
//! resolves with the leader's outcome.
//!
//! The in-progress flag and the wait list share one mutex that is only held
//! for bookkeeping, never across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;

/// Why a refresh could not produce a new credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RefreshError {
    /// HTTP status of the refresh response, if the server answered.
    pub status: Option<u16>,
    pub message: String,
}

impl RefreshError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The refreshing task went away before reporting an outcome.
    pub fn abandoned() -> Self {
        Self::new(None, "Token refresh was abandoned")
    }
}

/// Result shared with every request waiting on a refresh: the new credential.
pub type RefreshOutcome = Result<String, RefreshError>;

#[derive(Debug, Default)]
struct RefreshState {
    in_progress: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    started: u64,
}

/// Owns the refresh-in-progress flag and the wait list of one client.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Role handed out by [`RefreshCoordinator::begin`].
#[derive(Debug)]
pub enum RefreshTicket<'a> {
    /// No refresh was running; the caller must perform it and report back.
    Leader(RefreshLeader<'a>),
    /// A refresh is running; wait for its outcome.
    Follower(RefreshWaiter),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Join the running refresh, or start one.
    ///
    /// The flag is set before this returns, so a second caller can never be
    /// elected while the first leader is alive.
    pub fn begin(&self) -> RefreshTicket<'_> {
        let mut state = self.lock();
        if state.in_progress {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            tracing::debug!(waiting = state.waiters.len(), "Joined in-flight token refresh");
            return RefreshTicket::Follower(RefreshWaiter { rx });
        }

        state.in_progress = true;
        state.started += 1;
        tracing::debug!(attempt = state.started, "Starting token refresh");
        RefreshTicket::Leader(RefreshLeader {
            coordinator: self,
            finished: false,
        })
    }

    /// Whether a refresh is currently running.
    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of requests parked behind the running refresh.
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Number of refreshes started over the coordinator's lifetime.
    pub fn refreshes_started(&self) -> u64 {
        self.lock().started
    }

    fn finish(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            std::mem::take(&mut state.waiters)
        };

        tracing::debug!(
            released = waiters.len(),
            ok = outcome.is_ok(),
            "Token refresh finished"
        );
        for waiter in waiters {
            // A waiter whose request was dropped no longer cares.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Held by the one request that performs the refresh.
///
/// Dropping it without calling [`complete`](Self::complete) releases the
/// waiters with [`RefreshError::abandoned`].
#[derive(Debug)]
pub struct RefreshLeader<'a> {
    coordinator: &'a RefreshCoordinator,
    finished: bool,
}

impl RefreshLeader<'_> {
    /// Publish the outcome, clear the flag and release every waiter.
    pub fn complete(mut self, outcome: RefreshOutcome) {
        self.finished = true;
        self.coordinator.finish(outcome);
    }
}

impl Drop for RefreshLeader<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Token refresh dropped before completing");
            self.coordinator.finish(Err(RefreshError::abandoned()));
        }
    }
}

/// A request parked behind a running refresh.
#[derive(Debug)]
pub struct RefreshWaiter {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshWaiter {
    /// Wait for the leader's outcome.
    pub async fn wait(self) -> RefreshOutcome {
        self.rx.await.unwrap_or_else(|_| Err(RefreshError::abandoned()))
    }
}
