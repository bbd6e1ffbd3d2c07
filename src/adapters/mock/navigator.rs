//! Navigator that records every transition.

use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::Navigator;
use crate::view::View;

/// [`Navigator`] remembering the views it was sent to, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visited: Arc<Mutex<Vec<View>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every view navigated to so far.
    pub fn visited(&self) -> Vec<View> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent view, if any navigation happened.
    pub fn last(&self) -> Option<View> {
        self.visited().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, view: View) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view);
    }
}
