//! Navigator publishing the current view on a `tokio::sync::watch` channel.

use tokio::sync::watch;

use crate::traits::Navigator;
use crate::view::View;

/// [`Navigator`] whose current view can be read or observed by a front end.
#[derive(Debug)]
pub struct WatchNavigator {
    tx: watch::Sender<View>,
}

impl WatchNavigator {
    /// Start at `initial`.
    pub fn new(initial: View) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// The view most recently navigated to.
    pub fn current(&self) -> View {
        *self.tx.borrow()
    }

    /// Receive every future transition.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.tx.subscribe()
    }
}

impl Default for WatchNavigator {
    fn default() -> Self {
        Self::new(View::default())
    }
}

impl Navigator for WatchNavigator {
    fn navigate(&self, view: View) {
        tracing::debug!(%view, "Navigating");
        // send_replace works without live receivers.
        self.tx.send_replace(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_tracks_navigation() {
        let navigator = WatchNavigator::new(View::Dashboard);
        assert_eq!(navigator.current(), View::Dashboard);

        navigator.navigate(View::Login);
        assert_eq!(navigator.current(), View::Login);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let navigator = WatchNavigator::default();
        let mut rx = navigator.subscribe();

        navigator.navigate(View::Admin);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), View::Admin);
    }
}
