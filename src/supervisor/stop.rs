// src/supervisor/stop.rs

use tokio::sync::watch;

/// Cooperative stop flag for one running session.
///
/// Cloneable and callable from any thread. `request_stop` is idempotent and
/// never blocks; the supervisor worker observes the flag and terminates the
/// child asynchronously. Requesting a stop after the session has already
/// finished is a no-op.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Ask the supervisor to terminate the child and end the session.
    pub fn request_stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once a stop has been requested. Used by the supervisor
    /// worker; resolves immediately if the request already happened.
    pub(crate) async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        if *rx.borrow() {
            return;
        }
        // The flag only ever transitions false -> true, and the sender lives
        // in `self`, so `changed` cannot miss the request.
        let _ = rx.changed().await;
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}
