//! Cooperative cancellation for render runs.
//!
//! The token is checked at loop boundaries with [`CancellationToken::is_cancelled`]
//! and raced against suspension points with [`CancellationToken::cancelled`].

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// A resettable cancellation flag with an async wake-up.
///
/// One task awaits [`cancelled`](Self::cancelled); any number of callers may
/// [`cancel`](Self::cancel). Only the lifecycle manager resets it, and only
/// once the run that observed it has completed.
pub struct CancellationToken<M: RawMutex> {
    cancelled: Mutex<M, Cell<bool>>,
    wake: Signal<M, ()>,
}

impl<M: RawMutex> CancellationToken<M> {
    pub const fn new() -> Self {
        Self {
            cancelled: Mutex::new(Cell::new(false)),
            wake: Signal::new(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.lock(|cancelled| cancelled.set(true));
        self.wake.signal(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.lock(Cell::get)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            self.wake.wait().await;
        }
    }

    /// Turn the token back into a fresh, uncancelled one.
    pub fn reset(&self) {
        self.cancelled.lock(|cancelled| cancelled.set(false));
        self.wake.reset();
    }
}

impl<M: RawMutex> Default for CancellationToken<M> {
    fn default() -> Self {
        Self::new()
    }
}
