//! In-game clock driving the progression tracker.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use actions_core::Hour;

use crate::api::TimeSource;

/// A manually advanced hour counter.
///
/// Every call to [`GameClock::advance`] emits exactly one tick to the current
/// subscribers. Ticks emitted while nobody is subscribed are not buffered.
pub struct GameClock {
    hour: AtomicU64,
    tx: broadcast::Sender<Hour>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hour: AtomicU64::new(0),
            tx: broadcast::channel(capacity).0,
        }
    }

    /// Moves time forward by one hour and returns the new hour.
    pub fn advance(&self) -> Hour {
        let hour = Hour(self.hour.fetch_add(1, Ordering::SeqCst) + 1);
        if self.tx.send(hour).is_err() {
            tracing::trace!(target: "actions::clock", %hour, "no tick subscribers");
        }
        hour
    }

    pub fn now(&self) -> Hour {
        Hour(self.hour.load(Ordering::SeqCst))
    }

    /// Number of live tick subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for GameClock {
    fn subscribe(&self) -> broadcast::Receiver<Hour> {
        self.tx.subscribe()
    }
}
