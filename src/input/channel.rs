//! Channel-backed input event source
//!
//! Fans each emitted event out to every current subscriber over an unbounded
//! crossbeam channel. Emitting is safe from any thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crossbeam_channel::{unbounded, Sender};

use super::{InputEvent, InputEventSource, InputSubscription, SubscriptionId};

/// In-process [`InputEventSource`] for one actor
#[derive(Debug, Default)]
pub struct ChannelInputSource {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Sender<InputEvent>)>>,
}

impl ChannelInputSource {
    /// Create a source with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Sender<InputEvent>)>> {
        // The list stays consistent even if a holder panicked
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deliver an event to every subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn emit(&self, event: InputEvent) -> usize {
        let mut subscribers = self.lock();
        // A subscriber whose receiver was dropped without unsubscribing is pruned here
        subscribers.retain(|(id, tx)| {
            let delivered = tx.send(event).is_ok();
            if !delivered {
                tracing::warn!("Dropping input subscription {:?} with closed receiver", id);
            }
            delivered
        });
        subscribers.len()
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}

impl InputEventSource for ChannelInputSource {
    fn subscribe(&self) -> InputSubscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = unbounded();
        self.lock().push((id, tx));
        InputSubscription { id, events: rx }
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().retain(|(sub, _)| *sub != id);
    }
}
