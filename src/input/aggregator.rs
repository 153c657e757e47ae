//! Per-actor input aggregation
//!
//! An [`InputAggregator`] owns exactly one subscription on its actor's
//! [`InputEventSource`]. The subscription is taken in [`InputAggregator::new`]
//! and released by [`InputAggregator::dispose`] or, failing that, on drop.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crossbeam_channel::Receiver;

use super::{InputEvent, InputEventSource, InputKey, SubscriptionId};

/// Current input state of one actor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Keys whose most recent changed event was a press
    pub active: BTreeSet<InputKey>,
    /// Most recent analog value per key, kept after release
    pub analog: BTreeMap<InputKey, f32>,
}

impl InputState {
    /// Apply one event
    pub fn apply(&mut self, event: &InputEvent) {
        if !event.changed {
            return;
        }

        self.analog.insert(event.key, event.analog);

        if event.digital {
            self.active.insert(event.key);
        } else {
            self.active.remove(&event.key);
        }
    }

    /// Check whether a key is currently pressed
    pub fn is_active(&self, key: InputKey) -> bool {
        self.active.contains(&key)
    }

    /// Last analog value seen for a key
    pub fn analog_value(&self, key: InputKey) -> Option<f32> {
        self.analog.get(&key).copied()
    }
}

/// Input state holder bound to one actor's event source
pub struct InputAggregator {
    source: Arc<dyn InputEventSource>,
    subscription: Option<SubscriptionId>,
    events: Receiver<InputEvent>,
    state: InputState,
}

impl InputAggregator {
    /// Subscribe to `source` and start with an empty state
    pub fn new(source: Arc<dyn InputEventSource>) -> Self {
        let subscription = source.subscribe();
        tracing::trace!("Input subscription {:?} acquired", subscription.id);
        Self {
            source,
            subscription: Some(subscription.id),
            events: subscription.events,
            state: InputState::default(),
        }
    }

    /// Fold one event into the state
    pub fn receive(&mut self, event: &InputEvent) {
        self.state.apply(event);
    }

    /// Apply every event delivered since the last pump, in delivery order
    ///
    /// Returns the number of events consumed. A disposed aggregator consumes
    /// nothing.
    pub fn pump(&mut self) -> usize {
        if self.subscription.is_none() {
            return 0;
        }
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(&event);
            count += 1;
        }
        count
    }

    /// Current input state
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Whether the subscription has been released
    pub fn is_disposed(&self) -> bool {
        self.subscription.is_none()
    }

    /// Release the subscription; later calls do nothing
    pub fn dispose(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
            tracing::trace!("Input subscription {:?} released", id);
        }
    }
}

impl Drop for InputAggregator {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for InputAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAggregator")
            .field("subscription", &self.subscription)
            .field("state", &self.state)
            .finish()
    }
}
