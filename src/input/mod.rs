//! Player input tracking
//!
//! The host delivers input changes per actor as [`InputEvent`]s through an
//! [`InputEventSource`]. An [`InputAggregator`] subscribes to one source and
//! folds the events into the actor's current [`InputState`].
//!
//! # Main Types
//!
//! - [`InputKey`] - Logical input identifiers
//! - [`InputEvent`] - A single input change emitted by the host
//! - [`InputEventSource`] - Subscribe/unsubscribe seam implemented by host adapters
//! - [`ChannelInputSource`] - Channel-backed source used by the simulated host
//! - [`InputAggregator`] - Per-actor input state holder

pub mod aggregator;
pub mod channel;

pub use aggregator::{InputAggregator, InputState};
pub use channel::ChannelInputSource;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

/// Logical input identifiers reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InputKey {
    Jump,
    Left,
    Right,
    Up,
    Down,
    Sprint,
    /// Opens the inventory; doubles as the dance emote in play
    Inventory,
    Back,
    Accept,
    Pause,
}

impl InputKey {
    /// Every key, in declaration order
    pub const ALL: [InputKey; 10] = [
        InputKey::Jump,
        InputKey::Left,
        InputKey::Right,
        InputKey::Up,
        InputKey::Down,
        InputKey::Sprint,
        InputKey::Inventory,
        InputKey::Back,
        InputKey::Accept,
        InputKey::Pause,
    ];
}

/// A change of one input for one actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Which input changed
    pub key: InputKey,
    /// Whether the host considers this a real change; `false` events are ignored
    pub changed: bool,
    /// Digital (pressed) value
    pub digital: bool,
    /// Analog value, e.g. stick deflection
    pub analog: f32,
}

impl InputEvent {
    /// A changed event where the key is pressed at full deflection
    pub fn press(key: InputKey) -> Self {
        Self {
            key,
            changed: true,
            digital: true,
            analog: 1.0,
        }
    }

    /// A changed event where the key is released
    pub fn release(key: InputKey) -> Self {
        Self {
            key,
            changed: true,
            digital: false,
            analog: 0.0,
        }
    }

    /// A changed analog event; the key counts as pressed while the value is non-zero
    pub fn analog(key: InputKey, value: f32) -> Self {
        Self {
            key,
            changed: true,
            digital: value != 0.0,
            analog: value,
        }
    }
}

/// Identifier of one subscription on an [`InputEventSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A live subscription: events for the subscribed actor arrive on `events`
/// in the order the host emitted them.
#[derive(Debug)]
pub struct InputSubscription {
    pub id: SubscriptionId,
    pub events: Receiver<InputEvent>,
}

/// Per-actor input event source
///
/// Implemented by host adapters. Every subscription must be released with
/// [`InputEventSource::unsubscribe`], otherwise the source keeps a dangling
/// sender around.
pub trait InputEventSource: Send + Sync {
    /// Register a new receiver for this actor's input events
    fn subscribe(&self) -> InputSubscription;

    /// Remove a receiver previously returned by [`InputEventSource::subscribe`]
    fn unsubscribe(&self, id: SubscriptionId);
}
