//! # Player State Recorder
//!
//! Samples the state of every player in a running game at the host's fixed
//! tick rate, drops frames that did not change, and writes the recorded time
//! series to a JSON file when the recording stops.
//!
//! ## Architecture
//!
//! - **Input**: one [`InputAggregator`] per player folds input events into the current key state
//! - **Snapshots**: [`SnapshotBuilder`] turns physical and input state into an ordered attribute map
//! - **Compaction**: [`snapshot_changed`] decides whether a snapshot differs from the last stored one
//! - **Session**: [`Recorder`] owns the active [`RecordingSession`] and persists it on stop
//!
//! The game itself stays behind the [`ActorEnumerator`], [`PhysicalStateProvider`],
//! [`InputEventSource`] and [`MessageSink`] traits.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use playerstate_recorder::{
//!     messages::LogMessages, sim::SimulatedLobby, HostStatus, Recorder, RecorderConfig,
//! };
//!
//! let mut lobby = SimulatedLobby::new();
//! lobby.join(0, "Chicken");
//!
//! let mut recorder = Recorder::new(RecorderConfig::default(), Arc::new(LogMessages));
//! recorder.start(&lobby)?;
//! for _ in 0..100 {
//!     recorder.fixed_update()?;
//! }
//! let path = recorder.stop()?;
//! ```

pub mod actor;
pub mod config;
pub mod error;
pub mod input;
pub mod messages;
pub mod session;
pub mod sim;
pub mod snapshot;

// Re-export commonly used types
pub use actor::{ActorEnumerator, PhysicalState, PhysicalStateProvider, TrackedActor};
pub use config::{MissingStatePolicy, RecorderConfig};
pub use error::{RecorderError, Result};
pub use input::{InputAggregator, InputEvent, InputEventSource, InputKey};
pub use messages::MessageSink;
pub use session::{
    HostStatus, Recorder, RecorderEvent, RecordingDocument, RecordingSeries, RecordingSession,
    SessionState,
};
pub use snapshot::{snapshot_changed, AttributeConfig, AttributeValue, Snapshot, SnapshotBuilder};
