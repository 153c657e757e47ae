//! Session recording module
//!
//! This module provides the recording pipeline: a [`Recorder`] controller
//! that opens a [`RecordingSession`] on demand, samples every tracked actor
//! once per fixed tick, compacts unchanged snapshots and writes the buffered
//! series as one JSON document when the session stops.
//!
//! # Features
//!
//! - Start/stop toggling from a hotkey
//! - Optional compaction of unchanged frames
//! - Timestamped, collision-free output filenames
//! - Loading recordings back for inspection

pub mod recorder;
pub mod recording;
pub mod types;

pub use recorder::{HostStatus, Recorder, RecorderEvent};
pub use recording::{RecordingSession, TickReport};
pub use types::{RecordingDocument, RecordingSeries, SessionState};
