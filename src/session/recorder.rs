//! Top-level recording controller
//!
//! [`Recorder`] owns at most one [`RecordingSession`] and drives it through
//! the `Idle` / `Recording` state machine:
//!
//! - `start` enumerates actors and opens a session (or stops the current one)
//! - `tick` samples every actor once
//! - `stop` writes the buffered series to disk and tears the session down
//! - `abort` tears the session down without writing
//!
//! Teardown releases every input subscription on all paths, including a
//! failed save and a failed tick.

use std::path::PathBuf;
use std::sync::Arc;

use crate::actor::ActorEnumerator;
use crate::config::RecorderConfig;
use crate::error::{RecorderError, Result};
use crate::messages::{MessageSink, MSG_RECORDING_SAVED, MSG_RECORDING_STARTED};
use crate::snapshot::SnapshotBuilder;

use super::recording::{RecordingSession, TickReport};
use super::types::SessionState;

/// What the host reports once per rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStatus {
    /// A game is running and its actors can be enumerated
    pub game_active: bool,
    /// The recorder hotkey went down this frame
    pub hotkey_pressed: bool,
}

/// Result of [`Recorder::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    Started,
    Saved(PathBuf),
    SaveFailed,
    Aborted,
}

/// Recording controller
pub struct Recorder {
    config: RecorderConfig,
    session: Option<RecordingSession>,
    messages: Arc<dyn MessageSink>,
}

impl Recorder {
    /// Create an idle recorder
    pub fn new(config: RecorderConfig, messages: Arc<dyn MessageSink>) -> Self {
        Self {
            config,
            session: None,
            messages,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Recording
        } else {
            SessionState::Idle
        }
    }

    /// Check if recording
    pub fn is_recording(&self) -> bool {
        self.state().is_recording()
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// Attribute toggles take effect on the next tick; compaction is fixed for
    /// the lifetime of a running session.
    pub fn set_config(&mut self, config: RecorderConfig) {
        self.config = config;
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Start a session, or stop the active one
    ///
    /// Returns the written path when this call stopped a session.
    pub fn start(&mut self, actors: &dyn ActorEnumerator) -> Result<Option<PathBuf>> {
        if self.session.is_some() {
            return self.stop().map(Some);
        }

        let actors = actors.tracked_actors();
        let groups: Vec<_> = self
            .config
            .attributes()
            .enabled_groups()
            .map(|group| group.display_name())
            .collect();
        tracing::info!(
            "Recording started with {} actors (compaction: {}, missing state: {}, groups: [{}])",
            actors.len(),
            self.config.general.record_only_changes,
            self.config.general.missing_state_policy,
            groups.join(", ")
        );
        self.session = Some(RecordingSession::new(
            actors,
            self.config.general.record_only_changes,
        ));
        self.messages.post(MSG_RECORDING_STARTED);
        Ok(None)
    }

    /// Sample every actor once; does nothing while idle
    ///
    /// An error from the session ends it without writing anything.
    pub fn tick(&mut self, dt: f64) -> Result<Option<TickReport>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };

        let builder = SnapshotBuilder::new(self.config.attributes());
        match session.tick(dt, &builder, self.config.general.missing_state_policy) {
            Ok(report) => Ok(Some(report)),
            Err(e) => {
                tracing::error!("Recording aborted: {}", e);
                self.abort();
                self.messages.post(&format!("Error: {}", e));
                Err(e)
            }
        }
    }

    /// Fixed-rate host hook: tick by the configured fixed delta
    pub fn fixed_update(&mut self) -> Result<Option<TickReport>> {
        self.tick(self.config.fixed_delta_seconds())
    }

    /// Stop the active session and write it to the output directory
    ///
    /// The session is torn down whether or not the write succeeds. Failures
    /// are reported to the message sink and returned.
    pub fn stop(&mut self) -> Result<PathBuf> {
        let Some(session) = self.session.take() else {
            return Err(RecorderError::NotRecording);
        };

        let frames = session.frame();
        let document = session.finish();
        let directory = &self.config.general.output_directory;

        match document.save_to_dir(directory, &chrono::Local::now()) {
            Ok(path) => {
                tracing::info!(
                    "Recording saved to {:?} ({} frames, {} samples)",
                    path,
                    frames,
                    document.sample_count()
                );
                self.messages.post(MSG_RECORDING_SAVED);
                Ok(path)
            }
            Err(e) => {
                tracing::error!("Failed to save recording: {}", e);
                self.messages.post(&format!("Error: {}", e));
                Err(e)
            }
        }
    }

    /// Discard the active session without writing
    ///
    /// Returns `true` if a session was active.
    pub fn abort(&mut self) -> bool {
        match self.session.take() {
            Some(mut session) => {
                session.dispose();
                tracing::info!(
                    "Recording discarded after {} frames ({} samples)",
                    session.frame(),
                    session.sample_count()
                );
                true
            }
            None => false,
        }
    }

    /// Per-frame host hook
    ///
    /// Aborts any session while the recorder is disabled or no game is
    /// running; otherwise toggles recording when the hotkey was pressed.
    pub fn update(
        &mut self,
        status: HostStatus,
        actors: &dyn ActorEnumerator,
    ) -> Option<RecorderEvent> {
        if !self.config.general.enabled || !status.game_active {
            return self.abort().then_some(RecorderEvent::Aborted);
        }

        if !status.hotkey_pressed {
            return None;
        }
        tracing::debug!("Hotkey pressed while {}", self.state().display_name());

        if self.is_recording() {
            match self.stop() {
                Ok(path) => Some(RecorderEvent::Saved(path)),
                // Already reported to the user by stop()
                Err(_) => Some(RecorderEvent::SaveFailed),
            }
        } else {
            match self.start(actors) {
                Ok(_) => Some(RecorderEvent::Started),
                Err(e) => {
                    tracing::error!("Failed to start recording: {}", e);
                    None
                }
            }
        }
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("state", &self.state())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
