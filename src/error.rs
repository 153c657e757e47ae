//! Error handling for the player state recorder
//!
//! This module defines the recorder's error type and a Result alias for use
//! throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for recorder operations
#[derive(Error, Debug)]
pub enum RecorderError {
    /// An actor's physical state disappeared between enumeration and sampling
    #[error("Missing actor state for {actor}: {component} is unavailable")]
    MissingActorState {
        actor: String,
        component: &'static str,
    },

    /// Writing a recording to disk failed
    #[error("Failed to write recording to {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding a recording document failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation requires an active recording session
    #[error("No recording in progress")]
    NotRecording,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<RecorderError>,
    },
}

impl RecorderError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        RecorderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check whether this error (or the error it wraps) is a missing actor state
    pub fn is_missing_actor_state(&self) -> bool {
        match self {
            RecorderError::MissingActorState { .. } => true,
            RecorderError::WithContext { source, .. } => source.is_missing_actor_state(),
            _ => false,
        }
    }

    /// Check whether this error happened while persisting a recording
    pub fn is_persistence_failure(&self) -> bool {
        match self {
            RecorderError::Persistence { .. } | RecorderError::Serialization(_) => true,
            RecorderError::WithContext { source, .. } => source.is_persistence_failure(),
            _ => false,
        }
    }
}

/// Result type alias for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
