//! Session data types

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::snapshot::Snapshot;

/// Filename prefix of persisted recordings
pub const RECORDING_FILE_PREFIX: &str = "PlayerStateRecorder";

/// Filename extension of persisted recordings
pub const RECORDING_FILE_EXTENSION: &str = "json";

/// Timestamp layout used in recording filenames; sorts chronologically
pub const RECORDING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Attempts at finding a free filename before giving up
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// State of the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No active session
    #[default]
    Idle,
    /// Currently recording a session
    Recording,
}

impl SessionState {
    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Recording => "Recording",
        }
    }
}

/// Recorded samples of one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSeries {
    /// Actor identity captured at session start
    pub label: String,
    /// Stored snapshots in tick order
    pub samples: Vec<Snapshot>,
}

impl RecordingSeries {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            samples: Vec::new(),
        }
    }

    /// Most recently stored snapshot
    pub fn last(&self) -> Option<&Snapshot> {
        self.samples.last()
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if nothing was stored
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A complete recording as written to disk: one series per actor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingDocument {
    pub series: Vec<RecordingSeries>,
}

impl RecordingDocument {
    pub fn new(series: Vec<RecordingSeries>) -> Self {
        Self { series }
    }

    /// Total number of stored snapshots across all actors
    pub fn sample_count(&self) -> usize {
        self.series.iter().map(RecordingSeries::len).sum()
    }

    /// Indented JSON text of the document
    ///
    /// Fails if any sample holds a NaN or infinite number, since that could
    /// not be read back.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document into `directory` under a fresh timestamped name
    ///
    /// The directory is created if it does not exist. Returns the path written.
    pub fn save_to_dir<Tz>(&self, directory: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        // Serialize before touching the filesystem so a bad document leaves no file behind
        let json = self.to_json()?;

        std::fs::create_dir_all(directory).map_err(|source| RecorderError::Persistence {
            path: directory.to_path_buf(),
            source,
        })?;

        let stamp = now.format(RECORDING_TIMESTAMP_FORMAT).to_string();
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let path = directory.join(recording_file_name(&stamp, attempt));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(RecorderError::Persistence { path, source }),
            };

            file.write_all(json.as_bytes())
                .and_then(|_| file.sync_all())
                .map_err(|source| RecorderError::Persistence {
                    path: path.clone(),
                    source,
                })?;
            return Ok(path);
        }

        Err(RecorderError::Persistence {
            path: directory.join(recording_file_name(&stamp, 1)),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "no free recording filename for this timestamp",
            ),
        })
    }

    /// Load a recording from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| RecorderError::Persistence {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Filename for a recording; attempts after the first get a numeric suffix
pub fn recording_file_name(stamp: &str, attempt: u32) -> String {
    if attempt <= 1 {
        format!(
            "{}.{}.{}",
            RECORDING_FILE_PREFIX, stamp, RECORDING_FILE_EXTENSION
        )
    } else {
        format!(
            "{}.{}_{}.{}",
            RECORDING_FILE_PREFIX, stamp, attempt, RECORDING_FILE_EXTENSION
        )
    }
}
