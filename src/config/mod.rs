//! Configuration module for the player state recorder
//!
//! The recorder reads its settings from a TOML file and never writes them
//! back while recording. Missing fields fall back to defaults, so an empty
//! file is a valid configuration.
//!
//! # Config Location
//!
//! The config file is stored in the platform-appropriate config directory
//! under `dev.playerstate-recorder`:
//! - **Linux**: `~/.config/dev.playerstate-recorder/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.playerstate-recorder/config.toml`
//! - **Windows**: `%APPDATA%\dev.playerstate-recorder\config.toml`
//!
//! Recordings default to a `recordings` directory under the platform data
//! directory.
//!
//! # Example
//!
//! ```toml
//! [general]
//! enabled = true
//! record_only_changes = true
//! hotkey = "F10"
//! output_directory = "/home/me/recordings"
//!
//! [recorded_data]
//! position = true
//! velocity = false
//! analog_actions = true
//! ```

use crate::error::{RecorderError, Result, ResultExt};
use crate::snapshot::AttributeConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config and data directories
pub const APP_ID: &str = "dev.playerstate-recorder";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Directory name for recordings under the data directory
pub const RECORDINGS_DIR: &str = "recordings";

/// Default hotkey that toggles recording
pub const DEFAULT_HOTKEY: &str = "F10";

/// Default fixed tick rate of the host (Hz)
pub const DEFAULT_TICK_RATE_HZ: u32 = 50;

// ==================== Directories ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the application config directory path
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Default directory recordings are written to
///
/// Falls back to a relative `recordings` directory when the platform has no
/// data directory.
pub fn default_output_dir() -> PathBuf {
    app_data_dir()
        .map(|p| p.join(RECORDINGS_DIR))
        .unwrap_or_else(|| PathBuf::from(RECORDINGS_DIR))
}

// ==================== Policies ====================

/// What to do when an actor's state is missing during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingStatePolicy {
    /// Abort the whole session without writing a file
    #[default]
    AbortSession,
    /// Leave that actor out of this tick and keep recording
    SkipActor,
}

impl std::fmt::Display for MissingStatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingStatePolicy::AbortSession => write!(f, "Abort session"),
            MissingStatePolicy::SkipActor => write!(f, "Skip actor"),
        }
    }
}

// ==================== General ====================

/// General recorder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enables/disables the recorder
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Store a snapshot only if anything changed since the last stored one
    #[serde(default = "default_true")]
    pub record_only_changes: bool,

    /// Hotkey that starts and stops recordings
    ///
    /// A host key name such as `F10`; see [`GeneralConfig::is_hotkey`].
    #[serde(default = "default_hotkey")]
    pub hotkey: String,

    /// Directory recordings are written to
    #[serde(default = "default_output_dir")]
    pub output_directory: PathBuf,

    /// Handling of actors whose state disappears mid-session
    #[serde(default)]
    pub missing_state_policy: MissingStatePolicy,

    /// Fixed tick rate of the host loop
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Also write logs to a file in the app data directory
    #[serde(default)]
    pub log_to_file: bool,
}

fn default_true() -> bool {
    true
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

fn default_tick_rate_hz() -> u32 {
    DEFAULT_TICK_RATE_HZ
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            record_only_changes: true,
            hotkey: default_hotkey(),
            output_directory: default_output_dir(),
            missing_state_policy: MissingStatePolicy::default(),
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            log_to_file: false,
        }
    }
}

impl GeneralConfig {
    /// Check whether a key name reported by the host is the configured hotkey
    ///
    /// Names are compared case-insensitively, ignoring surrounding whitespace.
    pub fn is_hotkey(&self, key: &str) -> bool {
        key.trim().eq_ignore_ascii_case(self.hotkey.trim())
    }
}

// ==================== Recorder Config ====================

/// Complete recorder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecorderConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Attribute groups included in each snapshot
    #[serde(default)]
    pub recorded_data: AttributeConfig,
}

impl RecorderConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        app_config_dir().map(|p| p.join(CONFIG_FILE))
    }

    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| RecorderError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(RecorderError::from)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        Self::from_toml(&content)
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config as TOML, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(RecorderError::from)
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RecorderError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(RecorderError::from)
            .with_context(|| format!("Failed to write config file {:?}", path))
    }

    /// Check values that cannot be expressed in the type
    pub fn validate(&self) -> Result<()> {
        if self.general.tick_rate_hz == 0 {
            return Err(RecorderError::Config(
                "tick_rate_hz must be greater than zero".to_string(),
            ));
        }
        if self.general.hotkey.trim().is_empty() {
            return Err(RecorderError::Config("hotkey must not be empty".to_string()));
        }
        Ok(())
    }

    /// Attribute groups to record
    pub fn attributes(&self) -> AttributeConfig {
        self.recorded_data
    }

    /// Seconds per fixed tick
    pub fn fixed_delta_seconds(&self) -> f64 {
        1.0 / f64::from(self.general.tick_rate_hz.max(1))
    }
}

// ==================== Tests ====================
