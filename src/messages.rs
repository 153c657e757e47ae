//! User-visible transient messages
//!
//! The recorder reports lifecycle changes ("Recording Started", "Recording
//! Saved", errors) through a [`MessageSink`]. Host adapters forward them to
//! the game's on-screen message channel.

use std::sync::Mutex;

/// Text used when a session starts
pub const MSG_RECORDING_STARTED: &str = "Recording Started";

/// Text used when a recording was written
pub const MSG_RECORDING_SAVED: &str = "Recording Saved";

/// Receives user-facing messages
#[cfg_attr(test, mockall::automock)]
pub trait MessageSink: Send + Sync {
    /// Show a message to the user
    fn post(&self, text: &str);
}

/// Forwards messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMessages;

impl MessageSink for LogMessages {
    fn post(&self, text: &str) {
        tracing::info!(target: "user_message", "{}", text);
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct BufferedMessages {
    messages: Mutex<Vec<String>>,
}

impl BufferedMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages posted so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Most recent message
    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }
}

impl MessageSink for BufferedMessages {
    fn post(&self, text: &str) {
        let mut messages = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        messages.push(text.to_string());
    }
}
