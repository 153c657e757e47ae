//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod lobby;

use std::path::Path;
use std::sync::Arc;

use playerstate_recorder::messages::BufferedMessages;
use playerstate_recorder::{AttributeConfig, Recorder, RecorderConfig};

/// Fixed tick length used by the tests (50 Hz)
pub const DT: f64 = 0.02;

/// Config writing into `dir` with the given attribute groups and compaction mode
pub fn config_in(dir: &Path, attributes: AttributeConfig, compaction: bool) -> RecorderConfig {
    let mut config = RecorderConfig::default();
    config.general.output_directory = dir.to_path_buf();
    config.general.record_only_changes = compaction;
    config.recorded_data = attributes;
    config
}

/// Recorder with a buffered message sink
pub fn recorder(config: RecorderConfig) -> (Recorder, Arc<BufferedMessages>) {
    let messages = Arc::new(BufferedMessages::new());
    (Recorder::new(config, messages.clone()), messages)
}

/// Number of files in a directory
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
