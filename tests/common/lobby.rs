//! Simulated lobby construction helpers

use std::sync::Arc;

use playerstate_recorder::sim::{SimulatedActor, SimulatedLobby};

/// Lobby whose actors join with network numbers `1..=labels.len()`
pub fn lobby_with(labels: &[&str]) -> (SimulatedLobby, Vec<Arc<SimulatedActor>>) {
    let mut lobby = SimulatedLobby::new();
    let actors = labels
        .iter()
        .enumerate()
        .map(|(i, label)| lobby.join(i as u32 + 1, *label))
        .collect();
    (lobby, actors)
}
