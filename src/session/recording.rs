//! One bounded recording run
//!
//! A [`RecordingSession`] owns an [`InputAggregator`] and a
//! [`RecordingSeries`] per actor, plus the frame counter and elapsed time.
//! Dropping the session releases every input subscription.

use std::sync::Arc;

use crate::actor::{recording_order, PhysicalStateProvider, TrackedActor};
use crate::config::MissingStatePolicy;
use crate::error::Result;
use crate::input::InputAggregator;
use crate::snapshot::{snapshot_changed, SnapshotBuilder};

use super::types::{RecordingDocument, RecordingSeries};

/// Per-actor recording slot
struct ActorSlot {
    state: Arc<dyn PhysicalStateProvider>,
    input: InputAggregator,
    series: RecordingSeries,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Snapshots appended to a series
    pub stored: usize,
    /// Snapshots dropped because nothing changed
    pub compacted: usize,
    /// Actors left out because their state was missing
    pub skipped: usize,
}

/// An active recording session
pub struct RecordingSession {
    actors: Vec<ActorSlot>,
    frame: u64,
    elapsed: f64,
    compaction: bool,
}

impl RecordingSession {
    /// Start a session over `actors`, recorded in ascending network-number order
    pub fn new(actors: Vec<TrackedActor>, compaction: bool) -> Self {
        let actors = recording_order(actors)
            .into_iter()
            .map(|actor| ActorSlot {
                input: InputAggregator::new(actor.input),
                state: actor.state,
                series: RecordingSeries::new(actor.label),
            })
            .collect();

        Self {
            actors,
            frame: 0,
            elapsed: 0.0,
            compaction,
        }
    }

    /// Index of the next tick
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds recorded so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Whether unchanged snapshots are dropped
    pub fn compaction_enabled(&self) -> bool {
        self.compaction
    }

    /// Number of tracked actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Recorded series in actor order
    pub fn series(&self) -> impl Iterator<Item = &RecordingSeries> {
        self.actors.iter().map(|slot| &slot.series)
    }

    /// Total stored snapshots across all actors
    pub fn sample_count(&self) -> usize {
        self.actors.iter().map(|slot| slot.series.len()).sum()
    }

    /// Sample every actor once and advance the clock by `dt` seconds
    ///
    /// With [`MissingStatePolicy::AbortSession`] a missing actor state fails
    /// the whole tick: no series is appended to and the clock is not
    /// advanced.
    pub fn tick(
        &mut self,
        dt: f64,
        builder: &SnapshotBuilder,
        policy: MissingStatePolicy,
    ) -> Result<TickReport> {
        let mut report = TickReport::default();

        let mut built = Vec::with_capacity(self.actors.len());
        for slot in &mut self.actors {
            slot.input.pump();

            let physical = slot.state.physical_state();
            match builder.build(
                &slot.series.label,
                &physical,
                slot.input.state(),
                self.frame,
                self.elapsed,
            ) {
                Ok(snapshot) => built.push(Some(snapshot)),
                Err(e) if policy == MissingStatePolicy::SkipActor && e.is_missing_actor_state() => {
                    tracing::warn!("Skipping frame {}: {}", self.frame, e);
                    report.skipped += 1;
                    built.push(None);
                }
                Err(e) => return Err(e),
            }
        }

        for (slot, snapshot) in self.actors.iter_mut().zip(built) {
            let Some(snapshot) = snapshot else {
                continue;
            };

            let keep = match slot.series.last() {
                Some(previous) if self.compaction => snapshot_changed(previous, &snapshot),
                _ => true,
            };

            if keep {
                slot.series.samples.push(snapshot);
                report.stored += 1;
            } else {
                report.compacted += 1;
            }
        }

        if report.compacted > 0 {
            tracing::debug!(
                "Frame {}: stored {}, compacted {}",
                self.frame,
                report.stored,
                report.compacted
            );
        }

        self.frame += 1;
        self.elapsed += dt;
        Ok(report)
    }

    /// Snapshot of the buffered series as a document
    pub fn document(&self) -> RecordingDocument {
        RecordingDocument::new(self.series().cloned().collect())
    }

    /// Release all input subscriptions and hand back the recorded series
    pub fn finish(mut self) -> RecordingDocument {
        self.dispose();
        let series = std::mem::take(&mut self.actors)
            .into_iter()
            .map(|slot| slot.series)
            .collect();
        RecordingDocument::new(series)
    }

    /// Release all input subscriptions
    pub fn dispose(&mut self) {
        for slot in &mut self.actors {
            slot.input.dispose();
        }
    }

    /// Whether every input subscription has been released
    pub fn is_disposed(&self) -> bool {
        self.actors.iter().all(|slot| slot.input.is_disposed())
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("actors", &self.actors.len())
            .field("frame", &self.frame)
            .field("elapsed", &self.elapsed)
            .field("compaction", &self.compaction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{
        BodyState, CharacterState, MockPhysicalStateProvider, PhysicalState, Vec2,
    };
    use crate::input::{ChannelInputSource, InputEvent, InputKey};
    use crate::snapshot::{AttributeConfig, AttributeValue};

    fn standing_at(x: f32, y: f32) -> PhysicalState {
        PhysicalState::new(
            CharacterState {
                position: Vec2::new(x, y),
                ..Default::default()
            },
            BodyState::default(),
        )
    }

    fn actor_with(
        network_number: u32,
        label: &str,
        provider: MockPhysicalStateProvider,
    ) -> (TrackedActor, Arc<ChannelInputSource>) {
        let input = Arc::new(ChannelInputSource::new());
        let actor = TrackedActor {
            network_number,
            label: label.to_string(),
            state: Arc::new(provider),
            input: input.clone(),
        };
        (actor, input)
    }

    fn still_actor(network_number: u32, label: &str) -> (TrackedActor, Arc<ChannelInputSource>) {
        let mut provider = MockPhysicalStateProvider::new();
        provider
            .expect_physical_state()
            .returning(|| standing_at(0.0, 0.0));
        actor_with(network_number, label, provider)
    }

    fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new(AttributeConfig::default())
    }

    #[test]
    fn test_series_follow_network_order() {
        let (b, _) = still_actor(2, "Horse");
        let (a, _) = still_actor(1, "Chicken");
        let session = RecordingSession::new(vec![b, a], true);

        let labels: Vec<_> = session.series().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Chicken", "Horse"]);
        assert_eq!(session.frame(), 0);
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn test_compaction_drops_unchanged_ticks() {
        let (actor, _) = still_actor(1, "Chicken");
        let mut session = RecordingSession::new(vec![actor], true);

        let first = session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap();
        let second = session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap();

        assert_eq!(first.stored, 1);
        assert_eq!(second.compacted, 1);
        assert_eq!(session.sample_count(), 1);
        assert_eq!(session.frame(), 2);
        assert!((session.elapsed() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_without_compaction_every_tick_is_stored() {
        let (actor, _) = still_actor(1, "Chicken");
        let mut session = RecordingSession::new(vec![actor], false);

        for _ in 0..5 {
            session
                .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
                .unwrap();
        }
        assert_eq!(session.sample_count(), 5);

        let frames: Vec<_> = session
            .series()
            .next()
            .unwrap()
            .samples
            .iter()
            .map(|s| s.frame().unwrap())
            .collect();
        assert_eq!(frames, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_input_change_breaks_compaction() {
        let (actor, input) = still_actor(1, "Chicken");
        let mut session = RecordingSession::new(vec![actor], true);

        session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap();
        input.emit(InputEvent::press(InputKey::Jump));
        session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap();

        let series = session.series().next().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.samples[1].get("Actions"),
            Some(&AttributeValue::List(vec!["Jump".to_string()]))
        );
        assert_eq!(series.samples[1].frame(), Some(1));
    }

    #[test]
    fn test_missing_state_aborts_tick_by_default() {
        let mut provider = MockPhysicalStateProvider::new();
        provider
            .expect_physical_state()
            .returning(PhysicalState::missing);
        let (actor, _) = actor_with(1, "Raccoon", provider);
        let mut session = RecordingSession::new(vec![actor], true);

        let err = session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap_err();
        assert!(err.is_missing_actor_state());
        assert_eq!(session.frame(), 0);
    }

    #[test]
    fn test_failed_tick_stores_nothing_and_can_be_retried() {
        let (steady, _) = still_actor(1, "Sheep");
        let mut provider = MockPhysicalStateProvider::new();
        let mut calls = 0;
        provider.expect_physical_state().returning(move || {
            calls += 1;
            if calls == 1 {
                PhysicalState::missing()
            } else {
                standing_at(0.0, 0.0)
            }
        });
        let (flaky, _) = actor_with(2, "Raccoon", provider);
        let mut session = RecordingSession::new(vec![steady, flaky], false);

        assert!(session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .is_err());
        assert_eq!(session.sample_count(), 0);

        session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap();
        for series in session.series() {
            let frames: Vec<_> = series.samples.iter().map(|s| s.frame().unwrap()).collect();
            assert_eq!(frames, vec![0]);
        }
        assert_eq!(session.frame(), 1);
    }

    #[test]
    fn test_missing_state_skips_actor_when_configured() {
        let mut provider = MockPhysicalStateProvider::new();
        let mut calls = 0;
        provider.expect_physical_state().returning(move || {
            calls += 1;
            if calls == 2 {
                PhysicalState::missing()
            } else {
                standing_at(calls as f32, 0.0)
            }
        });
        let (flaky, _) = actor_with(1, "Raccoon", provider);
        let (steady, _) = still_actor(2, "Sheep");
        let mut session = RecordingSession::new(vec![flaky, steady], true);

        for _ in 0..3 {
            session
                .tick(0.02, &builder(), MissingStatePolicy::SkipActor)
                .unwrap();
        }

        let series: Vec<_> = session.series().collect();
        let frames: Vec<_> = series[0].samples.iter().map(|s| s.frame().unwrap()).collect();
        assert_eq!(frames, vec![0, 2]);
        assert_eq!(series[1].len(), 1);
        assert_eq!(session.frame(), 3);
    }

    #[test]
    fn test_finish_releases_subscriptions() {
        let (actor, input) = still_actor(1, "Chicken");
        let mut session = RecordingSession::new(vec![actor], true);
        assert_eq!(input.subscriber_count(), 1);

        session
            .tick(0.02, &builder(), MissingStatePolicy::AbortSession)
            .unwrap();
        let document = session.finish();

        assert_eq!(input.subscriber_count(), 0);
        assert_eq!(document.series.len(), 1);
        assert_eq!(document.sample_count(), 1);
    }

    #[test]
    fn test_drop_releases_subscriptions() {
        let (a, input_a) = still_actor(1, "Chicken");
        let (b, input_b) = still_actor(2, "Horse");
        let session = RecordingSession::new(vec![a, b], true);
        drop(session);

        assert_eq!(input_a.subscriber_count(), 0);
        assert_eq!(input_b.subscriber_count(), 0);
    }
}
