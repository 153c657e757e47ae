//! Snapshot construction
//!
//! [`SnapshotBuilder::build`] turns an actor's physical state and input state
//! into a [`Snapshot`]. Attribute groups are emitted in a fixed order:
//!
//! | Group          | Keys                                                   |
//! |----------------|--------------------------------------------------------|
//! | (always)       | `Frame`, `Time`                                        |
//! | Position       | `PositionX`, `PositionY`                               |
//! | Velocity       | `VelocityX`, `VelocityY`                               |
//! | Actions        | `Actions` (sorted display names of pressed keys)       |
//! | AnalogActions  | `AnalogActions` (display name → value, magnitude above 0.1) |
//! | Colliders      | `LeftColliding`, `RightColliding`, `HeadColliding`, `FeetColliding` |
//! | Meta           | twelve behavioral flags, see [`META_KEYS`]             |

use serde::{Deserialize, Serialize};

use super::{AttributeValue, Snapshot, FRAME_KEY, TIME_KEY};
use crate::actor::{BehaviorFlags, PhysicalState};
use crate::error::{RecorderError, Result};
use crate::input::{InputKey, InputState};

/// Analog values at or below this magnitude are left out of `AnalogActions`
///
/// Compared in `f32` so that a reported value of exactly `0.1` is excluded.
pub const ANALOG_THRESHOLD: f32 = 0.1;

/// Keys that are recorded, with the name they are recorded under
///
/// Keys missing from this table never appear in `Actions` or `AnalogActions`.
pub const INPUT_MAPPINGS: &[(InputKey, &str)] = &[
    (InputKey::Jump, "Jump"),
    (InputKey::Left, "Left"),
    (InputKey::Right, "Right"),
    (InputKey::Up, "Up"),
    (InputKey::Down, "Down"),
    (InputKey::Sprint, "Sprint"),
    (InputKey::Inventory, "Dance"),
    (InputKey::Back, "Back"),
];

/// Keys of the Meta group, in recorded order
pub const META_KEYS: [&str; 12] = [
    "OnGround",
    "OnWall",
    "JustLanded",
    "CanJump",
    "Jumping",
    "LookingUp",
    "CrouchingDown",
    "InCannon",
    "InBlackHole",
    "Dancing",
    "Walking",
    "Sprinting",
];

/// Display name of a key, if it is recorded at all
pub fn display_name(key: InputKey) -> Option<&'static str> {
    INPUT_MAPPINGS
        .iter()
        .find(|(mapped, _)| *mapped == key)
        .map(|(_, name)| *name)
}

/// Optional attribute groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeGroup {
    Position,
    Velocity,
    Actions,
    AnalogActions,
    Colliders,
    Meta,
}

impl AttributeGroup {
    /// All groups in recorded order
    pub const ALL: [AttributeGroup; 6] = [
        AttributeGroup::Position,
        AttributeGroup::Velocity,
        AttributeGroup::Actions,
        AttributeGroup::AnalogActions,
        AttributeGroup::Colliders,
        AttributeGroup::Meta,
    ];

    /// Display name for the group
    pub fn display_name(&self) -> &'static str {
        match self {
            AttributeGroup::Position => "Position",
            AttributeGroup::Velocity => "Velocity",
            AttributeGroup::Actions => "Digital Actions",
            AttributeGroup::AnalogActions => "Analog Actions",
            AttributeGroup::Colliders => "Colliders",
            AttributeGroup::Meta => "Player Meta",
        }
    }
}

/// Which attribute groups are recorded
///
/// Every combination is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    pub position: bool,
    pub velocity: bool,
    pub digital_actions: bool,
    pub analog_actions: bool,
    pub colliders: bool,
    pub player_meta: bool,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            position: true,
            velocity: true,
            digital_actions: true,
            analog_actions: false,
            colliders: false,
            player_meta: false,
        }
    }
}

impl AttributeConfig {
    /// Only `Frame` and `Time`
    pub fn none() -> Self {
        Self {
            position: false,
            velocity: false,
            digital_actions: false,
            analog_actions: false,
            colliders: false,
            player_meta: false,
        }
    }

    /// Every group
    pub fn all() -> Self {
        Self {
            position: true,
            velocity: true,
            digital_actions: true,
            analog_actions: true,
            colliders: true,
            player_meta: true,
        }
    }

    /// Check whether a group is enabled
    pub fn is_enabled(&self, group: AttributeGroup) -> bool {
        match group {
            AttributeGroup::Position => self.position,
            AttributeGroup::Velocity => self.velocity,
            AttributeGroup::Actions => self.digital_actions,
            AttributeGroup::AnalogActions => self.analog_actions,
            AttributeGroup::Colliders => self.colliders,
            AttributeGroup::Meta => self.player_meta,
        }
    }

    /// Enable or disable a group
    pub fn set(&mut self, group: AttributeGroup, enabled: bool) {
        let slot = match group {
            AttributeGroup::Position => &mut self.position,
            AttributeGroup::Velocity => &mut self.velocity,
            AttributeGroup::Actions => &mut self.digital_actions,
            AttributeGroup::AnalogActions => &mut self.analog_actions,
            AttributeGroup::Colliders => &mut self.colliders,
            AttributeGroup::Meta => &mut self.player_meta,
        };
        *slot = enabled;
    }

    /// Builder-style [`AttributeConfig::set`]
    pub fn with(mut self, group: AttributeGroup, enabled: bool) -> Self {
        self.set(group, enabled);
        self
    }

    /// Enabled groups in recorded order
    pub fn enabled_groups(&self) -> impl Iterator<Item = AttributeGroup> + '_ {
        AttributeGroup::ALL
            .into_iter()
            .filter(move |group| self.is_enabled(*group))
    }
}

/// Builds per-tick snapshots for one configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotBuilder {
    attributes: AttributeConfig,
}

impl SnapshotBuilder {
    pub fn new(attributes: AttributeConfig) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &AttributeConfig {
        &self.attributes
    }

    /// Build one snapshot
    ///
    /// `actor` names the actor in the error when its state has gone missing.
    pub fn build(
        &self,
        actor: &str,
        physical: &PhysicalState,
        input: &InputState,
        frame: u64,
        time: f64,
    ) -> Result<Snapshot> {
        let character = physical
            .character
            .as_ref()
            .ok_or_else(|| RecorderError::MissingActorState {
                actor: actor.to_string(),
                component: "character",
            })?;
        let body = physical
            .body
            .as_ref()
            .ok_or_else(|| RecorderError::MissingActorState {
                actor: actor.to_string(),
                component: "rigid body",
            })?;

        let mut snapshot = Snapshot::with_capacity(24);
        snapshot.insert(FRAME_KEY, i64::try_from(frame).unwrap_or(i64::MAX));
        snapshot.insert(TIME_KEY, time);

        for group in self.attributes.enabled_groups() {
            match group {
                AttributeGroup::Position => {
                    snapshot.insert("PositionX", character.position.x);
                    snapshot.insert("PositionY", character.position.y);
                }
                AttributeGroup::Velocity => {
                    snapshot.insert("VelocityX", body.velocity.x);
                    snapshot.insert("VelocityY", body.velocity.y);
                }
                AttributeGroup::Actions => {
                    snapshot.insert("Actions", actions(input));
                }
                AttributeGroup::AnalogActions => {
                    snapshot.insert("AnalogActions", analog_actions(input));
                }
                AttributeGroup::Colliders => {
                    let colliders = &character.colliders;
                    snapshot.insert("LeftColliding", colliders.left.any());
                    snapshot.insert("RightColliding", colliders.right.any());
                    snapshot.insert("HeadColliding", colliders.head.any());
                    snapshot.insert("FeetColliding", colliders.feet.any());
                }
                AttributeGroup::Meta => {
                    for (key, value) in META_KEYS.iter().zip(meta_values(&character.flags)) {
                        snapshot.insert(*key, value);
                    }
                }
            }
        }

        Ok(snapshot)
    }
}

/// Sorted display names of the pressed, mapped keys
fn actions(input: &InputState) -> Vec<String> {
    let mut names: Vec<String> = input
        .active
        .iter()
        .filter_map(|key| display_name(*key))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

fn analog_actions(input: &InputState) -> Snapshot {
    let mut entries: Vec<(&'static str, f32)> = input
        .analog
        .iter()
        .filter(|(_, value)| value.abs() > ANALOG_THRESHOLD)
        .filter_map(|(key, value)| display_name(*key).map(|name| (name, *value)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut nested = Snapshot::with_capacity(entries.len());
    for (name, value) in entries {
        nested.insert(name, AttributeValue::from(value));
    }
    nested
}

fn meta_values(flags: &BehaviorFlags) -> [bool; 12] {
    [
        flags.on_ground,
        flags.on_wall,
        flags.just_landed,
        flags.can_jump,
        flags.jumping,
        flags.looking_up,
        flags.crouching_down,
        flags.in_cannon,
        flags.in_black_hole,
        flags.dancing,
        flags.walking,
        flags.sprinting,
    ]
}
