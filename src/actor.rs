//! Tracked actors and the host seams that describe them
//!
//! The recorder never touches host objects directly. Host adapters implement
//! [`ActorEnumerator`] to list the players in the current game and
//! [`PhysicalStateProvider`] to expose each player's live body state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::input::InputEventSource;

/// A 2D vector in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Contact flags reported by one side collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColliderContact {
    /// Touching any solid object
    pub colliding: bool,
    /// Touching a wall
    pub colliding_wall: bool,
    /// Touching a hazard
    pub colliding_hazard: bool,
}

impl ColliderContact {
    /// True if the side touches anything at all
    pub fn any(&self) -> bool {
        self.colliding || self.colliding_wall || self.colliding_hazard
    }
}

/// The four side colliders of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Colliders {
    pub left: ColliderContact,
    pub right: ColliderContact,
    pub head: ColliderContact,
    pub feet: ColliderContact,
}

/// Behavioral flags of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BehaviorFlags {
    pub on_ground: bool,
    pub on_wall: bool,
    pub just_landed: bool,
    pub can_jump: bool,
    pub jumping: bool,
    pub looking_up: bool,
    pub crouching_down: bool,
    pub in_cannon: bool,
    pub in_black_hole: bool,
    pub dancing: bool,
    pub walking: bool,
    pub sprinting: bool,
}

/// Character-side state: transform, colliders and behavior
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterState {
    pub position: Vec2,
    pub colliders: Colliders,
    pub flags: BehaviorFlags,
}

/// Physics-body state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyState {
    pub velocity: Vec2,
}

/// Everything the host can tell about an actor at one instant
///
/// Either half may be missing when the actor's lifecycle ended after it was
/// enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalState {
    pub character: Option<CharacterState>,
    pub body: Option<BodyState>,
}

impl PhysicalState {
    /// A fully present state
    pub fn new(character: CharacterState, body: BodyState) -> Self {
        Self {
            character: Some(character),
            body: Some(body),
        }
    }

    /// A state with nothing available
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Live physical state of one actor
#[cfg_attr(test, mockall::automock)]
pub trait PhysicalStateProvider: Send + Sync {
    /// Sample the actor's current state
    fn physical_state(&self) -> PhysicalState;
}

/// One actor as reported by the host at enumeration time
#[derive(Clone)]
pub struct TrackedActor {
    /// Stable per-actor ordering key (join / network order)
    pub network_number: u32,
    /// Human readable identity, e.g. the character skin
    pub label: String,
    pub state: Arc<dyn PhysicalStateProvider>,
    pub input: Arc<dyn InputEventSource>,
}

impl std::fmt::Debug for TrackedActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedActor")
            .field("network_number", &self.network_number)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Lists the actors of the current game
pub trait ActorEnumerator {
    /// Actors currently in play; order is not required
    fn tracked_actors(&self) -> Vec<TrackedActor>;
}

/// Sort actors into recording order (ascending network number, stable)
pub fn recording_order(mut actors: Vec<TrackedActor>) -> Vec<TrackedActor> {
    actors.sort_by_key(|actor| actor.network_number);
    actors
}
