//! Simulated host
//!
//! A tiny stand-in for the game: scripted actors that walk, jump and press
//! buttons on a fixed timeline. Used by the demo binary and by tests that
//! exercise the recorder without a real game.

use std::sync::{Arc, Mutex};

use crate::actor::{
    ActorEnumerator, BehaviorFlags, BodyState, CharacterState, ColliderContact, Colliders,
    PhysicalState, PhysicalStateProvider, TrackedActor, Vec2,
};
use crate::input::{ChannelInputSource, InputEvent, InputKey};

const GRAVITY: f32 = -30.0;
const JUMP_SPEED: f32 = 12.0;
const WALK_SPEED: f32 = 4.0;
const SPRINT_SPEED: f32 = 7.0;

/// One simulated player
#[derive(Debug)]
pub struct SimulatedActor {
    network_number: u32,
    label: String,
    state: Mutex<PhysicalState>,
    input: Arc<ChannelInputSource>,
}

impl SimulatedActor {
    /// An actor standing at the origin
    pub fn new(network_number: u32, label: impl Into<String>) -> Self {
        Self {
            network_number,
            label: label.into(),
            state: Mutex::new(PhysicalState::new(
                CharacterState {
                    position: Vec2::ZERO,
                    colliders: Colliders {
                        feet: ColliderContact {
                            colliding: true,
                            ..Default::default()
                        },
                        ..Default::default()
                    },
                    flags: BehaviorFlags {
                        on_ground: true,
                        can_jump: true,
                        ..Default::default()
                    },
                },
                BodyState::default(),
            )),
            input: Arc::new(ChannelInputSource::new()),
        }
    }

    pub fn network_number(&self) -> u32 {
        self.network_number
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The actor's input event source
    pub fn input(&self) -> &Arc<ChannelInputSource> {
        &self.input
    }

    /// Emit an input event for this actor
    pub fn emit(&self, event: InputEvent) {
        self.input.emit(event);
    }

    /// Overwrite the physical state
    pub fn set_state(&self, state: PhysicalState) {
        *self.lock() = state;
    }

    /// Move the actor without changing anything else
    pub fn set_position(&self, position: Vec2) {
        if let Some(character) = self.lock().character.as_mut() {
            character.position = position;
        }
    }

    /// Simulate the actor leaving the game
    pub fn despawn(&self) {
        *self.lock() = PhysicalState::missing();
    }

    /// Advance simple platformer physics by `dt` seconds
    ///
    /// `held` lists the keys held down this step.
    pub fn step(&self, dt: f32, held: &[InputKey]) {
        let mut state = self.lock();
        let PhysicalState {
            character: Some(character),
            body: Some(body),
        } = &mut *state
        else {
            return;
        };

        let sprinting = held.contains(&InputKey::Sprint);
        let speed = if sprinting { SPRINT_SPEED } else { WALK_SPEED };
        let direction = match (held.contains(&InputKey::Left), held.contains(&InputKey::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        body.velocity.x = direction * speed;

        let grounded = character.flags.on_ground;
        if grounded && held.contains(&InputKey::Jump) {
            body.velocity.y = JUMP_SPEED;
        } else if !grounded {
            body.velocity.y += GRAVITY * dt;
        }

        character.position.x += body.velocity.x * dt;
        character.position.y += body.velocity.y * dt;

        let landed = character.position.y <= 0.0;
        if landed {
            character.position.y = 0.0;
            body.velocity.y = 0.0;
        }

        let flags = &mut character.flags;
        flags.just_landed = landed && !grounded;
        flags.on_ground = landed;
        flags.can_jump = landed;
        flags.jumping = !landed && body.velocity.y > 0.0;
        flags.walking = landed && direction != 0.0 && !sprinting;
        flags.sprinting = landed && direction != 0.0 && sprinting;
        flags.crouching_down = landed && held.contains(&InputKey::Down);
        flags.looking_up = landed && held.contains(&InputKey::Up);
        character.colliders.feet.colliding = landed;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PhysicalState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PhysicalStateProvider for SimulatedActor {
    fn physical_state(&self) -> PhysicalState {
        *self.lock()
    }
}

/// A simulated game with a fixed roster
#[derive(Debug, Default)]
pub struct SimulatedLobby {
    actors: Vec<Arc<SimulatedActor>>,
}

impl SimulatedLobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor and return a handle to drive it
    pub fn join(&mut self, network_number: u32, label: impl Into<String>) -> Arc<SimulatedActor> {
        let actor = Arc::new(SimulatedActor::new(network_number, label));
        self.actors.push(actor.clone());
        actor
    }

    /// Remove an actor from the roster; a running session keeps sampling it
    pub fn leave(&mut self, network_number: u32) {
        self.actors
            .retain(|actor| actor.network_number != network_number);
    }

    pub fn actors(&self) -> &[Arc<SimulatedActor>] {
        &self.actors
    }
}

impl ActorEnumerator for SimulatedLobby {
    fn tracked_actors(&self) -> Vec<TrackedActor> {
        self.actors
            .iter()
            .map(|actor| TrackedActor {
                network_number: actor.network_number,
                label: actor.label.clone(),
                state: actor.clone(),
                input: actor.input.clone(),
            })
            .collect()
    }
}
