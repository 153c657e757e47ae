//! Test data builders for creating test objects

use playerstate_recorder::actor::{
    BehaviorFlags, BodyState, CharacterState, ColliderContact, Colliders, PhysicalState, Vec2,
};

/// Builder for creating test physical states
pub struct PhysicalStateBuilder {
    position: Vec2,
    velocity: Vec2,
    colliders: Colliders,
    flags: BehaviorFlags,
}

impl PhysicalStateBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            colliders: Colliders::default(),
            flags: BehaviorFlags::default(),
        }
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    pub fn grounded(mut self) -> Self {
        self.flags.on_ground = true;
        self.flags.can_jump = true;
        self.colliders.feet = ColliderContact {
            colliding: true,
            ..Default::default()
        };
        self
    }

    pub fn build(self) -> PhysicalState {
        PhysicalState::new(
            CharacterState {
                position: self.position,
                colliders: self.colliders,
                flags: self.flags,
            },
            BodyState {
                velocity: self.velocity,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_state_builder() {
        let state = PhysicalStateBuilder::new()
            .position(1.0, 2.0)
            .velocity(-3.0, 0.0)
            .grounded()
            .build();

        let character = state.character.unwrap();
        assert_eq!(character.position, Vec2::new(1.0, 2.0));
        assert!(character.flags.on_ground);
        assert!(character.colliders.feet.any());
        assert_eq!(state.body.unwrap().velocity.x, -3.0);
    }
}
