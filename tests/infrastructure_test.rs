//! Test to verify test infrastructure works correctly

mod common;

use common::builders::PhysicalStateBuilder;
use common::lobby::lobby_with;
use playerstate_recorder::{ActorEnumerator, PhysicalStateProvider};

#[test]
fn test_infrastructure_setup() {
    let (lobby, actors) = lobby_with(&["Chicken", "Horse"]);
    assert_eq!(lobby.tracked_actors().len(), 2);

    actors[0].set_state(PhysicalStateBuilder::new().position(4.0, 1.0).build());
    let character = actors[0].physical_state().character.unwrap();
    assert_eq!(character.position.x, 4.0);
}

#[test]
fn test_float_comparison() {
    common::assert_float_eq(1.0, 1.0000001, 0.001);
}

#[test]
#[should_panic]
fn test_float_comparison_fails() {
    common::assert_float_eq(1.0, 2.0, 0.001);
}
