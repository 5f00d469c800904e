//! Input-to-velocity controller for the actor.
//!
//! Reads the shared [`InputState`](crate::resources::input::InputState) and
//! sets the horizontal velocity of every [`Actor`] body. A queued jump is
//! consumed here on every play step; it only fires when the body is grounded.
use bevy_ecs::prelude::*;

use crate::components::actor::Actor;
use crate::components::rigidbody::RigidBody;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;

/// Apply movement intents to a body. Returns whether a jump fired.
pub fn apply_intents(
    body: &mut RigidBody,
    direction: f32,
    jump: bool,
    move_speed: f32,
    jump_speed: f32,
) -> bool {
    body.velocity.x = direction * move_speed;
    if jump && body.grounded {
        body.velocity.y = -jump_speed;
        body.grounded = false;
        return true;
    }
    false
}

/// Update each actor's `RigidBody` velocity based on input.
pub fn actor_input_system(
    mut query: Query<&mut RigidBody, With<Actor>>,
    mut input: ResMut<InputState>,
    config: Res<GameConfig>,
) {
    let jump = input.take_jump();
    let direction = input.direction();
    for mut body in query.iter_mut() {
        if body.frozen {
            continue;
        }
        apply_intents(
            &mut body,
            direction,
            jump,
            config.move_speed,
            config.jump_speed,
        );
    }
}
