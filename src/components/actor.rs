//! Marker for the player-controlled actor.

use bevy_ecs::prelude::Component;

/// Tags the single entity driven by input. Systems that move, collide or
/// track segments query for it with `With<Actor>`.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Actor;
