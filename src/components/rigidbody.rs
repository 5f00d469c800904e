//! Kinematic body with named acceleration forces.
//!
//! The actor carries a single `"gravity"` force; keeping forces named lets
//! the simulation retune them without touching the movement system.
//!
//! The `frozen` flag suspends integration entirely. It is set while a room
//! transition is running, when the actor is parked at its entry point.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Name of the force the simulation uses for gravity.
pub const GRAVITY_FORCE: &str = "gravity";

/// Velocity, forces and ground contact of a moving entity.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::with_max_fall_speed(18.0);
/// rb.add_force(GRAVITY_FORCE, Vec2::new(0.0, 22.0));
/// rb.integrate(1.0 / 60.0);
/// ```
#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    /// Current velocity in grid units per second. Positive y is downwards.
    pub velocity: Vec2,
    /// Named accelerations in grid units per second squared.
    pub forces: FxHashMap<String, Vec2>,
    /// Cap applied to downward speed after integrating forces.
    pub max_fall_speed: Option<f32>,
    /// Set by the collision response when the last vertical move landed.
    pub grounded: bool,
    /// When true, movement skips this body.
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
            forces: FxHashMap::default(),
            max_fall_speed: None,
            grounded: false,
            frozen: false,
        }
    }

    pub fn with_max_fall_speed(max_fall_speed: f32) -> Self {
        Self {
            max_fall_speed: Some(max_fall_speed),
            ..Self::new()
        }
    }

    /// Add or update a named acceleration force.
    pub fn add_force(&mut self, name: &str, value: Vec2) {
        self.forces.insert(name.to_string(), value);
    }

    /// Sum of all forces.
    pub fn total_acceleration(&self) -> Vec2 {
        self.forces.values().fold(Vec2::ZERO, |acc, f| acc + *f)
    }

    /// Apply the forces for `dt` seconds and cap the fall speed.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.total_acceleration() * dt;
        if let Some(max_fall) = self.max_fall_speed {
            self.velocity.y = self.velocity.y.min(max_fall);
        }
    }

    /// Zero the velocity and drop ground contact.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.grounded = false;
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
