//! Simulation time resource.
//!
//! Updated once per step by
//! [`update_world_time`](crate::systems::time::update_world_time).

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldTime {
    /// Total seconds simulated so far.
    pub elapsed: f32,
    /// Clamped seconds of the current step.
    pub delta: f32,
    /// Largest raw step accepted; longer frames are clamped.
    pub max_step: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            max_step: 0.05,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_max_step(mut self, max_step: f32) -> Self {
        self.max_step = max_step;
        self
    }
}
