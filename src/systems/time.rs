//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per step, clamping long frames to `max_step`.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Clamp a raw frame delta to `0.0..=max_step`.
///
/// A non-positive `max_step` disables the upper clamp.
pub fn clamp_step(dt: f32, max_step: f32) -> f32 {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    if max_step > 0.0 { dt.min(max_step) } else { dt }
}

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is the raw frame delta in seconds. The system clamps it to the
/// configured `max_step` and writes both `elapsed` and `delta`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let step = clamp_step(dt, wt.max_step);
    wt.elapsed += step;
    wt.delta = step;
    wt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_slow_frame_is_clamped() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 0.5);
        let wt = world.resource::<WorldTime>();
        assert!(approx_eq(wt.delta, 0.05));
        assert!(approx_eq(wt.elapsed, 0.05));
        assert_eq!(wt.frame_count, 1);
    }

    #[test]
    fn test_elapsed_accumulates_clamped_steps() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_max_step(0.1));
        update_world_time(&mut world, 0.02);
        update_world_time(&mut world, 1.0);
        let wt = world.resource::<WorldTime>();
        assert!(approx_eq(wt.delta, 0.1));
        assert!(approx_eq(wt.elapsed, 0.12));
        assert_eq!(wt.frame_count, 2);
    }

    #[test]
    fn test_clamp_step_edges() {
        assert_eq!(clamp_step(-1.0, 0.05), 0.0);
        assert_eq!(clamp_step(f32::NAN, 0.05), 0.0);
        assert!(approx_eq(clamp_step(0.3, 0.0), 0.3));
    }
}
