//! Pulse aging.
//!
//! Ages every [`Pulse`](crate::resources::pulses::Pulse) by the clamped step
//! delta and drops the expired ones. Runs in both play and transition steps,
//! so pulses fade at the same rate regardless of what the actor is doing.
use bevy_ecs::prelude::*;

use crate::resources::pulses::Pulses;
use crate::resources::worldtime::WorldTime;

pub fn pulse_system(mut pulses: ResMut<Pulses>, time: Res<WorldTime>) {
    if pulses.is_empty() {
        return;
    }
    pulses.tick(time.delta);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::pulses::PULSE_TTL;
    use crate::resources::stage::StageId;
    use glam::Vec2;

    #[test]
    fn test_pulses_fade_with_world_time() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: PULSE_TTL / 2.0 + 0.01,
            ..WorldTime::default()
        });
        let mut pulses = Pulses::default();
        pulses.spawn(Vec2::new(3.0, 4.0), StageId::digit(5).unwrap());
        world.insert_resource(pulses);

        let mut schedule = Schedule::default();
        schedule.add_systems(pulse_system);
        schedule.run(&mut world);
        assert_eq!(world.resource::<Pulses>().len(), 1);
        schedule.run(&mut world);
        assert!(world.resource::<Pulses>().is_empty());
    }
}
