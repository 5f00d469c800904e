//! Transient segment pulses.
//!
//! A pulse is spawned where a segment lights up and fades out after
//! [`PULSE_TTL`] seconds. Pulses are cosmetic: the renderer draws the ones
//! whose `stage` matches the room it is painting.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::resources::stage::StageId;

/// Lifetime of a pulse in seconds.
pub const PULSE_TTL: f32 = 0.22;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Room-relative center.
    pub pos: Vec2,
    /// Seconds since spawn.
    pub age: f32,
    pub ttl: f32,
    /// Stage the pulse was spawned in.
    pub stage: StageId,
}

impl Pulse {
    /// Fraction of the lifetime used, `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.ttl <= 0.0 {
            return 1.0;
        }
        (self.age / self.ttl).clamp(0.0, 1.0)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Pulses {
    active: Vec<Pulse>,
}

impl Pulses {
    pub fn spawn(&mut self, pos: Vec2, stage: StageId) {
        self.active.push(Pulse {
            pos,
            age: 0.0,
            ttl: PULSE_TTL,
            stage,
        });
    }

    /// Age every pulse by `dt` and drop the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for pulse in &mut self.active {
            pulse.age += dt;
        }
        self.active.retain(|p| p.age < p.ttl);
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.active.iter()
    }

    pub fn as_slice(&self) -> &[Pulse] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
