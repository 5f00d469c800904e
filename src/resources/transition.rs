//! Room transition state machine.
//!
//! ```text
//! Idle --start()--> Active --advance() reaches duration--> Idle
//! ```
//!
//! While active, both rooms slide by a camera offset proportional to the
//! progress and the actor already belongs to the target room. A second
//! transition cannot start until the first one has committed.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::resources::stage::Stage;
use crate::resources::tilegrid::Edge;
use crate::resources::worldgraph::RoomCoord;

/// Default transition duration in seconds.
pub const DEFAULT_TRANSITION_DURATION: f32 = 0.65;

/// An in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTransition {
    pub elapsed: f32,
    pub duration: f32,
    /// Edge of the old room the actor left through.
    pub edge: Edge,
    pub target: Stage,
    pub target_coord: RoomCoord,
}

impl ActiveTransition {
    /// Progress in `0.0..=1.0`.
    pub fn ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransitionPhase {
    Idle,
    Active(ActiveTransition),
}

/// Transition committed by [`RoomTransition::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Committed {
    pub stage: Stage,
    pub coord: RoomCoord,
    pub edge: Edge,
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct RoomTransition {
    phase: TransitionPhase,
    duration: f32,
}

impl Default for RoomTransition {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION_DURATION)
    }
}

impl RoomTransition {
    pub fn new(duration: f32) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            duration: duration.max(0.0),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, TransitionPhase::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveTransition> {
        match &self.phase {
            TransitionPhase::Active(active) => Some(active),
            TransitionPhase::Idle => None,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Begin sliding towards `target`. Refused while another transition runs.
    pub fn start(&mut self, edge: Edge, target: Stage, target_coord: RoomCoord) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = TransitionPhase::Active(ActiveTransition {
            elapsed: 0.0,
            duration: self.duration,
            edge,
            target,
            target_coord,
        });
        true
    }

    /// Accumulate `dt`. Returns the commit once the duration is reached, at
    /// which point the machine is idle again.
    pub fn advance(&mut self, dt: f32) -> Option<Committed> {
        let TransitionPhase::Active(active) = &mut self.phase else {
            return None;
        };
        active.elapsed = (active.elapsed + dt.max(0.0)).min(active.duration);
        if !active.is_finished() {
            return None;
        }
        let committed = Committed {
            stage: active.target,
            coord: active.target_coord,
            edge: active.edge,
        };
        self.phase = TransitionPhase::Idle;
        Some(committed)
    }

    /// Camera offset for a room of `room_size`; zero while idle.
    pub fn camera_offset(&self, room_size: Vec2) -> Vec2 {
        self.active()
            .map(|a| a.edge.direction() * room_size * a.ratio())
            .unwrap_or(Vec2::ZERO)
    }
}
