//! Per-step movement intents.
//!
//! Device handling lives outside the engine; whatever reads the keyboard,
//! pointer or touch screen hands an [`Intents`] value to
//! [`Simulation::step`](crate::game::Simulation::step), which folds it into
//! the [`InputState`] resource.

use bevy_ecs::prelude::*;

/// Abstract input for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge-triggered: true only on the step the jump was requested.
    pub jump_requested: bool,
}

impl Intents {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn left() -> Self {
        Self {
            move_left: true,
            ..Self::default()
        }
    }

    pub fn right() -> Self {
        Self {
            move_right: true,
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_requested: true,
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_requested = true;
        self
    }
}

/// Input held by the simulation between steps.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    /// Pending jump; consumed by the next play step whether or not it fires.
    pub jump_queued: bool,
}

impl InputState {
    /// Fold this step's intents in. A requested jump stays queued until a
    /// play step consumes it.
    pub fn apply(&mut self, intents: Intents) {
        self.move_left = intents.move_left;
        self.move_right = intents.move_right;
        if intents.jump_requested {
            self.jump_queued = true;
        }
    }

    /// Horizontal direction: -1, 0 or 1.
    pub fn direction(&self) -> f32 {
        (self.move_right as i32 - self.move_left as i32) as f32
    }

    /// Take the queued jump, clearing it.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), 0.0);
        input.apply(Intents::left());
        assert_eq!(input.direction(), -1.0);
        input.apply(Intents::right());
        assert_eq!(input.direction(), 1.0);
        input.apply(Intents {
            move_left: true,
            move_right: true,
            jump_requested: false,
        });
        assert_eq!(input.direction(), 0.0);
    }

    #[test]
    fn test_jump_is_consumed_once() {
        let mut input = InputState::default();
        input.apply(Intents::jump());
        input.apply(Intents::idle());
        assert!(input.take_jump());
        assert!(!input.take_jump());
    }
}
