use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Axis-aligned box anchored at an entity's [`MapPosition`].
///
/// [`MapPosition`]: crate::components::mapposition::MapPosition
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let p1 = position + self.size;
        (position.min(p1), position.max(p1))
    }

    /// Center of the collider for a given entity position.
    pub fn center(&self, position: Vec2) -> Vec2 {
        let (min, max) = self.aabb(position);
        (min + max) * 0.5
    }
}
