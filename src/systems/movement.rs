//! Actor movement, tile collision and segment marking.
//!
//! Each play step the actor's [`RigidBody`] integrates its forces, then the
//! displacement is resolved against the current stage's tiles one axis at a
//! time, horizontal first. The collider center is sampled before the move,
//! between the two axes and after the move, so every area boundary crossed on
//! either axis lights its segment in the
//! [`SegmentTracker`](crate::resources::segments::SegmentTracker).
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::actor::Actor;
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::feedback::SegmentMarked;
use crate::resources::pulses::Pulses;
use crate::resources::segments::{AreaCell, Segment, SegmentTracker};
use crate::resources::stage::CurrentStage;
use crate::resources::stagestore::StageStore;
use crate::resources::tilegrid::TileGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::{Axis, sweep_axis};

/// Collider centers sampled during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTrace {
    pub start: Vec2,
    /// After the horizontal move, before the vertical one.
    pub mid: Vec2,
    pub end: Vec2,
}

/// Integrate `body` for `dt` and move `position` through `grid`.
///
/// A blocked axis zeroes that velocity component. `grounded` is recomputed
/// every step and only set by a downward vertical block.
pub fn move_body(
    grid: &TileGrid,
    position: &mut Vec2,
    collider: &BoxCollider,
    body: &mut RigidBody,
    dt: f32,
) -> StepTrace {
    body.integrate(dt);
    let start = collider.center(*position);
    let delta = body.velocity * dt;

    let (min, _) = collider.aabb(*position);
    let x = sweep_axis(grid, min, collider.size, Axis::Horizontal, delta.x);
    position.x += x.delta;
    if x.blocked {
        body.velocity.x = 0.0;
    }
    let mid = collider.center(*position);

    let (min, _) = collider.aabb(*position);
    let y = sweep_axis(grid, min, collider.size, Axis::Vertical, delta.y);
    position.y += y.delta;
    body.grounded = false;
    if y.blocked {
        if delta.y > 0.0 {
            body.grounded = true;
        }
        body.velocity.y = 0.0;
    }
    let end = collider.center(*position);

    StepTrace { start, mid, end }
}

/// Segments lit by `trace` in a room of `room_size`, horizontal first.
pub fn crossed_segments(trace: StepTrace, room_size: Vec2) -> impl Iterator<Item = Segment> {
    let start = AreaCell::containing(trace.start, room_size);
    let mid = AreaCell::containing(trace.mid, room_size);
    let end = AreaCell::containing(trace.end, room_size);
    SegmentTracker::horizontal_crossing(start, mid)
        .into_iter()
        .chain(SegmentTracker::vertical_crossing(mid, end))
}

/// Move every unfrozen actor and light the segments it crosses.
pub fn actor_movement_system(
    mut query: Query<(&mut MapPosition, &BoxCollider, &mut RigidBody), With<Actor>>,
    time: Res<WorldTime>,
    store: Res<StageStore>,
    current: Res<CurrentStage>,
    mut tracker: ResMut<SegmentTracker>,
    mut pulses: ResMut<Pulses>,
    mut marked: MessageWriter<SegmentMarked>,
) {
    let stage = current.0.id;
    let grid = store.grid(stage);
    let room_size = grid.size();
    for (mut position, collider, mut body) in query.iter_mut() {
        if body.frozen {
            continue;
        }
        let trace = move_body(grid, &mut position.pos, collider, &mut body, time.delta);
        for segment in crossed_segments(trace, room_size) {
            if !tracker.mark(segment) {
                continue;
            }
            debug!(
                "Segment {} lit in stage {} (mask {:07b})",
                segment.label(),
                stage,
                tracker.mask().0
            );
            pulses.spawn(trace.end, stage);
            marked.write(SegmentMarked {
                segment,
                stage,
                pos: trace.end,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rigidbody::GRAVITY_FORCE;
    use crate::resources::tilegrid::Tile;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::new(10, 15);
        grid.fill_rect(0, 14, 10, 1, Tile::Solid);
        grid
    }

    fn falling_body() -> RigidBody {
        let mut body = RigidBody::with_max_fall_speed(18.0);
        body.add_force(GRAVITY_FORCE, Vec2::new(0.0, 22.0));
        body
    }

    #[test]
    fn test_body_lands_and_grounds() {
        let grid = floor_grid();
        let collider = BoxCollider::new(1.0, 1.0);
        let mut body = falling_body();
        let mut pos = Vec2::new(2.0, 10.0);
        for _ in 0..60 {
            move_body(&grid, &mut pos, &collider, &mut body, 0.05);
        }
        assert!(approx_eq(pos.y, 13.0));
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_body_lands_on_one_way_tile() {
        let mut grid = TileGrid::new(10, 15);
        grid.set(2, 10, Tile::OneWay);
        let collider = BoxCollider::new(1.0, 1.0);
        let mut body = falling_body();
        let mut pos = Vec2::new(2.0, 5.0);
        for _ in 0..60 {
            move_body(&grid, &mut pos, &collider, &mut body, 0.05);
        }
        assert!(approx_eq(pos.y, 9.0));
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_passes_up_through_one_way_then_lands() {
        let mut grid = TileGrid::new(10, 15);
        grid.set(2, 10, Tile::OneWay);
        let collider = BoxCollider::new(1.0, 1.0);
        let mut body = falling_body();
        body.velocity.y = -12.0;
        let mut pos = Vec2::new(2.0, 11.0);
        let mut highest = pos.y;
        for _ in 0..60 {
            move_body(&grid, &mut pos, &collider, &mut body, 0.05);
            highest = highest.min(pos.y);
        }
        assert!(highest < 9.0, "peak {highest}");
        assert!(approx_eq(pos.y, 9.0));
        assert!(body.grounded);
    }

    #[test]
    fn test_grounded_resets_when_walking_off_a_ledge() {
        let mut grid = TileGrid::new(10, 15);
        grid.fill_rect(0, 14, 3, 1, Tile::Solid);
        let collider = BoxCollider::new(1.0, 1.0);
        let mut body = falling_body();
        let mut pos = Vec2::new(1.0, 13.0);
        move_body(&grid, &mut pos, &collider, &mut body, 0.05);
        assert!(body.grounded);

        let mut walked_off = false;
        for _ in 0..20 {
            body.velocity.x = 6.4;
            move_body(&grid, &mut pos, &collider, &mut body, 0.05);
            if pos.x > 3.0 && !body.grounded {
                walked_off = true;
            }
        }
        assert!(walked_off);
        assert!(pos.y > 13.0);
    }

    #[test]
    fn test_wall_zeroes_horizontal_velocity() {
        let mut grid = floor_grid();
        grid.fill_rect(5, 10, 1, 4, Tile::Solid);
        let collider = BoxCollider::new(1.0, 1.0);
        let mut body = falling_body();
        let mut pos = Vec2::new(3.5, 13.0);
        for _ in 0..10 {
            body.velocity.x = 6.4;
            move_body(&grid, &mut pos, &collider, &mut body, 0.05);
        }
        assert!(approx_eq(pos.x, 4.0));
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_ceiling_stops_jump_without_grounding() {
        let mut grid = floor_grid();
        grid.fill_rect(0, 11, 10, 1, Tile::Solid);
        let collider = BoxCollider::new(1.0, 1.0);
        let mut body = falling_body();
        let mut pos = Vec2::new(2.0, 13.0);
        body.velocity.y = -12.0;
        for _ in 0..2 {
            move_body(&grid, &mut pos, &collider, &mut body, 0.05);
        }
        assert!(approx_eq(pos.y, 12.0));
        assert!(!body.grounded);
    }

    #[test]
    fn test_crossed_segments_per_axis() {
        let room = Vec2::new(10.0, 15.0);
        let trace = StepTrace {
            start: Vec2::new(4.9, 13.5),
            mid: Vec2::new(5.1, 13.5),
            end: Vec2::new(5.1, 13.5),
        };
        assert_eq!(crossed_segments(trace, room).collect::<Vec<_>>(), vec![Segment::D]);

        let trace = StepTrace {
            start: Vec2::new(4.9, 10.1),
            mid: Vec2::new(5.1, 10.1),
            end: Vec2::new(5.1, 9.9),
        };
        assert_eq!(
            crossed_segments(trace, room).collect::<Vec<_>>(),
            vec![Segment::D, Segment::C]
        );
    }
}
