//! Room boundary handling.
//!
//! Outside the exit bands the room edges are walls: the actor is clamped back
//! inside and loses the velocity component pointing out. Inside a band the
//! actor may leave; once its center is more than `exit_trigger` past the edge
//! a [`RoomTransition`] starts towards the neighboring coordinate.
//!
//! Starting a transition resolves the neighbor in the [`WorldGraph`]. A room
//! seen before keeps its stage; an unvisited one gets the stage spelled by
//! the segments lit in the room being left.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::actor::Actor;
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::gameconfig::GameConfig;
use crate::resources::pulses::Pulses;
use crate::resources::segments::SegmentTracker;
use crate::resources::stage::Stage;
use crate::resources::stagestore::StageStore;
use crate::resources::tilegrid::{Edge, ExitBands};
use crate::resources::transition::RoomTransition;
use crate::resources::worldgraph::WorldGraph;

/// Keep a box at `min` inside `room` except through the exit bands.
///
/// Edges are checked left, right, top, bottom. Returns the edge the box left
/// through once its center is more than `trigger` past it.
pub fn check_boundary(
    min: &mut Vec2,
    body: &mut RigidBody,
    size: Vec2,
    room: Vec2,
    bands: &ExitBands,
    trigger: f32,
) -> Option<Edge> {
    let center = *min + size * 0.5;

    if min.x < 0.0 {
        if bands.allows(Edge::Left, center) {
            if center.x < -trigger {
                return Some(Edge::Left);
            }
        } else {
            min.x = 0.0;
            body.velocity.x = 0.0;
        }
    }
    if min.x + size.x > room.x {
        if bands.allows(Edge::Right, center) {
            if center.x > room.x + trigger {
                return Some(Edge::Right);
            }
        } else {
            min.x = room.x - size.x;
            body.velocity.x = 0.0;
        }
    }
    if min.y < 0.0 {
        if bands.allows(Edge::Top, center) {
            if center.y < -trigger {
                return Some(Edge::Top);
            }
        } else {
            min.y = 0.0;
            body.velocity.y = 0.0;
        }
    }
    if min.y + size.y > room.y {
        if bands.allows(Edge::Bottom, center) {
            if center.y > room.y + trigger {
                return Some(Edge::Bottom);
            }
        } else {
            min.y = room.y - size.y;
            body.velocity.y = 0.0;
            body.grounded = true;
        }
    }
    None
}

/// Where a box at `min` lands in the next room after leaving through `edge`.
///
/// The coordinate along the crossed edge is kept, inset by `offset` from the
/// corners; the other one is inset by `offset` from the entered edge.
pub fn entry_point(edge: Edge, min: Vec2, size: Vec2, room: Vec2, offset: f32) -> Vec2 {
    let inset = |value: f32, extent: f32, length: f32| {
        value.min(length - extent - offset).max(offset)
    };
    match edge {
        Edge::Left => Vec2::new(room.x - size.x - offset, inset(min.y, size.y, room.y)),
        Edge::Right => Vec2::new(offset, inset(min.y, size.y, room.y)),
        Edge::Top => Vec2::new(inset(min.x, size.x, room.x), room.y - size.y - offset),
        Edge::Bottom => Vec2::new(inset(min.x, size.x, room.x), offset),
    }
}

/// Clamp the actor to the room walls and start a transition when it leaves.
#[allow(clippy::too_many_arguments)]
pub fn room_exit_system(
    mut query: Query<(&mut MapPosition, &BoxCollider, &mut RigidBody), With<Actor>>,
    store: Res<StageStore>,
    config: Res<GameConfig>,
    mut tracker: ResMut<SegmentTracker>,
    mut pulses: ResMut<Pulses>,
    mut graph: ResMut<WorldGraph>,
    mut transition: ResMut<RoomTransition>,
) {
    let Ok((mut position, collider, mut body)) = query.single_mut() else {
        return;
    };
    if body.frozen || transition.is_active() {
        return;
    }
    let room = Vec2::new(store.cols() as f32, store.rows() as f32);
    let mut min = position.pos;
    let exit = check_boundary(
        &mut min,
        &mut body,
        collider.size,
        room,
        store.exit_bands(),
        config.exit_trigger,
    );
    position.pos = min;
    let Some(edge) = exit else {
        return;
    };

    let decoded = tracker.decode();
    let mask = tracker.mask();
    let from = graph.current();
    let target_coord = from.neighbor(edge);
    let (id, fresh) = graph.resolve_or_insert_with(target_coord, || decoded);
    if !transition.start(edge, Stage::new(id), target_coord) {
        return;
    }
    tracker.reset();
    pulses.clear();

    let entry = entry_point(edge, min, collider.size, room, config.entry_offset);
    position.pos = entry;
    body.stop();
    body.freeze();

    info!(
        "Leaving {} through {:?} towards {} as stage {} ({}, mask {:07b})",
        from,
        edge,
        target_coord,
        id,
        if fresh { "new" } else { "revisit" },
        mask.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;
    const ROOM: Vec2 = Vec2::new(10.0, 15.0);
    const UNIT: Vec2 = Vec2::new(1.0, 1.0);

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn bands() -> ExitBands {
        ExitBands::for_grid(10, 15)
    }

    #[test]
    fn test_wall_outside_band_clamps_and_stops() {
        let mut body = RigidBody::new();
        body.velocity = Vec2::new(-5.0, 0.0);
        let mut min = Vec2::new(-0.3, 1.0);
        assert_eq!(check_boundary(&mut min, &mut body, UNIT, ROOM, &bands(), 0.4), None);
        assert!(approx_eq(min.x, 0.0));
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_floor_outside_band_grounds() {
        let mut body = RigidBody::new();
        body.velocity = Vec2::new(0.0, 6.0);
        let mut min = Vec2::new(0.5, 14.2);
        assert_eq!(check_boundary(&mut min, &mut body, UNIT, ROOM, &bands(), 0.4), None);
        assert!(approx_eq(min.y, 14.0));
        assert!(body.grounded);
    }

    #[test]
    fn test_band_lets_actor_through_then_triggers() {
        let mut body = RigidBody::new();
        let mut min = Vec2::new(9.3, 7.0);
        assert_eq!(check_boundary(&mut min, &mut body, UNIT, ROOM, &bands(), 0.4), None);
        assert!(approx_eq(min.x, 9.3));

        let mut min = Vec2::new(10.0, 7.0);
        assert_eq!(
            check_boundary(&mut min, &mut body, UNIT, ROOM, &bands(), 0.4),
            Some(Edge::Right)
        );
    }

    #[test]
    fn test_each_edge_triggers() {
        let mut body = RigidBody::new();
        let cases = [
            (Vec2::new(-1.0, 7.0), Edge::Left),
            (Vec2::new(4.5, -1.0), Edge::Top),
            (Vec2::new(4.5, 15.0), Edge::Bottom),
        ];
        for (start, edge) in cases {
            let mut min = start;
            assert_eq!(
                check_boundary(&mut min, &mut body, UNIT, ROOM, &bands(), 0.4),
                Some(edge)
            );
        }
    }

    #[test]
    fn test_entry_points() {
        let right = entry_point(Edge::Right, Vec2::new(10.0, 7.0), UNIT, ROOM, 0.2);
        assert!(approx_eq(right.x, 0.2));
        assert!(approx_eq(right.y, 7.0));

        let left = entry_point(Edge::Left, Vec2::new(-1.0, 7.0), UNIT, ROOM, 0.2);
        assert!(approx_eq(left.x, 8.8));

        let top = entry_point(Edge::Top, Vec2::new(4.5, -1.0), UNIT, ROOM, 0.2);
        assert!(approx_eq(top.x, 4.5));
        assert!(approx_eq(top.y, 13.8));

        let bottom = entry_point(Edge::Bottom, Vec2::new(-3.0, 15.0), UNIT, ROOM, 0.2);
        assert!(approx_eq(bottom.x, 0.2));
        assert!(approx_eq(bottom.y, 0.2));
    }

    #[test]
    fn test_entry_point_survives_tiny_rooms() {
        let p = entry_point(Edge::Right, Vec2::new(2.0, 50.0), UNIT, Vec2::new(1.0, 1.0), 0.2);
        assert!(p.y.is_finite());
    }
}
