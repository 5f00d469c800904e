//! Axis-separated tile collision.
//!
//! Each occupied cell expands into zero or more [`TileRect`]s according to
//! its [`Tile`] shape. A move is resolved one axis at a time (horizontal
//! first, then vertical, see
//! [`actor_movement_system`](crate::systems::movement::actor_movement_system)):
//! the swept box of the move collects candidate rectangles and the move is
//! clamped flush against the nearest one the actor is approaching.
//!
//! | Tile       | Rect        | Horizontal | Vertical | One-way |
//! |------------|-------------|------------|----------|---------|
//! | Solid      | full cell   | yes        | yes      | no      |
//! | HalfTop    | top half    | yes        | yes      | no      |
//! | HalfBottom | bottom half | yes        | yes      | no      |
//! | HalfLeft   | left half   | yes        | yes      | no      |
//! | HalfRight  | right half  | yes        | yes      | no      |
//! | OneWay     | full cell   | no         | yes      | yes     |

use glam::Vec2;
use smallvec::{SmallVec, smallvec};

use crate::resources::tilegrid::{Tile, TileGrid};

/// Tolerance for "touching" comparisons, in grid units.
pub const COLLISION_EPS: f32 = 0.001;

/// Collision rectangle produced by one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub min: Vec2,
    pub max: Vec2,
    pub blocks_horizontal: bool,
    pub blocks_vertical: bool,
    /// Only stops bodies landing on it from above.
    pub one_way: bool,
}

impl TileRect {
    fn solid(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            blocks_horizontal: true,
            blocks_vertical: true,
            one_way: false,
        }
    }
}

/// Rectangles for `tile` placed at `(col, row)`.
pub fn tile_rects(tile: Tile, col: i32, row: i32) -> SmallVec<[TileRect; 1]> {
    let origin = Vec2::new(col as f32, row as f32);
    let cell = |x0: f32, y0: f32, x1: f32, y1: f32| {
        TileRect::solid(origin + Vec2::new(x0, y0), origin + Vec2::new(x1, y1))
    };
    match tile {
        Tile::Empty => SmallVec::new(),
        Tile::Solid => smallvec![cell(0.0, 0.0, 1.0, 1.0)],
        Tile::HalfTop => smallvec![cell(0.0, 0.0, 1.0, 0.5)],
        Tile::HalfBottom => smallvec![cell(0.0, 0.5, 1.0, 1.0)],
        Tile::HalfLeft => smallvec![cell(0.0, 0.0, 0.5, 1.0)],
        Tile::HalfRight => smallvec![cell(0.5, 0.0, 1.0, 1.0)],
        Tile::OneWay => smallvec![TileRect {
            blocks_horizontal: false,
            one_way: true,
            ..cell(0.0, 0.0, 1.0, 1.0)
        }],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Outcome of moving along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSweep {
    /// Displacement actually allowed.
    pub delta: f32,
    /// Whether a rectangle shortened the move.
    pub blocked: bool,
}

/// Resolve a move of `delta` along `axis` for a box at `min` with `size`.
pub fn sweep_axis(grid: &TileGrid, min: Vec2, size: Vec2, axis: Axis, delta: f32) -> AxisSweep {
    if delta == 0.0 {
        return AxisSweep {
            delta,
            blocked: false,
        };
    }
    let max = min + size;
    let step = match axis {
        Axis::Horizontal => Vec2::new(delta, 0.0),
        Axis::Vertical => Vec2::new(0.0, delta),
    };
    let swept_min = min.min(min + step);
    let swept_max = max.max(max + step);

    let mut allowed = delta;
    for row in swept_min.y.floor() as i32..=swept_max.y.floor() as i32 {
        for col in swept_min.x.floor() as i32..=swept_max.x.floor() as i32 {
            let tile = grid.tile_at(col, row);
            if tile.is_empty() {
                continue;
            }
            for rect in tile_rects(tile, col, row) {
                let Some(limit) = approach_limit(&rect, min, max, axis, delta) else {
                    continue;
                };
                allowed = if delta > 0.0 {
                    allowed.min(limit)
                } else {
                    allowed.max(limit)
                };
            }
        }
    }

    AxisSweep {
        delta: allowed,
        blocked: allowed != delta,
    }
}

/// Largest move towards `rect` before touching it, or `None` when `rect`
/// cannot stop this move.
///
/// Only rectangles the box starts on the near side of are considered, so a
/// box already past a rectangle's facing edge is never pulled back onto it.
fn approach_limit(rect: &TileRect, min: Vec2, max: Vec2, axis: Axis, delta: f32) -> Option<f32> {
    match axis {
        Axis::Horizontal => {
            if !rect.blocks_horizontal || !overlaps(rect.min.y, rect.max.y, min.y, max.y) {
                return None;
            }
            if delta > 0.0 {
                (max.x <= rect.min.x + COLLISION_EPS).then(|| (rect.min.x - max.x).max(0.0))
            } else {
                (min.x >= rect.max.x - COLLISION_EPS).then(|| (rect.max.x - min.x).min(0.0))
            }
        }
        Axis::Vertical => {
            if !rect.blocks_vertical || !overlaps(rect.min.x, rect.max.x, min.x, max.x) {
                return None;
            }
            if delta > 0.0 {
                (max.y <= rect.min.y + COLLISION_EPS).then(|| (rect.min.y - max.y).max(0.0))
            } else if rect.one_way {
                None
            } else {
                (min.y >= rect.max.y - COLLISION_EPS).then(|| (rect.max.y - min.y).min(0.0))
            }
        }
    }
}

fn overlaps(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max - COLLISION_EPS && a_max > b_min + COLLISION_EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: Vec2 = Vec2::new(1.0, 1.0);

    fn grid_with(tiles: &[(i32, i32, Tile)]) -> TileGrid {
        let mut grid = TileGrid::new(10, 10);
        for &(col, row, tile) in tiles {
            grid.set(col, row, tile);
        }
        grid
    }

    /// Resolve horizontally then vertically, like the movement system does.
    fn resolve(grid: &TileGrid, pos: Vec2, delta: Vec2) -> (Vec2, AxisSweep, AxisSweep) {
        let x = sweep_axis(grid, pos, UNIT, Axis::Horizontal, delta.x);
        let pos = pos + Vec2::new(x.delta, 0.0);
        let y = sweep_axis(grid, pos, UNIT, Axis::Vertical, delta.y);
        (pos + Vec2::new(0.0, y.delta), x, y)
    }

    fn overlaps_rect(pos: Vec2, rect: &TileRect) -> bool {
        let max = pos + UNIT;
        pos.x < rect.max.x - COLLISION_EPS
            && max.x > rect.min.x + COLLISION_EPS
            && pos.y < rect.max.y - COLLISION_EPS
            && max.y > rect.min.y + COLLISION_EPS
    }

    #[test]
    fn test_tile_rect_table() {
        assert!(tile_rects(Tile::Empty, 0, 0).is_empty());
        let half_top = tile_rects(Tile::HalfTop, 2, 3)[0];
        assert_eq!(half_top.min, Vec2::new(2.0, 3.0));
        assert_eq!(half_top.max, Vec2::new(3.0, 3.5));
        let half_right = tile_rects(Tile::HalfRight, 2, 3)[0];
        assert_eq!(half_right.min, Vec2::new(2.5, 3.0));
        let one_way = tile_rects(Tile::OneWay, 0, 0)[0];
        assert!(one_way.one_way && one_way.blocks_vertical && !one_way.blocks_horizontal);
        for tile in [Tile::Solid, Tile::HalfTop, Tile::HalfBottom, Tile::HalfLeft, Tile::HalfRight] {
            let rect = tile_rects(tile, 0, 0)[0];
            assert!(rect.blocks_horizontal && rect.blocks_vertical && !rect.one_way);
        }
    }

    #[test]
    fn test_zero_move_is_free() {
        let grid = grid_with(&[(1, 0, Tile::Solid)]);
        let sweep = sweep_axis(&grid, Vec2::ZERO, UNIT, Axis::Horizontal, 0.0);
        assert_eq!(sweep, AxisSweep { delta: 0.0, blocked: false });
    }

    #[test]
    fn test_solid_never_tunneled_head_on() {
        let grid = grid_with(&[(5, 4, Tile::Solid)]);
        let rect = tile_rects(Tile::Solid, 5, 4)[0];
        for i in 1..=20 {
            let step = i as f32 * 0.05;
            for start_gap in [0.0, 0.1, 0.5, 0.999] {
                // from the left
                let start = Vec2::new(4.0 - start_gap, 4.0);
                let (end, sweep, _) = resolve(&grid, start, Vec2::new(step, 0.0));
                assert!(!overlaps_rect(end, &rect), "left step {step} gap {start_gap}");
                assert!(end.x <= 4.0 + COLLISION_EPS);
                if step > start_gap + 0.01 {
                    assert!(sweep.blocked);
                } else if step < start_gap - 0.01 {
                    assert!(!sweep.blocked);
                }

                // from the right
                let start = Vec2::new(6.0 + start_gap, 4.0);
                let (end, _, _) = resolve(&grid, start, Vec2::new(-step, 0.0));
                assert!(!overlaps_rect(end, &rect), "right step {step} gap {start_gap}");

                // from above
                let start = Vec2::new(5.0, 3.0 - start_gap);
                let (end, _, y) = resolve(&grid, start, Vec2::new(0.0, step));
                assert!(!overlaps_rect(end, &rect), "above step {step} gap {start_gap}");
                if step > start_gap + 0.01 {
                    assert!(y.blocked);
                }

                // from below
                let start = Vec2::new(5.0, 5.0 + start_gap);
                let (end, _, _) = resolve(&grid, start, Vec2::new(0.0, -step));
                assert!(!overlaps_rect(end, &rect), "below step {step} gap {start_gap}");
            }
        }
    }

    #[test]
    fn test_misaligned_actor_is_stopped_by_either_row() {
        let grid = grid_with(&[(5, 5, Tile::Solid)]);
        let (end, x, _) = resolve(&grid, Vec2::new(3.5, 4.4), Vec2::new(1.0, 0.0));
        assert!(x.blocked);
        assert!((end.x - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_most_restrictive_clamp_wins() {
        let grid = grid_with(&[(3, 2, Tile::Solid), (4, 2, Tile::Solid)]);
        let sweep = sweep_axis(&grid, Vec2::new(1.5, 2.0), UNIT, Axis::Horizontal, 1.0);
        assert!(sweep.blocked);
        assert!((sweep.delta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_embedded_tiles_are_ignored() {
        // actor already overlaps the tile; moving away must not snap back
        let grid = grid_with(&[(2, 2, Tile::Solid)]);
        let sweep = sweep_axis(&grid, Vec2::new(2.5, 2.0), UNIT, Axis::Horizontal, 0.3);
        assert_eq!(sweep, AxisSweep { delta: 0.3, blocked: false });
    }

    #[test]
    fn test_one_way_passes_upward_and_sideways() {
        let grid = grid_with(&[(4, 4, Tile::OneWay)]);
        for start_y in [5.0, 5.5, 4.5] {
            let sweep = sweep_axis(&grid, Vec2::new(4.0, start_y), UNIT, Axis::Vertical, -0.8);
            assert!(!sweep.blocked, "start_y {start_y}");
        }
        let sweep = sweep_axis(&grid, Vec2::new(2.5, 4.0), UNIT, Axis::Horizontal, 1.0);
        assert!(!sweep.blocked);
    }

    #[test]
    fn test_one_way_lands_from_above() {
        let grid = grid_with(&[(4, 4, Tile::OneWay)]);
        let sweep = sweep_axis(&grid, Vec2::new(4.2, 2.7), UNIT, Axis::Vertical, 0.6);
        assert!(sweep.blocked);
        assert!((sweep.delta - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_one_way_ignored_when_started_below_top() {
        let grid = grid_with(&[(4, 4, Tile::OneWay)]);
        // bottom edge already below the platform top: fall through
        let sweep = sweep_axis(&grid, Vec2::new(4.0, 3.5), UNIT, Axis::Vertical, 0.4);
        assert!(!sweep.blocked);
    }

    #[test]
    fn test_half_bottom_landing_height() {
        let grid = grid_with(&[(3, 6, Tile::HalfBottom)]);
        let sweep = sweep_axis(&grid, Vec2::new(3.0, 5.0), UNIT, Axis::Vertical, 0.9);
        assert!(sweep.blocked);
        assert!((sweep.delta - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_half_top_lets_actor_pass_underneath() {
        let grid = grid_with(&[(5, 3, Tile::HalfTop)]);
        // actor occupies y 3.5..4.5, below the top half
        let sweep = sweep_axis(&grid, Vec2::new(3.5, 3.5), UNIT, Axis::Horizontal, 1.0);
        assert!(!sweep.blocked);
        // actor at y 3.0..4.0 hits it
        let sweep = sweep_axis(&grid, Vec2::new(3.5, 3.0), UNIT, Axis::Horizontal, 1.0);
        assert!(sweep.blocked);
        assert!((sweep.delta - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_half_left_and_right_faces() {
        let grid = grid_with(&[(5, 2, Tile::HalfLeft), (1, 2, Tile::HalfRight)]);
        let sweep = sweep_axis(&grid, Vec2::new(6.0, 2.0), UNIT, Axis::Horizontal, -1.0);
        assert!((sweep.delta + 0.5).abs() < 1e-5);
        let sweep = sweep_axis(&grid, Vec2::new(3.0, 2.0), UNIT, Axis::Horizontal, -1.0);
        assert!(!sweep.blocked);
        let sweep = sweep_axis(&grid, Vec2::new(2.0, 2.0), UNIT, Axis::Horizontal, -1.0);
        assert!(sweep.blocked);
        assert!(sweep.delta.abs() < 1e-5);
    }

    #[test]
    fn test_outside_grid_is_open() {
        let grid = TileGrid::new(4, 4);
        let sweep = sweep_axis(&grid, Vec2::new(3.5, 1.0), UNIT, Axis::Horizontal, 1.0);
        assert!(!sweep.blocked);
        let sweep = sweep_axis(&grid, Vec2::new(1.0, -1.5), UNIT, Axis::Vertical, -1.0);
        assert!(!sweep.blocked);
    }
}
