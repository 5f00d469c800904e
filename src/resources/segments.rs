//! Seven-segment tracking of the actor's path through a room.
//!
//! The room interior is split into a fixed 2x3 arrangement of areas,
//! independent of the tile resolution. Moving the actor's center from one area
//! to a neighbor lights one of the segments `a..g`, laid out like a
//! seven-segment digit:
//!
//! ```text
//!  aaa
//! f   b
//!  ggg
//! e   c
//!  ddd
//! ```
//!
//! When the actor leaves the room the lit pattern is decoded into the
//! identifier of a freshly discovered neighbor.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::resources::stage::StageId;

/// Areas across the room.
pub const AREA_COLS: i32 = 2;
/// Areas down the room.
pub const AREA_ROWS: i32 = 3;

const AREA_EPS: f32 = 0.001;

/// One of the seven tracked boundary crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    /// Bit position inside a [`SegmentMask`].
    pub fn bit(self) -> u8 {
        match self {
            Segment::A => 0,
            Segment::B => 1,
            Segment::C => 2,
            Segment::D => 3,
            Segment::E => 4,
            Segment::F => 5,
            Segment::G => 6,
        }
    }

    pub fn label(self) -> char {
        (b'a' + self.bit()) as char
    }

    /// Feedback tone in Hz.
    pub fn tone(self) -> f32 {
        520.0 + 40.0 * self.bit() as f32
    }

    /// Segment lit when crossing a column boundary into area row `row`.
    pub fn horizontal(row: i32) -> Segment {
        match row {
            0 => Segment::A,
            1 => Segment::G,
            _ => Segment::D,
        }
    }

    /// Segment lit when crossing a row boundary inside area column `col`.
    pub fn vertical(col: i32, from_row: i32, to_row: i32) -> Segment {
        let upper = from_row.min(to_row);
        match (col, upper) {
            (0, 0) => Segment::F,
            (0, _) => Segment::E,
            (_, 0) => Segment::B,
            (_, _) => Segment::C,
        }
    }
}

/// Bitmask of lit segments (`a` is bit 0, `g` is bit 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentMask(pub u8);

const fn mask_of(segments: &[Segment]) -> u8 {
    let mut mask = 0;
    let mut i = 0;
    while i < segments.len() {
        mask |= 1 << segments[i] as u8;
        i += 1;
    }
    mask
}

use Segment::{A, B, C, D, E, F, G};

/// Canonical seven-segment patterns, indexed by digit.
const DIGIT_MASKS: [u8; 10] = [
    mask_of(&[A, B, C, D, E, F]),
    mask_of(&[B, C]),
    mask_of(&[A, B, D, E, G]),
    mask_of(&[A, B, C, D, G]),
    mask_of(&[F, G, B, C]),
    mask_of(&[A, F, G, C, D]),
    mask_of(&[A, F, E, D, C, G]),
    mask_of(&[A, B, C]),
    mask_of(&[A, B, C, D, E, F, G]),
    mask_of(&[A, B, C, D, F, G]),
];

impl SegmentMask {
    pub fn contains(self, segment: Segment) -> bool {
        self.0 & (1 << segment.bit()) != 0
    }

    pub fn with(self, segment: Segment) -> SegmentMask {
        SegmentMask(self.0 | (1 << segment.bit()))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Stage identifier spelled by this pattern.
    ///
    /// Only the ten canonical digit shapes decode to digits; every other
    /// pattern, including the empty one, is [`StageId::Void`].
    pub fn decode(self) -> StageId {
        DIGIT_MASKS
            .iter()
            .position(|&mask| mask == self.0)
            .and_then(|digit| StageId::digit(digit as u8))
            .unwrap_or(StageId::Void)
    }
}

/// Area cell of the 2x3 arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaCell {
    pub col: i32,
    pub row: i32,
}

impl AreaCell {
    /// Area containing `center` in a room of `room_size` grid units.
    ///
    /// Points outside the room count as the nearest edge area.
    pub fn containing(center: Vec2, room_size: Vec2) -> AreaCell {
        let x = center.x.clamp(0.0, room_size.x - AREA_EPS);
        let y = center.y.clamp(0.0, room_size.y - AREA_EPS);
        let area_w = room_size.x / AREA_COLS as f32;
        let area_h = room_size.y / AREA_ROWS as f32;
        AreaCell {
            col: ((x / area_w).floor() as i32).clamp(0, AREA_COLS - 1),
            row: ((y / area_h).floor() as i32).clamp(0, AREA_ROWS - 1),
        }
    }
}

/// Segments lit during the current room occupancy.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SegmentTracker {
    mask: SegmentMask,
}

impl SegmentTracker {
    pub fn mask(&self) -> SegmentMask {
        self.mask
    }

    /// Light a segment. Returns `true` only the first time.
    pub fn mark(&mut self, segment: Segment) -> bool {
        if self.mask.contains(segment) {
            return false;
        }
        self.mask = self.mask.with(segment);
        true
    }

    /// Segment lit by a horizontal move from `from` to `to`, if any.
    pub fn horizontal_crossing(from: AreaCell, to: AreaCell) -> Option<Segment> {
        (from.col != to.col).then(|| Segment::horizontal(to.row))
    }

    /// Segment lit by a vertical move from `from` to `to`, if any.
    pub fn vertical_crossing(from: AreaCell, to: AreaCell) -> Option<Segment> {
        (from.row != to.row).then(|| Segment::vertical(to.col, from.row, to.row))
    }

    pub fn decode(&self) -> StageId {
        self.mask.decode()
    }

    pub fn reset(&mut self) {
        self.mask = SegmentMask::default();
    }
}
