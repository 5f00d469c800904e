//! Stage identifiers, themes and default tile generation.
//!
//! A stage is identified by a single digit or by the `void` sentinel. The
//! identifier alone determines the theme and the generated default tiles, so
//! two rooms with the same identifier look the same unless the stored grid
//! for that identifier has been edited.

use bevy_ecs::prelude::Resource;
use std::fmt;
use std::str::FromStr;

use crate::resources::tilegrid::{ExitBands, Tile, TileGrid};

/// Number of distinct stage identifiers (ten digits plus `void`).
pub const STAGE_COUNT: usize = 11;

/// A decimal digit in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Option<Digit> {
        if value <= 9 { Some(Digit(value)) } else { None }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Identifier of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    Digit(Digit),
    Void,
}

impl StageId {
    pub const START: StageId = StageId::Digit(Digit(0));

    /// Build a digit identifier, rejecting anything above 9.
    pub const fn digit(value: u8) -> Option<StageId> {
        match Digit::new(value) {
            Some(d) => Some(StageId::Digit(d)),
            None => None,
        }
    }

    /// Dense index used for per-identifier storage (`void` is last).
    pub fn index(self) -> usize {
        match self {
            StageId::Digit(d) => d.get() as usize,
            StageId::Void => STAGE_COUNT - 1,
        }
    }

    pub fn from_index(index: usize) -> Option<StageId> {
        match index {
            10 => Some(StageId::Void),
            _ => u8::try_from(index).ok().and_then(StageId::digit),
        }
    }

    /// Every identifier in storage order.
    pub fn all() -> impl Iterator<Item = StageId> {
        (0..STAGE_COUNT).filter_map(StageId::from_index)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageId::Digit(d) => write!(f, "{}", d.get()),
            StageId::Void => f.write_str("void"),
        }
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "void" {
            return Ok(StageId::Void);
        }
        s.parse::<u8>()
            .ok()
            .and_then(StageId::digit)
            .ok_or_else(|| format!("invalid stage id: {s:?}"))
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

/// Colors a renderer uses for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub floor: Rgb,
    pub grid: Rgb,
    pub wall: Rgb,
    pub accent: Rgb,
}

const BASE_FLOOR: Rgb = Rgb::from_hex(0xf6efe6);
const BASE_GRID: Rgb = Rgb::from_hex(0xe4d8cb);
const BASE_WALL: Rgb = Rgb::from_hex(0x1e1b17);

const STAGE_ACCENTS: [Rgb; 10] = [
    Rgb::from_hex(0xd9674a),
    Rgb::from_hex(0xb95e3b),
    Rgb::from_hex(0x5f7f6b),
    Rgb::from_hex(0x4a7892),
    Rgb::from_hex(0xb06a8a),
    Rgb::from_hex(0x9a7d44),
    Rgb::from_hex(0x6b5c8e),
    Rgb::from_hex(0x9a4b4b),
    Rgb::from_hex(0x3b6a4e),
    Rgb::from_hex(0x7c5a3a),
];

const VOID_THEME: Theme = Theme {
    floor: Rgb::from_hex(0xf1ebe4),
    grid: Rgb::from_hex(0xd7cfc7),
    wall: Rgb::from_hex(0x1f1b18),
    accent: Rgb::from_hex(0x8b5e4b),
};

impl Theme {
    pub fn for_stage(id: StageId) -> Theme {
        match id {
            StageId::Void => VOID_THEME,
            StageId::Digit(d) => Theme {
                floor: BASE_FLOOR,
                grid: BASE_GRID,
                wall: BASE_WALL,
                accent: STAGE_ACCENTS[d.get() as usize],
            },
        }
    }
}

/// A room's identity. Tiles live in the
/// [`StageStore`](crate::resources::stagestore::StageStore), keyed by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub id: StageId,
    pub theme: Theme,
}

impl Stage {
    pub fn new(id: StageId) -> Self {
        Self {
            id,
            theme: Theme::for_stage(id),
        }
    }
}

/// The stage the actor occupies outside of transitions.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CurrentStage(pub Stage);

/// Platform layout for a 15-row room, `(col, row, w, h)`.
const PLATFORMS: [(i32, i32, i32, i32); 6] = [
    (1, 12, 3, 1),
    (6, 12, 3, 1),
    (2, 9, 3, 1),
    (6, 8, 3, 1),
    (1, 6, 3, 1),
    (6, 5, 3, 1),
];
const LAYOUT_ROWS: i32 = 15;
const BRIDGE: (i32, i32, i32, i32) = (4, 7, 2, 1);
const PILLAR: (i32, i32, i32, i32) = (4, 10, 2, 4);

/// Generate the default tiles for `id` on a `cols` x `rows` grid.
///
/// The ground row is left open under the bottom exit band. Digits enable
/// platform `i` when bit `i` is set and odd digits add a bridge; `void` gets
/// every platform plus a pillar. Rows are anchored to the bottom edge.
pub fn generate_tiles(id: StageId, cols: usize, rows: usize) -> TileGrid {
    let mut grid = TileGrid::new(cols, rows);
    let bands = ExitBands::for_grid(cols, rows);
    let ground = rows as i32 - 1;
    for col in 0..cols {
        if !bands.bottom.contains(col as f32 + 0.5) {
            grid.set(col as i32, ground, Tile::Solid);
        }
    }

    let shift = rows as i32 - LAYOUT_ROWS;
    let mut place = |(x, y, w, h): (i32, i32, i32, i32)| {
        grid.fill_rect(x, y + shift, w, h, Tile::Solid);
    };

    match id {
        StageId::Void => {
            PLATFORMS.iter().copied().for_each(&mut place);
            place(PILLAR);
        }
        StageId::Digit(digit) => {
            let value = digit.get();
            for (i, platform) in PLATFORMS.iter().enumerate() {
                if value & (1 << i) != 0 {
                    place(*platform);
                }
            }
            if value % 2 == 1 {
                place(BRIDGE);
            }
        }
    }
    grid
}
