//! Tile codes, per-room tile grids and exit-band geometry.
//!
//! A [`TileGrid`] is a row-major array of [`Tile`] values. Queries outside the
//! grid answer [`Tile::Empty`], so collision and rendering code never need a
//! separate bounds check. [`ExitBands`] are derived purely from the grid
//! dimensions and describe where the room boundary is open.

use glam::Vec2;

/// Shape of a single grid cell.
///
/// The numeric codes are the persisted representation (`0..=6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    HalfTop,
    HalfBottom,
    HalfLeft,
    HalfRight,
    OneWay,
}

impl Tile {
    pub const ALL: [Tile; 7] = [
        Tile::Empty,
        Tile::Solid,
        Tile::HalfTop,
        Tile::HalfBottom,
        Tile::HalfLeft,
        Tile::HalfRight,
        Tile::OneWay,
    ];

    /// Persisted code of this tile.
    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Solid => 1,
            Tile::HalfTop => 2,
            Tile::HalfBottom => 3,
            Tile::HalfLeft => 4,
            Tile::HalfRight => 5,
            Tile::OneWay => 6,
        }
    }

    /// Decode a persisted code. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Tile> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Solid),
            2 => Some(Tile::HalfTop),
            3 => Some(Tile::HalfBottom),
            4 => Some(Tile::HalfLeft),
            5 => Some(Tile::HalfRight),
            6 => Some(Tile::OneWay),
            _ => None,
        }
    }

    /// Decode a persisted code, mapping anything unknown to [`Tile::Empty`].
    pub fn normalize(code: i64) -> Tile {
        Tile::from_code(code).unwrap_or_default()
    }

    pub fn is_empty(self) -> bool {
        self == Tile::Empty
    }
}

/// Row-major grid of tiles for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with [`Tile::Empty`].
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            tiles: vec![Tile::Empty; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid size in grid units.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Tile at `(col, row)`; [`Tile::Empty`] outside the grid.
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        self.index(col, row)
            .map(|i| self.tiles[i])
            .unwrap_or(Tile::Empty)
    }

    /// Overwrite a cell. Returns `false` when `(col, row)` is outside the grid.
    pub fn set(&mut self, col: i32, row: i32, tile: Tile) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangle of cells, clipping anything outside the grid.
    pub fn fill_rect(&mut self, col: i32, row: i32, w: i32, h: i32, tile: Tile) {
        for y in row..row + h {
            for x in col..col + w {
                self.set(x, y, tile);
            }
        }
    }

    /// Copy of this grid with new dimensions.
    ///
    /// The overlapping top-left region is copied; cells that did not exist
    /// before are [`Tile::Empty`].
    pub fn resized(&self, cols: usize, rows: usize) -> TileGrid {
        let mut out = TileGrid::new(cols, rows);
        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                out.tiles[row * cols + col] = self.tiles[row * self.cols + col];
            }
        }
        out
    }

    /// Rows of persisted codes, top row first.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.tiles
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }

    /// Iterate over non-empty cells as `(col, row, tile)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(i, &tile)| {
            (!tile.is_empty()).then_some((i % self.cols, i / self.cols, tile))
        })
    }
}

/// Fraction of an edge's length that is open for leaving the room.
const EXIT_BAND_FRACTION: f32 = 0.3;
/// Narrowest band allowed, in grid units.
const EXIT_BAND_MIN_WIDTH: f32 = 2.0;
/// Solid wall kept between a band and the corner it would otherwise reach.
const EXIT_BAND_CORNER_MARGIN: f32 = 1.0;

/// Closed interval along one room edge, in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    /// Centered band for an edge of the given length.
    pub fn centered(length: f32) -> Self {
        let width = (length * EXIT_BAND_FRACTION)
            .max(EXIT_BAND_MIN_WIDTH)
            .min(length - 2.0 * EXIT_BAND_CORNER_MARGIN)
            .max(0.0);
        let min = (length - width) / 2.0;
        Self {
            min,
            max: min + width,
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }
}

/// The four room edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Unit step in room coordinates when leaving through this edge.
    pub fn step(self) -> (i32, i32) {
        match self {
            Edge::Top => (0, -1),
            Edge::Bottom => (0, 1),
            Edge::Left => (-1, 0),
            Edge::Right => (1, 0),
        }
    }

    /// Unit direction vector (y grows downwards).
    pub fn direction(self) -> Vec2 {
        let (x, y) = self.step();
        Vec2::new(x as f32, y as f32)
    }
}

/// Open bands on each edge of a room.
///
/// Top and bottom bands are intervals of x; left and right bands are
/// intervals of y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitBands {
    pub top: Band,
    pub bottom: Band,
    pub left: Band,
    pub right: Band,
}

impl ExitBands {
    /// Derive the bands for a grid of `cols` x `rows`.
    pub fn for_grid(cols: usize, rows: usize) -> Self {
        let horizontal = Band::centered(cols as f32);
        let vertical = Band::centered(rows as f32);
        Self {
            top: horizontal,
            bottom: horizontal,
            left: vertical,
            right: vertical,
        }
    }

    pub fn band(&self, edge: Edge) -> Band {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    /// Whether a point with the given center may pass through `edge`.
    pub fn allows(&self, edge: Edge, center: Vec2) -> bool {
        match edge {
            Edge::Top | Edge::Bottom => self.band(edge).contains(center.x),
            Edge::Left | Edge::Right => self.band(edge).contains(center.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_codes_outside_range_normalize_to_empty() {
        for code in [-1_i64, 7, 8, 42, 255, 1000, i64::MIN, i64::MAX] {
            assert_eq!(Tile::normalize(code), Tile::Empty, "code {code}");
        }
        for tile in Tile::ALL {
            assert_eq!(Tile::normalize(tile.code() as i64), tile);
        }
    }

    #[test]
    fn test_tile_at_out_of_bounds_is_empty() {
        let mut grid = TileGrid::new(4, 3);
        grid.fill_rect(0, 0, 4, 3, Tile::Solid);
        assert_eq!(grid.tile_at(0, 0), Tile::Solid);
        assert_eq!(grid.tile_at(-1, 0), Tile::Empty);
        assert_eq!(grid.tile_at(4, 0), Tile::Empty);
        assert_eq!(grid.tile_at(0, 3), Tile::Empty);
        assert_eq!(grid.tile_at(0, -7), Tile::Empty);
    }

    #[test]
    fn test_set_outside_grid_is_rejected() {
        let mut grid = TileGrid::new(2, 2);
        assert!(!grid.set(2, 0, Tile::Solid));
        assert!(grid.set(1, 1, Tile::OneWay));
        assert_eq!(grid.tile_at(1, 1), Tile::OneWay);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut grid = TileGrid::new(3, 3);
        grid.fill_rect(2, 2, 5, 5, Tile::Solid);
        assert_eq!(grid.occupied().count(), 1);
        assert_eq!(grid.tile_at(2, 2), Tile::Solid);
    }

    #[test]
    fn test_resize_shrink_keeps_top_left() {
        let mut grid = TileGrid::new(14, 21);
        for (i, tile) in Tile::ALL.iter().enumerate() {
            grid.set(i as i32, i as i32, *tile);
        }
        grid.set(13, 20, Tile::Solid);
        let small = grid.resized(10, 15);
        assert_eq!(small.cols(), 10);
        assert_eq!(small.rows(), 15);
        for (i, tile) in Tile::ALL.iter().enumerate() {
            assert_eq!(small.tile_at(i as i32, i as i32), *tile);
        }
        assert_eq!(small.tile_at(13, 20), Tile::Empty);
    }

    #[test]
    fn test_resize_grow_fills_empty() {
        let mut grid = TileGrid::new(6, 6);
        grid.fill_rect(0, 0, 6, 6, Tile::Solid);
        let big = grid.resized(8, 9);
        assert_eq!(big.tile_at(5, 5), Tile::Solid);
        assert_eq!(big.tile_at(6, 0), Tile::Empty);
        assert_eq!(big.tile_at(0, 8), Tile::Empty);
        assert_eq!(big.occupied().count(), 36);
    }

    #[test]
    fn test_to_codes_shape() {
        let mut grid = TileGrid::new(3, 2);
        grid.set(2, 1, Tile::HalfRight);
        assert_eq!(grid.to_codes(), vec![vec![0, 0, 0], vec![0, 0, 5]]);
    }

    #[test]
    fn test_band_is_centered_thirty_percent() {
        let band = Band::centered(20.0);
        assert!(approx_eq(band.width(), 6.0));
        assert!(approx_eq(band.min, 7.0));
        assert!(approx_eq(band.max, 13.0));
    }

    #[test]
    fn test_band_has_minimum_width() {
        let band = Band::centered(6.0);
        assert!(approx_eq(band.width(), 2.0));
        assert!(approx_eq(band.min, 2.0));
    }

    #[test]
    fn test_band_never_touches_corners() {
        for length in 6..=40 {
            let band = Band::centered(length as f32);
            assert!(band.min >= 1.0 - EPSILON, "length {length}");
            assert!(band.max <= length as f32 - 1.0 + EPSILON, "length {length}");
            assert!(band.width() >= 2.0 - EPSILON, "length {length}");
        }
    }

    #[test]
    fn test_exit_bands_for_grid() {
        let bands = ExitBands::for_grid(10, 15);
        assert!(approx_eq(bands.top.min, 3.5));
        assert!(approx_eq(bands.top.max, 6.5));
        assert!(approx_eq(bands.left.min, 5.25));
        assert!(approx_eq(bands.left.max, 9.75));
        assert!(bands.allows(Edge::Right, Vec2::new(10.5, 7.0)));
        assert!(!bands.allows(Edge::Right, Vec2::new(10.5, 13.5)));
        assert!(bands.allows(Edge::Bottom, Vec2::new(5.0, 15.5)));
    }

    #[test]
    fn test_edge_steps_are_unit() {
        for edge in Edge::ALL {
            let dir = edge.direction();
            assert!(approx_eq(dir.length(), 1.0));
        }
    }
}
