//! Editable per-identifier tile storage.
//!
//! The store keeps one [`TileGrid`] per [`StageId`]. Every room coordinate
//! that maps to the same identifier shares the same grid, so an edit is seen
//! everywhere that identifier appears, including the room the actor is in.
//!
//! # File format
//!
//! ```json
//! {
//!   "grid": { "cols": 10, "rows": 15 },
//!   "stages": [ [[0, 0, 1, ...], ...], ... ten grids ... ],
//!   "void": [[0, 0, 1, ...], ...]
//! }
//! ```
//!
//! Loading never fails on bad content: unknown codes and malformed rows
//! become [`Tile::Empty`], and a missing stage is regenerated from defaults.

use bevy_ecs::prelude::Resource;
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::resources::stage::{STAGE_COUNT, StageId, generate_tiles};
use crate::resources::tilegrid::{ExitBands, Tile, TileGrid};

/// Errors raised while reading or writing stage files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// The file does not exist yet, as on a first run.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Allowed range for both grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLimits {
    pub min: usize,
    pub max: usize,
}

impl GridLimits {
    pub fn new(min: usize, max: usize) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn clamp(&self, value: usize) -> usize {
        value.clamp(self.min, self.max)
    }
}

impl Default for GridLimits {
    fn default() -> Self {
        Self::new(6, 40)
    }
}

#[derive(Debug, Serialize)]
struct GridDims {
    cols: usize,
    rows: usize,
}

#[derive(Debug, Serialize)]
struct StageFile {
    grid: GridDims,
    stages: Vec<Vec<Vec<u8>>>,
    void: Vec<Vec<u8>>,
}

/// Tile grids for every stage identifier plus the shared grid geometry.
#[derive(Resource, Debug, Clone)]
pub struct StageStore {
    cols: usize,
    rows: usize,
    limits: GridLimits,
    bands: ExitBands,
    grids: Vec<TileGrid>,
}

impl StageStore {
    /// Store filled with generated defaults for every identifier.
    pub fn generated(cols: usize, rows: usize, limits: GridLimits) -> Self {
        let cols = limits.clamp(cols);
        let rows = limits.clamp(rows);
        Self {
            cols,
            rows,
            limits,
            bands: ExitBands::for_grid(cols, rows),
            grids: StageId::all()
                .map(|id| generate_tiles(id, cols, rows))
                .collect(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn limits(&self) -> GridLimits {
        self.limits
    }

    pub fn exit_bands(&self) -> &ExitBands {
        &self.bands
    }

    pub fn grid(&self, id: StageId) -> &TileGrid {
        &self.grids[id.index()]
    }

    /// Overwrite one cell of the grid stored for `id`.
    pub fn set_tile(&mut self, id: StageId, col: i32, row: i32, tile: Tile) -> bool {
        self.grids[id.index()].set(col, row, tile)
    }

    /// Replace the whole grid for `id` with generated defaults.
    pub fn reset_stage(&mut self, id: StageId) {
        self.grids[id.index()] = generate_tiles(id, self.cols, self.rows);
    }

    /// Change the grid dimensions, clamped to the limits.
    ///
    /// Every stored grid keeps its overlapping top-left region; new cells are
    /// empty. Returns the dimensions actually applied.
    pub fn resize(&mut self, cols: usize, rows: usize) -> (usize, usize) {
        let cols = self.limits.clamp(cols);
        let rows = self.limits.clamp(rows);
        if cols == self.cols && rows == self.rows {
            return (cols, rows);
        }
        info!(
            "Resizing stage grids: {}x{} -> {}x{}",
            self.cols, self.rows, cols, rows
        );
        for grid in &mut self.grids {
            *grid = grid.resized(cols, rows);
        }
        self.cols = cols;
        self.rows = rows;
        self.bands = ExitBands::for_grid(cols, rows);
        (cols, rows)
    }

    /// Serialize the store to a JSON string.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let file = StageFile {
            grid: GridDims {
                cols: self.cols,
                rows: self.rows,
            },
            stages: self.grids[..STAGE_COUNT - 1]
                .iter()
                .map(TileGrid::to_codes)
                .collect(),
            void: self.grid(StageId::Void).to_codes(),
        };
        Ok(serde_json::to_string(&file)?)
    }

    /// Parse a JSON document, normalizing anything malformed.
    ///
    /// Only a document that is not JSON at all is an error. `cols` and `rows`
    /// are used when the document has no usable dimensions.
    pub fn from_json(
        json: &str,
        cols: usize,
        rows: usize,
        limits: GridLimits,
    ) -> Result<Self, StoreError> {
        let doc: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&doc, cols, rows, limits))
    }

    fn from_value(doc: &Value, cols: usize, rows: usize, limits: GridLimits) -> Self {
        let dimension = |key: &str, fallback: usize| {
            doc.get("grid")
                .and_then(|g| g.get(key))
                .and_then(Value::as_u64)
                .map(|v| v as usize)
                .unwrap_or(fallback)
        };
        let cols = limits.clamp(dimension("cols", cols));
        let rows = limits.clamp(dimension("rows", rows));

        let stages = doc.get("stages").and_then(Value::as_array);
        let grids = StageId::all()
            .map(|id| {
                let stored = match id {
                    StageId::Digit(d) => stages.and_then(|s| s.get(d.get() as usize)),
                    StageId::Void => doc.get("void"),
                };
                match stored.and_then(Value::as_array) {
                    Some(rows_value) => grid_from_rows(rows_value, cols, rows),
                    None => generate_tiles(id, cols, rows),
                }
            })
            .collect();

        Self {
            cols,
            rows,
            limits,
            bands: ExitBands::for_grid(cols, rows),
            grids,
        }
    }

    /// Write the store to `path`, replacing any previous content.
    ///
    /// The JSON goes to a `.tmp` sibling first and is renamed over `path`, so
    /// a failed write leaves the previous file untouched.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        info!("Saved stages to {:?}", path);
        Ok(())
    }

    /// Read a store from `path`.
    pub fn load_from_file(
        path: impl AsRef<Path>,
        cols: usize,
        rows: usize,
        limits: GridLimits,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let store = Self::from_json(&text, cols, rows, limits)?;
        info!(
            "Loaded stages from {:?} ({}x{})",
            path, store.cols, store.rows
        );
        Ok(store)
    }
}

fn grid_from_rows(rows_value: &[Value], cols: usize, rows: usize) -> TileGrid {
    let mut grid = TileGrid::new(cols, rows);
    for (row, row_value) in rows_value.iter().take(rows).enumerate() {
        let Some(cells) = row_value.as_array() else {
            continue;
        };
        for (col, cell) in cells.iter().take(cols).enumerate() {
            let tile = cell.as_i64().map(Tile::normalize).unwrap_or_default();
            grid.set(col as i32, row as i32, tile);
        }
    }
    grid
}
