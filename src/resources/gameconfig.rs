//! Game configuration resource.
//!
//! Holds the grid geometry, movement tuning, transition timing and storage
//! settings. Values come from an INI file; anything missing keeps its
//! default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [grid]
//! cols = 10
//! rows = 15
//! min = 6
//! max = 40
//!
//! [physics]
//! move_speed = 6.4
//! jump_speed = 12
//! gravity = 22
//! max_fall_speed = 18
//! actor_size = 1
//!
//! [transition]
//! duration = 0.65
//! exit_trigger = 0.4
//! entry_offset = 0.2
//!
//! [time]
//! max_step = 0.05
//!
//! [storage]
//! stages_path = ./stages.json
//! autosave_delay = 0.5
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::stagestore::GridLimits;

const DEFAULT_GRID_COLS: usize = 10;
const DEFAULT_GRID_ROWS: usize = 15;
const DEFAULT_GRID_MIN: usize = 6;
const DEFAULT_GRID_MAX: usize = 40;
const DEFAULT_MOVE_SPEED: f32 = 6.4;
const DEFAULT_JUMP_SPEED: f32 = 12.0;
const DEFAULT_GRAVITY: f32 = 22.0;
const DEFAULT_MAX_FALL_SPEED: f32 = 18.0;
const DEFAULT_ACTOR_SIZE: f32 = 1.0;
const DEFAULT_TRANSITION_DURATION: f32 = 0.65;
const DEFAULT_EXIT_TRIGGER: f32 = 0.4;
const DEFAULT_ENTRY_OFFSET: f32 = 0.2;
const DEFAULT_MAX_STEP: f32 = 0.05;
const DEFAULT_AUTOSAVE_DELAY: f32 = 0.5;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Grid columns for new stores.
    pub grid_cols: usize,
    /// Grid rows for new stores.
    pub grid_rows: usize,
    /// Allowed range for either grid dimension.
    pub grid_limits: GridLimits,
    /// Horizontal speed in grid units per second.
    pub move_speed: f32,
    /// Upward speed applied by a jump.
    pub jump_speed: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Terminal fall speed.
    pub max_fall_speed: f32,
    /// Edge length of the square actor.
    pub actor_size: f32,
    /// Seconds a room transition takes.
    pub transition_duration: f32,
    /// How far past the edge the actor's center must be to leave.
    pub exit_trigger: f32,
    /// Inset from the entered edge when placing the actor in a new room.
    pub entry_offset: f32,
    /// Largest time step integrated at once.
    pub max_step: f32,
    /// Where stage grids are persisted, if anywhere.
    pub stages_path: Option<PathBuf>,
    /// Quiet period after an edit before the stages are saved.
    pub autosave_delay: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            grid_cols: DEFAULT_GRID_COLS,
            grid_rows: DEFAULT_GRID_ROWS,
            grid_limits: GridLimits::new(DEFAULT_GRID_MIN, DEFAULT_GRID_MAX),
            move_speed: DEFAULT_MOVE_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            actor_size: DEFAULT_ACTOR_SIZE,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            exit_trigger: DEFAULT_EXIT_TRIGGER,
            entry_offset: DEFAULT_ENTRY_OFFSET,
            max_step: DEFAULT_MAX_STEP,
            stages_path: None,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let uint = |section: &str, key: &str| {
            config
                .getuint(section, key)
                .ok()
                .flatten()
                .map(|v| v as usize)
        };
        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };

        // [grid] section
        if let Some(cols) = uint("grid", "cols") {
            self.grid_cols = cols;
        }
        if let Some(rows) = uint("grid", "rows") {
            self.grid_rows = rows;
        }
        let min = uint("grid", "min").unwrap_or(self.grid_limits.min);
        let max = uint("grid", "max").unwrap_or(self.grid_limits.max);
        self.grid_limits = GridLimits::new(min, max);

        // [physics] section
        if let Some(v) = float("physics", "move_speed") {
            self.move_speed = v;
        }
        if let Some(v) = float("physics", "jump_speed") {
            self.jump_speed = v;
        }
        if let Some(v) = float("physics", "gravity") {
            self.gravity = v;
        }
        if let Some(v) = float("physics", "max_fall_speed") {
            self.max_fall_speed = v;
        }
        if let Some(v) = float("physics", "actor_size") {
            self.actor_size = v;
        }

        // [transition] section
        if let Some(v) = float("transition", "duration") {
            self.transition_duration = v;
        }
        if let Some(v) = float("transition", "exit_trigger") {
            self.exit_trigger = v;
        }
        if let Some(v) = float("transition", "entry_offset") {
            self.entry_offset = v;
        }

        // [time] section
        if let Some(v) = float("time", "max_step") {
            self.max_step = v;
        }

        // [storage] section
        if let Some(path) = config.get("storage", "stages_path") {
            self.stages_path = Some(PathBuf::from(path));
        }
        if let Some(v) = float("storage", "autosave_delay") {
            self.autosave_delay = v;
        }

        info!(
            "Loaded config: {}x{} grid (limits {}..{}), move={}, jump={}, gravity={}, transition={}s",
            self.grid_cols,
            self.grid_rows,
            self.grid_limits.min,
            self.grid_limits.max,
            self.move_speed,
            self.jump_speed,
            self.gravity,
            self.transition_duration
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("grid", "cols", Some(self.grid_cols.to_string()));
        config.set("grid", "rows", Some(self.grid_rows.to_string()));
        config.set("grid", "min", Some(self.grid_limits.min.to_string()));
        config.set("grid", "max", Some(self.grid_limits.max.to_string()));

        config.set("physics", "move_speed", Some(self.move_speed.to_string()));
        config.set("physics", "jump_speed", Some(self.jump_speed.to_string()));
        config.set("physics", "gravity", Some(self.gravity.to_string()));
        config.set(
            "physics",
            "max_fall_speed",
            Some(self.max_fall_speed.to_string()),
        );
        config.set("physics", "actor_size", Some(self.actor_size.to_string()));

        config.set(
            "transition",
            "duration",
            Some(self.transition_duration.to_string()),
        );
        config.set(
            "transition",
            "exit_trigger",
            Some(self.exit_trigger.to_string()),
        );
        config.set(
            "transition",
            "entry_offset",
            Some(self.entry_offset.to_string()),
        );

        config.set("time", "max_step", Some(self.max_step.to_string()));

        if let Some(path) = &self.stages_path {
            config.set("storage", "stages_path", Some(path.display().to_string()));
        }
        config.set(
            "storage",
            "autosave_delay",
            Some(self.autosave_delay.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
