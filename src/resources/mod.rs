//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `feedback` – channel bridge to the audio/visual feedback collaborator
//! - `gameconfig` – INI-backed tuning and storage settings
//! - `input` – per-step movement intents
//! - `pulses` – transient markers spawned by lit segments
//! - `segments` – seven-segment tracking and decoding
//! - `stage` – stage identifiers, themes and default tile layouts
//! - `stagestore` – per-stage tile grids, resize and JSON persistence
//! - `tilegrid` – tile codes, grids and exit bands
//! - `transition` – room transition state machine
//! - `worldgraph` – explored rooms by coordinate
//! - `worldtime` – simulation time and delta
pub mod feedback;
pub mod gameconfig;
pub mod input;
pub mod pulses;
pub mod segments;
pub mod stage;
pub mod stagestore;
pub mod tilegrid;
pub mod transition;
pub mod worldgraph;
pub mod worldtime;
