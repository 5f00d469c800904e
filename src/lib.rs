//! Segment Rooms library.
//!
//! A tile-based platformer movement engine. Rooms are linked on an integer
//! lattice and each newly discovered room takes its identity from the
//! seven-segment pattern the actor traced in the room it left.
//!
//! This module exposes the engine's ECS components, resources, systems and
//! messages, plus the [`game::Simulation`] that drives them, for use by the
//! headless runner, integration tests and front ends.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod script;
pub mod systems;
