//! Engine systems.
//!
//! This module groups the ECS systems that advance the simulation. Which of
//! them run on a given step is decided by
//! [`Simulation::step`](crate::game::Simulation::step).
//!
//! Submodules overview
//! - [`collision`] – tile rectangles and the per-axis sweep
//! - [`exit`] – room walls, exit bands and transition start
//! - [`feedback`] – forward segment marks to the feedback collaborator
//! - [`input`] – translate input state into actor velocity and jumps
//! - [`movement`] – integrate, collide and light segments
//! - [`pulses`] – age and expire segment pulses
//! - [`time`] – update simulation time and delta
//! - [`transition`] – advance and commit room transitions

pub mod collision;
pub mod exit;
pub mod feedback;
pub mod input;
pub mod movement;
pub mod pulses;
pub mod time;
pub mod transition;
