//! ECS components for entities.
//!
//! The simulation has a single actor entity; these components hold its
//! position, box and motion state.
//!
//! Submodules overview:
//! - [`actor`] – marker for the player-controlled entity
//! - [`boxcollider`] – axis-aligned rectangular collider
//! - [`mapposition`] – room-relative position (top-left of the box)
//! - [`rigidbody`] – velocity, named forces and ground contact

pub mod actor;
pub mod boxcollider;
pub mod mapposition;
pub mod rigidbody;
