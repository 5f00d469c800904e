//! Message types exchanged by the engine's systems.
//!
//! Submodules:
//! - [`feedback`] – segment marks and the commands forwarded to the
//!   audio/visual feedback collaborator
pub mod feedback;
