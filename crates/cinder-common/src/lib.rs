//! # Cinder Common
//!
//! Common types, utilities, and shared abstractions for the Cinder particle core.
//!
//! This crate provides foundational types used across all Cinder crates:
//! - Handle and resource ID types (ParticleHandle, TextureId, etc.)
//! - 2D math helpers over `glam::Vec2`
//! - Version information for particle config files
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
    pub use crate::version::*;
}

pub use prelude::*;
