//! # Cinder Particle
//!
//! Keyframed 2D particle core.
//!
//! This crate provides:
//! - Keyframe curves over normalized life, with per-particle cursors
//! - The particle lifecycle: init, update, kill, destroy and art assignment
//! - Behaviors for static and animated art
//! - An arena pool that recycles dead particles
//! - RON/TOML particle configuration with validation
//!
//! The per-frame path never allocates and never fails. Configuration errors
//! surface once, when a [`ParticleConfig`](config::ParticleConfig) is built.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod art;
pub mod behavior;
pub mod color;
pub mod config;
pub mod curve;
pub mod ease;
pub mod particle;
pub mod pool;
pub mod sprite;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::art::{
        parse_art, parse_data, ArtRef, ArtReport, ArtWarning, Texture, TextureSource,
    };
    pub use crate::behavior::{
        AnimatedArt, AnimationConfig, AnimationData, FrameRef, Framerate, ParticleBehavior,
        StaticArt,
    };
    pub use crate::color::{Rgb, Tint};
    pub use crate::config::{CurveConfig, EaseConfig, ParticleConfig, ParticleTemplate};
    pub use crate::curve::{CurveSampler, Keyframe, KeyframeCurve, Sample};
    pub use crate::ease::{Ease, EaseKind, EaseSegment, SegmentedEase};
    pub use crate::particle::{LifecycleState, Particle, Recycler, DEATH_SENTINEL};
    pub use crate::pool::ParticlePool;
    pub use crate::sprite::{DisplayTree, Sprite};
}

pub use prelude::*;
