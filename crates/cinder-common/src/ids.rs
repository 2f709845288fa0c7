//! ID types for particles and render resources.

use serde::{Deserialize, Serialize};

/// Arena slot of a particle inside its pool.
///
/// Handles are plain indices; the pool owns membership, the particle only
/// carries its own handle so it can name itself to a recycler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleHandle(u32);

impl ParticleHandle {
    /// Handle of a particle that has not been placed in a pool.
    pub const NULL: Self = Self(u32::MAX);

    /// Creates a handle from an arena index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this handle refers to a pool slot.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for ParticleHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// Identifier of a texture known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(u32);

impl TextureId {
    /// Creates a texture ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The empty placeholder texture.
    pub const EMPTY: Self = Self(0);
}

/// Identifier of the base atlas a texture is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasId(u32);

impl AtlasId {
    /// Creates an atlas ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Atlas of the empty placeholder texture.
    pub const NONE: Self = Self(0);
}

/// Identifier of a display-tree container a sprite can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(u32);

impl ContainerId {
    /// Creates a container ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
