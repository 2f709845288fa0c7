//! The render primitive a particle decorates, and the display-tree contract.

use cinder_common::{ContainerId, ParticleHandle, Vec2};

use crate::art::Texture;
use crate::color::Tint;

/// Visual state handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Texture to draw
    pub texture: Texture,
    /// World position
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec2,
    /// Opacity (0.0 - 1.0)
    pub alpha: f32,
    /// Multiplicative tint
    pub tint: Tint,
    /// Whether the renderer should draw this sprite
    pub visible: bool,
    /// Container this sprite is attached to, if any
    pub parent: Option<ContainerId>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            texture: Texture::EMPTY,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            alpha: 1.0,
            tint: Tint::WHITE,
            visible: false,
            parent: None,
        }
    }
}

impl Sprite {
    /// Drops the texture reference, leaving the empty placeholder.
    pub fn release_texture(&mut self) {
        self.texture = Texture::EMPTY;
    }
}

/// Display-tree collaborator that owns parent/child attachment.
pub trait DisplayTree {
    /// Detaches `child` from `parent`.
    fn remove_child(&mut self, parent: ContainerId, child: ParticleHandle);
}
