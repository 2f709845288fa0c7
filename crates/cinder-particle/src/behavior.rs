//! Particle capabilities: how art is applied and whether built-in movement runs.
//!
//! [`Particle`](crate::particle::Particle) is generic over a
//! [`ParticleBehavior`]. The lifecycle calls the behavior's hooks at fixed
//! points; variants implement the trait instead of overriding the lifecycle.
//!
//! Two behaviors ship with the crate:
//! - [`StaticArt`]: one texture for the whole life.
//! - [`AnimatedArt`]: a frame sequence played at a fixed rate or stretched
//!   over the particle's life.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::art::{
    check_atlases, resolve_one, ArtRef, ArtReport, ArtWarning, Texture, TextureSource,
};
use crate::sprite::Sprite;

/// Framerate used when configuration gives none or a non-positive one.
pub const DEFAULT_FRAMERATE: f32 = 60.0;

/// Hooks a particle variant plugs into the lifecycle.
pub trait ParticleBehavior {
    /// One unit of art as accepted by [`apply_art`](Self::apply_art).
    type Art;

    /// Assigns art. `None` must leave the sprite showing the empty
    /// placeholder.
    fn apply_art(&mut self, sprite: &mut Sprite, art: Option<Self::Art>);

    /// When true, the particle skips built-in position integration.
    fn controls_own_movement(&self) -> bool {
        false
    }

    /// Called at the end of `Particle::init`.
    fn on_init(&mut self, _sprite: &mut Sprite, _max_life: f32) {}

    /// Called after every update that did not kill the particle.
    fn on_update(&mut self, _sprite: &mut Sprite, _delta: f32) {}
}

/// A particle that shows one texture for its whole life.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticArt;

impl ParticleBehavior for StaticArt {
    type Art = Texture;

    fn apply_art(&mut self, sprite: &mut Sprite, art: Option<Texture>) {
        sprite.texture = art.unwrap_or(Texture::EMPTY);
    }
}

/// How fast an animation advances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framerate {
    /// Frames per second
    Fixed(f32),
    /// Play every frame exactly once over the particle's life
    MatchLife,
}

impl Default for Framerate {
    fn default() -> Self {
        Self::Fixed(DEFAULT_FRAMERATE)
    }
}

/// One frame entry, optionally repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRef {
    /// Frame art
    pub art: ArtRef,
    /// How many consecutive frames show this art
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

/// Unresolved animation as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    /// Frames in play order
    pub textures: Vec<FrameRef>,
    /// Playback rate
    #[serde(default)]
    pub framerate: Framerate,
    /// Whether playback wraps around
    #[serde(default, rename = "loop")]
    pub loop_animation: bool,
}

/// A resolved animation, shared by every particle that plays it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Frames in play order
    pub textures: Arc<[Texture]>,
    /// Playback rate
    pub framerate: Framerate,
    /// Whether playback wraps around
    pub loop_animation: bool,
}

impl AnimationConfig {
    /// Duration of one pass in seconds, or `None` for life-matched playback.
    #[must_use]
    pub fn duration(&self) -> Option<f32> {
        match self.framerate {
            Framerate::Fixed(fps) => Some(self.textures.len() as f32 / fps),
            Framerate::MatchLife => None,
        }
    }
}

/// A particle that plays a frame animation.
#[derive(Debug, Clone, Default)]
pub struct AnimatedArt {
    animation: Option<AnimationConfig>,
    elapsed: f32,
    framerate: f32,
    duration: f32,
}

impl AnimatedArt {
    /// Resolves a list of animations for use with [`AnimatedArt`].
    ///
    /// Non-positive fixed framerates fall back to [`DEFAULT_FRAMERATE`].
    /// Unresolved frames become the placeholder and produce a warning.
    pub fn parse_data(
        data: &[AnimationData],
        source: &impl TextureSource,
    ) -> ArtReport<Vec<AnimationConfig>> {
        let mut warnings = Vec::new();

        if data.is_empty() {
            warnings.push(ArtWarning::Empty);
        }

        let value: Vec<AnimationConfig> = data
            .iter()
            .map(|anim| {
                let mut textures = Vec::new();
                for frame in &anim.textures {
                    let texture = resolve_one(&frame.art, source, &mut warnings);
                    textures.extend(std::iter::repeat(texture).take(frame.count));
                }
                if textures.is_empty() {
                    warnings.push(ArtWarning::Empty);
                }

                let framerate = match anim.framerate {
                    Framerate::Fixed(fps) if fps > 0.0 => Framerate::Fixed(fps),
                    Framerate::Fixed(_) => Framerate::default(),
                    Framerate::MatchLife => Framerate::MatchLife,
                };

                AnimationConfig {
                    textures: textures.into(),
                    framerate,
                    loop_animation: anim.loop_animation,
                }
            })
            .collect();

        check_atlases(value.iter().flat_map(|a| a.textures.iter()), &mut warnings);

        ArtReport { value, warnings }
    }

    /// Seconds into the current pass.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Effective frames per second for the current life.
    #[must_use]
    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    fn frame_count(&self) -> usize {
        self.animation.as_ref().map_or(0, |anim| anim.textures.len())
    }

    fn frame_texture(&self, frame: usize) -> Texture {
        self.animation
            .as_ref()
            .and_then(|anim| anim.textures.get(frame).copied())
            .unwrap_or(Texture::EMPTY)
    }
}

impl ParticleBehavior for AnimatedArt {
    type Art = AnimationConfig;

    fn apply_art(&mut self, sprite: &mut Sprite, art: Option<AnimationConfig>) {
        self.animation = art;
        sprite.texture = self.frame_texture(0);
    }

    fn on_init(&mut self, sprite: &mut Sprite, max_life: f32) {
        self.elapsed = 0.0;
        let frames = self.frame_count() as f32;
        match self.animation.as_ref().map(|anim| anim.framerate) {
            Some(Framerate::Fixed(fps)) => {
                self.framerate = fps;
                self.duration = frames / fps;
            }
            Some(Framerate::MatchLife) => {
                self.duration = max_life;
                self.framerate = frames / max_life;
            }
            None => {
                self.framerate = 0.0;
                self.duration = 0.0;
            }
        }
        sprite.texture = self.frame_texture(0);
    }

    fn on_update(&mut self, sprite: &mut Sprite, delta: f32) {
        if self.duration <= 0.0 {
            sprite.texture = Texture::EMPTY;
            return;
        }

        self.elapsed += delta;
        if self.elapsed >= self.duration {
            let looping = self.animation.as_ref().is_some_and(|anim| anim.loop_animation);
            if looping {
                self.elapsed %= self.duration;
            } else {
                // Hold on the final frame.
                self.elapsed = self.duration - 0.000_001;
            }
        }

        let last = self.frame_count().saturating_sub(1);
        let frame = ((self.elapsed * self.framerate + 0.000_000_1) as usize).min(last);
        sprite.texture = self.frame_texture(frame);
    }
}
