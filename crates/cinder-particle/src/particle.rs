//! Particle lifecycle and per-frame integration.
//!
//! # Lifecycle
//!
//! ```text
//! ┌───────────────┐ init ┌────────┐ age >= max_life ┌──────┐ recycle ┌──────┐
//! │ Uninitialized │─────▶│ Active │────────────────▶│ Dead │────────▶│ pool │
//! └───────────────┘      └────────┘                 └──────┘         └──────┘
//!                            ▲                                           │
//!                            └──────────────────── init ─────────────────┘
//! ```
//!
//! `destroy` consumes the particle, so nothing can touch it afterwards.
//!
//! # Example
//!
//! ```
//! use cinder_common::{ParticleHandle, Vec2};
//! use cinder_particle::curve::CurveSampler;
//! use cinder_particle::particle::{Particle, DEATH_SENTINEL};
//!
//! let mut particle = Particle::default();
//! particle.max_life = 2.0;
//! particle.speed_curve = CurveSampler::constant(5.0);
//! particle.init();
//!
//! let mut recycled: Vec<ParticleHandle> = Vec::new();
//! assert_eq!(particle.update(1.0, &mut recycled), 0.5);
//! assert_eq!(particle.position(), Vec2::new(5.0, 0.0));
//! assert_eq!(particle.update(1.0, &mut recycled), DEATH_SENTINEL);
//! assert_eq!(recycled.len(), 1);
//! ```

use cinder_common::{
    clamp_length, heading, is_valid_limit, unit_heading, ParticleHandle, Vec2, DEG_TO_RAD,
};
use tracing::trace;

use crate::behavior::{ParticleBehavior, StaticArt};
use crate::color::Rgb;
use crate::config::ParticleTemplate;
use crate::curve::CurveSampler;
use crate::ease::Ease;
use crate::sprite::{DisplayTree, Sprite};

/// Returned by [`Particle::update`] on the frame the particle dies.
pub const DEATH_SENTINEL: f32 = -1.0;

/// Pooling collaborator that takes back dead particles.
pub trait Recycler {
    /// Takes ownership of the particle in slot `handle`.
    fn recycle(&mut self, handle: ParticleHandle);
}

impl Recycler for Vec<ParticleHandle> {
    fn recycle(&mut self, handle: ParticleHandle) {
        self.push(handle);
    }
}

/// Lifecycle state of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LifecycleState {
    /// Never initialized.
    #[default]
    Uninitialized = 0,
    /// Alive and updating.
    Active = 1,
    /// Died and handed to the recycler.
    Dead = 2,
}

impl LifecycleState {
    /// Check if the particle is alive.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Which channels and integrators run this life. Fixed at `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionFlags {
    /// Alpha curve is animated
    pub alpha: bool,
    /// Scale curve is animated
    pub scale: bool,
    /// Speed curve is animated; overrides acceleration
    pub speed: bool,
    /// Acceleration is non-zero and the speed curve is not animated
    pub acceleration: bool,
    /// Color curve is animated
    pub color: bool,
    /// Position integration runs at all
    pub normal_movement: bool,
}

/// A single simulated particle.
///
/// Public fields are the configuration surface the emitter fills in before
/// [`init`](Self::init). Angles in configuration are in degrees.
#[derive(Debug, Clone)]
pub struct Particle<B: ParticleBehavior = StaticArt> {
    /// Render state: position, rotation, scale, alpha, tint, texture
    pub sprite: Sprite,
    /// Current velocity (units/second)
    pub velocity: Vec2,
    /// Constant acceleration (units/second²)
    pub acceleration: Vec2,
    /// Speed cap under acceleration; NaN, zero or negative disables it
    pub max_speed: f32,
    /// Lifetime in seconds; must be positive
    pub max_life: f32,
    /// Initial heading and rotation, in degrees
    pub start_rotation_deg: f32,
    /// Rotation speed in degrees/second
    pub rotation_speed_deg: f32,
    /// Keep rotation at zero and never face the velocity
    pub no_rotation: bool,
    /// Multiplier applied to the speed curve
    pub speed_multiplier: f32,
    /// Multiplier applied to the scale curve
    pub scale_multiplier: f32,
    /// Progress reshaping shared by all channels
    pub ease: Option<Ease>,
    /// Alpha channel
    pub alpha_curve: CurveSampler<f32>,
    /// Scale channel
    pub scale_curve: CurveSampler<f32>,
    /// Speed channel
    pub speed_curve: CurveSampler<f32>,
    /// Tint channel
    pub color_curve: CurveSampler<Rgb>,
    age: f32,
    one_over_life: f32,
    rotation_speed: f32,
    direction: Vec2,
    flags: MotionFlags,
    state: LifecycleState,
    handle: ParticleHandle,
    behavior: B,
}

impl Default for Particle<StaticArt> {
    fn default() -> Self {
        Self::new(ParticleHandle::NULL, StaticArt)
    }
}

impl<B: ParticleBehavior> Particle<B> {
    /// Creates an uninitialized particle for slot `handle`.
    #[must_use]
    pub fn new(handle: ParticleHandle, behavior: B) -> Self {
        Self {
            sprite: Sprite::default(),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            max_speed: f32::NAN,
            max_life: 1.0,
            start_rotation_deg: 0.0,
            rotation_speed_deg: 0.0,
            no_rotation: false,
            speed_multiplier: 1.0,
            scale_multiplier: 1.0,
            ease: None,
            alpha_curve: CurveSampler::constant(1.0),
            scale_curve: CurveSampler::constant(1.0),
            speed_curve: CurveSampler::constant(0.0),
            color_curve: CurveSampler::constant(Rgb::WHITE),
            age: 0.0,
            one_over_life: 1.0,
            rotation_speed: 0.0,
            direction: Vec2::X,
            flags: MotionFlags::default(),
            state: LifecycleState::Uninitialized,
            handle,
            behavior,
        }
    }

    /// Copies a validated template into the configuration surface.
    pub fn apply_template(&mut self, template: &ParticleTemplate) {
        self.max_life = template.max_life();
        self.start_rotation_deg = template.start_rotation_deg();
        self.rotation_speed_deg = template.rotation_speed_deg();
        self.no_rotation = template.no_rotation();
        self.speed_multiplier = template.speed_multiplier();
        self.scale_multiplier = template.scale_multiplier();
        self.acceleration = template.acceleration();
        self.max_speed = template.max_speed();
        self.ease = template.ease().cloned();
        self.alpha_curve = CurveSampler::new(template.alpha_curve());
        self.scale_curve = CurveSampler::new(template.scale_curve());
        self.speed_curve = CurveSampler::new(template.speed_curve());
        self.color_curve = CurveSampler::new(template.color_curve());
    }

    /// Assigns art through the behavior; `None` shows the empty placeholder.
    pub fn apply_art(&mut self, art: Option<B::Art>) {
        self.behavior.apply_art(&mut self.sprite, art);
    }

    /// Starts (or restarts) a life.
    ///
    /// Every piece of per-life state is recomputed from the configuration
    /// surface, so calling `init` twice in a row is the same as calling it
    /// once. `max_life` must be positive.
    pub fn init(&mut self) {
        debug_assert!(self.max_life > 0.0, "max_life must be positive");

        self.age = 0.0;

        let start_speed = self.speed_curve.first() * self.speed_multiplier;
        self.direction = unit_heading(self.start_rotation_deg);
        self.velocity = self.direction * start_speed;

        self.sprite.rotation = if self.no_rotation {
            0.0
        } else {
            self.start_rotation_deg * DEG_TO_RAD
        };
        self.rotation_speed = self.rotation_speed_deg * DEG_TO_RAD;

        self.sprite.alpha = self.alpha_curve.start_output();
        self.sprite.scale = Vec2::splat(self.scale_curve.start_output() * self.scale_multiplier);
        self.sprite.tint = self.color_curve.start_output();
        self.sprite.visible = true;

        let speed = self.speed_curve.is_animated();
        let acceleration = !speed && self.acceleration != Vec2::ZERO;
        self.flags = MotionFlags {
            alpha: self.alpha_curve.is_animated(),
            scale: self.scale_curve.is_animated(),
            speed,
            acceleration,
            color: self.color_curve.is_animated(),
            normal_movement: !self.behavior.controls_own_movement()
                && (speed || start_speed != 0.0 || acceleration),
        };

        self.one_over_life = 1.0 / self.max_life;

        self.alpha_curve.reset();
        self.scale_curve.reset();
        self.speed_curve.reset();
        self.color_curve.reset();

        self.behavior.on_init(&mut self.sprite, self.max_life);
        self.state = LifecycleState::Active;

        trace!(handle = self.handle.index(), max_life = self.max_life, "particle init");
    }

    /// Advances the particle by `delta` seconds.
    ///
    /// Returns this frame's progress in [0, 1], after easing, or
    /// [`DEATH_SENTINEL`] on the frame the particle dies. Death hands the
    /// particle to `recycler` exactly once.
    pub fn update(&mut self, delta: f32, recycler: &mut impl Recycler) -> f32 {
        if !self.state.is_active() {
            return DEATH_SENTINEL;
        }

        self.age += delta;
        if self.age >= self.max_life || self.age < 0.0 {
            self.kill(recycler);
            return DEATH_SENTINEL;
        }

        let mut lerp = self.age * self.one_over_life;
        if let Some(ease) = &self.ease {
            lerp = ease.apply(lerp).clamp(0.0, 1.0);
        }

        if self.flags.alpha {
            self.sprite.alpha = self.alpha_curve.interpolate(lerp);
        }
        if self.flags.scale {
            let scale = self.scale_curve.interpolate(lerp) * self.scale_multiplier;
            self.sprite.scale = Vec2::splat(scale);
        }

        let mut accelerated = false;
        if self.flags.normal_movement {
            if self.flags.speed {
                let speed = self.speed_curve.interpolate(lerp) * self.speed_multiplier;
                self.velocity = self.direction * speed;
            } else if self.flags.acceleration {
                self.velocity += self.acceleration * delta;
                if is_valid_limit(self.max_speed) {
                    self.velocity = clamp_length(self.velocity, self.max_speed);
                }
                accelerated = true;
            }
            self.sprite.position += self.velocity * delta;
        }

        if self.flags.color {
            self.sprite.tint = self.color_curve.interpolate(lerp);
        }

        if self.rotation_speed != 0.0 {
            self.sprite.rotation += self.rotation_speed * delta;
        } else if accelerated && !self.no_rotation {
            self.sprite.rotation = heading(self.velocity);
        }

        self.behavior.on_update(&mut self.sprite, delta);

        lerp
    }

    /// Ends this life and hands the particle to `recycler`.
    ///
    /// Only the lifecycle state changes; the recycler decides whether the
    /// particle is reinitialized or destroyed.
    pub fn kill(&mut self, recycler: &mut impl Recycler) {
        self.state = LifecycleState::Dead;
        trace!(handle = self.handle.index(), age = self.age, "particle died");
        recycler.recycle(self.handle);
    }

    /// Tears the particle down: detaches it from its display parent and
    /// releases its texture. The particle is consumed.
    pub fn destroy(mut self, display: &mut impl DisplayTree) {
        if let Some(parent) = self.sprite.parent.take() {
            display.remove_child(parent, self.handle);
        }
        self.sprite.release_texture();
        trace!(handle = self.handle.index(), "particle destroyed");
    }

    /// Seconds since `init`.
    #[must_use]
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Arena slot this particle occupies.
    #[must_use]
    pub fn handle(&self) -> ParticleHandle {
        self.handle
    }

    /// Channel flags computed by the last `init`.
    #[must_use]
    pub fn flags(&self) -> MotionFlags {
        self.flags
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.sprite.position
    }

    /// Sets the position; usually called by the emitter before `init`.
    pub fn set_position(&mut self, position: Vec2) {
        self.sprite.position = position;
    }

    /// Current rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.sprite.rotation
    }

    /// Rotation speed in radians/second for this life.
    #[must_use]
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// The behavior plugged into this particle.
    #[must_use]
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// Mutable access to the behavior.
    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::Texture;
    use crate::color::Tint;
    use crate::curve::{KeyframeCurve, Sample};
    use crate::ease::quad_in;
    use cinder_common::{AtlasId, ContainerId, TextureId};
    use proptest::prelude::*;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct CountingRecycler {
        handles: Vec<ParticleHandle>,
    }

    impl Recycler for CountingRecycler {
        fn recycle(&mut self, handle: ParticleHandle) {
            self.handles.push(handle);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingTree {
        removed: Vec<(ContainerId, ParticleHandle)>,
    }

    impl DisplayTree for RecordingTree {
        fn remove_child(&mut self, parent: ContainerId, child: ParticleHandle) {
            self.removed.push((parent, child));
        }
    }

    /// A behavior that moves itself.
    #[derive(Debug, Default)]
    struct SelfPropelled;

    impl ParticleBehavior for SelfPropelled {
        type Art = Texture;

        fn apply_art(&mut self, sprite: &mut Sprite, art: Option<Texture>) {
            sprite.texture = art.unwrap_or(Texture::EMPTY);
        }

        fn controls_own_movement(&self) -> bool {
            true
        }
    }

    fn scalar_curve(points: &[(f32, f32)]) -> CurveSampler<f32> {
        let samples = points.iter().map(|&(t, v)| Sample::new(t, v)).collect();
        CurveSampler::new(Arc::new(KeyframeCurve::new(samples).unwrap()))
    }

    #[test]
    fn test_constant_speed_scenario() {
        let mut particle = Particle::default();
        particle.max_life = 2.0;
        particle.speed_curve = CurveSampler::constant(5.0);
        particle.init();

        let mut recycler = CountingRecycler::default();
        let progress = particle.update(1.0, &mut recycler);
        assert!((progress - 0.5).abs() < f32::EPSILON);
        assert!((particle.position() - Vec2::new(5.0, 0.0)).length() < 1e-5);
        assert!(particle.state().is_active());
        assert!(recycler.handles.is_empty());

        assert_eq!(particle.update(1.0, &mut recycler), DEATH_SENTINEL);
        assert_eq!(recycler.handles.len(), 1);
        assert_eq!(particle.state(), LifecycleState::Dead);
    }

    #[test]
    fn test_death_recycles_exactly_once() {
        let mut particle = Particle::new(ParticleHandle::from_index(3), StaticArt);
        particle.max_life = 0.5;
        particle.init();

        let mut recycler = CountingRecycler::default();
        let results: Vec<f32> = (0..5).map(|_| particle.update(0.2, &mut recycler)).collect();

        assert!(results[0] >= 0.0 && results[1] >= 0.0);
        assert_eq!(results[2], DEATH_SENTINEL);
        assert_eq!(recycler.handles, vec![ParticleHandle::from_index(3)]);
    }

    #[test]
    fn test_acceleration_without_cap_grows_linearly() {
        let mut particle = Particle::default();
        particle.max_life = 5.0;
        particle.acceleration = Vec2::new(0.0, 10.0);
        particle.max_speed = f32::NAN;
        particle.init();
        assert!(particle.flags().acceleration);
        assert!(particle.flags().normal_movement);

        let mut recycler = CountingRecycler::default();
        for step in 1..=10 {
            particle.update(0.1, &mut recycler);
            assert!((particle.velocity.y - step as f32).abs() < 1e-4);
        }
        assert!(recycler.handles.is_empty());
    }

    #[test]
    fn test_max_speed_clamps_and_keeps_direction() {
        let mut particle = Particle::default();
        particle.max_life = 10.0;
        particle.acceleration = Vec2::new(30.0, 40.0);
        particle.max_speed = 10.0;
        particle.init();

        let mut recycler = CountingRecycler::default();
        for _ in 0..20 {
            particle.update(0.1, &mut recycler);
            assert!(particle.velocity.length() <= 10.0 + 1e-4);
        }
        let dir = particle.velocity.normalize();
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-4);
    }

    #[test]
    fn test_rotation_faces_velocity_under_acceleration() {
        let mut particle = Particle::default();
        particle.max_life = 10.0;
        particle.acceleration = Vec2::new(0.0, 10.0);
        particle.init();

        let mut recycler = CountingRecycler::default();
        particle.update(0.1, &mut recycler);
        assert!((particle.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_no_rotation_locks_orientation() {
        let mut particle = Particle::default();
        particle.max_life = 10.0;
        particle.start_rotation_deg = 45.0;
        particle.no_rotation = true;
        particle.acceleration = Vec2::new(0.0, 10.0);
        particle.init();
        assert_eq!(particle.rotation(), 0.0);

        let mut recycler = CountingRecycler::default();
        particle.update(0.1, &mut recycler);
        assert_eq!(particle.rotation(), 0.0);
    }

    #[test]
    fn test_rotation_speed_wins_over_facing() {
        let mut particle = Particle::default();
        particle.max_life = 10.0;
        particle.rotation_speed_deg = 90.0;
        particle.acceleration = Vec2::new(0.0, 10.0);
        particle.init();

        let mut recycler = CountingRecycler::default();
        particle.update(1.0, &mut recycler);
        assert!((particle.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        particle.update(1.0, &mut recycler);
        assert!((particle.rotation() - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_speed_curve_keeps_heading_and_overrides_acceleration() {
        let mut particle = Particle::default();
        particle.max_life = 1.0;
        particle.start_rotation_deg = 90.0;
        particle.speed_curve = scalar_curve(&[(0.0, 10.0), (1.0, 0.0)]);
        particle.acceleration = Vec2::new(100.0, 0.0);
        particle.init();
        assert!(particle.flags().speed);
        assert!(!particle.flags().acceleration);
        assert!((particle.velocity - Vec2::new(0.0, 10.0)).length() < 1e-4);

        let mut recycler = CountingRecycler::default();
        particle.update(0.25, &mut recycler);
        assert!((particle.velocity - Vec2::new(0.0, 7.5)).length() < 1e-4);
        particle.update(0.25, &mut recycler);
        assert!((particle.velocity - Vec2::new(0.0, 5.0)).length() < 1e-4);
        // Speed-curve motion never turns the particle.
        assert!((particle.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_constant_scale_gets_multiplier_at_init() {
        let mut particle = Particle::default();
        particle.max_life = 1.0;
        particle.scale_curve = CurveSampler::constant(1.5);
        particle.scale_multiplier = 2.0;
        particle.init();
        assert!(!particle.flags().scale);
        assert_eq!(particle.sprite.scale, Vec2::splat(3.0));

        let mut recycler = CountingRecycler::default();
        particle.update(0.5, &mut recycler);
        assert_eq!(particle.sprite.scale, Vec2::splat(3.0));
    }

    #[test]
    fn test_channels_follow_curves_with_multipliers() {
        let mut particle = Particle::default();
        particle.max_life = 4.0;
        particle.alpha_curve = scalar_curve(&[(0.0, 1.0), (1.0, 0.0)]);
        particle.scale_curve = scalar_curve(&[(0.0, 1.0), (1.0, 3.0)]);
        particle.scale_multiplier = 2.0;
        particle.color_curve = CurveSampler::new(Arc::new(
            KeyframeCurve::new(vec![
                Sample::new(0.0, Rgb::new(255, 0, 0)),
                Sample::new(1.0, Rgb::new(0, 0, 255)),
            ])
            .unwrap(),
        ));
        particle.init();
        assert_eq!(particle.sprite.alpha, 1.0);
        assert_eq!(particle.sprite.scale, Vec2::splat(2.0));
        assert_eq!(particle.sprite.tint, Tint(0xFF_0000));
        assert!(particle.sprite.visible);
        assert!(!particle.flags().normal_movement);

        let mut recycler = CountingRecycler::default();
        particle.update(2.0, &mut recycler);
        assert!((particle.sprite.alpha - 0.5).abs() < 1e-6);
        assert!((particle.sprite.scale.x - 4.0).abs() < 1e-5);
        assert_eq!(particle.sprite.scale.x, particle.sprite.scale.y);
        assert_eq!(particle.sprite.tint, Tint(0x7F_007F));
        assert_eq!(particle.position(), Vec2::ZERO);
    }

    #[test]
    fn test_ease_reshapes_progress_for_every_channel() {
        let mut particle = Particle::default();
        particle.max_life = 1.0;
        particle.ease = Some(Ease::Normalized(quad_in));
        particle.alpha_curve = scalar_curve(&[(0.0, 0.0), (1.0, 1.0)]);
        particle.scale_curve = scalar_curve(&[(0.0, 0.0), (1.0, 1.0)]);
        particle.init();

        let mut recycler = CountingRecycler::default();
        let progress = particle.update(0.5, &mut recycler);
        assert!((progress - 0.25).abs() < 1e-6);
        assert!((particle.sprite.alpha - 0.25).abs() < 1e-6);
        assert!((particle.sprite.scale.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_reinit_clears_previous_life() {
        let mut particle = Particle::default();
        particle.max_life = 1.0;
        particle.rotation_speed_deg = 180.0;
        particle.alpha_curve = scalar_curve(&[(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)]);
        particle.acceleration = Vec2::new(1.0, 0.0);
        particle.init();

        let mut recycler = CountingRecycler::default();
        particle.update(0.9, &mut recycler);
        assert!(particle.age() > 0.0);

        // Pool reuse with different settings, initialized twice. The alpha
        // cursor is left where the last life put it; init must rewind it.
        particle.acceleration = Vec2::ZERO;
        particle.init();
        particle.init();

        assert_eq!(particle.age(), 0.0);
        assert_eq!(particle.velocity, Vec2::ZERO);
        assert_eq!(particle.sprite.alpha, 1.0);
        assert!(!particle.flags().acceleration);
        assert!(!particle.flags().normal_movement);
        assert!((particle.rotation_speed() - std::f32::consts::PI).abs() < 1e-6);

        particle.update(0.25, &mut recycler);
        assert!((particle.sprite.alpha - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_self_propelled_behavior_skips_movement() {
        let mut particle = Particle::new(ParticleHandle::from_index(0), SelfPropelled);
        particle.max_life = 1.0;
        particle.speed_curve = CurveSampler::constant(50.0);
        particle.init();
        assert!(!particle.flags().normal_movement);

        let mut recycler = CountingRecycler::default();
        particle.update(0.5, &mut recycler);
        assert_eq!(particle.position(), Vec2::ZERO);
    }

    #[test]
    fn test_apply_art_none_uses_placeholder() {
        let mut particle = Particle::default();
        let texture = Texture::new(TextureId::new(5), AtlasId::new(1));
        particle.apply_art(Some(texture));
        assert_eq!(particle.sprite.texture, texture);
        particle.apply_art(None);
        assert!(particle.sprite.texture.is_empty());
    }

    #[test]
    fn test_destroy_detaches_from_parent() {
        let mut tree = RecordingTree::default();

        let mut attached = Particle::new(ParticleHandle::from_index(2), StaticArt);
        attached.sprite.parent = Some(ContainerId::new(7));
        attached.destroy(&mut tree);
        assert_eq!(
            tree.removed,
            vec![(ContainerId::new(7), ParticleHandle::from_index(2))]
        );

        let loose = Particle::new(ParticleHandle::from_index(3), StaticArt);
        loose.destroy(&mut tree);
        assert_eq!(tree.removed.len(), 1);
    }

    #[test]
    fn test_kill_hands_over_without_touching_motion() {
        let mut particle = Particle::new(ParticleHandle::from_index(9), StaticArt);
        particle.max_life = 1.0;
        particle.speed_curve = CurveSampler::constant(2.0);
        particle.init();
        let velocity = particle.velocity;

        let mut recycler = CountingRecycler::default();
        particle.kill(&mut recycler);
        assert_eq!(recycler.handles, vec![ParticleHandle::from_index(9)]);
        assert_eq!(particle.velocity, velocity);
        assert_eq!(particle.update(0.1, &mut recycler), DEATH_SENTINEL);
        assert_eq!(recycler.handles.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_dies_on_first_crossing(
            max_life in 0.05f32..5.0,
            deltas in prop::collection::vec(0.001f32..0.5, 1..200),
        ) {
            let mut particle = Particle::default();
            particle.max_life = max_life;
            particle.init();

            let mut recycler = CountingRecycler::default();
            let mut age = 0.0f32;
            for delta in deltas {
                let was_alive = particle.state().is_active();
                age += delta;
                let result = particle.update(delta, &mut recycler);
                if was_alive && age >= max_life {
                    prop_assert_eq!(result, DEATH_SENTINEL);
                    prop_assert_eq!(recycler.handles.len(), 1);
                } else if was_alive {
                    prop_assert!((0.0..=1.0 + 1e-5).contains(&result));
                }
                prop_assert!(recycler.handles.len() <= 1);
            }
        }

        #[test]
        fn prop_speed_curve_preserves_heading(
            degrees in -360.0f32..360.0,
            start in 1.0f32..50.0,
            end in 1.0f32..50.0,
        ) {
            let mut particle = Particle::default();
            particle.max_life = 1.0;
            particle.start_rotation_deg = degrees;
            particle.speed_curve = scalar_curve(&[(0.0, start), (1.0, end)]);
            particle.init();
            let heading = particle.velocity.normalize();

            let mut recycler = CountingRecycler::default();
            for _ in 0..9 {
                particle.update(0.1, &mut recycler);
                let now = particle.velocity.normalize();
                prop_assert!((now - heading).length() < 1e-4);
            }
        }
    }
}
