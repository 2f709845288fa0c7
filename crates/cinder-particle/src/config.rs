//! Particle configuration loading and validation.
//!
//! A [`ParticleConfig`] is the serialized form an emitter file carries. It is
//! validated once by [`ParticleConfig::build`] into an immutable
//! [`ParticleTemplate`], whose curves are shared by every particle spawned
//! from it. Missing fields take the defaults of a plain white particle that
//! stands still for one second.
//!
//! ```
//! use cinder_particle::config::ParticleConfig;
//!
//! let template = ParticleConfig::from_toml_str(r##"
//!     max_life = 2.0
//!
//!     [alpha]
//!     list = [{ time = 0.0, value = 1.0 }, { time = 1.0, value = 0.0 }]
//!
//!     [color]
//!     list = [{ time = 0.0, value = "#ff0000" }, { time = 1.0, value = "#0000ff" }]
//! "##)
//! .unwrap();
//! assert_eq!(template.max_life(), 2.0);
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cinder_common::{ConfigError, SchemaVersion, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::color::Rgb;
use crate::curve::{Keyframe, KeyframeCurve, Sample};
use crate::ease::{Ease, EaseSegment, SegmentedEase};

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How progress is reshaped, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseConfig {
    /// A built-in ease by name, e.g. `"quad_in"`
    Named(String),
    /// Piecewise quadratic bezier segments
    Segments(Vec<EaseSegment>),
}

impl EaseConfig {
    /// Resolves this entry into an [`Ease`].
    pub fn build(&self) -> ConfigResult<Ease> {
        match self {
            Self::Named(name) => {
                Ease::named(name).ok_or_else(|| ConfigError::UnknownEase(name.clone()))
            }
            Self::Segments(segments) => SegmentedEase::new(segments.clone()).map(Ease::Segmented),
        }
    }
}

/// One curve channel as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig<V> {
    /// Keyframes over normalized life
    pub list: Vec<Sample<V>>,
    /// Hold each value until the next keyframe instead of blending
    #[serde(default)]
    pub stepped: bool,
    /// Resample a color curve into this many flat bands
    #[serde(default)]
    pub steps: Option<usize>,
    /// Per-curve progress reshaping
    #[serde(default)]
    pub ease: Option<EaseConfig>,
}

impl<V> CurveConfig<V> {
    /// A single value for the whole life.
    #[must_use]
    pub fn constant(value: V) -> Self {
        Self {
            list: vec![Sample::new(0.0, value)],
            stepped: false,
            steps: None,
            ease: None,
        }
    }
}

impl<V: Keyframe> CurveConfig<V> {
    fn build_curve(&self, channel: &'static str) -> ConfigResult<KeyframeCurve<V>> {
        let curve = KeyframeCurve::new(self.list.clone())
            .map_err(|source| ConfigError::Curve { channel, source })?
            .with_stepped(self.stepped);
        match &self.ease {
            Some(ease) => Ok(curve.with_ease(ease.build()?)),
            None => Ok(curve),
        }
    }
}

/// Serialized particle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Schema version the file was written against
    pub version: SchemaVersion,
    /// Lifetime in seconds
    pub max_life: f32,
    /// Initial heading and rotation, in degrees
    pub start_rotation_deg: f32,
    /// Rotation speed in degrees/second
    pub rotation_speed_deg: f32,
    /// Keep rotation at zero
    pub no_rotation: bool,
    /// Opacity over life
    pub alpha: CurveConfig<f32>,
    /// Uniform scale over life
    pub scale: CurveConfig<f32>,
    /// Speed along the initial heading over life
    pub speed: CurveConfig<f32>,
    /// Tint over life
    pub color: CurveConfig<Rgb>,
    /// Multiplier applied to the speed curve
    pub speed_multiplier: f32,
    /// Multiplier applied to the scale curve
    pub scale_multiplier: f32,
    /// Constant acceleration, used only when speed is not animated
    pub acceleration: [f32; 2],
    /// Speed cap under acceleration; absent means uncapped
    pub max_speed: Option<f32>,
    /// Progress reshaping for all channels
    pub ease: Option<EaseConfig>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            version: SchemaVersion::PARTICLE_CONFIG,
            max_life: 1.0,
            start_rotation_deg: 0.0,
            rotation_speed_deg: 0.0,
            no_rotation: false,
            alpha: CurveConfig::constant(1.0),
            scale: CurveConfig::constant(1.0),
            speed: CurveConfig::constant(0.0),
            color: CurveConfig::constant(Rgb::WHITE),
            speed_multiplier: 1.0,
            scale_multiplier: 1.0,
            acceleration: [0.0, 0.0],
            max_speed: None,
            ease: None,
        }
    }
}

impl ParticleConfig {
    /// Parses a RON document and builds a template from it.
    pub fn from_ron_str(text: &str) -> ConfigResult<ParticleTemplate> {
        let config: Self = ron::from_str(text)?;
        config.build()
    }

    /// Parses a TOML document and builds a template from it.
    pub fn from_toml_str(text: &str) -> ConfigResult<ParticleTemplate> {
        let config: Self = toml::from_str(text)?;
        config.build()
    }

    /// Loads a `.ron` or `.toml` file and builds a template from it.
    pub fn load(path: &Path) -> ConfigResult<ParticleTemplate> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let content = fs::read_to_string(path)?;
        let template = match extension.as_str() {
            "ron" => Self::from_ron_str(&content)?,
            "toml" => Self::from_toml_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        info!("Loaded particle config from {:?}", path);
        Ok(template)
    }

    /// Checks scalar fields and the schema version.
    pub fn validate(&self) -> ConfigResult<()> {
        if !SchemaVersion::PARTICLE_CONFIG.is_compatible_with(&self.version) {
            return Err(ConfigError::VersionMismatch {
                expected: SchemaVersion::PARTICLE_CONFIG.to_string(),
                actual: self.version.to_string(),
            });
        }

        if !self.max_life.is_finite() || self.max_life <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "max_life must be positive, got {}",
                self.max_life
            )));
        }

        let finite = [
            ("start_rotation_deg", self.start_rotation_deg),
            ("rotation_speed_deg", self.rotation_speed_deg),
            ("speed_multiplier", self.speed_multiplier),
            ("scale_multiplier", self.scale_multiplier),
            ("acceleration.x", self.acceleration[0]),
            ("acceleration.y", self.acceleration[1]),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if let Some(max_speed) = self.max_speed {
            if max_speed.is_nan() {
                return Err(ConfigError::Validation(
                    "max_speed must be a number; omit it to disable the cap".to_string(),
                ));
            }
        }

        for (name, steps) in [
            ("alpha", self.alpha.steps),
            ("scale", self.scale.steps),
            ("speed", self.speed.steps),
        ] {
            if steps.is_some() {
                return Err(ConfigError::Validation(format!(
                    "steps only applies to the color curve, found on {name}"
                )));
            }
        }

        if self.color.steps.is_some() && self.color.ease.is_some() {
            return Err(ConfigError::Validation(
                "color steps resample the curve linearly; remove ease or steps".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates this config and builds a shareable template.
    pub fn build(&self) -> ConfigResult<ParticleTemplate> {
        self.validate()?;

        let alpha = self.alpha.build_curve("alpha")?;
        let scale = self.scale.build_curve("scale")?;
        let speed = self.speed.build_curve("speed")?;
        let mut color = self.color.build_curve("color")?;
        if let Some(steps) = self.color.steps {
            color = color
                .stepped_gradient(steps)
                .map_err(|source| ConfigError::Curve {
                    channel: "color",
                    source,
                })?;
        }

        let ease = self.ease.as_ref().map(EaseConfig::build).transpose()?;
        let acceleration = Vec2::from(self.acceleration);

        if !speed.is_constant() && acceleration != Vec2::ZERO {
            warn!("Particle speed curve is animated; acceleration will be ignored");
        }
        if self.max_speed.is_some() && acceleration == Vec2::ZERO {
            warn!("Particle max_speed has no effect without acceleration");
        }

        debug!(
            max_life = self.max_life,
            alpha_keys = alpha.len(),
            scale_keys = scale.len(),
            speed_keys = speed.len(),
            color_keys = color.len(),
            "Built particle template"
        );

        Ok(ParticleTemplate {
            max_life: self.max_life,
            start_rotation_deg: self.start_rotation_deg,
            rotation_speed_deg: self.rotation_speed_deg,
            no_rotation: self.no_rotation,
            speed_multiplier: self.speed_multiplier,
            scale_multiplier: self.scale_multiplier,
            acceleration,
            max_speed: self.max_speed.unwrap_or(f32::NAN),
            ease,
            alpha: Arc::new(alpha),
            scale: Arc::new(scale),
            speed: Arc::new(speed),
            color: Arc::new(color),
        })
    }
}

/// Validated, immutable particle configuration.
///
/// Cloning is cheap; curves are shared.
#[derive(Debug, Clone)]
pub struct ParticleTemplate {
    max_life: f32,
    start_rotation_deg: f32,
    rotation_speed_deg: f32,
    no_rotation: bool,
    speed_multiplier: f32,
    scale_multiplier: f32,
    acceleration: Vec2,
    max_speed: f32,
    ease: Option<Ease>,
    alpha: Arc<KeyframeCurve<f32>>,
    scale: Arc<KeyframeCurve<f32>>,
    speed: Arc<KeyframeCurve<f32>>,
    color: Arc<KeyframeCurve<Rgb>>,
}

impl ParticleTemplate {
    /// Lifetime in seconds.
    #[must_use]
    pub fn max_life(&self) -> f32 {
        self.max_life
    }

    /// Initial heading and rotation, in degrees.
    #[must_use]
    pub fn start_rotation_deg(&self) -> f32 {
        self.start_rotation_deg
    }

    /// Rotation speed in degrees/second.
    #[must_use]
    pub fn rotation_speed_deg(&self) -> f32 {
        self.rotation_speed_deg
    }

    /// Whether rotation is locked at zero.
    #[must_use]
    pub fn no_rotation(&self) -> bool {
        self.no_rotation
    }

    /// Multiplier applied to the speed curve.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Multiplier applied to the scale curve.
    #[must_use]
    pub fn scale_multiplier(&self) -> f32 {
        self.scale_multiplier
    }

    /// Constant acceleration.
    #[must_use]
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Speed cap; NaN when uncapped.
    #[must_use]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Progress reshaping for all channels.
    #[must_use]
    pub fn ease(&self) -> Option<&Ease> {
        self.ease.as_ref()
    }

    /// Shared alpha curve.
    #[must_use]
    pub fn alpha_curve(&self) -> Arc<KeyframeCurve<f32>> {
        Arc::clone(&self.alpha)
    }

    /// Shared scale curve.
    #[must_use]
    pub fn scale_curve(&self) -> Arc<KeyframeCurve<f32>> {
        Arc::clone(&self.scale)
    }

    /// Shared speed curve.
    #[must_use]
    pub fn speed_curve(&self) -> Arc<KeyframeCurve<f32>> {
        Arc::clone(&self.speed)
    }

    /// Shared color curve.
    #[must_use]
    pub fn color_curve(&self) -> Arc<KeyframeCurve<Rgb>> {
        Arc::clone(&self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Tint;
    use crate::particle::Particle;
    use cinder_common::{CurveError, ParticleHandle};
    use std::io::Write;

    const FIRE_RON: &str = r##"(
        max_life: 2.0,
        start_rotation_deg: 90.0,
        acceleration: (0.0, 10.0),
        max_speed: Some(40.0),
        alpha: (list: [(time: 0.0, value: 1.0), (time: 1.0, value: 0.0)]),
        color: (
            list: [(time: 0.0, value: "#ff0000"), (time: 1.0, value: "#0000ff")],
        ),
        ease: Some(named("quad_out")),
    )"##;

    const SMOKE_TOML: &str = r##"
        max_life = 3.0
        scale_multiplier = 2.0

        [version]
        major = 1
        minor = 0
        patch = 0

        [scale]
        list = [{ time = 0.0, value = 0.5 }, { time = 1.0, value = 1.5 }]

        [speed]
        list = [{ time = 0.0, value = 20.0 }, { time = 1.0, value = 5.0 }]
        ease = { segments = [{ s = 0.0, cp = 0.8, e = 1.0 }] }
    "##;

    #[test]
    fn test_defaults_build() {
        let template = ParticleConfig::default().build().unwrap();
        assert_eq!(template.max_life(), 1.0);
        assert!(template.max_speed().is_nan());
        assert!(template.alpha_curve().is_constant());
        assert_eq!(template.color_curve().first(), Rgb::WHITE);
    }

    #[test]
    fn test_ron_config() {
        let template = ParticleConfig::from_ron_str(FIRE_RON).unwrap();
        assert_eq!(template.max_life(), 2.0);
        assert_eq!(template.acceleration(), Vec2::new(0.0, 10.0));
        assert_eq!(template.max_speed(), 40.0);
        assert!(template.ease().is_some());
        assert_eq!(template.color_curve().len(), 2);
        assert_eq!(template.color_curve().last(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_toml_config() {
        let template = ParticleConfig::from_toml_str(SMOKE_TOML).unwrap();
        assert_eq!(template.scale_multiplier(), 2.0);
        assert!(template.speed_curve().ease().is_some());
        assert!(template.alpha_curve().is_constant());
    }

    #[test]
    fn test_template_drives_particle() {
        let template = ParticleConfig::from_ron_str(FIRE_RON).unwrap();
        let mut particle = Particle::default();
        particle.apply_template(&template);
        particle.init();
        assert_eq!(particle.sprite.tint, Tint(0xFF_0000));
        assert!(particle.flags().acceleration);

        let mut recycled: Vec<ParticleHandle> = Vec::new();
        particle.update(0.5, &mut recycled);
        assert!(particle.velocity.length() <= 40.0);
        assert!(particle.sprite.alpha < 1.0);
    }

    #[test]
    fn test_rejects_non_positive_life() {
        let config = ParticleConfig {
            max_life: 0.0,
            ..ParticleConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::Validation(_))));

        let config = ParticleConfig {
            max_life: f32::INFINITY,
            ..ParticleConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_curve_with_channel_name() {
        let config = ParticleConfig {
            alpha: CurveConfig {
                list: vec![Sample::new(0.0, 1.0), Sample::new(0.5, 0.0)],
                stepped: false,
                steps: None,
                ease: None,
            },
            ..ParticleConfig::default()
        };
        match config.build() {
            Err(ConfigError::Curve { channel, source }) => {
                assert_eq!(channel, "alpha");
                assert_eq!(
                    source,
                    CurveError::IncompleteSpan {
                        first: 0.0,
                        last: 0.5
                    }
                );
            }
            other => panic!("expected curve error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_ease() {
        let config = ParticleConfig {
            ease: Some(EaseConfig::Named("wobble".to_string())),
            ..ParticleConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::UnknownEase(name)) if name == "wobble"
        ));
    }

    #[test]
    fn test_rejects_newer_schema() {
        let config = ParticleConfig {
            version: SchemaVersion::new(1, 3, 0),
            ..ParticleConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_steps_only_on_color() {
        let mut config = ParticleConfig::default();
        config.alpha.steps = Some(4);
        assert!(matches!(config.build(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_color_steps_build_stepped_gradient() {
        let mut config = ParticleConfig::default();
        config.color = CurveConfig {
            list: vec![
                Sample::new(0.0, Rgb::new(0, 0, 0)),
                Sample::new(1.0, Rgb::new(255, 255, 255)),
            ],
            stepped: false,
            steps: Some(4),
            ease: None,
        };
        let curve = config.build().unwrap().color_curve();
        assert!(curve.is_stepped());
        assert_eq!(curve.len(), 4);

        config.color.steps = Some(1);
        assert!(matches!(
            config.build(),
            Err(ConfigError::Curve {
                channel: "color",
                source: CurveError::TooFewSteps(1)
            })
        ));
    }

    #[test]
    fn test_color_steps_reject_curve_ease() {
        let mut config = ParticleConfig::default();
        config.color = CurveConfig {
            list: vec![
                Sample::new(0.0, Rgb::new(0, 0, 0)),
                Sample::new(1.0, Rgb::new(255, 255, 255)),
            ],
            stepped: false,
            steps: Some(4),
            ease: Some(EaseConfig::Named("quad_in".to_string())),
        };
        assert!(matches!(config.build(), Err(ConfigError::Validation(_))));

        config.color.steps = None;
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_invalid_color_string() {
        let text = r#"
            [color]
            list = [{ time = 0.0, value = "not-a-color" }]
        "#;
        assert!(matches!(
            ParticleConfig::from_toml_str(text),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let ron_path = dir.path().join("fire.ron");
        fs::write(&ron_path, FIRE_RON).unwrap();
        assert_eq!(ParticleConfig::load(&ron_path).unwrap().max_life(), 2.0);

        let toml_path = dir.path().join("smoke.TOML");
        let mut file = fs::File::create(&toml_path).unwrap();
        file.write_all(SMOKE_TOML.as_bytes()).unwrap();
        drop(file);
        assert_eq!(ParticleConfig::load(&toml_path).unwrap().max_life(), 3.0);

        let json_path = dir.path().join("spark.json");
        fs::write(&json_path, "{}").unwrap();
        assert!(matches!(
            ParticleConfig::load(&json_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            ParticleConfig::load(&dir.path().join("missing.ron")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        file.write_all(b"(max_life: )").unwrap();
        assert!(matches!(
            ParticleConfig::load(file.path()),
            Err(ConfigError::Ron(_))
        ));
    }
}
