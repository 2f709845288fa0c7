//! Easing functions that reshape normalized life progress.
//!
//! An [`Ease`] is a plain value: a function pointer or a shared, immutable
//! list of bezier segments. It carries no mutable state, so one ease can be
//! cloned into every particle spawned from a template.

use std::f32::consts::PI;
use std::sync::Arc;

use cinder_common::ConfigError;
use serde::{Deserialize, Serialize};

/// Ease taking normalized progress and returning reshaped progress.
pub type NormalizedEaseFn = fn(f32) -> f32;

/// Penner-style ease: `(time, begin, change, duration)`.
pub type PennerEaseFn = fn(f32, f32, f32, f32) -> f32;

/// A progress reshaping function.
#[derive(Debug, Clone)]
pub enum Ease {
    /// One-argument normalized form.
    Normalized(NormalizedEaseFn),
    /// Four-argument form, called as `f(t, 0, 1, 1)`.
    Penner(PennerEaseFn),
    /// Piecewise quadratic bezier segments.
    Segmented(SegmentedEase),
}

impl Ease {
    /// Reshapes progress `t`.
    #[inline]
    #[must_use]
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Self::Normalized(f) => f(t),
            Self::Penner(f) => f(t, 0.0, 1.0, 1.0),
            Self::Segmented(segments) => segments.apply(t),
        }
    }

    /// Looks up a named ease from the built-in library.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        EaseKind::from_name(name).map(|kind| Self::Normalized(kind.as_fn()))
    }
}

impl From<EaseKind> for Ease {
    fn from(kind: EaseKind) -> Self {
        Self::Normalized(kind.as_fn())
    }
}

/// One quadratic bezier piece of a segmented ease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EaseSegment {
    /// Start value
    pub s: f32,
    /// Control point
    pub cp: f32,
    /// End value
    pub e: f32,
}

impl EaseSegment {
    /// Creates a segment.
    #[must_use]
    pub const fn new(s: f32, cp: f32, e: f32) -> Self {
        Self { s, cp, e }
    }
}

/// Ease built from evenly spaced quadratic bezier segments.
///
/// The unit interval is split into as many equal spans as there are
/// segments; each span evaluates its own segment.
#[derive(Debug, Clone)]
pub struct SegmentedEase {
    segments: Arc<[EaseSegment]>,
}

impl SegmentedEase {
    /// Builds a segmented ease. At least one segment is required.
    pub fn new(segments: Vec<EaseSegment>) -> Result<Self, ConfigError> {
        if segments.is_empty() {
            return Err(ConfigError::Validation(
                "segmented ease needs at least one segment".to_string(),
            ));
        }
        Ok(Self {
            segments: segments.into(),
        })
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Evaluates the ease at `time`.
    #[must_use]
    pub fn apply(&self, time: f32) -> f32 {
        let qty = self.segments.len();
        let last = qty.saturating_sub(1);
        // Clamp the span index so time == 1 evaluates the end of the last span.
        let index = ((qty as f32 * time).max(0.0) as usize).min(last);
        let t = (time - index as f32 / qty as f32) * qty as f32;
        let seg = self.segments[index];
        seg.s + t * (2.0 * (1.0 - t) * (seg.cp - seg.s) + t * (seg.e - seg.s))
    }
}

/// Named eases available to configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseKind {
    /// No reshaping.
    Linear,
    /// Quadratic ease in.
    QuadIn,
    /// Quadratic ease out.
    QuadOut,
    /// Quadratic ease in-out.
    QuadInOut,
    /// Cubic ease in.
    CubicIn,
    /// Cubic ease out.
    CubicOut,
    /// Cubic ease in-out.
    CubicInOut,
    /// Sine ease in.
    SineIn,
    /// Sine ease out.
    SineOut,
    /// Sine ease in-out.
    SineInOut,
    /// Exponential ease in.
    ExpoIn,
    /// Exponential ease out.
    ExpoOut,
    /// Back ease out (overshoots end).
    BackOut,
}

impl EaseKind {
    /// Parses a snake_case name such as `quad_out`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "linear" => Self::Linear,
            "quad_in" => Self::QuadIn,
            "quad_out" => Self::QuadOut,
            "quad_in_out" => Self::QuadInOut,
            "cubic_in" => Self::CubicIn,
            "cubic_out" => Self::CubicOut,
            "cubic_in_out" => Self::CubicInOut,
            "sine_in" => Self::SineIn,
            "sine_out" => Self::SineOut,
            "sine_in_out" => Self::SineInOut,
            "expo_in" => Self::ExpoIn,
            "expo_out" => Self::ExpoOut,
            "back_out" => Self::BackOut,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the corresponding function pointer.
    #[must_use]
    pub fn as_fn(self) -> NormalizedEaseFn {
        match self {
            Self::Linear => linear,
            Self::QuadIn => quad_in,
            Self::QuadOut => quad_out,
            Self::QuadInOut => quad_in_out,
            Self::CubicIn => cubic_in,
            Self::CubicOut => cubic_out,
            Self::CubicInOut => cubic_in_out,
            Self::SineIn => sine_in,
            Self::SineOut => sine_out,
            Self::SineInOut => sine_in_out,
            Self::ExpoIn => expo_in,
            Self::ExpoOut => expo_out,
            Self::BackOut => back_out,
        }
    }
}

const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Linear (identity).
#[inline]
#[must_use]
pub fn linear(t: f32) -> f32 {
    t
}

/// Quadratic ease in.
#[inline]
#[must_use]
pub fn quad_in(t: f32) -> f32 {
    t * t
}

/// Quadratic ease out.
#[inline]
#[must_use]
pub fn quad_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease in-out.
#[inline]
#[must_use]
pub fn quad_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease in.
#[inline]
#[must_use]
pub fn cubic_in(t: f32) -> f32 {
    t * t * t
}

/// Cubic ease out.
#[inline]
#[must_use]
pub fn cubic_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease in-out.
#[inline]
#[must_use]
pub fn cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Sine ease in.
#[inline]
#[must_use]
pub fn sine_in(t: f32) -> f32 {
    1.0 - (t * PI / 2.0).cos()
}

/// Sine ease out.
#[inline]
#[must_use]
pub fn sine_out(t: f32) -> f32 {
    (t * PI / 2.0).sin()
}

/// Sine ease in-out.
#[inline]
#[must_use]
pub fn sine_in_out(t: f32) -> f32 {
    -(t * PI).cos() / 2.0 + 0.5
}

/// Exponential ease in.
#[inline]
#[must_use]
pub fn expo_in(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * t - 10.0)
    }
}

/// Exponential ease out.
#[inline]
#[must_use]
pub fn expo_out(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

/// Back ease out.
#[inline]
#[must_use]
pub fn back_out(t: f32) -> f32 {
    1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
}

/// Penner linear tween.
#[inline]
#[must_use]
pub fn penner_linear(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c * t / d + b
}

/// Penner quadratic ease in.
#[inline]
#[must_use]
pub fn penner_quad_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t + b
}
