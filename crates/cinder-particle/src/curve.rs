//! Keyframe curves and per-particle samplers.
//!
//! A [`KeyframeCurve`] is immutable configuration data: an ordered list of
//! `(time, value)` samples over normalized life progress. Curves are shared
//! through `Arc` by every particle spawned from the same template.
//!
//! The forward-only cursor that makes sequential interpolation cheap lives in
//! a [`CurveSampler`], which each particle owns. Cursor state is never shared.
//!
//! ```
//! use std::sync::Arc;
//! use cinder_particle::curve::{CurveSampler, KeyframeCurve, Sample};
//!
//! let curve = KeyframeCurve::new(vec![Sample::new(0.0, 1.0), Sample::new(1.0, 0.0)]).unwrap();
//! let mut alpha = CurveSampler::new(Arc::new(curve));
//! assert!((alpha.interpolate(0.25) - 0.75).abs() < 1e-6);
//! assert_eq!(alpha.interpolate(1.0), 0.0);
//! ```

use std::sync::Arc;

use cinder_common::{lerp, CurveError};
use serde::{Deserialize, Serialize};

use crate::color::{Rgb, Tint};
use crate::ease::Ease;

/// A value that can be stored in a keyframe curve.
///
/// `Output` is what the renderer consumes; for colors that is the packed
/// [`Tint`], for scalars it is the scalar itself.
pub trait Keyframe: Copy {
    /// Interpolated output type.
    type Output: Copy;

    /// Output for a value taken straight from a sample.
    fn settle(self) -> Self::Output;

    /// Output between `a` (at `t == 0`) and `b` (at `t == 1`).
    fn blend(a: Self, b: Self, t: f32) -> Self::Output;
}

impl Keyframe for f32 {
    type Output = f32;

    #[inline]
    fn settle(self) -> f32 {
        self
    }

    #[inline]
    fn blend(a: Self, b: Self, t: f32) -> f32 {
        lerp(a, b, t)
    }
}

impl Keyframe for Rgb {
    type Output = Tint;

    #[inline]
    fn settle(self) -> Tint {
        self.to_tint()
    }

    #[inline]
    fn blend(a: Self, b: Self, t: f32) -> Tint {
        let (r, g, b) = blend_components(a, b, t);
        Tint::from_components(r, g, b)
    }
}

fn blend_components(a: Rgb, b: Rgb, t: f32) -> (f32, f32, f32) {
    (
        lerp(f32::from(a.r), f32::from(b.r), t),
        lerp(f32::from(a.g), f32::from(b.g), t),
        lerp(f32::from(a.b), f32::from(b.b), t),
    )
}

/// One keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample<V> {
    /// Normalized time in [0, 1]
    pub time: f32,
    /// Value at that time
    pub value: V,
}

impl<V> Sample<V> {
    /// Creates a sample.
    #[must_use]
    pub const fn new(time: f32, value: V) -> Self {
        Self { time, value }
    }
}

/// Ordered, immutable keyframe samples over normalized time.
#[derive(Debug, Clone)]
pub struct KeyframeCurve<V> {
    samples: Vec<Sample<V>>,
    ease: Option<Ease>,
    stepped: bool,
}

impl<V: Keyframe> KeyframeCurve<V> {
    /// Builds a curve, validating sample times.
    ///
    /// Times must be finite, within [0, 1] and non-decreasing. A curve with
    /// more than one sample must start at 0 and end at 1.
    pub fn new(samples: Vec<Sample<V>>) -> Result<Self, CurveError> {
        if samples.is_empty() {
            return Err(CurveError::Empty);
        }

        let mut previous = 0.0_f32;
        for (index, sample) in samples.iter().enumerate() {
            let time = sample.time;
            if !time.is_finite() || !(0.0..=1.0).contains(&time) {
                return Err(CurveError::TimeOutOfRange { index, time });
            }
            if time < previous {
                return Err(CurveError::Unordered {
                    index,
                    time,
                    previous,
                });
            }
            previous = time;
        }

        if samples.len() > 1 {
            let first = samples[0].time;
            let last = samples[samples.len() - 1].time;
            if first != 0.0 || last != 1.0 {
                return Err(CurveError::IncompleteSpan { first, last });
            }
        }

        Ok(Self {
            samples,
            ease: None,
            stepped: false,
        })
    }

    /// A curve holding one value for the whole lifetime.
    #[must_use]
    pub fn constant(value: V) -> Self {
        Self {
            samples: vec![Sample::new(0.0, value)],
            ease: None,
            stepped: false,
        }
    }

    /// Reshapes progress through `ease` before bracketing.
    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Holds each sample's value until the next sample time is passed.
    #[must_use]
    pub fn with_stepped(mut self, stepped: bool) -> Self {
        self.stepped = stepped;
        self
    }

    /// True for single-sample curves, which never need interpolation.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.samples.len() == 1
    }

    /// Whether the curve is stepped.
    #[must_use]
    pub fn is_stepped(&self) -> bool {
        self.stepped
    }

    /// The curve's own ease, if any.
    #[must_use]
    pub fn ease(&self) -> Option<&Ease> {
        self.ease.as_ref()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in time order.
    #[must_use]
    pub fn samples(&self) -> &[Sample<V>] {
        &self.samples
    }

    /// Value of the first sample.
    #[must_use]
    pub fn first(&self) -> V {
        self.samples[0].value
    }

    /// Value of the last sample.
    #[must_use]
    pub fn last(&self) -> V {
        self.samples[self.samples.len() - 1].value
    }

    /// Output at t = 0.
    #[must_use]
    pub fn start_output(&self) -> V::Output {
        self.first().settle()
    }

    /// Stateless evaluation from the first sample.
    #[must_use]
    pub fn sample(&self, t: f32) -> V::Output {
        let mut cursor = 0;
        self.evaluate_from(&mut cursor, t)
    }

    /// Evaluates at `t`, advancing `cursor` forward as needed.
    ///
    /// `cursor` indexes the sample at or before the last evaluated time and
    /// only ever moves forward; `t` must not decrease between calls that
    /// share a cursor.
    pub fn evaluate_from(&self, cursor: &mut usize, t: f32) -> V::Output {
        let samples = &self.samples;
        let last = samples.len() - 1;
        if last == 0 {
            return samples[0].value.settle();
        }

        // Endpoints are checked before easing so they come back exact.
        if t <= 0.0 {
            return samples[0].value.settle();
        }
        if t >= 1.0 {
            return samples[last].value.settle();
        }

        let t = match &self.ease {
            Some(ease) => ease.apply(t),
            None => t,
        };

        if self.stepped {
            while *cursor < last && t > samples[*cursor + 1].time {
                *cursor += 1;
            }
            return samples[*cursor].value.settle();
        }

        while *cursor + 1 < last && t > samples[*cursor + 1].time {
            *cursor += 1;
        }

        let current = samples[*cursor];
        let next = samples[*cursor + 1];
        let span = next.time - current.time;
        if span <= 0.0 {
            return next.value.settle();
        }
        let local = ((t - current.time) / span).clamp(0.0, 1.0);
        V::blend(current.value, next.value, local)
    }
}

impl KeyframeCurve<Rgb> {
    /// Resamples this color curve into `steps` evenly spaced stepped keys.
    ///
    /// Key `i` sits at time `i / steps` and holds the linearly interpolated
    /// color there, so the result jumps between flat bands of color. The
    /// source curve's ease is not carried over.
    pub fn stepped_gradient(&self, steps: usize) -> Result<Self, CurveError> {
        if steps < 2 {
            return Err(CurveError::TooFewSteps(steps));
        }

        let mut cursor = 0;
        let samples = (0..steps)
            .map(|i| {
                let time = i as f32 / steps as f32;
                Sample::new(time, self.rgb_from(&mut cursor, time))
            })
            .collect();

        Ok(Self {
            samples,
            ease: None,
            stepped: true,
        })
    }

    fn rgb_from(&self, cursor: &mut usize, t: f32) -> Rgb {
        let samples = &self.samples;
        let last = samples.len() - 1;
        if last == 0 {
            return samples[0].value;
        }
        while *cursor + 1 < last && t > samples[*cursor + 1].time {
            *cursor += 1;
        }
        let current = samples[*cursor];
        let next = samples[*cursor + 1];
        let span = next.time - current.time;
        if span <= 0.0 {
            return next.value;
        }
        let local = ((t - current.time) / span).clamp(0.0, 1.0);
        let (r, g, b) = blend_components(current.value, next.value, local);
        Tint::from_components(r, g, b).to_rgb()
    }
}

/// A particle's view of a shared curve: the curve plus a private cursor.
#[derive(Debug, Clone)]
pub struct CurveSampler<V> {
    curve: Arc<KeyframeCurve<V>>,
    cursor: usize,
}

impl<V: Keyframe> CurveSampler<V> {
    /// Creates a sampler positioned at the first sample.
    #[must_use]
    pub fn new(curve: Arc<KeyframeCurve<V>>) -> Self {
        Self { curve, cursor: 0 }
    }

    /// Sampler over a constant curve.
    #[must_use]
    pub fn constant(value: V) -> Self {
        Self::new(Arc::new(KeyframeCurve::constant(value)))
    }

    /// Interpolated output at progress `t`.
    ///
    /// `t` must be non-decreasing between calls until [`reset`](Self::reset).
    #[inline]
    pub fn interpolate(&mut self, t: f32) -> V::Output {
        self.curve.evaluate_from(&mut self.cursor, t)
    }

    /// Rewinds the cursor to the first sample.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The shared curve.
    #[must_use]
    pub fn curve(&self) -> &KeyframeCurve<V> {
        &self.curve
    }

    /// True when the curve has more than one sample.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.curve.is_constant()
    }

    /// Output at t = 0.
    #[must_use]
    pub fn start_output(&self) -> V::Output {
        self.curve.start_output()
    }

    /// Raw value of the first sample.
    #[must_use]
    pub fn first(&self) -> V {
        self.curve.first()
    }
}
