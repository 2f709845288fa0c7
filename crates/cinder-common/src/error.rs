//! Error types for Cinder.
//!
//! Only configuration-time code returns these. The per-frame path never
//! fails; it degrades instead.

use thiserror::Error;

/// Errors raised while building a keyframe curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// No samples were supplied
    #[error("curve has no samples")]
    Empty,

    /// A sample time is NaN, infinite, or outside [0, 1]
    #[error("sample {index} has time {time} outside [0, 1]")]
    TimeOutOfRange {
        /// Sample index
        index: usize,
        /// Offending time
        time: f32,
    },

    /// Sample times go backwards
    #[error("sample {index} at time {time} precedes previous time {previous}")]
    Unordered {
        /// Sample index
        index: usize,
        /// Offending time
        time: f32,
        /// Time of the preceding sample
        previous: f32,
    },

    /// A multi-sample curve does not start at 0 or end at 1
    #[error("curve must span [0, 1], got [{first}, {last}]")]
    IncompleteSpan {
        /// First sample time
        first: f32,
        /// Last sample time
        last: f32,
    },

    /// Stepped gradient requested with fewer than two steps
    #[error("stepped gradient needs at least 2 steps, got {0}")]
    TooFewSteps(usize),
}

/// Errors raised while loading or validating particle configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file
    #[error("Failed to read particle config: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse RON
    #[error("Failed to parse particle RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Failed to parse TOML
    #[error("Failed to parse particle TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither `.ron` nor `.toml`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A field holds a value the particle core cannot run with
    #[error("Particle config validation error: {0}")]
    Validation(String),

    /// A curve in the config is malformed
    #[error("Invalid {channel} curve: {source}")]
    Curve {
        /// Channel name (alpha, scale, speed, color)
        channel: &'static str,
        /// Underlying curve error
        source: CurveError,
    },

    /// A color string could not be parsed
    #[error("Invalid color {0:?}")]
    InvalidColor(String),

    /// An ease name is not in the easing library
    #[error("Unknown ease function: {0}")]
    UnknownEase(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}
