//! Construction-time invariant violations for the streaming world

use thiserror::Error;

/// Errors raised while building or configuring the streaming world.
///
/// Every variant describes a world design that cannot stream correctly. None of
/// them can occur once a world has been built, so `tick` never returns errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamingError {
    #[error("repeat period must be positive and finite, got {0}")]
    InvalidPeriod(f64),

    #[error("zone start {start} is after zone end {end}")]
    InvertedZone { start: f64, end: f64 },

    #[error("zone [{start}, {end}] does not fit inside the repeat period {period}")]
    ZoneOutsidePeriod { start: f64, end: f64, period: f64 },

    #[error("placement step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("recycle distance must be positive and finite, got {0}")]
    InvalidRecycleDistance(f64),

    #[error("recycle distance {distance} is not a multiple of the repeat period {period}")]
    NotPhaseLocked { distance: f64, period: f64 },

    #[error("tunnel recycle distance {distance} must equal the transition distance {transition}")]
    TunnelOutOfSync { distance: f64, transition: f64 },

    #[error(
        "transition zone length {zone} must be positive and shorter than the transition distance {transition}"
    )]
    InvalidTransitionZone { zone: f64, transition: f64 },

    #[error("pre-spawn epsilon {epsilon} must lie in (0, {zone})")]
    InvalidPreSpawnEpsilon { epsilon: f64, zone: f64 },

    #[error("initial position z={z} is not finite")]
    NonFinitePosition { z: f64 },

    #[error("invalid streaming config: {0}")]
    Config(String),
}

/// Result alias used by every fallible constructor in this crate
pub type StreamingResult<T> = Result<T, StreamingError>;
