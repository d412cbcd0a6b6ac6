//! Recyclable entities - the pooled world objects that scroll past the camera
//!
//! The camera sits at `z = 0` looking down +z. Every tick the world scrolls toward the
//! camera by `world_speed`; an entity that falls behind its recycle threshold jumps
//! forward by its recycle distance, so a bounded pool stands in for an endless road.

use crate::error::{StreamingError, StreamingResult};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Whether the renderer should draw an entity.
///
/// Hidden entities keep scrolling and recycling so that showing them again never
/// produces a jump in their positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Active,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Active
    }
}

/// Clamp a per-tick scroll speed into `[0, inf)`, mapping NaN and infinities to 0.
///
/// Silent on purpose: callers that own a whole tick log the clamp once.
#[inline]
pub fn clamp_world_speed(world_speed: f64) -> f64 {
    if world_speed.is_finite() && world_speed > 0.0 {
        world_speed
    } else {
        0.0
    }
}

/// A world object driven by streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecyclableEntity {
    /// World-space position relative to the camera; streaming only drives `z`
    pub position: DVec3,
    /// `z` below which the entity is behind the camera and must wrap
    pub recycle_threshold: f64,
    /// Distance added to `z` on wraparound (the span of the repeating tile)
    pub recycle_distance: f64,
    pub visibility: Visibility,
    frozen: bool,
}

impl RecyclableEntity {
    /// Create an entity, rejecting non-finite positions and degenerate recycle spans
    pub fn new(
        position: DVec3,
        recycle_threshold: f64,
        recycle_distance: f64,
    ) -> StreamingResult<Self> {
        if !position.is_finite() {
            return Err(StreamingError::NonFinitePosition { z: position.z });
        }
        if !(recycle_distance.is_finite() && recycle_distance > 0.0) {
            return Err(StreamingError::InvalidRecycleDistance(recycle_distance));
        }
        Ok(Self {
            position,
            recycle_threshold,
            recycle_distance,
            visibility: Visibility::Active,
            frozen: false,
        })
    }

    /// Create an entity whose recycle distance must stay phase-aligned with `period`
    pub fn phase_locked(
        position: DVec3,
        recycle_threshold: f64,
        recycle_distance: f64,
        period: f64,
    ) -> StreamingResult<Self> {
        if !is_multiple_of(recycle_distance, period) {
            return Err(StreamingError::NotPhaseLocked {
                distance: recycle_distance,
                period,
            });
        }
        Self::new(position, recycle_threshold, recycle_distance)
    }

    /// Frozen entities stopped recycling after their position went non-finite
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// Scroll by `world_speed` and wrap with the regular recycle distance.
    ///
    /// Returns the number of wraps applied this tick.
    pub fn advance(&mut self, world_speed: f64) -> u32 {
        self.advance_with_first_jump(world_speed, self.recycle_distance)
    }

    /// Scroll by `world_speed`; the first wrap of this tick jumps by `first_jump`.
    ///
    /// Any further wraps needed in the same tick (a speed spike larger than the
    /// recycle span) use the regular recycle distance, so the entity always ends at
    /// or ahead of its threshold.
    pub fn advance_with_first_jump(&mut self, world_speed: f64, first_jump: f64) -> u32 {
        if self.frozen {
            return 0;
        }

        self.position.z -= clamp_world_speed(world_speed);
        if self.position.z >= self.recycle_threshold {
            return self.check_finite(0);
        }

        self.position.z += first_jump;
        let mut wraps = 1;

        if self.position.z < self.recycle_threshold {
            let deficit = self.recycle_threshold - self.position.z;
            let extra = (deficit / self.recycle_distance).ceil();
            self.position.z += extra * self.recycle_distance;
            wraps += extra as u32;
        }

        self.check_finite(wraps)
    }

    fn check_finite(&mut self, wraps: u32) -> u32 {
        if !self.position.z.is_finite() {
            log::error!(
                "Entity position became non-finite (z={}), freezing its recycling",
                self.position.z
            );
            self.frozen = true;
        }
        wraps
    }
}

/// True if `value` is a whole multiple of `period` (within float tolerance)
pub fn is_multiple_of(value: f64, period: f64) -> bool {
    if !(value.is_finite() && period.is_finite() && period > 0.0 && value > 0.0) {
        return false;
    }
    let ratio = value / period;
    (ratio - ratio.round()).abs() < 1e-9 && ratio.round() >= 1.0
}

/// Any object managed by a segment recycler
pub trait Recyclable {
    fn entity(&self) -> &RecyclableEntity;

    fn entity_mut(&mut self) -> &mut RecyclableEntity;

    /// Advance one tick; returns the number of wraps
    fn recycle(&mut self, world_speed: f64) -> u32 {
        self.entity_mut().advance(world_speed)
    }
}

impl Recyclable for RecyclableEntity {
    fn entity(&self) -> &RecyclableEntity {
        self
    }

    fn entity_mut(&mut self) -> &mut RecyclableEntity {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_at(z: f64) -> RecyclableEntity {
        RecyclableEntity::new(DVec3::new(0.0, 0.0, z), -50.0, 350.0).unwrap()
    }

    #[test]
    fn test_advance_without_wrap() {
        let mut entity = entity_at(100.0);
        assert_eq!(entity.advance(10.0), 0);
        assert_eq!(entity.position.z, 90.0);
    }

    #[test]
    fn test_advance_wraps_forward() {
        let mut entity = entity_at(-45.0);
        assert_eq!(entity.advance(10.0), 1);
        assert_eq!(entity.position.z, 295.0);
    }

    #[test]
    fn test_speed_spike_lands_in_range() {
        let mut entity = entity_at(0.0);
        let wraps = entity.advance(1000.0);
        assert_eq!(wraps, 3);
        assert!(entity.position.z >= -50.0 && entity.position.z < 300.0);
    }

    #[test]
    fn test_negative_and_nan_speed_clamped() {
        let mut entity = entity_at(100.0);
        entity.advance(-25.0);
        assert_eq!(entity.position.z, 100.0);
        entity.advance(f64::NAN);
        assert_eq!(entity.position.z, 100.0);
        entity.advance(f64::INFINITY);
        assert_eq!(entity.position.z, 100.0);
        assert!(!entity.is_frozen());
    }

    #[test]
    fn test_non_finite_position_freezes() {
        let mut entity = entity_at(100.0);
        entity.position.z = f64::NAN;
        entity.advance(5.0);
        assert!(entity.is_frozen());

        // Frozen entities no longer move
        entity.position.z = 10.0;
        assert_eq!(entity.advance(50.0), 0);
        assert_eq!(entity.position.z, 10.0);
    }

    #[test]
    fn test_constructor_rejects_bad_input() {
        assert!(RecyclableEntity::new(DVec3::new(0.0, 0.0, f64::NAN), 0.0, 350.0).is_err());
        assert!(RecyclableEntity::new(DVec3::ZERO, 0.0, 0.0).is_err());
        assert!(RecyclableEntity::new(DVec3::ZERO, 0.0, -10.0).is_err());
    }

    #[test]
    fn test_phase_locked_requires_multiple() {
        assert!(RecyclableEntity::phase_locked(DVec3::ZERO, -50.0, 700.0, 350.0).is_ok());
        assert_eq!(
            RecyclableEntity::phase_locked(DVec3::ZERO, -50.0, 500.0, 350.0),
            Err(StreamingError::NotPhaseLocked {
                distance: 500.0,
                period: 350.0
            })
        );
    }

    #[test]
    fn test_is_multiple_of() {
        assert!(is_multiple_of(350.0, 350.0));
        assert!(is_multiple_of(1050.0, 350.0));
        assert!(!is_multiple_of(175.0, 350.0));
        assert!(!is_multiple_of(0.0, 350.0));
        assert!(!is_multiple_of(350.0, 0.0));
    }
}
