//! Restricted zone registry
//!
//! Fixed structures (intersections, rail crossings, bridges) repeat every
//! `period` units of road. Each one reserves a `z` range in zone-local coordinates
//! plus a lateral footprint; scenery placement must stay out of those ranges.

use crate::error::{StreamingError, StreamingResult};
use serde::{Deserialize, Serialize};

/// Lateral half-width shared by intersections and bridges
pub const DEFAULT_LATERAL_HALF_WIDTH: f64 = 45.0;

/// A reserved `z` range in zone-local coordinates (`[0, period)`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    pub start: f64,
    pub end: f64,
}

impl ZoneDescriptor {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends
    pub fn contains(&self, local_z: f64) -> bool {
        local_z >= self.start && local_z <= self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Immutable set of restricted zones for one world design
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRegistry {
    period: f64,
    lateral_half_width: f64,
    zones: Vec<ZoneDescriptor>,
}

impl ZoneRegistry {
    /// Validate and build a registry
    pub fn new(
        period: f64,
        lateral_half_width: f64,
        zones: Vec<ZoneDescriptor>,
    ) -> StreamingResult<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(StreamingError::InvalidPeriod(period));
        }
        for zone in &zones {
            if zone.start > zone.end {
                return Err(StreamingError::InvertedZone {
                    start: zone.start,
                    end: zone.end,
                });
            }
            if zone.start < 0.0 || zone.end > period {
                return Err(StreamingError::ZoneOutsidePeriod {
                    start: zone.start,
                    end: zone.end,
                    period,
                });
            }
        }
        Ok(Self {
            period,
            lateral_half_width,
            zones,
        })
    }

    /// A registry with no reserved zones
    pub fn empty(period: f64) -> StreamingResult<Self> {
        Self::new(period, DEFAULT_LATERAL_HALF_WIDTH, Vec::new())
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn zones(&self) -> &[ZoneDescriptor] {
        &self.zones
    }

    /// Map any `z` (negative included) into `[0, period)`
    pub fn normalize(&self, z: f64) -> f64 {
        let local = z.rem_euclid(self.period);
        // rem_euclid rounds tiny negatives up to exactly `period`
        if local >= self.period { 0.0 } else { local }
    }

    /// True if `(x, z)` lies on a fixed structure's footprint
    pub fn is_in_restricted_zone(&self, x: f64, z: f64) -> bool {
        if x.abs() > self.lateral_half_width {
            return false;
        }
        let local = self.normalize(z);
        self.zones.iter().any(|zone| zone.contains(local))
    }
}
