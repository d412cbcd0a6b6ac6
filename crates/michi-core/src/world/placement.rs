//! Spawn placement planner
//!
//! Runs once at world-build time. Continuous pieces (fences, dividers) are split
//! into open runs that stop before a restricted zone and resume after it; point
//! objects (trees, houses, lamps) are scattered with random jitter and dropped
//! whenever they would land on a fixed structure.

use crate::error::{StreamingError, StreamingResult};
use crate::world::rng_trait::WorldRng;
use crate::world::zones::ZoneRegistry;

/// A contiguous run of open road, `start..=end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenSegment {
    pub start: f64,
    pub end: f64,
}

impl OpenSegment {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Walk `span_start..=span_end` by `step` at lateral offset `x` and emit open runs.
///
/// A run closes on the first restricted sample or at the end of the span and is
/// emitted as `(run_start, last_open_z)`. Runs shorter than `min_length` are dropped.
pub fn plan_contiguous_segments(
    x: f64,
    span_start: f64,
    span_end: f64,
    step: f64,
    min_length: f64,
    zones: &ZoneRegistry,
) -> StreamingResult<Vec<OpenSegment>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(StreamingError::InvalidStep(step));
    }

    let mut segments = Vec::new();
    let mut run: Option<OpenSegment> = None;
    let samples = ((span_end - span_start) / step).floor().max(-1.0) as i64;

    for i in 0..=samples {
        // Index-based sampling avoids accumulating float error over long spans
        let z = span_start + i as f64 * step;
        if zones.is_in_restricted_zone(x, z) {
            if let Some(open) = run.take() {
                push_if_long_enough(&mut segments, open, min_length);
            }
        } else {
            match run.as_mut() {
                Some(open) => open.end = z,
                None => run = Some(OpenSegment { start: z, end: z }),
            }
        }
    }

    if let Some(open) = run {
        push_if_long_enough(&mut segments, open, min_length);
    }

    Ok(segments)
}

fn push_if_long_enough(segments: &mut Vec<OpenSegment>, segment: OpenSegment, min_length: f64) {
    if segment.length() >= min_length {
        segments.push(segment);
    }
}

/// Parameters for scattering point objects along the road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPlacement {
    pub span_start: f64,
    pub span_end: f64,
    pub step: f64,
    /// Probability of placing anything at a candidate `z`
    pub density: f64,
    /// Distance from the road center to the nearest allowed position
    pub lateral_min: f64,
    /// Distance from the road center to the farthest allowed position
    pub lateral_max: f64,
    /// Maximum forward/backward jitter around the candidate `z`
    pub z_jitter: f64,
}

/// Scatter point objects; each returned `(x, z)` is outside every restricted zone.
///
/// The side of the road is picked at random per object.
pub fn plan_point_placements<R: WorldRng + ?Sized>(
    rng: &mut R,
    placement: &PointPlacement,
    zones: &ZoneRegistry,
) -> StreamingResult<Vec<(f64, f64)>> {
    if !(placement.step.is_finite() && placement.step > 0.0) {
        return Err(StreamingError::InvalidStep(placement.step));
    }

    let mut points = Vec::new();
    let samples = ((placement.span_end - placement.span_start) / placement.step).floor() as i64;

    for i in 0..=samples.max(-1) {
        if !rng.check_probability(placement.density) {
            continue;
        }

        let side = if rng.gen_bool() { 1.0 } else { -1.0 };
        let x = side * rng.gen_range_f64(placement.lateral_min, placement.lateral_max);
        let z = placement.span_start
            + i as f64 * placement.step
            + rng.gen_range_f64(-placement.z_jitter, placement.z_jitter);

        if zones.is_in_restricted_zone(x, z) {
            continue;
        }
        points.push((x, z));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::zones::{DEFAULT_LATERAL_HALF_WIDTH, ZoneDescriptor};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn intersections() -> ZoneRegistry {
        ZoneRegistry::new(
            350.0,
            DEFAULT_LATERAL_HALF_WIDTH,
            vec![ZoneDescriptor::new(160.0, 210.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_segments_stop_at_zone() {
        let zones = intersections();
        let segments = plan_contiguous_segments(30.0, 0.0, 349.0, 1.0, 10.0, &zones).unwrap();

        assert_eq!(
            segments,
            vec![
                OpenSegment {
                    start: 0.0,
                    end: 159.0
                },
                OpenSegment {
                    start: 211.0,
                    end: 349.0
                },
            ]
        );
    }

    #[test]
    fn test_segments_never_straddle_zone() {
        let zones = intersections();
        let segments = plan_contiguous_segments(0.0, -350.0, 1050.0, 5.0, 10.0, &zones).unwrap();
        assert!(!segments.is_empty());

        for segment in &segments {
            let mut z = segment.start;
            while z <= segment.end {
                assert!(
                    !zones.is_in_restricted_zone(0.0, z),
                    "segment {:?} covers restricted z={}",
                    segment,
                    z
                );
                z += 0.5;
            }
        }
    }

    #[test]
    fn test_short_runs_discarded() {
        // Open gap between two zones is only 5 units wide
        let zones = ZoneRegistry::new(
            350.0,
            45.0,
            vec![ZoneDescriptor::new(0.0, 100.0), ZoneDescriptor::new(106.0, 349.0)],
        )
        .unwrap();
        let segments = plan_contiguous_segments(0.0, 0.0, 349.0, 1.0, 10.0, &zones).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_outside_footprint_is_one_run() {
        let zones = intersections();
        let segments = plan_contiguous_segments(60.0, 0.0, 700.0, 10.0, 10.0, &zones).unwrap();
        assert_eq!(
            segments,
            vec![OpenSegment {
                start: 0.0,
                end: 700.0
            }]
        );
    }

    #[test]
    fn test_invalid_step_rejected() {
        let zones = intersections();
        assert_eq!(
            plan_contiguous_segments(0.0, 0.0, 100.0, 0.0, 10.0, &zones),
            Err(StreamingError::InvalidStep(0.0))
        );
    }

    #[test]
    fn test_points_never_in_restricted_zone() {
        let zones = intersections();
        let placement = PointPlacement {
            span_start: 0.0,
            span_end: 3500.0,
            step: 5.0,
            density: 0.8,
            lateral_min: 20.0,
            lateral_max: 70.0,
            z_jitter: 2.0,
        };

        for seed in 0..8 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let points = plan_point_placements(&mut rng, &placement, &zones).unwrap();
            assert!(!points.is_empty());
            for &(x, z) in &points {
                assert!(!zones.is_in_restricted_zone(x, z));
                assert!(x.abs() >= 20.0 && x.abs() < 70.0);
            }
        }
    }

    #[test]
    fn test_points_zero_density() {
        let zones = intersections();
        let placement = PointPlacement {
            span_start: 0.0,
            span_end: 350.0,
            step: 10.0,
            density: 0.0,
            lateral_min: 20.0,
            lateral_max: 40.0,
            z_jitter: 0.0,
        };
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        assert!(plan_point_placements(&mut rng, &placement, &zones).unwrap().is_empty());
    }
}
