//! World building - turns a streaming config into pooled collections
//!
//! Everything is laid out once over the first pool span `[threshold, threshold + span)`
//! and never allocated again; streaming only moves it.

use crate::error::{StreamingError, StreamingResult};
use crate::world::biome::{BiomeSet, BiomeType};
use crate::world::placement::{PointPlacement, plan_contiguous_segments, plan_point_placements};
use crate::world::recyclable::{RecyclableEntity, is_multiple_of};
use crate::world::rng_trait::WorldRng;
use crate::world::scenery::{SceneryKind, SceneryObject, WarningMarker};
use crate::world::streaming_config::{BiomeLayout, LayoutConfig, RoadConfig};
use crate::world::structures::PhaseLockedStructure;
use crate::world::zones::ZoneRegistry;
use glam::DVec3;

/// Road slabs, potholes and oncoming traffic shared by both biomes
pub fn build_road<R: WorldRng + ?Sized>(
    layout: &LayoutConfig,
    road: &RoadConfig,
    rng: &mut R,
) -> StreamingResult<Vec<SceneryObject>> {
    let span = layout.pool_span();
    let threshold = layout.recycle_threshold;
    let mut objects = Vec::new();

    if !is_multiple_of(span, road.slab_length) {
        return Err(StreamingError::InvalidStep(road.slab_length));
    }
    let slab_count = (span / road.slab_length).round() as usize;
    for i in 0..slab_count {
        let z = threshold - road.slab_length + i as f64 * road.slab_length;
        objects.push(SceneryObject::new(
            SceneryKind::RoadSlab {
                length: road.slab_length,
            },
            RecyclableEntity::new(
                DVec3::new(0.0, 0.0, z),
                threshold - road.slab_length,
                span,
            )?,
        ));
    }

    for _ in 0..road.pothole_count {
        let x = rng.gen_range_f64(-road.pothole_half_width, road.pothole_half_width);
        let z = rng.gen_range_f64(threshold, threshold + span);
        objects.push(SceneryObject::new(
            SceneryKind::Pothole {
                warning: WarningMarker {
                    lead: road.pothole_warning_lead,
                },
            },
            RecyclableEntity::new(DVec3::new(x, 0.0, z), threshold, span)?,
        ));
    }

    if road.oncoming_count > 0 {
        let spacing = span / f64::from(road.oncoming_count);
        for i in 0..road.oncoming_count {
            let z = threshold + (f64::from(i) + 0.5) * spacing;
            objects.push(SceneryObject::new(
                SceneryKind::Traffic {
                    oncoming_speed: road.oncoming_speed,
                },
                RecyclableEntity::new(DVec3::new(road.oncoming_lane_x, 0.0, z), threshold, span)?,
            ));
        }
    }

    Ok(objects)
}

/// Zones, continuous pieces, scattered scenery and structures for one biome
pub fn build_biome_set<R: WorldRng + ?Sized>(
    biome: BiomeType,
    biome_layout: &BiomeLayout,
    layout: &LayoutConfig,
    rng: &mut R,
) -> StreamingResult<BiomeSet> {
    let period = layout.scenery_loop_distance;
    let span = layout.pool_span();
    let threshold = layout.recycle_threshold;
    let zones = ZoneRegistry::new(period, layout.lateral_half_width, biome_layout.zones.clone())?;

    let mut scenery = Vec::new();

    let continuous = biome_layout
        .divider_offsets
        .iter()
        .map(|&x| (x, true))
        .chain(biome_layout.fence_offsets.iter().map(|&x| (x, false)));
    for (x, is_divider) in continuous {
        let segments = plan_contiguous_segments(
            x,
            threshold,
            threshold + span - layout.segment_step,
            layout.segment_step,
            layout.min_segment_length,
            &zones,
        )?;
        for segment in segments {
            let length = segment.length();
            let kind = if is_divider {
                SceneryKind::Divider { length }
            } else {
                SceneryKind::Fence { length }
            };
            scenery.push(SceneryObject::new(
                kind,
                RecyclableEntity::phase_locked(
                    DVec3::new(x, 0.0, segment.start),
                    threshold - length,
                    span,
                    period,
                )?,
            ));
        }
    }

    for scatter in &biome_layout.scatter {
        let placement = PointPlacement {
            span_start: threshold + scatter.z_jitter,
            span_end: threshold + span - scatter.z_jitter - scatter.step,
            step: scatter.step,
            density: scatter.density,
            lateral_min: scatter.lateral_min,
            lateral_max: scatter.lateral_max,
            z_jitter: scatter.z_jitter,
        };
        for (x, z) in plan_point_placements(rng, &placement, &zones)? {
            scenery.push(SceneryObject::new(
                scatter.kind.into(),
                RecyclableEntity::phase_locked(DVec3::new(x, 0.0, z), threshold, span, period)?,
            ));
        }
    }

    let structures = biome_layout
        .structures
        .iter()
        .map(|s| PhaseLockedStructure::from_layout(s, period, threshold))
        .collect::<StreamingResult<Vec<_>>>()?;

    log::debug!(
        "Built {} set: {} scenery objects, {} structures",
        biome.name(),
        scenery.len(),
        structures.len()
    );

    Ok(BiomeSet::new(biome, zones, scenery, structures))
}
