//! Phase-locked structures and the tunnel dodge rule
//!
//! Intersections, rail crossings and the vehicles crossing them repeat every
//! period and must stay aligned with the zone registry. Each one cycles on its own,
//! so at its wraparound it checks how far away the next biome switch is and skips an
//! extra period when a single jump would drop it into the transition tunnel.

use crate::error::StreamingResult;
use crate::world::biome_transition::SwitchSnapshot;
use crate::world::recyclable::RecyclableEntity;
use crate::world::streaming_config::{StructureKind, StructureLayout};
use crate::world::zones::DEFAULT_LATERAL_HALF_WIDTH;
use glam::DVec3;

/// True when a structure wrapping now must jump two periods instead of one.
///
/// A single jump moves a structure from its wrap point, `recycle_threshold - depth`,
/// to `recycle_threshold - depth + period` (250 for the default intersection). The rule
/// compares against the full `period` instead, a slightly wider band than the exact
/// landing spot. The tunnel occupies `[dist, dist + zone_length]` ahead of the
/// camera; this returns true whenever that span (plus `clearance`) reaches past
/// `period` while its mouth is still inside it.
pub fn needs_double_jump(dist: f64, zone_length: f64, clearance: f64, period: f64) -> bool {
    (dist + zone_length + clearance) > period && dist < period
}

/// The dodge rule parameters, fixed for a world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodgeRule {
    pub period: f64,
    pub zone_length: f64,
    pub clearance: f64,
}

impl DodgeRule {
    pub fn new(period: f64, zone_length: f64, clearance: f64) -> Self {
        Self {
            period,
            zone_length,
            clearance,
        }
    }

    pub fn needs_double_jump(&self, distance_to_switch: f64) -> bool {
        needs_double_jump(
            distance_to_switch,
            self.zone_length,
            self.clearance,
            self.period,
        )
    }
}

/// Outcome of one structure update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureUpdate {
    pub wraps: u32,
    pub dodged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseLockedStructure {
    pub kind: StructureKind,
    pub entity: RecyclableEntity,
    /// Length along the road
    pub depth: f64,
    period: f64,
    sweep_speed: f64,
    sweep_half_span: f64,
}

impl PhaseLockedStructure {
    /// Place a structure at its zone-local position in the first period.
    ///
    /// It wraps once its far edge is behind `recycle_threshold`.
    pub fn from_layout(
        layout: &StructureLayout,
        period: f64,
        recycle_threshold: f64,
    ) -> StreamingResult<Self> {
        let x = if layout.sweep_speed > 0.0 {
            -layout.sweep_half_span
        } else {
            0.0
        };
        let entity = RecyclableEntity::phase_locked(
            DVec3::new(x, 0.0, layout.local_z),
            recycle_threshold - layout.depth,
            period,
            period,
        )?;
        Ok(Self {
            kind: layout.kind,
            entity,
            depth: layout.depth,
            period,
            sweep_speed: layout.sweep_speed,
            sweep_half_span: layout.sweep_half_span,
        })
    }

    /// Scroll, wrap (dodging the tunnel if needed) and advance the lateral sweep
    pub fn update(
        &mut self,
        world_speed: f64,
        snapshot: SwitchSnapshot,
        dodge: &DodgeRule,
    ) -> StructureUpdate {
        let double = dodge.needs_double_jump(snapshot.distance_to_switch);
        let first_jump = if double {
            self.entity.recycle_distance + self.period
        } else {
            self.entity.recycle_distance
        };

        let wraps = self.entity.advance_with_first_jump(world_speed, first_jump);
        let dodged = wraps > 0 && double;
        if dodged {
            log::debug!(
                "{:?} skipped a period to clear the tunnel ({:.1} to switch), now at z={:.1}",
                self.kind,
                snapshot.distance_to_switch,
                self.entity.position.z
            );
        }

        self.sweep();
        StructureUpdate { wraps, dodged }
    }

    /// Crossing vehicles drive across the road and reappear on the far side
    fn sweep(&mut self) {
        if self.sweep_speed <= 0.0 || self.sweep_half_span <= 0.0 || self.entity.is_frozen() {
            return;
        }
        let span = 2.0 * self.sweep_half_span;
        let offset = (self.entity.position.x + self.sweep_half_span + self.sweep_speed)
            .rem_euclid(span);
        self.entity.position.x = offset - self.sweep_half_span;
    }

    /// Moving structures the player can hit
    pub fn is_hazard(&self) -> bool {
        matches!(
            self.kind,
            StructureKind::CrossingTraffic | StructureKind::Train
        )
    }

    /// Half of the structure's lateral size
    pub fn lateral_extent(&self) -> f64 {
        match self.kind {
            StructureKind::CrossingTraffic => 4.0,
            StructureKind::Train => 60.0,
            StructureKind::Intersection | StructureKind::RailCrossing => DEFAULT_LATERAL_HALF_WIDTH,
        }
    }

    /// True if the point `(x, z)` lies on this structure
    pub fn covers(&self, x: f64, z: f64) -> bool {
        let pos = self.entity.position;
        z >= pos.z && z <= pos.z + self.depth && (x - pos.x).abs() <= self.lateral_extent()
    }
}
