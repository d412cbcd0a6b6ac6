//! Hazard queries against the visible world

use crate::world::scenery::{SceneryKind, SceneryObject};
use crate::world::streaming_config::StructureKind;
use crate::world::structures::PhaseLockedStructure;
use glam::DVec3;

/// Half-width of a pothole or an oncoming car
const ROAD_HAZARD_HALF_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Pothole,
    OncomingTraffic,
    CrossingTraffic,
    Train,
}

impl HazardKind {
    pub fn name(self) -> &'static str {
        match self {
            HazardKind::Pothole => "pothole",
            HazardKind::OncomingTraffic => "oncoming traffic",
            HazardKind::CrossingTraffic => "crossing traffic",
            HazardKind::Train => "train",
        }
    }
}

/// Something the vehicle overlapped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub kind: HazardKind,
    pub position: DVec3,
}

/// Camera-relative box around the vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardProbe {
    pub x: f64,
    pub lateral_radius: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl HazardProbe {
    fn overlaps(&self, x: f64, half_width: f64, z_start: f64, z_end: f64) -> bool {
        z_end >= self.z_min
            && z_start <= self.z_max
            && (x - self.x).abs() <= half_width + self.lateral_radius
    }
}

pub(crate) fn scenery_hazard(probe: &HazardProbe, object: &SceneryObject) -> Option<Hazard> {
    if !object.entity.is_visible() || !object.is_hazard() {
        return None;
    }
    let kind = match object.kind {
        SceneryKind::Pothole { .. } => HazardKind::Pothole,
        SceneryKind::Traffic { .. } => HazardKind::OncomingTraffic,
        _ => return None,
    };
    let p = object.position();
    probe
        .overlaps(p.x, ROAD_HAZARD_HALF_WIDTH, p.z, p.z)
        .then_some(Hazard { kind, position: p })
}

pub(crate) fn structure_hazard(
    probe: &HazardProbe,
    structure: &PhaseLockedStructure,
) -> Option<Hazard> {
    if !structure.entity.is_visible() || !structure.is_hazard() {
        return None;
    }
    let kind = match structure.kind {
        StructureKind::CrossingTraffic => HazardKind::CrossingTraffic,
        StructureKind::Train => HazardKind::Train,
        _ => return None,
    };
    let p = structure.entity.position;
    probe
        .overlaps(p.x, structure.lateral_extent(), p.z, p.z + structure.depth)
        .then_some(Hazard { kind, position: p })
}
