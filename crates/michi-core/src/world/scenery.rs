//! Pooled scenery objects
//!
//! One tagged type covers everything the segment recyclers manage. Variant payloads
//! carry what only that kind of object needs.

use crate::world::recyclable::{Recyclable, RecyclableEntity, clamp_world_speed};
use crate::world::streaming_config::ScatterKind;
use glam::DVec3;

/// Sign placed ahead of a pothole so the driver sees it coming
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarningMarker {
    /// Distance ahead of the pothole
    pub lead: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneryKind {
    RoadSlab { length: f64 },
    Divider { length: f64 },
    Fence { length: f64 },
    Tree,
    House,
    Lamp,
    Pothole { warning: WarningMarker },
    /// Car driving toward the player at its own speed on top of the world scroll
    Traffic { oncoming_speed: f64 },
}

impl From<ScatterKind> for SceneryKind {
    fn from(kind: ScatterKind) -> Self {
        match kind {
            ScatterKind::Tree => SceneryKind::Tree,
            ScatterKind::House => SceneryKind::House,
            ScatterKind::Lamp => SceneryKind::Lamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneryObject {
    pub kind: SceneryKind,
    pub entity: RecyclableEntity,
}

impl SceneryObject {
    pub fn new(kind: SceneryKind, entity: RecyclableEntity) -> Self {
        Self { kind, entity }
    }

    pub fn position(&self) -> DVec3 {
        self.entity.position
    }

    /// Where the pothole's warning sign stands, if this is a pothole
    pub fn warning_position(&self) -> Option<DVec3> {
        match self.kind {
            SceneryKind::Pothole { warning } => {
                Some(self.entity.position + DVec3::new(0.0, 0.0, warning.lead))
            }
            _ => None,
        }
    }

    /// Things the player can crash into
    pub fn is_hazard(&self) -> bool {
        matches!(
            self.kind,
            SceneryKind::Pothole { .. } | SceneryKind::Traffic { .. }
        )
    }
}

impl Recyclable for SceneryObject {
    fn entity(&self) -> &RecyclableEntity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut RecyclableEntity {
        &mut self.entity
    }

    fn recycle(&mut self, world_speed: f64) -> u32 {
        match self.kind {
            SceneryKind::Traffic { oncoming_speed } => self
                .entity
                .advance(clamp_world_speed(world_speed) + oncoming_speed.max(0.0)),
            _ => self.entity.advance(world_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(kind: SceneryKind, z: f64) -> SceneryObject {
        SceneryObject::new(
            kind,
            RecyclableEntity::new(DVec3::new(5.0, 0.0, z), -50.0, 1400.0).unwrap(),
        )
    }

    #[test]
    fn test_traffic_moves_faster_than_world() {
        let mut car = object(SceneryKind::Traffic { oncoming_speed: 2.0 }, 300.0);
        let mut tree = object(SceneryKind::Tree, 300.0);

        car.recycle(3.0);
        tree.recycle(3.0);
        assert_eq!(car.position().z, 295.0);
        assert_eq!(tree.position().z, 297.0);
    }

    #[test]
    fn test_parked_world_still_has_oncoming_traffic() {
        let mut car = object(SceneryKind::Traffic { oncoming_speed: 2.0 }, 300.0);
        car.recycle(f64::NAN);
        assert_eq!(car.position().z, 298.0);
    }

    #[test]
    fn test_pothole_warning_travels_with_pothole() {
        let mut pothole = object(
            SceneryKind::Pothole {
                warning: WarningMarker { lead: 40.0 },
            },
            100.0,
        );
        assert_eq!(pothole.warning_position().unwrap().z, 140.0);

        pothole.recycle(10.0);
        assert_eq!(pothole.warning_position().unwrap().z, 130.0);
        assert!(pothole.is_hazard());
        assert!(object(SceneryKind::Lamp, 0.0).warning_position().is_none());
    }
}
