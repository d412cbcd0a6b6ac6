//! Biomes and their pooled content sets

use crate::world::biome_transition::SwitchSnapshot;
use crate::world::recyclable::Visibility;
use crate::world::recycler::SegmentRecycler;
use crate::world::scenery::SceneryObject;
use crate::world::structures::{DodgeRule, PhaseLockedStructure};
use crate::world::zones::ZoneRegistry;
use serde::{Deserialize, Serialize};

/// Types of biomes the road passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeType {
    City,
    Farmland,
}

impl BiomeType {
    /// The biome a transition leads to
    pub fn opposite(self) -> Self {
        match self {
            BiomeType::City => BiomeType::Farmland,
            BiomeType::Farmland => BiomeType::City,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BiomeType::City => "City",
            BiomeType::Farmland => "Farmland",
        }
    }
}

/// Everything that belongs to one biome.
///
/// Both sets keep streaming every tick; only the visible one is drawn. Keeping the
/// hidden set moving means it reappears exactly where it would have been.
#[derive(Debug, Clone)]
pub struct BiomeSet {
    biome: BiomeType,
    zones: ZoneRegistry,
    scenery: SegmentRecycler<SceneryObject>,
    structures: Vec<PhaseLockedStructure>,
    visibility: Visibility,
}

/// Per-tick outcome of updating a biome set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiomeSetUpdate {
    pub wraps: u32,
    pub dodges: u32,
}

impl BiomeSet {
    pub fn new(
        biome: BiomeType,
        zones: ZoneRegistry,
        scenery: Vec<SceneryObject>,
        structures: Vec<PhaseLockedStructure>,
    ) -> Self {
        Self {
            biome,
            zones,
            scenery: SegmentRecycler::new(scenery),
            structures,
            visibility: Visibility::Active,
        }
    }

    pub fn biome(&self) -> BiomeType {
        self.biome
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn scenery(&self) -> &SegmentRecycler<SceneryObject> {
        &self.scenery
    }

    pub fn structures(&self) -> &[PhaseLockedStructure] {
        &self.structures
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn hide(&mut self) {
        self.set_visibility(Visibility::Hidden);
    }

    pub fn show(&mut self) {
        self.set_visibility(Visibility::Active);
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
        self.scenery.set_visibility(visibility);
        for structure in &mut self.structures {
            structure.entity.visibility = visibility;
        }
    }

    /// Stream scenery and structures, visible or not
    pub fn update(
        &mut self,
        world_speed: f64,
        snapshot: SwitchSnapshot,
        dodge: &DodgeRule,
    ) -> BiomeSetUpdate {
        let mut result = BiomeSetUpdate {
            wraps: self.scenery.update(world_speed),
            dodges: 0,
        };
        for structure in &mut self.structures {
            let outcome = structure.update(world_speed, snapshot, dodge);
            result.wraps += outcome.wraps;
            if outcome.dodged {
                result.dodges += 1;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::recyclable::RecyclableEntity;
    use crate::world::scenery::SceneryKind;
    use crate::world::streaming_config::{StructureKind, StructureLayout};
    use glam::DVec3;

    fn city_set() -> BiomeSet {
        let zones = ZoneRegistry::empty(350.0).unwrap();
        let scenery = (0..5)
            .map(|i| {
                SceneryObject::new(
                    SceneryKind::Lamp,
                    RecyclableEntity::new(
                        DVec3::new(22.0, i as f64 * 0.5, -50.0 + i as f64 * 70.0),
                        -50.0,
                        350.0,
                    )
                    .unwrap(),
                )
            })
            .collect();
        let structures = vec![PhaseLockedStructure::from_layout(
            &StructureLayout {
                kind: StructureKind::Intersection,
                local_z: 160.0,
                depth: 50.0,
                sweep_speed: 0.0,
                sweep_half_span: 0.0,
            },
            350.0,
            -50.0,
        )
        .unwrap()];
        BiomeSet::new(BiomeType::City, zones, scenery, structures)
    }

    #[test]
    fn test_opposite() {
        assert_eq!(BiomeType::City.opposite(), BiomeType::Farmland);
        assert_eq!(BiomeType::Farmland.opposite(), BiomeType::City);
        assert_eq!(BiomeType::City.opposite().opposite(), BiomeType::City);
    }

    #[test]
    fn test_hide_show_round_trip() {
        let mut set = city_set();
        let before: Vec<_> = set
            .scenery()
            .items()
            .iter()
            .map(|o| o.entity.clone())
            .collect();
        let structures_before: Vec<_> = set.structures().to_vec();

        set.hide();
        assert!(!set.is_visible());
        assert_eq!(set.scenery().visible().count(), 0);
        assert!(set.structures().iter().all(|s| !s.entity.is_visible()));

        set.show();
        let after: Vec<_> = set
            .scenery()
            .items()
            .iter()
            .map(|o| o.entity.clone())
            .collect();
        assert_eq!(before, after);
        assert_eq!(structures_before, set.structures());
    }

    #[test]
    fn test_hidden_set_keeps_streaming() {
        let mut set = city_set();
        let snapshot = SwitchSnapshot {
            next_switch_distance: 5000.0,
            distance_to_switch: 5000.0,
        };
        let dodge = DodgeRule::new(350.0, 300.0, 50.0);

        set.hide();
        set.update(10.0, snapshot, &dodge);
        assert_eq!(set.scenery().items()[1].entity.position.z, 10.0);
        assert_eq!(set.structures()[0].entity.position.z, 150.0);
    }
}
