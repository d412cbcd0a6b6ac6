//! Streaming configuration - serializable world design parameters
//!
//! Every tunable constant of the streaming world lives here instead of in the
//! systems that use it. Configurations serialize to RON for presets.

use crate::error::{StreamingError, StreamingResult};
use crate::world::recyclable::is_multiple_of;
use crate::world::zones::{DEFAULT_LATERAL_HALF_WIDTH, ZoneDescriptor};
use serde::{Deserialize, Serialize};

/// Complete world streaming configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Display name for this configuration
    pub name: String,

    /// Repeat period and recycle window shared by every collection
    pub layout: LayoutConfig,

    /// Biome switch scheduling and the transition tunnel
    pub transition: TransitionConfig,

    /// Content shared by both biomes (road slabs, potholes, traffic)
    pub road: RoadConfig,

    pub city: BiomeLayout,

    pub farmland: BiomeLayout,
}

/// Repeat period and recycle window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// World length after which phase-locked structures realign (default: 350)
    pub scenery_loop_distance: f64,
    /// Number of repeat periods covered by each pooled collection (default: 4)
    pub loops_in_pool: u32,
    /// `z` behind the camera at which pooled objects wrap (default: -50)
    pub recycle_threshold: f64,
    /// Lateral footprint of fixed structures (default: 45)
    pub lateral_half_width: f64,
    /// Sampling step for fences and dividers (default: 5)
    pub segment_step: f64,
    /// Shortest fence/divider piece worth spawning (default: 10)
    pub min_segment_length: f64,
}

/// Biome switch scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Distance between two biome switches (default: 1000)
    pub biome_transition_distance: f64,
    /// Length of the transition window before a switch, also the tunnel length (default: 300)
    pub transition_zone_length: f64,
    /// Width of the tunnel pre-spawn window below the zone length (default: 5)
    pub tunnel_pre_spawn_epsilon: f64,
    /// Distance at which the first switch completes (default: 1000)
    pub first_switch_distance: f64,
    /// Gap kept between a phase-locked structure and the tunnel mouth (default: 50)
    pub structure_clearance: f64,
}

/// Shared road content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Length of one road slab (default: 50)
    pub slab_length: f64,
    /// Potholes per pool (default: 6)
    pub pothole_count: u32,
    /// Lateral band potholes are dropped into (default: 14)
    pub pothole_half_width: f64,
    /// How far ahead of a pothole its warning sign stands (default: 40)
    pub pothole_warning_lead: f64,
    /// Oncoming cars per pool (default: 3)
    pub oncoming_count: u32,
    /// Lane center for oncoming traffic (default: -8)
    pub oncoming_lane_x: f64,
    /// Own speed of oncoming traffic, per tick (default: 1.5)
    pub oncoming_speed: f64,
}

/// Content and reserved zones of one biome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeLayout {
    /// Zones reserved for this biome's fixed structures
    pub zones: Vec<ZoneDescriptor>,
    /// Structures phase-locked to the repeat period
    pub structures: Vec<StructureLayout>,
    /// Lateral offsets of continuous pieces (fences, dividers)
    pub divider_offsets: Vec<f64>,
    pub fence_offsets: Vec<f64>,
    pub scatter: Vec<ScatterLayout>,
}

/// Phase-locked structure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Intersection,
    CrossingTraffic,
    RailCrossing,
    Train,
}

/// Placement of one phase-locked structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureLayout {
    pub kind: StructureKind,
    /// Zone-local `z` of the structure's near edge
    pub local_z: f64,
    /// Length along the road
    pub depth: f64,
    /// Lateral sweep speed for vehicles crossing the road (0 = static)
    pub sweep_speed: f64,
    /// Half-span of the lateral sweep
    pub sweep_half_span: f64,
}

/// Point scenery scattered along the road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScatterKind {
    Tree,
    House,
    Lamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterLayout {
    pub kind: ScatterKind,
    pub step: f64,
    pub density: f64,
    pub lateral_min: f64,
    pub lateral_max: f64,
    pub z_jitter: f64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            layout: LayoutConfig::default(),
            transition: TransitionConfig::default(),
            road: RoadConfig::default(),
            city: BiomeLayout::city(),
            farmland: BiomeLayout::farmland(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scenery_loop_distance: 350.0,
            loops_in_pool: 4,
            recycle_threshold: -50.0,
            lateral_half_width: DEFAULT_LATERAL_HALF_WIDTH,
            segment_step: 5.0,
            min_segment_length: 10.0,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            biome_transition_distance: 1000.0,
            transition_zone_length: 300.0,
            tunnel_pre_spawn_epsilon: 5.0,
            first_switch_distance: 1000.0,
            structure_clearance: 50.0,
        }
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            slab_length: 50.0,
            pothole_count: 6,
            pothole_half_width: 14.0,
            pothole_warning_lead: 40.0,
            oncoming_count: 3,
            oncoming_lane_x: -8.0,
            oncoming_speed: 1.5,
        }
    }
}

impl Default for BiomeLayout {
    fn default() -> Self {
        Self::city()
    }
}

impl BiomeLayout {
    /// Intersections with cross traffic, houses and street lamps
    pub fn city() -> Self {
        Self {
            zones: vec![ZoneDescriptor::new(160.0, 210.0)],
            structures: vec![
                StructureLayout {
                    kind: StructureKind::Intersection,
                    local_z: 160.0,
                    depth: 50.0,
                    sweep_speed: 0.0,
                    sweep_half_span: 0.0,
                },
                StructureLayout {
                    kind: StructureKind::CrossingTraffic,
                    local_z: 175.0,
                    depth: 20.0,
                    sweep_speed: 0.8,
                    sweep_half_span: 60.0,
                },
            ],
            divider_offsets: vec![0.0],
            fence_offsets: Vec::new(),
            scatter: vec![
                ScatterLayout {
                    kind: ScatterKind::House,
                    step: 30.0,
                    density: 0.6,
                    lateral_min: 55.0,
                    lateral_max: 90.0,
                    z_jitter: 5.0,
                },
                ScatterLayout {
                    kind: ScatterKind::Lamp,
                    step: 35.0,
                    density: 0.9,
                    lateral_min: 22.0,
                    lateral_max: 24.0,
                    z_jitter: 0.0,
                },
            ],
        }
    }

    /// Rail crossings with passing trains, fences and trees
    pub fn farmland() -> Self {
        Self {
            zones: vec![ZoneDescriptor::new(60.0, 100.0)],
            structures: vec![
                StructureLayout {
                    kind: StructureKind::RailCrossing,
                    local_z: 60.0,
                    depth: 40.0,
                    sweep_speed: 0.0,
                    sweep_half_span: 0.0,
                },
                StructureLayout {
                    kind: StructureKind::Train,
                    local_z: 70.0,
                    depth: 20.0,
                    sweep_speed: 2.5,
                    sweep_half_span: 200.0,
                },
            ],
            divider_offsets: Vec::new(),
            fence_offsets: vec![-30.0, 30.0],
            scatter: vec![ScatterLayout {
                kind: ScatterKind::Tree,
                step: 15.0,
                density: 0.5,
                lateral_min: 35.0,
                lateral_max: 100.0,
                z_jitter: 4.0,
            }],
        }
    }
}

impl TransitionConfig {
    /// Check the scheduling invariants on their own
    pub fn validate(&self) -> StreamingResult<()> {
        if !(self.transition_zone_length > 0.0
            && self.transition_zone_length < self.biome_transition_distance)
        {
            return Err(StreamingError::InvalidTransitionZone {
                zone: self.transition_zone_length,
                transition: self.biome_transition_distance,
            });
        }
        if !(self.tunnel_pre_spawn_epsilon > 0.0
            && self.tunnel_pre_spawn_epsilon < self.transition_zone_length)
        {
            return Err(StreamingError::InvalidPreSpawnEpsilon {
                epsilon: self.tunnel_pre_spawn_epsilon,
                zone: self.transition_zone_length,
            });
        }
        if self.first_switch_distance < self.transition_zone_length {
            return Err(StreamingError::Config(format!(
                "first switch at {} leaves no room for a {} transition window",
                self.first_switch_distance, self.transition_zone_length
            )));
        }
        Ok(())
    }

    /// The open pre-spawn window `(zone - epsilon, zone)` on distance-to-switch
    pub fn pre_spawn_window(&self) -> (f64, f64) {
        (
            self.transition_zone_length - self.tunnel_pre_spawn_epsilon,
            self.transition_zone_length,
        )
    }
}

impl LayoutConfig {
    /// Span covered by one pooled collection, a whole number of periods
    pub fn pool_span(&self) -> f64 {
        self.scenery_loop_distance * f64::from(self.loops_in_pool.max(1))
    }
}

impl StreamingConfig {
    /// Check the cross-field invariants the world relies on
    pub fn validate(&self) -> StreamingResult<()> {
        let period = self.layout.scenery_loop_distance;
        if !(period.is_finite() && period > 0.0) {
            return Err(StreamingError::InvalidPeriod(period));
        }
        if !(self.layout.segment_step.is_finite() && self.layout.segment_step > 0.0) {
            return Err(StreamingError::InvalidStep(self.layout.segment_step));
        }
        if self.layout.loops_in_pool == 0 {
            return Err(StreamingError::Config(
                "loops_in_pool must be at least 1".to_string(),
            ));
        }
        if !self.layout.recycle_threshold.is_finite() {
            return Err(StreamingError::Config(format!(
                "recycle_threshold must be finite, got {}",
                self.layout.recycle_threshold
            )));
        }

        // Slabs recycle by the pool span, so they only tile it without gaps or
        // overlap when their length divides it exactly
        let slab = self.road.slab_length;
        if !(slab.is_finite() && slab > 0.0) {
            return Err(StreamingError::InvalidStep(slab));
        }
        let span = self.layout.pool_span();
        if !is_multiple_of(span, slab) {
            return Err(StreamingError::Config(format!(
                "road slab length {} does not divide the pool span {}",
                slab, span
            )));
        }

        self.transition.validate()?;

        for layout in [&self.city, &self.farmland] {
            for structure in &layout.structures {
                if structure.local_z < 0.0 || structure.local_z >= period || structure.depth < 0.0
                {
                    return Err(StreamingError::Config(format!(
                        "{:?} at local z {} (depth {}) does not fit the repeat period {}",
                        structure.kind, structure.local_z, structure.depth, period
                    )));
                }
            }
            for scatter in &layout.scatter {
                if !(scatter.step.is_finite() && scatter.step > 0.0) {
                    return Err(StreamingError::InvalidStep(scatter.step));
                }
            }
        }

        Ok(())
    }

    /// Parse a RON preset and validate it
    pub fn from_ron_str(source: &str) -> StreamingResult<Self> {
        let config: Self =
            ron::from_str(source).map_err(|e| StreamingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> StreamingResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| StreamingError::Config(e.to_string()))
    }

    /// Look up a built-in preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "long_city" => Some(Self::preset_long_city()),
            "quick_switch" => Some(Self::preset_quick_switch()),
            _ => None,
        }
    }

    /// Long stretches between switches
    pub fn preset_long_city() -> Self {
        Self {
            name: "Long City".to_string(),
            transition: TransitionConfig {
                biome_transition_distance: 3000.0,
                first_switch_distance: 3000.0,
                ..TransitionConfig::default()
            },
            ..Self::default()
        }
    }

    /// Frequent, short transitions
    pub fn preset_quick_switch() -> Self {
        Self {
            name: "Quick Switch".to_string(),
            transition: TransitionConfig {
                biome_transition_distance: 700.0,
                transition_zone_length: 100.0,
                first_switch_distance: 700.0,
                ..TransitionConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamingConfig::default();
        assert_eq!(config.name, "Default");
        assert_eq!(config.layout.scenery_loop_distance, 350.0);
        assert_eq!(config.transition.biome_transition_distance, 1000.0);
        assert_eq!(config.transition.pre_spawn_window(), (295.0, 300.0));
        assert_eq!(config.layout.pool_span(), 1400.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ron_serialization() {
        let config = StreamingConfig::default();
        let serialized = config.to_ron_string().expect("Failed to serialize");
        let deserialized = StreamingConfig::from_ron_str(&serialized).expect("Failed to parse");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config =
            StreamingConfig::from_ron_str("(transition: (biome_transition_distance: 1500.0))")
                .unwrap();
        assert_eq!(config.transition.biome_transition_distance, 1500.0);
        assert_eq!(config.transition.transition_zone_length, 300.0);
        assert_eq!(config.layout.scenery_loop_distance, 350.0);
    }

    #[test]
    fn test_validation_rejects_zone_longer_than_cycle() {
        let mut config = StreamingConfig::default();
        config.transition.transition_zone_length = 1200.0;
        assert!(matches!(
            config.validate(),
            Err(StreamingError::InvalidTransitionZone { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_epsilon() {
        let mut config = StreamingConfig::default();
        config.transition.tunnel_pre_spawn_epsilon = 0.0;
        assert!(matches!(
            config.validate(),
            Err(StreamingError::InvalidPreSpawnEpsilon { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_slab_length() {
        let mut config = StreamingConfig::default();
        config.road.slab_length = 0.0;
        assert_eq!(config.validate(), Err(StreamingError::InvalidStep(0.0)));

        config.road.slab_length = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(StreamingError::InvalidStep(_))
        ));

        // 1400 / 60 leaves a partial slab that would overlap its neighbour
        config.road.slab_length = 60.0;
        assert!(matches!(config.validate(), Err(StreamingError::Config(_))));

        config.road.slab_length = 70.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_finite_threshold() {
        let mut config = StreamingConfig::default();
        config.layout.recycle_threshold = f64::NAN;
        assert!(matches!(config.validate(), Err(StreamingError::Config(_))));

        config.layout.recycle_threshold = f64::NEG_INFINITY;
        assert!(matches!(config.validate(), Err(StreamingError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_empty_pool() {
        let mut config = StreamingConfig::default();
        config.layout.loops_in_pool = 0;
        assert!(matches!(config.validate(), Err(StreamingError::Config(_))));
    }

    #[test]
    fn test_presets() {
        for name in ["default", "long_city", "quick_switch"] {
            let preset = StreamingConfig::preset(name).unwrap();
            assert!(preset.validate().is_ok(), "preset {} invalid", name);
        }
        assert!(StreamingConfig::preset("nope").is_none());

        let quick = StreamingConfig::preset_quick_switch();
        assert_eq!(quick.transition.pre_spawn_window(), (95.0, 100.0));
    }
}
