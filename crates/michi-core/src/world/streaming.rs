//! The streaming world - owns every pooled collection and runs one tick
//!
//! Tick order matters. The state machine runs first so the switch snapshot every
//! structure sees is the one for this tick's distance; the biome flip happens
//! before anything recycles; the tunnel moves last.

use crate::error::StreamingResult;
use crate::world::biome::{BiomeSet, BiomeType};
use crate::world::biome_transition::{BiomeTransitionMachine, SwitchSnapshot, TransitionStep};
use crate::world::builder::{build_biome_set, build_road};
use crate::world::hazards::{Hazard, HazardProbe, scenery_hazard, structure_hazard};
use crate::world::notifications::NotificationSink;
use crate::world::recyclable::clamp_world_speed;
use crate::world::recycler::SegmentRecycler;
use crate::world::rng_trait::WorldRng;
use crate::world::scenery::SceneryObject;
use crate::world::streaming_config::StreamingConfig;
use crate::world::structures::DodgeRule;
use crate::world::tunnel::{TransitionTunnel, TunnelEvent};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub step: TransitionStep,
    pub tunnel: TunnelEvent,
    /// Wraparounds across every collection
    pub wraps: u32,
    /// Structures that skipped an extra period to clear the tunnel
    pub dodges: u32,
}

#[derive(Debug, Clone)]
pub struct StreamingWorld {
    config: StreamingConfig,
    road: SegmentRecycler<SceneryObject>,
    city: BiomeSet,
    farmland: BiomeSet,
    transition: BiomeTransitionMachine,
    tunnel: TransitionTunnel,
    dodge: DodgeRule,
    ticks: u64,
}

impl StreamingWorld {
    /// Build a world with a seeded generator; the same seed gives the same world
    pub fn build(config: StreamingConfig, seed: u64) -> StreamingResult<Self> {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        Self::build_with_rng(config, &mut rng)
    }

    pub fn build_with_rng<R: WorldRng + ?Sized>(
        config: StreamingConfig,
        rng: &mut R,
    ) -> StreamingResult<Self> {
        config.validate()?;

        let road = build_road(&config.layout, &config.road, rng)?;
        let city = build_biome_set(BiomeType::City, &config.city, &config.layout, rng)?;
        let mut farmland =
            build_biome_set(BiomeType::Farmland, &config.farmland, &config.layout, rng)?;

        let transition = BiomeTransitionMachine::new(&config.transition)?;
        // Everything else waits out of sight until its biome comes up
        if transition.current_biome() == BiomeType::City {
            farmland.hide();
        }

        let tunnel = TransitionTunnel::new(
            &config.transition,
            config.transition.biome_transition_distance,
            config.layout.recycle_threshold,
        )?;
        let dodge = DodgeRule::new(
            config.layout.scenery_loop_distance,
            config.transition.transition_zone_length,
            config.transition.structure_clearance,
        );

        log::info!(
            "Streaming world '{}' built: {} road objects, period {}, pool span {}",
            config.name,
            road.len(),
            config.layout.scenery_loop_distance,
            config.layout.pool_span()
        );

        Ok(Self {
            road: SegmentRecycler::new(road),
            city,
            farmland,
            transition,
            tunnel,
            dodge,
            ticks: 0,
            config,
        })
    }

    /// Advance one tick: the world scrolls by `world_speed` and the player has
    /// covered `distance` in total.
    pub fn tick(
        &mut self,
        world_speed: f64,
        distance: f64,
        notifications: &mut dyn NotificationSink,
    ) -> TickReport {
        let speed = clamp_world_speed(world_speed);
        if speed != world_speed {
            log::warn!("World speed {} clamped to {}", world_speed, speed);
        }

        let step = self.transition.update(distance, notifications);
        if let TransitionStep::Completed { from, to } = step {
            self.biome_set_mut(from).hide();
            self.biome_set_mut(to).show();
            self.tunnel.on_biome_switch();
        }

        let snapshot = self.transition.snapshot();
        let mut wraps = self.road.update(speed);
        let city = self.city.update(speed, snapshot, &self.dodge);
        let farmland = self.farmland.update(speed, snapshot, &self.dodge);
        wraps += city.wraps + farmland.wraps;

        let tunnel = self.tunnel.update(speed, snapshot);
        if tunnel == TunnelEvent::Recycled {
            wraps += 1;
        }

        self.ticks += 1;
        TickReport {
            step,
            tunnel,
            wraps,
            dodges: city.dodges + farmland.dodges,
        }
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn road(&self) -> &SegmentRecycler<SceneryObject> {
        &self.road
    }

    pub fn biome_set(&self, biome: BiomeType) -> &BiomeSet {
        match biome {
            BiomeType::City => &self.city,
            BiomeType::Farmland => &self.farmland,
        }
    }

    fn biome_set_mut(&mut self, biome: BiomeType) -> &mut BiomeSet {
        match biome {
            BiomeType::City => &mut self.city,
            BiomeType::Farmland => &mut self.farmland,
        }
    }

    pub fn current_biome(&self) -> BiomeType {
        self.transition.current_biome()
    }

    /// The set currently shown
    pub fn active_set(&self) -> &BiomeSet {
        self.biome_set(self.current_biome())
    }

    pub fn transition(&self) -> &BiomeTransitionMachine {
        &self.transition
    }

    pub fn snapshot(&self) -> SwitchSnapshot {
        self.transition.snapshot()
    }

    pub fn tunnel(&self) -> &TransitionTunnel {
        &self.tunnel
    }

    /// Every visible hazard overlapping the probe; hidden sets never collide
    pub fn hazards<'a>(&'a self, probe: &'a HazardProbe) -> impl Iterator<Item = Hazard> + 'a {
        let road = self
            .road
            .items()
            .iter()
            .filter_map(move |o| scenery_hazard(probe, o));
        let scenery = [&self.city, &self.farmland]
            .into_iter()
            .flat_map(|set| set.scenery().items())
            .filter_map(move |o| scenery_hazard(probe, o));
        let structures = [&self.city, &self.farmland]
            .into_iter()
            .flat_map(|set| set.structures())
            .filter_map(move |s| structure_hazard(probe, s));

        road.chain(scenery).chain(structures)
    }

    pub fn find_hazard(&self, probe: &HazardProbe) -> Option<Hazard> {
        self.hazards(probe).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::hazards::HazardKind;
    use crate::world::notifications::{NoopNotifications, NotificationLog};

    fn world() -> StreamingWorld {
        StreamingWorld::build(StreamingConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_starts_in_city_with_farmland_hidden() {
        let world = world();
        assert_eq!(world.current_biome(), BiomeType::City);
        assert!(world.biome_set(BiomeType::City).is_visible());
        assert!(!world.biome_set(BiomeType::Farmland).is_visible());
        assert_eq!(world.tunnel().view_z(), 1000.0);
    }

    #[test]
    fn test_first_switch_flips_visibility() {
        let mut world = world();
        let mut log = NotificationLog::new();
        let mut completed_at = None;

        for tick in 1..=1100 {
            let distance = tick as f64;
            let report = world.tick(1.0, distance, &mut log);
            if let TransitionStep::Completed { .. } = report.step {
                completed_at = Some(distance);
            }
        }

        assert_eq!(completed_at, Some(1000.0));
        assert_eq!(world.current_biome(), BiomeType::Farmland);
        assert!(world.biome_set(BiomeType::Farmland).is_visible());
        assert!(!world.biome_set(BiomeType::City).is_visible());
        assert_eq!(log.messages(), ["Approaching Farmland", "Entering Farmland"]);
        assert_eq!(world.snapshot().next_switch_distance, 2000.0);
    }

    #[test]
    fn test_speed_spike_is_clamped() {
        let mut world = world();
        let before = world.road().items()[5].entity.position.z;
        world.tick(f64::NAN, 0.0, &mut NoopNotifications);
        assert_eq!(world.road().items()[5].entity.position.z, before);
        assert_eq!(world.ticks(), 1);
    }

    #[test]
    fn test_hidden_biome_has_no_hazards() {
        let world = world();
        for structure in world.biome_set(BiomeType::Farmland).structures() {
            let p = structure.entity.position;
            let probe = HazardProbe {
                x: p.x,
                lateral_radius: 1.0,
                z_min: p.z,
                z_max: p.z + structure.depth,
            };
            if let Some(hazard) = world.find_hazard(&probe) {
                assert_ne!(hazard.kind, HazardKind::Train, "hidden train reported");
            }
        }
    }
}
