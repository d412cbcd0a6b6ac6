//! Game configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `config.ron` file (if exists)
//! 3. Environment variables prefixed with `MICHI_`
//!
//! Example environment variable: `MICHI_SESSION__SEED=7`
//!
//! The streaming world starts from a named preset; any field of it can then be
//! overridden under `streaming` in `config.ron`.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
use anyhow::{Result, anyhow};
use michi_core::entity::VehicleConfig;
use michi_core::world::StreamingConfig;
use serde::{Deserialize, Serialize};

/// Main game configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub vehicle: VehicleConfig,

    /// Overrides applied on top of the preset named in `session.preset`
    #[serde(default)]
    pub streaming: Option<StreamingConfig>,

    #[serde(default)]
    pub debug: DebugConfig,
}

/// Session pacing and collision settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// World seed; the same seed builds the same world
    pub seed: u64,
    /// Fixed simulation rate
    pub ticks_per_second: f64,
    /// Lateral and forward reach of the car when checking hazards
    pub collision_radius: f64,
    /// Stop after this many ticks even without a crash (0 = no limit)
    pub max_ticks: u64,
    /// Streaming preset: default, long_city, quick_switch
    pub preset: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks_per_second: 60.0,
            collision_radius: 2.0,
            max_ticks: 3600,
            preset: "default".to_string(),
        }
    }
}

impl SessionConfig {
    /// Seconds per tick
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.ticks_per_second
    }
}

/// Debug/development settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebugConfig {
    /// Report hazard hits without ending the session
    pub invincible: bool,
    /// Enable verbose logging
    pub verbose_logging: bool,
}

impl GameConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `config.ron` file (if exists)
    /// 3. Environment variables prefixed with `MICHI_` (highest priority)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("session.seed", 42_i64)?
            .set_default("session.ticks_per_second", 60.0)?
            .set_default("session.collision_radius", 2.0)?
            .set_default("session.max_ticks", 3600_i64)?
            .set_default("session.preset", "default")?
            .set_default("debug.invincible", false)?
            .set_default("debug.verbose_logging", false)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("config")
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (MICHI_SESSION__SEED, etc.)
            .add_source(
                Environment::with_prefix("MICHI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// The streaming configuration this session runs with, validated
    pub fn resolve_streaming(&self) -> Result<StreamingConfig> {
        let streaming = match &self.streaming {
            Some(overrides) => overrides.clone(),
            None => StreamingConfig::preset(&self.session.preset)
                .ok_or_else(|| anyhow!("Unknown streaming preset '{}'", self.session.preset))?,
        };
        streaming.validate()?;
        Ok(streaming)
    }

    /// Reject settings the session loop cannot run with
    pub fn validate(&self) -> Result<()> {
        let tps = self.session.ticks_per_second;
        if !(tps.is_finite() && tps > 0.0) {
            return Err(anyhow!("ticks_per_second must be positive, got {}", tps));
        }
        let radius = self.session.collision_radius;
        if radius.is_nan() || radius < 0.0 {
            return Err(anyhow!(
                "collision_radius must not be negative, got {}",
                radius
            ));
        }
        self.vehicle.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.session.seed, 42);
        assert_eq!(config.session.ticks_per_second, 60.0);
        assert_eq!(config.session.preset, "default");
        assert_eq!(config.vehicle.max_speed, 120.0);
        assert!(!config.debug.invincible);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_preset() {
        let mut config = GameConfig::default();
        config.session.preset = "quick_switch".to_string();
        let streaming = config.resolve_streaming().unwrap();
        assert_eq!(streaming.transition.biome_transition_distance, 700.0);

        config.session.preset = "nowhere".to_string();
        assert!(config.resolve_streaming().is_err());
    }

    #[test]
    fn test_streaming_override_wins_over_preset() {
        let mut config = GameConfig::default();
        config.session.preset = "quick_switch".to_string();
        config.streaming = Some(StreamingConfig::preset_long_city());
        let streaming = config.resolve_streaming().unwrap();
        assert_eq!(streaming.transition.biome_transition_distance, 3000.0);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let mut config = GameConfig::default();
        config.session.ticks_per_second = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_vehicle_handling() {
        let mut config = GameConfig::default();
        config.vehicle.max_speed = -5.0;
        assert!(config.validate().is_err());
        assert!(crate::session::Session::new(config).is_err());

        let mut config = GameConfig::default();
        config.vehicle.lane_limit = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ron_round_trip() {
        let config = GameConfig::default();
        let text = ron::to_string(&config).unwrap();
        let back: GameConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.session.seed, config.session.seed);
        assert_eq!(back.vehicle, config.vehicle);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = GameConfig::load().expect("Failed to load config");
        assert_eq!(config.session.ticks_per_second, 60.0);
        assert_eq!(config.vehicle.max_speed, 120.0);
    }
}
