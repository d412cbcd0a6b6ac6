//! Vehicle integrator - turns driver input into world speed and distance
//!
//! The car never moves forward in world space. Its speed becomes the per-tick
//! scroll applied to everything else, and the running sum is the distance the
//! biome machine schedules switches on.
//!
//! Rewind: holding the rewind control brakes the car while winding a spring; letting
//! go converts the stored charge into a burst of speed.

use crate::entity::input::DriveInput;
use crate::error::{StreamingError, StreamingResult};
use serde::{Deserialize, Serialize};

/// Handling parameters, speeds in world units per second
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub max_speed: f64,
    pub acceleration: f64,
    pub braking: f64,
    /// Deceleration while coasting
    pub drag: f64,
    /// Charge gained per second of holding rewind
    pub wind_rate: f64,
    pub max_wind: f64,
    /// Speed gained per unit of charge on release
    pub launch_factor: f64,
    /// Lateral speed at full steering
    pub steer_speed: f64,
    /// Furthest the car can drift from the road center
    pub lane_limit: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: 120.0,
            acceleration: 30.0,
            braking: 60.0,
            drag: 5.0,
            wind_rate: 1.0,
            max_wind: 2.0,
            launch_factor: 40.0,
            steer_speed: 30.0,
            lane_limit: 14.0,
        }
    }
}

impl VehicleConfig {
    /// Reject handling values the integrator cannot clamp against
    pub fn validate(&self) -> StreamingResult<()> {
        let fields = [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("braking", self.braking),
            ("drag", self.drag),
            ("wind_rate", self.wind_rate),
            ("max_wind", self.max_wind),
            ("launch_factor", self.launch_factor),
            ("steer_speed", self.steer_speed),
            ("lane_limit", self.lane_limit),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value >= 0.0) {
                return Err(StreamingError::Config(format!(
                    "vehicle {} must be finite and not negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// What one integration step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleStep {
    /// Distance the world scrolls this tick
    pub world_speed: f64,
    /// Set on the tick a wound-up launch fires
    pub launched: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vehicle {
    /// Forward speed, units per second
    pub speed: f64,
    /// Cumulative distance travelled
    pub distance: f64,
    /// Lateral position, 0 is the road center
    pub x: f64,
    /// Stored rewind charge
    pub wind: f64,
    pub launches: u32,
}

impl Vehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate one tick of `dt` seconds
    pub fn update(&mut self, input: &DriveInput, dt: f64, config: &VehicleConfig) -> VehicleStep {
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("Ignoring vehicle step with dt={}", dt);
            return VehicleStep {
                world_speed: 0.0,
                launched: false,
            };
        }

        let mut launched = false;
        if input.rewind {
            self.wind = (self.wind + config.wind_rate * dt).min(config.max_wind);
            self.speed -= config.braking * dt;
        } else if self.wind > 0.0 {
            self.speed += self.wind * config.launch_factor;
            log::debug!("Launch with charge {:.2}", self.wind);
            self.wind = 0.0;
            self.launches += 1;
            launched = true;
        }

        if !input.rewind {
            if input.brake {
                self.speed -= config.braking * dt;
            } else if input.accelerate {
                self.speed += config.acceleration * dt;
            } else {
                self.speed -= config.drag * dt;
            }
        }
        self.speed = self.speed.clamp(0.0, config.max_speed);

        self.x = (self.x + input.steer_axis() * config.steer_speed * dt)
            .clamp(-config.lane_limit, config.lane_limit);

        let world_speed = self.speed * dt;
        self.distance += world_speed;
        VehicleStep {
            world_speed,
            launched,
        }
    }
}
