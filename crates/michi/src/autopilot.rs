//! Scripted driver for headless sessions
//!
//! Holds the throttle, swerves away from hazards it sees ahead and now and then
//! winds up a launch. Deterministic so the same seed replays the same run.

use michi_core::entity::{DriveInput, Vehicle};
use michi_core::world::{HazardProbe, StreamingWorld};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// How far ahead hazards are looked for
    pub lookahead: f64,
    /// Half-width of the corridor checked in front of the car
    pub corridor: f64,
    /// Ticks between launches (0 disables launching)
    pub launch_every: u64,
    /// Ticks spent winding before each launch
    pub wind_ticks: u64,
    tick: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            lookahead: 60.0,
            corridor: 4.0,
            launch_every: 600,
            wind_ticks: 45,
            tick: 0,
        }
    }

    /// Pick the controls for the next tick
    pub fn next_input(&mut self, world: &StreamingWorld, vehicle: &Vehicle) -> DriveInput {
        self.tick += 1;

        let mut input = DriveInput::cruise();
        if self.launch_every > 0 {
            let phase = self.tick % self.launch_every;
            if phase >= self.launch_every.saturating_sub(self.wind_ticks) {
                input.rewind = true;
            }
        }

        let ahead = HazardProbe {
            x: vehicle.x,
            lateral_radius: self.corridor,
            z_min: 0.0,
            z_max: self.lookahead,
        };
        if let Some(hazard) = world.find_hazard(&ahead) {
            // Steer to whichever side of the hazard has more road
            input.steer = if hazard.position.x >= vehicle.x { -1.0 } else { 1.0 };
            if hazard.position.z < self.lookahead * 0.5 {
                input.accelerate = false;
                input.brake = true;
            }
        }

        input
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}
