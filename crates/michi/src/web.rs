//! Browser bindings
//!
//! The page owns the render loop and calls `tick` once per frame with the keys
//! currently held; everything it needs to draw comes back through getters.

use crate::config::GameConfig;
use crate::render;
use crate::session::Session;
use michi_core::entity::DriveInput;
use michi_core::world::BiomeType;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session; a missing seed picks a random one
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, preset: Option<String>) -> Result<WebSession, JsValue> {
        let mut config = GameConfig::default();
        config.session.seed = seed.unwrap_or_else(rand::random);
        if let Some(preset) = preset {
            config.session.preset = preset;
        }
        let session = Session::new(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to start session: {}", e)))?;
        Ok(Self { session })
    }

    /// Advance one tick; returns false once the car has crashed
    pub fn tick(&mut self, accelerate: bool, brake: bool, rewind: bool, steer: f64) -> bool {
        let input = DriveInput {
            accelerate,
            brake,
            rewind,
            steer,
        };
        self.session.step(&input).is_some() && !self.session.is_game_over()
    }

    pub fn distance(&self) -> f64 {
        self.session.vehicle().distance
    }

    pub fn speed(&self) -> f64 {
        self.session.vehicle().speed
    }

    pub fn car_x(&self) -> f64 {
        self.session.vehicle().x
    }

    /// Stored rewind charge, for the wind-up gauge
    pub fn wind(&self) -> f64 {
        self.session.vehicle().wind
    }

    pub fn is_city(&self) -> bool {
        self.session.current_biome() == BiomeType::City
    }

    /// Fog/lighting blend toward the next biome, 1 on the switch tick, 0 when idle
    pub fn transition_progress(&self) -> f64 {
        self.session.world().transition().progress()
    }

    pub fn is_transitioning(&self) -> bool {
        self.session.world().transition().is_transitioning()
    }

    pub fn tunnel_z(&self) -> f64 {
        self.session.world().tunnel().view_z()
    }

    pub fn tunnel_visible(&self) -> bool {
        !self.session.world().tunnel().is_hidden()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.is_game_over()
    }

    /// Notifications queued since the last call, newline separated
    pub fn take_notifications(&mut self) -> String {
        self.session.notifications_mut().drain().join("\n")
    }

    /// Visible scenery as flat `[kind, x, z, ...]` triples for the renderer
    pub fn scenery(&self) -> Vec<f64> {
        render::scenery_buffer(self.session.world())
    }

    /// Visible intersections, crossings and trains as `[kind, x, z, depth, ...]`
    pub fn structures(&self) -> Vec<f64> {
        render::structure_buffer(self.session.world())
    }

    /// `[mouth, exit]` of the tunnel, empty while it is parked
    pub fn tunnel_span(&self) -> Vec<f64> {
        render::tunnel_buffer(self.session.world())
    }

    /// Summary as RON text
    pub fn summary(&self) -> String {
        ron::to_string(&self.session.summary()).unwrap_or_default()
    }
}
