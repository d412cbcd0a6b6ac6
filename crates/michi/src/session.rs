//! Game session - owns the world and the car and runs the fixed tick loop

use crate::autopilot::Autopilot;
use crate::config::GameConfig;
use anyhow::Result;
use michi_core::entity::{DriveInput, Vehicle};
use michi_core::world::{
    BiomeType, Hazard, HazardKind, HazardProbe, NotificationLog, NotificationSink, StreamingWorld,
    TickReport, TunnelEvent,
};
use serde::Serialize;

/// Logs every HUD notification and keeps the ones nobody has shown yet
#[derive(Debug, Default)]
pub struct LogNotifications {
    pending: NotificationLog,
}

impl LogNotifications {
    /// Take the notifications queued since the last call
    pub fn drain(&mut self) -> Vec<String> {
        self.pending.drain()
    }
}

impl NotificationSink for LogNotifications {
    fn show_notification(&mut self, message: &str) {
        log::info!("[HUD] {}", message);
        self.pending.show_notification(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Running,
    /// Stopped on a crash; the world stays exactly as it was on that tick
    GameOver { hazard: Hazard, tick: u64 },
}

/// Statistics for a finished (or running) session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub distance: f64,
    pub top_speed: f64,
    pub switches: u64,
    pub wraps: u64,
    pub dodges: u64,
    pub tunnel_spawns: u32,
    pub launches: u32,
    pub hits: u32,
    pub final_biome: Option<String>,
    pub crashed_into: Option<String>,
}

pub struct Session {
    config: GameConfig,
    world: StreamingWorld,
    vehicle: Vehicle,
    notifications: LogNotifications,
    state: SessionState,
    summary: SessionSummary,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let streaming = config.resolve_streaming()?;
        let world = StreamingWorld::build(streaming, config.session.seed)?;
        log::info!(
            "Session started: seed {}, preset '{}', {} ticks/s",
            config.session.seed,
            world.config().name,
            config.session.ticks_per_second
        );

        Ok(Self {
            config,
            world,
            vehicle: Vehicle::new(),
            notifications: LogNotifications::default(),
            state: SessionState::Running,
            summary: SessionSummary::default(),
        })
    }

    pub fn world(&self) -> &StreamingWorld {
        &self.world
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, SessionState::GameOver { .. })
    }

    pub fn notifications_mut(&mut self) -> &mut LogNotifications {
        &mut self.notifications
    }

    /// Run one tick; returns `None` once the game is over
    pub fn step(&mut self, input: &DriveInput) -> Option<TickReport> {
        if self.is_game_over() {
            return None;
        }

        let motion = self
            .vehicle
            .update(input, self.config.session.tick_dt(), &self.config.vehicle);
        let report = self
            .world
            .tick(motion.world_speed, self.vehicle.distance, &mut self.notifications);
        self.record(&report);

        if let Some(hazard) = self.check_collision() {
            self.summary.hits += 1;
            if self.config.debug.invincible {
                log::debug!("Hit {} (invincible)", hazard.kind.name());
            } else {
                log::warn!(
                    "Crashed into {} at distance {:.1}",
                    hazard.kind.name(),
                    self.vehicle.distance
                );
                self.summary.crashed_into = Some(hazard.kind.name().to_string());
                self.state = SessionState::GameOver {
                    hazard,
                    tick: self.world.ticks(),
                };
            }
        }

        Some(report)
    }

    fn record(&mut self, report: &TickReport) {
        let summary = &mut self.summary;
        summary.ticks += 1;
        summary.distance = self.vehicle.distance;
        summary.top_speed = summary.top_speed.max(self.vehicle.speed);
        summary.switches = self.world.transition().switches();
        summary.wraps += u64::from(report.wraps);
        summary.dodges += u64::from(report.dodges);
        summary.tunnel_spawns = self.world.tunnel().spawns();
        summary.launches = self.vehicle.launches;
        if report.tunnel == TunnelEvent::Spawned && self.config.debug.verbose_logging {
            log::debug!(
                "Tunnel ready, {:.1} to the switch",
                self.world.snapshot().distance_to_switch
            );
        }
    }

    /// Hazard under the car this tick, if any
    fn check_collision(&self) -> Option<Hazard> {
        let radius = self.config.session.collision_radius;
        let probe = HazardProbe {
            x: self.vehicle.x,
            lateral_radius: radius,
            z_min: -radius,
            z_max: radius,
        };
        self.world.find_hazard(&probe)
    }

    /// Drive with the autopilot until a crash or `max_ticks` (0 = the config's limit)
    pub fn run_autopilot(&mut self, autopilot: &mut Autopilot, max_ticks: u64) -> SessionSummary {
        let limit = if max_ticks > 0 {
            max_ticks
        } else {
            self.config.session.max_ticks
        };

        while !self.is_game_over() && (limit == 0 || self.summary.ticks < limit) {
            let input = autopilot.next_input(&self.world, &self.vehicle);
            self.step(&input);
        }
        self.summary()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            final_biome: Some(self.world.current_biome().name().to_string()),
            ..self.summary.clone()
        }
    }

    pub fn current_biome(&self) -> BiomeType {
        self.world.current_biome()
    }

    /// The hazard that ended the session, if any
    pub fn crash(&self) -> Option<HazardKind> {
        match self.state {
            SessionState::GameOver { hazard, .. } => Some(hazard.kind),
            SessionState::Running => None,
        }
    }
}
