//! Transition tunnel coordinator
//!
//! The tunnel hides the biome swap: its mouth sits on the switch point and it
//! stretches one transition zone past it. Between switches it recycles on the
//! transition distance, and shortly before each switch it is re-anchored on the
//! exact switch point so rounding from earlier cycles never accumulates.
//!
//! Coordinates: `anchor_z` is where the tunnel stood relative to the camera when it
//! was last anchored, `entity.position.z` is its local offset since then. The view
//! position is their sum.

use crate::error::{StreamingError, StreamingResult};
use crate::world::biome_transition::SwitchSnapshot;
use crate::world::recyclable::{RecyclableEntity, Visibility, clamp_world_speed};
use crate::world::streaming_config::TransitionConfig;
use glam::DVec3;

/// Open interval on distance-to-switch in which the tunnel is re-anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreSpawnWindow {
    pub start: f64,
    pub end: f64,
}

impl PreSpawnWindow {
    pub fn from_config(config: &TransitionConfig) -> Self {
        let (start, end) = config.pre_spawn_window();
        Self { start, end }
    }

    /// True if moving from `previous` to `current` distance-to-switch touched the window.
    ///
    /// A fast tick can jump clean over a narrow window; that still counts.
    pub fn entered(&self, previous: f64, current: f64) -> bool {
        current < self.end && previous > self.start
    }
}

/// What the tunnel did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelEvent {
    Moved,
    /// Re-anchored on the upcoming switch point and made visible
    Spawned,
    /// Fell behind the camera, jumped one transition distance ahead and hid
    Recycled,
}

#[derive(Debug, Clone)]
pub struct TransitionTunnel {
    pub entity: RecyclableEntity,
    /// Absolute road distance of the tunnel mouth
    center_z: f64,
    anchor_z: f64,
    length: f64,
    trailing_bound: f64,
    window: PreSpawnWindow,
    spawned_this_cycle: bool,
    spawns: u32,
}

impl TransitionTunnel {
    /// Build the tunnel anchored on the first switch.
    ///
    /// `recycle_distance` must equal the transition distance, otherwise the tunnel
    /// drifts out of step with the switches it is meant to hide.
    pub fn new(
        config: &TransitionConfig,
        recycle_distance: f64,
        trailing_bound: f64,
    ) -> StreamingResult<Self> {
        config.validate()?;
        if (recycle_distance - config.biome_transition_distance).abs() > 1e-9 {
            return Err(StreamingError::TunnelOutOfSync {
                distance: recycle_distance,
                transition: config.biome_transition_distance,
            });
        }

        let length = config.transition_zone_length;
        let anchor_z = config.first_switch_distance;
        let entity = RecyclableEntity::new(
            DVec3::ZERO,
            Self::local_threshold(trailing_bound, anchor_z, length),
            recycle_distance,
        )?;

        Ok(Self {
            entity,
            center_z: config.first_switch_distance,
            anchor_z,
            length,
            trailing_bound,
            window: PreSpawnWindow::from_config(config),
            spawned_this_cycle: false,
            spawns: 0,
        })
    }

    /// Local `z` below which the far end of the tunnel is behind `trailing_bound`
    fn local_threshold(trailing_bound: f64, anchor_z: f64, length: f64) -> f64 {
        trailing_bound - anchor_z - length
    }

    /// Camera-relative `z` of the tunnel mouth
    pub fn view_z(&self) -> f64 {
        self.anchor_z + self.entity.position.z
    }

    /// Absolute road distance of the tunnel mouth
    pub fn center_z(&self) -> f64 {
        self.center_z
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_hidden(&self) -> bool {
        !self.entity.is_visible()
    }

    /// Re-anchors performed so far
    pub fn spawns(&self) -> u32 {
        self.spawns
    }

    /// Camera-relative span `[mouth, exit]`
    pub fn view_span(&self) -> (f64, f64) {
        let mouth = self.view_z();
        (mouth, mouth + self.length)
    }

    /// Allow the next re-anchor; called when the biome flips
    pub fn on_biome_switch(&mut self) {
        self.spawned_this_cycle = false;
    }

    pub fn update(&mut self, world_speed: f64, snapshot: SwitchSnapshot) -> TunnelEvent {
        let speed = clamp_world_speed(world_speed);
        let previous = snapshot.distance_to_switch + speed;

        if !self.spawned_this_cycle && self.window.entered(previous, snapshot.distance_to_switch)
        {
            self.anchor(snapshot);
            return TunnelEvent::Spawned;
        }

        let wraps = self.entity.advance(speed);
        if wraps == 0 {
            return TunnelEvent::Moved;
        }

        self.center_z += f64::from(wraps) * self.entity.recycle_distance;
        self.entity.visibility = Visibility::Hidden;
        log::debug!(
            "Tunnel recycled, mouth now at z={:.1} (road distance {:.1})",
            self.view_z(),
            self.center_z
        );
        TunnelEvent::Recycled
    }

    fn anchor(&mut self, snapshot: SwitchSnapshot) {
        self.center_z = snapshot.next_switch_distance;
        self.anchor_z = snapshot.distance_to_switch;
        self.entity.position.z = 0.0;
        self.entity.recycle_threshold =
            Self::local_threshold(self.trailing_bound, self.anchor_z, self.length);
        self.entity.visibility = Visibility::Active;
        self.spawned_this_cycle = true;
        self.spawns += 1;
        log::debug!(
            "Tunnel anchored {:.1} ahead at road distance {:.1}",
            self.anchor_z,
            self.center_z
        );
    }
}
