//! Biome transition state machine
//!
//! Tracks when the next City/Farmland switch is due. Inside the transition window
//! before a switch the machine reports a progress value that the renderer uses to
//! blend fog and lighting; at the end of the window the biome flips and the next
//! switch is scheduled one transition distance further on.

use crate::error::StreamingResult;
use crate::world::biome::BiomeType;
use crate::world::notifications::NotificationSink;
use crate::world::streaming_config::TransitionConfig;

/// Where the machine is in its cycle
#[derive(Debug, Clone, Copy, PartialEq)]
enum TransitionPhase {
    Idle,
    Transitioning {
        from: BiomeType,
        to: BiomeType,
        start_distance: f64,
        progress: f64,
    },
}

/// What happened during one `update`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    /// Idle and outside the transition window
    Steady,
    Started { to: BiomeType },
    Progressed { progress: f64 },
    /// The biome flipped; biome sets must be hidden/shown now
    Completed { from: BiomeType, to: BiomeType },
}

/// Distance-to-switch as seen by everything that recycles this tick.
///
/// Computed once per tick after the state machine has run and handed to every
/// phase-locked structure, so nobody reads a stale value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchSnapshot {
    pub next_switch_distance: f64,
    pub distance_to_switch: f64,
}

#[derive(Debug, Clone)]
pub struct BiomeTransitionMachine {
    current: BiomeType,
    phase: TransitionPhase,
    next_switch_distance: f64,
    last_distance: f64,
    zone_length: f64,
    transition_distance: f64,
    switches: u64,
    /// Set for the single update that flipped the biome
    just_completed: bool,
}

impl BiomeTransitionMachine {
    /// Start idle in the city with the first switch scheduled per `config`
    pub fn new(config: &TransitionConfig) -> StreamingResult<Self> {
        config.validate()?;

        Ok(Self {
            current: BiomeType::City,
            phase: TransitionPhase::Idle,
            next_switch_distance: config.first_switch_distance,
            last_distance: 0.0,
            zone_length: config.transition_zone_length,
            transition_distance: config.biome_transition_distance,
            switches: 0,
            just_completed: false,
        })
    }

    pub fn current_biome(&self) -> BiomeType {
        self.current
    }

    /// Biome being transitioned to; the current biome while idle
    pub fn target_biome(&self) -> BiomeType {
        match self.phase {
            TransitionPhase::Transitioning { to, .. } => to,
            TransitionPhase::Idle => self.current,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning { .. })
    }

    /// Blend toward the target biome: 1 on the update that flips it, 0 while idle
    pub fn progress(&self) -> f64 {
        match self.phase {
            TransitionPhase::Transitioning { progress, .. } => progress,
            TransitionPhase::Idle if self.just_completed => 1.0,
            TransitionPhase::Idle => 0.0,
        }
    }

    pub fn transition_start_distance(&self) -> Option<f64> {
        match self.phase {
            TransitionPhase::Transitioning { start_distance, .. } => Some(start_distance),
            TransitionPhase::Idle => None,
        }
    }

    pub fn next_switch_distance(&self) -> f64 {
        self.next_switch_distance
    }

    /// Completed switches since game start
    pub fn switches(&self) -> u64 {
        self.switches
    }

    pub fn snapshot(&self) -> SwitchSnapshot {
        SwitchSnapshot {
            next_switch_distance: self.next_switch_distance,
            distance_to_switch: self.next_switch_distance - self.last_distance,
        }
    }

    /// Advance the machine to the player's cumulative `distance`
    pub fn update(
        &mut self,
        distance: f64,
        notifications: &mut dyn NotificationSink,
    ) -> TransitionStep {
        let distance = self.accept_distance(distance);
        self.just_completed = false;

        match self.phase {
            TransitionPhase::Idle => {
                if distance < self.next_switch_distance - self.zone_length {
                    return TransitionStep::Steady;
                }
                let to = self.current.opposite();
                self.phase = TransitionPhase::Transitioning {
                    from: self.current,
                    to,
                    start_distance: distance,
                    progress: 0.0,
                };
                log::info!(
                    "Transition to {} started at distance {:.1} (switch due at {:.1})",
                    to.name(),
                    distance,
                    self.next_switch_distance
                );
                notifications.show_notification(&format!("Approaching {}", to.name()));
                TransitionStep::Started { to }
            }
            TransitionPhase::Transitioning {
                from,
                to,
                start_distance,
                progress,
            } => {
                let raw = (distance - start_distance) / self.zone_length;
                // Never regress, even if a caller replays an older distance
                let progress = raw.clamp(0.0, 1.0).max(progress);

                if progress < 1.0 {
                    self.phase = TransitionPhase::Transitioning {
                        from,
                        to,
                        start_distance,
                        progress,
                    };
                    return TransitionStep::Progressed { progress };
                }

                self.current = to;
                self.phase = TransitionPhase::Idle;
                self.next_switch_distance += self.transition_distance;
                self.switches += 1;
                self.just_completed = true;
                log::info!(
                    "Biome switched {} -> {} at distance {:.1}, next switch at {:.1}",
                    from.name(),
                    to.name(),
                    distance,
                    self.next_switch_distance
                );
                notifications.show_notification(&format!("Entering {}", to.name()));
                TransitionStep::Completed { from, to }
            }
        }
    }

    fn accept_distance(&mut self, distance: f64) -> f64 {
        if !distance.is_finite() || distance < self.last_distance {
            log::warn!(
                "Ignoring distance {} (last accepted {}); distance must not decrease",
                distance,
                self.last_distance
            );
            return self.last_distance;
        }
        self.last_distance = distance;
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::notifications::{NoopNotifications, NotificationLog};

    fn machine() -> BiomeTransitionMachine {
        BiomeTransitionMachine::new(&TransitionConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_idle_in_city() {
        let machine = machine();
        assert_eq!(machine.current_biome(), BiomeType::City);
        assert_eq!(machine.target_biome(), BiomeType::City);
        assert!(!machine.is_transitioning());
        assert_eq!(machine.next_switch_distance(), 1000.0);
        assert_eq!(machine.snapshot().distance_to_switch, 1000.0);
    }

    #[test]
    fn test_transition_starts_at_window() {
        let mut machine = machine();
        let mut sink = NotificationLog::new();

        assert_eq!(machine.update(699.0, &mut sink), TransitionStep::Steady);
        assert_eq!(
            machine.update(700.0, &mut sink),
            TransitionStep::Started {
                to: BiomeType::Farmland
            }
        );
        assert_eq!(machine.target_biome(), BiomeType::Farmland);
        assert_eq!(machine.transition_start_distance(), Some(700.0));
        assert_eq!(sink.messages(), ["Approaching Farmland"]);
    }

    #[test]
    fn test_progress_and_completion() {
        let mut machine = machine();
        let mut sink = NotificationLog::new();
        machine.update(700.0, &mut sink);

        assert_eq!(
            machine.update(850.0, &mut sink),
            TransitionStep::Progressed { progress: 0.5 }
        );
        assert_eq!(
            machine.update(1000.0, &mut sink),
            TransitionStep::Completed {
                from: BiomeType::City,
                to: BiomeType::Farmland
            }
        );
        assert_eq!(machine.current_biome(), BiomeType::Farmland);
        assert!(!machine.is_transitioning());
        assert_eq!(machine.next_switch_distance(), 2000.0);
        assert_eq!(sink.messages().last().unwrap(), "Entering Farmland");
    }

    #[test]
    fn test_progress_reaches_one_on_switch() {
        let mut machine = machine();
        let mut sink = NoopNotifications;
        machine.update(700.0, &mut sink);
        machine.update(999.0, &mut sink);
        assert!(machine.progress() < 1.0);

        let step = machine.update(1000.0, &mut sink);
        assert!(matches!(step, TransitionStep::Completed { .. }));
        assert_eq!(machine.progress(), 1.0);

        assert_eq!(machine.update(1001.0, &mut sink), TransitionStep::Steady);
        assert_eq!(machine.progress(), 0.0);
    }

    #[test]
    fn test_two_cycles_alternate() {
        let mut machine = machine();
        let mut sink = NoopNotifications;
        let mut completed = Vec::new();
        let mut last_progress = 0.0;

        for i in 0..=2000 {
            let distance = i as f64;
            match machine.update(distance, &mut sink) {
                TransitionStep::Completed { from, to } => {
                    completed.push((from, to));
                    last_progress = 0.0;
                }
                TransitionStep::Progressed { progress } => {
                    assert!(progress <= 1.0);
                    assert!(progress >= last_progress);
                    last_progress = progress;
                }
                _ => {}
            }
        }

        assert_eq!(
            completed,
            vec![
                (BiomeType::City, BiomeType::Farmland),
                (BiomeType::Farmland, BiomeType::City)
            ]
        );
        assert_eq!(machine.switches(), 2);
    }

    #[test]
    fn test_regressing_distance_ignored() {
        let mut machine = machine();
        let mut sink = NoopNotifications;
        machine.update(700.0, &mut sink);
        machine.update(800.0, &mut sink);
        let before = machine.progress();

        machine.update(750.0, &mut sink);
        assert_eq!(machine.progress(), before);
        machine.update(f64::NAN, &mut sink);
        assert_eq!(machine.progress(), before);
        assert_eq!(machine.snapshot().distance_to_switch, 200.0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TransitionConfig {
            transition_zone_length: 0.0,
            ..TransitionConfig::default()
        };
        assert!(BiomeTransitionMachine::new(&config).is_err());
    }
}
