//! # Simulation Harness
//!
//! Spawns one named thread per actor, all sharing a single
//! `SharedResource<u64>`, and collects their lifecycle events.
//!
//! ```text
//!   main ──spawn──> actor-1 ──┐
//!        ──spawn──> actor-2 ──┼──> ChannelSink ──> Timeline
//!        ──spawn──> actor-3 ──┘
//!   main ──drain──> join all
//! ```
//!
//! The harness never gives up on an actor: acquisition has no timeout,
//! so a run ends only when every actor has released.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use arbiter_core::{AccessStats, CoordinatorSnapshot, SharedResource};

use crate::actor::Role;
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::event::ChannelSink;
use crate::runner::ActorRunner;
use crate::scenario::Scenario;
use crate::timeline::{Timeline, Violation};

/// A configured simulation, ready to run scenarios.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Validates the config.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the config is invalid.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs every actor of `scenario` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Spawn`] if an actor thread could not be started
    /// and [`SimError::ActorPanicked`] if one panicked. Actors already
    /// running are always joined before returning.
    pub fn run(&self, scenario: &Scenario) -> SimResult<SimulationReport> {
        let resource = SharedResource::new(0u64);
        let (sink, receiver) = ChannelSink::new(self.config.channel_capacity);
        let epoch = Instant::now();

        tracing::debug!(
            actors = scenario.len(),
            time_scale = self.config.time_scale,
            "starting simulation"
        );

        let (events, outcome) = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(scenario.len());
            let mut outcome = Ok(());

            for actor in scenario.actors() {
                let runner = ActorRunner::new(actor, &resource, sink.clone(), epoch, &self.config);
                let spawned = thread::Builder::new()
                    .name(format!("actor-{}", actor.id))
                    .spawn_scoped(scope, move || runner.run());

                match spawned {
                    Ok(handle) => {
                        tracing::debug!(actor = actor.id, role = %actor.role, "spawned");
                        handles.push((actor.id, handle));
                    }
                    Err(source) => {
                        tracing::error!(actor = actor.id, error = %source, "spawn failed");
                        outcome = Err(SimError::Spawn { id: actor.id, source });
                        break;
                    }
                }
            }

            // The channel closes once the last runner drops its clone.
            drop(sink);
            let events: Vec<_> = receiver.iter().collect();

            for (id, handle) in handles {
                if handle.join().is_err() {
                    tracing::error!(actor = id, "actor panicked");
                    if outcome.is_ok() {
                        outcome = Err(SimError::ActorPanicked { id });
                    }
                } else {
                    tracing::debug!(actor = id, "joined");
                }
            }

            (events, outcome)
        });
        outcome?;

        let timeline = Timeline::from_events(events);
        let final_snapshot = resource.coordinator().snapshot();
        let stats = resource.coordinator().stats();
        let elapsed = epoch.elapsed();

        tracing::debug!(events = timeline.len(), ?elapsed, "simulation complete");

        Ok(SimulationReport {
            timeline,
            final_snapshot,
            stats,
            final_value: resource.into_inner(),
            elapsed,
        })
    }
}

/// Everything observed during one run.
#[derive(Clone, Debug)]
pub struct SimulationReport {
    /// Lifecycle events, sorted by time.
    pub timeline: Timeline,
    /// Coordinator state after every actor returned.
    pub final_snapshot: CoordinatorSnapshot,
    /// Coordinator counters after every actor returned.
    pub stats: AccessStats,
    /// Final value of the shared counter. Each writer adds one.
    pub final_value: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl SimulationReport {
    /// Checks the timeline, the counters and the final state.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn verify(&self, slack: Duration) -> Result<(), Violation> {
        self.timeline.verify(slack)?;

        let stats = self.stats;
        if !stats.is_balanced() {
            return Err(Violation::CountersUnbalanced {
                reads_granted: stats.reads_granted,
                reads_released: stats.reads_released,
                writes_granted: stats.writes_granted,
                writes_released: stats.writes_released,
            });
        }
        if stats.writes_granted != self.final_value {
            return Err(Violation::LostUpdate {
                writes: stats.writes_granted,
                value: self.final_value,
            });
        }
        if !self.final_snapshot.is_idle() {
            return Err(Violation::NotIdle {
                readers: self.final_snapshot.readers,
                writers: self.final_snapshot.writers,
            });
        }
        Ok(())
    }

    /// Human-readable summary printed by the CLI.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let windows = self.timeline.held_windows();
        let readers = windows.iter().filter(|w| w.role == Role::Reader).count();
        let writers = windows.len() - readers;
        let order = self
            .timeline
            .admission_order()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");

        writeln!(f, "╔══════════════════════════════════════════╗")?;
        writeln!(f, "║            SIMULATION COMPLETE           ║")?;
        writeln!(f, "╚══════════════════════════════════════════╝")?;
        writeln!(f, "  Elapsed:          {:.3}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "  Actors:           {} ({readers} readers, {writers} writers)", windows.len())?;
        writeln!(f, "  Reads granted:    {}", self.stats.reads_granted)?;
        writeln!(f, "  Writes granted:   {}", self.stats.writes_granted)?;
        writeln!(f, "  Writer batches:   {}", self.stats.batches_opened)?;
        writeln!(f, "  Peak readers:     {}", self.timeline.max_concurrent_readers())?;
        writeln!(f, "  Final value:      {}", self.final_value)?;
        write!(f, "  Admission order:  {order}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::error::ConfigError;

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = Simulation::new(SimulationConfig::fast(0.0)).unwrap_err();
        assert!(matches!(err, SimError::Config(ConfigError::InvalidTimeScale(_))));
    }

    #[test]
    fn test_instant_scenario() {
        let scenario = Scenario::new(vec![
            Actor::reader(1, Duration::ZERO, Duration::ZERO),
            Actor::writer(2, Duration::ZERO, Duration::ZERO),
            Actor::writer(3, Duration::ZERO, Duration::ZERO),
        ])
        .unwrap();

        let report = Simulation::new(SimulationConfig::fast(1.0))
            .unwrap()
            .run(&scenario)
            .unwrap();

        assert_eq!(report.timeline.len(), 12);
        assert_eq!(report.final_value, 2);
        assert_eq!(report.stats.reads_granted, 1);
        assert_eq!(report.timeline.check_balanced(), Ok(()));
        assert_eq!(report.timeline.check_mutual_exclusion(), Ok(()));
        assert!(report.final_snapshot.is_idle());
    }

    #[test]
    fn test_verify_accepts_unbounded_slack() {
        let scenario = Scenario::parse("1 W 0 0\n2 R 0 0\n").unwrap();
        let report = Simulation::new(SimulationConfig::fast(1.0))
            .unwrap()
            .run(&scenario)
            .unwrap();

        assert_eq!(report.verify(Duration::MAX), Ok(()));
    }

    #[test]
    fn test_bounded_channel_run() {
        let actors = (0..16)
            .map(|id| Actor::writer(id, Duration::ZERO, Duration::ZERO))
            .collect();
        let config = SimulationConfig {
            channel_capacity: Some(1),
            ..SimulationConfig::fast(1.0)
        };

        let report = Simulation::new(config)
            .unwrap()
            .run(&Scenario::new(actors).unwrap())
            .unwrap();

        assert_eq!(report.final_value, 16);
        assert_eq!(report.timeline.written_values(), (1..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_summary_mentions_counts() {
        let scenario = Scenario::parse("1 R 0 0\n2 W 0 0\n").unwrap();
        let report = Simulation::new(SimulationConfig::fast(1.0))
            .unwrap()
            .run(&scenario)
            .unwrap();

        let summary = report.summary();
        assert!(summary.contains("SIMULATION COMPLETE"));
        assert!(summary.contains("(1 readers, 1 writers)"));
        assert!(summary.contains("Final value:      1"));
    }
}
