//! # Actor Runner
//!
//! Drives one actor through its timeline on the calling thread:
//!
//! ```text
//! sleep(delay) -> Arrived -> Queued -> acquire -> Admitted
//!              -> sleep(duration) -> Finished -> release
//! ```
//!
//! `Finished` is recorded while access is still held, so a timeline's
//! held windows never understate how long an actor kept the resource.

use std::thread;
use std::time::{Duration, Instant};

use arbiter_core::SharedResource;

use crate::actor::{Actor, Role};
use crate::config::SimulationConfig;
use crate::event::{EventKind, EventSink, LifecycleEvent};

/// Runs a single actor against a shared counter.
pub struct ActorRunner<'a, S: EventSink> {
    actor: &'a Actor,
    resource: &'a SharedResource<u64>,
    sink: S,
    epoch: Instant,
    config: &'a SimulationConfig,
}

impl<'a, S: EventSink> ActorRunner<'a, S> {
    /// Creates a runner. `epoch` is the shared simulation start.
    #[must_use]
    pub const fn new(
        actor: &'a Actor,
        resource: &'a SharedResource<u64>,
        sink: S,
        epoch: Instant,
        config: &'a SimulationConfig,
    ) -> Self {
        Self {
            actor,
            resource,
            sink,
            epoch,
            config,
        }
    }

    /// Runs the actor to completion. Blocks while waiting for access.
    pub fn run(self) {
        pause(self.config.scale(self.actor.arrival_delay));
        self.emit(EventKind::Arrived, None);
        self.emit(EventKind::Queued, None);

        let hold = self.config.scale(self.actor.hold_duration);
        match self.actor.role {
            Role::Reader => {
                let value = self.resource.read();
                self.emit(EventKind::Admitted, Some(*value));
                pause(hold);
                self.emit(EventKind::Finished, None);
            }
            Role::Writer => {
                let mut value = self.resource.write();
                *value += 1;
                self.emit(EventKind::Admitted, Some(*value));
                pause(hold);
                self.emit(EventKind::Finished, None);
            }
        }
    }

    fn emit(&self, kind: EventKind, value: Option<u64>) {
        let event = LifecycleEvent {
            actor: self.actor.id,
            role: self.actor.role,
            kind,
            at: self.epoch.elapsed(),
            value,
        };

        if self.config.log_events {
            tracing::info!("{event}");
        }
        self.sink.record(event);
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MemorySink;

    fn run(actor: &Actor, resource: &SharedResource<u64>) -> Vec<LifecycleEvent> {
        let sink = MemorySink::new();
        let config = SimulationConfig::fast(0.01);
        ActorRunner::new(actor, resource, &sink, Instant::now(), &config).run();
        sink.take()
    }

    #[test]
    fn test_reader_lifecycle() {
        let resource = SharedResource::new(5);
        let events = run(&Actor::reader(1, Duration::ZERO, Duration::from_secs(1)), &resource);

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, EventKind::ALL);
        assert_eq!(events[2].value, Some(5));
        assert!(events[3].at - events[2].at >= Duration::from_millis(10));
        assert!(resource.coordinator().snapshot().is_idle());
        assert_eq!(resource.into_inner(), 5);
    }

    #[test]
    fn test_writer_increments() {
        let resource = SharedResource::new(0);
        let writer = Actor::writer(2, Duration::from_secs(1), Duration::ZERO);

        let first = run(&writer, &resource);
        let second = run(&writer, &resource);

        assert!(first[0].at >= Duration::from_millis(10));
        assert_eq!(first[2].value, Some(1));
        assert_eq!(second[2].value, Some(2));
        assert!(first.iter().all(|e| e.actor == 2 && e.role == Role::Writer));
        assert_eq!(*resource.read(), 2);
    }
}
