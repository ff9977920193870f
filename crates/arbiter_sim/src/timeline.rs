//! # Timelines
//!
//! The ordered record of one simulation run, plus the checks that prove
//! the access policy held.
//!
//! Runners stamp `Admitted` after acquiring and `Finished` before
//! releasing, so every recorded window sits inside the real one. Two
//! recorded windows overlapping therefore means two real holds did too.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::actor::{ActorId, Role};
use crate::event::{EventKind, LifecycleEvent};

/// A broken policy, found after the fact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A writer held access at the same time as another actor.
    #[error("writer {writer} overlapped with actor {other}")]
    Overlap {
        /// The writer.
        writer: ActorId,
        /// The actor it overlapped with.
        other: ActorId,
    },

    /// A reader that queued behind a writer got in first.
    #[error("reader {reader} was admitted before writer {writer} finished")]
    Overtaken {
        /// The late reader.
        reader: ActorId,
        /// The writer it overtook.
        writer: ActorId,
    },

    /// An actor is missing an event, has a duplicate, or has them out of order.
    #[error("actor {actor} recorded {count} {kind:?} events, expected exactly one in lifecycle order")]
    Unbalanced {
        /// The actor.
        actor: ActorId,
        /// The first kind found wrong.
        kind: EventKind,
        /// How many were found.
        count: usize,
    },

    /// Grants and releases on the coordinator do not match.
    #[error("coordinator counters unbalanced: {reads_granted}/{reads_released} reads, {writes_granted}/{writes_released} writes")]
    CountersUnbalanced {
        /// Reads granted.
        reads_granted: u64,
        /// Reads released.
        reads_released: u64,
        /// Writes granted.
        writes_granted: u64,
        /// Writes released.
        writes_released: u64,
    },

    /// The final value does not match the number of writes.
    #[error("{writes} writes left the value at {value}")]
    LostUpdate {
        /// Writes granted.
        writes: u64,
        /// Final value of the shared counter.
        value: u64,
    },

    /// The coordinator was not idle after every actor finished.
    #[error("coordinator not idle after the run: {readers} readers, {writers} writers")]
    NotIdle {
        /// Readers still counted.
        readers: u32,
        /// Writers still counted.
        writers: u32,
    },
}

/// The interval an actor held access for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldWindow {
    /// Who.
    pub actor: ActorId,
    /// Reader or writer.
    pub role: Role,
    /// `Admitted` time.
    pub start: Duration,
    /// `Finished` time.
    pub end: Duration,
}

impl HeldWindow {
    /// Whether two windows share any instant beyond a common endpoint.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Lifecycle events sorted by time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    events: Vec<LifecycleEvent>,
}

impl Timeline {
    /// Builds a timeline. Events with equal timestamps keep arrival order.
    #[must_use]
    pub fn from_events(mut events: Vec<LifecycleEvent>) -> Self {
        events.sort_by_key(|event| event.at);
        Self { events }
    }

    /// All events, in time order.
    #[must_use]
    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// First event of `kind` for `actor`.
    #[must_use]
    pub fn event(&self, actor: ActorId, kind: EventKind) -> Option<&LifecycleEvent> {
        self.events
            .iter()
            .find(|event| event.actor == actor && event.kind == kind)
    }

    /// One window per actor that both got in and finished, ordered by start.
    #[must_use]
    pub fn held_windows(&self) -> Vec<HeldWindow> {
        self.events
            .iter()
            .filter(|event| event.kind == EventKind::Admitted)
            .filter_map(|admitted| {
                let finished = self.event(admitted.actor, EventKind::Finished)?;
                Some(HeldWindow {
                    actor: admitted.actor,
                    role: admitted.role,
                    start: admitted.at,
                    end: finished.at,
                })
            })
            .collect()
    }

    /// Highest number of reader windows open at once.
    #[must_use]
    pub fn max_concurrent_readers(&self) -> usize {
        // (time, delta) with closes sorted before opens at the same instant.
        let mut edges: Vec<(Duration, i8)> = self
            .held_windows()
            .into_iter()
            .filter(|window| window.role == Role::Reader)
            .flat_map(|window| [(window.start, 1), (window.end, -1)])
            .collect();
        edges.sort_unstable();

        let mut open = 0usize;
        let mut max = 0usize;
        for (_, delta) in edges {
            if delta > 0 {
                open += 1;
                max = max.max(open);
            } else {
                open -= 1;
            }
        }
        max
    }

    /// No writer window overlaps any other window.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation::Overlap`] found.
    pub fn check_mutual_exclusion(&self) -> Result<(), Violation> {
        let windows = self.held_windows();
        for writer in windows.iter().filter(|window| window.role == Role::Writer) {
            if let Some(other) = windows
                .iter()
                .find(|other| other.actor != writer.actor && writer.overlaps(other))
            {
                return Err(Violation::Overlap {
                    writer: writer.actor,
                    other: other.actor,
                });
            }
        }
        Ok(())
    }

    /// A reader that queued more than `slack` after a writer queued is not
    /// admitted before that writer finishes.
    ///
    /// `slack` absorbs the gap between recording `Queued` and actually
    /// registering with the coordinator.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation::Overtaken`] found.
    pub fn check_writer_preference(&self, slack: Duration) -> Result<(), Violation> {
        let queued = |role: Role| {
            self.events
                .iter()
                .filter(move |event| event.role == role && event.kind == EventKind::Queued)
        };

        for writer in queued(Role::Writer) {
            let Some(finished) = self.event(writer.actor, EventKind::Finished) else {
                continue;
            };
            let cutoff = writer.at.saturating_add(slack);
            for reader in queued(Role::Reader).filter(|reader| reader.at > cutoff) {
                let Some(admitted) = self.event(reader.actor, EventKind::Admitted) else {
                    continue;
                };
                if admitted.at < finished.at {
                    return Err(Violation::Overtaken {
                        reader: reader.actor,
                        writer: writer.actor,
                    });
                }
            }
        }
        Ok(())
    }

    /// Every actor recorded exactly one event of each kind, in lifecycle order.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation::Unbalanced`] found.
    pub fn check_balanced(&self) -> Result<(), Violation> {
        let mut seen: HashMap<ActorId, Vec<EventKind>> = HashMap::new();
        for event in &self.events {
            seen.entry(event.actor).or_default().push(event.kind);
        }

        let mut actors: Vec<_> = seen.into_iter().collect();
        actors.sort_unstable_by_key(|(actor, _)| *actor);

        for (actor, kinds) in actors {
            for (position, kind) in EventKind::ALL.into_iter().enumerate() {
                let count = kinds.iter().filter(|k| **k == kind).count();
                if count != 1 || kinds.get(position) != Some(&kind) {
                    return Err(Violation::Unbalanced { actor, kind, count });
                }
            }
        }
        Ok(())
    }

    /// Runs every timeline check.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn verify(&self, slack: Duration) -> Result<(), Violation> {
        self.check_balanced()?;
        self.check_mutual_exclusion()?;
        self.check_writer_preference(slack)
    }

    /// Values written by writers, in admission order.
    #[must_use]
    pub fn written_values(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter(|event| event.role == Role::Writer && event.kind == EventKind::Admitted)
            .filter_map(|event| event.value)
            .collect()
    }

    /// Actor ids in the order they were admitted.
    #[must_use]
    pub fn admission_order(&self) -> Vec<ActorId> {
        self.events
            .iter()
            .filter(|event| event.kind == EventKind::Admitted)
            .map(|event| event.actor)
            .collect()
    }
}
