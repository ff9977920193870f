//! # Lifecycle Events
//!
//! ```text
//! ┌──────────┐  record()  ┌──────────────┐  iter()  ┌──────────┐
//! │  Runner  │───────────>│  EventSink   │─────────>│ Harness  │
//! │ (actor)  │            │ (crossbeam)  │          │(timeline)│
//! └──────────┘            └──────────────┘          └──────────┘
//! ```
//!
//! Every runner owns a clone of the sink. Events are produced outside the
//! access protocol or while the actor already holds access, so a sink
//! that blocks delays that actor only until the harness drains.

use std::fmt;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::actor::{ActorId, Role};

/// The four points of an actor's life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// Arrival delay elapsed.
    Arrived,
    /// About to request access.
    Queued,
    /// Access granted.
    Admitted,
    /// Hold elapsed, about to release.
    Finished,
}

impl EventKind {
    /// All kinds, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Arrived, Self::Queued, Self::Admitted, Self::Finished];

    /// Lowercase label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Arrived => "arrived",
            Self::Queued => "queued",
            Self::Admitted => "admitted",
            Self::Finished => "finished",
        }
    }
}

/// One observed transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Who.
    pub actor: ActorId,
    /// Reader or writer.
    pub role: Role,
    /// What happened.
    pub kind: EventKind,
    /// Offset from the simulation epoch.
    pub at: Duration,
    /// On `Admitted`: the value a reader saw, or the value a writer wrote.
    pub value: Option<u64>,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>8.3}s] {} {}: {}",
            self.at.as_secs_f64(),
            self.role,
            self.actor,
            self.kind.label()
        )?;
        if let Some(value) = self.value {
            write!(f, " (value {value})")?;
        }
        Ok(())
    }
}

/// Destination for lifecycle events.
pub trait EventSink: Send + Sync {
    /// Records one event.
    ///
    /// May block until the collector drains, as a bounded [`ChannelSink`]
    /// does when its channel is full.
    fn record(&self, event: LifecycleEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: LifecycleEvent) {
        (**self).record(event);
    }
}

/// Sends events over a crossbeam channel to a single collector.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<LifecycleEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiving end.
    ///
    /// `None` gives an unbounded channel.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> (Self, Receiver<LifecycleEvent>) {
        let (sender, receiver) = match capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn record(&self, event: LifecycleEvent) {
        // A dropped collector means nobody is watching.
        let _ = self.sender.send(event);
    }
}

/// Buffers events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded since the last take.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drains the buffer.
    #[must_use]
    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: LifecycleEvent) {
        self.events.lock().push(event);
    }
}
