//! # Actors
//!
//! One simulated participant: who it is, what it wants, when it shows up
//! and how long it stays.

use std::fmt;
use std::time::Duration;

/// Actor identifier as written in the scenario.
pub type ActorId = i32;

/// What an actor wants from the shared resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Shared access.
    Reader,
    /// Exclusive access.
    Writer,
}

impl Role {
    /// Parses the single-character scenario code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'R' => Some(Self::Reader),
            'W' => Some(Self::Writer),
            _ => None,
        }
    }

    /// The single-character scenario code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Reader => 'R',
            Self::Writer => 'W',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reader => "Reader",
            Self::Writer => "Writer",
        })
    }
}

/// An actor descriptor. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    /// Scenario id.
    pub id: ActorId,
    /// Reader or writer.
    pub role: Role,
    /// Time from simulation start until the actor asks for access.
    pub arrival_delay: Duration,
    /// Time spent holding access.
    pub hold_duration: Duration,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: ActorId, role: Role, arrival_delay: Duration, hold_duration: Duration) -> Self {
        Self {
            id,
            role,
            arrival_delay,
            hold_duration,
        }
    }

    /// Creates a reader.
    #[must_use]
    pub const fn reader(id: ActorId, arrival_delay: Duration, hold_duration: Duration) -> Self {
        Self::new(id, Role::Reader, arrival_delay, hold_duration)
    }

    /// Creates a writer.
    #[must_use]
    pub const fn writer(id: ActorId, arrival_delay: Duration, hold_duration: Duration) -> Self {
        Self::new(id, Role::Writer, arrival_delay, hold_duration)
    }
}

impl fmt::Display for Actor {
    /// Formats the actor back into scenario syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.id,
            self.role.code(),
            self.arrival_delay.as_secs_f64(),
            self.hold_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::from_code('R'), Some(Role::Reader));
        assert_eq!(Role::from_code('W'), Some(Role::Writer));
        assert_eq!(Role::from_code('P'), None);
        assert_eq!(Role::from_code('r'), None);
        assert_eq!(Role::Writer.code(), 'W');
    }

    #[test]
    fn test_actor_display_is_scenario_syntax() {
        let actor = Actor::writer(2, Duration::from_millis(500), Duration::from_secs(1));
        assert_eq!(actor.to_string(), "2 W 0.5 1");
    }
}
