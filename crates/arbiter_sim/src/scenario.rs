//! # Scenario Loading
//!
//! ## Format
//!
//! ```text
//! # id role delay duration
//! 1 R 0   3
//! 2 W 0.5 1
//! 3 R 0.6 1
//! ```
//!
//! One actor per line, whitespace-separated. `role` is `R` or `W`,
//! `delay` and `duration` are seconds. Blank lines and `#` comments are
//! skipped. Anything else that does not parse is rejected with the
//! offending line number. Nothing is guessed.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::actor::{Actor, ActorId, Role};
use crate::error::{ScenarioError, ScenarioResult};

/// An ordered, validated list of actors.
///
/// Never empty, and every id is unique.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    actors: Vec<Actor>,
}

impl Scenario {
    /// Validates a list of actors.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Empty`] for an empty list and
    /// [`ScenarioError::DuplicateId`] (with a 1-based position as the
    /// line) for a repeated id.
    pub fn new(actors: Vec<Actor>) -> ScenarioResult<Self> {
        if actors.is_empty() {
            return Err(ScenarioError::Empty);
        }

        let mut seen = HashSet::with_capacity(actors.len());
        for (index, actor) in actors.iter().enumerate() {
            if !seen.insert(actor.id) {
                return Err(ScenarioError::DuplicateId {
                    line: index + 1,
                    id: actor.id,
                });
            }
        }

        Ok(Self { actors })
    }

    /// Parses scenario text.
    ///
    /// # Errors
    ///
    /// Returns the first line that fails to parse, a duplicate id, or
    /// [`ScenarioError::Empty`] if no line describes an actor.
    pub fn parse(input: &str) -> ScenarioResult<Self> {
        let mut actors = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in input.lines().enumerate() {
            let line = index + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let actor = parse_line(line, content)?;
            if !seen.insert(actor.id) {
                return Err(ScenarioError::DuplicateId { line, id: actor.id });
            }
            actors.push(actor);
        }

        if actors.is_empty() {
            return Err(ScenarioError::Empty);
        }

        tracing::debug!(actors = actors.len(), "parsed scenario");
        Ok(Self { actors })
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read, otherwise
    /// whatever [`Scenario::parse`] returns.
    pub fn load(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The actors, in file order.
    #[must_use]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Number of actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Always `false`: an empty scenario is rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Looks up an actor by id.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Number of actors with the given role.
    #[must_use]
    pub fn count(&self, role: Role) -> usize {
        self.actors.iter().filter(|actor| actor.role == role).count()
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> ScenarioResult<Self> {
        Self::parse(s)
    }
}

/// Parses one non-blank, non-comment line.
fn parse_line(line: usize, content: &str) -> ScenarioResult<Actor> {
    let malformed = |reason: String| ScenarioError::MalformedLine {
        line,
        content: content.to_string(),
        reason,
    };

    let fields: Vec<&str> = content.split_whitespace().collect();
    let [id, role, delay, duration] = fields[..] else {
        return Err(malformed(format!("expected 4 fields, found {}", fields.len())));
    };

    let id: ActorId = id
        .parse()
        .map_err(|_| malformed(format!("actor id {id:?} is not an integer")))?;

    let mut chars = role.chars();
    let role = match (chars.next(), chars.next()) {
        (Some(code), None) => Role::from_code(code),
        _ => None,
    }
    .ok_or_else(|| ScenarioError::UnknownRole {
        line,
        role: role.to_string(),
    })?;

    let arrival_delay = parse_seconds(line, "delay", delay)?;
    let hold_duration = parse_seconds(line, "duration", duration)?;

    Ok(Actor::new(id, role, arrival_delay, hold_duration))
}

/// Parses a non-negative, finite number of seconds.
fn parse_seconds(line: usize, field: &'static str, raw: &str) -> ScenarioResult<Duration> {
    raw.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| ScenarioError::InvalidDuration {
            line,
            field,
            value: raw.to_string(),
        })
}
