//! # ARBITER Simulation Harness
//!
//! Drives a scenario of readers and writers through the core
//! [`arbiter_core::AccessCoordinator`], one OS thread per actor, and
//! records what happened.
//!
//! ## Pipeline
//!
//! ```text
//! scenario file ──> Scenario ──> Simulation::run ──> SimulationReport
//!                                  │                    │
//!                          ActorRunner × N         Timeline checks
//! ```
//!
//! ## Example
//!
//! ```rust
//! use arbiter_sim::{Scenario, Simulation, SimulationConfig};
//! use std::time::Duration;
//!
//! let scenario = Scenario::parse("1 R 0 0.2\n2 W 0.05 0.1\n3 R 0.1 0.1\n").unwrap();
//! let report = Simulation::new(SimulationConfig::fast(0.5))
//!     .unwrap()
//!     .run(&scenario)
//!     .unwrap();
//!
//! assert_eq!(report.timeline.admission_order(), vec![1, 2, 3]);
//! assert!(report.verify(Duration::from_millis(10)).is_ok());
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actor;
pub mod config;
pub mod error;
pub mod event;
pub mod harness;
pub mod runner;
pub mod scenario;
pub mod timeline;

pub use actor::{Actor, ActorId, Role};
pub use config::SimulationConfig;
pub use error::{ConfigError, ConfigResult, ScenarioError, ScenarioResult, SimError, SimResult};
pub use event::{ChannelSink, EventKind, EventSink, LifecycleEvent, MemorySink};
pub use harness::{Simulation, SimulationReport};
pub use runner::ActorRunner;
pub use scenario::Scenario;
pub use timeline::{HeldWindow, Timeline, Violation};
