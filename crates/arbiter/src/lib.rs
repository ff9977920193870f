//! # ARBITER
//!
//! Command line front end for the writer-preference access coordinator.
//! Loads a scenario, runs one thread per actor against
//! [`arbiter_sim::Simulation`] and prints the report.
//!
//! The coordinator lives in `arbiter_core`, the harness in `arbiter_sim`.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
