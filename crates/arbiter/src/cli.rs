//! # Command Line
//!
//! ```bash
//! arbiter <scenario-file>
//! ```
//!
//! Exit codes: `0` when every actor completed, `1` on wrong usage, an
//! unreadable or invalid scenario, or a failed run.

use arbiter_sim::{Scenario, Simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

/// Exit code for a completed run.
pub const EXIT_OK: u8 = 0;

/// Exit code for every kind of failure.
pub const EXIT_FAILURE: u8 = 1;

/// Usage line printed on wrong argument count.
pub const USAGE: &str = "Usage: arbiter <scenario-file>";

/// Runs the CLI. `args` includes the program name.
///
/// Returns the process exit code.
#[must_use]
pub fn run(args: &[String]) -> u8 {
    let [_, path] = args else {
        eprintln!("{USAGE}");
        return EXIT_FAILURE;
    };

    let scenario = match Scenario::load(path) {
        Ok(scenario) => scenario,
        Err(err) => {
            tracing::error!(path = %path, "scenario rejected");
            eprintln!("error: {err}");
            return EXIT_FAILURE;
        }
    };

    tracing::info!(path = %path, actors = scenario.len(), "loaded scenario");

    let report = match Simulation::new(SimulationConfig::default()).and_then(|sim| sim.run(&scenario)) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "simulation failed");
            eprintln!("error: {err}");
            return EXIT_FAILURE;
        }
    };

    tracing::debug!(phase = ?report.final_snapshot.phase(), stats = ?report.stats, "final state");
    println!("{}", report.summary());
    EXIT_OK
}

/// Installs the `fmt` subscriber. `RUST_LOG` overrides the `info` default.
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}
