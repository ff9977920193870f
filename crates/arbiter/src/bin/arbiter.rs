//! # Arbiter
//!
//! Runs a reader/writer scenario under writer preference.
//!
//! ## Usage
//!
//! ```bash
//! arbiter scenario.txt
//! RUST_LOG=arbiter_core=trace arbiter scenario.txt
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    arbiter::cli::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    ExitCode::from(arbiter::cli::run(&args))
}
