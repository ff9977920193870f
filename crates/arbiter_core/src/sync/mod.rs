//! # Synchronization Primitives
//!
//! ## The Problem
//!
//! ```text
//! Readers:  many at once, as long as nobody writes
//! Writers:  one at a time, nobody else inside
//!
//! Plain RwLock: wake policy decides who wins -> writers can starve
//! ```
//!
//! ## The Solution: Turnstile + Exclusive Lock
//!
//! ```text
//!   Reader ──> [Turnstile] ──> [reader-count guard] ──> [Exclusive Lock]
//!                 ▲                                          ▲
//!   Writer ───────┘ (first of batch closes it)               │
//!          └──────> [writer-count guard] ────────────────────┘
//! ```
//!
//! Both the turnstile and the exclusive lock are [`BinaryGate`]s: one
//! permit that any thread may hand back.

mod gate;

pub use gate::BinaryGate;
