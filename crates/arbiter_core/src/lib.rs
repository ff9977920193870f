//! # ARBITER Core Engine
//!
//! Writer-preference reader/writer coordination for threads contending
//! over one shared resource:
//! - Any number of readers inside at once
//! - Writers inside alone
//! - Once a writer registers, no later reader overtakes it
//!
//! ## Architecture Rules
//!
//! 1. **Four operations** - `acquire_read`, `release_read`,
//!    `acquire_write`, `release_write`. Everything else is built on them.
//! 2. **Never fail, only block** - there is no timeout and no cancellation.
//! 3. **Private state** - counters and gates never leave the coordinator.
//!    Observers get a [`CoordinatorSnapshot`].
//!
//! ## Example
//!
//! ```rust
//! use arbiter_core::{AccessCoordinator, Phase};
//!
//! let coordinator = AccessCoordinator::new();
//! let read = coordinator.read();
//! assert_eq!(coordinator.snapshot().phase(), Phase::Reading { readers: 1 });
//! drop(read);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod coordinator;
pub mod resource;
pub mod sync;

pub use coordinator::{
    AccessCoordinator, AccessStats, CoordinatorSnapshot, Phase, ReadAccess, WriteAccess,
};
pub use resource::{ReadGuard, SharedResource, WriteGuard};
pub use sync::BinaryGate;
