//! # Binary Gate
//!
//! A single-permit token that can be taken by one thread and handed back
//! by another.
//!
//! ## Why not `Mutex<()>`?
//!
//! ```text
//! Reader 1 (first in):  exclusive.acquire()
//! Reader 2 (last out):  exclusive.release()   <- different thread!
//! ```
//!
//! The reader group holds the exclusive lock as a whole. A guard-based
//! mutex ties the unlock to the locking thread, so it cannot express
//! this. The gate is a `bool` permit protected by a `parking_lot` mutex,
//! with a condvar to park waiters.
//!
//! ## Wake Order
//!
//! `release()` wakes one waiter. Which one is up to `parking_lot`.
//! No FIFO ordering is promised.

use parking_lot::{Condvar, Mutex};

/// A binary permit: either available or held by exactly one holder.
///
/// Unlike a counting semaphore, releasing a gate that is already
/// available is a bug and panics.
#[derive(Debug)]
pub struct BinaryGate {
    /// `true` while the permit is available.
    available: Mutex<bool>,
    /// Signalled when the permit becomes available.
    released: Condvar,
}

impl BinaryGate {
    /// Creates a gate with its permit available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: Mutex::new(true),
            released: Condvar::new(),
        }
    }

    /// Takes the permit, blocking until it is available.
    pub fn acquire(&self) {
        let mut available = self.available.lock();
        while !*available {
            self.released.wait(&mut available);
        }
        *available = false;
    }

    /// Hands the permit back and wakes one waiter.
    ///
    /// May be called from any thread, not just the one that acquired.
    ///
    /// # Panics
    ///
    /// Panics if the permit is not currently held.
    pub fn release(&self) {
        let mut available = self.available.lock();
        assert!(!*available, "released a gate that is not held");
        *available = true;
        drop(available);
        self.released.notify_one();
    }

    /// Returns whether the permit is currently held.
    ///
    /// The answer may be stale by the time the caller looks at it.
    #[must_use]
    pub fn is_held(&self) -> bool {
        !*self.available.lock()
    }
}

impl Default for BinaryGate {
    fn default() -> Self {
        Self::new()
    }
}
