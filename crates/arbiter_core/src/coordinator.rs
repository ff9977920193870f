//! # Access Coordinator
//!
//! Writer-preference reader/writer coordination (the "second
//! readers-writers problem").
//!
//! ## State
//!
//! ```text
//!   reader_count ─ guarded by its own mutex
//!   writer_count ─ guarded by its own mutex
//!   exclusive    ─ BinaryGate: held by the reader group OR one writer
//!   turnstile    ─ BinaryGate: held by readers one at a time on entry,
//!                  or by a whole writer batch
//! ```
//!
//! The two count guards and the exclusive lock are three distinct
//! primitives. A first writer parks on the turnstile while holding the
//! writer-count guard, and the first reader parks on the exclusive lock
//! while holding the reader-count guard. Sharing any of them deadlocks.
//!
//! ## State Machine
//!
//! ```text
//!            first acquire_read               first acquire_write
//!   Reading(1) <──────────── Idle ────────────> WriterBatch(1)
//!   Reading(n) ──────────────> │ <────────────── WriterBatch(m)
//!            last release_read       last release_write
//! ```
//!
//! Readers admitted before a batch closes the turnstile drain normally.
//! While they drain, the batch's writers wait on the exclusive lock.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::sync::BinaryGate;

/// Writer-preference reader/writer coordinator.
///
/// Exposes exactly four blocking operations. None of them can fail:
/// a caller either proceeds or waits until another thread releases.
///
/// ## Usage
///
/// ```rust
/// use arbiter_core::AccessCoordinator;
///
/// let coordinator = AccessCoordinator::new();
///
/// coordinator.acquire_read();
/// // ... read the shared resource ...
/// coordinator.release_read();
///
/// {
///     let _write = coordinator.write();
///     // ... exclusive access until the handle drops ...
/// }
///
/// assert!(coordinator.snapshot().is_idle());
/// ```
#[derive(Debug, Default)]
pub struct AccessCoordinator {
    /// Readers currently holding access.
    reader_count: Mutex<u32>,
    /// Writers currently registered (waiting or writing).
    writer_count: Mutex<u32>,
    /// Possession of the shared resource.
    exclusive: BinaryGate,
    /// Closed to new readers while a writer batch is active.
    turnstile: BinaryGate,
    /// Mirror of `reader_count` for lock-free snapshots.
    readers_gauge: AtomicU32,
    /// Mirror of `writer_count` for lock-free snapshots.
    writers_gauge: AtomicU32,
    /// Lifetime operation counters.
    counters: Counters,
}

/// Monotonic operation counters.
#[derive(Debug, Default)]
struct Counters {
    reads_granted: AtomicU64,
    reads_released: AtomicU64,
    writes_granted: AtomicU64,
    writes_released: AtomicU64,
    batches_opened: AtomicU64,
}

impl AccessCoordinator {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters as a reader, blocking while a writer batch is active.
    ///
    /// On return the resource is free of writers until the matching
    /// [`release_read`](Self::release_read).
    pub fn acquire_read(&self) {
        self.turnstile.acquire();
        {
            let mut readers = self.reader_count.lock();
            if *readers == 0 {
                self.exclusive.acquire();
                tracing::trace!("first reader took the exclusive lock");
            }
            *readers += 1;
            self.readers_gauge.store(*readers, Ordering::Release);
        }
        self.turnstile.release();

        self.counters.reads_granted.fetch_add(1, Ordering::Relaxed);
    }

    /// Leaves as a reader. The last reader out frees the exclusive lock.
    ///
    /// # Panics
    ///
    /// Panics if no reader is currently inside.
    pub fn release_read(&self) {
        let mut readers = self.reader_count.lock();
        assert!(*readers > 0, "release_read called with no active readers");
        *readers -= 1;
        self.readers_gauge.store(*readers, Ordering::Release);
        self.counters.reads_released.fetch_add(1, Ordering::Relaxed);

        if *readers == 0 {
            self.exclusive.release();
            tracing::trace!("last reader released the exclusive lock");
        }
    }

    /// Registers as a writer and blocks until exclusive possession.
    ///
    /// The first writer of a batch closes the turnstile, so no reader
    /// arriving after this call is admitted before the batch ends.
    /// Readers already inside are waited for.
    pub fn acquire_write(&self) {
        {
            let mut writers = self.writer_count.lock();
            if *writers == 0 {
                self.turnstile.acquire();
                self.counters.batches_opened.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("writer batch opened, turnstile closed");
            }
            *writers += 1;
            self.writers_gauge.store(*writers, Ordering::Release);
        }

        self.exclusive.acquire();
        self.counters.writes_granted.fetch_add(1, Ordering::Relaxed);
    }

    /// Gives up exclusive possession. The last writer of the batch
    /// reopens the turnstile.
    ///
    /// # Panics
    ///
    /// Panics if no writer is registered.
    pub fn release_write(&self) {
        assert!(
            self.writers_gauge.load(Ordering::Acquire) > 0,
            "release_write called with no registered writers"
        );

        self.counters.writes_released.fetch_add(1, Ordering::Relaxed);
        self.exclusive.release();

        let mut writers = self.writer_count.lock();
        *writers -= 1;
        self.writers_gauge.store(*writers, Ordering::Release);
        if *writers == 0 {
            self.turnstile.release();
            tracing::trace!("writer batch closed, turnstile reopened");
        }
    }

    /// Acquires read access released when the handle drops.
    pub fn read(&self) -> ReadAccess<'_> {
        self.acquire_read();
        ReadAccess { coordinator: self }
    }

    /// Acquires write access released when the handle drops.
    pub fn write(&self) -> WriteAccess<'_> {
        self.acquire_write();
        WriteAccess { coordinator: self }
    }

    /// Point-in-time view of the coordinator state.
    ///
    /// Does not touch the count guards, so it never waits behind a
    /// parked writer. Under contention the fields may come from
    /// slightly different instants.
    #[must_use]
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            readers: self.readers_gauge.load(Ordering::Acquire),
            writers: self.writers_gauge.load(Ordering::Acquire),
            exclusive_held: self.exclusive.is_held(),
            turnstile_held: self.turnstile.is_held(),
        }
    }

    /// Returns lifetime operation counters.
    #[must_use]
    pub fn stats(&self) -> AccessStats {
        AccessStats {
            reads_granted: self.counters.reads_granted.load(Ordering::Relaxed),
            reads_released: self.counters.reads_released.load(Ordering::Relaxed),
            writes_granted: self.counters.writes_granted.load(Ordering::Relaxed),
            writes_released: self.counters.writes_released.load(Ordering::Relaxed),
            batches_opened: self.counters.batches_opened.load(Ordering::Relaxed),
        }
    }
}

/// Read access held until dropped.
#[must_use = "read access is released as soon as the handle is dropped"]
#[derive(Debug)]
pub struct ReadAccess<'a> {
    coordinator: &'a AccessCoordinator,
}

impl Drop for ReadAccess<'_> {
    fn drop(&mut self) {
        self.coordinator.release_read();
    }
}

/// Write access held until dropped.
#[must_use = "write access is released as soon as the handle is dropped"]
#[derive(Debug)]
pub struct WriteAccess<'a> {
    coordinator: &'a AccessCoordinator,
}

impl Drop for WriteAccess<'_> {
    fn drop(&mut self) {
        self.coordinator.release_write();
    }
}

/// Observable coordinator state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorSnapshot {
    /// Readers currently inside.
    pub readers: u32,
    /// Writers registered (waiting or writing).
    pub writers: u32,
    /// Whether someone possesses the resource.
    pub exclusive_held: bool,
    /// Whether the turnstile is closed.
    pub turnstile_held: bool,
}

impl CoordinatorSnapshot {
    /// Derives the state-machine phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.writers > 0 {
            Phase::WriterBatch {
                writers: self.writers,
                draining_readers: self.readers,
            }
        } else if self.readers > 0 {
            Phase::Reading {
                readers: self.readers,
            }
        } else {
            Phase::Idle
        }
    }

    /// Nobody inside, nobody registered, both gates open.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.readers == 0 && self.writers == 0 && !self.exclusive_held && !self.turnstile_held
    }
}

/// Coordinator phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No readers inside, no writers registered.
    Idle,
    /// Readers inside, no writer registered.
    Reading {
        /// Readers inside.
        readers: u32,
    },
    /// A writer batch holds the turnstile.
    WriterBatch {
        /// Writers registered in the batch.
        writers: u32,
        /// Readers admitted before the batch, still finishing.
        draining_readers: u32,
    },
}

/// Lifetime operation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessStats {
    /// Completed `acquire_read` calls.
    pub reads_granted: u64,
    /// Completed `release_read` calls.
    pub reads_released: u64,
    /// Completed `acquire_write` calls.
    pub writes_granted: u64,
    /// Completed `release_write` calls.
    pub writes_released: u64,
    /// Writer batches opened (turnstile closed by a first writer).
    pub batches_opened: u64,
}

impl AccessStats {
    /// Every grant has a matching release.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.reads_granted == self.reads_released && self.writes_granted == self.writes_released
    }
}
