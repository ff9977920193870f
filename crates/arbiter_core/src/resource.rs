//! # Shared Resource
//!
//! A value whose every access goes through an [`AccessCoordinator`].
//!
//! ## Safety Note
//!
//! This module hands out `&T` and `&mut T` from an `UnsafeCell`. The
//! coordinator's exclusive lock is what makes that sound. All unsafe
//! blocks carry the argument inline.

#![allow(unsafe_code)]
//!
//! ## Architecture
//!
//! ```text
//!                 ┌───────────────────────────────┐
//!                 │        SharedResource<T>      │
//!                 │                               │
//!                 │  ┌─────────────┐  ┌────────┐  │
//!                 │  │ Coordinator │  │ value  │  │
//!                 │  └──────┬──────┘  └────────┘  │
//!                 └─────────┼─────────────────────┘
//!                           │
//!             ┌─────────────┴─────────────┐
//!             ▼                           ▼
//!     ┌──────────────┐            ┌──────────────┐
//!     │ ReadGuard    │            │ WriteGuard   │
//!     │ (&T, many)   │            │ (&mut T, one)│
//!     └──────────────┘            └──────────────┘
//! ```

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::coordinator::AccessCoordinator;

/// A value protected by a writer-preference coordinator.
///
/// ## Usage
///
/// ```rust
/// use arbiter_core::SharedResource;
///
/// let resource = SharedResource::new(0u64);
///
/// *resource.write() += 1;
/// assert_eq!(*resource.read(), 1);
/// ```
pub struct SharedResource<T> {
    coordinator: AccessCoordinator,
    value: UnsafeCell<T>,
}

// SAFETY: `&T` is only handed out while the reader group holds the
// exclusive lock and `&mut T` only while a single writer holds it, so
// sharing the resource across threads needs `T: Send + Sync`, exactly
// like `RwLock<T>`.
unsafe impl<T: Send + Sync> Sync for SharedResource<T> {}

impl<T> SharedResource<T> {
    /// Wraps `value` behind a fresh coordinator.
    pub fn new(value: T) -> Self {
        Self {
            coordinator: AccessCoordinator::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Enters as a reader. Blocks while a writer batch is active.
    pub fn read(&self) -> ReadGuard<'_, T> {
        self.coordinator.acquire_read();
        ReadGuard { resource: self }
    }

    /// Enters as a writer. Blocks until exclusive possession.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.coordinator.acquire_write();
        WriteGuard { resource: self }
    }

    /// The coordinator arbitrating this resource.
    #[must_use]
    pub fn coordinator(&self) -> &AccessCoordinator {
        &self.coordinator
    }

    /// Direct access through a unique borrow. No coordination needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the resource and returns the value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Default> Default for SharedResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for SharedResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedResource")
            .field("state", &self.coordinator.snapshot())
            .finish_non_exhaustive()
    }
}

/// Shared view of the value. Many may exist at once.
#[must_use = "read access is released as soon as the guard is dropped"]
pub struct ReadGuard<'a, T> {
    resource: &'a SharedResource<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the reader group holds the exclusive lock for as long
        // as this guard lives, so no `&mut T` exists.
        unsafe { &*self.resource.value.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.resource.coordinator.release_read();
    }
}

/// Exclusive view of the value.
#[must_use = "write access is released as soon as the guard is dropped"]
pub struct WriteGuard<'a, T> {
    resource: &'a SharedResource<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: this writer alone holds the exclusive lock.
        unsafe { &*self.resource.value.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: this writer alone holds the exclusive lock, and the
        // `&mut self` receiver prevents aliasing through this guard.
        unsafe { &mut *self.resource.value.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.resource.coordinator.release_write();
    }
}
