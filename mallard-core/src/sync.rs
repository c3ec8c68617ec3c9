//! A mutually-exclusive holder for state shared across subsystems.
//!
//! The dispatch loop is the only read-modify-write writer; renderers and the
//! script layer either take a short-lived copy or hold the guard across a
//! multi-field read. Every publish is atomic from the readers' point of view.

use std::sync::{Mutex, MutexGuard};

/// Wraps a value behind a mutex with scoped access, copy-out, and one-time
/// extraction.
#[derive(Debug, Default)]
pub struct Synchronized<T> {
    value: Mutex<T>,
}

impl<T> Synchronized<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Scoped exclusive access. The guard is released on every exit path,
    /// including early returns and propagated failures. A panic while the
    /// lock was held does not poison it for later callers.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        match self.value.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// One-time destructive extraction of the wrapped value.
    pub fn into_inner(self) -> T {
        match self.value.into_inner() {
            Ok(value) => value,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Clone> Synchronized<T> {
    /// Duplicates the value, holding the lock only for the clone.
    pub fn copy(&self) -> T {
        self.lock().clone()
    }
}
