// src/sync.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a std mutex, recovering the data if a holder panicked.
///
/// Every guarded value in this crate (unit state, group state, output
/// writers) stays consistent across a panic, so poisoning carries no
/// information worth propagating.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
