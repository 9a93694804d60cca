//! Internal helpers shared by the runtime, the thread pool and the runner.
//!
//! - [`Slab`] gives stable, reusable indices (join sets, waker lists).
//! - [`panic_message`] turns a caught panic payload into a readable string.
//! - [`lock`] acquires a mutex, ignoring poisoning.

mod panic;
mod slab;

pub(crate) use panic::panic_message;
pub(crate) use slab::Slab;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
