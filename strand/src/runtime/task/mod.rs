//! Asynchronous task primitives.
//!
//! This module defines how the runtime represents, schedules and joins
//! lightweight tasks:
//! - [`spawn`] schedules a future on the current runtime,
//! - [`JoinHandle`] awaits a single task,
//! - [`JoinSet`] owns a group of tasks and yields them in completion order.
//!
//! A panic inside a task is caught by the worker that polled it and
//! surfaces as [`JoinError::Panicked`]; the worker keeps running.

mod core;
mod error;
mod handle;
mod set;

pub(crate) mod state;

pub(crate) use self::core::{Runnable, Task};

pub use self::core::spawn;
pub use error::JoinError;
pub use handle::JoinHandle;
pub use set::JoinSet;
