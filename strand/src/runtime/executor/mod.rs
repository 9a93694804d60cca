//! Task executor implementation.
//!
//! - [`core`]: spawns the worker threads and owns their lifecycle,
//! - [`worker`]: the per-thread loop that finds and runs tasks.

pub(crate) mod core;
pub(crate) mod worker;
