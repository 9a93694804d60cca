//! Fixed-size pool of OS threads.
//!
//! The heavyweight counterpart of the runtime: every job occupies one
//! worker thread from start to finish, including while it blocks, so at
//! most `workers` jobs make progress at any time.

mod core;
mod handle;

pub use self::core::ThreadPool;
pub use handle::{PoolError, PoolHandle};
