//! Synchronization primitives usable from both worlds.
//!
//! [`CancellationToken`] delivers a cooperative interrupt to a unit of work
//! whether it is suspended on an OS thread or inside a lightweight task.

mod cancel;

pub use cancel::{Cancelled, CancellationToken, WaitForCancellation};
