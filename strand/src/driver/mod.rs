//! Timer driver.
//!
//! The driver runs on its own thread and owns every pending timer of a
//! runtime. Tasks never block on time: they register a deadline together
//! with their waker, return `Pending`, and the driver wakes them once the
//! deadline has passed.
//!
//! Communication goes through [`Command`] messages sent over a channel,
//! so registering a timer never contends with the executor's queues.

mod core;
mod timer;

pub(crate) mod command;

pub(crate) use self::core::{Driver, DriverHandle};
