//! Work-stealing scheduler queues.
//!
//! - [`injector`]: the global queue every wake-up lands in, also used to
//!   park idle workers,
//! - [`queue`]: per-worker local queues fed by `spawn` on a worker thread
//!   and drained by their owner first, by siblings when they run dry.

pub(crate) mod injector;
pub(crate) mod queue;
