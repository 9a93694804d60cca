//! # Strand
//!
//! **Strand** runs bounded batches of independent, mostly-waiting units of
//! work and measures how the execution model changes the wall-clock cost.
//!
//! A batch is N units that each suspend for a fixed delay and then produce
//! a small integer. The same batch can run:
//!
//! - on a **fixed pool of OS threads**, where every suspended unit holds a
//!   thread, or
//! - as **one lightweight task per unit** on a small work-stealing runtime,
//!   where a suspended unit only holds a timer entry.
//!
//! The crate ships the pieces both strategies are built from:
//!
//! - a **work-stealing executor** with `spawn`, `block_on`, `JoinHandle` and
//!   `JoinSet`,
//! - a **timer driver** backing [`time::sleep`],
//! - a **cancellation token** usable from blocking and async code,
//! - a **thread pool** with joinable job handles,
//! - the `#[strand::test]` attribute for async tests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strand::batch::{BatchRunner, FixedPool, PerUnit, Work, DEFAULT_DELAY};
//!
//! let runner = BatchRunner::new(Work::random(DEFAULT_DELAY));
//!
//! let pooled = runner.run(&FixedPool::new(100), 1_000)?;
//! let per_unit = runner.run(&PerUnit::new(), 1_000)?;
//!
//! assert!(per_unit.elapsed < pooled.elapsed);
//! ```
//!
//! ## Modules
//!
//! - [`batch`]: Units of work, execution strategies and the batch runner
//! - [`pool`]: Fixed-size OS thread pool
//! - [`sync`]: Cancellation token
//! - [`task`]: Spawning and joining lightweight tasks
//! - [`time`]: Sleep and elapsed-time instrumentation

mod driver;
mod runtime;
mod utils;

pub mod batch;
pub mod pool;
pub mod sync;
pub mod time;

pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;

pub use strand_macros::*;
