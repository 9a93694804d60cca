//! The bounded task runner.
//!
//! A batch is N independent [`UnitOfWork`]s, each suspending for a fixed
//! delay and then producing a value. [`BatchRunner`] hands the batch to an
//! [`ExecutionStrategy`], waits for every unit, and reports the sum of the
//! results and the elapsed wall-clock time.
//!
//! Two strategies are provided:
//! - [`FixedPool`]: a bounded pool of OS threads, one unit per thread at a
//!   time,
//! - [`PerUnit`]: one lightweight task per unit on a [`Runtime`](crate::Runtime).
//!
//! ```rust,ignore
//! let runner = BatchRunner::new(Work::random(DEFAULT_DELAY));
//! let report = runner.run(&PerUnit::new(), 10_000)?;
//! println!("sum = {}; time = {} ms", report.sum, report.elapsed.as_millis());
//! ```

mod error;
mod runner;
mod strategy;
mod unit;
mod work;

pub use error::{BatchError, WorkError};
pub use runner::{BatchReport, BatchRunner};
pub use strategy::{ExecutionStrategy, FixedPool, PerUnit, Submission};
pub use unit::UnitOfWork;
pub use work::{CANCELLED, DEFAULT_DELAY, Work};
