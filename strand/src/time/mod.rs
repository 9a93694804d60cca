//! Time utilities backed by the runtime's timer driver.
//!
//! - [`sleep`] suspends a task without blocking its worker thread,
//! - [`instrumented`] measures how long a future takes once polled.

mod instrumented;
mod sleep;

#[doc(inline)]
pub use instrumented::{Instrumented, instrumented};

#[doc(inline)]
pub use sleep::{Sleep, sleep};
