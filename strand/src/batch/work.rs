use super::{UnitOfWork, WorkError};
use crate::sync::CancellationToken;
use crate::time::sleep;
use crate::utils::panic_message;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;

/// Result reported by a unit whose suspension was interrupted.
pub const CANCELLED: i32 = -1;

/// Nominal suspension of a unit of work.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

type Producer = dyn Fn(UnitOfWork) -> Result<i32, WorkError> + Send + Sync;

/// What every unit of a batch does: suspend for `delay`, then call the
/// producer.
///
/// The suspension is the only point where a unit blocks and the only point
/// where it observes cancellation. How it suspends depends on the strategy:
/// [`call_blocking`](Self::call_blocking) parks the OS thread,
/// [`call`](Self::call) yields the lightweight task.
///
/// Cloning is cheap; the producer is shared.
#[derive(Clone)]
pub struct Work {
    delay: Duration,
    producer: Arc<Producer>,
}

impl Work {
    pub fn new<F>(delay: Duration, producer: F) -> Self
    where
        F: Fn(UnitOfWork) -> Result<i32, WorkError> + Send + Sync + 'static,
    {
        Self {
            delay,
            producer: Arc::new(producer),
        }
    }

    /// Work that produces a pseudo-random integer in `[0, 100)`.
    pub fn random(delay: Duration) -> Self {
        Self::new(delay, |_| Ok(rand::thread_rng().gen_range(0..100)))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `unit` on the current OS thread.
    pub fn call_blocking(
        &self,
        unit: UnitOfWork,
        token: &CancellationToken,
    ) -> Result<i32, WorkError> {
        if token.sleep_blocking(self.delay).is_err() {
            return Ok(interrupted(unit));
        }

        self.produce(unit)
    }

    /// Runs `unit` inside a lightweight task.
    ///
    /// # Panics
    ///
    /// Panics if awaited outside of a runtime.
    pub async fn call(&self, unit: UnitOfWork, token: &CancellationToken) -> Result<i32, WorkError> {
        if token.run_until_cancelled(sleep(self.delay)).await.is_none() {
            return Ok(interrupted(unit));
        }

        self.produce(unit)
    }

    /// Calls the producer, turning a panic into [`WorkError::Panicked`].
    fn produce(&self, unit: UnitOfWork) -> Result<i32, WorkError> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.producer)(unit))).unwrap_or_else(|payload| {
            Err(WorkError::Panicked {
                id: unit.id(),
                message: panic_message(payload),
            })
        })
    }
}

fn interrupted(unit: UnitOfWork) -> i32 {
    tracing::info!(
        thread = thread::current().name().unwrap_or("unnamed"),
        unit = unit.id(),
        "unit cancelled"
    );

    CANCELLED
}

impl fmt::Debug for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Work")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
