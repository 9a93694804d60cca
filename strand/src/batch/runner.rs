use super::{BatchError, CANCELLED, ExecutionStrategy, Submission, UnitOfWork, Work};
use crate::sync::CancellationToken;
use crate::utils::lock;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Outcome of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// One result per unit, in collection order.
    pub results: Vec<i32>,

    /// Exact sum of `results`.
    pub sum: i64,

    /// How many units were interrupted and reported [`CANCELLED`].
    pub cancelled: usize,

    /// Wall-clock time spent executing the batch.
    pub elapsed: Duration,
}

impl BatchReport {
    fn new(results: Vec<i32>, elapsed: Duration) -> Self {
        let sum = results.iter().map(|&value| i64::from(value)).sum();
        let cancelled = results.iter().filter(|&&value| value == CANCELLED).count();

        Self {
            results,
            sum,
            cancelled,
            elapsed,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs batches of identical units of work and aggregates their results.
///
/// `run` blocks until the whole batch is done. While it runs, other threads
/// may interrupt individual units with [`interrupt`](Self::interrupt) or
/// the whole batch with [`interrupt_all`](Self::interrupt_all). When several
/// batches run concurrently on the same runner, interrupts reach the most
/// recently started one.
///
/// # Examples
///
/// ```rust,ignore
/// use strand::batch::{BatchRunner, FixedPool, Work, DEFAULT_DELAY};
///
/// let runner = BatchRunner::new(Work::random(DEFAULT_DELAY));
/// let report = runner.run(&FixedPool::new(100), 1_000)?;
/// println!("sum = {}; time = {} ms", report.sum, report.elapsed.as_millis());
/// ```
#[derive(Debug)]
pub struct BatchRunner {
    work: Work,

    /// Tokens of the most recently started batch, indexed by unit id.
    active: Mutex<Option<Arc<[CancellationToken]>>>,
}

impl BatchRunner {
    pub fn new(work: Work) -> Self {
        Self {
            work,
            active: Mutex::new(None),
        }
    }

    pub fn work(&self) -> &Work {
        &self.work
    }

    /// Runs `count` units with `strategy` and blocks until all of them
    /// completed.
    ///
    /// # Errors
    ///
    /// - [`BatchError::Empty`] if `count == 0`.
    /// - The first unexpected failure reported by the strategy. The other
    ///   units are interrupted before it is returned.
    /// - [`BatchError::Incomplete`] if the strategy returned fewer or more
    ///   results than units.
    pub fn run(
        &self,
        strategy: &dyn ExecutionStrategy,
        count: usize,
    ) -> Result<BatchReport, BatchError> {
        if count == 0 {
            return Err(BatchError::Empty);
        }

        let submissions: Vec<_> = (0..count)
            .map(|id| Submission::new(UnitOfWork::new(id)))
            .collect();

        let tokens: Arc<[CancellationToken]> = submissions.iter().map(|s| s.token.clone()).collect();
        *lock(&self.active) = Some(tokens.clone());

        tracing::info!(units = count, %strategy, "batch started");

        let start = Instant::now();
        let outcome = strategy.run_batch(&self.work, submissions);
        let elapsed = start.elapsed();

        {
            // A newer batch may have replaced our tokens meanwhile.
            let mut active = lock(&self.active);
            if active.as_ref().is_some_and(|current| Arc::ptr_eq(current, &tokens)) {
                *active = None;
            }
        }

        let results = outcome?;

        if results.len() != count {
            return Err(BatchError::Incomplete {
                expected: count,
                collected: results.len(),
            });
        }

        let report = BatchReport::new(results, elapsed);

        tracing::info!(
            units = count,
            sum = report.sum,
            cancelled = report.cancelled,
            elapsed = ?report.elapsed,
            "batch finished"
        );

        Ok(report)
    }

    /// Interrupts the unit `id` of the running batch.
    ///
    /// Returns `false` if no batch is running or it has no such unit.
    pub fn interrupt(&self, id: usize) -> bool {
        match lock(&self.active).as_ref().and_then(|tokens| tokens.get(id)) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Interrupts every unit of the running batch and returns how many
    /// tokens were signalled.
    pub fn interrupt_all(&self) -> usize {
        let active = lock(&self.active);
        let tokens = active.as_deref().unwrap_or_default();

        for token in tokens {
            token.cancel();
        }

        tokens.len()
    }
}
