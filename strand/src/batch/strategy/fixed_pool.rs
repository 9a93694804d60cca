use super::{ExecutionStrategy, Submission, interrupt_all, tokens_of};
use crate::batch::{BatchError, Work};
use crate::pool::ThreadPool;

use std::fmt;

/// Runs a batch on a fixed number of OS threads.
///
/// A fresh [`ThreadPool`] is started for each batch and joined before
/// `run_batch` returns. Units hold their thread while suspended, so a batch
/// of N units takes about `ceil(N / workers)` delays.
#[derive(Debug, Clone, Copy)]
pub struct FixedPool {
    workers: usize,
}

impl FixedPool {
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "a fixed pool needs at least one worker");

        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl fmt::Display for FixedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed pool of {} threads", self.workers)
    }
}

impl ExecutionStrategy for FixedPool {
    fn run_batch(&self, work: &Work, submissions: Vec<Submission>) -> Result<Vec<i32>, BatchError> {
        let tokens = tokens_of(&submissions);
        let pool = ThreadPool::new(self.workers).map_err(BatchError::Spawn)?;

        let handles: Vec<_> = submissions
            .into_iter()
            .map(|Submission { unit, token }| {
                let work = work.clone();
                let handle = pool.submit(move || work.call_blocking(unit, &token));
                (unit, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());

        for (unit, handle) in handles {
            let outcome = handle
                .join()
                .map_err(BatchError::from)
                .and_then(|result| result.map_err(BatchError::from));

            match outcome {
                Ok(value) => results.push(value),
                Err(err) => {
                    tracing::error!(unit = unit.id(), error = %err, "aborting batch");
                    interrupt_all(&tokens);
                    return Err(err);
                }
            }
        }

        Ok(results)
    }
}
