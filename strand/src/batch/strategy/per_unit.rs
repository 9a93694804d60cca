use super::{ExecutionStrategy, Submission, interrupt_all, tokens_of};
use crate::batch::{BatchError, Work, WorkError};
use crate::runtime::Runtime;
use crate::runtime::builder::RuntimeBuilder;
use crate::sync::CancellationToken;
use crate::task::JoinSet;
use crate::time::instrumented;

use std::fmt;

/// Runs every unit as its own lightweight task.
///
/// Suspended units cost a timer entry, not a thread, so the batch takes
/// about one delay for N well into the tens of thousands.
pub struct PerUnit {
    runtime: Runtime,
}

impl PerUnit {
    /// Uses a runtime with one worker per available CPU.
    ///
    /// # Panics
    ///
    /// Panics if the runtime threads cannot be started.
    pub fn new() -> Self {
        Self::with_runtime(RuntimeBuilder::new().build())
    }

    pub fn with_runtime(runtime: Runtime) -> Self {
        Self { runtime }
    }
}

impl Default for PerUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one lightweight task per unit")
    }
}

impl ExecutionStrategy for PerUnit {
    fn run_batch(&self, work: &Work, submissions: Vec<Submission>) -> Result<Vec<i32>, BatchError> {
        let work = work.clone();
        let tokens = tokens_of(&submissions);

        self.runtime.block_on(async move {
            let mut set = JoinSet::new();

            for Submission { unit, token } in submissions {
                let work = work.clone();
                set.spawn(async move { work.call(unit, &token).await });
            }

            let (outcome, elapsed) = instrumented(collect(&mut set, &tokens)).await;
            tracing::debug!(?elapsed, "lightweight tasks joined");

            outcome
        })
    }
}

/// Joins every task, stopping at the first failure.
async fn collect(
    set: &mut JoinSet<Result<i32, WorkError>>,
    tokens: &[CancellationToken],
) -> Result<Vec<i32>, BatchError> {
    let mut results = Vec::with_capacity(set.len());

    while let Some(joined) = set.join_next().await {
        let outcome = joined
            .map_err(BatchError::from)
            .and_then(|result| result.map_err(BatchError::from));

        match outcome {
            Ok(value) => results.push(value),
            Err(err) => {
                tracing::error!(error = %err, "aborting batch");
                interrupt_all(tokens);
                set.abort_all();
                return Err(err);
            }
        }
    }

    Ok(results)
}
