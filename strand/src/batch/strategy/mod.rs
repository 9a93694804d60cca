//! Execution strategies for a batch.
//!
//! A strategy only decides *where* units run. Building the batch,
//! aggregating results and timing stay in
//! [`BatchRunner`](super::BatchRunner), so strategies can be swapped
//! without touching that logic.

mod fixed_pool;
mod per_unit;

pub use fixed_pool::FixedPool;
pub use per_unit::PerUnit;

use super::{BatchError, UnitOfWork, Work};
use crate::sync::CancellationToken;

use std::fmt;

/// A unit of work paired with the token that can interrupt it.
#[derive(Debug, Clone)]
pub struct Submission {
    pub unit: UnitOfWork,
    pub token: CancellationToken,
}

impl Submission {
    pub fn new(unit: UnitOfWork) -> Self {
        Self {
            unit,
            token: CancellationToken::new(),
        }
    }
}

/// Runs a whole batch and returns one result per submission.
///
/// Implementations block the caller until every unit completed, or until
/// the first unexpected failure. On failure they interrupt the remaining
/// units before returning the error. The order of the returned results is
/// unspecified.
///
/// `Display` names the strategy in logs and reports.
pub trait ExecutionStrategy: fmt::Display + Send + Sync {
    fn run_batch(&self, work: &Work, submissions: Vec<Submission>) -> Result<Vec<i32>, BatchError>;
}

/// Interrupts every unit of a failed batch so the rest of it drains
/// quickly.
fn interrupt_all(tokens: &[CancellationToken]) {
    for token in tokens {
        token.cancel();
    }
}

fn tokens_of(submissions: &[Submission]) -> Vec<CancellationToken> {
    submissions.iter().map(|s| s.token.clone()).collect()
}
