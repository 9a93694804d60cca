use crate::pool::PoolError;
use crate::task::JoinError;

use std::io;

use thiserror::Error;

/// Failure raised by a unit of work itself.
///
/// Cancellation is not an error: an interrupted unit resolves to
/// [`CANCELLED`](super::CANCELLED).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkError {
    #[error("unit {id} failed: {reason}")]
    Failed { id: usize, reason: String },

    #[error("unit {id} panicked: {message}")]
    Panicked { id: usize, message: String },
}

impl WorkError {
    pub fn failed(id: usize, reason: impl Into<String>) -> Self {
        WorkError::Failed {
            id,
            reason: reason.into(),
        }
    }

    /// Identifier of the unit that failed.
    pub fn unit_id(&self) -> usize {
        match self {
            WorkError::Failed { id, .. } | WorkError::Panicked { id, .. } => *id,
        }
    }
}

/// Fatal failure of a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("a batch needs at least one unit of work")]
    Empty,

    #[error(transparent)]
    Work(#[from] WorkError),

    #[error("lightweight task failed: {0}")]
    Join(#[from] JoinError),

    #[error("pool job failed: {0}")]
    Pool(#[from] PoolError),

    #[error("failed to start execution threads")]
    Spawn(#[source] io::Error),

    #[error("collected {collected} results for a batch of {expected} units")]
    Incomplete { expected: usize, collected: usize },
}
