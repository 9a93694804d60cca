use thiserror::Error;

/// Reason a task did not produce its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The task was aborted before it completed.
    #[error("task was cancelled")]
    Cancelled,

    /// The task's future panicked while being polled.
    #[error("task panicked: {0}")]
    Panicked(String),
}

impl JoinError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, JoinError::Cancelled)
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, JoinError::Panicked(_))
    }
}
