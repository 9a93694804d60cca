use std::sync::mpsc::Receiver;

use thiserror::Error;

/// Reason a pool job did not deliver its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The job panicked on its worker thread.
    #[error("job panicked: {0}")]
    Panicked(String),

    /// The job was dropped without running, e.g. the pool went away.
    #[error("job was dropped before it produced a result")]
    Closed,
}

/// Receives the output of a job submitted to a [`ThreadPool`](super::ThreadPool).
pub struct PoolHandle<T> {
    pub(crate) receiver: Receiver<Result<T, String>>,
}

impl<T> PoolHandle<T> {
    /// Blocks until the job finished and returns its output.
    pub fn join(self) -> Result<T, PoolError> {
        match self.receiver.recv() {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(message)) => Err(PoolError::Panicked(message)),
            Err(_) => Err(PoolError::Closed),
        }
    }

    /// Returns the output if the job already finished, without blocking.
    pub fn try_join(&self) -> Option<Result<T, PoolError>> {
        use std::sync::mpsc::TryRecvError;

        match self.receiver.try_recv() {
            Ok(Ok(output)) => Some(Ok(output)),
            Ok(Err(message)) => Some(Err(PoolError::Panicked(message))),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(PoolError::Closed)),
        }
    }
}
