use super::{JoinError, Task};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// Awaiting the handle yields the task's output, or a [`JoinError`] if the
/// task panicked or was aborted.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(task: Arc<Task<T>>) -> Self {
        Self { task }
    }

    /// Aborts the task.
    ///
    /// A task that is suspended is never polled again. A task that is being
    /// polled right now finishes that poll, then its output is discarded.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Returns `true` once the task completed, panicked or was aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T: Send + 'static> Future for JoinHandle<T> {
    type Output = Result<T, JoinError>;

    /// The waker is registered **before** re-checking the task state
    /// to avoid missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(output) = self.task.try_take_output() {
            return Poll::Ready(output);
        }

        self.task.register_join_waker(cx.waker());

        match self.task.try_take_output() {
            Some(output) => Poll::Ready(output),
            None => Poll::Pending,
        }
    }
}
