use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Wraps a future and measures the time it takes to complete.
///
/// The returned future resolves to `(output, elapsed)`. Timing starts on
/// the **first poll**, not at construction time.
///
/// # Examples
///
/// ```rust,ignore
/// let (value, elapsed) = instrumented(async { 42 }).await;
/// println!("Completed in {:?}", elapsed);
/// ```
pub fn instrumented<F: Future>(future: F) -> Instrumented<F> {
    Instrumented {
        future: Box::pin(future),
        start: None,
    }
}

/// A future that measures the execution time of another future.
///
/// Dropping it before completion discards the measurement.
pub struct Instrumented<F> {
    future: Pin<Box<F>>,

    /// Instant of the first poll.
    start: Option<Instant>,
}

impl<F: Future> Future for Instrumented<F> {
    type Output = (F::Output, Duration);

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let start = *self.start.get_or_insert_with(Instant::now);

        match self.future.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(output) => Poll::Ready((output, start.elapsed())),
        }
    }
}
