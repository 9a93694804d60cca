use crate::driver::command::Command;
use crate::runtime::context::CURRENT_DRIVER;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// The deadline is fixed when `sleep` is called, not when the future is
/// first polled.
///
/// # Panics
///
/// The returned future panics if it is polled outside of a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        deadline: Instant::now() + duration,
        registered: false,
        cancelled: Arc::new(AtomicBool::new(false)),
    }
}

/// A future that completes once its deadline is reached.
///
/// The timer is registered with the driver on first poll. Dropping the
/// future before completion marks the timer cancelled, so the driver
/// discards it instead of waking the task.
pub struct Sleep {
    deadline: Instant,

    /// Whether the timer has already been registered with the driver.
    registered: bool,

    /// Cancellation flag shared with the driver's timer entry.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    /// The instant at which this sleep completes.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.is_elapsed() {
            return Poll::Ready(());
        }

        if !this.registered {
            this.registered = true;

            CURRENT_DRIVER.with(|cell| {
                let binding = cell.borrow();
                let Some(driver) = binding.as_ref() else {
                    panic!("Sleep polled outside of runtime");
                };

                let sent = driver.send(Command::SetTimer {
                    deadline: this.deadline,
                    waker: cx.waker().clone(),
                    cancelled: this.cancelled.clone(),
                });

                if sent.is_err() {
                    tracing::warn!("timer driver is gone; sleep will never complete");
                }
            });
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
