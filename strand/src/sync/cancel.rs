use crate::utils::{Slab, lock};

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Returned when a wait was interrupted by [`CancellationToken::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A cooperative interrupt shared between a unit of work and whoever may
/// cancel it.
///
/// Cloning the token yields another handle to the same state. Cancelling
/// is permanent.
///
/// Blocking code waits with [`sleep_blocking`](Self::sleep_blocking), async
/// code with [`cancelled`](Self::cancelled) or
/// [`run_until_cancelled`](Self::run_until_cancelled).
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,

    /// Async waiters; the mutex also backs `condvar` for blocking waiters.
    waiters: Mutex<Slab<Waker>>,

    condvar: Condvar,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the token, waking every blocking and async waiter.
    ///
    /// Calling it again has no effect.
    pub fn cancel(&self) {
        let waiters = {
            let mut waiters = lock(&self.inner.waiters);

            if self.inner.cancelled.swap(true, Ordering::AcqRel) {
                return;
            }

            self.inner.condvar.notify_all();
            waiters.drain().collect::<Vec<_>>()
        };

        for waker in waiters {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Blocks the current thread for `duration`, returning early with
    /// [`Cancelled`] if the token is (or becomes) cancelled.
    ///
    /// Spurious condvar wake-ups are absorbed: the full duration elapses
    /// unless the token is cancelled.
    pub fn sleep_blocking(&self, duration: Duration) -> Result<(), Cancelled> {
        let deadline = Instant::now() + duration;
        let mut guard = lock(&self.inner.waiters);

        loop {
            if self.is_cancelled() {
                return Err(Cancelled);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }

            guard = match self.inner.condvar.wait_timeout(guard, remaining) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    /// Returns a future that completes once the token is cancelled.
    pub fn cancelled(&self) -> WaitForCancellation {
        WaitForCancellation {
            token: self.clone(),
            key: None,
        }
    }

    /// Runs `future` until it completes or the token is cancelled.
    ///
    /// Returns `None` on cancellation; `future` is dropped at that point.
    /// If both are ready on the same poll, cancellation wins.
    pub async fn run_until_cancelled<F: Future>(&self, future: F) -> Option<F::Output> {
        let mut future = Box::pin(future);
        let mut cancelled = self.cancelled();

        std::future::poll_fn(move |cx| {
            if Pin::new(&mut cancelled).poll(cx).is_ready() {
                return Poll::Ready(None);
            }

            future.as_mut().poll(cx).map(Some)
        })
        .await
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Future returned by [`CancellationToken::cancelled`].
///
/// The registered waker is removed when the future is dropped, so
/// abandoned waits do not accumulate on long-lived tokens.
pub struct WaitForCancellation {
    token: CancellationToken,

    /// Slot of our waker in the token's waiter slab.
    key: Option<usize>,
}

impl Future for WaitForCancellation {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if this.token.is_cancelled() {
            return Poll::Ready(());
        }

        let mut waiters = lock(&this.token.inner.waiters);

        // Re-check under the lock: `cancel` drains the slab while holding it.
        if this.token.is_cancelled() {
            return Poll::Ready(());
        }

        match this.key.and_then(|key| waiters.get_mut(key)) {
            Some(waker) => {
                if !waker.will_wake(cx.waker()) {
                    *waker = cx.waker().clone();
                }
            }
            None => this.key = Some(waiters.insert(cx.waker().clone())),
        }

        Poll::Pending
    }
}

impl Drop for WaitForCancellation {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            lock(&self.token.inner.waiters).remove(key);
        }
    }
}
