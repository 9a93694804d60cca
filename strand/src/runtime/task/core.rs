use super::state::{CANCELLED, COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use super::{JoinError, JoinHandle};
use crate::runtime::context::{CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::utils::{lock, panic_message};

use std::cell::UnsafeCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Wake, Waker};

/// A runnable unit of work that can be executed by the scheduler.
///
/// The `Runnable` trait erases the task's output type so queues can hold
/// `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes the task. Called by a worker thread.
    fn run(self: Arc<Self>);
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A spawned asynchronous task managed by the runtime.
///
/// A `Task` owns its future until the future completes, then owns the
/// output until the [`JoinHandle`] takes it.
pub(crate) struct Task<T> {
    /// The underlying future; `None` once it completed or panicked.
    ///
    /// Only the worker that moved the state to `RUNNING` touches it.
    future: UnsafeCell<Option<BoxFuture<T>>>,

    /// Output of the future, written once before the state becomes
    /// `COMPLETED`.
    result: UnsafeCell<Option<Result<T, JoinError>>>,

    /// The current lifecycle state of the task (see [`super::state`]).
    state: AtomicUsize,

    /// Global injector used to reschedule the task when woken.
    injector: InjectorHandle,

    /// Waker of the `JoinHandle` awaiting this task, if any.
    join_waker: Mutex<Option<Waker>>,
}

// Safety: the `UnsafeCell`s are only accessed by the single worker holding
// the `RUNNING` state, by `abort` right after it moved an idle or queued
// task to `CANCELLED`, or by the join handle after observing `COMPLETED`.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a task in the `QUEUED` state. The caller must push it.
    pub(crate) fn new<F>(future: F, injector: InjectorHandle) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Some(Box::pin(future))),
            result: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            injector,
            join_waker: Mutex::new(None),
        }
    }

    /// Polls the task once.
    ///
    /// - `Pending`: back to `IDLE`, or re-queued if woken meanwhile.
    /// - `Ready` or panic: the output is stored and the join handle woken.
    fn poll_once(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: the RUNNING state guarantees exclusive access to `future`.
        let slot = unsafe { &mut *self.future.get() };
        let Some(future) = slot.as_mut() else {
            return;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        let output = match outcome {
            Ok(Poll::Pending) => {
                self.park_or_requeue(slot);
                return;
            }
            Ok(Poll::Ready(value)) => Ok(value),
            Err(payload) => {
                let message = panic_message(payload);
                tracing::debug!(%message, "task panicked");
                Err(JoinError::Panicked(message))
            }
        };

        *slot = None;
        self.complete(output);
    }

    /// Leaves the `RUNNING` state after a `Pending` poll.
    fn park_or_requeue(self: &Arc<Self>, slot: &mut Option<BoxFuture<T>>) {
        loop {
            match self
                .state
                .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return,
                Err(NOTIFIED) => {
                    if self
                        .state
                        .compare_exchange(NOTIFIED, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.injector.push(self.clone());
                        return;
                    }
                }
                Err(CANCELLED) => {
                    *slot = None;
                    return;
                }
                Err(_) => return,
            }
        }
    }

    /// Stores the output and wakes the join handle, unless the task was
    /// aborted while it ran.
    fn complete(&self, output: Result<T, JoinError>) {
        // Safety: still exclusive, the join handle only reads after
        // observing COMPLETED.
        unsafe {
            *self.result.get() = Some(output);
        }

        loop {
            let state = self.state.load(Ordering::Acquire);
            if state == CANCELLED {
                return;
            }

            if self
                .state
                .compare_exchange(state, COMPLETED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }

        self.notify_join();
    }

    /// Signals the task to be rescheduled.
    ///
    /// If the task is `IDLE`, it moves to `QUEUED` and is pushed to the scheduler.
    /// If the task is `RUNNING`, it moves to `NOTIFIED` so it is re-polled
    /// right after its current poll.
    fn schedule(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.injector.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}

impl<T> Task<T> {
    /// Moves the task to `CANCELLED` unless it already finished.
    ///
    /// A task that is not being polled drops its future right away. A task
    /// aborted mid-poll drops it when that poll returns.
    pub(crate) fn abort(&self) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            if state == COMPLETED || state == CANCELLED {
                return;
            }

            if self
                .state
                .compare_exchange(state, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if state == IDLE || state == QUEUED {
                    // Safety: no worker held RUNNING, and none can acquire
                    // it from CANCELLED.
                    let future = unsafe { (*self.future.get()).take() };
                    drop(future);
                }

                self.notify_join();
                return;
            }
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        matches!(self.state.load(Ordering::Acquire), COMPLETED | CANCELLED)
    }

    /// Returns the output if the task is finished.
    ///
    /// # Panics
    ///
    /// Panics if the output was already taken.
    pub(crate) fn try_take_output(&self) -> Option<Result<T, JoinError>> {
        match self.state.load(Ordering::Acquire) {
            COMPLETED => {
                // Safety: COMPLETED is final and only one JoinHandle exists.
                let output = unsafe { (*self.result.get()).take() };
                match output {
                    Some(output) => Some(output),
                    None => panic!("JoinHandle polled after completion"),
                }
            }
            CANCELLED => Some(Err(JoinError::Cancelled)),
            _ => None,
        }
    }

    /// Registers the waker to notify on completion, replacing any previous
    /// one.
    pub(crate) fn register_join_waker(&self, waker: &Waker) {
        let mut slot = lock(&self.join_waker);

        match slot.as_ref() {
            Some(current) if current.will_wake(waker) => {}
            _ => *slot = Some(waker.clone()),
        }
    }

    fn notify_join(&self) {
        if let Some(waker) = lock(&self.join_waker).take() {
            waker.wake();
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::poll_once(self)
    }
}

impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().schedule();
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// When called from a worker thread the task goes to that worker's local
/// queue; otherwise it is pushed to the global injector.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let injector = CURRENT_INJECTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .cloned()
            .unwrap_or_else(|| panic!("spawn must be called within the context of a runtime"))
    });

    let task = Arc::new(Task::new(future, injector.clone()));

    let pushed_locally = CURRENT_WORKER_ID.with(|id_cell| {
        let Some(id) = *id_cell.borrow() else {
            return false;
        };

        CURRENT_LOCALS.with(|locals_cell| match locals_cell.borrow().as_ref() {
            Some(locals) => {
                locals[id].push(task.clone());
                true
            }
            None => false,
        })
    });

    if !pushed_locally {
        injector.push(task.clone());
    }

    JoinHandle::new(task)
}
