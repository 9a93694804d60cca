use super::{JoinError, JoinHandle};
use crate::task;
use crate::utils::{Slab, lock};

use std::collections::VecDeque;
use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Wake, Waker};

/// A collection of tasks awaited in completion order.
///
/// Each task gets its own waker. When a task finishes, its slot index is
/// queued and only queued slots are polled, so joining N tasks costs O(N)
/// polls instead of re-polling every pending handle on each wake-up.
///
/// Dropping the set aborts every task it still owns.
pub struct JoinSet<T> {
    /// Pending handles, each paired with the waker that re-queues its slot.
    entries: Slab<(JoinHandle<T>, Waker)>,

    /// Completion notifications shared with the entry wakers.
    notify: Arc<Notify>,
}

/// Ready queue shared between a `JoinSet` and its entry wakers.
#[derive(Default)]
struct Notify {
    /// Slots that were woken since the last poll. May contain duplicates
    /// and indices of slots that were removed meanwhile.
    ready: Mutex<VecDeque<usize>>,

    /// Waker of the task currently awaiting `join_next`.
    waker: Mutex<Option<Waker>>,
}

struct EntryWaker {
    index: usize,
    notify: Arc<Notify>,
}

impl Wake for EntryWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        lock(&self.notify.ready).push_back(self.index);

        if let Some(waker) = lock(&self.notify.waker).take() {
            waker.wake();
        }
    }
}

impl<T: Send + 'static> JoinSet<T> {
    /// Creates a new, empty `JoinSet`.
    pub fn new() -> Self {
        Self {
            entries: Slab::new(),
            notify: Arc::new(Notify::default()),
        }
    }

    /// Spawns a new task into the set.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a running runtime.
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let handle = task::spawn(fut);
        self.insert(handle);
    }

    fn insert(&mut self, handle: JoinHandle<T>) {
        let index = self.entries.next_index();

        let waker = Waker::from(Arc::new(EntryWaker {
            index,
            notify: self.notify.clone(),
        }));

        self.entries.insert((handle, waker));

        // First poll registers the entry waker with the task.
        lock(&self.notify.ready).push_back(index);
    }

    /// Returns the number of tasks that have not been joined yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waits for the next task in the set to finish.
    ///
    /// # Returns
    /// - `Some(output)` for the first task that finished,
    /// - `None` if the set is empty.
    pub async fn join_next(&mut self) -> Option<Result<T, JoinError>> {
        poll_fn(|cx| self.poll_join_next(cx)).await
    }

    /// Polls for the next finished task.
    pub fn poll_join_next(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<T, JoinError>>> {
        if self.entries.is_empty() {
            return Poll::Ready(None);
        }

        // Install the waker before draining so a completion racing with
        // this poll is never lost.
        *lock(&self.notify.waker) = Some(cx.waker().clone());

        loop {
            let Some(index) = lock(&self.notify.ready).pop_front() else {
                return Poll::Pending;
            };

            let Some((handle, waker)) = self.entries.get_mut(index) else {
                continue;
            };

            let mut entry_cx = Context::from_waker(waker);

            if let Poll::Ready(output) = Pin::new(handle).poll(&mut entry_cx) {
                self.entries.remove(index);
                return Poll::Ready(Some(output));
            }
        }
    }

    /// Waits for every task and returns their outputs in completion order.
    pub async fn join_all(&mut self) -> Vec<Result<T, JoinError>> {
        let mut outputs = Vec::with_capacity(self.len());

        while let Some(output) = self.join_next().await {
            outputs.push(output);
        }

        outputs
    }

    /// Aborts every task still owned by the set and empties it.
    ///
    /// Results of tasks that finished but were not joined are discarded.
    pub fn abort_all(&mut self) {
        for (handle, _) in self.entries.drain() {
            handle.abort();
        }

        lock(&self.notify.ready).clear();
    }
}

impl<T: Send + 'static> Default for JoinSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for JoinSet<T> {
    fn drop(&mut self) {
        for (handle, _) in self.entries.drain() {
            handle.abort();
        }
    }
}
