use crate::runtime::task::Runnable;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Upper bound on a single park.
///
/// Pushes to local queues do not signal the condvar, so parked workers
/// wake up periodically to look for stealable work.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Global task injector for the work-stealing scheduler.
///
/// Newly spawned tasks from outside the workers and every woken task land
/// here. The queue's mutex also backs the condvar idle workers park on.
pub(crate) struct Injector {
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Signalled on every push and on shutdown.
    condvar: Condvar,

    shutdown: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes all parked workers.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        let _queue = lock(&self.queue);
        self.condvar.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes a task and wakes one parked worker.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        lock(&self.queue).push_back(task);
        self.condvar.notify_one();
    }

    /// Parks the calling worker until a push, a shutdown, or
    /// [`PARK_TIMEOUT`].
    ///
    /// Returns immediately if work is already queued.
    pub(crate) fn park(&self) {
        let queue = lock(&self.queue);

        if !queue.is_empty() || self.is_shutdown() {
            return;
        }

        let _ = self.condvar.wait_timeout(queue, PARK_TIMEOUT);
    }

    /// Drops every queued task.
    ///
    /// Queued tasks hold the injector handle, so this breaks the reference
    /// cycle once the workers are gone.
    pub(crate) fn clear(&self) {
        lock(&self.queue).clear();
    }

    /// Takes the oldest queued task.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.queue).pop_front()
    }
}
