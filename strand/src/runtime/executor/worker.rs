use crate::driver::DriverHandle;
use crate::runtime::context::{enter_context, register_worker};
use crate::runtime::task::Runnable;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;

/// A worker thread in the executor.
///
/// The execution order is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    id: usize,

    /// All local queues, one per worker, indexed by worker id.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    injector: InjectorHandle,

    driver: DriverHandle,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
        driver: DriverHandle,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
            driver,
        }
    }

    /// Runs the worker loop until the injector signals shutdown.
    ///
    /// Tasks still queued at shutdown are dropped with the queues.
    pub(crate) fn run(self) {
        register_worker(self.id, self.locals.clone());
        tracing::trace!(worker = self.id, "worker started");

        enter_context(self.driver.clone(), self.injector.clone(), || {
            while !self.injector.is_shutdown() {
                match self.next_task() {
                    Some(task) => task.run(),
                    None => self.injector.park(),
                }
            }
        });

        tracing::trace!(worker = self.id, "worker stopped");
    }

    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Attempts to steal a task from another worker's local queue.
    ///
    /// Victims are visited round-robin starting after this worker.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
