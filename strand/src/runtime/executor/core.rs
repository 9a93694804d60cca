use crate::driver::DriverHandle;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::{JoinHandle, Task};
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle as ThreadHandle};

/// Multi-threaded task executor.
///
/// Owns the global injector and the worker threads. Shutdown is explicit:
/// [`shutdown`](Self::shutdown) stops the workers, [`join`](Self::join)
/// waits for them.
pub(crate) struct Executor {
    /// Global injector queue shared by all workers.
    injector: InjectorHandle,

    /// Join handles for worker threads.
    handles: Vec<ThreadHandle<()>>,
}

impl Executor {
    /// Creates a new executor with `threads` worker threads.
    ///
    /// If a worker thread cannot be spawned, the workers started so far are
    /// stopped and joined before the error is returned.
    pub(crate) fn new(driver: DriverHandle, threads: usize) -> io::Result<Self> {
        let injector = Arc::new(Injector::new());

        let locals: Arc<Vec<Arc<LocalQueue>>> =
            Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let mut executor = Self {
            injector: injector.clone(),
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let worker = Worker::new(id, locals.clone(), injector.clone(), driver.clone());

            let spawned = thread::Builder::new()
                .name(format!("strand-worker-{id}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => executor.handles.push(handle),
                Err(err) => {
                    executor.shutdown();
                    executor.join();
                    return Err(err);
                }
            }
        }

        tracing::debug!(threads, "executor started");

        Ok(executor)
    }

    /// Signals all workers to shut down.
    pub(crate) fn shutdown(&self) {
        self.injector.shutdown();
    }

    /// Spawns a new task onto the executor.
    ///
    /// Tasks spawned after shutdown has begun are never polled; their
    /// handle resolves to [`JoinError::Cancelled`](crate::task::JoinError::Cancelled).
    pub(crate) fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let task = Arc::new(Task::new(future, self.injector.clone()));

        if self.injector.is_shutdown() {
            task.abort();
        } else {
            self.injector.push(task.clone());
        }

        JoinHandle::new(task)
    }

    /// Waits for all worker threads to terminate.
    pub(crate) fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }

        self.injector.clear();
    }
}
