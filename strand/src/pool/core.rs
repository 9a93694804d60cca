use super::PoolHandle;
use crate::utils::{lock, panic_message};

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, mpsc};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// State shared by the pool and its workers.
struct Shared {
    queue: Mutex<VecDeque<Job>>,

    /// Signalled on every submit and on shutdown.
    condvar: Condvar,

    shutdown: AtomicBool,
}

impl Shared {
    /// Blocks until a job is available. Returns `None` once shutdown was
    /// requested and the queue is empty.
    fn next_job(&self) -> Option<Job> {
        let mut queue = lock(&self.queue);

        loop {
            if let Some(job) = queue.pop_front() {
                return Some(job);
            }

            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }

            queue = match self.condvar.wait(queue) {
                Ok(queue) => queue,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }
}

/// A fixed-size pool of worker threads.
///
/// Jobs run in submission order as workers become free. Shutting the pool
/// down (explicitly or on drop) lets queued jobs finish, then joins every
/// worker.
///
/// # Examples
///
/// ```rust,ignore
/// let pool = ThreadPool::new(4)?;
/// let handle = pool.submit(|| 6 * 7);
/// assert_eq!(handle.join(), Ok(42));
/// ```
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawns `workers` named threads.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(workers: usize) -> io::Result<Self> {
        assert!(workers > 0, "a thread pool needs at least one worker");

        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(workers),
        };

        for id in 0..workers {
            let shared = pool.shared.clone();

            let spawned = thread::Builder::new()
                .name(format!("strand-pool-{id}"))
                .spawn(move || {
                    while let Some(job) = shared.next_job() {
                        job();
                    }
                });

            match spawned {
                Ok(handle) => pool.workers.push(handle),
                Err(err) => {
                    pool.shutdown();
                    return Err(err);
                }
            }
        }

        tracing::debug!(workers, "thread pool started");

        Ok(pool)
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Queues `job` and returns a handle to its output.
    ///
    /// A panic inside the job is caught on the worker and reported through
    /// the handle; the worker keeps serving the queue. Jobs submitted after
    /// shutdown are dropped and their handle reports [`PoolError::Closed`](super::PoolError::Closed).
    pub fn submit<F, T>(&self, job: F) -> PoolHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);

        if self.shared.shutdown.load(Ordering::Acquire) {
            return PoolHandle { receiver };
        }

        let job: Job = Box::new(move || {
            let output = panic::catch_unwind(AssertUnwindSafe(job)).map_err(panic_message);
            let _ = sender.send(output);
        });

        lock(&self.shared.queue).push_back(job);
        self.shared.condvar.notify_one();

        PoolHandle { receiver }
    }

    /// Stops accepting jobs, lets queued jobs finish and joins every
    /// worker.
    pub fn shutdown(&mut self) {
        {
            let _queue = lock(&self.shared.queue);
            self.shared.shutdown.store(true, Ordering::Release);
            self.shared.condvar.notify_all();
        }

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
