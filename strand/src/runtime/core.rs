use super::executor::core::Executor;
use super::task::JoinHandle;
use crate::driver::command::Command;
use crate::driver::{Driver, DriverHandle};

use std::future::Future;
use std::io;
use std::sync::mpsc;

/// The main runtime handle.
///
/// `Runtime` is responsible for:
/// - spawning lightweight tasks,
/// - driving task execution via the work-stealing executor,
/// - owning the timer driver used by [`sleep`](crate::time::sleep),
/// - providing a synchronous entry point via [`block_on`](Self::block_on).
///
/// Dropping the runtime stops the workers and the timer driver and joins
/// the worker threads.
pub struct Runtime {
    executor: Executor,
    driver: DriverHandle,
}

impl Runtime {
    /// Starts the timer driver, then `worker_threads` workers.
    pub(crate) fn new(worker_threads: usize) -> io::Result<Self> {
        let driver = Driver::start()?;

        let executor = match Executor::new(driver.clone(), worker_threads) {
            Ok(executor) => executor,
            Err(err) => {
                let _ = driver.send(Command::Shutdown);
                return Err(err);
            }
        };

        Ok(Self { executor, driver })
    }

    /// Spawns a future onto the runtime.
    ///
    /// Can be called from any thread, inside or outside the runtime.
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// The future is spawned onto the executor and its result is sent back
    /// through a channel.
    ///
    /// # Panics
    ///
    /// Panics if the future panics, or if the runtime shuts down before the
    /// future completes. Must not be called from a worker thread of the same
    /// runtime.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (transmitter, receiver) = mpsc::channel();

        let _handle = self.spawn(async move {
            let result = future.await;
            let _ = transmitter.send(result);
        });

        match receiver.recv() {
            Ok(output) => output,
            Err(_) => panic!("block_on future panicked or the runtime shut down"),
        }
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// 1. Signals the executor to shut down
    /// 2. Sends a shutdown command to the timer driver
    /// 3. Joins all worker threads
    fn drop(&mut self) {
        self.executor.shutdown();

        let _ = self.driver.send(Command::Shutdown);

        self.executor.join();

        tracing::debug!("runtime stopped");
    }
}
