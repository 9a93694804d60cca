use super::Runtime;

use std::io;
use std::thread;

/// Builder for configuring and creating a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .worker_threads(4)
///     .build();
/// ```
pub struct RuntimeBuilder {
    /// Number of worker threads in the executor.
    worker_threads: usize,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self { worker_threads }
    }

    /// Sets the number of worker threads used by the runtime.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Builds the runtime, starting the timer driver and the workers.
    ///
    /// Returns an error if the operating system refuses to spawn one of the
    /// runtime's threads.
    pub fn try_build(self) -> io::Result<Runtime> {
        Runtime::new(self.worker_threads)
    }

    /// Builds the runtime.
    ///
    /// # Panics
    ///
    /// Panics if a runtime thread cannot be spawned. Use
    /// [`try_build`](Self::try_build) to handle that case.
    pub fn build(self) -> Runtime {
        match self.try_build() {
            Ok(runtime) => runtime,
            Err(err) => panic!("failed to start runtime: {err}"),
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
