use crate::driver::DriverHandle;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Handle to the timer driver of the runtime owning this thread.
    ///
    /// Set while a worker runs a task so `sleep` can register deadlines
    /// without explicit parameter passing.
    pub(crate) static CURRENT_DRIVER: RefCell<Option<DriverHandle>> =
        const { RefCell::new(None) };

    /// Handle to the global injector queue.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// Identifier of the current worker thread.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// All local worker queues of the runtime owning this thread.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Installs the runtime context for the duration of `f`.
///
/// The previous driver and injector handles are restored afterwards, so
/// nested runtimes on the same thread do not leak into each other.
pub(crate) fn enter_context<R>(
    driver: DriverHandle,
    injector: InjectorHandle,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_DRIVER.with(|d| {
        CURRENT_INJECTOR.with(|i| {
            let prev_d = d.replace(Some(driver));
            let prev_i = i.replace(Some(injector));

            let out = f();

            i.replace(prev_i);
            d.replace(prev_d);

            out
        })
    })
}

/// Marks the current thread as worker `id` of a runtime.
///
/// Called once when a worker thread starts; the values live as long as the
/// thread.
pub(crate) fn register_worker(id: usize, locals: Arc<Vec<Arc<LocalQueue>>>) {
    CURRENT_WORKER_ID.with(|cell| *cell.borrow_mut() = Some(id));
    CURRENT_LOCALS.with(|cell| *cell.borrow_mut() = Some(locals));
}
