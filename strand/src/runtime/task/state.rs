/// Task is idle and not scheduled.
///
/// The task exists but waits for a waker to fire.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being executed by a worker.
///
/// At most one worker may observe this state at a time.
pub(crate) const RUNNING: usize = 2;

/// Task has produced its output (or panicked) and will not be polled again.
pub(crate) const COMPLETED: usize = 3;

/// Task was woken while running and must be re-queued once the current
/// poll returns.
pub(crate) const NOTIFIED: usize = 4;

/// Task was aborted. Its output, if any, is discarded.
pub(crate) const CANCELLED: usize = 5;
