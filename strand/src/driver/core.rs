use super::command::Command;
use super::timer::TimerEntry;

use std::collections::BinaryHeap;
use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SendError, Sender, channel};
use std::thread;
use std::time::Instant;

/// The timer driver.
///
/// Owns a min-heap of pending timers and sleeps on its command channel
/// until either a new command arrives or the earliest deadline passes.
pub(crate) struct Driver {
    /// Channel receiving commands from executor threads.
    receiver: Receiver<Command>,

    /// Min-heap of pending timers ordered by deadline.
    timers: BinaryHeap<TimerEntry>,
}

/// A handle used to communicate with the driver thread.
///
/// Cloning the handle is cheap; every worker thread keeps one in its
/// runtime context.
#[derive(Clone)]
pub(crate) struct DriverHandle {
    sender: Sender<Command>,
}

impl DriverHandle {
    /// Sends a command to the driver.
    ///
    /// Fails only if the driver thread has already exited.
    pub(crate) fn send(&self, cmd: Command) -> Result<(), SendError<Command>> {
        self.sender.send(cmd)
    }
}

impl Driver {
    fn new(receiver: Receiver<Command>) -> Self {
        Self {
            receiver,
            timers: BinaryHeap::new(),
        }
    }

    /// Starts the driver thread and returns a handle to it.
    pub(crate) fn start() -> io::Result<DriverHandle> {
        let (sender, receiver) = channel();

        thread::Builder::new()
            .name("strand-timer".into())
            .spawn(move || Driver::new(receiver).run())?;

        Ok(DriverHandle { sender })
    }

    /// Main driver loop.
    ///
    /// 1. Wait for a command, bounded by the next deadline
    /// 2. Apply the command
    /// 3. Fire every expired timer
    fn run(mut self) {
        tracing::debug!("timer driver started");

        loop {
            let next = match self.timers.peek() {
                Some(timer) => {
                    let timeout = timer.deadline.saturating_duration_since(Instant::now());
                    self.receiver.recv_timeout(timeout)
                }
                None => self
                    .receiver
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match next {
                Ok(Command::SetTimer {
                    deadline,
                    waker,
                    cancelled,
                }) => {
                    self.timers.push(TimerEntry {
                        deadline,
                        waker,
                        cancelled,
                    });
                }
                Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            self.fire_expired();
        }

        tracing::debug!(pending = self.timers.len(), "timer driver stopped");
    }

    fn fire_expired(&mut self) {
        let now = Instant::now();

        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }

            if let Some(timer) = self.timers.pop() {
                timer.fire();
            }
        }
    }
}
