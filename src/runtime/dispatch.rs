//! Callback delivery onto the host's execution context.
//!
//! The recall worker never calls host callbacks directly. It hands each one
//! to a [`Dispatcher`] as a boxed task, and the dispatcher decides which
//! thread runs it:
//!
//! - [`InlineDispatcher`] runs the task immediately on the worker. Use it when
//!   the callbacks are themselves thread-safe.
//! - [`QueueDispatcher`] buffers tasks until the host thread drains them with
//!   [`QueueDispatcher::run_pending`] or [`QueueDispatcher::wait_for`], the
//!   way a UI loop schedules work onto its own thread.
//!
//! Tasks from one worker are delivered in the order they were dispatched.

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

/// A unit of callback work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Marshals callback tasks onto some execution context.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, task: Task);
}

/// Runs every task on the dispatching thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, task: Task) {
        task();
    }
}

/// FIFO task queue drained by the host thread.
pub struct QueueDispatcher {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

impl QueueDispatcher {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Number of tasks waiting to be drained.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// `true` when no task is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Run every task queued so far on the calling thread.
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Block up to `timeout` for one task and run it.
    ///
    /// Returns `false` if nothing arrived in time.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for QueueDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, task: Task) {
        if self.tx.send(task).is_err() {
            warn!("dispatch queue disconnected, task dropped");
        }
    }
}
