//! Runtime layer: recall orchestration and callback delivery.
//!
//! - [`RecallController`] — blocking and observable recall, busy flag,
//!   terminal-callback guarantees.
//! - [`Dispatcher`] — how callbacks reach the host's execution context
//!   ([`InlineDispatcher`], [`QueueDispatcher`]).
//!
//! Builds on [`kernel`](crate::kernel); does not depend on
//! [`memory`](crate::memory).

pub mod controller;
pub mod dispatch;

pub use controller::{BusyGuard, Pacing, RecallController, RecallHandle, Snapshot};
pub use dispatch::{Dispatcher, InlineDispatcher, QueueDispatcher, Task};
