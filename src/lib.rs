//! # Hopfield: associative pattern memory
//!
//! A small Hopfield network that learns a handful of bipolar patterns and
//! repairs noisy or partial copies of them.
//!
//! ## Quick Start
//!
//! ```rust
//! use hopfield::{Engine, EngineConfig, Pattern};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! engine.train(Pattern::new(vec![1, 1, -1, -1]).unwrap()).unwrap();
//! engine.train(Pattern::new(vec![-1, -1, 1, 1]).unwrap()).unwrap();
//!
//! let repaired = engine
//!     .recall_blocking(&Pattern::new(vec![1, 1, -1, 1]).unwrap())
//!     .unwrap();
//! assert_eq!(repaired.data(), &[1, 1, -1, -1]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Pattern**: bipolar vector with elements in {-1, +1}
//! - **Hebbian weights**: sum of outer products, zero diagonal, divided by the
//!   pattern count
//! - **Sweep**: one in-place pass over every neuron in ascending order
//! - **Convergence**: a sweep that changes nothing
//! - **Observable recall**: the same sweeps on a worker thread, reporting
//!   snapshots through a [`Dispatcher`](runtime::Dispatcher)
//!
//! ## Layers
//!
//! - [`kernel`] — patterns, weights and the update rule (pure, no threads)
//! - [`memory`] — the learned pattern store
//! - [`runtime`] — recall controller, busy flag and callback dispatch
//! - [`highlevel`] — [`Engine`], the host-facing façade

pub mod config;
pub mod error;
pub mod highlevel;
pub mod kernel;
pub mod memory;
pub mod runtime;

// Re-exports for convenience
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use highlevel::Engine;
pub use kernel::{Grid, Pattern, Recall, RecallKernel, WeightMatrix};
pub use memory::PatternStore;
pub use runtime::{
    Dispatcher, InlineDispatcher, QueueDispatcher, RecallController, RecallHandle, Snapshot,
};
