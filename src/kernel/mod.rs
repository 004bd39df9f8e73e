//! Kernel layer: patterns, Hebbian weights and the recall update rule.
//!
//! The kernel provides the pure, single-threaded foundation:
//! - Validated bipolar patterns ([`Pattern`])
//! - The Hebbian weight matrix ([`WeightMatrix`])
//! - The asynchronous update rule and sweep policy ([`RecallKernel`])
//! - Grid geometry for 2-D pattern editors ([`Grid`])
//!
//! This layer has no dependencies on [`memory`](crate::memory) or
//! [`runtime`](crate::runtime).
//!
//! # Example
//!
//! ```rust
//! use hopfield::kernel::{Pattern, RecallKernel, WeightMatrix};
//!
//! let a = Pattern::new(vec![1, 1, -1, -1]).unwrap();
//! let b = Pattern::new(vec![-1, -1, 1, 1]).unwrap();
//! let weights = WeightMatrix::rebuild(4, &[a.clone(), b]).unwrap();
//!
//! let noisy = Pattern::new(vec![1, 1, -1, 1]).unwrap();
//! let recall = RecallKernel::run(&weights, &noisy, 10).unwrap();
//! assert_eq!(recall.pattern, a);
//! ```

pub mod grid;
pub mod pattern;
pub mod recall;
pub mod weights;

pub use grid::Grid;
pub use pattern::{Pattern, ACTIVE, INACTIVE};
pub use recall::{Recall, RecallKernel, DEFAULT_MAX_SWEEPS};
pub use weights::WeightMatrix;
