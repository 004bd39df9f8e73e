//! Memory layer: the learned pattern set.
//!
//! - [`PatternStore`] — append-only, capacity-bounded, duplicate-free
//!   collection of bipolar patterns. The [`WeightMatrix`](crate::kernel::WeightMatrix)
//!   is derived from its contents and rebuilt on every successful add.

pub mod store;

pub use store::{PatternStore, DEFAULT_CAPACITY};
