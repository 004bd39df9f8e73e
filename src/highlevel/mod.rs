//! High-level convenience API.
//!
//! This layer provides [`Engine`], the host-facing wrapper that owns a
//! [`PatternStore`](crate::memory::PatternStore), the current
//! [`WeightMatrix`](crate::kernel::WeightMatrix) and a
//! [`RecallController`](crate::runtime::RecallController), and delegates to
//! the [`kernel`](crate::kernel), [`memory`](crate::memory) and
//! [`runtime`](crate::runtime) layers.

pub mod client;

pub use client::Engine;
