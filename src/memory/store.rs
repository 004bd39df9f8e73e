//! PatternStore: the ordered set of learned patterns.
//!
//! The store is append-only. Insertion order is preserved so gallery
//! positions stay stable, and every rejection leaves the store untouched.
//!
//! # Example
//!
//! ```rust
//! use hopfield::kernel::Pattern;
//! use hopfield::memory::PatternStore;
//!
//! let mut store = PatternStore::new(5);
//! store.add(Pattern::new(vec![1, -1, 1, -1]).unwrap()).unwrap();
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.dimension(), Some(4));
//! ```

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::kernel::Pattern;

/// Default maximum number of stored patterns.
pub const DEFAULT_CAPACITY: usize = 5;

/// Append-only, capacity-bounded collection of unique patterns.
#[derive(Clone, Debug)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
    capacity: usize,
    /// Fixed by configuration or by the first stored pattern
    dim: Option<usize>,
}

impl PatternStore {
    /// Create an empty store whose dimension is set by the first pattern.
    pub fn new(capacity: usize) -> Self {
        Self {
            patterns: Vec::with_capacity(capacity),
            capacity,
            dim: None,
        }
    }

    /// Create an empty store with a fixed pattern dimension.
    pub fn with_dimension(capacity: usize, dim: usize) -> Self {
        Self {
            patterns: Vec::with_capacity(capacity),
            capacity,
            dim: Some(dim),
        }
    }

    /// Append a pattern and return the new store size.
    ///
    /// Checks, in order: dimension, degenerate (no active element),
    /// duplicate, capacity.
    pub fn add(&mut self, pattern: Pattern) -> Result<usize> {
        if let Some(expected) = self.dim {
            if pattern.len() != expected {
                return Err(EngineError::DimensionMismatch {
                    expected,
                    got: pattern.len(),
                });
            }
        }
        if pattern.is_degenerate() {
            return Err(EngineError::DegeneratePattern);
        }
        if self.patterns.contains(&pattern) {
            return Err(EngineError::Duplicate);
        }
        if self.patterns.len() >= self.capacity {
            return Err(EngineError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        if self.dim.is_none() {
            self.dim = Some(pattern.len());
        }
        self.patterns.push(pattern);
        debug!(size = self.patterns.len(), "pattern stored");
        Ok(self.patterns.len())
    }

    /// Independent copy of the stored patterns, in insertion order.
    pub fn snapshot(&self) -> Vec<Pattern> {
        self.patterns.clone()
    }

    /// Borrow the stored patterns.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Pattern at gallery position `index`.
    pub fn get(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    /// Index and Hamming distance of the stored pattern nearest to `probe`.
    ///
    /// Ties go to the earliest stored pattern.
    pub fn closest(&self, probe: &Pattern) -> Option<(usize, usize)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.hamming(probe)))
            .min_by_key(|&(i, d)| (d, i))
    }

    /// Number of stored patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// `true` when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `true` once `capacity` patterns are stored.
    pub fn is_full(&self) -> bool {
        self.patterns.len() >= self.capacity
    }

    /// Maximum number of patterns.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pattern dimension, once known.
    pub fn dimension(&self) -> Option<usize> {
        self.dim
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(values: &[i8]) -> Pattern {
        Pattern::new(values.to_vec()).unwrap()
    }

    /// Five distinct non-degenerate 4-cell patterns plus a sixth.
    fn six_patterns() -> Vec<Pattern> {
        vec![
            p(&[1, -1, -1, -1]),
            p(&[-1, 1, -1, -1]),
            p(&[-1, -1, 1, -1]),
            p(&[-1, -1, -1, 1]),
            p(&[1, 1, -1, -1]),
            p(&[1, 1, 1, 1]),
        ]
    }

    #[test]
    fn test_add_to_empty_store() {
        let mut store = PatternStore::default();
        assert!(store.is_empty());
        assert_eq!(store.add(p(&[1, -1, 1])).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.dimension(), Some(3));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = PatternStore::default();
        store.add(p(&[1, -1, 1])).unwrap();
        let err = store.add(p(&[1, -1, 1])).unwrap_err();
        assert!(matches!(err, EngineError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_degenerate_rejected() {
        let mut store = PatternStore::default();
        let err = store.add(Pattern::blank(4)).unwrap_err();
        assert!(matches!(err, EngineError::DegeneratePattern));
        assert!(store.is_empty());
        // A rejected pattern does not pin the dimension
        assert_eq!(store.dimension(), None);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut store = PatternStore::new(5);
        let mut patterns = six_patterns().into_iter();
        for expected in 1..=5 {
            assert_eq!(store.add(patterns.next().unwrap()).unwrap(), expected);
        }
        assert!(store.is_full());
        let err = store.add(patterns.next().unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { capacity: 5 }));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_duplicate_reported_before_capacity() {
        let mut store = PatternStore::new(1);
        store.add(p(&[1, -1])).unwrap();
        assert!(matches!(
            store.add(p(&[1, -1])).unwrap_err(),
            EngineError::Duplicate
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut store = PatternStore::with_dimension(5, 4);
        let err = store.add(p(&[1, -1, 1])).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                expected: 4,
                got: 3
            }
        ));

        let mut store = PatternStore::default();
        store.add(p(&[1, -1, 1])).unwrap();
        assert!(store.add(p(&[1, -1, 1, 1])).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut store = PatternStore::default();
        let patterns = six_patterns();
        for pattern in patterns.iter().take(3) {
            store.add(pattern.clone()).unwrap();
        }
        assert_eq!(store.snapshot(), patterns[..3].to_vec());
        assert_eq!(store.get(1), Some(&patterns[1]));
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn test_closest() {
        let mut store = PatternStore::default();
        store.add(p(&[1, 1, -1, -1])).unwrap();
        store.add(p(&[-1, -1, 1, 1])).unwrap();
        assert_eq!(store.closest(&p(&[1, 1, -1, 1])), Some((0, 1)));
        assert_eq!(store.closest(&p(&[-1, 1, 1, 1])), Some((1, 1)));
        assert_eq!(PatternStore::default().closest(&p(&[1])), None);
    }
}
