//! Pattern type for the associative memory.
//!
//! Patterns are bipolar vectors with elements in {-1, +1}.
//! Internally stored as i8, the same layout the recall kernel mutates.

use std::fmt;
use std::ops::Index;

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// The "active" neuron state.
pub const ACTIVE: i8 = 1;
/// The "inactive" neuron state.
pub const INACTIVE: i8 = -1;

/// A fixed-length bipolar pattern with elements in {-1, +1}.
///
/// Every constructor validates its input, so any `Pattern` in hand is
/// guaranteed bipolar. Deserialization goes through the same check.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct Pattern {
    data: Vec<i8>,
}

impl Pattern {
    /// Create a pattern from raw values, rejecting anything other than +1/-1.
    pub fn new(data: Vec<i8>) -> Result<Self> {
        if let Some(index) = data.iter().position(|&v| v != ACTIVE && v != INACTIVE) {
            return Err(EngineError::InvalidValue {
                index,
                value: data[index],
            });
        }
        Ok(Self { data })
    }

    /// Create a pattern from booleans (`true` = active).
    pub fn from_bools(cells: &[bool]) -> Self {
        let data = cells
            .iter()
            .map(|&on| if on { ACTIVE } else { INACTIVE })
            .collect();
        Self { data }
    }

    /// An all-inactive pattern of length `n` (the cleared grid).
    pub fn blank(n: usize) -> Self {
        Self {
            data: vec![INACTIVE; n],
        }
    }

    /// Pattern length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` for a zero-length pattern.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[i8] {
        &self.data
    }

    /// Number of active (+1) elements.
    pub fn active_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == ACTIVE).count()
    }

    /// A pattern with no active element carries no information to learn.
    pub fn is_degenerate(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of positions where the two patterns differ.
    ///
    /// Patterns of different length differ at every position past the
    /// shorter one.
    pub fn hamming(&self, other: &Pattern) -> usize {
        let common = self
            .data
            .iter()
            .zip(other.data.iter())
            .filter(|(a, b)| a != b)
            .count();
        common + self.len().abs_diff(other.len())
    }

    /// Return a copy with `flips` distinct positions inverted.
    ///
    /// Positions are drawn from a ChaCha8 RNG seeded with `seed`, so the
    /// same `(flips, seed)` always corrupts the same cells.
    pub fn with_noise(&self, flips: usize, seed: u64) -> Pattern {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let amount = flips.min(self.len());
        let mut data = self.data.clone();
        for i in index::sample(&mut rng, self.len(), amount).into_iter() {
            data[i] = -data[i];
        }
        Pattern { data }
    }

    /// Hand the buffer over to a recall session.
    pub(crate) fn into_working(self) -> Vec<i8> {
        self.data
    }

    /// Wrap a buffer produced by the recall kernel.
    ///
    /// The kernel only ever writes +1/-1, so no validation is repeated.
    pub(crate) fn from_working(data: Vec<i8>) -> Self {
        Self { data }
    }
}

impl Index<usize> for Pattern {
    type Output = i8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl TryFrom<Vec<i8>> for Pattern {
    type Error = EngineError;

    fn try_from(data: Vec<i8>) -> Result<Self> {
        Pattern::new(data)
    }
}

impl From<Pattern> for Vec<i8> {
    fn from(pattern: Pattern) -> Self {
        pattern.data
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str("]")
    }
}
