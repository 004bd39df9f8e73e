//! WeightMatrix: Hebbian association weights.
//!
//! The matrix is a pure function of the stored patterns. It is never updated
//! incrementally; every change to the store produces a fresh matrix via
//! [`WeightMatrix::rebuild`].
//!
//! # Normalization
//!
//! After summing the outer products and clearing the diagonal, every entry
//! is divided by the number of patterns. Textbook Hopfield nets leave the sum
//! raw (or divide by N). The division here changes activation magnitudes only,
//! never signs, but it is kept so numeric outputs match the reference
//! behaviour for identical inputs.

use super::pattern::Pattern;
use crate::error::{EngineError, Result};

/// Symmetric, zero-diagonal N×N weight matrix stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrix {
    dim: usize,
    /// Row-major entries, `dim * dim` long
    weights: Vec<f64>,
    /// Number of patterns the matrix was built from
    pattern_count: usize,
}

impl WeightMatrix {
    /// The all-zero matrix (an empty store).
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            weights: vec![0.0; dim * dim],
            pattern_count: 0,
        }
    }

    /// Build the matrix from scratch for a set of equal-length patterns.
    ///
    /// `dim` is used when `patterns` is empty; otherwise every pattern must
    /// have length `dim`.
    pub fn rebuild(dim: usize, patterns: &[Pattern]) -> Result<Self> {
        let mut matrix = Self::zeros(dim);
        if patterns.is_empty() {
            return Ok(matrix);
        }

        for pattern in patterns {
            if pattern.len() != dim {
                return Err(EngineError::DimensionMismatch {
                    expected: dim,
                    got: pattern.len(),
                });
            }
            let p = pattern.data();
            for (i, &pi) in p.iter().enumerate() {
                let row = &mut matrix.weights[i * dim..(i + 1) * dim];
                for (w, &pj) in row.iter_mut().zip(p.iter()) {
                    *w += f64::from(pi) * f64::from(pj);
                }
            }
        }

        for i in 0..dim {
            matrix.weights[i * dim + i] = 0.0;
        }

        let n = patterns.len() as f64;
        for w in &mut matrix.weights {
            *w /= n;
        }
        matrix.pattern_count = patterns.len();

        Ok(matrix)
    }

    /// Matrix dimension N.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Number of patterns folded into the matrix.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Entry `w[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.dim + j]
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.weights[i * self.dim..(i + 1) * self.dim]
    }

    /// `true` when `w[i][j] == w[j][i]` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| (i + 1..self.dim).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Hopfield energy `-1/2 * sum_ij w_ij s_i s_j`.
    ///
    /// Asynchronous sweeps never increase it.
    pub fn energy(&self, pattern: &Pattern) -> Result<f64> {
        if pattern.len() != self.dim {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim,
                got: pattern.len(),
            });
        }
        let s = pattern.data();
        let mut total = 0.0;
        for (i, &si) in s.iter().enumerate() {
            let field: f64 = self
                .row(i)
                .iter()
                .zip(s.iter())
                .map(|(&w, &sj)| w * f64::from(sj))
                .sum();
            total += f64::from(si) * field;
        }
        Ok(-0.5 * total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(values: &[i8]) -> Pattern {
        Pattern::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_empty_store_is_zero_matrix() {
        let m = WeightMatrix::rebuild(4, &[]).unwrap();
        assert_eq!(m.dimension(), 4);
        assert_eq!(m.pattern_count(), 0);
        assert!((0..4).all(|i| m.row(i).iter().all(|&w| w == 0.0)));
    }

    #[test]
    fn test_single_pattern_outer_product() {
        let m = WeightMatrix::rebuild(3, &[p(&[1, -1, 1])]).unwrap();
        assert_eq!(m.row(0), &[0.0, -1.0, 1.0]);
        assert_eq!(m.row(1), &[-1.0, 0.0, -1.0]);
        assert_eq!(m.row(2), &[1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_divides_by_pattern_count() {
        let a = p(&[1, 1, -1, 1]);
        let b = p(&[1, -1, -1, 1]);
        let c = p(&[1, 1, 1, -1]);
        let m = WeightMatrix::rebuild(4, &[a, b, c]).unwrap();
        // w[0][1] = (1 - 1 + 1) / 3
        assert!((m.get(0, 1) - 1.0 / 3.0).abs() < 1e-12);
        // w[0][3] = (1 + 1 - 1) / 3
        assert!((m.get(0, 3) - 1.0 / 3.0).abs() < 1e-12);
        // w[2][3] = (-1 - 1 - 1) / 3
        assert!((m.get(2, 3) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_zero_diagonal() {
        let patterns: Vec<Pattern> = (0..5)
            .map(|s| Pattern::from_bools(&[true; 32]).with_noise(9, s))
            .collect();
        let m = WeightMatrix::rebuild(32, &patterns).unwrap();
        assert!(m.is_symmetric());
        assert!((0..32).all(|i| m.get(i, i) == 0.0));
    }

    #[test]
    fn test_rebuild_rejects_mixed_lengths() {
        let err = WeightMatrix::rebuild(4, &[p(&[1, -1, 1])]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn test_stored_pattern_has_minimal_energy() {
        let stored = p(&[1, 1, -1, -1, 1, -1]);
        let m = WeightMatrix::rebuild(6, &[stored.clone()]).unwrap();
        let e_stored = m.energy(&stored).unwrap();
        let e_noisy = m.energy(&stored.with_noise(2, 3)).unwrap();
        assert!(e_stored < e_noisy);
    }
}
