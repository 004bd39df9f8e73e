//! Recall kernel: the neuron update rule and the sweep/convergence policy.
//!
//! Everything here is a pure function of `(weights, pattern)`. The kernel
//! knows nothing about threads, callbacks or the busy flag; the
//! [`RecallController`](crate::runtime::RecallController) layers those on top.
//!
//! # Update order
//!
//! A sweep visits neurons `0..N` in ascending order and writes each new
//! state in place before evaluating the next neuron, so neuron `i + 1` sees
//! the already-updated value of neuron `i` (asynchronous update). The order is
//! fixed rather than randomized, which makes every recall reproducible.

use super::pattern::{Pattern, ACTIVE, INACTIVE};
use super::weights::WeightMatrix;
use crate::error::{EngineError, Result};

/// Default sweep limit for a single recall.
pub const DEFAULT_MAX_SWEEPS: usize = 10;

/// Outcome of a finished recall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recall {
    /// Final state of the working pattern
    pub pattern: Pattern,
    /// Number of sweeps executed, including the one that detected convergence
    pub sweeps: usize,
    /// `false` when the sweep limit was hit before a stable state
    pub converged: bool,
}

/// Stateless recall operations.
pub struct RecallKernel;

impl RecallKernel {
    /// New state of neuron `index` given the current pattern.
    ///
    /// Returns +1 when the activation is strictly positive and -1 otherwise;
    /// a zero activation resolves to -1 regardless of the neuron's previous
    /// value. A pattern of the wrong length or an index past the last neuron
    /// is a [`EngineError::RecallFailure`].
    pub fn step(weights: &WeightMatrix, pattern: &[i8], index: usize) -> Result<i8> {
        Self::check(weights, pattern)?;
        if index >= pattern.len() {
            return Err(EngineError::RecallFailure(format!(
                "neuron index {} out of range for dimension {}",
                index,
                pattern.len()
            )));
        }
        Ok(Self::activate(weights, pattern, index))
    }

    // Unchecked update; callers have already validated the pattern.
    fn activate(weights: &WeightMatrix, pattern: &[i8], index: usize) -> i8 {
        let activation: f64 = weights
            .row(index)
            .iter()
            .zip(pattern.iter())
            .map(|(&w, &s)| w * f64::from(s))
            .sum();
        if activation > 0.0 {
            ACTIVE
        } else {
            INACTIVE
        }
    }

    /// Ensure the working pattern can be swept against `weights`.
    pub fn check(weights: &WeightMatrix, pattern: &[i8]) -> Result<()> {
        if pattern.len() != weights.dimension() {
            return Err(EngineError::RecallFailure(format!(
                "pattern length {} does not match weight matrix dimension {}",
                pattern.len(),
                weights.dimension()
            )));
        }
        Ok(())
    }

    /// One full asynchronous sweep, mutating `pattern` in place.
    pub fn sweep(weights: &WeightMatrix, pattern: &mut [i8]) -> Result<()> {
        Self::check(weights, pattern)?;
        for i in 0..pattern.len() {
            pattern[i] = Self::activate(weights, pattern, i);
        }
        Ok(())
    }

    /// A sweep converged when it changed no neuron.
    pub fn converged(before: &[i8], after: &[i8]) -> bool {
        before == after
    }

    /// Sweep until convergence or `max_sweeps`, whichever comes first.
    pub fn run(weights: &WeightMatrix, initial: &Pattern, max_sweeps: usize) -> Result<Recall> {
        let mut working = initial.clone().into_working();
        Self::check(weights, &working)?;

        let mut sweeps = 0;
        let mut converged = false;
        while sweeps < max_sweeps {
            let previous = working.clone();
            Self::sweep(weights, &mut working)?;
            sweeps += 1;
            if Self::converged(&previous, &working) {
                converged = true;
                break;
            }
        }

        Ok(Recall {
            pattern: Pattern::from_working(working),
            sweeps,
            converged,
        })
    }
}
