//! Engine configuration.
//!
//! Every field has a default matching the reference pattern editor: a store
//! of five patterns, ten sweeps per recall, a progress snapshot every ten
//! neurons, and pacing of 100 ms / 1 s between snapshots.
//!
//! ```rust
//! use hopfield::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{"dimension": 144, "step_delay_ms": 0}"#).unwrap();
//! assert_eq!(config.capacity, 5);
//! assert_eq!(config.dimension, Some(144));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::kernel::DEFAULT_MAX_SWEEPS;
use crate::memory::DEFAULT_CAPACITY;

/// Tunables for [`Engine`](crate::Engine) and the recall controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pattern length; `None` lets the first trained pattern decide
    pub dimension: Option<usize>,
    /// Maximum number of stored patterns
    pub capacity: usize,
    /// Sweep limit per recall
    pub max_sweeps: usize,
    /// Observable recall emits a snapshot after neurons 0, k, 2k, ...
    pub progress_interval: usize,
    /// Pause after an intra-sweep snapshot
    pub step_delay_ms: u64,
    /// Pause after an end-of-sweep snapshot
    pub sweep_delay_ms: u64,
    /// Refuse to recall before anything was learned
    pub require_patterns: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension: None,
            capacity: DEFAULT_CAPACITY,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            progress_interval: 10,
            step_delay_ms: 100,
            sweep_delay_ms: 1000,
            require_patterns: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Config with both pacing delays removed.
    pub fn unpaced(mut self) -> Self {
        self.step_delay_ms = 0;
        self.sweep_delay_ms = 0;
        self
    }

    /// Reject values that would make the engine unusable.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == Some(0) {
            return Err(EngineError::Config("dimension must be positive".into()));
        }
        if self.capacity == 0 {
            return Err(EngineError::Config("capacity must be positive".into()));
        }
        if self.max_sweeps == 0 {
            return Err(EngineError::Config("max_sweeps must be positive".into()));
        }
        if self.progress_interval == 0 {
            return Err(EngineError::Config(
                "progress_interval must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `step_delay_ms` as a [`Duration`].
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// `sweep_delay_ms` as a [`Duration`].
    pub fn sweep_delay(&self) -> Duration {
        Duration::from_millis(self.sweep_delay_ms)
    }
}
