//! Host-facing engine that owns the store, the weights and the controller.
//!
//! For full control, import from [`kernel`](crate::kernel),
//! [`memory`](crate::memory) and [`runtime`](crate::runtime) directly.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::kernel::{Pattern, Recall, WeightMatrix};
use crate::memory::PatternStore;
use crate::runtime::{Dispatcher, QueueDispatcher, RecallController, RecallHandle, Snapshot};

/// Associative-memory engine.
///
/// `Engine` serializes training and recall through the controller's busy
/// flag: while a recall is in flight, [`train`](Engine::train) and any
/// further recall fail with [`EngineError::Busy`].
///
/// An engine built with [`Engine::new`] queues observable-recall callbacks
/// for the owning thread, which runs them with
/// [`run_pending`](Engine::run_pending) or [`wait_for`](Engine::wait_for).
/// The busy flag clears when the terminal callback has been run there.
///
/// # Example
///
/// ```rust
/// use hopfield::{Engine, EngineConfig, Pattern};
///
/// let mut engine = Engine::new(EngineConfig::default()).unwrap();
/// engine.train(Pattern::new(vec![1, 1, -1, -1]).unwrap()).unwrap();
/// engine.train(Pattern::new(vec![-1, -1, 1, 1]).unwrap()).unwrap();
///
/// let noisy = Pattern::new(vec![1, 1, -1, 1]).unwrap();
/// let repaired = engine.recall_blocking(&noisy).unwrap();
/// assert_eq!(repaired.data(), &[1, 1, -1, -1]);
/// ```
pub struct Engine {
    config: EngineConfig,
    store: PatternStore,
    weights: Arc<WeightMatrix>,
    controller: RecallController,
    queue: Option<Arc<QueueDispatcher>>,
}

impl Engine {
    /// Create an engine whose callbacks are queued for the calling thread.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let queue = Arc::new(QueueDispatcher::new());
        let mut engine = Self::with_dispatcher(config, queue.clone())?;
        engine.queue = Some(queue);
        Ok(engine)
    }

    /// Create an engine that delivers callbacks through `dispatcher`.
    ///
    /// The host is then responsible for running whatever the dispatcher
    /// defers; [`run_pending`](Engine::run_pending) and
    /// [`wait_for`](Engine::wait_for) do nothing.
    pub fn with_dispatcher(config: EngineConfig, dispatcher: Arc<dyn Dispatcher>) -> Result<Self> {
        config.validate()?;
        let store = match config.dimension {
            Some(dim) => PatternStore::with_dimension(config.capacity, dim),
            None => PatternStore::new(config.capacity),
        };
        let weights = Arc::new(WeightMatrix::zeros(config.dimension.unwrap_or(0)));
        let controller = RecallController::new(&config, dispatcher);

        Ok(Self {
            config,
            store,
            weights,
            controller,
            queue: None,
        })
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Learn a pattern and rebuild the weights.
    ///
    /// On any rejection neither the store nor the weights change.
    pub fn train(&mut self, pattern: Pattern) -> Result<&WeightMatrix> {
        let _guard = self.controller.acquire()?;

        let mut store = self.store.clone();
        if let Err(err) = store.add(pattern) {
            warn!(error = %err, "pattern rejected");
            return Err(err);
        }
        let dim = store.dimension().unwrap_or(0);
        let weights = WeightMatrix::rebuild(dim, store.patterns())?;

        self.store = store;
        self.weights = Arc::new(weights);
        info!(
            patterns = self.store.len(),
            dimension = dim,
            "network trained"
        );
        Ok(self.weights.as_ref())
    }

    // =========================================================================
    // Recall
    // =========================================================================

    /// Repair `pattern` on the calling thread.
    pub fn recall_blocking(&self, pattern: &Pattern) -> Result<Pattern> {
        self.recall_with_stats(pattern).map(|recall| recall.pattern)
    }

    /// Like [`recall_blocking`](Engine::recall_blocking), also reporting the
    /// sweep count and whether the network settled.
    pub fn recall_with_stats(&self, pattern: &Pattern) -> Result<Recall> {
        self.controller
            .run_sync(&self.weights, pattern, self.config.max_sweeps)
    }

    /// Repair `pattern` on a background worker, reporting snapshots.
    ///
    /// Returns `Err(Busy)` without starting a worker if a recall or training
    /// call is in flight. If the OS refuses to start the worker thread the
    /// spawn error is returned here as [`EngineError::Io`] and no callback
    /// runs. All other failures reach `on_error`.
    pub fn recall_observable<P, D, E>(
        &self,
        pattern: Pattern,
        on_progress: P,
        on_done: D,
        on_error: E,
    ) -> Result<RecallHandle>
    where
        P: FnMut(Snapshot) + Send + 'static,
        D: FnOnce(Recall) + Send + 'static,
        E: FnOnce(EngineError) + Send + 'static,
    {
        self.controller.run_observable(
            Arc::clone(&self.weights),
            pattern,
            self.config.max_sweeps,
            on_progress,
            on_done,
            on_error,
        )
    }

    /// `true` while a recall or training call holds the busy flag.
    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    // =========================================================================
    // Callback delivery
    // =========================================================================

    /// Run every queued callback on the calling thread.
    ///
    /// Returns the number of callbacks run. Always 0 for an engine built
    /// with [`with_dispatcher`](Engine::with_dispatcher).
    pub fn run_pending(&self) -> usize {
        self.queue.as_ref().map_or(0, |queue| queue.run_pending())
    }

    /// Block up to `timeout` for one queued callback and run it.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.queue
            .as_ref()
            .map_or(false, |queue| queue.wait_for(timeout))
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Copy of the learned patterns for gallery display.
    pub fn patterns(&self) -> Vec<Pattern> {
        self.store.snapshot()
    }

    /// Learned pattern at gallery position `index`.
    pub fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.store.get(index)
    }

    /// Gallery index and Hamming distance of the nearest learned pattern.
    pub fn closest(&self, pattern: &Pattern) -> Option<(usize, usize)> {
        self.store.closest(pattern)
    }

    /// Weights built from the current store.
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of learned patterns.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// `true` before the first pattern is learned.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
