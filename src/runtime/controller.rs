//! RecallController: blocking and observable recall behind one busy flag.
//!
//! # Busy discipline
//!
//! The controller owns a single busy flag instead of locks around the
//! weights. A blocking recall, an observable recall and training each
//! acquire it up front; a second caller gets [`EngineError::Busy`] rather
//! than waiting. While the flag is held the weight matrix cannot change,
//! so a worker can read it without synchronization.
//!
//! The flag is held by a [`BusyGuard`] and released when the guard drops.
//! For an observable recall the guard travels with the terminal callback
//! task, so the flag clears only after `on_done` or `on_error` has run, and
//! it still clears if that task is dropped or panics.
//!
//! # Observable recall
//!
//! The worker runs the same sweep as [`RecallKernel::run`] but, after every
//! `progress_interval`-th neuron (indices 0, k, 2k, ...) and after every
//! sweep, it dispatches an independent [`Snapshot`] of the working pattern
//! and pauses. The pauses exist only so a human can watch the network
//! settle; set them to zero for headless use.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use super::dispatch::Dispatcher;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::kernel::{Pattern, Recall, RecallKernel, WeightMatrix};

/// Intermediate state reported by an observable recall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// 1-based sweep number
    pub sweep: usize,
    /// Neurons updated so far in this sweep
    pub updated: usize,
    /// `true` for the snapshot emitted after the sweep completed
    pub end_of_sweep: bool,
    /// Copy of the working pattern
    pub pattern: Pattern,
}

/// Snapshot cadence and pacing for observable recalls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Emit a snapshot after every `progress_interval`-th neuron
    pub progress_interval: usize,
    /// Pause after each intra-sweep snapshot
    pub step_delay: Duration,
    /// Pause after each end-of-sweep snapshot
    pub sweep_delay: Duration,
}

impl Pacing {
    /// Read cadence and delays from `config`; an interval of 0 is treated as 1.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            progress_interval: config.progress_interval.max(1),
            step_delay: config.step_delay(),
            sweep_delay: config.sweep_delay(),
        }
    }
}

/// Exclusive hold on the engine's busy flag.
#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EngineError::Busy)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Join handle for an observable recall worker.
///
/// There is no way to abort the worker; the handle only lets the caller wait.
#[derive(Debug)]
pub struct RecallHandle {
    handle: JoinHandle<()>,
}

impl RecallHandle {
    /// `true` once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker thread to exit.
    ///
    /// Returns `false` if a callback run on the worker panicked. With a
    /// queue dispatcher the worker exits once the terminal task is queued,
    /// before the host has run it.
    pub fn join(self) -> bool {
        self.handle.join().is_ok()
    }
}

/// Orchestrates recalls over a shared weight matrix.
pub struct RecallController {
    busy: Arc<AtomicBool>,
    dispatcher: Arc<dyn Dispatcher>,
    pacing: Pacing,
    require_patterns: bool,
}

impl RecallController {
    /// Create an idle controller delivering callbacks through `dispatcher`.
    pub fn new(config: &EngineConfig, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            busy: Arc::new(AtomicBool::new(false)),
            dispatcher,
            pacing: Pacing::from_config(config),
            require_patterns: config.require_patterns,
        }
    }

    /// `true` while a recall or training call holds the flag.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Cadence and delays applied to observable recalls.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Take the busy flag for a non-recall mutation such as training.
    pub fn acquire(&self) -> Result<BusyGuard> {
        BusyGuard::acquire(&self.busy)
    }

    fn check_trained(&self, weights: &WeightMatrix) -> Result<()> {
        if self.require_patterns && weights.pattern_count() == 0 {
            return Err(EngineError::NoPatterns);
        }
        Ok(())
    }

    /// Recall on the caller's thread. The busy flag is held until return.
    pub fn run_sync(
        &self,
        weights: &WeightMatrix,
        initial: &Pattern,
        max_sweeps: usize,
    ) -> Result<Recall> {
        let _guard = self.acquire()?;
        self.check_trained(weights)?;

        match RecallKernel::run(weights, initial, max_sweeps) {
            Ok(recall) => {
                debug!(
                    sweeps = recall.sweeps,
                    converged = recall.converged,
                    "blocking recall finished"
                );
                Ok(recall)
            }
            Err(err) => {
                warn!(error = %err, "blocking recall failed");
                Err(err)
            }
        }
    }

    /// Recall on a dedicated worker, reporting snapshots as it goes.
    ///
    /// Only [`EngineError::Busy`] and a failure to spawn the worker are
    /// returned here. Every other failure is delivered to `on_error`. Exactly
    /// one of `on_done` / `on_error` runs.
    pub fn run_observable<P, D, E>(
        &self,
        weights: Arc<WeightMatrix>,
        initial: Pattern,
        max_sweeps: usize,
        on_progress: P,
        on_done: D,
        on_error: E,
    ) -> Result<RecallHandle>
    where
        P: FnMut(Snapshot) + Send + 'static,
        D: FnOnce(Recall) + Send + 'static,
        E: FnOnce(EngineError) + Send + 'static,
    {
        let guard = self.acquire()?;
        let dispatcher = Arc::clone(&self.dispatcher);
        let pacing = self.pacing;
        let trained = self.check_trained(&weights);
        let on_progress = Arc::new(Mutex::new(on_progress));

        let handle = thread::Builder::new()
            .name("hopfield-recall".into())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    trained?;
                    observe(&weights, initial, max_sweeps, pacing, &mut |snapshot| {
                        let on_progress = Arc::clone(&on_progress);
                        dispatcher.dispatch(Box::new(move || {
                            let mut callback = on_progress.lock();
                            (*callback)(snapshot);
                        }));
                    })
                }));
                let result = outcome.unwrap_or_else(|payload| {
                    Err(EngineError::RecallFailure(panic_message(payload.as_ref())))
                });

                match result {
                    Ok(recall) => {
                        info!(
                            sweeps = recall.sweeps,
                            converged = recall.converged,
                            "observable recall finished"
                        );
                        dispatcher.dispatch(Box::new(move || {
                            let _guard = guard;
                            on_done(recall);
                        }));
                    }
                    Err(err) => {
                        warn!(error = %err, "observable recall failed");
                        dispatcher.dispatch(Box::new(move || {
                            let _guard = guard;
                            on_error(err);
                        }));
                    }
                }
            })?;

        Ok(RecallHandle { handle })
    }
}

/// The instrumented sweep loop run by the worker.
fn observe(
    weights: &WeightMatrix,
    initial: Pattern,
    max_sweeps: usize,
    pacing: Pacing,
    emit: &mut dyn FnMut(Snapshot),
) -> Result<Recall> {
    let mut working = initial.into_working();
    RecallKernel::check(weights, &working)?;

    let mut sweeps = 0;
    let mut converged = false;
    while sweeps < max_sweeps {
        let previous = working.clone();
        sweeps += 1;

        for i in 0..working.len() {
            working[i] = RecallKernel::step(weights, &working, i)?;
            if i % pacing.progress_interval == 0 {
                trace!(sweep = sweeps, neuron = i, "progress snapshot");
                emit(Snapshot {
                    sweep: sweeps,
                    updated: i + 1,
                    end_of_sweep: false,
                    pattern: Pattern::from_working(working.clone()),
                });
                pause(pacing.step_delay);
            }
        }

        emit(Snapshot {
            sweep: sweeps,
            updated: working.len(),
            end_of_sweep: true,
            pattern: Pattern::from_working(working.clone()),
        });
        pause(pacing.sweep_delay);

        let changed = previous
            .iter()
            .zip(working.iter())
            .filter(|(a, b)| a != b)
            .count();
        debug!(sweep = sweeps, changed, "sweep complete");

        if RecallKernel::converged(&previous, &working) {
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

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", msg)
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::dispatch::{InlineDispatcher, QueueDispatcher, Task};

    fn p(values: &[i8]) -> Pattern {
        Pattern::new(values.to_vec()).unwrap()
    }

    fn unpaced() -> EngineConfig {
        EngineConfig::default().unpaced()
    }

    fn two_pattern_weights() -> Arc<WeightMatrix> {
        Arc::new(WeightMatrix::rebuild(4, &[p(&[1, 1, -1, -1]), p(&[-1, -1, 1, 1])]).unwrap())
    }

    #[test]
    fn test_run_sync_releases_flag() {
        let controller = RecallController::new(&unpaced(), Arc::new(InlineDispatcher));
        let weights = two_pattern_weights();
        let recall = controller.run_sync(&weights, &p(&[1, 1, -1, 1]), 10).unwrap();
        assert_eq!(recall.pattern, p(&[1, 1, -1, -1]));
        assert!(!controller.is_busy());

        // Failure path releases too
        let err = controller.run_sync(&weights, &p(&[1, 1]), 10).unwrap_err();
        assert!(matches!(err, EngineError::RecallFailure(_)));
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_run_sync_requires_patterns() {
        let controller = RecallController::new(&unpaced(), Arc::new(InlineDispatcher));
        let err = controller
            .run_sync(&WeightMatrix::zeros(4), &p(&[1, 1, -1, 1]), 10)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoPatterns));

        let config = EngineConfig {
            require_patterns: false,
            ..unpaced()
        };
        let controller = RecallController::new(&config, Arc::new(InlineDispatcher));
        let recall = controller
            .run_sync(&WeightMatrix::zeros(4), &p(&[1, 1, -1, 1]), 10)
            .unwrap();
        // Zero weights drive every neuron to the tie value
        assert_eq!(recall.pattern, Pattern::blank(4));
    }

    #[test]
    fn test_guard_blocks_second_acquire() {
        let controller = RecallController::new(&unpaced(), Arc::new(InlineDispatcher));
        let guard = controller.acquire().unwrap();
        assert!(controller.is_busy());
        assert!(matches!(controller.acquire().unwrap_err(), EngineError::Busy));
        assert!(matches!(
            controller
                .run_sync(&two_pattern_weights(), &p(&[1, 1, -1, 1]), 10)
                .unwrap_err(),
            EngineError::Busy
        ));
        drop(guard);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_observable_cadence() {
        let queue = Arc::new(QueueDispatcher::new());
        let controller = RecallController::new(&unpaced(), queue.clone());
        // 25 neurons: intra-sweep snapshots after neurons 0, 10, 20
        let stored = Pattern::from_bools(&[true; 25]).with_noise(12, 5);
        let weights = Arc::new(WeightMatrix::rebuild(25, &[stored.clone()]).unwrap());

        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Mutex::new(None));
        let s = Arc::clone(&snapshots);
        let d = Arc::clone(&done);
        let handle = controller
            .run_observable(
                weights,
                stored.clone(),
                10,
                move |snap| s.lock().push(snap),
                move |recall| *d.lock() = Some(recall),
                |err| panic!("unexpected error: {}", err),
            )
            .unwrap();
        assert!(handle.join());
        assert!(controller.is_busy(), "flag held until terminal task runs");

        queue.run_pending();
        assert!(!controller.is_busy());

        let recall = done.lock().take().unwrap();
        assert_eq!(recall.pattern, stored);
        assert_eq!(recall.sweeps, 1);

        let snapshots = snapshots.lock();
        let updated: Vec<(usize, bool)> =
            snapshots.iter().map(|s| (s.updated, s.end_of_sweep)).collect();
        assert_eq!(
            updated,
            vec![(1, false), (11, false), (21, false), (25, true)]
        );
        assert_eq!(snapshots.last().unwrap().pattern, stored);
    }

    #[test]
    fn test_observable_error_path_releases_flag() {
        let queue = Arc::new(QueueDispatcher::new());
        let controller = RecallController::new(&unpaced(), queue.clone());
        let errors = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&errors);

        let handle = controller
            .run_observable(
                two_pattern_weights(),
                p(&[1, -1, 1]),
                10,
                |_| panic!("no progress expected"),
                |_| panic!("on_done must not run"),
                move |err| e.lock().push(err.to_string()),
            )
            .unwrap();
        assert!(handle.join());
        assert_eq!(queue.run_pending(), 1);

        assert_eq!(errors.lock().len(), 1);
        assert!(errors.lock()[0].starts_with("Recall failed"));
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_panicking_progress_becomes_recall_failure() {
        let controller = RecallController::new(&unpaced(), Arc::new(InlineDispatcher));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&errors);

        let handle = controller
            .run_observable(
                two_pattern_weights(),
                p(&[1, 1, -1, 1]),
                10,
                |_| panic!("display collaborator exploded"),
                |_| panic!("on_done must not run"),
                move |err| e.lock().push(err),
            )
            .unwrap();
        assert!(handle.join());

        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            EngineError::RecallFailure(msg) => assert!(msg.contains("exploded")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_dropped_terminal_task_still_releases() {
        struct Discard;
        impl Dispatcher for Discard {
            fn dispatch(&self, _task: Task) {}
        }

        let controller = RecallController::new(&unpaced(), Arc::new(Discard));
        let handle = controller
            .run_observable(
                two_pattern_weights(),
                p(&[1, 1, -1, 1]),
                10,
                |_| {},
                |_| {},
                |_| {},
            )
            .unwrap();
        assert!(handle.join());
        assert!(!controller.is_busy());
    }
}
