//! # Span Evaluator
//!
//! Parallel map over the span grid. Positions are handed out to a fixed pool
//! of scoped worker threads through a shared counter; every result carries its
//! grid index, so the output is always in grid order no matter which worker
//! finished first.
//!
//! If an evaluation fails, the abort flag is raised, idle workers stop taking
//! new positions, and the error with the lowest grid index is returned.
//! Nothing partial escapes a failed map.
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::numerics::SpanEvaluator;
//!
//! let grid = [0.0, 0.5, 1.0, 1.5];
//! let values = SpanEvaluator::new(2).map(&grid, |y| Ok(2.0 * y)).unwrap();
//! assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0]);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crate::errors::{WingBoxError, WingBoxResult};
use crate::numerics::curve::{Curve, Interpolation};

/// Fixed-size fork-join pool for per-position evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanEvaluator {
    workers: usize,
}

impl Default for SpanEvaluator {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

/// Available hardware parallelism, falling back to a single worker
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

type WorkerOutcome<T> = Result<Vec<(usize, T)>, (usize, WingBoxError)>;

impl SpanEvaluator {
    /// Pool with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Configured worker count
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate `f` at every grid position, results in grid order.
    pub fn map<T, F>(&self, grid: &[f64], f: F) -> WingBoxResult<Vec<T>>
    where
        T: Send,
        F: Fn(f64) -> WingBoxResult<T> + Sync,
    {
        if grid.is_empty() {
            return Ok(Vec::new());
        }
        let workers = self.workers.min(grid.len());
        log::debug!("span map: {} positions on {} workers", grid.len(), workers);

        let next = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);

        let outcomes: Vec<WorkerOutcome<T>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        while !abort.load(Ordering::Acquire) {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(&y) = grid.get(index) else {
                                break;
                            };
                            match f(y) {
                                Ok(value) => done.push((index, value)),
                                Err(err) => {
                                    abort.store(true, Ordering::Release);
                                    return Err((index, err));
                                }
                            }
                        }
                        Ok(done)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err((0, WingBoxError::internal("span evaluator worker panicked")))
                    })
                })
                .collect()
        });

        let mut slots: Vec<Option<T>> = (0..grid.len()).map(|_| None).collect();
        let mut first_error: Option<(usize, WingBoxError)> = None;

        for outcome in outcomes {
            match outcome {
                Ok(done) => {
                    for (index, value) in done {
                        slots[index] = Some(value);
                    }
                }
                Err((index, err)) => {
                    if first_error.as_ref().map_or(true, |(i, _)| index < *i) {
                        first_error = Some((index, err));
                    }
                }
            }
        }

        if let Some((index, err)) = first_error {
            log::debug!("span map aborted at grid index {index} (y = {})", grid[index]);
            return Err(err);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<T>>>()
            .ok_or_else(|| WingBoxError::internal("span evaluator lost a grid position"))
    }

    /// Evaluate `f` over the grid and wrap the samples in a [`Curve`].
    pub fn curve<F>(&self, grid: &[f64], f: F, mode: Interpolation) -> WingBoxResult<Curve>
    where
        F: Fn(f64) -> WingBoxResult<f64> + Sync,
    {
        let values = self.map(grid, f)?;
        Curve::build(grid, &values, mode)
    }
}
