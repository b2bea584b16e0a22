//! Window-based bounded concurrency for independent units of work
//!
//! Units are split into consecutive groups of `concurrency`. A group runs
//! concurrently and completes entirely before the next group starts, so no
//! more than `concurrency` units are ever in flight. A failing or panicking
//! unit is captured into its own result and never cancels its siblings.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::join_all;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchError {
    /// Concurrency must be at least 1
    InvalidConcurrency(usize),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::InvalidConcurrency(value) => {
                write!(f, "Invalid concurrency {}: must be at least 1", value)
            }
        }
    }
}

impl std::error::Error for BatchError {}

/// Outcome of one unit of work
#[derive(Debug, Clone, PartialEq)]
pub enum UnitResult<T, E> {
    Succeeded(T),
    Failed(E),
    Panicked(String),
}

impl<T, E> UnitResult<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, UnitResult::Succeeded(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

/// Statistics for the batch executor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub units_run: u64,
    pub groups_run: u64,
    pub failed: u64,
    pub panicked: u64,
}

/// Runs units in fixed-size groups
#[derive(Debug)]
pub struct BatchExecutor {
    concurrency: usize,
    units_run: AtomicU64,
    groups_run: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl BatchExecutor {
    pub fn new(concurrency: usize) -> Result<Self, BatchError> {
        if concurrency == 0 {
            return Err(BatchError::InvalidConcurrency(concurrency));
        }

        Ok(Self {
            concurrency,
            units_run: AtomicU64::new(0),
            groups_run: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            panicked: AtomicU64::new(0),
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every unit and return one result per unit, in input order
    pub async fn run<T, E, F, Fut>(&self, units: Vec<F>) -> Vec<UnitResult<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let total = units.len();
        let group_count = total.div_ceil(self.concurrency);
        let mut results = Vec::with_capacity(total);
        let mut pending = units.into_iter();

        for group in 0..group_count {
            let window: Vec<F> = pending.by_ref().take(self.concurrency).collect();
            debug!(
                "Batch group {}/{}: running {} units",
                group + 1,
                group_count,
                window.len()
            );

            let outcomes = join_all(
                window
                    .into_iter()
                    .map(|unit| AssertUnwindSafe(async move { unit().await }).catch_unwind()),
            )
            .await;

            for outcome in outcomes {
                self.units_run.fetch_add(1, Ordering::Relaxed);
                let result = match outcome {
                    Ok(Ok(value)) => UnitResult::Succeeded(value),
                    Ok(Err(error)) => {
                        self.failed.fetch_add(1, Ordering::Relaxed);
                        UnitResult::Failed(error)
                    }
                    Err(payload) => {
                        self.panicked.fetch_add(1, Ordering::Relaxed);
                        UnitResult::Panicked(panic_message(payload))
                    }
                };
                results.push(result);
            }

            self.groups_run.fetch_add(1, Ordering::Relaxed);
        }

        results
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats {
            units_run: self.units_run.load(Ordering::Relaxed),
            groups_run: self.groups_run.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}
