//! Bounded-concurrency batch execution.
//!
//! Work items are split into consecutive batches of at most `concurrency`
//! items. Every item in a batch runs at the same time on a dedicated worker
//! pool; the next batch starts only after the whole current batch has
//! finished. This caps the number of simultaneously running `git` processes
//! while still overlapping independent workspaces.
//!
//! Two result policies are offered:
//!
//! - [`Batcher::run_fail_fast`] stops after the first batch containing a
//!   failure and returns the first failure in item order. Siblings already
//!   running in that batch finish, but their results are dropped.
//! - [`Batcher::run_collect_all`] always runs every item and returns each
//!   outcome in input order.

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};

/// Runs per-item operations in ordered, fixed-size parallel batches.
pub struct Batcher {
    concurrency: usize,
    pool: ThreadPool,
}

impl Batcher {
    /// Creates a batcher running up to `concurrency` items at once. Zero is
    /// treated as one.
    pub fn new(concurrency: usize) -> Result<Self> {
        let concurrency = concurrency.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|index| format!("workspace-sync-{index}"))
            .build()
            .map_err(|e| Error::WorkerPool {
                message: e.to_string(),
            })?;
        Ok(Self { concurrency, pool })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn run_batch<I, T, E, F>(&self, batch: &[I], op: &F) -> Vec<std::result::Result<T, E>>
    where
        I: Sync,
        T: Send,
        E: Send,
        F: Fn(&I) -> std::result::Result<T, E> + Sync,
    {
        // One item per task so every item in the batch is started before
        // any result is collected.
        self.pool
            .install(|| batch.par_iter().with_max_len(1).map(op).collect())
    }

    /// Runs `op` over `items`, stopping after the first batch with a failure.
    pub fn run_fail_fast<I, T, E, F>(&self, items: &[I], op: F) -> std::result::Result<Vec<T>, E>
    where
        I: Sync,
        T: Send,
        E: Send,
        F: Fn(&I) -> std::result::Result<T, E> + Sync,
    {
        let total = items.len().div_ceil(self.concurrency);
        let mut outputs = Vec::with_capacity(items.len());

        for (index, batch) in items.chunks(self.concurrency).enumerate() {
            debug!("batch {}/{} ({} items)", index + 1, total, batch.len());
            for result in self.run_batch(batch, &op) {
                outputs.push(result?);
            }
        }

        Ok(outputs)
    }

    /// Runs `op` over every item and returns all outcomes in input order.
    pub fn run_collect_all<I, T, E, F>(&self, items: &[I], op: F) -> Vec<std::result::Result<T, E>>
    where
        I: Sync,
        T: Send,
        E: Send,
        F: Fn(&I) -> std::result::Result<T, E> + Sync,
    {
        let total = items.len().div_ceil(self.concurrency);
        let mut outcomes = Vec::with_capacity(items.len());

        for (index, batch) in items.chunks(self.concurrency).enumerate() {
            debug!("batch {}/{} ({} items)", index + 1, total, batch.len());
            outcomes.extend(self.run_batch(batch, &op));
        }

        outcomes
    }
}
