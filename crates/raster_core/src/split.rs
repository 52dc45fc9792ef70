//! Recursive divide-and-conquer over rows on a work-stealing pool.

use serde::Deserialize;

use crate::{allocate_buffer, default_workers, JoinedPool, Partitioner, RenderResult, RowRenderer, WorkUnit};

/// Configuration for [`SplitPartitioner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Worker threads in each request's pool
    pub workers: usize,
    /// Ranges with at most this many rows are rendered directly
    pub row_threshold: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            row_threshold: 16,
        }
    }
}

impl SplitConfig {
    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the row count below which ranges are no longer split.
    pub fn with_row_threshold(mut self, row_threshold: usize) -> Self {
        self.row_threshold = row_threshold;
        self
    }
}

/// Renders a request by halving its row range until it is small enough.
///
/// A fresh rayon pool is built per request; its threads are joined before
/// the request returns.
#[derive(Debug, Clone, Copy)]
pub struct SplitPartitioner {
    config: SplitConfig,
}

impl SplitPartitioner {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }
}

impl Partitioner for SplitPartitioner {
    fn render<R: RowRenderer>(&self, renderer: &R, width: usize, height: usize) -> RenderResult<Vec<R::Pixel>> {
        let mut buffer = allocate_buffer(width, height)?;
        let threshold = self.config.row_threshold.max(1);

        let pool = JoinedPool::build(self.workers(), "raster-split")?;

        log::debug!(
            "Rendering {}x{} by recursive split (threshold {} rows, {} workers)",
            width,
            height,
            threshold,
            self.workers()
        );

        let unit = WorkUnit::whole(&mut buffer, width);
        pool.pool().install(|| divide(unit, threshold, renderer))?;
        Ok(buffer)
    }

    fn workers(&self) -> usize {
        self.config.workers.max(1)
    }
}

/// Render `unit` directly if it is small, otherwise split it and recurse on
/// both halves in parallel. The upper half's error takes precedence.
fn divide<R: RowRenderer>(unit: WorkUnit<'_, R::Pixel>, threshold: usize, renderer: &R) -> RenderResult<()> {
    if unit.height() <= threshold {
        return unit.run(renderer);
    }

    let (top, bottom) = unit.split_half();
    let (top_result, bottom_result) = rayon::join(
        || divide(top, threshold, renderer),
        || divide(bottom, threshold, renderer),
    );
    top_result.and(bottom_result)
}
