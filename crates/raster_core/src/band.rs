//! Static row banding on a long-lived, fixed-size worker pool.
//!
//! The image is cut into a fixed number of equal bands (the last band takes
//! the remainder). Each band is submitted as one task to a rayon pool that is
//! created once and reused for every request.

use serde::Deserialize;

use crate::{allocate_buffer, default_workers, JoinedPool, Partitioner, RenderResult, RowRenderer, WorkUnit};

/// Configuration for [`BandPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Worker threads in the pool
    pub workers: usize,
    /// Bands submitted per worker thread
    pub bands_per_worker: usize,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            bands_per_worker: 8,
        }
    }
}

impl BandConfig {
    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the number of bands per worker.
    pub fn with_bands_per_worker(mut self, bands_per_worker: usize) -> Self {
        self.bands_per_worker = bands_per_worker;
        self
    }

    /// Total number of bands a request is split into.
    pub fn band_count(&self) -> usize {
        (self.workers * self.bands_per_worker).max(1)
    }
}

/// Split `height` rows into at most `bands` inclusive `(y_min, y_max)` ranges.
///
/// All bands have `height / bands` rows except the last, which also takes the
/// remainder. Never returns an empty band.
pub fn band_ranges(height: usize, bands: usize) -> Vec<(usize, usize)> {
    if height == 0 {
        return Vec::new();
    }

    let bands = bands.clamp(1, height);
    let band_height = height / bands;

    (0..bands)
        .map(|i| {
            let y_min = i * band_height;
            let y_max = if i == bands - 1 { height - 1 } else { y_min + band_height - 1 };
            (y_min, y_max)
        })
        .collect()
}

/// Long-lived worker pool rendering requests in static row bands.
///
/// Dropping the `BandPool` joins its worker threads.
pub struct BandPool {
    pool: JoinedPool,
    bands: usize,
}

impl BandPool {
    /// Build the worker pool. Threads live until the `BandPool` is dropped.
    pub fn new(config: &BandConfig) -> RenderResult<Self> {
        let workers = config.workers.max(1);
        let pool = JoinedPool::build(workers, "raster-band")?;

        log::info!(
            "Band pool ready: {} workers, {} bands per request",
            workers,
            config.band_count()
        );

        Ok(Self {
            pool,
            bands: config.band_count(),
        })
    }

    /// Number of bands each request is split into.
    pub fn bands(&self) -> usize {
        self.bands
    }
}

impl Partitioner for BandPool {
    fn render<R: RowRenderer>(&self, renderer: &R, width: usize, height: usize) -> RenderResult<Vec<R::Pixel>> {
        let mut buffer = allocate_buffer(width, height)?;
        let ranges = band_ranges(height, self.bands);
        log::debug!("Rendering {}x{} in {} bands", width, height, ranges.len());

        // Carve the buffer into one unit per band, top to bottom.
        let mut units = Vec::with_capacity(ranges.len());
        let mut rest = WorkUnit::whole(&mut buffer, width);
        for &(y_min, y_max) in &ranges[..ranges.len() - 1] {
            let (unit, remainder) = rest.split_at_row(y_max - y_min + 1);
            units.push(unit);
            rest = remainder;
        }
        units.push(rest);

        let mut outcomes: Vec<RenderResult<()>> = units.iter().map(|_| Ok(())).collect();
        self.pool.pool().scope(|scope| {
            for (unit, outcome) in units.into_iter().zip(outcomes.iter_mut()) {
                scope.spawn(move |_| *outcome = unit.run(renderer));
            }
        });

        // First failing band wins; the partial buffer is dropped.
        outcomes.into_iter().collect::<RenderResult<()>>()?;
        Ok(buffer)
    }

    fn workers(&self) -> usize {
        self.pool.workers()
    }
}
