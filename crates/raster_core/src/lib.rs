//! Raster Core - parallel row partitioning shared by the raster engines.
//!
//! A request renders a `width x height` grid of pixels. The grid is cut into
//! disjoint row ranges ([`WorkUnit`]s) and every unit is rendered on a worker
//! thread by a [`RowRenderer`]. Two partition strategies are provided:
//!
//! - [`BandPool`]: a fixed number of equal row bands on a long-lived pool
//! - [`SplitPartitioner`]: recursive halving on a fresh work-stealing pool
//!
//! Both block until every unit is done and either return the complete buffer
//! or the first error. Finished buffers are handed to a [`ResultSink`]; a
//! consumer uses a [`StalenessFilter`] to drop results of superseded requests.

pub mod band;
pub mod delivery;
pub mod error;
pub mod pool;
pub mod split;
pub mod work_unit;

pub use band::{band_ranges, BandConfig, BandPool};
pub use delivery::{CallbackSink, RequestSequence, ResultSink, StalenessFilter, Tagged};
pub use error::{RenderError, RenderResult};
pub use pool::JoinedPool;
pub use split::{SplitConfig, SplitPartitioner};
pub use work_unit::{RowRenderer, WorkUnit};

/// Strategy that renders a full pixel grid with a [`RowRenderer`].
pub trait Partitioner {
    /// Render every row of a `width x height` grid and return the row-major buffer.
    ///
    /// Blocks until all work units are complete.
    fn render<R: RowRenderer>(&self, renderer: &R, width: usize, height: usize) -> RenderResult<Vec<R::Pixel>>;

    /// Number of worker threads the strategy runs on.
    fn workers(&self) -> usize;
}

/// Number of hardware threads, or 1 if it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Allocate the output buffer for a request, rejecting empty grids and grids
/// whose pixel count does not fit in `usize`.
pub(crate) fn allocate_buffer<P: Copy + Default>(width: usize, height: usize) -> RenderResult<Vec<P>> {
    match width.checked_mul(height) {
        Some(len) if len > 0 => Ok(vec![P::default(); len]),
        _ => {
            log::warn!("Rejecting viewport {}x{}", width, height);
            Err(RenderError::InvalidDimensions { width, height })
        }
    }
}

#[cfg(test)]
pub(crate) mod test_renderers {
    use super::*;

    /// Writes `y * width + x` into every pixel.
    pub struct IndexRenderer;

    impl RowRenderer for IndexRenderer {
        type Pixel = u32;

        fn render_row(&self, y: usize, row: &mut [u32]) -> RenderResult<()> {
            let width = row.len();
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = (y * width + x) as u32 + 1;
            }
            Ok(())
        }
    }

    /// Panics on one specific row.
    pub struct PanickingRenderer {
        pub row: usize,
    }

    impl RowRenderer for PanickingRenderer {
        type Pixel = u32;

        fn render_row(&self, y: usize, row: &mut [u32]) -> RenderResult<()> {
            if y == self.row {
                panic!("bad row {}", y);
            }
            row.fill(1);
            Ok(())
        }
    }

    /// Fails with a math error on every row from `row` on.
    pub struct FailingRenderer {
        pub row: usize,
    }

    impl RowRenderer for FailingRenderer {
        type Pixel = u32;

        fn render_row(&self, y: usize, row: &mut [u32]) -> RenderResult<()> {
            if y >= self.row {
                return Err(raster_math::MathError::DivisionByZero.into());
            }
            row.fill(1);
            Ok(())
        }
    }

    pub fn expected_indices(width: usize, height: usize) -> Vec<u32> {
        (0..width * height).map(|i| i as u32 + 1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_renderers::IndexRenderer;
    use super::*;

    fn render_with<P: Partitioner>(partitioner: &P) -> Vec<u32> {
        partitioner.render(&IndexRenderer, 37, 53).unwrap()
    }

    #[test]
    fn test_strategies_agree_across_worker_counts() {
        let single_band = BandPool::new(&BandConfig::default().with_workers(1)).unwrap();
        let many_bands = BandPool::new(&BandConfig::default().with_workers(4)).unwrap();
        let single_split = SplitPartitioner::new(SplitConfig::default().with_workers(1));
        let many_split = SplitPartitioner::new(SplitConfig::default().with_workers(4).with_row_threshold(3));

        let reference = render_with(&single_band);
        assert_eq!(reference, test_renderers::expected_indices(37, 53));
        assert_eq!(render_with(&many_bands), reference);
        assert_eq!(render_with(&single_split), reference);
        assert_eq!(render_with(&many_split), reference);
    }

    #[test]
    fn test_allocate_buffer_rejects_bad_dimensions() {
        assert_eq!(allocate_buffer::<u8>(3, 2).unwrap().len(), 6);
        assert!(matches!(
            allocate_buffer::<u8>(usize::MAX, 2),
            Err(RenderError::InvalidDimensions { height: 2, .. })
        ));
        assert!(matches!(
            allocate_buffer::<u8>(0, 5),
            Err(RenderError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_overflowing_viewport_rejected_by_both_strategies() {
        let band = BandPool::new(&BandConfig::default().with_workers(1)).unwrap();
        let split = SplitPartitioner::new(SplitConfig::default().with_workers(1));
        let huge = usize::MAX / 2 + 1;

        assert!(matches!(band.render(&IndexRenderer, huge, 2), Err(RenderError::InvalidDimensions { .. })));
        assert!(matches!(split.render(&IndexRenderer, 2, huge), Err(RenderError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_default_workers_is_positive() {
        assert!(default_workers() >= 1);
    }
}
