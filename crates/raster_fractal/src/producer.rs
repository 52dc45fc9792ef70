//! Request handling for the Newton fractal.

use std::time::Instant;

use raster_core::{Partitioner, RenderResult, ResultSink, RowRenderer, SplitConfig, SplitPartitioner, Tagged};
use raster_math::{Complex, ComplexRootedPolynomial};

use crate::{NewtonConfig, NewtonKernel};

/// A viewport request over the complex plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalRequest {
    pub re_min: f64,
    pub re_max: f64,
    pub im_min: f64,
    pub im_max: f64,
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    pub request_no: u64,
}

impl FractalRequest {
    /// Complex coordinate of pixel (x, y). Row 0 maps to `im_max`.
    pub fn map_pixel(&self, x: usize, y: usize) -> Complex {
        let re = self.re_min + x as f64 / self.width as f64 * (self.re_max - self.re_min);
        let im = self.im_max - y as f64 / self.height as f64 * (self.im_max - self.im_min);
        Complex::new(re, im)
    }
}

/// A finished fractal image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractalResult {
    pub request_no: u64,
    pub width: usize,
    pub height: usize,
    /// Row-major `root index + 1` per pixel, 0 where no root was reached
    pub root_indices: Vec<u16>,
    /// Number of distinct pixel values: roots plus the "no root" value
    pub palette_size: usize,
}

impl Tagged for FractalResult {
    fn request_no(&self) -> u64 {
        self.request_no
    }
}

struct NewtonRows<'a> {
    kernel: &'a NewtonKernel,
    request: &'a FractalRequest,
}

impl RowRenderer for NewtonRows<'_> {
    type Pixel = u16;

    fn render_row(&self, y: usize, row: &mut [u16]) -> RenderResult<()> {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = self.kernel.classify(self.request.map_pixel(x, y));
        }
        Ok(())
    }
}

/// Renders viewport requests for one fixed set of roots.
///
/// By default every request is split recursively on a fresh work-stealing
/// pool; any other [`Partitioner`] can be supplied.
pub struct NewtonProducer<P = SplitPartitioner> {
    kernel: NewtonKernel,
    partitioner: P,
}

impl NewtonProducer<SplitPartitioner> {
    pub fn new(roots: ComplexRootedPolynomial, config: NewtonConfig, split: SplitConfig) -> RenderResult<Self> {
        Self::with_partitioner(roots, config, SplitPartitioner::new(split))
    }
}

impl<P: Partitioner> NewtonProducer<P> {
    pub fn with_partitioner(
        roots: ComplexRootedPolynomial,
        config: NewtonConfig,
        partitioner: P,
    ) -> RenderResult<Self> {
        let kernel = NewtonKernel::new(roots, config)?;
        log::info!(
            "Newton fractal ready: p(z) = {}, {} workers",
            kernel.polynomial(),
            partitioner.workers()
        );
        Ok(Self { kernel, partitioner })
    }

    pub fn kernel(&self) -> &NewtonKernel {
        &self.kernel
    }

    /// Number of distinct values a result can contain.
    pub fn palette_size(&self) -> usize {
        self.kernel.roots().roots().len() + 1
    }

    /// Render `request` and return the finished image.
    pub fn render(&self, request: &FractalRequest) -> RenderResult<FractalResult> {
        let start = Instant::now();
        log::debug!(
            "Fractal request {}: {}x{} over [{}, {}] x [{}, {}]",
            request.request_no,
            request.width,
            request.height,
            request.re_min,
            request.re_max,
            request.im_min,
            request.im_max
        );

        let rows = NewtonRows {
            kernel: &self.kernel,
            request,
        };
        let root_indices = self.partitioner.render(&rows, request.width, request.height)?;

        log::info!(
            "Fractal request {} finished in {:?}",
            request.request_no,
            start.elapsed()
        );

        Ok(FractalResult {
            request_no: request.request_no,
            width: request.width,
            height: request.height,
            root_indices,
            palette_size: self.palette_size(),
        })
    }

    /// Render `request` and hand the finished image to `sink`.
    ///
    /// Blocks until every work unit is done. Nothing is delivered on failure.
    pub fn produce(&self, request: &FractalRequest, sink: &dyn ResultSink<FractalResult>) -> RenderResult<()> {
        let result = self.render(request)?;
        sink.deliver(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_core::{BandConfig, BandPool, CallbackSink, RenderError};
    use std::cell::RefCell;
    use std::sync::mpsc;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn unit_roots() -> ComplexRootedPolynomial {
        ComplexRootedPolynomial::new(vec![Complex::ONE, Complex::ONE_NEG, Complex::IM, Complex::IM_NEG]).unwrap()
    }

    fn request(width: usize, height: usize, request_no: u64) -> FractalRequest {
        FractalRequest {
            re_min: -2.0,
            re_max: 2.0,
            im_min: -2.0,
            im_max: 2.0,
            width,
            height,
            request_no,
        }
    }

    #[test]
    fn test_map_pixel_inverts_vertical_axis() {
        let req = request(4, 4, 0);
        assert_eq!(req.map_pixel(0, 0), Complex::new(-2.0, 2.0));
        assert_eq!(req.map_pixel(2, 2), Complex::new(0.0, 0.0));
        assert_eq!(req.map_pixel(3, 1), Complex::new(1.0, 1.0));
    }

    #[test]
    fn test_two_root_scenario() {
        let roots = ComplexRootedPolynomial::new(vec![Complex::ONE, Complex::ONE_NEG]).unwrap();
        let producer =
            NewtonProducer::new(roots, NewtonConfig::default(), SplitConfig::default().with_workers(2)).unwrap();
        let req = FractalRequest {
            re_min: -1.0,
            re_max: 1.0,
            im_min: -1.0,
            im_max: 1.0,
            width: 4,
            height: 2,
            request_no: 1,
        };
        assert_eq!(req.map_pixel(3, 1), Complex::new(0.5, 0.0));
        assert_eq!(req.map_pixel(1, 1), Complex::new(-0.5, 0.0));

        let result = producer.render(&req).unwrap();
        let row = &result.root_indices[4..8];
        assert_eq!(row[3], 1);
        assert_eq!(row[1], 2);
        // z0 = 0 has a vanishing derivative.
        assert_eq!(row[2], 0);
        assert_eq!(result.palette_size, 3);
    }

    #[test]
    fn test_produce_delivers_through_channel() {
        init_logging();
        let producer = NewtonProducer::new(unit_roots(), NewtonConfig::default(), SplitConfig::default()).unwrap();
        let (tx, rx) = mpsc::channel::<FractalResult>();

        producer.produce(&request(32, 24, 5), &tx).unwrap();
        let result = rx.recv().unwrap();

        assert_eq!(result.request_no, 5);
        assert_eq!(result.root_indices.len(), 32 * 24);
        assert_eq!(result.palette_size, 5);
        assert!(result.root_indices.iter().all(|&v| (v as usize) < result.palette_size));
        assert!(result.root_indices.iter().any(|&v| v == 1));
    }

    #[test]
    fn test_output_independent_of_workers_and_strategy() {
        init_logging();
        let req = request(50, 37, 2);
        let single = NewtonProducer::new(unit_roots(), NewtonConfig::default(), SplitConfig::default().with_workers(1))
            .unwrap()
            .render(&req)
            .unwrap();
        let split = NewtonProducer::new(
            unit_roots(),
            NewtonConfig::default(),
            SplitConfig::default().with_workers(4).with_row_threshold(3),
        )
        .unwrap()
        .render(&req)
        .unwrap();
        let banded = NewtonProducer::with_partitioner(
            unit_roots(),
            NewtonConfig::default(),
            BandPool::new(&BandConfig::default().with_workers(4)).unwrap(),
        )
        .unwrap()
        .render(&req)
        .unwrap();

        assert_eq!(single, split);
        assert_eq!(single, banded);
    }

    #[test]
    fn test_axis_pixels_reach_expected_roots() {
        let producer = NewtonProducer::new(unit_roots(), NewtonConfig::default(), SplitConfig::default()).unwrap();
        let result = producer.render(&request(4, 4, 1)).unwrap();
        let at = |x: usize, y: usize| result.root_indices[y * 4 + x];

        assert_eq!(at(3, 2), 1); // 1 + 0i
        assert_eq!(at(0, 2), 2); // -2 + 0i
        assert_eq!(at(2, 0), 3); // 0 + 2i
        assert_eq!(at(2, 3), 4); // 0 - 1i
        assert_eq!(at(2, 2), 0); // origin, vanishing derivative
    }

    #[test]
    fn test_callback_sink_receives_once() {
        let producer = NewtonProducer::new(unit_roots(), NewtonConfig::default(), SplitConfig::default()).unwrap();
        let received = RefCell::new(Vec::new());
        let sink = CallbackSink(|result: FractalResult| received.borrow_mut().push(result.request_no));

        producer.produce(&request(8, 8, 11), &sink).unwrap();
        assert_eq!(*received.borrow(), vec![11]);
    }

    #[test]
    fn test_too_many_roots_rejected() {
        let roots = ComplexRootedPolynomial::new(vec![Complex::IM; NewtonKernel::MAX_ROOTS + 1]).unwrap();
        assert!(matches!(
            NewtonProducer::new(roots, NewtonConfig::default(), SplitConfig::default()),
            Err(RenderError::Math(_))
        ));
    }

    #[test]
    fn test_empty_viewport_rejected() {
        let producer = NewtonProducer::new(unit_roots(), NewtonConfig::default(), SplitConfig::default()).unwrap();
        assert!(matches!(
            producer.render(&request(10, 0, 1)),
            Err(RenderError::InvalidDimensions { width: 10, height: 0 })
        ));
    }
}
