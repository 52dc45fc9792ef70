//! Request handling for the ray tracer.

use std::time::Instant;

use raster_core::{BandConfig, BandPool, Partitioner, RenderResult, ResultSink, RowRenderer, Tagged};

use crate::{shading::trace, Point3, Scene, ViewPlane};

/// A viewport request for the ray tracer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRequest {
    pub eye: Point3,
    pub view: Point3,
    pub view_up: Point3,
    /// Width of the view plane in scene units
    pub horizontal: f64,
    /// Height of the view plane in scene units
    pub vertical: f64,
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    pub request_no: u64,
}

impl TraceRequest {
    fn view_plane(&self) -> ViewPlane {
        ViewPlane::new(
            self.eye,
            self.view,
            self.view_up,
            self.horizontal,
            self.vertical,
            self.width,
            self.height,
        )
    }
}

/// A finished ray-traced image, one row-major buffer per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub request_no: u64,
    pub width: usize,
    pub height: usize,
    pub red: Vec<u16>,
    pub green: Vec<u16>,
    pub blue: Vec<u16>,
}

impl Tagged for TraceResult {
    fn request_no(&self) -> u64 {
        self.request_no
    }
}

/// Per-request row renderer: one primary ray per pixel.
struct TraceRows<'a> {
    scene: &'a Scene,
    view: ViewPlane,
}

impl RowRenderer for TraceRows<'_> {
    type Pixel = [u16; 3];

    fn render_row(&self, y: usize, row: &mut [[u16; 3]]) -> RenderResult<()> {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = trace(self.scene, &self.view.ray_through(x, y));
        }
        Ok(())
    }
}

/// Renders viewport requests of one fixed scene.
///
/// By default requests are split into static bands on a [`BandPool`] that is
/// built once and reused; any other [`Partitioner`] can be supplied.
pub struct RayTracerProducer<P = BandPool> {
    scene: Scene,
    partitioner: P,
}

impl RayTracerProducer<BandPool> {
    /// Create a producer with its own band pool.
    pub fn new(scene: Scene, config: &BandConfig) -> RenderResult<Self> {
        let partitioner = BandPool::new(config)?;
        Ok(Self::with_partitioner(scene, partitioner))
    }
}

impl<P: Partitioner> RayTracerProducer<P> {
    pub fn with_partitioner(scene: Scene, partitioner: P) -> Self {
        log::info!(
            "Ray tracer ready: {} objects, {} lights, {} workers",
            scene.objects().len(),
            scene.lights().len(),
            partitioner.workers()
        );
        Self { scene, partitioner }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Render `request` and return the finished image.
    pub fn render(&self, request: &TraceRequest) -> RenderResult<TraceResult> {
        let start = Instant::now();
        log::debug!(
            "Trace request {}: {}x{}",
            request.request_no,
            request.width,
            request.height
        );

        let rows = TraceRows {
            scene: &self.scene,
            view: request.view_plane(),
        };
        let pixels = self.partitioner.render(&rows, request.width, request.height)?;

        let mut red = Vec::with_capacity(pixels.len());
        let mut green = Vec::with_capacity(pixels.len());
        let mut blue = Vec::with_capacity(pixels.len());
        for [r, g, b] in pixels {
            red.push(r);
            green.push(g);
            blue.push(b);
        }

        log::info!(
            "Trace request {} finished in {:?}",
            request.request_no,
            start.elapsed()
        );

        Ok(TraceResult {
            request_no: request.request_no,
            width: request.width,
            height: request.height,
            red,
            green,
            blue,
        })
    }

    /// Render `request` and hand the finished image to `sink`.
    ///
    /// Blocks until every band is done. Nothing is delivered if any band fails.
    pub fn produce(&self, request: &TraceRequest, sink: &dyn ResultSink<TraceResult>) -> RenderResult<()> {
        let result = self.render(request)?;
        sink.deliver(result)
    }
}
