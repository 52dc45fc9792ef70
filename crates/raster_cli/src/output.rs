//! Conversion of delivered buffers into images.

use image::{Rgb, RgbImage};
use raster_fractal::FractalResult;
use raster_tracer::TraceResult;

/// Pack the three channel buffers into an RGB image.
pub fn trace_image(result: &TraceResult) -> RgbImage {
    let width = result.width;
    RgbImage::from_fn(result.width as u32, result.height as u32, |x, y| {
        let i = y as usize * width + x as usize;
        Rgb([
            channel(result.red[i]),
            channel(result.green[i]),
            channel(result.blue[i]),
        ])
    })
}

/// Colour every root's basin with its own hue; unclassified pixels are black.
pub fn fractal_image(result: &FractalResult) -> RgbImage {
    let palette = palette(result.palette_size);
    let width = result.width;
    RgbImage::from_fn(result.width as u32, result.height as u32, |x, y| {
        let index = result.root_indices[y as usize * width + x as usize] as usize;
        palette.get(index).copied().unwrap_or(Rgb([0, 0, 0]))
    })
}

#[inline]
fn channel(value: u16) -> u8 {
    value.min(255) as u8
}

/// Black followed by `size - 1` evenly spaced hues.
fn palette(size: usize) -> Vec<Rgb<u8>> {
    let hues = size.saturating_sub(1).max(1);
    std::iter::once(Rgb([0, 0, 0]))
        .chain((0..size.saturating_sub(1)).map(|i| hue_to_rgb(i as f64 / hues as f64)))
        .collect()
}

/// Fully saturated colour for `hue` in [0, 1).
fn hue_to_rgb(hue: f64) -> Rgb<u8> {
    let h = hue * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
}
