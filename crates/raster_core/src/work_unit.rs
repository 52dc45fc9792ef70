//! Work units: disjoint row ranges of the output buffer.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::{RenderError, RenderResult};

/// Computes the pixels of one image row.
///
/// Implementations hold only read-only request data (scene, polynomial, view)
/// and are shared by reference across all workers.
pub trait RowRenderer: Sync {
    /// Value stored per pixel.
    type Pixel: Copy + Default + Send;

    /// Fill `row`, the pixels of image row `y` from left to right.
    fn render_row(&self, y: usize, row: &mut [Self::Pixel]) -> RenderResult<()>;
}

/// A contiguous range of rows `y_min..=y_max` and the buffer slice they own.
///
/// Units are produced by splitting a single `&mut` buffer, so two units can
/// never alias the same pixels.
#[derive(Debug)]
pub struct WorkUnit<'a, P> {
    y_min: usize,
    y_max: usize,
    width: usize,
    pixels: &'a mut [P],
}

impl<'a, P> WorkUnit<'a, P> {
    /// Wrap a whole row-major buffer of `width`-pixel rows as one unit.
    ///
    /// `pixels` must be non-empty and a multiple of `width` long.
    pub fn whole(pixels: &'a mut [P], width: usize) -> Self {
        debug_assert!(width > 0 && !pixels.is_empty() && pixels.len() % width == 0);
        let height = pixels.len() / width;
        Self {
            y_min: 0,
            y_max: height - 1,
            width,
            pixels,
        }
    }

    /// First row (inclusive).
    pub fn y_min(&self) -> usize {
        self.y_min
    }

    /// Last row (inclusive).
    pub fn y_max(&self) -> usize {
        self.y_max
    }

    /// Number of rows in the unit.
    pub fn height(&self) -> usize {
        self.y_max - self.y_min + 1
    }

    /// Split off the first `rows` rows. Both halves must be non-empty.
    pub fn split_at_row(self, rows: usize) -> (WorkUnit<'a, P>, WorkUnit<'a, P>) {
        debug_assert!(rows > 0 && rows < self.height());
        let WorkUnit {
            y_min,
            y_max,
            width,
            pixels,
        } = self;
        let (top, bottom) = pixels.split_at_mut(rows * width);
        let split_y = y_min + rows;
        (
            WorkUnit {
                y_min,
                y_max: split_y - 1,
                width,
                pixels: top,
            },
            WorkUnit {
                y_min: split_y,
                y_max,
                width,
                pixels: bottom,
            },
        )
    }

    /// Split into two halves at the middle row.
    pub fn split_half(self) -> (WorkUnit<'a, P>, WorkUnit<'a, P>) {
        let rows = self.height() / 2;
        self.split_at_row(rows)
    }

    /// Render every row of the unit.
    ///
    /// A panic inside the renderer is caught here and reported as
    /// [`RenderError::WorkerPanicked`] so it reaches the caller of `produce`.
    pub fn run<R>(self, renderer: &R) -> RenderResult<()>
    where
        R: RowRenderer<Pixel = P>,
    {
        let (y_min, y_max, width) = (self.y_min, self.y_max, self.width);
        let pixels = self.pixels;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> RenderResult<()> {
            for (offset, row) in pixels.chunks_mut(width).enumerate() {
                renderer.render_row(y_min + offset, row)?;
            }
            Ok(())
        }));

        outcome.unwrap_or_else(|payload| {
            Err(RenderError::WorkerPanicked {
                y_min,
                y_max,
                message: panic_message(payload.as_ref()),
            })
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_renderers::{expected_indices, IndexRenderer, PanickingRenderer};

    #[test]
    fn test_whole_unit_covers_buffer() {
        let mut pixels = vec![0u32; 4 * 3];
        let unit = WorkUnit::whole(&mut pixels, 4);
        assert_eq!(unit.y_min(), 0);
        assert_eq!(unit.y_max(), 2);
        assert_eq!(unit.height(), 3);
    }

    #[test]
    fn test_split_half_is_disjoint_and_complete() {
        let mut pixels = vec![0u32; 5 * 7];
        let (top, bottom) = WorkUnit::whole(&mut pixels, 5).split_half();

        assert_eq!((top.y_min(), top.y_max()), (0, 2));
        assert_eq!((bottom.y_min(), bottom.y_max()), (3, 6));

        top.run(&IndexRenderer).unwrap();
        bottom.run(&IndexRenderer).unwrap();
        assert_eq!(pixels, expected_indices(5, 7));
    }

    #[test]
    fn test_panic_becomes_error() {
        let mut pixels = vec![0u32; 2 * 4];
        let err = WorkUnit::whole(&mut pixels, 2)
            .run(&PanickingRenderer { row: 2 })
            .unwrap_err();

        match err {
            RenderError::WorkerPanicked { y_min, y_max, message } => {
                assert_eq!((y_min, y_max), (0, 3));
                assert_eq!(message, "bad row 2");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
