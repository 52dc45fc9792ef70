//! View plane for primary ray generation.

use crate::{Point3, Ray, Vector3};

/// A rectangular view plane centred on `view`, seen from `eye`.
///
/// Pixel (0, 0) maps to the upper-left corner of the plane and
/// pixel (width - 1, height - 1) to the lower-right corner.
#[derive(Debug, Clone, Copy)]
pub struct ViewPlane {
    eye: Point3,
    corner: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    // Plane distance between neighbouring pixels
    step_x: f64,
    step_y: f64,
}

impl ViewPlane {
    /// Build the plane from the eye, the point looked at, an approximate up
    /// vector and the plane's extent.
    pub fn new(
        eye: Point3,
        view: Point3,
        view_up: Point3,
        horizontal: f64,
        vertical: f64,
        width: usize,
        height: usize,
    ) -> Self {
        let forward = (view - eye).normalize();
        let up = view_up.normalize();

        // Camera basis vectors
        let y_axis = (up - forward * forward.dot(up)).normalize();
        let x_axis = forward.cross(y_axis).normalize();

        let corner = view - x_axis * (horizontal / 2.0) + y_axis * (vertical / 2.0);

        Self {
            eye,
            corner,
            x_axis,
            y_axis,
            step_x: horizontal / width.saturating_sub(1).max(1) as f64,
            step_y: vertical / height.saturating_sub(1).max(1) as f64,
        }
    }

    /// Ray from the eye through pixel (x, y).
    pub fn ray_through(&self, x: usize, y: usize) -> Ray {
        let screen_point =
            self.corner + self.x_axis * (x as f64 * self.step_x) - self.y_axis * (y as f64 * self.step_y);
        Ray::from_points(self.eye, screen_point)
    }

    pub fn eye(&self) -> Point3 {
        self.eye
    }
}
