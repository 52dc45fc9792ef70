use crate::{Point3, Vector3};

/// A ray in 3D space with an origin and a unit-length direction.
///
/// The direction is normalized on construction and the fields are private,
/// so the parameter `t` of [`Ray::at`] is always the distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Create a new ray. `direction` is normalized.
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray starting at `start` and passing through `end`.
    pub fn from_points(start: Point3, end: Point3) -> Self {
        Self::new(start, end - start)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Get the (unit) direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }
}
