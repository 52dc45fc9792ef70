//! Sphere primitive for ray tracing.

use raster_math::EPSILON;

use crate::{Intersectable, Phong, Point3, Ray, RayIntersection};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Phong,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f64, material: Phong) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Intersectable for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<RayIntersection> {
        // |O + tD - C|^2 = r^2 with |D| = 1
        let oc = ray.origin() - self.center;
        let half_b = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the nearer root; roots behind the origin are discarded.
        let t = [-half_b - sqrtd, -half_b + sqrtd]
            .into_iter()
            .find(|&t| t - EPSILON >= 0.0)?;

        let point = ray.at(t);
        let from_center = point - self.center;

        Some(RayIntersection {
            point,
            distance: t,
            outer: oc.length() > from_center.length(),
            normal: from_center.normalize(),
            material: self.material,
        })
    }
}
