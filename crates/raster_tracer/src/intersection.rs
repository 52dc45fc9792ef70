//! Intersectable trait and RayIntersection for ray-object intersection.

use crate::{Color, Point3, Ray, Vector3};

/// Phong reflectance coefficients of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    /// Diffuse coefficient per channel
    pub diffuse: Color,
    /// Reflective (specular) coefficient per channel
    pub reflective: Color,
    /// Specular exponent
    pub shininess: f64,
}

impl Phong {
    pub fn new(diffuse: Color, reflective: Color, shininess: f64) -> Self {
        Self {
            diffuse,
            reflective,
            shininess,
        }
    }
}

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    /// Point of intersection
    pub point: Point3,
    /// Distance from the ray origin to `point`
    pub distance: f64,
    /// Whether the ray origin lies outside the object
    pub outer: bool,
    /// Unit surface normal at `point`, pointing out of the object
    pub normal: Vector3,
    /// Surface coefficients at `point`
    pub material: Phong,
}

/// Trait for objects that can be hit by rays.
pub trait Intersectable: Send + Sync {
    /// Closest intersection in front of the ray origin, if any.
    fn intersect(&self, ray: &Ray) -> Option<RayIntersection>;
}
