//! Raster Tracer - a parallel Phong ray tracer for sphere scenes.
//!
//! Every pixel casts one ray from the eye through a view plane, finds the
//! closest surface, and shades it with ambient, diffuse and specular terms
//! from each visible point light. Rows are rendered in static bands on a
//! long-lived worker pool by default.

mod camera;
mod intersection;
mod producer;
mod scene;
mod shading;
mod sphere;

pub use camera::ViewPlane;
pub use intersection::{Intersectable, Phong, RayIntersection};
pub use producer::{RayTracerProducer, TraceRequest, TraceResult};
pub use scene::{GraphicalObject, PointLight, Scene};
pub use shading::{trace, AMBIENT, MAX_CHANNEL};
pub use sphere::Sphere;

/// RGB triple, one component per channel.
pub type Color = glam::DVec3;

/// Re-export the math types used in the public API
pub use raster_math::{Point3, Ray, Vector3};
