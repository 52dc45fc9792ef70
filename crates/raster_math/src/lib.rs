//! Raster Math - value types shared by the ray tracer and the fractal engine.
//!
//! This crate provides:
//!
//! - **Vectors**: `Vector3` (glam's `DVec3`) with epsilon-tolerant equality
//! - **Rays**: `Ray` with a normalized direction
//! - **Complex numbers**: `Complex` with parsing and nth roots
//! - **Polynomials**: coefficient-form and root-form complex polynomials

// Re-export glam for convenience
pub use glam::DVec3;

mod complex;
mod error;
mod polynomial;
mod ray;
mod vector;

pub use complex::Complex;
pub use error::{MathError, MathResult};
pub use polynomial::{ComplexPolynomial, ComplexRootedPolynomial};
pub use ray::Ray;
pub use vector::{ApproxEq, Point3, Vector3, EPSILON};
