//! Raster Fractal - Newton-Raphson basins of attraction.
//!
//! Each pixel is mapped to a point of the complex plane and iterated with
//! Newton's method on a polynomial given by its roots. The pixel records
//! which root the iteration settled on (`index + 1`), or 0 if none.

mod newton;
mod producer;

pub use newton::{NewtonConfig, NewtonKernel};
pub use producer::{FractalRequest, FractalResult, NewtonProducer};

pub use raster_math::{Complex, ComplexRootedPolynomial};
