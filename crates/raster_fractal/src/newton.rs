//! Newton iteration and root classification for a single point.

use raster_math::{Complex, ComplexPolynomial, ComplexRootedPolynomial, MathError, MathResult};
use serde::Deserialize;

/// Iteration limits for [`NewtonKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Upper bound on Newton steps per pixel
    pub max_iterations: u32,
    /// Iteration stops once a step is no longer than this
    pub convergence_threshold: f64,
    /// Maximum distance to a root for the pixel to be assigned to it
    pub root_threshold: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 4096,
            convergence_threshold: 1e-3,
            root_threshold: 1e-3,
        }
    }
}

impl NewtonConfig {
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_thresholds(mut self, convergence_threshold: f64, root_threshold: f64) -> Self {
        self.convergence_threshold = convergence_threshold;
        self.root_threshold = root_threshold;
        self
    }
}

/// Read-only iteration state shared by all workers of a request.
#[derive(Debug, Clone)]
pub struct NewtonKernel {
    roots: ComplexRootedPolynomial,
    polynomial: ComplexPolynomial,
    derivative: ComplexPolynomial,
    config: NewtonConfig,
}

impl NewtonKernel {
    /// Largest root count whose `index + 1` pixel values all fit in a `u16`.
    pub const MAX_ROOTS: usize = u16::MAX as usize;

    /// Expand and differentiate the polynomial once, up front.
    ///
    /// Fails with [`MathError::InvalidArgument`] for more than
    /// [`MAX_ROOTS`](Self::MAX_ROOTS) roots.
    pub fn new(roots: ComplexRootedPolynomial, config: NewtonConfig) -> MathResult<Self> {
        let count = roots.roots().len();
        if count > Self::MAX_ROOTS {
            return Err(MathError::InvalidArgument(format!(
                "{} roots exceed the pixel range of {}",
                count,
                Self::MAX_ROOTS
            )));
        }

        let polynomial = roots.to_complex_polynomial();
        let derivative = polynomial.derive();
        Ok(Self {
            roots,
            polynomial,
            derivative,
            config,
        })
    }

    pub fn roots(&self) -> &ComplexRootedPolynomial {
        &self.roots
    }

    pub fn polynomial(&self) -> &ComplexPolynomial {
        &self.polynomial
    }

    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    /// Run Newton's method from `z0` and return the last iterate.
    ///
    /// Returns `None` when the derivative vanishes or an iterate stops being
    /// finite; such points never converge to a root.
    pub fn converge(&self, z0: Complex) -> Option<Complex> {
        let mut z = z0;

        for _ in 0..self.config.max_iterations {
            let step = self
                .polynomial
                .apply(z)
                .divide(self.derivative.apply(z))
                .ok()?;
            let next = z - step;
            if !(next.re.is_finite() && next.im.is_finite()) {
                return None;
            }

            let delta = (next - z).module();
            z = next;
            if delta <= self.config.convergence_threshold {
                break;
            }
        }

        Some(z)
    }

    /// Pixel value for `z0`: closest root index plus one, or 0 for no root.
    pub fn classify(&self, z0: Complex) -> u16 {
        self.converge(z0)
            .and_then(|z| self.roots.index_of_closest_root_for(z, self.config.root_threshold))
            .map_or(0, |index| index as u16 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_roots() -> NewtonKernel {
        let roots = ComplexRootedPolynomial::new(vec![Complex::ONE, Complex::ONE_NEG]).unwrap();
        NewtonKernel::new(roots, NewtonConfig::default()).unwrap()
    }

    fn four_roots() -> NewtonKernel {
        let roots =
            ComplexRootedPolynomial::new(vec![Complex::ONE, Complex::ONE_NEG, Complex::IM, Complex::IM_NEG]).unwrap();
        NewtonKernel::new(roots, NewtonConfig::default()).unwrap()
    }

    #[test]
    fn test_real_roots_basins() {
        let kernel = two_roots();
        assert_eq!(kernel.classify(Complex::new(0.5, 0.0)), 1);
        assert_eq!(kernel.classify(Complex::new(-0.5, 0.0)), 2);
        assert_eq!(kernel.classify(Complex::new(3.0, 0.2)), 1);
    }

    #[test]
    fn test_converged_value_is_near_root() {
        let z = two_roots().converge(Complex::new(0.5, 0.0)).unwrap();
        assert!((z - Complex::ONE).module() < 1e-3);
    }

    #[test]
    fn test_zero_derivative_is_unclassified() {
        // p(z) = z^2 - 1 has p'(0) = 0.
        let kernel = two_roots();
        assert!(kernel.converge(Complex::ZERO).is_none());
        assert_eq!(kernel.classify(Complex::ZERO), 0);
    }

    #[test]
    fn test_unit_roots_basins() {
        let kernel = four_roots();
        assert_eq!(kernel.classify(Complex::new(0.9, 0.1)), 1);
        assert_eq!(kernel.classify(Complex::new(-1.2, 0.05)), 2);
        assert_eq!(kernel.classify(Complex::new(0.1, 0.8)), 3);
        assert_eq!(kernel.classify(Complex::new(-0.05, -2.0)), 4);
    }

    #[test]
    fn test_iteration_budget_limits_classification() {
        let roots = ComplexRootedPolynomial::new(vec![Complex::ONE, Complex::ONE_NEG]).unwrap();
        let kernel = NewtonKernel::new(roots, NewtonConfig::default().with_max_iterations(1)).unwrap();
        // One step from 100 lands near 50, far from either root.
        assert_eq!(kernel.classify(Complex::new(100.0, 0.0)), 0);
    }

    #[test]
    fn test_root_count_limited_to_pixel_range() {
        let too_many = ComplexRootedPolynomial::new(vec![Complex::ONE; NewtonKernel::MAX_ROOTS + 1]).unwrap();
        assert!(matches!(
            NewtonKernel::new(too_many, NewtonConfig::default()),
            Err(MathError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = NewtonConfig::default();
        assert_eq!(config.max_iterations, 4096);
        assert_eq!(config.convergence_threshold, 1e-3);
        assert_eq!(config.root_threshold, 1e-3);
    }
}
