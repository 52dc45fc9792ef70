//! Complex polynomials in coefficient form and in root form.

use std::fmt;

use crate::{Complex, MathError, MathResult};

/// A polynomial `c_0 + c_1*z + ... + c_n*z^n` with complex coefficients.
///
/// Coefficients are stored constant term first.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPolynomial {
    coefficients: Vec<Complex>,
}

impl ComplexPolynomial {
    /// Create a polynomial from its coefficients, constant term first.
    ///
    /// Fails with [`MathError::InvalidArgument`] when `coefficients` is empty.
    pub fn new(coefficients: Vec<Complex>) -> MathResult<Self> {
        if coefficients.is_empty() {
            return Err(MathError::InvalidArgument(
                "polynomial needs at least one coefficient".to_string(),
            ));
        }
        Ok(Self { coefficients })
    }

    /// Coefficients, constant term first.
    pub fn coefficients(&self) -> &[Complex] {
        &self.coefficients
    }

    /// Degree of the polynomial (number of coefficients minus one).
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate at `z` using Horner's scheme.
    pub fn apply(&self, z: Complex) -> Complex {
        self.coefficients
            .iter()
            .rev()
            .fold(Complex::ZERO, |acc, &c| acc * z + c)
    }

    /// First derivative. The derivative of a constant is the zero polynomial.
    pub fn derive(&self) -> ComplexPolynomial {
        if self.coefficients.len() == 1 {
            return ComplexPolynomial {
                coefficients: vec![Complex::ZERO],
            };
        }

        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, &c)| c * k as f64)
            .collect();

        ComplexPolynomial { coefficients }
    }

    /// Product of two polynomials (convolution of the coefficient arrays).
    pub fn multiply(&self, other: &ComplexPolynomial) -> ComplexPolynomial {
        let mut coefficients = vec![Complex::ZERO; self.coefficients.len() + other.coefficients.len() - 1];

        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] = coefficients[i + j] + a * b;
            }
        }

        ComplexPolynomial { coefficients }
    }
}

impl fmt::Display for ComplexPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            write!(f, "({})", c)?;
            if power > 0 {
                write!(f, "*z^{}+", power)?;
            }
        }
        Ok(())
    }
}

/// A monic polynomial `(z - r_0) * (z - r_1) * ... * (z - r_n)` given by its roots.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexRootedPolynomial {
    roots: Vec<Complex>,
}

impl ComplexRootedPolynomial {
    /// Create a polynomial from its roots.
    ///
    /// Fails with [`MathError::InvalidArgument`] when `roots` is empty.
    pub fn new(roots: Vec<Complex>) -> MathResult<Self> {
        if roots.is_empty() {
            return Err(MathError::InvalidArgument(
                "rooted polynomial needs at least one root".to_string(),
            ));
        }
        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[Complex] {
        &self.roots
    }

    /// Evaluate at `z` as the product of `(z - r_i)`.
    pub fn apply(&self, z: Complex) -> Complex {
        self.roots
            .iter()
            .fold(Complex::ONE, |acc, &root| acc * (z - root))
    }

    /// Expand into coefficient form, multiplying in one root at a time.
    pub fn to_complex_polynomial(&self) -> ComplexPolynomial {
        let start = ComplexPolynomial {
            coefficients: vec![Complex::ONE],
        };

        self.roots.iter().fold(start, |acc, &root| {
            let factor = ComplexPolynomial {
                coefficients: vec![-root, Complex::ONE],
            };
            acc.multiply(&factor)
        })
    }

    /// Index of the root closest to `z`, if it lies within `threshold`.
    ///
    /// Ties on distance go to the lowest index.
    pub fn index_of_closest_root_for(&self, z: Complex, threshold: f64) -> Option<usize> {
        let mut closest: Option<(usize, f64)> = None;

        for (index, &root) in self.roots.iter().enumerate() {
            let distance = (z - root).module();
            match closest {
                Some((_, best)) if distance >= best => {}
                _ => closest = Some((index, distance)),
            }
        }

        closest
            .filter(|&(_, distance)| distance <= threshold)
            .map(|(index, _)| index)
    }
}

impl fmt::Display for ComplexRootedPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, root) in self.roots.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "(z-({}))", root)?;
        }
        Ok(())
    }
}
