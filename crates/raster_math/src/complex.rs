//! Complex numbers with tolerant equality, nth roots and text parsing.

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use crate::{ApproxEq, MathError, MathResult, EPSILON};

/// An immutable complex number `re + i*im`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };
    pub const ONE_NEG: Complex = Complex { re: -1.0, im: 0.0 };
    pub const IM: Complex = Complex { re: 0.0, im: 1.0 };
    pub const IM_NEG: Complex = Complex { re: 0.0, im: -1.0 };

    /// Create a new complex number.
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Create a complex number from polar coordinates.
    pub fn from_magnitude_and_angle(magnitude: f64, angle: f64) -> Self {
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// Magnitude (absolute value).
    #[inline]
    pub fn module(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Argument in `(-PI, PI]`.
    #[inline]
    pub fn angle(self) -> f64 {
        self.im.atan2(self.re)
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Complex) -> Complex {
        Complex::new(self.re + other.re, self.im + other.im)
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Complex) -> Complex {
        Complex::new(self.re - other.re, self.im - other.im)
    }

    #[inline]
    pub fn multiply(self, other: Complex) -> Complex {
        Complex::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    /// Divide by `other`.
    ///
    /// Fails with [`MathError::DivisionByZero`] when `other` is exactly zero.
    /// Scales by the larger component of `other` (Smith's method) so extreme
    /// magnitudes neither overflow nor underflow the denominator.
    pub fn divide(self, other: Complex) -> MathResult<Complex> {
        if other.re == 0.0 && other.im == 0.0 {
            return Err(MathError::DivisionByZero);
        }

        if other.re.abs() >= other.im.abs() {
            let ratio = other.im / other.re;
            let denominator = other.re + other.im * ratio;
            Ok(Complex::new(
                (self.re + self.im * ratio) / denominator,
                (self.im - self.re * ratio) / denominator,
            ))
        } else {
            let ratio = other.re / other.im;
            let denominator = other.re * ratio + other.im;
            Ok(Complex::new(
                (self.re * ratio + self.im) / denominator,
                (self.im * ratio - self.re) / denominator,
            ))
        }
    }

    /// Raise to a non-negative integer power by repeated multiplication.
    pub fn power(self, n: u32) -> Complex {
        let mut result = Complex::ONE;
        for _ in 0..n {
            result = result.multiply(self);
        }
        result
    }

    /// The `n` nth roots, ordered by increasing angle `(arg + 2*PI*k) / n`.
    pub fn root(self, n: i32) -> MathResult<Vec<Complex>> {
        if n <= 0 {
            return Err(MathError::InvalidArgument(format!(
                "root degree must be positive, got {}",
                n
            )));
        }

        let magnitude = self.module().powf(1.0 / n as f64);
        let angle = self.angle();

        Ok((0..n)
            .map(|k| {
                Complex::from_magnitude_and_angle(
                    magnitude,
                    (angle + 2.0 * PI * k as f64) / n as f64,
                )
            })
            .collect())
    }

    /// Parse text such as `"3"`, `"-i"`, `"2.5 - i1.5"` or `"i4"`.
    ///
    /// The imaginary unit precedes its magnitude, which defaults to 1.
    /// Whitespace is only allowed around the sign joining the two parts
    /// and at either end.
    pub fn parse(text: &str) -> MathResult<Complex> {
        ComplexParser::new(text).parse()
    }
}

impl ApproxEq for Complex {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self.re - other.re).abs() <= EPSILON && (self.im - other.im).abs() <= EPSILON
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::add(self, rhs)
    }
}

impl Sub for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::sub(self, rhs)
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        self.multiply(rhs)
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: f64) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

impl Neg for Complex {
    type Output = Complex;

    #[inline]
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}-i{}", self.re, -self.im)
        } else {
            write!(f, "{}+i{}", self.re, self.im)
        }
    }
}

impl FromStr for Complex {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Complex::parse(s)
    }
}

/// Single-pass scanner over the complex-number grammar.
struct ComplexParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ComplexParser<'a> {
    fn new(text: &'a str) -> Self {
        let text = text.trim();
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> MathResult<Complex> {
        if self.bytes.is_empty() {
            return Err(self.error("empty input"));
        }

        let leading = self.sign().unwrap_or(1.0);
        self.skip_whitespace();

        if self.peek() == Some(b'i') {
            let im = self.imaginary()?;
            self.expect_end()?;
            return Ok(Complex::new(0.0, leading * im));
        }

        let re = leading * self.number()?;
        self.skip_whitespace();
        if self.at_end() {
            return Ok(Complex::new(re, 0.0));
        }

        let joining = self
            .sign()
            .ok_or_else(|| self.error("expected '+' or '-' before imaginary part"))?;
        self.skip_whitespace();
        if self.peek() != Some(b'i') {
            return Err(self.error("expected 'i'"));
        }
        let im = self.imaginary()?;
        self.expect_end()?;

        Ok(Complex::new(re, joining * im))
    }

    /// `i` followed by an optional magnitude.
    fn imaginary(&mut self) -> MathResult<f64> {
        self.pos += 1;
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            _ => Ok(1.0),
        }
    }

    fn number(&mut self) -> MathResult<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.') {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a number"));
        }
        self.text[start..self.pos]
            .parse::<f64>()
            .map_err(|_| self.error("malformed number"))
    }

    fn sign(&mut self) -> Option<f64> {
        let sign = match self.peek()? {
            b'+' => 1.0,
            b'-' => -1.0,
            _ => return None,
        };
        self.pos += 1;
        Some(sign)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect_end(&self) -> MathResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn error(&self, reason: &str) -> MathError {
        MathError::Parse(format!("'{}' at position {}: {}", self.text, self.pos, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }

    #[test]
    fn test_add_then_sub_restores_value() {
        let samples = [c(1.0, 2.0), c(-3.5, 0.25), c(0.0, 0.0), c(1e3, -7.0)];
        for a in samples {
            for d in samples {
                assert!(a.add(d).sub(d).approx_eq(&a), "{} +- {}", a, d);
            }
        }
    }

    #[test]
    fn test_multiply_and_divide() {
        let a = c(1.0, 2.0);
        let b = c(3.0, -1.0);
        assert_eq!(a.multiply(b), c(5.0, 5.0));
        assert_eq!(a.multiply(b).divide(b).unwrap(), a);
    }

    #[test]
    fn test_divide_by_zero_fails() {
        assert_eq!(c(1.0, 1.0).divide(Complex::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_divide_extreme_magnitudes() {
        let huge = c(1e200, 0.0);
        assert_eq!(huge.divide(huge).unwrap(), Complex::ONE);

        let tiny = c(1e-200, 0.0);
        assert_eq!(tiny.divide(tiny).unwrap(), Complex::ONE);

        let quotient = c(3e200, 1e200).divide(c(1e200, 1e200)).unwrap();
        assert!(quotient.re.is_finite() && quotient.im.is_finite());
        assert_eq!(quotient, c(2.0, -1.0));

        assert_eq!(c(1e-300, 2e-300).divide(c(0.0, 1e-300)).unwrap(), c(2.0, -1.0));
    }

    #[test]
    fn test_power() {
        assert_eq!(Complex::IM.power(2), Complex::ONE_NEG);
        assert_eq!(c(1.0, 1.0).power(3), c(-2.0, 2.0));
        assert_eq!(c(5.0, 7.0).power(0), Complex::ONE);
    }

    #[test]
    fn test_roots_ordered_by_angle() {
        let roots = Complex::ONE.root(4).unwrap();
        assert_eq!(roots.len(), 4);
        assert_eq!(roots[0], Complex::ONE);
        assert_eq!(roots[1], Complex::IM);
        assert_eq!(roots[2], Complex::ONE_NEG);
        assert_eq!(roots[3], Complex::IM_NEG);

        for root in c(-8.0, 3.0).root(3).unwrap() {
            assert_eq!(root.power(3), c(-8.0, 3.0));
        }
    }

    #[test]
    fn test_root_rejects_non_positive_degree() {
        assert!(matches!(Complex::ONE.root(0), Err(MathError::InvalidArgument(_))));
        assert!(matches!(Complex::ONE.root(-2), Err(MathError::InvalidArgument(_))));
    }

    #[test]
    fn test_module() {
        assert!((c(3.0, -4.0).module() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_parse_accepts_grammar() {
        let cases = [
            ("3.51", c(3.51, 0.0)),
            ("-3.17", c(-3.17, 0.0)),
            ("-i2.71", c(0.0, -2.71)),
            ("i", c(0.0, 1.0)),
            ("-i", c(0.0, -1.0)),
            ("+i", c(0.0, 1.0)),
            ("1", c(1.0, 0.0)),
            ("-2.71-i3.15", c(-2.71, -3.15)),
            ("31+i24", c(31.0, 24.0)),
            ("-1 + i0", c(-1.0, 0.0)),
            ("0 - i1", c(0.0, -1.0)),
            ("  2 -   i ", c(2.0, -1.0)),
            ("1+i", c(1.0, 1.0)),
        ];
        for (text, expected) in cases {
            assert_eq!(Complex::parse(text).unwrap(), expected, "parsing {:?}", text);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "   ", "-", "abc", "1+", "1 2", "i 2", "2i", "1+2", "1.2.3", "i1+3", "--1"] {
            assert!(
                matches!(Complex::parse(text), Err(MathError::Parse(_))),
                "{:?} should not parse",
                text
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let value = c(-2.5, -0.75);
        assert_eq!(value.to_string(), "-2.5-i0.75");
        assert_eq!(value.to_string().parse::<Complex>().unwrap(), value);
    }
}
