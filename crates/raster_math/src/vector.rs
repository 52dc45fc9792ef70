//! Three-component vectors and epsilon-tolerant comparison.

use glam::DVec3;

/// Tolerance used by every approximate comparison in the engines.
pub const EPSILON: f64 = 1e-6;

/// A 3D vector of doubles.
///
/// glam's `DVec3` already covers `add`, `sub`, scaling, `dot`, `cross`,
/// `length` (norm) and `normalize`; the engines only add tolerant equality.
pub type Vector3 = DVec3;

/// A point in 3D space. Same representation as [`Vector3`].
pub type Point3 = DVec3;

/// Equality within [`EPSILON`] on every component.
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for DVec3 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(*other, EPSILON)
    }
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() <= EPSILON
    }
}
