//! Errors raised by the algebra types.

use thiserror::Error;

/// Errors that can occur in complex and polynomial arithmetic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Cannot parse complex number: {0}")]
    Parse(String),

    #[error("Division by a complex number of zero magnitude")]
    DivisionByZero,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for algebra operations.
pub type MathResult<T> = Result<T, MathError>;
