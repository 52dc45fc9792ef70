//! Errors raised while producing a raster.

use raster_math::MathError;
use thiserror::Error;

/// Errors that abort a render request. No buffer is delivered when one occurs.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Work unit for rows {y_min}..={y_max} panicked: {message}")]
    WorkerPanicked {
        y_min: usize,
        y_max: usize,
        message: String,
    },

    #[error("Failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid viewport dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Result consumer for request {request_no} disconnected")]
    ConsumerDisconnected { request_no: u64 },

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
