//! Delivery of finished buffers and staleness tracking on the consumer side.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Sender, SyncSender};

use crate::{RenderError, RenderResult};

/// A result carrying the request number it was produced for.
pub trait Tagged {
    fn request_no(&self) -> u64;
}

/// Receives finished results. Called once per successful request, after
/// every work unit of that request has completed.
pub trait ResultSink<T> {
    fn deliver(&self, result: T) -> RenderResult<()>;
}

impl<T: Tagged> ResultSink<T> for Sender<T> {
    fn deliver(&self, result: T) -> RenderResult<()> {
        let request_no = result.request_no();
        self.send(result).map_err(|_| {
            log::warn!("Consumer for request {} has gone away", request_no);
            RenderError::ConsumerDisconnected { request_no }
        })
    }
}

impl<T: Tagged> ResultSink<T> for SyncSender<T> {
    fn deliver(&self, result: T) -> RenderResult<()> {
        let request_no = result.request_no();
        self.send(result).map_err(|_| {
            log::warn!("Consumer for request {} has gone away", request_no);
            RenderError::ConsumerDisconnected { request_no }
        })
    }
}

/// Adapts a plain closure into a [`ResultSink`].
pub struct CallbackSink<F>(pub F);

impl<T, F> ResultSink<T> for CallbackSink<F>
where
    F: Fn(T),
{
    fn deliver(&self, result: T) -> RenderResult<()> {
        (self.0)(result);
        Ok(())
    }
}

/// Thread-safe generator of monotonically increasing request numbers.
///
/// The first number handed out is 1.
#[derive(Debug, Default)]
pub struct RequestSequence {
    last: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next request number.
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently allocated request number (0 if none).
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

/// Consumer-side filter that drops results of superseded requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct StalenessFilter {
    newest: Option<u64>,
}

impl StalenessFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request number the consumer has issued or seen.
    pub fn observe(&mut self, request_no: u64) {
        self.newest = Some(self.newest.map_or(request_no, |n| n.max(request_no)));
    }

    /// Whether a result tagged `request_no` is still current.
    ///
    /// Results older than the newest number seen are rejected; accepted
    /// results advance the newest number.
    pub fn admit(&mut self, request_no: u64) -> bool {
        if matches!(self.newest, Some(newest) if request_no < newest) {
            log::debug!("Discarding stale result for request {}", request_no);
            return false;
        }
        self.observe(request_no);
        true
    }

    pub fn newest(&self) -> Option<u64> {
        self.newest
    }
}
