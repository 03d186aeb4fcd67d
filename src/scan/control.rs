//! Cooperative cancellation and deadlines, checked once per scale level.
use crate::error::DetectError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag a caller can flip from another thread to stop a scan.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Interruption sources consulted at the start of every level.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanControl<'a> {
    pub cancel: Option<&'a CancelToken>,
    pub deadline: Option<Instant>,
}

impl<'a> ScanControl<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `budget` from now.
    pub fn with_budget(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }

    pub(crate) fn check(&self, level: usize) -> Result<(), DetectError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(DetectError::Cancelled { level });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(DetectError::DeadlineExceeded { level });
        }
        Ok(())
    }
}
