//! Bounded retry for fallible service calls.
//!
//! The policy is applied explicitly at each call site that needs it. Failed
//! attempts are logged with their attempt number; once the attempts run out
//! the last error is returned exactly as the operation produced it.

use crate::error::{Result, VocabcastError};
use std::future::Future;

/// Decides whether an error is worth another attempt.
type RetryClassifier = fn(&VocabcastError) -> bool;

/// Retry policy: maximum total attempts plus a retryable-error classifier.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    classifier: RetryClassifier,
}

impl RetryPolicy {
    /// Policy making at most `max_attempts` calls in total.
    ///
    /// Zero is treated as one: the operation always runs at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            classifier: VocabcastError::is_retryable,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && (self.classifier)(&e) => {
                    log::warn!("{label}: attempt {attempt} failed: {e}. Retrying...");
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        log::error!("{label}: giving up after {attempt} attempts: {e}");
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
