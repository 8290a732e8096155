//! Bounded retry with exponential backoff and cancellation.
//!
//! Bucket facets are eventually consistent: right after CreateBucket a facet
//! call may still answer `NoSuchBucket`, and concurrent writers surface as
//! `OperationAborted`. A [`RetryPolicy`] names exactly which errors are worth
//! retrying and how long to keep trying. Everything else fails immediately.
//!
//! The cancellation token is checked before every attempt and raced against
//! every backoff sleep. When the ceiling is reached the last attempt runs at
//! the deadline itself.

use std::future::Future;
use std::time::{Duration, Instant};

use ruststack_bucket_model::{S3Error, S3ErrorCode};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// An error that a [`RetryPolicy`] treats as transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryCondition {
    /// Any error with this code.
    Code(S3ErrorCode),
    /// An error with this code whose message contains the given text.
    CodeWithMessage {
        /// Error code to match.
        code: S3ErrorCode,
        /// Substring of the error message.
        message: &'static str,
    },
}

impl RetryCondition {
    fn matches(&self, err: &S3Error) -> bool {
        match self {
            Self::Code(code) => err.code == *code,
            Self::CodeWithMessage { code, message } => {
                err.code == *code && err.message.contains(message)
            }
        }
    }
}

/// Retry ceiling, backoff shape, and the retryable error set of one call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total time budget, measured from the first attempt.
    pub max_wait: Duration,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for a single backoff delay.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    retryable: Vec<RetryCondition>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_wait: Duration::ZERO,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retryable: Vec::new(),
        }
    }
}

impl RetryPolicy {
    /// A policy retrying for at most `max_wait`.
    #[must_use]
    pub fn new(max_wait: Duration) -> Self {
        Self {
            max_wait,
            ..Self::default()
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn once() -> Self {
        Self::default()
    }

    /// Override the backoff delays.
    #[must_use]
    pub fn with_delays(mut self, initial_delay: Duration, max_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self.max_delay = max_delay;
        self
    }

    /// Retry on any error with this code.
    #[must_use]
    pub fn retry_on(mut self, code: S3ErrorCode) -> Self {
        self.retryable.push(RetryCondition::Code(code));
        self
    }

    /// Retry on errors with this code whose message contains `message`.
    #[must_use]
    pub fn retry_on_message(mut self, code: S3ErrorCode, message: &'static str) -> Self {
        self.retryable
            .push(RetryCondition::CodeWithMessage { code, message });
        self
    }

    /// Whether `err` is transient under this policy.
    #[must_use]
    pub fn is_retryable(&self, err: &S3Error) -> bool {
        self.retryable.iter().any(|c| c.matches(err))
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(
            (delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay.as_secs_f64()),
        )
    }
}

/// Why a retried operation gave up.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    /// The cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,

    /// A retryable error persisted until the ceiling.
    #[error("still failing after {attempts} attempts over {elapsed:?}: {source}")]
    TimedOut {
        /// Time spent.
        elapsed: Duration,
        /// Number of attempts made.
        attempts: u32,
        /// Last error.
        #[source]
        source: S3Error,
    },

    /// A non-retryable error.
    #[error(transparent)]
    Failed(S3Error),
}

/// Execute an async operation under a [`RetryPolicy`].
///
/// # Arguments
/// * `policy` - Retry ceiling and retryable errors
/// * `cancel` - Checked before each attempt and during each backoff
/// * `operation_name` - Name for logging purposes
/// * `operation` - The async operation to retry
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, S3Error>>,
{
    let started = Instant::now();
    let mut attempt = 0u32;
    let mut delay = policy.initial_delay;

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }
        attempt += 1;

        let err = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !policy.is_retryable(&e) => return Err(RetryError::Failed(e)),
            Err(e) => e,
        };

        let elapsed = started.elapsed();
        let remaining = policy.max_wait.saturating_sub(elapsed);
        if remaining.is_zero() {
            if !policy.max_wait.is_zero() {
                error!(
                    operation = %operation_name,
                    attempt,
                    error = %err,
                    "operation failed after retry ceiling"
                );
            }
            return Err(RetryError::TimedOut {
                elapsed,
                attempts: attempt,
                source: err,
            });
        }

        let wait = delay.min(remaining);
        warn!(
            operation = %operation_name,
            attempt,
            error = %err,
            delay_ms = wait.as_millis(),
            "operation failed, retrying"
        );

        tokio::select! {
            () = cancel.cancelled() => return Err(RetryError::Cancelled),
            () = tokio::time::sleep(wait) => {}
        }

        delay = policy.next_delay(delay);
    }
}
