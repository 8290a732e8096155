//! Bucket lifecycle error types.
//!
//! Every [`BucketError`] names the bucket and the [`Facet`] it concerns.
//! [`BucketError::kind`] groups variants into the classes automation cares
//! about: not-found, transient, precondition, unsupported, terminal, and
//! cancelled. Only the transient class is worth retrying.

use std::time::Duration;

use ruststack_bucket_model::S3Error;

use crate::facet::Facet;
use crate::retry::RetryError;

/// Classification of a [`BucketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The bucket or facet does not exist.
    NotFound,
    /// Eventual-consistency or conflict error that outlived its retry budget.
    Transient,
    /// A required precondition does not hold.
    Precondition,
    /// The facet is not available in this partition or backend.
    Unsupported,
    /// User error or a non-retryable API failure.
    Terminal,
    /// The caller cancelled the operation.
    Cancelled,
}

/// Bucket lifecycle error type.
#[derive(Debug, thiserror::Error)]
pub enum BucketError {
    /// The bucket or facet does not exist.
    #[error("{facet} of bucket {bucket} not found")]
    NotFound {
        /// Bucket name.
        bucket: String,
        /// Facet being accessed.
        facet: Facet,
    },

    /// A retryable error persisted past the retry ceiling.
    #[error("timed out after {elapsed:?} applying {facet} to bucket {bucket}: {source}")]
    Timeout {
        /// Bucket name.
        bucket: String,
        /// Facet being applied.
        facet: Facet,
        /// Time spent retrying.
        elapsed: Duration,
        /// Last error returned by the API.
        #[source]
        source: S3Error,
    },

    /// A precondition was violated; the API was not called.
    #[error("precondition failed for {facet} of bucket {bucket}: {reason}")]
    Precondition {
        /// Bucket name.
        bucket: String,
        /// Facet being applied.
        facet: Facet,
        /// The violated precondition.
        reason: String,
    },

    /// The facet is not supported by the backend.
    #[error("{facet} is not supported for bucket {bucket}: {source}")]
    Unsupported {
        /// Bucket name.
        bucket: String,
        /// Facet being applied.
        facet: Facet,
        /// Error returned by the API.
        #[source]
        source: S3Error,
    },

    /// The declared state is invalid.
    #[error("invalid {facet} for bucket {bucket}: {reason}")]
    Validation {
        /// Bucket name.
        bucket: String,
        /// Offending facet.
        facet: Facet,
        /// What is wrong.
        reason: String,
    },

    /// A non-retryable API error.
    #[error("{facet} of bucket {bucket} failed: {source}")]
    Api {
        /// Bucket name.
        bucket: String,
        /// Facet being applied.
        facet: Facet,
        /// Error returned by the API.
        #[source]
        source: S3Error,
    },

    /// The operation was cancelled.
    #[error("{facet} of bucket {bucket} cancelled")]
    Cancelled {
        /// Bucket name.
        bucket: String,
        /// Facet in progress when cancellation was observed.
        facet: Facet,
    },
}

impl BucketError {
    /// Classify an API error returned for a facet write.
    #[must_use]
    pub fn from_api(bucket: &str, facet: Facet, source: S3Error) -> Self {
        if source.code.is_unsupported() {
            Self::Unsupported {
                bucket: bucket.to_owned(),
                facet,
                source,
            }
        } else {
            Self::Api {
                bucket: bucket.to_owned(),
                facet,
                source,
            }
        }
    }

    /// Attach bucket and facet context to a retry outcome.
    #[must_use]
    pub fn from_retry(bucket: &str, facet: Facet, err: RetryError) -> Self {
        match err {
            RetryError::Cancelled => Self::Cancelled {
                bucket: bucket.to_owned(),
                facet,
            },
            RetryError::TimedOut {
                elapsed, source, ..
            } => Self::Timeout {
                bucket: bucket.to_owned(),
                facet,
                elapsed,
                source,
            },
            RetryError::Failed(source) => Self::from_api(bucket, facet, source),
        }
    }

    /// Create a precondition error.
    #[must_use]
    pub fn precondition(bucket: &str, facet: Facet, reason: impl Into<String>) -> Self {
        Self::Precondition {
            bucket: bucket.to_owned(),
            facet,
            reason: reason.into(),
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(bucket: &str, facet: Facet, reason: impl Into<String>) -> Self {
        Self::Validation {
            bucket: bucket.to_owned(),
            facet,
            reason: reason.into(),
        }
    }

    /// The error class.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Timeout { .. } => ErrorKind::Transient,
            Self::Precondition { .. } => ErrorKind::Precondition,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Validation { .. } | Self::Api { .. } => ErrorKind::Terminal,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Whether a later attempt may succeed without any change of input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// The bucket the error concerns.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::NotFound { bucket, .. }
            | Self::Timeout { bucket, .. }
            | Self::Precondition { bucket, .. }
            | Self::Unsupported { bucket, .. }
            | Self::Validation { bucket, .. }
            | Self::Api { bucket, .. }
            | Self::Cancelled { bucket, .. } => bucket,
        }
    }

    /// The facet the error concerns.
    #[must_use]
    pub fn facet(&self) -> Facet {
        match self {
            Self::NotFound { facet, .. }
            | Self::Timeout { facet, .. }
            | Self::Precondition { facet, .. }
            | Self::Unsupported { facet, .. }
            | Self::Validation { facet, .. }
            | Self::Api { facet, .. }
            | Self::Cancelled { facet, .. } => *facet,
        }
    }

    /// The API error, if the failure came from the remote side.
    #[must_use]
    pub fn api_error(&self) -> Option<&S3Error> {
        match self {
            Self::Timeout { source, .. }
            | Self::Unsupported { source, .. }
            | Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience result type for bucket lifecycle operations.
pub type BucketResult<T> = Result<T, BucketError>;

#[cfg(test)]
mod tests {
    use ruststack_bucket_model::s3_error;

    use super::*;

    #[test]
    fn test_should_name_bucket_and_facet() {
        let err = BucketError::precondition(
            "b1",
            Facet::Replication,
            "versioning must be enabled to allow S3 bucket replication",
        );
        let msg = err.to_string();
        assert!(msg.contains("b1"));
        assert!(msg.contains("replication"));
        assert!(msg.contains("versioning must be enabled"));
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_should_classify_unsupported_writes() {
        let err = BucketError::from_api("b1", Facet::Acceleration, s3_error!(MethodNotAllowed));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.facet(), Facet::Acceleration);
        assert_eq!(err.bucket(), "b1");
    }

    #[test]
    fn test_should_classify_bucket_not_empty_as_terminal() {
        let err = BucketError::from_api("b1", Facet::Bucket, s3_error!(BucketNotEmpty));
        assert_eq!(err.kind(), ErrorKind::Terminal);
        assert!(!err.is_retryable());
        assert!(err.api_error().is_some());
    }

    #[test]
    fn test_should_map_retry_outcomes() {
        let timeout = BucketError::from_retry(
            "b1",
            Facet::Policy,
            RetryError::TimedOut {
                elapsed: Duration::from_secs(3),
                attempts: 4,
                source: s3_error!(NoSuchBucket),
            },
        );
        assert_eq!(timeout.kind(), ErrorKind::Transient);
        assert!(timeout.is_retryable());

        let cancelled = BucketError::from_retry("b1", Facet::Policy, RetryError::Cancelled);
        assert_eq!(cancelled.kind(), ErrorKind::Cancelled);
    }
}
