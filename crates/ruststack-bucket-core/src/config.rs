//! Bucket manager configuration.
//!
//! Provides [`BucketManagerConfig`] with per-operation timeouts and retry
//! backoff. Values are loaded from environment variables with defaults that
//! match the bucket resource's usual operation budgets.

use std::time::Duration;

use ruststack_core::AwsRegion;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::retry::RetryPolicy;

/// Bucket manager configuration.
///
/// # Examples
///
/// ```
/// use ruststack_bucket_core::config::BucketManagerConfig;
///
/// let config = BucketManagerConfig::default();
/// assert_eq!(config.region, "us-east-1");
/// assert_eq!(config.delete_timeout_secs, 3600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BucketManagerConfig {
    /// Region new buckets are created in.
    #[builder(default = String::from("us-east-1"), setter(into))]
    pub region: String,

    /// Ceiling for create retries, in seconds.
    #[builder(default = 1200)]
    pub create_timeout_secs: u64,

    /// Ceiling for read retries on a freshly created bucket, in seconds.
    #[builder(default = 1200)]
    pub read_timeout_secs: u64,

    /// Ceiling for update retries, in seconds.
    #[builder(default = 1200)]
    pub update_timeout_secs: u64,

    /// Ceiling for delete retries, in seconds.
    #[builder(default = 3600)]
    pub delete_timeout_secs: u64,

    /// How long to wait for a deleted bucket to disappear, in seconds.
    #[builder(default = 60)]
    pub propagation_timeout_secs: u64,

    /// First retry backoff, in milliseconds.
    #[builder(default = 500)]
    pub retry_initial_delay_ms: u64,

    /// Maximum retry backoff, in milliseconds.
    #[builder(default = 10_000)]
    pub retry_max_delay_ms: u64,
}

impl Default for BucketManagerConfig {
    fn default() -> Self {
        Self {
            region: String::from("us-east-1"),
            create_timeout_secs: 1200,
            read_timeout_secs: 1200,
            update_timeout_secs: 1200,
            delete_timeout_secs: 3600,
            propagation_timeout_secs: 60,
            retry_initial_delay_ms: 500,
            retry_max_delay_ms: 10_000,
        }
    }
}

impl BucketManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `BUCKET_CREATE_TIMEOUT_SECS` | `1200` |
    /// | `BUCKET_READ_TIMEOUT_SECS` | `1200` |
    /// | `BUCKET_UPDATE_TIMEOUT_SECS` | `1200` |
    /// | `BUCKET_DELETE_TIMEOUT_SECS` | `3600` |
    /// | `BUCKET_PROPAGATION_TIMEOUT_SECS` | `60` |
    /// | `BUCKET_RETRY_INITIAL_DELAY_MS` | `500` |
    /// | `BUCKET_RETRY_MAX_DELAY_MS` | `10000` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.region = v;
        }
        read_u64("BUCKET_CREATE_TIMEOUT_SECS", &mut config.create_timeout_secs);
        read_u64("BUCKET_READ_TIMEOUT_SECS", &mut config.read_timeout_secs);
        read_u64("BUCKET_UPDATE_TIMEOUT_SECS", &mut config.update_timeout_secs);
        read_u64("BUCKET_DELETE_TIMEOUT_SECS", &mut config.delete_timeout_secs);
        read_u64(
            "BUCKET_PROPAGATION_TIMEOUT_SECS",
            &mut config.propagation_timeout_secs,
        );
        read_u64(
            "BUCKET_RETRY_INITIAL_DELAY_MS",
            &mut config.retry_initial_delay_ms,
        );
        read_u64("BUCKET_RETRY_MAX_DELAY_MS", &mut config.retry_max_delay_ms);

        config
    }

    /// The configured region.
    #[must_use]
    pub fn aws_region(&self) -> AwsRegion {
        AwsRegion::new(self.region.clone())
    }

    /// Create timeout.
    #[must_use]
    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    /// Read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Update timeout.
    #[must_use]
    pub fn update_timeout(&self) -> Duration {
        Duration::from_secs(self.update_timeout_secs)
    }

    /// Delete timeout.
    #[must_use]
    pub fn delete_timeout(&self) -> Duration {
        Duration::from_secs(self.delete_timeout_secs)
    }

    /// Propagation timeout.
    #[must_use]
    pub fn propagation_timeout(&self) -> Duration {
        Duration::from_secs(self.propagation_timeout_secs)
    }

    /// A retry policy with this configuration's backoff and the given ceiling.
    #[must_use]
    pub fn retry_policy(&self, max_wait: Duration) -> RetryPolicy {
        RetryPolicy::new(max_wait).with_delays(
            Duration::from_millis(self.retry_initial_delay_ms),
            Duration::from_millis(self.retry_max_delay_ms),
        )
    }
}

/// Overwrite `target` with the parsed value of `key` when it is a valid `u64`.
fn read_u64(key: &str, target: &mut u64) {
    if let Ok(v) = std::env::var(key) {
        if let Ok(n) = v.parse::<u64>() {
            *target = n;
        }
    }
}
