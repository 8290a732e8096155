//! End-to-end tests for the RustStack bucket lifecycle manager.
//!
//! Every test drives a [`BucketManager`] against its own
//! [`InMemoryBucketApi`], so no server or credentials are needed:
//!
//! ```text
//! cargo test -p ruststack-integration
//! ```
//!
//! Set `RUST_LOG=debug` to see the manager's tracing output.

use std::sync::{Arc, Once};

use ruststack_bucket_core::{BucketManager, BucketManagerConfig, InMemoryBucketApi};
use ruststack_bucket_model::{BucketFacets, DesiredBucketState};
use ruststack_core::AwsRegion;
use tokio_util::sync::CancellationToken;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration with short timeouts and millisecond backoff.
#[must_use]
pub fn fast_config(region: &str) -> BucketManagerConfig {
    BucketManagerConfig::builder()
        .region(region)
        .create_timeout_secs(2)
        .read_timeout_secs(2)
        .update_timeout_secs(2)
        .delete_timeout_secs(2)
        .propagation_timeout_secs(2)
        .retry_initial_delay_ms(1)
        .retry_max_delay_ms(10)
        .build()
}

/// A manager over a fresh in-memory backend in `us-east-1`.
#[must_use]
pub fn test_manager() -> (Arc<InMemoryBucketApi>, BucketManager) {
    test_manager_in(AwsRegion::DEFAULT)
}

/// A manager over a fresh in-memory backend whose endpoint lives in `region`.
#[must_use]
pub fn test_manager_in(region: &str) -> (Arc<InMemoryBucketApi>, BucketManager) {
    init_tracing();
    let api = Arc::new(InMemoryBucketApi::with_region(AwsRegion::new(region)));
    let manager = BucketManager::new(api.clone(), fast_config(region));
    (api, manager)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Declared state for `bucket` with `facets`.
#[must_use]
pub fn desired(bucket: &str, facets: BucketFacets) -> DesiredBucketState {
    DesiredBucketState::builder()
        .bucket(bucket)
        .facets(facets)
        .build()
}

/// Create a bucket with `facets` and return its name, clearing the recorded
/// calls afterwards.
pub async fn create_test_bucket(
    api: &InMemoryBucketApi,
    manager: &BucketManager,
    prefix: &str,
    facets: BucketFacets,
) -> String {
    let name = test_bucket_name(prefix);
    manager
        .create(&desired(&name, facets), &CancellationToken::new())
        .await
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    tracing::debug!(bucket = %name, "test bucket created");
    api.clear_calls();
    name
}

mod test_consistency;
mod test_delete;
mod test_lifecycle;
mod test_preconditions;
