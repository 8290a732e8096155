//! Convergence orchestrator.
//!
//! Applies a [`FacetChangeSet`] through a [`FacetUpdater`] in the fixed
//! [`Facet::APPLY_ORDER`]: tags, policy, CORS, website, versioning, ACL,
//! grants, logging, lifecycle, acceleration, request payer, replication,
//! server-side encryption, object lock. Versioning lands before
//! replication, and object lock goes last.
//!
//! The first failure stops the pass. Facets applied before it stay applied;
//! the next pass observes them as converged and only retries the rest.

use ruststack_bucket_model::BucketFacets;
use tracing::{debug, info, warn};

use crate::error::BucketResult;
use crate::facet::{Facet, FacetChangeSet};
use crate::updater::FacetUpdater;

/// Apply every facet in `changes`, in apply order, stopping at the first error.
///
/// # Errors
///
/// Returns the error of the first facet that failed.
pub async fn reconcile(
    updater: &FacetUpdater<'_>,
    changes: &FacetChangeSet,
    desired: &BucketFacets,
) -> BucketResult<()> {
    if changes.is_empty() {
        debug!(bucket = %updater.bucket(), "nothing to converge");
        return Ok(());
    }
    info!(bucket = %updater.bucket(), changes = %changes, "converging facets");

    for facet in Facet::APPLY_ORDER {
        if !changes.contains(facet) {
            continue;
        }
        if let Err(err) = updater.apply(facet, desired).await {
            warn!(
                bucket = %updater.bucket(),
                facet = %facet,
                error = %err,
                "convergence stopped"
            );
            return Err(err);
        }
        debug!(bucket = %updater.bucket(), facet = %facet, "facet applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use ruststack_bucket_model::input::CreateBucketInput;
    use ruststack_bucket_model::resource::{
        LifecycleExpirationConfig, LifecycleRuleConfig, VersioningConfig,
    };
    use ruststack_bucket_model::types::Payer;
    use ruststack_bucket_model::{BucketOperation, S3ErrorCode};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::api::BucketApi;
    use crate::config::BucketManagerConfig;
    use crate::diff::plan;
    use crate::error::ErrorKind;
    use crate::memory::InMemoryBucketApi;

    async fn api_with_bucket() -> InMemoryBucketApi {
        let api = InMemoryBucketApi::new();
        api.create_bucket(CreateBucketInput {
            bucket: "b1".to_owned(),
            ..CreateBucketInput::default()
        })
        .await
        .expect("create");
        api.clear_calls();
        api
    }

    fn desired() -> BucketFacets {
        BucketFacets::builder()
            .lifecycle_rules(vec![
                LifecycleRuleConfig::builder()
                    .id("expire-logs")
                    .prefix("logs/")
                    .expiration(LifecycleExpirationConfig::after_days(30))
                    .build(),
            ])
            .request_payer(Payer::Requester)
            .versioning(VersioningConfig::enabled())
            .tags(BTreeMap::from([("env".to_owned(), "test".to_owned())]))
            .build()
    }

    #[tokio::test]
    async fn test_should_apply_facets_in_order() {
        let api = api_with_bucket().await;
        let (config, cancel, prior) = (
            BucketManagerConfig::default(),
            CancellationToken::new(),
            BucketFacets::default(),
        );
        let timeout = Duration::from_secs(1);
        let updater = FacetUpdater::new(&api, &config, &cancel, "b1", timeout, &prior);

        let desired = desired();
        let changes = plan(&desired, &prior);
        reconcile(&updater, &changes, &desired).await.expect("reconcile");

        let order: Vec<BucketOperation> = api.write_calls().iter().map(|c| c.operation).collect();
        assert_eq!(
            order,
            vec![
                BucketOperation::PutBucketTagging,
                BucketOperation::PutBucketVersioning,
                BucketOperation::PutBucketLifecycleConfiguration,
                BucketOperation::PutBucketRequestPayment,
            ]
        );
    }

    #[tokio::test]
    async fn test_should_stop_at_first_failure() {
        let api = api_with_bucket().await;
        api.fail_operation(
            BucketOperation::PutBucketLifecycleConfiguration,
            S3ErrorCode::AccessDenied,
            None,
        );
        let (config, cancel, prior) = (
            BucketManagerConfig::default(),
            CancellationToken::new(),
            BucketFacets::default(),
        );
        let timeout = Duration::from_secs(1);
        let updater = FacetUpdater::new(&api, &config, &cancel, "b1", timeout, &prior);

        let desired = desired();
        let err = reconcile(&updater, &plan(&desired, &prior), &desired)
            .await
            .expect_err("lifecycle fails");

        assert_eq!(err.facet(), Facet::Lifecycle);
        assert_eq!(err.kind(), ErrorKind::Terminal);
        assert_eq!(api.call_count(BucketOperation::PutBucketVersioning), 1);
        assert_eq!(api.call_count(BucketOperation::PutBucketRequestPayment), 0);

        // Versioning stays applied.
        let versioning = api.get_bucket_versioning("b1").await.expect("versioning");
        assert_eq!(
            versioning.status,
            Some(ruststack_bucket_model::types::BucketVersioningStatus::Enabled)
        );
    }

    #[tokio::test]
    async fn test_should_do_nothing_for_empty_change_set() {
        let api = api_with_bucket().await;
        let (config, cancel, prior) = (
            BucketManagerConfig::default(),
            CancellationToken::new(),
            BucketFacets::default(),
        );
        let timeout = Duration::from_secs(1);
        let updater = FacetUpdater::new(&api, &config, &cancel, "b1", timeout, &prior);

        reconcile(&updater, &FacetChangeSet::new(), &desired())
            .await
            .expect("reconcile");
        assert!(api.calls().is_empty());
    }
}
