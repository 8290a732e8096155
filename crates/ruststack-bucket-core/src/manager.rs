//! Bucket lifecycle manager.
//!
//! [`BucketManager`] exposes the CRUD contract a declarative resource
//! framework drives: `create`, `read`, `update`, and `delete`. It validates
//! desired state, computes the facet diff, runs the orchestrator, and reads
//! the result back. Nothing is persisted here.
//!
//! Concurrent operations on the same bucket must be serialized by the caller.

use std::sync::Arc;

use ruststack_bucket_model::input::{CreateBucketInput, DeleteObjectsInput};
use ruststack_bucket_model::types::CreateBucketConfiguration;
use ruststack_bucket_model::{DesiredBucketState, ObservedBucketState, S3Error, S3ErrorCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::BucketApi;
use crate::config::BucketManagerConfig;
use crate::diff::{fresh_facets, plan, plan_create};
use crate::error::{BucketError, BucketResult};
use crate::facet::Facet;
use crate::orchestrator::reconcile;
use crate::reconciler::ReadBackReconciler;
use crate::retry::{RetryError, retry_with_backoff};
use crate::updater::FacetUpdater;
use crate::validation::validate_desired;

/// Maximum number of objects removed by one DeleteObjects call.
pub const DELETE_OBJECTS_BATCH: usize = 1000;

/// Code used while waiting for a deleted bucket to disappear.
const BUCKET_STILL_EXISTS: S3ErrorCode = S3ErrorCode::Custom("BucketStillExists");

/// Convergent CRUD over one bucket control plane.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use ruststack_bucket_core::{BucketManager, BucketManagerConfig, InMemoryBucketApi};
/// use ruststack_bucket_model::resource::VersioningConfig;
/// use ruststack_bucket_model::{BucketFacets, DesiredBucketState};
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let manager = BucketManager::new(
///     Arc::new(InMemoryBucketApi::new()),
///     BucketManagerConfig::default(),
/// );
/// let desired = DesiredBucketState::builder()
///     .bucket("my-bucket")
///     .facets(
///         BucketFacets::builder()
///             .versioning(VersioningConfig::enabled())
///             .build(),
///     )
///     .build();
/// let cancel = CancellationToken::new();
///
/// let id = manager.create(&desired, &cancel).await.unwrap();
/// let observed = manager.read(&id, &cancel).await.unwrap().unwrap();
/// assert_eq!(observed.facets.versioning, Some(VersioningConfig::enabled()));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct BucketManager {
    api: Arc<dyn BucketApi>,
    config: BucketManagerConfig,
}

impl BucketManager {
    /// Create a manager over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn BucketApi>, config: BucketManagerConfig) -> Self {
        Self { api, config }
    }

    /// The manager configuration.
    #[must_use]
    pub fn config(&self) -> &BucketManagerConfig {
        &self.config
    }

    /// Create the bucket and apply every declared facet.
    ///
    /// Returns the bucket name, which is the resource id.
    ///
    /// # Errors
    ///
    /// Fails on invalid desired state, when CreateBucket fails, when the
    /// bucket never becomes visible, or when a facet cannot be applied.
    pub async fn create(
        &self,
        desired: &DesiredBucketState,
        cancel: &CancellationToken,
    ) -> BucketResult<String> {
        validate_desired(desired)?;
        let bucket = desired.bucket.as_str();
        let facets = &desired.facets;
        let region = self.config.aws_region();
        let timeout = self.config.create_timeout();

        let input = CreateBucketInput {
            bucket: bucket.to_owned(),
            acl: Some(facets.acl.unwrap_or_default()),
            create_bucket_configuration: (!region.is_default()).then(|| {
                CreateBucketConfiguration {
                    location_constraint: Some(region.as_str().to_owned()),
                }
            }),
            object_lock_enabled_for_bucket: facets
                .object_lock
                .as_ref()
                .filter(|o| o.enabled)
                .map(|_| true),
        };
        info!(bucket = %bucket, region = %region, "creating bucket");

        let api = self.api.as_ref();
        let policy = self
            .config
            .retry_policy(timeout)
            .retry_on(S3ErrorCode::OperationAborted);
        retry_with_backoff(&policy, cancel, "CreateBucket", || {
            api.create_bucket(input.clone())
        })
        .await
        .map_err(|e| BucketError::from_retry(bucket, Facet::Bucket, e))?;

        let visible = self
            .config
            .retry_policy(timeout)
            .retry_on(S3ErrorCode::NoSuchBucket);
        retry_with_backoff(&visible, cancel, "HeadBucket", || api.head_bucket(bucket))
            .await
            .map_err(|e| BucketError::from_retry(bucket, Facet::Bucket, e))?;

        let prior = fresh_facets(facets);
        let changes = plan_create(facets);
        let updater = FacetUpdater::new(api, &self.config, cancel, bucket, timeout, &prior);
        reconcile(&updater, &changes, facets).await?;

        info!(bucket = %bucket, "bucket created");
        Ok(bucket.to_owned())
    }

    /// Read the observed state. `None` means the bucket is gone.
    ///
    /// # Errors
    ///
    /// Fails when a facet read fails with anything other than its absent or
    /// unsupported code.
    pub async fn read(
        &self,
        bucket: &str,
        cancel: &CancellationToken,
    ) -> BucketResult<Option<ObservedBucketState>> {
        self.observe(bucket, cancel, false).await
    }

    /// Read a bucket created earlier in the same pass. `NoSuchBucket` is
    /// retried for the read timeout instead of meaning gone.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the bucket never becomes visible.
    pub async fn read_new(
        &self,
        bucket: &str,
        cancel: &CancellationToken,
    ) -> BucketResult<ObservedBucketState> {
        self.observe(bucket, cancel, true)
            .await?
            .ok_or_else(|| not_found(bucket))
    }

    /// Converge an existing bucket to `desired` and return what it looks
    /// like afterwards.
    ///
    /// # Errors
    ///
    /// Fails on invalid desired state, when the bucket does not exist, or
    /// when a facet cannot be applied. Facets applied before the failure stay
    /// applied.
    pub async fn update(
        &self,
        bucket: &str,
        desired: &DesiredBucketState,
        cancel: &CancellationToken,
    ) -> BucketResult<ObservedBucketState> {
        if desired.bucket != bucket {
            return Err(BucketError::validation(
                bucket,
                Facet::Bucket,
                format!("bucket name cannot change to {}", desired.bucket),
            ));
        }
        validate_desired(desired)?;

        let observed = self
            .observe(bucket, cancel, false)
            .await?
            .ok_or_else(|| not_found(bucket))?;
        let changes = plan(&desired.facets, &observed.facets);
        if changes.is_empty() {
            debug!(bucket = %bucket, "bucket already converged");
            return Ok(observed);
        }

        let updater = FacetUpdater::new(
            self.api.as_ref(),
            &self.config,
            cancel,
            bucket,
            self.config.update_timeout(),
            &observed.facets,
        );
        reconcile(&updater, &changes, &desired.facets).await?;
        info!(bucket = %bucket, changes = %changes, "bucket updated");

        self.observe(bucket, cancel, false)
            .await?
            .ok_or_else(|| not_found(bucket))
    }

    /// Delete the bucket. With `force_empty`, every object version and delete
    /// marker is removed first.
    ///
    /// # Errors
    ///
    /// Fails with a terminal error when the bucket is not empty and
    /// `force_empty` is off, and with a timeout when the bucket does not
    /// disappear in time.
    pub async fn delete(
        &self,
        bucket: &str,
        force_empty: bool,
        cancel: &CancellationToken,
    ) -> BucketResult<()> {
        let mut policy = self.config.retry_policy(self.config.delete_timeout());
        if force_empty {
            policy = policy.retry_on(S3ErrorCode::BucketNotEmpty);
        }
        info!(bucket = %bucket, force_empty, "deleting bucket");

        // Each `BucketNotEmpty` empties the bucket again before the next attempt.
        let result = retry_with_backoff(&policy, cancel, "DeleteBucket", || async move {
            match self.api.delete_bucket(bucket).await {
                Err(e) if force_empty && e.is(S3ErrorCode::BucketNotEmpty) => {
                    self.empty_bucket(bucket).await?;
                    Err(e)
                }
                other => other,
            }
        })
        .await;
        match result {
            Ok(()) => {}
            Err(RetryError::Failed(e)) if e.is(S3ErrorCode::NoSuchBucket) => {
                info!(bucket = %bucket, "bucket already gone");
                return Ok(());
            }
            Err(err) => return Err(BucketError::from_retry(bucket, Facet::Bucket, err)),
        }

        self.wait_for_deletion(bucket, cancel).await?;
        info!(bucket = %bucket, "bucket deleted");
        Ok(())
    }

    async fn observe(
        &self,
        bucket: &str,
        cancel: &CancellationToken,
        is_new: bool,
    ) -> BucketResult<Option<ObservedBucketState>> {
        ReadBackReconciler::new(self.api.as_ref(), &self.config, cancel, bucket, is_new)
            .observe()
            .await
    }

    /// Remove every listed object version and delete marker, bypassing
    /// governance retention.
    async fn empty_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        let versions = self.api.list_object_versions(bucket).await?;
        warn!(bucket = %bucket, count = versions.len(), "emptying bucket before delete");

        let mut deleted = 0;
        for batch in versions.chunks(DELETE_OBJECTS_BATCH) {
            let input = DeleteObjectsInput {
                bucket: bucket.to_owned(),
                objects: batch.to_vec(),
                bypass_governance_retention: true,
            };
            deleted += self.api.delete_objects(input).await?.len();
        }
        debug!(bucket = %bucket, deleted, "bucket emptied");
        Ok(())
    }

    /// Wait until HeadBucket reports `NoSuchBucket`.
    async fn wait_for_deletion(
        &self,
        bucket: &str,
        cancel: &CancellationToken,
    ) -> BucketResult<()> {
        let api = self.api.as_ref();
        let policy = self
            .config
            .retry_policy(self.config.propagation_timeout())
            .retry_on(BUCKET_STILL_EXISTS);

        retry_with_backoff(&policy, cancel, "HeadBucket", || async move {
            match api.head_bucket(bucket).await {
                Ok(()) => Err(S3Error::with_message(
                    BUCKET_STILL_EXISTS,
                    "bucket is still visible after deletion",
                )),
                Err(e) if e.is(S3ErrorCode::NoSuchBucket) => Ok(()),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(|e| BucketError::from_retry(bucket, Facet::Bucket, e))
    }
}

fn not_found(bucket: &str) -> BucketError {
    BucketError::NotFound {
        bucket: bucket.to_owned(),
        facet: Facet::Bucket,
    }
}
