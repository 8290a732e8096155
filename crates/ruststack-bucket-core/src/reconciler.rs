//! Read-back reconciler.
//!
//! Rebuilds an [`ObservedBucketState`] from one read per facet. Each read
//! tolerates the facet's absent code and the partition-unsupported class
//! (`MethodNotAllowed`, `NotImplemented`, `XNotImplemented`,
//! `UnsupportedArgument`), both of which leave the observed facet `None`.
//!
//! A bucket that vanishes during the read (`NoSuchBucket`) is reported as
//! gone (`Ok(None)`) unless it was just created, in which case the reads
//! retry for the read timeout before giving up with a not-found error.

use std::future::Future;

use ruststack_bucket_model::{
    BucketFacets, BucketOperation, ObservedBucketState, S3Error, S3ErrorCode,
};
use ruststack_core::AwsRegion;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::BucketApi;
use crate::codec::access::{flatten_grants, infer_canned_acl};
use crate::codec::cors::flatten_cors;
use crate::codec::encryption::flatten_encryption;
use crate::codec::lifecycle::flatten_lifecycle;
use crate::codec::logging::flatten_logging;
use crate::codec::object_lock::flatten_object_lock;
use crate::codec::policy::flatten_policy;
use crate::codec::replication::flatten_replication;
use crate::codec::settings::{
    flatten_acceleration, flatten_request_payer, flatten_versioning,
};
use crate::codec::tags::flatten_tagging;
use crate::codec::website::flatten_website;
use crate::config::BucketManagerConfig;
use crate::endpoint::derive_attributes;
use crate::error::{BucketError, BucketResult};
use crate::facet::Facet;
use crate::retry::{RetryError, RetryPolicy, retry_with_backoff};

/// Reads the full observed state of one bucket.
#[derive(Debug)]
pub struct ReadBackReconciler<'a> {
    api: &'a dyn BucketApi,
    config: &'a BucketManagerConfig,
    cancel: &'a CancellationToken,
    bucket: &'a str,
    is_new: bool,
}

impl<'a> ReadBackReconciler<'a> {
    /// Create a reconciler. `is_new` marks a bucket created in this pass,
    /// which may not be visible to every read yet.
    #[must_use]
    pub fn new(
        api: &'a dyn BucketApi,
        config: &'a BucketManagerConfig,
        cancel: &'a CancellationToken,
        bucket: &'a str,
        is_new: bool,
    ) -> Self {
        Self {
            api,
            config,
            cancel,
            bucket,
            is_new,
        }
    }

    /// Observe every facet of the bucket.
    ///
    /// Returns `Ok(None)` when the bucket no longer exists.
    ///
    /// # Errors
    ///
    /// Returns a [`BucketError`] naming the facet whose read failed.
    pub async fn observe(&self) -> BucketResult<Option<ObservedBucketState>> {
        match self.read_all().await {
            Ok(state) => Ok(Some(state)),
            Err(BucketError::NotFound { facet, .. }) if !self.is_new => {
                warn!(
                    bucket = %self.bucket,
                    facet = %facet,
                    "bucket not found, removing from state"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn read_all(&self) -> BucketResult<ObservedBucketState> {
        let (api, bucket) = (self.api, self.bucket);

        self.read(Facet::Bucket, BucketOperation::HeadBucket, None, || {
            api.head_bucket(bucket)
        })
        .await?;

        let location = self
            .read(Facet::Bucket, BucketOperation::GetBucketLocation, None, || {
                api.get_bucket_location(bucket)
            })
            .await?
            .flatten();
        let region = AwsRegion::new(location.unwrap_or_default());

        let tags = self
            .read(
                Facet::Tags,
                BucketOperation::GetBucketTagging,
                Some(S3ErrorCode::NoSuchTagSet),
                || api.get_bucket_tagging(bucket),
            )
            .await?
            .map(|t| flatten_tagging(&t));

        let policy = self
            .read(
                Facet::Policy,
                BucketOperation::GetBucketPolicy,
                Some(S3ErrorCode::NoSuchBucketPolicy),
                || api.get_bucket_policy(bucket),
            )
            .await?
            .map(|p| flatten_policy(&p));

        let cors_rules = self
            .read(
                Facet::Cors,
                BucketOperation::GetBucketCors,
                Some(S3ErrorCode::NoSuchCORSConfiguration),
                || api.get_bucket_cors(bucket),
            )
            .await?
            .map(|c| flatten_cors(&c));

        let website = self
            .read(
                Facet::Website,
                BucketOperation::GetBucketWebsite,
                Some(S3ErrorCode::NoSuchWebsiteConfiguration),
                || api.get_bucket_website(bucket),
            )
            .await?
            .map(|w| flatten_website(&w));

        let versioning = self
            .read(Facet::Versioning, BucketOperation::GetBucketVersioning, None, || {
                api.get_bucket_versioning(bucket)
            })
            .await?
            .map(|v| flatten_versioning(&v));

        let access = self
            .read(Facet::Grants, BucketOperation::GetBucketAcl, None, || {
                api.get_bucket_acl(bucket)
            })
            .await?;
        let acl = access.as_ref().and_then(infer_canned_acl);
        let grants = access.as_ref().map(flatten_grants);

        let logging = self
            .read(Facet::Logging, BucketOperation::GetBucketLogging, None, || {
                api.get_bucket_logging(bucket)
            })
            .await?
            .and_then(|l| flatten_logging(&l));

        let lifecycle_rules = self
            .read(
                Facet::Lifecycle,
                BucketOperation::GetBucketLifecycleConfiguration,
                Some(S3ErrorCode::NoSuchLifecycleConfiguration),
                || api.get_bucket_lifecycle_configuration(bucket),
            )
            .await?
            .map(|l| flatten_lifecycle(&l));

        let acceleration_status = self
            .read(
                Facet::Acceleration,
                BucketOperation::GetBucketAccelerateConfiguration,
                None,
                || api.get_bucket_accelerate_configuration(bucket),
            )
            .await?
            .and_then(|a| flatten_acceleration(&a));

        let request_payer = self
            .read(
                Facet::RequestPayer,
                BucketOperation::GetBucketRequestPayment,
                None,
                || api.get_bucket_request_payment(bucket),
            )
            .await?
            .map(|p| flatten_request_payer(&p));

        let replication = self
            .read(
                Facet::Replication,
                BucketOperation::GetBucketReplication,
                Some(S3ErrorCode::ReplicationConfigurationNotFoundError),
                || api.get_bucket_replication(bucket),
            )
            .await?
            .map(|r| flatten_replication(&r));

        let server_side_encryption = self
            .read(
                Facet::ServerSideEncryption,
                BucketOperation::GetBucketEncryption,
                Some(S3ErrorCode::ServerSideEncryptionConfigurationNotFoundError),
                || api.get_bucket_encryption(bucket),
            )
            .await?
            .map(|e| flatten_encryption(&e));

        let object_lock = self.read_object_lock(&region).await?;

        let attributes = derive_attributes(bucket, &region, website.is_some());
        debug!(bucket = %bucket, region = %region, "bucket observed");

        Ok(ObservedBucketState {
            bucket: bucket.to_owned(),
            attributes,
            facets: BucketFacets {
                acl,
                grants,
                cors_rules,
                lifecycle_rules,
                logging,
                object_lock,
                policy,
                replication,
                request_payer,
                acceleration_status,
                server_side_encryption,
                versioning,
                website,
                tags,
            },
        })
    }

    /// Object lock is not offered in every partition; outside the standard
    /// ones a failed read is logged and ignored.
    async fn read_object_lock(
        &self,
        region: &AwsRegion,
    ) -> BucketResult<Option<ruststack_bucket_model::resource::ObjectLockConfig>> {
        let (api, bucket) = (self.api, self.bucket);
        let result = self
            .read(
                Facet::ObjectLock,
                BucketOperation::GetObjectLockConfiguration,
                Some(S3ErrorCode::ObjectLockConfigurationNotFoundError),
                || api.get_object_lock_configuration(bucket),
            )
            .await;

        match result {
            Ok(config) => Ok(config.map(|c| flatten_object_lock(&c))),
            Err(err @ BucketError::NotFound { .. }) => Err(err),
            Err(err) if !region.partition().is_standard() => {
                warn!(
                    bucket = %bucket,
                    partition = %region.partition(),
                    error = %err,
                    "ignoring object lock read error"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn policy(&self) -> RetryPolicy {
        if self.is_new {
            self.config
                .retry_policy(self.config.read_timeout())
                .retry_on(S3ErrorCode::NoSuchBucket)
        } else {
            RetryPolicy::once()
        }
    }

    /// One facet read. `Ok(None)` means absent or unsupported.
    async fn read<T, F, Fut>(
        &self,
        facet: Facet,
        operation: BucketOperation,
        absent: Option<S3ErrorCode>,
        request: F,
    ) -> BucketResult<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, S3Error>>,
    {
        let bucket = self.bucket;
        match retry_with_backoff(&self.policy(), self.cancel, operation.as_str(), request).await {
            Ok(value) => Ok(Some(value)),
            Err(RetryError::Failed(e)) if absent.is_some_and(|code| e.is(code)) => Ok(None),
            Err(RetryError::Failed(e)) if e.code.is_unsupported() => {
                warn!(
                    bucket = %bucket,
                    facet = %facet,
                    operation = %operation,
                    code = %e.code,
                    "facet not supported, leaving it empty"
                );
                Ok(None)
            }
            Err(
                RetryError::Failed(e) | RetryError::TimedOut { source: e, .. },
            ) if e.is(S3ErrorCode::NoSuchBucket) => Err(BucketError::NotFound {
                bucket: bucket.to_owned(),
                facet,
            }),
            Err(err) => Err(BucketError::from_retry(bucket, facet, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ruststack_bucket_model::input::CreateBucketInput;
    use ruststack_bucket_model::types::{
        BucketCannedACL, CreateBucketConfiguration, Payer, Tag, Tagging,
    };

    use super::*;
    use crate::error::ErrorKind;
    use crate::memory::InMemoryBucketApi;

    fn config() -> BucketManagerConfig {
        BucketManagerConfig::builder()
            .read_timeout_secs(1)
            .retry_initial_delay_ms(1)
            .retry_max_delay_ms(5)
            .build()
    }

    async fn api_with_bucket(region: &str) -> InMemoryBucketApi {
        let api = InMemoryBucketApi::with_region(AwsRegion::new(region));
        api.create_bucket(CreateBucketInput {
            bucket: "b1".to_owned(),
            create_bucket_configuration: Some(CreateBucketConfiguration {
                location_constraint: Some(region.to_owned()),
            }),
            ..CreateBucketInput::default()
        })
        .await
        .expect("create");
        api
    }

    #[tokio::test]
    async fn test_should_observe_fresh_bucket() {
        let api = api_with_bucket("us-east-1").await;
        let (config, cancel) = (config(), CancellationToken::new());
        let observed = ReadBackReconciler::new(&api, &config, &cancel, "b1", false)
            .observe()
            .await
            .expect("observe")
            .expect("exists");

        let facets = &observed.facets;
        assert_eq!(facets.acl, Some(BucketCannedACL::Private));
        assert_eq!(facets.grants.as_ref().map(Vec::len), Some(1));
        assert!(facets.policy.is_none());
        assert!(facets.lifecycle_rules.is_none());
        assert!(facets.replication.is_none());
        assert!(facets.logging.is_none());
        assert!(facets.acceleration_status.is_none());
        assert_eq!(facets.request_payer, Some(Payer::BucketOwner));
        assert!(facets.versioning.is_some_and(|v| v.is_default()));
        assert_eq!(observed.attributes.arn, "arn:aws:s3:::b1");
        assert_eq!(observed.attributes.region, "us-east-1");
    }

    #[tokio::test]
    async fn test_should_ignore_system_tags() {
        let api = api_with_bucket("us-east-1").await;
        api.put_bucket_tagging(
            "b1",
            Tagging {
                tag_set: vec![
                    Tag {
                        key: "aws:cloudformation:stack-name".to_owned(),
                        value: "stack".to_owned(),
                    },
                    Tag {
                        key: "env".to_owned(),
                        value: "prod".to_owned(),
                    },
                ],
            },
        )
        .await
        .expect("tagging");

        let (config, cancel) = (config(), CancellationToken::new());
        let observed = ReadBackReconciler::new(&api, &config, &cancel, "b1", false)
            .observe()
            .await
            .expect("observe")
            .expect("exists");
        assert_eq!(
            observed.facets.tags,
            Some(BTreeMap::from([("env".to_owned(), "prod".to_owned())]))
        );
    }

    #[tokio::test]
    async fn test_should_degrade_unsupported_acceleration() {
        let api = api_with_bucket("us-east-1").await;
        api.fail_operation(
            BucketOperation::GetBucketAccelerateConfiguration,
            S3ErrorCode::MethodNotAllowed,
            None,
        );
        let (config, cancel) = (config(), CancellationToken::new());
        let observed = ReadBackReconciler::new(&api, &config, &cancel, "b1", false)
            .observe()
            .await
            .expect("observe succeeds")
            .expect("exists");
        assert!(observed.facets.acceleration_status.is_none());
    }

    #[tokio::test]
    async fn test_should_report_missing_bucket_as_gone() {
        let api = InMemoryBucketApi::new();
        let (config, cancel) = (config(), CancellationToken::new());
        let observed = ReadBackReconciler::new(&api, &config, &cancel, "missing", false)
            .observe()
            .await
            .expect("observe");
        assert!(observed.is_none());
        assert_eq!(api.call_count(BucketOperation::HeadBucket), 1);
    }

    #[tokio::test]
    async fn test_should_treat_bucket_vanishing_mid_read_as_gone() {
        let api = api_with_bucket("us-east-1").await;
        api.fail_operation(BucketOperation::GetBucketCors, S3ErrorCode::NoSuchBucket, None);
        let (config, cancel) = (config(), CancellationToken::new());
        let observed = ReadBackReconciler::new(&api, &config, &cancel, "b1", false)
            .observe()
            .await
            .expect("observe");
        assert!(observed.is_none());
    }

    #[tokio::test]
    async fn test_should_fail_new_bucket_that_never_appears() {
        let api = InMemoryBucketApi::new();
        let config = BucketManagerConfig::builder()
            .read_timeout_secs(0)
            .retry_initial_delay_ms(1)
            .retry_max_delay_ms(5)
            .build();
        let cancel = CancellationToken::new();
        let err = ReadBackReconciler::new(&api, &config, &cancel, "missing", true)
            .observe()
            .await
            .expect_err("not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.facet(), Facet::Bucket);
    }

    #[tokio::test]
    async fn test_should_ignore_object_lock_errors_outside_standard_partitions() {
        let api = api_with_bucket("cn-north-1").await;
        api.fail_operation(
            BucketOperation::GetObjectLockConfiguration,
            S3ErrorCode::AccessDenied,
            None,
        );
        let (config, cancel) = (config(), CancellationToken::new());
        let observed = ReadBackReconciler::new(&api, &config, &cancel, "b1", false)
            .observe()
            .await
            .expect("observe")
            .expect("exists");
        assert!(observed.facets.object_lock.is_none());
        assert_eq!(observed.attributes.arn, "arn:aws-cn:s3:::b1");
    }

    #[tokio::test]
    async fn test_should_propagate_object_lock_errors_in_standard_partition() {
        let api = api_with_bucket("us-west-2").await;
        api.fail_operation(
            BucketOperation::GetObjectLockConfiguration,
            S3ErrorCode::AccessDenied,
            None,
        );
        let (config, cancel) = (config(), CancellationToken::new());
        let err = ReadBackReconciler::new(&api, &config, &cancel, "b1", false)
            .observe()
            .await
            .expect_err("access denied");
        assert_eq!(err.facet(), Facet::ObjectLock);
        assert_eq!(err.kind(), ErrorKind::Terminal);
    }
}
