//! Facet updater.
//!
//! One idempotent apply per facet. A declared-empty facet is removed with
//! its DELETE call (tolerating the facet's absent code), anything else is
//! expanded and PUT. Every call runs under a [`RetryPolicy`] that retries
//! `NoSuchBucket` plus the transient codes specific to that facet.

use std::future::Future;
use std::time::Duration;

use ruststack_bucket_model::input::PutBucketAclInput;
use ruststack_bucket_model::types::BucketCannedACL;
use ruststack_bucket_model::{BucketFacets, BucketOperation, S3Error, S3ErrorCode};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::BucketApi;
use crate::codec::access::expand_grants;
use crate::codec::cors::expand_cors;
use crate::codec::encryption::expand_encryption;
use crate::codec::lifecycle::expand_lifecycle;
use crate::codec::logging::expand_logging;
use crate::codec::object_lock::expand_object_lock;
use crate::codec::policy::expand_policy;
use crate::codec::replication::expand_replication;
use crate::codec::settings::{expand_acceleration, expand_request_payer, expand_versioning};
use crate::codec::tags::expand_tagging;
use crate::codec::website::expand_website;
use crate::config::BucketManagerConfig;
use crate::error::{BucketError, BucketResult};
use crate::facet::Facet;
use crate::retry::{RetryPolicy, retry_with_backoff};

/// Message of the precondition error raised for replication without versioning.
pub const REPLICATION_REQUIRES_VERSIONING: &str =
    "versioning must be enabled to allow S3 bucket replication";

/// Applies single facets of one bucket.
///
/// `prior` is the state the bucket is known to be in before this pass: the
/// observed facets on update, the facets CreateBucket leaves behind on create.
#[derive(Debug)]
pub struct FacetUpdater<'a> {
    api: &'a dyn BucketApi,
    config: &'a BucketManagerConfig,
    cancel: &'a CancellationToken,
    bucket: &'a str,
    timeout: Duration,
    prior: &'a BucketFacets,
}

impl<'a> FacetUpdater<'a> {
    /// Create an updater whose calls retry for at most `timeout`.
    #[must_use]
    pub fn new(
        api: &'a dyn BucketApi,
        config: &'a BucketManagerConfig,
        cancel: &'a CancellationToken,
        bucket: &'a str,
        timeout: Duration,
        prior: &'a BucketFacets,
    ) -> Self {
        Self {
            api,
            config,
            cancel,
            bucket,
            timeout,
            prior,
        }
    }

    /// Bucket this updater writes to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.bucket
    }

    /// Converge `facet` to its value in `desired`.
    ///
    /// An unmanaged facet (`None`) is left alone.
    ///
    /// # Errors
    ///
    /// Returns a [`BucketError`] naming the facet when the remote call fails,
    /// times out, is cancelled, or a precondition does not hold.
    #[allow(clippy::too_many_lines)]
    pub async fn apply(&self, facet: Facet, desired: &BucketFacets) -> BucketResult<()> {
        let bucket = self.bucket;
        let api = self.api;
        match facet {
            Facet::Tags => {
                let Some(tags) = &desired.tags else {
                    return Ok(());
                };
                if tags.is_empty() {
                    self.delete(
                        facet,
                        BucketOperation::DeleteBucketTagging,
                        S3ErrorCode::NoSuchTagSet,
                        || api.delete_bucket_tagging(bucket),
                    )
                    .await
                } else {
                    let tagging = expand_tagging(tags);
                    self.call(facet, BucketOperation::PutBucketTagging, self.policy(), || {
                        api.put_bucket_tagging(bucket, tagging.clone())
                    })
                    .await
                }
            }
            Facet::Policy => {
                let Some(policy) = &desired.policy else {
                    return Ok(());
                };
                if policy.trim().is_empty() {
                    return self
                        .delete(
                            facet,
                            BucketOperation::DeleteBucketPolicy,
                            S3ErrorCode::NoSuchBucketPolicy,
                            || api.delete_bucket_policy(bucket),
                        )
                        .await;
                }
                let document = expand_policy(policy).map_err(|e| {
                    BucketError::validation(bucket, facet, format!("policy is not valid JSON: {e}"))
                })?;
                let retry = self.policy().retry_on(S3ErrorCode::MalformedPolicy);
                self.call(facet, BucketOperation::PutBucketPolicy, retry, || {
                    api.put_bucket_policy(bucket, document.clone())
                })
                .await
            }
            Facet::Cors => {
                let Some(rules) = &desired.cors_rules else {
                    return Ok(());
                };
                if rules.is_empty() {
                    self.delete(
                        facet,
                        BucketOperation::DeleteBucketCors,
                        S3ErrorCode::NoSuchCORSConfiguration,
                        || api.delete_bucket_cors(bucket),
                    )
                    .await
                } else {
                    let cors = expand_cors(rules);
                    self.call(facet, BucketOperation::PutBucketCors, self.policy(), || {
                        api.put_bucket_cors(bucket, cors.clone())
                    })
                    .await
                }
            }
            Facet::Website => {
                let Some(website) = &desired.website else {
                    return Ok(());
                };
                if website.is_empty() {
                    self.delete(
                        facet,
                        BucketOperation::DeleteBucketWebsite,
                        S3ErrorCode::NoSuchWebsiteConfiguration,
                        || api.delete_bucket_website(bucket),
                    )
                    .await
                } else {
                    let website = expand_website(website);
                    self.call(facet, BucketOperation::PutBucketWebsite, self.policy(), || {
                        api.put_bucket_website(bucket, website.clone())
                    })
                    .await
                }
            }
            Facet::Versioning => {
                let Some(versioning) = desired.versioning else {
                    return Ok(());
                };
                let versioning = expand_versioning(versioning);
                self.call(facet, BucketOperation::PutBucketVersioning, self.policy(), || {
                    api.put_bucket_versioning(bucket, versioning.clone())
                })
                .await
            }
            Facet::Acl => {
                let Some(acl) = desired.acl else {
                    return Ok(());
                };
                self.put_canned_acl(facet, acl).await
            }
            Facet::Grants => self.apply_grants(desired).await,
            Facet::Logging => {
                let Some(logging) = &desired.logging else {
                    return Ok(());
                };
                let status = expand_logging(logging);
                self.call(facet, BucketOperation::PutBucketLogging, self.policy(), || {
                    api.put_bucket_logging(bucket, status.clone())
                })
                .await
            }
            Facet::Lifecycle => {
                let Some(rules) = &desired.lifecycle_rules else {
                    return Ok(());
                };
                if rules.is_empty() {
                    self.delete(
                        facet,
                        BucketOperation::DeleteBucketLifecycle,
                        S3ErrorCode::NoSuchLifecycleConfiguration,
                        || api.delete_bucket_lifecycle(bucket),
                    )
                    .await
                } else {
                    let lifecycle = expand_lifecycle(rules);
                    self.call(
                        facet,
                        BucketOperation::PutBucketLifecycleConfiguration,
                        self.policy(),
                        || api.put_bucket_lifecycle_configuration(bucket, lifecycle.clone()),
                    )
                    .await
                }
            }
            Facet::Acceleration => {
                let Some(status) = desired.acceleration_status else {
                    return Ok(());
                };
                let accelerate = expand_acceleration(status);
                self.call(
                    facet,
                    BucketOperation::PutBucketAccelerateConfiguration,
                    self.policy(),
                    || api.put_bucket_accelerate_configuration(bucket, accelerate.clone()),
                )
                .await
            }
            Facet::RequestPayer => {
                let Some(payer) = desired.request_payer else {
                    return Ok(());
                };
                let payment = expand_request_payer(payer);
                self.call(facet, BucketOperation::PutBucketRequestPayment, self.policy(), || {
                    api.put_bucket_request_payment(bucket, payment.clone())
                })
                .await
            }
            Facet::Replication => self.apply_replication(desired).await,
            Facet::ServerSideEncryption => {
                let Some(encryption) = &desired.server_side_encryption else {
                    return Ok(());
                };
                if encryption.is_empty() {
                    self.delete(
                        facet,
                        BucketOperation::DeleteBucketEncryption,
                        S3ErrorCode::ServerSideEncryptionConfigurationNotFoundError,
                        || api.delete_bucket_encryption(bucket),
                    )
                    .await
                } else {
                    let encryption = expand_encryption(encryption);
                    let retry = self.policy().retry_on(S3ErrorCode::OperationAborted);
                    self.call(facet, BucketOperation::PutBucketEncryption, retry, || {
                        api.put_bucket_encryption(bucket, encryption.clone())
                    })
                    .await
                }
            }
            Facet::ObjectLock => self.apply_object_lock(desired).await,
            Facet::Bucket => Ok(()),
        }
    }

    async fn apply_grants(&self, desired: &BucketFacets) -> BucketResult<()> {
        let facet = Facet::Grants;
        let Some(grants) = &desired.grants else {
            return Ok(());
        };
        // The remote side always keeps an owner grant, so clearing grants
        // means going back to a canned ACL.
        if grants.is_empty() {
            return self
                .put_canned_acl(facet, desired.acl.unwrap_or_default())
                .await;
        }

        let (api, bucket) = (self.api, self.bucket);
        let current = self
            .call(facet, BucketOperation::GetBucketAcl, self.policy(), || {
                api.get_bucket_acl(bucket)
            })
            .await?;
        let policy = expand_grants(grants, current.owner.unwrap_or_default());
        self.call(facet, BucketOperation::PutBucketAcl, self.policy(), || {
            api.put_bucket_acl(PutBucketAclInput::policy(bucket, policy.clone()))
        })
        .await
    }

    async fn put_canned_acl(&self, facet: Facet, acl: BucketCannedACL) -> BucketResult<()> {
        let (api, bucket) = (self.api, self.bucket);
        self.call(facet, BucketOperation::PutBucketAcl, self.policy(), || {
            api.put_bucket_acl(PutBucketAclInput::canned(bucket, acl))
        })
        .await
    }

    async fn apply_replication(&self, desired: &BucketFacets) -> BucketResult<()> {
        let facet = Facet::Replication;
        let Some(replication) = &desired.replication else {
            return Ok(());
        };
        let (api, bucket) = (self.api, self.bucket);
        if replication.is_empty() {
            return self
                .delete(
                    facet,
                    BucketOperation::DeleteBucketReplication,
                    S3ErrorCode::ReplicationConfigurationNotFoundError,
                    || api.delete_bucket_replication(bucket),
                )
                .await;
        }

        let versioning_enabled = desired
            .versioning
            .or(self.prior.versioning)
            .is_some_and(|v| v.enabled);
        if !versioning_enabled {
            return Err(BucketError::precondition(
                bucket,
                facet,
                REPLICATION_REQUIRES_VERSIONING,
            ));
        }

        let configuration = expand_replication(replication);
        let retry = self
            .policy()
            .retry_on_message(S3ErrorCode::InvalidRequest, "Versioning must be 'Enabled'");
        self.call(facet, BucketOperation::PutBucketReplication, retry, || {
            api.put_bucket_replication(bucket, configuration.clone())
        })
        .await
    }

    async fn apply_object_lock(&self, desired: &BucketFacets) -> BucketResult<()> {
        let facet = Facet::ObjectLock;
        let Some(lock) = &desired.object_lock else {
            return Ok(());
        };
        let (api, bucket) = (self.api, self.bucket);
        let was_enabled = self.prior.object_lock.as_ref().is_some_and(|o| o.enabled);
        match (was_enabled, lock.enabled) {
            (false, true) => Err(BucketError::precondition(
                bucket,
                facet,
                "object lock can only be enabled when the bucket is created",
            )),
            (true, false) => Err(BucketError::precondition(
                bucket,
                facet,
                "object lock cannot be disabled once enabled",
            )),
            (false, false) => Ok(()),
            (true, true) => {
                let configuration = expand_object_lock(lock);
                self.call(
                    facet,
                    BucketOperation::PutObjectLockConfiguration,
                    self.policy(),
                    || api.put_object_lock_configuration(bucket, configuration.clone()),
                )
                .await
            }
        }
    }

    /// Base policy: retry `NoSuchBucket` until the operation timeout.
    fn policy(&self) -> RetryPolicy {
        self.config
            .retry_policy(self.timeout)
            .retry_on(S3ErrorCode::NoSuchBucket)
    }

    async fn call<T, F, Fut>(
        &self,
        facet: Facet,
        operation: BucketOperation,
        policy: RetryPolicy,
        request: F,
    ) -> BucketResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, S3Error>>,
    {
        debug!(bucket = %self.bucket, facet = %facet, operation = %operation, "calling");
        retry_with_backoff(&policy, self.cancel, operation.as_str(), request)
            .await
            .map_err(|e| BucketError::from_retry(self.bucket, facet, e))
    }

    async fn delete<F, Fut>(
        &self,
        facet: Facet,
        operation: BucketOperation,
        absent: S3ErrorCode,
        request: F,
    ) -> BucketResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), S3Error>>,
    {
        match self.call(facet, operation, self.policy(), request).await {
            Err(err) if err.api_error().is_some_and(|e| e.is(absent)) => {
                debug!(bucket = %self.bucket, facet = %facet, "already absent");
                Ok(())
            }
            result => result,
        }
    }
}
