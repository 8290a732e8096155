//! In-memory [`BucketApi`] backend.
//!
//! [`InMemoryBucketApi`] keeps buckets in a `DashMap` with every facet behind
//! its own `parking_lot::RwLock`, the same layout the RustStack S3 service
//! state uses. It enforces the remote rules the lifecycle manager depends on:
//!
//! - replication requires versioning `Enabled` (`InvalidRequest`)
//! - object lock configuration requires a bucket created with object lock
//!   (`InvalidBucketState`)
//! - deleting a non-empty bucket fails with `BucketNotEmpty`
//! - absent facets return their `NoSuch*` / `*NotFoundError` code
//! - a bucket in `us-east-1` reports an empty location constraint
//!
//! Every call is recorded as a [`RecordedCall`], and faults can be injected
//! per operation to model eventual consistency and unsupported facets.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use parking_lot::{Mutex, RwLock};
use ruststack_bucket_model::input::{CreateBucketInput, DeleteObjectsInput, PutBucketAclInput};
use ruststack_bucket_model::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketCannedACL, BucketLifecycleConfiguration,
    BucketLoggingStatus, BucketVersioningStatus, CORSConfiguration, ObjectIdentifier,
    ObjectLockConfiguration, ObjectLockEnabled, Owner, ReplicationConfiguration,
    RequestPaymentConfiguration, ServerSideEncryptionConfiguration, Tagging,
    VersioningConfiguration, WebsiteConfiguration,
};
use ruststack_bucket_model::{BucketOperation, S3Error, S3ErrorCode, s3_error};
use ruststack_core::AwsRegion;
use tracing::{debug, info};

use crate::api::BucketApi;
use crate::codec::access::canned_acl_policy;

/// Canonical user id of the account owning every in-memory bucket.
pub const DEFAULT_OWNER_ID: &str =
    "75aa57f09aa0c8caeab4f8c24e99d10f8e7faeebf76c078efc7c6caea54ba06a";

/// Display name of the account owning every in-memory bucket.
pub const DEFAULT_OWNER_NAME: &str = "ruststack";

/// Message returned when replication is configured on an unversioned bucket.
pub const REPLICATION_VERSIONING_MESSAGE: &str =
    "Versioning must be 'Enabled' on the bucket to apply a replication configuration";

/// One call made against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Operation invoked.
    pub operation: BucketOperation,
    /// Target bucket.
    pub bucket: String,
    /// Canned ACL carried by CreateBucket or PutBucketAcl.
    pub canned_acl: Option<BucketCannedACL>,
}

#[derive(Debug, Clone)]
struct Fault {
    code: S3ErrorCode,
    message: Option<String>,
    /// `None` fails forever.
    remaining: Option<u32>,
}

impl Fault {
    fn to_error(&self) -> S3Error {
        match &self.message {
            Some(message) => S3Error::with_message(self.code, message.clone()),
            None => S3Error::new(self.code),
        }
    }
}

/// Per-bucket state.
#[derive(Debug)]
struct StoredBucket {
    region: AwsRegion,
    object_lock_enabled: bool,
    acl: RwLock<AccessControlPolicy>,
    tagging: RwLock<Option<Tagging>>,
    policy: RwLock<Option<String>>,
    cors: RwLock<Option<CORSConfiguration>>,
    website: RwLock<Option<WebsiteConfiguration>>,
    versioning: RwLock<VersioningConfiguration>,
    logging: RwLock<BucketLoggingStatus>,
    lifecycle: RwLock<Option<BucketLifecycleConfiguration>>,
    accelerate: RwLock<AccelerateConfiguration>,
    request_payment: RwLock<RequestPaymentConfiguration>,
    replication: RwLock<Option<ReplicationConfiguration>>,
    encryption: RwLock<Option<ServerSideEncryptionConfiguration>>,
    object_lock: RwLock<Option<ObjectLockConfiguration>>,
    objects: RwLock<Vec<ObjectIdentifier>>,
}

impl StoredBucket {
    fn new(region: AwsRegion, acl: AccessControlPolicy, object_lock_enabled: bool) -> Self {
        // Object lock implies versioning.
        let versioning = if object_lock_enabled {
            VersioningConfiguration {
                status: Some(BucketVersioningStatus::Enabled),
                mfa_delete: None,
            }
        } else {
            VersioningConfiguration::default()
        };
        let object_lock = object_lock_enabled.then(|| ObjectLockConfiguration {
            object_lock_enabled: Some(ObjectLockEnabled::Enabled),
            rule: None,
        });

        Self {
            region,
            object_lock_enabled,
            acl: RwLock::new(acl),
            tagging: RwLock::new(None),
            policy: RwLock::new(None),
            cors: RwLock::new(None),
            website: RwLock::new(None),
            versioning: RwLock::new(versioning),
            logging: RwLock::new(BucketLoggingStatus::default()),
            lifecycle: RwLock::new(None),
            accelerate: RwLock::new(AccelerateConfiguration::default()),
            request_payment: RwLock::new(RequestPaymentConfiguration::default()),
            replication: RwLock::new(None),
            encryption: RwLock::new(None),
            object_lock: RwLock::new(object_lock),
            objects: RwLock::new(Vec::new()),
        }
    }

    fn versioning_enabled(&self) -> bool {
        self.versioning.read().status == Some(BucketVersioningStatus::Enabled)
    }

    fn has_retention(&self) -> bool {
        self.object_lock
            .read()
            .as_ref()
            .is_some_and(|c| c.rule.is_some())
    }
}

/// Read an optional facet or fail with its absent code.
fn read_facet<T: Clone>(lock: &RwLock<Option<T>>, absent: S3ErrorCode) -> Result<T, S3Error> {
    lock.read().clone().ok_or_else(|| S3Error::new(absent))
}

/// An in-memory bucket control plane.
pub struct InMemoryBucketApi {
    region: AwsRegion,
    owner: Owner,
    buckets: DashMap<String, StoredBucket>,
    calls: Mutex<Vec<RecordedCall>>,
    faults: DashMap<BucketOperation, Fault>,
    late_writes: DashMap<String, u32>,
}

impl std::fmt::Debug for InMemoryBucketApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBucketApi")
            .field("region", &self.region)
            .field("bucket_count", &self.buckets.len())
            .field("fault_count", &self.faults.len())
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryBucketApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBucketApi {
    /// Create an empty backend whose endpoint lives in `us-east-1`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_region(AwsRegion::default())
    }

    /// Create an empty backend whose endpoint lives in `region`.
    #[must_use]
    pub fn with_region(region: AwsRegion) -> Self {
        Self {
            region,
            owner: Owner {
                display_name: Some(DEFAULT_OWNER_NAME.to_owned()),
                id: Some(DEFAULT_OWNER_ID.to_owned()),
            },
            buckets: DashMap::new(),
            calls: Mutex::new(Vec::new()),
            faults: DashMap::new(),
            late_writes: DashMap::new(),
        }
    }

    // -- call log --

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Every mutating call made so far, in order.
    #[must_use]
    pub fn write_calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.operation.is_write())
            .cloned()
            .collect()
    }

    /// Number of calls made to `operation`.
    #[must_use]
    pub fn call_count(&self, operation: BucketOperation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    // -- fault injection --

    /// Fail `operation` with `code`, `times` times or forever when `None`.
    pub fn fail_operation(
        &self,
        operation: BucketOperation,
        code: S3ErrorCode,
        times: Option<u32>,
    ) {
        self.faults.insert(
            operation,
            Fault {
                code,
                message: None,
                remaining: times,
            },
        );
    }

    /// Like [`fail_operation`](Self::fail_operation) with a custom message.
    pub fn fail_operation_with_message(
        &self,
        operation: BucketOperation,
        code: S3ErrorCode,
        message: impl Into<String>,
        times: Option<u32>,
    ) {
        self.faults.insert(
            operation,
            Fault {
                code,
                message: Some(message.into()),
                remaining: times,
            },
        );
    }

    /// Remove every injected fault.
    pub fn clear_faults(&self) {
        self.faults.clear();
        self.late_writes.clear();
    }

    /// Store a new object right after each of the next `times` listings of
    /// `bucket`, as a concurrent writer would.
    pub fn write_after_listing(&self, bucket: &str, times: u32) {
        self.late_writes.insert(bucket.to_owned(), times);
    }

    // -- objects --

    /// Store an object version. Versioned buckets keep every version.
    pub fn put_object(&self, bucket: &str, key: &str) -> Result<(), S3Error> {
        let stored = self.bucket(bucket)?;
        let version_id = if stored.versioning_enabled() {
            uuid::Uuid::new_v4().simple().to_string()
        } else {
            "null".to_owned()
        };
        let mut objects = stored.objects.write();
        if version_id == "null" {
            objects.retain(|o| o.key != key || o.version_id.as_deref() != Some("null"));
        }
        objects.push(ObjectIdentifier {
            key: key.to_owned(),
            version_id: Some(version_id),
        });
        Ok(())
    }

    /// Number of stored object versions.
    #[must_use]
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets
            .get(bucket)
            .map_or(0, |b| b.objects.read().len())
    }

    /// Whether a bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, bucket: &str) -> bool {
        self.buckets.contains_key(bucket)
    }

    // -- internals --

    fn begin(
        &self,
        operation: BucketOperation,
        bucket: &str,
        canned_acl: Option<BucketCannedACL>,
    ) -> Result<(), S3Error> {
        debug!(bucket = %bucket, operation = %operation, "in-memory call");
        self.calls.lock().push(RecordedCall {
            operation,
            bucket: bucket.to_owned(),
            canned_acl,
        });

        let mut exhausted = false;
        let injected = if let Some(mut fault) = self.faults.get_mut(&operation) {
            match fault.remaining.as_mut() {
                Some(0) => {
                    exhausted = true;
                    None
                }
                Some(n) => {
                    *n -= 1;
                    Some(fault.to_error())
                }
                None => Some(fault.to_error()),
            }
        } else {
            None
        };
        if exhausted {
            self.faults.remove(&operation);
        }
        injected.map_or(Ok(()), Err)
    }

    fn bucket(&self, name: &str) -> Result<Ref<'_, String, StoredBucket>, S3Error> {
        self.buckets
            .get(name)
            .ok_or_else(|| S3Error::no_such_bucket(name))
    }

    fn call(
        &self,
        operation: BucketOperation,
        bucket: &str,
    ) -> Result<Ref<'_, String, StoredBucket>, S3Error> {
        self.begin(operation, bucket, None)?;
        self.bucket(bucket)
    }
}

#[async_trait]
impl BucketApi for InMemoryBucketApi {
    async fn create_bucket(&self, input: CreateBucketInput) -> Result<(), S3Error> {
        self.begin(BucketOperation::CreateBucket, &input.bucket, input.acl)?;
        if self.buckets.contains_key(&input.bucket) {
            return Err(S3Error::bucket_already_owned_by_you(&input.bucket));
        }

        let region = input
            .create_bucket_configuration
            .and_then(|c| c.location_constraint)
            .map_or_else(|| self.region.clone(), AwsRegion::new);
        let acl = canned_acl_policy(input.acl.unwrap_or_default(), &self.owner);
        let object_lock = input.object_lock_enabled_for_bucket.unwrap_or(false);

        self.buckets.insert(
            input.bucket.clone(),
            StoredBucket::new(region.clone(), acl, object_lock),
        );
        info!(bucket = %input.bucket, region = %region, "bucket created");
        Ok(())
    }

    async fn head_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        self.call(BucketOperation::HeadBucket, bucket).map(|_| ())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucket, bucket)?;
        if !stored.objects.read().is_empty() {
            return Err(S3Error::bucket_not_empty(bucket));
        }
        drop(stored);

        self.buckets.remove(bucket);
        info!(bucket = %bucket, "bucket deleted");
        Ok(())
    }

    async fn get_bucket_location(&self, bucket: &str) -> Result<Option<String>, S3Error> {
        let stored = self.call(BucketOperation::GetBucketLocation, bucket)?;
        Ok((!stored.region.is_default()).then(|| stored.region.as_str().to_owned()))
    }

    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectIdentifier>, S3Error> {
        let stored = self.call(BucketOperation::ListObjectVersions, bucket)?;
        let objects = stored.objects.read().clone();
        drop(stored);

        let late = self.late_writes.get_mut(bucket).and_then(|mut remaining| {
            (*remaining > 0).then(|| {
                *remaining -= 1;
                *remaining
            })
        });
        if let Some(remaining) = late {
            self.put_object(bucket, &format!("late-{remaining}"))?;
        }
        Ok(objects)
    }

    async fn delete_objects(
        &self,
        input: DeleteObjectsInput,
    ) -> Result<Vec<ObjectIdentifier>, S3Error> {
        let stored = self.call(BucketOperation::DeleteObjects, &input.bucket)?;
        if stored.has_retention() && !input.bypass_governance_retention {
            return Err(s3_error!(AccessDenied, "object is protected by a retention period"));
        }
        let mut objects = stored.objects.write();
        let mut deleted = Vec::new();
        objects.retain(|o| {
            if input.objects.contains(o) {
                deleted.push(o.clone());
                false
            } else {
                true
            }
        });
        Ok(deleted)
    }

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Tagging, S3Error> {
        let stored = self.call(BucketOperation::GetBucketTagging, bucket)?;
        read_facet(&stored.tagging, S3ErrorCode::NoSuchTagSet)
    }

    async fn put_bucket_tagging(&self, bucket: &str, tagging: Tagging) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketTagging, bucket)?;
        *stored.tagging.write() = Some(tagging);
        Ok(())
    }

    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketTagging, bucket)?;
        *stored.tagging.write() = None;
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String, S3Error> {
        let stored = self.call(BucketOperation::GetBucketPolicy, bucket)?;
        read_facet(&stored.policy, S3ErrorCode::NoSuchBucketPolicy)
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: String) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketPolicy, bucket)?;
        if serde_json::from_str::<serde_json::Value>(&policy).is_err() {
            return Err(S3Error::malformed_policy("Policies must be valid JSON"));
        }
        *stored.policy.write() = Some(policy);
        Ok(())
    }

    async fn delete_bucket_policy(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketPolicy, bucket)?;
        *stored.policy.write() = None;
        Ok(())
    }

    async fn get_bucket_cors(&self, bucket: &str) -> Result<CORSConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketCors, bucket)?;
        read_facet(&stored.cors, S3ErrorCode::NoSuchCORSConfiguration)
    }

    async fn put_bucket_cors(&self, bucket: &str, cors: CORSConfiguration) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketCors, bucket)?;
        if cors.cors_rules.is_empty() {
            return Err(s3_error!(MalformedXML));
        }
        *stored.cors.write() = Some(cors);
        Ok(())
    }

    async fn delete_bucket_cors(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketCors, bucket)?;
        *stored.cors.write() = None;
        Ok(())
    }

    async fn get_bucket_website(&self, bucket: &str) -> Result<WebsiteConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketWebsite, bucket)?;
        read_facet(&stored.website, S3ErrorCode::NoSuchWebsiteConfiguration)
    }

    async fn put_bucket_website(
        &self,
        bucket: &str,
        website: WebsiteConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketWebsite, bucket)?;
        *stored.website.write() = Some(website);
        Ok(())
    }

    async fn delete_bucket_website(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketWebsite, bucket)?;
        *stored.website.write() = None;
        Ok(())
    }

    async fn get_bucket_versioning(
        &self,
        bucket: &str,
    ) -> Result<VersioningConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketVersioning, bucket)?;
        let versioning = stored.versioning.read().clone();
        Ok(versioning)
    }

    async fn put_bucket_versioning(
        &self,
        bucket: &str,
        versioning: VersioningConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketVersioning, bucket)?;
        if stored.object_lock_enabled
            && versioning.status != Some(BucketVersioningStatus::Enabled)
        {
            return Err(s3_error!(
                InvalidBucketState,
                "An Object Lock configuration is present on this bucket, so the versioning state cannot be changed"
            ));
        }
        let mut current = stored.versioning.write();
        if versioning.status.is_some() {
            current.status = versioning.status;
        }
        if versioning.mfa_delete.is_some() {
            current.mfa_delete = versioning.mfa_delete;
        }
        Ok(())
    }

    async fn get_bucket_acl(&self, bucket: &str) -> Result<AccessControlPolicy, S3Error> {
        let stored = self.call(BucketOperation::GetBucketAcl, bucket)?;
        let acl = stored.acl.read().clone();
        Ok(acl)
    }

    async fn put_bucket_acl(&self, input: PutBucketAclInput) -> Result<(), S3Error> {
        self.begin(BucketOperation::PutBucketAcl, &input.bucket, input.acl)?;
        let stored = self.bucket(&input.bucket)?;
        let policy = match (input.acl, input.access_control_policy) {
            (Some(acl), None) => canned_acl_policy(acl, &self.owner),
            (None, Some(policy)) => {
                if policy.grants.is_empty() || policy.owner.is_none() {
                    return Err(s3_error!(MalformedXML));
                }
                policy
            }
            _ => {
                return Err(s3_error!(
                    InvalidRequest,
                    "Specify either a canned ACL or an access control policy"
                ));
            }
        };
        *stored.acl.write() = policy;
        Ok(())
    }

    async fn get_bucket_logging(&self, bucket: &str) -> Result<BucketLoggingStatus, S3Error> {
        let stored = self.call(BucketOperation::GetBucketLogging, bucket)?;
        let logging = stored.logging.read().clone();
        Ok(logging)
    }

    async fn put_bucket_logging(
        &self,
        bucket: &str,
        logging: BucketLoggingStatus,
    ) -> Result<(), S3Error> {
        self.begin(BucketOperation::PutBucketLogging, bucket, None)?;
        if let Some(enabled) = &logging.logging_enabled {
            if !self.buckets.contains_key(&enabled.target_bucket) {
                return Err(s3_error!(
                    InvalidArgument,
                    "The target bucket for logging does not exist"
                ));
            }
        }
        let stored = self.bucket(bucket)?;
        *stored.logging.write() = logging;
        Ok(())
    }

    async fn get_bucket_lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<BucketLifecycleConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketLifecycleConfiguration, bucket)?;
        read_facet(
            &stored.lifecycle,
            S3ErrorCode::NoSuchLifecycleConfiguration,
        )
    }

    async fn put_bucket_lifecycle_configuration(
        &self,
        bucket: &str,
        lifecycle: BucketLifecycleConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketLifecycleConfiguration, bucket)?;
        if lifecycle.rules.is_empty() {
            return Err(s3_error!(MalformedXML));
        }
        let actionless = lifecycle.rules.iter().any(|r| {
            r.expiration.is_none()
                && r.abort_incomplete_multipart_upload.is_none()
                && r.noncurrent_version_expiration.is_none()
                && r.transitions.is_empty()
                && r.noncurrent_version_transitions.is_empty()
        });
        if actionless {
            return Err(s3_error!(
                InvalidRequest,
                "At least one action needs to be specified in a rule"
            ));
        }
        *stored.lifecycle.write() = Some(lifecycle);
        Ok(())
    }

    async fn delete_bucket_lifecycle(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketLifecycle, bucket)?;
        *stored.lifecycle.write() = None;
        Ok(())
    }

    async fn get_bucket_accelerate_configuration(
        &self,
        bucket: &str,
    ) -> Result<AccelerateConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketAccelerateConfiguration, bucket)?;
        let accelerate = stored.accelerate.read().clone();
        Ok(accelerate)
    }

    async fn put_bucket_accelerate_configuration(
        &self,
        bucket: &str,
        accelerate: AccelerateConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketAccelerateConfiguration, bucket)?;
        *stored.accelerate.write() = accelerate;
        Ok(())
    }

    async fn get_bucket_request_payment(
        &self,
        bucket: &str,
    ) -> Result<RequestPaymentConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketRequestPayment, bucket)?;
        let payment = stored.request_payment.read().clone();
        Ok(payment)
    }

    async fn put_bucket_request_payment(
        &self,
        bucket: &str,
        payment: RequestPaymentConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketRequestPayment, bucket)?;
        *stored.request_payment.write() = payment;
        Ok(())
    }

    async fn get_bucket_replication(
        &self,
        bucket: &str,
    ) -> Result<ReplicationConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketReplication, bucket)?;
        read_facet(
            &stored.replication,
            S3ErrorCode::ReplicationConfigurationNotFoundError,
        )
    }

    async fn put_bucket_replication(
        &self,
        bucket: &str,
        replication: ReplicationConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketReplication, bucket)?;
        if !stored.versioning_enabled() {
            return Err(S3Error::invalid_request(REPLICATION_VERSIONING_MESSAGE));
        }
        *stored.replication.write() = Some(replication);
        Ok(())
    }

    async fn delete_bucket_replication(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketReplication, bucket)?;
        *stored.replication.write() = None;
        Ok(())
    }

    async fn get_bucket_encryption(
        &self,
        bucket: &str,
    ) -> Result<ServerSideEncryptionConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetBucketEncryption, bucket)?;
        read_facet(
            &stored.encryption,
            S3ErrorCode::ServerSideEncryptionConfigurationNotFoundError,
        )
    }

    async fn put_bucket_encryption(
        &self,
        bucket: &str,
        encryption: ServerSideEncryptionConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutBucketEncryption, bucket)?;
        if encryption.rules.is_empty() {
            return Err(s3_error!(MalformedXML));
        }
        *stored.encryption.write() = Some(encryption);
        Ok(())
    }

    async fn delete_bucket_encryption(&self, bucket: &str) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::DeleteBucketEncryption, bucket)?;
        *stored.encryption.write() = None;
        Ok(())
    }

    async fn get_object_lock_configuration(
        &self,
        bucket: &str,
    ) -> Result<ObjectLockConfiguration, S3Error> {
        let stored = self.call(BucketOperation::GetObjectLockConfiguration, bucket)?;
        read_facet(
            &stored.object_lock,
            S3ErrorCode::ObjectLockConfigurationNotFoundError,
        )
    }

    async fn put_object_lock_configuration(
        &self,
        bucket: &str,
        object_lock: ObjectLockConfiguration,
    ) -> Result<(), S3Error> {
        let stored = self.call(BucketOperation::PutObjectLockConfiguration, bucket)?;
        if !stored.object_lock_enabled {
            return Err(s3_error!(
                InvalidBucketState,
                "Object Lock configuration cannot be enabled on existing buckets"
            ));
        }
        *stored.object_lock.write() = Some(object_lock);
        Ok(())
    }
}
