//! The remote bucket control-plane API consumed by the manager.
//!
//! [`BucketApi`] is the seam between convergence logic and a concrete
//! backend. Each facet is exposed as its own GET/PUT/DELETE so updaters stay
//! independent. Errors are returned as [`S3Error`] with the code the remote
//! side produced; classification happens in the caller.

use async_trait::async_trait;
use ruststack_bucket_model::S3Error;
use ruststack_bucket_model::input::{CreateBucketInput, DeleteObjectsInput, PutBucketAclInput};
use ruststack_bucket_model::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketLifecycleConfiguration,
    BucketLoggingStatus, CORSConfiguration, ObjectIdentifier, ObjectLockConfiguration,
    ReplicationConfiguration, RequestPaymentConfiguration, ServerSideEncryptionConfiguration,
    Tagging, VersioningConfiguration, WebsiteConfiguration,
};

/// Per-facet access to a remote object store's bucket control plane.
#[async_trait]
pub trait BucketApi: Send + Sync + std::fmt::Debug {
    // -- bucket --

    /// Create a bucket.
    async fn create_bucket(&self, input: CreateBucketInput) -> Result<(), S3Error>;
    /// Check that a bucket exists.
    async fn head_bucket(&self, bucket: &str) -> Result<(), S3Error>;
    /// Delete an empty bucket.
    async fn delete_bucket(&self, bucket: &str) -> Result<(), S3Error>;
    /// Location constraint; `None` or empty means `us-east-1`.
    async fn get_bucket_location(&self, bucket: &str) -> Result<Option<String>, S3Error>;
    /// Every object version and delete marker in the bucket.
    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectIdentifier>, S3Error>;
    /// Delete object versions; returns the identifiers actually removed.
    async fn delete_objects(
        &self,
        input: DeleteObjectsInput,
    ) -> Result<Vec<ObjectIdentifier>, S3Error>;

    // -- tags --

    /// Read the tag set (`NoSuchTagSet` when none).
    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Tagging, S3Error>;
    /// Replace the tag set.
    async fn put_bucket_tagging(&self, bucket: &str, tagging: Tagging) -> Result<(), S3Error>;
    /// Remove the tag set.
    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<(), S3Error>;

    // -- policy --

    /// Read the policy document (`NoSuchBucketPolicy` when none).
    async fn get_bucket_policy(&self, bucket: &str) -> Result<String, S3Error>;
    /// Replace the policy document.
    async fn put_bucket_policy(&self, bucket: &str, policy: String) -> Result<(), S3Error>;
    /// Remove the policy document.
    async fn delete_bucket_policy(&self, bucket: &str) -> Result<(), S3Error>;

    // -- cors --

    /// Read CORS rules (`NoSuchCORSConfiguration` when none).
    async fn get_bucket_cors(&self, bucket: &str) -> Result<CORSConfiguration, S3Error>;
    /// Replace CORS rules.
    async fn put_bucket_cors(&self, bucket: &str, cors: CORSConfiguration) -> Result<(), S3Error>;
    /// Remove CORS rules.
    async fn delete_bucket_cors(&self, bucket: &str) -> Result<(), S3Error>;

    // -- website --

    /// Read website hosting (`NoSuchWebsiteConfiguration` when none).
    async fn get_bucket_website(&self, bucket: &str) -> Result<WebsiteConfiguration, S3Error>;
    /// Replace website hosting.
    async fn put_bucket_website(
        &self,
        bucket: &str,
        website: WebsiteConfiguration,
    ) -> Result<(), S3Error>;
    /// Remove website hosting.
    async fn delete_bucket_website(&self, bucket: &str) -> Result<(), S3Error>;

    // -- versioning --

    /// Read versioning; both fields are `None` on a never-versioned bucket.
    async fn get_bucket_versioning(&self, bucket: &str)
    -> Result<VersioningConfiguration, S3Error>;
    /// Set versioning.
    async fn put_bucket_versioning(
        &self,
        bucket: &str,
        versioning: VersioningConfiguration,
    ) -> Result<(), S3Error>;

    // -- acl --

    /// Read the ACL (owner and grants).
    async fn get_bucket_acl(&self, bucket: &str) -> Result<AccessControlPolicy, S3Error>;
    /// Apply a canned ACL or an explicit access control policy.
    async fn put_bucket_acl(&self, input: PutBucketAclInput) -> Result<(), S3Error>;

    // -- logging --

    /// Read logging status.
    async fn get_bucket_logging(&self, bucket: &str) -> Result<BucketLoggingStatus, S3Error>;
    /// Set logging status; an empty status disables logging.
    async fn put_bucket_logging(
        &self,
        bucket: &str,
        logging: BucketLoggingStatus,
    ) -> Result<(), S3Error>;

    // -- lifecycle --

    /// Read lifecycle rules (`NoSuchLifecycleConfiguration` when none).
    async fn get_bucket_lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<BucketLifecycleConfiguration, S3Error>;
    /// Replace lifecycle rules.
    async fn put_bucket_lifecycle_configuration(
        &self,
        bucket: &str,
        lifecycle: BucketLifecycleConfiguration,
    ) -> Result<(), S3Error>;
    /// Remove lifecycle rules.
    async fn delete_bucket_lifecycle(&self, bucket: &str) -> Result<(), S3Error>;

    // -- acceleration --

    /// Read transfer acceleration.
    async fn get_bucket_accelerate_configuration(
        &self,
        bucket: &str,
    ) -> Result<AccelerateConfiguration, S3Error>;
    /// Set transfer acceleration.
    async fn put_bucket_accelerate_configuration(
        &self,
        bucket: &str,
        accelerate: AccelerateConfiguration,
    ) -> Result<(), S3Error>;

    // -- request payment --

    /// Read the request payer.
    async fn get_bucket_request_payment(
        &self,
        bucket: &str,
    ) -> Result<RequestPaymentConfiguration, S3Error>;
    /// Set the request payer.
    async fn put_bucket_request_payment(
        &self,
        bucket: &str,
        payment: RequestPaymentConfiguration,
    ) -> Result<(), S3Error>;

    // -- replication --

    /// Read replication (`ReplicationConfigurationNotFoundError` when none).
    async fn get_bucket_replication(
        &self,
        bucket: &str,
    ) -> Result<ReplicationConfiguration, S3Error>;
    /// Replace replication.
    async fn put_bucket_replication(
        &self,
        bucket: &str,
        replication: ReplicationConfiguration,
    ) -> Result<(), S3Error>;
    /// Remove replication.
    async fn delete_bucket_replication(&self, bucket: &str) -> Result<(), S3Error>;

    // -- encryption --

    /// Read default encryption
    /// (`ServerSideEncryptionConfigurationNotFoundError` when none).
    async fn get_bucket_encryption(
        &self,
        bucket: &str,
    ) -> Result<ServerSideEncryptionConfiguration, S3Error>;
    /// Replace default encryption.
    async fn put_bucket_encryption(
        &self,
        bucket: &str,
        encryption: ServerSideEncryptionConfiguration,
    ) -> Result<(), S3Error>;
    /// Remove default encryption.
    async fn delete_bucket_encryption(&self, bucket: &str) -> Result<(), S3Error>;

    // -- object lock --

    /// Read object lock (`ObjectLockConfigurationNotFoundError` when none).
    async fn get_object_lock_configuration(
        &self,
        bucket: &str,
    ) -> Result<ObjectLockConfiguration, S3Error>;
    /// Replace object lock.
    async fn put_object_lock_configuration(
        &self,
        bucket: &str,
        object_lock: ObjectLockConfiguration,
    ) -> Result<(), S3Error>;
}
