//! Request envelopes for operations that carry more than a bucket name and a
//! single configuration document.

use crate::types::{
    AccessControlPolicy, BucketCannedACL, CreateBucketConfiguration, ObjectIdentifier,
};

/// S3 CreateBucketInput.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBucketInput {
    /// Name of the bucket to create.
    pub bucket: String,
    /// Canned ACL applied at creation.
    pub acl: Option<BucketCannedACL>,
    /// Location constraint; omitted for `us-east-1`.
    pub create_bucket_configuration: Option<CreateBucketConfiguration>,
    /// Whether object lock is enabled for the new bucket.
    pub object_lock_enabled_for_bucket: Option<bool>,
}

/// S3 PutBucketAclInput.
///
/// Exactly one of `acl` and `access_control_policy` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutBucketAclInput {
    /// Bucket name.
    pub bucket: String,
    /// Canned ACL (sent as the `x-amz-acl` header).
    pub acl: Option<BucketCannedACL>,
    /// Explicit grant list plus owner.
    pub access_control_policy: Option<AccessControlPolicy>,
}

impl PutBucketAclInput {
    /// A request applying a canned ACL.
    #[must_use]
    pub fn canned(bucket: impl Into<String>, acl: BucketCannedACL) -> Self {
        Self {
            bucket: bucket.into(),
            acl: Some(acl),
            access_control_policy: None,
        }
    }

    /// A request applying an explicit access control policy.
    #[must_use]
    pub fn policy(bucket: impl Into<String>, policy: AccessControlPolicy) -> Self {
        Self {
            bucket: bucket.into(),
            acl: None,
            access_control_policy: Some(policy),
        }
    }
}

/// S3 DeleteObjectsInput.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteObjectsInput {
    /// Bucket name.
    pub bucket: String,
    /// Object versions and delete markers to remove.
    pub objects: Vec<ObjectIdentifier>,
    /// Whether governance-mode object lock retention is bypassed.
    pub bypass_governance_retention: bool,
}
