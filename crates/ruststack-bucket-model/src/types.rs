//! Wire shapes for bucket sub-resource documents.
//!
//! Each facet of a bucket is read and written as one configuration document.
//! Field names follow the S3 API; enum values carry their exact wire strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a wire enum with its string values, a `Display` impl, and a
/// lenient `From<&str>` that falls back to the default variant.
macro_rules! s3_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            #[default] $default:ident => $default_value:literal
            $(, $variant:ident => $value:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        pub enum $name {
            #[doc = concat!("The `", $default_value, "` value.")]
            #[default]
            #[serde(rename = $default_value)]
            $default,
            $(
                #[doc = concat!("The `", $value, "` value.")]
                #[serde(rename = $value)]
                $variant,
            )*
        }

        impl $name {
            /// Returns the string value of this enum variant.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::$default => $default_value,
                    $(Self::$variant => $value,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($value => Self::$variant,)*
                    _ => Self::$default,
                }
            }
        }
    };
}

s3_enum! {
    /// Transfer acceleration status.
    BucketAccelerateStatus {
        #[default] Enabled => "Enabled",
        Suspended => "Suspended",
    }
}

s3_enum! {
    /// Canned (predefined) bucket ACL.
    BucketCannedACL {
        #[default] Private => "private",
        PublicRead => "public-read",
        PublicReadWrite => "public-read-write",
        AuthenticatedRead => "authenticated-read",
        LogDeliveryWrite => "log-delivery-write",
    }
}

s3_enum! {
    /// Bucket versioning status.
    BucketVersioningStatus {
        #[default] Enabled => "Enabled",
        Suspended => "Suspended",
    }
}

s3_enum! {
    /// MFA delete setting on a versioning configuration.
    MFADelete {
        #[default] Disabled => "Disabled",
        Enabled => "Enabled",
    }
}

s3_enum! {
    /// Lifecycle rule status.
    ExpirationStatus {
        #[default] Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

s3_enum! {
    /// Object lock enablement marker.
    ObjectLockEnabled {
        #[default] Enabled => "Enabled",
    }
}

s3_enum! {
    /// Object lock default retention mode.
    ObjectLockRetentionMode {
        #[default] Governance => "GOVERNANCE",
        Compliance => "COMPLIANCE",
    }
}

s3_enum! {
    /// Who pays for requests and data transfer.
    Payer {
        #[default] BucketOwner => "BucketOwner",
        Requester => "Requester",
    }
}

s3_enum! {
    /// ACL grant permission.
    Permission {
        #[default] FullControl => "FULL_CONTROL",
        Read => "READ",
        ReadAcp => "READ_ACP",
        Write => "WRITE",
        WriteAcp => "WRITE_ACP",
    }
}

s3_enum! {
    /// Redirect protocol.
    Protocol {
        #[default] Http => "http",
        Https => "https",
    }
}

s3_enum! {
    /// Server-side encryption algorithm.
    ServerSideEncryption {
        #[default] Aes256 => "AES256",
        AwsKms => "aws:kms",
        AwsKmsDsse => "aws:kms:dsse",
    }
}

s3_enum! {
    /// Storage class of replicated objects.
    StorageClass {
        #[default] Standard => "STANDARD",
        ReducedRedundancy => "REDUCED_REDUNDANCY",
        StandardIa => "STANDARD_IA",
        OnezoneIa => "ONEZONE_IA",
        IntelligentTiering => "INTELLIGENT_TIERING",
        Glacier => "GLACIER",
        DeepArchive => "DEEP_ARCHIVE",
        GlacierIr => "GLACIER_IR",
    }
}

s3_enum! {
    /// Lifecycle transition target storage class.
    TransitionStorageClass {
        #[default] Glacier => "GLACIER",
        StandardIa => "STANDARD_IA",
        OnezoneIa => "ONEZONE_IA",
        IntelligentTiering => "INTELLIGENT_TIERING",
        DeepArchive => "DEEP_ARCHIVE",
        GlacierIr => "GLACIER_IR",
    }
}

s3_enum! {
    /// ACL grantee type.
    Type {
        #[default] CanonicalUser => "CanonicalUser",
        AmazonCustomerByEmail => "AmazonCustomerByEmail",
        Group => "Group",
    }
}

s3_enum! {
    /// Replication rule status.
    ReplicationRuleStatus {
        #[default] Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

s3_enum! {
    /// Delete marker replication status.
    DeleteMarkerReplicationStatus {
        #[default] Disabled => "Disabled",
        Enabled => "Enabled",
    }
}

s3_enum! {
    /// Replication metrics status.
    MetricsStatus {
        #[default] Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

s3_enum! {
    /// Replication time control status.
    ReplicationTimeStatus {
        #[default] Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

s3_enum! {
    /// Status of replicating SSE-KMS encrypted objects.
    SseKmsEncryptedObjectsStatus {
        #[default] Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

s3_enum! {
    /// Replica ownership override.
    OwnerOverride {
        #[default] Destination => "Destination",
    }
}

/// S3 AbortIncompleteMultipartUpload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbortIncompleteMultipartUpload {
    pub days_after_initiation: Option<i32>,
}

/// S3 AccelerateConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccelerateConfiguration {
    pub status: Option<BucketAccelerateStatus>,
}

/// S3 AccessControlPolicy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessControlPolicy {
    pub grants: Vec<Grant>,
    pub owner: Option<Owner>,
}

/// S3 AccessControlTranslation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessControlTranslation {
    pub owner: OwnerOverride,
}

/// S3 BucketLifecycleConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketLifecycleConfiguration {
    pub rules: Vec<LifecycleRule>,
}

/// S3 BucketLoggingStatus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketLoggingStatus {
    pub logging_enabled: Option<LoggingEnabled>,
}

/// S3 CORSConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CORSConfiguration {
    pub cors_rules: Vec<CORSRule>,
}

/// S3 CORSRule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CORSRule {
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub expose_headers: Vec<String>,
    pub id: Option<String>,
    pub max_age_seconds: Option<i32>,
}

/// S3 Condition (website routing rule).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub http_error_code_returned_equals: Option<String>,
    pub key_prefix_equals: Option<String>,
}

/// S3 CreateBucketConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBucketConfiguration {
    pub location_constraint: Option<String>,
}

/// S3 DefaultRetention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultRetention {
    pub days: Option<i32>,
    pub mode: Option<ObjectLockRetentionMode>,
    pub years: Option<i32>,
}

/// S3 DeleteMarkerReplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteMarkerReplication {
    pub status: Option<DeleteMarkerReplicationStatus>,
}

/// S3 Destination (replication).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Destination {
    pub access_control_translation: Option<AccessControlTranslation>,
    pub account: Option<String>,
    pub bucket: String,
    pub encryption_configuration: Option<EncryptionConfiguration>,
    pub metrics: Option<Metrics>,
    pub replication_time: Option<ReplicationTime>,
    pub storage_class: Option<StorageClass>,
}

/// S3 EncryptionConfiguration (replication).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncryptionConfiguration {
    pub replica_kms_key_id: Option<String>,
}

/// S3 ErrorDocument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDocument {
    pub key: String,
}

/// S3 Grant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grant {
    pub grantee: Option<Grantee>,
    pub permission: Option<Permission>,
}

/// S3 Grantee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grantee {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub id: Option<String>,
    pub r#type: Type,
    pub uri: Option<String>,
}

/// S3 IndexDocument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDocument {
    pub suffix: String,
}

/// S3 LifecycleExpiration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleExpiration {
    pub date: Option<DateTime<Utc>>,
    pub days: Option<i32>,
    pub expired_object_delete_marker: Option<bool>,
}

/// S3 LifecycleRule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleRule {
    pub abort_incomplete_multipart_upload: Option<AbortIncompleteMultipartUpload>,
    pub expiration: Option<LifecycleExpiration>,
    pub filter: Option<LifecycleRuleFilter>,
    pub id: Option<String>,
    pub noncurrent_version_expiration: Option<NoncurrentVersionExpiration>,
    pub noncurrent_version_transitions: Vec<NoncurrentVersionTransition>,
    pub prefix: Option<String>,
    pub status: ExpirationStatus,
    pub transitions: Vec<Transition>,
}

/// S3 LifecycleRuleAndOperator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleRuleAndOperator {
    pub prefix: Option<String>,
    pub tags: Vec<Tag>,
}

/// S3 LifecycleRuleFilter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleRuleFilter {
    pub and: Option<LifecycleRuleAndOperator>,
    pub prefix: Option<String>,
    pub tag: Option<Tag>,
}

/// S3 LoggingEnabled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggingEnabled {
    pub target_bucket: String,
    pub target_prefix: String,
}

/// S3 Metrics (replication).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub event_threshold: Option<ReplicationTimeValue>,
    pub status: MetricsStatus,
}

/// S3 NoncurrentVersionExpiration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoncurrentVersionExpiration {
    pub noncurrent_days: Option<i32>,
}

/// S3 NoncurrentVersionTransition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoncurrentVersionTransition {
    pub noncurrent_days: Option<i32>,
    pub storage_class: Option<TransitionStorageClass>,
}

/// S3 ObjectIdentifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    pub key: String,
    pub version_id: Option<String>,
}

/// S3 ObjectLockConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectLockConfiguration {
    pub object_lock_enabled: Option<ObjectLockEnabled>,
    pub rule: Option<ObjectLockRule>,
}

/// S3 ObjectLockRule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectLockRule {
    pub default_retention: Option<DefaultRetention>,
}

/// S3 Owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Owner {
    pub display_name: Option<String>,
    pub id: Option<String>,
}

/// S3 Redirect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Redirect {
    pub host_name: Option<String>,
    pub http_redirect_code: Option<String>,
    pub protocol: Option<Protocol>,
    pub replace_key_prefix_with: Option<String>,
    pub replace_key_with: Option<String>,
}

/// S3 RedirectAllRequestsTo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedirectAllRequestsTo {
    pub host_name: String,
    pub protocol: Option<Protocol>,
}

/// S3 ReplicationConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationConfiguration {
    pub role: String,
    pub rules: Vec<ReplicationRule>,
}

/// S3 ReplicationRule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationRule {
    pub delete_marker_replication: Option<DeleteMarkerReplication>,
    pub destination: Destination,
    pub filter: Option<ReplicationRuleFilter>,
    pub id: Option<String>,
    pub prefix: Option<String>,
    pub priority: Option<i32>,
    pub source_selection_criteria: Option<SourceSelectionCriteria>,
    pub status: ReplicationRuleStatus,
}

/// S3 ReplicationRuleAndOperator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationRuleAndOperator {
    pub prefix: Option<String>,
    pub tags: Vec<Tag>,
}

/// S3 ReplicationRuleFilter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationRuleFilter {
    pub and: Option<ReplicationRuleAndOperator>,
    pub prefix: Option<String>,
    pub tag: Option<Tag>,
}

/// S3 ReplicationTime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationTime {
    pub status: ReplicationTimeStatus,
    pub time: ReplicationTimeValue,
}

/// S3 ReplicationTimeValue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationTimeValue {
    pub minutes: Option<i32>,
}

/// S3 RequestPaymentConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPaymentConfiguration {
    pub payer: Payer,
}

/// S3 RoutingRule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingRule {
    pub condition: Option<Condition>,
    pub redirect: Redirect,
}

/// S3 ServerSideEncryptionByDefault.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSideEncryptionByDefault {
    pub kms_master_key_id: Option<String>,
    pub sse_algorithm: ServerSideEncryption,
}

/// S3 ServerSideEncryptionConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSideEncryptionConfiguration {
    pub rules: Vec<ServerSideEncryptionRule>,
}

/// S3 ServerSideEncryptionRule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSideEncryptionRule {
    pub apply_server_side_encryption_by_default: Option<ServerSideEncryptionByDefault>,
    pub bucket_key_enabled: Option<bool>,
}

/// S3 SourceSelectionCriteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSelectionCriteria {
    pub sse_kms_encrypted_objects: Option<SseKmsEncryptedObjects>,
}

/// S3 SseKmsEncryptedObjects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SseKmsEncryptedObjects {
    pub status: SseKmsEncryptedObjectsStatus,
}

/// S3 Tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// S3 Tagging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tagging {
    pub tag_set: Vec<Tag>,
}

/// S3 Transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub date: Option<DateTime<Utc>>,
    pub days: Option<i32>,
    pub storage_class: Option<TransitionStorageClass>,
}

/// S3 VersioningConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersioningConfiguration {
    pub mfa_delete: Option<MFADelete>,
    pub status: Option<BucketVersioningStatus>,
}

/// S3 WebsiteConfiguration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebsiteConfiguration {
    pub error_document: Option<ErrorDocument>,
    pub index_document: Option<IndexDocument>,
    pub redirect_all_requests_to: Option<RedirectAllRequestsTo>,
    pub routing_rules: Vec<RoutingRule>,
}
