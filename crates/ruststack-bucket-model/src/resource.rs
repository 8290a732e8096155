//! Declared bucket state.
//!
//! [`DesiredBucketState`] is what the caller wants; [`ObservedBucketState`] is
//! what a read-back found. Both carry the same [`BucketFacets`] shape.
//!
//! In desired state a facet of `None` is not managed and never diffed, while
//! `Some(empty)` declares the facet empty and removes any remote
//! configuration. In observed state `None` means the facet is absent on the
//! remote side or not supported there.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::{
    BucketAccelerateStatus, BucketCannedACL, ObjectLockRetentionMode, OwnerOverride, Payer,
    Permission, Protocol, ServerSideEncryption, StorageClass, TransitionStorageClass, Type,
};

/// All independently configurable sub-resources of a bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BucketFacets {
    /// Canned ACL. Mutually exclusive with a non-empty `grants` list.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<BucketCannedACL>,

    /// Explicit ACL grants.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants: Option<Vec<GrantConfig>>,

    /// CORS rules.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_rules: Option<Vec<CorsRuleConfig>>,

    /// Lifecycle rules, in order.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_rules: Option<Vec<LifecycleRuleConfig>>,

    /// Access logging target.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Object lock configuration.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_lock: Option<ObjectLockConfig>,

    /// Bucket policy JSON document. An empty string removes the policy.
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Cross-region replication.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<ReplicationConfig>,

    /// Request payer.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_payer: Option<Payer>,

    /// Transfer acceleration status.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_status: Option<BucketAccelerateStatus>,

    /// Default server-side encryption.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<ServerSideEncryptionConfig>,

    /// Versioning.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<VersioningConfig>,

    /// Static website hosting.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<WebsiteConfig>,

    /// Bucket tags.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl BucketFacets {
    /// Whether explicit grants are declared and non-empty.
    #[must_use]
    pub fn has_explicit_grants(&self) -> bool {
        self.grants.as_ref().is_some_and(|g| !g.is_empty())
    }
}

/// The complete user-declared configuration of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct DesiredBucketState {
    /// Bucket name. Immutable once created.
    #[builder(setter(into))]
    pub bucket: String,

    /// Empty the bucket (all versions, including locked ones) before deleting.
    #[builder(default)]
    #[serde(default)]
    pub force_destroy: bool,

    /// Declared sub-resources.
    #[builder(default)]
    #[serde(default)]
    pub facets: BucketFacets,
}

/// Attributes derived from the bucket location rather than read as facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketAttributes {
    /// `arn:{partition}:s3:::{bucket}`.
    pub arn: String,
    /// Region the bucket lives in.
    pub region: String,
    /// Global virtual-hosted domain name.
    pub bucket_domain_name: String,
    /// Region-specific virtual-hosted domain name.
    pub bucket_regional_domain_name: String,
    /// Route 53 hosted zone of the regional S3 website endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_zone_id: Option<String>,
    /// Website endpoint, present when website hosting is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_endpoint: Option<String>,
    /// Website domain, present when website hosting is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_domain: Option<String>,
}

/// The state of a bucket as read back from the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedBucketState {
    /// Bucket name.
    pub bucket: String,
    /// Derived attributes.
    pub attributes: BucketAttributes,
    /// Observed sub-resources.
    pub facets: BucketFacets,
}

/// One grantee and the permissions granted to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantConfig {
    /// Grantee type.
    pub grantee_type: Type,
    /// Canonical user id, for `CanonicalUser` grantees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group URI, for `Group` grantees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Granted permissions.
    pub permissions: BTreeSet<Permission>,
}

/// A CORS rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsRuleConfig {
    /// Headers allowed in a preflight request.
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    /// HTTP methods the origin may use.
    pub allowed_methods: Vec<String>,
    /// Origins allowed to make cross-origin requests.
    pub allowed_origins: Vec<String>,
    /// Response headers exposed to the browser.
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// How long a preflight response may be cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<i32>,
}

/// A lifecycle rule.
///
/// A rule without any action still round-trips: on the wire it carries a
/// no-op expiration because the API rejects action-less rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRuleConfig {
    /// Rule id. A unique id is generated when absent.
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether the rule is applied.
    #[builder(default = true)]
    #[serde(default)]
    pub enabled: bool,

    /// Object key prefix the rule applies to.
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Object tags the rule applies to, combined with `prefix`.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// Days after which incomplete multipart uploads are aborted.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_incomplete_multipart_upload_days: Option<i32>,

    /// Current-version expiration.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<LifecycleExpirationConfig>,

    /// Days after which noncurrent versions expire.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration_days: Option<i32>,

    /// Current-version storage class transitions.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<LifecycleTransitionConfig>,

    /// Noncurrent-version storage class transitions.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub noncurrent_version_transitions: Vec<NoncurrentVersionTransitionConfig>,
}

impl LifecycleRuleConfig {
    /// Whether the rule declares at least one action.
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.abort_incomplete_multipart_upload_days.is_some()
            || self.expiration.is_some()
            || self.noncurrent_version_expiration_days.is_some()
            || !self.transitions.is_empty()
            || !self.noncurrent_version_transitions.is_empty()
    }
}

/// Current-version expiration. Only one of the three fields is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleExpirationConfig {
    /// Expire objects on this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Expire objects this many days after creation. Zero or less means unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    /// Remove delete markers with no noncurrent versions left.
    #[serde(default)]
    pub expired_object_delete_marker: bool,
}

impl LifecycleExpirationConfig {
    /// Expire objects a number of days after creation.
    #[must_use]
    pub fn after_days(days: i32) -> Self {
        Self {
            days: Some(days),
            ..Self::default()
        }
    }
}

/// Current-version transition to another storage class.
///
/// `days: Some(0)` is a valid, immediate transition and differs from `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleTransitionConfig {
    /// Transition on this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Transition this many days after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    /// Target storage class.
    pub storage_class: TransitionStorageClass,
}

/// Noncurrent-version transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoncurrentVersionTransitionConfig {
    /// Days after a version becomes noncurrent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    /// Target storage class.
    pub storage_class: TransitionStorageClass,
}

/// Access logging target. An empty target bucket disables logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Bucket receiving the access logs.
    pub target_bucket: String,
    /// Key prefix of the log objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_prefix: Option<String>,
}

impl LoggingConfig {
    /// Whether logging is disabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target_bucket.is_empty()
    }
}

/// Object lock configuration.
///
/// `enabled` can only be set when the bucket is created and can never be
/// turned off afterwards; the default retention rule may change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLockConfig {
    /// Whether object lock is enabled on the bucket.
    #[serde(default)]
    pub enabled: bool,
    /// Default retention for new objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<ObjectLockRetentionConfig>,
}

impl ObjectLockConfig {
    /// Whether nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.enabled && self.rule.is_none()
    }
}

/// Default retention applied to new objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLockRetentionConfig {
    /// Retention mode.
    pub mode: ObjectLockRetentionMode,
    /// Retention period in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    /// Retention period in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<i32>,
}

/// Replication configuration. Requires versioning to be enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationConfig {
    /// IAM role assumed by S3 to replicate objects.
    pub role: String,
    /// Replication rules, in declaration order.
    #[serde(default)]
    pub rules: Vec<ReplicationRuleConfig>,
}

impl ReplicationConfig {
    /// Whether no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A replication rule.
///
/// When `filter` is set the rule uses the filter-based schema (priority and
/// delete marker replication apply); otherwise the legacy bare `prefix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationRuleConfig {
    /// Rule id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether the rule is applied.
    #[serde(default)]
    pub enabled: bool,
    /// Priority among overlapping filter-based rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Key prefix of a legacy rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Filter of a filter-based rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ReplicationFilterConfig>,
    /// Whether delete markers are replicated.
    #[serde(default)]
    pub delete_marker_replication: bool,
    /// Where replicas are written.
    pub destination: ReplicationDestinationConfig,
    /// Which encrypted source objects are replicated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_selection_criteria: Option<SourceSelectionCriteriaConfig>,
}

/// Filter of a filter-based replication rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationFilterConfig {
    /// Key prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Object tags, combined with `prefix`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// Replication destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationDestinationConfig {
    /// Destination bucket ARN.
    pub bucket: String,
    /// Storage class of the replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<StorageClass>,
    /// Account owning the destination bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// KMS key used to encrypt replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_kms_key_id: Option<String>,
    /// Replica owner override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_translation: Option<OwnerOverride>,
    /// Replication metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ReplicationMetricsConfig>,
    /// Replication time control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_time: Option<ReplicationTimeConfig>,
}

/// Replication metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationMetricsConfig {
    /// Whether metrics are emitted.
    pub enabled: bool,
    /// Event threshold in minutes (10 to 15).
    #[serde(default = "default_replication_minutes")]
    pub minutes: i32,
}

impl Default for ReplicationMetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minutes: default_replication_minutes(),
        }
    }
}

/// Replication time control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationTimeConfig {
    /// Whether replication time control is on.
    pub enabled: bool,
    /// Replication deadline in minutes.
    #[serde(default = "default_replication_minutes")]
    pub minutes: i32,
}

impl Default for ReplicationTimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minutes: default_replication_minutes(),
        }
    }
}

fn default_replication_minutes() -> i32 {
    15
}

/// Source object selection for replication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSelectionCriteriaConfig {
    /// Replicate objects encrypted with KMS.
    pub sse_kms_encrypted_objects_enabled: bool,
}

/// Default server-side encryption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryptionConfig {
    /// Encryption rules.
    #[serde(default)]
    pub rules: Vec<ServerSideEncryptionRuleConfig>,
}

impl ServerSideEncryptionConfig {
    /// Whether no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One default encryption rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryptionRuleConfig {
    /// Default encryption algorithm.
    pub sse_algorithm: ServerSideEncryption,
    /// KMS key for `aws:kms` encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_master_key_id: Option<String>,
    /// Use an S3 bucket key for KMS encryption.
    #[serde(default)]
    pub bucket_key_enabled: bool,
}

/// Versioning. Both flags at `false` is the state of a fresh bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersioningConfig {
    /// Whether versioning is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Whether deletes require MFA.
    #[serde(default)]
    pub mfa_delete: bool,
}

impl VersioningConfig {
    /// Versioning enabled, MFA delete off.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            mfa_delete: false,
        }
    }

    /// Whether this is the fresh-bucket default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        !self.enabled && !self.mfa_delete
    }
}

/// Static website hosting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteConfig {
    /// Index document suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_document: Option<String>,
    /// Key of the error document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_document: Option<String>,
    /// Host name, optionally prefixed with `http://` or `https://`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_all_requests_to: Option<String>,
    /// Redirect rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routing_rules: Vec<RoutingRuleConfig>,
}

impl WebsiteConfig {
    /// Whether website hosting is not configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index_document.is_none()
            && self.error_document.is_none()
            && self.redirect_all_requests_to.is_none()
            && self.routing_rules.is_empty()
    }
}

/// A website routing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRuleConfig {
    /// When the redirect applies. Always when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RoutingRuleConditionConfig>,
    /// Where requests are redirected.
    pub redirect: RoutingRuleRedirectConfig,
}

/// Condition of a website routing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRuleConditionConfig {
    /// Match on this HTTP error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_code_returned_equals: Option<String>,
    /// Match on this key prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix_equals: Option<String>,
}

/// Redirect of a website routing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRuleRedirectConfig {
    /// Host to redirect to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// HTTP redirect status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_redirect_code: Option<String>,
    /// Protocol of the redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// Replacement for the matched key prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_key_prefix_with: Option<String>,
    /// Replacement key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_key_with: Option<String>,
}
