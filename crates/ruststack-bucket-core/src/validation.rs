//! Validation of declared bucket state.
//!
//! Runs before any remote call on create and update. Bucket naming follows
//! the [Amazon S3 rules](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html);
//! facet checks reject combinations the remote API would refuse or that
//! this manager cannot converge.

use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;

use ruststack_bucket_model::{BucketFacets, DesiredBucketState};

use crate::codec::policy::normalize_policy;
use crate::codec::tags::SYSTEM_TAG_PREFIX;
use crate::error::{BucketError, BucketResult};
use crate::facet::Facet;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Maximum number of tags on a bucket.
const MAX_BUCKET_TAGS: usize = 50;

/// Maximum length of a tag key in characters.
const MAX_TAG_KEY_LEN: usize = 128;

/// Maximum length of a tag value in characters.
const MAX_TAG_VALUE_LEN: usize = 256;

/// Validate a bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
/// - Must not start with `xn--` or `sthree-`
/// - Must not end with `-s3alias`
///
/// # Examples
///
/// ```
/// use ruststack_bucket_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> BucketResult<()> {
    let invalid = |reason: &str| Err(BucketError::validation(name, Facet::Bucket, reason));
    let len = name.len();

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return invalid(&format!(
            "bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        ));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return invalid("bucket name must only contain lowercase letters, numbers, hyphens, and dots");
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return invalid("bucket name must start and end with a letter or number");
    }

    if name.contains("..") {
        return invalid("bucket name must not contain consecutive dots");
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return invalid("bucket name must not be formatted as an IP address");
    }

    if name.starts_with("xn--") {
        return invalid("bucket name must not start with 'xn--'");
    }

    if name.ends_with("-s3alias") {
        return invalid("bucket name must not end with '-s3alias'");
    }

    if name.starts_with("sthree-") {
        return invalid("bucket name must not start with 'sthree-'");
    }

    Ok(())
}

/// Validate a bucket tag map.
pub fn validate_tags(bucket: &str, tags: &BTreeMap<String, String>) -> BucketResult<()> {
    if tags.len() > MAX_BUCKET_TAGS {
        return Err(BucketError::validation(
            bucket,
            Facet::Tags,
            format!("a bucket can have at most {MAX_BUCKET_TAGS} tags"),
        ));
    }
    for (key, value) in tags {
        if key.is_empty() || key.chars().count() > MAX_TAG_KEY_LEN {
            return Err(BucketError::validation(
                bucket,
                Facet::Tags,
                format!("tag key must be 1 to {MAX_TAG_KEY_LEN} characters long"),
            ));
        }
        if key.starts_with(SYSTEM_TAG_PREFIX) {
            return Err(BucketError::validation(
                bucket,
                Facet::Tags,
                format!("tag key {key} uses the reserved '{SYSTEM_TAG_PREFIX}' prefix"),
            ));
        }
        if value.chars().count() > MAX_TAG_VALUE_LEN {
            return Err(BucketError::validation(
                bucket,
                Facet::Tags,
                format!("tag value must be at most {MAX_TAG_VALUE_LEN} characters long"),
            ));
        }
    }
    Ok(())
}

fn validate_access(bucket: &str, facets: &BucketFacets) -> BucketResult<()> {
    if facets.acl.is_some() && facets.has_explicit_grants() {
        return Err(BucketError::validation(
            bucket,
            Facet::Grants,
            "acl and grants are mutually exclusive",
        ));
    }
    Ok(())
}

fn validate_policy(bucket: &str, facets: &BucketFacets) -> BucketResult<()> {
    if let Some(policy) = &facets.policy {
        normalize_policy(policy).map_err(|e| {
            BucketError::validation(bucket, Facet::Policy, format!("policy is not valid JSON: {e}"))
        })?;
    }
    Ok(())
}

fn validate_lifecycle(bucket: &str, facets: &BucketFacets) -> BucketResult<()> {
    let Some(rules) = &facets.lifecycle_rules else {
        return Ok(());
    };
    let mut ids = HashSet::new();
    for rule in rules {
        if let Some(id) = &rule.id {
            if !ids.insert(id.as_str()) {
                return Err(BucketError::validation(
                    bucket,
                    Facet::Lifecycle,
                    format!("duplicate lifecycle rule id {id}"),
                ));
            }
        }
        let negative = rule.transitions.iter().any(|t| t.days.is_some_and(|d| d < 0))
            || rule
                .noncurrent_version_transitions
                .iter()
                .any(|t| t.days.is_some_and(|d| d < 0));
        if negative {
            return Err(BucketError::validation(
                bucket,
                Facet::Lifecycle,
                "transition days must not be negative",
            ));
        }
    }
    Ok(())
}

fn validate_replication(bucket: &str, facets: &BucketFacets) -> BucketResult<()> {
    let Some(replication) = &facets.replication else {
        return Ok(());
    };
    if replication.is_empty() {
        return Ok(());
    }
    if replication.role.is_empty() {
        return Err(BucketError::validation(
            bucket,
            Facet::Replication,
            "replication requires an IAM role",
        ));
    }
    if replication.rules.iter().any(|r| r.destination.bucket.is_empty()) {
        return Err(BucketError::validation(
            bucket,
            Facet::Replication,
            "every replication rule needs a destination bucket",
        ));
    }
    if replication
        .rules
        .iter()
        .any(|r| r.filter.is_some() && r.prefix.is_some())
    {
        return Err(BucketError::validation(
            bucket,
            Facet::Replication,
            "a replication rule uses either a filter or a prefix, not both",
        ));
    }
    Ok(())
}

fn validate_object_lock(bucket: &str, facets: &BucketFacets) -> BucketResult<()> {
    let Some(object_lock) = &facets.object_lock else {
        return Ok(());
    };
    let Some(rule) = &object_lock.rule else {
        return Ok(());
    };
    if !object_lock.enabled {
        return Err(BucketError::validation(
            bucket,
            Facet::ObjectLock,
            "a default retention rule requires object lock to be enabled",
        ));
    }
    if rule.days.is_some() == rule.years.is_some() {
        return Err(BucketError::validation(
            bucket,
            Facet::ObjectLock,
            "default retention needs exactly one of days or years",
        ));
    }
    Ok(())
}

/// Validate a complete desired state.
pub fn validate_desired(desired: &DesiredBucketState) -> BucketResult<()> {
    let bucket = desired.bucket.as_str();
    let facets = &desired.facets;

    validate_bucket_name(bucket)?;
    validate_access(bucket, facets)?;
    validate_policy(bucket, facets)?;
    if let Some(tags) = &facets.tags {
        validate_tags(bucket, tags)?;
    }
    validate_lifecycle(bucket, facets)?;
    validate_replication(bucket, facets)?;
    validate_object_lock(bucket, facets)?;
    Ok(())
}
