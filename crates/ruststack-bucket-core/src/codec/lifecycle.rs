//! Lifecycle rule codec.
//!
//! The remote API rejects a rule without any action, so a rule that declares
//! none is sent with a no-op expiration (`ExpiredObjectDeleteMarker=false`).
//! Flattening drops that synthesized expiration again. Rules without an id
//! get a generated one; dates travel as midnight UTC and come back as
//! calendar days.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use ruststack_bucket_model::resource::{
    LifecycleExpirationConfig, LifecycleRuleConfig, LifecycleTransitionConfig,
    NoncurrentVersionTransitionConfig,
};
use ruststack_bucket_model::types::{
    AbortIncompleteMultipartUpload, BucketLifecycleConfiguration, ExpirationStatus,
    LifecycleExpiration, LifecycleRule, LifecycleRuleAndOperator, LifecycleRuleFilter,
    NoncurrentVersionExpiration, NoncurrentVersionTransition, Transition,
};

use super::non_empty;
use super::tags::{expand_tag_set, flatten_tag_set};

/// Prefix of generated rule ids.
pub const GENERATED_ID_PREFIX: &str = "lifecycle-";

/// Generate a unique rule id.
#[must_use]
pub fn generate_rule_id() -> String {
    format!("{GENERATED_ID_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

fn to_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The expiration that keeps an otherwise action-less rule valid.
#[must_use]
pub fn noop_expiration() -> LifecycleExpiration {
    LifecycleExpiration {
        expired_object_delete_marker: Some(false),
        ..LifecycleExpiration::default()
    }
}

/// Whether a declared expiration expands to nothing.
#[must_use]
pub fn is_noop_expiration(expiration: &LifecycleExpirationConfig) -> bool {
    expiration.date.is_none()
        && expiration.days.is_none_or(|d| d <= 0)
        && !expiration.expired_object_delete_marker
}

/// The single action a declared expiration stands for: the date, else
/// positive days, else the delete-marker flag.
#[must_use]
pub fn effective_expiration(
    expiration: &LifecycleExpirationConfig,
) -> Option<LifecycleExpirationConfig> {
    if let Some(date) = expiration.date {
        return Some(LifecycleExpirationConfig {
            date: Some(date),
            ..LifecycleExpirationConfig::default()
        });
    }
    if let Some(days) = expiration.days.filter(|d| *d > 0) {
        return Some(LifecycleExpirationConfig::after_days(days));
    }
    expiration
        .expired_object_delete_marker
        .then(|| LifecycleExpirationConfig {
            expired_object_delete_marker: true,
            ..LifecycleExpirationConfig::default()
        })
}

fn expand_expiration(expiration: &LifecycleExpirationConfig) -> Option<LifecycleExpiration> {
    effective_expiration(expiration).map(|e| LifecycleExpiration {
        date: e.date.map(to_timestamp),
        days: e.days,
        expired_object_delete_marker: e.expired_object_delete_marker.then_some(true),
    })
}

fn expand_filter(rule: &LifecycleRuleConfig) -> LifecycleRuleFilter {
    if rule.tags.is_empty() {
        LifecycleRuleFilter {
            prefix: Some(rule.prefix.clone().unwrap_or_default()),
            ..LifecycleRuleFilter::default()
        }
    } else {
        LifecycleRuleFilter {
            and: Some(LifecycleRuleAndOperator {
                prefix: rule.prefix.clone(),
                tags: expand_tag_set(&rule.tags),
            }),
            ..LifecycleRuleFilter::default()
        }
    }
}

/// Expand one lifecycle rule.
#[must_use]
pub fn expand_lifecycle_rule(rule: &LifecycleRuleConfig) -> LifecycleRule {
    let mut wire = LifecycleRule {
        abort_incomplete_multipart_upload: rule.abort_incomplete_multipart_upload_days.map(
            |days| AbortIncompleteMultipartUpload {
                days_after_initiation: Some(days),
            },
        ),
        expiration: rule.expiration.as_ref().and_then(expand_expiration),
        filter: Some(expand_filter(rule)),
        id: Some(rule.id.clone().unwrap_or_else(generate_rule_id)),
        noncurrent_version_expiration: rule.noncurrent_version_expiration_days.map(|days| {
            NoncurrentVersionExpiration {
                noncurrent_days: Some(days),
            }
        }),
        noncurrent_version_transitions: rule
            .noncurrent_version_transitions
            .iter()
            .map(|t| NoncurrentVersionTransition {
                noncurrent_days: t.days,
                storage_class: Some(t.storage_class),
            })
            .collect(),
        prefix: None,
        status: if rule.enabled {
            ExpirationStatus::Enabled
        } else {
            ExpirationStatus::Disabled
        },
        transitions: rule
            .transitions
            .iter()
            .map(|t| Transition {
                date: t.date.map(to_timestamp),
                days: t.days,
                storage_class: Some(t.storage_class),
            })
            .collect(),
    };

    if !has_wire_action(&wire) {
        wire.expiration = Some(noop_expiration());
    }
    wire
}

fn has_wire_action(rule: &LifecycleRule) -> bool {
    rule.abort_incomplete_multipart_upload.is_some()
        || rule.expiration.is_some()
        || rule.noncurrent_version_expiration.is_some()
        || !rule.transitions.is_empty()
        || !rule.noncurrent_version_transitions.is_empty()
}

/// Expand declared lifecycle rules.
#[must_use]
pub fn expand_lifecycle(rules: &[LifecycleRuleConfig]) -> BucketLifecycleConfiguration {
    BucketLifecycleConfiguration {
        rules: rules.iter().map(expand_lifecycle_rule).collect(),
    }
}

fn flatten_expiration(expiration: &LifecycleExpiration) -> Option<LifecycleExpirationConfig> {
    let flattened = LifecycleExpirationConfig {
        date: expiration.date.map(|d| d.date_naive()),
        days: expiration.days.filter(|d| *d > 0),
        expired_object_delete_marker: expiration.expired_object_delete_marker.unwrap_or(false),
    };
    (!is_noop_expiration(&flattened)).then_some(flattened)
}

/// Flatten one lifecycle rule.
#[must_use]
pub fn flatten_lifecycle_rule(rule: &LifecycleRule) -> LifecycleRuleConfig {
    let (prefix, tags) = match &rule.filter {
        Some(LifecycleRuleFilter { and: Some(and), .. }) => {
            (and.prefix.clone(), flatten_tag_set(&and.tags))
        }
        Some(LifecycleRuleFilter { tag: Some(tag), .. }) => {
            (None, flatten_tag_set(std::slice::from_ref(tag)))
        }
        Some(filter) => (filter.prefix.clone(), Default::default()),
        None => (rule.prefix.clone(), Default::default()),
    };

    LifecycleRuleConfig {
        id: rule.id.clone(),
        enabled: rule.status == ExpirationStatus::Enabled,
        prefix: non_empty(prefix.as_deref()),
        tags,
        abort_incomplete_multipart_upload_days: rule
            .abort_incomplete_multipart_upload
            .as_ref()
            .and_then(|a| a.days_after_initiation),
        expiration: rule.expiration.as_ref().and_then(flatten_expiration),
        noncurrent_version_expiration_days: rule
            .noncurrent_version_expiration
            .as_ref()
            .and_then(|e| e.noncurrent_days),
        transitions: rule
            .transitions
            .iter()
            .map(|t| LifecycleTransitionConfig {
                date: t.date.map(|d| d.date_naive()),
                days: t.days,
                storage_class: t.storage_class.unwrap_or_default(),
            })
            .collect(),
        noncurrent_version_transitions: rule
            .noncurrent_version_transitions
            .iter()
            .map(|t| NoncurrentVersionTransitionConfig {
                days: t.noncurrent_days,
                storage_class: t.storage_class.unwrap_or_default(),
            })
            .collect(),
    }
}

/// Flatten stored lifecycle rules, keeping their order.
#[must_use]
pub fn flatten_lifecycle(config: &BucketLifecycleConfiguration) -> Vec<LifecycleRuleConfig> {
    config.rules.iter().map(flatten_lifecycle_rule).collect()
}
