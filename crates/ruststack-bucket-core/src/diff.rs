//! Facet diff.
//!
//! [`plan`] compares desired facets with observed ones and returns the set of
//! facets that need an apply. Comparison is typed and per facet: observed
//! `None` stands for the facet's empty value, and fields the remote side
//! fills in by itself (generated lifecycle ids, replication priority, empty
//! prefixes, policy formatting) are normalized away before comparing.

use ruststack_bucket_model::BucketFacets;
use ruststack_bucket_model::resource::{
    LifecycleRuleConfig, LoggingConfig, ObjectLockConfig, ReplicationConfig,
    ReplicationRuleConfig,
};
use ruststack_bucket_model::types::BucketAccelerateStatus;

use crate::codec::access::normalize_grants;
use crate::codec::lifecycle::effective_expiration;
use crate::codec::policy::policies_equivalent;
use crate::facet::{Facet, FacetChangeSet};

/// Facets whose desired value differs from the observed one.
///
/// Facets left `None` in `desired` are not managed and never appear.
#[must_use]
pub fn plan(desired: &BucketFacets, observed: &BucketFacets) -> FacetChangeSet {
    let mut changes = FacetChangeSet::new();

    if let Some(tags) = &desired.tags {
        if *tags != observed.tags.clone().unwrap_or_default() {
            changes.insert(Facet::Tags);
        }
    }

    if let Some(policy) = &desired.policy {
        if !policies_equivalent(policy, observed.policy.as_deref().unwrap_or_default()) {
            changes.insert(Facet::Policy);
        }
    }

    if let Some(rules) = &desired.cors_rules {
        if *rules != observed.cors_rules.clone().unwrap_or_default() {
            changes.insert(Facet::Cors);
        }
    }

    if let Some(website) = &desired.website {
        if *website != observed.website.clone().unwrap_or_default() {
            changes.insert(Facet::Website);
        }
    }

    if let Some(versioning) = desired.versioning {
        if versioning != observed.versioning.unwrap_or_default() {
            changes.insert(Facet::Versioning);
        }
    }

    let grants_changed = grants_changed(desired, observed);
    if grants_changed {
        changes.insert(Facet::Grants);
    }
    if let Some(acl) = desired.acl {
        if !grants_changed && !desired.has_explicit_grants() && observed.acl != Some(acl) {
            changes.insert(Facet::Acl);
        }
    }

    if let Some(logging) = &desired.logging {
        if normalize_logging(Some(logging)) != normalize_logging(observed.logging.as_ref()) {
            changes.insert(Facet::Logging);
        }
    }

    if let Some(rules) = &desired.lifecycle_rules {
        let observed_rules = observed.lifecycle_rules.as_deref().unwrap_or_default();
        if !lifecycle_equivalent(rules, observed_rules) {
            changes.insert(Facet::Lifecycle);
        }
    }

    if let Some(status) = desired.acceleration_status {
        if status != observed
            .acceleration_status
            .unwrap_or(BucketAccelerateStatus::Suspended)
        {
            changes.insert(Facet::Acceleration);
        }
    }

    if let Some(payer) = desired.request_payer {
        if payer != observed.request_payer.unwrap_or_default() {
            changes.insert(Facet::RequestPayer);
        }
    }

    if let Some(replication) = &desired.replication {
        if !replication_equivalent(replication, observed.replication.as_ref()) {
            changes.insert(Facet::Replication);
        }
    }

    if let Some(encryption) = &desired.server_side_encryption {
        if *encryption != observed.server_side_encryption.clone().unwrap_or_default() {
            changes.insert(Facet::ServerSideEncryption);
        }
    }

    if let Some(lock) = &desired.object_lock {
        if *lock != observed.object_lock.clone().unwrap_or_default() {
            changes.insert(Facet::ObjectLock);
        }
    }

    changes
}

/// The facets a bucket has right after CreateBucket with `desired`.
///
/// The canned ACL and the object lock flag are set by CreateBucket itself;
/// every other facet starts empty.
#[must_use]
pub fn fresh_facets(desired: &BucketFacets) -> BucketFacets {
    BucketFacets {
        acl: Some(desired.acl.unwrap_or_default()),
        object_lock: Some(ObjectLockConfig {
            enabled: desired.object_lock.as_ref().is_some_and(|o| o.enabled),
            rule: None,
        }),
        ..BucketFacets::default()
    }
}

/// Facets to apply after CreateBucket.
///
/// Facets at their empty value are skipped, so versioning that is neither
/// enabled nor MFA-protected is never sent to a fresh bucket.
#[must_use]
pub fn plan_create(desired: &BucketFacets) -> FacetChangeSet {
    let mut changes = plan(desired, &fresh_facets(desired));
    changes.remove(Facet::Acl);
    changes
}

/// Explicit grants change when they differ from the observed grant set.
/// Cleared grants only need the canned fallback when no canned ACL matches
/// what is stored.
fn grants_changed(desired: &BucketFacets, observed: &BucketFacets) -> bool {
    let Some(grants) = &desired.grants else {
        return false;
    };
    if grants.is_empty() {
        observed.acl.is_none()
    } else {
        normalize_grants(grants) != observed.grants.clone().unwrap_or_default()
    }
}

fn normalize_logging(logging: Option<&LoggingConfig>) -> Option<LoggingConfig> {
    logging.filter(|l| !l.is_empty()).map(|l| LoggingConfig {
        target_bucket: l.target_bucket.clone(),
        target_prefix: l.target_prefix.clone().filter(|p| !p.is_empty()),
    })
}

fn normalize_lifecycle_rule(rule: &LifecycleRuleConfig) -> LifecycleRuleConfig {
    LifecycleRuleConfig {
        prefix: rule.prefix.clone().filter(|p| !p.is_empty()),
        expiration: rule.expiration.as_ref().and_then(effective_expiration),
        ..rule.clone()
    }
}

/// Rules are matched by position. A desired rule without an id takes the id
/// the remote side generated for it.
fn lifecycle_equivalent(desired: &[LifecycleRuleConfig], observed: &[LifecycleRuleConfig]) -> bool {
    desired.len() == observed.len()
        && desired.iter().zip(observed).all(|(d, o)| {
            let mut d = normalize_lifecycle_rule(d);
            if d.id.is_none() {
                d.id.clone_from(&o.id);
            }
            d == normalize_lifecycle_rule(o)
        })
}

fn normalize_replication_rule(rule: &ReplicationRuleConfig) -> ReplicationRuleConfig {
    let mut rule = rule.clone();
    rule.prefix = rule.prefix.filter(|p| !p.is_empty());
    if let Some(filter) = rule.filter.as_mut() {
        filter.prefix = filter.prefix.take().filter(|p| !p.is_empty());
        rule.priority = Some(rule.priority.unwrap_or(0));
    } else {
        // Legacy rules carry neither a priority nor a delete marker status.
        rule.priority = None;
        rule.delete_marker_replication = false;
    }
    rule
}

fn normalize_replication(config: &ReplicationConfig) -> ReplicationConfig {
    let mut rules: Vec<_> = config.rules.iter().map(normalize_replication_rule).collect();
    rules.sort_by(|a, b| a.id.cmp(&b.id));
    ReplicationConfig {
        role: config.role.clone(),
        rules,
    }
}

fn replication_equivalent(
    desired: &ReplicationConfig,
    observed: Option<&ReplicationConfig>,
) -> bool {
    match observed {
        None => desired.is_empty(),
        Some(observed) if desired.is_empty() || observed.is_empty() => {
            desired.is_empty() && observed.is_empty()
        }
        Some(observed) => normalize_replication(desired) == normalize_replication(observed),
    }
}
