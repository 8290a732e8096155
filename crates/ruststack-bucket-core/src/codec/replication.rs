//! Replication codec.
//!
//! A rule with a `filter` uses the filter-based schema: it always carries a
//! priority (default 0) and a delete marker replication status. A rule
//! without one uses the legacy bare prefix and carries neither.

use std::collections::BTreeMap;

use ruststack_bucket_model::resource::{
    ReplicationConfig, ReplicationDestinationConfig, ReplicationFilterConfig,
    ReplicationMetricsConfig, ReplicationRuleConfig, ReplicationTimeConfig,
    SourceSelectionCriteriaConfig,
};
use ruststack_bucket_model::types::{
    AccessControlTranslation, DeleteMarkerReplication, DeleteMarkerReplicationStatus, Destination,
    EncryptionConfiguration, Metrics, MetricsStatus, ReplicationConfiguration, ReplicationRule,
    ReplicationRuleAndOperator, ReplicationRuleFilter, ReplicationRuleStatus, ReplicationTime,
    ReplicationTimeStatus, ReplicationTimeValue, SourceSelectionCriteria, SseKmsEncryptedObjects,
    SseKmsEncryptedObjectsStatus,
};

use super::non_empty;
use super::tags::{expand_tag_set, flatten_tag_set};

/// Minutes used for metrics and replication time when the wire omits them.
pub const DEFAULT_REPLICATION_MINUTES: i32 = 15;

fn expand_filter(filter: &ReplicationFilterConfig) -> ReplicationRuleFilter {
    if filter.tags.is_empty() {
        return ReplicationRuleFilter {
            prefix: Some(filter.prefix.clone().unwrap_or_default()),
            ..ReplicationRuleFilter::default()
        };
    }
    if filter.prefix.is_none() && filter.tags.len() == 1 {
        return ReplicationRuleFilter {
            tag: expand_tag_set(&filter.tags).into_iter().next(),
            ..ReplicationRuleFilter::default()
        };
    }
    ReplicationRuleFilter {
        and: Some(ReplicationRuleAndOperator {
            prefix: filter.prefix.clone(),
            tags: expand_tag_set(&filter.tags),
        }),
        ..ReplicationRuleFilter::default()
    }
}

fn flatten_filter(filter: &ReplicationRuleFilter) -> ReplicationFilterConfig {
    let (prefix, tags) = if let Some(and) = &filter.and {
        (and.prefix.as_deref(), flatten_tag_set(&and.tags))
    } else if let Some(tag) = &filter.tag {
        (None, flatten_tag_set(std::slice::from_ref(tag)))
    } else {
        (filter.prefix.as_deref(), BTreeMap::new())
    };
    ReplicationFilterConfig {
        prefix: non_empty(prefix),
        tags,
    }
}

fn expand_destination(destination: &ReplicationDestinationConfig) -> Destination {
    Destination {
        access_control_translation: destination
            .access_control_translation
            .map(|owner| AccessControlTranslation { owner }),
        account: destination.account_id.clone(),
        bucket: destination.bucket.clone(),
        encryption_configuration: destination.replica_kms_key_id.as_ref().map(|key| {
            EncryptionConfiguration {
                replica_kms_key_id: Some(key.clone()),
            }
        }),
        metrics: destination.metrics.as_ref().map(|m| Metrics {
            event_threshold: Some(ReplicationTimeValue {
                minutes: Some(m.minutes),
            }),
            status: if m.enabled {
                MetricsStatus::Enabled
            } else {
                MetricsStatus::Disabled
            },
        }),
        replication_time: destination
            .replication_time
            .as_ref()
            .map(|t| ReplicationTime {
                status: if t.enabled {
                    ReplicationTimeStatus::Enabled
                } else {
                    ReplicationTimeStatus::Disabled
                },
                time: ReplicationTimeValue {
                    minutes: Some(t.minutes),
                },
            }),
        storage_class: destination.storage_class,
    }
}

fn flatten_destination(destination: &Destination) -> ReplicationDestinationConfig {
    ReplicationDestinationConfig {
        bucket: destination.bucket.clone(),
        storage_class: destination.storage_class,
        account_id: destination.account.clone(),
        replica_kms_key_id: destination
            .encryption_configuration
            .as_ref()
            .and_then(|e| e.replica_kms_key_id.clone()),
        access_control_translation: destination
            .access_control_translation
            .as_ref()
            .map(|t| t.owner),
        metrics: destination
            .metrics
            .as_ref()
            .map(|m| ReplicationMetricsConfig {
                enabled: m.status == MetricsStatus::Enabled,
                minutes: m
                    .event_threshold
                    .as_ref()
                    .and_then(|t| t.minutes)
                    .unwrap_or(DEFAULT_REPLICATION_MINUTES),
            }),
        replication_time: destination
            .replication_time
            .as_ref()
            .map(|t| ReplicationTimeConfig {
                enabled: t.status == ReplicationTimeStatus::Enabled,
                minutes: t.time.minutes.unwrap_or(DEFAULT_REPLICATION_MINUTES),
            }),
    }
}

/// Expand one replication rule.
#[must_use]
pub fn expand_replication_rule(rule: &ReplicationRuleConfig) -> ReplicationRule {
    let mut wire = ReplicationRule {
        destination: expand_destination(&rule.destination),
        id: rule.id.clone(),
        source_selection_criteria: rule.source_selection_criteria.as_ref().map(|c| {
            SourceSelectionCriteria {
                sse_kms_encrypted_objects: Some(SseKmsEncryptedObjects {
                    status: if c.sse_kms_encrypted_objects_enabled {
                        SseKmsEncryptedObjectsStatus::Enabled
                    } else {
                        SseKmsEncryptedObjectsStatus::Disabled
                    },
                }),
            }
        }),
        status: if rule.enabled {
            ReplicationRuleStatus::Enabled
        } else {
            ReplicationRuleStatus::Disabled
        },
        ..ReplicationRule::default()
    };

    if let Some(filter) = &rule.filter {
        wire.filter = Some(expand_filter(filter));
        wire.priority = Some(rule.priority.unwrap_or(0));
        wire.delete_marker_replication = Some(DeleteMarkerReplication {
            status: Some(if rule.delete_marker_replication {
                DeleteMarkerReplicationStatus::Enabled
            } else {
                DeleteMarkerReplicationStatus::Disabled
            }),
        });
    } else {
        wire.prefix = Some(rule.prefix.clone().unwrap_or_default());
    }
    wire
}

/// Flatten one replication rule.
#[must_use]
pub fn flatten_replication_rule(rule: &ReplicationRule) -> ReplicationRuleConfig {
    let filter = rule.filter.as_ref().map(flatten_filter);
    let modern = filter.is_some();
    ReplicationRuleConfig {
        id: rule.id.clone(),
        enabled: rule.status == ReplicationRuleStatus::Enabled,
        priority: if modern { rule.priority } else { None },
        prefix: if modern {
            None
        } else {
            non_empty(rule.prefix.as_deref())
        },
        filter,
        delete_marker_replication: rule
            .delete_marker_replication
            .as_ref()
            .and_then(|d| d.status)
            == Some(DeleteMarkerReplicationStatus::Enabled),
        destination: flatten_destination(&rule.destination),
        source_selection_criteria: rule
            .source_selection_criteria
            .as_ref()
            .and_then(|c| c.sse_kms_encrypted_objects.as_ref())
            .map(|o| SourceSelectionCriteriaConfig {
                sse_kms_encrypted_objects_enabled: o.status
                    == SseKmsEncryptedObjectsStatus::Enabled,
            }),
    }
}

/// Expand a replication configuration.
#[must_use]
pub fn expand_replication(config: &ReplicationConfig) -> ReplicationConfiguration {
    ReplicationConfiguration {
        role: config.role.clone(),
        rules: config.rules.iter().map(expand_replication_rule).collect(),
    }
}

/// Flatten a replication configuration.
#[must_use]
pub fn flatten_replication(config: &ReplicationConfiguration) -> ReplicationConfig {
    ReplicationConfig {
        role: config.role.clone(),
        rules: config.rules.iter().map(flatten_replication_rule).collect(),
    }
}

#[cfg(test)]
mod tests {
    use ruststack_bucket_model::types::{OwnerOverride, StorageClass};

    use super::*;

    fn destination() -> ReplicationDestinationConfig {
        ReplicationDestinationConfig {
            bucket: "arn:aws:s3:::destination".to_owned(),
            storage_class: Some(StorageClass::StandardIa),
            ..ReplicationDestinationConfig::default()
        }
    }

    #[test]
    fn test_should_round_trip_legacy_rule() {
        let config = ReplicationConfig {
            role: "arn:aws:iam::123456789012:role/replication".to_owned(),
            rules: vec![ReplicationRuleConfig {
                id: Some("foobar".to_owned()),
                enabled: true,
                prefix: Some("foo".to_owned()),
                destination: destination(),
                ..ReplicationRuleConfig::default()
            }],
        };
        let wire = expand_replication(&config);
        assert_eq!(wire.rules[0].prefix.as_deref(), Some("foo"));
        assert!(wire.rules[0].filter.is_none());
        assert!(wire.rules[0].priority.is_none());
        assert!(wire.rules[0].delete_marker_replication.is_none());
        assert_eq!(flatten_replication(&wire), config);
    }

    #[test]
    fn test_should_default_priority_and_delete_marker_for_filter_rules() {
        let rule = ReplicationRuleConfig {
            id: Some("modern".to_owned()),
            enabled: true,
            filter: Some(ReplicationFilterConfig {
                prefix: Some("docs/".to_owned()),
                tags: BTreeMap::new(),
            }),
            destination: destination(),
            ..ReplicationRuleConfig::default()
        };
        let wire = expand_replication_rule(&rule);
        assert_eq!(wire.priority, Some(0));
        assert_eq!(
            wire.delete_marker_replication.as_ref().and_then(|d| d.status),
            Some(DeleteMarkerReplicationStatus::Disabled)
        );

        let flattened = flatten_replication_rule(&wire);
        assert_eq!(flattened.priority, Some(0));
        assert!(!flattened.delete_marker_replication);
        assert_eq!(flattened.filter, rule.filter);
    }

    #[test]
    fn test_should_round_trip_full_destination() {
        let rule = ReplicationRuleConfig {
            id: Some("full".to_owned()),
            enabled: false,
            priority: Some(3),
            filter: Some(ReplicationFilterConfig {
                prefix: Some("a/".to_owned()),
                tags: BTreeMap::from([("k".to_owned(), "v".to_owned())]),
            }),
            delete_marker_replication: true,
            destination: ReplicationDestinationConfig {
                account_id: Some("123456789012".to_owned()),
                replica_kms_key_id: Some("arn:aws:kms:us-west-2:123456789012:key/k".to_owned()),
                access_control_translation: Some(OwnerOverride::Destination),
                metrics: Some(ReplicationMetricsConfig::default()),
                replication_time: Some(ReplicationTimeConfig::default()),
                ..destination()
            },
            source_selection_criteria: Some(SourceSelectionCriteriaConfig {
                sse_kms_encrypted_objects_enabled: true,
            }),
            ..ReplicationRuleConfig::default()
        };
        let wire = expand_replication_rule(&rule);
        assert!(wire.filter.as_ref().is_some_and(|f| f.and.is_some()));
        assert_eq!(
            wire.destination
                .metrics
                .as_ref()
                .and_then(|m| m.event_threshold.as_ref())
                .and_then(|t| t.minutes),
            Some(DEFAULT_REPLICATION_MINUTES)
        );
        assert_eq!(flatten_replication_rule(&wire), rule);
    }

    #[test]
    fn test_should_use_single_tag_filter_without_prefix() {
        let rule = ReplicationRuleConfig {
            id: Some("tag".to_owned()),
            enabled: true,
            priority: Some(1),
            filter: Some(ReplicationFilterConfig {
                prefix: None,
                tags: BTreeMap::from([("k".to_owned(), "v".to_owned())]),
            }),
            destination: destination(),
            ..ReplicationRuleConfig::default()
        };
        let wire = expand_replication_rule(&rule);
        assert!(wire.filter.as_ref().is_some_and(|f| f.tag.is_some()));
        assert_eq!(flatten_replication_rule(&wire), rule);
    }

    #[test]
    fn test_should_default_missing_minutes() {
        let wire = Destination {
            bucket: "arn:aws:s3:::d".to_owned(),
            metrics: Some(Metrics {
                event_threshold: None,
                status: MetricsStatus::Enabled,
            }),
            ..Destination::default()
        };
        let flattened = flatten_destination(&wire);
        assert_eq!(flattened.metrics.map(|m| m.minutes), Some(DEFAULT_REPLICATION_MINUTES));
    }
}
