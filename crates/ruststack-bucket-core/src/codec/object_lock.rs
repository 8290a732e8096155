//! Object lock codec.

use ruststack_bucket_model::resource::{ObjectLockConfig, ObjectLockRetentionConfig};
use ruststack_bucket_model::types::{
    DefaultRetention, ObjectLockConfiguration, ObjectLockEnabled, ObjectLockRule,
};

/// Expand an object lock configuration.
#[must_use]
pub fn expand_object_lock(config: &ObjectLockConfig) -> ObjectLockConfiguration {
    ObjectLockConfiguration {
        object_lock_enabled: config.enabled.then_some(ObjectLockEnabled::Enabled),
        rule: config.rule.as_ref().map(|rule| ObjectLockRule {
            default_retention: Some(DefaultRetention {
                days: rule.days,
                mode: Some(rule.mode),
                years: rule.years,
            }),
        }),
    }
}

/// Flatten an object lock configuration.
#[must_use]
pub fn flatten_object_lock(config: &ObjectLockConfiguration) -> ObjectLockConfig {
    ObjectLockConfig {
        enabled: config.object_lock_enabled == Some(ObjectLockEnabled::Enabled),
        rule: config
            .rule
            .as_ref()
            .and_then(|rule| rule.default_retention.as_ref())
            .map(|retention| ObjectLockRetentionConfig {
                mode: retention.mode.unwrap_or_default(),
                days: retention.days,
                years: retention.years,
            }),
    }
}
