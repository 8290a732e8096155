//! Default server-side encryption codec.

use ruststack_bucket_model::resource::{
    ServerSideEncryptionConfig, ServerSideEncryptionRuleConfig,
};
use ruststack_bucket_model::types::{
    ServerSideEncryptionByDefault, ServerSideEncryptionConfiguration, ServerSideEncryptionRule,
};

/// Expand default encryption rules.
#[must_use]
pub fn expand_encryption(config: &ServerSideEncryptionConfig) -> ServerSideEncryptionConfiguration {
    ServerSideEncryptionConfiguration {
        rules: config
            .rules
            .iter()
            .map(|rule| ServerSideEncryptionRule {
                apply_server_side_encryption_by_default: Some(ServerSideEncryptionByDefault {
                    kms_master_key_id: rule.kms_master_key_id.clone(),
                    sse_algorithm: rule.sse_algorithm,
                }),
                bucket_key_enabled: Some(rule.bucket_key_enabled),
            })
            .collect(),
    }
}

/// Flatten default encryption rules. Rules without a default are skipped.
#[must_use]
pub fn flatten_encryption(
    config: &ServerSideEncryptionConfiguration,
) -> ServerSideEncryptionConfig {
    ServerSideEncryptionConfig {
        rules: config
            .rules
            .iter()
            .filter_map(|rule| {
                rule.apply_server_side_encryption_by_default
                    .as_ref()
                    .map(|default| ServerSideEncryptionRuleConfig {
                        sse_algorithm: default.sse_algorithm,
                        kms_master_key_id: default.kms_master_key_id.clone(),
                        bucket_key_enabled: rule.bucket_key_enabled.unwrap_or(false),
                    })
            })
            .collect(),
    }
}
