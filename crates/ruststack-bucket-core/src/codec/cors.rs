//! CORS rule codec.

use ruststack_bucket_model::resource::CorsRuleConfig;
use ruststack_bucket_model::types::{CORSConfiguration, CORSRule};

/// Expand declared CORS rules.
#[must_use]
pub fn expand_cors(rules: &[CorsRuleConfig]) -> CORSConfiguration {
    CORSConfiguration {
        cors_rules: rules
            .iter()
            .map(|r| CORSRule {
                allowed_headers: r.allowed_headers.clone(),
                allowed_methods: r.allowed_methods.clone(),
                allowed_origins: r.allowed_origins.clone(),
                expose_headers: r.expose_headers.clone(),
                id: None,
                max_age_seconds: r.max_age_seconds,
            })
            .collect(),
    }
}

/// Flatten stored CORS rules.
#[must_use]
pub fn flatten_cors(cors: &CORSConfiguration) -> Vec<CorsRuleConfig> {
    cors.cors_rules
        .iter()
        .map(|r| CorsRuleConfig {
            allowed_headers: r.allowed_headers.clone(),
            allowed_methods: r.allowed_methods.clone(),
            allowed_origins: r.allowed_origins.clone(),
            expose_headers: r.expose_headers.clone(),
            max_age_seconds: r.max_age_seconds,
        })
        .collect()
}
