//! Codecs for the single-value settings: versioning, transfer acceleration,
//! and request payer.

use ruststack_bucket_model::resource::VersioningConfig;
use ruststack_bucket_model::types::{
    AccelerateConfiguration, BucketAccelerateStatus, BucketVersioningStatus, MFADelete, Payer,
    RequestPaymentConfiguration, VersioningConfiguration,
};

/// Expand versioning. Disabled versioning is sent as `Suspended`.
#[must_use]
pub fn expand_versioning(versioning: VersioningConfig) -> VersioningConfiguration {
    VersioningConfiguration {
        status: Some(if versioning.enabled {
            BucketVersioningStatus::Enabled
        } else {
            BucketVersioningStatus::Suspended
        }),
        mfa_delete: Some(if versioning.mfa_delete {
            MFADelete::Enabled
        } else {
            MFADelete::Disabled
        }),
    }
}

/// Flatten versioning. A never-versioned bucket flattens to the default.
#[must_use]
pub fn flatten_versioning(versioning: &VersioningConfiguration) -> VersioningConfig {
    VersioningConfig {
        enabled: versioning.status == Some(BucketVersioningStatus::Enabled),
        mfa_delete: versioning.mfa_delete == Some(MFADelete::Enabled),
    }
}

/// Expand transfer acceleration.
#[must_use]
pub fn expand_acceleration(status: BucketAccelerateStatus) -> AccelerateConfiguration {
    AccelerateConfiguration {
        status: Some(status),
    }
}

/// Flatten transfer acceleration. `None` when it was never configured.
#[must_use]
pub fn flatten_acceleration(config: &AccelerateConfiguration) -> Option<BucketAccelerateStatus> {
    config.status
}

/// Expand the request payer.
#[must_use]
pub fn expand_request_payer(payer: Payer) -> RequestPaymentConfiguration {
    RequestPaymentConfiguration { payer }
}

/// Flatten the request payer.
#[must_use]
pub fn flatten_request_payer(config: &RequestPaymentConfiguration) -> Payer {
    config.payer
}
