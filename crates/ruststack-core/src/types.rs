//! Common AWS type definitions shared across crates.

use std::fmt;

use crate::Partition;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region, also the region implied by an empty location constraint.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    ///
    /// An empty string normalizes to [`AwsRegion::DEFAULT`], matching how S3
    /// reports buckets in `us-east-1` with an empty location constraint.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        if region.is_empty() {
            return Self::default();
        }
        Self(region)
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the default `us-east-1` region.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// The partition this region belongs to.
    #[must_use]
    pub fn partition(&self) -> Partition {
        Partition::for_region(self)
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the ARN of a bucket in the given partition.
///
/// # Examples
///
/// ```
/// use ruststack_core::{Partition, bucket_arn};
///
/// assert_eq!(bucket_arn(Partition::Aws, "b1"), "arn:aws:s3:::b1");
/// ```
#[must_use]
pub fn bucket_arn(partition: Partition, bucket: &str) -> String {
    format!("arn:{partition}:s3:::{bucket}")
}
