//! AWS partitions.
//!
//! A partition groups regions that share an ARN prefix and a DNS suffix.
//! Some bucket facets are not available outside the commercial and GovCloud
//! partitions, so callers use [`Partition::is_standard`] to decide how
//! strictly read failures are treated.

use std::fmt;
use std::str::FromStr;

use crate::{AwsRegion, RustStackError};

/// An AWS partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Partition {
    /// Commercial AWS.
    #[default]
    #[serde(rename = "aws")]
    Aws,
    /// AWS China.
    #[serde(rename = "aws-cn")]
    AwsCn,
    /// AWS GovCloud (US).
    #[serde(rename = "aws-us-gov")]
    AwsUsGov,
    /// AWS ISO (US).
    #[serde(rename = "aws-iso")]
    AwsIso,
    /// AWS ISOB (US).
    #[serde(rename = "aws-iso-b")]
    AwsIsoB,
}

impl Partition {
    /// Returns the partition identifier used in ARNs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::AwsCn => "aws-cn",
            Self::AwsUsGov => "aws-us-gov",
            Self::AwsIso => "aws-iso",
            Self::AwsIsoB => "aws-iso-b",
        }
    }

    /// Returns the DNS suffix for service endpoints in this partition.
    #[must_use]
    pub fn dns_suffix(&self) -> &'static str {
        match self {
            Self::Aws | Self::AwsUsGov => "amazonaws.com",
            Self::AwsCn => "amazonaws.com.cn",
            Self::AwsIso => "c2s.ic.gov",
            Self::AwsIsoB => "sc2s.sgov.gov",
        }
    }

    /// Resolve the partition that owns a region.
    #[must_use]
    pub fn for_region(region: &AwsRegion) -> Self {
        let name = region.as_str();
        if name.starts_with("cn-") {
            Self::AwsCn
        } else if name.starts_with("us-gov-") {
            Self::AwsUsGov
        } else if name.starts_with("us-isob-") {
            Self::AwsIsoB
        } else if name.starts_with("us-iso-") {
            Self::AwsIso
        } else {
            Self::Aws
        }
    }

    /// Whether this is the commercial or GovCloud partition.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        matches!(self, Self::Aws | Self::AwsUsGov)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = RustStackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws" => Ok(Self::Aws),
            "aws-cn" => Ok(Self::AwsCn),
            "aws-us-gov" => Ok(Self::AwsUsGov),
            "aws-iso" => Ok(Self::AwsIso),
            "aws-iso-b" => Ok(Self::AwsIsoB),
            other => Err(RustStackError::UnknownPartition(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_resolve_partition_for_region() {
        assert_eq!(Partition::for_region(&AwsRegion::new("eu-west-1")), Partition::Aws);
        assert_eq!(Partition::for_region(&AwsRegion::new("cn-north-1")), Partition::AwsCn);
        assert_eq!(
            Partition::for_region(&AwsRegion::new("us-gov-east-1")),
            Partition::AwsUsGov
        );
        assert_eq!(Partition::for_region(&AwsRegion::new("us-iso-east-1")), Partition::AwsIso);
        assert_eq!(
            Partition::for_region(&AwsRegion::new("us-isob-east-1")),
            Partition::AwsIsoB
        );
    }

    #[test]
    fn test_should_report_dns_suffix() {
        assert_eq!(Partition::Aws.dns_suffix(), "amazonaws.com");
        assert_eq!(Partition::AwsCn.dns_suffix(), "amazonaws.com.cn");
        assert_eq!(Partition::AwsIso.dns_suffix(), "c2s.ic.gov");
    }

    #[test]
    fn test_should_parse_partition() {
        assert_eq!("aws-us-gov".parse::<Partition>().ok(), Some(Partition::AwsUsGov));
        assert!(matches!(
            "aws-mars".parse::<Partition>(),
            Err(RustStackError::UnknownPartition(_))
        ));
    }

    #[test]
    fn test_should_classify_standard_partitions() {
        assert!(Partition::Aws.is_standard());
        assert!(Partition::AwsUsGov.is_standard());
        assert!(!Partition::AwsCn.is_standard());
        assert!(!Partition::AwsIsoB.is_standard());
    }
}
