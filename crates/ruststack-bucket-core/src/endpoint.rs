//! Derived bucket attributes.
//!
//! ARN, domain names, the hosted zone id, and website endpoints are computed
//! from the bucket name and its region rather than read as facets.

use ruststack_bucket_model::BucketAttributes;
use ruststack_core::{AwsRegion, Partition, bucket_arn};

/// Regions whose website endpoint uses the legacy dash form
/// (`s3-website-{region}.amazonaws.com`).
const LEGACY_WEBSITE_REGIONS: &[&str] = &[
    "ap-northeast-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "eu-west-1",
    "sa-east-1",
    "us-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];

/// Route 53 hosted zone ids of the S3 website endpoints.
const HOSTED_ZONE_IDS: &[(&str, &str)] = &[
    ("af-south-1", "Z83WF9RJE8B12"),
    ("ap-east-1", "ZNB98KWMFR0R6"),
    ("ap-northeast-1", "Z2M4EHUR26P7ZW"),
    ("ap-northeast-2", "Z3W03O7B5YMIYP"),
    ("ap-northeast-3", "Z2YQB5RD63NC85"),
    ("ap-south-1", "Z11RGJOFQNVJUP"),
    ("ap-southeast-1", "Z3O0J2DXBE1FTB"),
    ("ap-southeast-2", "Z1WCIGYICN2BYD"),
    ("ca-central-1", "Z1QDHH18159H29"),
    ("cn-north-1", "Z5CN8UMXT92WN"),
    ("cn-northwest-1", "Z282HJ1KT0DH03"),
    ("eu-central-1", "Z21DNDUVLTQW6Q"),
    ("eu-north-1", "Z3BAZG2TWCNX0D"),
    ("eu-south-1", "Z30OZKI7KPW7MI"),
    ("eu-west-1", "Z1BKCTXD74EZPE"),
    ("eu-west-2", "Z3GKZC51ZF0DB4"),
    ("eu-west-3", "Z3R1K369G5AVDG"),
    ("me-south-1", "Z1MPMWCPA7YB62"),
    ("sa-east-1", "Z7KQH4QJS55SO"),
    ("us-east-1", "Z3AQBSTGFYJSTF"),
    ("us-east-2", "Z2O1EMRO9K5GLX"),
    ("us-gov-east-1", "Z2NIFVYYW2VKV1"),
    ("us-gov-west-1", "Z31GFT0UA1I2HV"),
    ("us-west-1", "Z2F56UZL2M1ACD"),
    ("us-west-2", "Z3BJ6K6RIION7M"),
];

/// Hosted zone id of the S3 website endpoint in `region`.
#[must_use]
pub fn hosted_zone_id(region: &AwsRegion) -> Option<&'static str> {
    HOSTED_ZONE_IDS
        .iter()
        .find(|(r, _)| *r == region.as_str())
        .map(|(_, id)| *id)
}

/// Website domain of `region`.
#[must_use]
pub fn website_domain(region: &AwsRegion) -> String {
    let name = region.as_str();
    if LEGACY_WEBSITE_REGIONS.contains(&name) {
        format!("s3-website-{name}.amazonaws.com")
    } else {
        let partition = Partition::for_region(region);
        format!("s3-website.{name}.{}", partition.dns_suffix())
    }
}

/// Region-specific virtual-hosted domain name.
#[must_use]
pub fn regional_domain_name(bucket: &str, region: &AwsRegion) -> String {
    if region.is_default() {
        format!("{bucket}.s3.amazonaws.com")
    } else {
        let partition = Partition::for_region(region);
        format!("{bucket}.s3.{}.{}", region.as_str(), partition.dns_suffix())
    }
}

/// Compute every derived attribute of `bucket` in `region`.
///
/// Website fields are filled only when `website_configured` is set.
#[must_use]
pub fn derive_attributes(
    bucket: &str,
    region: &AwsRegion,
    website_configured: bool,
) -> BucketAttributes {
    let partition = Partition::for_region(region);
    let (website_endpoint, website_domain) = if website_configured {
        let domain = website_domain(region);
        (Some(format!("{bucket}.{domain}")), Some(domain))
    } else {
        (None, None)
    };

    BucketAttributes {
        arn: bucket_arn(partition, bucket),
        region: region.as_str().to_owned(),
        bucket_domain_name: format!("{bucket}.s3.{}", partition.dns_suffix()),
        bucket_regional_domain_name: regional_domain_name(bucket, region),
        hosted_zone_id: hosted_zone_id(region).map(str::to_owned),
        website_endpoint,
        website_domain,
    }
}
