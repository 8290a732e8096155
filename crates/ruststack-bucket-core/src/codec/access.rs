//! Access control codec: canned ACL templates and explicit grants.
//!
//! The remote side always stores an ACL as a grant list plus an owner. A
//! canned ACL is a template for that list, so the observed canned ACL is
//! inferred by matching the stored grants against every template.

use std::collections::BTreeMap;

use ruststack_bucket_model::resource::GrantConfig;
use ruststack_bucket_model::types::{
    AccessControlPolicy, BucketCannedACL, Grant, Grantee, Owner, Permission, Type,
};

/// Grantee URI of the "everyone" group.
pub const ALL_USERS_GROUP: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// Grantee URI of the "any authenticated AWS account" group.
pub const AUTHENTICATED_USERS_GROUP: &str =
    "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// Grantee URI of the S3 log delivery group.
pub const LOG_DELIVERY_GROUP: &str = "http://acs.amazonaws.com/groups/s3/LogDelivery";

const CANNED_ACLS: [BucketCannedACL; 5] = [
    BucketCannedACL::Private,
    BucketCannedACL::PublicRead,
    BucketCannedACL::PublicReadWrite,
    BucketCannedACL::AuthenticatedRead,
    BucketCannedACL::LogDeliveryWrite,
];

fn owner_grant(owner: &Owner) -> Grant {
    Grant {
        grantee: Some(Grantee {
            display_name: owner.display_name.clone(),
            id: owner.id.clone(),
            r#type: Type::CanonicalUser,
            ..Grantee::default()
        }),
        permission: Some(Permission::FullControl),
    }
}

fn group_grant(uri: &str, permission: Permission) -> Grant {
    Grant {
        grantee: Some(Grantee {
            r#type: Type::Group,
            uri: Some(uri.to_owned()),
            ..Grantee::default()
        }),
        permission: Some(permission),
    }
}

/// The access control policy a canned ACL stands for.
#[must_use]
pub fn canned_acl_policy(acl: BucketCannedACL, owner: &Owner) -> AccessControlPolicy {
    let mut grants = vec![owner_grant(owner)];
    match acl {
        BucketCannedACL::Private => {}
        BucketCannedACL::PublicRead => {
            grants.push(group_grant(ALL_USERS_GROUP, Permission::Read));
        }
        BucketCannedACL::PublicReadWrite => {
            grants.push(group_grant(ALL_USERS_GROUP, Permission::Read));
            grants.push(group_grant(ALL_USERS_GROUP, Permission::Write));
        }
        BucketCannedACL::AuthenticatedRead => {
            grants.push(group_grant(AUTHENTICATED_USERS_GROUP, Permission::Read));
        }
        BucketCannedACL::LogDeliveryWrite => {
            grants.push(group_grant(LOG_DELIVERY_GROUP, Permission::Write));
            grants.push(group_grant(LOG_DELIVERY_GROUP, Permission::ReadAcp));
        }
    }
    AccessControlPolicy {
        grants,
        owner: Some(owner.clone()),
    }
}

/// Expand declared grants into an access control policy owned by `owner`.
///
/// Each (grantee, permission) pair becomes one wire grant.
#[must_use]
pub fn expand_grants(grants: &[GrantConfig], owner: Owner) -> AccessControlPolicy {
    let grants = grants
        .iter()
        .flat_map(|grant| {
            grant.permissions.iter().map(|permission| Grant {
                grantee: Some(Grantee {
                    id: grant.id.clone(),
                    r#type: grant.grantee_type,
                    uri: grant.uri.clone(),
                    ..Grantee::default()
                }),
                permission: Some(*permission),
            })
        })
        .collect();
    AccessControlPolicy {
        grants,
        owner: Some(owner),
    }
}

/// Flatten an access control policy into grants grouped per grantee, sorted.
#[must_use]
pub fn flatten_grants(policy: &AccessControlPolicy) -> Vec<GrantConfig> {
    let mut grouped: BTreeMap<(Type, Option<String>, Option<String>), GrantConfig> =
        BTreeMap::new();
    for grant in &policy.grants {
        let (Some(grantee), Some(permission)) = (&grant.grantee, grant.permission) else {
            continue;
        };
        let key = (grantee.r#type, grantee.id.clone(), grantee.uri.clone());
        grouped
            .entry(key)
            .or_insert_with(|| GrantConfig {
                grantee_type: grantee.r#type,
                id: grantee.id.clone(),
                uri: grantee.uri.clone(),
                ..GrantConfig::default()
            })
            .permissions
            .insert(permission);
    }
    grouped.into_values().collect()
}

/// Normalize declared grants for comparison: merge duplicate grantees, sort.
#[must_use]
pub fn normalize_grants(grants: &[GrantConfig]) -> Vec<GrantConfig> {
    flatten_grants(&expand_grants(grants, Owner::default()))
}

/// Infer the canned ACL a stored policy was created from, if any.
#[must_use]
pub fn infer_canned_acl(policy: &AccessControlPolicy) -> Option<BucketCannedACL> {
    let owner = policy.owner.clone().unwrap_or_default();
    let observed = flatten_grants(policy);
    CANNED_ACLS
        .into_iter()
        .find(|acl| flatten_grants(&canned_acl_policy(*acl, &owner)) == observed)
}
