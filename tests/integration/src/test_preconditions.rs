//! Cross-facet rules and access control integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ruststack_bucket_core::memory::DEFAULT_OWNER_ID;
    use ruststack_bucket_core::{BucketApi, ErrorKind, Facet};
    use ruststack_bucket_model::resource::{
        GrantConfig, LifecycleRuleConfig, ObjectLockConfig, ReplicationConfig,
        ReplicationDestinationConfig, ReplicationRuleConfig, VersioningConfig,
    };
    use ruststack_bucket_model::types::{BucketCannedACL, Permission, Type};
    use ruststack_bucket_model::{BucketFacets, BucketOperation};
    use tokio_util::sync::CancellationToken;

    use crate::{create_test_bucket, desired, test_manager};

    fn replication() -> ReplicationConfig {
        ReplicationConfig {
            role: "arn:aws:iam::123456789012:role/replication".to_owned(),
            rules: vec![ReplicationRuleConfig {
                id: Some("legacy".to_owned()),
                enabled: true,
                prefix: Some("docs/".to_owned()),
                destination: ReplicationDestinationConfig {
                    bucket: "arn:aws:s3:::replica".to_owned(),
                    ..ReplicationDestinationConfig::default()
                },
                ..ReplicationRuleConfig::default()
            }],
        }
    }

    fn grant(id: &str, permission: Permission) -> GrantConfig {
        GrantConfig {
            grantee_type: Type::CanonicalUser,
            id: Some(id.to_owned()),
            uri: None,
            permissions: BTreeSet::from([permission]),
        }
    }

    #[tokio::test]
    async fn test_should_reject_replication_without_versioning() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "repl", BucketFacets::default()).await;

        let state = desired(
            &bucket,
            BucketFacets::builder().replication(replication()).build(),
        );
        let err = manager
            .update(&bucket, &state, &cancel)
            .await
            .expect_err("versioning is off");

        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(err.facet(), Facet::Replication);
        assert_eq!(err.bucket(), bucket);
        assert_eq!(api.call_count(BucketOperation::PutBucketReplication), 0);
    }

    #[tokio::test]
    async fn test_should_apply_replication_after_versioning_in_same_pass() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "repl", BucketFacets::default()).await;

        let state = desired(
            &bucket,
            BucketFacets::builder()
                .versioning(VersioningConfig::enabled())
                .replication(replication())
                .build(),
        );
        let observed = manager.update(&bucket, &state, &cancel).await.expect("update");

        assert_eq!(api.call_count(BucketOperation::PutBucketReplication), 1);
        let rules = observed.facets.replication.expect("replication").rules;
        assert_eq!(rules[0].prefix.as_deref(), Some("docs/"));
        assert_eq!(rules[0].priority, None);
    }

    #[tokio::test]
    async fn test_should_send_noop_expiration_for_actionless_rule() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "noop", BucketFacets::default()).await;

        let state = desired(
            &bucket,
            BucketFacets::builder()
                .lifecycle_rules(vec![
                    LifecycleRuleConfig::builder().id("keep").prefix("tmp/").build(),
                ])
                .build(),
        );
        let observed = manager.update(&bucket, &state, &cancel).await.expect("update");

        let stored = api
            .get_bucket_lifecycle_configuration(&bucket)
            .await
            .expect("stored lifecycle");
        let expiration = stored.rules[0].expiration.clone().expect("noop expiration");
        assert_eq!(expiration.expired_object_delete_marker, Some(false));
        assert!(expiration.days.is_none());
        assert!(expiration.date.is_none());

        let rules = observed.facets.lifecycle_rules.expect("lifecycle rules");
        assert_eq!(rules.len(), 1);
        assert!(rules[0].expiration.is_none());

        api.clear_calls();
        manager.update(&bucket, &state, &cancel).await.expect("update");
        assert!(api.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_fall_back_to_canned_acl_when_grants_cleared() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let grants = vec![
            grant(DEFAULT_OWNER_ID, Permission::FullControl),
            grant("a1b2c3d4e5f6", Permission::Read),
        ];
        let bucket = create_test_bucket(
            &api,
            &manager,
            "grants",
            BucketFacets::builder().grants(grants).build(),
        )
        .await;
        let observed = manager.read(&bucket, &cancel).await.expect("read").expect("exists");
        assert_eq!(observed.facets.acl, None);
        assert_eq!(observed.facets.grants.as_ref().map(Vec::len), Some(2));

        let cleared = desired(
            &bucket,
            BucketFacets::builder()
                .acl(BucketCannedACL::Private)
                .grants(Vec::new())
                .build(),
        );
        let observed = manager.update(&bucket, &cleared, &cancel).await.expect("update");

        let acl_puts: Vec<_> = api
            .write_calls()
            .into_iter()
            .filter(|c| c.operation == BucketOperation::PutBucketAcl)
            .collect();
        assert_eq!(acl_puts.len(), 1);
        assert_eq!(acl_puts[0].canned_acl, Some(BucketCannedACL::Private));
        assert_eq!(observed.facets.acl, Some(BucketCannedACL::Private));
    }

    #[tokio::test]
    async fn test_should_reject_canned_acl_with_grants_before_any_call() {
        let (api, manager) = test_manager();
        let state = desired(
            "conflicting-acl",
            BucketFacets::builder()
                .acl(BucketCannedACL::PublicRead)
                .grants(vec![grant(DEFAULT_OWNER_ID, Permission::FullControl)])
                .build(),
        );
        let err = manager
            .create(&state, &CancellationToken::new())
            .await
            .expect_err("acl conflicts with grants");

        assert_eq!(err.kind(), ErrorKind::Terminal);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_refuse_to_enable_object_lock_on_existing_bucket() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "lock", BucketFacets::default()).await;

        let state = desired(
            &bucket,
            BucketFacets::builder()
                .object_lock(ObjectLockConfig {
                    enabled: true,
                    rule: None,
                })
                .build(),
        );
        let err = manager
            .update(&bucket, &state, &cancel)
            .await
            .expect_err("object lock is create-only");

        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(err.facet(), Facet::ObjectLock);
        assert_eq!(api.call_count(BucketOperation::PutObjectLockConfiguration), 0);
    }
}
