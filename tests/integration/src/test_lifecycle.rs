//! Create / read / update integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ruststack_bucket_core::codec::policy::policies_equivalent;
    use ruststack_bucket_model::resource::{
        CorsRuleConfig, LifecycleExpirationConfig, LifecycleRuleConfig, LoggingConfig,
        ReplicationConfig, ReplicationDestinationConfig, ReplicationFilterConfig,
        ReplicationRuleConfig, ServerSideEncryptionConfig, ServerSideEncryptionRuleConfig,
        VersioningConfig, WebsiteConfig,
    };
    use ruststack_bucket_model::types::{BucketAccelerateStatus, Payer, ServerSideEncryption};
    use ruststack_bucket_model::{BucketFacets, BucketOperation};
    use tokio_util::sync::CancellationToken;

    use crate::{create_test_bucket, desired, test_bucket_name, test_manager};

    fn expire_logs_rule() -> LifecycleRuleConfig {
        LifecycleRuleConfig::builder()
            .id("expire-logs")
            .prefix("logs/")
            .expiration(LifecycleExpirationConfig::after_days(30))
            .build()
    }

    fn policy_for(bucket: &str) -> String {
        format!(
            r#"{{"Version":"2012-10-17","Statement":[{{"Sid":"PublicRead","Effect":"Allow","Principal":"*","Action":"s3:GetObject","Resource":"arn:aws:s3:::{bucket}/*"}}]}}"#
        )
    }

    fn full_facets(bucket: &str, log_bucket: &str) -> BucketFacets {
        BucketFacets::builder()
            .tags(BTreeMap::from([
                ("env".to_owned(), "test".to_owned()),
                ("team".to_owned(), "storage".to_owned()),
            ]))
            .policy(policy_for(bucket))
            .cors_rules(vec![CorsRuleConfig {
                allowed_headers: vec!["*".to_owned()],
                allowed_methods: vec!["GET".to_owned(), "PUT".to_owned()],
                allowed_origins: vec!["https://example.com".to_owned()],
                expose_headers: vec!["ETag".to_owned()],
                max_age_seconds: Some(3000),
            }])
            .website(WebsiteConfig {
                index_document: Some("index.html".to_owned()),
                error_document: Some("error.html".to_owned()),
                ..WebsiteConfig::default()
            })
            .versioning(VersioningConfig::enabled())
            .logging(LoggingConfig {
                target_bucket: log_bucket.to_owned(),
                target_prefix: Some("access/".to_owned()),
            })
            .lifecycle_rules(vec![expire_logs_rule()])
            .acceleration_status(BucketAccelerateStatus::Enabled)
            .request_payer(Payer::Requester)
            .replication(ReplicationConfig {
                role: "arn:aws:iam::123456789012:role/replication".to_owned(),
                rules: vec![ReplicationRuleConfig {
                    id: Some("replicate-all".to_owned()),
                    enabled: true,
                    priority: Some(1),
                    filter: Some(ReplicationFilterConfig::default()),
                    destination: ReplicationDestinationConfig {
                        bucket: "arn:aws:s3:::replica".to_owned(),
                        ..ReplicationDestinationConfig::default()
                    },
                    ..ReplicationRuleConfig::default()
                }],
            })
            .server_side_encryption(ServerSideEncryptionConfig {
                rules: vec![ServerSideEncryptionRuleConfig {
                    sse_algorithm: ServerSideEncryption::Aes256,
                    kms_master_key_id: None,
                    bucket_key_enabled: true,
                }],
            })
            .build()
    }

    #[tokio::test]
    async fn test_should_converge_versioned_bucket_with_lifecycle_rule() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let state = desired(
            "b1",
            BucketFacets::builder()
                .versioning(VersioningConfig::enabled())
                .lifecycle_rules(vec![expire_logs_rule()])
                .build(),
        );

        manager.create(&state, &cancel).await.expect("create");

        let writes: Vec<BucketOperation> =
            api.write_calls().iter().map(|c| c.operation).collect();
        let versioning_at = writes
            .iter()
            .position(|op| *op == BucketOperation::PutBucketVersioning)
            .expect("versioning put");
        let lifecycle_at = writes
            .iter()
            .position(|op| *op == BucketOperation::PutBucketLifecycleConfiguration)
            .expect("lifecycle put");
        assert!(versioning_at < lifecycle_at);

        let observed = manager.read("b1", &cancel).await.expect("read").expect("exists");
        assert_eq!(observed.facets.versioning, Some(VersioningConfig::enabled()));
        let rules = observed.facets.lifecycle_rules.expect("lifecycle rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id.as_deref(), Some("expire-logs"));
        assert_eq!(rules[0].prefix.as_deref(), Some("logs/"));
        assert_eq!(rules[0].expiration.as_ref().and_then(|e| e.days), Some(30));

        api.clear_calls();
        manager.update("b1", &state, &cancel).await.expect("update");
        assert!(api.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_round_trip_every_facet() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let log_bucket =
            create_test_bucket(&api, &manager, "logs", BucketFacets::default()).await;
        let bucket = test_bucket_name("full");
        let facets = full_facets(&bucket, &log_bucket);

        manager
            .create(&desired(&bucket, facets.clone()), &cancel)
            .await
            .expect("create");
        let observed = manager.read_new(&bucket, &cancel).await.expect("read");

        assert_eq!(observed.bucket, bucket);
        assert_eq!(observed.facets.tags, facets.tags);
        assert!(policies_equivalent(
            observed.facets.policy.as_deref().expect("policy"),
            facets.policy.as_deref().expect("policy"),
        ));
        assert_eq!(observed.facets.cors_rules, facets.cors_rules);
        assert_eq!(observed.facets.website, facets.website);
        assert_eq!(observed.facets.versioning, facets.versioning);
        assert_eq!(observed.facets.logging, facets.logging);
        assert_eq!(observed.facets.lifecycle_rules, facets.lifecycle_rules);
        assert_eq!(
            observed.facets.acceleration_status,
            Some(BucketAccelerateStatus::Enabled)
        );
        assert_eq!(observed.facets.request_payer, Some(Payer::Requester));
        assert_eq!(
            observed.facets.server_side_encryption,
            facets.server_side_encryption
        );
        let replication = observed.facets.replication.expect("replication");
        assert_eq!(replication.rules.len(), 1);
        assert_eq!(replication.rules[0].priority, Some(1));

        assert_eq!(observed.attributes.arn, format!("arn:aws:s3:::{bucket}"));
        assert_eq!(observed.attributes.region, "us-east-1");
        assert!(observed.attributes.website_endpoint.is_some());
    }

    #[tokio::test]
    async fn test_should_make_no_writes_when_already_converged() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let log_bucket =
            create_test_bucket(&api, &manager, "logs", BucketFacets::default()).await;
        let bucket = test_bucket_name("idem");
        let state = desired(&bucket, full_facets(&bucket, &log_bucket));

        manager.create(&state, &cancel).await.expect("create");
        api.clear_calls();

        let first = manager.update(&bucket, &state, &cancel).await.expect("update");
        assert!(api.write_calls().is_empty());

        let second = manager.update(&bucket, &state, &cancel).await.expect("update");
        assert!(api.write_calls().is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_should_converge_expiration_declaring_days_and_delete_marker() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let rule = LifecycleRuleConfig::builder()
            .id("r")
            .expiration(LifecycleExpirationConfig {
                days: Some(30),
                expired_object_delete_marker: true,
                ..LifecycleExpirationConfig::default()
            })
            .build();
        let facets = BucketFacets::builder()
            .lifecycle_rules(vec![rule])
            .build();
        let bucket = create_test_bucket(&api, &manager, "mixed", facets.clone()).await;
        let state = desired(&bucket, facets);

        manager.update(&bucket, &state, &cancel).await.expect("update");
        assert!(api.write_calls().is_empty());
        manager.update(&bucket, &state, &cancel).await.expect("update");
        assert!(api.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_only_touch_changed_facets() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let facets = BucketFacets::builder()
            .versioning(VersioningConfig::enabled())
            .tags(BTreeMap::from([("env".to_owned(), "test".to_owned())]))
            .build();
        let bucket = create_test_bucket(&api, &manager, "delta", facets.clone()).await;

        let changed = BucketFacets {
            tags: Some(BTreeMap::from([("env".to_owned(), "prod".to_owned())])),
            ..facets
        };
        let observed = manager
            .update(&bucket, &desired(&bucket, changed), &cancel)
            .await
            .expect("update");

        let writes: Vec<BucketOperation> =
            api.write_calls().iter().map(|c| c.operation).collect();
        assert_eq!(writes, vec![BucketOperation::PutBucketTagging]);
        assert_eq!(
            observed.facets.tags.and_then(|t| t.get("env").cloned()),
            Some("prod".to_owned())
        );
    }

    #[tokio::test]
    async fn test_should_remove_facets_declared_empty() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(
            &api,
            &manager,
            "clear",
            BucketFacets::builder()
                .tags(BTreeMap::from([("env".to_owned(), "test".to_owned())]))
                .lifecycle_rules(vec![expire_logs_rule()])
                .build(),
        )
        .await;

        let cleared = BucketFacets::builder()
            .tags(BTreeMap::new())
            .lifecycle_rules(Vec::new())
            .build();
        let observed = manager
            .update(&bucket, &desired(&bucket, cleared.clone()), &cancel)
            .await
            .expect("update");

        assert_eq!(api.call_count(BucketOperation::DeleteBucketTagging), 1);
        assert_eq!(api.call_count(BucketOperation::DeleteBucketLifecycle), 1);
        assert!(observed.facets.tags.is_none_or(|t| t.is_empty()));
        assert!(observed.facets.lifecycle_rules.is_none_or(|r| r.is_empty()));

        api.clear_calls();
        manager
            .update(&bucket, &desired(&bucket, cleared), &cancel)
            .await
            .expect("update");
        assert!(api.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_report_deleted_bucket_as_gone() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "gone", BucketFacets::default()).await;

        manager.delete(&bucket, false, &cancel).await.expect("delete");
        assert!(manager.read(&bucket, &cancel).await.expect("read").is_none());
    }
}
