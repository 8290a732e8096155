//! Delete integration tests.

#[cfg(test)]
mod tests {
    use ruststack_bucket_core::manager::DELETE_OBJECTS_BATCH;
    use ruststack_bucket_core::{ErrorKind, Facet};
    use ruststack_bucket_model::resource::{
        ObjectLockConfig, ObjectLockRetentionConfig, VersioningConfig,
    };
    use ruststack_bucket_model::types::ObjectLockRetentionMode;
    use ruststack_bucket_model::{BucketFacets, BucketOperation, S3ErrorCode};
    use tokio_util::sync::CancellationToken;

    use crate::{create_test_bucket, test_manager};

    #[tokio::test]
    async fn test_should_refuse_non_empty_bucket_without_force() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "full", BucketFacets::default()).await;
        api.put_object(&bucket, "a.txt").expect("put object");

        let err = manager
            .delete(&bucket, false, &cancel)
            .await
            .expect_err("bucket not empty");

        assert_eq!(err.kind(), ErrorKind::Terminal);
        assert_eq!(err.facet(), Facet::Bucket);
        assert_eq!(err.bucket(), bucket);
        assert!(
            err.api_error()
                .is_some_and(|e| e.is(S3ErrorCode::BucketNotEmpty))
        );
        assert!(api.bucket_exists(&bucket));
        assert_eq!(api.call_count(BucketOperation::DeleteObjects), 0);
    }

    #[tokio::test]
    async fn test_should_empty_and_delete_with_force() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(
            &api,
            &manager,
            "force",
            BucketFacets::builder()
                .versioning(VersioningConfig::enabled())
                .build(),
        )
        .await;
        for i in 0..DELETE_OBJECTS_BATCH + 5 {
            api.put_object(&bucket, &format!("key-{i}")).expect("put object");
        }

        manager.delete(&bucket, true, &cancel).await.expect("delete");

        assert!(!api.bucket_exists(&bucket));
        assert_eq!(api.call_count(BucketOperation::DeleteObjects), 2);
        assert!(manager.read(&bucket, &cancel).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn test_should_empty_again_when_writer_races_delete() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "racing", BucketFacets::default()).await;
        api.put_object(&bucket, "a.txt").expect("put object");
        api.write_after_listing(&bucket, 2);

        manager.delete(&bucket, true, &cancel).await.expect("delete");

        assert!(!api.bucket_exists(&bucket));
        assert_eq!(api.call_count(BucketOperation::ListObjectVersions), 3);
        assert_eq!(api.call_count(BucketOperation::DeleteBucket), 4);
    }

    #[tokio::test]
    async fn test_should_bypass_governance_retention_when_forced() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(
            &api,
            &manager,
            "locked",
            BucketFacets::builder()
                .object_lock(ObjectLockConfig {
                    enabled: true,
                    rule: Some(ObjectLockRetentionConfig {
                        mode: ObjectLockRetentionMode::Governance,
                        days: Some(1),
                        years: None,
                    }),
                })
                .build(),
        )
        .await;
        api.put_object(&bucket, "locked.txt").expect("put object");

        manager.delete(&bucket, true, &cancel).await.expect("delete");
        assert!(!api.bucket_exists(&bucket));
    }

    #[tokio::test]
    async fn test_should_succeed_when_bucket_already_gone() {
        let (api, manager) = test_manager();
        manager
            .delete("never-created", true, &CancellationToken::new())
            .await
            .expect("delete");
        assert_eq!(api.call_count(BucketOperation::DeleteBucket), 1);
    }
}
