//! Eventual consistency, cancellation, and degraded-backend integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use ruststack_bucket_core::{BucketManager, ErrorKind, Facet};
    use ruststack_bucket_model::resource::VersioningConfig;
    use ruststack_bucket_model::types::BucketAccelerateStatus;
    use ruststack_bucket_model::{BucketFacets, BucketOperation, S3ErrorCode};
    use tokio_util::sync::CancellationToken;

    use crate::{create_test_bucket, desired, test_bucket_name, test_manager, test_manager_in};

    fn tagged() -> BucketFacets {
        BucketFacets::builder()
            .tags(BTreeMap::from([("env".to_owned(), "test".to_owned())]))
            .build()
    }

    #[tokio::test]
    async fn test_should_retry_until_new_bucket_is_visible() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        api.fail_operation(BucketOperation::HeadBucket, S3ErrorCode::NoSuchBucket, Some(2));
        api.fail_operation(
            BucketOperation::PutBucketTagging,
            S3ErrorCode::NoSuchBucket,
            Some(3),
        );
        let bucket = test_bucket_name("lag");

        manager
            .create(&desired(&bucket, tagged()), &cancel)
            .await
            .expect("create");

        assert_eq!(api.call_count(BucketOperation::PutBucketTagging), 4);
        let observed = manager.read(&bucket, &cancel).await.expect("read").expect("exists");
        assert_eq!(observed.facets.tags, tagged().tags);
    }

    #[tokio::test]
    async fn test_should_time_out_when_bucket_stays_invisible_to_writes() {
        let (api, manager) = test_manager();
        api.fail_operation(BucketOperation::PutBucketTagging, S3ErrorCode::NoSuchBucket, None);
        let bucket = test_bucket_name("never");

        let err = manager
            .create(&desired(&bucket, tagged()), &CancellationToken::new())
            .await
            .expect_err("tags never land");

        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.is_retryable());
        assert_eq!(err.facet(), Facet::Tags);
        assert!(api.call_count(BucketOperation::PutBucketTagging) > 1);
    }

    #[tokio::test]
    async fn test_should_retry_read_of_new_bucket() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "fresh", BucketFacets::default()).await;
        api.fail_operation(BucketOperation::HeadBucket, S3ErrorCode::NoSuchBucket, Some(2));

        let observed = manager.read_new(&bucket, &cancel).await.expect("read");
        assert_eq!(observed.bucket, bucket);
        assert_eq!(api.call_count(BucketOperation::HeadBucket), 3);
    }

    #[tokio::test]
    async fn test_should_stop_before_any_call_when_cancelled() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = manager
            .create(&desired(&test_bucket_name("cancel"), tagged()), &cancel)
            .await
            .expect_err("cancelled");

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.facet(), Facet::Bucket);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_stop_retrying_when_cancelled() {
        let (api, manager) = test_manager();
        let bucket = create_test_bucket(&api, &manager, "abort", BucketFacets::default()).await;
        api.fail_operation(BucketOperation::PutBucketTagging, S3ErrorCode::NoSuchBucket, None);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let mut config = manager.config().clone();
        config.update_timeout_secs = 600;
        let manager = BucketManager::new(api.clone(), config);
        let err = manager
            .update(&bucket, &desired(&bucket, tagged()), &cancel)
            .await
            .expect_err("cancelled");

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.facet(), Facet::Tags);
        assert_eq!(err.bucket(), bucket);
    }

    #[tokio::test]
    async fn test_should_read_bucket_when_acceleration_is_unsupported() {
        let (api, manager) = test_manager();
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(
            &api,
            &manager,
            "accel",
            BucketFacets::builder()
                .versioning(VersioningConfig::enabled())
                .build(),
        )
        .await;
        api.fail_operation(
            BucketOperation::GetBucketAccelerateConfiguration,
            S3ErrorCode::MethodNotAllowed,
            None,
        );

        let observed = manager.read(&bucket, &cancel).await.expect("read").expect("exists");
        assert_eq!(observed.facets.acceleration_status, None);
        assert_eq!(observed.facets.versioning, Some(VersioningConfig::enabled()));
    }

    #[tokio::test]
    async fn test_should_surface_unsupported_acceleration_write() {
        let (api, manager) = test_manager();
        let bucket = create_test_bucket(&api, &manager, "accel", BucketFacets::default()).await;
        api.fail_operation(
            BucketOperation::PutBucketAccelerateConfiguration,
            S3ErrorCode::NotImplemented,
            None,
        );

        let state = desired(
            &bucket,
            BucketFacets::builder()
                .acceleration_status(BucketAccelerateStatus::Enabled)
                .build(),
        );
        let err = manager
            .update(&bucket, &state, &CancellationToken::new())
            .await
            .expect_err("unsupported");

        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.facet(), Facet::Acceleration);
    }

    #[tokio::test]
    async fn test_should_degrade_object_lock_read_outside_standard_partitions() {
        let (api, manager) = test_manager_in("cn-north-1");
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "china", BucketFacets::default()).await;
        api.fail_operation(
            BucketOperation::GetObjectLockConfiguration,
            S3ErrorCode::AccessDenied,
            None,
        );

        let observed = manager.read(&bucket, &cancel).await.expect("read").expect("exists");
        assert!(observed.facets.object_lock.is_none());
        assert_eq!(observed.attributes.region, "cn-north-1");
        assert_eq!(observed.attributes.arn, format!("arn:aws-cn:s3:::{bucket}"));
        assert_eq!(
            observed.attributes.bucket_domain_name,
            format!("{bucket}.s3.amazonaws.com.cn")
        );
    }

    #[tokio::test]
    async fn test_should_fail_object_lock_read_in_standard_partition() {
        let (api, manager) = test_manager_in("us-west-2");
        let cancel = CancellationToken::new();
        let bucket = create_test_bucket(&api, &manager, "west", BucketFacets::default()).await;
        api.fail_operation(
            BucketOperation::GetObjectLockConfiguration,
            S3ErrorCode::AccessDenied,
            None,
        );

        let err = manager.read(&bucket, &cancel).await.expect_err("access denied");
        assert_eq!(err.facet(), Facet::ObjectLock);
        assert_eq!(err.kind(), ErrorKind::Terminal);
    }
}
