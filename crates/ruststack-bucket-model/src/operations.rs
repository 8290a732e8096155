//! Bucket control-plane operations.

/// All bucket control-plane operations used by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketOperation {
    /// The CreateBucket operation.
    CreateBucket,
    /// The HeadBucket operation.
    HeadBucket,
    /// The DeleteBucket operation.
    DeleteBucket,
    /// The GetBucketLocation operation.
    GetBucketLocation,
    /// The ListObjectVersions operation.
    ListObjectVersions,
    /// The DeleteObjects operation.
    DeleteObjects,
    /// The GetBucketTagging operation.
    GetBucketTagging,
    /// The PutBucketTagging operation.
    PutBucketTagging,
    /// The DeleteBucketTagging operation.
    DeleteBucketTagging,
    /// The GetBucketPolicy operation.
    GetBucketPolicy,
    /// The PutBucketPolicy operation.
    PutBucketPolicy,
    /// The DeleteBucketPolicy operation.
    DeleteBucketPolicy,
    /// The GetBucketCors operation.
    GetBucketCors,
    /// The PutBucketCors operation.
    PutBucketCors,
    /// The DeleteBucketCors operation.
    DeleteBucketCors,
    /// The GetBucketWebsite operation.
    GetBucketWebsite,
    /// The PutBucketWebsite operation.
    PutBucketWebsite,
    /// The DeleteBucketWebsite operation.
    DeleteBucketWebsite,
    /// The GetBucketVersioning operation.
    GetBucketVersioning,
    /// The PutBucketVersioning operation.
    PutBucketVersioning,
    /// The GetBucketAcl operation.
    GetBucketAcl,
    /// The PutBucketAcl operation.
    PutBucketAcl,
    /// The GetBucketLogging operation.
    GetBucketLogging,
    /// The PutBucketLogging operation.
    PutBucketLogging,
    /// The GetBucketLifecycleConfiguration operation.
    GetBucketLifecycleConfiguration,
    /// The PutBucketLifecycleConfiguration operation.
    PutBucketLifecycleConfiguration,
    /// The DeleteBucketLifecycle operation.
    DeleteBucketLifecycle,
    /// The GetBucketAccelerateConfiguration operation.
    GetBucketAccelerateConfiguration,
    /// The PutBucketAccelerateConfiguration operation.
    PutBucketAccelerateConfiguration,
    /// The GetBucketRequestPayment operation.
    GetBucketRequestPayment,
    /// The PutBucketRequestPayment operation.
    PutBucketRequestPayment,
    /// The GetBucketReplication operation.
    GetBucketReplication,
    /// The PutBucketReplication operation.
    PutBucketReplication,
    /// The DeleteBucketReplication operation.
    DeleteBucketReplication,
    /// The GetBucketEncryption operation.
    GetBucketEncryption,
    /// The PutBucketEncryption operation.
    PutBucketEncryption,
    /// The DeleteBucketEncryption operation.
    DeleteBucketEncryption,
    /// The GetObjectLockConfiguration operation.
    GetObjectLockConfiguration,
    /// The PutObjectLockConfiguration operation.
    PutObjectLockConfiguration,
}

impl BucketOperation {
    /// Returns the operation name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateBucket => "CreateBucket",
            Self::HeadBucket => "HeadBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::GetBucketLocation => "GetBucketLocation",
            Self::ListObjectVersions => "ListObjectVersions",
            Self::DeleteObjects => "DeleteObjects",
            Self::GetBucketTagging => "GetBucketTagging",
            Self::PutBucketTagging => "PutBucketTagging",
            Self::DeleteBucketTagging => "DeleteBucketTagging",
            Self::GetBucketPolicy => "GetBucketPolicy",
            Self::PutBucketPolicy => "PutBucketPolicy",
            Self::DeleteBucketPolicy => "DeleteBucketPolicy",
            Self::GetBucketCors => "GetBucketCors",
            Self::PutBucketCors => "PutBucketCors",
            Self::DeleteBucketCors => "DeleteBucketCors",
            Self::GetBucketWebsite => "GetBucketWebsite",
            Self::PutBucketWebsite => "PutBucketWebsite",
            Self::DeleteBucketWebsite => "DeleteBucketWebsite",
            Self::GetBucketVersioning => "GetBucketVersioning",
            Self::PutBucketVersioning => "PutBucketVersioning",
            Self::GetBucketAcl => "GetBucketAcl",
            Self::PutBucketAcl => "PutBucketAcl",
            Self::GetBucketLogging => "GetBucketLogging",
            Self::PutBucketLogging => "PutBucketLogging",
            Self::GetBucketLifecycleConfiguration => "GetBucketLifecycleConfiguration",
            Self::PutBucketLifecycleConfiguration => "PutBucketLifecycleConfiguration",
            Self::DeleteBucketLifecycle => "DeleteBucketLifecycle",
            Self::GetBucketAccelerateConfiguration => "GetBucketAccelerateConfiguration",
            Self::PutBucketAccelerateConfiguration => "PutBucketAccelerateConfiguration",
            Self::GetBucketRequestPayment => "GetBucketRequestPayment",
            Self::PutBucketRequestPayment => "PutBucketRequestPayment",
            Self::GetBucketReplication => "GetBucketReplication",
            Self::PutBucketReplication => "PutBucketReplication",
            Self::DeleteBucketReplication => "DeleteBucketReplication",
            Self::GetBucketEncryption => "GetBucketEncryption",
            Self::PutBucketEncryption => "PutBucketEncryption",
            Self::DeleteBucketEncryption => "DeleteBucketEncryption",
            Self::GetObjectLockConfiguration => "GetObjectLockConfiguration",
            Self::PutObjectLockConfiguration => "PutObjectLockConfiguration",
        }
    }

    /// Whether this operation mutates remote state.
    #[must_use]
    pub fn is_write(&self) -> bool {
        let name = self.as_str();
        name.starts_with("Put") || name.starts_with("Delete") || name.starts_with("Create")
    }
}

impl std::fmt::Display for BucketOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
