//! Wire and declared-state model for S3 bucket sub-resources.
//!
//! [`types`] mirrors the request/response shapes of the bucket control plane
//! (one configuration document per facet), [`input`] holds the few request
//! envelopes that carry more than a bucket name, and [`resource`] holds the
//! user-facing declared state that the lifecycle manager converges toward.
#![allow(clippy::struct_excessive_bools)]

pub mod error;
pub mod input;
pub mod operations;
pub mod resource;
#[allow(missing_docs)]
pub mod types;

pub use error::{S3Error, S3ErrorCode};
pub use operations::BucketOperation;
pub use resource::{BucketAttributes, BucketFacets, DesiredBucketState, ObservedBucketState};
