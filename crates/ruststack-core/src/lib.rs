//! Core types shared across the RustStack bucket crates.
//!
//! This crate provides the foundational building blocks used by the bucket
//! model and lifecycle manager: AWS region identifiers, partition metadata
//! (DNS suffixes, ARN prefixes), and the common error type.

mod error;
mod partition;
mod types;

pub use error::{RustStackError, RustStackResult};
pub use partition::Partition;
pub use types::{AwsRegion, bucket_arn};
