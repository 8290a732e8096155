//! Convergent lifecycle manager for S3 buckets.
//!
//! Given a declared [`DesiredBucketState`](ruststack_bucket_model::DesiredBucketState),
//! the [`BucketManager`] drives a remote bucket control plane toward it with
//! independent, idempotent per-facet PUT/DELETE calls, tolerating the
//! eventual consistency of freshly created buckets.
//!
//! # Architecture
//!
//! ```text
//! BucketManager (create / read / update / delete)
//!        |
//!        +--> diff::plan -----------> FacetChangeSet
//!        |
//!        +--> orchestrator::reconcile (fixed apply order)
//!        |          |
//!        |          v
//!        |    FacetUpdater (codec expand, RetryPolicy)
//!        |
//!        +--> ReadBackReconciler (codec flatten, derived attributes)
//!                   |
//!                   v
//!              dyn BucketApi (remote control plane / InMemoryBucketApi)
//! ```

pub mod api;
pub mod codec;
pub mod config;
pub mod diff;
pub mod endpoint;
pub mod error;
pub mod facet;
pub mod manager;
pub mod memory;
pub mod orchestrator;
pub mod reconciler;
pub mod retry;
pub mod updater;
pub mod validation;

pub use api::BucketApi;
pub use config::BucketManagerConfig;
pub use error::{BucketError, BucketResult, ErrorKind};
pub use facet::{Facet, FacetChangeSet};
pub use manager::BucketManager;
pub use memory::{InMemoryBucketApi, RecordedCall};
pub use retry::{RetryError, RetryPolicy};
