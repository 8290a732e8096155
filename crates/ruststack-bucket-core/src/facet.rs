//! Bucket facets and change sets.
//!
//! A [`Facet`] names one independently configurable sub-resource. The
//! declaration order of the enum is the apply order used by the orchestrator,
//! so a [`FacetChangeSet`] iterates facets in the order they must land.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An independently configurable sub-resource of a bucket.
///
/// Variants are declared in apply order: versioning precedes replication,
/// and object lock comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Bucket tag set.
    Tags,
    /// Bucket policy document.
    Policy,
    /// CORS rules.
    Cors,
    /// Static website hosting.
    Website,
    /// Versioning and MFA delete.
    Versioning,
    /// Canned ACL.
    Acl,
    /// Explicit ACL grants.
    Grants,
    /// Access logging.
    Logging,
    /// Lifecycle rules.
    Lifecycle,
    /// Transfer acceleration.
    Acceleration,
    /// Request payer.
    RequestPayer,
    /// Replication.
    Replication,
    /// Default server-side encryption.
    ServerSideEncryption,
    /// Object lock.
    ObjectLock,
    /// The bucket resource itself (create, head, location, delete).
    Bucket,
}

impl Facet {
    /// Facets in the order the orchestrator applies them.
    pub const APPLY_ORDER: [Self; 14] = [
        Self::Tags,
        Self::Policy,
        Self::Cors,
        Self::Website,
        Self::Versioning,
        Self::Acl,
        Self::Grants,
        Self::Logging,
        Self::Lifecycle,
        Self::Acceleration,
        Self::RequestPayer,
        Self::Replication,
        Self::ServerSideEncryption,
        Self::ObjectLock,
    ];

    /// Returns the facet name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Policy => "policy",
            Self::Cors => "cors",
            Self::Website => "website",
            Self::Versioning => "versioning",
            Self::Acl => "acl",
            Self::Grants => "grants",
            Self::Logging => "logging",
            Self::Lifecycle => "lifecycle",
            Self::Acceleration => "acceleration",
            Self::RequestPayer => "request_payer",
            Self::Replication => "replication",
            Self::ServerSideEncryption => "server_side_encryption",
            Self::ObjectLock => "object_lock",
            Self::Bucket => "bucket",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of facets whose desired value differs from the remote value.
///
/// Iteration always follows [`Facet::APPLY_ORDER`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetChangeSet {
    facets: BTreeSet<Facet>,
}

impl FacetChangeSet {
    /// Create an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a facet as changed.
    pub fn insert(&mut self, facet: Facet) {
        self.facets.insert(facet);
    }

    /// Unmark a facet.
    pub fn remove(&mut self, facet: Facet) {
        self.facets.remove(&facet);
    }

    /// Whether a facet is marked as changed.
    #[must_use]
    pub fn contains(&self, facet: Facet) -> bool {
        self.facets.contains(&facet)
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Number of changed facets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Changed facets in apply order.
    pub fn iter(&self) -> impl Iterator<Item = Facet> + '_ {
        self.facets.iter().copied()
    }
}

impl FromIterator<Facet> for FacetChangeSet {
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        Self {
            facets: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FacetChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.facets.iter().map(Facet::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
