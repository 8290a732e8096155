//! Sub-resource codec.
//!
//! One `expand_*`/`flatten_*` pair per facet converts between the declared
//! configuration in [`ruststack_bucket_model::resource`] and the wire
//! documents in [`ruststack_bucket_model::types`]. All functions are pure.
//!
//! `flatten(expand(x)) == x` holds for every valid `x`, modulo the server-side
//! defaults documented on each module (generated lifecycle rule ids, empty
//! prefixes, the replication priority default).

pub mod access;
pub mod cors;
pub mod encryption;
pub mod lifecycle;
pub mod logging;
pub mod object_lock;
pub mod policy;
pub mod replication;
pub mod settings;
pub mod tags;
pub mod website;

/// Map an empty string to `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_owned)
}
