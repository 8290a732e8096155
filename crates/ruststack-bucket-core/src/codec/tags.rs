//! Tag set codec.
//!
//! Tags are declared as an ordered map. Keys with the reserved `aws:` prefix
//! are managed by AWS services and never reported back.

use std::collections::BTreeMap;

use ruststack_bucket_model::types::{Tag, Tagging};

/// Prefix of system-managed tag keys.
pub const SYSTEM_TAG_PREFIX: &str = "aws:";

/// Convert a tag map into a wire tag list.
#[must_use]
pub fn expand_tag_set(tags: &BTreeMap<String, String>) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Convert a wire tag list into a tag map, dropping system tags.
#[must_use]
pub fn flatten_tag_set(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .filter(|t| !t.key.starts_with(SYSTEM_TAG_PREFIX))
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

/// Drop system tags from a declared tag map.
#[must_use]
pub fn without_system_tags(tags: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    tags.iter()
        .filter(|(k, _)| !k.starts_with(SYSTEM_TAG_PREFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Expand the bucket tag set.
#[must_use]
pub fn expand_tagging(tags: &BTreeMap<String, String>) -> Tagging {
    Tagging {
        tag_set: expand_tag_set(tags),
    }
}

/// Flatten the bucket tag set.
#[must_use]
pub fn flatten_tagging(tagging: &Tagging) -> BTreeMap<String, String> {
    flatten_tag_set(&tagging.tag_set)
}
