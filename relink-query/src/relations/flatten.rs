//! Re-aligning fetched targets with their sources.
//!
//! Both flatteners return exactly one entry per source key, in source order.
//! Sources without a match (or without a key at all) get `None` or an empty
//! list respectively.

use crate::identifier::{Identifier, NormalizedKey, normalize_key};
use crate::relations::lookup::{ReduceAsArray, ReduceAsSingleItem, build_lookup_map};
use crate::traits::Entity;

/// A source-side key that may be absent.
pub trait SourceKey {
    /// The normalized key, or `None` if the source has no value.
    fn source_key(&self) -> Option<NormalizedKey>;
}

impl SourceKey for Identifier {
    fn source_key(&self) -> Option<NormalizedKey> {
        Some(normalize_key(self))
    }
}

impl SourceKey for Option<Identifier> {
    fn source_key(&self) -> Option<NormalizedKey> {
        self.as_ref().map(normalize_key)
    }
}

impl SourceKey for NormalizedKey {
    fn source_key(&self) -> Option<NormalizedKey> {
        Some(self.clone())
    }
}

/// Align targets with sources for belongsTo and hasOne relations.
pub fn flatten_targets_of_one_to_one_relation<K, T>(
    source_keys: &[K],
    targets: Vec<T>,
    target_key: &str,
) -> Vec<Option<T>>
where
    K: SourceKey,
    T: Entity,
{
    let lookup = build_lookup_map(targets, target_key, ReduceAsSingleItem);

    source_keys
        .iter()
        .map(|key| key.source_key().and_then(|k| lookup.get(&k).cloned()))
        .collect()
}

/// Align targets with sources for hasMany relations.
pub fn flatten_targets_of_one_to_many_relation<K, T>(
    source_keys: &[K],
    targets: Vec<T>,
    target_key: &str,
) -> Vec<Vec<T>>
where
    K: SourceKey,
    T: Entity,
{
    let lookup = build_lookup_map(targets, target_key, ReduceAsArray);

    source_keys
        .iter()
        .map(|key| {
            key.source_key()
                .and_then(|k| lookup.get(&k).cloned())
                .unwrap_or_default()
        })
        .collect()
}
