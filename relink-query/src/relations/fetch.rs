//! Batched foreign-key fetching.

use indexmap::IndexSet;
use tracing::debug;

use crate::error::QueryResult;
use crate::identifier::{Identifier, NormalizeKey, NormalizedKey};
use crate::traits::{Entity, TargetRepository};

/// One or many source identifiers to fetch targets for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKeys {
    /// A single identifier.
    One(Identifier),
    /// A sequence of identifiers, possibly with duplicates.
    Many(Vec<Identifier>),
}

impl SourceKeys {
    /// Flatten into a sequence.
    pub fn into_vec(self) -> Vec<Identifier> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

impl From<Identifier> for SourceKeys {
    fn from(id: Identifier) -> Self {
        Self::One(id)
    }
}

impl From<Vec<Identifier>> for SourceKeys {
    fn from(ids: Vec<Identifier>) -> Self {
        Self::Many(ids)
    }
}

impl From<&[Identifier]> for SourceKeys {
    fn from(ids: &[Identifier]) -> Self {
        Self::Many(ids.to_vec())
    }
}

/// Keep the first occurrence of every key, in its original form.
pub fn uniq<K: NormalizeKey + Clone>(ids: &[K]) -> Vec<K> {
    let mut seen = IndexSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.normalize_key()))
        .cloned()
        .collect()
}

/// Normalize keys and drop duplicates, preserving first-seen order.
pub fn deduplicate<K: NormalizeKey>(ids: &[K]) -> Vec<NormalizedKey> {
    ids.iter()
        .map(NormalizeKey::normalize_key)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Fetch every target whose `fk_field` matches one of the source ids.
///
/// Issues exactly one query against the target repository, or none at all
/// when no ids are given.
pub async fn find_by_foreign_keys<T, R>(
    target_repository: &R,
    fk_field: &str,
    source_ids: impl Into<SourceKeys>,
) -> QueryResult<Vec<T>>
where
    T: Entity,
    R: TargetRepository<T> + ?Sized,
{
    let keys = uniq(&source_ids.into().into_vec());

    if keys.is_empty() {
        debug!(model = T::MODEL_NAME, field = fk_field, "No foreign keys, skipping fetch");
        return Ok(Vec::new());
    }

    debug!(
        model = T::MODEL_NAME,
        field = fk_field,
        keys = keys.len(),
        "Fetching targets by foreign keys"
    );
    target_repository.find_by_foreign_keys(fk_field, &keys).await
}
