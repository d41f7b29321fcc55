//! Grouping target entities by a key field.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::identifier::{NormalizedKey, normalize_key};
use crate::relink_trace;
use crate::traits::Entity;

/// Strategy for folding the targets that share a key into one map entry.
pub trait Reducer<T> {
    /// The value stored per key.
    type Output;

    /// Start an entry from its first target.
    fn init(&self, item: T) -> Self::Output;

    /// Fold a further target into an existing entry.
    fn fold(&self, acc: &mut Self::Output, item: T);
}

/// Collect every target under its key, in fetch order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceAsArray;

impl<T> Reducer<T> for ReduceAsArray {
    type Output = Vec<T>;

    fn init(&self, item: T) -> Vec<T> {
        vec![item]
    }

    fn fold(&self, acc: &mut Vec<T>, item: T) {
        acc.push(item);
    }
}

/// Keep a single target per key; the last one observed wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceAsSingleItem;

impl<T> Reducer<T> for ReduceAsSingleItem {
    type Output = T;

    fn init(&self, item: T) -> T {
        item
    }

    fn fold(&self, acc: &mut T, item: T) {
        *acc = item;
    }
}

/// Build a map from the normalized value of `key_field` to the reduced targets.
///
/// Entries iterate in order of first appearance. Targets without a value for
/// `key_field` are skipped.
pub fn build_lookup_map<T, R>(
    targets: impl IntoIterator<Item = T>,
    key_field: &str,
    reducer: R,
) -> IndexMap<NormalizedKey, R::Output>
where
    T: Entity,
    R: Reducer<T>,
{
    let mut lookup: IndexMap<NormalizedKey, R::Output> = IndexMap::new();

    for target in targets {
        let Some(value) = target.key(key_field) else {
            relink_trace!(model = T::MODEL_NAME, field = key_field, "Skipping target without key");
            continue;
        };
        let key = normalize_key(&value);

        match lookup.entry(key) {
            Entry::Occupied(mut entry) => reducer.fold(entry.get_mut(), target),
            Entry::Vacant(entry) => {
                entry.insert(reducer.init(target));
            }
        }
    }

    lookup
}
