//! Typed record storage for one model.

use std::collections::HashSet;

use bson::oid::ObjectId;
use indexmap::IndexMap;
use parking_lot::RwLock;
use relink_query::{Entity, Identifier, NormalizedKey, QueryResult, normalize_key};
use uuid::Uuid;

use crate::config::IdType;
use crate::error::MemoryError;

struct State<E> {
    rows: IndexMap<NormalizedKey, E>,
    last_id: i64,
}

/// Records of a single model, in insertion order.
pub struct Collection<E> {
    state: RwLock<State<E>>,
}

impl<E: Entity> Collection<E> {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(State {
                rows: IndexMap::new(),
                last_id: 0,
            }),
        }
    }

    /// Store a record, generating its id if it has none.
    pub(crate) fn insert(&self, mut entity: E, id_type: IdType) -> QueryResult<E> {
        let mut state = self.state.write();

        let id = match entity.id() {
            Some(id) => {
                if let Some(value) = id.as_int() {
                    state.last_id = state.last_id.max(value);
                }
                id
            }
            None => {
                let id = match id_type {
                    IdType::Number => {
                        state.last_id = state
                            .last_id
                            .checked_add(1)
                            .ok_or_else(|| MemoryError::IdExhausted(E::MODEL_NAME.to_string()))?;
                        Identifier::Int(state.last_id)
                    }
                    IdType::ObjectId => Identifier::ObjectId(ObjectId::new()),
                    IdType::Uuid => Identifier::Uuid(Uuid::new_v4()),
                };
                entity.set_key(E::ID_FIELD, id.clone())?;
                id
            }
        };

        let key = normalize_key(&id);
        if state.rows.contains_key(&key) {
            return Err(MemoryError::duplicate_id(E::MODEL_NAME, &key).into());
        }

        state.rows.insert(key, entity.clone());
        Ok(entity)
    }

    pub(crate) fn all(&self, skip: Option<usize>, take: Option<usize>) -> Vec<E> {
        self.state
            .read()
            .rows
            .values()
            .skip(skip.unwrap_or(0))
            .take(take.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub(crate) fn get(&self, id: &Identifier) -> Option<E> {
        self.state.read().rows.get(&normalize_key(id)).cloned()
    }

    /// Records whose `field` matches any of `keys`.
    pub(crate) fn matching(&self, field: &str, keys: &[Identifier]) -> Vec<E> {
        let wanted: HashSet<NormalizedKey> = keys.iter().map(normalize_key).collect();
        self.state
            .read()
            .rows
            .values()
            .filter(|row| {
                row.key(field)
                    .is_some_and(|value| wanted.contains(&normalize_key(&value)))
            })
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub(crate) fn clear(&self) -> usize {
        let mut state = self.state.write();
        let removed = state.rows.len();
        state.rows.clear();
        removed
    }
}
