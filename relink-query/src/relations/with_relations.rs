//! An entity together with its included relations.

use std::ops::Deref;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{QueryError, QueryResult};

/// An entity plus the relations that were included for it.
///
/// Serializes as the entity's own fields followed by one field per included
/// relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithRelations<E> {
    /// The entity.
    #[serde(flatten)]
    pub entity: E,
    /// Included relations by name.
    #[serde(flatten)]
    pub relations: IndexMap<String, Value>,
}

impl<E> WithRelations<E> {
    /// Wrap an entity with no relations attached.
    pub fn new(entity: E) -> Self {
        Self {
            entity,
            relations: IndexMap::new(),
        }
    }

    /// Get the entity.
    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// Unwrap the entity, discarding relations.
    pub fn into_entity(self) -> E {
        self.entity
    }

    /// Check if a relation was attached.
    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Get the raw value of an attached relation.
    pub fn raw_relation(&self, name: &str) -> Option<&Value> {
        self.relations.get(name)
    }

    /// Decode an attached relation.
    ///
    /// Returns `Ok(None)` if the relation was not attached.
    pub fn relation<T: DeserializeOwned>(&self, name: &str) -> QueryResult<Option<T>> {
        self.relations
            .get(name)
            .map(|value| {
                T::deserialize(value).map_err(|e| {
                    QueryError::deserialization(format!("relation `{}`: {}", name, e))
                        .with_relations([name])
                })
            })
            .transpose()
    }
}

impl<E> Deref for WithRelations<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

impl<E> From<E> for WithRelations<E> {
    fn from(entity: E) -> Self {
        Self::new(entity)
    }
}
