//! Relation specification types.

use std::fmt;

use convert_case::{Case, Casing};

use crate::error::{ErrorCode, QueryError, QueryResult};
use crate::query_error;

/// Type of relation between models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// One-to-one relation (e.g., Customer has one Address).
    OneToOne,
    /// One-to-many relation (e.g., Customer has many Orders).
    OneToMany,
    /// Many-to-one relation (e.g., Order belongs to Customer).
    ManyToOne,
}

impl RelationType {
    /// Check if this relation returns multiple records.
    pub fn is_many(&self) -> bool {
        matches!(self, Self::OneToMany)
    }

    /// Check if this relation returns a single record.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }

    /// The conventional relation keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "hasOne",
            Self::OneToMany => "hasMany",
            Self::ManyToOne => "belongsTo",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of a relation between a source and a target model.
///
/// `key_from` is read on the source entity, `key_to` on the target entity.
/// A target matches a source when the two normalize to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDefinition {
    /// Name of the relation (the property the result is attached under).
    pub name: String,
    /// Type of relation.
    pub relation_type: RelationType,
    /// Name of the source model.
    pub source_model: String,
    /// Name of the target model.
    pub target_model: String,
    /// Key field on the source model.
    pub key_from: String,
    /// Key field on the target model.
    pub key_to: String,
}

impl RelationDefinition {
    /// Create a belongsTo relation.
    ///
    /// Defaults to `key_from = "<name>_id"` and `key_to = "id"`.
    pub fn belongs_to(
        name: impl Into<String>,
        source_model: impl Into<String>,
        target_model: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let key_from = format!("{}_id", name.to_case(Case::Snake));
        Self {
            name,
            relation_type: RelationType::ManyToOne,
            source_model: source_model.into(),
            target_model: target_model.into(),
            key_from,
            key_to: "id".to_string(),
        }
    }

    /// Create a hasMany relation.
    ///
    /// Defaults to `key_from = "id"` and `key_to = "<source_model>_id"`.
    pub fn has_many(
        name: impl Into<String>,
        source_model: impl Into<String>,
        target_model: impl Into<String>,
    ) -> Self {
        Self::owning(RelationType::OneToMany, name.into(), source_model.into(), target_model.into())
    }

    /// Create a hasOne relation.
    ///
    /// Defaults match [`RelationDefinition::has_many`].
    pub fn has_one(
        name: impl Into<String>,
        source_model: impl Into<String>,
        target_model: impl Into<String>,
    ) -> Self {
        Self::owning(RelationType::OneToOne, name.into(), source_model.into(), target_model.into())
    }

    fn owning(
        relation_type: RelationType,
        name: String,
        source_model: String,
        target_model: String,
    ) -> Self {
        let key_to = format!("{}_id", source_model.to_case(Case::Snake));
        Self {
            name,
            relation_type,
            source_model,
            target_model,
            key_from: "id".to_string(),
            key_to,
        }
    }

    /// Set the source-side key field.
    pub fn key_from(mut self, field: impl Into<String>) -> Self {
        self.key_from = field.into();
        self
    }

    /// Set the target-side key field.
    pub fn key_to(mut self, field: impl Into<String>) -> Self {
        self.key_to = field.into();
        self
    }

    /// Check that the definition is usable.
    pub fn validate(&self) -> QueryResult<()> {
        if self.name.is_empty() {
            return Err(QueryError::invalid_relation(
                &self.name,
                format!("{} relation on {} has no name", self.relation_type, self.source_model),
            ));
        }
        let missing = [
            ("key_from", &self.key_from, &self.source_model),
            ("key_to", &self.key_to, &self.target_model),
        ];
        for (key, value, model) in missing {
            if value.is_empty() {
                return Err(query_error!(
                    ErrorCode::InvalidRelation,
                    format!("Invalid relation `{}`: {} must not be empty", self.name, key),
                    with_relations = [self.name.as_str()],
                    with_model = model.as_str(),
                    with_field = key,
                ));
            }
        }
        Ok(())
    }

    /// Check that the definition is valid and of the expected type.
    pub fn expect(&self, relation_type: RelationType) -> QueryResult<()> {
        if self.relation_type != relation_type {
            return Err(QueryError::invalid_relation(
                &self.name,
                format!("expected a {} relation, found {}", relation_type, self.relation_type),
            ));
        }
        self.validate()
    }
}
