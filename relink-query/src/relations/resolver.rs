//! Inclusion resolvers.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::QueryResult;
use crate::identifier::Identifier;
use crate::relations::fetch::find_by_foreign_keys;
use crate::relations::flatten::{
    flatten_targets_of_one_to_many_relation, flatten_targets_of_one_to_one_relation,
};
use crate::relations::getter::Getter;
use crate::relations::include::IncludeSpec;
use crate::relations::spec::{RelationDefinition, RelationType};
use crate::traits::{BoxFuture, Entity, TargetRepository};

/// Fetches the related data for a batch of source entities.
///
/// A resolver returns exactly one value per source, in source order.
/// `Value::Null` means "nothing related"; to-many relations return arrays.
pub trait InclusionResolver<S>: Send + Sync {
    /// Resolve the relation for every source.
    fn resolve<'a>(
        &'a self,
        sources: &'a [S],
        spec: &'a IncludeSpec,
    ) -> BoxFuture<'a, QueryResult<Vec<Value>>>;
}

/// Resolver for relations joined by a single key pair.
///
/// Covers belongsTo, hasMany and hasOne: read `key_from` on every source,
/// fetch all targets matching on `key_to` in one query, then align.
pub(crate) struct ForeignKeyResolver<S, T, R: ?Sized> {
    definition: Arc<RelationDefinition>,
    target: Getter<R>,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T, R: ?Sized> ForeignKeyResolver<S, T, R> {
    pub(crate) fn new(definition: Arc<RelationDefinition>, target: Getter<R>) -> Self {
        Self {
            definition,
            target,
            _marker: PhantomData,
        }
    }
}

impl<S, T, R> ForeignKeyResolver<S, T, R>
where
    S: Entity,
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    async fn resolve_sources(&self, sources: &[S]) -> QueryResult<Vec<Value>> {
        let definition = &self.definition;
        let repository = self
            .target
            .get()
            .map_err(|e| e.with_context(format!("Resolving relation {}", definition.name)))?;

        let source_keys: Vec<Option<Identifier>> =
            sources.iter().map(|s| s.key(&definition.key_from)).collect();
        let fetch_keys: Vec<Identifier> = source_keys.iter().flatten().cloned().collect();

        debug!(
            relation = %definition.name,
            kind = %definition.relation_type,
            sources = sources.len(),
            "Resolving inclusion"
        );

        let targets: Vec<T> =
            find_by_foreign_keys(&*repository, &definition.key_to, fetch_keys).await?;

        if definition.relation_type == RelationType::OneToMany {
            flatten_targets_of_one_to_many_relation(&source_keys, targets, &definition.key_to)
                .into_iter()
                .map(|group| serde_json::to_value(group).map_err(Into::into))
                .collect()
        } else {
            flatten_targets_of_one_to_one_relation(&source_keys, targets, &definition.key_to)
                .into_iter()
                .map(|target| match target {
                    Some(target) => serde_json::to_value(target).map_err(Into::into),
                    None => Ok(Value::Null),
                })
                .collect()
        }
    }
}

impl<S, T, R> InclusionResolver<S> for ForeignKeyResolver<S, T, R>
where
    S: Entity,
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    fn resolve<'a>(
        &'a self,
        sources: &'a [S],
        _spec: &'a IncludeSpec,
    ) -> BoxFuture<'a, QueryResult<Vec<Value>>> {
        Box::pin(self.resolve_sources(sources))
    }
}
