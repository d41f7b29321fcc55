//! hasOne relations.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::identifier::Identifier;
use crate::relations::fetch::find_by_foreign_keys;
use crate::relations::getter::Getter;
use crate::relations::resolver::{ForeignKeyResolver, InclusionResolver};
use crate::relations::spec::{RelationDefinition, RelationType};
use crate::traits::{Entity, TargetRepository};

/// Produces the single-target repository of a source.
pub struct HasOneRepositoryFactory<S, T, R: ?Sized> {
    definition: Arc<RelationDefinition>,
    target: Getter<R>,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T, R> HasOneRepositoryFactory<S, T, R>
where
    S: Entity,
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    /// Create a factory for a hasOne definition.
    pub fn new(definition: RelationDefinition, target: Getter<R>) -> QueryResult<Self> {
        definition.expect(RelationType::OneToOne)?;
        Ok(Self {
            definition: Arc::new(definition),
            target,
            _marker: PhantomData,
        })
    }

    /// The relation definition.
    pub fn definition(&self) -> &RelationDefinition {
        &self.definition
    }

    /// The related record of the source whose `key_from` value is `key`.
    pub fn for_source(&self, key: impl Into<Identifier>) -> HasOneRepository<T, R> {
        HasOneRepository {
            definition: Arc::clone(&self.definition),
            target: self.target.clone(),
            source_key: key.into(),
            _marker: PhantomData,
        }
    }

    /// A resolver including the target under the relation name.
    pub fn inclusion_resolver(&self) -> Arc<dyn InclusionResolver<S>> {
        Arc::new(ForeignKeyResolver::<S, T, R>::new(
            Arc::clone(&self.definition),
            self.target.clone(),
        ))
    }
}

/// The target of one source in a hasOne relation.
pub struct HasOneRepository<T, R: ?Sized> {
    definition: Arc<RelationDefinition>,
    target: Getter<R>,
    source_key: Identifier,
    _marker: PhantomData<fn() -> T>,
}

impl<T, R> HasOneRepository<T, R>
where
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    /// Fetch the target, failing if the source has none.
    ///
    /// With several matching targets this returns the first one fetched,
    /// while inclusion through the relation attaches the last one.
    pub async fn get(&self) -> QueryResult<T> {
        let repository = self.target.get()?;
        let targets: Vec<T> =
            find_by_foreign_keys(&*repository, &self.definition.key_to, self.source_key.clone())
                .await?;

        targets.into_iter().next().ok_or_else(|| {
            QueryError::entity_not_found(&self.definition.target_model, &self.source_key)
                .with_field(&self.definition.key_to)
        })
    }

    /// Create the target linked to the source.
    pub async fn create(&self, mut entity: T) -> QueryResult<T> {
        entity.set_key(&self.definition.key_to, self.source_key.clone())?;
        let repository = self.target.get()?;
        repository.create(entity).await
    }
}
