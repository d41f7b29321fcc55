//! hasMany relations.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::identifier::Identifier;
use crate::relations::fetch::find_by_foreign_keys;
use crate::relations::getter::Getter;
use crate::relations::resolver::{ForeignKeyResolver, InclusionResolver};
use crate::relations::spec::{RelationDefinition, RelationType};
use crate::traits::{Entity, TargetRepository};

/// Produces target repositories constrained to one source.
pub struct HasManyRepositoryFactory<S, T, R: ?Sized> {
    definition: Arc<RelationDefinition>,
    target: Getter<R>,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T, R> HasManyRepositoryFactory<S, T, R>
where
    S: Entity,
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    /// Create a factory for a hasMany definition.
    pub fn new(definition: RelationDefinition, target: Getter<R>) -> QueryResult<Self> {
        definition.expect(RelationType::OneToMany)?;
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

    /// The related records of the source whose `key_from` value is `key`.
    pub fn for_source(&self, key: impl Into<Identifier>) -> HasManyRepository<T, R> {
        HasManyRepository {
            definition: Arc::clone(&self.definition),
            target: self.target.clone(),
            source_key: key.into(),
            _marker: PhantomData,
        }
    }

    /// The related records of a source entity.
    pub fn for_entity(&self, source: &S) -> QueryResult<HasManyRepository<T, R>> {
        let key = source.key(&self.definition.key_from).ok_or_else(|| {
            QueryError::invalid_input(
                &self.definition.key_from,
                format!("{} has no value for the relation key", S::MODEL_NAME),
            )
        })?;
        Ok(self.for_source(key))
    }

    /// A resolver including the targets under the relation name.
    pub fn inclusion_resolver(&self) -> Arc<dyn InclusionResolver<S>> {
        Arc::new(ForeignKeyResolver::<S, T, R>::new(
            Arc::clone(&self.definition),
            self.target.clone(),
        ))
    }
}

/// A target repository scoped to a single source.
pub struct HasManyRepository<T, R: ?Sized> {
    definition: Arc<RelationDefinition>,
    target: Getter<R>,
    source_key: Identifier,
    _marker: PhantomData<fn() -> T>,
}

impl<T, R> HasManyRepository<T, R>
where
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    /// The source key every target is constrained to.
    pub fn source_key(&self) -> &Identifier {
        &self.source_key
    }

    /// Find every target of the source.
    pub async fn find(&self) -> QueryResult<Vec<T>> {
        let repository = self.target.get()?;
        find_by_foreign_keys(&*repository, &self.definition.key_to, self.source_key.clone()).await
    }

    /// Create a target linked to the source.
    pub async fn create(&self, mut entity: T) -> QueryResult<T> {
        entity.set_key(&self.definition.key_to, self.source_key.clone())?;
        let repository = self.target.get()?;
        repository.create(entity).await
    }
}
