//! Core traits for entities and repositories.

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::error::QueryResult;
use crate::identifier::Identifier;
use crate::operations::{FindManyOperation, FindUniqueOperation};
use crate::relations::{
    BelongsToAccessor, Getter, HasManyRepositoryFactory, HasOneRepositoryFactory,
    InclusionResolvers, RelationDefinition,
};

/// A boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A persisted model.
///
/// Field access is by name so relation definitions can be declared without
/// generated code.
pub trait Entity: Clone + Send + Sync + Serialize + 'static {
    /// The name of the model.
    const MODEL_NAME: &'static str;

    /// The primary key field.
    const ID_FIELD: &'static str = "id";

    /// Read a key-like field (primary or foreign key).
    ///
    /// Returns `None` when the field is unknown or holds no value.
    fn key(&self, field: &str) -> Option<Identifier>;

    /// Write a key-like field.
    fn set_key(&mut self, field: &str, value: Identifier) -> QueryResult<()>;

    /// Get the primary key value.
    fn id(&self) -> Option<Identifier> {
        self.key(Self::ID_FIELD)
    }
}

/// The capability a relation needs from the repository on its target side.
pub trait TargetRepository<T: Entity>: Send + Sync {
    /// Find every record whose `field` matches any of `keys`.
    ///
    /// The result order is unspecified and may hold more or fewer records
    /// than there are keys.
    fn find_by_foreign_keys<'a>(
        &'a self,
        field: &'a str,
        keys: &'a [Identifier],
    ) -> BoxFuture<'a, QueryResult<Vec<T>>>;

    /// Persist a new record.
    fn create(&self, entity: T) -> BoxFuture<'_, QueryResult<T>>;
}

/// A repository that can resolve relation inclusions for its entities.
pub trait Repository<E: Entity>: Send + Sync {
    /// The inclusion resolvers registered on this repository.
    fn inclusion_resolvers(&self) -> &InclusionResolvers<E>;

    /// Run the primary query.
    fn query_entities(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> BoxFuture<'_, QueryResult<Vec<E>>>;

    /// Look up a single entity by primary key.
    fn query_by_id<'a>(&'a self, id: &'a Identifier) -> BoxFuture<'a, QueryResult<Option<E>>>;

    /// Start a find-many query.
    fn find_many(&self) -> FindManyOperation<'_, E, Self> {
        FindManyOperation::new(self)
    }

    /// Start a find-by-id query.
    fn find_by_id(&self, id: impl Into<Identifier>) -> FindUniqueOperation<'_, E, Self>
    where
        Self: Sized,
    {
        FindUniqueOperation::new(self, id.into())
    }

    /// Create a belongsTo accessor and register its inclusion resolver.
    fn create_belongs_to_accessor_for<T, R>(
        &self,
        definition: RelationDefinition,
        target: Getter<R>,
    ) -> QueryResult<BelongsToAccessor<E, T, R>>
    where
        Self: Sized,
        T: Entity,
        R: TargetRepository<T> + ?Sized + 'static,
    {
        let accessor = BelongsToAccessor::new(definition, target)?;
        self.inclusion_resolvers()
            .set(accessor.definition().name.clone(), accessor.inclusion_resolver());
        Ok(accessor)
    }

    /// Create a hasMany repository factory and register its inclusion resolver.
    fn create_has_many_repository_factory_for<T, R>(
        &self,
        definition: RelationDefinition,
        target: Getter<R>,
    ) -> QueryResult<HasManyRepositoryFactory<E, T, R>>
    where
        Self: Sized,
        T: Entity,
        R: TargetRepository<T> + ?Sized + 'static,
    {
        let factory = HasManyRepositoryFactory::new(definition, target)?;
        self.inclusion_resolvers()
            .set(factory.definition().name.clone(), factory.inclusion_resolver());
        Ok(factory)
    }

    /// Create a hasOne repository factory and register its inclusion resolver.
    fn create_has_one_repository_factory_for<T, R>(
        &self,
        definition: RelationDefinition,
        target: Getter<R>,
    ) -> QueryResult<HasOneRepositoryFactory<E, T, R>>
    where
        Self: Sized,
        T: Entity,
        R: TargetRepository<T> + ?Sized + 'static,
    {
        let factory = HasOneRepositoryFactory::new(definition, target)?;
        self.inclusion_resolvers()
            .set(factory.definition().name.clone(), factory.inclusion_resolver());
        Ok(factory)
    }
}
