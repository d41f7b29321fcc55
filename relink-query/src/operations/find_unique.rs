//! FindUnique operation for querying a single record by id.

use std::marker::PhantomData;

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::identifier::Identifier;
use crate::relations::{Include, IncludeSpec, WithRelations, include_related_models};
use crate::traits::{Entity, Repository};

/// A query operation that finds a single record by its primary key.
///
/// # Example
///
/// ```rust,ignore
/// let address = address_repo
///     .find_by_id(1)
///     .include("customer")
///     .exec()
///     .await?;
/// ```
pub struct FindUniqueOperation<'a, E, R: ?Sized> {
    repository: &'a R,
    id: Identifier,
    include: Include,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E, R> FindUniqueOperation<'a, E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    /// Create a new FindUnique operation.
    pub fn new(repository: &'a R, id: Identifier) -> Self {
        Self {
            repository,
            id,
            include: Include::new(),
            _entity: PhantomData,
        }
    }

    /// Include a relation in the result.
    pub fn include(mut self, spec: impl Into<IncludeSpec>) -> Self {
        self.include.push(spec.into());
        self
    }

    /// Include several relations at once.
    pub fn include_all(mut self, include: impl Into<Include>) -> Self {
        for spec in Vec::<IncludeSpec>::from(include.into()) {
            self.include.push(spec);
        }
        self
    }

    /// Execute the query, failing with a not found error if no record matches.
    pub async fn exec(self) -> QueryResult<WithRelations<E>> {
        self.exec_optional()
            .await?
            .ok_or_else(|| QueryError::entity_not_found(E::MODEL_NAME, &self.id))
    }

    /// Execute the query, returning `None` if no record matches.
    pub async fn exec_optional(&self) -> QueryResult<Option<WithRelations<E>>> {
        let resolvers = self.repository.inclusion_resolvers();
        resolvers.validate(&self.include).map_err(|e| {
            e.with_context(format!("Finding {} by id", E::MODEL_NAME))
                .with_model(E::MODEL_NAME)
        })?;

        debug!(model = E::MODEL_NAME, id = %self.id, "Executing find_by_id");

        let Some(entity) = self.repository.query_by_id(&self.id).await? else {
            return Ok(None);
        };

        let mut found = include_related_models(vec![entity], &self.include, resolvers).await?;
        Ok(found.pop())
    }
}
