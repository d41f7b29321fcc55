//! FindMany operation for querying multiple records.

use std::marker::PhantomData;

use tracing::debug;

use crate::error::QueryResult;
use crate::relations::{Include, IncludeSpec, WithRelations, include_related_models};
use crate::traits::{Entity, Repository};

/// A query operation that finds multiple records.
///
/// # Example
///
/// ```rust,ignore
/// let customers = customer_repo
///     .find_many()
///     .include("orders")
///     .include("address")
///     .skip(0)
///     .take(10)
///     .exec()
///     .await?;
/// ```
pub struct FindManyOperation<'a, E, R: ?Sized> {
    repository: &'a R,
    include: Include,
    skip: Option<usize>,
    take: Option<usize>,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E, R> FindManyOperation<'a, E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    /// Create a new FindMany operation.
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            include: Include::new(),
            skip: None,
            take: None,
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

    /// Skip a number of records.
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(n);
        self
    }

    /// Take a limited number of records.
    pub fn take(mut self, n: usize) -> Self {
        self.take = Some(n);
        self
    }

    /// The requested relations.
    pub fn includes(&self) -> &Include {
        &self.include
    }

    /// Execute the query.
    ///
    /// Unknown relations are rejected before the primary query runs.
    pub async fn exec(self) -> QueryResult<Vec<WithRelations<E>>> {
        let resolvers = self.repository.inclusion_resolvers();
        resolvers
            .validate(&self.include)
            .map_err(|e| e.with_context(format!("Finding {}", E::MODEL_NAME)).with_model(E::MODEL_NAME))?;

        debug!(
            model = E::MODEL_NAME,
            skip = ?self.skip,
            take = ?self.take,
            includes = self.include.len(),
            "Executing find_many"
        );

        let entities = self.repository.query_entities(self.skip, self.take).await?;
        include_related_models(entities, &self.include, resolvers).await
    }
}
