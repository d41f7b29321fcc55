//! Per-repository registry of inclusion resolvers.

use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};
use crate::relations::include::{Include, IncludeSpec};
use crate::relations::resolver::InclusionResolver;
use crate::relations::with_relations::WithRelations;
use crate::traits::Entity;

/// Relation name to resolver mapping for one source model.
///
/// Resolvers can be added and removed at runtime; lookups clone the
/// resolver handle so no lock is held while a relation is being fetched.
pub struct InclusionResolvers<S> {
    resolvers: RwLock<IndexMap<String, Arc<dyn InclusionResolver<S>>>>,
}

impl<S> InclusionResolvers<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            resolvers: RwLock::new(IndexMap::new()),
        }
    }

    /// Register a resolver, returning the one it replaces.
    pub fn set(
        &self,
        name: impl Into<String>,
        resolver: Arc<dyn InclusionResolver<S>>,
    ) -> Option<Arc<dyn InclusionResolver<S>>> {
        let name = name.into();
        debug!(relation = %name, "Registering inclusion resolver");
        self.resolvers.write().insert(name, resolver)
    }

    /// Get the resolver for a relation.
    pub fn get(&self, name: &str) -> Option<Arc<dyn InclusionResolver<S>>> {
        self.resolvers.read().get(name).cloned()
    }

    /// Remove the resolver for a relation.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn InclusionResolver<S>>> {
        self.resolvers.write().shift_remove(name)
    }

    /// Check if a relation has a resolver.
    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.read().contains_key(name)
    }

    /// Registered relation names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.resolvers.read().keys().cloned().collect()
    }

    /// Number of registered resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    /// Check if no resolver is registered.
    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }

    /// Check that every requested relation has a resolver.
    pub fn validate(&self, include: &Include) -> QueryResult<()> {
        self.snapshot(include).map(|_| ())
    }

    /// Pair every requested relation with its resolver.
    ///
    /// Fails with an invalid include error naming every unknown relation.
    pub(crate) fn snapshot(
        &self,
        include: &Include,
    ) -> QueryResult<Vec<(IncludeSpec, Arc<dyn InclusionResolver<S>>)>> {
        let resolvers = self.resolvers.read();
        let mut resolved = Vec::with_capacity(include.len());
        let mut invalid = Vec::new();

        for spec in include.specs() {
            match resolvers.get(&spec.relation) {
                Some(resolver) => resolved.push((spec.clone(), Arc::clone(resolver))),
                None => invalid.push(spec.relation.clone()),
            }
        }

        if invalid.is_empty() {
            Ok(resolved)
        } else {
            Err(QueryError::invalid_include(invalid))
        }
    }
}

impl<S> Default for InclusionResolvers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for InclusionResolvers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InclusionResolvers")
            .field("relations", &self.names())
            .finish()
    }
}

/// Resolve every requested relation and attach the results to the sources.
///
/// Each relation is fetched concurrently with the others; the first failure
/// fails the whole call. Relations that resolve to nothing for a source are
/// left off that source.
pub async fn include_related_models<S: Entity>(
    sources: Vec<S>,
    include: &Include,
    resolvers: &InclusionResolvers<S>,
) -> QueryResult<Vec<WithRelations<S>>> {
    let resolved = resolvers
        .snapshot(include)
        .map_err(|e| e.with_model(S::MODEL_NAME))?;

    if resolved.is_empty() {
        return Ok(sources.into_iter().map(WithRelations::new).collect());
    }

    debug!(
        model = S::MODEL_NAME,
        sources = sources.len(),
        relations = resolved.len(),
        "Including related models"
    );

    let sources_ref = &sources;
    let fetched = try_join_all(resolved.iter().map(|(spec, resolver)| async move {
        let values = resolver.resolve(sources_ref, spec).await?;
        Ok::<_, QueryError>((spec.relation.as_str(), values))
    }))
    .await?;

    for (relation, values) in &fetched {
        if values.len() != sources.len() {
            warn!(
                relation = %relation,
                expected = sources.len(),
                actual = values.len(),
                "Inclusion resolver returned a misaligned result"
            );
            return Err(QueryError::internal(format!(
                "resolver for `{}` returned {} results for {} sources",
                relation,
                values.len(),
                sources.len()
            ))
            .with_model(S::MODEL_NAME));
        }
    }

    let mut results: Vec<WithRelations<S>> = sources.into_iter().map(WithRelations::new).collect();
    for (relation, values) in fetched {
        for (result, value) in results.iter_mut().zip(values) {
            if !value.is_null() {
                result.relations.insert(relation.to_string(), value);
            }
        }
    }

    Ok(results)
}
