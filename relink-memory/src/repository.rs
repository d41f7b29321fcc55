//! Repositories backed by the in-memory data source.

use std::fmt;
use std::sync::Arc;

use relink_query::{
    BoxFuture, Entity, Identifier, InclusionResolvers, QueryResult, Repository, TargetRepository,
};

use crate::collection::Collection;
use crate::datasource::MemoryDataSource;

/// A repository of one model stored in a [`MemoryDataSource`].
///
/// ```rust
/// use relink_memory::{MemoryDataSource, MemoryRepository};
/// # use relink_query::{Entity, Identifier, QueryError, QueryResult};
/// # #[derive(Clone, serde::Serialize)]
/// # struct Note { id: Option<i64>, text: String }
/// # impl Entity for Note {
/// #     const MODEL_NAME: &'static str = "Note";
/// #     fn key(&self, field: &str) -> Option<Identifier> {
/// #         match field { "id" => self.id.map(Identifier::from), _ => None }
/// #     }
/// #     fn set_key(&mut self, field: &str, value: Identifier) -> QueryResult<()> {
/// #         self.id = value.as_int();
/// #         Ok(())
/// #     }
/// # }
///
/// # tokio_test();
/// # fn tokio_test() {
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let db = MemoryDataSource::default();
/// let notes = MemoryRepository::<Note>::new(&db).unwrap();
///
/// let note = notes.create(Note { id: None, text: "hi".into() }).await.unwrap();
/// assert_eq!(note.id, Some(1));
/// assert_eq!(notes.count().await.unwrap(), 1);
/// # });
/// # }
/// ```
pub struct MemoryRepository<E: Entity> {
    source: MemoryDataSource,
    collection: Arc<Collection<E>>,
    resolvers: InclusionResolvers<E>,
}

impl<E: Entity> MemoryRepository<E> {
    /// Create a repository for `E` on the given data source.
    pub fn new(source: &MemoryDataSource) -> QueryResult<Self> {
        Ok(Self {
            source: source.clone(),
            collection: source.collection::<E>()?,
            resolvers: InclusionResolvers::new(),
        })
    }

    /// The data source this repository reads from.
    pub fn data_source(&self) -> &MemoryDataSource {
        &self.source
    }

    /// Persist a record, generating its id if it has none.
    pub async fn create(&self, entity: E) -> QueryResult<E> {
        self.insert(entity)
    }

    /// Persist several records.
    pub async fn create_all(&self, entities: impl IntoIterator<Item = E>) -> QueryResult<Vec<E>> {
        entities.into_iter().map(|entity| self.insert(entity)).collect()
    }

    /// All records, in insertion order.
    pub async fn find_all(&self) -> QueryResult<Vec<E>> {
        Ok(self.load(None, None))
    }

    /// Number of records.
    pub async fn count(&self) -> QueryResult<usize> {
        self.source.record_query(E::MODEL_NAME, "count", 1);
        Ok(self.collection.len())
    }

    /// Remove every record, returning how many were removed.
    pub async fn delete_all(&self) -> QueryResult<usize> {
        Ok(self.collection.clear())
    }

    fn insert(&self, entity: E) -> QueryResult<E> {
        self.collection.insert(entity, self.source.id_type())
    }

    fn load(&self, skip: Option<usize>, take: Option<usize>) -> Vec<E> {
        let rows = self.collection.all(skip, take);
        self.source.record_query(E::MODEL_NAME, "find", rows.len());
        rows
    }
}

impl<E: Entity> Repository<E> for MemoryRepository<E> {
    fn inclusion_resolvers(&self) -> &InclusionResolvers<E> {
        &self.resolvers
    }

    fn query_entities(
        &self,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> BoxFuture<'_, QueryResult<Vec<E>>> {
        Box::pin(async move { Ok(self.load(skip, take)) })
    }

    fn query_by_id<'a>(&'a self, id: &'a Identifier) -> BoxFuture<'a, QueryResult<Option<E>>> {
        Box::pin(async move {
            let found = self.collection.get(id);
            self.source
                .record_query(E::MODEL_NAME, "find_by_id", usize::from(found.is_some()));
            Ok(found)
        })
    }
}

impl<E: Entity> TargetRepository<E> for MemoryRepository<E> {
    fn find_by_foreign_keys<'a>(
        &'a self,
        field: &'a str,
        keys: &'a [Identifier],
    ) -> BoxFuture<'a, QueryResult<Vec<E>>> {
        Box::pin(async move {
            let found = self.collection.matching(field, keys);
            self.source
                .record_query(E::MODEL_NAME, "find_by_foreign_keys", found.len());
            Ok(found)
        })
    }

    fn create(&self, entity: E) -> BoxFuture<'_, QueryResult<E>> {
        Box::pin(async move { self.insert(entity) })
    }
}

impl<E: Entity> fmt::Debug for MemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("model", &E::MODEL_NAME)
            .field("records", &self.collection.len())
            .field("relations", &self.resolvers.names())
            .finish()
    }
}
