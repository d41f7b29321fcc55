//! The in-memory data source shared by repositories.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use relink_query::{Entity, relink_debug};
use tracing::info;

use crate::collection::Collection;
use crate::config::{IdType, MemoryConfig};
use crate::error::{MemoryError, MemoryResult};

/// Query statistics of a data source.
#[derive(Debug, Default)]
pub struct QueryStats {
    queries: AtomicU64,
}

impl QueryStats {
    /// Total queries served.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.queries.store(0, Ordering::SeqCst);
    }
}

struct Inner {
    config: MemoryConfig,
    collections: RwLock<HashMap<&'static str, Arc<dyn Any + Send + Sync>>>,
    stats: QueryStats,
}

/// A cloneable handle to an in-memory database.
///
/// Every repository created from the same data source sees the same records.
#[derive(Clone)]
pub struct MemoryDataSource {
    inner: Arc<Inner>,
}

impl MemoryDataSource {
    /// Create a data source.
    pub fn new(config: MemoryConfig) -> Self {
        info!(name = %config.name, id_type = ?config.id_type, "Creating memory data source");
        Self {
            inner: Arc::new(Inner {
                config,
                collections: RwLock::new(HashMap::new()),
                stats: QueryStats::default(),
            }),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &MemoryConfig {
        &self.inner.config
    }

    /// The configured id type.
    pub fn id_type(&self) -> IdType {
        self.inner.config.id_type
    }

    /// Query statistics.
    pub fn stats(&self) -> &QueryStats {
        &self.inner.stats
    }

    /// Total queries served since creation or the last reset.
    pub fn query_count(&self) -> u64 {
        self.inner.stats.query_count()
    }

    /// Reset query statistics.
    pub fn reset_stats(&self) {
        self.inner.stats.reset();
    }

    pub(crate) fn collection<E: Entity>(&self) -> MemoryResult<Arc<Collection<E>>> {
        let existing = self.inner.collections.read().get(E::MODEL_NAME).cloned();
        let erased = match existing {
            Some(erased) => erased,
            None => {
                let mut collections = self.inner.collections.write();
                collections
                    .entry(E::MODEL_NAME)
                    .or_insert_with(|| Arc::new(Collection::<E>::new()) as Arc<dyn Any + Send + Sync>)
                    .clone()
            }
        };

        erased
            .downcast::<Collection<E>>()
            .map_err(|_| MemoryError::CollectionType(E::MODEL_NAME.to_string()))
    }

    pub(crate) fn record_query(&self, model: &str, operation: &str, results: usize) {
        self.inner.stats.record();
        if self.inner.config.debug.log_queries {
            info!(source = %self.inner.config.name, model, operation, results, "Query");
        } else {
            relink_debug!(model, operation, results, "Query");
        }
    }
}

impl Default for MemoryDataSource {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl std::fmt::Debug for MemoryDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDataSource")
            .field("name", &self.inner.config.name)
            .field("id_type", &self.inner.config.id_type)
            .field("queries", &self.query_count())
            .finish()
    }
}
