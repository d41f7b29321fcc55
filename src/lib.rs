//! # Relink
//!
//! A repository layer that includes related records in batches.
//!
//! Relink provides:
//! - belongsTo, hasMany and hasOne relations declared as plain values
//! - `find_many` / `find_by_id` with `include`, one query per relation
//! - Identifiers that compare correctly whether they are integers, strings,
//!   BSON object ids or UUIDs
//! - An in-memory connector for tests and prototyping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relink::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> QueryResult<()> {
//!     let db = MemoryDataSource::default();
//!     let customers = Arc::new(MemoryRepository::<Customer>::new(&db)?);
//!     let orders = Arc::new(MemoryRepository::<Order>::new(&db)?);
//!
//!     customers.create_has_many_repository_factory_for(
//!         RelationDefinition::has_many("orders", "Customer", "Order"),
//!         Getter::fixed(orders.clone()),
//!     )?;
//!
//!     let found = customers.find_many().include("orders").exec().await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Core identifiers, relations and query operations.
pub mod query {
    pub use relink_query::*;
}

/// The in-memory connector.
pub mod memory {
    pub use relink_memory::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use relink_memory::{IdType, MemoryConfig, MemoryDataSource, MemoryRepository};
    pub use relink_query::prelude::*;
}

// Re-export key types at the crate root
pub use relink_query::{
    Entity, ErrorCode, Identifier, QueryError, QueryResult, RelationDefinition, Repository,
    TargetRepository,
};
