//! # relink-query
//!
//! Relation inclusion resolution for the Relink repository layer.
//!
//! This crate provides the core of relation loading:
//! - Identifiers with a normalized comparison key (integers, strings, BSON object ids, UUIDs)
//! - Relation definitions for belongsTo, hasMany and hasOne
//! - Batched foreign-key fetching, one query per relation
//! - Lookup maps and flatteners that re-align targets with their sources
//! - A per-repository registry of inclusion resolvers
//! - Fluent `find_many` / `find_by_id` operations with `include`
//!
//! ## Identifiers
//!
//! ```rust
//! use bson::oid::ObjectId;
//! use relink_query::{Identifier, NormalizedKey};
//! use relink_query::relations::{deduplicate, uniq};
//!
//! let ids: Vec<Identifier> = vec![1.into(), "a".into(), 1.into(), 2.into(), "a".into()];
//! assert_eq!(uniq(&ids), vec![1.into(), "a".into(), Identifier::from(2)]);
//!
//! let oid = ObjectId::new();
//! let ids = vec![Identifier::from(oid), Identifier::from(oid.to_hex())];
//! assert_eq!(deduplicate(&ids), vec![NormalizedKey::from(oid.to_hex())]);
//! ```
//!
//! ## Relations
//!
//! ```rust
//! use relink_query::relations::{Include, RelationDefinition, RelationType, include};
//!
//! let orders = RelationDefinition::has_many("orders", "Customer", "Order");
//! assert_eq!(orders.relation_type, RelationType::OneToMany);
//! assert_eq!(orders.key_to, "customer_id");
//!
//! let customer = RelationDefinition::belongs_to("customer", "Order", "Customer");
//! assert_eq!(customer.key_from, "customer_id");
//!
//! let requested = Include::new().add(include("orders")).add("address");
//! assert_eq!(requested.len(), 2);
//! ```
//!
//! ## Errors
//!
//! Requesting a relation no resolver is registered for fails before any
//! query runs:
//!
//! ```rust
//! use relink_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::invalid_include(["home"]);
//! assert_eq!(err.code, ErrorCode::InvalidInclude);
//! assert_eq!(err.message, r#"Invalid "filter.include" entries: {"relation":"home"}"#);
//! ```

pub mod error;
pub mod identifier;
pub mod logging;
pub mod operations;
pub mod relations;
pub mod traits;

pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use identifier::{Identifier, NormalizeKey, NormalizedKey, is_bson_type, normalize_key};
pub use operations::{FindManyOperation, FindUniqueOperation};
pub use relations::{
    BelongsToAccessor, Deferred, Getter, HasManyRepository, HasManyRepositoryFactory,
    HasOneRepository, HasOneRepositoryFactory, Include, IncludeSpec, InclusionResolver,
    InclusionResolvers, RelationDefinition, RelationType, WithRelations, include,
};
pub use traits::{BoxFuture, Entity, Repository, TargetRepository};

// Re-export logging for the relink_debug!/relink_trace! macros
pub use logging::{LogFormat, LogSettings, is_debug_enabled};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorCode, QueryError, QueryResult};
    pub use crate::identifier::{Identifier, NormalizedKey, normalize_key};
    pub use crate::operations::*;
    pub use crate::relations::{
        BelongsToAccessor, Deferred, Getter, HasManyRepositoryFactory, HasOneRepositoryFactory,
        Include, IncludeSpec, InclusionResolver, InclusionResolvers, RelationDefinition,
        RelationType, WithRelations, include,
    };
    pub use crate::traits::{BoxFuture, Entity, Repository, TargetRepository};
}
