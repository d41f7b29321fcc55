//! Relation definitions and batched inclusion.
//!
//! This module provides the pieces that load related data for a batch of
//! source entities in one query per relation:
//! - `RelationDefinition` describing belongsTo, hasMany and hasOne relations
//! - `Include` for requesting relations on a query
//! - Lookup maps and flatteners aligning fetched targets with their sources
//! - `InclusionResolvers`, the per-repository relation registry
//! - Accessors and repository factories created from a definition
//!
//! ## Example
//!
//! ```rust,ignore
//! let orders = customer_repo.create_has_many_repository_factory_for(
//!     RelationDefinition::has_many("orders", "Customer", "Order"),
//!     Getter::fixed(order_repo.clone()),
//! )?;
//!
//! let customers = customer_repo
//!     .find_many()
//!     .include("orders")
//!     .exec()
//!     .await?;
//! ```

mod belongs_to;
mod fetch;
mod flatten;
mod getter;
mod has_many;
mod has_one;
mod include;
mod lookup;
mod registry;
mod resolver;
mod spec;
mod with_relations;

pub use belongs_to::BelongsToAccessor;
pub use fetch::{SourceKeys, deduplicate, find_by_foreign_keys, uniq};
pub use flatten::{
    SourceKey, flatten_targets_of_one_to_many_relation, flatten_targets_of_one_to_one_relation,
};
pub use getter::{Deferred, Getter};
pub use has_many::{HasManyRepository, HasManyRepositoryFactory};
pub use has_one::{HasOneRepository, HasOneRepositoryFactory};
pub use include::{Include, IncludeSpec, include};
pub use lookup::{ReduceAsArray, ReduceAsSingleItem, Reducer, build_lookup_map};
pub use registry::{InclusionResolvers, include_related_models};
pub use resolver::InclusionResolver;
pub use spec::{RelationDefinition, RelationType};
pub use with_relations::WithRelations;
