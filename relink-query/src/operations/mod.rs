//! Query operations for the fluent API.
//!
//! - `FindManyOperation` - Find multiple records with their relations
//! - `FindUniqueOperation` - Find one record by id with its relations

mod find_many;
mod find_unique;

pub use find_many::FindManyOperation;
pub use find_unique::FindUniqueOperation;
