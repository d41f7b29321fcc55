//! In-memory connector for Relink.
//!
//! This crate stores records in process memory. It implements the repository
//! capabilities relation inclusion needs, which makes it the reference
//! connector for tests and demos.
//!
//! # Features
//!
//! - Shared, cloneable data source handle
//! - Id generation as numbers, BSON object ids or UUIDs
//! - Query counting for asserting batched relation fetches
//! - TOML configuration with environment overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use relink_memory::{MemoryConfig, MemoryDataSource, MemoryRepository};
//!
//! let config = MemoryConfig::from_file("relink.toml")?.with_environment("test");
//! let db = MemoryDataSource::new(config);
//! let customers = MemoryRepository::<Customer>::new(&db)?;
//! ```

mod collection;
pub mod config;
pub mod datasource;
pub mod error;
pub mod repository;

pub use config::{DebugConfig, IdType, MemoryConfig};
pub use datasource::{MemoryDataSource, QueryStats};
pub use error::{MemoryError, MemoryResult};
pub use repository::MemoryRepository;
