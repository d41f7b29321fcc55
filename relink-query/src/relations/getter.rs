//! Lazily resolved access to a relation's target repository.
//!
//! Repositories that relate to each other cannot own each other. A relation
//! therefore holds a [`Getter`] that is only invoked when the relation is
//! exercised, and a [`Deferred`] slot lets the target be bound after both
//! sides have been constructed.
//!
//! ```rust
//! use std::sync::Arc;
//! use relink_query::relations::Deferred;
//!
//! let slot: Deferred<String> = Deferred::new();
//! let getter = slot.getter();
//! assert!(getter.get().is_err());
//!
//! let target = Arc::new("orders".to_string());
//! slot.bind(&target).unwrap();
//! assert_eq!(getter.get().unwrap().as_str(), "orders");
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::error::{QueryError, QueryResult};

type GetterFn<R> = dyn Fn() -> QueryResult<Arc<R>> + Send + Sync;

/// A cloneable accessor for a target repository.
pub struct Getter<R: ?Sized> {
    inner: Arc<GetterFn<R>>,
}

impl<R: ?Sized + Send + Sync + 'static> Getter<R> {
    /// Always return the given repository.
    pub fn fixed(target: Arc<R>) -> Self {
        Self::from_fn(move || Ok(Arc::clone(&target)))
    }

    /// Upgrade a weak reference on every access.
    pub fn from_weak(target: Weak<R>) -> Self {
        Self::from_fn(move || target.upgrade().ok_or_else(unavailable::<R>))
    }

    /// Wrap an arbitrary accessor.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> QueryResult<Arc<R>> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }
}

impl<R: ?Sized> Getter<R> {
    /// Resolve the target repository.
    pub fn get(&self) -> QueryResult<Arc<R>> {
        (self.inner)()
    }
}

impl<R: ?Sized> Clone for Getter<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ?Sized> fmt::Debug for Getter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter").field("target", &type_name::<R>()).finish()
    }
}

impl<R: ?Sized + Send + Sync + 'static> From<Arc<R>> for Getter<R> {
    fn from(target: Arc<R>) -> Self {
        Self::fixed(target)
    }
}

/// A target repository slot that is bound once, after construction.
///
/// Only a weak reference is kept, so two repositories pointing at each
/// other through deferred slots do not leak.
pub struct Deferred<R: ?Sized> {
    slot: Arc<OnceLock<Weak<R>>>,
}

impl<R: ?Sized + Send + Sync + 'static> Deferred<R> {
    /// Create an unbound slot.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// A getter reading from this slot.
    pub fn getter(&self) -> Getter<R> {
        let slot = Arc::clone(&self.slot);
        Getter::from_fn(move || {
            slot.get()
                .and_then(Weak::upgrade)
                .ok_or_else(unavailable::<R>)
        })
    }

    /// Bind the target repository.
    pub fn bind(&self, target: &Arc<R>) -> QueryResult<()> {
        self.slot.set(Arc::downgrade(target)).map_err(|_| {
            QueryError::configuration(format!(
                "Deferred target {} is already bound",
                short_name::<R>()
            ))
        })
    }

    /// Check whether a target has been bound.
    pub fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<R: ?Sized + Send + Sync + 'static> Default for Deferred<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> Clone for Deferred<R> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<R: ?Sized> fmt::Debug for Deferred<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("target", &type_name::<R>())
            .field("bound", &self.slot.get().is_some())
            .finish()
    }
}

fn short_name<R: ?Sized>() -> &'static str {
    let full = type_name::<R>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn unavailable<R: ?Sized>() -> QueryError {
    QueryError::repository_unavailable(short_name::<R>())
}
