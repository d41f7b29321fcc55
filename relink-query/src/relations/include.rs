//! Include specifications for eager loading relations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Specification for including a relation in a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeSpec {
    /// Name of the relation to include.
    pub relation: String,
}

impl IncludeSpec {
    /// Create a new include spec for a relation.
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
        }
    }
}

impl From<&str> for IncludeSpec {
    fn from(relation: &str) -> Self {
        Self::new(relation)
    }
}

impl From<String> for IncludeSpec {
    fn from(relation: String) -> Self {
        Self::new(relation)
    }
}

/// Shorthand for [`IncludeSpec::new`].
pub fn include(relation: impl Into<String>) -> IncludeSpec {
    IncludeSpec::new(relation)
}

/// The set of relations requested by a query.
///
/// Relations keep the order they were first added in; adding the same
/// relation twice keeps a single entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<IncludeSpec>", into = "Vec<IncludeSpec>")]
pub struct Include {
    specs: IndexMap<String, IncludeSpec>,
}

impl Include {
    /// Create a new empty include builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relation to include.
    pub fn add(mut self, spec: impl Into<IncludeSpec>) -> Self {
        self.push(spec.into());
        self
    }

    /// Add multiple relations to include.
    pub fn add_many(mut self, specs: impl IntoIterator<Item = IncludeSpec>) -> Self {
        for spec in specs {
            self.push(spec);
        }
        self
    }

    pub(crate) fn push(&mut self, spec: IncludeSpec) {
        self.specs.entry(spec.relation.clone()).or_insert(spec);
    }

    /// Get an include spec by relation name.
    pub fn get(&self, relation: &str) -> Option<&IncludeSpec> {
        self.specs.get(relation)
    }

    /// Check if a relation is included.
    pub fn contains(&self, relation: &str) -> bool {
        self.specs.contains_key(relation)
    }

    /// Get all include specs.
    pub fn specs(&self) -> impl Iterator<Item = &IncludeSpec> {
        self.specs.values()
    }

    /// Names of the included relations.
    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Check if there are any includes.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Get the number of includes.
    pub fn len(&self) -> usize {
        self.specs.len()
    }
}

impl From<IncludeSpec> for Include {
    fn from(spec: IncludeSpec) -> Self {
        Self::new().add(spec)
    }
}

impl From<&str> for Include {
    fn from(relation: &str) -> Self {
        Self::new().add(relation)
    }
}

impl From<Vec<IncludeSpec>> for Include {
    fn from(specs: Vec<IncludeSpec>) -> Self {
        Self::new().add_many(specs)
    }
}

impl From<Include> for Vec<IncludeSpec> {
    fn from(include: Include) -> Self {
        include.specs.into_values().collect()
    }
}

impl FromIterator<IncludeSpec> for Include {
    fn from_iter<I: IntoIterator<Item = IncludeSpec>>(iter: I) -> Self {
        Self::new().add_many(iter)
    }
}
