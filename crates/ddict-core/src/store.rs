//! # Store Contracts
//!
//! The abstract, read-only contracts the engines consume. The persistent
//! store itself is an external collaborator; anything that can look up a
//! term by global identifier and scan labelled edges can back the
//! validation and graph layers.
//!
//! Implementations must return edges in a deterministic (insertion)
//! order — traversal results are required to be idempotent across calls.

use crate::edge::{Edge, Predicate};
use crate::error::StoreError;
use crate::identity::{GlobalId, IdentifierField};
use crate::term::TermDocument;

/// Keyed lookup and field search over term documents.
pub trait TermStore {
    /// Fetch a term by global identifier.
    fn get(&self, gid: &GlobalId) -> Result<Option<TermDocument>, StoreError>;

    /// Whether a term exists. Default implementation fetches the document.
    fn exists(&self, gid: &GlobalId) -> Result<bool, StoreError> {
        Ok(self.get(gid)?.is_some())
    }

    /// Global identifiers of terms whose identifier `field` contains
    /// `code`, in deterministic order.
    fn search_by_field(
        &self,
        field: IdentifierField,
        code: &str,
    ) -> Result<Vec<GlobalId>, StoreError>;
}

/// Filter for an edge scan. Unset fields do not constrain the scan.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    /// Only edges whose root set contains this vocabulary root.
    pub path_contains: Option<GlobalId>,
    /// Only edges carrying one of these predicates.
    pub predicate_in: Option<Vec<Predicate>>,
    /// Only edges departing from this vertex.
    pub from: Option<GlobalId>,
    /// Only edges arriving at this vertex.
    pub to: Option<GlobalId>,
}

impl EdgeFilter {
    /// An unconstrained filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to edges serving the given vocabulary root.
    pub fn scoped_to(mut self, root: GlobalId) -> Self {
        self.path_contains = Some(root);
        self
    }

    /// Restrict to edges carrying one of the given predicates.
    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicate_in = Some(predicates);
        self
    }

    /// Restrict to edges departing from the given vertex.
    pub fn from_vertex(mut self, vertex: GlobalId) -> Self {
        self.from = Some(vertex);
        self
    }

    /// Restrict to edges arriving at the given vertex.
    pub fn to_vertex(mut self, vertex: GlobalId) -> Self {
        self.to = Some(vertex);
        self
    }

    /// Whether an edge satisfies every set constraint.
    pub fn matches(&self, edge: &Edge) -> bool {
        if let Some(root) = &self.path_contains {
            if !edge.serves(root) {
                return false;
            }
        }
        if let Some(predicates) = &self.predicate_in {
            if !predicates.contains(&edge.predicate) {
                return false;
            }
        }
        if let Some(from) = &self.from {
            if edge.from != *from {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if edge.to != *to {
                return false;
            }
        }
        true
    }
}

/// Scan of directed, labelled edges.
pub trait EdgeStore {
    /// Edges satisfying the filter, in insertion order.
    fn scan(&self, filter: &EdgeFilter) -> Result<Vec<Edge>, StoreError>;
}
