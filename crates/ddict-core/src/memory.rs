//! # In-Memory Stores
//!
//! Map-backed implementations of the store contracts, used by the test
//! suites and by embedders that load a dictionary snapshot into memory.
//!
//! The edge store keeps a single arena of edges plus an auxiliary index
//! from vocabulary root to edge positions, so an edge serving several
//! vocabularies is held once instead of duplicated per root. Scans
//! preserve insertion order, which makes traversals deterministic.

use std::collections::{BTreeMap, HashMap};

use crate::edge::Edge;
use crate::error::StoreError;
use crate::identity::{GlobalId, IdentifierField};
use crate::store::{EdgeFilter, EdgeStore, TermStore};
use crate::term::TermDocument;

/// In-memory term store keyed by global identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryTermStore {
    terms: BTreeMap<GlobalId, TermDocument>,
}

impl MemoryTermStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, replacing any previous document under the same id.
    pub fn insert(&mut self, term: TermDocument) {
        self.terms.insert(term.gid.clone(), term);
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TermStore for MemoryTermStore {
    fn get(&self, gid: &GlobalId) -> Result<Option<TermDocument>, StoreError> {
        Ok(self.terms.get(gid).cloned())
    }

    fn exists(&self, gid: &GlobalId) -> Result<bool, StoreError> {
        Ok(self.terms.contains_key(gid))
    }

    fn search_by_field(
        &self,
        field: IdentifierField,
        code: &str,
    ) -> Result<Vec<GlobalId>, StoreError> {
        Ok(self
            .terms
            .values()
            .filter(|term| term.matches_field(field, code))
            .map(|term| term.gid.clone())
            .collect())
    }
}

/// In-memory edge store: an edge arena plus a root-to-positions index.
#[derive(Debug, Clone, Default)]
pub struct MemoryEdgeStore {
    edges: Vec<Edge>,
    by_root: HashMap<GlobalId, Vec<usize>>,
}

impl MemoryEdgeStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge, indexing it under every root it serves.
    pub fn insert(&mut self, edge: Edge) {
        let position = self.edges.len();
        for root in &edge.path {
            self.by_root.entry(root.clone()).or_default().push(position);
        }
        self.edges.push(edge);
    }

    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl EdgeStore for MemoryEdgeStore {
    fn scan(&self, filter: &EdgeFilter) -> Result<Vec<Edge>, StoreError> {
        // Positions in the per-root index are appended in insertion
        // order, so both scan paths yield the same ordering.
        let matched = match &filter.path_contains {
            Some(root) => match self.by_root.get(root) {
                Some(positions) => positions
                    .iter()
                    .map(|&i| &self.edges[i])
                    .filter(|edge| filter.matches(edge))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            },
            None => self
                .edges
                .iter()
                .filter(|edge| filter.matches(edge))
                .cloned()
                .collect(),
        };
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Predicate;

    #[test]
    fn term_store_lookup_and_search() {
        let mut store = MemoryTermStore::new();
        store.insert(TermDocument::new("iso_639_1", "en").with_official_id("english"));
        store.insert(TermDocument::new("iso_639_1", "fr"));

        assert_eq!(store.len(), 2);
        assert!(store.exists(&GlobalId::new("iso_639_1_en")).unwrap());
        assert!(!store.exists(&GlobalId::new("iso_639_1_xx")).unwrap());

        let hits = store
            .search_by_field(IdentifierField::Official, "english")
            .unwrap();
        assert_eq!(hits, vec![GlobalId::new("iso_639_1_en")]);

        let hits = store
            .search_by_field(IdentifierField::Namespace, "iso_639_1")
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn edge_store_scans_by_root_index() {
        let mut store = MemoryEdgeStore::new();
        store.insert(Edge::new("a", "root1", Predicate::EnumOf).with_root("root1"));
        store.insert(
            Edge::new("b", "root1", Predicate::EnumOf)
                .with_root("root1")
                .with_root("root2"),
        );
        store.insert(Edge::new("c", "root2", Predicate::SectionOf).with_root("root2"));

        let scoped = store
            .scan(&EdgeFilter::new().scoped_to(GlobalId::new("root2")))
            .unwrap();
        assert_eq!(scoped.len(), 2);
        assert_eq!(scoped[0].from.as_str(), "b");
        assert_eq!(scoped[1].from.as_str(), "c");

        let functional = store
            .scan(
                &EdgeFilter::new()
                    .scoped_to(GlobalId::new("root1"))
                    .with_predicates(vec![Predicate::EnumOf]),
            )
            .unwrap();
        assert_eq!(functional.len(), 2);

        let none = store
            .scan(&EdgeFilter::new().scoped_to(GlobalId::new("missing")))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn shared_edge_held_once() {
        let mut store = MemoryEdgeStore::new();
        store.insert(
            Edge::new("x", "y", Predicate::BridgeOf)
                .with_root("v1")
                .with_root("v2"),
        );
        assert_eq!(store.len(), 1);
        for root in ["v1", "v2"] {
            let hits = store
                .scan(&EdgeFilter::new().scoped_to(GlobalId::new(root)))
                .unwrap();
            assert_eq!(hits.len(), 1);
        }
    }
}
