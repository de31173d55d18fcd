//! # Resolver Contracts
//!
//! The five operations the service layer calls on a controlled
//! vocabulary:
//!
//! 1. **Flatten** — the member terms of an enumeration, no hierarchy.
//! 2. **Resolve** — the preferred (canonical) term a candidate resolves
//!    to by walking non-functional edges until a functional edge appears.
//! 3. **Match by field** — identifier-field search piped through resolve,
//!    deduplicated; cardinality may legitimately be 0 or more than 1.
//! 4. **Path search** — all root→target paths within level bounds.
//! 5. **Tree serialize** — each reached vertex's direct children grouped
//!    by predicate.
//!
//! An unknown root is a caller error rejected before any traversal;
//! store failures propagate; an unmatched target is a `None`/empty
//! result, not an error.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

use thiserror::Error;
use tracing::debug;

use ddict_core::{
    Direction, EdgeFilter, EdgeStore, GlobalId, IdentifierField, Predicate, StoreError, TermStore,
};

use crate::walk::{walk, Order, PathStep, WalkSpec};

/// Default bound on resolution and serialization walks.
pub const DEFAULT_MAX_LEVEL: usize = 10;

/// Error from a resolver contract.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The vocabulary root does not exist in the term store.
    #[error("unknown vocabulary root '{0}'")]
    UnknownRoot(GlobalId),

    /// Infrastructure failure from the term or edge store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Predicate and bound parameters shared by the traversal contracts.
#[derive(Debug, Clone)]
pub struct TraversalSpec {
    /// The predicate denoting genuine membership.
    pub functional: Predicate,
    /// Predicates traversed (but never counted as membership) while
    /// resolving: grouping and indirection edges.
    pub non_functional: Vec<Predicate>,
    /// Direction over the stored edge orientation.
    pub direction: Direction,
    /// Maximum number of hops.
    pub max_level: usize,
}

impl TraversalSpec {
    /// A spec with the default non-functional predicates (section and
    /// bridge), default direction, and default level bound.
    pub fn new(functional: Predicate) -> Self {
        Self {
            functional,
            non_functional: vec![Predicate::SectionOf, Predicate::BridgeOf],
            direction: Direction::default(),
            max_level: DEFAULT_MAX_LEVEL,
        }
    }

    /// Override the non-functional predicate set (builder style).
    pub fn with_non_functional(mut self, predicates: Vec<Predicate>) -> Self {
        self.non_functional = predicates;
        self
    }

    /// Override the direction (builder style).
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Override the level bound (builder style).
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Every predicate a path-search or tree walk may traverse.
    fn all_predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![self.functional];
        for p in &self.non_functional {
            if !predicates.contains(p) {
                predicates.push(*p);
            }
        }
        predicates
    }
}

/// An ordered root-to-target path through the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    /// The hops of the path, in order.
    pub steps: Vec<PathStep>,
}

impl GraphPath {
    /// Number of hops.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path has zero hops (root is the target).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The vertices of the path, in order.
    pub fn vertices(&self) -> impl Iterator<Item = &GlobalId> {
        self.steps.iter().map(|step| &step.vertex)
    }
}

/// The graph resolver over a pair of read-only stores.
#[derive(Debug)]
pub struct GraphResolver<'a, T: TermStore, E: EdgeStore> {
    terms: &'a T,
    edges: &'a E,
}

impl<'a, T: TermStore, E: EdgeStore> GraphResolver<'a, T, E> {
    /// Create a resolver over the given stores.
    pub fn new(terms: &'a T, edges: &'a E) -> Self {
        Self { terms, edges }
    }

    /// Contract 1 — flatten an enumeration into its member terms.
    ///
    /// A single scan over functional edges serving `root`; non-functional
    /// edges are excluded by construction, no hierarchy is preserved.
    pub fn members(
        &self,
        root: &GlobalId,
        functional: Predicate,
        direction: Direction,
    ) -> Result<BTreeSet<GlobalId>, GraphError> {
        self.require_root(root)?;
        let edges = self.edges.scan(
            &EdgeFilter::new()
                .scoped_to(root.clone())
                .with_predicates(vec![functional]),
        )?;
        Ok(edges
            .iter()
            .map(|edge| edge.source(direction).clone())
            .collect())
    }

    /// Contract 2 — resolve a candidate to its preferred (canonical)
    /// term within `root`'s vocabulary.
    ///
    /// No incident edge in scope means the target is not in this
    /// vocabulary at all (`None`). A functional incident edge means the
    /// target is already canonical and resolves to itself. Otherwise a
    /// bounded breadth-first walk over the non-functional edges returns
    /// the first visited vertex that carries an in-scope functional edge;
    /// first hit in traversal order wins, and since edge scans are in
    /// insertion order, repeated calls agree.
    pub fn resolve_preferred(
        &self,
        root: &GlobalId,
        target: &GlobalId,
        spec: &TraversalSpec,
    ) -> Result<Option<GlobalId>, GraphError> {
        self.require_root(root)?;
        debug!(root = %root, target = %target, "resolving preferred term");

        let incident = self.edges.scan(&self.incident_filter(root, target, spec.direction))?;
        if incident.is_empty() {
            return Ok(None);
        }
        if incident.iter().any(|edge| edge.predicate == spec.functional) {
            return Ok(Some(target.clone()));
        }

        let walk_spec = WalkSpec {
            scope: root.clone(),
            predicates: spec.non_functional.clone(),
            direction: spec.direction,
            max_level: spec.max_level,
            order: Order::BreadthFirst,
        };
        let mut preferred: Option<GlobalId> = None;
        let mut store_failure: Option<StoreError> = None;
        walk(self.edges, target, &walk_spec, |visit| {
            match self.has_functional_edge(root, visit.vertex, spec) {
                Ok(true) => {
                    preferred = Some(visit.vertex.clone());
                    ControlFlow::Break(())
                }
                Ok(false) => ControlFlow::Continue(()),
                Err(err) => {
                    store_failure = Some(err);
                    ControlFlow::Break(())
                }
            }
        })?;
        if let Some(err) = store_failure {
            return Err(err.into());
        }
        Ok(preferred)
    }

    /// Contract 3 — match a code against an identifier field, honoring
    /// preferred-term aliasing.
    ///
    /// Every field hit is piped through contract 2; results are
    /// deduplicated but may contain zero or several canonical terms when
    /// the code matches multiple vocabulary branches. Callers must not
    /// assume cardinality ≤ 1.
    pub fn match_by_field(
        &self,
        root: &GlobalId,
        code: &str,
        field: IdentifierField,
        spec: &TraversalSpec,
    ) -> Result<Vec<GlobalId>, GraphError> {
        self.require_root(root)?;
        let hits = self.terms.search_by_field(field, code)?;
        debug!(root = %root, code, field = %field, hits = hits.len(), "matching by field");

        let mut resolved = Vec::new();
        for gid in hits {
            if let Some(preferred) = self.resolve_preferred(root, &gid, spec)? {
                if !resolved.contains(&preferred) {
                    resolved.push(preferred);
                }
            }
        }
        Ok(resolved)
    }

    /// Contract 4 — all root→target paths within `[min_level, max_level]`
    /// hops, over the allowed predicates in scope.
    ///
    /// Returns the empty list when the target is unreachable within
    /// bounds. With `min_level` 0 and `target == root`, the zero-hop path
    /// is included.
    pub fn paths_to(
        &self,
        root: &GlobalId,
        target: &GlobalId,
        spec: &TraversalSpec,
        min_level: usize,
        max_level: usize,
    ) -> Result<Vec<GraphPath>, GraphError> {
        self.require_root(root)?;

        let mut paths = Vec::new();
        if min_level == 0 && target == root {
            paths.push(GraphPath { steps: Vec::new() });
        }

        let walk_spec = WalkSpec {
            scope: root.clone(),
            predicates: spec.all_predicates(),
            direction: spec.direction,
            max_level,
            order: Order::BreadthFirst,
        };
        walk(self.edges, root, &walk_spec, |visit| {
            if visit.vertex == target && visit.level >= min_level {
                paths.push(GraphPath {
                    steps: visit.path.to_vec(),
                });
            }
            ControlFlow::Continue(())
        })?;
        Ok(paths)
    }

    /// Contract 5 — serialize the subgraph under `root` as a map from
    /// each reached vertex to its direct children grouped by predicate.
    pub fn tree(
        &self,
        root: &GlobalId,
        spec: &TraversalSpec,
        max_level: usize,
    ) -> Result<BTreeMap<GlobalId, BTreeMap<Predicate, BTreeSet<GlobalId>>>, GraphError> {
        self.require_root(root)?;

        let mut tree: BTreeMap<GlobalId, BTreeMap<Predicate, BTreeSet<GlobalId>>> =
            BTreeMap::new();
        tree.entry(root.clone()).or_default();

        let walk_spec = WalkSpec {
            scope: root.clone(),
            predicates: spec.all_predicates(),
            direction: spec.direction,
            max_level,
            order: Order::BreadthFirst,
        };
        walk(self.edges, root, &walk_spec, |visit| {
            let parent = match visit.path.len() {
                0 | 1 => root.clone(),
                n => visit.path[n - 2].vertex.clone(),
            };
            tree.entry(parent)
                .or_default()
                .entry(visit.edge.predicate)
                .or_default()
                .insert(visit.vertex.clone());
            tree.entry(visit.vertex.clone()).or_default();
            ControlFlow::Continue(())
        })?;
        Ok(tree)
    }

    /// Reject unknown roots before any traversal.
    fn require_root(&self, root: &GlobalId) -> Result<(), GraphError> {
        if self.terms.exists(root)? {
            Ok(())
        } else {
            Err(GraphError::UnknownRoot(root.clone()))
        }
    }

    /// Filter for edges leaving `vertex` in the walk direction, in scope.
    fn incident_filter(&self, root: &GlobalId, vertex: &GlobalId, direction: Direction) -> EdgeFilter {
        let filter = EdgeFilter::new().scoped_to(root.clone());
        match direction {
            Direction::ManyToOne => filter.from_vertex(vertex.clone()),
            Direction::OneToMany => filter.to_vertex(vertex.clone()),
        }
    }

    /// Whether `vertex` carries an in-scope functional edge.
    fn has_functional_edge(
        &self,
        root: &GlobalId,
        vertex: &GlobalId,
        spec: &TraversalSpec,
    ) -> Result<bool, StoreError> {
        let mut filter = self.incident_filter(root, vertex, spec.direction);
        filter.predicate_in = Some(vec![spec.functional]);
        Ok(!self.edges.scan(&filter)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddict_core::{Edge, MemoryEdgeStore, MemoryTermStore, TermDocument};

    fn root() -> GlobalId {
        GlobalId::new("colors")
    }

    fn fixture() -> (MemoryTermStore, MemoryEdgeStore) {
        let mut terms = MemoryTermStore::new();
        for lid in ["colors", "red", "blue", "warm"] {
            terms.insert(TermDocument::new("", lid));
        }
        let mut edges = MemoryEdgeStore::new();
        edges.insert(Edge::new("red", "colors", Predicate::EnumOf).with_root("colors"));
        edges.insert(Edge::new("blue", "colors", Predicate::EnumOf).with_root("colors"));
        edges.insert(Edge::new("warm", "colors", Predicate::SectionOf).with_root("colors"));
        (terms, edges)
    }

    #[test]
    fn members_excludes_non_functional() {
        let (terms, edges) = fixture();
        let resolver = GraphResolver::new(&terms, &edges);
        let members = resolver
            .members(&root(), Predicate::EnumOf, Direction::ManyToOne)
            .unwrap();
        assert_eq!(
            members,
            BTreeSet::from([GlobalId::new("red"), GlobalId::new("blue")])
        );
    }

    #[test]
    fn unknown_root_rejected_before_traversal() {
        let (terms, edges) = fixture();
        let resolver = GraphResolver::new(&terms, &edges);
        let err = resolver
            .members(&GlobalId::new("missing"), Predicate::EnumOf, Direction::ManyToOne)
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownRoot(_)));
    }

    #[test]
    fn resolve_of_non_member_is_none() {
        let (mut terms, edges) = fixture();
        terms.insert(TermDocument::new("", "stranger"));
        let resolver = GraphResolver::new(&terms, &edges);
        let spec = TraversalSpec::new(Predicate::EnumOf);
        let resolved = resolver
            .resolve_preferred(&root(), &GlobalId::new("stranger"), &spec)
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn resolve_canonical_is_idempotent() {
        let (terms, edges) = fixture();
        let resolver = GraphResolver::new(&terms, &edges);
        let spec = TraversalSpec::new(Predicate::EnumOf);
        let red = GlobalId::new("red");
        let first = resolver.resolve_preferred(&root(), &red, &spec).unwrap();
        assert_eq!(first, Some(red.clone()));
        let again = resolver.resolve_preferred(&root(), &red, &spec).unwrap();
        assert_eq!(first, again);
    }
}
