//! # Bounded Graph Walk
//!
//! The one traversal primitive every resolver contract is built on: a
//! work-queue (breadth-first) or stack (depth-first) of vertex/path
//! pairs, a per-path visited set, and a predicate/scope filter applied
//! before a neighbor is enqueued.
//!
//! "Per-path" visited means a vertex may legitimately be reached again
//! via a different branch, but never twice within one path — that is
//! what guarantees termination on cyclic, user-authored graphs without
//! suppressing alternative routes.
//!
//! Depth-first expansion pushes neighbors in reverse scan order, so both
//! orders visit a vertex's edges in store insertion order and every walk
//! is deterministic.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use ddict_core::{Direction, Edge, EdgeFilter, EdgeStore, GlobalId, Predicate, StoreError};

/// Traversal order of the walk frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Expand the frontier level by level (work queue).
    #[default]
    BreadthFirst,
    /// Follow each branch to its bound before backtracking (stack).
    DepthFirst,
}

/// One hop of a walk: the vertex arrived at and the edge that led there.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    /// The vertex this step arrived at.
    pub vertex: GlobalId,
    /// The edge traversed to arrive there.
    pub edge: Edge,
}

/// Parameters of a bounded walk.
#[derive(Debug, Clone)]
pub struct WalkSpec {
    /// Vocabulary root every traversed edge must serve.
    pub scope: GlobalId,
    /// Predicates an edge may carry to be traversed.
    pub predicates: Vec<Predicate>,
    /// Direction over the stored edge orientation.
    pub direction: Direction,
    /// Maximum number of hops from the start vertex.
    pub max_level: usize,
    /// Frontier order.
    pub order: Order,
}

/// A single visit delivered to the walk callback.
#[derive(Debug)]
pub struct Visit<'a> {
    /// The vertex being visited.
    pub vertex: &'a GlobalId,
    /// The edge by which it was reached.
    pub edge: &'a Edge,
    /// Hops from the start vertex (1-based).
    pub level: usize,
    /// The full path from the first hop to this visit, inclusive.
    pub path: &'a [PathStep],
}

struct Frame {
    vertex: GlobalId,
    level: usize,
    path: Vec<PathStep>,
}

/// Walk the graph from `start`, delivering each visit to `on_visit` until
/// the bound is exhausted or the callback breaks.
pub fn walk<E, F>(
    edges: &E,
    start: &GlobalId,
    spec: &WalkSpec,
    mut on_visit: F,
) -> Result<(), StoreError>
where
    E: EdgeStore,
    F: FnMut(Visit<'_>) -> ControlFlow<()>,
{
    let mut frontier: VecDeque<Frame> = VecDeque::new();
    frontier.push_back(Frame {
        vertex: start.clone(),
        level: 0,
        path: Vec::new(),
    });

    while let Some(frame) = match spec.order {
        Order::BreadthFirst => frontier.pop_front(),
        Order::DepthFirst => frontier.pop_back(),
    } {
        if let Some(step) = frame.path.last() {
            let visit = Visit {
                vertex: &frame.vertex,
                edge: &step.edge,
                level: frame.level,
                path: &frame.path,
            };
            if on_visit(visit).is_break() {
                return Ok(());
            }
        }

        if frame.level >= spec.max_level {
            continue;
        }

        let filter = neighbor_filter(spec, &frame.vertex);
        let scanned = edges.scan(&filter)?;
        let mut successors = Vec::with_capacity(scanned.len());
        for edge in scanned {
            let next = edge.target(spec.direction).clone();
            // Unique vertices per path: the start vertex and anything
            // already on this path is pruned before enqueueing.
            if next == *start || frame.path.iter().any(|step| step.vertex == next) {
                continue;
            }
            let mut path = frame.path.clone();
            path.push(PathStep {
                vertex: next.clone(),
                edge,
            });
            successors.push(Frame {
                vertex: next,
                level: frame.level + 1,
                path,
            });
        }
        match spec.order {
            Order::BreadthFirst => frontier.extend(successors),
            Order::DepthFirst => frontier.extend(successors.into_iter().rev()),
        }
    }

    Ok(())
}

fn neighbor_filter(spec: &WalkSpec, vertex: &GlobalId) -> EdgeFilter {
    let filter = EdgeFilter::new()
        .scoped_to(spec.scope.clone())
        .with_predicates(spec.predicates.clone());
    match spec.direction {
        Direction::ManyToOne => filter.from_vertex(vertex.clone()),
        Direction::OneToMany => filter.to_vertex(vertex.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddict_core::MemoryEdgeStore;

    fn spec(max_level: usize, order: Order) -> WalkSpec {
        WalkSpec {
            scope: GlobalId::new("v"),
            predicates: vec![Predicate::SectionOf, Predicate::EnumOf],
            direction: Direction::ManyToOne,
            max_level,
            order,
        }
    }

    fn chain_store() -> MemoryEdgeStore {
        let mut store = MemoryEdgeStore::new();
        store.insert(Edge::new("a", "b", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("b", "c", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("c", "d", Predicate::EnumOf).with_root("v"));
        store
    }

    fn visited(store: &MemoryEdgeStore, spec: &WalkSpec) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        walk(store, &GlobalId::new("a"), spec, |visit| {
            out.push((visit.vertex.as_str().to_string(), visit.level));
            ControlFlow::Continue(())
        })
        .unwrap();
        out
    }

    #[test]
    fn walk_respects_max_level() {
        let store = chain_store();
        assert_eq!(
            visited(&store, &spec(2, Order::BreadthFirst)),
            vec![("b".to_string(), 1), ("c".to_string(), 2)]
        );
        assert!(visited(&store, &spec(0, Order::BreadthFirst)).is_empty());
    }

    #[test]
    fn cycle_terminates() {
        let mut store = MemoryEdgeStore::new();
        store.insert(Edge::new("a", "b", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("b", "a", Predicate::SectionOf).with_root("v"));
        let order = visited(&store, &spec(10, Order::BreadthFirst));
        // "a" is never re-entered on the same path, so the walk stops.
        assert_eq!(order, vec![("b".to_string(), 1)]);
    }

    #[test]
    fn revisit_allowed_on_different_branch() {
        let mut store = MemoryEdgeStore::new();
        store.insert(Edge::new("a", "b", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("a", "c", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("b", "d", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("c", "d", Predicate::SectionOf).with_root("v"));
        let order = visited(&store, &spec(3, Order::BreadthFirst));
        let d_visits = order.iter().filter(|(v, _)| v == "d").count();
        assert_eq!(d_visits, 2);
    }

    #[test]
    fn orders_visit_edges_in_insertion_order() {
        let mut store = MemoryEdgeStore::new();
        store.insert(Edge::new("a", "b", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("a", "c", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("b", "x", Predicate::SectionOf).with_root("v"));

        let bfs = visited(&store, &spec(2, Order::BreadthFirst));
        assert_eq!(
            bfs,
            vec![
                ("b".to_string(), 1),
                ("c".to_string(), 1),
                ("x".to_string(), 2)
            ]
        );

        let dfs = visited(&store, &spec(2, Order::DepthFirst));
        assert_eq!(
            dfs,
            vec![
                ("b".to_string(), 1),
                ("x".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn early_break_stops_walk() {
        let store = chain_store();
        let mut count = 0;
        walk(&store, &GlobalId::new("a"), &spec(5, Order::BreadthFirst), |_| {
            count += 1;
            ControlFlow::Break(())
        })
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn scope_prunes_foreign_edges() {
        let mut store = MemoryEdgeStore::new();
        store.insert(Edge::new("a", "b", Predicate::SectionOf).with_root("v"));
        store.insert(Edge::new("a", "c", Predicate::SectionOf).with_root("other"));
        let order = visited(&store, &spec(1, Order::BreadthFirst));
        assert_eq!(order, vec![("b".to_string(), 1)]);
    }
}
