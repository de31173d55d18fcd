//! # ddict-graph — Controlled-Vocabulary Graph Resolver
//!
//! Algorithms over the directed, multi-predicate term graph: flattening
//! an enumeration subgraph into its member terms, resolving a candidate
//! code to its preferred (canonical) term by walking non-functional
//! edges, bounded-depth root↔target path search, and tree serialization
//! of a navigable subgraph.
//!
//! Everything here is synchronous, stateless, and read-only: each call
//! takes a root and a traversal specification, reads through the store
//! contracts of `ddict-core`, and returns a value. "Not found" is always
//! a valid empty or `None` result, never an error; only store failures
//! and an unknown vocabulary root travel through `Err`.
//!
//! Traversal is an explicit bounded walk (work-queue or stack of
//! vertex/path pairs with a per-path visited set), so user-authored
//! cycles terminate and repeated calls are idempotent.

pub mod cache;
pub mod resolver;
pub mod walk;

pub use cache::TermCache;
pub use resolver::{GraphError, GraphPath, GraphResolver, TraversalSpec, DEFAULT_MAX_LEVEL};
pub use walk::{Order, PathStep, Visit, WalkSpec};
