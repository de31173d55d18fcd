//! # ddict-core — Foundational Types for the Data Dictionary
//!
//! This crate is the bedrock of the ddict stack. It defines the term and
//! edge models of the dictionary graph, the data/rule block schema types,
//! the error-kind taxonomy shared by the validation and graph layers, and
//! the abstract store contracts every engine reads through. Every other
//! crate in the workspace depends on `ddict-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `GlobalId` and `TermHandle`
//!    are newtypes with validated constructors. No bare strings for
//!    identifiers at API boundaries.
//!
//! 2. **Closed enums for tags.** Scalar type tags, edge predicates, kind
//!    qualifiers, and error kinds are exhaustive enums. Adding a variant
//!    forces every consumer to handle it; there is no string fall-through.
//!
//! 3. **Explicit vocabulary.** Every configurable field name lives in a
//!    [`Vocabulary`] value passed into the engines at construction. No
//!    frozen global constants object.
//!
//! 4. **Failures are values.** Validation outcomes travel as [`ErrorKind`]
//!    inside reports; only infrastructure failures ([`StoreError`]) travel
//!    through `Result`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ddict-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public model types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod data;
pub mod edge;
pub mod error;
pub mod identity;
pub mod memory;
pub mod rule;
pub mod store;
pub mod term;
pub mod vocabulary;

// Re-export primary types for ergonomic imports.
pub use data::{
    parse_instant, Bound, DataBlock, KindRef, KindWildcard, Range, RangeCheck, ScalarType,
    TypeDescriptor,
};
pub use edge::{Direction, Edge, Predicate};
pub use error::{ErrorCategory, ErrorKind, ModelError, StoreError};
pub use identity::{GlobalId, HandleError, IdentifierField, TermHandle, DEFAULT_SEPARATOR};
pub use memory::{MemoryEdgeStore, MemoryTermStore};
pub use rule::{RuleBlock, SelectionGroups};
pub use store::{EdgeFilter, EdgeStore, TermStore};
pub use term::TermDocument;
pub use vocabulary::Vocabulary;
