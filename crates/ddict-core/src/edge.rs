//! # Edge Model — Labelled Relations of the Dictionary Graph
//!
//! A directed edge `(from, to, predicate, path)` where `path` is the set
//! of vocabulary roots the edge participates in. Edges are shared across
//! controlled vocabularies: one membership edge can serve several roots,
//! so the scope filter is a set-containment test, not an equality test.
//!
//! Predicates are a closed enum with exhaustive matching. Functional
//! predicates denote genuine membership; non-functional predicates are
//! grouping or type-indirection and are skipped when flattening but
//! traversed when resolving preferred terms.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::GlobalId;

/// The relationship function an edge carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Predicate {
    /// The source is an actual member of the enumeration (functional).
    #[serde(rename = "_predicate_enum-of")]
    EnumOf,
    /// The source is an actual property of the structure (functional).
    #[serde(rename = "_predicate_property-of")]
    PropertyOf,
    /// The source is a field of the form/structure (functional).
    #[serde(rename = "_predicate_field-of")]
    FieldOf,
    /// Grouping relation inside a vocabulary (non-functional).
    #[serde(rename = "_predicate_section-of")]
    SectionOf,
    /// Type-indirection between vocabularies (non-functional).
    #[serde(rename = "_predicate_bridge-of")]
    BridgeOf,
}

impl Predicate {
    /// Whether this predicate denotes genuine vocabulary/structure
    /// membership, as opposed to grouping or indirection.
    pub fn is_functional(&self) -> bool {
        matches!(self, Self::EnumOf | Self::PropertyOf | Self::FieldOf)
    }

    /// The serialized tag of this predicate.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnumOf => "_predicate_enum-of",
            Self::PropertyOf => "_predicate_property-of",
            Self::FieldOf => "_predicate_field-of",
            Self::SectionOf => "_predicate_section-of",
            Self::BridgeOf => "_predicate_bridge-of",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traversal direction over the stored edge direction.
///
/// Edges are stored leaf→root (a member points at what it belongs to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Follow edges as stored, leaf→root (the default).
    #[default]
    ManyToOne,
    /// Follow edges in reverse, root→leaf.
    OneToMany,
}

/// A directed, labelled edge of the dictionary graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex (the member/leaf side under the storage convention).
    #[serde(rename = "_from")]
    pub from: GlobalId,
    /// Target vertex (the root/group side under the storage convention).
    #[serde(rename = "_to")]
    pub to: GlobalId,
    /// The relationship function of this edge.
    #[serde(rename = "_predicate")]
    pub predicate: Predicate,
    /// The set of vocabulary roots this edge participates in.
    #[serde(rename = "_path", default)]
    pub path: BTreeSet<GlobalId>,
}

impl Edge {
    /// Create an edge with an empty root set.
    pub fn new(
        from: impl Into<GlobalId>,
        to: impl Into<GlobalId>,
        predicate: Predicate,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            predicate,
            path: BTreeSet::new(),
        }
    }

    /// Add a vocabulary root this edge serves (builder style).
    pub fn with_root(mut self, root: impl Into<GlobalId>) -> Self {
        self.path.insert(root.into());
        self
    }

    /// Whether this edge participates in the given vocabulary root.
    pub fn serves(&self, root: &GlobalId) -> bool {
        self.path.contains(root)
    }

    /// The endpoint a walk in `direction` departs from.
    pub fn source(&self, direction: Direction) -> &GlobalId {
        match direction {
            Direction::ManyToOne => &self.from,
            Direction::OneToMany => &self.to,
        }
    }

    /// The endpoint a walk in `direction` arrives at.
    pub fn target(&self, direction: Direction) -> &GlobalId {
        match direction {
            Direction::ManyToOne => &self.to,
            Direction::OneToMany => &self.from,
        }
    }
}
