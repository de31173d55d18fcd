//! Integration coverage for the resolver contracts over a realistic
//! language-code vocabulary: ISO 639-1 two-letter aliases bridging to
//! their preferred ISO 639-3 three-letter terms.

use std::collections::BTreeSet;

use ddict_core::{
    Direction, Edge, GlobalId, IdentifierField, MemoryEdgeStore, MemoryTermStore, Predicate,
    TermDocument,
};
use ddict_graph::{GraphResolver, TraversalSpec};

/// Builds the vocabulary:
///
/// - root `iso_639_1`
/// - canonical members `iso_639_3_eng`, `iso_639_3_fra` (enum-of edges)
/// - aliases `iso_639_1_en`, `iso_639_1_fr` bridging to the canonical
///   terms (bridge-of edges), carrying the two-letter codes in `_aid`
fn language_fixture() -> (MemoryTermStore, MemoryEdgeStore) {
    let mut terms = MemoryTermStore::new();
    terms.insert(TermDocument::new("", "iso_639_1"));
    terms.insert(TermDocument::new("iso_639_3", "eng"));
    terms.insert(TermDocument::new("iso_639_3", "fra"));
    terms.insert(TermDocument::new("iso_639_1", "en").with_official_id("en"));
    terms.insert(TermDocument::new("iso_639_1", "fr").with_official_id("fr"));

    let mut edges = MemoryEdgeStore::new();
    edges.insert(
        Edge::new("iso_639_3_eng", "iso_639_1", Predicate::EnumOf).with_root("iso_639_1"),
    );
    edges.insert(
        Edge::new("iso_639_3_fra", "iso_639_1", Predicate::EnumOf).with_root("iso_639_1"),
    );
    edges.insert(
        Edge::new("iso_639_1_en", "iso_639_3_eng", Predicate::BridgeOf).with_root("iso_639_1"),
    );
    edges.insert(
        Edge::new("iso_639_1_fr", "iso_639_3_fra", Predicate::BridgeOf).with_root("iso_639_1"),
    );
    (terms, edges)
}

fn root() -> GlobalId {
    GlobalId::new("iso_639_1")
}

#[test]
fn flatten_returns_canonical_members_only() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let members = resolver
        .members(&root(), Predicate::EnumOf, Direction::ManyToOne)
        .unwrap();
    assert_eq!(
        members,
        BTreeSet::from([
            GlobalId::new("iso_639_3_eng"),
            GlobalId::new("iso_639_3_fra")
        ])
    );
}

#[test]
fn alias_resolves_through_bridge_to_preferred_term() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf);
    let resolved = resolver
        .resolve_preferred(&root(), &GlobalId::new("iso_639_1_en"), &spec)
        .unwrap();
    assert_eq!(resolved, Some(GlobalId::new("iso_639_3_eng")));
}

#[test]
fn canonical_term_resolves_to_itself_without_drift() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf);
    let eng = GlobalId::new("iso_639_3_eng");
    let first = resolver.resolve_preferred(&root(), &eng, &spec).unwrap();
    assert_eq!(first, Some(eng.clone()));
    let second = resolver.resolve_preferred(&root(), &eng, &spec).unwrap();
    assert_eq!(first, second);
}

#[test]
fn match_on_official_field_yields_preferred_term() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf);
    let matched = resolver
        .match_by_field(&root(), "en", IdentifierField::Official, &spec)
        .unwrap();
    assert_eq!(matched, vec![GlobalId::new("iso_639_3_eng")]);
}

#[test]
fn match_with_no_hits_is_empty_not_error() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf);
    let matched = resolver
        .match_by_field(&root(), "zz", IdentifierField::Official, &spec)
        .unwrap();
    assert!(matched.is_empty());
}

#[test]
fn resolution_respects_level_bound() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf).with_max_level(0);
    let resolved = resolver
        .resolve_preferred(&root(), &GlobalId::new("iso_639_1_en"), &spec)
        .unwrap();
    assert_eq!(resolved, None);
}

#[test]
fn flatten_agrees_with_one_hop_paths() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let members = resolver
        .members(&root(), Predicate::EnumOf, Direction::ManyToOne)
        .unwrap();

    // Every member is reachable from the root by exactly one functional
    // hop, and every one-hop-reachable vertex is a member.
    let spec = TraversalSpec::new(Predicate::EnumOf)
        .with_non_functional(Vec::new())
        .with_direction(Direction::OneToMany);
    for member in &members {
        let paths = resolver.paths_to(&root(), member, &spec, 0, 1).unwrap();
        assert_eq!(paths.len(), 1, "expected a single-hop path to {member}");
        assert_eq!(paths[0].len(), 1);
    }
    let absent = resolver
        .paths_to(&root(), &GlobalId::new("iso_639_1_en"), &spec, 0, 1)
        .unwrap();
    assert!(absent.is_empty());
}

#[test]
fn path_search_honors_min_level() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf).with_direction(Direction::OneToMany);

    // Zero hops from the root to itself.
    let trivial = resolver.paths_to(&root(), &root(), &spec, 0, 3).unwrap();
    assert_eq!(trivial.len(), 1);
    assert!(trivial[0].is_empty());

    // Raising the minimum excludes it.
    let none = resolver.paths_to(&root(), &root(), &spec, 1, 3).unwrap();
    assert!(none.is_empty());

    // The alias sits two hops down (enum-of then bridge-of, reversed).
    let deep = resolver
        .paths_to(&root(), &GlobalId::new("iso_639_1_en"), &spec, 2, 3)
        .unwrap();
    assert_eq!(deep.len(), 1);
    assert_eq!(deep[0].len(), 2);
    let vertices: Vec<_> = deep[0].vertices().map(GlobalId::as_str).collect();
    assert_eq!(vertices, vec!["iso_639_3_eng", "iso_639_1_en"]);
}

#[test]
fn tree_groups_children_by_predicate() {
    let (terms, edges) = language_fixture();
    let resolver = GraphResolver::new(&terms, &edges);
    let spec = TraversalSpec::new(Predicate::EnumOf).with_direction(Direction::OneToMany);
    let tree = resolver.tree(&root(), &spec, 2).unwrap();

    let root_children = &tree[&root()];
    assert_eq!(
        root_children[&Predicate::EnumOf],
        BTreeSet::from([
            GlobalId::new("iso_639_3_eng"),
            GlobalId::new("iso_639_3_fra")
        ])
    );

    let eng_children = &tree[&GlobalId::new("iso_639_3_eng")];
    assert_eq!(
        eng_children[&Predicate::BridgeOf],
        BTreeSet::from([GlobalId::new("iso_639_1_en")])
    );

    // Leaves appear with no children.
    assert!(tree[&GlobalId::new("iso_639_1_en")].is_empty());
}
