//! # Term Documents
//!
//! A term is a vertex of the dictionary graph: its identifier section
//! (`_gid`, `_nid`, `_lid`, `_aid`, `_pid`), an optional data block
//! describing it as a descriptor, and an optional rule block describing
//! it as an object-structure definition.
//!
//! Terms are immutable inputs to validation. The blocks are kept as raw
//! JSON and parsed on demand against the vocabulary the engine was built
//! with; a term document does not bake in any particular field-name
//! dialect beyond its identifier section.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::DataBlock;
use crate::error::ModelError;
use crate::identity::{GlobalId, IdentifierField, DEFAULT_SEPARATOR};
use crate::rule::RuleBlock;
use crate::vocabulary::Vocabulary;

/// A term of the data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDocument {
    /// Global identifier: namespace + separator + local identifier.
    #[serde(rename = "_gid")]
    pub gid: GlobalId,

    /// Namespace identifier, absent for top-level terms.
    #[serde(rename = "_nid", default, skip_serializing_if = "Option::is_none")]
    pub nid: Option<String>,

    /// Local identifier within the namespace.
    #[serde(rename = "_lid")]
    pub lid: String,

    /// Official identifiers set; includes `_lid` by convention.
    #[serde(rename = "_aid", default, skip_serializing_if = "Vec::is_empty")]
    pub official_ids: Vec<String>,

    /// Provider identifiers set.
    #[serde(rename = "_pid", default, skip_serializing_if = "Vec::is_empty")]
    pub provider_ids: Vec<String>,

    /// Raw data block, when the term acts as a descriptor.
    #[serde(rename = "_data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Raw rule block, when the term acts as a structure definition.
    #[serde(rename = "_rule", default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Value>,
}

impl TermDocument {
    /// Create a term from its namespace and local identifier. The global
    /// identifier is derived with the default separator and the official
    /// identifiers set is seeded with the local identifier.
    pub fn new(nid: &str, lid: &str) -> Self {
        Self::from_gid(GlobalId::from_parts(nid, lid, DEFAULT_SEPARATOR), nid, lid)
    }

    /// Create a term under a specific vocabulary dialect; the global
    /// identifier is joined with the vocabulary's separator.
    pub fn new_in(vocab: &Vocabulary, nid: &str, lid: &str) -> Self {
        Self::from_gid(vocab.global_id(nid, lid), nid, lid)
    }

    fn from_gid(gid: GlobalId, nid: &str, lid: &str) -> Self {
        Self {
            gid,
            nid: (!nid.is_empty()).then(|| nid.to_string()),
            lid: lid.to_string(),
            official_ids: vec![lid.to_string()],
            provider_ids: Vec::new(),
            data: None,
            rule: None,
        }
    }

    /// Attach a raw data block (builder style).
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a raw rule block (builder style).
    pub fn with_rule(mut self, rule: Value) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Add an official identifier (builder style).
    pub fn with_official_id(mut self, aid: &str) -> Self {
        if !self.official_ids.iter().any(|a| a == aid) {
            self.official_ids.push(aid.to_string());
        }
        self
    }

    /// Add a provider identifier (builder style).
    pub fn with_provider_id(mut self, pid: &str) -> Self {
        if !self.provider_ids.iter().any(|p| p == pid) {
            self.provider_ids.push(pid.to_string());
        }
        self
    }

    /// Whether this term declares a data block and can act as a descriptor.
    pub fn is_descriptor(&self) -> bool {
        self.data.is_some()
    }

    /// Whether this term declares a rule block and can act as a structure
    /// definition.
    pub fn is_structure(&self) -> bool {
        self.rule.is_some()
    }

    /// Parse the data block against a vocabulary, if one is declared.
    pub fn data_block(&self, vocab: &Vocabulary) -> Option<Result<DataBlock, ModelError>> {
        self.data.as_ref().map(|raw| DataBlock::parse(raw, vocab))
    }

    /// Parse the rule block against a vocabulary, if one is declared.
    pub fn rule_block(&self, vocab: &Vocabulary) -> Option<Result<RuleBlock, ModelError>> {
        self.rule.as_ref().map(|raw| RuleBlock::parse(raw, vocab))
    }

    /// Whether `code` appears in the given identifier field of this term.
    pub fn matches_field(&self, field: IdentifierField, code: &str) -> bool {
        match field {
            IdentifierField::Local => self.lid == code,
            IdentifierField::Global => self.gid.as_str() == code,
            IdentifierField::Namespace => self.nid.as_deref() == Some(code),
            IdentifierField::Official => self.official_ids.iter().any(|a| a == code),
            IdentifierField::Provider => self.provider_ids.iter().any(|p| p == code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_derives_gid_and_seeds_aid() {
        let term = TermDocument::new("iso_639_1", "en");
        assert_eq!(term.gid.as_str(), "iso_639_1_en");
        assert_eq!(term.nid.as_deref(), Some("iso_639_1"));
        assert_eq!(term.official_ids, vec!["en"]);
    }

    #[test]
    fn new_in_joins_with_vocabulary_separator() {
        let vocab = Vocabulary {
            separator: ".".into(),
            ..Vocabulary::default()
        };
        let term = TermDocument::new_in(&vocab, "iso_639_1", "en");
        assert_eq!(term.gid.as_str(), "iso_639_1.en");
        assert_eq!(term.official_ids, vec!["en"]);
    }

    #[test]
    fn field_matching() {
        let term = TermDocument::new("iso_639_1", "en").with_official_id("eng");
        assert!(term.matches_field(IdentifierField::Local, "en"));
        assert!(term.matches_field(IdentifierField::Global, "iso_639_1_en"));
        assert!(term.matches_field(IdentifierField::Official, "eng"));
        assert!(term.matches_field(IdentifierField::Namespace, "iso_639_1"));
        assert!(!term.matches_field(IdentifierField::Provider, "en"));
    }

    #[test]
    fn descriptor_and_structure_flags() {
        let term = TermDocument::new("", "thing");
        assert!(!term.is_descriptor());
        assert!(!term.is_structure());

        let term = term
            .with_data(json!({"_scalar": {"_type": "_type_string"}}))
            .with_rule(json!({"_required": ["a"]}));
        assert!(term.is_descriptor());
        assert!(term.is_structure());
    }

    #[test]
    fn serde_round_trip_uses_underscore_names() {
        let term = TermDocument::new("iso_639_1", "en");
        let value = serde_json::to_value(&term).unwrap();
        assert_eq!(value["_gid"], "iso_639_1_en");
        assert_eq!(value["_lid"], "en");
        let back: TermDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, term);
    }
}
