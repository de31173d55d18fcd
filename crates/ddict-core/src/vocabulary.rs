//! # Schema Vocabulary
//!
//! The field names the dictionary model is written in. Upstream metadata
//! dialects differ in the exact keys they use for blocks and constraints,
//! so every configurable name lives in one immutable [`Vocabulary`] value
//! handed to the engines at construction time. There is no global
//! constants object; an engine sees exactly the vocabulary it was built
//! with.
//!
//! Closed tags (scalar type tags, predicate tags, kind wildcards) are NOT
//! part of the vocabulary — they are enum variants with fixed serde names,
//! so dispatch over them is exhaustive.

use crate::identity::GlobalId;

/// Field-name configuration for term documents and their blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Key of the data block on a term document.
    pub data_key: String,
    /// Key of the rule block on a term document.
    pub rule_key: String,

    /// Scalar shape key inside a data block.
    pub scalar_key: String,
    /// Array shape key inside a data block.
    pub array_key: String,
    /// Set shape key inside a data block.
    pub set_key: String,
    /// Dictionary shape key inside a data block.
    pub dict_key: String,
    /// Key sub-schema section inside a dictionary shape.
    pub dict_key_section: String,
    /// Value sub-schema section inside a dictionary shape.
    pub dict_value_section: String,

    /// Scalar type tag key inside a type descriptor.
    pub type_key: String,
    /// Kind qualifier key inside a type descriptor.
    pub kind_key: String,
    /// Value range key inside a type descriptor.
    pub valid_range_key: String,
    /// Element-count range key inside a type descriptor.
    pub elements_key: String,
    /// Regular expression key inside a type descriptor.
    pub regexp_key: String,

    /// Inclusive minimum bound key inside a range.
    pub min_inclusive_key: String,
    /// Exclusive minimum bound key inside a range.
    pub min_exclusive_key: String,
    /// Inclusive maximum bound key inside a range.
    pub max_inclusive_key: String,
    /// Exclusive maximum bound key inside a range.
    pub max_exclusive_key: String,

    /// Required-properties key inside a rule block.
    pub required_key: String,
    /// Banned-properties key inside a rule block.
    pub banned_key: String,
    /// Recommended-properties key inside a rule block.
    pub recommended_key: String,
    /// Exactly-one selection group key.
    pub selection_one_key: String,
    /// One-or-none selection group key.
    pub selection_one_none_key: String,
    /// At-least-one selection group key.
    pub selection_any_key: String,
    /// All-of selection group key.
    pub selection_all_key: String,

    /// Separator joining namespace and local identifier in a global id.
    pub separator: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            data_key: "_data".into(),
            rule_key: "_rule".into(),
            scalar_key: "_scalar".into(),
            array_key: "_array".into(),
            set_key: "_set".into(),
            dict_key: "_dict".into(),
            dict_key_section: "_dict_key".into(),
            dict_value_section: "_dict_value".into(),
            type_key: "_type".into(),
            kind_key: "_kind".into(),
            valid_range_key: "_valid-range".into(),
            elements_key: "_elements".into(),
            regexp_key: "_regexp".into(),
            min_inclusive_key: "min-inclusive".into(),
            min_exclusive_key: "min-exclusive".into(),
            max_inclusive_key: "max-inclusive".into(),
            max_exclusive_key: "max-exclusive".into(),
            required_key: "_required".into(),
            banned_key: "_banned".into(),
            recommended_key: "_recommended".into(),
            selection_one_key: "_selection-descriptors_one".into(),
            selection_one_none_key: "_selection-descriptors_one-none".into(),
            selection_any_key: "_selection-descriptors_any".into(),
            selection_all_key: "_selection-descriptors_all".into(),
            separator: "_".into(),
        }
    }
}

impl Vocabulary {
    /// The four mutually exclusive shape keys of a data block.
    pub fn shape_keys(&self) -> [&str; 4] {
        [
            self.scalar_key.as_str(),
            self.array_key.as_str(),
            self.set_key.as_str(),
            self.dict_key.as_str(),
        ]
    }

    /// Join a namespace and local identifier with this vocabulary's
    /// separator.
    pub fn global_id(&self, nid: &str, lid: &str) -> GlobalId {
        GlobalId::from_parts(nid, lid, &self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shape_keys() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.shape_keys(), ["_scalar", "_array", "_set", "_dict"]);
    }

    #[test]
    fn separator_drives_global_ids() {
        let vocab = Vocabulary {
            separator: ":".into(),
            ..Vocabulary::default()
        };
        assert_eq!(vocab.global_id("iso_639_1", "en").as_str(), "iso_639_1:en");
        assert_eq!(
            Vocabulary::default().global_id("iso_639_1", "en").as_str(),
            "iso_639_1_en"
        );
    }
}
