//! # Rule Blocks — Object Structure Constraints
//!
//! A term carrying a rule block acts as an object-structure definition:
//! required, banned, and recommended property sets plus selection groups
//! that constrain how many of a named property list may appear at once.
//!
//! Recommended properties are parsed but carry no enforcement; they are
//! advisory and left to the embedding service to surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::vocabulary::Vocabulary;

/// The selection groups of a rule block. Each group is a list of
/// property names with an arity constraint over how many may be present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionGroups {
    /// Exactly one of the listed properties must be present.
    pub one: Vec<Vec<String>>,
    /// At most one of the listed properties may be present.
    pub one_or_none: Vec<Vec<String>>,
    /// At least one of the listed properties must be present.
    pub any: Vec<Vec<String>>,
    /// All of the listed properties must be present.
    pub all: Vec<Vec<String>>,
}

/// The structural constraints a term imposes on object values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleBlock {
    /// Properties that must be present.
    pub required: Vec<String>,
    /// Properties that must not be present.
    pub banned: Vec<String>,
    /// Properties whose absence is advisory only.
    pub recommended: Vec<String>,
    /// Arity-constrained property groups.
    pub selection: SelectionGroups,
}

impl RuleBlock {
    /// Parse a rule block using the vocabulary's keys.
    pub fn parse(block: &Value, vocab: &Vocabulary) -> Result<Self, ModelError> {
        let map = block.as_object().ok_or_else(|| ModelError::Malformed {
            section: vocab.rule_key.clone(),
            reason: "rule block must be an object".to_string(),
        })?;

        Ok(Self {
            required: parse_names(map.get(&vocab.required_key), &vocab.required_key)?,
            banned: parse_names(map.get(&vocab.banned_key), &vocab.banned_key)?,
            recommended: parse_names(map.get(&vocab.recommended_key), &vocab.recommended_key)?,
            selection: SelectionGroups {
                one: parse_groups(map.get(&vocab.selection_one_key), &vocab.selection_one_key)?,
                one_or_none: parse_groups(
                    map.get(&vocab.selection_one_none_key),
                    &vocab.selection_one_none_key,
                )?,
                any: parse_groups(map.get(&vocab.selection_any_key), &vocab.selection_any_key)?,
                all: parse_groups(map.get(&vocab.selection_all_key), &vocab.selection_all_key)?,
            },
        })
    }

    /// Whether the block carries no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
            && self.banned.is_empty()
            && self.selection.one.is_empty()
            && self.selection.one_or_none.is_empty()
            && self.selection.any.is_empty()
            && self.selection.all.is_empty()
    }
}

/// Parse a flat list of property names.
fn parse_names(value: Option<&Value>, section: &str) -> Result<Vec<String>, ModelError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or_else(|| ModelError::Malformed {
        section: section.to_string(),
        reason: "expected an array of property names".to_string(),
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ModelError::Malformed {
                    section: section.to_string(),
                    reason: "property names must be strings".to_string(),
                })
        })
        .collect()
}

/// Parse selection groups: either one flat list of names (a single
/// group) or a list of lists (several groups).
fn parse_groups(value: Option<&Value>, section: &str) -> Result<Vec<Vec<String>>, ModelError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or_else(|| ModelError::Malformed {
        section: section.to_string(),
        reason: "expected an array".to_string(),
    })?;
    if items.iter().all(Value::is_string) {
        let group = parse_names(Some(value), section)?;
        return Ok(if group.is_empty() { Vec::new() } else { vec![group] });
    }
    items
        .iter()
        .map(|item| parse_names(Some(item), section))
        .collect()
}
