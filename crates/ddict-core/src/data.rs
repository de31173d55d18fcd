//! # Data Blocks and Type Descriptors
//!
//! A descriptor term declares the shape and scalar type of the values it
//! may take through its data block: exactly one of four mutually
//! exclusive shapes (scalar, array, set, dictionary), each wrapping a
//! type descriptor. A data block with zero shape keys is valid and
//! unconstrained; a data block with an unrecognized key is invalid.
//!
//! Scalar types and kind qualifiers are closed enums — there is no
//! string fall-through in dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::identity::GlobalId;
use crate::vocabulary::Vocabulary;

/// The scalar data type a type descriptor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Strict boolean.
    #[serde(rename = "_type_boolean")]
    Boolean,
    /// Strict integer (exact integral representations only).
    #[serde(rename = "_type_integer")]
    Integer,
    /// Any numeric value.
    #[serde(rename = "_type_number")]
    Number,
    /// Epoch milliseconds or a parseable date string.
    #[serde(rename = "_type_timestamp")]
    Timestamp,
    /// Strict string.
    #[serde(rename = "_type_string")]
    String,
    /// String resolving to an existing term store key.
    #[serde(rename = "_type_string_key")]
    StringKey,
    /// String `collection/key` reference resolvable in the term store.
    #[serde(rename = "_type_string_handle")]
    StringHandle,
    /// String that is (or resolves to) a member of an enumeration.
    #[serde(rename = "_type_string_enum")]
    StringEnum,
    /// Object, optionally validated against a referenced structure.
    #[serde(rename = "_type_object")]
    Object,
    /// Object constrained to minimal GeoJSON geometry invariants.
    #[serde(rename = "_type_object_geojson")]
    ObjectGeojson,
}

impl ScalarType {
    /// Parse a scalar type tag. Unknown tags are a model error, surfaced
    /// by the validation engine as `UnsupportedDataType`.
    pub fn from_tag(tag: &str) -> Result<Self, ModelError> {
        match tag {
            "_type_boolean" => Ok(Self::Boolean),
            "_type_integer" => Ok(Self::Integer),
            "_type_number" => Ok(Self::Number),
            "_type_timestamp" => Ok(Self::Timestamp),
            "_type_string" => Ok(Self::String),
            "_type_string_key" => Ok(Self::StringKey),
            "_type_string_handle" => Ok(Self::StringHandle),
            "_type_string_enum" => Ok(Self::StringEnum),
            "_type_object" => Ok(Self::Object),
            "_type_object_geojson" => Ok(Self::ObjectGeojson),
            other => Err(ModelError::UnknownTypeTag(other.to_string())),
        }
    }

    /// The serialized tag of this type.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Boolean => "_type_boolean",
            Self::Integer => "_type_integer",
            Self::Number => "_type_number",
            Self::Timestamp => "_type_timestamp",
            Self::String => "_type_string",
            Self::StringKey => "_type_string_key",
            Self::StringHandle => "_type_string_handle",
            Self::StringEnum => "_type_string_enum",
            Self::Object => "_type_object",
            Self::ObjectGeojson => "_type_object_geojson",
        }
    }

    /// Whether values of this type are strings at runtime. Dictionary key
    /// sub-schemas must be textual.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::String | Self::StringKey | Self::StringHandle | Self::StringEnum
        )
    }

    /// Whether values of this type are objects at runtime.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object | Self::ObjectGeojson)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A kind qualifier restricting which term category a reference or
/// enumeration member must belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KindRef {
    /// A wildcard category.
    Wildcard(KindWildcard),
    /// A concrete term (an enumeration root or structure definition).
    Term(GlobalId),
}

/// The wildcard kind categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindWildcard {
    /// Any term at all.
    #[serde(rename = "_any-term")]
    AnyTerm,
    /// Any enumeration element.
    #[serde(rename = "_any-enum")]
    AnyEnum,
    /// Any object structure.
    #[serde(rename = "_any-object")]
    AnyObject,
    /// Any descriptor.
    #[serde(rename = "_any-descriptor")]
    AnyDescriptor,
}

impl KindRef {
    /// Parse a kind entry: a known wildcard tag or a concrete term id.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "_any-term" => Self::Wildcard(KindWildcard::AnyTerm),
            "_any-enum" => Self::Wildcard(KindWildcard::AnyEnum),
            "_any-object" => Self::Wildcard(KindWildcard::AnyObject),
            "_any-descriptor" => Self::Wildcard(KindWildcard::AnyDescriptor),
            other => Self::Term(GlobalId::new(other)),
        }
    }

    /// The concrete term this kind names, if it is not a wildcard.
    pub fn as_term(&self) -> Option<&GlobalId> {
        match self {
            Self::Term(gid) => Some(gid),
            Self::Wildcard(_) => None,
        }
    }
}

/// One end of a range constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// The bound value (number, string, or date string).
    pub value: Value,
    /// Whether the bound itself is admitted.
    pub inclusive: bool,
}

/// Where a checked value landed relative to a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCheck {
    /// Below the minimum bound.
    Below,
    /// Inside the range.
    Within,
    /// Above the maximum bound.
    Above,
}

/// Convert a date/time string to epoch milliseconds: RFC 3339,
/// `YYYY-MM-DD HH:MM:SS`, or a bare date (midnight UTC).
pub fn parse_instant(s: &str) -> Option<f64> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis() as f64);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(midnight.and_utc().timestamp_millis() as f64);
    }
    None
}

/// The numeric reading of a bound value: a number directly, a date
/// string as epoch milliseconds. Anything else does not constrain
/// numeric values.
fn numeric_bound(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_instant(s),
        _ => None,
    }
}

/// A range constraint over values or element counts.
///
/// Either end may be absent; min-only and max-only ranges are honored
/// independently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    /// Minimum bound, if declared.
    pub min: Option<Bound>,
    /// Maximum bound, if declared.
    pub max: Option<Bound>,
}

impl Range {
    /// Parse a range object using the vocabulary's bound keys. Declaring
    /// both the inclusive and exclusive form of the same end is malformed.
    pub fn parse(value: &Value, vocab: &Vocabulary, section: &str) -> Result<Self, ModelError> {
        let map = value.as_object().ok_or_else(|| ModelError::Malformed {
            section: section.to_string(),
            reason: "range must be an object".to_string(),
        })?;

        let pick = |inclusive_key: &str, exclusive_key: &str| -> Result<Option<Bound>, ModelError> {
            match (map.get(inclusive_key), map.get(exclusive_key)) {
                (Some(_), Some(_)) => Err(ModelError::Malformed {
                    section: section.to_string(),
                    reason: format!(
                        "both '{inclusive_key}' and '{exclusive_key}' declared"
                    ),
                }),
                (Some(v), None) => Ok(Some(Bound {
                    value: v.clone(),
                    inclusive: true,
                })),
                (None, Some(v)) => Ok(Some(Bound {
                    value: v.clone(),
                    inclusive: false,
                })),
                (None, None) => Ok(None),
            }
        };

        Ok(Self {
            min: pick(&vocab.min_inclusive_key, &vocab.min_exclusive_key)?,
            max: pick(&vocab.max_inclusive_key, &vocab.max_exclusive_key)?,
        })
    }

    /// Check a numeric value (numbers and epoch timestamps). Date-string
    /// bounds are converted to epoch milliseconds; other non-numeric
    /// bounds do not constrain numeric values.
    pub fn check_f64(&self, v: f64) -> RangeCheck {
        if let Some(min) = &self.min {
            if let Some(m) = numeric_bound(&min.value) {
                if v < m || (v == m && !min.inclusive) {
                    return RangeCheck::Below;
                }
            }
        }
        if let Some(max) = &self.max {
            if let Some(m) = numeric_bound(&max.value) {
                if v > m || (v == m && !max.inclusive) {
                    return RangeCheck::Above;
                }
            }
        }
        RangeCheck::Within
    }

    /// Check a string value. String bounds compare lexicographically;
    /// numeric bounds constrain the string's length.
    pub fn check_str(&self, v: &str) -> RangeCheck {
        if let Some(min) = &self.min {
            let below = match (&min.value, min.inclusive) {
                (Value::String(m), true) => v < m.as_str(),
                (Value::String(m), false) => v <= m.as_str(),
                (Value::Number(n), inclusive) => match n.as_f64() {
                    Some(m) => {
                        let len = v.chars().count() as f64;
                        len < m || (len == m && !inclusive)
                    }
                    None => false,
                },
                _ => false,
            };
            if below {
                return RangeCheck::Below;
            }
        }
        if let Some(max) = &self.max {
            let above = match (&max.value, max.inclusive) {
                (Value::String(m), true) => v > m.as_str(),
                (Value::String(m), false) => v >= m.as_str(),
                (Value::Number(n), inclusive) => match n.as_f64() {
                    Some(m) => {
                        let len = v.chars().count() as f64;
                        len > m || (len == m && !inclusive)
                    }
                    None => false,
                },
                _ => false,
            };
            if above {
                return RangeCheck::Above;
            }
        }
        RangeCheck::Within
    }

    /// Check an element count against numeric bounds.
    pub fn check_len(&self, n: usize) -> RangeCheck {
        self.check_f64(n as f64)
    }
}

/// The type a descriptor declares for its values: an optional scalar
/// type tag plus optional constraints. An absent scalar type is
/// untyped — values are accepted without type checking.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Declared scalar type, if any.
    pub scalar: Option<ScalarType>,
    /// Kind qualifiers for reference types.
    pub kind: Vec<KindRef>,
    /// Range constraint over the value (numeric, string, or date).
    pub valid_range: Option<Range>,
    /// Element-count range for array/set shapes.
    pub elements: Option<Range>,
    /// Regular expression constraint for string values.
    pub regexp: Option<String>,
}

impl TypeDescriptor {
    /// Parse a type descriptor object using the vocabulary's keys.
    pub fn parse(value: &Value, vocab: &Vocabulary) -> Result<Self, ModelError> {
        let map = value.as_object().ok_or_else(|| ModelError::Malformed {
            section: vocab.type_key.clone(),
            reason: "type descriptor must be an object".to_string(),
        })?;

        let scalar = match map.get(&vocab.type_key) {
            None => None,
            Some(Value::String(tag)) => Some(ScalarType::from_tag(tag)?),
            Some(_) => {
                return Err(ModelError::Malformed {
                    section: vocab.type_key.clone(),
                    reason: "type tag must be a string".to_string(),
                })
            }
        };

        let kind = match map.get(&vocab.kind_key) {
            None => Vec::new(),
            Some(Value::String(tag)) => vec![KindRef::from_tag(tag)],
            Some(Value::Array(items)) => {
                let mut kinds = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(tag) => kinds.push(KindRef::from_tag(tag)),
                        _ => {
                            return Err(ModelError::Malformed {
                                section: vocab.kind_key.clone(),
                                reason: "kind entries must be strings".to_string(),
                            })
                        }
                    }
                }
                kinds
            }
            Some(_) => {
                return Err(ModelError::Malformed {
                    section: vocab.kind_key.clone(),
                    reason: "kind must be a string or array of strings".to_string(),
                })
            }
        };

        let valid_range = map
            .get(&vocab.valid_range_key)
            .map(|v| Range::parse(v, vocab, &vocab.valid_range_key))
            .transpose()?;

        let elements = map
            .get(&vocab.elements_key)
            .map(|v| Range::parse(v, vocab, &vocab.elements_key))
            .transpose()?;

        let regexp = match map.get(&vocab.regexp_key) {
            None => None,
            Some(Value::String(p)) => Some(p.clone()),
            Some(_) => {
                return Err(ModelError::Malformed {
                    section: vocab.regexp_key.clone(),
                    reason: "regular expression must be a string".to_string(),
                })
            }
        };

        Ok(Self {
            scalar,
            kind,
            valid_range,
            elements,
            regexp,
        })
    }

    /// The concrete term ids named by this descriptor's kind qualifiers.
    pub fn kind_terms(&self) -> impl Iterator<Item = &GlobalId> {
        self.kind.iter().filter_map(KindRef::as_term)
    }
}

/// The shape wrapper of a descriptor's data block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataBlock {
    /// Zero shape keys: accept anything.
    Unconstrained,
    /// A single value of the descriptor's type.
    Scalar(TypeDescriptor),
    /// An ordered list of values of the descriptor's type.
    Array(TypeDescriptor),
    /// A list of values with no duplicates under value-and-type equality.
    Set(TypeDescriptor),
    /// A map validated by a key sub-schema and a value sub-schema.
    Dictionary {
        /// Sub-schema every dictionary key must satisfy.
        key: Option<TypeDescriptor>,
        /// Sub-schema every dictionary value must satisfy.
        value: Option<TypeDescriptor>,
    },
}

impl DataBlock {
    /// Parse a data block. Exactly zero or one of the four shape keys may
    /// be present; any other key invalidates the block.
    pub fn parse(block: &Value, vocab: &Vocabulary) -> Result<Self, ModelError> {
        let map = block.as_object().ok_or_else(|| ModelError::Malformed {
            section: vocab.data_key.clone(),
            reason: "data block must be an object".to_string(),
        })?;

        let mut shape: Option<&str> = None;
        for key in map.keys() {
            if !vocab.shape_keys().contains(&key.as_str()) {
                return Err(ModelError::UnknownShapeKey(key.clone()));
            }
            if let Some(first) = shape {
                return Err(ModelError::ConflictingShapes(
                    first.to_string(),
                    key.clone(),
                ));
            }
            shape = Some(key.as_str());
        }

        let Some(shape) = shape else {
            return Ok(Self::Unconstrained);
        };
        let inner = &map[shape];

        if shape == vocab.scalar_key {
            Ok(Self::Scalar(TypeDescriptor::parse(inner, vocab)?))
        } else if shape == vocab.array_key {
            Ok(Self::Array(TypeDescriptor::parse(inner, vocab)?))
        } else if shape == vocab.set_key {
            Ok(Self::Set(TypeDescriptor::parse(inner, vocab)?))
        } else {
            let dict = inner.as_object().ok_or_else(|| ModelError::Malformed {
                section: vocab.dict_key.clone(),
                reason: "dictionary shape must be an object".to_string(),
            })?;
            let key = dict
                .get(&vocab.dict_key_section)
                .map(|v| TypeDescriptor::parse(v, vocab))
                .transpose()?;
            let value = dict
                .get(&vocab.dict_value_section)
                .map(|v| TypeDescriptor::parse(v, vocab))
                .transpose()?;
            Ok(Self::Dictionary { key, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn empty_block_is_unconstrained() {
        let block = DataBlock::parse(&json!({}), &vocab()).unwrap();
        assert_eq!(block, DataBlock::Unconstrained);
    }

    #[test]
    fn unrecognized_key_is_invalid() {
        let err = DataBlock::parse(&json!({"_bogus": {}}), &vocab()).unwrap_err();
        assert_eq!(err, ModelError::UnknownShapeKey("_bogus".to_string()));
    }

    #[test]
    fn conflicting_shapes_rejected() {
        let err =
            DataBlock::parse(&json!({"_scalar": {}, "_array": {}}), &vocab()).unwrap_err();
        assert!(matches!(err, ModelError::ConflictingShapes(_, _)));
    }

    #[test]
    fn scalar_integer_with_range() {
        let block = DataBlock::parse(
            &json!({"_scalar": {
                "_type": "_type_integer",
                "_valid-range": {"min-inclusive": 2, "max-inclusive": 4}
            }}),
            &vocab(),
        )
        .unwrap();
        let DataBlock::Scalar(td) = block else {
            panic!("expected scalar shape");
        };
        assert_eq!(td.scalar, Some(ScalarType::Integer));
        let range = td.valid_range.unwrap();
        assert_eq!(range.check_f64(3.0), RangeCheck::Within);
        assert_eq!(range.check_f64(12.0), RangeCheck::Above);
        assert_eq!(range.check_f64(1.0), RangeCheck::Below);
    }

    #[test]
    fn exclusive_bounds() {
        let range = Range::parse(
            &json!({"min-exclusive": 0, "max-exclusive": 10}),
            &vocab(),
            "_valid-range",
        )
        .unwrap();
        assert_eq!(range.check_f64(0.0), RangeCheck::Below);
        assert_eq!(range.check_f64(10.0), RangeCheck::Above);
        assert_eq!(range.check_f64(5.0), RangeCheck::Within);
    }

    #[test]
    fn both_bound_forms_rejected() {
        let err = Range::parse(
            &json!({"min-inclusive": 0, "min-exclusive": 1}),
            &vocab(),
            "_valid-range",
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Malformed { .. }));
    }

    #[test]
    fn string_range_lexicographic_and_length() {
        let lex = Range::parse(
            &json!({"min-inclusive": "b", "max-inclusive": "d"}),
            &vocab(),
            "_valid-range",
        )
        .unwrap();
        assert_eq!(lex.check_str("c"), RangeCheck::Within);
        assert_eq!(lex.check_str("a"), RangeCheck::Below);
        assert_eq!(lex.check_str("e"), RangeCheck::Above);

        let len = Range::parse(
            &json!({"min-inclusive": 2, "max-inclusive": 3}),
            &vocab(),
            "_valid-range",
        )
        .unwrap();
        assert_eq!(len.check_str("ab"), RangeCheck::Within);
        assert_eq!(len.check_str("a"), RangeCheck::Below);
        assert_eq!(len.check_str("abcd"), RangeCheck::Above);
    }

    #[test]
    fn date_string_bounds_constrain_instants() {
        let range = Range::parse(
            &json!({"min-inclusive": "2020-01-01"}),
            &vocab(),
            "_valid-range",
        )
        .unwrap();
        let before = parse_instant("1970-06-01").unwrap();
        let after = parse_instant("2021-01-01").unwrap();
        assert_eq!(range.check_f64(before), RangeCheck::Below);
        assert_eq!(range.check_f64(after), RangeCheck::Within);
    }

    #[test]
    fn instant_forms() {
        assert_eq!(parse_instant("1970-01-01T00:00:00Z"), Some(0.0));
        assert_eq!(parse_instant("1970-01-02"), Some(86_400_000.0));
        assert_eq!(parse_instant("1970-01-01 00:00:01"), Some(1000.0));
        assert_eq!(parse_instant("yesterday-ish"), None);
    }

    #[test]
    fn unknown_type_tag() {
        let err = TypeDescriptor::parse(&json!({"_type": "_type_blob"}), &vocab()).unwrap_err();
        assert_eq!(err, ModelError::UnknownTypeTag("_type_blob".to_string()));
    }

    #[test]
    fn kind_wildcards_and_terms() {
        let td = TypeDescriptor::parse(
            &json!({"_type": "_type_string_enum", "_kind": ["_any-enum", "iso_639_1"]}),
            &vocab(),
        )
        .unwrap();
        assert_eq!(td.kind.len(), 2);
        assert_eq!(
            td.kind[0],
            KindRef::Wildcard(KindWildcard::AnyEnum)
        );
        assert_eq!(
            td.kind_terms().collect::<Vec<_>>(),
            vec![&GlobalId::new("iso_639_1")]
        );
    }

    #[test]
    fn dictionary_shape_sections() {
        let block = DataBlock::parse(
            &json!({"_dict": {
                "_dict_key": {"_type": "_type_string"},
                "_dict_value": {"_type": "_type_number"}
            }}),
            &vocab(),
        )
        .unwrap();
        let DataBlock::Dictionary { key, value } = block else {
            panic!("expected dictionary shape");
        };
        assert_eq!(key.unwrap().scalar, Some(ScalarType::String));
        assert_eq!(value.unwrap().scalar, Some(ScalarType::Number));
    }

    #[test]
    fn untyped_descriptor() {
        let td = TypeDescriptor::parse(&json!({}), &vocab()).unwrap();
        assert_eq!(td.scalar, None);
        assert!(td.kind.is_empty());
    }
}
