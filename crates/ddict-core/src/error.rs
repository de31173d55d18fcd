//! # Error Types — Validation Taxonomy and Infrastructure Failures
//!
//! Two very different failure classes live here and must never be mixed:
//!
//! - [`ErrorKind`] — the closed taxonomy of validation outcomes. These are
//!   *values*, recorded inside a validation report, never raised through
//!   `Result`. Numeric codes and localized messages are an external
//!   message-table concern; the kind itself is what the core guarantees.
//! - [`StoreError`] — infrastructure failures from the term/edge stores.
//!   These are the only class that propagates as `Err`.
//!
//! [`ModelError`] covers malformed data/rule blocks encountered while
//! parsing a term document; the validation engine surfaces these as
//! `UnsupportedDataType` findings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse grouping of validation outcome kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    /// Non-error outcomes (`Ok`, `ValueResolved`).
    Informational,
    /// A referenced term, descriptor, or document was not found.
    Lookup,
    /// The runtime shape of the value does not match the declared type.
    Shape,
    /// A declared constraint (range, regexp, cardinality) was violated.
    Constraint,
    /// The descriptor or object structure itself is unsatisfiable.
    Structural,
}

/// The closed taxonomy of validation outcomes.
///
/// `Ok` and `ValueResolved` are the only success kinds; everything else is
/// terminal for the sub-value (or enclosing object) it was recorded
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Validation succeeded.
    #[default]
    Ok,
    /// Validation succeeded and the value was rewritten to its preferred
    /// (canonical) form.
    ValueResolved,

    // --- Lookup ---
    /// The named descriptor does not exist in the term store.
    DescriptorNotFound,
    /// A referenced term does not exist.
    TermNotFound,
    /// A referenced enumeration root does not exist or was not declared.
    EnumerationNotFound,
    /// A handle does not designate a resolvable document.
    DocumentNotFound,

    // --- Shape ---
    /// A scalar was expected but an array or object was supplied.
    NotScalar,
    /// An array was expected.
    NotArray,
    /// An object was expected.
    NotObject,
    /// A boolean was expected.
    NotBoolean,
    /// An integer was expected.
    NotInteger,
    /// A number was expected.
    NotNumber,
    /// A string was expected.
    NotString,
    /// A value convertible to an absolute instant was expected.
    NotTimestamp,

    // --- Constraint ---
    /// The container holds fewer elements than the declared minimum.
    TooFewElements,
    /// The container holds more elements than the declared maximum.
    TooManyElements,
    /// The value falls below the declared range.
    BelowRange,
    /// The value exceeds the declared range.
    OverRange,
    /// The value does not match the declared regular expression.
    RegexpMismatch,
    /// A set contains two elements equal in both value and runtime type.
    DuplicateSetElement,

    // --- Structural ---
    /// The term carries no data block and cannot act as a descriptor.
    MissingDataBlock,
    /// A required property (or block section) is absent.
    MissingRequiredProperty,
    /// A banned property is present.
    BannedPropertyPresent,
    /// A one-of selection group matched a count other than one.
    RequiresExactlyOneProperty,
    /// A one-or-none selection group matched more than one property.
    RequiresAtMostOneProperty,
    /// An any-of selection group matched no property.
    RequiresAtLeastOneProperty,
    /// An all-of selection group is missing at least one property.
    RequiresAllProperties,
    /// The declared data type or block layout is not supported.
    UnsupportedDataType,
}

impl ErrorKind {
    /// Whether this kind denotes a successful validation outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::ValueResolved)
    }

    /// The category this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Ok | Self::ValueResolved => ErrorCategory::Informational,
            Self::DescriptorNotFound
            | Self::TermNotFound
            | Self::EnumerationNotFound
            | Self::DocumentNotFound => ErrorCategory::Lookup,
            Self::NotScalar
            | Self::NotArray
            | Self::NotObject
            | Self::NotBoolean
            | Self::NotInteger
            | Self::NotNumber
            | Self::NotString
            | Self::NotTimestamp => ErrorCategory::Shape,
            Self::TooFewElements
            | Self::TooManyElements
            | Self::BelowRange
            | Self::OverRange
            | Self::RegexpMismatch
            | Self::DuplicateSetElement => ErrorCategory::Constraint,
            Self::MissingDataBlock
            | Self::MissingRequiredProperty
            | Self::BannedPropertyPresent
            | Self::RequiresExactlyOneProperty
            | Self::RequiresAtMostOneProperty
            | Self::RequiresAtLeastOneProperty
            | Self::RequiresAllProperties
            | Self::UnsupportedDataType => ErrorCategory::Structural,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Default English messages; localization is a message-table lookup
        // owned by the embedding service.
        let s = match self {
            Self::Ok => "ok",
            Self::ValueResolved => "value resolved to its preferred term",
            Self::DescriptorNotFound => "descriptor not found",
            Self::TermNotFound => "term not found",
            Self::EnumerationNotFound => "enumeration not found",
            Self::DocumentNotFound => "document not found",
            Self::NotScalar => "value is not a scalar",
            Self::NotArray => "value is not an array",
            Self::NotObject => "value is not an object",
            Self::NotBoolean => "value is not a boolean",
            Self::NotInteger => "value is not an integer",
            Self::NotNumber => "value is not a number",
            Self::NotString => "value is not a string",
            Self::NotTimestamp => "value is not convertible to a timestamp",
            Self::TooFewElements => "too few elements",
            Self::TooManyElements => "too many elements",
            Self::BelowRange => "value below declared range",
            Self::OverRange => "value over declared range",
            Self::RegexpMismatch => "value does not match regular expression",
            Self::DuplicateSetElement => "duplicate set element",
            Self::MissingDataBlock => "term has no data block",
            Self::MissingRequiredProperty => "missing required property",
            Self::BannedPropertyPresent => "banned property present",
            Self::RequiresExactlyOneProperty => "requires exactly one of the listed properties",
            Self::RequiresAtMostOneProperty => "requires at most one of the listed properties",
            Self::RequiresAtLeastOneProperty => "requires at least one of the listed properties",
            Self::RequiresAllProperties => "requires all of the listed properties",
            Self::UnsupportedDataType => "unsupported data type",
        };
        f.write_str(s)
    }
}

/// Infrastructure failure from a term or edge store backend.
///
/// The only error class allowed to propagate as `Err` out of the
/// validation and graph engines.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// IO error reaching the backing store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed data or rule block encountered while parsing a term document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A data block carries a key that is not one of the four shape keys.
    #[error("unrecognized data block key '{0}'")]
    UnknownShapeKey(String),

    /// A data block declares more than one shape.
    #[error("data block declares conflicting shapes '{0}' and '{1}'")]
    ConflictingShapes(String, String),

    /// A type descriptor carries an unknown scalar type tag.
    #[error("unknown scalar type tag '{0}'")]
    UnknownTypeTag(String),

    /// A block section is structurally malformed.
    #[error("malformed '{section}' section: {reason}")]
    Malformed {
        /// The block section that failed to parse.
        section: String,
        /// Why it failed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_kinds() {
        assert!(ErrorKind::Ok.is_success());
        assert!(ErrorKind::ValueResolved.is_success());
        assert!(!ErrorKind::OverRange.is_success());
        assert!(!ErrorKind::DescriptorNotFound.is_success());
    }

    #[test]
    fn categories_are_exhaustive() {
        assert_eq!(ErrorKind::Ok.category(), ErrorCategory::Informational);
        assert_eq!(ErrorKind::TermNotFound.category(), ErrorCategory::Lookup);
        assert_eq!(ErrorKind::NotScalar.category(), ErrorCategory::Shape);
        assert_eq!(
            ErrorKind::DuplicateSetElement.category(),
            ErrorCategory::Constraint
        );
        assert_eq!(
            ErrorKind::UnsupportedDataType.category(),
            ErrorCategory::Structural
        );
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ErrorKind::RequiresExactlyOneProperty).unwrap();
        assert_eq!(json, "\"requires-exactly-one-property\"");
    }
}
