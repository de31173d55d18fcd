//! # Dictionary Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the dictionary graph. These
//! prevent accidental identifier confusion — you cannot pass a bare code
//! where a resolved global identifier is expected.
//!
//! A term's global identifier (`_gid`) is its namespace (`_nid`) joined to
//! its local identifier (`_lid`) by a separator; the namespace
//! disambiguates local codes that repeat across vocabularies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator joining a namespace to a local identifier in a global id.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Global identifier of a term: `namespace + separator + local identifier`.
///
/// Opaque and totally ordered, so it can key `BTreeMap`s and appear in
/// deterministic traversal output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
    /// Wrap an already-formed global identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Join a namespace and a local identifier. An empty namespace yields
    /// the local identifier alone (top-level terms have no namespace).
    pub fn from_parts(nid: &str, lid: &str, separator: &str) -> Self {
        if nid.is_empty() {
            Self(lid.to_string())
        } else {
            Self(format!("{nid}{separator}{lid}"))
        }
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the newtype, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlobalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GlobalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for GlobalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error for a handle string that does not name both halves of a
/// `collection/key` reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed handle '{handle}': expected '<collection>/<key>'")]
pub struct HandleError {
    /// The rejected handle string.
    pub handle: String,
}

/// A reference to a document in another collection, written `collection/key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermHandle {
    /// Collection half of the reference.
    pub collection: String,
    /// Document key half, interpreted as a global identifier.
    pub key: GlobalId,
}

impl TermHandle {
    /// Parse a `collection/key` string. Splits on the first `/`; both
    /// halves must be non-empty.
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        match raw.split_once('/') {
            Some((collection, key)) if !collection.is_empty() && !key.is_empty() => Ok(Self {
                collection: collection.to_string(),
                key: GlobalId::new(key),
            }),
            _ => Err(HandleError {
                handle: raw.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TermHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

/// The identifier section fields a code can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierField {
    /// Local identifier (`_lid`).
    #[serde(rename = "_lid")]
    Local,
    /// Global identifier (`_gid`).
    #[serde(rename = "_gid")]
    Global,
    /// Official identifiers set (`_aid`, includes `_lid`).
    #[serde(rename = "_aid")]
    Official,
    /// Provider identifiers set (`_pid`).
    #[serde(rename = "_pid")]
    Provider,
    /// Namespace (`_nid`).
    #[serde(rename = "_nid")]
    Namespace,
}

impl std::fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Local => "_lid",
            Self::Global => "_gid",
            Self::Official => "_aid",
            Self::Provider => "_pid",
            Self::Namespace => "_nid",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gid_from_parts_joins_with_separator() {
        let gid = GlobalId::from_parts("iso_639_1", "en", DEFAULT_SEPARATOR);
        assert_eq!(gid.as_str(), "iso_639_1_en");
    }

    #[test]
    fn gid_from_parts_empty_namespace() {
        let gid = GlobalId::from_parts("", "iso", DEFAULT_SEPARATOR);
        assert_eq!(gid.as_str(), "iso");
    }

    #[test]
    fn handle_parse_splits_on_first_slash() {
        let handle = TermHandle::parse("terms/iso_639_3_eng").unwrap();
        assert_eq!(handle.collection, "terms");
        assert_eq!(handle.key.as_str(), "iso_639_3_eng");
        assert_eq!(handle.to_string(), "terms/iso_639_3_eng");
    }

    #[test]
    fn handle_parse_rejects_missing_halves() {
        assert!(TermHandle::parse("no-slash").is_err());
        assert!(TermHandle::parse("/key-only").is_err());
        assert!(TermHandle::parse("collection/").is_err());
    }

    #[test]
    fn identifier_field_serializes_to_field_name() {
        let json = serde_json::to_string(&IdentifierField::Official).unwrap();
        assert_eq!(json, "\"_aid\"");
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn gid_from_parts_preserves_both_halves(
                nid in "[a-z][a-z0-9_]{0,12}",
                lid in "[a-z][a-z0-9]{0,12}",
            ) {
                let gid = GlobalId::from_parts(&nid, &lid, DEFAULT_SEPARATOR);
                prop_assert!(gid.as_str().starts_with(&nid));
                prop_assert!(gid.as_str().ends_with(&lid));
            }

            #[test]
            fn handle_display_parses_back(
                collection in "[a-z]{1,10}",
                key in "[a-z_]{1,20}",
            ) {
                let handle = TermHandle::parse(&format!("{collection}/{key}")).unwrap();
                let reparsed = TermHandle::parse(&handle.to_string()).unwrap();
                prop_assert_eq!(handle, reparsed);
            }
        }
    }
}
