//! # Validation Report
//!
//! One report per top-level validation call. The engine pushes and pops
//! the current sub-path around recursive descent; on the failing frame
//! the topmost pushed name is merged into the status and the stack is
//! cleared, so callers never manage report internals and a report always
//! names exactly one failure site.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use ddict_core::ErrorKind;

/// The outcome of a validation call: an error kind plus the contextual
/// fields needed to reconstruct where in the value tree it occurred.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    /// The outcome kind.
    pub kind: ErrorKind,
    /// The sub-descriptor or sub-path at the failure site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    /// The offending value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// The block or section involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    /// The property (or property list) involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<Value>,
    /// Default English message; localization is a message-table lookup
    /// owned by the embedding service.
    pub message: String,
}

impl Status {
    /// A fresh success status.
    pub fn ok() -> Self {
        Self {
            kind: ErrorKind::Ok,
            descriptor: None,
            value: None,
            block: None,
            property: None,
            message: ErrorKind::Ok.to_string(),
        }
    }

    /// Whether the status denotes success (including a resolved rewrite).
    pub fn is_success(&self) -> bool {
        self.kind.is_success()
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ok()
    }
}

/// Contextual fields merged into the status on failure.
#[derive(Debug, Clone, Default)]
pub struct Context {
    value: Option<Value>,
    block: Option<String>,
    property: Option<Value>,
    message: Option<String>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: &Value) -> Self {
        self.value = Some(value.clone());
        self
    }

    /// Attach the block or section involved.
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Attach the property name involved.
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(Value::String(property.into()));
        self
    }

    /// Attach a property list (selection groups).
    pub fn with_properties(mut self, properties: &[String]) -> Self {
        self.property = Some(Value::Array(
            properties
                .iter()
                .map(|p| Value::String(p.clone()))
                .collect(),
        ));
        self
    }

    /// Override the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The accumulated findings of one top-level validation call.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// The descriptor name being checked.
    pub descriptor: String,
    /// The value under test (possibly rewritten to preferred terms).
    pub value: Value,
    /// The validation outcome.
    pub status: Status,
    /// Terms encountered that do not resolve to actual descriptors or
    /// structures; skipped, not failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    /// Sub-descriptor resolutions recorded during composite validation,
    /// inspectable even when the overall call failed.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resolved: BTreeMap<String, Value>,
    /// Path stack of the recursive descent; engine-owned, merged into
    /// the status on failure and then discarded.
    #[serde(skip)]
    path: Vec<String>,
}

impl Report {
    /// A fresh report with a success status.
    pub fn new(descriptor: impl Into<String>, value: Value) -> Self {
        Self {
            descriptor: descriptor.into(),
            value,
            status: Status::ok(),
            ignored: Vec::new(),
            resolved: BTreeMap::new(),
            path: Vec::new(),
        }
    }

    /// Enter a sub-path (array index, dictionary key, property name).
    pub fn push_path(&mut self, name: impl Into<String>) {
        self.path.push(name.into());
    }

    /// Leave the current sub-path after a successful frame.
    pub fn pop_path(&mut self) {
        self.path.pop();
    }

    /// Record a failure: the topmost pushed name becomes the status
    /// descriptor and the path stack is cleared, so only the deepest
    /// failure site is ever reported.
    pub fn fail(&mut self, kind: ErrorKind, context: Context) {
        self.status = Status {
            kind,
            descriptor: self.path.last().cloned(),
            value: context.value,
            block: context.block,
            property: context.property,
            message: context.message.unwrap_or_else(|| kind.to_string()),
        };
        self.path.clear();
    }

    /// Record a term that was skipped because it is not a descriptor or
    /// could not be found.
    pub fn note_ignored(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.ignored.contains(&name) {
            self.ignored.push(name);
        }
    }

    /// Record a sub-descriptor resolution outcome.
    pub fn note_resolved(&mut self, key: impl Into<String>, outcome: Value) {
        self.resolved.insert(key.into(), outcome);
    }

    /// Mark that a value was rewritten to its preferred form. Does not
    /// overwrite an existing failure.
    pub fn note_value_resolved(&mut self) {
        if self.status.kind == ErrorKind::Ok {
            self.status.kind = ErrorKind::ValueResolved;
            self.status.message = ErrorKind::ValueResolved.to_string();
        }
    }

    /// Whether validation succeeded.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether a terminal failure has been recorded.
    pub fn has_failed(&self) -> bool {
        !self.status.is_success()
    }
}
