//! # Validation Engine — Shape Dispatch
//!
//! The single entry point `validate(descriptor, value)` and the dispatch
//! over the descriptor's data block shape. Scalar type checking lives in
//! `value.rs`; object structural rules in `rules.rs`.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use ddict_core::{
    DataBlock, EdgeStore, ErrorKind, GlobalId, RangeCheck, StoreError, TermStore, TypeDescriptor,
    Vocabulary,
};
use ddict_graph::{GraphError, TermCache};

use crate::report::{Context, Report};

/// Infrastructure failure during validation. Validation outcomes are
/// never errors; they live in the report.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Term or edge store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Graph resolver infrastructure failure.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// The typed-value validation engine.
///
/// Holds store references and the schema vocabulary it was built with;
/// no mutable state persists across calls.
#[derive(Debug)]
pub struct ValidationEngine<'a, T: TermStore, E: EdgeStore> {
    pub(crate) terms: &'a T,
    pub(crate) edges: &'a E,
    pub(crate) vocab: Vocabulary,
}

impl<'a, T: TermStore, E: EdgeStore> ValidationEngine<'a, T, E> {
    /// Create an engine over the given stores and vocabulary.
    pub fn new(terms: &'a T, edges: &'a E, vocab: Vocabulary) -> Self {
        Self {
            terms,
            edges,
            vocab,
        }
    }

    /// The vocabulary this engine was built with.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Validate `value` against the descriptor named by `descriptor`.
    ///
    /// Returns `Err` only on store failure; every validation outcome,
    /// including lookup failures, lands in the report.
    pub fn validate(
        &self,
        descriptor: &GlobalId,
        value: Value,
    ) -> Result<Report, ValidateError> {
        debug!(descriptor = %descriptor, "validating value against descriptor");
        let cache = TermCache::new(self.terms);
        let mut report = Report::new(descriptor.as_str(), value);

        let Some(term) = cache.get(descriptor)? else {
            report.fail(
                ErrorKind::DescriptorNotFound,
                Context::new().with_message(format!("descriptor '{descriptor}' not found")),
            );
            return Ok(report);
        };
        let Some(raw) = term.data.as_ref() else {
            report.fail(
                ErrorKind::MissingDataBlock,
                Context::new().with_block(self.vocab.data_key.clone()),
            );
            return Ok(report);
        };
        let block = match DataBlock::parse(raw, &self.vocab) {
            Ok(block) => block,
            Err(err) => {
                report.fail(
                    ErrorKind::UnsupportedDataType,
                    Context::new()
                        .with_block(self.vocab.data_key.clone())
                        .with_message(err.to_string()),
                );
                return Ok(report);
            }
        };

        // Validate against a working copy so enum rewrites land in the
        // report's value without aliasing it during descent.
        let mut work = std::mem::replace(&mut report.value, Value::Null);
        self.validate_block(&cache, &mut report, &block, &mut work)?;
        report.value = work;
        Ok(report)
    }

    fn validate_block(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        block: &DataBlock,
        value: &mut Value,
    ) -> Result<(), ValidateError> {
        match block {
            DataBlock::Unconstrained => Ok(()),
            DataBlock::Scalar(td) => self.validate_scalar_shape(cache, report, td, value),
            DataBlock::Array(td) => self.validate_elements(cache, report, td, value, false),
            DataBlock::Set(td) => self.validate_elements(cache, report, td, value, true),
            DataBlock::Dictionary { key, value: val } => {
                self.validate_dictionary(cache, report, key.as_ref(), val.as_ref(), value)
            }
        }
    }

    fn validate_scalar_shape(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        td: &TypeDescriptor,
        value: &mut Value,
    ) -> Result<(), ValidateError> {
        if value.is_array() {
            report.fail(ErrorKind::NotScalar, Context::new().with_value(value));
            return Ok(());
        }
        let allows_object = td.scalar.map_or(true, |t| t.is_object());
        if value.is_object() && !allows_object {
            report.fail(ErrorKind::NotScalar, Context::new().with_value(value));
            return Ok(());
        }
        self.validate_value(cache, report, td, value)
    }

    fn validate_elements(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        td: &TypeDescriptor,
        value: &mut Value,
        as_set: bool,
    ) -> Result<(), ValidateError> {
        let Value::Array(items) = value else {
            report.fail(ErrorKind::NotArray, Context::new().with_value(value));
            return Ok(());
        };

        if let Some(range) = &td.elements {
            match range.check_len(items.len()) {
                RangeCheck::Below => {
                    report.fail(
                        ErrorKind::TooFewElements,
                        Context::new()
                            .with_block(self.vocab.elements_key.clone())
                            .with_message(format!(
                                "container holds {} element(s), below the declared minimum",
                                items.len()
                            )),
                    );
                    return Ok(());
                }
                RangeCheck::Above => {
                    report.fail(
                        ErrorKind::TooManyElements,
                        Context::new()
                            .with_block(self.vocab.elements_key.clone())
                            .with_message(format!(
                                "container holds {} element(s), over the declared maximum",
                                items.len()
                            )),
                    );
                    return Ok(());
                }
                RangeCheck::Within => {}
            }
        }

        if as_set {
            // Duplicates under value-and-type equality: serde_json value
            // equality is deep and discriminates runtime types, so 1 and
            // "1" (and 1 and 1.0) are distinct.
            for i in 0..items.len() {
                for j in (i + 1)..items.len() {
                    if items[i] == items[j] {
                        report.fail(
                            ErrorKind::DuplicateSetElement,
                            Context::new().with_value(&items[i]),
                        );
                        return Ok(());
                    }
                }
            }
            // An untyped set accepts its elements without type checking.
            if td.scalar.is_none() {
                return Ok(());
            }
        }

        for (index, item) in items.iter_mut().enumerate() {
            report.push_path(index.to_string());
            self.validate_value(cache, report, td, item)?;
            if report.has_failed() {
                // Siblings after the failing element are not evaluated.
                return Ok(());
            }
            report.pop_path();
        }
        Ok(())
    }

    fn validate_dictionary(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        key_td: Option<&TypeDescriptor>,
        val_td: Option<&TypeDescriptor>,
        value: &mut Value,
    ) -> Result<(), ValidateError> {
        let Some(key_td) = key_td else {
            report.fail(
                ErrorKind::MissingRequiredProperty,
                Context::new()
                    .with_block(self.vocab.dict_key.clone())
                    .with_property(self.vocab.dict_key_section.clone()),
            );
            return Ok(());
        };
        let Some(val_td) = val_td else {
            report.fail(
                ErrorKind::MissingRequiredProperty,
                Context::new()
                    .with_block(self.vocab.dict_key.clone())
                    .with_property(self.vocab.dict_value_section.clone()),
            );
            return Ok(());
        };
        if let Some(scalar) = key_td.scalar {
            if !scalar.is_textual() {
                report.fail(
                    ErrorKind::UnsupportedDataType,
                    Context::new()
                        .with_block(self.vocab.dict_key_section.clone())
                        .with_message(format!(
                            "dictionary key sub-schema must be a string type, got '{scalar}'"
                        )),
                );
                return Ok(());
            }
        }

        let Value::Object(map) = value else {
            report.fail(ErrorKind::NotObject, Context::new().with_value(value));
            return Ok(());
        };

        for (key, entry) in map.iter_mut() {
            report.push_path(key.clone());

            // Keys are validated against the key sub-schema on a
            // detached copy; a preferred-term rewrite never renames the
            // authored key.
            let mut key_value = Value::String(key.clone());
            self.validate_value(cache, report, key_td, &mut key_value)?;
            if report.has_failed() {
                return Ok(());
            }

            self.validate_value(cache, report, val_td, entry)?;
            if report.has_failed() {
                return Ok(());
            }
            report.pop_path();
        }
        Ok(())
    }
}
