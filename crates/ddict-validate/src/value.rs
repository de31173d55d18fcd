//! # Scalar Type Dispatch
//!
//! Validation of one value against a type descriptor: strict runtime
//! type checks, range/regexp constraints, term and handle references,
//! enumeration membership through the graph resolver, and minimal
//! GeoJSON geometry invariants.
//!
//! Type checks are strict: a boolean never satisfies a numeric check and
//! a number never satisfies a string check. An integral value carried in
//! an exact floating representation does pass the integer check.

use regex::Regex;
use serde_json::Value;

use ddict_core::{
    parse_instant, EdgeStore, ErrorKind, GlobalId, IdentifierField, Predicate, RangeCheck,
    RuleBlock, ScalarType, TermHandle, TermStore, TypeDescriptor,
};
use ddict_graph::{GraphError, GraphResolver, TermCache, TraversalSpec};

use crate::engine::{ValidateError, ValidationEngine};
use crate::report::{Context, Report};

impl<T: TermStore, E: EdgeStore> ValidationEngine<'_, T, E> {
    /// Validate a single value against a type descriptor. An untyped
    /// descriptor accepts anything.
    pub(crate) fn validate_value(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        td: &TypeDescriptor,
        value: &mut Value,
    ) -> Result<(), ValidateError> {
        let Some(scalar) = td.scalar else {
            return Ok(());
        };
        match scalar {
            ScalarType::Boolean => {
                if !value.is_boolean() {
                    report.fail(ErrorKind::NotBoolean, Context::new().with_value(value));
                }
                Ok(())
            }
            ScalarType::Integer => {
                match integer_repr(value) {
                    Some(n) => self.check_numeric_range(report, td, n, value),
                    None => {
                        report.fail(ErrorKind::NotInteger, Context::new().with_value(value));
                    }
                }
                Ok(())
            }
            ScalarType::Number => {
                match numeric_repr(value) {
                    Some(n) => self.check_numeric_range(report, td, n, value),
                    None => {
                        report.fail(ErrorKind::NotNumber, Context::new().with_value(value));
                    }
                }
                Ok(())
            }
            ScalarType::Timestamp => {
                match epoch_millis(value) {
                    Some(epoch) => self.check_numeric_range(report, td, epoch, value),
                    None => {
                        report.fail(ErrorKind::NotTimestamp, Context::new().with_value(value));
                    }
                }
                Ok(())
            }
            ScalarType::String => {
                self.validate_string(report, td, value);
                Ok(())
            }
            ScalarType::StringKey => {
                let Value::String(key) = &*value else {
                    report.fail(ErrorKind::NotString, Context::new().with_value(value));
                    return Ok(());
                };
                if !cache.exists(&GlobalId::new(key.clone()))? {
                    report.fail(
                        ErrorKind::TermNotFound,
                        Context::new()
                            .with_value(value)
                            .with_message(format!("no term under key '{key}'")),
                    );
                }
                Ok(())
            }
            ScalarType::StringHandle => {
                let Value::String(raw) = &*value else {
                    report.fail(ErrorKind::NotString, Context::new().with_value(value));
                    return Ok(());
                };
                match TermHandle::parse(raw) {
                    Err(err) => {
                        report.fail(
                            ErrorKind::DocumentNotFound,
                            Context::new().with_value(value).with_message(err.to_string()),
                        );
                    }
                    Ok(handle) => {
                        if !cache.exists(&handle.key)? {
                            report.fail(
                                ErrorKind::DocumentNotFound,
                                Context::new()
                                    .with_value(value)
                                    .with_message(format!("handle '{handle}' does not resolve")),
                            );
                        }
                    }
                }
                Ok(())
            }
            ScalarType::StringEnum => self.validate_enum(cache, report, td, value),
            ScalarType::Object => self.validate_object(cache, report, td, value),
            ScalarType::ObjectGeojson => {
                self.validate_geojson(report, value);
                Ok(())
            }
        }
    }

    fn check_numeric_range(
        &self,
        report: &mut Report,
        td: &TypeDescriptor,
        n: f64,
        value: &Value,
    ) {
        let Some(range) = &td.valid_range else {
            return;
        };
        match range.check_f64(n) {
            RangeCheck::Below => report.fail(
                ErrorKind::BelowRange,
                Context::new()
                    .with_value(value)
                    .with_block(self.vocab.valid_range_key.clone()),
            ),
            RangeCheck::Above => report.fail(
                ErrorKind::OverRange,
                Context::new()
                    .with_value(value)
                    .with_block(self.vocab.valid_range_key.clone()),
            ),
            RangeCheck::Within => {}
        }
    }

    fn validate_string(&self, report: &mut Report, td: &TypeDescriptor, value: &Value) {
        let Value::String(s) = value else {
            report.fail(ErrorKind::NotString, Context::new().with_value(value));
            return;
        };
        if let Some(pattern) = &td.regexp {
            let regex = match Regex::new(pattern) {
                Ok(regex) => regex,
                Err(err) => {
                    // An uncompilable pattern is a descriptor authoring
                    // defect, not a value defect.
                    report.fail(
                        ErrorKind::UnsupportedDataType,
                        Context::new()
                            .with_block(self.vocab.regexp_key.clone())
                            .with_message(err.to_string()),
                    );
                    return;
                }
            };
            if !regex.is_match(s) {
                report.fail(
                    ErrorKind::RegexpMismatch,
                    Context::new()
                        .with_value(value)
                        .with_block(self.vocab.regexp_key.clone()),
                );
                return;
            }
        }
        if let Some(range) = &td.valid_range {
            match range.check_str(s) {
                RangeCheck::Below => report.fail(
                    ErrorKind::BelowRange,
                    Context::new()
                        .with_value(value)
                        .with_block(self.vocab.valid_range_key.clone()),
                ),
                RangeCheck::Above => report.fail(
                    ErrorKind::OverRange,
                    Context::new()
                        .with_value(value)
                        .with_block(self.vocab.valid_range_key.clone()),
                ),
                RangeCheck::Within => {}
            }
        }
    }

    /// Confirm the value is (or resolves to) a member of one of the
    /// enumerations named by the descriptor's kind; on a non-canonical
    /// hit the value is rewritten to the preferred term.
    fn validate_enum(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        td: &TypeDescriptor,
        value: &mut Value,
    ) -> Result<(), ValidateError> {
        let Value::String(code) = &*value else {
            report.fail(ErrorKind::NotString, Context::new().with_value(value));
            return Ok(());
        };
        let code = code.clone();
        let roots: Vec<GlobalId> = td.kind_terms().cloned().collect();
        if roots.is_empty() {
            report.fail(
                ErrorKind::EnumerationNotFound,
                Context::new()
                    .with_block(self.vocab.kind_key.clone())
                    .with_message("no enumeration root declared in the kind qualifier"),
            );
            return Ok(());
        }

        let resolver = GraphResolver::new(cache, self.edges);
        let spec = TraversalSpec::new(Predicate::EnumOf);
        for root in &roots {
            // First treat the code as a global identifier.
            match resolver.resolve_preferred(root, &GlobalId::new(code.clone()), &spec) {
                Ok(Some(preferred)) => {
                    finish_enum(report, value, &code, preferred);
                    return Ok(());
                }
                Ok(None) => {}
                Err(GraphError::UnknownRoot(root)) => {
                    report.fail(
                        ErrorKind::EnumerationNotFound,
                        Context::new()
                            .with_value(value)
                            .with_message(format!("enumeration root '{root}' not found")),
                    );
                    return Ok(());
                }
                Err(GraphError::Store(err)) => return Err(err.into()),
            }
            // Fall back to the official identifiers of the root's terms.
            match resolver.match_by_field(root, &code, IdentifierField::Official, &spec) {
                Ok(matches) if matches.len() > 1 => {
                    report.fail(
                        ErrorKind::TermNotFound,
                        Context::new().with_value(value).with_message(format!(
                            "code '{code}' matches {} terms in '{root}' ambiguously",
                            matches.len()
                        )),
                    );
                    return Ok(());
                }
                Ok(matches) => {
                    if let Some(preferred) = matches.into_iter().next() {
                        finish_enum(report, value, &code, preferred);
                        return Ok(());
                    }
                }
                Err(GraphError::UnknownRoot(root)) => {
                    report.fail(
                        ErrorKind::EnumerationNotFound,
                        Context::new()
                            .with_value(value)
                            .with_message(format!("enumeration root '{root}' not found")),
                    );
                    return Ok(());
                }
                Err(GraphError::Store(err)) => return Err(err.into()),
            }
        }

        report.fail(
            ErrorKind::TermNotFound,
            Context::new()
                .with_value(value)
                .with_message(format!("code '{code}' is not a member of the enumeration")),
        );
        Ok(())
    }

    /// Validate an object value against the rule blocks of the
    /// structures named by the descriptor's kind. Kind terms that are
    /// missing or carry no rule block are recorded as ignored; a bare
    /// wildcard kind treats the value as an opaque map.
    fn validate_object(
        &self,
        cache: &TermCache<'_, T>,
        report: &mut Report,
        td: &TypeDescriptor,
        value: &mut Value,
    ) -> Result<(), ValidateError> {
        let Value::Object(map) = &*value else {
            report.fail(ErrorKind::NotObject, Context::new().with_value(value));
            return Ok(());
        };

        let kinds: Vec<GlobalId> = td.kind_terms().cloned().collect();
        for gid in kinds {
            let Some(term) = cache.get(&gid)? else {
                report.note_ignored(gid.as_str());
                continue;
            };
            let Some(raw) = term.rule.as_ref() else {
                report.note_ignored(gid.as_str());
                continue;
            };
            match RuleBlock::parse(raw, &self.vocab) {
                Err(err) => {
                    report.fail(
                        ErrorKind::UnsupportedDataType,
                        Context::new()
                            .with_block(self.vocab.rule_key.clone())
                            .with_message(err.to_string()),
                    );
                    return Ok(());
                }
                Ok(rule) => {
                    self.apply_rules(report, &rule, map);
                    if report.has_failed() {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// Minimal GeoJSON geometry invariants: a known geometry type and
    /// coordinate nesting matching it.
    fn validate_geojson(&self, report: &mut Report, value: &Value) {
        let Value::Object(map) = value else {
            report.fail(ErrorKind::NotObject, Context::new().with_value(value));
            return;
        };
        let Some(type_value) = map.get("type") else {
            report.fail(
                ErrorKind::MissingRequiredProperty,
                Context::new().with_property("type"),
            );
            return;
        };
        let Some(geometry) = type_value.as_str() else {
            report.fail(ErrorKind::NotString, Context::new().with_value(type_value));
            return;
        };

        let depth = match geometry {
            "Point" => 0,
            "MultiPoint" | "LineString" => 1,
            "Polygon" | "MultiLineString" => 2,
            "MultiPolygon" => 3,
            "GeometryCollection" => {
                let Some(geometries) = map.get("geometries") else {
                    report.fail(
                        ErrorKind::MissingRequiredProperty,
                        Context::new().with_property("geometries"),
                    );
                    return;
                };
                let Some(items) = geometries.as_array() else {
                    report.fail(ErrorKind::NotArray, Context::new().with_value(geometries));
                    return;
                };
                for (index, item) in items.iter().enumerate() {
                    report.push_path(index.to_string());
                    self.validate_geojson(report, item);
                    if report.has_failed() {
                        return;
                    }
                    report.pop_path();
                }
                return;
            }
            _ => {
                report.fail(
                    ErrorKind::UnsupportedDataType,
                    Context::new()
                        .with_value(type_value)
                        .with_message(format!("unknown geometry type '{geometry}'")),
                );
                return;
            }
        };

        let Some(coordinates) = map.get("coordinates") else {
            report.fail(
                ErrorKind::MissingRequiredProperty,
                Context::new().with_property("coordinates"),
            );
            return;
        };
        if let Err(kind) = check_coordinates(coordinates, depth) {
            report.fail(
                kind,
                Context::new().with_value(coordinates).with_message(format!(
                    "coordinates do not match geometry type '{geometry}'"
                )),
            );
        }
    }
}

/// Record a confirmed membership, rewriting the value when the preferred
/// term differs from the supplied code.
fn finish_enum(report: &mut Report, value: &mut Value, code: &str, preferred: GlobalId) {
    if preferred.as_str() != code {
        report.note_resolved(code, Value::String(preferred.as_str().to_string()));
        *value = Value::String(preferred.into_string());
        report.note_value_resolved();
    }
}

/// The numeric value of an integer-typed input. Accepts exact integer
/// representations and floats whose representation is exactly integral;
/// booleans and everything else are rejected.
fn integer_repr(value: &Value) -> Option<f64> {
    let number = value.as_number()?;
    if number.is_i64() || number.is_u64() {
        return number.as_f64();
    }
    let f = number.as_f64()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f)
}

/// The numeric value of a number-typed input. `Value::Bool` is a
/// distinct variant and never reaches here as a number.
fn numeric_repr(value: &Value) -> Option<f64> {
    value.as_number()?.as_f64()
}

/// Convert a timestamp input to epoch milliseconds: a number is taken as
/// epoch millis directly; a string must parse as RFC 3339, as
/// `YYYY-MM-DD HH:MM:SS`, or as a bare date (midnight UTC).
fn epoch_millis(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_instant(s),
        _ => None,
    }
}

/// Check coordinate nesting: depth 0 is a position (two or three
/// numbers); each further depth wraps positions in one more array.
fn check_coordinates(value: &Value, depth: usize) -> Result<(), ErrorKind> {
    let Some(items) = value.as_array() else {
        return Err(ErrorKind::NotArray);
    };
    if depth == 0 {
        if !(2..=3).contains(&items.len()) {
            return Err(ErrorKind::NotArray);
        }
        if items.iter().any(|item| !item.is_number()) {
            return Err(ErrorKind::NotNumber);
        }
        return Ok(());
    }
    for item in items {
        check_coordinates(item, depth - 1)?;
    }
    Ok(())
}
