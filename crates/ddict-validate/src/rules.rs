//! # Structural Rule Evaluation
//!
//! Applies a term's rule block to an object value: required, banned,
//! and selection-group constraints. Recommended properties are advisory;
//! their absence is traced, never failed.

use serde_json::{Map, Value};
use tracing::debug;

use ddict_core::{EdgeStore, ErrorKind, RuleBlock, TermStore};

use crate::engine::ValidationEngine;
use crate::report::{Context, Report};

impl<T: TermStore, E: EdgeStore> ValidationEngine<'_, T, E> {
    /// Evaluate one rule block against an object. The first violated
    /// constraint is recorded and evaluation stops.
    pub(crate) fn apply_rules(
        &self,
        report: &mut Report,
        rule: &RuleBlock,
        object: &Map<String, Value>,
    ) {
        for name in &rule.required {
            if !object.contains_key(name) {
                report.fail(
                    ErrorKind::MissingRequiredProperty,
                    Context::new().with_property(name.clone()),
                );
                return;
            }
        }

        for name in &rule.banned {
            if object.contains_key(name) {
                report.fail(
                    ErrorKind::BannedPropertyPresent,
                    Context::new().with_property(name.clone()),
                );
                return;
            }
        }

        for name in &rule.recommended {
            if !object.contains_key(name) {
                debug!(property = %name, "recommended property absent");
            }
        }

        for group in &rule.selection.one {
            if present_count(object, group) != 1 {
                report.fail(
                    ErrorKind::RequiresExactlyOneProperty,
                    Context::new().with_properties(group),
                );
                return;
            }
        }
        for group in &rule.selection.one_or_none {
            if present_count(object, group) > 1 {
                report.fail(
                    ErrorKind::RequiresAtMostOneProperty,
                    Context::new().with_properties(group),
                );
                return;
            }
        }
        for group in &rule.selection.any {
            if present_count(object, group) == 0 {
                report.fail(
                    ErrorKind::RequiresAtLeastOneProperty,
                    Context::new().with_properties(group),
                );
                return;
            }
        }
        for group in &rule.selection.all {
            if present_count(object, group) != group.len() {
                report.fail(
                    ErrorKind::RequiresAllProperties,
                    Context::new().with_properties(group),
                );
                return;
            }
        }
    }
}

fn present_count(object: &Map<String, Value>, group: &[String]) -> usize {
    group.iter().filter(|name| object.contains_key(*name)).count()
}
