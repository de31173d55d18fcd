//! # ddict-validate — Typed-Value Validation Engine
//!
//! Validates arbitrary JSON values against a descriptor's declared shape
//! (scalar, array, set, dictionary) and scalar type, producing a
//! structured [`Report`] with the exact error kind and the sub-path
//! where validation failed.
//!
//! ## Failure Model
//!
//! Validation failures are values, never errors: every outcome lands in
//! the report's status and the call returns `Ok(report)`. Only
//! infrastructure failures from the term/edge stores come back as
//! [`ValidateError`]. Recursive validation short-circuits at the first
//! failure within a container; the report names exactly one failure
//! site, the deepest reached.
//!
//! ## Statelessness
//!
//! The engine holds only store references and the schema vocabulary it
//! was built with. Each `validate` call owns a fresh read-through term
//! cache and performs no writes, so concurrent validations against the
//! same stores need no locking.

pub mod engine;
pub mod report;
mod rules;
mod value;

pub use engine::{ValidateError, ValidationEngine};
pub use report::{Context, Report, Status};
