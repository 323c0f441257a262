//! # rtgf-schema — Artifact Schema Validation
//!
//! Runtime JSON Schema validation for the three PPE wire artifacts:
//! predicate sets, eval plans, and evaluation tokens.
//!
//! ## Runtime Validation (`validate`)
//!
//! The [`validate`] module embeds the three JSON schemas at compile time,
//! registers them for cross-schema `$ref` resolution, and validates
//! artifacts against them:
//!
//! - [`SchemaValidator::validate_predicate_set`]
//! - [`SchemaValidator::validate_eval_plan`]
//! - [`SchemaValidator::validate_token`] — follows `$ref`s into the
//!   nested predicate set and plan.
//!
//! ## Crate Policy
//!
//! - Schema `$id` and `$ref` URIs must never be changed without updating
//!   every embedded schema that references them.
//! - Schema validation is a trust boundary: invalid artifacts are
//!   rejected with structured errors including instance path, schema
//!   path, and message.

pub mod validate;

pub use validate::{
    SchemaValidationError, SchemaValidator, ValidationViolations, Violation,
    EVAL_PLAN_SCHEMA, PREDICATE_SET_SCHEMA, TOKEN_SCHEMA,
};
