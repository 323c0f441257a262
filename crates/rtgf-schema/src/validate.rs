//! # Schema Validation
//!
//! Runtime validation of PPE artifacts against JSON Schema definitions
//! (Draft 2020-12).
//!
//! ## Security Invariant
//!
//! Schema validation is a trust boundary. Artifacts that fail validation
//! must be rejected with structured error information including the schema
//! path and the violating field — a malformed token or plan must never
//! reach the evaluation engine.
//!
//! ## Schema Resolution
//!
//! All schemas are embedded in the binary at compile time and use `$id`
//! URIs of the form:
//!   `https://schemas.rtgf.dev/ppe/<filename>`
//!
//! Cross-schema `$ref` URIs use the same pattern (the token schema refers
//! to the predicate-set and eval-plan schemas). This module resolves these
//! URIs against the embedded registry; no network requests are ever made.
//!
//! Internal `$ref`s of the form `#/$defs/<name>` are resolved by the
//! jsonschema crate natively.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;

/// URI prefix shared by every embedded schema.
const SCHEMA_URI_PREFIX: &str = "https://schemas.rtgf.dev/ppe/";

/// Schema for compiled predicate sets.
pub const PREDICATE_SET_SCHEMA: &str = "predicate-set.schema.json";
/// Schema for compiled eval plans.
pub const EVAL_PLAN_SCHEMA: &str = "eval-plan.schema.json";
/// Schema for evaluation tokens.
pub const TOKEN_SCHEMA: &str = "token.schema.json";

/// Every schema shipped with the crate, embedded at compile time.
const EMBEDDED_SCHEMAS: &[(&str, &str)] = &[
    (
        PREDICATE_SET_SCHEMA,
        include_str!("../schemas/predicate-set.schema.json"),
    ),
    (
        EVAL_PLAN_SCHEMA,
        include_str!("../schemas/eval-plan.schema.json"),
    ),
    (TOKEN_SCHEMA, include_str!("../schemas/token.schema.json")),
];

/// Local retriever that resolves `$ref` URIs to embedded schemas.
///
/// This prevents the jsonschema crate from making network requests for
/// cross-schema references. All references are resolved locally from
/// the embedded schema registry.
struct LocalSchemaRetriever {
    /// Map from URI string to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        // Direct lookup.
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Fall back to the bare filename.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        // For JSON Schema draft metaschemas and any other unresolved
        // URIs, return a permissive schema that accepts anything rather
        // than reaching for the network.
        Ok(serde_json::json!({}))
    }
}

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The artifact did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The embedded schema could not be parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A schema validator backed by the `jsonschema` crate.
///
/// Parses the embedded schemas at construction time, registers them as
/// resources for `$ref` resolution, and validates PPE artifacts against
/// named schemas.
///
/// ## Thread Safety
///
/// `SchemaValidator` is `Send + Sync` — a single instance can be shared
/// across threads. Schema parsing happens once at construction.
#[derive(Debug)]
pub struct SchemaValidator {
    /// Map from schema filename (e.g., "token.schema.json") to parsed JSON value.
    schemas: HashMap<String, Value>,
}

impl SchemaValidator {
    /// Create a validator from the embedded schema set.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaLoadError` if an embedded
    /// schema is not valid JSON. This indicates a packaging defect, not
    /// a runtime condition.
    pub fn new() -> Result<Self, SchemaValidationError> {
        let mut schemas = HashMap::new();
        for (name, content) in EMBEDDED_SCHEMAS {
            let value: Value = serde_json::from_str(content).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    schema_name: (*name).to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            schemas.insert((*name).to_string(), value);
        }
        Ok(Self { schemas })
    }

    /// Returns the names of all embedded schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Look up an embedded schema by filename.
    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Build `ValidationOptions` with all schemas registered as resources
    /// so that cross-schema `$ref` URIs resolve correctly.
    ///
    /// Installs a local retriever to prevent network requests for any
    /// `$ref` URIs not covered by the embedded set.
    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);

        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (filename, value) in &self.schemas {
            schemas_by_uri.insert(format!("{SCHEMA_URI_PREFIX}{filename}"), value.clone());
            if let Some(id_str) = value.get("$id").and_then(|v| v.as_str()) {
                schemas_by_uri.insert(id_str.to_string(), value.clone());
            }
            schemas_by_uri.insert(filename.clone(), value.clone());
        }

        let retriever = LocalSchemaRetriever { schemas_by_uri };
        opts.with_retriever(retriever);

        opts
    }

    /// Build a compiled `Validator` for a specific schema by filename.
    ///
    /// The validator has all other schemas registered for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaLoadError` if the schema is not found.
    /// Returns `SchemaValidationError::ValidatorBuildError` if the validator cannot be compiled.
    pub fn build_validator(&self, schema_name: &str) -> Result<Validator, SchemaValidationError> {
        let schema_value = self.schemas.get(schema_name).ok_or_else(|| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_name.to_string(),
                reason: "schema not embedded in this build".to_string(),
            }
        })?;

        let opts = self.build_options();
        opts.build(schema_value)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Validate a parsed JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with structured
    /// violation details if the artifact is invalid.
    pub fn validate_document(
        &self,
        instance: &Value,
        schema_name: &str,
    ) -> Result<(), SchemaValidationError> {
        let validator = self.build_validator(schema_name)?;

        let errors: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: schema_name.to_string(),
                violations: ValidationViolations { violations: errors },
            })
        }
    }

    /// Validate a compiled predicate set.
    pub fn validate_predicate_set(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        self.validate_document(instance, PREDICATE_SET_SCHEMA)
    }

    /// Validate a compiled eval plan.
    pub fn validate_eval_plan(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        self.validate_document(instance, EVAL_PLAN_SCHEMA)
    }

    /// Validate an evaluation token, including its nested predicate set
    /// and eval plan via cross-schema `$ref`.
    pub fn validate_token(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        self.validate_document(instance, TOKEN_SCHEMA)
    }
}
