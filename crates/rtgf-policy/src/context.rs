//! # Evaluation Contexts
//!
//! The runtime facts predicates consume: arbitrary nested key-value data,
//! addressed by dot-paths, strictly read-only for the duration of an
//! evaluation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read-only nested key-value data supplying runtime facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationContext(Value);

impl EvaluationContext {
    /// Wrap a JSON value as a context.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Resolve a dot-path (`customer.id`) to a value, if present.
    ///
    /// Each segment indexes an object field; any non-object intermediate
    /// terminates the walk.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Whether a required input is satisfied at `path`: present, non-null,
    /// and not an empty string.
    pub fn satisfies_required(&self, path: &str) -> bool {
        match self.lookup(path) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

impl From<Value> for EvaluationContext {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
