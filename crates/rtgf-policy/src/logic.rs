//! # Operator Trees
//!
//! The `logic` expression carried by every predicate. The wire form is an
//! operator-tree object (`{"op": "AND", "operands": [...]}`); nodes keep
//! their `op` as a string so domain-specific leaf operators (e.g. a
//! jurisdiction's `SANCTIONS_SCREEN`) survive round-trips untouched, while
//! [`OpKind`] classifies the built-in operators once, at one place, for
//! the evaluator.
//!
//! Evaluation semantics live in `rtgf-evaluator`; this module is data only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node in a predicate's operator tree.
///
/// Built-in operators use `operands` (boolean combinators) or `var`/`value`
/// (comparisons over dot-path-resolved context values). Operators outside
/// the built-in set are carried verbatim and classified as
/// [`OpKind::Domain`] — their outcome is supplied by the predicate's
/// resolver, not by pure evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicNode {
    /// Operator name (`AND`, `OR`, `NOT`, `EQ`, ..., or a domain leaf).
    pub op: String,
    /// Child expressions for boolean combinators.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<LogicNode>,
    /// Dot-path into the evaluation context, for comparisons and `EXISTS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<String>,
    /// Literal operand for comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl LogicNode {
    /// A constant-true leaf (`{"op": "PASS"}`).
    pub fn pass() -> Self {
        Self::leaf("PASS")
    }

    /// A constant-false leaf (`{"op": "FAIL"}`).
    pub fn fail() -> Self {
        Self::leaf("FAIL")
    }

    /// A bare leaf with no operands.
    pub fn leaf(op: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            operands: Vec::new(),
            var: None,
            value: None,
        }
    }

    /// A comparison node over a context dot-path and a literal.
    pub fn compare(op: impl Into<String>, var: impl Into<String>, value: Value) -> Self {
        Self {
            op: op.into(),
            operands: Vec::new(),
            var: Some(var.into()),
            value: Some(value),
        }
    }

    /// A boolean combinator over child expressions.
    pub fn combine(op: impl Into<String>, operands: Vec<LogicNode>) -> Self {
        Self {
            op: op.into(),
            operands,
            var: None,
            value: None,
        }
    }

    /// Classify this node's operator.
    pub fn kind(&self) -> OpKind {
        match self.op.as_str() {
            "PASS" => OpKind::Pass,
            "FAIL" => OpKind::Fail,
            "AND" => OpKind::And,
            "OR" => OpKind::Or,
            "NOT" => OpKind::Not,
            "EQ" => OpKind::Eq,
            "NE" => OpKind::Ne,
            "GT" => OpKind::Gt,
            "GTE" => OpKind::Gte,
            "LT" => OpKind::Lt,
            "LTE" => OpKind::Lte,
            "EXISTS" => OpKind::Exists,
            _ => OpKind::Domain,
        }
    }
}

/// Classification of an operator name.
///
/// The built-in set is fixed; everything else is a domain-specific leaf
/// whose semantics belong to an external resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Constant true.
    Pass,
    /// Constant false.
    Fail,
    /// Left-to-right short-circuit conjunction.
    And,
    /// Left-to-right short-circuit disjunction.
    Or,
    /// Negation of a single operand.
    Not,
    /// Equality against a literal.
    Eq,
    /// Inequality against a literal.
    Ne,
    /// Strictly greater (numbers or strings).
    Gt,
    /// Greater or equal.
    Gte,
    /// Strictly less.
    Lt,
    /// Less or equal.
    Lte,
    /// Dot-path resolves to a present, non-null value.
    Exists,
    /// Domain-specific leaf operator — not evaluable in pure logic.
    Domain,
}
