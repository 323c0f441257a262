//! # Predicates and Predicate Sets
//!
//! A predicate is a named, independently testable policy rule: declared
//! input requirements, an operator-tree `logic` expression, an optional
//! named resolver, and a fallback decision for its failure path.
//!
//! A predicate set bundles compiled predicates with an explicit evaluation
//! `order`. Order is semantically meaningful — it is the evaluation
//! sequence, not a presentation detail — so it is carried as data and
//! never re-derived from the predicate listing.

use serde::{Deserialize, Serialize};

use crate::decision::FallbackDecision;
use crate::logic::LogicNode;

/// A named, typed input requirement of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateInput {
    /// Dot-path into the evaluation context (e.g. `customer.id`).
    pub name: String,
    /// Declared type tag (informational; shape validation is the schema
    /// layer's job).
    #[serde(rename = "type")]
    pub input_type: String,
    /// Required inputs must resolve to a present, non-null, non-empty
    /// value at evaluation time.
    pub required: bool,
}

/// The fallback clause applied when a predicate fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnFail {
    /// Decision to terminate with (`DENY` or `PERMIT_WITH_CONTROLS`).
    pub decision: FallbackDecision,
    /// Reason string to record; when absent the engine synthesizes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A single compiled policy rule.
///
/// Immutable once compiled; identity is the `id` plus the content hash of
/// the enclosing predicate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Identifier, unique within a predicate set.
    pub id: String,
    /// Compliance domain tag (e.g. `kyc`, `sanctions`).
    pub domain: String,
    /// Ordered input requirements.
    #[serde(default)]
    pub inputs: Vec<PredicateInput>,
    /// Operator-tree expression supplying the pure outcome.
    pub logic: LogicNode,
    /// Fallback clause; absent means fail closed with a synthesized reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_fail: Option<OnFail>,
    /// Name of the external resolver that supplies or overrides the
    /// outcome (e.g. a sanctions screening lookup).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    /// Fixture override: forces the logic outcome. Carried by test
    /// snapshots; production snapshots omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_result: Option<bool>,
}

/// An ordered, compiled set of predicates.
///
/// # Invariants
///
/// - Predicate ids are unique (enforced at compile time).
/// - Every id in `order` names a predicate in `predicates`.
/// - Evaluation order is exactly `order`, not the listing order of
///   `predicates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateSet {
    /// Deterministic identifier: `ps.{jurisdiction}.{domain}.v1`.
    pub predicate_set_id: String,
    /// Semantic version of the set.
    pub version: String,
    /// Explicit evaluation sequence.
    pub order: Vec<String>,
    /// The predicate definitions, in snapshot listing order.
    pub predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Look up a predicate by id.
    ///
    /// Sets are small (tens of predicates), so a linear scan is fine and
    /// keeps the wire form a plain array.
    pub fn predicate(&self, id: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.id == id)
    }
}
