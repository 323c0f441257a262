//! # Evaluation Plans
//!
//! The ordered execution schedule binding plan stages to predicates.
//! Stage `P0` is reserved for input validation and carries no predicate
//! reference; stages `P1..Pn` each reference exactly one predicate, in
//! `PredicateSet.order` order.

use serde::{Deserialize, Serialize};

/// Stage label of the reserved input-validation stage.
pub const STAGE_VALIDATE: &str = "P0";

/// Operation tag carried by the `P0` stage.
pub const OP_VALIDATE_INPUTS: &str = "VALIDATE_INPUTS";

/// One stage of an evaluation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Stage label (`P0`, `P1`, ...).
    pub stage: String,
    /// Operation tag (only on `P0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    /// The predicate this stage evaluates (absent on `P0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    /// Operator tags for the stage (`["D", "L"]`: data resolution, logic).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops: Option<Vec<String>>,
}

impl PlanStep {
    /// The reserved `P0` input-validation stage.
    pub fn validate_inputs() -> Self {
        Self {
            stage: STAGE_VALIDATE.to_string(),
            op: Some(OP_VALIDATE_INPUTS.to_string()),
            predicate: None,
            ops: None,
        }
    }

    /// A predicate stage `P{n}` referencing `predicate_id`.
    pub fn predicate_stage(n: usize, predicate_id: impl Into<String>) -> Self {
        Self {
            stage: format!("P{n}"),
            op: None,
            predicate: Some(predicate_id.into()),
            ops: Some(vec!["D".to_string(), "L".to_string()]),
        }
    }
}

/// A compiled evaluation plan.
///
/// The `hash` binds the plan to the content of its generating predicate
/// set and sequence — never to wall-clock or environment data — so
/// recompiling the same snapshot yields the same hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalPlan {
    /// Deterministic identifier: `plan.{jurisdiction}.{domain}.v1`.
    pub eval_plan_id: String,
    /// Ordered stages: `P0` then one stage per predicate in set order.
    pub sequence: Vec<PlanStep>,
    /// Content digest over `{predicate_set, sequence}`.
    pub hash: String,
}
