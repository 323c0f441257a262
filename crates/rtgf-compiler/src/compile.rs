//! # Snapshot Compilation
//!
//! `compile()` maps a policy snapshot into the two evaluation artifacts:
//! an ordered predicate set and a staged evaluation plan, both stamped
//! with identifiers and hashes derived from content only.
//!
//! ## Determinism
//!
//! Compilation is a pure function of the snapshot. Identifiers come from
//! snapshot metadata (`ps.{jurisdiction}.{domain}.v1`), never from
//! timestamps or random ids; the plan hash is a content digest over the
//! compiled predicate set and sequence. Recompiling the same snapshot
//! yields byte-identical canonical serializations.

use serde::Serialize;
use thiserror::Error;

use rtgf_core::{digest_of, CanonicalizationError};
use rtgf_policy::{EvalPlan, PlanStep, PolicySnapshot, PredicateSet};

/// Semantic version stamped on every compiled predicate set.
const PREDICATE_SET_VERSION: &str = "1.0.0";

/// The two artifacts produced by one compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPolicy {
    /// Ordered predicate definitions.
    pub predicate_set: PredicateSet,
    /// Staged evaluation schedule, hash-bound to the predicate set.
    pub eval_plan: EvalPlan,
}

/// Configuration faults raised during compilation.
///
/// These indicate an invalid snapshot, not a policy outcome: compilation
/// aborts with no partial artifacts.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A required predicate id has no matching definition.
    #[error("no predicate definition found for required id {id:?}")]
    PredicateNotFound {
        /// The unmatched id from `required_predicates`.
        id: String,
    },

    /// Two predicate definitions share an id.
    #[error("duplicate predicate definition for id {id:?}")]
    DuplicatePredicate {
        /// The id that appears more than once.
        id: String,
    },

    /// The compiled artifacts could not be canonicalized for hashing.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

/// Content that the eval plan hash commits to. Never includes wall-clock
/// or environment data.
#[derive(Serialize)]
struct PlanHashInput<'a> {
    predicate_set: &'a PredicateSet,
    sequence: &'a [PlanStep],
}

/// Compile a policy snapshot into a predicate set and an eval plan.
///
/// - `PredicateSet.order` is `snapshot.required_predicates`, verbatim —
///   order is the evaluation sequence.
/// - The plan sequence is `P0` (input validation, no predicate) followed
///   by `P1..Pn`, one stage per entry of `order`, in that order.
///
/// # Errors
///
/// [`CompileError::DuplicatePredicate`] if two definitions share an id,
/// [`CompileError::PredicateNotFound`] if a required id has no
/// definition, [`CompileError::Canonicalization`] if hashing fails.
pub fn compile(snapshot: &PolicySnapshot) -> Result<CompiledPolicy, CompileError> {
    for (i, predicate) in snapshot.predicates.iter().enumerate() {
        if snapshot.predicates[..i].iter().any(|p| p.id == predicate.id) {
            return Err(CompileError::DuplicatePredicate {
                id: predicate.id.clone(),
            });
        }
    }
    for id in &snapshot.required_predicates {
        if !snapshot.predicates.iter().any(|p| &p.id == id) {
            return Err(CompileError::PredicateNotFound { id: id.clone() });
        }
    }

    let predicate_set = PredicateSet {
        predicate_set_id: format!("ps.{}.{}.v1", snapshot.jurisdiction, snapshot.domain),
        version: PREDICATE_SET_VERSION.to_string(),
        order: snapshot.required_predicates.clone(),
        predicates: snapshot.predicates.clone(),
    };

    let mut sequence = Vec::with_capacity(1 + predicate_set.order.len());
    sequence.push(PlanStep::validate_inputs());
    for (idx, id) in predicate_set.order.iter().enumerate() {
        sequence.push(PlanStep::predicate_stage(idx + 1, id.clone()));
    }

    let hash = digest_of(&PlanHashInput {
        predicate_set: &predicate_set,
        sequence: &sequence,
    })?;

    let eval_plan = EvalPlan {
        eval_plan_id: format!("plan.{}.{}.v1", snapshot.jurisdiction, snapshot.domain),
        sequence,
        hash,
    };

    tracing::debug!(
        predicate_set_id = %predicate_set.predicate_set_id,
        stages = eval_plan.sequence.len(),
        plan_hash = %eval_plan.hash,
        "compiled policy snapshot"
    );

    Ok(CompiledPolicy {
        predicate_set,
        eval_plan,
    })
}
