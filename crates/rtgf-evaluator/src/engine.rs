//! # Predicate Evaluation Engine
//!
//! Walks an eval plan stage by stage against a predicate set and a
//! runtime context, producing a terminal decision with a full execution
//! trace and a content digest.
//!
//! ## State Machine
//!
//! States are the plan stages in order (`P0`, `P1`, ..., `Pn`) plus the
//! terminal decisions. `P0` always succeeds (input-shape validation is
//! the schema layer's job, performed on the compiler's output by its
//! consumer). Each later stage evaluates exactly one predicate and either
//! advances or terminates the plan. Fail-fast: once a stage terminates,
//! no further predicate is evaluated and no further resolver is invoked.
//!
//! ## Per-Stage Precedence
//!
//! 1. Predicate existence — a missing definition is a configuration
//!    defect hardened into `DENY` (`PREDICATE_MISSING:{id}`); the
//!    fallback clause is never consulted.
//! 2. Required inputs — first missing input terminates with
//!    `INPUT_MISSING:{name}`; later inputs are not checked.
//! 3. Pure logic — the operator tree, short-circuit, no I/O.
//! 4. Resolver augmentation — a declared resolver's outcome replaces the
//!    pure one and may override the reason. A fault maps to `DENY` with
//!    `RESOLVER_ERROR:{name}`, never softened by the fallback clause.
//!
//! ## Concurrency
//!
//! One evaluation is logically sequential; the awaited resolver call is
//! the only suspension point. Independent evaluations share no mutable
//! state — every parameter is borrowed immutably.

use thiserror::Error;

use rtgf_core::{CanonicalizationError, Clock};
use rtgf_policy::{
    Decision, EvaluationContext, EvaluationResult, EvaluationToken, EvaluationTrace, PlanStep,
    Predicate, TraceStep,
};

use crate::logic::{eval_logic, LogicOutcome};
use crate::resolver::ResolverRegistry;

/// Synthesized reason when a predicate fails without a declared one.
const REASON_PREDICATE_FAIL: &str = "PREDICATE_FAIL";

/// Faults that prevent an evaluation from reaching a decision.
///
/// These are caller configuration errors, not policy outcomes: the
/// distinction lets callers tell "the system could not decide" (this
/// error) from "the system decided DENY" (a returned result).
#[derive(Error, Debug)]
pub enum EvalError {
    /// A predicate declared a resolver that is not in the registry.
    #[error("resolver {name:?} is not registered")]
    ResolverMissing {
        /// The resolver name the predicate declared.
        name: String,
    },

    /// The evaluation result could not be canonicalized for digesting.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

/// How a predicate stage concluded.
enum StageOutcome {
    /// The predicate held; advance to the next stage.
    Passed,
    /// The stage terminated the plan.
    Terminated {
        decision: Decision,
        reason: String,
        /// Underlying resolver fault message, when applicable.
        error: Option<String>,
    },
}

/// Evaluate a token against a context.
///
/// Walks `token.eval_plan.sequence` in order. Stages without a predicate
/// reference (`P0`) record a passing trace entry and advance. The clock
/// supplies the trace timestamp; inject [`rtgf_core::FixedClock`] for
/// deterministic replay.
///
/// # Errors
///
/// [`EvalError::ResolverMissing`] when a declared resolver is absent
/// from the registry, [`EvalError::Canonicalization`] when the result
/// cannot be digested. Policy outcomes — including fail-closed denials
/// for resolver faults — are never errors.
pub async fn evaluate(
    token: &EvaluationToken,
    context: &EvaluationContext,
    resolvers: &ResolverRegistry,
    clock: &dyn Clock,
) -> Result<EvaluationResult, EvalError> {
    let ts = clock.now();
    let mut steps: Vec<TraceStep> = Vec::with_capacity(token.eval_plan.sequence.len());
    let mut reasons: Vec<String> = Vec::new();

    for step in &token.eval_plan.sequence {
        let Some(predicate_id) = step.predicate.as_deref() else {
            steps.push(TraceStep::passed(step.stage.clone()));
            continue;
        };

        match run_stage(token, context, resolvers, step, predicate_id).await? {
            StageOutcome::Passed => {
                tracing::debug!(stage = %step.stage, predicate = predicate_id, "stage passed");
                steps.push(TraceStep::predicate_passed(
                    step.stage.clone(),
                    predicate_id,
                ));
            }
            StageOutcome::Terminated {
                decision,
                reason,
                error,
            } => {
                tracing::debug!(
                    stage = %step.stage,
                    predicate = predicate_id,
                    %decision,
                    reason = %reason,
                    "stage terminated plan"
                );
                steps.push(TraceStep {
                    stage: step.stage.clone(),
                    predicate: Some(predicate_id.to_string()),
                    ok: false,
                    reason: Some(reason.clone()),
                    error,
                });
                reasons.push(reason);
                return seal(token, decision, reasons, steps, ts);
            }
        }
    }

    seal(token, Decision::Permit, reasons, steps, ts)
}

/// Run one predicate stage through the precedence ladder.
async fn run_stage(
    token: &EvaluationToken,
    context: &EvaluationContext,
    resolvers: &ResolverRegistry,
    step: &PlanStep,
    predicate_id: &str,
) -> Result<StageOutcome, EvalError> {
    // 1. Existence. A missing predicate is a configuration defect: always
    //    a hard deny, never eligible for the fallback clause.
    let Some(predicate) = token.predicate_set.predicate(predicate_id) else {
        return Ok(StageOutcome::Terminated {
            decision: Decision::Deny,
            reason: format!("PREDICATE_MISSING:{predicate_id}"),
            error: None,
        });
    };

    // 2. Required inputs. First miss terminates; later inputs unchecked.
    for input in predicate.inputs.iter().filter(|i| i.required) {
        if !context.satisfies_required(&input.name) {
            return Ok(StageOutcome::Terminated {
                decision: fallback_decision(predicate),
                reason: format!("INPUT_MISSING:{}", input.name),
                error: None,
            });
        }
    }

    // 3. Pure logic (the fixture override, when present, forces it).
    let pure = match predicate.mock_result {
        Some(forced) => LogicOutcome::Definitive(forced),
        None => eval_logic(&predicate.logic, context),
    };

    // 4. Resolver augmentation.
    let (ok, reason_override) = match &predicate.resolver {
        Some(name) => {
            let resolver = resolvers
                .get(name)
                .ok_or_else(|| EvalError::ResolverMissing { name: name.clone() })?;
            match resolver.resolve(predicate, context, token, step).await {
                Ok(outcome) => (outcome.ok, outcome.reason),
                Err(fault) => {
                    // An unreachable external dependency must not soften
                    // to PERMIT_WITH_CONTROLS.
                    return Ok(StageOutcome::Terminated {
                        decision: Decision::Deny,
                        reason: format!("RESOLVER_ERROR:{name}"),
                        error: Some(fault.message),
                    });
                }
            }
        }
        None => match pure {
            LogicOutcome::Definitive(b) => (b, None),
            // No definitive answer and nobody to ask: fail closed.
            LogicOutcome::Indeterminate => (false, None),
        },
    };

    if ok {
        Ok(StageOutcome::Passed)
    } else {
        let reason = reason_override
            .or_else(|| predicate.on_fail.as_ref().and_then(|f| f.reason.clone()))
            .unwrap_or_else(|| REASON_PREDICATE_FAIL.to_string());
        Ok(StageOutcome::Terminated {
            decision: fallback_decision(predicate),
            reason,
            error: None,
        })
    }
}

/// The decision a failing predicate terminates with.
fn fallback_decision(predicate: &Predicate) -> Decision {
    predicate
        .on_fail
        .as_ref()
        .map(|f| f.decision.into())
        .unwrap_or(Decision::Deny)
}

/// Assemble the trace, pick the controls for the decision reached, and
/// seal the result with its digest.
fn seal(
    token: &EvaluationToken,
    decision: Decision,
    reasons: Vec<String>,
    steps: Vec<TraceStep>,
    ts: rtgf_core::Timestamp,
) -> Result<EvaluationResult, EvalError> {
    let controls = match decision {
        Decision::Permit => token.controls_on_permit.clone(),
        Decision::PermitWithControls => token.controls_on_permit_with_controls.clone(),
        Decision::Deny => Vec::new(),
    };
    let trace = EvaluationTrace {
        token_id: token.token_id.clone(),
        plan_hash: token.eval_plan.hash.clone(),
        ts,
        steps,
    };
    tracing::info!(token_id = %token.token_id, %decision, "evaluation complete");
    Ok(EvaluationResult::seal(decision, reasons, controls, trace)?)
}
