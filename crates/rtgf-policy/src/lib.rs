//! # rtgf-policy — PPE Data Model
//!
//! The shared contract binding the policy compiler and the predicate
//! evaluation engine. The two never share mutable state; everything that
//! crosses between them is one of the immutable, hashable artifacts
//! defined here.
//!
//! ## Lifecycle
//!
//! - [`PolicySnapshot`] → produced once per policy version, externally.
//! - [`PredicateSet`] / [`EvalPlan`] → compiled once per snapshot, reused
//!   across many evaluations.
//! - [`EvaluationToken`], [`EvaluationContext`], [`EvaluationTrace`],
//!   [`EvaluationResult`] → created fresh per evaluation request, never
//!   mutated after return.
//!
//! ## Crate Policy
//!
//! - Data only: no evaluation semantics, no I/O.
//! - Every type round-trips through serde with a stable wire form.

pub mod context;
pub mod decision;
pub mod logic;
pub mod plan;
pub mod predicate;
pub mod result;
pub mod snapshot;
pub mod token;
pub mod trace;

pub use context::EvaluationContext;
pub use decision::{Decision, FallbackDecision};
pub use logic::{LogicNode, OpKind};
pub use plan::{EvalPlan, PlanStep, OP_VALIDATE_INPUTS, STAGE_VALIDATE};
pub use predicate::{OnFail, Predicate, PredicateInput, PredicateSet};
pub use result::EvaluationResult;
pub use snapshot::PolicySnapshot;
pub use token::EvaluationToken;
pub use trace::{EvaluationTrace, TraceStep};
