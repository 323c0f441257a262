//! # rtgf-evaluator — Predicate Evaluation Engine
//!
//! Executes a compiled eval plan against a predicate set and a runtime
//! context, invoking operator trees and optional external resolvers, and
//! emits an auditable decision: `PERMIT`, `PERMIT_WITH_CONTROLS`, or
//! `DENY`, with a structured trace and a content digest.
//!
//! ## Crate Policy
//!
//! - Pure logic evaluation never suspends; resolver invocation is the
//!   only `await` point.
//! - Policy outcomes are values, never errors. `Err` is reserved for
//!   caller configuration faults and canonicalization bugs.
//! - All evaluation inputs are borrowed immutably; concurrent
//!   evaluations of different tokens need no synchronization.

pub mod engine;
pub mod logic;
pub mod resolver;

pub use engine::{evaluate, EvalError};
pub use logic::{eval_logic, LogicOutcome};
pub use resolver::{
    FaultingResolver, Resolver, ResolverFault, ResolverOutcome, ResolverRegistry, StaticResolver,
};
