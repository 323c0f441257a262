//! # rtgf-compiler — Policy Snapshot Compiler
//!
//! Turns a jurisdiction policy snapshot into the two deterministic
//! evaluation artifacts: a canonical [`rtgf_policy::PredicateSet`] and a
//! staged [`rtgf_policy::EvalPlan`].
//!
//! ## Crate Policy
//!
//! - `compile()` is pure and synchronous: no clocks, no randomness, no
//!   I/O. Persistence of the artifacts is the caller's responsibility.
//! - Configuration faults abort compilation with a structured
//!   [`CompileError`]; no partial artifacts are ever produced.

pub mod compile;

pub use compile::{compile, CompileError, CompiledPolicy};
