//! # rtgf-cli — Predicate Policy Engine Command-Line Interface
//!
//! File-in, file-out front end over the compiler and the evaluation
//! engine.
//!
//! ## Subcommands
//!
//! - `compile` — Policy snapshot → predicate set + eval plan, schema
//!   validated before anything is written.
//! - `evaluate` — Token + context → sealed decision with trace and
//!   digest.
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no evaluation or
//!   compilation semantics here.
//! - Artifacts are written all-or-none: validation failures leave the
//!   filesystem untouched.

pub mod compile;
pub mod evaluate;
