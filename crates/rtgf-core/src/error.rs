//! # Error Types — Shared Error Hierarchy
//!
//! Errors shared across the PPE pipeline crates. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! The taxonomy distinguishes faults from policy outcomes: a fault is
//! returned as `Err` and surfaced to the operator; a policy outcome (a
//! predicate failing, a required input missing) is never an error — it
//! resolves to a terminal decision inside an `EvaluationResult`.

use thiserror::Error;

/// Error during canonical serialization.
///
/// Canonicalization faults are fatal to the enclosing operation: they
/// indicate a data-modeling bug upstream (a non-serializable or non-finite
/// value reached the digest boundary), and the operation must abort rather
/// than silently produce a wrong digest.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// RFC 8785 serialization failed. Non-finite numbers (NaN, Infinity)
    /// and value kinds without a JSON representation land here.
    #[error("canonical serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error constructing or parsing temporal values.
#[derive(Error, Debug)]
pub enum TemporalError {
    /// The timestamp string is not RFC 3339 or carries a non-Z offset.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The offending input string.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}
