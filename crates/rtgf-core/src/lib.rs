//! # rtgf-core — Foundational Types for the PPE Pipeline
//!
//! This crate is the bedrock of the RTGF Predicate Policy Evaluation
//! pipeline. It defines the primitives both the compiler and the evaluator
//! build on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    Ever. This prevents the canonicalization-split defect class by
//!    construction.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every digest path flows through RFC 8785
//!    canonicalization.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, matching the canonicalization rules.
//!
//! 4. **Injectable clocks.** Time is a capability (`Clock`), never ambient
//!    state. Deterministic replay uses `FixedClock`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rtgf-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{digest_of, sha256_digest, ContentDigest, DIGEST_PREFIX};
pub use error::{CanonicalizationError, TemporalError};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
