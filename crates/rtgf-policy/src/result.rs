//! # Evaluation Results
//!
//! The final, digested outcome of one evaluation. The digest covers the
//! canonical serialization of the entire result — decision, reasons,
//! controls, and trace — with the digest field itself excluded, and acts
//! as the audit integrity anchor for the decision.

use serde::{Deserialize, Serialize};

use rtgf_core::{digest_of, CanonicalizationError};

use crate::decision::Decision;
use crate::trace::EvaluationTrace;

/// A complete, sealed evaluation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Terminal decision.
    pub decision: Decision,
    /// Reasons in first-triggering order (at most one per terminating
    /// stage under fail-fast).
    pub reasons: Vec<String>,
    /// Controls copied verbatim from the token's mapping for the decision
    /// reached.
    pub controls: Vec<String>,
    /// Full execution trace.
    pub trace: EvaluationTrace,
    /// `sha256:<hex>` over the canonical serialization of this result
    /// excluding this field.
    pub digest: String,
}

/// Serialization view used to compute the digest: the result without its
/// digest field. Field names must match [`EvaluationResult`] exactly.
#[derive(Serialize)]
struct DigestBody<'a> {
    decision: &'a Decision,
    reasons: &'a [String],
    controls: &'a [String],
    trace: &'a EvaluationTrace,
}

impl EvaluationResult {
    /// Build a result and seal it with its content digest.
    ///
    /// # Errors
    ///
    /// Fails with [`CanonicalizationError`] if the result cannot be
    /// canonicalized — a data-modeling bug, never a policy outcome.
    pub fn seal(
        decision: Decision,
        reasons: Vec<String>,
        controls: Vec<String>,
        trace: EvaluationTrace,
    ) -> Result<Self, CanonicalizationError> {
        let digest = digest_of(&DigestBody {
            decision: &decision,
            reasons: &reasons,
            controls: &controls,
            trace: &trace,
        })?;
        Ok(Self {
            decision,
            reasons,
            controls,
            trace,
            digest,
        })
    }

    /// Recompute the digest from the carried fields and compare.
    ///
    /// Used by auditors to verify a stored result has not been altered.
    pub fn verify_digest(&self) -> Result<bool, CanonicalizationError> {
        let expected = digest_of(&DigestBody {
            decision: &self.decision,
            reasons: &self.reasons,
            controls: &self.controls,
            trace: &self.trace,
        })?;
        Ok(expected == self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtgf_core::Timestamp;

    use crate::trace::TraceStep;

    fn sample_trace() -> EvaluationTrace {
        EvaluationTrace {
            token_id: "tok".to_string(),
            plan_hash: "sha256:abc".to_string(),
            ts: Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
            steps: vec![TraceStep::passed("P0")],
        }
    }

    #[test]
    fn test_seal_is_deterministic() {
        let a = EvaluationResult::seal(Decision::Permit, vec![], vec![], sample_trace()).unwrap();
        let b = EvaluationResult::seal(Decision::Permit, vec![], vec![], sample_trace()).unwrap();
        assert_eq!(a.digest, b.digest);
        assert!(a.digest.starts_with("sha256:"));
    }

    #[test]
    fn test_digest_covers_trace() {
        let a = EvaluationResult::seal(Decision::Permit, vec![], vec![], sample_trace()).unwrap();
        let mut other = sample_trace();
        other.steps.push(TraceStep::predicate_passed("P1", "pred.a"));
        let b = EvaluationResult::seal(Decision::Permit, vec![], vec![], other).unwrap();
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_verify_digest_detects_tampering() {
        let mut result =
            EvaluationResult::seal(Decision::Permit, vec![], vec![], sample_trace()).unwrap();
        assert!(result.verify_digest().unwrap());
        result.decision = Decision::Deny;
        assert!(!result.verify_digest().unwrap());
    }

    #[test]
    fn test_digest_excludes_digest_field() {
        // Sealing, then re-verifying a deserialized copy, must agree: the
        // digest is computed over the result minus the digest field.
        let result = EvaluationResult::seal(
            Decision::Deny,
            vec!["SANCTIONS_HIT".to_string()],
            vec![],
            sample_trace(),
        )
        .unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert!(back.verify_digest().unwrap());
    }
}
