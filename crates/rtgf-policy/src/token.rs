//! # Evaluation Tokens
//!
//! The bundled, self-describing evaluation request: a token id, the
//! compiled predicate set and eval plan, and the decision-to-controls
//! mappings. Immutable per evaluation.
//!
//! ## Boundary Normalization
//!
//! Legacy token payloads identify themselves through duck-typed fields
//! (`imt_id` for inter-market tokens, `rmt_id` for regulated-market
//! tokens). Those aliases are resolved once, at deserialization, into the
//! single `token_id` field — never re-derived at access sites.

use serde::{Deserialize, Serialize};

use crate::plan::EvalPlan;
use crate::predicate::PredicateSet;

/// A signed/identified evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationToken {
    /// Token identity. Accepts legacy `imt_id`/`rmt_id` on input; always
    /// serializes as `token_id`.
    #[serde(alias = "imt_id", alias = "rmt_id")]
    pub token_id: String,
    /// The compiled predicate set this token is evaluated against.
    pub predicate_set: PredicateSet,
    /// The compiled evaluation plan.
    pub eval_plan: EvalPlan,
    /// Controls attached to a `PERMIT` outcome.
    #[serde(default)]
    pub controls_on_permit: Vec<String>,
    /// Controls attached to a `PERMIT_WITH_CONTROLS` outcome.
    #[serde(default)]
    pub controls_on_permit_with_controls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_token_json(id_field: &str) -> String {
        format!(
            r#"{{
                "{id_field}": "IMT-EU.SG-PAYMENTS_AML-2025-10-22",
                "predicate_set": {{
                    "predicate_set_id": "ps.EU.PSD3.v1",
                    "version": "1.0.0",
                    "order": [],
                    "predicates": []
                }},
                "eval_plan": {{
                    "eval_plan_id": "plan.EU.PSD3.v1",
                    "sequence": [{{"stage": "P0", "op": "VALIDATE_INPUTS"}}],
                    "hash": "sha256:test"
                }},
                "controls_on_permit": ["LOG:L2"],
                "controls_on_permit_with_controls": ["HUMAN_REVIEW"]
            }}"#
        )
    }

    #[test]
    fn test_token_id_direct() {
        let token: EvaluationToken =
            serde_json::from_str(&minimal_token_json("token_id")).unwrap();
        assert_eq!(token.token_id, "IMT-EU.SG-PAYMENTS_AML-2025-10-22");
    }

    #[test]
    fn test_legacy_imt_alias_normalized() {
        let token: EvaluationToken =
            serde_json::from_str(&minimal_token_json("imt_id")).unwrap();
        assert_eq!(token.token_id, "IMT-EU.SG-PAYMENTS_AML-2025-10-22");
        // Serialization always uses the normalized field.
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("token_id").is_some());
        assert!(json.get("imt_id").is_none());
    }

    #[test]
    fn test_legacy_rmt_alias_normalized() {
        let token: EvaluationToken =
            serde_json::from_str(&minimal_token_json("rmt_id")).unwrap();
        assert_eq!(token.token_id, "IMT-EU.SG-PAYMENTS_AML-2025-10-22");
    }

    #[test]
    fn test_missing_controls_default_empty() {
        let json = r#"{
            "token_id": "t",
            "predicate_set": {"predicate_set_id": "ps", "version": "1.0.0", "order": [], "predicates": []},
            "eval_plan": {"eval_plan_id": "plan", "sequence": [], "hash": "sha256:x"}
        }"#;
        let token: EvaluationToken = serde_json::from_str(json).unwrap();
        assert!(token.controls_on_permit.is_empty());
        assert!(token.controls_on_permit_with_controls.is_empty());
    }
}
