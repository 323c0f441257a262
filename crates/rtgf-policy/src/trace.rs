//! # Evaluation Traces
//!
//! The per-stage execution record of one evaluation. Append-only while
//! the engine runs, immutable once returned, and part of the digested
//! result — the trace is the audit trail that makes a decision
//! reproducible and explainable after the fact.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use rtgf_core::Timestamp;

/// Record of a single plan stage.
///
/// The wire form depends on the stage kind: predicate-bearing stages
/// carry their boolean under `result`, while the predicate-less `P0`
/// stage carries it under `ok`. Both forms are accepted on input.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    /// Stage label (`P0`, `P1`, ...).
    pub stage: String,
    /// The predicate evaluated at this stage, if any.
    pub predicate: Option<String>,
    /// Whether the stage succeeded.
    pub ok: bool,
    /// The reason recorded when the stage terminated the plan.
    pub reason: Option<String>,
    /// Underlying error message when a resolver invocation faulted.
    pub error: Option<String>,
}

impl Serialize for TraceStep {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = 2
            + usize::from(self.predicate.is_some())
            + usize::from(self.reason.is_some())
            + usize::from(self.error.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("stage", &self.stage)?;
        if let Some(predicate) = &self.predicate {
            map.serialize_entry("predicate", predicate)?;
            map.serialize_entry("result", &self.ok)?;
        } else {
            map.serialize_entry("ok", &self.ok)?;
        }
        if let Some(reason) = &self.reason {
            map.serialize_entry("reason", reason)?;
        }
        if let Some(error) = &self.error {
            map.serialize_entry("error", error)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TraceStep {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            stage: String,
            #[serde(default)]
            predicate: Option<String>,
            #[serde(default)]
            ok: Option<bool>,
            #[serde(default)]
            result: Option<bool>,
            #[serde(default)]
            reason: Option<String>,
            #[serde(default)]
            error: Option<String>,
        }

        let wire = Wire::deserialize(deserializer)?;
        let ok = wire
            .result
            .or(wire.ok)
            .ok_or_else(|| serde::de::Error::missing_field("result"))?;
        Ok(TraceStep {
            stage: wire.stage,
            predicate: wire.predicate,
            ok,
            reason: wire.reason,
            error: wire.error,
        })
    }
}

impl TraceStep {
    /// A passing stage with no predicate (the `P0` form).
    pub fn passed(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            predicate: None,
            ok: true,
            reason: None,
            error: None,
        }
    }

    /// A passing predicate stage.
    pub fn predicate_passed(stage: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            predicate: Some(predicate.into()),
            ok: true,
            reason: None,
            error: None,
        }
    }

    /// A failing predicate stage with its recorded reason.
    pub fn predicate_failed(
        stage: impl Into<String>,
        predicate: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            predicate: Some(predicate.into()),
            ok: false,
            reason: Some(reason.into()),
            error: None,
        }
    }
}

/// The full execution trace of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    /// Identity of the evaluated token.
    pub token_id: String,
    /// The plan hash the evaluation ran against.
    pub plan_hash: String,
    /// Evaluation timestamp, supplied by the injected clock.
    pub ts: Timestamp,
    /// Per-stage records, in execution order.
    pub steps: Vec<TraceStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p0_step_wire_form() {
        let step = TraceStep::passed("P0");
        assert_eq!(
            serde_json::to_string(&step).unwrap(),
            r#"{"stage":"P0","ok":true}"#
        );
    }

    #[test]
    fn test_failed_step_records_reason() {
        let step = TraceStep::predicate_failed("P1", "pred.x", "SANCTIONS_HIT");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["result"], false);
        assert_eq!(json["reason"], "SANCTIONS_HIT");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_predicate_step_wire_form_uses_result() {
        let step = TraceStep::predicate_passed("P1", "pred.a");
        assert_eq!(
            serde_json::to_string(&step).unwrap(),
            r#"{"stage":"P1","predicate":"pred.a","result":true}"#
        );
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("ok").is_none());
    }

    #[test]
    fn test_step_deserializes_either_key() {
        let from_result: TraceStep =
            serde_json::from_str(r#"{"stage":"P2","predicate":"pred.b","result":false}"#).unwrap();
        assert!(!from_result.ok);
        assert_eq!(from_result.predicate.as_deref(), Some("pred.b"));

        let from_ok: TraceStep = serde_json::from_str(r#"{"stage":"P0","ok":true}"#).unwrap();
        assert!(from_ok.ok);
        assert!(from_ok.predicate.is_none());

        let missing: Result<TraceStep, _> = serde_json::from_str(r#"{"stage":"P1"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_trace_roundtrip() {
        let trace = EvaluationTrace {
            token_id: "tok".to_string(),
            plan_hash: "sha256:abc".to_string(),
            ts: Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
            steps: vec![
                TraceStep::passed("P0"),
                TraceStep::predicate_passed("P1", "pred.a"),
            ],
        };
        let json = serde_json::to_string(&trace).unwrap();
        let back: EvaluationTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(trace, back);
    }
}
