//! # Decision Types
//!
//! The terminal outcomes of an evaluation, and the restricted fallback
//! union a predicate may declare for its failure path.
//!
//! `FallbackDecision` is deliberately a two-variant type rather than a
//! `Decision` with a runtime check: a predicate can never declare
//! `PERMIT` as its failure outcome, and the type system enforces that.

use serde::{Deserialize, Serialize};

/// Terminal outcome of a predicate policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Every stage succeeded; access is permitted.
    #[serde(rename = "PERMIT")]
    Permit,
    /// A stage failed with a softening fallback; access is permitted
    /// subject to the token's declared controls.
    #[serde(rename = "PERMIT_WITH_CONTROLS")]
    PermitWithControls,
    /// A stage failed closed, or a fault was hardened into a denial.
    #[serde(rename = "DENY")]
    Deny,
}

impl Decision {
    /// The canonical wire string for this decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permit => "PERMIT",
            Self::PermitWithControls => "PERMIT_WITH_CONTROLS",
            Self::Deny => "DENY",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decision a predicate falls back to when it fails.
///
/// `PERMIT` is unrepresentable here: a failing predicate may at most
/// soften to `PERMIT_WITH_CONTROLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallbackDecision {
    /// Fail closed (the default when no `on_fail` is declared).
    #[serde(rename = "DENY")]
    Deny,
    /// Permit, attaching the token's `controls_on_permit_with_controls`.
    #[serde(rename = "PERMIT_WITH_CONTROLS")]
    PermitWithControls,
}

impl From<FallbackDecision> for Decision {
    fn from(f: FallbackDecision) -> Self {
        match f {
            FallbackDecision::Deny => Decision::Deny,
            FallbackDecision::PermitWithControls => Decision::PermitWithControls,
        }
    }
}
