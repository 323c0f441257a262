//! # Policy Snapshots
//!
//! The jurisdiction-specific compliance policy as produced by the policy
//! sourcing toolchain: raw predicate definitions plus the required
//! evaluation ordering. A snapshot is the immutable input of the compiler;
//! it is produced externally and never mutated here.

use serde::{Deserialize, Serialize};

use crate::predicate::Predicate;

/// A jurisdiction-scoped policy snapshot, pre-compilation.
///
/// Snapshots normalized from upstream sources carry additional metadata
/// (`effective_date`, `normative_references`, `policy_snapshot_hash`, ...);
/// the compiler consumes only the fields below and tolerates the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySnapshot {
    /// Jurisdiction code (e.g. `EU`).
    pub jurisdiction: String,
    /// Regulatory domain (e.g. `PSD3`).
    pub domain: String,
    /// Evaluation ordering: the compiler copies this verbatim into
    /// `PredicateSet.order`.
    #[serde(default)]
    pub required_predicates: Vec<String>,
    /// Raw predicate definitions.
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerates_upstream_metadata() {
        let json = r#"{
            "@type": "policy:Snapshot",
            "jurisdiction": "EU",
            "domain": "PSD3",
            "effective_date": "2025-01-01T00:00:00Z",
            "normative_references": ["urn:lex:eu:psd3"],
            "required_predicates": [],
            "predicates": [],
            "policy_snapshot_hash": "sha256:deadbeef"
        }"#;
        let snapshot: PolicySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.jurisdiction, "EU");
        assert_eq!(snapshot.domain, "PSD3");
    }

    #[test]
    fn test_missing_lists_default_empty() {
        let snapshot: PolicySnapshot =
            serde_json::from_str(r#"{"jurisdiction": "EU", "domain": "PSD3"}"#).unwrap();
        assert!(snapshot.required_predicates.is_empty());
        assert!(snapshot.predicates.is_empty());
    }
}
