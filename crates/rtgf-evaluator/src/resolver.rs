//! # Resolver Capability
//!
//! External systems answer predicates through the [`Resolver`] trait: one
//! method, implemented per external system (sanctions screening, registry
//! lookups), injected at call time through a [`ResolverRegistry`].
//!
//! ## Contract
//!
//! A resolver must not fault for expected business outcomes — "the entity
//! is sanctioned" is `Ok(ResolverOutcome { ok: false, .. })`, not an
//! error. Returning `Err(ResolverFault)` is reserved for faults (network,
//! timeout); the engine maps those to a fail-closed `DENY` with reason
//! `RESOLVER_ERROR:{name}` and preserves the message in the trace.
//!
//! Resolver invocation is the engine's only suspension point. Cancellation
//! and timeouts are the resolver's own responsibility; a timed-out call
//! surfaces as a fault like any other.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use rtgf_policy::{EvaluationContext, EvaluationToken, PlanStep, Predicate};

/// The answer an external system gives for a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOutcome {
    /// Whether the predicate holds. Replaces the stage's pure-logic
    /// outcome.
    pub ok: bool,
    /// Optional reason override recorded when the stage fails.
    pub reason: Option<String>,
}

impl ResolverOutcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    /// A failing outcome with the predicate's own fallback reason.
    pub fn fail() -> Self {
        Self {
            ok: false,
            reason: None,
        }
    }

    /// A failing outcome carrying an override reason.
    pub fn fail_with_reason(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<bool> for ResolverOutcome {
    fn from(ok: bool) -> Self {
        Self { ok, reason: None }
    }
}

/// A resolver invocation fault — network failure, timeout, upstream 5xx.
///
/// Distinct from a failing [`ResolverOutcome`]: a fault means the external
/// dependency could not answer at all, and the engine hardens it into
/// `DENY` regardless of the predicate's declared fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResolverFault {
    /// Diagnostic message, preserved verbatim in the evaluation trace.
    pub message: String,
}

impl ResolverFault {
    /// Build a fault from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An external capability invoked to answer a predicate's outcome.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Answer the predicate for this stage.
    ///
    /// Receives the full predicate definition, the runtime context, the
    /// enclosing token, and the plan step being executed.
    async fn resolve(
        &self,
        predicate: &Predicate,
        context: &EvaluationContext,
        token: &EvaluationToken,
        step: &PlanStep,
    ) -> Result<ResolverOutcome, ResolverFault>;
}

/// Named resolver capabilities available to one evaluation.
///
/// Keyed by the name predicates declare in their `resolver` field.
/// `BTreeMap` keeps iteration deterministic for diagnostics.
#[derive(Default, Clone)]
pub struct ResolverRegistry {
    resolvers: BTreeMap<String, Arc<dyn Resolver>>,
}

impl ResolverRegistry {
    /// An empty registry — evaluations whose predicates declare no
    /// resolver need nothing else.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver under a name. Replaces any existing entry.
    pub fn register(&mut self, name: impl Into<String>, resolver: Arc<dyn Resolver>) {
        self.resolvers.insert(name.into(), resolver);
    }

    /// Look up a resolver by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Resolver>> {
        self.resolvers.get(name)
    }

    /// The registered names, in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("names", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A resolver that always returns a fixed outcome.
///
/// Useful for conformance fixtures and determinism harnesses.
#[derive(Debug, Clone)]
pub struct StaticResolver(pub ResolverOutcome);

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(
        &self,
        _predicate: &Predicate,
        _context: &EvaluationContext,
        _token: &EvaluationToken,
        _step: &PlanStep,
    ) -> Result<ResolverOutcome, ResolverFault> {
        Ok(self.0.clone())
    }
}

/// A resolver that always faults with a fixed message.
///
/// Models an unreachable external dependency.
#[derive(Debug, Clone)]
pub struct FaultingResolver(pub String);

#[async_trait]
impl Resolver for FaultingResolver {
    async fn resolve(
        &self,
        _predicate: &Predicate,
        _context: &EvaluationContext,
        _token: &EvaluationToken,
        _step: &PlanStep,
    ) -> Result<ResolverOutcome, ResolverFault> {
        Err(ResolverFault::new(self.0.clone()))
    }
}
