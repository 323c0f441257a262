//! # Pure Operator-Tree Evaluation
//!
//! Evaluates a predicate's `logic` expression against the runtime
//! context. Strictly pure: no I/O, no suspension, no ambient state.
//! `AND`/`OR` short-circuit left to right.
//!
//! Domain-specific leaf operators (anything outside the built-in set)
//! have no pure semantics here; they evaluate to
//! [`LogicOutcome::Indeterminate`] and defer to the predicate's resolver.

use std::cmp::Ordering;

use serde_json::Value;

use rtgf_policy::{EvaluationContext, LogicNode, OpKind};

/// Result of pure logic evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOutcome {
    /// The tree evaluated to a boolean.
    Definitive(bool),
    /// The tree gave no definitive answer — a domain leaf operator, a
    /// malformed node, or an uncomparable operand. The stage outcome
    /// falls to the resolver, or fails closed when none is declared.
    Indeterminate,
}

use LogicOutcome::{Definitive, Indeterminate};

/// Evaluate an operator tree to a [`LogicOutcome`].
pub fn eval_logic(node: &LogicNode, ctx: &EvaluationContext) -> LogicOutcome {
    match node.kind() {
        OpKind::Pass => Definitive(true),
        OpKind::Fail => Definitive(false),
        OpKind::And => {
            for operand in &node.operands {
                match eval_logic(operand, ctx) {
                    Definitive(true) => continue,
                    // Short-circuit on first false; indeterminacy poisons
                    // the conjunction.
                    other => return other,
                }
            }
            Definitive(true)
        }
        OpKind::Or => {
            for operand in &node.operands {
                match eval_logic(operand, ctx) {
                    Definitive(false) => continue,
                    other => return other,
                }
            }
            Definitive(false)
        }
        OpKind::Not => match node.operands.first() {
            Some(operand) => match eval_logic(operand, ctx) {
                Definitive(b) => Definitive(!b),
                Indeterminate => Indeterminate,
            },
            None => Indeterminate,
        },
        OpKind::Eq => equality(node, ctx, true),
        OpKind::Ne => equality(node, ctx, false),
        OpKind::Gt => ordering(node, ctx, |o| o == Ordering::Greater),
        OpKind::Gte => ordering(node, ctx, |o| o != Ordering::Less),
        OpKind::Lt => ordering(node, ctx, |o| o == Ordering::Less),
        OpKind::Lte => ordering(node, ctx, |o| o != Ordering::Greater),
        OpKind::Exists => match &node.var {
            Some(var) => Definitive(matches!(ctx.lookup(var), Some(v) if !v.is_null())),
            None => Indeterminate,
        },
        OpKind::Domain => Indeterminate,
    }
}

/// Equality comparison against the literal operand. A missing context
/// value never equals a literal.
fn equality(node: &LogicNode, ctx: &EvaluationContext, want_equal: bool) -> LogicOutcome {
    let (Some(var), Some(literal)) = (&node.var, &node.value) else {
        return Indeterminate;
    };
    let equal = ctx.lookup(var) == Some(literal);
    Definitive(equal == want_equal)
}

/// Ordering comparison against the literal operand.
///
/// Numbers compare numerically, strings lexicographically. A missing
/// context value fails the comparison; mixed or unordered kinds are
/// indeterminate.
fn ordering(
    node: &LogicNode,
    ctx: &EvaluationContext,
    accept: impl Fn(Ordering) -> bool,
) -> LogicOutcome {
    let (Some(var), Some(literal)) = (&node.var, &node.value) else {
        return Indeterminate;
    };
    let Some(actual) = ctx.lookup(var) else {
        return Definitive(false);
    };
    match compare_values(actual, literal) {
        Some(ord) => Definitive(accept(ord)),
        None => Indeterminate,
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        _ => None,
    }
}
