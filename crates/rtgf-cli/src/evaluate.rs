//! # Evaluate Subcommand
//!
//! Reads an evaluation token and a runtime context, validates the token
//! against its schema, runs the evaluation engine, and prints the sealed
//! result as pretty-printed JSON.
//!
//! Offline runs have no live resolvers; `--resolver name=pass|fail`
//! registers a static outcome under that name so plans whose predicates
//! declare resolvers can still be exercised.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Args;

use rtgf_core::{Clock, FixedClock, SystemClock, Timestamp};
use rtgf_evaluator::{ResolverOutcome, ResolverRegistry, StaticResolver};
use rtgf_policy::{EvaluationContext, EvaluationToken};
use rtgf_schema::SchemaValidator;

/// Arguments for the evaluate subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Path to the evaluation token JSON.
    #[arg(long)]
    pub token: PathBuf,

    /// Path to the runtime context JSON.
    #[arg(long)]
    pub context: PathBuf,

    /// Evaluate at a fixed UTC instant (e.g. 2025-01-01T00:00:00Z)
    /// instead of the system clock. Replays are byte-identical.
    #[arg(long)]
    pub at: Option<String>,

    /// Register a static resolver outcome, e.g. `sanctions_api=pass`.
    /// Repeatable.
    #[arg(long = "resolver", value_name = "NAME=pass|fail")]
    pub resolvers: Vec<String>,

    /// Write the result here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Run the evaluate subcommand.
pub async fn run(args: &EvaluateArgs) -> anyhow::Result<()> {
    let token_raw = std::fs::read_to_string(&args.token)
        .with_context(|| format!("cannot read token {}", args.token.display()))?;
    let token_doc: serde_json::Value = serde_json::from_str(&token_raw)
        .with_context(|| format!("invalid token {}", args.token.display()))?;

    SchemaValidator::new()?
        .validate_token(&token_doc)
        .context("token failed schema validation")?;
    let token: EvaluationToken = serde_json::from_value(token_doc)?;

    let context_raw = std::fs::read_to_string(&args.context)
        .with_context(|| format!("cannot read context {}", args.context.display()))?;
    let context: EvaluationContext = serde_json::from_str(&context_raw)
        .with_context(|| format!("invalid context {}", args.context.display()))?;

    let registry = build_registry(&args.resolvers)?;

    let result = match &args.at {
        Some(at) => {
            let ts = Timestamp::parse(at)?;
            evaluate_with(&token, &context, &registry, &FixedClock(ts)).await?
        }
        None => evaluate_with(&token, &context, &registry, &SystemClock).await?,
    };

    let mut rendered = serde_json::to_string_pretty(&result)?;
    rendered.push('\n');
    match &args.out {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn evaluate_with(
    token: &EvaluationToken,
    context: &EvaluationContext,
    registry: &ResolverRegistry,
    clock: &dyn Clock,
) -> anyhow::Result<rtgf_policy::EvaluationResult> {
    Ok(rtgf_evaluator::evaluate(token, context, registry, clock).await?)
}

/// Parse repeated `name=pass|fail` specs into a registry of static
/// resolvers.
fn build_registry(specs: &[String]) -> anyhow::Result<ResolverRegistry> {
    let mut registry = ResolverRegistry::new();
    for spec in specs {
        let Some((name, outcome)) = spec.split_once('=') else {
            bail!("invalid resolver spec {spec:?}: expected NAME=pass|fail");
        };
        let outcome = match outcome {
            "pass" => ResolverOutcome::pass(),
            "fail" => ResolverOutcome::fail(),
            other => bail!("invalid resolver outcome {other:?}: expected pass or fail"),
        };
        registry.register(name, Arc::new(StaticResolver(outcome)));
    }
    Ok(registry)
}
