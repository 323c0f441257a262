//! # Compile Subcommand
//!
//! Reads a policy snapshot, compiles it into a predicate set and eval
//! plan, validates both against the published schemas, and writes them
//! as pretty-printed JSON. Nothing is written until both artifacts have
//! validated, and both outputs are staged in temp files and renamed
//! into place so a failed run leaves neither path behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tempfile::NamedTempFile;

use rtgf_policy::PolicySnapshot;
use rtgf_schema::SchemaValidator;

/// Arguments for the compile subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the policy snapshot JSON.
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Output path for the compiled predicate set.
    #[arg(long)]
    pub out: PathBuf,

    /// Output path for the compiled eval plan.
    #[arg(long)]
    pub plan_out: PathBuf,
}

/// Run the compile subcommand.
pub fn run(args: &CompileArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("cannot read snapshot {}", args.snapshot.display()))?;
    let snapshot: PolicySnapshot = serde_json::from_str(&content)
        .with_context(|| format!("invalid snapshot {}", args.snapshot.display()))?;

    let compiled = rtgf_compiler::compile(&snapshot)?;

    // Validate both artifacts before touching the filesystem.
    let validator = SchemaValidator::new()?;
    let set_doc = serde_json::to_value(&compiled.predicate_set)?;
    validator
        .validate_predicate_set(&set_doc)
        .context("compiled predicate set failed schema validation")?;
    let plan_doc = serde_json::to_value(&compiled.eval_plan)?;
    validator
        .validate_eval_plan(&plan_doc)
        .context("compiled eval plan failed schema validation")?;

    // Stage both artifacts before persisting either, so a failure
    // leaves neither output path behind.
    let set_staged = stage_pretty(&args.out, &set_doc)?;
    let plan_staged = stage_pretty(&args.plan_out, &plan_doc)?;
    persist(set_staged, &args.out)?;
    persist(plan_staged, &args.plan_out)?;

    tracing::info!(
        predicate_set = %compiled.predicate_set.predicate_set_id,
        eval_plan = %compiled.eval_plan.eval_plan_id,
        hash = %compiled.eval_plan.hash,
        "compiled policy snapshot"
    );
    println!("{}", compiled.eval_plan.hash);
    Ok(())
}

/// Write a JSON value pretty-printed with a trailing newline into a
/// temp file next to its final destination.
fn stage_pretty(path: &Path, value: &serde_json::Value) -> anyhow::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot stage output in {}", dir.display()))?;
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    staged
        .write_all(rendered.as_bytes())
        .with_context(|| format!("cannot write staged output for {}", path.display()))?;
    Ok(staged)
}

/// Move a staged artifact into place.
fn persist(staged: NamedTempFile, path: &Path) -> anyhow::Result<()> {
    staged
        .persist(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
