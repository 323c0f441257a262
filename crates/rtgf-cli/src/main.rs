//! # rtgf-ppe CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Predicate policy engine toolchain.
///
/// Compiles policy snapshots into predicate sets and eval plans, and
/// evaluates tokens against runtime contexts, producing digested,
/// traceable decisions.
#[derive(Parser, Debug)]
#[command(name = "rtgf-ppe", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compile a policy snapshot into a predicate set and eval plan.
    Compile(rtgf_cli::compile::CompileArgs),
    /// Evaluate a token against a runtime context.
    Evaluate(rtgf_cli::evaluate::EvaluateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile(args) => rtgf_cli::compile::run(&args),
        Commands::Evaluate(args) => rtgf_cli::evaluate::run(&args).await,
    }
}
