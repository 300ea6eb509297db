//! Litsearch CLI
//!
//! Boolean query generation, query titles and extraction confidence scoring.

use anyhow::Result;
use clap::Parser;
use litsearch_core::error::exit_codes;
use litsearch_core::{LitSearchError, ProviderResolver};
use std::sync::Arc;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};
use output::CommandFailed;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results and MCP traffic
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let resolver = Arc::new(ProviderResolver::from_env()?);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, &resolver, cli.format).await,
        Commands::Query(args) => commands::query::run(args, &resolver, cli.format).await,
        Commands::Summarize(args) => commands::summarize::run(args, &resolver, cli.format).await,
        Commands::Mcp => litsearch_mcp::start_server(resolver).await,
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(failed) = error.downcast_ref::<CommandFailed>() {
        return failed.exit_code();
    }
    if let Some(e) = error.downcast_ref::<LitSearchError>() {
        return e.exit_code();
    }
    exit_codes::GENERAL_ERROR
}
