//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "litsearch")]
#[command(
    author,
    version,
    about = "LLM-assisted Boolean queries and extraction confidence for literature search"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score extracted fields against their source text
    Analyze(AnalyzeArgs),

    /// Generate or refine a Boolean search query
    Query(QueryArgs),

    /// Summarize a Boolean query into a short title
    Summarize(SummarizeArgs),

    /// Start MCP server
    Mcp,
}

/// Provider/model override shared by every command
#[derive(Args, Clone, Default)]
pub struct ModelArgs {
    /// Provider to use (openai, openrouter)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier for the provider
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Source text file (`-` reads stdin)
    #[arg(long)]
    pub source: PathBuf,

    /// JSON file with the array of extracted fields
    #[arg(long)]
    pub fields: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Research description, or feedback when refining
    pub description: Vec<String>,

    /// Query to refine
    #[arg(long)]
    pub existing_query: Option<String>,

    /// Refine the existing query instead of generating a new one
    #[arg(long)]
    pub refine: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args)]
pub struct SummarizeArgs {
    /// Boolean query to summarize
    pub query: Vec<String>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
