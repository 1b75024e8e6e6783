use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "slopscan",
    version,
    about = "Estimate how likely a GitHub repository is AI-generated code"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Analyze(AnalyzeCommand),
    CacheClear(CacheClearCommand),
}

#[derive(Args)]
pub struct AnalyzeCommand {
    /// Repository to analyze, as owner/repo
    pub repo: String,

    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,

    /// GitHub API token; falls back to $GITHUB_TOKEN, then config
    #[arg(long)]
    pub token: Option<String>,

    /// Ignore any cached analysis and recompute
    #[arg(long)]
    pub no_cache: bool,

    /// Also print the provisional commit-only result when it is ready
    #[arg(long)]
    pub show_provisional: bool,
}

#[derive(Args)]
pub struct CacheClearCommand {}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
