mod analyze;
mod cache;
mod cli;
mod config;
mod detect;
mod error;
mod github;
mod publish;
mod report;
mod signal;
mod types;

use crate::analyze::{AnalysisStart, Analyzer, AnalyzerOptions};
use crate::cache::{CacheStore, FileCache, MemoryCache};
use crate::error::{Result, SlopscanError};
use crate::github::GithubClient;
use crate::publish::{FanoutSink, LogSink};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const HIGH_SLOP: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

/// Final scores at or above this exit with `HIGH_SLOP`, for CI-style use.
const HIGH_SLOP_SCORE: u32 = 60;

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn split_repo(reference: &str) -> Result<(&str, &str)> {
    match reference.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(SlopscanError::InvalidRepo(reference.to_string())),
    }
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_command(cli))
}

async fn run_command(cli: cli::Cli) -> Result<i32> {
    match cli.command {
        cli::Commands::Analyze(cmd) => {
            let (owner, repo) = split_repo(&cmd.repo)?;
            let loaded = config::load_config(Path::new("."))?;

            let token = cmd
                .token
                .clone()
                .or_else(|| std::env::var("GITHUB_TOKEN").ok())
                .or_else(|| loaded.as_ref().and_then(|cfg| cfg.token()));
            let api_base = loaded
                .as_ref()
                .map(|cfg| cfg.api_base())
                .unwrap_or_else(|| "https://api.github.com".to_string());

            let options = AnalyzerOptions {
                cache_ttl_secs: loaded
                    .as_ref()
                    .map(|cfg| cfg.cache_ttl_secs())
                    .unwrap_or(3_600),
                max_sample_files: loaded
                    .as_ref()
                    .map(|cfg| cfg.max_sample_files())
                    .unwrap_or(28),
                skip_cache_read: cmd.no_cache,
            };

            // --no-cache runs hold results in memory only, so nothing stale
            // is read and nothing is persisted.
            let store: Arc<dyn CacheStore> = if cmd.no_cache {
                Arc::new(MemoryCache::default())
            } else {
                Arc::new(FileCache::new(config::resolve_cache_dir(loaded.as_ref())))
            };
            let analyzer = Analyzer::new(
                Arc::new(GithubClient::new(api_base, token)),
                store,
                Arc::new(FanoutSink::new(vec![Box::new(LogSink)])),
                options,
            );

            let format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };

            let final_analysis = match analyzer.analyze(owner, repo).await? {
                AnalysisStart::Cached(record) => record,
                AnalysisStart::Started {
                    provisional,
                    final_task,
                } => {
                    tracing::info!(
                        score = provisional.slop_score,
                        "provisional score from commit signals"
                    );
                    if cmd.show_provisional {
                        println!("{}", report::render(&provisional, format)?);
                    }
                    final_task
                        .await
                        .map_err(|error| SlopscanError::Task(error.to_string()))?
                }
            };

            println!("{}", report::render(&final_analysis, format)?);

            if final_analysis.slop_score >= HIGH_SLOP_SCORE {
                Ok(exit_code::HIGH_SLOP)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::CacheClear(_) => {
            let loaded = config::load_config(Path::new("."))?;
            let cache = FileCache::new(config::resolve_cache_dir(loaded.as_ref()));
            cache.clear()?;
            println!("cache cleared");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_repo_accepts_owner_slash_repo() {
        let (owner, repo) = split_repo("octo/slop").expect("reference should parse");
        assert_eq!(owner, "octo");
        assert_eq!(repo, "slop");
    }

    #[test]
    fn split_repo_rejects_malformed_references() {
        assert!(split_repo("octo").is_err());
        assert!(split_repo("/slop").is_err());
        assert!(split_repo("octo/").is_err());
        assert!(split_repo("octo/slop/extra").is_err());
    }
}
