pub mod sample;
pub mod score;

use crate::cache::CacheStore;
use crate::detect::comments::detect_comment_patterns;
use crate::detect::commits::{analyze_commits, CommitSignals};
use crate::detect::config_files::detect_config_files;
use crate::detect::paths::sweep_paths;
use crate::detect::repetition::detect_repetition;
use crate::detect::structure::detect_structure;
use crate::error::{Result, SlopscanError};
use crate::github::{RepoDataSource, RepoInfo};
use crate::publish::FanoutSink;
use crate::signal::{average, bounded_scale};
use crate::types::report::{
    CacheMeta, Diagnostics, RepoAnalysis, Severity, SlopIndicator, Stage,
};
use crate::types::scoring::FeatureInputs;
use crate::types::tree::{FileNode, SampledFile};
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Simultaneous outbound file-content fetches during the deep pass.
const FETCH_WORKERS: usize = 4;

/// Legacy-repository dampener: repositories created before this date with
/// at least this many stars get their commit-derived signals attenuated
/// when nothing else corroborates them.
const LEGACY_STAR_FLOOR: u32 = 150;
const LEGACY_LANGUAGE_FACTOR: f32 = 0.62;
const LEGACY_BURST_FACTOR: f32 = 0.65;
const LEGACY_CONFIG_CAP: f32 = 0.18;
const CORROBORATION_COMMENT_LINES: usize = 6;
const CORROBORATION_KEYWORD_HITS: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub cache_ttl_secs: u64,
    pub max_sample_files: usize,
    pub skip_cache_read: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3_600,
            max_sample_files: 28,
            skip_cache_read: false,
        }
    }
}

/// What the caller gets back from starting an analysis: either a fresh
/// cached final record, or the provisional record plus a handle on the
/// already-running deep pass.
pub enum AnalysisStart {
    Cached(RepoAnalysis),
    Started {
        provisional: RepoAnalysis,
        final_task: JoinHandle<RepoAnalysis>,
    },
}

pub struct Analyzer {
    source: Arc<dyn RepoDataSource>,
    cache: Arc<dyn CacheStore>,
    sinks: Arc<FanoutSink>,
    options: AnalyzerOptions,
}

/// Everything the spawned deep pass needs, owned, so its error boundary is
/// fully isolated from the already-returned provisional result.
struct DeepContext {
    source: Arc<dyn RepoDataSource>,
    cache: Arc<dyn CacheStore>,
    sinks: Arc<FanoutSink>,
    options: AnalyzerOptions,
    owner: String,
    repo: String,
    info: RepoInfo,
    commit_signals: CommitSignals,
    provisional: RepoAnalysis,
    requests: Arc<AtomicU32>,
}

impl Analyzer {
    pub fn new(
        source: Arc<dyn RepoDataSource>,
        cache: Arc<dyn CacheStore>,
        sinks: Arc<FanoutSink>,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            source,
            cache,
            sinks,
            options,
        }
    }

    /// Phase 1: commit-only pass, returned synchronously. Phase 2 (the deep
    /// pass) is dispatched as an independent task whose outcome is observed
    /// through the publication sinks and the returned handle.
    pub async fn analyze(&self, owner: &str, repo: &str) -> Result<AnalysisStart> {
        let repo_id = format!("{owner}/{repo}");
        let commit_pass_started = Instant::now();
        // Request accounting is scoped to this run; concurrent analyses of
        // different repositories never share it.
        let requests = Arc::new(AtomicU32::new(0));

        let info = self.source.get_repo_info(owner, repo).await?;
        requests.fetch_add(1, Ordering::Relaxed);
        let commits = self.source.get_commit_history(owner, repo).await?;
        requests.fetch_add(1, Ordering::Relaxed);

        let head = commits
            .first()
            .map(|commit| commit.sha.as_str())
            .unwrap_or("no-commits");
        let cache_key = format!("{repo_id}:{}:{head}", info.default_branch);

        if !self.options.skip_cache_read {
            if let Some(mut record) = self.cache.get(&cache_key) {
                let age_ms = Utc::now()
                    .signed_duration_since(record.analyzed_at)
                    .num_milliseconds();
                if age_ms >= 0 && (age_ms as u64) < self.options.cache_ttl_secs * 1_000 {
                    tracing::debug!(key = %cache_key, age_ms, "serving cached analysis");
                    record.cache.is_cached = true;
                    return Ok(AnalysisStart::Cached(record));
                }
            }
        }

        let commit_signals = analyze_commits(&commits);
        let features = FeatureInputs {
            commit_language: commit_signals.ai_signal,
            commit_burst: blended_burst(&commit_signals),
            ..FeatureInputs::default()
        };
        let indicators = dedupe_indicators(commit_signals.indicators.clone());
        let outcome = score::combine(&features, &indicators);
        let provisional = RepoAnalysis {
            repo_id: repo_id.clone(),
            slop_score: outcome.score,
            confidence: outcome.confidence,
            stage: Stage::Provisional,
            indicators,
            breakdown: outcome.breakdown,
            contributions: outcome.contributions,
            diagnostics: Diagnostics {
                commit_pass_ms: commit_pass_started.elapsed().as_millis() as u64,
                deep_pass_ms: 0,
                request_count: requests.load(Ordering::Relaxed),
                sampled_file_count: 0,
                raw_signals: features,
                evidence_strength: outcome.evidence_strength,
            },
            cache: CacheMeta {
                key: cache_key,
                is_cached: false,
            },
            analyzed_at: Utc::now(),
        };
        self.sinks.publish(&provisional);

        let context = DeepContext {
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
            sinks: Arc::clone(&self.sinks),
            options: self.options.clone(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            info,
            commit_signals,
            provisional: provisional.clone(),
            requests,
        };
        let final_task = tokio::spawn(run_deep_pass(context));

        Ok(AnalysisStart::Started {
            provisional,
            final_task,
        })
    }
}

fn blended_burst(signals: &CommitSignals) -> f32 {
    signals.burst_signal.max(signals.bulk_signal * 0.8)
}

/// Phase 2 with its own error boundary: a failure here must never disturb
/// the provisional result, and the run must still end in exactly one
/// final-stage record.
async fn run_deep_pass(context: DeepContext) -> RepoAnalysis {
    match deep_pass(&context).await {
        Ok(analysis) => analysis,
        Err(error) => {
            tracing::warn!(repo = %context.provisional.repo_id, %error, "deep pass failed; degrading");
            let mut degraded = context.provisional.clone();
            degraded.stage = Stage::Final;
            degraded.confidence = crate::types::report::Confidence::Low;
            degraded.indicators.push(SlopIndicator::new(
                "Deep Analysis Incomplete",
                format!("deep analysis did not finish: {error}"),
                Severity::Low,
            ));
            degraded.analyzed_at = Utc::now();
            context.sinks.publish(&degraded);
            degraded
        }
    }
}

async fn deep_pass(context: &DeepContext) -> Result<RepoAnalysis> {
    let deep_started = Instant::now();
    let branch = context.info.default_branch.clone();

    let tree = context
        .source
        .get_file_tree(&context.owner, &context.repo, &branch)
        .await?;
    context.requests.fetch_add(1, Ordering::Relaxed);

    let config = detect_config_files(&tree);
    let structure = detect_structure(&tree);
    let sweep = sweep_paths(&tree);
    tracing::debug!(
        config_files = config.files.len(),
        config_severity = ?config.severity,
        repeated_shapes = structure.repeated_shapes,
        name_repetition = structure.name_repetition_ratio,
        keyword_hits = sweep.keyword_hits,
        workflow_hits = sweep.workflow_hits,
        "tree detectors complete"
    );

    let targets = sample::select_samples(&tree, context.options.max_sample_files);
    let samples = fetch_samples(context, &branch, targets).await?;

    let mut per_file_signals = Vec::new();
    let mut comment_indicators = Vec::new();
    let mut matched_comment_lines = 0usize;
    let mut verbose_blocks = 0usize;
    for sampled in &samples {
        let detection = detect_comment_patterns(&sampled.path, &sampled.content);
        matched_comment_lines += detection.matched_lines;
        verbose_blocks += detection.verbose_blocks;
        if detection.comment_signal > 0.0 {
            per_file_signals.push(detection.comment_signal);
        }
        comment_indicators.extend(detection.indicators);
    }
    // A few heavily narrated files should not be diluted by clean ones.
    let comment_feature = average(&per_file_signals)
        .max(bounded_scale(matched_comment_lines as f32, 5.0, 35.0));

    let repetition = detect_repetition(&samples);
    tracing::debug!(
        sampled = samples.len(),
        matched_comment_lines,
        verbose_blocks,
        average_similarity = repetition.average_similarity,
        "sampled-content detectors complete"
    );

    let mut commit_language = context.commit_signals.ai_signal;
    let mut commit_burst = blended_burst(&context.commit_signals);
    let mut config_signal = config.signal.max(sweep.signal);
    if legacy_dampener_applies(
        &context.info,
        matched_comment_lines,
        sweep.keyword_hits,
        config.found,
    ) {
        tracing::debug!(repo = %context.provisional.repo_id, "legacy repository dampener engaged");
        commit_language *= LEGACY_LANGUAGE_FACTOR;
        commit_burst *= LEGACY_BURST_FACTOR;
        config_signal = config_signal.min(LEGACY_CONFIG_CAP);
    }

    let features = FeatureInputs {
        config: config_signal,
        commit_language,
        commit_burst,
        comment: comment_feature,
        repetition: repetition.repetition_signal,
        structure: structure.uniformity_signal,
    };

    let mut indicators = context.commit_signals.indicators.clone();
    indicators.extend(config.indicators);
    indicators.extend(sweep.indicators);
    indicators.extend(structure.indicators);
    indicators.extend(comment_indicators);
    indicators.extend(repetition.indicators);
    let indicators = dedupe_indicators(indicators);

    let outcome = score::combine(&features, &indicators);
    tracing::debug!(
        raw = outcome.raw_score,
        adjusted = outcome.score,
        evidence = outcome.evidence_strength,
        "combinator complete"
    );
    let analysis = RepoAnalysis {
        repo_id: context.provisional.repo_id.clone(),
        slop_score: outcome.score,
        confidence: outcome.confidence,
        stage: Stage::Final,
        indicators,
        breakdown: outcome.breakdown,
        contributions: outcome.contributions,
        diagnostics: Diagnostics {
            commit_pass_ms: context.provisional.diagnostics.commit_pass_ms,
            deep_pass_ms: deep_started.elapsed().as_millis() as u64,
            request_count: context.requests.load(Ordering::Relaxed),
            sampled_file_count: samples.len(),
            raw_signals: features,
            evidence_strength: outcome.evidence_strength,
        },
        cache: CacheMeta {
            key: context.provisional.cache.key.clone(),
            is_cached: false,
        },
        analyzed_at: Utc::now(),
    };

    // Persistence is best-effort; an unavailable cache is not an analysis
    // failure.
    if let Err(error) = context.cache.set(&analysis.cache.key, &analysis) {
        tracing::warn!(key = %analysis.cache.key, %error, "failed to persist analysis");
    }
    context.sinks.publish(&analysis);

    Ok(analysis)
}

/// Bounded fan-out: 4 workers pull from a shared monotonically advancing
/// index over the target list. A single failed fetch skips that file only.
async fn fetch_samples(
    context: &DeepContext,
    branch: &str,
    targets: Vec<FileNode>,
) -> Result<Vec<SampledFile>> {
    let targets = Arc::new(targets);
    let next = Arc::new(AtomicUsize::new(0));
    let mut workers = Vec::new();

    for _ in 0..FETCH_WORKERS {
        let targets = Arc::clone(&targets);
        let next = Arc::clone(&next);
        let source = Arc::clone(&context.source);
        let requests = Arc::clone(&context.requests);
        let owner = context.owner.clone();
        let repo = context.repo.clone();
        let branch = branch.to_string();

        workers.push(tokio::spawn(async move {
            let mut fetched = Vec::new();
            loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= targets.len() {
                    break;
                }
                let node = &targets[index];
                requests.fetch_add(1, Ordering::Relaxed);
                match source
                    .get_file_content(&owner, &repo, &node.path, &branch)
                    .await
                {
                    Ok(content) => fetched.push(SampledFile {
                        path: node.path.clone(),
                        content,
                    }),
                    Err(error) => {
                        tracing::warn!(path = %node.path, %error, "sample fetch failed; skipping file");
                    }
                }
            }
            fetched
        }));
    }

    let mut samples = Vec::new();
    for worker in workers {
        let fetched = worker
            .await
            .map_err(|error| SlopscanError::Task(error.to_string()))?;
        samples.extend(fetched);
    }
    Ok(samples)
}

fn legacy_dampener_applies(
    info: &RepoInfo,
    matched_comment_lines: usize,
    keyword_hits: usize,
    config_found: bool,
) -> bool {
    let cutoff = Utc
        .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let old = info
        .created_at
        .map(|created| created < cutoff)
        .unwrap_or(false);
    let popular = info.star_count.unwrap_or(0) >= LEGACY_STAR_FLOOR;
    let weakly_corroborated = matched_comment_lines < CORROBORATION_COMMENT_LINES
        && keyword_hits < CORROBORATION_KEYWORD_HITS
        && !config_found;
    old && popular && weakly_corroborated
}

fn dedupe_indicators(indicators: Vec<SlopIndicator>) -> Vec<SlopIndicator> {
    let mut seen = HashSet::new();
    indicators
        .into_iter()
        .filter(|indicator| seen.insert((indicator.kind.clone(), indicator.description.clone())))
        .collect()
}
