use crate::github::CommitInfo;
use crate::signal::{average, bounded_scale, ratio, stddev};
use crate::types::report::{Severity, SlopIndicator};
use crate::types::scoring::Signal;
use regex::Regex;
use std::sync::OnceLock;

/// Gaps shorter than this count as "rapid" for cadence analysis.
const RAPID_GAP_SECS: f32 = 120.0;
/// Commits touching at least this many files with a message shorter than
/// `TERSE_MESSAGE_CHARS` count as bulk commits.
const BULK_FILE_COUNT: u32 = 12;
const TERSE_MESSAGE_CHARS: usize = 72;

#[derive(Debug, Clone, Default)]
pub struct CommitSignals {
    pub ai_signal: Signal,
    pub burst_signal: Signal,
    pub bulk_signal: Signal,
    pub indicators: Vec<SlopIndicator>,
}

fn ai_phrases() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)^this commit\b",
            r"(?i)^this change\b",
            r"(?i)\bcomprehensive\b",
            r"(?i)\benhanc(e|es|ed|ements?)\b",
            r"(?i)\bseamless(ly)?\b",
            r"(?i)\brobust(ness)?\b",
            r"(?i)\bstreamlined?\b",
            r"(?i)\bleverag(e|es|ing)\b",
            r"(?i)\bvarious (minor )?(fixes|improvements|updates)\b",
            r"(?i)ensure[sd]? (that|proper|correct|consistent)",
            r"(?i)improve[sd]? (the )?overall",
            r"(?i)\bfor (better|improved) (clarity|readability|maintainability)\b",
            r"(?i)\badditionally,",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("commit phrase pattern is valid"))
        .collect()
    })
}

fn attribution_markers() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)co-authored-by:.*\b(claude|chatgpt|gpt|copilot|cursor|gemini|codex|devin|aider)\b",
            r"(?i)generated (with|by) \[?(claude|chatgpt|ai|copilot|cursor|gemini|codex|aider)",
            r"🤖",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("attribution pattern is valid"))
        .collect()
    })
}

fn conventional_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(feat|fix|chore|docs|refactor|test|style|perf|ci|build|revert)(\([^)]*\))?!?:")
            .expect("conventional prefix pattern is valid")
    })
}

pub fn analyze_commits(commits: &[CommitInfo]) -> CommitSignals {
    if commits.is_empty() {
        return CommitSignals::default();
    }

    let mut signals = CommitSignals::default();
    language_signal(commits, &mut signals);
    burst_signal(commits, &mut signals);
    bulk_signal(commits, &mut signals);
    signals
}

fn language_signal(commits: &[CommitInfo], signals: &mut CommitSignals) {
    let total = commits.len();
    let phrase_hits = commits
        .iter()
        .filter(|commit| {
            ai_phrases()
                .iter()
                .any(|pattern| pattern.is_match(&commit.message))
        })
        .count();
    let attribution_hits = commits
        .iter()
        .filter(|commit| {
            attribution_markers()
                .iter()
                .any(|pattern| pattern.is_match(&commit.message))
        })
        .count();
    let conventional_ratio = ratio(
        commits
            .iter()
            .filter(|commit| conventional_prefix().is_match(&commit.message))
            .count() as f32,
        total as f32,
    );

    let phrase_ratio = ratio(phrase_hits as f32, total as f32);
    let mut signal = bounded_scale(phrase_ratio, 0.08, 0.55);
    // Uniform conventional prefixes across a non-trivial history reads as
    // tool-written narration rather than a human habit on its own.
    if total >= 8 && conventional_ratio >= 0.9 {
        signal = (signal + 0.15).min(1.0);
    }
    if attribution_hits > 0 {
        signal = signal.max(0.85);
        signals.indicators.push(SlopIndicator::new(
            "AI Attribution Trailer",
            format!(
                "{attribution_hits} commit message(s) carry an AI co-author or generation trailer"
            ),
            Severity::High,
        ));
    }
    if phrase_ratio >= 0.25 {
        let severity = if phrase_ratio >= 0.5 {
            Severity::High
        } else {
            Severity::Medium
        };
        signals.indicators.push(SlopIndicator::new(
            "AI-styled Commit Messages",
            format!(
                "{phrase_hits} of {total} commit messages use assistant-typical narration"
            ),
            severity,
        ));
    }

    signals.ai_signal = signal.clamp(0.0, 1.0);
}

fn burst_signal(commits: &[CommitInfo], signals: &mut CommitSignals) {
    let mut timestamps: Vec<i64> = commits
        .iter()
        .map(|commit| commit.author_date.timestamp())
        .collect();
    timestamps.sort_unstable();
    let gaps: Vec<f32> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f32)
        .collect();
    if gaps.is_empty() {
        return;
    }

    let rapid = gaps.iter().filter(|gap| **gap < RAPID_GAP_SECS).count();
    let rapid_ratio = ratio(rapid as f32, gaps.len() as f32);
    let mut signal = bounded_scale(rapid_ratio, 0.1, 0.6);

    // Unnaturally even cadence: low coefficient of variation over the gaps.
    if gaps.len() >= 5 {
        let mean = average(&gaps);
        if mean > 0.0 && stddev(&gaps) / mean < 0.35 {
            signal = (signal + 0.3).min(1.0);
        }
    }

    if signal >= 0.4 {
        let severity = if signal >= 0.7 {
            Severity::High
        } else {
            Severity::Medium
        };
        signals.indicators.push(SlopIndicator::new(
            "Commit Burst Cadence",
            format!(
                "{rapid} of {} inter-commit gaps are under {} seconds",
                gaps.len(),
                RAPID_GAP_SECS as u32
            ),
            severity,
        ));
    }

    signals.burst_signal = signal.clamp(0.0, 1.0);
}

fn bulk_signal(commits: &[CommitInfo], signals: &mut CommitSignals) {
    let with_counts: Vec<&CommitInfo> = commits
        .iter()
        .filter(|commit| commit.changed_files.is_some())
        .collect();
    if with_counts.is_empty() {
        return;
    }

    let bulky = with_counts
        .iter()
        .filter(|commit| {
            commit.changed_files.unwrap_or(0) >= BULK_FILE_COUNT
                && commit.message.trim().chars().count() < TERSE_MESSAGE_CHARS
        })
        .count();
    let signal = bounded_scale(
        ratio(bulky as f32, with_counts.len() as f32),
        0.08,
        0.45,
    );

    if signal >= 0.35 {
        let severity = if signal >= 0.6 {
            Severity::High
        } else {
            Severity::Medium
        };
        signals.indicators.push(SlopIndicator::new(
            "Bulk Commits with Terse Messages",
            format!(
                "{bulky} of {} commits touch {BULK_FILE_COUNT}+ files under a one-line message",
                with_counts.len()
            ),
            severity,
        ));
    }

    signals.bulk_signal = signal.clamp(0.0, 1.0);
}
