use crate::types::report::{
    Confidence, FeatureContribution, ScoreBreakdown, Severity, SlopIndicator,
};
use crate::types::scoring::{FeatureInputs, Signal};

/// Fixed feature weights, summing to 1.0.
const WEIGHT_CONFIG: f32 = 0.16;
const WEIGHT_COMMIT_LANGUAGE: f32 = 0.29;
const WEIGHT_COMMIT_BURST: f32 = 0.12;
const WEIGHT_COMMENT: f32 = 0.18;
const WEIGHT_REPETITION: f32 = 0.15;
const WEIGHT_STRUCTURE: f32 = 0.10;

/// Every tuned constant the escalation pass uses, in one place. The rules
/// consume these in the fixed order documented on `apply_adjustments`;
/// the values are empirically tuned and preserved as-is.
pub struct ScoreThresholds {
    /// A signal at or above this counts as "fired" for evidence accounting.
    pub evidence_signal_floor: f32,

    /// Rule 1: weak-score boost.
    pub boost_below_raw: f32,
    pub boost_signal_floor: f32,
    pub boost_min_signals: usize,
    pub boost_amount: f32,

    /// Rule 2: comment + burst floor.
    pub comment_burst_below_raw: f32,
    pub comment_burst_comment: f32,
    pub comment_burst_burst: f32,
    pub comment_burst_floor: f32,

    /// Rule 3: language + burst floor.
    pub language_burst_below_raw: f32,
    pub language_burst_language: f32,
    pub language_burst_burst: f32,
    pub language_burst_floor: f32,

    /// Rule 4: burst with corroborating indicators.
    pub burst_corroborated_burst: f32,
    pub burst_corroborated_comment: f32,
    pub burst_corroborated_notable: usize,
    pub burst_corroborated_floor: f32,

    /// Rule 5: language with a broad indicator spread.
    pub language_spread_language: f32,
    pub language_spread_notable: usize,
    pub language_spread_total: usize,
    pub language_spread_floor: f32,

    /// Rule 6: language + burst with notable indicators.
    pub language_burst_notable_language: f32,
    pub language_burst_notable_burst: f32,
    pub language_burst_notable_count: usize,
    pub language_burst_notable_floor: f32,

    /// Rules 7/8: indicator-count floors gated on evidence strength.
    pub evidence_four_notable: usize,
    pub evidence_four_strength: f32,
    pub evidence_four_floor: f32,
    pub evidence_five_notable: usize,
    pub evidence_five_strength: f32,
    pub evidence_five_floor: f32,

    /// Rule 9 (always last): weak-evidence cap, overrides any floor above.
    pub dampener_strength: f32,
    pub dampener_cap: f32,
}

pub const THRESHOLDS: ScoreThresholds = ScoreThresholds {
    evidence_signal_floor: 0.2,

    boost_below_raw: 25.0,
    boost_signal_floor: 0.25,
    boost_min_signals: 2,
    boost_amount: 12.0,

    comment_burst_below_raw: 35.0,
    comment_burst_comment: 0.2,
    comment_burst_burst: 0.35,
    comment_burst_floor: 30.0,

    language_burst_below_raw: 45.0,
    language_burst_language: 0.5,
    language_burst_burst: 0.35,
    language_burst_floor: 42.0,

    burst_corroborated_burst: 0.45,
    burst_corroborated_comment: 0.14,
    burst_corroborated_notable: 3,
    burst_corroborated_floor: 62.0,

    language_spread_language: 0.35,
    language_spread_notable: 2,
    language_spread_total: 4,
    language_spread_floor: 56.0,

    language_burst_notable_language: 0.5,
    language_burst_notable_burst: 0.35,
    language_burst_notable_count: 3,
    language_burst_notable_floor: 62.0,

    evidence_four_notable: 4,
    evidence_four_strength: 0.45,
    evidence_four_floor: 68.0,
    evidence_five_notable: 5,
    evidence_five_strength: 0.5,
    evidence_five_floor: 75.0,

    dampener_strength: 0.2,
    dampener_cap: 40.0,
};

#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub score: u32,
    pub confidence: Confidence,
    pub evidence_strength: f32,
    pub raw_score: f32,
    pub contributions: Vec<FeatureContribution>,
    pub breakdown: ScoreBreakdown,
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn contribution(feature: &str, raw: Signal, weight: f32, notes: &str) -> FeatureContribution {
    let normalized = raw.clamp(0.0, 1.0);
    FeatureContribution {
        feature: feature.to_string(),
        raw,
        normalized,
        weight,
        contribution: round2(normalized * weight * 100.0),
        notes: notes.to_string(),
    }
}

/// How confidently the evidence points anywhere at all, independent of the
/// weighted score: how many signals fired, how strong the strongest few are.
pub fn evidence_strength(signals: &[Signal]) -> f32 {
    let fired = signals
        .iter()
        .filter(|signal| **signal >= THRESHOLDS.evidence_signal_floor)
        .count();
    let count_strength = (fired as f32 / 6.0).clamp(0.0, 1.0);

    let mut sorted: Vec<f32> = signals.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let top3: Vec<f32> = sorted.iter().take(3).copied().collect();
    let avg_top3 = if top3.is_empty() {
        0.0
    } else {
        top3.iter().sum::<f32>() / 3.0
    };
    let max_signal = sorted.first().copied().unwrap_or(0.0);

    count_strength
        .max(avg_top3 * 1.1)
        .max(max_signal * 0.45)
        .clamp(0.0, 1.0)
}

/// Escalation and dampening, in fixed order. Rules 1-8 only ever raise the
/// score; rule 9 (the weak-evidence cap) is checked last and overrides any
/// floor the earlier rules set.
fn apply_adjustments(
    raw_score: f32,
    features: &FeatureInputs,
    evidence: f32,
    notable_indicators: usize,
    total_indicators: usize,
) -> f32 {
    let t = &THRESHOLDS;
    let signals = features.as_list();
    let mut score = raw_score;

    // 1. Several weak-but-present signals on a low raw score.
    let present = signals
        .iter()
        .filter(|signal| **signal >= t.boost_signal_floor)
        .count();
    if raw_score < t.boost_below_raw && present >= t.boost_min_signals {
        score += t.boost_amount;
    }

    // 2. Comment narration plus bursty cadence.
    if raw_score < t.comment_burst_below_raw
        && features.comment >= t.comment_burst_comment
        && features.commit_burst >= t.comment_burst_burst
    {
        score = score.max(t.comment_burst_floor);
    }

    // 3. AI-styled messages plus bursty cadence.
    if features.commit_language >= t.language_burst_language
        && features.commit_burst >= t.language_burst_burst
        && raw_score < t.language_burst_below_raw
    {
        score = score.max(t.language_burst_floor);
    }

    // 4. Strong burst corroborated by comments and notable indicators.
    if features.commit_burst >= t.burst_corroborated_burst
        && features.comment >= t.burst_corroborated_comment
        && notable_indicators >= t.burst_corroborated_notable
    {
        score = score.max(t.burst_corroborated_floor);
    }

    // 5. AI-styled messages with a broad indicator spread.
    if features.commit_language >= t.language_spread_language
        && notable_indicators >= t.language_spread_notable
        && total_indicators >= t.language_spread_total
    {
        score = score.max(t.language_spread_floor);
    }

    // 6. AI-styled messages, bursty cadence, notable indicators.
    if features.commit_language >= t.language_burst_notable_language
        && features.commit_burst >= t.language_burst_notable_burst
        && notable_indicators >= t.language_burst_notable_count
    {
        score = score.max(t.language_burst_notable_floor);
    }

    // 7./8. Many notable indicators with real evidence strength.
    if notable_indicators >= t.evidence_four_notable && evidence >= t.evidence_four_strength {
        score = score.max(t.evidence_four_floor);
    }
    if notable_indicators >= t.evidence_five_notable && evidence >= t.evidence_five_strength {
        score = score.max(t.evidence_five_floor);
    }

    // 9. Weak-evidence cap, always checked last.
    if evidence < t.dampener_strength {
        score = score.min(t.dampener_cap);
    }

    score
}

/// Pure, idempotent combination of the six feature signals and the
/// indicator set into the final scored outcome.
pub fn combine(features: &FeatureInputs, indicators: &[SlopIndicator]) -> ScoreOutcome {
    let contributions = vec![
        contribution(
            "config",
            features.config,
            WEIGHT_CONFIG,
            "AI assistant config files and tool path fragments",
        ),
        contribution(
            "commit_language",
            features.commit_language,
            WEIGHT_COMMIT_LANGUAGE,
            "assistant-typical commit message narration",
        ),
        contribution(
            "commit_burst",
            features.commit_burst,
            WEIGHT_COMMIT_BURST,
            "commit cadence and bulk-change pattern",
        ),
        contribution(
            "comment",
            features.comment,
            WEIGHT_COMMENT,
            "explains-the-obvious comment density",
        ),
        contribution(
            "repetition",
            features.repetition,
            WEIGHT_REPETITION,
            "cross-file token-set similarity",
        ),
        contribution(
            "structure",
            features.structure,
            WEIGHT_STRUCTURE,
            "repeated directory scaffolds and file names",
        ),
    ];
    let raw_score: f32 = contributions.iter().map(|row| row.contribution).sum();

    let evidence = evidence_strength(&features.as_list());
    let notable = indicators
        .iter()
        .filter(|indicator| indicator.severity >= Severity::Medium)
        .count();
    let adjusted = apply_adjustments(raw_score, features, evidence, notable, indicators.len());
    let score = adjusted.clamp(0.0, 100.0).round() as u32;

    let confidence = if evidence < 0.22 || score < 12 {
        Confidence::Low
    } else if evidence < 0.7 || score < 45 {
        Confidence::Medium
    } else {
        Confidence::High
    };

    let breakdown = ScoreBreakdown {
        configs: contributions[0].contribution,
        commits: contributions[1].contribution + contributions[2].contribution,
        patterns: contributions[3].contribution,
        repetition: contributions[4].contribution,
        structure: contributions[5].contribution,
    };

    ScoreOutcome {
        score,
        confidence,
        evidence_strength: evidence,
        raw_score,
        contributions,
        breakdown,
    }
}
