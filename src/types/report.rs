use crate::types::scoring::FeatureInputs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A discrete, human-readable piece of evidence. Many indicators can share
/// a kind; deduplication is by `(kind, description)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlopIndicator {
    pub kind: String,
    pub description: String,
    pub severity: Severity,
}

impl SlopIndicator {
    pub fn new(kind: &str, description: String, severity: Severity) -> Self {
        Self {
            kind: kind.to_string(),
            description,
            severity,
        }
    }
}

/// One row of the weighted score: `contribution = normalized * weight * 100`,
/// rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub raw: f32,
    pub normalized: f32,
    pub weight: f32,
    pub contribution: f32,
    pub notes: String,
}

/// Contributions grouped into five named buckets. Does not necessarily sum
/// to the overall score once escalation adjustments have fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub configs: f32,
    pub commits: f32,
    pub patterns: f32,
    pub structure: f32,
    pub repetition: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Provisional,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub commit_pass_ms: u64,
    pub deep_pass_ms: u64,
    pub request_count: u32,
    pub sampled_file_count: usize,
    pub raw_signals: FeatureInputs,
    pub evidence_strength: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheMeta {
    pub key: String,
    pub is_cached: bool,
}

/// The full analysis record: the only externally visible protocol shape.
/// Consumers branch on `stage`, compare `repo_id`, and read `slop_score`,
/// `confidence`, `indicators`, `breakdown`, and `diagnostics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub repo_id: String,
    pub slop_score: u32,
    pub confidence: Confidence,
    pub stage: Stage,
    pub indicators: Vec<SlopIndicator>,
    pub breakdown: ScoreBreakdown,
    pub contributions: Vec<FeatureContribution>,
    pub diagnostics: Diagnostics,
    pub cache: CacheMeta,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn analysis_round_trips_through_json() {
        let analysis = RepoAnalysis {
            repo_id: "octo/slop".to_string(),
            slop_score: 62,
            confidence: Confidence::Medium,
            stage: Stage::Final,
            indicators: vec![SlopIndicator::new(
                "AI Config Files",
                ".cursorrules present".to_string(),
                Severity::Medium,
            )],
            breakdown: ScoreBreakdown::default(),
            contributions: vec![],
            diagnostics: Diagnostics::default(),
            cache: CacheMeta {
                key: "octo/slop:main:abc".to_string(),
                is_cached: false,
            },
            analyzed_at: Utc::now(),
        };

        let json = serde_json::to_string(&analysis).expect("analysis should serialize");
        let back: RepoAnalysis = serde_json::from_str(&json).expect("analysis should deserialize");
        assert_eq!(back.repo_id, "octo/slop");
        assert_eq!(back.stage, Stage::Final);
        assert_eq!(back.slop_score, 62);
    }
}
