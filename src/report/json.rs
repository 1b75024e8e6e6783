use crate::types::report::RepoAnalysis;

pub fn to_json(analysis: &RepoAnalysis) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{
        CacheMeta, Confidence, Diagnostics, ScoreBreakdown, Stage,
    };
    use chrono::Utc;

    #[test]
    fn json_report_contains_score_and_stage() {
        let analysis = RepoAnalysis {
            repo_id: "octo/slop".to_string(),
            slop_score: 58,
            confidence: Confidence::Medium,
            stage: Stage::Final,
            indicators: vec![],
            breakdown: ScoreBreakdown::default(),
            contributions: vec![],
            diagnostics: Diagnostics::default(),
            cache: CacheMeta::default(),
            analyzed_at: Utc::now(),
        };

        let rendered = to_json(&analysis).expect("json should serialize");
        assert!(rendered.contains("\"slop_score\": 58"));
        assert!(rendered.contains("\"stage\": \"final\""));
    }
}
