use crate::types::report::RepoAnalysis;

pub fn to_markdown(analysis: &RepoAnalysis) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Slop Report: {}\n\n", analysis.repo_id));
    output.push_str(&format!(
        "Slop score: {} / 100 ({:?} confidence, {:?} stage)\n\n",
        analysis.slop_score, analysis.confidence, analysis.stage
    ));

    output.push_str("## Score Breakdown\n\n");
    output.push_str(&format!(
        "- configs: {:.2}\n- commits: {:.2}\n- patterns: {:.2}\n- structure: {:.2}\n- repetition: {:.2}\n\n",
        analysis.breakdown.configs,
        analysis.breakdown.commits,
        analysis.breakdown.patterns,
        analysis.breakdown.structure,
        analysis.breakdown.repetition
    ));

    output.push_str("## Indicators\n\n");
    if analysis.indicators.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for indicator in &analysis.indicators {
            output.push_str(&format!(
                "- [{:?}] {}: {}\n",
                indicator.severity, indicator.kind, indicator.description
            ));
        }
        output.push('\n');
    }

    output.push_str("## Diagnostics\n\n");
    output.push_str(&format!(
        "- requests: {}\n- sampled files: {}\n- evidence strength: {:.2}\n- commit pass: {} ms\n- deep pass: {} ms\n",
        analysis.diagnostics.request_count,
        analysis.diagnostics.sampled_file_count,
        analysis.diagnostics.evidence_strength,
        analysis.diagnostics.commit_pass_ms,
        analysis.diagnostics.deep_pass_ms
    ));
    if analysis.cache.is_cached {
        output.push_str("- served from cache\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{
        CacheMeta, Confidence, Diagnostics, ScoreBreakdown, Severity, SlopIndicator, Stage,
    };
    use chrono::Utc;

    #[test]
    fn markdown_report_contains_sections() {
        let analysis = RepoAnalysis {
            repo_id: "octo/slop".to_string(),
            slop_score: 44,
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
                key: "k".to_string(),
                is_cached: true,
            },
            analyzed_at: Utc::now(),
        };

        let rendered = to_markdown(&analysis);
        assert!(rendered.contains("# Slop Report: octo/slop"));
        assert!(rendered.contains("## Score Breakdown"));
        assert!(rendered.contains("## Indicators"));
        assert!(rendered.contains("AI Config Files"));
        assert!(rendered.contains("served from cache"));
    }
}
