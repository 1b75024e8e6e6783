use crate::signal::bounded_scale;
use crate::types::report::{Severity, SlopIndicator};
use crate::types::scoring::Signal;
use crate::types::tree::FileNode;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
pub struct PathSweep {
    pub keyword_hits: usize,
    pub workflow_hits: usize,
    pub signal: Signal,
    pub indicators: Vec<SlopIndicator>,
}

fn tool_keywords() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(copilot|cursor|chatgpt|claude|gemini|codex|aider|windsurf|ai[-_]generated|generated[-_]by|prompts?[-_/]|llm)",
        )
        .expect("tool keyword pattern is valid")
    })
}

fn ai_workflow() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\.github/workflows/.*(ai|copilot|claude|gpt|autofix|autogen)")
            .expect("workflow path pattern is valid")
    })
}

/// Regex sweep over every path in the tree for AI-tool-specific fragments.
/// Cheap corroborating evidence next to the content-based detectors.
pub fn sweep_paths(nodes: &[FileNode]) -> PathSweep {
    let mut keyword_paths = Vec::new();
    let mut workflow_hits = 0usize;

    for node in nodes {
        if tool_keywords().is_match(&node.path) {
            keyword_paths.push(node.path.clone());
        }
        if ai_workflow().is_match(&node.path) {
            workflow_hits += 1;
        }
    }

    let keyword_hits = keyword_paths.len();
    let signal = (bounded_scale(keyword_hits as f32, 1.0, 8.0) * 0.7
        + bounded_scale(workflow_hits as f32, 0.0, 3.0) * 0.3)
        .clamp(0.0, 1.0);

    let mut indicators = Vec::new();
    if keyword_hits >= 2 {
        let severity = if keyword_hits >= 6 {
            Severity::High
        } else {
            Severity::Medium
        };
        let mut shown: Vec<String> = keyword_paths.iter().take(3).cloned().collect();
        if keyword_hits > shown.len() {
            shown.push(format!("+{} more", keyword_hits - shown.len()));
        }
        indicators.push(SlopIndicator::new(
            "AI Tool Path Fragments",
            format!("tree paths reference AI tooling: {}", shown.join(", ")),
            severity,
        ));
    }
    if workflow_hits >= 1 {
        indicators.push(SlopIndicator::new(
            "AI Workflow Automation",
            format!("{workflow_hits} CI workflow path(s) reference AI automation"),
            Severity::Medium,
        ));
    }

    PathSweep {
        keyword_hits,
        workflow_hits,
        signal,
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[&str]) -> Vec<FileNode> {
        paths.iter().map(|path| FileNode::file(path)).collect()
    }

    #[test]
    fn clean_tree_sweeps_to_zero() {
        let sweep = sweep_paths(&tree(&["src/main.rs", "README.md", "Cargo.toml"]));
        assert_eq!(sweep.keyword_hits, 0);
        assert_eq!(sweep.signal, 0.0);
        assert!(sweep.indicators.is_empty());
    }

    #[test]
    fn tool_fragments_are_counted() {
        let sweep = sweep_paths(&tree(&[
            ".cursor/rules",
            "docs/claude-notes.md",
            "prompts/review.txt",
            "src/main.rs",
        ]));
        assert_eq!(sweep.keyword_hits, 3);
        assert!(sweep.signal > 0.0);
        assert!(sweep
            .indicators
            .iter()
            .any(|indicator| indicator.kind == "AI Tool Path Fragments"
                && indicator.severity == Severity::Medium));
    }

    #[test]
    fn ai_workflows_are_flagged() {
        let sweep = sweep_paths(&tree(&[".github/workflows/claude-review.yml"]));
        assert_eq!(sweep.workflow_hits, 1);
        assert!(sweep
            .indicators
            .iter()
            .any(|indicator| indicator.kind == "AI Workflow Automation"));
    }
}
