use crate::signal::bounded_scale;
use crate::types::report::{Severity, SlopIndicator};
use crate::types::scoring::Signal;
use crate::types::tree::FileNode;

/// Known AI-assistant instruction/config file names. Entries containing a
/// slash match as a path suffix, everything else as an exact file name.
/// Case-sensitive, no fuzzy matching.
const KNOWN_CONFIG_FILES: &[&str] = &[
    ".cursorrules",
    ".cursorignore",
    ".windsurfrules",
    ".clinerules",
    ".aider.conf.yml",
    ".aiderignore",
    "CLAUDE.md",
    "AGENTS.md",
    "GEMINI.md",
    ".github/copilot-instructions.md",
    ".cursor/rules",
    ".claude/settings.json",
];

#[derive(Debug, Clone)]
pub struct ConfigDetection {
    pub found: bool,
    pub files: Vec<String>,
    pub severity: Severity,
    pub signal: Signal,
    pub indicators: Vec<SlopIndicator>,
}

impl Default for ConfigDetection {
    fn default() -> Self {
        Self {
            found: false,
            files: Vec::new(),
            severity: Severity::Low,
            signal: 0.0,
            indicators: Vec::new(),
        }
    }
}

pub fn detect_config_files(nodes: &[FileNode]) -> ConfigDetection {
    let mut files = Vec::new();
    for node in nodes.iter().filter(|node| node.is_file()) {
        let matched = KNOWN_CONFIG_FILES.iter().any(|known| {
            if known.contains('/') {
                node.path == *known || node.path.ends_with(&format!("/{known}"))
            } else {
                node.name == *known
            }
        });
        if matched {
            files.push(node.path.clone());
        }
    }

    if files.is_empty() {
        return ConfigDetection::default();
    }

    let severity = if files.len() >= 2 {
        Severity::High
    } else {
        Severity::Medium
    };
    let signal = bounded_scale(files.len() as f32, 0.0, 2.0);
    let indicators = vec![SlopIndicator::new(
        "AI Config Files",
        format!("AI assistant configuration present: {}", files.join(", ")),
        severity,
    )];

    ConfigDetection {
        found: true,
        files,
        severity,
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
    fn single_match_is_medium() {
        let detection = detect_config_files(&tree(&[".cursorrules", "README.md"]));
        assert!(detection.found);
        assert_eq!(detection.files, vec![".cursorrules".to_string()]);
        assert_eq!(detection.severity, Severity::Medium);
        assert!((detection.signal - 0.5).abs() < 1e-6);
    }

    #[test]
    fn two_matches_are_high() {
        let detection = detect_config_files(&tree(&[".cursorrules", "CLAUDE.md", "src/lib.rs"]));
        assert_eq!(detection.severity, Severity::High);
        assert_eq!(detection.signal, 1.0);
        assert_eq!(detection.indicators.len(), 1);
        assert_eq!(detection.indicators[0].severity, Severity::High);
    }

    #[test]
    fn nested_path_suffix_matches() {
        let detection = detect_config_files(&tree(&[".github/copilot-instructions.md"]));
        assert!(detection.found);
        assert_eq!(detection.severity, Severity::Medium);
    }

    #[test]
    fn no_match_is_low_with_zero_signal() {
        let detection = detect_config_files(&tree(&["README.md", "src/main.rs"]));
        assert!(!detection.found);
        assert_eq!(detection.severity, Severity::Low);
        assert_eq!(detection.signal, 0.0);
        assert!(detection.indicators.is_empty());
    }

    #[test]
    fn match_is_case_sensitive() {
        let detection = detect_config_files(&tree(&[".CURSORRULES", "claude.md"]));
        assert!(!detection.found);
    }
}
