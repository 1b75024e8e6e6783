use crate::detect::is_code_extension;
use crate::signal::bounded_scale;
use crate::types::report::{Severity, SlopIndicator};
use crate::types::scoring::Signal;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
pub struct CommentDetection {
    pub verbose_blocks: usize,
    pub matched_lines: usize,
    pub comment_signal: Signal,
    pub indicators: Vec<SlopIndicator>,
}

/// Phrases typical of comments that narrate the code line by line.
fn boilerplate_phrases() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)^this (function|method|class|module|file)\b",
            r"(?i)\binitializes? the\b",
            r"(?i)\bloops? (through|over)\b",
            r"(?i)\biterates? (through|over)\b",
            r"(?i)\bchecks? (if|whether|for)\b",
            r"(?i)\bcreates? a new\b",
            r"(?i)\bdefines? (a|the)\b",
            r"(?i)\bstep \d",
            r"(?i)\b(first|then|next|finally),? we\b",
            r"(?i)\bnote that\b",
            r"(?i)\bit'?s important to\b",
            r"(?i)\bhere,? we\b",
            r"(?i)\bwe need to\b",
            r"(?i)\bmake sure (to|that)\b",
            r"(?i)\bthe following\b",
            r"(?i)\bhandles? the (case|error)\b",
            r"(?i)\breturns? the (result|value)\b",
            r"(?i)\bsets? up the\b",
            r"(?i)\bhelper (function|method) (to|that)\b",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("comment phrase pattern is valid"))
        .collect()
    })
}

/// Runs the detector over one file's content. Files outside the recognized
/// source extensions get a zero stub result.
pub fn detect_comment_patterns(path: &str, content: &str) -> CommentDetection {
    let Some(extension) = path.rsplit_once('.').map(|(_, ext)| ext) else {
        return CommentDetection::default();
    };
    if !is_code_extension(extension) {
        return CommentDetection::default();
    }

    let hash_comments = matches!(extension, "py" | "rb");
    let mut matched_lines = 0usize;
    let mut verbose_blocks = 0usize;
    let mut run_len = 0usize;
    let mut run_matches = 0usize;

    for line in content.lines() {
        let trimmed = line.trim_start();
        let is_comment = if hash_comments {
            trimmed.starts_with('#')
        } else {
            trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
        };

        if is_comment {
            let text = trimmed
                .trim_start_matches(['/', '*', '#', '!'])
                .trim_start();
            let matched = boilerplate_phrases()
                .iter()
                .any(|pattern| pattern.is_match(text));
            if matched {
                matched_lines += 1;
                run_matches += 1;
            }
            run_len += 1;
        } else {
            if run_len >= 3 && run_matches >= 2 {
                verbose_blocks += 1;
            }
            run_len = 0;
            run_matches = 0;
        }
    }
    if run_len >= 3 && run_matches >= 2 {
        verbose_blocks += 1;
    }

    let comment_signal = (bounded_scale(matched_lines as f32, 1.0, 12.0)
        + bounded_scale(verbose_blocks as f32, 1.0, 4.0) * 0.3)
        .clamp(0.0, 1.0);

    let mut indicators = Vec::new();
    if matched_lines >= 4 {
        let severity = if matched_lines >= 12 {
            Severity::High
        } else {
            Severity::Medium
        };
        indicators.push(SlopIndicator::new(
            "Boilerplate Comment Narration",
            format!("{path}: {matched_lines} comment lines explain the obvious"),
            severity,
        ));
    }

    CommentDetection {
        verbose_blocks,
        matched_lines,
        comment_signal,
        indicators,
    }
}
