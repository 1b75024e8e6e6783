use crate::signal::{average, bounded_scale, jaccard};
use crate::types::report::{Severity, SlopIndicator};
use crate::types::scoring::Signal;
use crate::types::tree::SampledFile;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const MAX_TOKENS_PER_FILE: usize = 500;
const MIN_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct RepetitionDetection {
    pub average_similarity: f32,
    pub repetition_signal: Signal,
    pub indicators: Vec<SlopIndicator>,
}

fn string_literals() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#)
            .expect("string literal pattern is valid")
    })
}

fn bare_integers() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d+\b").expect("integer pattern is valid"))
}

/// Collapses literal and formatting noise so superficially different files
/// with the same structure still tokenize alike: string/char literals become
/// STR, bare integers become NUM, punctuation becomes whitespace, and
/// everything is lowercased.
fn token_set(content: &str) -> HashSet<String> {
    let without_strings = string_literals().replace_all(content, " STR ");
    let without_numbers = bare_integers().replace_all(&without_strings, " NUM ");
    let cleaned: String = without_numbers
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '_' {
                ch
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .take(MAX_TOKENS_PER_FILE)
        .map(|token| token.to_lowercase())
        .collect()
}

/// Cross-file near-duplicate detection over the sampled contents. Needs at
/// least two samples; otherwise everything stays zero.
pub fn detect_repetition(samples: &[SampledFile]) -> RepetitionDetection {
    if samples.len() < 2 {
        return RepetitionDetection::default();
    }

    let sets: Vec<HashSet<String>> = samples
        .iter()
        .map(|sample| token_set(&sample.content))
        .collect();

    let mut similarities = Vec::new();
    for left in 0..sets.len() {
        for right in (left + 1)..sets.len() {
            similarities.push(jaccard(&sets[left], &sets[right]));
        }
    }

    let average_similarity = average(&similarities);
    let repetition_signal = bounded_scale(average_similarity, 0.16, 0.5);

    let mut indicators = Vec::new();
    if average_similarity >= 0.24 {
        let severity = if average_similarity >= 0.36 {
            Severity::High
        } else {
            Severity::Medium
        };
        indicators.push(SlopIndicator::new(
            "High Cross-file Similarity",
            format!(
                "average token-set similarity {:.2} across {} sampled files",
                average_similarity,
                samples.len()
            ),
            severity,
        ));
    }

    RepetitionDetection {
        average_similarity,
        repetition_signal,
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(path: &str, content: &str) -> SampledFile {
        SampledFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn fewer_than_two_samples_yields_zeros() {
        let detection = detect_repetition(&[sample("a.rs", "fn main() {}")]);
        assert_eq!(detection.average_similarity, 0.0);
        assert_eq!(detection.repetition_signal, 0.0);
        assert!(detection.indicators.is_empty());
    }

    #[test]
    fn near_identical_samples_saturate_the_signal() {
        let samples = vec![
            sample("a.ts", "export function handler(input) { return process(input, \"one\", 10); }"),
            sample("b.ts", "export function handler(input) { return process(input, \"two\", 20); }"),
            sample("c.ts", "export function handler(input) { return process(input, \"three\", 30); }"),
        ];
        let detection = detect_repetition(&samples);
        assert!(detection.average_similarity > 0.99);
        assert_eq!(detection.repetition_signal, 1.0);
        assert!(detection
            .indicators
            .iter()
            .any(|indicator| indicator.kind == "High Cross-file Similarity"
                && indicator.severity == Severity::High));
    }

    #[test]
    fn literal_differences_do_not_mask_duplication() {
        let a = token_set("let name = \"alice\"; let age = 30;");
        let b = token_set("let name = \"bob\"; let age = 45;");
        assert_eq!(a, b);
    }

    #[test]
    fn unrelated_files_stay_below_threshold() {
        let samples = vec![
            sample("parser.rs", "fn parse(input: &str) -> Ast { tokenize(input).fold() }"),
            sample("render.py", "def render(canvas, sprite):\n    canvas.blit(sprite.image)"),
        ];
        let detection = detect_repetition(&samples);
        assert!(detection.average_similarity < 0.24);
        assert!(detection.indicators.is_empty());
    }

    #[test]
    fn short_tokens_are_dropped() {
        let tokens = token_set("if a b cd to of the return");
        assert!(tokens.contains("return"));
        assert!(tokens.contains("the"));
        assert!(!tokens.contains("if"));
        assert!(!tokens.contains("cd"));
    }
}
