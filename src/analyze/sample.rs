use crate::detect::is_code_extension;
use crate::types::tree::FileNode;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Share of the cap reserved for keyword-priority files, then the level the
/// root-level fill tops up to.
const PRIORITY_SHARE: f32 = 0.45;
const ROOT_SHARE: f32 = 0.60;

fn priority_keywords() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(readme|instructions?|generated|template|example|boilerplate|prompt|agent|copilot|claude|cursor)",
        )
        .expect("priority keyword pattern is valid")
    })
}

fn eligible(node: &FileNode) -> bool {
    if !node.is_file() {
        return false;
    }
    match node.extension() {
        Some(ext) => is_code_extension(ext) || ext == "md",
        None => false,
    }
}

/// Deterministic, priority-weighted selection of files to fetch. For a
/// fixed tree the result never changes, which keeps cache keys and tests
/// stable. Below the cap everything eligible is taken; above it, keyword
/// matches come first, then root-level files, then an even stride across
/// whatever is left.
pub fn select_samples(nodes: &[FileNode], cap: usize) -> Vec<FileNode> {
    let candidates: Vec<&FileNode> = nodes.iter().filter(|node| eligible(node)).collect();
    if candidates.len() <= cap {
        return candidates.into_iter().cloned().collect();
    }

    let mut selected: Vec<FileNode> = Vec::with_capacity(cap);
    let mut chosen: HashSet<&str> = HashSet::new();

    let priority_cap = (cap as f32 * PRIORITY_SHARE).floor() as usize;
    for node in &candidates {
        if selected.len() >= priority_cap {
            break;
        }
        if priority_keywords().is_match(&node.path) && chosen.insert(node.path.as_str()) {
            selected.push((*node).clone());
        }
    }

    let root_cap = (cap as f32 * ROOT_SHARE).floor() as usize;
    for node in &candidates {
        if selected.len() >= root_cap {
            break;
        }
        if !node.path.contains('/') && chosen.insert(node.path.as_str()) {
            selected.push((*node).clone());
        }
    }

    let remaining: Vec<&FileNode> = candidates
        .iter()
        .filter(|node| !chosen.contains(node.path.as_str()))
        .copied()
        .collect();
    let slots = cap - selected.len();
    if slots > 0 && !remaining.is_empty() {
        let step = remaining.len() as f32 / slots as f32;
        for slot in 0..slots {
            let index = (slot as f32 * step).floor() as usize;
            if index < remaining.len() && chosen.insert(remaining[index].path.as_str()) {
                selected.push(remaining[index].clone());
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[&str]) -> Vec<FileNode> {
        paths.iter().map(|path| FileNode::file(path)).collect()
    }

    #[test]
    fn below_cap_takes_every_eligible_file() {
        let nodes = tree(&["README.md", "src/main.rs", "assets/logo.png", "Makefile"]);
        let samples = select_samples(&nodes, 28);
        let paths: Vec<&str> = samples.iter().map(|node| node.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "src/main.rs"]);
    }

    #[test]
    fn selection_is_deterministic() {
        let paths: Vec<String> = (0..60).map(|index| format!("src/mod{index}/file{index}.rs")).collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let nodes = tree(&refs);
        let first = select_samples(&nodes, 10);
        let second = select_samples(&nodes, 10);
        let to_paths =
            |samples: &[FileNode]| samples.iter().map(|n| n.path.clone()).collect::<Vec<_>>();
        assert_eq!(to_paths(&first), to_paths(&second));
        assert_eq!(first.len(), 10);
    }

    #[test]
    fn priority_and_root_files_come_first() {
        let mut paths = vec![
            "README.md".to_string(),
            "docs/instructions.md".to_string(),
            "index.js".to_string(),
        ];
        for index in 0..40 {
            paths.push(format!("src/part{index}.js"));
        }
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let samples = select_samples(&tree(&refs), 20);

        let selected: Vec<&str> = samples.iter().map(|node| node.path.as_str()).collect();
        assert!(selected.contains(&"README.md"));
        assert!(selected.contains(&"docs/instructions.md"));
        assert!(selected.contains(&"index.js"));
        assert_eq!(samples.len(), 20);
    }

    #[test]
    fn stride_spreads_over_the_tail() {
        let paths: Vec<String> = (0..100).map(|index| format!("src/f{index:03}.go")).collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let samples = select_samples(&tree(&refs), 10);
        assert_eq!(samples.len(), 10);
        // Even stride: picks spaced across the whole range, not just the head.
        assert!(samples.iter().any(|node| node.path.as_str() >= "src/f090.go"));
    }

    #[test]
    fn no_duplicates_when_priority_overlaps_root() {
        let mut paths = vec!["README.md".to_string()];
        for index in 0..40 {
            paths.push(format!("pkg/item{index}.ts"));
        }
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let samples = select_samples(&tree(&refs), 12);
        let mut seen = HashSet::new();
        for node in &samples {
            assert!(seen.insert(node.path.clone()), "duplicate {}", node.path);
        }
    }
}
