use crate::signal::{bounded_scale, ratio};
use crate::types::report::{Severity, SlopIndicator};
use crate::types::scoring::Signal;
use crate::types::tree::FileNode;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StructureDetection {
    pub repeated_shapes: usize,
    pub name_repetition_ratio: f32,
    pub uniformity_signal: Signal,
    pub indicators: Vec<SlopIndicator>,
}

/// Looks for the scaffolding signature of generated code: many directories
/// stamped from the same template, and the same file names recurring all
/// over the tree.
pub fn detect_structure(nodes: &[FileNode]) -> StructureDetection {
    let files: Vec<&FileNode> = nodes.iter().filter(|node| node.is_file()).collect();
    if files.is_empty() {
        return StructureDetection::default();
    }

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for file in &files {
        children
            .entry(file.parent())
            .or_default()
            .push(file.name.as_str());
    }

    // A directory's shape is the sorted, pipe-joined list of its child file
    // names. Only shapes with at least 2 files are meaningful.
    let mut shape_dirs: HashMap<String, usize> = HashMap::new();
    for names in children.values_mut() {
        if names.len() < 2 {
            continue;
        }
        names.sort_unstable();
        *shape_dirs.entry(names.join("|")).or_default() += 1;
    }

    let repeated_shapes = shape_dirs.values().filter(|count| **count >= 3).count();
    let repeated_dirs: usize = shape_dirs
        .values()
        .filter(|count| **count >= 3)
        .sum();
    let repeated_dir_ratio = ratio(repeated_dirs as f32, children.len() as f32);

    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for file in &files {
        *name_counts.entry(file.name.as_str()).or_default() += 1;
    }
    let repeated_names = files
        .iter()
        .filter(|file| name_counts.get(file.name.as_str()).copied().unwrap_or(0) > 1)
        .count();
    let name_repetition_ratio = ratio(repeated_names as f32, files.len() as f32);

    let uniformity = bounded_scale(
        repeated_dir_ratio * 1.2 + bounded_scale(repeated_shapes as f32, 1.0, 6.0),
        0.15,
        1.6,
    );
    let uniformity_signal = (uniformity + name_repetition_ratio * 0.25).min(1.0);

    let mut indicators = Vec::new();
    if repeated_shapes >= 1 {
        let severity = if repeated_shapes >= 3 {
            Severity::High
        } else {
            Severity::Medium
        };
        indicators.push(SlopIndicator::new(
            "Uniform Module Scaffolds",
            format!(
                "{repeated_shapes} directory shape(s) stamped across {repeated_dirs} directories"
            ),
            severity,
        ));
    }
    if name_repetition_ratio > 0.55 {
        let severity = if name_repetition_ratio > 0.72 {
            Severity::High
        } else {
            Severity::Medium
        };
        indicators.push(SlopIndicator::new(
            "Repeated File Templates",
            format!(
                "{:.0}% of files reuse a file name found elsewhere in the tree",
                name_repetition_ratio * 100.0
            ),
            severity,
        ));
    }

    StructureDetection {
        repeated_shapes,
        name_repetition_ratio,
        uniformity_signal,
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
    fn repeated_scaffold_is_detected() {
        let nodes = tree(&[
            "src/users/index.ts",
            "src/users/types.ts",
            "src/posts/index.ts",
            "src/posts/types.ts",
            "src/tags/index.ts",
            "src/tags/types.ts",
            "src/likes/index.ts",
            "src/likes/types.ts",
        ]);
        let detection = detect_structure(&nodes);
        assert_eq!(detection.repeated_shapes, 1);
        assert!(detection
            .indicators
            .iter()
            .any(|indicator| indicator.kind == "Uniform Module Scaffolds"
                && indicator.severity >= Severity::Medium));
        // Every file name recurs, so the template indicator fires high too.
        assert!(detection
            .indicators
            .iter()
            .any(|indicator| indicator.kind == "Repeated File Templates"
                && indicator.severity == Severity::High));
        assert!(detection.uniformity_signal > 0.7);
    }

    #[test]
    fn varied_tree_is_quiet() {
        let nodes = tree(&[
            "src/main.rs",
            "src/parser.rs",
            "src/render.rs",
            "docs/guide.md",
            "Cargo.toml",
        ]);
        let detection = detect_structure(&nodes);
        assert_eq!(detection.repeated_shapes, 0);
        assert_eq!(detection.name_repetition_ratio, 0.0);
        assert!(detection.indicators.is_empty());
    }

    #[test]
    fn single_file_directories_never_form_shapes() {
        let nodes = tree(&["a/mod.rs", "b/mod.rs", "c/mod.rs", "d/mod.rs"]);
        let detection = detect_structure(&nodes);
        assert_eq!(detection.repeated_shapes, 0);
        // Name repetition still counts across directories.
        assert_eq!(detection.name_repetition_ratio, 1.0);
        assert!(detection
            .indicators
            .iter()
            .any(|indicator| indicator.kind == "Repeated File Templates"));
    }

    #[test]
    fn empty_tree_yields_zeros() {
        let detection = detect_structure(&[]);
        assert_eq!(detection.uniformity_signal, 0.0);
        assert!(detection.indicators.is_empty());
    }
}
