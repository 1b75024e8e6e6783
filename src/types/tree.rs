use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Dir,
}

/// One entry of a flattened recursive tree listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub url: Option<String>,
}

impl FileNode {
    pub fn file(path: &str) -> Self {
        Self {
            name: bare_name(path).to_string(),
            path: path.to_string(),
            kind: FileKind::File,
            url: None,
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            name: bare_name(path).to_string(),
            path: path.to_string(),
            kind: FileKind::Dir,
            url: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    /// Path of the containing directory, empty for root-level entries.
    pub fn parent(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

fn bare_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A file whose textual content was fetched during the deep pass.
#[derive(Debug, Clone)]
pub struct SampledFile {
    pub path: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_node_splits_name_and_parent() {
        let node = FileNode::file("src/detect/commits.rs");
        assert_eq!(node.name, "commits.rs");
        assert_eq!(node.parent(), "src/detect");
        assert_eq!(node.extension(), Some("rs"));
    }

    #[test]
    fn root_level_node_has_empty_parent() {
        let node = FileNode::file("README.md");
        assert_eq!(node.parent(), "");
        assert_eq!(node.name, "README.md");
    }
}
