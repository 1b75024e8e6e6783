pub mod comments;
pub mod commits;
pub mod config_files;
pub mod paths;
pub mod repetition;
pub mod structure;

/// Source extensions the comment-pattern detector understands. Files outside
/// this list get a zero stub result.
pub const CODE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "py", "go", "rs", "java", "cs", "rb",
];

pub fn is_code_extension(ext: &str) -> bool {
    CODE_EXTENSIONS.contains(&ext)
}
