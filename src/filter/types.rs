use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Ignore-file content supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitignoreFile {
    /// Directory the rules apply to, absolute under `rootPath` or relative to it
    pub path: String,
    /// Raw ignore-file text
    pub content: String,
}

impl GitignoreFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Directory search configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySearchConfig {
    pub root_path: String,
    /// Maximum depth below the root (None = unlimited, negative = invalid)
    #[serde(default)]
    pub max_depth: Option<i64>,
    /// Filename globs, e.g. `["*.js", "*.ts"]`
    #[serde(default)]
    pub file_types: Vec<String>,
    /// Globs dropped from the results, e.g. `["node_modules", "*.log"]`
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default)]
    pub gitignore_files: Vec<GitignoreFile>,
    /// Whitelist globs; only applied when non-empty
    #[serde(default)]
    pub override_patterns: Vec<String>,
    /// Blacklist globs with final precedence
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl DirectorySearchConfig {
    /// A configuration with every filter at its default.
    pub fn new(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            max_depth: None,
            file_types: Vec::new(),
            ignore_patterns: Vec::new(),
            respect_gitignore: true,
            include_hidden: false,
            gitignore_files: Vec::new(),
            override_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// A path that survived filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePathEntry {
    pub path: String,
    /// `path` with the root prefix stripped
    pub relative_path: String,
    /// Number of separators in `relative_path` (0 = directly under the root)
    pub depth: usize,
}
