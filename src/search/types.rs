use serde::{Deserialize, Serialize};

use crate::error::{Result, RipgrepError};

/// A file supplied by the caller, with its full textual content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Build an entry from raw bytes, rejecting content that is not UTF-8 text.
    pub fn from_bytes(path: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let path = path.into();
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Self { path, content }),
            Err(e) => {
                let message = format!(
                    "content of '{path}' is not valid UTF-8 (invalid byte at offset {})",
                    e.utf8_error().valid_up_to()
                );
                Err(RipgrepError::file_error(path, message))
            }
        }
    }
}

/// Output format for search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Full per-line match records
    #[default]
    Detailed,
    /// Distinct matching paths only
    FilesOnly,
}

/// Search options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub case_insensitive: bool,
    /// Treat the pattern as a literal string
    pub fixed_strings: bool,
    pub word_boundary: bool,
    /// When false, every record of the call reports line number 0
    pub line_numbers: bool,
    pub output_format: OutputFormat,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            fixed_strings: false,
            word_boundary: false,
            line_numbers: true,
            output_format: OutputFormat::Detailed,
        }
    }
}

/// One matching line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub path: String,
    /// 1-indexed, or 0 when line numbers were disabled
    pub line_number: u64,
    /// The line without its terminator
    pub line: String,
    /// Byte offset of the first match within `line` (best effort, 0 if unknown)
    pub byte_offset: u64,
}

/// Detailed search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub matches: Vec<MatchResult>,
    pub total_matches: usize,
    pub files_with_matches: usize,
}

/// Files-only search result
///
/// Serializes as the bare array of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMatches {
    /// Distinct matching paths in the order files were supplied
    pub paths: Vec<String>,
}

impl FileMatches {
    /// In files-only mode each matching file counts once.
    pub fn total_matches(&self) -> usize {
        self.paths.len()
    }

    pub fn files_with_matches(&self) -> usize {
        self.paths.len()
    }
}

impl Serialize for FileMatches {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.paths.serialize(serializer)
    }
}

/// Result of `search`, shaped by the requested [`OutputFormat`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Detailed(SearchResult),
    FilesOnly(FileMatches),
}

impl SearchOutcome {
    pub fn total_matches(&self) -> usize {
        match self {
            SearchOutcome::Detailed(result) => result.total_matches,
            SearchOutcome::FilesOnly(files) => files.total_matches(),
        }
    }

    pub fn files_with_matches(&self) -> usize {
        match self {
            SearchOutcome::Detailed(result) => result.files_with_matches,
            SearchOutcome::FilesOnly(files) => files.files_with_matches(),
        }
    }

    /// Distinct matching paths in supply order, whichever format was produced.
    pub fn paths(&self) -> Vec<String> {
        match self {
            SearchOutcome::Detailed(result) => {
                let mut seen = std::collections::HashSet::new();
                result
                    .matches
                    .iter()
                    .filter(|m| seen.insert(m.path.as_str()))
                    .map(|m| m.path.clone())
                    .collect()
            }
            SearchOutcome::FilesOnly(files) => files.paths.clone(),
        }
    }
}
