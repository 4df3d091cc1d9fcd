//! In-memory grep engine with a gitignore-aware directory filter.
//!
//! Callers supply file contents and candidate paths directly; nothing here
//! touches the filesystem.

pub mod error;
pub use error::{ErrorKind, RipgrepError};

pub mod filter;
pub use filter::{DirectorySearchConfig, FilePathEntry, GitignoreFile, filter_directory_files};

pub mod search;
pub use search::{
    FileEntry, MatchResult, OutputFormat, SearchOptions, SearchOutcome, SearchResult, grep,
    grep_cmd, search, search_directory,
};

pub mod json;
