//! Pattern search over in-memory files
//!
//! A request compiles its pattern once, scans every file line by line and
//! aggregates the per-file matches in supply order.

pub mod aggregate;
pub mod args;
pub mod config;
pub mod pattern;
pub mod scanner;
pub mod types;


pub use args::GrepArgs;
pub use pattern::{CompiledPattern, PatternModifiers, Stage};
pub use scanner::ScanMode;
pub use types::*;

use std::borrow::Borrow;

use crate::error::Result;
use crate::filter::{DirectoryFilter, DirectorySearchConfig};

/// Compile once, then scan every file with the shared matcher.
fn scan<F>(pattern: &str, files: &[F], options: &SearchOptions) -> Result<Vec<Vec<MatchResult>>>
where
    F: Borrow<FileEntry> + Sync,
{
    let compiled = CompiledPattern::compile(pattern, PatternModifiers::from(options))?;
    let mode = ScanMode {
        first_match_only: options.output_format == OutputFormat::FilesOnly,
        line_numbers: options.line_numbers,
    };
    scanner::scan_files(&compiled, files, mode)
}

/// Search `files` for `pattern`.
///
/// The shape of the outcome follows `options.output_format`.
pub fn search(pattern: &str, files: &[FileEntry], options: &SearchOptions) -> Result<SearchOutcome> {
    let per_file = scan(pattern, files, options)?;
    let outcome = aggregate::aggregate(files, per_file, options.output_format)?;

    log::debug!(
        "Search for {pattern:?}: {} matches in {} of {} files",
        outcome.total_matches(),
        outcome.files_with_matches(),
        files.len()
    );
    Ok(outcome)
}

/// Paths of the files containing `pattern`, in supply order.
///
/// Only the modifier flags of `options` are used; output is always files-only.
pub fn grep(pattern: &str, files: &[FileEntry], options: &SearchOptions) -> Result<Vec<String>> {
    let options = SearchOptions {
        output_format: OutputFormat::FilesOnly,
        ..options.clone()
    };
    search(pattern, files, &options).map(|outcome| outcome.paths())
}

/// `grep` driven by command tokens such as `["grep", "-i", "hello"]`.
pub fn grep_cmd<S: AsRef<str>>(args: &[S], files: &[FileEntry]) -> Result<Vec<String>> {
    let GrepArgs { pattern, options } = GrepArgs::parse(args)?;
    grep(&pattern, files, &options)
}

/// Filter `files` through `config`, then search the survivors.
///
/// Output is always detailed.
pub fn search_directory(
    pattern: &str,
    config: &DirectorySearchConfig,
    files: &[FileEntry],
    options: &SearchOptions,
) -> Result<SearchResult> {
    let filter = DirectoryFilter::new(config)?;
    let eligible: Vec<&FileEntry> = files
        .iter()
        .filter(|file| filter.is_eligible(&file.path))
        .collect();
    log::debug!(
        "search_directory: {} of {} files eligible under '{}'",
        eligible.len(),
        files.len(),
        config.root_path
    );

    let options = SearchOptions {
        output_format: OutputFormat::Detailed,
        ..options.clone()
    };
    let per_file = scan(pattern, &eligible, &options)?;
    aggregate::detailed(per_file)
}
