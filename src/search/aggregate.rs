//! Merging per-file scan output into a single result

use std::collections::HashSet;

use super::types::{FileEntry, FileMatches, MatchResult, OutputFormat, SearchOutcome, SearchResult};
use crate::error::Result;
use crate::rg_error;

/// Combine per-file matches, given in the order the files were supplied.
///
/// `per_file[i]` must hold the matches of `files[i]`.
pub fn aggregate(
    files: &[FileEntry],
    per_file: Vec<Vec<MatchResult>>,
    format: OutputFormat,
) -> Result<SearchOutcome> {
    debug_assert_eq!(files.len(), per_file.len());
    match format {
        OutputFormat::Detailed => detailed(per_file).map(SearchOutcome::Detailed),
        OutputFormat::FilesOnly => Ok(SearchOutcome::FilesOnly(files_only(files, &per_file))),
    }
}

/// Concatenate in file order, then line order.
pub fn detailed(per_file: Vec<Vec<MatchResult>>) -> Result<SearchResult> {
    let total: usize = per_file.iter().map(Vec::len).sum();

    let mut matches = Vec::new();
    matches.try_reserve_exact(total).map_err(|e| {
        rg_error!(memory, total, format!("failed to allocate {total} match records: {e}"))
    })?;

    let mut paths = HashSet::new();
    for file_matches in per_file {
        if let Some(first) = file_matches.first() {
            paths.insert(first.path.clone());
        }
        matches.extend(file_matches);
    }

    Ok(SearchResult {
        total_matches: matches.len(),
        files_with_matches: paths.len(),
        matches,
    })
}

/// Distinct matching paths in supply order. A path supplied twice is listed once.
fn files_only(files: &[FileEntry], per_file: &[Vec<MatchResult>]) -> FileMatches {
    let mut seen = HashSet::new();
    let paths = files
        .iter()
        .zip(per_file)
        .filter(|(_, matches)| !matches.is_empty())
        .filter(|(file, _)| seen.insert(file.path.as_str()))
        .map(|(file, _)| file.path.clone())
        .collect();
    FileMatches { paths }
}
