//! Per-file line scanning
//!
//! Runs a [`CompiledPattern`] over one file's content with grep's line-oriented
//! `Searcher` and records one [`MatchResult`] per matching line.

use std::borrow::Borrow;

use bstr::ByteSlice;
use grep::searcher::{Searcher, SearcherBuilder, Sink, SinkError, SinkMatch};
use rayon::prelude::*;

use super::config::{FILE_MATCH_CAPACITY, PARALLEL_SCAN_THRESHOLD};
use super::pattern::CompiledPattern;
use super::types::{FileEntry, MatchResult};
use crate::error::{ErrorKind, Result, RipgrepError};
use crate::rg_error;

impl SinkError for RipgrepError {
    fn error_message<T: std::fmt::Display>(message: T) -> Self {
        RipgrepError::search_error(message.to_string(), None)
    }
}

/// How a scan records its matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMode {
    /// Stop after the first matching line (files-only output)
    pub first_match_only: bool,
    /// Report line numbers; when false every record carries 0
    pub line_numbers: bool,
}

impl Default for ScanMode {
    fn default() -> Self {
        Self {
            first_match_only: false,
            line_numbers: true,
        }
    }
}

/// Build the line-oriented searcher used for every scan.
///
/// Line numbers are always counted; [`ScanMode::line_numbers`] only controls
/// whether they are reported.
pub fn new_searcher() -> Searcher {
    SearcherBuilder::new().line_number(true).build()
}

/// Sink collecting one record per matching line
struct LineSink<'a> {
    pattern: &'a CompiledPattern,
    path: &'a str,
    mode: ScanMode,
    matches: Vec<MatchResult>,
}

impl Sink for LineSink<'_> {
    type Error = RipgrepError;

    fn matched(&mut self, _searcher: &Searcher, mat: &SinkMatch<'_>) -> Result<bool> {
        let line_number = mat.line_number().ok_or_else(|| {
            rg_error!(search, "searcher reported a match without a line number", self.path)
        })?;

        let line = strip_terminator(mat.bytes());
        let byte_offset = self.pattern.find_start(line)?.unwrap_or(0) as u64;
        let text = line.to_str().map_err(|e| {
            rg_error!(search, format!("matched line {line_number} is not valid UTF-8: {e}"), self.path)
        })?;

        self.matches.try_reserve(1).map_err(|e| {
            rg_error!(
                memory,
                self.matches.len() + 1,
                format!("failed to grow match list for '{}': {e}", self.path)
            )
        })?;
        self.matches.push(MatchResult {
            path: self.path.to_string(),
            line_number: if self.mode.line_numbers { line_number } else { 0 },
            line: text.to_string(),
            byte_offset,
        });

        Ok(!self.mode.first_match_only)
    }
}

/// Drop a trailing `\n` or `\r\n`, nothing else.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Scan one file, returning its matches in ascending line order.
pub fn scan_file(
    pattern: &CompiledPattern,
    searcher: &mut Searcher,
    file: &FileEntry,
    mode: ScanMode,
) -> Result<Vec<MatchResult>> {
    let mut sink = LineSink {
        pattern,
        path: &file.path,
        mode,
        matches: Vec::with_capacity(FILE_MATCH_CAPACITY),
    };

    searcher
        .search_slice(pattern.matcher(), file.content.as_bytes(), &mut sink)
        .map_err(|e| attach_path(e, &file.path))?;

    Ok(sink.matches)
}

/// Searcher-level failures arrive without a path; fill it in.
fn attach_path(mut err: RipgrepError, file_path: &str) -> RipgrepError {
    if let ErrorKind::SearchError { path: path @ None } = &mut err.kind {
        *path = Some(file_path.to_string());
        err.message = format!("Search error in file '{file_path}': {}", err.message);
    }
    err
}

/// Scan every file, keeping the per-file results in supply order.
///
/// Large inputs are spread over the rayon pool; the indexed collect keeps the
/// output identical to a sequential scan.
pub fn scan_files<F>(
    pattern: &CompiledPattern,
    files: &[F],
    mode: ScanMode,
) -> Result<Vec<Vec<MatchResult>>>
where
    F: Borrow<FileEntry> + Sync,
{
    if files.len() >= PARALLEL_SCAN_THRESHOLD {
        log::debug!("Scanning {} files in parallel", files.len());
        files
            .par_iter()
            .map_init(new_searcher, |searcher, file| {
                scan_file(pattern, searcher, file.borrow(), mode)
            })
            .collect()
    } else {
        log::debug!("Scanning {} files sequentially", files.len());
        let mut searcher = new_searcher();
        files
            .iter()
            .map(|file| scan_file(pattern, &mut searcher, file.borrow(), mode))
            .collect()
    }
}
