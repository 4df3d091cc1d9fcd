//! Directory-entry filtering
//!
//! Decides which paths of a flat candidate list are eligible for search.
//! Stages run in a fixed order and each one only narrows the survivors:
//! depth, hidden, override whitelist, file type, ignore patterns plus
//! gitignore rules, and finally the exclude blacklist.

pub mod gitignore;
pub mod glob;
pub mod paths;
pub mod types;

pub use gitignore::{IgnoreRule, IgnoreStack};
pub use glob::GlobList;
pub use types::*;

use crate::error::Result;
use crate::rg_error;
use paths::{depth_of, relative_to_root, segments};

/// The stage that removed a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    Depth,
    Hidden,
    Override,
    FileType,
    IgnorePattern,
    Gitignore,
    Exclude,
}

/// Outcome of running one path through the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep(FilePathEntry),
    Drop(FilterStage),
}

/// A validated, compiled [`DirectorySearchConfig`]
#[derive(Debug, Clone)]
pub struct DirectoryFilter {
    root: String,
    max_depth: Option<usize>,
    include_hidden: bool,
    overrides: GlobList,
    file_types: GlobList,
    ignore_patterns: GlobList,
    gitignore: Option<IgnoreStack>,
    excludes: GlobList,
}

impl DirectoryFilter {
    /// Validate and compile `config`.
    ///
    /// Fails with `InvalidConfiguration` for a negative `maxDepth` or any
    /// malformed glob or ignore rule.
    pub fn new(config: &DirectorySearchConfig) -> Result<Self> {
        let max_depth = match config.max_depth {
            None => None,
            Some(depth) => Some(usize::try_from(depth).map_err(|_| {
                rg_error!(
                    config,
                    "maxDepth",
                    format!("maxDepth must not be negative (got {depth})")
                )
            })?),
        };

        let gitignore = if config.respect_gitignore && !config.gitignore_files.is_empty() {
            Some(IgnoreStack::new(&config.root_path, &config.gitignore_files)?)
        } else {
            None
        };

        Ok(Self {
            root: config.root_path.clone(),
            max_depth,
            include_hidden: config.include_hidden,
            overrides: GlobList::new("overridePatterns", &config.override_patterns)?,
            file_types: GlobList::new("fileTypes", &config.file_types)?,
            ignore_patterns: GlobList::new("ignorePatterns", &config.ignore_patterns)?,
            gitignore,
            excludes: GlobList::new("excludePatterns", &config.exclude_patterns)?,
        })
    }

    /// Run `path` through every stage.
    pub fn verdict(&self, path: &str) -> Verdict {
        let relative = relative_to_root(&self.root, path);
        let depth = depth_of(relative);

        if self.max_depth.is_some_and(|max| depth > max) {
            return Verdict::Drop(FilterStage::Depth);
        }
        if !self.include_hidden && segments(relative).any(|s| s.starts_with('.')) {
            return Verdict::Drop(FilterStage::Hidden);
        }
        if !self.overrides.is_empty() && !self.overrides.matches_path(relative) {
            return Verdict::Drop(FilterStage::Override);
        }
        if !self.file_types.is_empty() && !self.file_types.matches_file_name(relative) {
            return Verdict::Drop(FilterStage::FileType);
        }
        if !self.ignore_patterns.is_empty() && self.ignore_patterns.matches_path(relative) {
            return Verdict::Drop(FilterStage::IgnorePattern);
        }
        if let Some(stack) = &self.gitignore
            && stack.is_ignored(relative)
        {
            return Verdict::Drop(FilterStage::Gitignore);
        }
        if !self.excludes.is_empty() && self.excludes.matches_path(relative) {
            return Verdict::Drop(FilterStage::Exclude);
        }

        Verdict::Keep(FilePathEntry {
            path: path.to_string(),
            relative_path: relative.to_string(),
            depth,
        })
    }

    /// Whether `path` survives every stage.
    pub fn is_eligible(&self, path: &str) -> bool {
        matches!(self.verdict(path), Verdict::Keep(_))
    }

    /// Filter `paths`, preserving input order among survivors.
    pub fn apply<S: AsRef<str>>(&self, paths: &[S]) -> Vec<FilePathEntry> {
        paths
            .iter()
            .filter_map(|path| match self.verdict(path.as_ref()) {
                Verdict::Keep(entry) => Some(entry),
                Verdict::Drop(stage) => {
                    log::debug!("Dropped '{}' at {stage:?} stage", path.as_ref());
                    None
                }
            })
            .collect()
    }
}

/// Filter a flat path list with `config`.
pub fn filter_directory_files<S: AsRef<str>>(
    config: &DirectorySearchConfig,
    paths: &[S],
) -> Result<Vec<FilePathEntry>> {
    let filter = DirectoryFilter::new(config)?;
    let entries = filter.apply(paths);
    log::debug!(
        "Directory filter kept {} of {} paths under '{}'",
        entries.len(),
        paths.len(),
        config.root_path
    );
    Ok(entries)
}
