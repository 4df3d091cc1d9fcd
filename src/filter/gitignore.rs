//! Gitignore rule parsing and cascading evaluation
//!
//! Each supplied ignore file is compiled with the `ignore` crate's
//! [`GitignoreBuilder`], scoped to the directory holding it. Files are
//! linearized root-to-leaf (shallower directories first, supply order among
//! equals); the deepest file with a rule matching a path decides, and within
//! a file the last matching line wins.

use std::collections::HashMap;

use ignore::Match;
use ignore::gitignore::{Gitignore, GitignoreBuilder, Glob};
use rayon::prelude::*;

use super::paths::{relative_to_root, segments};
use super::types::GitignoreFile;
use crate::error::Result;
use crate::rg_error;

const FIELD: &str = "gitignoreFiles";

/// The ignore-file line that decided a path's fate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    /// The line as written, minus unescaped trailing whitespace
    pub pattern: String,
    pub is_negation: bool,
    pub directory_only: bool,
    /// Leading `/`: only matches directly below the source directory
    pub anchored: bool,
    /// Depth of the directory holding the ignore file (root = 0)
    pub source_depth: usize,
    /// Root-relative directory holding the ignore file (`""` for the root)
    pub source_dir: String,
    /// 1-based line number in the ignore file
    pub line: Option<usize>,
}

/// One compiled ignore file
#[derive(Debug, Clone)]
pub struct IgnoreFile {
    pub source_dir: String,
    pub source_depth: usize,
    matcher: Gitignore,
    /// Rule text to the last line carrying it
    lines: HashMap<String, usize>,
}

impl IgnoreFile {
    /// Number of rules compiled from the file.
    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Match `relative` (a root-relative file path) or one of its ancestor
    /// directories against this file's rules.
    fn matched(&self, relative: &str) -> Match<&Glob> {
        match self.local_path(relative) {
            Some(local) => self.matcher.matched_path_or_any_parents(local, false),
            None => Match::None,
        }
    }

    /// `relative` re-expressed below the source directory, if it lies there.
    fn local_path<'a>(&self, relative: &'a str) -> Option<&'a str> {
        if self.source_dir.is_empty() {
            return Some(relative);
        }
        relative
            .strip_prefix(self.source_dir.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }

    fn rule(&self, glob: &Glob) -> IgnoreRule {
        let original = glob.original();
        let body = if glob.is_whitelist() {
            original.strip_prefix('!').unwrap_or(original)
        } else {
            original
        };
        IgnoreRule {
            pattern: original.to_string(),
            is_negation: glob.is_whitelist(),
            directory_only: glob.is_only_dir(),
            anchored: body.starts_with('/'),
            source_depth: self.source_depth,
            source_dir: self.source_dir.clone(),
            line: self.lines.get(original).copied(),
        }
    }
}

/// Parse one ignore file located at `file.path` below `root`.
pub fn parse_ignore_file(root: &str, file: &GitignoreFile) -> Result<IgnoreFile> {
    let source_dir = relative_to_root(root, &file.path)
        .trim_end_matches('/')
        .to_string();
    let source_depth = segments(&source_dir).count();
    let display_dir = if source_dir.is_empty() { "." } else { source_dir.as_str() };

    // Paths are localized before matching, so the builder root is neutral.
    let mut builder = GitignoreBuilder::new(".");
    let mut lines = HashMap::new();
    for (index, raw) in file.content.lines().enumerate() {
        let line = index + 1;
        builder.add_line(None, raw).map_err(|e| {
            rg_error!(
                config,
                FIELD,
                format!(
                    "Invalid ignore rule '{}' on line {line} of '{display_dir}': {e}",
                    raw.trim_end()
                ),
                raw.trim_end()
            )
        })?;
        lines.insert(rule_text(raw).to_string(), line);
    }

    let matcher = builder.build().map_err(|e| {
        rg_error!(config, FIELD, format!("Failed to build ignore rules for '{display_dir}': {e}"))
    })?;

    log::debug!(
        "Compiled {} ignore rules for '{display_dir}' (depth {source_depth})",
        matcher.len()
    );

    Ok(IgnoreFile {
        source_dir,
        source_depth,
        matcher,
        lines,
    })
}

/// The text `GitignoreBuilder` keeps as a rule's original form.
fn rule_text(raw: &str) -> &str {
    if raw.ends_with("\\ ") {
        raw
    } else {
        raw.trim_end()
    }
}

/// All ignore files of one request, linearized root-to-leaf
#[derive(Debug, Clone, Default)]
pub struct IgnoreStack {
    files: Vec<IgnoreFile>,
}

impl IgnoreStack {
    /// Compile every ignore file (in parallel) and order them by depth.
    pub fn new(root: &str, files: &[GitignoreFile]) -> Result<Self> {
        let mut files: Vec<IgnoreFile> = files
            .par_iter()
            .map(|file| parse_ignore_file(root, file))
            .collect::<Result<_>>()?;
        files.retain(|file| !file.is_empty());
        // Stable: files at equal depth keep their supply order.
        files.sort_by_key(|file| file.source_depth);
        Ok(Self { files })
    }

    /// Files in evaluation order.
    pub fn files(&self) -> &[IgnoreFile] {
        &self.files
    }

    /// The deepest, latest match for `relative`.
    fn resolve(&self, relative: &str) -> Option<(&IgnoreFile, Match<&Glob>)> {
        self.files
            .iter()
            .rev()
            .map(|file| (file, file.matched(relative)))
            .find(|(_, matched)| !matched.is_none())
    }

    /// The rule deciding the fate of `relative`, if any rule applies.
    pub fn decisive_rule(&self, relative: &str) -> Option<IgnoreRule> {
        match self.resolve(relative)? {
            (file, Match::Ignore(glob) | Match::Whitelist(glob)) => Some(file.rule(glob)),
            (_, Match::None) => None,
        }
    }

    pub fn is_ignored(&self, relative: &str) -> bool {
        self.resolve(relative)
            .is_some_and(|(_, matched)| matched.is_ignore())
    }
}
