//! Pattern compilation
//!
//! Turns a pattern string plus modifier flags into a reusable line matcher
//! backed by ripgrep's Rust regex engine. The modifiers are applied as a
//! fixed pipeline: escape, then word-boundary wrapping, then case folding.

use grep::matcher::Matcher;
use grep::regex::{RegexMatcher, RegexMatcherBuilder};

use super::types::SearchOptions;
use crate::error::{Result, RipgrepError};

/// Modifier flags accepted by the compiler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternModifiers {
    pub fixed_strings: bool,
    pub word_boundary: bool,
    pub case_insensitive: bool,
}

impl From<&SearchOptions> for PatternModifiers {
    fn from(options: &SearchOptions) -> Self {
        Self {
            fixed_strings: options.fixed_strings,
            word_boundary: options.word_boundary,
            case_insensitive: options.case_insensitive,
        }
    }
}

/// One transformation step of the compile pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Escape every metacharacter so the pattern is matched literally
    Escape,
    /// Require non-word characters (or line edges) around the match
    WordBoundary,
    /// Fold case uniformly over the whole pattern
    CaseFold,
}

impl PatternModifiers {
    /// Active stages, always in pipeline order.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::with_capacity(3);
        if self.fixed_strings {
            stages.push(Stage::Escape);
        }
        if self.word_boundary {
            stages.push(Stage::WordBoundary);
        }
        if self.case_insensitive {
            stages.push(Stage::CaseFold);
        }
        stages
    }
}

/// A compiled, read-only matcher shared by every scan of one request
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    expression: String,
    matcher: RegexMatcher,
}

impl CompiledPattern {
    /// Compile `pattern` with the given modifiers.
    ///
    /// Fails with `InvalidPattern` carrying the original pattern and the
    /// regex engine's diagnostic.
    pub fn compile(pattern: &str, modifiers: PatternModifiers) -> Result<Self> {
        let mut builder = RegexMatcherBuilder::new();
        builder
            .multi_line(true)
            .unicode(true)
            .octal(false)
            .line_terminator(Some(b'\n'))
            .dot_matches_new_line(false);

        let stages = modifiers.stages();
        let mut expression = pattern.to_string();
        for stage in &stages {
            match stage {
                Stage::Escape => expression = regex::escape(&expression),
                Stage::WordBoundary => {
                    builder.word(true);
                }
                Stage::CaseFold => {
                    builder.case_insensitive(true);
                }
            }
        }

        let matcher = builder
            .build(&expression)
            .map_err(|e| RipgrepError::invalid_pattern(pattern, e.to_string()))?;

        log::debug!("Compiled pattern {pattern:?} as {expression:?} with stages {stages:?}");

        Ok(Self { expression, matcher })
    }

    /// The expression handed to the regex engine after escaping
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub(crate) fn matcher(&self) -> &RegexMatcher {
        &self.matcher
    }

    /// Whether `line` contains a match.
    pub fn is_match(&self, line: &[u8]) -> Result<bool> {
        self.matcher
            .is_match(line)
            .map_err(|e| RipgrepError::search_error(format!("matcher failed: {e}"), None))
    }

    /// Byte offset of the first match start in `line`, if any.
    pub fn find_start(&self, line: &[u8]) -> Result<Option<usize>> {
        self.matcher
            .find(line)
            .map(|m| m.map(|m| m.start()))
            .map_err(|e| RipgrepError::search_error(format!("matcher failed: {e}"), None))
    }
}
