//! Glob lists for the type, override, ignore and exclude filters
//!
//! A bare glob is matched against single path segments. A glob with an
//! interior or leading `/` is anchored and matched against the whole
//! root-relative path. A trailing `/` restricts a glob to directories, so it
//! only ever matches ancestors of a path. `*` matches any run of characters,
//! including `/` in anchored globs.

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use super::paths::{ancestors, file_name};
use crate::error::Result;
use crate::rg_error;

/// Compiled globs of one configuration field
#[derive(Debug, Clone)]
pub struct GlobList {
    patterns: Vec<String>,
    segment_globs: GlobSet,
    segment_dir_globs: GlobSet,
    path_globs: GlobSet,
    path_dir_globs: GlobSet,
}

/// How one pattern is matched
struct CompiledGlob {
    glob: Glob,
    anchored: bool,
    directory_only: bool,
}

impl GlobList {
    /// Compile `patterns`; `field` names the configuration field in errors.
    pub fn new(field: &'static str, patterns: &[String]) -> Result<Self> {
        let mut segment = GlobSetBuilder::new();
        let mut segment_dir = GlobSetBuilder::new();
        let mut path = GlobSetBuilder::new();
        let mut path_dir = GlobSetBuilder::new();

        for pattern in patterns {
            let compiled = compile(field, pattern)?;
            let builder = match (compiled.anchored, compiled.directory_only) {
                (false, false) => &mut segment,
                (false, true) => &mut segment_dir,
                (true, false) => &mut path,
                (true, true) => &mut path_dir,
            };
            builder.add(compiled.glob);
        }

        let build = |builder: GlobSetBuilder| {
            builder.build().map_err(|e| {
                rg_error!(config, field, format!("Failed to build {field} matcher: {e}"))
            })
        };

        Ok(Self {
            patterns: patterns.to_vec(),
            segment_globs: build(segment)?,
            segment_dir_globs: build(segment_dir)?,
            path_globs: build(path)?,
            path_dir_globs: build(path_dir)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any glob matches the path itself or one of its ancestor
    /// directories.
    pub fn matches_path(&self, relative: &str) -> bool {
        self.matches_entry(relative) || ancestors(relative).any(|dir| self.matches_directory(dir))
    }

    /// Whether any glob matches the file name (or, for anchored globs, the
    /// whole path). Directory-only globs never match here.
    pub fn matches_file_name(&self, relative: &str) -> bool {
        self.matches_entry(relative)
    }

    fn matches_entry(&self, relative: &str) -> bool {
        self.path_globs.is_match(relative) || self.segment_globs.is_match(file_name(relative))
    }

    fn matches_directory(&self, dir: &str) -> bool {
        let name = file_name(dir);
        self.path_globs.is_match(dir)
            || self.path_dir_globs.is_match(dir)
            || self.segment_globs.is_match(name)
            || self.segment_dir_globs.is_match(name)
    }
}

fn compile(field: &str, pattern: &str) -> Result<CompiledGlob> {
    let (rooted, text) = match pattern.strip_prefix("./").or_else(|| pattern.strip_prefix('/')) {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (directory_only, text) = match text.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    if text.is_empty() {
        return Err(rg_error!(
            config,
            field,
            format!("Empty pattern in {field}"),
            pattern
        ));
    }

    let glob = GlobBuilder::new(text)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map_err(|e| {
            rg_error!(
                config,
                field,
                format!("Invalid {field} pattern '{pattern}': {}", e.kind()),
                pattern
            )
        })?;

    Ok(CompiledGlob {
        glob,
        anchored: rooted || text.contains('/'),
        directory_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(patterns: &[&str]) -> GlobList {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        GlobList::new("ignorePatterns", &patterns)
            .unwrap_or_else(|e| panic!("Failed to compile globs: {e}"))
    }

    #[test]
    fn test_bare_name_matches_any_segment() {
        let globs = list(&["node_modules"]);
        assert!(globs.matches_path("node_modules/lib.js"));
        assert!(globs.matches_path("packages/a/node_modules/x/y.js"));
        assert!(!globs.matches_path("src/node_modules_helper.js"));
    }

    #[test]
    fn test_star_glob_matches_file_name() {
        let globs = list(&["*.test.js"]);
        assert!(globs.matches_path("src/main.test.js"));
        assert!(!globs.matches_path("src/main.js"));
        assert!(globs.matches_file_name("a/b/c.test.js"));
    }

    #[test]
    fn test_file_name_matching_ignores_directories() {
        let types = list(&["*.js"]);
        assert!(types.matches_file_name("src/main.js"));
        assert!(!types.matches_file_name("lib.js/README.md"));
        assert!(types.matches_path("lib.js/README.md"));
    }

    #[test]
    fn test_slash_glob_matches_whole_path() {
        let globs = list(&["src/*.rs", "/docs/**"]);
        assert!(globs.matches_path("src/lib.rs"));
        assert!(globs.matches_path("src/nested/mod.rs"), "star crosses separators");
        assert!(!globs.matches_path("other/src/lib.rs"));
        assert!(globs.matches_path("docs/guide/intro.md"));
    }

    #[test]
    fn test_trailing_slash_names_directory() {
        let globs = list(&["dist/"]);
        assert!(globs.matches_path("dist/bundle.js"));
        assert!(globs.matches_path("pkg/dist/bundle.js"));
        assert!(!globs.matches_path("distribution/a.js"));
    }

    #[test]
    fn test_directory_only_glob_skips_plain_files() {
        let globs = list(&["build/", "/out/"]);
        assert!(globs.matches_path("build/a.js"));
        assert!(!globs.matches_path("src/build"), "a file named build is kept");
        assert!(globs.matches_path("out/x.bin"));
        assert!(!globs.matches_path("out"), "a file named out is kept");
        assert!(!globs.matches_file_name("build"));
    }

    #[test]
    fn test_leading_slash_anchors_to_root() {
        let globs = list(&["/dist"]);
        assert!(globs.matches_path("dist/a.js"));
        assert!(globs.matches_path("dist"));
        assert!(!globs.matches_path("src/dist/b.js"), "anchored glob does not float");
        assert!(!globs.matches_path("src/dist.js"));

        let dotted = list(&["./vendor"]);
        assert!(dotted.matches_path("vendor/lib.rs"));
        assert!(!dotted.matches_path("crates/vendor/lib.rs"));
    }

    #[test]
    fn test_anchored_glob_covers_directory_contents() {
        let globs = list(&["src/generated"]);
        assert!(globs.matches_path("src/generated/api.rs"));
        assert!(!globs.matches_path("lib/src/generated/api.rs"));
    }

    #[test]
    fn test_malformed_glob_names_field_and_pattern() {
        let err = GlobList::new("fileTypes", &["[abc".to_string()])
            .expect_err("unclosed class must fail");
        assert_eq!(
            err.kind,
            crate::error::ErrorKind::InvalidConfiguration {
                field: "fileTypes".into(),
                pattern: Some("[abc".into())
            }
        );

        let empty = GlobList::new("excludePatterns", &["".to_string()]).expect_err("empty glob must fail");
        assert_eq!(empty.kind_name(), "InvalidConfiguration");
    }
}
