//! Directory filtering through the public API

use memgrep::{DirectorySearchConfig, ErrorKind, FilePathEntry, GitignoreFile, filter_directory_files};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn run(config: &DirectorySearchConfig, paths: &[&str]) -> Vec<FilePathEntry> {
    filter_directory_files(config, paths).unwrap_or_else(|e| panic!("Filter failed: {e}"))
}

fn kept(entries: &[FilePathEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.path.as_str()).collect()
}

#[test]
fn test_filter_example_scenario() {
    let config = DirectorySearchConfig {
        file_types: strings(&["*.js"]),
        ignore_patterns: strings(&["node_modules", "dist", "*.test.js"]),
        ..DirectorySearchConfig::new("/project")
    };
    let entries = run(
        &config,
        &[
            "/project/src/main.js",
            "/project/src/main.test.js",
            "/project/node_modules/lib.js",
            "/project/dist/bundle.js",
            "/project/README.md",
        ],
    );
    assert_eq!(
        entries,
        vec![FilePathEntry {
            path: "/project/src/main.js".into(),
            relative_path: "src/main.js".into(),
            depth: 1,
        }]
    );
}

#[test]
fn test_gitignore_example_scenario() {
    let gitignore = vec![GitignoreFile::new("/project", ".env")];
    let paths = ["/project/.env", "/project/app.js"];

    let default_config = DirectorySearchConfig {
        gitignore_files: gitignore.clone(),
        ..DirectorySearchConfig::new("/project")
    };
    assert_eq!(kept(&run(&default_config, &paths)), vec!["/project/app.js"]);

    // Hidden files allowed: the gitignore rule alone removes .env
    let with_hidden = DirectorySearchConfig {
        include_hidden: true,
        ..default_config.clone()
    };
    assert_eq!(kept(&run(&with_hidden, &paths)), vec!["/project/app.js"]);

    let no_gitignore = DirectorySearchConfig {
        respect_gitignore: false,
        ..with_hidden
    };
    assert_eq!(kept(&run(&no_gitignore, &paths)), vec!["/project/.env", "/project/app.js"]);
}

#[test]
fn test_filtering_is_idempotent() {
    let config = DirectorySearchConfig {
        max_depth: Some(2),
        file_types: strings(&["*.rs", "*.toml"]),
        ignore_patterns: strings(&["target"]),
        exclude_patterns: strings(&["**/generated/**"]),
        gitignore_files: vec![GitignoreFile::new("/w", "*.bak.rs\n")],
        ..DirectorySearchConfig::new("/w")
    };
    let paths = [
        "/w/Cargo.toml",
        "/w/src/lib.rs",
        "/w/src/old.bak.rs",
        "/w/src/generated/api.rs",
        "/w/target/debug/build.rs",
        "/w/a/b/c/deep.rs",
        "/w/.cargo/config.toml",
        "/w/README.md",
    ];

    let once = run(&config, &paths);
    let survivors: Vec<&str> = kept(&once);
    let twice = run(&config, &survivors);
    assert_eq!(once, twice);
    assert_eq!(survivors, vec!["/w/Cargo.toml", "/w/src/lib.rs"]);
}

#[test]
fn test_exclude_has_final_precedence() {
    let config = DirectorySearchConfig {
        override_patterns: strings(&["src/**"]),
        file_types: strings(&["*.ts"]),
        exclude_patterns: strings(&["*.d.ts", "src/vendor/**"]),
        ..DirectorySearchConfig::new("/app")
    };
    let entries = run(
        &config,
        &[
            "/app/src/index.ts",
            "/app/src/types.d.ts",
            "/app/src/vendor/lib.ts",
            "/app/test/index.ts",
        ],
    );
    assert_eq!(kept(&entries), vec!["/app/src/index.ts"]);
}

#[test]
fn test_cascading_gitignore_files() {
    let config = DirectorySearchConfig {
        gitignore_files: vec![
            GitignoreFile::new("/r/pkg", "!keep.log\n"),
            GitignoreFile::new("/r", "*.log\nbuild/\n"),
        ],
        ..DirectorySearchConfig::new("/r")
    };
    let entries = run(
        &config,
        &["/r/app.log", "/r/pkg/keep.log", "/r/pkg/other.log", "/r/build/out.txt", "/r/pkg/src.txt"],
    );
    assert_eq!(kept(&entries), vec!["/r/pkg/keep.log", "/r/pkg/src.txt"]);
}

#[test]
fn test_depth_and_annotation() {
    let config = DirectorySearchConfig {
        max_depth: Some(1),
        ..DirectorySearchConfig::new("/root/")
    };
    let entries = run(&config, &["/root/a.txt", "/root/x/b.txt", "/root/x/y/c.txt"]);
    let annotated: Vec<(&str, usize)> = entries.iter().map(|e| (e.relative_path.as_str(), e.depth)).collect();
    assert_eq!(annotated, vec![("a.txt", 0), ("x/b.txt", 1)]);
}

#[test]
fn test_invalid_globs_name_the_field() {
    let cases = [
        (
            DirectorySearchConfig {
                file_types: strings(&["*.{rs"]),
                ..DirectorySearchConfig::new("/")
            },
            "fileTypes",
        ),
        (
            DirectorySearchConfig {
                exclude_patterns: strings(&["[z-a"]),
                ..DirectorySearchConfig::new("/")
            },
            "excludePatterns",
        ),
    ];
    for (config, expected_field) in cases {
        let err = filter_directory_files(&config, &["/a"]).expect_err("malformed glob");
        let ErrorKind::InvalidConfiguration { field, pattern } = &err.kind else {
            panic!("expected InvalidConfiguration, got {:?}", err.kind);
        };
        assert_eq!(field, expected_field);
        assert!(pattern.is_some());
    }
}

#[test]
fn test_empty_path_list() {
    assert!(run(&DirectorySearchConfig::new("/"), &[]).is_empty());
}

#[test]
fn test_rooted_ignore_pattern_does_not_float() {
    let config = DirectorySearchConfig {
        ignore_patterns: strings(&["/dist"]),
        ..DirectorySearchConfig::new("/p")
    };
    let entries = run(&config, &["/p/dist/a.js", "/p/src/dist/b.js", "/p/src/dist.js"]);
    assert_eq!(kept(&entries), vec!["/p/src/dist/b.js", "/p/src/dist.js"]);
}

#[test]
fn test_directory_ignore_pattern_keeps_plain_files() {
    let config = DirectorySearchConfig {
        ignore_patterns: strings(&["build/"]),
        exclude_patterns: strings(&["/tmp/"]),
        ..DirectorySearchConfig::new("/p")
    };
    let entries = run(&config, &["/p/build/a.js", "/p/src/build", "/p/tmp/x", "/p/tmp", "/p/a/tmp/y"]);
    assert_eq!(kept(&entries), vec!["/p/src/build", "/p/tmp", "/p/a/tmp/y"]);
}

#[test]
fn test_gitignore_escaped_backslash_then_spaces() {
    let config = DirectorySearchConfig {
        gitignore_files: vec![GitignoreFile::new("/p", "foo\\\\   \n")],
        ..DirectorySearchConfig::new("/p")
    };
    let entries = run(&config, &["/p/foo\\", "/p/foo\\ "]);
    assert_eq!(kept(&entries), vec!["/p/foo\\ "]);
}
