//! JSON boundary
//!
//! Every engine operation in a text-in, text-out form. Inputs are decoded with
//! serde_json; a decoding failure is a `ParseError` carrying a preview of the
//! offending text, an encoding failure is a `SerializationError`.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RipgrepError};
use crate::filter::{self, DirectorySearchConfig};
use crate::search::{self, FileEntry, SearchOptions};

fn decode<T: DeserializeOwned>(what: &str, input: &str) -> Result<T> {
    serde_json::from_str(input).map_err(|e| {
        RipgrepError::parse_error(format!("Failed to parse {what}: {e}"), Some(input))
    })
}

/// Absent, blank and `null` options all mean defaults.
fn decode_options(options: Option<&str>) -> Result<SearchOptions> {
    match options.map(str::trim) {
        None | Some("") => Ok(SearchOptions::default()),
        Some(text) => decode::<Option<SearchOptions>>("options", text).map(Option::unwrap_or_default),
    }
}

fn encode<T: Serialize + ?Sized>(target: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        RipgrepError::serialization_error(target, format!("Failed to serialize {target}: {e}"))
    })
}

/// [`search::search`] over JSON text. Files-only output is a bare path array.
pub fn search_json(pattern: &str, files: &str, options: Option<&str>) -> Result<String> {
    let files: Vec<FileEntry> = decode("files", files)?;
    let options = decode_options(options)?;
    let outcome = search::search(pattern, &files, &options)?;
    encode("search result", &outcome)
}

/// [`search::grep`] over JSON text.
pub fn grep_json(pattern: &str, files: &str, options: Option<&str>) -> Result<String> {
    let files: Vec<FileEntry> = decode("files", files)?;
    let options = decode_options(options)?;
    let paths = search::grep(pattern, &files, &options)?;
    encode("file paths", &paths)
}

/// [`search::grep_cmd`] over JSON text; `args` is an array of strings.
pub fn grep_cmd_json(args: &str, files: &str) -> Result<String> {
    let args: Vec<String> = decode("args", args)?;
    let files: Vec<FileEntry> = decode("files", files)?;
    let paths = search::grep_cmd(&args, &files)?;
    encode("file paths", &paths)
}

/// [`filter::filter_directory_files`] over JSON text.
pub fn filter_directory_files_json(config: &str, paths: &str) -> Result<String> {
    let config: DirectorySearchConfig = decode("config", config)?;
    let paths: Vec<String> = decode("file paths", paths)?;
    let entries = filter::filter_directory_files(&config, &paths)?;
    encode("filtered entries", &entries)
}

/// [`search::search_directory`] over JSON text.
pub fn search_directory_json(
    pattern: &str,
    config: &str,
    files: &str,
    options: Option<&str>,
) -> Result<String> {
    let config: DirectorySearchConfig = decode("config", config)?;
    let files: Vec<FileEntry> = decode("files", files)?;
    let options = decode_options(options)?;
    let result = search::search_directory(pattern, &config, &files, &options)?;
    encode("search result", &result)
}

/// Operations reachable through a single request document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Grep,
    GrepCmd,
    Filter,
    SearchDirectory,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Search,
        Operation::Grep,
        Operation::GrepCmd,
        Operation::Filter,
        Operation::SearchDirectory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Grep => "grep",
            Operation::GrepCmd => "grep-cmd",
            Operation::Filter => "filter",
            Operation::SearchDirectory => "search-directory",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
                format!("unknown operation '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PatternRequest {
    pattern: String,
    files: Vec<FileEntry>,
    #[serde(default)]
    options: Option<SearchOptions>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GrepCmdRequest {
    args: Vec<String>,
    files: Vec<FileEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FilterRequest {
    config: DirectorySearchConfig,
    paths: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DirectoryRequest {
    pattern: String,
    config: DirectorySearchConfig,
    files: Vec<FileEntry>,
    #[serde(default)]
    options: Option<SearchOptions>,
}

/// Run `operation` with its arguments taken from the fields of `request`.
///
/// `{"pattern": .., "files": [..], "options": {..}}` for `search` and `grep`,
/// `{"args": [..], "files": [..]}` for `grep-cmd`,
/// `{"config": {..}, "paths": [..]}` for `filter`,
/// `{"pattern": .., "config": {..}, "files": [..], "options": {..}}` for
/// `search-directory`.
pub fn dispatch(operation: Operation, request: &str) -> Result<String> {
    log::debug!("Dispatching {operation} request ({} bytes)", request.len());
    let what = format!("{operation} request");
    match operation {
        Operation::Search => {
            let req: PatternRequest = decode(&what, request)?;
            let outcome = search::search(&req.pattern, &req.files, &req.options.unwrap_or_default())?;
            encode("search result", &outcome)
        }
        Operation::Grep => {
            let req: PatternRequest = decode(&what, request)?;
            let paths = search::grep(&req.pattern, &req.files, &req.options.unwrap_or_default())?;
            encode("file paths", &paths)
        }
        Operation::GrepCmd => {
            let req: GrepCmdRequest = decode(&what, request)?;
            let paths = search::grep_cmd(&req.args, &req.files)?;
            encode("file paths", &paths)
        }
        Operation::Filter => {
            let req: FilterRequest = decode(&what, request)?;
            let entries = filter::filter_directory_files(&req.config, &req.paths)?;
            encode("filtered entries", &entries)
        }
        Operation::SearchDirectory => {
            let req: DirectoryRequest = decode(&what, request)?;
            let result = search::search_directory(
                &req.pattern,
                &req.config,
                &req.files,
                &req.options.unwrap_or_default(),
            )?;
            encode("search result", &result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::{Value, json};

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or_else(|e| panic!("Output is not JSON: {e}\n{text}"))
    }

    const FILES: &str = r#"[
        {"path": "a.rs", "content": "fn main() {\n    println!(\"hi\");\n}\n"},
        {"path": "b.rs", "content": "// nothing here\n"}
    ]"#;

    #[test]
    fn test_search_json_detailed_shape() {
        let out = search_json("println", FILES, None).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            parse(&out),
            json!({
                "matches": [{
                    "path": "a.rs",
                    "lineNumber": 2,
                    "line": "    println!(\"hi\");",
                    "byteOffset": 4
                }],
                "totalMatches": 1,
                "filesWithMatches": 1
            })
        );
    }

    #[test]
    fn test_search_json_files_only_is_bare_array() {
        let out = search_json("fn|//", FILES, Some(r#"{"outputFormat": "files_only"}"#))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(parse(&out), json!(["a.rs", "b.rs"]));
    }

    #[test]
    fn test_blank_and_null_options_mean_defaults() {
        for options in [None, Some(""), Some("   "), Some("null"), Some("{}")] {
            let out = search_json("main", FILES, options).unwrap_or_else(|e| panic!("{options:?}: {e}"));
            assert_eq!(parse(&out)["totalMatches"], json!(1), "options {options:?}");
        }
    }

    #[test]
    fn test_malformed_files_is_parse_error_with_preview() {
        let input = format!("[{{\"path\": \"{}\"", "x".repeat(200));
        let err = search_json("a", &input, None).expect_err("truncated JSON must fail");
        let ErrorKind::ParseError { input_preview } = &err.kind else {
            panic!("expected ParseError, got {:?}", err.kind);
        };
        let preview = input_preview.as_deref().unwrap_or_else(|| panic!("preview missing"));
        assert!(preview.ends_with("..."), "{preview}");
        assert_eq!(preview.chars().count(), crate::search::config::INPUT_PREVIEW_CHARS + 3);
        assert!(err.message.starts_with("Failed to parse files"), "{}", err.message);
    }

    #[test]
    fn test_bad_options_is_parse_error() {
        let err = grep_json("a", FILES, Some(r#"{"outputFormat": "verbose"}"#))
            .expect_err("unknown format must fail");
        assert_eq!(err.kind_name(), "ParseError");
    }

    #[test]
    fn test_grep_cmd_json() {
        let out = grep_cmd_json(r#"["grep", "-i", "FN"]"#, FILES).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(parse(&out), json!(["a.rs"]));
    }

    #[test]
    fn test_filter_json_entry_shape() {
        let out = filter_directory_files_json(
            r#"{"rootPath": "/p", "fileTypes": ["*.rs"]}"#,
            r#"["/p/src/lib.rs", "/p/README.md"]"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            parse(&out),
            json!([{"path": "/p/src/lib.rs", "relativePath": "src/lib.rs", "depth": 1}])
        );
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let err = search_directory_json("(", r#"{"rootPath": "/p"}"#, "[]", None)
            .expect_err("bad pattern must fail");
        assert_eq!(err.kind_name(), "InvalidPattern");

        let payload = parse(&err.to_json());
        assert_eq!(payload["type"], json!("InvalidPattern"));
        assert_eq!(payload["details"]["pattern"], json!("("));
    }

    #[test]
    fn test_encode_failure_is_serialization_error() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "tuple keys cannot be JSON object keys");
        let err = encode("tuple map", &map).expect_err("tuple keys must fail");
        assert_eq!(
            err.kind,
            ErrorKind::SerializationError {
                target: "tuple map".into()
            }
        );
    }

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
        let err = "find".parse::<Operation>().expect_err("unknown op");
        assert!(err.contains("search-directory"), "{err}");
    }

    #[test]
    fn test_dispatch_grep_request() {
        let request = json!({
            "pattern": "HELLO",
            "files": [
                {"path": "file1.txt", "content": "Hello world"},
                {"path": "file2.txt", "content": "say hello."},
                {"path": "file3.txt", "content": "othello"}
            ],
            "options": {"caseInsensitive": true, "wordBoundary": true}
        });
        let out = dispatch(Operation::Grep, &request.to_string()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(parse(&out), json!(["file1.txt", "file2.txt"]));
    }

    #[test]
    fn test_dispatch_rejects_unknown_fields() {
        let err = dispatch(Operation::Filter, r#"{"config": {"rootPath": "/"}, "paths": [], "extra": 1}"#)
            .expect_err("unknown field must fail");
        assert_eq!(err.kind_name(), "ParseError");
        assert!(err.message.contains("filter request"), "{}", err.message);
    }
}
