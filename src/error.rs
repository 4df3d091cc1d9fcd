//! Error taxonomy shared by the search and directory-filter engines
//!
//! Every failure surfaces as a [`RipgrepError`]: a `type` tag naming the
//! [`ErrorKind`], a kind-specific `details` payload, and a one-line `message`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::config::INPUT_PREVIEW_CHARS;

/// Closed set of failure categories.
///
/// Serialized adjacently tagged, so the variant name lands in `type` and the
/// fields in `details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ErrorKind {
    /// A request payload could not be decoded
    #[serde(rename_all = "camelCase")]
    ParseError {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input_preview: Option<String>,
    },
    /// The pattern failed to compile with the requested modifiers
    #[serde(rename_all = "camelCase")]
    InvalidPattern { pattern: String, diagnostic: String },
    /// Internal scanning failure
    #[serde(rename_all = "camelCase")]
    SearchError {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Out-of-range or structurally invalid configuration field
    #[serde(rename_all = "camelCase")]
    InvalidConfiguration {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    /// Allocation failure while collecting results
    #[serde(rename_all = "camelCase")]
    MemoryError { requested_items: usize },
    /// A file entry could not be processed as text
    #[serde(rename_all = "camelCase")]
    FileError { path: String },
    /// A result could not be encoded for the caller
    #[serde(rename_all = "camelCase")]
    SerializationError { target: String },
}

impl ErrorKind {
    /// The wire name of this kind (the `type` field).
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::ParseError { .. } => "ParseError",
            ErrorKind::InvalidPattern { .. } => "InvalidPattern",
            ErrorKind::SearchError { .. } => "SearchError",
            ErrorKind::InvalidConfiguration { .. } => "InvalidConfiguration",
            ErrorKind::MemoryError { .. } => "MemoryError",
            ErrorKind::FileError { .. } => "FileError",
            ErrorKind::SerializationError { .. } => "SerializationError",
        }
    }
}

/// Structured error returned by every engine operation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RipgrepError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    /// Human-readable one-line summary
    pub message: String,
}

impl RipgrepError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Decoding failure, carrying a bounded preview of the offending input.
    pub fn parse_error(message: impl Into<String>, input: Option<&str>) -> Self {
        Self::new(
            ErrorKind::ParseError {
                input_preview: input.map(preview),
            },
            message,
        )
    }

    pub fn invalid_pattern(pattern: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let diagnostic = diagnostic.into();
        // Compiler diagnostics span several lines; the summary keeps the last one.
        let summary = diagnostic
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("syntax error")
            .trim()
            .to_string();
        Self::new(
            ErrorKind::InvalidPattern {
                pattern: pattern.clone(),
                diagnostic,
            },
            format!("Invalid pattern '{pattern}': {summary}"),
        )
    }

    pub fn search_error(message: impl Into<String>, path: Option<&str>) -> Self {
        Self::new(
            ErrorKind::SearchError {
                path: path.map(str::to_string),
            },
            message,
        )
    }

    pub fn invalid_config(
        field: impl Into<String>,
        message: impl Into<String>,
        pattern: Option<&str>,
    ) -> Self {
        Self::new(
            ErrorKind::InvalidConfiguration {
                field: field.into(),
                pattern: pattern.map(str::to_string),
            },
            message,
        )
    }

    pub fn memory_error(requested_items: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MemoryError { requested_items }, message)
    }

    pub fn file_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileError { path: path.into() }, message)
    }

    pub fn serialization_error(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::SerializationError {
                target: target.into(),
            },
            message,
        )
    }

    /// Shorthand for `self.kind.name()`.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Render the error as its JSON payload.
    ///
    /// Falls back to a hand-built payload carrying only `type` and `message`
    /// if the structured form cannot be encoded.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode error payload: {e}");
                serde_json::json!({
                    "type": self.kind_name(),
                    "message": self.message,
                })
                .to_string()
            }
        }
    }
}

fn preview(input: &str) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(INPUT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub type Result<T> = std::result::Result<T, RipgrepError>;

/// Build a [`RipgrepError`] from a kind keyword and its arguments.
#[macro_export]
macro_rules! rg_error {
    (parse, $msg:expr) => {
        $crate::error::RipgrepError::parse_error($msg.to_string(), None)
    };
    (parse, $msg:expr, $input:expr) => {
        $crate::error::RipgrepError::parse_error($msg.to_string(), Some($input))
    };
    (pattern, $pattern:expr, $diagnostic:expr) => {
        $crate::error::RipgrepError::invalid_pattern($pattern.to_string(), $diagnostic.to_string())
    };
    (search, $msg:expr) => {
        $crate::error::RipgrepError::search_error($msg.to_string(), None)
    };
    (search, $msg:expr, $path:expr) => {
        $crate::error::RipgrepError::search_error($msg.to_string(), Some($path))
    };
    (config, $field:expr, $msg:expr) => {
        $crate::error::RipgrepError::invalid_config($field.to_string(), $msg.to_string(), None)
    };
    (config, $field:expr, $msg:expr, $pattern:expr) => {
        $crate::error::RipgrepError::invalid_config(
            $field.to_string(),
            $msg.to_string(),
            Some($pattern),
        )
    };
    (memory, $items:expr, $msg:expr) => {
        $crate::error::RipgrepError::memory_error($items, $msg.to_string())
    };
    (file, $path:expr, $msg:expr) => {
        $crate::error::RipgrepError::file_error($path.to_string(), $msg.to_string())
    };
    (serialization, $target:expr, $msg:expr) => {
        $crate::error::RipgrepError::serialization_error($target.to_string(), $msg.to_string())
    };
}
