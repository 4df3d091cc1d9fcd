/*!
Parsing of `grep`-style command tokens.

Supports the subset of flags that map onto [`SearchOptions`]: case folding,
word boundaries, fixed strings and line numbering. Exactly one pattern is
accepted, either positionally or through `-e`/`--regexp`.
*/

use super::types::{OutputFormat, SearchOptions};
use crate::error::Result;
use crate::rg_error;

/// Program names accepted (and skipped) as the first token
const PROGRAM_NAMES: &[&str] = &["grep", "egrep", "fgrep", "rg"];

/// Pattern and options extracted from a command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepArgs {
    pub pattern: String,
    pub options: SearchOptions,
}

impl GrepArgs {
    /// Parse command tokens such as `["grep", "-iw", "hello"]`.
    ///
    /// The resulting options always use files-only output.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(|s| s.as_ref()).collect();
        let mut tokens = args.into_iter().peekable();
        let mut options = SearchOptions {
            output_format: OutputFormat::FilesOnly,
            ..SearchOptions::default()
        };
        let mut pattern: Option<String> = None;

        if let Some(&program) = tokens.peek()
            && PROGRAM_NAMES.contains(&program)
        {
            if program == "fgrep" {
                options.fixed_strings = true;
            }
            tokens.next();
        }

        let mut options_done = false;
        while let Some(arg) = tokens.next() {
            if options_done || arg == "-" || !arg.starts_with('-') {
                set_pattern(&mut pattern, arg)?;
                continue;
            }

            if arg == "--" {
                options_done = true;
            } else if let Some(long) = arg.strip_prefix("--") {
                match long {
                    "ignore-case" => options.case_insensitive = true,
                    "word-regexp" => options.word_boundary = true,
                    "fixed-strings" => options.fixed_strings = true,
                    "line-number" => options.line_numbers = true,
                    "no-line-number" => options.line_numbers = false,
                    "regexp" => {
                        let value = tokens
                            .next()
                            .ok_or_else(|| rg_error!(config, "args", "--regexp requires a pattern"))?;
                        set_pattern(&mut pattern, value)?;
                    }
                    _ => match long.strip_prefix("regexp=") {
                        Some(value) => set_pattern(&mut pattern, value)?,
                        None => {
                            return Err(rg_error!(config, "args", format!("Unknown flag: {arg}")));
                        }
                    },
                }
            } else {
                let flags = &arg[1..];
                for (i, flag) in flags.char_indices() {
                    match flag {
                        'i' => options.case_insensitive = true,
                        'w' => options.word_boundary = true,
                        'F' => options.fixed_strings = true,
                        'n' => options.line_numbers = true,
                        'e' => {
                            // `-ePATTERN` or `-e PATTERN`
                            let attached = &flags[i + flag.len_utf8()..];
                            if attached.is_empty() {
                                let value = tokens
                                    .next()
                                    .ok_or_else(|| rg_error!(config, "args", "-e requires a pattern"))?;
                                set_pattern(&mut pattern, value)?;
                            } else {
                                set_pattern(&mut pattern, attached)?;
                            }
                            break;
                        }
                        _ => {
                            return Err(rg_error!(config, "args", format!("Unknown flag: -{flag}")));
                        }
                    }
                }
            }
        }

        let pattern = pattern.ok_or_else(|| rg_error!(config, "args", "No pattern provided"))?;
        log::debug!("Parsed grep args: pattern={pattern:?}, options={options:?}");
        Ok(Self { pattern, options })
    }
}

fn set_pattern(slot: &mut Option<String>, value: &str) -> Result<()> {
    if slot.is_some() {
        return Err(rg_error!(config, "args", format!("Unexpected argument: {value}")));
    }
    *slot = Some(value.to_string());
    Ok(())
}
