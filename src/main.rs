//! `memgrep` command line
//!
//! Usage: `memgrep <operation> < request.json`
//!
//! The request document on stdin carries the operation's arguments. The
//! result JSON goes to stdout; an engine error is written to stdout as its
//! JSON payload with exit code 1. Usage and I/O problems exit with 2.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use memgrep::json::{self, Operation};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("memgrep: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn usage() -> String {
    let ops: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
    format!("usage: memgrep <{}> < request.json", ops.join("|"))
}

fn run() -> Result<ExitCode> {
    let mut args = std::env::args().skip(1);
    let operation = match (args.next(), args.next()) {
        (Some(op), None) if op == "-h" || op == "--help" => {
            println!("{}", usage());
            return Ok(ExitCode::SUCCESS);
        }
        (Some(op), None) => op
            .parse::<Operation>()
            .map_err(anyhow::Error::msg)
            .with_context(usage)?,
        _ => bail!("{}", usage()),
    };

    let mut request = String::new();
    io::stdin()
        .read_to_string(&mut request)
        .context("failed to read request from stdin")?;

    let (payload, code) = match json::dispatch(operation, &request) {
        Ok(output) => (output, ExitCode::SUCCESS),
        Err(e) => {
            log::debug!("{operation} failed with {}: {}", e.kind_name(), e.message);
            (e.to_json(), ExitCode::from(1))
        }
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{payload}").context("failed to write result")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(code)
}
