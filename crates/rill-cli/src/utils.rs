//! Shared CLI utilities for reading input and formatting errors

use rill_core::diagnostics::Diagnostic;
use std::fs;
use std::io::{self, Read};

/// Read source code from a file or stdin.
/// If `file` is "-", reads from stdin. Otherwise reads from the specified file.
pub fn read_source(file: &str) -> io::Result<String> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

/// Format and print parse errors to stderr
pub fn format_parse_errors(errors: &[Diagnostic], source: &str) {
    for error in errors {
        eprintln!("{}", error.format(source));
    }
}

/// Parse a `NAME=VALUE` variable definition from the command line
pub fn parse_define(define: &str) -> Result<(String, f64), String> {
    let Some((name, value)) = define.split_once('=') else {
        return Err(format!("invalid define '{define}', expected NAME=VALUE"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid define '{define}', empty variable name"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid define '{define}', value is not a number"))?;
    Ok((name.to_string(), value))
}
