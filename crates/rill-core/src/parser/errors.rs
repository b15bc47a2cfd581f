//! Error formatting for parser errors
//!
//! Converts Chumsky parser errors into user-friendly diagnostic messages

use crate::diagnostics::{Diagnostic, DiagnosticKind, Span};
use chumsky::error::{Rich, RichReason};

/// Convert Chumsky error reason to readable message
pub fn format_error_reason(reason: &RichReason<char>) -> String {
    match reason {
        RichReason::ExpectedFound { expected, found } => {
            let found_msg = match found {
                Some(c) => format!("'{}'", c.escape_debug()),
                None => "end of input".to_string(),
            };

            if expected.is_empty() {
                format!("unexpected {found_msg}")
            } else if found.is_none() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected {found_msg}")
            }
        }
        RichReason::Custom(msg) => msg.to_string(),
    }
}

/// Convert Chumsky parse errors to Rill diagnostics
pub fn errors_to_diagnostics(
    errors: Vec<Rich<char>>,
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    errors
        .into_iter()
        .map(|e| {
            let span = Span::from_chumsky(*e.span());
            let message = format_error_reason(e.reason());
            let mut diag = Diagnostic::error(
                DiagnosticKind::Parse,
                message.clone(),
                span,
                filename.to_string(),
            );

            if message == "unexpected end of input" {
                diag = diag.with_help(eof_help(source));
            }

            diag
        })
        .collect()
}

/// Best-effort hint for truncated input: count unclosed parentheses and
/// unterminated `def`/`while`/`for` blocks to suggest what is missing.
fn eof_help(source: &str) -> String {
    let mut open_parens = 0usize;
    for ch in source.chars() {
        match ch {
            '(' => open_parens += 1,
            ')' => open_parens = open_parens.saturating_sub(1),
            _ => {}
        }
    }

    let mut open_blocks = 0usize;
    for word in source.split(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        match word {
            "def" | "while" | "for" => open_blocks += 1,
            "end" => open_blocks = open_blocks.saturating_sub(1),
            _ => {}
        }
    }

    if open_parens > 0 {
        format!("missing {open_parens} closing ')'")
    } else if open_blocks > 0 {
        format!("missing {open_blocks} closing 'end'")
    } else {
        "did you forget to close a block with 'end'?".to_string()
    }
}
