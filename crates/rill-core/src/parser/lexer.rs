use chumsky::prelude::*;

/// Parser for inline whitespace (spaces and tabs).
///
/// Newlines terminate statements in Rill, so this deliberately does not
/// consume them; the statement grammar owns `'\n'`.
pub fn ws<'a>() -> impl Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone {
    one_of(" \t").ignored().repeated()
}

/// List of reserved keywords
pub const KEYWORDS: &[&str] = &["def", "while", "for", "end", "return"];
