use crate::ast::Expr;
use chumsky::prelude::*;

/// Creates a parser for number literals (integer or decimal, parsed to f64)
pub fn number<'a, WS>(ws: WS) -> impl Parser<'a, &'a str, Expr, extra::Err<Rich<'a, char>>> + Clone
where
    WS: Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone + 'a,
{
    text::int(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .try_map(|s: &str, span| {
            s.parse::<f64>()
                .map(|value| Expr::Number { value })
                .map_err(|_| Rich::custom(span, format!("invalid number literal '{s}'")))
        })
        .padded_by(ws)
}
