use crate::ast::BinaryOp;
use chumsky::prelude::*;

/// Creates a parser for the sum-level operators (+ and -)
pub fn sum_op<'a, WS>(
    ws: WS,
) -> impl Parser<'a, &'a str, BinaryOp, extra::Err<Rich<'a, char>>> + Clone
where
    WS: Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone + 'a,
{
    let op = |c| just(c).padded_by(ws.clone());
    choice((op('+').to(BinaryOp::Add), op('-').to(BinaryOp::Sub)))
}

/// Creates a parser for the product-level operators (* and /)
pub fn product_op<'a, WS>(
    ws: WS,
) -> impl Parser<'a, &'a str, BinaryOp, extra::Err<Rich<'a, char>>> + Clone
where
    WS: Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone + 'a,
{
    let op = |c| just(c).padded_by(ws.clone());
    choice((op('*').to(BinaryOp::Mul), op('/').to(BinaryOp::Div)))
}

/// Creates a parser for the power operator (^).
///
/// Power chains associate left-to-right in Rill, unlike the usual
/// mathematical convention; the fold in the expression grammar relies on it.
pub fn power_op<'a, WS>(
    ws: WS,
) -> impl Parser<'a, &'a str, BinaryOp, extra::Err<Rich<'a, char>>> + Clone
where
    WS: Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone + 'a,
{
    just('^').padded_by(ws).to(BinaryOp::Pow)
}
