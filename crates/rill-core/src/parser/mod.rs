use crate::ast::{Expr, Program, Stmt};
use crate::diagnostics::Diagnostic;
use chumsky::prelude::*;

mod errors;
mod lexer;
mod literals;
mod operators;

/// Builds the expression grammar.
///
/// Precedence, lowest to highest: sum (`+`/`-`) -> product (`*`/`/`) ->
/// power (`^`, left-associative) -> primary (parenthesized expression,
/// number, identifier, call, unary minus on a primary). All tokens are
/// padded by inline whitespace only; newlines belong to the statement
/// grammar.
fn expression<'a>() -> Boxed<'a, 'a, &'a str, Expr, extra::Err<Rich<'a, char>>> {
    let ws = lexer::ws();

    let ident = text::ident()
        .try_map(move |s: &str, span| {
            if lexer::KEYWORDS.contains(&s) {
                Err(Rich::custom(
                    span,
                    format!("'{s}' is a keyword and cannot be used as an identifier"),
                ))
            } else {
                Ok(s)
            }
        })
        .padded_by(ws.clone());

    let number = literals::number(ws.clone());

    let mut expr_ref = Recursive::declare();
    let mut primary_ref = Recursive::declare();

    // Parenthesized expressions - allows precedence override
    let paren_expr = expr_ref.clone().delimited_by(
        just('(').padded_by(ws.clone()),
        just(')').padded_by(ws.clone()),
    );

    // An identifier is a call when followed by an argument list, otherwise a
    // variable reference
    let call_args = expr_ref
        .clone()
        .separated_by(just(',').padded_by(ws.clone()))
        .collect::<Vec<Expr>>()
        .delimited_by(
            just('(').padded_by(ws.clone()),
            just(')').padded_by(ws.clone()),
        );

    let ident_or_call = ident
        .clone()
        .then(call_args.or_not())
        .map(|(name, args): (&str, Option<Vec<Expr>>)| match args {
            Some(arguments) => Expr::Call {
                callee: name.to_string(),
                arguments,
            },
            None => Expr::Identifier {
                name: name.to_string(),
            },
        });

    // Unary minus applies to a primary, so -x ^ 2 parses as (-x) ^ 2
    let neg = just('-')
        .padded_by(ws.clone())
        .ignore_then(primary_ref.clone())
        .map(|operand| Expr::Neg {
            operand: Box::new(operand),
        });

    primary_ref.define(choice((paren_expr, number, ident_or_call, neg)).boxed());

    let power = primary_ref
        .clone()
        .then(
            operators::power_op(ws.clone())
                .then(primary_ref.clone())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(mut left, ops)| {
            for (op, right) in ops {
                left = Expr::binary(left, op, right);
            }
            left
        })
        .boxed();

    let product = power
        .clone()
        .then(
            operators::product_op(ws.clone())
                .then(power.clone())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(mut left, ops)| {
            for (op, right) in ops {
                left = Expr::binary(left, op, right);
            }
            left
        })
        .boxed();

    let sum = product
        .clone()
        .then(
            operators::sum_op(ws.clone())
                .then(product.clone())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(mut left, ops)| {
            for (op, right) in ops {
                left = Expr::binary(left, op, right);
            }
            left
        })
        .boxed();

    expr_ref.define(sum);

    expr_ref.boxed()
}

pub fn parser<'a>() -> impl Parser<'a, &'a str, Program, extra::Err<Rich<'a, char>>> {
    let ws = lexer::ws();

    let expr = expression();

    let ident = text::ident()
        .try_map(move |s: &str, span| {
            if lexer::KEYWORDS.contains(&s) {
                Err(Rich::custom(
                    span,
                    format!("'{s}' is a keyword and cannot be used as an identifier"),
                ))
            } else {
                Ok(s)
            }
        })
        .padded_by(ws.clone());

    // Keywords match a whole identifier, so `define` is never read as `def`
    let kw = |word: &'static str| {
        text::ident()
            .try_map(move |s: &str, span| {
                if s == word {
                    Ok(())
                } else {
                    Err(Rich::custom(span, format!("expected '{word}'")))
                }
            })
            .padded_by(ws.clone())
    };

    // Every non-block statement is terminated by a single newline, which the
    // statement parser consumes. End of input stands in for the final one.
    let line_term = ws
        .clone()
        .then(choice((just('\n').ignored(), end())))
        .ignored();

    // A blank line: inline whitespace followed by a newline
    let blanks = ws.clone().then(just('\n')).ignored().repeated();

    let mut stmt_ref = Recursive::declare();

    let body = blanks.clone().ignore_then(
        stmt_ref
            .clone()
            .then_ignore(blanks.clone())
            .repeated()
            .collect::<Vec<Stmt>>(),
    );

    // Blocks close with a line reading exactly `end`
    let end_kw = kw("end").then_ignore(line_term.clone());

    let params = ident
        .clone()
        .separated_by(just(',').padded_by(ws.clone()))
        .collect::<Vec<&str>>()
        .delimited_by(
            just('(').padded_by(ws.clone()),
            just(')').padded_by(ws.clone()),
        );

    let def_stmt = kw("def")
        .ignore_then(ident.clone())
        .then(params)
        .then_ignore(line_term.clone())
        .then(body.clone())
        .then_ignore(end_kw.clone())
        .map(|((name, params), body): ((&str, Vec<&str>), Vec<Stmt>)| Stmt::FunctionDef {
            name: name.to_string(),
            params: params.into_iter().map(str::to_string).collect(),
            body,
        });

    let while_stmt = kw("while")
        .ignore_then(expr.clone())
        .then_ignore(just(':').padded_by(ws.clone()))
        .then_ignore(line_term.clone())
        .then(body.clone())
        .then_ignore(end_kw.clone())
        .map(|(condition, body)| Stmt::While { condition, body });

    let for_stmt = kw("for")
        .ignore_then(ident.clone())
        .then_ignore(just('=').padded_by(ws.clone()))
        .then(expr.clone())
        .then_ignore(just(':').padded_by(ws.clone()))
        .then(expr.clone())
        .then_ignore(just(':').padded_by(ws.clone()))
        .then_ignore(line_term.clone())
        .then(body.clone())
        .then_ignore(end_kw.clone())
        .map(|(((var, start), end), body): (((&str, Expr), Expr), Vec<Stmt>)| Stmt::For {
            var: var.to_string(),
            start,
            end,
            body,
        });

    let return_stmt = kw("return")
        .ignore_then(expr.clone())
        .then_ignore(line_term.clone())
        .map(|value| Stmt::Return { value });

    // Disambiguated from an expression statement by the '=' after the
    // leading identifier
    let assignment = ident
        .clone()
        .then_ignore(just('=').padded_by(ws.clone()))
        .then(expr.clone())
        .then_ignore(line_term.clone())
        .map(|(name, value): (&str, Expr)| Stmt::Assign {
            name: name.to_string(),
            value,
        });

    let expr_stmt = expr
        .clone()
        .then_ignore(line_term.clone())
        .map(|expr| Stmt::ExprStmt { expr });

    let stmt = choice((
        def_stmt, while_stmt, for_stmt, return_stmt, assignment, expr_stmt,
    ))
    .boxed();

    stmt_ref.define(stmt);

    blanks
        .clone()
        .ignore_then(
            stmt_ref
                .clone()
                .then_ignore(blanks.clone())
                .repeated()
                .collect::<Vec<Stmt>>(),
        )
        .then_ignore(ws.clone())
        .then_ignore(end())
        .map(|statements| Program { statements })
}

/// Parse a full program into a statement list.
///
/// The first error aborts the parse; no partial AST is returned.
pub fn parse(source: &str, filename: &str) -> Result<Program, Vec<Diagnostic>> {
    let (output, errs) = parser().parse(source).into_output_errors();

    if errs.is_empty() {
        Ok(output.expect("Parser should produce output when no errors"))
    } else {
        Err(errors::errors_to_diagnostics(errs, filename, source))
    }
}

/// Parse a single expression, requiring it to consume all significant input
pub fn parse_expression(source: &str, filename: &str) -> Result<Expr, Vec<Diagnostic>> {
    let full = expression().then_ignore(lexer::ws()).then_ignore(end());
    let (output, errs) = full.parse(source).into_output_errors();

    if errs.is_empty() {
        Ok(output.expect("Parser should produce output when no errors"))
    } else {
        Err(errors::errors_to_diagnostics(errs, filename, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn parse_expr(source: &str) -> Expr {
        parse_expression(source, "test.rill").expect("Parse failed")
    }

    fn parse_stmt(source: &str) -> Stmt {
        let program = parse(source, "test.rill").expect("Parse failed");
        program.statements.into_iter().next().expect("no statement")
    }

    // ===== Expression Tests =====

    #[test]
    fn test_parse_number_literal() {
        let expr = parse_expr("42");
        assert!(matches!(expr, Expr::Number { value } if (value - 42.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_parse_float_literal() {
        let expr = parse_expr("3.25");
        assert!(matches!(expr, Expr::Number { value } if (value - 3.25).abs() < f64::EPSILON));
    }

    #[test]
    fn test_parse_identifier() {
        let expr = parse_expr("count");
        assert!(matches!(expr, Expr::Identifier { name } if name == "count"));
    }

    #[test]
    fn test_parse_precedence_product_before_sum() {
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Add,
                right,
            } => {
                assert!(left.is_literal(1.0));
                assert!(matches!(
                    *right,
                    Expr::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("Expected addition with multiplication on right, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_parentheses_override_precedence() {
        let expr = parse_expr("(1 + 2) * 3");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Mul,
                right,
            } => {
                assert!(matches!(
                    *left,
                    Expr::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
                assert!(right.is_literal(3.0));
            }
            other => panic!("Expected multiplication with addition on left, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_spec_scenario_tree_shape() {
        // 3 + 4 * (2 - 1) => Add(3, Mul(4, Sub(2, 1)))
        let expr = parse_expr("3 + 4 * (2 - 1)");
        let expected = Expr::binary(
            Expr::number(3.0),
            BinaryOp::Add,
            Expr::binary(
                Expr::number(4.0),
                BinaryOp::Mul,
                Expr::binary(Expr::number(2.0), BinaryOp::Sub, Expr::number(1.0)),
            ),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_power_binds_tighter_than_product() {
        let expr = parse_expr("2 * x ^ 2");
        match expr {
            Expr::Binary {
                op: BinaryOp::Mul,
                right,
                ..
            } => {
                assert!(matches!(
                    *right,
                    Expr::Binary {
                        op: BinaryOp::Pow,
                        ..
                    }
                ));
            }
            other => panic!("Expected Mul with Pow on right, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_power_is_left_associative() {
        // 2 ^ 3 ^ 2 => (2 ^ 3) ^ 2 in this grammar
        let expr = parse_expr("2 ^ 3 ^ 2");
        let expected = Expr::binary(
            Expr::binary(Expr::number(2.0), BinaryOp::Pow, Expr::number(3.0)),
            BinaryOp::Pow,
            Expr::number(2.0),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_sum_is_left_associative() {
        let expr = parse_expr("1 - 2 - 3");
        let expected = Expr::binary(
            Expr::binary(Expr::number(1.0), BinaryOp::Sub, Expr::number(2.0)),
            BinaryOp::Sub,
            Expr::number(3.0),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_unary_minus_on_primary() {
        // -x ^ 2 => (-x) ^ 2: negation applies to the primary
        let expr = parse_expr("-x ^ 2");
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Pow,
                ..
            } => {
                assert!(matches!(*left, Expr::Neg { .. }));
            }
            other => panic!("Expected Pow with Neg base, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unary_minus_on_parenthesized() {
        let expr = parse_expr("-(a + b)");
        match expr {
            Expr::Neg { operand } => {
                assert!(matches!(
                    *operand,
                    Expr::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
            }
            other => panic!("Expected negation, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_call_with_arguments() {
        let expr = parse_expr("square(x + 1, 2)");
        match expr {
            Expr::Call { callee, arguments } => {
                assert_eq!(callee, "square");
                assert_eq!(arguments.len(), 2);
            }
            other => panic!("Expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_call_no_arguments() {
        let expr = parse_expr("init()");
        assert!(matches!(expr, Expr::Call { callee, arguments } if callee == "init" && arguments.is_empty()));
    }

    #[test]
    fn test_parse_nested_call() {
        let expr = parse_expr("f(g(1))");
        match expr {
            Expr::Call { callee, arguments } => {
                assert_eq!(callee, "f");
                assert!(matches!(&arguments[0], Expr::Call { callee, .. } if callee == "g"));
            }
            other => panic!("Expected call, got {other:?}"),
        }
    }

    // ===== Statement Tests =====

    #[test]
    fn test_parse_assignment() {
        let stmt = parse_stmt("x = 1 + 2\n");
        assert!(matches!(stmt, Stmt::Assign { name, .. } if name == "x"));
    }

    #[test]
    fn test_parse_expression_statement() {
        let stmt = parse_stmt("f(3)\n");
        assert!(matches!(stmt, Stmt::ExprStmt { expr: Expr::Call { .. } }));
    }

    #[test]
    fn test_parse_return_statement() {
        let stmt = parse_stmt("return x * x\n");
        assert!(matches!(stmt, Stmt::Return { .. }));
    }

    #[test]
    fn test_parse_while_statement() {
        let stmt = parse_stmt("while n:\n    n = n - 1\nend\n");
        match stmt {
            Stmt::While { condition, body } => {
                assert!(matches!(condition, Expr::Identifier { name } if name == "n"));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_for_statement() {
        let stmt = parse_stmt("for i = 1 : 10 :\n    s = s + i\nend\n");
        match stmt {
            Stmt::For {
                var, start, end, body,
            } => {
                assert_eq!(var, "i");
                assert!(start.is_literal(1.0));
                assert!(end.is_literal(10.0));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_definition() {
        let stmt = parse_stmt("def square(x)\n    return x * x\nend\n");
        match stmt {
            Stmt::FunctionDef { name, params, body } => {
                assert_eq!(name, "square");
                assert_eq!(params, vec!["x".to_string()]);
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0], Stmt::Return { .. }));
            }
            other => panic!("Expected function definition, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_with_multiple_params() {
        let stmt = parse_stmt("def add(a, b)\n    return a + b\nend\n");
        match stmt {
            Stmt::FunctionDef { params, .. } => {
                assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("Expected function definition, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_blocks() {
        let source = "def count(n)\n    while n:\n        n = n - 1\n    end\n    return n\nend\n";
        let stmt = parse_stmt(source);
        match stmt {
            Stmt::FunctionDef { body, .. } => {
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Stmt::While { .. }));
                assert!(matches!(body[1], Stmt::Return { .. }));
            }
            other => panic!("Expected function definition, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_multiple_statements() {
        let program = parse("a = 3\nb = a * 2\nb\n", "test.rill").expect("Parse failed");
        assert_eq!(program.statements.len(), 3);
        assert!(matches!(program.statements[2], Stmt::ExprStmt { .. }));
    }

    #[test]
    fn test_parse_blank_lines_between_statements() {
        let program = parse("a = 1\n\n\nb = 2\n", "test.rill").expect("Parse failed");
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_parse_missing_trailing_newline() {
        let program = parse("x = 5", "test.rill").expect("Parse failed");
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_parse_identifier_starting_with_keyword() {
        // `define` and `forward` are identifiers, not keyword prefixes
        let program = parse("define = 1\nforward = 2\n", "test.rill").expect("Parse failed");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(&program.statements[0], Stmt::Assign { name, .. } if name == "define"));
    }

    // ===== Error Tests =====

    #[test]
    fn test_parse_error_unexpected_character() {
        let result = parse("3 + $\n", "test.rill");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_error_dangling_operator() {
        let result = parse_expression("3 +", "test.rill");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_error_keyword_as_identifier() {
        let result = parse("end = 3\n", "test.rill");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_error_unclosed_block() {
        let result = parse("while x:\n    x = x - 1\n", "test.rill");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_error_malformed_call_arguments() {
        let result = parse_expression("f(1,)", "test.rill");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_error_carries_position() {
        let errs = parse("x = 1\ny = $\n", "test.rill").unwrap_err();
        assert!(!errs.is_empty());
        // Offset of '$' in the source
        assert!(errs[0].span.start >= 10);
    }

    #[test]
    fn test_parse_expression_requires_full_consumption() {
        let result = parse_expression("1 + 2 junk", "test.rill");
        assert!(result.is_err());
    }
}
