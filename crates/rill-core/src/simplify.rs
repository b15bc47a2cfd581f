//! Algebraic simplification of expression trees
//!
//! Pure bottom-up rewriting: children are simplified before the parent is
//! inspected, constants are folded, and multiplicative/additive identities
//! are eliminated. The input tree is never mutated; callers get a fresh,
//! semantically equivalent tree. Applying the pass twice equals applying it
//! once.

use crate::ast::{BinaryOp, Expr, Program, Stmt};

/// Simplify a single expression
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Number { .. } | Expr::Identifier { .. } => expr.clone(),
        Expr::Binary { left, op, right } => {
            let l = simplify(left);
            let r = simplify(right);
            simplify_binary(l, *op, r)
        }
        Expr::Neg { operand } => {
            let inner = simplify(operand);
            if let Expr::Number { value } = inner {
                Expr::number(-value)
            } else {
                Expr::Neg {
                    operand: Box::new(inner),
                }
            }
        }
        Expr::Call { callee, arguments } => Expr::Call {
            callee: callee.clone(),
            arguments: arguments.iter().map(simplify).collect(),
        },
    }
}

fn simplify_binary(l: Expr, op: BinaryOp, r: Expr) -> Expr {
    // Constant folding. Division by a literal zero is left alone so the
    // failure surfaces at run time, not during simplification.
    if let (Expr::Number { value: a }, Expr::Number { value: b }) = (&l, &r) {
        let folded = match op {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Sub => Some(a - b),
            BinaryOp::Mul => Some(a * b),
            BinaryOp::Div => (*b != 0.0).then(|| a / b),
            BinaryOp::Pow => Some(a.powf(*b)),
        };
        if let Some(value) = folded {
            return Expr::number(value);
        }
    }

    match op {
        BinaryOp::Add => {
            if r.is_literal(0.0) {
                return l;
            }
            if l.is_literal(0.0) {
                return r;
            }
        }
        BinaryOp::Sub => {
            if r.is_literal(0.0) {
                return l;
            }
        }
        BinaryOp::Mul => {
            if r.is_literal(1.0) {
                return l;
            }
            if r.is_literal(0.0) || l.is_literal(0.0) {
                return Expr::number(0.0);
            }
            if l.is_literal(1.0) {
                return r;
            }
        }
        BinaryOp::Div => {
            if r.is_literal(1.0) {
                return l;
            }
        }
        BinaryOp::Pow => {
            if r.is_literal(1.0) {
                return l;
            }
            if r.is_literal(0.0) {
                return Expr::number(1.0);
            }
        }
    }

    Expr::binary(l, op, r)
}

/// Simplify every reducible expression in a statement list.
///
/// Recurses into assignment and expression-statement values, loop
/// conditions and bounds, and nested function/loop bodies. Return
/// statements pass through untouched.
pub fn simplify_stmts(stmts: &[Stmt]) -> Vec<Stmt> {
    stmts
        .iter()
        .map(|s| match s {
            Stmt::ExprStmt { expr } => Stmt::ExprStmt {
                expr: simplify(expr),
            },
            Stmt::Assign { name, value } => Stmt::Assign {
                name: name.clone(),
                value: simplify(value),
            },
            Stmt::FunctionDef { name, params, body } => Stmt::FunctionDef {
                name: name.clone(),
                params: params.clone(),
                body: simplify_stmts(body),
            },
            Stmt::While { condition, body } => Stmt::While {
                condition: simplify(condition),
                body: simplify_stmts(body),
            },
            Stmt::For {
                var,
                start,
                end,
                body,
            } => Stmt::For {
                var: var.clone(),
                start: simplify(start),
                end: simplify(end),
                body: simplify_stmts(body),
            },
            Stmt::Return { .. } => s.clone(),
        })
        .collect()
}

pub fn simplify_program(program: &Program) -> Program {
    Program {
        statements: simplify_stmts(&program.statements),
    }
}
