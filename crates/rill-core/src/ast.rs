//! Abstract Syntax Tree definitions for Rill
//!
//! Expressions and statements are closed sum types; every consumer matches
//! exhaustively, so an unhandled node kind is a compile error rather than a
//! runtime one. Trees are pure data: each node exclusively owns its children.

use serde::{Deserialize, Serialize};

/// Binary operators
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Expr {
    Number {
        value: f64,
    },
    Identifier {
        name: String,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Unary arithmetic negation
    Neg {
        operand: Box<Expr>,
    },
    Call {
        callee: String,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Number { value }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// True for a numeric literal equal to `value` exactly
    pub fn is_literal(&self, value: f64) -> bool {
        matches!(self, Expr::Number { value: v } if *v == value)
    }
}

/// Statement types
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// Expression evaluated for effect; its value is discarded
    ExprStmt {
        expr: Expr,
    },
    Assign {
        name: String,
        value: Expr,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    Return {
        value: Expr,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    /// `for var = start : end : ... end`; runs while `var <= end`
    For {
        var: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
