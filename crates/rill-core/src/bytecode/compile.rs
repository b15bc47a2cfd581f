//! Lowering from the AST to stack bytecode
//!
//! Expressions compile post-order (operands before operator) and net exactly
//! one stack value; statements net zero. Loops lower to one entry and one
//! exit label each; function bodies compile into their own isolated
//! instruction blocks and emit nothing into the enclosing sequence.

use super::ir::{Bytecode, Instruction};
use crate::ast::{BinaryOp, Expr, Program, Stmt};

/// Compile a program (already simplified) to bytecode
pub fn generate(program: &Program) -> Bytecode {
    let mut c = CodeGen::new();
    for stmt in &program.statements {
        c.emit_stmt(stmt);
    }
    Bytecode {
        functions: c.functions,
        main: c.code,
    }
}

/// Compile a single expression to a bare instruction sequence, with no
/// trailing `POP`: the result stays on the stack for the caller to read.
pub fn generate_expression(expr: &Expr) -> Vec<Instruction> {
    let mut c = CodeGen::new();
    c.emit_expr(expr);
    c.code
}

struct CodeGen {
    code: Vec<Instruction>,
    /// Registered functions, in definition order; finalization relies on it
    functions: Vec<(String, Vec<Instruction>)>,
    /// Label counter owned by this compilation run, never shared
    labels: usize,
}

impl CodeGen {
    fn new() -> Self {
        Self {
            code: Vec::new(),
            functions: Vec::new(),
            labels: 0,
        }
    }

    fn new_label(&mut self, base: &str) -> String {
        let label = format!("{base}_{}", self.labels);
        self.labels += 1;
        label
    }

    fn emit(&mut self, instr: Instruction) {
        self.code.push(instr);
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Number { value } => self.emit(Instruction::Push(*value)),
            Expr::Identifier { name } => self.emit(Instruction::Load(name.clone())),
            Expr::Binary { left, op, right } => {
                self.emit_expr(left);
                self.emit_expr(right);
                self.emit(match op {
                    BinaryOp::Add => Instruction::Add,
                    BinaryOp::Sub => Instruction::Sub,
                    BinaryOp::Mul => Instruction::Mul,
                    BinaryOp::Div => Instruction::Div,
                    BinaryOp::Pow => Instruction::Pow,
                });
            }
            Expr::Neg { operand } => {
                self.emit_expr(operand);
                self.emit(Instruction::Neg);
            }
            Expr::Call { callee, arguments } => {
                for arg in arguments {
                    self.emit_expr(arg);
                }
                self.emit(Instruction::Call(callee.clone()));
            }
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::ExprStmt { expr } => {
                self.emit_expr(expr);
                self.emit(Instruction::Pop);
            }
            Stmt::Assign { name, value } => {
                self.emit_expr(value);
                self.emit(Instruction::Store(name.clone()));
            }
            Stmt::Return { value } => {
                self.emit_expr(value);
                self.emit(Instruction::Ret);
            }
            Stmt::While { condition, body } => {
                let start = self.new_label("while_start");
                let end = self.new_label("while_end");
                self.emit(Instruction::Label(start.clone()));
                self.emit_expr(condition);
                self.emit(Instruction::Jz(end.clone()));
                for sub in body {
                    self.emit_stmt(sub);
                }
                self.emit(Instruction::Jmp(start));
                self.emit(Instruction::Label(end));
            }
            Stmt::For {
                var,
                start,
                end,
                body,
            } => {
                // var = start
                self.emit_expr(start);
                self.emit(Instruction::Store(var.clone()));
                let loop_start = self.new_label("for_start");
                let loop_end = self.new_label("for_end");
                self.emit(Instruction::Label(loop_start.clone()));
                // Terminate once var > end; the loop runs while var <= end
                self.emit(Instruction::Load(var.clone()));
                self.emit_expr(end);
                self.emit(Instruction::Gt);
                self.emit(Instruction::Jz(loop_end.clone()));
                for sub in body {
                    self.emit_stmt(sub);
                }
                // var = var + 1
                self.emit(Instruction::Load(var.clone()));
                self.emit(Instruction::Push(1.0));
                self.emit(Instruction::Add);
                self.emit(Instruction::Store(var.clone()));
                self.emit(Instruction::Jmp(loop_start));
                self.emit(Instruction::Label(loop_end));
            }
            Stmt::FunctionDef { name, body, .. } => {
                // Compile into an isolated block; the label counter is
                // shared, the instruction buffer is not.
                let enclosing = std::mem::take(&mut self.code);
                self.emit(Instruction::PushFrame);
                for sub in body {
                    self.emit_stmt(sub);
                }
                self.emit(Instruction::PopFrame);
                self.emit(Instruction::Ret);
                let compiled = std::mem::replace(&mut self.code, enclosing);
                self.functions.push((name.clone(), compiled));
            }
        }
    }
}
