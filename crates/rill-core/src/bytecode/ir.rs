use serde::{Deserialize, Serialize};
use std::fmt;

/// A single stack-machine instruction.
///
/// The textual form (`Display`) is the interchange format between the code
/// generator and both backends: one instruction per line, mnemonic first,
/// space-separated operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Push(f64),
    Load(String),
    Store(String),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    /// Strictly-greater-than comparison, pushes 1.0 or 0.0; emitted by
    /// `for`-loop lowering as the termination test
    Gt,
    Pop,
    Call(String),
    Ret,
    /// Jump to label when the popped value is zero
    Jz(String),
    Jmp(String),
    Label(String),
    PushFrame,
    PopFrame,
    /// Start of a named function block in the flattened listing
    FuncBegin(String),
    FuncEnd(String),
    Halt,
}

impl Instruction {
    /// The bare mnemonic, without operands
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Push(_) => "PUSH",
            Instruction::Load(_) => "LOAD",
            Instruction::Store(_) => "STORE",
            Instruction::Add => "ADD",
            Instruction::Sub => "SUB",
            Instruction::Mul => "MUL",
            Instruction::Div => "DIV",
            Instruction::Pow => "POW",
            Instruction::Neg => "NEG",
            Instruction::Gt => "GT",
            Instruction::Pop => "POP",
            Instruction::Call(_) => "CALL",
            Instruction::Ret => "RET",
            Instruction::Jz(_) => "JZ",
            Instruction::Jmp(_) => "JMP",
            Instruction::Label(_) => "LABEL",
            Instruction::PushFrame => "PUSH_FRAME",
            Instruction::PopFrame => "POP_FRAME",
            Instruction::FuncBegin(_) => "FUNC",
            Instruction::FuncEnd(_) => "END_FUNC",
            Instruction::Halt => "HALT",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(v) => write!(f, "PUSH {v}"),
            Instruction::Load(name) => write!(f, "LOAD {name}"),
            Instruction::Store(name) => write!(f, "STORE {name}"),
            Instruction::Call(name) => write!(f, "CALL {name}"),
            Instruction::Jz(label) => write!(f, "JZ {label}"),
            Instruction::Jmp(label) => write!(f, "JMP {label}"),
            Instruction::Label(label) => write!(f, "LABEL {label}"),
            Instruction::FuncBegin(name) => write!(f, "FUNC {name}"),
            Instruction::FuncEnd(name) => write!(f, "END_FUNC {name}"),
            other => write!(f, "{}", other.mnemonic()),
        }
    }
}

/// A compiled program: one instruction sequence per function, in
/// registration order, plus the top-level "main" sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bytecode {
    pub functions: Vec<(String, Vec<Instruction>)>,
    pub main: Vec<Instruction>,
}

impl Bytecode {
    /// Produce the finalized flat listing consumed by the native emitter:
    /// each function as a `FUNC name` .. `END_FUNC name` block, then the
    /// top level as a function literally named "main", then `CALL main`
    /// and `HALT`.
    pub fn flatten(&self) -> Vec<Instruction> {
        let mut out = Vec::new();
        for (name, code) in &self.functions {
            out.push(Instruction::FuncBegin(name.clone()));
            out.extend(code.iter().cloned());
            out.push(Instruction::FuncEnd(name.clone()));
        }
        out.push(Instruction::FuncBegin("main".to_string()));
        out.extend(self.main.iter().cloned());
        out.push(Instruction::FuncEnd("main".to_string()));
        out.push(Instruction::Call("main".to_string()));
        out.push(Instruction::Halt);
        out
    }

    /// Render the flattened listing in the textual interchange form
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for instr in self.flatten() {
            out.push_str(&instr.to_string());
            out.push('\n');
        }
        out
    }
}
