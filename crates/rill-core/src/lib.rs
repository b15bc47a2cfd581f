pub mod asm;
pub mod ast;
pub mod bytecode;
pub mod diagnostics;
pub mod parser;
pub mod pipeline;
pub mod simplify;
pub mod vm;

// Re-export commonly used types for convenience
pub use ast::{BinaryOp, Expr, Program, Stmt};
pub use bytecode::ir::{Bytecode, Instruction};
pub use diagnostics::{Diagnostic, Severity};
pub use pipeline::Pipeline;
