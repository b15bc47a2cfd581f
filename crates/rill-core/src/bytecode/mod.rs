pub mod compile;
pub mod ir;

pub use compile::{generate, generate_expression};
pub use ir::{Bytecode, Instruction};
