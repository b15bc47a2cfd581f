use std::fmt;

/// Errors raised while executing bytecode
#[derive(Debug, Clone, PartialEq)]
pub enum VmError {
    /// Division where the divisor evaluated to exactly zero
    DivideByZero,
    /// The interpreter only runs straight-line code; control flow and
    /// function machinery surface here by mnemonic
    UnsupportedInstruction(String),
    /// An operation needed more operands than the stack held
    StackUnderflow(String),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::DivideByZero => write!(f, "runtime error: division by zero"),
            VmError::UnsupportedInstruction(mnemonic) => {
                write!(f, "runtime error: unsupported instruction {mnemonic}")
            }
            VmError::StackUnderflow(mnemonic) => {
                write!(f, "runtime error: stack underflow in {mnemonic}")
            }
        }
    }
}

impl std::error::Error for VmError {}
