//! Straight-line bytecode interpreter
//!
//! Executes arithmetic sequences against a variable map. Control flow,
//! calls and frame instructions are out of scope here and report
//! `VmError::UnsupportedInstruction`; programs that need them go through
//! the native backend instead.

mod errors;

pub use errors::VmError;

use crate::bytecode::Instruction;
use std::collections::HashMap;

/// Run a straight-line instruction sequence to completion.
///
/// Loads of unset variables read as `0.0`. Returns the value left on top
/// of the stack, or `0.0` when the sequence leaves the stack empty.
pub fn interpret(
    code: &[Instruction],
    variables: &mut HashMap<String, f64>,
) -> Result<f64, VmError> {
    let mut stack: Vec<f64> = Vec::new();
    for instr in code {
        match instr {
            Instruction::Push(value) => stack.push(*value),
            Instruction::Load(name) => {
                stack.push(variables.get(name).copied().unwrap_or(0.0));
            }
            Instruction::Store(name) => {
                let value = pop(&mut stack, "STORE")?;
                variables.insert(name.clone(), value);
            }
            Instruction::Add => bin_num(&mut stack, "ADD", |a, b| a + b)?,
            Instruction::Sub => bin_num(&mut stack, "SUB", |a, b| a - b)?,
            Instruction::Mul => bin_num(&mut stack, "MUL", |a, b| a * b)?,
            Instruction::Div => {
                let b = pop(&mut stack, "DIV")?;
                let a = pop(&mut stack, "DIV")?;
                if b == 0.0 {
                    return Err(VmError::DivideByZero);
                }
                stack.push(a / b);
            }
            Instruction::Pow => bin_num(&mut stack, "POW", f64::powf)?,
            Instruction::Gt => bin_num(&mut stack, "GT", |a, b| if a > b { 1.0 } else { 0.0 })?,
            Instruction::Neg => {
                let value = pop(&mut stack, "NEG")?;
                stack.push(-value);
            }
            Instruction::Pop => {
                pop(&mut stack, "POP")?;
            }
            other => {
                return Err(VmError::UnsupportedInstruction(other.mnemonic().to_string()));
            }
        }
    }
    Ok(stack.pop().unwrap_or(0.0))
}

fn pop(stack: &mut Vec<f64>, mnemonic: &str) -> Result<f64, VmError> {
    stack
        .pop()
        .ok_or_else(|| VmError::StackUnderflow(mnemonic.to_string()))
}

fn bin_num<F>(stack: &mut Vec<f64>, mnemonic: &str, f: F) -> Result<(), VmError>
where
    F: FnOnce(f64, f64) -> f64,
{
    let b = pop(stack, mnemonic)?;
    let a = pop(stack, mnemonic)?;
    stack.push(f(a, b));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::generate_expression;
    use crate::parser::parse_expression;
    use crate::simplify::simplify;

    fn eval(source: &str, variables: &mut HashMap<String, f64>) -> Result<f64, VmError> {
        let expr = parse_expression(source, "test.rill").expect("Parse failed");
        interpret(&generate_expression(&simplify(&expr)), variables)
    }

    #[test]
    fn test_arithmetic() {
        let mut vars = HashMap::new();
        assert_eq!(eval("3 + 4 * (2 - 1)", &mut vars), Ok(7.0));
        assert_eq!(eval("10 / 4", &mut vars), Ok(2.5));
        assert_eq!(eval("-(2 + 3)", &mut vars), Ok(-5.0));
    }

    #[test]
    fn test_polynomial_with_bound_variable() {
        let mut vars = HashMap::from([("x".to_string(), 5.0)]);
        assert_eq!(eval("x ^ 2 + 3 * x", &mut vars), Ok(40.0));
    }

    #[test]
    fn test_unset_variable_reads_as_zero() {
        let mut vars = HashMap::new();
        assert_eq!(eval("y + 1", &mut vars), Ok(1.0));
    }

    #[test]
    fn test_store_updates_variable_map() {
        let mut vars = HashMap::new();
        let code = vec![
            Instruction::Push(6.0),
            Instruction::Push(7.0),
            Instruction::Mul,
            Instruction::Store("answer".into()),
        ];
        assert_eq!(interpret(&code, &mut vars), Ok(0.0));
        assert_eq!(vars.get("answer"), Some(&42.0));
    }

    #[test]
    fn test_divide_by_zero() {
        let mut vars = HashMap::from([("d".to_string(), 0.0)]);
        assert_eq!(eval("1 / d", &mut vars), Err(VmError::DivideByZero));
    }

    #[test]
    fn test_divide_by_nonzero_variable() {
        let mut vars = HashMap::from([("d".to_string(), 4.0)]);
        assert_eq!(eval("10 / d", &mut vars), Ok(2.5));
    }

    #[test]
    fn test_gt_produces_numeric_flags() {
        let mut vars = HashMap::new();
        let code = vec![Instruction::Push(2.0), Instruction::Push(1.0), Instruction::Gt];
        assert_eq!(interpret(&code, &mut vars), Ok(1.0));
        let code = vec![Instruction::Push(1.0), Instruction::Push(1.0), Instruction::Gt];
        assert_eq!(interpret(&code, &mut vars), Ok(0.0));
    }

    #[test]
    fn test_empty_sequence_yields_zero() {
        let mut vars = HashMap::new();
        assert_eq!(interpret(&[], &mut vars), Ok(0.0));
    }

    #[test]
    fn test_control_flow_is_unsupported() {
        let mut vars = HashMap::new();
        assert_eq!(
            interpret(&[Instruction::Jmp("loop_0".into())], &mut vars),
            Err(VmError::UnsupportedInstruction("JMP".into()))
        );
        assert_eq!(
            interpret(&[Instruction::Call("f".into())], &mut vars),
            Err(VmError::UnsupportedInstruction("CALL".into()))
        );
        assert_eq!(
            interpret(&[Instruction::Halt], &mut vars),
            Err(VmError::UnsupportedInstruction("HALT".into()))
        );
    }

    #[test]
    fn test_stack_underflow() {
        let mut vars = HashMap::new();
        assert_eq!(
            interpret(&[Instruction::Add], &mut vars),
            Err(VmError::StackUnderflow("ADD".into()))
        );
    }
}
