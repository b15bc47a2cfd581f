//! NASM x86-64 backend
//!
//! Translates a flattened instruction listing into assembly text for
//! `nasm -f elf64` plus `ld`. The backend covers straight-line programs
//! and the function call machinery; branch instructions and the stack
//! comparison operators have no lowering and fail loudly.

use crate::bytecode::Instruction;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EmitError {
    /// No native lowering exists for this instruction
    UnsupportedInstruction(String),
    /// The literal does not fit a 32-bit push immediate
    UnrepresentableLiteral(f64),
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::UnsupportedInstruction(mnemonic) => {
                write!(f, "codegen error: no native lowering for {mnemonic}")
            }
            EmitError::UnrepresentableLiteral(value) => {
                write!(f, "codegen error: literal {value} has no push immediate encoding")
            }
        }
    }
}

impl std::error::Error for EmitError {}

/// Emit NASM assembly for a flattened program listing.
///
/// Every lowered instruction is preceded by a `; MNEM` comment carrying
/// its textual form, so the listing stays readable next to the bytecode.
pub fn emit(code: &[Instruction]) -> Result<String, EmitError> {
    let mut asm = vec![
        "global _start".to_string(),
        "section .text".to_string(),
        "_start:".to_string(),
    ];
    let mut variables: BTreeSet<String> = BTreeSet::new();
    let mut in_function = false;
    let mut entry_deferred = false;

    for instr in code {
        // Function blocks precede the entry sequence in the flattened
        // listing; execution must not fall from _start into their bodies.
        if entry_deferred
            && !in_function
            && !matches!(instr, Instruction::FuncBegin(_) | Instruction::FuncEnd(_))
        {
            asm.push("_rill_entry:".to_string());
            entry_deferred = false;
        }
        match instr {
            Instruction::Push(value) => {
                // push qword takes a sign-extended 32-bit immediate
                if value.fract() != 0.0
                    || *value < f64::from(i32::MIN)
                    || *value > f64::from(i32::MAX)
                {
                    return Err(EmitError::UnrepresentableLiteral(*value));
                }
                asm.push(format!("  ; {instr}"));
                asm.push(format!("  push qword {value}"));
            }
            Instruction::Pop => {
                asm.push("  pop rax".to_string());
            }
            Instruction::Load(name) => {
                variables.insert(name.clone());
                asm.push(format!("  ; {instr}"));
                asm.push(format!("  mov rax, [rel {name}]"));
                asm.push("  push rax".to_string());
            }
            Instruction::Store(name) => {
                variables.insert(name.clone());
                asm.push(format!("  ; {instr}"));
                asm.push("  pop rax".to_string());
                asm.push(format!("  mov [rel {name}], rax"));
            }
            Instruction::Add | Instruction::Sub | Instruction::Mul | Instruction::Div => {
                asm.push(format!("  ; {instr}"));
                asm.push("  pop rbx".to_string());
                asm.push("  pop rax".to_string());
                match instr {
                    Instruction::Add => asm.push("  add rax, rbx".to_string()),
                    Instruction::Sub => asm.push("  sub rax, rbx".to_string()),
                    Instruction::Mul => asm.push("  imul rax, rbx".to_string()),
                    _ => {
                        asm.push("  cqo".to_string());
                        asm.push("  idiv rbx".to_string());
                    }
                }
                asm.push("  push rax".to_string());
            }
            Instruction::Neg => {
                asm.push(format!("  ; {instr}"));
                asm.push("  pop rax".to_string());
                asm.push("  neg rax".to_string());
                asm.push("  push rax".to_string());
            }
            Instruction::Call(name) => {
                asm.push(format!("  ; {instr}"));
                asm.push(format!("  call {name}"));
            }
            Instruction::FuncBegin(name) => {
                if !in_function && !entry_deferred {
                    asm.push("  jmp _rill_entry".to_string());
                    entry_deferred = true;
                }
                in_function = true;
                asm.push(format!("{name}:"));
            }
            Instruction::FuncEnd(name) => {
                in_function = false;
                asm.push(format!("  ; end of {name}"));
            }
            Instruction::PushFrame => {
                asm.push(format!("  ; {instr}"));
                asm.push("  push rbp".to_string());
                asm.push("  mov rbp, rsp".to_string());
            }
            Instruction::PopFrame => {
                asm.push(format!("  ; {instr}"));
                asm.push("  mov rsp, rbp".to_string());
                asm.push("  pop rbp".to_string());
            }
            Instruction::Ret => {
                asm.push("  ret".to_string());
            }
            Instruction::Halt => {
                asm.push(format!("  ; {instr}"));
                asm.push("  mov rax, 60".to_string());
                asm.push("  xor rdi, rdi".to_string());
                asm.push("  syscall".to_string());
            }
            Instruction::Jz(_)
            | Instruction::Jmp(_)
            | Instruction::Label(_)
            | Instruction::Gt
            | Instruction::Pow => {
                return Err(EmitError::UnsupportedInstruction(instr.mnemonic().to_string()));
            }
        }
    }

    if entry_deferred {
        asm.push("_rill_entry:".to_string());
    }

    if !variables.is_empty() {
        asm.push("section .bss".to_string());
        for name in variables {
            asm.push(format!("{name}: resq 1"));
        }
    }

    let mut text = asm.join("\n");
    text.push('\n');
    Ok(text)
}
