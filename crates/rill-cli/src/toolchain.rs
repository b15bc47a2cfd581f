//! External toolchain driver: nasm followed by ld
//!
//! The assembly text goes through temporary files that are removed on
//! every path, success or failure.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug)]
pub enum ToolchainError {
    /// File I/O around the temporary artifacts failed
    Io(io::Error),
    /// nasm or ld exited with a failure status
    Tool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// nasm or ld could not be spawned at all
    Missing { command: String, source: io::Error },
}

impl fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolchainError::Io(err) => write!(f, "toolchain error: {err}"),
            ToolchainError::Tool {
                command,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "toolchain error: {command} exited with code {code}")?,
                    None => write!(f, "toolchain error: {command} was terminated by a signal")?,
                }
                if !stderr.trim().is_empty() {
                    write!(f, "\n{}", stderr.trim_end())?;
                }
                Ok(())
            }
            ToolchainError::Missing { command, source } => {
                write!(f, "toolchain error: could not run {command}: {source}")
            }
        }
    }
}

impl std::error::Error for ToolchainError {}

impl From<io::Error> for ToolchainError {
    fn from(err: io::Error) -> Self {
        ToolchainError::Io(err)
    }
}

/// Assemble the NASM text and link it into an executable at `output`.
pub fn assemble_and_link(asm_text: &str, output: &str) -> Result<(), ToolchainError> {
    let dir = std::env::temp_dir();
    let stem = format!("rill-{}", std::process::id());
    let asm_path = dir.join(format!("{stem}.asm"));
    let obj_path = dir.join(format!("{stem}.o"));

    fs::write(&asm_path, asm_text)?;

    let result = run_tools(&asm_path, &obj_path, output);

    // Temporary files go away regardless of the outcome
    let _ = fs::remove_file(&asm_path);
    let _ = fs::remove_file(&obj_path);

    result
}

fn run_tools(asm_path: &PathBuf, obj_path: &PathBuf, output: &str) -> Result<(), ToolchainError> {
    run_checked(
        Command::new("nasm")
            .arg("-f")
            .arg("elf64")
            .arg(asm_path)
            .arg("-o")
            .arg(obj_path),
        "nasm",
    )?;
    run_checked(
        Command::new("ld").arg(obj_path).arg("-o").arg(output),
        "ld",
    )
}

fn run_checked(command: &mut Command, name: &str) -> Result<(), ToolchainError> {
    let output = command.output().map_err(|source| ToolchainError::Missing {
        command: name.to_string(),
        source,
    })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ToolchainError::Tool {
            command: name.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
