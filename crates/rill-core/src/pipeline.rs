//! Unified pipeline for compiling and running Rill programs
//!
//! This module provides a `Pipeline` abstraction that encapsulates the
//! complete workflow of parsing, simplifying, compiling, and executing
//! Rill code.
//!
//! ## Usage
//!
//! ```no_run
//! # use rill_core::pipeline::Pipeline;
//! let pipeline = Pipeline::new("x = 1 + 2".to_string(), "example.rill".to_string());
//!
//! match pipeline.run_all() {
//!     Ok(value) => println!("Result: {}", value),
//!     Err(e) => eprintln!("Error: {}", e.format_display()),
//! }
//! ```
//!
//! ## Individual Stages
//!
//! You can also run individual stages:
//!
//! ```no_run
//! # use rill_core::pipeline::Pipeline;
//! let pipeline = Pipeline::new("x = 1".to_string(), "example.rill".to_string());
//!
//! let ast = pipeline.parse()?;
//! let ast = pipeline.simplify(&ast);
//! let bytecode = pipeline.compile(&ast);
//! # Ok::<(), rill_core::pipeline::PipelineError>(())
//! ```

use crate::asm::{self, EmitError};
use crate::ast::Program;
use crate::bytecode::{self, Bytecode};
use crate::diagnostics::Diagnostic;
use crate::simplify;
use crate::vm::{self, VmError};
use std::collections::HashMap;
use std::fmt;

/// Errors that can occur during pipeline execution
#[derive(Debug)]
pub enum PipelineError {
    /// Parse error(s)
    Parse(Vec<Diagnostic>),
    /// Runtime error
    Runtime(VmError),
    /// Native emission error
    Emit(EmitError),
}

impl PipelineError {
    /// Format error for display to user
    pub fn format_display(&self) -> String {
        match self {
            PipelineError::Parse(diagnostics) => diagnostics
                .iter()
                .map(|d| format!("{}", d))
                .collect::<Vec<_>>()
                .join("\n"),
            PipelineError::Runtime(err) => err.to_string(),
            PipelineError::Emit(err) => err.to_string(),
        }
    }

    /// Format error with source code context
    pub fn format_with_source(&self, source: &str) -> String {
        match self {
            PipelineError::Parse(diagnostics) => diagnostics
                .iter()
                .map(|d| d.format(source))
                .collect::<Vec<_>>()
                .join("\n"),
            PipelineError::Runtime(err) => err.to_string(),
            PipelineError::Emit(err) => err.to_string(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_display())
    }
}

impl From<Vec<Diagnostic>> for PipelineError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        PipelineError::Parse(diagnostics)
    }
}

impl From<VmError> for PipelineError {
    fn from(error: VmError) -> Self {
        PipelineError::Runtime(error)
    }
}

impl From<EmitError> for PipelineError {
    fn from(error: EmitError) -> Self {
        PipelineError::Emit(error)
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Unified pipeline for parsing, simplifying, compiling, and executing Rill code
pub struct Pipeline {
    /// Source code to execute
    source: String,
    /// Filename for error reporting
    filename: String,
}

impl Pipeline {
    /// Create a new pipeline with source code and filename
    pub fn new(source: String, filename: String) -> Self {
        Pipeline { source, filename }
    }

    /// Parse the source code into an AST
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Parse` if parsing fails
    pub fn parse(&self) -> PipelineResult<Program> {
        crate::parser::parse(&self.source, &self.filename).map_err(PipelineError::Parse)
    }

    /// Apply algebraic simplification to the AST
    pub fn simplify(&self, ast: &Program) -> Program {
        simplify::simplify_program(ast)
    }

    /// Compile the AST to bytecode
    ///
    /// This operation never fails - every well-formed AST has a lowering
    pub fn compile(&self, ast: &Program) -> Bytecode {
        bytecode::generate(ast)
    }

    /// Execute the main instruction sequence against a variable map
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Runtime` if execution fails
    pub fn interpret(
        &self,
        bytecode: &Bytecode,
        variables: &mut HashMap<String, f64>,
    ) -> PipelineResult<f64> {
        vm::interpret(&bytecode.main, variables).map_err(PipelineError::Runtime)
    }

    /// Emit NASM assembly for the flattened program
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Emit` if an instruction has no native lowering
    pub fn emit(&self, bytecode: &Bytecode) -> PipelineResult<String> {
        asm::emit(&bytecode.flatten()).map_err(PipelineError::Emit)
    }

    /// Execute the complete pipeline: parse → simplify → compile → interpret
    ///
    /// # Errors
    ///
    /// Returns error at the first stage that fails:
    /// 1. Parse errors
    /// 2. Runtime errors
    pub fn run_all(&self) -> PipelineResult<f64> {
        let mut variables = HashMap::new();
        self.run_with(&mut variables)
    }

    /// Like [`run_all`](Self::run_all), with caller-provided initial variables
    pub fn run_with(&self, variables: &mut HashMap<String, f64>) -> PipelineResult<f64> {
        let ast = self.parse()?;
        let ast = self.simplify(&ast);
        let bytecode = self.compile(&ast);
        self.interpret(&bytecode, variables)
    }

    /// Get the source code
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the filename
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_simple_execution() {
        let pipeline = Pipeline::new("1 + 2\n".to_string(), "test.rill".to_string());
        let result = pipeline.run_all();
        assert!(result.is_ok());
    }

    #[test]
    fn test_pipeline_parse_error() {
        let pipeline = Pipeline::new("1 +\n".to_string(), "test.rill".to_string());
        let result = pipeline.run_all();
        assert!(matches!(result, Err(PipelineError::Parse(_))));
    }

    #[test]
    fn test_pipeline_runtime_error() {
        let pipeline = Pipeline::new("z = 1 / d\n".to_string(), "test.rill".to_string());
        let result = pipeline.run_all();
        assert!(matches!(
            result,
            Err(PipelineError::Runtime(VmError::DivideByZero))
        ));
    }

    #[test]
    fn test_pipeline_individual_stages() {
        let pipeline = Pipeline::new("x = 2 + 3\nx * 4\n".to_string(), "test.rill".to_string());

        let ast = pipeline.parse().expect("parse failed");
        let ast = pipeline.simplify(&ast);
        let bytecode = pipeline.compile(&ast);

        let mut variables = HashMap::new();
        pipeline
            .interpret(&bytecode, &mut variables)
            .expect("interpret failed");
        assert_eq!(variables.get("x"), Some(&5.0));
    }

    #[test]
    fn test_pipeline_run_with_seeded_variables() {
        // Expression statements discard their value; read it back via assignment
        let pipeline = Pipeline::new("r = x ^ 2 + 3 * x\n".to_string(), "test.rill".to_string());
        let mut variables = HashMap::from([("x".to_string(), 5.0)]);
        pipeline.run_with(&mut variables).expect("run failed");
        assert_eq!(variables.get("r"), Some(&40.0));
    }

    #[test]
    fn test_pipeline_emit_rejects_loops() {
        let pipeline = Pipeline::new(
            "while x:\n    x = x - 1\nend\n".to_string(),
            "test.rill".to_string(),
        );
        let ast = pipeline.parse().expect("parse failed");
        let bytecode = pipeline.compile(&ast);
        assert!(matches!(
            pipeline.emit(&bytecode),
            Err(PipelineError::Emit(EmitError::UnsupportedInstruction(_)))
        ));
    }

    #[test]
    fn test_pipeline_error_formatting() {
        let pipeline = Pipeline::new("1 +\n".to_string(), "test.rill".to_string());
        let error = pipeline.run_all().unwrap_err();

        let formatted = error.format_display();
        assert!(!formatted.is_empty());
    }
}
