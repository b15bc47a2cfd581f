//! `build` subcommand handler

use crate::toolchain;
use crate::utils::{format_parse_errors, read_source};
use rill_core::pipeline::Pipeline;
use std::fs;
use std::process;

/// Compile a Rill script to native assembly and hand it to the toolchain
pub fn handle_build(file: &str, output: Option<&str>, emit_asm: Option<&str>) {
    let source = match read_source(file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{file}': {err}");
            process::exit(1);
        }
    };

    let pipeline = Pipeline::new(source.clone(), file.to_string());
    let ast = match pipeline.parse() {
        Ok(ast) => ast,
        Err(rill_core::pipeline::PipelineError::Parse(errors)) => {
            format_parse_errors(&errors, &source);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e.format_with_source(&source));
            process::exit(1);
        }
    };

    let ast = pipeline.simplify(&ast);
    let bytecode = pipeline.compile(&ast);
    let asm_text = match pipeline.emit(&bytecode) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", e.format_display());
            process::exit(1);
        }
    };

    if let Some(asm_path) = emit_asm {
        if let Err(e) = fs::write(asm_path, &asm_text) {
            eprintln!("Error writing to '{asm_path}': {e}");
            process::exit(1);
        }
        println!("Wrote assembly for '{file}' to '{asm_path}'");
        return;
    }

    let output = output.unwrap_or("a.out");
    if let Err(e) = toolchain::assemble_and_link(&asm_text, output) {
        eprintln!("{e}");
        process::exit(1);
    }
    println!("Built '{file}' into '{output}'");
}
