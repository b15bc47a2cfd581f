//! Debug subcommands: `ast` and `bytecode`

use crate::utils::{format_parse_errors, read_source};
use rill_core::{bytecode, parser, simplify};
use std::process;

/// Print the parsed AST as pretty JSON for debugging
pub fn handle_ast(file: &str) {
    let source = match read_source(file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{file}': {err}");
            process::exit(1);
        }
    };

    let ast = match parser::parse(&source, file) {
        Ok(ast) => ast,
        Err(errors) => {
            format_parse_errors(&errors, &source);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&ast) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing AST: {e}");
            process::exit(1);
        }
    }
}

/// Print the compiled bytecode listing for debugging
pub fn handle_bytecode(file: &str) {
    let source = match read_source(file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{file}': {err}");
            process::exit(1);
        }
    };

    let ast = match parser::parse(&source, file) {
        Ok(ast) => ast,
        Err(errors) => {
            format_parse_errors(&errors, &source);
            process::exit(1);
        }
    };

    let compiled = bytecode::generate(&simplify::simplify_program(&ast));
    println!("{}", compiled.to_text());
}
