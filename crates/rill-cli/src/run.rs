//! `run` subcommand handler

use crate::utils::{parse_define, read_source};
use rill_core::pipeline::Pipeline;
use std::collections::HashMap;
use std::process;

/// Interpret a Rill script file
pub fn handle_run(file: &str, defines: &[String]) {
    let source = match read_source(file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{file}': {err}");
            process::exit(1);
        }
    };

    let mut variables: HashMap<String, f64> = HashMap::new();
    for define in defines {
        match parse_define(define) {
            Ok((name, value)) => {
                variables.insert(name, value);
            }
            Err(message) => {
                eprintln!("Error: {message}");
                process::exit(1);
            }
        }
    }

    let pipeline = Pipeline::new(source.clone(), file.to_string());
    match pipeline.run_with(&mut variables) {
        Ok(value) => {
            println!("{value}");
        }
        Err(e) => {
            eprintln!("{}", e.format_with_source(&source));
            process::exit(1);
        }
    }
}
