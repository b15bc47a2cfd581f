use clap::{CommandFactory, Parser, Subcommand};

mod build;
mod compile;
mod debug;
mod run;
mod toolchain;
mod utils;

use build::handle_build;
use compile::handle_compile;
use debug::{handle_ast, handle_bytecode};
use run::handle_run;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Rill expression language compiler",
    long_about = None,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// The file to run (default if no subcommand)
    file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a Rill script
    Run {
        /// The file to execute
        file: String,
        /// Seed a variable before execution, e.g. -D x=5
        #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
        defines: Vec<String>,
    },
    /// Compile a Rill script to a native executable via nasm and ld
    Build {
        /// The file to compile
        file: String,
        /// Output executable (defaults to a.out)
        #[arg(short, long)]
        output: Option<String>,
        /// Write the assembly text to this path instead of assembling
        #[arg(long, value_name = "PATH")]
        emit_asm: Option<String>,
    },
    /// Compile a Rill script to a .rbc bytecode file
    Compile {
        /// The file to compile
        file: String,
        /// Output file (defaults to input.rbc)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the parsed AST (debug)
    #[command(hide = true)]
    Ast {
        /// The file to parse
        file: String,
    },
    /// Print the compiled bytecode listing (debug)
    #[command(hide = true)]
    Bytecode {
        /// The file to compile
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Run { file, defines }) => {
            handle_run(file, defines);
        }
        Some(Commands::Build {
            file,
            output,
            emit_asm,
        }) => {
            handle_build(file, output.as_deref(), emit_asm.as_deref());
        }
        Some(Commands::Compile { file, output }) => {
            handle_compile(file, output.as_deref());
        }
        Some(Commands::Ast { file }) => {
            handle_ast(file);
        }
        Some(Commands::Bytecode { file }) => {
            handle_bytecode(file);
        }
        None => {
            // Default: run the file if provided, otherwise print help
            let file = match &cli.file {
                Some(f) => f,
                None => {
                    if Cli::command().print_help().is_ok() {
                        println!();
                    }
                    std::process::exit(0);
                }
            };
            handle_run(file, &[]);
        }
    }
}
