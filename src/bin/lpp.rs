//! Interpreter command-line.
//!
//! When called without argument it drops into an interactive read-evaluate-print loop.
//!
//! When called with arguments, it interprets the corresponding files in a single interpreter
//! session (so code and data sharing is possible).

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{self, Context};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lpp::config::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_EVAL_DEPTH, DEFAULT_MAX_NESTING};
use lpp::interpreter::Interpreter;
use lpp::value::Value;
use lpp::Config;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scripts to run in order.  Starts the interactive prompt when empty.
    files: Vec<PathBuf>,

    /// Maximum number of nested function calls.
    #[arg(long, env = "LPP_MAX_CALL_DEPTH", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Maximum nesting of expressions accepted by the parser.
    #[arg(long, env = "LPP_MAX_NESTING", default_value_t = DEFAULT_MAX_NESTING)]
    max_nesting: usize,

    /// Maximum number of expressions and calls evaluated inside one another.
    #[arg(long, env = "LPP_MAX_EVAL_DEPTH", default_value_t = DEFAULT_MAX_EVAL_DEPTH)]
    max_eval_depth: usize,
}

const PROMPT: &str = ">> ";
const QUIT: &str = "salir";

fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let config = Config {
        max_call_depth: args.max_call_depth,
        max_nesting: args.max_nesting,
        max_eval_depth: args.max_eval_depth,
    };
    debug!(?config, "starting");

    if args.files.is_empty() {
        run_prompt(config)
    } else {
        run_all_files(&args.files, config)
    }
}

fn run_all_files(paths: &[PathBuf], config: Config) -> Result<(), anyhow::Error> {
    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::with_config(&mut interp_stdout, config);

    for p in paths {
        let source = fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display()))?;
        info!(file = %p.display(), "running");
        interp
            .eval(&source)
            .with_context(|| format!("while running {}", p.display()))?;
    }

    Ok(())
}

fn run_prompt(config: Config) -> Result<(), anyhow::Error> {
    let mut editor = DefaultEditor::new()?;
    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::with_config(&mut interp_stdout, config);

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == QUIT {
                    break;
                }
                let _ = editor.add_history_entry(line);
                match interp.eval(line) {
                    Ok(Value::Null) => (),
                    Ok(value) => println!("{}", value),
                    Err(e) => println!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
