//! API to control the interpreter.

use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;

use crate::builtins::global_env;
use crate::config::Config;
use crate::diag::ParseError;
use crate::env::Env;
use crate::eval::Evaluator;
use crate::parser::parse_with_config;
use crate::value::{RuntimeError, Value};

/// Tree-walk interpreter session.  Bindings persist from one call to `eval` to the next.
///
/// # Example
///
/// Invoke the interpreter a first time to define a function then additional times to call this
/// function:
///
/// ```
/// # use lpp::interpreter::{Interpreter, ScriptError};
/// # use lpp::value::Value;
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// let func_def = r#"
///     func max(x, y) {
///         si (x > y) {
///             regresa x;
///         } sino {
///             regresa y;
///         }
///     }
/// "#;
/// interp.eval(func_def)?;
///
/// interp.eval("imprimir(max(10, 20));")?;
/// assert_eq!(interp.eval("max(5, 4)")?, Value::Number(5.0));
///
/// assert_eq!(output, b"20\n");
/// # Ok::<(), ScriptError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    globals: Rc<Env>,
    evaluator: Evaluator<'t, W>,
    config: Config,
}

/// Errors the interpreter can raise.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Every syntax error found in the input.
    #[error("{}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error occurring during evaluation.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl<'t, W: Write> Interpreter<'t, W> {
    pub fn new(output: &'t mut W) -> Interpreter<'t, W> {
        Self::with_config(output, Config::default())
    }

    pub fn with_config(output: &'t mut W, config: Config) -> Interpreter<'t, W> {
        Interpreter {
            globals: global_env(),
            evaluator: Evaluator::with_config(output, &config),
            config,
        }
    }

    /// Parses and runs `source` in the session's global frame.  Nothing runs when the source
    /// has syntax errors.
    pub fn eval(&mut self, source: &str) -> Result<Value, ScriptError> {
        let (program, errors) = parse_with_config(source, &self.config);
        if !errors.is_empty() {
            return Err(ScriptError::Parse(errors));
        }
        Ok(self.evaluator.program(&program, &self.globals)?)
    }

    pub fn globals(&self) -> &Rc<Env> {
        &self.globals
    }
}
