//! Interpreter for a small scripting language with Spanish keywords.
//!
//! Source text goes through the [`scanner`], the Pratt [`parser`] and the tree-walk [`eval`]
//! evaluator.  Programs have numbers, strings, booleans, objects, first-class functions with
//! closures, `var`/`let` bindings and `si`/`sinosi`/`sino` conditionals:
//!
//! ```text
//! func suma(a, b) { regresa a + b; }
//! let resultado = suma(2, 3);
//! imprimir("resultado:", resultado);
//! ```
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`] for a session keeping its globals between inputs,
//! or use the building blocks directly:
//!
//! ```
//! use lpp::{evaluate, global_env, parse};
//! use lpp::value::Value;
//!
//! let (program, errors) = parse("1 + 2 * 3");
//! assert!(errors.is_empty());
//! assert_eq!(evaluate(&program, &global_env()), Value::Number(7.0));
//! ```
//!
//! # Limitations
//!
//! - `para` is reserved but loops are not implemented.
//! - Reference cycles between closures and their frames are never collected.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod builtins;
pub mod config;
pub mod diag;
pub mod env;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

pub use builtins::global_env;
pub use config::Config;
pub use eval::evaluate;
pub use interpreter::Interpreter;
pub use parser::parse;
pub use scanner::tokenize;
