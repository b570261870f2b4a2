//! Runtime values.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use thiserror::Error;

use crate::ast::Block;
use crate::env::Env;

/// Host callback backing a native function.  Receives the evaluator output, the evaluated
/// arguments and the caller's frame.
pub type NativeFn = fn(&mut dyn Write, &[Value], &Rc<Env>) -> Result<Value, RuntimeError>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Object(Rc<BTreeMap<String, Value>>),
    Function(Rc<Function>),
    Native(NativeFunction),
    /// Signal unwinding a `regresa` up to the enclosing call.
    Return(Box<Value>),
    Error(RuntimeError),
}

/// User function: parameters, body and the frame it was created in.
#[derive(Clone)]
pub struct Function {
    pub name: Option<String>,
    pub parameters: Vec<String>,
    pub body: Block,
    pub env: Rc<Env>,
}

// The captured frame usually holds the function itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("name error: '{0}' is not defined")]
    UnresolvedName(String),
    #[error("name error: '{0}' is already declared in this scope")]
    DuplicateBinding(String),
    #[error("name error: cannot assign to constant '{0}'")]
    ConstantAssignment(String),
    #[error("type error: {0}")]
    TypeMismatch(String),
    #[error("type error: condition must be a boolean, found {0}")]
    NonBooleanCondition(&'static str),
    #[error("type error: {0} is not callable")]
    NotCallable(&'static str),
    #[error("arity error: expected at most {expected} arguments but got {found}")]
    Arity { expected: usize, found: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("stack overflow: nesting limit of {0} reached")]
    StackOverflow(usize),
    #[error("{0}")]
    Native(String),
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> RuntimeError {
        RuntimeError::Native(format!("I/O error: {}", e))
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Return(_) => "return",
            Value::Error(_) => "error",
        }
    }

    /// Structural equality for values of the same kind, `false` across kinds.  Functions are
    /// only equal to themselves.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Object(l), Value::Object(r)) => Rc::ptr_eq(l, r) || l == r,
            (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
            (Value::Native(l), Value::Native(r)) => l.name == r.name,
            (Value::Return(l), Value::Return(r)) => l.equals(r),
            (Value::Error(l), Value::Error(r)) => l == r,
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

impl From<RuntimeError> for Value {
    fn from(e: RuntimeError) -> Value {
        Value::Error(e)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nulo"),
            Value::Bool(true) => write!(f, "verdadero"),
            Value::Bool(false) => write!(f, "falso"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(properties) => {
                write!(f, "{{")?;
                for (i, (key, value)) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match value {
                        Value::Str(s) => write!(f, "{}: \"{}\"", key, s)?,
                        _ => write!(f, "{}: {}", key, value)?,
                    }
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(
                f,
                "func {}({})",
                func.name.as_deref().unwrap_or(""),
                func.parameters.join(", ")
            ),
            Value::Native(native) => write!(f, "func {}(...)", native.name),
            Value::Return(value) => write!(f, "{}", value),
            Value::Error(e) => write!(f, "Error: {}", e),
        }
    }
}
