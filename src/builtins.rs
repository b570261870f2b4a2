//! Global frame: predefined constants and native functions.

use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::env::Env;
use crate::value::{NativeFn, NativeFunction, RuntimeError, Value};

/// Creates a fresh global frame.
pub fn global_env() -> Rc<Env> {
    Env::with_constants([
        ("verdadero", Value::Bool(true)),
        ("falso", Value::Bool(false)),
        ("nulo", Value::Null),
        ("imprimir", native("imprimir", builtin_print)),
        ("tiempo", native("tiempo", builtin_time)),
    ])
}

fn native(name: &'static str, func: NativeFn) -> Value {
    Value::Native(NativeFunction { name, func })
}

/// Writes its arguments separated by spaces, then a newline.
fn builtin_print(
    output: &mut dyn Write,
    args: &[Value],
    _env: &Rc<Env>,
) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(output, "{}", line)?;
    Ok(Value::Null)
}

/// Milliseconds since the Unix epoch.
fn builtin_time(
    _output: &mut dyn Write,
    _args: &[Value],
    _env: &Rc<Env>,
) -> Result<Value, RuntimeError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| RuntimeError::Native(format!("cannot read the clock: {}", e)))?;
    Ok(Value::Number(elapsed.as_millis() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<(Value, String), RuntimeError> {
        let env = global_env();
        let mut out: Vec<u8> = Vec::new();
        let value = match env.lookup(name)? {
            Value::Native(native) => (native.func)(&mut out, args, &env)?,
            v => panic!("unexpected output: {:?}", v),
        };
        let out = String::from_utf8(out).expect("error while converting output");
        Ok((value, out))
    }

    #[test]
    fn constants_are_predefined() -> Result<(), RuntimeError> {
        let env = global_env();
        assert_eq!(env.lookup("verdadero")?, Value::Bool(true));
        assert_eq!(env.lookup("falso")?, Value::Bool(false));
        assert_eq!(env.lookup("nulo")?, Value::Null);
        for name in ["verdadero", "falso", "nulo", "imprimir", "tiempo"] {
            assert!(env.is_constant(name), "{} should be constant", name);
        }
        Ok(())
    }

    #[test]
    fn predefined_names_cannot_be_redeclared_globally() -> Result<(), RuntimeError> {
        let env = global_env();
        match env.declare("imprimir", Value::Null, false) {
            Err(RuntimeError::DuplicateBinding(name)) if name == "imprimir" => (),
            out => panic!("unexpected output: {:?}", out),
        }
        Env::with_parent(Some(env)).declare("imprimir", Value::Null, false)?;
        Ok(())
    }

    #[test]
    fn predefined_names_cannot_be_reassigned() {
        match global_env().assign("nulo", Value::Number(1.0)) {
            Err(RuntimeError::ConstantAssignment(name)) if name == "nulo" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn print_joins_arguments() -> Result<(), RuntimeError> {
        let (value, out) = call(
            "imprimir",
            &[
                Value::Str("hola".to_string()),
                Value::Number(42.0),
                Value::Bool(true),
            ],
        )?;
        assert_eq!(value, Value::Null);
        assert_eq!(out, "hola 42 verdadero\n");
        Ok(())
    }

    #[test]
    fn print_without_arguments() -> Result<(), RuntimeError> {
        assert_eq!(call("imprimir", &[])?.1, "\n");
        Ok(())
    }

    #[test]
    fn time_is_in_milliseconds() -> Result<(), RuntimeError> {
        match call("tiempo", &[])?.0 {
            // Later than 2001-09-09 in milliseconds.
            Value::Number(n) => assert!(n > 1e12),
            v => panic!("unexpected output: {:?}", v),
        }
        Ok(())
    }
}
