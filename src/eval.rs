//! Tree-walk evaluator.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::debug;

use crate::ast::{Block, Expression, Identifier, InfixOp, PrefixOp, Program, Property, Statement};
use crate::config::Config;
use crate::env::Env;
use crate::value::{Function, RuntimeError, Value};

/// Evaluates syntax trees against an environment, writing program output to `output`.
///
/// The public entry points never fail: a runtime error comes back as `Value::Error`.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    calls: usize,
    max_call_depth: usize,
    /// Expressions and calls being evaluated, across all active calls.
    depth: usize,
    max_eval_depth: usize,
}

impl<'t, W: Write> Evaluator<'t, W> {
    pub fn new(output: &'t mut W) -> Evaluator<'t, W> {
        Self::with_config(output, &Config::default())
    }

    pub fn with_config(output: &'t mut W, config: &Config) -> Evaluator<'t, W> {
        Evaluator {
            output,
            calls: 0,
            max_call_depth: config.max_call_depth,
            depth: 0,
            max_eval_depth: config.max_eval_depth,
        }
    }

    /// Runs `program` and yields the value of its last statement.  A `regresa` at the top level
    /// ends the program with its value.
    pub fn eval_program(&mut self, program: &Program, env: &Rc<Env>) -> Value {
        self.program(program, env).unwrap_or_else(Value::Error)
    }

    pub fn eval_statement(&mut self, stmt: &Statement, env: &Rc<Env>) -> Value {
        self.statement(stmt, env).unwrap_or_else(Value::Error)
    }

    pub fn eval_expression(&mut self, expr: &Expression, env: &Rc<Env>) -> Value {
        self.expression(expr, env).unwrap_or_else(Value::Error)
    }

    pub(crate) fn program(
        &mut self,
        program: &Program,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        match self.statements(&program.statements, env)? {
            Value::Return(value) => Ok(*value),
            value => Ok(value),
        }
    }

    /// Yields the last value, or the `Value::Return` signal that stopped the sequence.
    fn statements(&mut self, stmts: &[Statement], env: &Rc<Env>) -> Result<Value, RuntimeError> {
        let mut last = Value::Null;
        for stmt in stmts {
            last = self.statement(stmt, env)?;
            if let Value::Return(_) = last {
                break;
            }
        }
        Ok(last)
    }

    fn statement(&mut self, stmt: &Statement, env: &Rc<Env>) -> Result<Value, RuntimeError> {
        match stmt {
            Statement::Expression { expression, .. } => self.expression(expression, env),
            Statement::Var {
                name,
                value,
                constant,
                ..
            } => {
                let value = self.optional(value.as_ref(), env)?;
                env.declare(&name.name, value, *constant)
            }
            Statement::Function {
                name,
                parameters,
                body,
                ..
            } => {
                let func = function_value(Some(&name.name), parameters, body, env);
                env.declare(&name.name, func, true)
            }
            Statement::Return { value, .. } => {
                let value = self.optional(value.as_ref(), env)?;
                Ok(Value::Return(Box::new(value)))
            }
        }
    }

    fn optional(
        &mut self,
        expr: Option<&Expression>,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Some(expr) => self.expression(expr, env),
            None => Ok(Value::Null),
        }
    }

    /// Bounds the host stack used by nested evaluation, whatever mix of calls and
    /// sub-expressions produces it.
    fn nested<T>(
        &mut self,
        eval: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        if self.depth >= self.max_eval_depth {
            return Err(RuntimeError::StackOverflow(self.max_eval_depth));
        }
        self.depth += 1;
        let result = eval(self);
        self.depth -= 1;
        result
    }

    fn expression(&mut self, expr: &Expression, env: &Rc<Env>) -> Result<Value, RuntimeError> {
        self.nested(|this| this.expression_at_depth(expr, env))
    }

    fn expression_at_depth(
        &mut self,
        expr: &Expression,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Identifier(ident) => env.lookup(&ident.name),
            Expression::Integer { value, .. } => Ok(Value::Number(*value as f64)),
            Expression::Float { value, .. } => Ok(Value::Number(*value)),
            Expression::Boolean { value, .. } => Ok(Value::Bool(*value)),
            Expression::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expression::Null { .. } => Ok(Value::Null),
            Expression::Prefix {
                operator, operand, ..
            } => self.prefix(*operator, operand, env),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => self.infix(left, *operator, right, env),
            Expression::Assign { target, value, .. } => {
                let value = self.expression(value, env)?;
                env.assign(&target.name, value)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.if_expr(condition, consequence, alternative.as_ref(), env),
            Expression::Function {
                parameters, body, ..
            } => Ok(function_value(None, parameters, body, env)),
            Expression::Call {
                callee, arguments, ..
            } => self.call(callee, arguments, env),
            Expression::Member {
                object,
                property,
                computed,
                ..
            } => self.member(object, property, *computed, env),
            Expression::Object { properties, .. } => self.object(properties, env),
        }
    }

    fn prefix(
        &mut self,
        operator: PrefixOp,
        operand: &Expression,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        match (operator, self.expression(operand, env)?) {
            (PrefixOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (PrefixOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
            (operator, value) => Err(RuntimeError::TypeMismatch(format!(
                "cannot apply '{}' to {}",
                operator,
                value.type_name()
            ))),
        }
    }

    fn infix(
        &mut self,
        left: &Expression,
        operator: InfixOp,
        right: &Expression,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        let l = self.expression(left, env)?;
        let r = self.expression(right, env)?;
        match (operator, &l, &r) {
            (InfixOp::Equal, _, _) => Ok(Value::Bool(l.equals(&r))),
            (InfixOp::NotEqual, _, _) => Ok(Value::Bool(!l.equals(&r))),
            (InfixOp::Div, Value::Number(_), Value::Number(d)) if *d == 0.0 => {
                Err(RuntimeError::DivisionByZero)
            }
            (_, Value::Number(ln), Value::Number(rn)) => Ok(arithmetic(operator, *ln, *rn)),
            _ => Err(RuntimeError::TypeMismatch(format!(
                "cannot apply '{}' to {} and {}",
                operator,
                l.type_name(),
                r.type_name()
            ))),
        }
    }

    fn if_expr(
        &mut self,
        condition: &Expression,
        consequence: &Block,
        alternative: Option<&Block>,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        let chosen = match self.expression(condition, env)? {
            Value::Bool(true) => Some(consequence),
            Value::Bool(false) => alternative,
            value => return Err(RuntimeError::NonBooleanCondition(value.type_name())),
        };
        match chosen {
            Some(block) => {
                let frame = Env::with_parent(Some(env.clone()));
                self.statements(&block.statements, &frame)
            }
            None => Ok(Value::Null),
        }
    }

    fn call(
        &mut self,
        callee: &Expression,
        arguments: &[Expression],
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        let callee = self.expression(callee, env)?;
        let args = arguments
            .iter()
            .map(|arg| self.expression(arg, env))
            .collect::<Result<Vec<Value>, RuntimeError>>()?;
        match callee {
            Value::Function(func) => self.call_function(&func, args),
            Value::Native(native) => (native.func)(&mut *self.output, &args, env),
            value => Err(RuntimeError::NotCallable(value.type_name())),
        }
    }

    fn call_function(&mut self, func: &Function, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if args.len() > func.parameters.len() {
            return Err(RuntimeError::Arity {
                expected: func.parameters.len(),
                found: args.len(),
            });
        }
        if self.calls >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow(self.max_call_depth));
        }
        debug!(
            function = func.name.as_deref().unwrap_or("<anonymous>"),
            calls = self.calls,
            depth = self.depth,
            "call"
        );

        let frame = Env::with_parent(Some(func.env.clone()));
        let mut args = args.into_iter();
        for param in &func.parameters {
            // Missing arguments are null.
            frame.declare(param, args.next().unwrap_or(Value::Null), false)?;
        }

        self.calls += 1;
        let result = self.nested(|this| this.statements(&func.body.statements, &frame));
        self.calls -= 1;
        match result? {
            Value::Return(value) => Ok(*value),
            value => Ok(value),
        }
    }

    fn member(
        &mut self,
        object: &Expression,
        property: &Expression,
        computed: bool,
        env: &Rc<Env>,
    ) -> Result<Value, RuntimeError> {
        let object = self.expression(object, env)?;
        let key = if computed {
            match self.expression(property, env)? {
                Value::Str(s) => s,
                Value::Number(n) => n.to_string(),
                value => {
                    return Err(RuntimeError::TypeMismatch(format!(
                        "property key must be a string or a number, found {}",
                        value.type_name()
                    )))
                }
            }
        } else {
            property.token().text.clone()
        };
        match object {
            Value::Object(properties) => Ok(properties.get(&key).cloned().unwrap_or(Value::Null)),
            value => Err(RuntimeError::TypeMismatch(format!(
                "cannot read property '{}' of {}",
                key,
                value.type_name()
            ))),
        }
    }

    fn object(&mut self, properties: &[Property], env: &Rc<Env>) -> Result<Value, RuntimeError> {
        let mut map = BTreeMap::new();
        for Property { key, value } in properties {
            let value = match value {
                Some(expr) => self.expression(expr, env)?,
                None => env.lookup(&key.name)?,
            };
            map.insert(key.name.clone(), value);
        }
        Ok(Value::Object(Rc::new(map)))
    }
}

fn arithmetic(operator: InfixOp, l: f64, r: f64) -> Value {
    match operator {
        InfixOp::Add => Value::Number(l + r),
        InfixOp::Sub => Value::Number(l - r),
        InfixOp::Mul => Value::Number(l * r),
        InfixOp::Div => Value::Number(l / r),
        InfixOp::Equal => Value::Bool(l == r),
        InfixOp::NotEqual => Value::Bool(l != r),
        InfixOp::Less => Value::Bool(l < r),
        InfixOp::LessEqual => Value::Bool(l <= r),
        InfixOp::Greater => Value::Bool(l > r),
        InfixOp::GreaterEqual => Value::Bool(l >= r),
    }
}

fn function_value(
    name: Option<&str>,
    parameters: &[Identifier],
    body: &Block,
    env: &Rc<Env>,
) -> Value {
    Value::Function(Rc::new(Function {
        name: name.map(str::to_owned),
        parameters: parameters.iter().map(|p| p.name.clone()).collect(),
        body: body.clone(),
        env: env.clone(),
    }))
}

/// Evaluates `program` in `env`, printing to standard output.
pub fn evaluate(program: &Program, env: &Rc<Env>) -> Value {
    let mut stdout = io::stdout();
    Evaluator::new(&mut stdout).eval_program(program, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::global_env;
    use crate::config::DEFAULT_MAX_EVAL_DEPTH;
    use crate::parser::parse;
    use crate::token::{Token, TokenKind};

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Default::default())
    }

    fn eval_expr(expr: &Expression) -> Result<Value, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut evaluator = Evaluator::new(&mut out);
        let val = evaluator.expression(expr, &global_env())?;
        assert!(out.is_empty());
        Ok(val)
    }

    fn run_with_config(input: &str, config: &Config) -> Result<(Value, String), RuntimeError> {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "syntax errors: {:?}", errors);
        let mut out: Vec<u8> = Vec::new();
        let mut evaluator = Evaluator::with_config(&mut out, config);
        let value = evaluator.program(&program, &global_env())?;
        let out = String::from_utf8(out).expect("error while converting output");
        Ok((value, out))
    }

    fn eval_prg(input: &str) -> Result<Value, RuntimeError> {
        Ok(run_with_config(input, &Config::default())?.0)
    }

    fn output_of(input: &str) -> Result<String, RuntimeError> {
        Ok(run_with_config(input, &Config::default())?.1)
    }

    #[test]
    fn number() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("42")?, Value::Number(42.0));
        assert_eq!(eval_prg("4.5")?, Value::Number(4.5));
        Ok(())
    }

    #[test]
    fn null_literal() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expression::Null {
                token: tok(TokenKind::Identifier, "nulo")
            })?,
            Value::Null
        );
        Ok(())
    }

    #[test]
    fn unary_minus() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expression::Prefix {
                token: tok(TokenKind::Minus, "-"),
                operator: PrefixOp::Negate,
                operand: Box::new(Expression::Integer {
                    token: tok(TokenKind::Integer, "1"),
                    value: 1
                }),
            })?,
            Value::Number(-1.0)
        );
        Ok(())
    }

    #[test]
    fn logical_not() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("!verdadero")?, Value::Bool(false));
        assert_eq!(eval_prg("!!falso")?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn unary_minus_on_bool() {
        match eval_prg("-verdadero") {
            Err(RuntimeError::TypeMismatch(_)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn not_on_number() {
        match eval_prg("!1") {
            Err(RuntimeError::TypeMismatch(_)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn arithmetic_follows_precedence() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("1 + 2 * 3")?, Value::Number(7.0));
        assert_eq!(eval_prg("1 - 2 - 3")?, Value::Number(-4.0));
        assert_eq!(eval_prg("(1 + 2) * 3")?, Value::Number(9.0));
        assert_eq!(eval_prg("7 / 2")?, Value::Number(3.5));
        Ok(())
    }

    #[test]
    fn division_by_zero() {
        match eval_prg("6 / 0") {
            Err(RuntimeError::DivisionByZero) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn arithmetic_on_strings() {
        match eval_prg("\"a\" + 1") {
            Err(RuntimeError::TypeMismatch(msg)) => assert!(msg.contains("string")),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn comparisons() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("1 < 2")?, Value::Bool(true));
        assert_eq!(eval_prg("2 < 2")?, Value::Bool(false));
        assert_eq!(eval_prg("2 <= 2")?, Value::Bool(true));
        assert_eq!(eval_prg("3 > 2")?, Value::Bool(true));
        assert_eq!(eval_prg("3 >= 4")?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn ordering_booleans_is_a_type_error() {
        match eval_prg("verdadero < falso") {
            Err(RuntimeError::TypeMismatch(_)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn equality() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("2 == 2")?, Value::Bool(true));
        assert_eq!(eval_prg("2 != 2")?, Value::Bool(false));
        assert_eq!(eval_prg("verdadero == falso")?, Value::Bool(false));
        assert_eq!(eval_prg("\"a\" == \"a\"")?, Value::Bool(true));
        assert_eq!(eval_prg("nulo == nulo")?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn different_types_are_always_different() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("verdadero == 1")?, Value::Bool(false));
        assert_eq!(eval_prg("nulo != 0")?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn set_and_get_var() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("var foo = 42; foo")?, Value::Number(42.0));
        assert_eq!(eval_prg("var foo; foo")?, Value::Null);
        Ok(())
    }

    #[test]
    fn declaration_yields_value() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("var foo = 42;")?, Value::Number(42.0));
        Ok(())
    }

    #[test]
    fn set_unknown_var() {
        match eval_prg("foo = 42") {
            Err(RuntimeError::UnresolvedName(name)) if name == "foo" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn declare_variable_twice() {
        match eval_prg("var foo = 42; var foo = 24;") {
            Err(RuntimeError::DuplicateBinding(name)) if name == "foo" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn constants_reject_assignment() {
        match eval_prg("let x = 1; x = 2") {
            Err(RuntimeError::ConstantAssignment(name)) if name == "x" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn variables_accept_assignment() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("var x = 1; x = 2; x")?, Value::Number(2.0));
        assert_eq!(eval_prg("var a; var b; a = b = 3; a + b")?, Value::Number(6.0));
        Ok(())
    }

    #[test]
    fn if_else() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("si (verdadero) { 1 } sino { 2 }")?, Value::Number(1.0));
        assert_eq!(eval_prg("si (falso) { 1 } sino { 2 }")?, Value::Number(2.0));
        assert_eq!(eval_prg("si (falso) { 1 }")?, Value::Null);
        Ok(())
    }

    #[test]
    fn else_if_chain() -> Result<(), RuntimeError> {
        let prg = r#"
            var x = 5;
            si (x < 0) { "negativo" } sinosi (x == 0) { "cero" } sino { "positivo" }
        "#;
        assert_eq!(eval_prg(prg)?, Value::Str("positivo".to_string()));
        Ok(())
    }

    #[test]
    fn condition_must_be_boolean() {
        match eval_prg("si (1) { 2 }") {
            Err(RuntimeError::NonBooleanCondition("number")) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn if_branch_has_its_own_frame() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg("var x = 1; si (verdadero) { var x = 2; } x")?,
            Value::Number(1.0)
        );
        assert_eq!(
            eval_prg("var x = 1; si (verdadero) { x = 2; } x")?,
            Value::Number(2.0)
        );
        match eval_prg("si (verdadero) { var y = 1; } y") {
            Err(RuntimeError::UnresolvedName(name)) if name == "y" => (),
            out => panic!("unexpected output: {:?}", out),
        }
        Ok(())
    }

    #[test]
    fn declare_and_call_fn_with_arguments() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg("func suma(a, b) { regresa a + b; } suma(2, 3);")?,
            Value::Number(5.0)
        );
        Ok(())
    }

    #[test]
    fn function_declarations_are_constant() {
        match eval_prg("func f() { } f = 1") {
            Err(RuntimeError::ConstantAssignment(name)) if name == "f" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn function_locals_are_invisible_outside() {
        match eval_prg("func f() { var local = 1; } f(); local") {
            Err(RuntimeError::UnresolvedName(name)) if name == "local" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn declare_and_call_fn_with_return_stmts() -> Result<(), RuntimeError> {
        let prg = r#"
            func max(x, y) {
                si (x > y) {
                    regresa x;
                }
                regresa y;
                imprimir(666);
            }
        "#;
        assert_eq!(eval_prg(&format!("{} max(10, 20)", prg))?, Value::Number(20.0));
        assert_eq!(eval_prg(&format!("{} max(5, 4)", prg))?, Value::Number(5.0));
        assert_eq!(output_of(&format!("{} max(1, 2)", prg))?, "");
        Ok(())
    }

    #[test]
    fn body_yields_last_value_without_return() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("func f() { 1; 2 } f()")?, Value::Number(2.0));
        assert_eq!(eval_prg("func f() { } f()")?, Value::Null);
        Ok(())
    }

    #[test]
    fn closures_capture_their_frame() -> Result<(), RuntimeError> {
        let prg = r#"
            var sumador = func(x) { func(y) { x + y } };
            var mas_dos = sumador(2);
            mas_dos(3)
        "#;
        assert_eq!(eval_prg(prg)?, Value::Number(5.0));
        Ok(())
    }

    #[test]
    fn closures_share_captured_bindings() -> Result<(), RuntimeError> {
        let prg = r#"
            func contador() {
                var n = 0;
                func() { n = n + 1 }
            }
            var c = contador();
            c();
            c();
            c()
        "#;
        assert_eq!(eval_prg(prg)?, Value::Number(3.0));
        Ok(())
    }

    #[test]
    fn missing_arguments_are_null() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("func f(a, b) { b } f(1)")?, Value::Null);
        Ok(())
    }

    #[test]
    fn too_many_arguments() {
        match eval_prg("func f(a) { a } f(1, 2)") {
            Err(RuntimeError::Arity {
                expected: 1,
                found: 2,
            }) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn recursion() -> Result<(), RuntimeError> {
        let prg = r#"
            func fact(n) {
                si (n < 2) { regresa 1; }
                regresa n * fact(n - 1);
            }
            fact(10)
        "#;
        assert_eq!(eval_prg(prg)?, Value::Number(3628800.0));
        Ok(())
    }

    #[test]
    fn runaway_recursion_is_an_error() {
        let config = Config {
            max_call_depth: 16,
            ..Config::default()
        };
        match run_with_config("func f(n) { f(n + 1) } f(0)", &config) {
            Err(RuntimeError::StackOverflow(16)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn deeply_nested_recursive_body_is_an_error() {
        let prg = format!(
            "func f(n) {{ si (n < 100000) {{ {}f(n + 1) }} sino {{ 0 }} }} f(0)",
            "- ".repeat(50)
        );
        match eval_prg(&prg) {
            Err(RuntimeError::StackOverflow(DEFAULT_MAX_EVAL_DEPTH)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn evaluation_depth_is_configurable() -> Result<(), RuntimeError> {
        let config = Config {
            max_eval_depth: 10,
            ..Config::default()
        };
        let prg = "1 + (2 + (3 + (4 + (5 + (6 + (7 + (8 + (9 + (10 + 11)))))))))";
        match run_with_config(prg, &config) {
            Err(RuntimeError::StackOverflow(10)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
        assert_eq!(run_with_config(prg, &Config::default())?.0, Value::Number(66.0));
        Ok(())
    }

    #[test]
    fn evaluation_depth_is_restored_after_an_error() {
        let mut out: Vec<u8> = Vec::new();
        let config = Config {
            max_eval_depth: 6,
            ..Config::default()
        };
        let mut evaluator = Evaluator::with_config(&mut out, &config);
        let env = global_env();
        let (program, _) = parse("-(-(-(-(-(-(-1))))))");
        assert!(evaluator.eval_program(&program, &env).is_error());
        let (program, _) = parse("-(-(-1))");
        assert_eq!(evaluator.eval_program(&program, &env), Value::Number(-1.0));
    }

    #[test]
    fn call_depth_is_restored_after_an_error() {
        let mut out: Vec<u8> = Vec::new();
        let config = Config {
            max_call_depth: 8,
            ..Config::default()
        };
        let mut evaluator = Evaluator::with_config(&mut out, &config);
        let env = global_env();
        let (program, _) = parse("func f(n) { f(n + 1) } f(0)");
        assert!(evaluator.eval_program(&program, &env).is_error());
        let (program, _) = parse("func g() { 1 } g()");
        assert_eq!(evaluator.eval_program(&program, &env), Value::Number(1.0));
    }

    #[test]
    fn top_level_return_is_unwrapped() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("regresa 5; 6")?, Value::Number(5.0));
        Ok(())
    }

    #[test]
    fn return_statement_wraps_value() {
        let (program, _) = parse("regresa 1");
        let mut out: Vec<u8> = Vec::new();
        let value = Evaluator::new(&mut out).eval_statement(&program.statements[0], &global_env());
        match value {
            Value::Return(v) if *v == Value::Number(1.0) => (),
            v => panic!("unexpected output: {:?}", v),
        }
    }

    #[test]
    fn call_non_callable() {
        match eval_prg("5()") {
            Err(RuntimeError::NotCallable("number")) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn call_builtin_print() -> Result<(), RuntimeError> {
        assert_eq!(output_of("imprimir(\"suma:\", 1 + 1)")?, "suma: 2\n");
        assert_eq!(eval_prg("imprimir()")?, Value::Null);
        Ok(())
    }

    #[test]
    fn object_members() -> Result<(), RuntimeError> {
        let prg = "var edad = 30; var p = {nombre: \"Ana\", edad};";
        assert_eq!(
            eval_prg(&format!("{} p.nombre", prg))?,
            Value::Str("Ana".to_string())
        );
        assert_eq!(eval_prg(&format!("{} p[\"edad\"]", prg))?, Value::Number(30.0));
        assert_eq!(eval_prg(&format!("{} p.altura", prg))?, Value::Null);
        Ok(())
    }

    #[test]
    fn numeric_keys() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg("{}[1]")?, Value::Null);
        Ok(())
    }

    #[test]
    fn bad_member_access() {
        match eval_prg("var p = {}; p[verdadero]") {
            Err(RuntimeError::TypeMismatch(_)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
        match eval_prg("var n = 5; n.x") {
            Err(RuntimeError::TypeMismatch(_)) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn shorthand_key_must_be_bound() {
        match eval_prg("{desconocido}") {
            Err(RuntimeError::UnresolvedName(name)) if name == "desconocido" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn errors_become_values_at_the_boundary() {
        let (program, _) = parse("nada");
        let mut out: Vec<u8> = Vec::new();
        match Evaluator::new(&mut out).eval_program(&program, &global_env()) {
            Value::Error(RuntimeError::UnresolvedName(name)) if name == "nada" => (),
            v => panic!("unexpected output: {:?}", v),
        }
    }

    #[test]
    fn evaluate_with_global_env() {
        let (program, _) = parse("var x = 2; x * 21");
        let env = global_env();
        assert_eq!(evaluate(&program, &env), Value::Number(42.0));
        assert_eq!(env.lookup("x"), Ok(Value::Number(2.0)));
    }
}
