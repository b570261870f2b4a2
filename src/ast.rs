//! Syntax tree produced by the parser.
//!
//! Every node keeps the token that introduced it so that diagnostics can point back to the
//! source.  `Display` renders a node as fully parenthesized source text, which is what the
//! parser tests compare against.

use std::fmt;

use crate::token::Token;

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    /// `var x = e;` or `let x = e;` (the latter is constant).
    Var {
        token: Token,
        name: Identifier,
        value: Option<Expression>,
        constant: bool,
    },
    Return {
        token: Token,
        value: Option<Expression>,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    /// `func name(params) { body }`
    Function {
        token: Token,
        name: Identifier,
        parameters: Vec<Identifier>,
        body: Block,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOp {
    Not,
    Negate,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

/// `key` or `key: value` inside an object literal.
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: Identifier,
    pub value: Option<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    Integer {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Str {
        token: Token,
        value: String,
    },
    Null {
        token: Token,
    },
    Prefix {
        token: Token,
        operator: PrefixOp,
        operand: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: InfixOp,
        right: Box<Expression>,
    },
    Assign {
        token: Token,
        target: Identifier,
        value: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        token: Token,
        parameters: Vec<Identifier>,
        body: Block,
    },
    Call {
        token: Token,
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    /// `object.property` or, when `computed`, `object[property]`.
    Member {
        token: Token,
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
    },
    Object {
        token: Token,
        properties: Vec<Property>,
    },
}

impl Identifier {
    pub fn new(token: Token) -> Identifier {
        let name = token.text.clone();
        Identifier { token, name }
    }
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Var { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. }
            | Statement::Function { token, .. } => token,
        }
    }
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Identifier(ident) => &ident.token,
            Expression::Integer { token, .. }
            | Expression::Float { token, .. }
            | Expression::Boolean { token, .. }
            | Expression::Str { token, .. }
            | Expression::Null { token }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::Assign { token, .. }
            | Expression::If { token, .. }
            | Expression::Function { token, .. }
            | Expression::Call { token, .. }
            | Expression::Member { token, .. }
            | Expression::Object { token, .. } => token,
        }
    }
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.statements, "\n"))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var {
                token, name, value, ..
            } => match value {
                Some(value) => write!(f, "{} {} = {};", token.text, name, value),
                None => write!(f, "{} {};", token.text, name),
            },
            Statement::Return { value, .. } => match value {
                Some(value) => write!(f, "regresa {};", value),
                None => write!(f, "regresa;"),
            },
            Statement::Expression { expression, .. } => write!(f, "{}", expression),
            Statement::Function {
                name,
                parameters,
                body,
                ..
            } => write!(f, "func {}({}) {}", name, join(parameters, ", "), body),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            write!(f, "{{ }}")
        } else {
            write!(f, "{{ {} }}", join(&self.statements, " "))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Not => write!(f, "!"),
            PrefixOp::Negate => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Equal => "==",
            InfixOp::NotEqual => "!=",
            InfixOp::Less => "<",
            InfixOp::LessEqual => "<=",
            InfixOp::Greater => ">",
            InfixOp::GreaterEqual => ">=",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Integer { value, .. } => write!(f, "{}", value),
            Expression::Float { value, .. } => write!(f, "{:?}", value),
            Expression::Boolean { value: true, .. } => write!(f, "verdadero"),
            Expression::Boolean { value: false, .. } => write!(f, "falso"),
            Expression::Str { value, .. } => write!(f, "\"{}\"", value),
            Expression::Null { .. } => write!(f, "nulo"),
            Expression::Prefix {
                operator, operand, ..
            } => write!(f, "({}{})", operator, operand),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Assign { target, value, .. } => write!(f, "({} = {})", target, value),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "si {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " sino {}", alternative)?;
                }
                Ok(())
            }
            Expression::Function {
                parameters, body, ..
            } => write!(f, "func({}) {}", join(parameters, ", "), body),
            Expression::Call {
                callee, arguments, ..
            } => write!(f, "{}({})", callee, join(arguments, ", ")),
            Expression::Member {
                object,
                property,
                computed: false,
                ..
            } => write!(f, "{}.{}", object, property),
            Expression::Member {
                object,
                property,
                computed: true,
                ..
            } => write!(f, "{}[{}]", object, property),
            Expression::Object { properties, .. } => write!(f, "{{{}}}", join(properties, ", ")),
        }
    }
}
