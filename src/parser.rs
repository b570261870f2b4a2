//! Operator-precedence (Pratt) parser.
//!
//! The parser looks at two tokens at a time, `current` and `peek`.  Syntax errors do not stop
//! parsing: they are collected, the production that failed yields nothing, and parsing resumes
//! with the next token so that one pass reports as many independent errors as possible.

use std::mem;

use tracing::debug;

use crate::ast::{
    Block, Expression, Identifier, InfixOp, PrefixOp, Program, Property, Statement,
};
use crate::config::Config;
use crate::diag::{ParseError, ParseErrorKind};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Binding power of infix operators, weakest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum Precedence {
    Lowest,
    Assign,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Assign => Precedence::Assign,
            TokenKind::Equal | TokenKind::NotEqual => Precedence::Equals,
            TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Star | TokenKind::Slash => Precedence::Product,
            TokenKind::LeftParen | TokenKind::Dot | TokenKind::LeftBracket => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
    depth: usize,
    max_nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Parser<'a> {
        Self::with_config(source, &Config::default())
    }

    pub fn with_config(source: &'a str, config: &Config) -> Parser<'a> {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        let peek = scanner.next_token();
        Parser {
            scanner,
            current,
            peek,
            errors: vec![],
            depth: 0,
            max_nesting: config.max_nesting,
        }
    }

    /// Syntax errors collected so far.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];
        while self.current.kind != TokenKind::Eof {
            self.statement_or_recover(&mut statements);
            self.advance();
        }
        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program { statements }
    }

    // Statement parsers leave the last token of the statement as the current token.

    fn statement_or_recover(&mut self, statements: &mut Vec<Statement>) {
        let errors = self.errors.len();
        match self.statement() {
            Some(stmt) => statements.push(stmt),
            None if self.errors.len() > errors => self.synchronize(),
            None => (),
        }
    }

    /// Skips the rest of a malformed statement: up to its `;` or to just before the `}` closing
    /// the enclosing block.  Braces opened on the way are skipped whole.
    fn synchronize(&mut self) {
        let mut braces = 0usize;
        loop {
            match self.current.kind {
                TokenKind::Eof => return,
                TokenKind::LeftCurly => braces += 1,
                TokenKind::RightCurly => braces = braces.saturating_sub(1),
                TokenKind::Semicolon if braces == 0 => return,
                _ => (),
            }
            if braces == 0 && matches!(self.peek.kind, TokenKind::RightCurly | TokenKind::Eof) {
                return;
            }
            self.advance();
        }
    }

    fn statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Semicolon => None,
            TokenKind::Var | TokenKind::Let => self.var_decl(),
            TokenKind::Return => self.return_stmt(),
            TokenKind::Function if self.peek.kind == TokenKind::Identifier => self.fun_decl(),
            _ => self.expression_stmt(),
        }
    }

    /// Parse variable declaration.
    /// Current token is `var` or `let`.
    fn var_decl(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let constant = token.kind == TokenKind::Let;
        let name = self.expect_identifier()?;
        let value = if self.peek.kind == TokenKind::Assign {
            self.advance();
            self.advance();
            Some(self.expression(Precedence::Lowest)?)
        } else if constant {
            self.errors.push(ParseError {
                pos: name.token.pos,
                kind: ParseErrorKind::MissingInitializer(name.name.clone()),
            });
            self.skip_semicolon();
            return None;
        } else {
            None
        };
        self.skip_semicolon();
        Some(Statement::Var {
            token,
            name,
            value,
            constant,
        })
    }

    fn return_stmt(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let value = match self.peek.kind {
            TokenKind::Semicolon | TokenKind::RightCurly | TokenKind::Eof => None,
            _ => {
                self.advance();
                Some(self.expression(Precedence::Lowest)?)
            }
        };
        self.skip_semicolon();
        Some(Statement::Return { token, value })
    }

    fn fun_decl(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let name = self.expect_identifier()?;
        let (parameters, body) = self.function_rest()?;
        self.skip_semicolon();
        Some(Statement::Function {
            token,
            name,
            parameters,
            body,
        })
    }

    fn expression_stmt(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let expression = self.expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Expression { token, expression })
    }

    /// Current token is `{`.  Leaves the matching `}` as the current token.
    fn block(&mut self) -> Option<Block> {
        let token = self.current.clone();
        let mut statements = vec![];
        self.advance();
        while self.current.kind != TokenKind::RightCurly {
            if self.current.kind == TokenKind::Eof {
                self.errors.push(ParseError {
                    pos: token.pos,
                    kind: ParseErrorKind::UnterminatedBlock,
                });
                return None;
            }
            self.statement_or_recover(&mut statements);
            self.advance();
        }
        Some(Block { token, statements })
    }

    /// Parses `(parameters) { body }` following `func` or a function name.
    fn function_rest(&mut self) -> Option<(Vec<Identifier>, Block)> {
        self.expect_peek(TokenKind::LeftParen)?;
        let parameters = self.parameters()?;
        self.expect_peek(TokenKind::LeftCurly)?;
        let body = self.block()?;
        Some((parameters, body))
    }

    fn parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = vec![];
        if self.peek.kind == TokenKind::RightParen {
            self.advance();
            return Some(params);
        }
        params.push(self.expect_identifier()?);
        while self.peek.kind == TokenKind::Comma {
            self.advance();
            params.push(self.expect_identifier()?);
        }
        self.expect_peek(TokenKind::RightParen)?;
        Some(params)
    }

    /// Accounts for one more level of nesting in the tree being built.
    fn enter(&mut self) -> Option<()> {
        if self.depth >= self.max_nesting {
            self.error(ParseErrorKind::NestingTooDeep(self.max_nesting));
            return None;
        }
        self.depth += 1;
        Some(())
    }

    fn expression(&mut self, precedence: Precedence) -> Option<Expression> {
        self.enter()?;
        let expr = self.expression_at_depth(precedence);
        self.depth -= 1;
        expr
    }

    fn expression_at_depth(&mut self, precedence: Precedence) -> Option<Expression> {
        let left = self.prefix()?;
        let outer = self.depth;
        let expr = self.fold_infix(precedence, left);
        self.depth = outer;
        expr
    }

    /// Each operator folded into `left` wraps it one level deeper.
    fn fold_infix(&mut self, precedence: Precedence, mut left: Expression) -> Option<Expression> {
        while self.peek.kind != TokenKind::Semicolon && precedence < Precedence::of(self.peek.kind)
        {
            self.enter()?;
            self.advance();
            left = self.infix(left)?;
        }
        Some(left)
    }

    fn prefix(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::Identifier => Some(Expression::Identifier(Identifier::new(token))),
            TokenKind::Integer => match token.text.parse::<i64>() {
                Ok(value) => Some(Expression::Integer { token, value }),
                Err(_) => {
                    self.error(ParseErrorKind::BadIntegerLiteral(token.text));
                    None
                }
            },
            TokenKind::Float => match token.text.parse::<f64>() {
                Ok(value) => Some(Expression::Float { token, value }),
                Err(_) => {
                    self.error(ParseErrorKind::BadFloatLiteral(token.text));
                    None
                }
            },
            TokenKind::True | TokenKind::False => Some(Expression::Boolean {
                value: token.kind == TokenKind::True,
                token,
            }),
            TokenKind::String => Some(Expression::Str {
                value: token.text.clone(),
                token,
            }),
            TokenKind::Bang | TokenKind::Minus => self.prefix_expr(token),
            TokenKind::LeftParen => self.grouped(),
            TokenKind::Function => self.function_literal(token),
            TokenKind::If => self.if_expr(token),
            TokenKind::LeftCurly => self.object_literal(token),
            TokenKind::Illegal => {
                self.error(ParseErrorKind::IllegalToken(token.text));
                None
            }
            _ => {
                self.error(ParseErrorKind::NoPrefixParser(token.to_string()));
                None
            }
        }
    }

    fn prefix_expr(&mut self, token: Token) -> Option<Expression> {
        let operator = if token.kind == TokenKind::Bang {
            PrefixOp::Not
        } else {
            PrefixOp::Negate
        };
        self.advance();
        let operand = self.expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            operand: Box::new(operand),
        })
    }

    fn grouped(&mut self) -> Option<Expression> {
        self.advance();
        let expr = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;
        Some(expr)
    }

    fn function_literal(&mut self, token: Token) -> Option<Expression> {
        let (parameters, body) = self.function_rest()?;
        Some(Expression::Function {
            token,
            parameters,
            body,
        })
    }

    /// Current token is `si` or `sinosi`.
    fn if_expr(&mut self, token: Token) -> Option<Expression> {
        self.expect_peek(TokenKind::LeftParen)?;
        self.advance();
        let condition = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;
        self.expect_peek(TokenKind::LeftCurly)?;
        let consequence = self.block()?;

        let alternative = match self.peek.kind {
            TokenKind::Else => {
                self.advance();
                self.expect_peek(TokenKind::LeftCurly)?;
                Some(self.block()?)
            }
            TokenKind::ElseIf => {
                // `sinosi` is an `if` nested in the alternative branch.
                self.advance();
                let chained = self.current.clone();
                self.enter()?;
                let nested = self.if_expr(chained.clone());
                self.depth -= 1;
                let nested = nested?;
                Some(Block {
                    token: chained.clone(),
                    statements: vec![Statement::Expression {
                        token: chained,
                        expression: nested,
                    }],
                })
            }
            _ => None,
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    /// Current token is `{`.
    fn object_literal(&mut self, token: Token) -> Option<Expression> {
        let mut properties = vec![];
        while self.peek.kind != TokenKind::RightCurly {
            let key = self.expect_identifier()?;
            let value = if self.peek.kind == TokenKind::Colon {
                self.advance();
                self.advance();
                Some(self.expression(Precedence::Lowest)?)
            } else {
                None
            };
            properties.push(Property { key, value });
            if self.peek.kind != TokenKind::Comma {
                break;
            }
            self.advance();
        }
        self.expect_peek(TokenKind::RightCurly)?;
        Some(Expression::Object { token, properties })
    }

    /// Current token is the operator following `left`.
    fn infix(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = match token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Equal => InfixOp::Equal,
            TokenKind::NotEqual => InfixOp::NotEqual,
            TokenKind::Less => InfixOp::Less,
            TokenKind::LessEqual => InfixOp::LessEqual,
            TokenKind::Greater => InfixOp::Greater,
            TokenKind::GreaterEqual => InfixOp::GreaterEqual,
            TokenKind::Assign => return self.assignment(token, left),
            TokenKind::LeftParen => return self.call(token, left),
            TokenKind::Dot => return self.member(token, left),
            TokenKind::LeftBracket => return self.index(token, left),
            // Only kinds with a binding power above `Lowest` reach this point.
            _ => return Some(left),
        };
        let precedence = Precedence::of(token.kind);
        self.advance();
        let right = self.expression(precedence)?;
        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn assignment(&mut self, token: Token, target: Expression) -> Option<Expression> {
        let target = match target {
            Expression::Identifier(ident) => ident,
            _ => {
                self.error(ParseErrorKind::InvalidAssignmentTarget);
                return None;
            }
        };
        self.advance();
        // Right associative: `a = b = c` is `a = (b = c)`.
        let value = self.expression(Precedence::Lowest)?;
        Some(Expression::Assign {
            token,
            target,
            value: Box::new(value),
        })
    }

    fn call(&mut self, token: Token, callee: Expression) -> Option<Expression> {
        let arguments = self.expression_list(TokenKind::RightParen)?;
        Some(Expression::Call {
            token,
            callee: Box::new(callee),
            arguments,
        })
    }

    fn member(&mut self, token: Token, object: Expression) -> Option<Expression> {
        let property = self.expect_identifier()?;
        Some(Expression::Member {
            token,
            object: Box::new(object),
            property: Box::new(Expression::Identifier(property)),
            computed: false,
        })
    }

    fn index(&mut self, token: Token, object: Expression) -> Option<Expression> {
        self.advance();
        let property = self.expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightBracket)?;
        Some(Expression::Member {
            token,
            object: Box::new(object),
            property: Box::new(property),
            computed: true,
        })
    }

    /// Comma separated expressions up to `end`.  Current token opens the list.
    fn expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut items = vec![];
        if self.peek.kind == end {
            self.advance();
            return Some(items);
        }
        self.advance();
        items.push(self.expression(Precedence::Lowest)?);
        while self.peek.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            items.push(self.expression(Precedence::Lowest)?);
        }
        self.expect_peek(end)?;
        Some(items)
    }

    fn expect_identifier(&mut self) -> Option<Identifier> {
        self.expect_peek(TokenKind::Identifier)?;
        Some(Identifier::new(self.current.clone()))
    }

    /// Advances if the next token is `expected`, otherwise records an error and leaves the
    /// token stream untouched.
    fn expect_peek(&mut self, expected: TokenKind) -> Option<()> {
        if self.peek.kind == expected {
            self.advance();
            Some(())
        } else {
            self.errors.push(ParseError {
                pos: self.peek.pos,
                kind: ParseErrorKind::UnexpectedToken {
                    expected,
                    found: self.peek.to_string(),
                },
            });
            None
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }
    }

    fn advance(&mut self) {
        let next = self.scanner.next_token();
        self.current = mem::replace(&mut self.peek, next);
    }

    fn error(&mut self, kind: ParseErrorKind) {
        self.errors.push(ParseError {
            pos: self.current.pos,
            kind,
        });
    }
}

/// Parses `source` with the default limits.
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    parse_with_config(source, &Config::default())
}

pub fn parse_with_config(source: &str, config: &Config) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::with_config(source, config);
    let program = parser.parse_program();
    (program, parser.errors)
}
