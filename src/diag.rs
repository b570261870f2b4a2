use thiserror::Error;

use crate::token::{Position, TokenKind};

/// A syntax error together with where it was found.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("syntax error: {pos}: {kind}")]
pub struct ParseError {
    pub pos: Position,
    pub kind: ParseErrorKind,
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseErrorKind {
    #[error("expected '{expected}' but found '{found}'")]
    UnexpectedToken { expected: TokenKind, found: String },
    #[error("no parse function for token '{0}'")]
    NoPrefixParser(String),
    #[error("illegal token '{0}'")]
    IllegalToken(String),
    #[error("cannot parse integer literal: {0}")]
    BadIntegerLiteral(String),
    #[error("cannot parse floating point literal: {0}")]
    BadFloatLiteral(String),
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("constant '{0}' must be initialized")]
    MissingInitializer(String),
    #[error("unterminated block: expected '}}' before end of input")]
    UnterminatedBlock,
    #[error("expression nested too deeply (limit is {0})")]
    NestingTooDeep(usize),
}
