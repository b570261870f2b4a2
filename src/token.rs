use std::fmt;

/// Classification of a `Token`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,

    // Literals
    Identifier,
    Integer,
    Float,
    String,

    // Operators
    Assign,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,

    // Punctuation
    LeftParen,
    RightParen,
    LeftCurly,
    RightCurly,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,

    // Keywords
    True,
    False,
    If,
    Else,
    ElseIf,
    Function,
    Var,
    Let,
    Return,
    For,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "illegal",
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Assign => "=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftCurly => "{",
            TokenKind::RightCurly => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::True => "verdadero",
            TokenKind::False => "falso",
            TokenKind::If => "si",
            TokenKind::Else => "sino",
            TokenKind::ElseIf => "sinosi",
            TokenKind::Function => "func",
            TokenKind::Var => "var",
            TokenKind::Let => "let",
            TokenKind::Return => "regresa",
            TokenKind::For => "para",
        };
        write!(f, "{}", s)
    }
}

/// Where a token starts in the source text.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// Line number (starting at one).
    pub line: u32,
    /// Column in characters (starting at one).
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// "Words" produced by `Scanner`.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token.  String literals keep their content without quotes.
    pub text: String,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Position) -> Token {
        Token {
            kind,
            text: text.into(),
            pos,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Return the keyword spelled by `word`, if any.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, kind)| *kind)
}

const KEYWORDS: [(&str, TokenKind); 10] = [
    ("var", TokenKind::Var),
    ("let", TokenKind::Let),
    ("si", TokenKind::If),
    ("sino", TokenKind::Else),
    ("sinosi", TokenKind::ElseIf),
    ("verdadero", TokenKind::True),
    ("falso", TokenKind::False),
    ("func", TokenKind::Function),
    ("para", TokenKind::For),
    ("regresa", TokenKind::Return),
];
