//! Lexical analyzer

use std::iter::Peekable;
use std::str::CharIndices;

use crate::token::{self, Position, Token, TokenKind};

/// Turn source text into a sequence of tokens.
///
/// The scanner never fails: characters it does not understand become `TokenKind::Illegal`
/// tokens and are reported later by the parser.
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    input: Peekable<CharIndices<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner operating on `source`.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            input: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Scan next token and return it.  Keeps returning `TokenKind::Eof` once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            let start = self.position();
            let ch = match self.next_char() {
                None => return Token::new(TokenKind::Eof, "", start),
                Some(ch) => ch,
            };
            let kind = match ch {
                ' ' | '\t' | '\r' | '\n' => continue,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => {
                    if self.peek_char() == Some('/') {
                        self.skip_comment();
                        continue;
                    }
                    TokenKind::Slash
                }
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '{' => TokenKind::LeftCurly,
                '}' => TokenKind::RightCurly,
                '[' => TokenKind::LeftBracket,
                ']' => TokenKind::RightBracket,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                ':' => TokenKind::Colon,
                '.' => TokenKind::Dot,
                '=' => self.pair('=', TokenKind::Equal, TokenKind::Assign),
                '!' => self.pair('=', TokenKind::NotEqual, TokenKind::Bang),
                '<' => self.pair('=', TokenKind::LessEqual, TokenKind::Less),
                '>' => self.pair('=', TokenKind::GreaterEqual, TokenKind::Greater),
                '"' => return self.scan_string(start),
                '0'..='9' => return self.scan_number(start),
                ch if is_letter(ch) => return self.scan_identifier(start),
                _ => TokenKind::Illegal,
            };
            return self.token_from(kind, start);
        }
    }

    /// Consumes `second` if it comes next and returns `joined`, otherwise returns `single`.
    fn pair(&mut self, second: char, joined: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek_char() == Some(second) {
            self.next_char();
            joined
        } else {
            single
        }
    }

    fn scan_number(&mut self, start: Position) -> Token {
        self.skip_digits();
        if self.peek_char() != Some('.') {
            return self.token_from(TokenKind::Integer, start);
        }

        self.next_char();
        match self.peek_char() {
            Some(ch) if ch.is_ascii_digit() => {
                self.skip_digits();
                self.token_from(TokenKind::Float, start)
            }
            // "12." is rejected as a whole rather than split into "12" and ".".
            _ => self.token_from(TokenKind::Illegal, start),
        }
    }

    fn skip_digits(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.next_char();
        }
    }

    fn scan_identifier(&mut self, start: Position) -> Token {
        while let Some(ch) = self.peek_char() {
            if !is_letter(ch) {
                break;
            }
            self.next_char();
        }

        let end = self.offset();
        let word = &self.source[start.offset..end];
        let kind = token::keyword(word).unwrap_or(TokenKind::Identifier);
        Token::new(kind, word, start)
    }

    fn scan_string(&mut self, start: Position) -> Token {
        loop {
            match self.next_char() {
                Some('"') => break,
                Some(_) => (),
                None => return self.token_from(TokenKind::Illegal, start),
            }
        }

        let end = self.offset();
        let content = &self.source[start.offset + 1..end - 1];
        Token::new(TokenKind::String, content, start)
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn token_from(&mut self, kind: TokenKind, start: Position) -> Token {
        let end = self.offset();
        Token::new(kind, &self.source[start.offset..end], start)
    }

    fn next_char(&mut self) -> Option<char> {
        let (_, ch) = self.input.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().map(|(_, ch)| *ch)
    }

    fn offset(&mut self) -> usize {
        self.input
            .peek()
            .map(|(offset, _)| *offset)
            .unwrap_or(self.source.len())
    }

    fn position(&mut self) -> Position {
        Position {
            offset: self.offset(),
            line: self.line,
            column: self.column,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Scans all of `source`.  The last token is always the single `TokenKind::Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = vec![];
    loop {
        let token = scanner.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || "áéíóúÁÉÍÓÚñÑ".contains(ch)
}
