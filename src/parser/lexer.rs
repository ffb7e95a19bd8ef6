//! Lexer (tokenizer) for Pascal source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Comments are kept as [`TokenKind::Comment`] tokens so that diagnostic printers
//! can show them; the parser's cursor steps over them.
//!
//! At each position the extraction rules are tried in a fixed order: comment,
//! word (reserved word or identifier), number, symbol, string. The first rule
//! whose leading character matches owns the token.

use super::ast::{NodeInfo, Position};
use crate::config::Limits;
use rustc_hash::FxHashSet;
use std::fmt;
use thiserror::Error;

/// Words the grammar treats as terminals
pub const RESERVED_WORDS: [&str; 35] = [
    "and", "array", "begin", "case", "const", "div", "do", "downto", "else", "end", "file",
    "for", "function", "goto", "if", "in", "label", "mod", "nil", "not", "of", "or",
    "packed", "procedure", "program", "record", "repeat", "set", "then", "to", "type",
    "until", "var", "while", "with",
];

/// One- and two-character symbols. Every two-character symbol starts with a
/// one-character symbol, so one character of lookahead is always enough.
pub const SYMBOLS: [&str; 21] = [
    "+", "-", "*", "/", "=", "<", ">", "[", "]", ".", ",", ":", ";", "^", "(", ")", "<>",
    "<=", ">=", ":=", "..",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Symbol,
    ReservedWord,
    Identifier,
    Number,
    String,
    Comment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Symbol => "Symbol",
            TokenKind::ReservedWord => "ReservedWord",
            TokenKind::Identifier => "Identifier",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Comment => "Comment",
        };
        f.write_str(name)
    }
}

/// A positioned token.
///
/// `text` is the exact source text; strings keep their quotes and comments keep
/// their braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, position: Position, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            line: position.line,
            column: position.column,
            kind,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Position of the character just past this token
    pub fn end_position(&self) -> Position {
        let mut line = self.line;
        let mut column = self.column;
        for ch in self.text.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position::new(line, column)
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.kind == TokenKind::ReservedWord && self.text == word
    }

    /// Node info for a node whose leading token is this one
    pub fn info(&self) -> NodeInfo {
        NodeInfo::new(self.position(), self.text.clone())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Symbol => write!(f, "symbol '{}'", self.text),
            TokenKind::ReservedWord => write!(f, "reserved word '{}'", self.text),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::String => write!(f, "string {}", self.text),
            TokenKind::Comment => write!(f, "comment"),
        }
    }
}

/// Lexer error type. Any of these aborts the whole tokenize call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated comment starting at {position}")]
    UnterminatedComment { position: Position },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("unrecognized token {ch:?} at {position}")]
    UnrecognizedToken { ch: char, position: Position },

    #[error("more than {limit} tokens, stopped at {position}")]
    TooManyTokens { limit: usize, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedComment { position }
            | LexError::UnterminatedString { position }
            | LexError::UnrecognizedToken { position, .. }
            | LexError::TooManyTokens { position, .. } => *position,
        }
    }
}

/// Tokenize `source` with default limits
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Lexer for Pascal source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    limits: Limits,
    reserved: FxHashSet<&'static str>,
    symbols: FxHashSet<&'static str>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self::with_limits(input, Limits::default())
    }

    pub fn with_limits(input: &str, limits: Limits) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            limits,
            reserved: RESERVED_WORDS.into_iter().collect(),
            symbols: SYMBOLS.into_iter().collect(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            if tokens.len() >= self.limits.max_tokens {
                return Err(LexError::TooManyTokens {
                    limit: self.limits.max_tokens,
                    position: self.current_position(),
                });
            }

            tokens.push(self.next_token()?);
        }

        tracing::debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Extract the token starting at the current (non-whitespace) character
    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.current_position();

        if let Some(token) = self.extract_comment(start)? {
            return Ok(token);
        }
        if let Some(token) = self.extract_word(start) {
            return Ok(token);
        }
        if let Some(token) = self.extract_number(start) {
            return Ok(token);
        }
        if let Some(token) = self.extract_symbol(start) {
            return Ok(token);
        }
        if let Some(token) = self.extract_string(start)? {
            return Ok(token);
        }

        Err(LexError::UnrecognizedToken {
            ch: self.peek().unwrap_or('\0'),
            position: start,
        })
    }

    /// `{ ... }`, possibly spanning lines
    fn extract_comment(&mut self, start: Position) -> Result<Option<Token>, LexError> {
        if self.peek() != Some('{') {
            return Ok(None);
        }

        let mut text = String::new();
        while let Some(ch) = self.advance() {
            text.push(ch);
            if ch == '}' {
                return Ok(Some(Token::new(text, start, TokenKind::Comment)));
            }
        }

        Err(LexError::UnterminatedComment { position: start })
    }

    /// Reserved word or identifier, longest match
    fn extract_word(&mut self, start: Position) -> Option<Token> {
        if !self.peek()?.is_ascii_alphabetic() {
            return None;
        }

        let text = self.take_while(|ch| ch.is_ascii_alphanumeric());
        let kind = if self.reserved.contains(text.as_str()) {
            TokenKind::ReservedWord
        } else {
            TokenKind::Identifier
        };

        Some(Token::new(text, start, kind))
    }

    /// Unsigned decimal integer, longest match
    fn extract_number(&mut self, start: Position) -> Option<Token> {
        if !self.peek()?.is_ascii_digit() {
            return None;
        }

        let text = self.take_while(|ch| ch.is_ascii_digit());
        Some(Token::new(text, start, TokenKind::Number))
    }

    fn extract_symbol(&mut self, start: Position) -> Option<Token> {
        let first = self.peek()?;
        let mut text = String::from(first);
        if !self.symbols.contains(text.as_str()) {
            return None;
        }
        self.advance();

        if let Some(second) = self.peek() {
            text.push(second);
            if self.symbols.contains(text.as_str()) {
                self.advance();
            } else {
                text.pop();
            }
        }

        Some(Token::new(text, start, TokenKind::Symbol))
    }

    /// `'...'` closed on the same line; the quotes stay in the text
    fn extract_string(&mut self, start: Position) -> Result<Option<Token>, LexError> {
        if self.peek() != Some('\'') {
            return Ok(None);
        }
        self.advance();

        let mut text = String::from('\'');
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(LexError::UnterminatedString { position: start });
                }
                Some(ch) => {
                    self.advance();
                    text.push(ch);
                    if ch == '\'' {
                        return Ok(Some(Token::new(text, start, TokenKind::String)));
                    }
                }
            }
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}
