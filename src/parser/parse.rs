//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, the token [`Cursor`], and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, cursor, helper methods, and coordination
//! - `declarations`: program header, var/const sections, functions and procedures
//! - `statements`: blocks, `if`, `while`, `for`, assignments and call statements
//! - `expressions`: expression levels from relational down to primary
//!
//! # Cursor discipline
//!
//! Every parse method takes a [`Cursor`] by value and returns the node together
//! with the advanced cursor. A cursor is `Copy`, so a failed attempt can never
//! move the caller's position. Optional constructs return an [`Attempt`]:
//! `Ok(None)` means "not here" and leaves the caller where it was, while `Err`
//! means a committing keyword was consumed and the construct is malformed.
//!
//! # Error recovery
//!
//! The parser aborts on the first error. No partial tree is ever returned.

use crate::config::Limits;
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// Input ended while a construct still needed a token
    #[error("expected {expected} at {position}, found end of input")]
    MissingTerminal { expected: String, position: Position },

    #[error("integer literal {text} is out of range at {position}")]
    IntegerOutOfRange { text: String, position: Position },

    #[error("nesting deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::MissingTerminal { position, .. }
            | ParseError::IntegerOutOfRange { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Result of a parse method: the node plus the cursor just past it
pub type Parsed<'t, T> = Result<(T, Cursor<'t>), ParseError>;

/// Result of trying an optional construct
pub type Attempt<'t, T> = Result<Option<(T, Cursor<'t>)>, ParseError>;

/// Read position in a token slice.
///
/// Comment tokens are invisible to the cursor. `depth` counts the nesting
/// levels entered through [`Parser::nested`].
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
    depth: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
        .skip_comments()
    }

    fn skip_comments(mut self) -> Self {
        while self
            .tokens
            .get(self.index)
            .is_some_and(|t| t.kind == TokenKind::Comment)
        {
            self.index += 1;
        }
        self
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    #[must_use]
    pub fn advance(self) -> Self {
        if self.is_at_end() {
            return self;
        }
        Self {
            index: self.index + 1,
            ..self
        }
        .skip_comments()
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Position of the current token, or just past the last token at end of input
    pub fn location(&self) -> Position {
        match self.peek() {
            Some(token) => token.position(),
            None => self
                .tokens
                .last()
                .map(Token::end_position)
                .unwrap_or(Position::new(1, 1)),
        }
    }

    pub fn check_symbol(&self, symbol: &str) -> bool {
        self.peek().is_some_and(|t| t.is_symbol(symbol))
    }

    pub fn check_reserved(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.is_reserved(word))
    }

    pub fn check_identifier(&self) -> bool {
        self.peek().is_some_and(|t| t.kind == TokenKind::Identifier)
    }

    /// Cursor past `symbol` if it is the current token
    pub fn match_symbol(self, symbol: &str) -> Option<Self> {
        self.check_symbol(symbol).then(|| self.advance())
    }

    pub fn match_reserved(self, word: &str) -> Option<Self> {
        self.check_reserved(word).then(|| self.advance())
    }

    /// Error describing what was expected at this position
    pub fn expected(&self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                expected,
                found: found.to_string(),
                position: found.position(),
            },
            None => ParseError::MissingTerminal {
                expected,
                position: self.location(),
            },
        }
    }

    pub fn expect_symbol(self, symbol: &str, ctx: &str) -> Result<Self, ParseError> {
        self.match_symbol(symbol)
            .ok_or_else(|| self.expected(format!("'{symbol}' {ctx}")))
    }

    pub fn expect_reserved(self, word: &str, ctx: &str) -> Result<Self, ParseError> {
        self.match_reserved(word)
            .ok_or_else(|| self.expected(format!("'{word}' {ctx}")))
    }

    pub fn expect_identifier(self) -> Parsed<'t, Identifier> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => Ok((
                Identifier {
                    name: token.text.clone(),
                    info: token.info(),
                },
                self.advance(),
            )),
            _ => Err(self.expected("identifier")),
        }
    }
}

/// Recursive descent parser for the Pascal subset
#[derive(Debug, Clone, Default)]
pub struct Parser {
    limits: Limits,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Parse a whole token stream into a [`Program`]
    pub fn parse(&self, tokens: &[Token]) -> Result<Program, ParseError> {
        let (program, cursor) = self.parse_program(Cursor::new(tokens))?;

        if !cursor.is_at_end() {
            return Err(cursor.expected("end of input after '.'"));
        }

        tracing::debug!(
            program = %program.name.name,
            routines = program.routines.len(),
            statements = program.body.statements.len(),
            "parsed program"
        );
        Ok(program)
    }

    /// Run `parse` one nesting level deeper, failing once the depth limit is hit
    pub(crate) fn nested<'t, T>(
        &self,
        cursor: Cursor<'t>,
        parse: impl FnOnce(Cursor<'t>) -> Parsed<'t, T>,
    ) -> Parsed<'t, T> {
        if cursor.depth >= self.limits.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.limits.max_depth,
                position: cursor.location(),
            });
        }

        let (node, after) = parse(Cursor {
            depth: cursor.depth + 1,
            ..cursor
        })?;
        Ok((
            node,
            Cursor {
                depth: cursor.depth,
                ..after
            },
        ))
    }
}

/// Parse `tokens` with default limits
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new().parse(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_parse_minimal_program() {
        let tokens = tokenize("program Foo; begin end.").unwrap();
        let program = parse(&tokens).unwrap();

        assert_eq!(program.name.name, "Foo");
        assert_eq!(program.position(), Position::new(1, 1));
        assert_eq!(program.kind(), NodeKind::Program);
        assert!(program.vars.is_none());
        assert!(program.consts.is_none());
        assert!(program.body.statements.is_empty());
    }

    #[test]
    fn test_cursor_is_unchanged_by_failed_match() {
        let tokens = tokenize("x := 1").unwrap();
        let cursor = Cursor::new(&tokens);

        assert!(cursor.match_symbol(";").is_none());
        assert!(cursor.expect_reserved("begin", "here").is_err());
        assert_eq!(cursor.index, 0);

        let (ident, after) = cursor.expect_identifier().unwrap();
        assert_eq!(ident.name, "x");
        assert_eq!(after.index, 1);
        assert_eq!(cursor.index, 0);
    }

    #[test]
    fn test_cursor_skips_comments() {
        let tokens = tokenize("{ a } x { b } { c } y { d }").unwrap();
        let cursor = Cursor::new(&tokens);

        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("x"));
        assert_eq!(cursor.advance().peek().map(|t| t.text.as_str()), Some("y"));
        let end = cursor.advance().advance();
        assert!(end.is_at_end());
        assert!(end.peek().is_none());
    }

    #[test]
    fn test_empty_input_is_missing_terminal() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingTerminal {
                expected: "'program' at start of source".to_string(),
                position: Position::new(1, 1),
            }
        );
    }

    #[test]
    fn test_truncated_input_reports_end_position() {
        let tokens = tokenize("program Foo; begin x := 1").unwrap();
        let err = parse(&tokens).unwrap_err();

        assert!(matches!(err, ParseError::MissingTerminal { .. }));
        assert_eq!(err.position(), Position::new(1, 26));
    }

    #[test]
    fn test_tokens_after_final_dot() {
        let tokens = tokenize("program Foo; begin end. x").unwrap();
        let err = parse(&tokens).unwrap_err();

        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "end of input after '.'".to_string(),
                found: "identifier 'x'".to_string(),
                position: Position::new(1, 25),
            }
        );
    }

    #[test]
    fn test_trailing_comment_is_allowed() {
        let tokens = tokenize("program Foo; begin end. { done }").unwrap();
        assert!(parse(&tokens).is_ok());
    }

    #[test]
    fn test_nesting_limit() {
        let source = "program Deep; begin x := ((((((1)))))) end.";
        let tokens = tokenize(source).unwrap();

        let parser = Parser::with_limits(Limits::default().with_max_depth(4));
        let err = parser.parse(&tokens).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: 4, .. }));

        assert!(parse(&tokens).is_ok());
    }

    #[test]
    fn test_nested_restores_depth() {
        let tokens = tokenize("a b").unwrap();
        let parser = Parser::new();
        let cursor = Cursor::new(&tokens);

        let (depth_inside, after) = parser
            .nested(cursor, |c| Ok((c.depth, c.advance())))
            .unwrap();
        assert_eq!(depth_inside, 1);
        assert_eq!(after.depth, 0);
        assert_eq!(after.index, 1);
    }

    #[test]
    fn test_error_display_has_position() {
        let tokens = tokenize("program 42; begin end.").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected identifier, found number 42 at line 1, column 9"
        );
    }
}
