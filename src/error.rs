//! Errors surfaced by the front end as a whole
//!
//! [`FrontendError`] joins the tokenizer's [`LexError`] and the parser's
//! [`ParseError`] so callers that run both stages can use a single `?`.

use crate::parser::ast::Position;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
}

impl FrontendError {
    pub fn position(&self) -> Position {
        match self {
            FrontendError::Lex(err) => err.position(),
            FrontendError::Parse(err) => err.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[test]
    fn test_lex_error_converts() {
        let err = parse_source("program P; begin x := 'oops end.").unwrap_err();
        assert!(matches!(err, FrontendError::Lex(LexError::UnterminatedString { .. })));
        assert_eq!(err.position(), Position::new(1, 23));
        assert_eq!(
            err.to_string(),
            "lexical error: unterminated string starting at line 1, column 23"
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let err = parse_source("program P; begin x := end.").unwrap_err();
        assert!(matches!(err, FrontendError::Parse(_)));
        assert_eq!(err.position(), Position::new(1, 23));
    }
}
