//! # Introduction
//!
//! pasfront is the front end of a compiler for a Pascal-family language. It
//! turns source text into an abstract syntax tree for a later semantic-analysis
//! and code-generation stage.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST (Program)
//! ```
//!
//! 1. [`parser::lexer`]: tokenizes the source into positioned [`parser::Token`]s.
//! 2. [`parser::parse`]: recursive descent parser producing a [`parser::Program`].
//! 3. [`parser::ast`]: closed node types; every node knows its position.
//! 4. [`config`]: nesting depth and token count limits.
//! 5. [`cli`]: the `pasfront` command-line driver; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let program = pasfront::parse_source("program Foo; begin x := 1 + 2 end.").unwrap();
//! assert_eq!(program.name.name, "Foo");
//! assert_eq!(program.body.statements.len(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;

pub use config::Limits;
pub use error::FrontendError;

use parser::{Lexer, Parser, Program};

/// Tokenize and parse `source` with default limits
pub fn parse_source(source: &str) -> Result<Program, FrontendError> {
    parse_source_with_limits(source, Limits::default())
}

pub fn parse_source_with_limits(source: &str, limits: Limits) -> Result<Program, FrontendError> {
    let tokens = Lexer::with_limits(source, limits).tokenize()?;
    Ok(Parser::with_limits(limits).parse(&tokens)?)
}
