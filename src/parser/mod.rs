//! Pascal source code front end
//!
//! This module transforms Pascal source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), with the grammar split across
//!   `declarations`, `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Supported Pascal Subset
//!
//! - Program header, `var` and `const` sections
//! - Functions and procedures with value and `var` parameters and local variables
//! - Statements: assignment, procedure call, `begin ... end`, `if` / `else if` / `else`,
//!   `while`, `for ... to` / `downto`
//! - Expressions over identifiers, integer and string literals, calls, and the
//!   relational, additive, multiplicative and unary operators
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over a value-passed cursor, one method per
//! nonterminal. No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::{Node, NodeKind, Position, Program};
pub use lexer::{tokenize, LexError, Lexer, Token, TokenKind};
pub use parse::{parse, Cursor, ParseError, Parser};
