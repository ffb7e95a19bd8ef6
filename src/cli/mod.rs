//! Command-line driver for the `pasfront` binary
//!
//! Reads one source file, tokenizes it, and prints either the token stream or
//! (after parsing) the syntax tree. Errors carry their line and column; the
//! binary prints them to stderr and exits with a failure status.

pub mod printer;
pub mod theme;

use crate::config::{Limits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKENS};
use crate::error::FrontendError;
use crate::parser::{Lexer, Parser};
use clap::{ArgAction, Parser as ClapParser, ValueEnum};
use printer::TreePrinter;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use theme::{Palette, DEFAULT_THEME};
use thiserror::Error;

/// Tokenize or parse a Pascal source file.
#[derive(Debug, ClapParser)]
#[command(name = "pasfront", version, long_about = None)]
pub struct Cli {
    /// Source file to read
    pub file: PathBuf,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Tokens)]
    pub emit: Emit,

    /// Never color the output
    #[arg(long)]
    pub no_color: bool,

    /// Maximum nesting depth of statements and expressions
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of tokens in the source
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: usize,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The token stream, one token per line
    Tokens,
    /// The parsed syntax tree
    Ast,
}

impl Cli {
    pub fn limits(&self) -> Limits {
        Limits::new(self.max_depth, self.max_tokens)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Color only when writing to a terminal and not told otherwise
    pub fn use_color(&self) -> bool {
        !self.no_color && io::stdout().is_terminal()
    }
}

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error("could not write output: {0}")]
    Write(#[from] io::Error),
}

/// Run the driver, writing the requested rendering to `out`
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CliError> {
    let source = fs::read_to_string(&cli.file).map_err(|source| CliError::Read {
        path: cli.file.clone(),
        source,
    })?;
    tracing::info!(file = %cli.file.display(), bytes = source.len(), "read source");

    let limits = cli.limits();
    let tokens = Lexer::with_limits(&source, limits)
        .tokenize()
        .map_err(FrontendError::from)?;

    let palette = Palette::new(&DEFAULT_THEME, cli.use_color());
    match cli.emit {
        Emit::Tokens => printer::write_tokens(out, &tokens, &palette)?,
        Emit::Ast => {
            let program = Parser::with_limits(limits)
                .parse(&tokens)
                .map_err(FrontendError::from)?;
            TreePrinter::new(out, &palette).program(&program)?;
        }
    }

    Ok(())
}
