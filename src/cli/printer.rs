//! Text renderings of the token stream and the syntax tree
//!
//! Tokens print one per line as `Kind: text (line, column)`. The tree prints as
//! an indented outline, one node per line, each suffixed with `@line:column`.

use super::theme::Palette;
use crate::parser::ast::*;
use crate::parser::lexer::Token;
use std::io::{self, Write};

const INDENT: &str = "  ";

pub fn write_tokens<W: Write>(out: &mut W, tokens: &[Token], palette: &Palette) -> io::Result<()> {
    for token in tokens {
        let color = palette.theme.token_color(token.kind);
        // Multi-line comments stay on one output line
        let text = token.text.replace('\n', "\\n");
        writeln!(
            out,
            "{}: {} ({}, {})",
            palette.paint(&token.kind.to_string(), color),
            palette.paint(&text, color),
            token.line,
            token.column
        )?;
    }
    Ok(())
}

/// Writes a [`Program`] as an indented outline
pub struct TreePrinter<'a, W: Write> {
    out: &'a mut W,
    palette: &'a Palette<'a>,
    depth: usize,
}

impl<'a, W: Write> TreePrinter<'a, W> {
    pub fn new(out: &'a mut W, palette: &'a Palette<'a>) -> Self {
        Self {
            out,
            palette,
            depth: 0,
        }
    }

    pub fn program(&mut self, program: &Program) -> io::Result<()> {
        self.line("Program", &program.name.name, program.position())?;
        self.indented(|p| {
            if let Some(vars) = &program.vars {
                p.line("Var", "", vars.position())?;
                p.indented(|p| vars.decls.iter().try_for_each(|decl| p.var_decl(decl)))?;
            }
            if let Some(consts) = &program.consts {
                p.line("Const", "", consts.position())?;
                p.indented(|p| {
                    consts.decls.iter().try_for_each(|decl| {
                        p.line("ConstDecl", &decl.name.name, decl.position())?;
                        p.indented(|p| p.expr(&decl.value))
                    })
                })?;
            }
            for routine in &program.routines {
                p.routine(routine)?;
            }
            p.block(&program.body)
        })
    }

    fn routine(&mut self, routine: &Routine) -> io::Result<()> {
        match routine.return_type() {
            Some(return_type) => self.line(
                "Function",
                &format!("{}: {}", routine.name.name, return_type.name),
                routine.position(),
            )?,
            None => self.line("Procedure", &routine.name.name, routine.position())?,
        }

        self.indented(|p| {
            for param in &routine.params {
                let by_ref = if param.by_reference { "var " } else { "" };
                p.line(
                    "Parameter",
                    &format!("{by_ref}{}: {}", param.name.name, param.type_ident.name),
                    param.position(),
                )?;
            }
            for local in &routine.locals {
                p.var_decl(local)?;
            }
            p.block(&routine.body)
        })
    }

    fn var_decl(&mut self, decl: &VarDecl) -> io::Result<()> {
        self.line(
            "VarDecl",
            &format!("{}: {}", decl.name.name, decl.type_ident.name),
            decl.position(),
        )?;
        match &decl.init {
            Some(init) => self.indented(|p| p.expr(init)),
            None => Ok(()),
        }
    }

    fn block(&mut self, block: &Block) -> io::Result<()> {
        self.line("Block", "", block.position())?;
        self.indented(|p| block.statements.iter().try_for_each(|s| p.statement(s)))
    }

    fn statement(&mut self, statement: &Statement) -> io::Result<()> {
        match statement {
            Statement::Assignment(assign) => {
                self.line("Assignment", &assign.target.name, assign.position())?;
                self.indented(|p| p.expr(&assign.value))
            }
            Statement::Call(call) => self.call(call),
            Statement::If(stmt) => {
                self.line("If", "", stmt.position())?;
                self.indented(|p| {
                    for branch in &stmt.branches {
                        p.branch(branch)?;
                    }
                    match &stmt.otherwise {
                        Some(block) => {
                            p.line("Else", "", block.position())?;
                            p.indented(|p| p.block(block))
                        }
                        None => Ok(()),
                    }
                })
            }
            Statement::While(stmt) => {
                self.line("While", "", stmt.position())?;
                self.indented(|p| p.branch(&stmt.branch))
            }
            Statement::For(stmt) => {
                let direction = if stmt.downto { "downto" } else { "to" };
                self.line(
                    "For",
                    &format!("{} {direction}", stmt.variable.name),
                    stmt.position(),
                )?;
                self.indented(|p| {
                    p.expr(&stmt.init)?;
                    p.expr(&stmt.terminal)?;
                    p.block(&stmt.body)
                })
            }
            Statement::Block(block) => self.block(block),
        }
    }

    fn branch(&mut self, branch: &ConditionalBranch) -> io::Result<()> {
        self.line("Branch", "", branch.position())?;
        self.indented(|p| {
            p.expr(&branch.condition)?;
            p.block(&branch.body)
        })
    }

    fn call(&mut self, call: &Call) -> io::Result<()> {
        self.line("Call", &call.routine.name, call.position())?;
        self.indented(|p| call.args.iter().try_for_each(|arg| p.expr(&arg.value)))
    }

    fn expr(&mut self, expr: &Expr) -> io::Result<()> {
        match expr {
            Expr::Identifier(ident) => self.line("Identifier", &ident.name, ident.position()),
            Expr::Integer(lit) => self.line("Integer", &lit.value.to_string(), lit.position()),
            Expr::String(lit) => self.line("String", &lit.info.text, lit.position()),
            Expr::Call(call) => self.call(call),
            Expr::Binary {
                op, left, right, ..
            } => {
                self.line("Operator", op.text(), expr.position())?;
                self.indented(|p| {
                    p.expr(left)?;
                    p.expr(right)
                })
            }
            Expr::Unary { op, operand, .. } => {
                self.line("Operator", op.text(), expr.position())?;
                self.indented(|p| p.expr(operand))
            }
        }
    }

    fn line(&mut self, label: &str, detail: &str, position: Position) -> io::Result<()> {
        let theme = self.palette.theme;
        let label = self.palette.paint(label, theme.node);
        let at = self
            .palette
            .paint(&format!("@{}:{}", position.line, position.column), theme.position);

        write!(self.out, "{}{}", INDENT.repeat(self.depth), label)?;
        if !detail.is_empty() {
            write!(self.out, " {detail}")?;
        }
        writeln!(self.out, " {at}")
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self) -> io::Result<()>) -> io::Result<()> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
