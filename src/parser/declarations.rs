//! Declaration parsing implementation
//!
//! This module handles parsing of the declarative parts of a Pascal program:
//!
//! - Program header: `program Name;`
//! - Variable sections: `var a, b: integer; c: string = 'x';`
//! - Constant sections: `const Max = 10;`
//! - Routines: `function F(var a: integer; b: integer): integer; ... begin ... end;`
//!
//! # Grammar
//!
//! ```text
//! program      ::= "program" ident ";" [var_section] [const_section] {routine} block "."
//! var_section  ::= "var" (ident {"," ident} ":" ident ["=" expr] ";")+
//! const_section ::= "const" (ident "=" expr ";")+
//! routine      ::= ("function" | "procedure") ident ["(" [params] ")"] [":" ident] ";"
//!                  [var_section] block ";"
//! params       ::= param {";" param}
//! param        ::= ["var"] ident {"," ident} ":" ident
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{Attempt, Cursor, Parsed, Parser};

impl Parser {
    /// Parse the whole program, up to and including the final `.`
    pub(crate) fn parse_program<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Program> {
        let Some(keyword) = cursor.peek().filter(|t| t.is_reserved("program")) else {
            return Err(cursor.expected("'program' at start of source"));
        };
        let info = keyword.info();

        let (name, cursor) = cursor.advance().expect_identifier()?;
        let cursor = cursor.expect_symbol(";", "after program name")?;

        let (vars, cursor) = present(self.try_parse_var_section(cursor)?, cursor);
        let (consts, cursor) = present(self.try_parse_const_section(cursor)?, cursor);

        let mut routines = Vec::new();
        let mut cursor = cursor;
        while let Some((routine, next)) = self.try_parse_routine(cursor)? {
            routines.push(routine);
            cursor = next;
        }

        let (body, cursor) = self.parse_block(cursor)?;
        let cursor = cursor.expect_symbol(".", "after program body")?;

        Ok((
            Program {
                name,
                vars,
                consts,
                routines,
                body,
                info,
            },
            cursor,
        ))
    }

    /// `var` section; `Ok(None)` when the next token is not `var`
    pub(crate) fn try_parse_var_section<'t>(&self, cursor: Cursor<'t>) -> Attempt<'t, VarSection> {
        let Some(var) = cursor.peek().filter(|t| t.is_reserved("var")) else {
            return Ok(None);
        };
        let mut cursor = cursor.advance();

        let mut decls = Vec::new();
        loop {
            let (group, next) = self.parse_var_group(cursor)?;
            decls.extend(group);
            cursor = next;

            if !cursor.check_identifier() {
                break;
            }
        }

        Ok(Some((
            VarSection {
                decls,
                info: var.info(),
            },
            cursor,
        )))
    }

    /// `a, b: integer;` or `a: integer = expr;`
    fn parse_var_group<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Vec<VarDecl>> {
        let (names, cursor) = self.parse_identifier_list(cursor)?;
        let cursor = cursor.expect_symbol(":", "after variable names")?;
        let (type_ident, cursor) = cursor.expect_identifier()?;

        // An initializer is only accepted for a single name
        let (mut init, cursor) = match cursor.match_symbol("=") {
            Some(next) if names.len() == 1 => {
                let (value, next) = self.parse_expression(next)?;
                (Some(value), next)
            }
            _ => (None, cursor),
        };
        let cursor = cursor.expect_symbol(";", "after variable declaration")?;

        let decls = names
            .into_iter()
            .map(|name| VarDecl {
                info: name.info.clone(),
                type_ident: type_ident.clone(),
                init: init.take(),
                name,
            })
            .collect();

        Ok((decls, cursor))
    }

    /// `const` section; `Ok(None)` when the next token is not `const`
    pub(crate) fn try_parse_const_section<'t>(
        &self,
        cursor: Cursor<'t>,
    ) -> Attempt<'t, ConstSection> {
        let Some(keyword) = cursor.peek().filter(|t| t.is_reserved("const")) else {
            return Ok(None);
        };
        let mut cursor = cursor.advance();

        let mut decls = Vec::new();
        loop {
            let (name, next) = cursor.expect_identifier()?;
            let next = next.expect_symbol("=", "after constant name")?;
            let (value, next) = self.parse_expression(next)?;
            cursor = next.expect_symbol(";", "after constant value")?;

            decls.push(ConstDecl {
                info: name.info.clone(),
                name,
                value,
            });

            if !cursor.check_identifier() {
                break;
            }
        }

        Ok(Some((
            ConstSection {
                decls,
                info: keyword.info(),
            },
            cursor,
        )))
    }

    /// Function or procedure declaration; `Ok(None)` when neither keyword is next
    pub(crate) fn try_parse_routine<'t>(&self, cursor: Cursor<'t>) -> Attempt<'t, Routine> {
        let Some(keyword) = cursor.peek() else {
            return Ok(None);
        };
        let is_function = if keyword.is_reserved("function") {
            true
        } else if keyword.is_reserved("procedure") {
            false
        } else {
            return Ok(None);
        };

        let (name, cursor) = cursor.advance().expect_identifier()?;
        tracing::trace!(routine = %name.name, is_function, "parsing routine");

        let (params, cursor) = match cursor.match_symbol("(") {
            Some(next) => {
                let (params, next) = self.parse_parameter_list(next)?;
                (params, next.expect_symbol(")", "after parameters")?)
            }
            None => (Vec::new(), cursor),
        };

        let (kind, cursor) = if is_function {
            let cursor = cursor.expect_symbol(":", "before function return type")?;
            let (return_type, cursor) = cursor.expect_identifier()?;
            (RoutineKind::Function { return_type }, cursor)
        } else {
            (RoutineKind::Procedure, cursor)
        };
        let cursor = cursor.expect_symbol(";", "after routine heading")?;

        let (locals, cursor) = match self.try_parse_var_section(cursor)? {
            Some((section, next)) => (section.decls, next),
            None => (Vec::new(), cursor),
        };

        let (body, cursor) = self.parse_block(cursor)?;
        let cursor = cursor.expect_symbol(";", "after routine body")?;

        Ok(Some((
            Routine {
                kind,
                name,
                params,
                locals,
                body,
                info: keyword.info(),
            },
            cursor,
        )))
    }

    /// Parameters between the parentheses; empty when `)` follows directly
    fn parse_parameter_list<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Vec<Parameter>> {
        let mut params = Vec::new();
        if cursor.check_symbol(")") {
            return Ok((params, cursor));
        }

        let mut cursor = cursor;
        loop {
            let (group, next) = self.parse_parameter_group(cursor)?;
            params.extend(group);

            match next.match_symbol(";") {
                Some(after) => cursor = after,
                None => return Ok((params, next)),
            }
        }
    }

    /// `[var] a, b: integer`
    fn parse_parameter_group<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Vec<Parameter>> {
        let var_info = cursor.peek().filter(|t| t.is_reserved("var")).map(|t| t.info());
        let cursor = cursor.match_reserved("var").unwrap_or(cursor);
        let by_reference = var_info.is_some();

        let (names, cursor) = self.parse_identifier_list(cursor)?;
        let cursor = cursor.expect_symbol(":", "after parameter names")?;
        let (type_ident, cursor) = cursor.expect_identifier()?;

        let params = names
            .into_iter()
            .map(|name| Parameter {
                info: var_info.clone().unwrap_or_else(|| name.info.clone()),
                type_ident: type_ident.clone(),
                by_reference,
                name,
            })
            .collect();

        Ok((params, cursor))
    }

    /// `a {, b}`
    fn parse_identifier_list<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Vec<Identifier>> {
        let (first, mut cursor) = cursor.expect_identifier()?;
        let mut names = vec![first];

        while let Some(next) = cursor.match_symbol(",") {
            let (name, next) = next.expect_identifier()?;
            names.push(name);
            cursor = next;
        }

        Ok((names, cursor))
    }
}

/// Unpack an attempt, falling back to `cursor` when the construct was absent
fn present<'t, T>(attempt: Option<(T, Cursor<'t>)>, cursor: Cursor<'t>) -> (Option<T>, Cursor<'t>) {
    match attempt {
        Some((node, next)) => (Some(node), next),
        None => (None, cursor),
    }
}
