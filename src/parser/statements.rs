//! Statement parsing implementation
//!
//! This module handles parsing of all Pascal statement types:
//!
//! - Compound statements: `begin ... end`
//! - Control flow: `if`, `while`, `for`
//! - Assignments: `x := expr`
//! - Procedure calls: `writeln('x')`, `Reset`
//!
//! # Grammar
//!
//! ```text
//! block     ::= "begin" [statement] {";" [statement]} "end"
//! statement ::= if_stmt | while_stmt | for_stmt | block | assignment | call
//! if_stmt   ::= "if" expr "then" statement {"else" "if" expr "then" statement}
//!               ["else" statement]
//! while_stmt ::= "while" expr "do" statement
//! for_stmt  ::= "for" ident ":=" expr ("to" | "downto") expr "do" statement
//! ```
//!
//! The keyword that starts a statement commits to that statement form: once
//! `if`, `while`, `for` or `begin` is consumed, anything malformed after it is
//! reported as an error instead of trying another form.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{Cursor, Parsed, Parser};

impl Parser {
    /// Parse `begin ... end`
    pub(crate) fn parse_block<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Block> {
        let Some(begin) = cursor.peek().filter(|t| t.is_reserved("begin")) else {
            return Err(cursor.expected("'begin'"));
        };
        let mut cursor = cursor.advance();
        let mut statements = Vec::new();

        loop {
            if let Some(next) = cursor.match_reserved("end") {
                return Ok((
                    Block {
                        statements,
                        info: begin.info(),
                    },
                    next,
                ));
            }

            // Empty statement
            if let Some(next) = cursor.match_symbol(";") {
                cursor = next;
                continue;
            }

            let (statement, next) = self.parse_statement(cursor)?;
            statements.push(statement);

            cursor = match next.match_symbol(";") {
                Some(after) => after,
                None if next.check_reserved("end") => next,
                None => return Err(next.expected("';' or 'end' after statement")),
            };
        }
    }

    /// Parse a statement
    pub(crate) fn parse_statement<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Statement> {
        self.nested(cursor, |cursor| {
            let Some(token) = cursor.peek() else {
                return Err(cursor.expected("statement"));
            };

            if token.is_reserved("if") {
                return self.parse_if_statement(token, cursor.advance());
            }
            if token.is_reserved("while") {
                return self.parse_while_statement(token, cursor.advance());
            }
            if token.is_reserved("for") {
                return self.parse_for_statement(token, cursor.advance());
            }
            if token.is_reserved("begin") {
                let (block, next) = self.parse_block(cursor)?;
                return Ok((Statement::Block(block), next));
            }
            if cursor.check_identifier() {
                return self.parse_identifier_statement(cursor);
            }

            Err(cursor.expected("statement"))
        })
    }

    /// Assignment or procedure call, decided by the token after the identifier
    fn parse_identifier_statement<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Statement> {
        let (target, cursor) = cursor.expect_identifier()?;

        if let Some(next) = cursor.match_symbol(":=") {
            let (value, next) = self.parse_expression(next)?;
            return Ok((
                Statement::Assignment(Assignment {
                    info: target.info.clone(),
                    target,
                    value,
                }),
                next,
            ));
        }

        let (call, cursor) = self.parse_call(target, cursor)?;
        Ok((Statement::Call(call), cursor))
    }

    /// `if` chain; `else if` continues the same flat list of branches
    fn parse_if_statement<'t>(&self, keyword: &Token, cursor: Cursor<'t>) -> Parsed<'t, Statement> {
        let (first, mut cursor) = self.parse_conditional_branch(keyword, cursor, "then")?;
        let mut branches = vec![first];
        let mut otherwise = None;

        while let Some(after_else) = cursor.match_reserved("else") {
            match after_else.peek().filter(|t| t.is_reserved("if")) {
                Some(if_token) => {
                    let (branch, next) =
                        self.parse_conditional_branch(if_token, after_else.advance(), "then")?;
                    branches.push(branch);
                    cursor = next;
                }
                None => {
                    let (statement, next) = self.parse_statement(after_else)?;
                    otherwise = Some(Block::from(statement));
                    cursor = next;
                    break;
                }
            }
        }

        Ok((
            Statement::If(If {
                branches,
                otherwise,
                info: keyword.info(),
            }),
            cursor,
        ))
    }

    fn parse_while_statement<'t>(
        &self,
        keyword: &Token,
        cursor: Cursor<'t>,
    ) -> Parsed<'t, Statement> {
        let (branch, cursor) = self.parse_conditional_branch(keyword, cursor, "do")?;
        Ok((
            Statement::While(While {
                branch,
                info: keyword.info(),
            }),
            cursor,
        ))
    }

    /// `<expr> then|do <statement>`, with the keyword that introduced it already consumed
    fn parse_conditional_branch<'t>(
        &self,
        keyword: &Token,
        cursor: Cursor<'t>,
        separator: &str,
    ) -> Parsed<'t, ConditionalBranch> {
        let (condition, cursor) = self.parse_expression(cursor)?;
        let cursor = cursor.expect_reserved(separator, "after condition")?;
        let (statement, cursor) = self.parse_statement(cursor)?;

        Ok((
            ConditionalBranch {
                condition,
                body: Block::from(statement),
                info: keyword.info(),
            },
            cursor,
        ))
    }

    fn parse_for_statement<'t>(&self, keyword: &Token, cursor: Cursor<'t>) -> Parsed<'t, Statement> {
        let (variable, cursor) = cursor.expect_identifier()?;
        let cursor = cursor.expect_symbol(":=", "after loop variable")?;
        let (init, cursor) = self.parse_expression(cursor)?;

        let (downto, cursor) = if let Some(next) = cursor.match_reserved("to") {
            (false, next)
        } else if let Some(next) = cursor.match_reserved("downto") {
            (true, next)
        } else {
            return Err(cursor.expected("'to' or 'downto'"));
        };

        let (terminal, cursor) = self.parse_expression(cursor)?;
        let cursor = cursor.expect_reserved("do", "after loop bounds")?;
        let (statement, cursor) = self.parse_statement(cursor)?;

        Ok((
            Statement::For(For {
                variable,
                init,
                terminal,
                downto,
                body: Block::from(statement),
                info: keyword.info(),
            }),
            cursor,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, ParseError};

    fn body(statements: &str) -> Result<Block, ParseError> {
        let source = format!("program T; begin {statements} end.");
        parse(&tokenize(&source).unwrap()).map(|p| p.body)
    }

    fn single(statements: &str) -> Statement {
        let mut block = body(statements).unwrap();
        assert_eq!(block.statements.len(), 1, "expected one statement");
        block.statements.remove(0)
    }

    fn call_name(block: &Block) -> &str {
        match block.statements.as_slice() {
            [Statement::Call(call)] => &call.routine.name,
            other => panic!("expected a single call, got {other:?}"),
        }
    }

    fn ident_name(expr: &Expr) -> &str {
        match expr {
            Expr::Identifier(ident) => &ident.name,
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn test_assignment() {
        match single("x := 1 + 2") {
            Statement::Assignment(assign) => {
                assert_eq!(assign.target.name, "x");
                match &assign.value {
                    Expr::Binary { op, left, right, .. } => {
                        assert_eq!(*op, Operator::Add);
                        assert!(matches!(**left, Expr::Integer(IntegerLiteral { value: 1, .. })));
                        assert!(matches!(**right, Expr::Integer(IntegerLiteral { value: 2, .. })));
                    }
                    other => panic!("expected binary, got {other:?}"),
                }
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_statement_separators() {
        let block = body("a := 1; b := 2; c(3);").unwrap();
        assert_eq!(block.statements.len(), 3);
        assert_eq!(block.statements[2].kind(), NodeKind::Call);

        let block = body("; ; a := 1 ;;").unwrap();
        assert_eq!(block.statements.len(), 1);
    }

    #[test]
    fn test_missing_separator_is_error() {
        let err = body("a := 1 b := 2").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "';' or 'end' after statement".to_string(),
                found: "identifier 'b'".to_string(),
                position: Position::new(1, 25),
            }
        );
    }

    #[test]
    fn test_else_if_chain_is_flat() {
        match single("if a then b else if c then d else e") {
            Statement::If(stmt) => {
                assert_eq!(stmt.branches.len(), 2);
                assert_eq!(ident_name(&stmt.branches[0].condition), "a");
                assert_eq!(call_name(&stmt.branches[0].body), "b");
                assert_eq!(ident_name(&stmt.branches[1].condition), "c");
                assert_eq!(call_name(&stmt.branches[1].body), "d");

                let otherwise = stmt.otherwise.as_ref().expect("trailing else");
                assert_eq!(call_name(otherwise), "e");
                assert!(!otherwise
                    .statements
                    .iter()
                    .any(|s| matches!(s, Statement::If(_))));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_if_without_else() {
        match single("if x > 0 then begin y := 1; z := 2 end") {
            Statement::If(stmt) => {
                assert_eq!(stmt.branches.len(), 1);
                assert!(stmt.otherwise.is_none());
                assert_eq!(stmt.branches[0].body.statements.len(), 2);
                assert_eq!(stmt.branches[0].body.source_text(), "begin");
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_else_binds_to_inner_if() {
        match single("if a then if b then c else d") {
            Statement::If(outer) => {
                assert!(outer.otherwise.is_none());
                match outer.branches[0].body.statements.as_slice() {
                    [Statement::If(inner)] => assert!(inner.otherwise.is_some()),
                    other => panic!("expected inner if, got {other:?}"),
                }
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_while() {
        match single("while i < 10 do i := i + 1") {
            Statement::While(stmt) => {
                assert!(matches!(
                    stmt.branch.condition,
                    Expr::Binary { op: Operator::Less, .. }
                ));
                assert_eq!(stmt.branch.body.statements[0].kind(), NodeKind::Assignment);
                assert_eq!(stmt.position(), Position::new(1, 18));
            }
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_for_direction() {
        let up = match single("for i := 1 to n do s := s + i") {
            Statement::For(stmt) => stmt,
            other => panic!("expected for, got {other:?}"),
        };
        let down = match single("for i := 1 downto n do s := s + i") {
            Statement::For(stmt) => stmt,
            other => panic!("expected for, got {other:?}"),
        };

        assert!(!up.downto);
        assert!(down.downto);
        assert_eq!(up.variable.name, down.variable.name);
        assert_eq!(up.init, down.init);
        assert_eq!(ident_name(&up.terminal), ident_name(&down.terminal));
        assert_eq!(up.body.statements.len(), down.body.statements.len());
        assert_eq!(up.body.statements[0].kind(), down.body.statements[0].kind());
    }

    #[test]
    fn test_call_statements() {
        let block = body("writeln('a', x + 1); Reset").unwrap();
        match &block.statements[..] {
            [Statement::Call(first), Statement::Call(second)] => {
                assert_eq!(first.routine.name, "writeln");
                assert_eq!(first.args.len(), 2);
                assert!(first.args.iter().all(|a| !a.is_bound()));
                assert_eq!(second.routine.name, "Reset");
                assert!(second.args.is_empty());
            }
            other => panic!("expected two calls, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_blocks() {
        match single("begin begin x := 1 end end") {
            Statement::Block(outer) => match outer.statements.as_slice() {
                [Statement::Block(inner)] => assert_eq!(inner.statements.len(), 1),
                other => panic!("expected inner block, got {other:?}"),
            },
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_committed_keyword_is_hard_error() {
        // `while` consumed, `do` missing: reported at the offending token,
        // not retried as another statement form
        let err = body("while x y := 1").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "'do' after condition".to_string(),
                found: "identifier 'y'".to_string(),
                position: Position::new(1, 26),
            }
        );

        let err = body("for i = 1 to 3 do x").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, .. } if expected == "':=' after loop variable"
        ));

        let err = body("for i := 1 until 3 do x").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, .. } if expected == "'to' or 'downto'"
        ));
    }

    #[test]
    fn test_first_error_aborts_parse() {
        // Two independent errors; only the first is reported
        let err = body("x := ; y := )").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: "symbol ';'".to_string(),
                position: Position::new(1, 23),
            }
        );
    }

    #[test]
    fn test_reserved_word_is_not_a_statement() {
        let err = body("then").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, ref found, .. }
                if expected == "statement" && found == "reserved word 'then'"
        ));
    }

    #[test]
    fn test_deeply_nested_blocks_hit_limit() {
        let nested = format!("{}x := 1{}", "begin ".repeat(500), " end".repeat(500));
        let err = body(&nested).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }
}
