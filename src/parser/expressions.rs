//! Expression parsing implementation
//!
//! This module handles parsing of Pascal expressions with one recursive descent
//! method per precedence level.
//!
//! # Precedence
//!
//! From lowest to highest:
//!
//! | Level          | Operators                        |
//! |----------------|----------------------------------|
//! | relational     | `=` `<>` `<` `<=` `>` `>=` `or`  |
//! | additive       | `+` `-`                          |
//! | multiplicative | `*` `/` `div` `mod` `and`        |
//! | unary          | `-` `not`                        |
//! | primary        | literals, identifiers, calls, `( expr )` |
//!
//! Binary levels are left-associative. A parenthesized expression starts again at
//! the relational level.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{Cursor, ParseError, Parsed, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        self.nested(cursor, |cursor| self.parse_relational(cursor))
    }

    fn parse_relational<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        self.parse_binary_level(cursor, &Operator::RELATIONAL, |c| self.parse_additive(c))
    }

    fn parse_additive<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        self.parse_binary_level(cursor, &Operator::ADDITIVE, |c| self.parse_multiplicative(c))
    }

    fn parse_multiplicative<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        self.parse_binary_level(cursor, &Operator::MULTIPLICATIVE, |c| self.parse_unary(c))
    }

    /// `operand {op operand}` for one precedence level, folding to the left
    fn parse_binary_level<'t>(
        &self,
        cursor: Cursor<'t>,
        operators: &[Operator],
        operand: impl Fn(Cursor<'t>) -> Parsed<'t, Expr>,
    ) -> Parsed<'t, Expr> {
        let (mut left, mut cursor) = operand(cursor)?;

        while let Some((op, token)) = match_operator(cursor, operators) {
            let (right, next) = operand(cursor.advance())?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                info: token.info(),
            };
            cursor = next;
        }

        Ok((left, cursor))
    }

    /// `- x`, `not x`, or a primary expression
    fn parse_unary<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        let Some((op, token)) = match_operator(cursor, &Operator::UNARY) else {
            return self.parse_primary(cursor);
        };

        self.nested(cursor.advance(), |cursor| {
            let (operand, cursor) = self.parse_unary(cursor)?;
            Ok((
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                    info: token.info(),
                },
                cursor,
            ))
        })
    }

    fn parse_primary<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        let Some(token) = cursor.peek() else {
            return Err(cursor.expected("expression"));
        };

        match token.kind {
            TokenKind::Number => Ok((Expr::Integer(integer_literal(token)?), cursor.advance())),
            TokenKind::String => Ok((Expr::String(string_literal(token)), cursor.advance())),
            TokenKind::Identifier => {
                let (name, next) = cursor.expect_identifier()?;
                if next.check_symbol("(") {
                    let (call, next) = self.parse_call(name, next)?;
                    Ok((Expr::Call(call), next))
                } else {
                    Ok((Expr::Identifier(name), next))
                }
            }
            TokenKind::Symbol if token.is_symbol("(") => {
                let (expr, next) = self.parse_expression(cursor.advance())?;
                let next = next.expect_symbol(")", "to close parenthesized expression")?;
                Ok((expr, next))
            }
            _ => Err(cursor.expected("expression")),
        }
    }

    /// Call with `routine` already consumed; the argument list is optional
    pub(crate) fn parse_call<'t>(&self, routine: Identifier, cursor: Cursor<'t>) -> Parsed<'t, Call> {
        let info = routine.info.clone();
        let Some(mut cursor) = cursor.match_symbol("(") else {
            return Ok((
                Call {
                    routine,
                    args: Vec::new(),
                    info,
                },
                cursor,
            ));
        };

        let mut args = Vec::new();
        if let Some(next) = cursor.match_symbol(")") {
            return Ok((Call { routine, args, info }, next));
        }

        loop {
            let (value, next) = self.parse_expression(cursor)?;
            args.push(Argument::new(value));

            if let Some(after) = next.match_symbol(",") {
                cursor = after;
                continue;
            }
            let next = next.expect_symbol(")", "after call arguments")?;
            return Ok((Call { routine, args, info }, next));
        }
    }
}

/// Operator of the given level at the cursor, if any
fn match_operator<'t>(cursor: Cursor<'t>, operators: &[Operator]) -> Option<(Operator, &'t Token)> {
    let token = cursor.peek()?;
    operators
        .iter()
        .copied()
        .find(|op| {
            if op.is_word() {
                token.is_reserved(op.text())
            } else {
                token.is_symbol(op.text())
            }
        })
        .map(|op| (op, token))
}

fn integer_literal(token: &Token) -> Result<IntegerLiteral, ParseError> {
    let value = token
        .text
        .parse::<i64>()
        .map_err(|_| ParseError::IntegerOutOfRange {
            text: token.text.clone(),
            position: token.position(),
        })?;

    Ok(IntegerLiteral {
        value,
        info: token.info(),
    })
}

fn string_literal(token: &Token) -> StringLiteral {
    let value = token
        .text
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(&token.text)
        .to_string();

    StringLiteral {
        value,
        info: token.info(),
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, ParseError};

    fn expr(source: &str) -> Result<Expr, ParseError> {
        let program = format!("program E; begin r := {source} end.");
        let mut program = parse(&tokenize(&program).unwrap())?;
        match program.body.statements.remove(0) {
            Statement::Assignment(assign) => Ok(assign.value),
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    /// Fully parenthesized rendering, for compact precedence assertions
    fn render(expr: &Expr) -> String {
        match expr {
            Expr::Identifier(ident) => ident.name.clone(),
            Expr::Integer(lit) => lit.value.to_string(),
            Expr::String(lit) => format!("'{}'", lit.value),
            Expr::Call(call) => {
                let args: Vec<String> = call.args.iter().map(|a| render(&a.value)).collect();
                format!("{}({})", call.routine.name, args.join(", "))
            }
            Expr::Binary { op, left, right, .. } => {
                format!("({} {} {})", render(left), op, render(right))
            }
            Expr::Unary { op, operand, .. } => format!("({} {})", op, render(operand)),
        }
    }

    fn rendered(source: &str) -> String {
        render(&expr(source).unwrap())
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        assert_eq!(rendered("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(rendered("a div b mod c"), "((a div b) mod c)");
        assert_eq!(rendered("a - b - c"), "((a - b) - c)");
    }

    #[test]
    fn test_relational_is_lowest() {
        assert_eq!(rendered("a + 1 <= b * 2"), "((a + 1) <= (b * 2))");
        assert_eq!(rendered("a < b or c"), "((a < b) or c)");
        assert_eq!(rendered("a and b or c"), "((a and b) or c)");
    }

    #[test]
    fn test_parentheses_reset_precedence() {
        assert_eq!(rendered("(1 + 2) * 3"), "((1 + 2) * 3)");
        assert_eq!(rendered("a * (b = c)"), "(a * (b = c))");
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(rendered("-a * b"), "((- a) * b)");
        assert_eq!(rendered("not a and b"), "((not a) and b)");
        assert_eq!(rendered("- - 1"), "(- (- 1))");
        assert_eq!(rendered("a - -b"), "(a - (- b))");

        match expr("-5").unwrap() {
            Expr::Unary { op, info, .. } => {
                assert_eq!(op, Operator::Negate);
                assert_eq!(info.text, "-");
            }
            other => panic!("expected unary, got {other:?}"),
        }
    }

    #[test]
    fn test_all_relational_operators() {
        for op in ["=", "<>", "<", "<=", ">", ">="] {
            assert_eq!(rendered(&format!("a {op} b")), format!("(a {op} b)"));
        }
    }

    #[test]
    fn test_operator_node_position() {
        match expr("10 + 20").unwrap() {
            Expr::Binary { info, .. } => {
                assert_eq!(info.text, "+");
                assert_eq!(info.position, Position::new(1, 26));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_call_in_expression() {
        assert_eq!(rendered("max(a, b + 1) * 2"), "(max(a, (b + 1)) * 2)");
        assert_eq!(rendered("f()"), "f()");
        assert_eq!(rendered("f(g(x))"), "f(g(x))");
    }

    #[test]
    fn test_string_literal_value() {
        match expr("'hello'").unwrap() {
            Expr::String(lit) => {
                assert_eq!(lit.value, "hello");
                assert_eq!(lit.source_text(), "'hello'");
            }
            other => panic!("expected string, got {other:?}"),
        }
        assert!(matches!(expr("''").unwrap(), Expr::String(lit) if lit.value.is_empty()));
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = expr("99999999999999999999").unwrap_err();
        assert_eq!(
            err,
            ParseError::IntegerOutOfRange {
                text: "99999999999999999999".to_string(),
                position: Position::new(1, 23),
            }
        );
        assert!(expr("9223372036854775807").is_ok());
    }

    #[test]
    fn test_missing_operand() {
        let err = expr("1 +").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, ref found, .. }
                if expected == "expression" && found == "reserved word 'end'"
        ));
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let err = expr("(1 + 2").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, .. }
                if expected == "')' to close parenthesized expression"
        ));
    }

    #[test]
    fn test_unclosed_call() {
        let err = expr("f(1, 2").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, .. } if expected == "')' after call arguments"
        ));
    }

    #[test]
    fn test_deep_parentheses_hit_limit() {
        let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(
            expr(&source).unwrap_err(),
            ParseError::NestingTooDeep { .. }
        ));

        let source = format!("{}1", "- ".repeat(1000));
        assert!(matches!(
            expr(&source).unwrap_err(),
            ParseError::NestingTooDeep { .. }
        ));
    }
}
