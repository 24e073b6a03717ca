//! Expression rules, lowest to highest precedence.
//!
//! Binary levels share [`left_fold`]: parse an operand, then keep folding
//! `Binary(left, op, right)` while the level's operator follows.  An error
//! operand on either side ends the fold and is returned as is.

use log::debug;

use super::{nested, Parsed};
use crate::ast::Expr;
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::token::TokenType;

type Rule = for<'a> fn(Cursor<'a>) -> Parsed<'a, Expr<'a>>;

pub(super) fn expression(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    assignment(cursor)
}

/// Right‑associative: `a = b = c` is `Assign(a, Assign(b, c))`.
fn assignment(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    let (target, cursor) = logical_or(cursor)?;

    if target.is_error() {
        return Ok((target, cursor));
    }

    let Some((equals, after_equals)) = cursor.eat(&TokenType::EQUAL) else {
        return Ok((target, cursor));
    };

    match target {
        Expr::Literal(name) if name.token_type == TokenType::IDENTIFIER => {
            let (value, cursor) = bail!(nested(after_equals, assignment, Expr::Error), Expr::Error);

            Ok((Expr::Assign(name, Box::new(value)), cursor))
        }

        _ => {
            let error = ParseError::new(equals, "Invalid assignment target.");

            debug!("{}", error);

            Ok((Expr::Error(error), cursor))
        }
    }
}

fn logical_or(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    left_fold(cursor, |t| matches!(t, TokenType::OR), logical_and)
}

fn logical_and(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    left_fold(cursor, |t| matches!(t, TokenType::AND), equality)
}

fn equality(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    left_fold(
        cursor,
        |t| matches!(t, TokenType::BANG_EQUAL | TokenType::EQUAL_EQUAL),
        comparison,
    )
}

fn comparison(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    left_fold(
        cursor,
        |t| {
            matches!(
                t,
                TokenType::GREATER
                    | TokenType::GREATER_EQUAL
                    | TokenType::LESS
                    | TokenType::LESS_EQUAL
            )
        },
        term,
    )
}

fn term(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    left_fold(
        cursor,
        |t| matches!(t, TokenType::MINUS | TokenType::PLUS),
        factor,
    )
}

fn factor(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    left_fold(
        cursor,
        |t| matches!(t, TokenType::STAR | TokenType::SLASH),
        unary,
    )
}

/// Left‑associative fold of `operand (op operand)*`.
fn left_fold<'a>(
    cursor: Cursor<'a>,
    is_operator: fn(&TokenType) -> bool,
    operand: Rule,
) -> Parsed<'a, Expr<'a>> {
    let (mut left, mut cursor) = operand(cursor)?;

    if left.is_error() {
        return Ok((left, cursor));
    }

    while let Some((operator, next)) = cursor.matches(is_operator) {
        let (right, next) = bail!(operand(next), Expr::Error);

        left = Expr::Binary(Box::new(left), operator.clone(), Box::new(right));
        cursor = next;
    }

    Ok((left, cursor))
}

/// Right‑recursive prefix `!` / `-`, so `--x` nests two `Unary` nodes.
fn unary(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    let Some((operator, next)) =
        cursor.matches(|t| matches!(t, TokenType::BANG | TokenType::MINUS))
    else {
        return primary(cursor);
    };

    let (operand, cursor) = bail!(nested(next, unary, Expr::Error), Expr::Error);

    Ok((Expr::Unary(operator.clone(), Box::new(operand)), cursor))
}

fn primary(cursor: Cursor<'_>) -> Parsed<'_, Expr<'_>> {
    if let Some((token, cursor)) = cursor.matches(|t| {
        matches!(
            t,
            TokenType::NUMBER(_)
                | TokenType::STRING(_)
                | TokenType::TRUE
                | TokenType::FALSE
                | TokenType::NIL
                | TokenType::IDENTIFIER
        )
    }) {
        return Ok((Expr::Literal(token.clone()), cursor));
    }

    // A bare `return` sits in value position; there are no functions for it
    // to return from, so the evaluator sees it as an opaque literal.
    if let Some((token, cursor)) = cursor.eat(&TokenType::RETURN) {
        debug!("Accepting 'return' as a literal on line {}", token.line);

        return Ok((Expr::Literal(token.clone()), cursor));
    }

    if let Some((_, cursor)) = cursor.eat(&TokenType::LEFT_PAREN) {
        let (inner, cursor) = bail!(nested(cursor, expression, Expr::Error), Expr::Error);
        let (_, cursor) = expect!(
            cursor,
            TokenType::RIGHT_PAREN,
            "Expect ')' after expression.",
            Expr::Error
        );

        return Ok((Expr::Grouping(Box::new(inner)), cursor));
    }

    let error = ParseError::new(cursor.peek(), "Unexpected Character");

    debug!("{}", error);

    Ok((Expr::Error(error), cursor))
}
