//! Statement rules and the `for` desugaring.

use log::debug;

use super::expr::expression;
use super::{nested, synchronize, Parsed};
use crate::ast::{DeclKind, Expr, Stmt};
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::token::{Token, TokenType};

fn is_declaration_keyword(token_type: &TokenType) -> bool {
    matches!(token_type, TokenType::VAR | TokenType::CONST)
}

/// The unit retried after error recovery.  An error statement puts the
/// parser in panic mode; [`synchronize`] skips to the next statement
/// boundary before the error is handed back.
pub(super) fn declaration(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    debug!("Entering declaration at token {}", cursor.position());

    let (stmt, next) = match cursor.matches(is_declaration_keyword) {
        Some((keyword, next)) => var_declaration(keyword, next)?,
        None => statement(cursor)?,
    };

    if stmt.is_error() {
        let resumed = synchronize(next)?;

        return Ok((stmt, resumed));
    }

    Ok((stmt, next))
}

/// `("var" | "const") IDENT ("=" expression?)? ";"`, keyword already consumed.
fn var_declaration<'a>(keyword: &'a Token<'a>, cursor: Cursor<'a>) -> Parsed<'a, Stmt<'a>> {
    let kind: DeclKind = if keyword.token_type == TokenType::CONST {
        DeclKind::Const
    } else {
        DeclKind::Var
    };

    let (name, cursor) = expect!(
        cursor,
        TokenType::IDENTIFIER,
        "Expect variable name.",
        Stmt::Error
    );

    if let Some((_, cursor)) = cursor.eat(&TokenType::SEMICOLON) {
        return Ok((Stmt::VarDecl(kind, name.clone(), Expr::Empty), cursor));
    }

    let Some((_, cursor)) = cursor.eat(&TokenType::EQUAL) else {
        let unexpected: &Token<'a> = cursor.peek();
        let message: String = if unexpected.token_type == TokenType::EOF {
            "Unexpected end of input after variable name.".to_string()
        } else {
            format!("Unexpected token '{}' after variable name.", unexpected.lexeme)
        };
        let error = ParseError::new(unexpected, message);

        debug!("{}", error);

        return Ok((Stmt::Error(error), cursor));
    };

    let (initializer, cursor) = if cursor.check(&TokenType::SEMICOLON) {
        (Expr::Empty, cursor)
    } else {
        bail!(expression(cursor), Stmt::Error)
    };

    let (_, cursor) = expect!(
        cursor,
        TokenType::SEMICOLON,
        "Expect ';' after variable declaration.",
        Stmt::Error
    );

    Ok((Stmt::VarDecl(kind, name.clone(), initializer), cursor))
}

fn statement(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    if let Some((_, next)) = cursor.eat(&TokenType::PRINT) {
        print_statement(next)
    } else if let Some((_, next)) = cursor.eat(&TokenType::LEFT_BRACE) {
        nested(next, block, Stmt::Error)
    } else if let Some((_, next)) = cursor.eat(&TokenType::IF) {
        if_statement(next)
    } else if let Some((keyword, next)) = cursor.eat(&TokenType::FOR) {
        for_statement(keyword, next)
    } else if let Some((_, next)) = cursor.eat(&TokenType::WHILE) {
        while_statement(next)
    } else {
        expression_statement(cursor)
    }
}

fn print_statement(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    let (value, cursor) = bail!(expression(cursor), Stmt::Error);
    let (_, cursor) = expect!(
        cursor,
        TokenType::SEMICOLON,
        "Expect ';' after value.",
        Stmt::Error
    );

    Ok((Stmt::Print(value), cursor))
}

fn expression_statement(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    let (expr, cursor) = bail!(expression(cursor), Stmt::Error);
    let (_, cursor) = expect!(
        cursor,
        TokenType::SEMICOLON,
        "Expect ';' after expression.",
        Stmt::Error
    );

    Ok((Stmt::Expression(expr), cursor))
}

/// `"{" declaration* "}"`, opening brace already consumed.
///
/// Inner declarations recover on their own, so the block keeps their error
/// children.  Reaching `EOF` first is an error; if children already failed
/// it is appended after them instead of replacing the block.
fn block(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    let mut statements: Vec<Stmt<'_>> = Vec::new();
    let mut cursor = cursor;

    loop {
        if let Some((_, next)) = cursor.eat(&TokenType::RIGHT_BRACE) {
            return Ok((Stmt::Block(statements), next));
        }

        if cursor.is_at_end() {
            let error = ParseError::new(cursor.peek(), "Expect '}' after block");

            debug!("{}", error);

            if statements.iter().any(Stmt::has_errors) {
                statements.push(Stmt::Error(error));

                return Ok((Stmt::Block(statements), cursor));
            }

            return Ok((Stmt::Error(error), cursor));
        }

        let (stmt, next) = declaration(cursor)?;

        statements.push(stmt);
        cursor = next;
    }
}

/// `"if" "(" expression ")" statement ("else" statement)?`.  A trailing
/// `else` always binds to the innermost `if`.
fn if_statement(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    let (_, cursor) = expect!(
        cursor,
        TokenType::LEFT_PAREN,
        "Expect '(' after 'if'.",
        Stmt::Error
    );
    let (condition, cursor) = bail!(expression(cursor), Stmt::Error);
    let (_, cursor) = expect!(
        cursor,
        TokenType::RIGHT_PAREN,
        "Expect ')' after if condition.",
        Stmt::Error
    );

    let (then_branch, cursor) = bail!(nested(cursor, statement, Stmt::Error), Stmt::Error);

    let (else_branch, cursor) = match cursor.eat(&TokenType::ELSE) {
        Some((_, next)) => {
            let (else_branch, cursor) = bail!(nested(next, statement, Stmt::Error), Stmt::Error);
            (Some(Box::new(else_branch)), cursor)
        }
        None => (None, cursor),
    };

    Ok((
        Stmt::If(condition, Box::new(then_branch), else_branch),
        cursor,
    ))
}

fn while_statement(cursor: Cursor<'_>) -> Parsed<'_, Stmt<'_>> {
    let (_, cursor) = expect!(
        cursor,
        TokenType::LEFT_PAREN,
        "Expect '(' after 'while'.",
        Stmt::Error
    );
    let (condition, cursor) = bail!(expression(cursor), Stmt::Error);
    let (_, cursor) = expect!(
        cursor,
        TokenType::RIGHT_PAREN,
        "Expect ')' after condition.",
        Stmt::Error
    );
    let (body, cursor) = bail!(nested(cursor, statement, Stmt::Error), Stmt::Error);

    Ok((Stmt::While(condition, Box::new(body)), cursor))
}

/// `"for" "(" (varDecl | exprStmt | ";") expression? ";" expression? ")" statement`,
/// desugared on the spot by [`desugar_for`].
fn for_statement<'a>(keyword: &'a Token<'a>, cursor: Cursor<'a>) -> Parsed<'a, Stmt<'a>> {
    let (_, cursor) = expect!(
        cursor,
        TokenType::LEFT_PAREN,
        "Expect '(' after 'for'.",
        Stmt::Error
    );

    let (initializer, cursor) = if let Some((_, next)) = cursor.eat(&TokenType::SEMICOLON) {
        (None, next)
    } else if let Some((decl, next)) = cursor.matches(is_declaration_keyword) {
        let (initializer, cursor) = bail!(var_declaration(decl, next), Stmt::Error);
        (Some(initializer), cursor)
    } else {
        let (initializer, cursor) = bail!(expression_statement(cursor), Stmt::Error);
        (Some(initializer), cursor)
    };

    let (condition, cursor) = if cursor.check(&TokenType::SEMICOLON) {
        (Expr::Empty, cursor)
    } else {
        bail!(expression(cursor), Stmt::Error)
    };
    let (_, cursor) = expect!(
        cursor,
        TokenType::SEMICOLON,
        "Expect ';' after loop condition.",
        Stmt::Error
    );

    let (increment, cursor) = if cursor.check(&TokenType::RIGHT_PAREN) {
        (Expr::Empty, cursor)
    } else {
        bail!(expression(cursor), Stmt::Error)
    };
    let (_, cursor) = expect!(
        cursor,
        TokenType::RIGHT_PAREN,
        "Expect ')' after for clauses.",
        Stmt::Error
    );

    let (body, cursor) = bail!(nested(cursor, statement, Stmt::Error), Stmt::Error);

    Ok((
        desugar_for(keyword, initializer, condition, increment, body),
        cursor,
    ))
}

/// Rewrite a `for` loop as
/// `{ initializer; while (condition) { body; increment; } }`, dropping the
/// parts that were omitted.  A missing condition loops on `true`.
fn desugar_for<'a>(
    keyword: &Token<'a>,
    initializer: Option<Stmt<'a>>,
    condition: Expr<'a>,
    increment: Expr<'a>,
    body: Stmt<'a>,
) -> Stmt<'a> {
    let body: Stmt<'a> = match increment {
        Expr::Empty => body,
        increment => Stmt::Block(vec![body, Stmt::Expression(increment)]),
    };

    let condition: Expr<'a> = match condition {
        Expr::Empty => Expr::Literal(Token::new(TokenType::TRUE, "true", keyword.line)),
        condition => condition,
    };

    let looped = Stmt::While(condition, Box::new(body));

    match initializer {
        Some(initializer) => Stmt::Block(vec![initializer, looped]),
        None => looped,
    }
}
