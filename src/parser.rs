/*!
Single‑pass recursive‑descent parser with panic‑mode error recovery.

Every grammar rule is a pure function from a [`Cursor`] to the parsed node
and the cursor after it.  Syntax errors never unwind: they become
`Expr::Error` / `Stmt::Error` nodes, the enclosing `declaration` discards
tokens up to the next `;`, and parsing resumes.  Only contract violations
(a malformed token sequence) abort the pass, as [`LoxError::Internal`].

Time & Space
------------
* **n** = number of tokens (including the sole EOF).

Each token is consumed once, either by a production or by `synchronize`,
so the pass is **Θ(n)**.  The tree holds one node per consumed token at
most; call‑stack depth grows with syntactic nesting, which [`nested`] caps at
[`MAX_NESTING`] levels.

Logging Policy
--------------

| Location                       | Level   | Purpose                                 |
|--------------------------------|---------|-----------------------------------------|
| `Parser::new`, `parse`         | `info`  | Lifecycle milestones and error counts.  |
| `declaration`, `statement`     | `debug` | Descent into grammar branches.          |
| Error nodes, `synchronize`     | `debug` | Panic mode entry and resynchronization. |

Grammar (EBNF)
--------------

```text
program        → declaration* EOF ;
declaration    → varDecl | statement ;
varDecl        → ( "var" | "const" ) IDENT ( "=" expression? )? ";" ;
statement      → exprStmt | printStmt | block | ifStmt | whileStmt | forStmt ;
exprStmt       → expression ";" ;
printStmt      → "print" expression ";" ;
block          → "{" declaration* "}" ;
ifStmt         → "if" "(" expression ")" statement ( "else" statement )? ;
whileStmt      → "while" "(" expression ")" statement ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
expression     → assignment ;
assignment     → IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | primary ;
primary        → NUMBER | STRING | "true" | "false" | "nil" | IDENT
               | "return" | "(" expression ")" ;
```
*/

use log::{debug, info};

use crate::ast::{Stmt, SyntaxTree};
use crate::cursor::{Cursor, MAX_NESTING};
use crate::error::{LoxError, ParseError, ParseFailure, ParseReport, Result};
use crate::token::{Token, TokenType};

/// Consume a token of the given kind or return an error node from the
/// enclosing rule, wrapped with `$on_error` (`Expr::Error` or `Stmt::Error`).
macro_rules! expect {
    ($cursor:ident, $token_type:expr, $message:expr, $on_error:path) => {
        match $cursor.eat(&$token_type) {
            Some(found) => found,
            None => {
                let error = $crate::error::ParseError::new($cursor.peek(), $message);
                log::debug!("{}", error);
                return Ok(($on_error(error), $cursor));
            }
        }
    };
}

/// Run a sub‑rule; if it produced an error node, return that error from the
/// enclosing rule unchanged, wrapped with `$on_error`.
macro_rules! bail {
    ($parsed:expr, $on_error:path) => {{
        let (node, cursor) = $parsed?;
        match node.into_result() {
            Ok(node) => (node, cursor),
            Err(error) => return Ok(($on_error(error), cursor)),
        }
    }};
}

mod expr;
mod stmt;

/// A parsed node and the cursor just past it.  `Err` is reserved for fatal
/// contract violations.
pub(crate) type Parsed<'a, T> = Result<(T, Cursor<'a>)>;

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self { tokens }
    }

    /// Parse an entire program.
    ///
    /// Succeeds only if no statement failed.  Otherwise every syntax error of
    /// the pass is returned together, in source order.
    pub fn parse(&self) -> std::result::Result<SyntaxTree<'a>, ParseFailure<'a>> {
        info!("Beginning parse phase");

        let (tree, errors) = self.parse_recovering()?;

        if errors.is_empty() {
            info!("Parsed {} statement(s) without errors", tree.len());

            return Ok(tree);
        }

        info!(
            "Parse failed with {} error(s) across {} statement(s)",
            errors.len(),
            tree.len()
        );

        Err(ParseFailure::Syntax(ParseReport::new(errors)))
    }

    /// Drive `declaration` until only `EOF` remains, threading the list of
    /// errors found so far through the loop.
    fn parse_recovering(&self) -> Result<(SyntaxTree<'a>, Vec<ParseError<'a>>)> {
        let mut cursor: Cursor<'a> = Cursor::new(self.tokens)?;
        let mut statements: Vec<Stmt<'a>> = Vec::new();
        let mut errors: Vec<ParseError<'a>> = Vec::new();

        while !cursor.is_at_end() {
            let (stmt, next) = stmt::declaration(cursor)?;

            if next.position() <= cursor.position() {
                return Err(LoxError::internal(format!(
                    "no progress at token {} (line {})",
                    cursor.position(),
                    cursor.peek().line
                )));
            }

            let mut found = Vec::new();
            stmt.collect_errors(&mut found);
            errors.extend(found.into_iter().cloned());

            statements.push(stmt);
            cursor = next;
        }

        Ok((SyntaxTree::new(statements), errors))
    }
}

/// Parse `tokens` into a [`SyntaxTree`].
pub fn parse<'a>(tokens: &'a [Token<'a>]) -> std::result::Result<SyntaxTree<'a>, ParseFailure<'a>> {
    Parser::new(tokens).parse()
}

/// Run `rule` one nesting level deeper.  At [`MAX_NESTING`] the rule is not
/// entered and `on_limit` wraps a "Too much nesting." error at the cursor.
pub(crate) fn nested<'a, T>(
    cursor: Cursor<'a>,
    rule: fn(Cursor<'a>) -> Parsed<'a, T>,
    on_limit: fn(ParseError<'a>) -> T,
) -> Parsed<'a, T> {
    let Some(inner) = cursor.descend() else {
        let error = ParseError::new(cursor.peek(), "Too much nesting.");

        debug!("{} (limit {})", error, MAX_NESTING);

        return Ok((on_limit(error), cursor));
    };

    let (node, after) = rule(inner)?;

    Ok((node, after.ascend()))
}

/// Panic mode: discard tokens until a `;` has been consumed or `EOF` is
/// reached.  Moves at least one token unless already at `EOF`.
pub(crate) fn synchronize(cursor: Cursor<'_>) -> Result<Cursor<'_>> {
    debug!(
        "Entering panic mode at token {} (line {})",
        cursor.position(),
        cursor.peek().line
    );

    let start: usize = cursor.position();
    let mut cursor = cursor;

    while !cursor.is_at_end() {
        let (discarded, next) = cursor.advance()?;
        cursor = next;

        if discarded.token_type == TokenType::SEMICOLON {
            break;
        }
    }

    debug!(
        "Resynchronized after discarding {} token(s)",
        cursor.position() - start
    );

    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::scanner::scan_tokens;

    #[test]
    fn statement_after_two_failures_still_parses() {
        let tokens = scan_tokens("1 +;\nvar = ;\nprint 3;").unwrap();

        let (tree, errors) = Parser::new(&tokens).parse_recovering().unwrap();

        assert_eq!(tree.len(), 3);
        assert!(tree.statements()[0].is_error());
        assert!(tree.statements()[1].is_error());
        assert!(matches!(tree.statements()[2], Stmt::Print(_)));

        let collected: Vec<ParseError<'_>> = tree.errors().into_iter().cloned().collect();
        assert_eq!(errors, collected);
    }

    #[test]
    fn block_keeps_recovered_children() {
        let tokens = scan_tokens("{ 1 +; print 2; }").unwrap();

        let (tree, errors) = Parser::new(&tokens).parse_recovering().unwrap();

        assert_eq!(errors.len(), 1);
        match &tree.statements()[0] {
            Stmt::Block(children) => {
                assert_eq!(children.len(), 2);
                assert!(children[0].is_error());
                assert!(matches!(children[1], Stmt::Print(_)));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn nested_restores_depth() {
        let tokens = scan_tokens("((1));").unwrap();
        let cursor = Cursor::new(&tokens).unwrap();

        let (grouped, after) = nested(cursor, expr::expression, Expr::Error).unwrap();

        assert!(!grouped.is_error());
        assert_eq!(after.depth(), 0);
        assert_eq!(after.peek().token_type, TokenType::SEMICOLON);
    }

    #[test]
    fn synchronize_stops_after_semicolon() {
        let tokens = scan_tokens("1 + 2 ; print 3;").unwrap();
        let cursor = Cursor::new(&tokens).unwrap();

        let resumed = synchronize(cursor).unwrap();

        assert_eq!(resumed.position(), 4);
        assert_eq!(resumed.peek().token_type, TokenType::PRINT);
    }

    #[test]
    fn synchronize_stops_at_eof() {
        let tokens = scan_tokens("1 + 2").unwrap();
        let cursor = Cursor::new(&tokens).unwrap();

        let resumed = synchronize(cursor).unwrap();

        assert!(resumed.is_at_end());
        assert!(synchronize(resumed).unwrap().is_at_end());
    }
}
