//! Syntax tree produced by the parser.
//!
//! Nodes are built once during the single parsing pass and never mutated
//! afterwards.  Ownership is strictly tree‑shaped: every child is owned by
//! exactly one parent through `Box` or `Vec`.

use serde::Serialize;

use crate::error::ParseError;
use crate::token::{Token, TokenType};

/// **Abstract‑Syntax‑Tree node** representing every kind of *expression*.
///
/// Identifier references are `Literal`s wrapping an `IDENTIFIER` token, see
/// [`Expr::as_identifier`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr<'a> {
    /// A number, string, `true`, `false`, `nil`, identifier or `return` token.
    Literal(Token<'a>),

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr<'a>>),

    /// Prefix `!` or `-`.
    Unary(Token<'a>, Box<Expr<'a>>),

    /// Infix operator expression, including the logical `and` / `or`.
    Binary(Box<Expr<'a>>, Token<'a>, Box<Expr<'a>>),

    /// Assignment expression: `identifier "=" expression`
    Assign(Token<'a>, Box<Expr<'a>>),

    /// Absent expression (omitted initializer or `for` clause).
    Empty,

    /// Parsing failed here.  Never wraps a further subtree.
    Error(ParseError<'a>),
}

impl<'a> Expr<'a> {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Expr::Error(_))
    }

    /// `Err` carrying the error if this is an error node.
    pub fn into_result(self) -> Result<Self, ParseError<'a>> {
        match self {
            Expr::Error(error) => Err(error),
            expr => Ok(expr),
        }
    }

    /// The identifier token if this expression is a bare variable reference.
    pub fn as_identifier(&self) -> Option<&Token<'a>> {
        match self {
            Expr::Literal(token) if token.token_type == TokenType::IDENTIFIER => Some(token),
            _ => None,
        }
    }

    /// True if this expression is, or contains, an error node.
    pub fn has_errors(&self) -> bool {
        match self {
            Expr::Error(_) => true,
            Expr::Grouping(inner) | Expr::Unary(_, inner) | Expr::Assign(_, inner) => {
                inner.has_errors()
            }
            Expr::Binary(left, _, right) => left.has_errors() || right.has_errors(),
            Expr::Literal(_) | Expr::Empty => false,
        }
    }

    /// Push every error node of this expression onto `out`.
    pub fn collect_errors<'s>(&'s self, out: &mut Vec<&'s ParseError<'a>>) {
        match self {
            Expr::Error(error) => out.push(error),
            Expr::Grouping(inner) | Expr::Unary(_, inner) | Expr::Assign(_, inner) => {
                inner.collect_errors(out)
            }
            Expr::Binary(left, _, right) => {
                left.collect_errors(out);
                right.collect_errors(out);
            }
            Expr::Literal(_) | Expr::Empty => {}
        }
    }
}

/// Declaration keyword of a [`Stmt::VarDecl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclKind {
    Var,
    Const,
}

impl DeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Const => "const",
        }
    }
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  A program is a sequence of
/// these nodes; `for` loops never appear, they are desugared into `While`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt<'a> {
    /// Stand‑alone expression terminated by a semicolon.
    Expression(Expr<'a>),

    /// `print` statement used for output.
    Print(Expr<'a>),

    /// `("var" | "const") IDENT ("=" initializer)? ";"`.  Missing
    /// initializers are [`Expr::Empty`].
    VarDecl(DeclKind, Token<'a>, Expr<'a>),

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt<'a>>),

    /// `if` / `else` conditional.
    If(Expr<'a>, Box<Stmt<'a>>, Option<Box<Stmt<'a>>>),

    /// `while` loop.
    While(Expr<'a>, Box<Stmt<'a>>),

    /// Parsing failed here.
    Error(ParseError<'a>),
}

impl<'a> Stmt<'a> {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Stmt::Error(_))
    }

    /// `Err` carrying the error if this is an error node.
    pub fn into_result(self) -> Result<Self, ParseError<'a>> {
        match self {
            Stmt::Error(error) => Err(error),
            stmt => Ok(stmt),
        }
    }

    /// True if this statement is, or contains, an error node.
    pub fn has_errors(&self) -> bool {
        match self {
            Stmt::Error(_) => true,
            Stmt::Expression(expr) | Stmt::Print(expr) | Stmt::VarDecl(_, _, expr) => {
                expr.has_errors()
            }
            Stmt::Block(statements) => statements.iter().any(Stmt::has_errors),
            Stmt::If(condition, then_branch, else_branch) => {
                condition.has_errors()
                    || then_branch.has_errors()
                    || else_branch.as_ref().is_some_and(|branch| branch.has_errors())
            }
            Stmt::While(condition, body) => condition.has_errors() || body.has_errors(),
        }
    }

    /// Push every error node of this statement, in source order, onto `out`.
    pub fn collect_errors<'s>(&'s self, out: &mut Vec<&'s ParseError<'a>>) {
        match self {
            Stmt::Error(error) => out.push(error),
            Stmt::Expression(expr) | Stmt::Print(expr) | Stmt::VarDecl(_, _, expr) => {
                expr.collect_errors(out)
            }
            Stmt::Block(statements) => {
                for stmt in statements {
                    stmt.collect_errors(out);
                }
            }
            Stmt::If(condition, then_branch, else_branch) => {
                condition.collect_errors(out);
                then_branch.collect_errors(out);
                if let Some(else_branch) = else_branch {
                    else_branch.collect_errors(out);
                }
            }
            Stmt::While(condition, body) => {
                condition.collect_errors(out);
                body.collect_errors(out);
            }
        }
    }
}

/// An entire parsed program.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SyntaxTree<'a> {
    statements: Vec<Stmt<'a>>,
}

impl<'a> SyntaxTree<'a> {
    pub fn new(statements: Vec<Stmt<'a>>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Stmt<'a>] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Every error node anywhere in the tree, in source order.
    pub fn errors(&self) -> Vec<&ParseError<'a>> {
        let mut out = Vec::new();

        for stmt in &self.statements {
            stmt.collect_errors(&mut out);
        }

        out
    }

    /// True when no error node exists anywhere in the tree.
    pub fn is_well_formed(&self) -> bool {
        !self.statements.iter().any(Stmt::has_errors)
    }
}
