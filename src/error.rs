//! Centralised error hierarchy for the **Rox parser**.
//!
//! Two tiers exist and must never be confused:
//!
//! * **Recoverable syntax errors** are plain data ([`ParseError`]) embedded in
//!   the tree where parsing failed.  A failed pass reports all of them at once
//!   through [`ParseReport`].
//! * **Fatal errors** ([`LoxError`]) describe a broken contract between the
//!   scanner and the parser.  They abort the pass.
//!
//! The module **does not** print diagnostics itself.

use std::fmt;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Canonical fatal error type used throughout the crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Violated upstream contract (malformed token sequence, cursor overrun).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for contract violations detected by the **parser**.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Internal error: msg={}", message);

        LoxError::Internal(message)
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// A syntax error carried as data inside the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError<'a> {
    /// Human‑readable description.
    pub message: String,

    /// Token at which the error was detected.
    pub token: Token<'a>,
}

impl<'a> ParseError<'a> {
    /// Error at `token`.
    pub fn new<S: Into<String>>(token: &Token<'a>, msg: S) -> Self {
        Self {
            message: msg.into(),
            token: token.clone(),
        }
    }
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.token.token_type == TokenType::EOF {
            write!(f, "[line {}] Error at end: {}", self.token.line, self.message)
        } else {
            write!(
                f,
                "[line {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.message
            )
        }
    }
}

impl std::error::Error for ParseError<'_> {}

/// Every syntax error found in one pass, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport<'a> {
    errors: Vec<ParseError<'a>>,
}

impl<'a> ParseReport<'a> {
    pub fn new(errors: Vec<ParseError<'a>>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ParseError<'a>] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ParseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }

        Ok(())
    }
}

/// Why a call to [`crate::parser::parse`] produced no tree.
#[derive(Debug, Error)]
pub enum ParseFailure<'a> {
    /// The source text is malformed; every error of the pass is listed.
    #[error("{0}")]
    Syntax(ParseReport<'a>),

    /// The token sequence itself broke the scanner/parser contract.
    #[error(transparent)]
    Fatal(#[from] LoxError),
}

impl<'a> ParseFailure<'a> {
    /// Syntax errors of the pass, empty for fatal failures.
    pub fn syntax_errors(&self) -> &[ParseError<'a>] {
        match self {
            ParseFailure::Syntax(report) => report.errors(),
            ParseFailure::Fatal(_) => &[],
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseFailure::Fatal(_))
    }
}
