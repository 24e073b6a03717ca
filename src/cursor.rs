//! Immutable position into a token sequence.
//!
//! A [`Cursor`] is `Copy`: every grammar function receives one by value and
//! hands back a new one alongside the node it parsed.  The token slice is never
//! mutated and there is no shared scanning head.

use log::debug;

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

/// Deepest run of nested groupings, prefix operators, assignments, blocks and
/// statement bodies the parser descends into.  Past it the construct becomes a
/// syntax error instead of exhausting the call stack.
pub const MAX_NESTING: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the first token of `tokens`.
    ///
    /// The sequence must be non‑empty, hold exactly one `EOF` as its last
    /// element, and contain at least one token before it.  Anything else is a
    /// scanner contract violation and is reported as [`LoxError::Internal`].
    pub fn new(tokens: &'a [Token<'a>]) -> Result<Self> {
        let (last, rest) = tokens
            .split_last()
            .ok_or_else(|| LoxError::internal("token sequence is empty"))?;

        if last.token_type != TokenType::EOF {
            return Err(LoxError::internal(format!(
                "token sequence does not end with EOF (last token '{}' on line {})",
                last.lexeme, last.line
            )));
        }

        if rest.is_empty() {
            return Err(LoxError::internal(
                "token sequence holds only the end-of-input marker",
            ));
        }

        if let Some(stray) = rest.iter().position(|t| t.token_type == TokenType::EOF) {
            return Err(LoxError::internal(format!(
                "EOF marker at position {} before the end of the token sequence",
                stray
            )));
        }

        debug!("Cursor created over {} tokens", tokens.len());

        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    /// Token under the cursor.
    #[inline(always)]
    pub fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.pos]
    }

    /// Current token and a cursor one position further.
    ///
    /// The `EOF` marker can never be consumed; trying to is a fatal error.
    #[inline]
    pub fn advance(self) -> Result<(&'a Token<'a>, Cursor<'a>)> {
        if self.is_at_end() {
            return Err(LoxError::internal(format!(
                "attempted to advance past end of input (line {})",
                self.peek().line
            )));
        }

        let token = self.peek();

        Ok((
            token,
            Cursor {
                tokens: self.tokens,
                pos: self.pos + 1,
                depth: self.depth,
            },
        ))
    }

    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    /// Does the current token have kind `token_type`?  Always false at `EOF`.
    #[inline(always)]
    pub fn check(&self, token_type: &TokenType) -> bool {
        !self.is_at_end() && self.peek().token_type == *token_type
    }

    /// Consume the current token if `accept` holds for its kind.
    #[inline]
    pub fn matches<F>(self, accept: F) -> Option<(&'a Token<'a>, Cursor<'a>)>
    where
        F: Fn(&TokenType) -> bool,
    {
        if self.is_at_end() || !accept(&self.peek().token_type) {
            return None;
        }

        self.advance().ok()
    }

    /// Consume the current token if it has kind `token_type`.
    #[inline]
    pub fn eat(self, token_type: &TokenType) -> Option<(&'a Token<'a>, Cursor<'a>)> {
        self.matches(|t| t == token_type)
    }

    /// Index of the token under the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokens left before (and excluding) `EOF`.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.tokens.len() - 1 - self.pos
    }

    /// Current nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Same position one nesting level deeper, or `None` at [`MAX_NESTING`].
    #[inline]
    pub fn descend(self) -> Option<Cursor<'a>> {
        if self.depth >= MAX_NESTING {
            return None;
        }

        Some(Cursor {
            depth: self.depth + 1,
            ..self
        })
    }

    /// Same position one nesting level shallower.
    #[inline]
    pub fn ascend(self) -> Cursor<'a> {
        Cursor {
            depth: self.depth.saturating_sub(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(token_type: TokenType, lexeme: &'static str) -> Token<'static> {
        Token::new(token_type, lexeme, 1)
    }

    #[test]
    fn rejects_empty_sequence() {
        let tokens: Vec<Token<'static>> = Vec::new();

        assert!(matches!(Cursor::new(&tokens), Err(LoxError::Internal(_))));
    }

    #[test]
    fn rejects_missing_eof() {
        let tokens = vec![tok(TokenType::PRINT, "print")];

        assert!(matches!(Cursor::new(&tokens), Err(LoxError::Internal(_))));
    }

    #[test]
    fn rejects_lone_eof() {
        let tokens = vec![Token::eof(1)];

        assert!(matches!(Cursor::new(&tokens), Err(LoxError::Internal(_))));
    }

    #[test]
    fn rejects_early_eof() {
        let tokens = vec![
            tok(TokenType::NIL, "nil"),
            Token::eof(1),
            tok(TokenType::SEMICOLON, ";"),
            Token::eof(1),
        ];

        assert!(matches!(Cursor::new(&tokens), Err(LoxError::Internal(_))));
    }

    #[test]
    fn advance_leaves_original_untouched() {
        let tokens = vec![tok(TokenType::NIL, "nil"), Token::eof(1)];
        let start = Cursor::new(&tokens).unwrap();

        let (token, next) = start.advance().unwrap();

        assert_eq!(token.token_type, TokenType::NIL);
        assert_eq!(start.position(), 0);
        assert_eq!(next.position(), 1);
        assert!(next.is_at_end());
        assert_eq!(next.remaining(), 0);
        assert_eq!(start.remaining(), 1);
    }

    #[test]
    fn cannot_advance_past_eof() {
        let tokens = vec![tok(TokenType::NIL, "nil"), Token::eof(1)];
        let (_, end) = Cursor::new(&tokens).unwrap().advance().unwrap();

        assert!(matches!(end.advance(), Err(LoxError::Internal(_))));
        assert!(end.eat(&TokenType::EOF).is_none());
        assert!(!end.check(&TokenType::EOF));
    }

    #[test]
    fn descend_stops_at_limit() {
        let tokens = vec![tok(TokenType::NIL, "nil"), Token::eof(1)];
        let mut cursor = Cursor::new(&tokens).unwrap();

        for _ in 0..MAX_NESTING {
            cursor = cursor.descend().unwrap();
        }

        assert_eq!(cursor.depth(), MAX_NESTING);
        assert!(cursor.descend().is_none());

        let (_, next) = cursor.advance().unwrap();
        assert_eq!(next.depth(), MAX_NESTING);
        assert_eq!(next.ascend().depth(), MAX_NESTING - 1);
        assert_eq!(next.ascend().position(), 1);
    }

    #[test]
    fn matches_ignores_literal_payload() {
        let tokens = vec![tok(TokenType::NUMBER(7.0), "7"), Token::eof(1)];
        let cursor = Cursor::new(&tokens).unwrap();

        assert!(cursor.check(&TokenType::NUMBER(0.0)));
        assert!(cursor
            .matches(|t| matches!(t, TokenType::STRING(_)))
            .is_none());

        let (token, _) = cursor
            .matches(|t| matches!(t, TokenType::NUMBER(_)))
            .unwrap();
        assert_eq!(token.lexeme, "7");
    }
}
