//! A cursor over the lexed tokens, consumed by the parser.

use crate::{
    error::{Diagnostic, ParseError},
    lexer::Token,
    span::Span,
};

pub type ParseResult<T> = Result<T, Diagnostic>;

#[derive(Clone, Debug)]
pub struct TokenStream {
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

impl TokenStream {
    /// `tokens` must end with [`Token::Eof`], as returned by [`tokenize`][crate::lexer::tokenize].
    pub fn new(tokens: Vec<(Token, Span)>) -> Self {
        debug_assert!(matches!(tokens.last(), Some((Token::Eof, _))));
        Self { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Look `n` tokens past the current one. Past the end, this is [`Token::Eof`].
    pub fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].0
    }

    pub fn span(&self) -> &Span {
        &self.tokens[self.pos].1
    }

    /// Span of the last consumed token, or an empty span at the start.
    pub fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].1.clone(),
            None => Span::at(0),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        start.extend(&self.prev_span())
    }

    pub fn is_eof(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Consume the current token. The stream never advances past [`Token::Eof`].
    pub fn advance(&mut self) -> (Token, Span) {
        let tok = self.tokens[self.pos].clone();
        if !self.is_eof() {
            self.pos += 1;
        }
        tok
    }

    pub fn check(&self, tok: &Token) -> bool {
        self.peek() == tok
    }

    /// Consume the current token if it is `tok`.
    pub fn eat(&mut self, tok: &Token) -> bool {
        let found = self.check(tok);
        if found {
            self.advance();
        }
        found
    }

    pub fn expect(&mut self, tok: &Token) -> ParseResult<Span> {
        if self.check(tok) {
            Ok(self.advance().1)
        } else {
            Err(self.expected(tok.to_string()))
        }
    }

    pub fn expect_ident(&mut self) -> ParseResult<(String, Span)> {
        if !matches!(self.peek(), Token::Ident(_)) {
            return Err(self.expected("an identifier"));
        }
        match self.advance() {
            (Token::Ident(name), span) => Ok((name, span)),
            _ => unreachable!(),
        }
    }

    pub fn expect_int(&mut self) -> ParseResult<(u64, Span)> {
        let n = match self.peek() {
            Token::IntLiteral(n) => *n,
            _ => return Err(self.expected("an integer literal")),
        };
        Ok((n, self.advance().1))
    }

    /// An [`ParseError::ExpectedToken`] diagnostic at the current token.
    pub fn expected(&self, expected: impl Into<String>) -> Diagnostic {
        Diagnostic::new(
            ParseError::ExpectedToken {
                expected: expected.into(),
                found: self.peek().clone(),
            },
            self.span().clone(),
        )
    }

    /// An [`ParseError::UnexpectedToken`] diagnostic at the current token.
    pub fn unexpected(&self, expected: impl Into<String>) -> Diagnostic {
        Diagnostic::new(
            ParseError::UnexpectedToken {
                found: self.peek().clone(),
                expected: expected.into(),
            },
            self.span().clone(),
        )
    }

    pub(crate) fn token_at(&self, pos: usize) -> &Token {
        &self.tokens[pos.min(self.tokens.len() - 1)].0
    }
}
