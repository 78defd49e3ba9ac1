//! The [`Parser`] takes source code and returns a [syntax tree] and a list of
//! [diagnostics].
//!
//! The parser is a hand-written recursive descent over the definitions and
//! statements, and uses precedence climbing for binary expressions. It needs a
//! single token of lookahead, except to tell a declaration with a user-defined type
//! (`Light l;`) from an expression statement, which takes two.
//!
//! [syntax tree]: crate::syntax
//! [diagnostics]: crate::error::Diagnostic

mod decl;
mod expr;
mod stmt;

use std::str::FromStr;

use crate::{
    error::{Diagnostic, ParseError},
    lexer::{tokenize, Token},
    span::{Span, Spanned},
    stream::{ParseResult, TokenStream},
    syntax::{Expression, ExpressionNode, TranslationUnit},
};

pub use expr::Precedence;

/// How deep blocks, prefix operators, parentheses, call arguments and binary operator
/// chains may nest. Deeper input is rejected with [`ParseError::NestingTooDeep`].
pub const MAX_DEPTH: usize = 128;

/// Parser configuration. The default follows the grammar exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Binding power of binary operators.
    pub precedence: Precedence,
    /// Accept `( expression )` in expression position.
    pub parenthesized: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse with the default options.
    pub fn parse_str(source: &str) -> (TranslationUnit, Vec<Diagnostic>) {
        Self::default().parse(source)
    }

    /// Parse a whole source file.
    ///
    /// Definitions which fail to parse are left out of the translation unit and
    /// reported in the diagnostics, one diagnostic per failed definition. A lexical
    /// error stops everything: the translation unit is empty and the lexical error is
    /// the only diagnostic.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn parse(&self, source: &str) -> (TranslationUnit, Vec<Diagnostic>) {
        let tokens = match tokenize(source) {
            Ok(tokens) => tokens,
            Err(diag) => {
                tracing::debug!(error = %diag, "lexing failed");
                return (TranslationUnit::default(), vec![diag]);
            }
        };
        let mut state = ParserState::new(tokens, self.options);
        let (unit, diagnostics) = state.translation_unit();
        tracing::debug!(
            definitions = unit.definitions.len(),
            errors = diagnostics.len(),
            "parsed translation unit"
        );
        (unit, diagnostics)
    }

    /// Check that the source is valid, returning the first error if not.
    pub fn recognize_str(source: &str) -> Result<(), Diagnostic> {
        match Self::parse_str(source).1.into_iter().next() {
            Some(diag) => Err(diag),
            None => Ok(()),
        }
    }

    /// Parse a single expression spanning the whole source.
    pub fn parse_expression(&self, source: &str) -> ParseResult<ExpressionNode> {
        let tokens = tokenize(source)?;
        let mut state = ParserState::new(tokens, self.options);
        let expr = state.expression()?;
        if !state.stream.is_eof() {
            return Err(state.stream.expected(Token::Eof.to_string()));
        }
        Ok(expr)
    }
}

impl FromStr for TranslationUnit {
    type Err = Diagnostic;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let (unit, diagnostics) = Parser::parse_str(source);
        match diagnostics.into_iter().next() {
            Some(diag) => Err(diag),
            None => Ok(unit),
        }
    }
}

impl FromStr for Expression {
    type Err = Diagnostic;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Parser::default()
            .parse_expression(source)
            .map(Spanned::into_inner)
    }
}

/// The state of one parse: the token cursor and the options. The grammar rules are
/// implemented on it in the `decl`, `stmt` and `expr` modules.
pub(crate) struct ParserState {
    stream: TokenStream,
    options: ParseOptions,
    depth: usize,
}

impl ParserState {
    fn new(tokens: Vec<(Token, Span)>, options: ParseOptions) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            options,
            depth: 0,
        }
    }

    /// Enter one more nesting level. The caller restores `depth` when it is done.
    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Diagnostic::new(
                ParseError::NestingTooDeep { limit: MAX_DEPTH },
                self.stream.span().clone(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `rule` one nesting level deeper.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let depth = self.depth;
        let res = self.descend().and_then(|()| rule(self));
        self.depth = depth;
        res
    }

    /// Whether the current tokens start a declaration: a built-in type name, or a
    /// user-defined type name followed by the declared name.
    fn starts_declaration(&self) -> bool {
        match self.stream.peek() {
            tok if tok.is_primitive_type() => true,
            Token::Ident(_) => matches!(self.stream.peek_nth(1), Token::Ident(_)),
            _ => false,
        }
    }
}

/// End of input met anywhere inside a body opened at `open` means the body is never
/// closed. Other diagnostics are returned as is.
fn unterminated_at_eof(diag: Diagnostic, open: &Span, construct: &'static str) -> Diagnostic {
    match diag.error {
        ParseError::ExpectedToken {
            found: Token::Eof, ..
        }
        | ParseError::UnexpectedToken {
            found: Token::Eof, ..
        } => Diagnostic::new(ParseError::UnterminatedConstruct { construct }, open.clone()),
        _ => diag,
    }
}
