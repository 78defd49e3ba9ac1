//! Error types. A [`Diagnostic`] is what the parser reports for every failure: a
//! [`ParseError`] with the span it applies to.

use std::fmt::Display;

use annotate_snippets::{Level, Renderer, Snippet};
use thiserror::Error;

use crate::{lexer::Token, span::Span};

/// Lexical errors. This is also the error type of the `logos` token enum.
#[derive(Error, Clone, Debug, Default, PartialEq)]
pub enum LexError {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("unrecognized character `{0}`")]
    UnrecognizedCharacter(char),
    #[error("integer literal `{0}` does not fit in 64 bits")]
    IntegerOutOfRange(String),
    #[error("float literal `{0}` is out of range")]
    FloatOutOfRange(String),
    #[error("unterminated block comment")]
    UnterminatedComment,
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("{0}")]
    Lex(LexError),
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { found: Token, expected: String },
    #[error("expected {expected}, found {found}")]
    ExpectedToken { expected: String, found: Token },
    #[error("unterminated {construct}")]
    UnterminatedConstruct { construct: &'static str },
    #[error("nesting too deep, the limit is {limit}")]
    NestingTooDeep { limit: usize },
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        match error {
            LexError::UnterminatedComment => Self::UnterminatedConstruct {
                construct: "block comment",
            },
            error => Self::Lex(error),
        }
    }
}

impl ParseError {
    fn label(&self) -> String {
        match self {
            ParseError::Lex(_) => "this token is unknown".to_string(),
            ParseError::UnexpectedToken { expected, .. } => format!("expected {expected}"),
            ParseError::ExpectedToken { expected, .. } => format!("expected {expected} here"),
            ParseError::UnterminatedConstruct { .. } => "opened here, never closed".to_string(),
            ParseError::NestingTooDeep { .. } => "too many nested levels here".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
#[error("{severity}: {error}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: ParseError,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(error: impl Into<ParseError>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            error: error.into(),
            span,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn line_col(&self, source: &str) -> (usize, usize) {
        self.span.line_col(source)
    }

    /// Attach the source text, to render the diagnostic with a code excerpt.
    pub fn report<'a>(&'a self, source: &'a str) -> Report<'a> {
        Report {
            diagnostic: self,
            source,
            origin: None,
            styled: false,
        }
    }
}

/// A [`Diagnostic`] paired with its source text. Its `Display` impl renders an
/// annotated excerpt of the offending code.
#[derive(Clone, Debug)]
pub struct Report<'a> {
    diagnostic: &'a Diagnostic,
    source: &'a str,
    origin: Option<&'a str>,
    styled: bool,
}

impl<'a> Report<'a> {
    /// Name of the file shown in the excerpt header.
    pub fn with_origin(mut self, origin: &'a str) -> Self {
        self.origin = Some(origin);
        self
    }
    /// Use terminal colors.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = self.source;
        let diag = self.diagnostic;
        let renderer = if self.styled {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        // spans at end of input are empty and sit at `source.len()`.
        let start = diag.span.start.min(source.len());
        let end = diag.span.end.clamp(start, source.len());

        let title = diag.message();
        let label = diag.error.label();
        let mut snippet = Snippet::source(source)
            .fold(true)
            .annotation(Level::Error.span(start..end).label(&label));
        if let Some(origin) = self.origin {
            snippet = snippet.origin(origin);
        }
        let message = Level::Error.title(&title).snippet(snippet);
        let rendered = renderer.render(message);
        write!(f, "{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_comment_is_an_unterminated_construct() {
        let err = ParseError::from(LexError::UnterminatedComment);
        assert_eq!(
            err,
            ParseError::UnterminatedConstruct {
                construct: "block comment"
            }
        );
    }

    #[test]
    fn report_mentions_message() {
        let source = "int x = ;";
        let diag = Diagnostic::new(
            ParseError::ExpectedToken {
                expected: "an expression".to_string(),
                found: Token::Semicolon,
            },
            Span::new(8..9),
        );
        let rendered = diag.report(source).with_origin("x.metal").to_string();
        assert!(rendered.contains("expected an expression, found `;`"));
        assert!(rendered.contains("x.metal"));
        assert_eq!(diag.to_string(), "error: expected an expression, found `;`");
    }

    #[test]
    fn report_at_end_of_input() {
        let source = "void f() {";
        let diag = Diagnostic::new(
            ParseError::UnterminatedConstruct {
                construct: "compound statement",
            },
            Span::at(source.len()),
        );
        let rendered = diag.report(source).to_string();
        assert!(rendered.contains("unterminated compound statement"));
        assert!(rendered.contains("opened here, never closed"));
    }
}
