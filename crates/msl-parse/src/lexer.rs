//! Prefer using [`Parser::parse_str`][crate::Parser::parse_str]. You shouldn't need to
//! manipulate the lexer.

use std::fmt::Display;

use logos::{FilterResult, Logos, SpannedIter};

use crate::{
    error::{Diagnostic, LexError},
    span::Span,
};

fn parse_int(lex: &mut logos::Lexer<Token>) -> Result<u64, LexError> {
    let str = lex.slice();
    lexical::parse::<u64, _>(str).map_err(|_| LexError::IntegerOutOfRange(str.to_string()))
}

fn parse_float(lex: &mut logos::Lexer<Token>) -> Result<f64, LexError> {
    let str = lex.slice();
    match lexical::parse::<f64, _>(str) {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(LexError::FloatOutOfRange(str.to_string())),
    }
}

// block comments do not nest: the first `*/` closes the comment.
fn parse_block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(LexError::UnterminatedComment)
        }
    }
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(
    skip r"\s+",
    skip r"//[^\n]*", // line comment
    error = LexError)]
pub enum Token {
    // comments. This variant is never produced.
    #[token("/*", parse_block_comment)]
    Ignored,

    // punctuation
    #[token("(")]
    ParenLeft,
    #[token(")")]
    ParenRight,
    #[token("{")]
    BraceLeft,
    #[token("}")]
    BraceRight,
    #[token("[")]
    BracketLeft,
    #[token("]")]
    BracketRight,
    #[token("[[")]
    AttrOpen,
    #[token("]]")]
    AttrClose,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equal,

    // operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    LessThanEqual,
    #[token(">=")]
    GreaterThanEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // keywords: built-in type names
    #[token("void")]
    KwVoid,
    #[token("float")]
    KwFloat,
    #[token("float2")]
    KwFloat2,
    #[token("float3")]
    KwFloat3,
    #[token("float4")]
    KwFloat4,
    #[token("float4x4")]
    KwFloat4x4,
    #[token("int")]
    KwInt,
    #[token("uint")]
    KwUint,
    #[token("half")]
    KwHalf,
    #[token("half2")]
    KwHalf2,
    #[token("half3")]
    KwHalf3,
    #[token("half4")]
    KwHalf4,
    #[token("bool")]
    KwBool,
    #[token("texture2d")]
    KwTexture2d,

    // keywords: structure and control flow
    #[token("struct")]
    KwStruct,
    #[token("enum")]
    KwEnum,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("for")]
    KwFor,
    #[token("while")]
    KwWhile,
    #[token("do")]
    KwDo,
    #[token("return")]
    KwReturn,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9]+", parse_int)]
    IntLiteral(u64),
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    FloatLiteral(f64),

    /// Appended by [`tokenize`] after the last token.
    Eof,
}

impl Token {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::KwStruct
                | Token::KwEnum
                | Token::KwIf
                | Token::KwElse
                | Token::KwFor
                | Token::KwWhile
                | Token::KwDo
                | Token::KwReturn
        ) || self.is_primitive_type()
    }

    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Token::KwVoid
                | Token::KwFloat
                | Token::KwFloat2
                | Token::KwFloat3
                | Token::KwFloat4
                | Token::KwFloat4x4
                | Token::KwInt
                | Token::KwUint
                | Token::KwHalf
                | Token::KwHalf2
                | Token::KwHalf3
                | Token::KwHalf4
                | Token::KwBool
                | Token::KwTexture2d
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::IntLiteral(_) | Token::FloatLiteral(_))
    }

    /// Tokens which close a construct. A missing operand is reported when an
    /// expression is expected but one of these is found.
    pub fn is_closing(&self) -> bool {
        matches!(
            self,
            Token::Semicolon
                | Token::Comma
                | Token::ParenRight
                | Token::BracketRight
                | Token::BraceRight
                | Token::AttrClose
                | Token::Eof
        )
    }

    /// The source text of symbols and keywords.
    pub fn symbol(&self) -> Option<&'static str> {
        let sym = match self {
            Token::ParenLeft => "(",
            Token::ParenRight => ")",
            Token::BraceLeft => "{",
            Token::BraceRight => "}",
            Token::BracketLeft => "[",
            Token::BracketRight => "]",
            Token::AttrOpen => "[[",
            Token::AttrClose => "]]",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Equal => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::EqualEqual => "==",
            Token::NotEqual => "!=",
            Token::LessThan => "<",
            Token::GreaterThan => ">",
            Token::LessThanEqual => "<=",
            Token::GreaterThanEqual => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Bang => "!",
            Token::KwVoid => "void",
            Token::KwFloat => "float",
            Token::KwFloat2 => "float2",
            Token::KwFloat3 => "float3",
            Token::KwFloat4 => "float4",
            Token::KwFloat4x4 => "float4x4",
            Token::KwInt => "int",
            Token::KwUint => "uint",
            Token::KwHalf => "half",
            Token::KwHalf2 => "half2",
            Token::KwHalf3 => "half3",
            Token::KwHalf4 => "half4",
            Token::KwBool => "bool",
            Token::KwTexture2d => "texture2d",
            Token::KwStruct => "struct",
            Token::KwEnum => "enum",
            Token::KwIf => "if",
            Token::KwElse => "else",
            Token::KwFor => "for",
            Token::KwWhile => "while",
            Token::KwDo => "do",
            Token::KwReturn => "return",
            Token::Ignored
            | Token::Ident(_)
            | Token::IntLiteral(_)
            | Token::FloatLiteral(_)
            | Token::Eof => return None,
        };
        Some(sym)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier `{s}`"),
            Token::IntLiteral(n) => write!(f, "integer literal `{n}`"),
            Token::FloatLiteral(n) => write!(f, "float literal `{n:?}`"),
            Token::Eof => f.write_str("end of input"),
            Token::Ignored => f.write_str("comment"),
            tok => match tok.symbol() {
                Some(sym) => write!(f, "`{sym}`"),
                None => unreachable!(),
            },
        }
    }
}

/// Iterates over the tokens of a source string, skipping whitespace and comments.
#[derive(Clone)]
pub struct Lexer<'s> {
    source: &'s str,
    token_stream: SpannedIter<'s, Token>,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            token_stream: Token::lexer(source).spanned(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(Token, Span), Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        let (tok, span) = self.token_stream.next()?;
        Some(match tok {
            Ok(tok) => Ok((tok, Span::new(span))),
            Err(LexError::InvalidToken) => {
                // report the first unknown character only
                let c = self.source[span.start..].chars().next().unwrap_or('\0');
                let span = span.start..span.start + c.len_utf8();
                Err(Diagnostic::new(
                    LexError::UnrecognizedCharacter(c),
                    Span::new(span),
                ))
            }
            Err(LexError::UnterminatedComment) => {
                // point at the comment opening
                let span = span.start..(span.start + 2).min(self.source.len());
                Err(Diagnostic::new(LexError::UnterminatedComment, Span::new(span)))
            }
            Err(err) => Err(Diagnostic::new(err, Span::new(span))),
        })
    }
}

/// Lex the whole source. The resulting tokens always end with [`Token::Eof`].
///
/// Lexing stops at the first error.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, Diagnostic> {
    let mut tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
    tokens.push((Token::Eof, Span::at(source.len())));
    tracing::trace!(count = tokens.len(), "tokenized");
    Ok(tokens)
}
