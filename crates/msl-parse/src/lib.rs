//! A parser for a Metal-style shading language subset: functions, structs, enums,
//! declarations, C-style statements and expressions.
//!
//! # Parsing a source file
//!
//! ```rust
//! let source = "float4 frag(VertexOut in [[stage_in]]) [[fragment]] { return in; }";
//! let (unit, diagnostics) = msl_parse::Parser::parse_str(source);
//! assert!(diagnostics.is_empty());
//! println!("{unit:?}");
//! ```
//!
//! Parsing does not stop at the first error. Each top-level definition which fails
//! to parse produces one [`Diagnostic`] and is left out of the translation unit,
//! then parsing resumes at the next definition. Only the first diagnostic of a file
//! is fully reliable, later ones may be caused by the recovery.
//!
//! ```rust
//! let source = "int x = ;\nfloat y = 1.0;";
//! let (unit, diagnostics) = msl_parse::Parser::parse_str(source);
//! assert_eq!(diagnostics.len(), 1);
//! eprintln!("{}", diagnostics[0].report(source));
//! assert_eq!(unit.definitions.len(), 1);
//! ```
//!
//! # Syntax tree
//!
//! see [syntax tree]
//!
//! # Stringification
//!
//! The syntax tree elements implement [`Display`][std::fmt::Display]. Parsing the
//! display output gives back an equal tree.
//!
//! ```rust
//! let source = "struct Point { float x; float y; }";
//! let unit: msl_parse::syntax::TranslationUnit = source.parse().unwrap();
//! // modify the unit as needed...
//! println!("{unit}");
//! ```
//!
//! [syntax tree]: syntax

pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod stream;
pub mod syntax;

mod syntax_display;
mod syntax_impl;

pub use error::{Diagnostic, ParseError, Severity};
pub use lexer::{tokenize, Lexer, Token};
pub use parser::{ParseOptions, Parser, Precedence};
