//! Top-level definitions, declarations and recovery after a failed definition.

use super::{unterminated_at_eof, ParserState};
use crate::{
    error::{Diagnostic, ParseError},
    lexer::Token,
    span::{Span, Spanned},
    stream::ParseResult,
    syntax::*,
};

/// Whether `tok`, followed by `next`, starts a new top-level definition. User-defined
/// type names are left out, they are too common to restart on.
fn starts_definition(tok: &Token, next: &Token) -> bool {
    match tok {
        Token::KwStruct | Token::KwEnum => true,
        tok if tok.is_primitive_type() => matches!(next, Token::Ident(_)),
        _ => false,
    }
}

impl ParserState {
    pub(crate) fn translation_unit(&mut self) -> (TranslationUnit, Vec<Diagnostic>) {
        let mut unit = TranslationUnit::default();
        let mut diagnostics = Vec::new();

        while !self.stream.is_eof() {
            let start = self.stream.position();
            match self.definition() {
                Ok(def) => unit.definitions.push(def),
                Err(diag) => {
                    tracing::debug!(error = %diag, "definition failed, resynchronizing");
                    diagnostics.push(diag);
                    self.synchronize(start);
                }
            }
        }

        (unit, diagnostics)
    }

    /// Skip the rest of a failed definition which started at token `start`.
    ///
    /// Stops after a `;` at brace depth 0 or after the `}` closing depth 0, or before
    /// `struct`, `enum` or a built-in type name followed by a name at depth 0. This is
    /// a heuristic: an error in a definition may still cascade into the next ones.
    fn synchronize(&mut self, start: usize) {
        let failed_at = self.stream.position();
        let mut depth = (start..failed_at).fold(0i32, |depth, i| match self.stream.token_at(i) {
            Token::BraceLeft => depth + 1,
            Token::BraceRight => depth - 1,
            _ => depth,
        });

        loop {
            let tok = self.stream.peek().clone();
            match tok {
                Token::Eof => break,
                Token::BraceLeft => depth += 1,
                Token::BraceRight => {
                    depth -= 1;
                    if depth <= 0 {
                        self.stream.advance();
                        break;
                    }
                }
                Token::Semicolon if depth <= 0 => {
                    self.stream.advance();
                    break;
                }
                ref tok
                    if depth <= 0
                        && self.stream.position() > start
                        && starts_definition(tok, self.stream.peek_nth(1)) =>
                {
                    break
                }
                _ => {}
            }
            self.stream.advance();
        }

        tracing::trace!(
            skipped = self.stream.position() - failed_at,
            "resynchronized"
        );
    }

    fn definition(&mut self) -> ParseResult<Spanned<Definition>> {
        let start = self.stream.span().clone();
        let def: Definition = match self.stream.peek() {
            Token::KwStruct => self.struct_definition()?.into(),
            Token::KwEnum => self.enum_definition()?.into(),
            tok if tok.is_primitive_type() || matches!(tok, Token::Ident(_)) => {
                let ty = self.type_specifier()?;
                let (name, _) = self.stream.expect_ident()?;
                if self.stream.check(&Token::ParenLeft) {
                    self.function_rest(ty, name)?.into()
                } else {
                    self.declaration_rest(ty, name)?.into()
                }
            }
            _ => return Err(self.stream.unexpected("a definition")),
        };
        Ok(Spanned::new(def, self.stream.span_from(&start)))
    }

    /// A built-in type name or a user-defined type name.
    pub(crate) fn type_specifier(&mut self) -> ParseResult<Spanned<TypeSpecifier>> {
        let tok = self.stream.peek();
        let ty = if let Some(ty) = PrimitiveType::from_token(tok) {
            TypeSpecifier::Primitive(ty)
        } else if let Token::Ident(name) = tok {
            TypeSpecifier::Named(name.clone())
        } else {
            return Err(self.stream.expected("a type specifier"));
        };
        let (_, span) = self.stream.advance();
        Ok(Spanned::new(ty, span))
    }

    /// `[ integer ]`, optional.
    fn array_specifier(&mut self) -> ParseResult<Option<u64>> {
        if !self.stream.eat(&Token::BracketLeft) {
            return Ok(None);
        }
        let (size, _) = self.stream.expect_int()?;
        self.stream.expect(&Token::BracketRight)?;
        Ok(Some(size))
    }

    /// `[[ name ]]` or `[[ name ( argument ) ]]`, optional.
    fn attribute(&mut self) -> ParseResult<Option<Spanned<Attribute>>> {
        if !self.stream.check(&Token::AttrOpen) {
            return Ok(None);
        }
        let (_, start) = self.stream.advance();
        let (name, _) = self.stream.expect_ident()?;
        let argument = if self.stream.eat(&Token::ParenLeft) {
            let (arg, _) = self.stream.expect_ident()?;
            self.stream.expect(&Token::ParenRight)?;
            Some(arg)
        } else {
            None
        };
        self.stream.expect(&Token::AttrClose)?;
        let span = self.stream.span_from(&start);
        Ok(Some(Spanned::new(Attribute { name, argument }, span)))
    }

    /// A full declaration, including the terminating `;`.
    pub(crate) fn declaration(&mut self) -> ParseResult<Spanned<Declaration>> {
        let start = self.stream.span().clone();
        let ty = self.type_specifier()?;
        let (name, _) = self.stream.expect_ident()?;
        let decl = self.declaration_rest(ty, name)?;
        Ok(Spanned::new(decl, self.stream.span_from(&start)))
    }

    /// The part of a declaration after the declared name.
    fn declaration_rest(
        &mut self,
        ty: Spanned<TypeSpecifier>,
        name: String,
    ) -> ParseResult<Declaration> {
        let array_size = self.array_specifier()?;
        let initializer = if self.stream.eat(&Token::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.stream.expect(&Token::Semicolon)?;
        Ok(Declaration {
            ty,
            name,
            array_size,
            initializer,
        })
    }

    /// The part of a function definition after the function name.
    fn function_rest(
        &mut self,
        return_type: Spanned<TypeSpecifier>,
        name: String,
    ) -> ParseResult<Function> {
        let parameters = self.parameter_list()?;
        let attribute = self.attribute()?;
        let body = self.compound_statement()?;
        Ok(Function {
            return_type,
            name,
            parameters,
            attribute,
            body,
        })
    }

    /// `( [parameter (, parameter)*] )`
    fn parameter_list(&mut self) -> ParseResult<Vec<Spanned<Parameter>>> {
        self.stream.expect(&Token::ParenLeft)?;
        let mut parameters = Vec::new();
        if !self.stream.eat(&Token::ParenRight) {
            loop {
                parameters.push(self.parameter()?);
                if !self.stream.eat(&Token::Comma) {
                    break;
                }
            }
            self.stream.expect(&Token::ParenRight)?;
        }
        Ok(parameters)
    }

    fn parameter(&mut self) -> ParseResult<Spanned<Parameter>> {
        let start = self.stream.span().clone();
        let ty = self.type_specifier()?;
        let (name, _) = self.stream.expect_ident()?;
        let attribute = self.attribute()?;
        let param = Parameter {
            ty,
            name,
            attribute,
        };
        Ok(Spanned::new(param, self.stream.span_from(&start)))
    }

    /// Expects the `}` closing a struct or enum body opened at `open`.
    fn close_body(&mut self, open: Span, construct: &'static str) -> ParseResult<()> {
        match self.stream.peek() {
            Token::BraceRight => {
                self.stream.advance();
                // a trailing `;` is tolerated after struct and enum definitions
                self.stream.eat(&Token::Semicolon);
                Ok(())
            }
            Token::Eof => Err(Diagnostic::new(
                ParseError::UnterminatedConstruct { construct },
                open,
            )),
            _ => Err(self.stream.expected(Token::BraceRight.to_string())),
        }
    }

    /// `struct name { member* }`
    fn struct_definition(&mut self) -> ParseResult<Struct> {
        self.stream.expect(&Token::KwStruct)?;
        let (name, _) = self.stream.expect_ident()?;
        let open = self.stream.expect(&Token::BraceLeft)?;

        let mut members = Vec::new();
        while !matches!(self.stream.peek(), Token::BraceRight | Token::Eof) {
            let member = self
                .struct_member()
                .map_err(|diag| unterminated_at_eof(diag, &open, "struct body"))?;
            members.push(member);
        }

        self.close_body(open, "struct body")?;
        Ok(Struct { name, members })
    }

    /// `type name [array] ;`
    fn struct_member(&mut self) -> ParseResult<Spanned<StructMember>> {
        let start = self.stream.span().clone();
        let ty = self.type_specifier()?;
        let (name, _) = self.stream.expect_ident()?;
        let array_size = self.array_specifier()?;
        self.stream.expect(&Token::Semicolon)?;
        let member = StructMember {
            ty,
            name,
            array_size,
        };
        Ok(Spanned::new(member, self.stream.span_from(&start)))
    }

    /// `enum name : (int | uint) { [enumerator (, enumerator)*] }`
    fn enum_definition(&mut self) -> ParseResult<Enum> {
        self.stream.expect(&Token::KwEnum)?;
        let (name, _) = self.stream.expect_ident()?;
        self.stream.expect(&Token::Colon)?;
        let underlying = match IntegerType::from_token(self.stream.peek()) {
            Some(ty) => {
                self.stream.advance();
                ty
            }
            None => return Err(self.stream.expected("`int` or `uint`")),
        };
        let open = self.stream.expect(&Token::BraceLeft)?;

        let mut enumerators = Vec::new();
        if matches!(self.stream.peek(), Token::Ident(_)) {
            loop {
                let enumerator = self
                    .enumerator()
                    .map_err(|diag| unterminated_at_eof(diag, &open, "enum body"))?;
                enumerators.push(enumerator);
                if !self.stream.eat(&Token::Comma) {
                    break;
                }
            }
        }

        self.close_body(open, "enum body")?;
        Ok(Enum {
            name,
            underlying,
            enumerators,
        })
    }

    /// `name [= integer]`
    fn enumerator(&mut self) -> ParseResult<Spanned<Enumerator>> {
        let (name, start) = self.stream.expect_ident()?;
        let value = if self.stream.eat(&Token::Equal) {
            Some(self.stream.expect_int()?.0)
        } else {
            None
        };
        let enumerator = Enumerator { name, value };
        Ok(Spanned::new(enumerator, self.stream.span_from(&start)))
    }
}
