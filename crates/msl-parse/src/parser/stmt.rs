//! Statements and compound statements.

use super::{unterminated_at_eof, ParserState};
use crate::{
    error::{Diagnostic, ParseError},
    lexer::Token,
    span::Spanned,
    stream::ParseResult,
    syntax::*,
};

impl ParserState {
    /// `{ statement* }`
    pub(crate) fn compound_statement(&mut self) -> ParseResult<Spanned<CompoundStatement>> {
        self.nested(Self::block)
    }

    fn block(&mut self) -> ParseResult<Spanned<CompoundStatement>> {
        const CONSTRUCT: &str = "compound statement";
        let open = self.stream.expect(&Token::BraceLeft)?;
        let mut statements = Vec::new();
        loop {
            match self.stream.peek() {
                Token::BraceRight => break,
                Token::Eof => {
                    return Err(Diagnostic::new(
                        ParseError::UnterminatedConstruct {
                            construct: CONSTRUCT,
                        },
                        open,
                    ))
                }
                _ => {
                    let stmt = self
                        .statement()
                        .map_err(|diag| unterminated_at_eof(diag, &open, CONSTRUCT))?;
                    statements.push(stmt);
                }
            }
        }
        self.stream.advance();
        let span = self.stream.span_from(&open);
        Ok(Spanned::new(CompoundStatement { statements }, span))
    }

    pub(crate) fn statement(&mut self) -> ParseResult<StatementNode> {
        let start = self.stream.span().clone();
        let stmt: Statement = match self.stream.peek() {
            Token::KwReturn => self.return_statement()?.into(),
            Token::KwIf => self.if_statement()?.into(),
            Token::KwFor => self.for_statement()?.into(),
            Token::KwWhile => self.while_statement()?.into(),
            Token::KwDo => self.do_while_statement()?.into(),
            Token::BraceLeft => self.compound_statement()?.into_inner().into(),
            _ if self.starts_declaration() => self.declaration()?.into_inner().into(),
            _ => {
                let expr = self.expression()?;
                self.stream.expect(&Token::Semicolon)?;
                Statement::Expression(expr)
            }
        };
        Ok(Spanned::new(stmt, self.stream.span_from(&start)))
    }

    fn return_statement(&mut self) -> ParseResult<ReturnStatement> {
        self.stream.expect(&Token::KwReturn)?;
        let expression = if self.stream.check(&Token::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.stream.expect(&Token::Semicolon)?;
        Ok(ReturnStatement { expression })
    }

    /// `( expression )`
    fn condition(&mut self) -> ParseResult<ExpressionNode> {
        self.stream.expect(&Token::ParenLeft)?;
        let expr = self.expression()?;
        self.stream.expect(&Token::ParenRight)?;
        Ok(expr)
    }

    // the else block binds to this `if` only if it directly follows the then block,
    // which attaches a dangling else to the innermost `if`.
    fn if_statement(&mut self) -> ParseResult<IfStatement> {
        self.stream.expect(&Token::KwIf)?;
        let condition = self.condition()?;
        let then_block = self.compound_statement()?;
        let else_block = if self.stream.eat(&Token::KwElse) {
            Some(self.compound_statement()?)
        } else {
            None
        };
        Ok(IfStatement {
            condition,
            then_block,
            else_block,
        })
    }

    /// `for ( (declaration | ;) expression? ; expression? ) compound_statement`
    fn for_statement(&mut self) -> ParseResult<ForStatement> {
        self.stream.expect(&Token::KwFor)?;
        self.stream.expect(&Token::ParenLeft)?;

        // the declaration consumes its own `;`
        let initializer = if self.stream.eat(&Token::Semicolon) {
            None
        } else if self.starts_declaration() {
            Some(self.declaration()?)
        } else {
            return Err(self.stream.expected("a declaration or `;`"));
        };

        let condition = if self.stream.check(&Token::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.stream.expect(&Token::Semicolon)?;

        let increment = if self.stream.check(&Token::ParenRight) {
            None
        } else {
            Some(self.expression()?)
        };
        self.stream.expect(&Token::ParenRight)?;

        let body = self.compound_statement()?;
        Ok(ForStatement {
            initializer,
            condition,
            increment,
            body,
        })
    }

    fn while_statement(&mut self) -> ParseResult<WhileStatement> {
        self.stream.expect(&Token::KwWhile)?;
        let condition = self.condition()?;
        let body = self.compound_statement()?;
        Ok(WhileStatement { condition, body })
    }

    fn do_while_statement(&mut self) -> ParseResult<DoWhileStatement> {
        self.stream.expect(&Token::KwDo)?;
        let body = self.compound_statement()?;
        self.stream.expect(&Token::KwWhile)?;
        let condition = self.condition()?;
        self.stream.expect(&Token::Semicolon)?;
        Ok(DoWhileStatement { body, condition })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    /// Parse the body of `void main() { ... }`.
    fn body(source: &str) -> Vec<Statement> {
        let source = format!("void main() {{ {source} }}");
        let (unit, diagnostics) = Parser::parse_str(&source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match unit.definitions[0].node() {
            Definition::Function(f) => f
                .body
                .statements
                .iter()
                .map(|stmt| stmt.node().clone())
                .collect(),
            def => panic!("not a function: {def:?}"),
        }
    }

    fn single(source: &str) -> Statement {
        let mut stmts = body(source);
        assert_eq!(stmts.len(), 1);
        stmts.remove(0)
    }

    #[test]
    fn declaration_or_expression() {
        let stmts = body("float a = 1.0; Light l; f(a); a; -a;");
        assert!(stmts[0].is_declaration());
        let Statement::Declaration(decl) = &stmts[1] else {
            panic!("not a declaration")
        };
        assert_eq!(*decl.ty.node(), TypeSpecifier::Named("Light".to_string()));
        assert!(stmts[2].is_expression());
        assert!(stmts[3].is_expression());
        assert!(stmts[4].is_expression());
    }

    #[test]
    fn return_with_and_without_value() {
        let stmts = body("return; return a + 1;");
        assert_eq!(stmts[0], Statement::Return(ReturnStatement { expression: None }));
        assert!(matches!(
            &stmts[1],
            Statement::Return(ReturnStatement { expression: Some(_) })
        ));
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let Statement::If(stmt) = single("if (a) { } else { }") else {
            panic!("not an if")
        };
        assert!(stmt.else_block.is_some());

        let Statement::If(outer) = single("if (a) { if (b) { } } else { }") else {
            panic!("not an if")
        };
        assert!(outer.else_block.is_some());
        let Statement::If(inner) = outer.then_block.statements[0].node() else {
            panic!("not an if")
        };
        assert!(inner.else_block.is_none());
    }

    #[test]
    fn for_with_all_clauses_omitted() {
        let Statement::For(stmt) = single("for (;;) { }") else {
            panic!("not a for")
        };
        assert!(stmt.initializer.is_none());
        assert!(stmt.condition.is_none());
        assert!(stmt.increment.is_none());
        assert!(stmt.body.statements.is_empty());
    }

    #[test]
    fn for_with_all_clauses() {
        let Statement::For(stmt) = single("for (int i = 0; i < n; step(i)) { x; }") else {
            panic!("not a for")
        };
        let init = stmt.initializer.as_ref().expect("initializer");
        assert_eq!(init.name, "i");
        assert!(stmt.condition.as_ref().is_some_and(|c| c.is_binary()));
        assert!(stmt.increment.as_ref().is_some_and(|c| c.is_call()));
        assert_eq!(stmt.body.statements.len(), 1);
    }

    #[test]
    fn for_clauses_are_independent() {
        let Statement::For(stmt) = single("for (; i < n;) { }") else {
            panic!("not a for")
        };
        assert!(stmt.initializer.is_none());
        assert!(stmt.condition.is_some());
        assert!(stmt.increment.is_none());

        let Statement::For(stmt) = single("for (uint i = 0;; f()) { }") else {
            panic!("not a for")
        };
        assert!(stmt.initializer.is_some());
        assert!(stmt.condition.is_none());
        assert!(stmt.increment.is_some());
    }

    #[test]
    fn loops() {
        let stmts = body("while (i < 4) { i; } do { i; } while (i);");
        assert!(stmts[0].is_while());
        let Statement::DoWhile(stmt) = &stmts[1] else {
            panic!("not a do-while")
        };
        assert_eq!(stmt.body.statements.len(), 1);
        assert_eq!(*stmt.condition.node(), Expression::from("i"));
    }

    #[test]
    fn nested_blocks() {
        let Statement::Compound(block) = single("{ int a; { } }") else {
            panic!("not a block")
        };
        assert_eq!(block.statements.len(), 2);
        assert!(block.statements[1].is_compound());
    }

    #[test]
    fn if_requires_braces() {
        let (_, diagnostics) = Parser::parse_str("void main() { if (a) return; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].error,
            ParseError::ExpectedToken {
                expected: "`{`".to_string(),
                found: Token::KwReturn
            }
        );
    }

    #[test]
    fn end_of_input_inside_a_statement() {
        let sources = [
            "void main() { int a",
            "void main() { if (a) { f(",
            "void main() { return",
        ];
        for source in sources {
            let (_, diagnostics) = Parser::parse_str(source);
            assert_eq!(diagnostics.len(), 1, "{source}");
            assert_eq!(
                diagnostics[0].error,
                ParseError::UnterminatedConstruct {
                    construct: "compound statement"
                },
                "{source}"
            );
        }
        // the innermost open block is reported
        let (_, diagnostics) = Parser::parse_str("void main() { if (a) { f(");
        assert_eq!(diagnostics[0].span.range(), 21..22);
    }

    #[test]
    fn deeply_nested_blocks_are_rejected() {
        let depth = 5_000;
        let source = format!(
            "void main() {{ {}{} }} int b;",
            "{".repeat(depth),
            "}".repeat(depth)
        );
        let (unit, diagnostics) = Parser::parse_str(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].error,
            ParseError::NestingTooDeep {
                limit: crate::parser::MAX_DEPTH
            }
        );
        // recovery skips the whole function
        assert_eq!(unit.definitions.len(), 1);
        assert_eq!(unit.definitions[0].name(), "b");

        // within the limit
        let stmts = body(&format!("{}{}", "{".repeat(100), "}".repeat(100)));
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn unterminated_body() {
        let source = "void main() { int a;";
        let (unit, diagnostics) = Parser::parse_str(source);
        assert!(unit.definitions.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].error,
            ParseError::UnterminatedConstruct {
                construct: "compound statement"
            }
        );
        assert_eq!(diagnostics[0].span.range(), 12..13);
    }
}
