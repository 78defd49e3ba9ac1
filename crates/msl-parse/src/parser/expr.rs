//! Expressions: precedence climbing over the binary operators, prefix unary
//! operators, calls and literals.

use super::ParserState;
use crate::{
    lexer::Token,
    span::Spanned,
    stream::ParseResult,
    syntax::*,
};

/// The precedence table of binary operators. All operators are left-associative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precedence {
    /// Every binary operator has the same binding power: `a + b * c` is
    /// `(a + b) * c`. This is what the grammar declares.
    #[default]
    Flat,
    /// C precedence: multiplicative, additive, relational, equality, `&&`, `||`,
    /// from tightest to loosest.
    CLike,
}

impl Precedence {
    /// Binding power of `op`. Higher binds tighter, the lowest is 1.
    pub fn binding_power(&self, op: BinaryOperator) -> u8 {
        use BinaryOperator::*;
        match self {
            Precedence::Flat => 1,
            Precedence::CLike => match op {
                ShortCircuitOr => 1,
                ShortCircuitAnd => 2,
                Equality | Inequality => 3,
                LessThan | GreaterThan | LessThanEqual | GreaterThanEqual => 4,
                Addition | Subtraction => 5,
                Multiplication | Division | Remainder => 6,
            },
        }
    }
}

impl ParserState {
    pub(crate) fn expression(&mut self) -> ParseResult<ExpressionNode> {
        self.binary_expression(0)
    }

    /// Parse operands and operators as long as the operators bind at least as
    /// tightly as `min_power`.
    fn binary_expression(&mut self, min_power: u8) -> ParseResult<ExpressionNode> {
        let depth = self.depth;
        let res = self.binary_fold(min_power);
        self.depth = depth;
        res
    }

    // each fold nests the expression parsed so far one level deeper.
    fn binary_fold(&mut self, min_power: u8) -> ParseResult<ExpressionNode> {
        let mut left = self.unary_expression()?;

        while let Some(operator) = BinaryOperator::from_token(self.stream.peek()) {
            let power = self.options.precedence.binding_power(operator);
            if power < min_power {
                break;
            }
            self.descend()?;
            self.stream.advance();
            let right = self.binary_expression(power + 1)?;
            let span = left.span().extend(right.span());
            let expr = BinaryExpression {
                operator,
                left,
                right,
            };
            left = Spanned::new(expr.into(), span);
        }

        Ok(left)
    }

    fn unary_expression(&mut self) -> ParseResult<ExpressionNode> {
        match UnaryOperator::from_token(self.stream.peek()) {
            Some(operator) => {
                let (_, start) = self.stream.advance();
                let operand = self.nested(Self::unary_expression)?;
                let span = start.extend(operand.span());
                let expr = UnaryExpression { operator, operand };
                Ok(Spanned::new(expr.into(), span))
            }
            None => self.primary_expression(),
        }
    }

    fn primary_expression(&mut self) -> ParseResult<ExpressionNode> {
        let start = self.stream.span().clone();
        let expr = match self.stream.peek() {
            Token::Ident(_) => {
                let (name, _) = self.stream.expect_ident()?;
                if self.stream.check(&Token::ParenLeft) {
                    let arguments = self.nested(Self::argument_list)?;
                    Expression::Call(CallExpression {
                        callee: name,
                        arguments,
                    })
                } else {
                    Expression::Identifier(name.into())
                }
            }
            Token::IntLiteral(value) => {
                let expr = Expression::IntegerLiteral(*value);
                self.stream.advance();
                expr
            }
            Token::FloatLiteral(value) => {
                let expr = Expression::FloatLiteral(*value);
                self.stream.advance();
                expr
            }
            Token::ParenLeft if self.options.parenthesized => {
                let expression = self.nested(|this| {
                    this.stream.advance();
                    let expression = this.expression()?;
                    this.stream.expect(&Token::ParenRight)?;
                    Ok(expression)
                })?;
                Expression::Parenthesized(ParenthesizedExpression { expression })
            }
            // nothing where an operand should be
            tok if tok.is_closing() => return Err(self.stream.expected("an expression")),
            _ => return Err(self.stream.unexpected("an expression")),
        };
        Ok(Spanned::new(expr, self.stream.span_from(&start)))
    }

    /// `( [expression (, expression)*] )`
    fn argument_list(&mut self) -> ParseResult<Vec<ExpressionNode>> {
        self.stream.expect(&Token::ParenLeft)?;
        let mut arguments = Vec::new();
        if !self.stream.eat(&Token::ParenRight) {
            loop {
                arguments.push(self.expression()?);
                if !self.stream.eat(&Token::Comma) {
                    break;
                }
            }
            self.stream.expect(&Token::ParenRight)?;
        }
        Ok(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ParseError, ParseOptions, Parser};

    fn parse(source: &str) -> Expression {
        source.parse().expect("parse error")
    }

    fn parse_with(options: ParseOptions, source: &str) -> Expression {
        Parser::with_options(options)
            .parse_expression(source)
            .expect("parse error")
            .into_inner()
    }

    fn binary(expr: &Expression) -> &BinaryExpression {
        match expr {
            Expression::Binary(b) => b,
            _ => panic!("not a binary expression: {expr:?}"),
        }
    }

    #[test]
    fn flat_precedence_folds_left() {
        // (a + b) * c
        let expr = parse("a + b * c");
        let mul = binary(&expr);
        assert_eq!(mul.operator, BinaryOperator::Multiplication);
        assert_eq!(*mul.right.node(), Expression::from("c"));
        let add = binary(&mul.left);
        assert_eq!(add.operator, BinaryOperator::Addition);
        assert_eq!(*add.left.node(), Expression::from("a"));
        assert_eq!(*add.right.node(), Expression::from("b"));
    }

    #[test]
    fn c_precedence_is_selectable() {
        let options = ParseOptions {
            precedence: Precedence::CLike,
            ..Default::default()
        };
        // a + (b * c)
        let expr = parse_with(options, "a + b * c");
        let add = binary(&expr);
        assert_eq!(add.operator, BinaryOperator::Addition);
        assert_eq!(binary(&add.right).operator, BinaryOperator::Multiplication);

        // (a < b) || ((c == d) && e)
        let expr = parse_with(options, "a < b || c == d && e");
        let or = binary(&expr);
        assert_eq!(or.operator, BinaryOperator::ShortCircuitOr);
        assert_eq!(binary(&or.left).operator, BinaryOperator::LessThan);
        let and = binary(&or.right);
        assert_eq!(and.operator, BinaryOperator::ShortCircuitAnd);
        assert_eq!(binary(&and.left).operator, BinaryOperator::Equality);

        // left associative within a level: (a - b) - c
        let expr = parse_with(options, "a - b - c");
        let outer = binary(&expr);
        assert_eq!(*outer.right.node(), Expression::from("c"));
        assert!(outer.left.is_binary());
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        let expr = parse("-a + !b");
        let add = binary(&expr);
        assert!(matches!(
            add.left.node(),
            Expression::Unary(UnaryExpression { operator: UnaryOperator::Negation, .. })
        ));
        assert!(matches!(
            add.right.node(),
            Expression::Unary(UnaryExpression { operator: UnaryOperator::LogicalNegation, .. })
        ));

        let expr = parse("!-x");
        let Expression::Unary(outer) = &expr else {
            panic!("not unary")
        };
        assert!(outer.operand.is_unary());
    }

    #[test]
    fn calls() {
        let expr = parse("max(a, 1.5, f())");
        let Expression::Call(call) = &expr else {
            panic!("not a call")
        };
        assert_eq!(call.callee, "max");
        assert_eq!(call.arguments.len(), 3);
        assert_eq!(*call.arguments[1].node(), Expression::FloatLiteral(1.5));
        assert!(matches!(
            call.arguments[2].node(),
            Expression::Call(CallExpression { arguments, .. }) if arguments.is_empty()
        ));
    }

    #[test]
    fn trailing_comma_in_call_is_rejected() {
        let err = "f(a,)".parse::<Expression>().unwrap_err();
        assert!(matches!(err.error, ParseError::ExpectedToken { .. }));
    }

    #[test]
    fn parentheses_are_rejected_by_default() {
        let err = "(a + b) * c".parse::<Expression>().unwrap_err();
        assert_eq!(
            err.error,
            ParseError::UnexpectedToken {
                found: Token::ParenLeft,
                expected: "an expression".to_string()
            }
        );
        assert_eq!(err.span.range(), 0..1);
    }

    #[test]
    fn parentheses_extension() {
        let options = ParseOptions {
            parenthesized: true,
            ..Default::default()
        };
        let expr = parse_with(options, "a * (b + c)");
        let mul = binary(&expr);
        assert!(mul.right.is_parenthesized());
    }

    #[test]
    fn spans_cover_the_expression() {
        let expr = Parser::default().parse_expression("foo(1) + -x").unwrap();
        assert_eq!(expr.span().range(), 0..11);
        let Expression::Binary(add) = expr.node() else {
            panic!("not binary")
        };
        assert_eq!(add.left.span().range(), 0..6);
        assert_eq!(add.right.span().range(), 9..11);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let too_deep = ParseError::NestingTooDeep {
            limit: crate::parser::MAX_DEPTH,
        };
        let options = ParseOptions {
            parenthesized: true,
            ..Default::default()
        };
        let sources = [
            format!("{}a", "-".repeat(200_000)),
            format!("{}a{}", "f(".repeat(5_000), ")".repeat(5_000)),
            format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000)),
            ["a"; 5_000].join(" + "),
        ];
        for source in &sources {
            let err = Parser::with_options(options)
                .parse_expression(source)
                .unwrap_err();
            assert_eq!(err.error, too_deep);
        }

        let (unit, diagnostics) =
            Parser::parse_str(&format!("int x = {}a;
int y;", "!".repeat(200_000)));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].error, too_deep);
        assert_eq!(unit.definitions[0].name(), "y");
    }

    #[test]
    fn nesting_within_the_limit() {
        let options = ParseOptions {
            parenthesized: true,
            ..Default::default()
        };
        let source = format!("{}a{}", "(-".repeat(50), ")".repeat(50));
        assert!(Parser::with_options(options).parse_expression(&source).is_ok());
        let source = ["a"; 100].join(" * ");
        assert!(source.parse::<Expression>().is_ok());
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = "a b".parse::<Expression>().unwrap_err();
        assert!(matches!(
            err.error,
            ParseError::ExpectedToken { found: Token::Ident(_), .. }
        ));
    }
}
