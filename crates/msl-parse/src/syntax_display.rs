//! Stringification of the syntax tree. Parsing the output of `Display` yields a tree
//! equal to the original one, given the same [`ParseOptions`][crate::ParseOptions].

use core::fmt;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{span::Spanned, syntax::*};

impl<T: Display> Display for Spanned<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.node().fmt(f)
    }
}

struct Indent<T: Display>(pub T);

impl<T: Display> Display for Indent<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let indent = "    ";
        let inner_display = self.0.to_string();
        let fmt = inner_display
            .lines()
            .format_with("\n", |l, f| f(&format_args!("{indent}{l}")));
        write!(f, "{}", fmt)?;
        Ok(())
    }
}

fn fmt_array_size(size: &Option<u64>) -> impl Display + '_ {
    size.iter()
        .format_with("", |size, f| f(&format_args!("[{size}]")))
}

fn fmt_attr(attr: &Option<Spanned<Attribute>>) -> impl Display + '_ {
    attr.iter()
        .format_with("", |attr, f| f(&format_args!(" {attr}")))
}

impl Display for TranslationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let definitions = self.definitions.iter().format("\n\n");
        writeln!(f, "{definitions}")
    }
}

impl Display for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Function(print) => write!(f, "{}", print),
            Definition::Struct(print) => write!(f, "{}", print),
            Definition::Enum(print) => write!(f, "{}", print),
            Definition::Declaration(print) => write!(f, "{}", print),
        }
    }
}

impl Display for TypeSpecifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpecifier::Primitive(ty) => write!(f, "{ty}"),
            TypeSpecifier::Named(name) => write!(f, "{name}"),
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match &self.argument {
            Some(arg) => write!(f, "[[{name}({arg})]]"),
            None => write!(f, "[[{name}]]"),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ret = &self.return_type;
        let name = &self.name;
        let params = self.parameters.iter().format(", ");
        let attr = fmt_attr(&self.attribute);
        let body = &self.body;
        write!(f, "{ret} {name}({params}){attr} {body}")
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = &self.ty;
        let name = &self.name;
        let attr = fmt_attr(&self.attribute);
        write!(f, "{ty} {name}{attr}")
    }
}

impl Display for Struct {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        if self.members.is_empty() {
            return write!(f, "struct {name} {{}}");
        }
        let members = Indent(self.members.iter().format("\n"));
        write!(f, "struct {name} {{\n{members}\n}}")
    }
}

impl Display for StructMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = &self.ty;
        let name = &self.name;
        let size = fmt_array_size(&self.array_size);
        write!(f, "{ty} {name}{size};")
    }
}

impl Display for Enum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let ty = &self.underlying;
        if self.enumerators.is_empty() {
            return write!(f, "enum {name} : {ty} {{}}");
        }
        let enumerators = Indent(self.enumerators.iter().format(",\n"));
        write!(f, "enum {name} : {ty} {{\n{enumerators}\n}}")
    }
}

impl Display for Enumerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match self.value {
            Some(value) => write!(f, "{name} = {value}"),
            None => write!(f, "{name}"),
        }
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = &self.ty;
        let name = &self.name;
        let size = fmt_array_size(&self.array_size);
        let init = self
            .initializer
            .iter()
            .format_with("", |expr, f| f(&format_args!(" = {expr}")));
        write!(f, "{ty} {name}{size}{init};")
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Binary(print) => write!(f, "{print}"),
            Expression::Unary(print) => write!(f, "{print}"),
            Expression::Call(print) => write!(f, "{print}"),
            Expression::Identifier(print) => write!(f, "{print}"),
            Expression::IntegerLiteral(value) => write!(f, "{value}"),
            Expression::FloatLiteral(value) => {
                // `Display` drops the fraction of whole numbers, which would lex as an integer.
                let repr = value.to_string();
                if repr.contains('.') {
                    write!(f, "{repr}")
                } else {
                    write!(f, "{repr}.0")
                }
            }
            Expression::Parenthesized(print) => write!(f, "{print}"),
        }
    }
}

impl Display for BinaryExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let operator = &self.operator;
        let left = &self.left;
        let right = &self.right;
        write!(f, "{left} {operator} {right}")
    }
}

impl Display for UnaryExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let operator = &self.operator;
        let operand = &self.operand;
        write!(f, "{operator}{operand}")
    }
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.callee;
        let args = self.arguments.iter().format(", ");
        write!(f, "{name}({args})")
    }
}

impl Display for IdentifierExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        write!(f, "{name}")
    }
}

impl Display for ParenthesizedExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let expr = &self.expression;
        write!(f, "({expr})")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Declaration(print) => write!(f, "{print}"),
            Statement::Expression(print) => write!(f, "{print};"),
            Statement::Return(print) => write!(f, "{print}"),
            Statement::If(print) => write!(f, "{print}"),
            Statement::For(print) => write!(f, "{print}"),
            Statement::While(print) => write!(f, "{print}"),
            Statement::DoWhile(print) => write!(f, "{print}"),
            Statement::Compound(print) => write!(f, "{print}"),
        }
    }
}

impl Display for CompoundStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{}}");
        }
        let stmts = Indent(self.statements.iter().format("\n"));
        write!(f, "{{\n{stmts}\n}}")
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.expression {
            Some(expr) => write!(f, "return {expr};"),
            None => write!(f, "return;"),
        }
    }
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cond = &self.condition;
        let then = &self.then_block;
        write!(f, "if ({cond}) {then}")?;
        if let Some(else_block) = &self.else_block {
            write!(f, " else {else_block}")?;
        }
        Ok(())
    }
}

impl Display for ForStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // the declaration prints its own `;`
        let init = self
            .initializer
            .as_ref()
            .map(|decl| decl.to_string())
            .unwrap_or_else(|| ";".to_string());
        let cond = self
            .condition
            .iter()
            .format_with("", |expr, f| f(&format_args!(" {expr}")));
        let incr = self
            .increment
            .iter()
            .format_with("", |expr, f| f(&format_args!(" {expr}")));
        let body = &self.body;
        write!(f, "for ({init}{cond};{incr}) {body}")
    }
}

impl Display for WhileStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cond = &self.condition;
        let body = &self.body;
        write!(f, "while ({cond}) {body}")
    }
}

impl Display for DoWhileStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let body = &self.body;
        let cond = &self.condition;
        write!(f, "do {body} while ({cond});")
    }
}
