use std::str::FromStr;

use crate::{lexer::Token, span::Spanned, syntax::*};

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 14] = [
        PrimitiveType::Void,
        PrimitiveType::Float,
        PrimitiveType::Float2,
        PrimitiveType::Float3,
        PrimitiveType::Float4,
        PrimitiveType::Float4x4,
        PrimitiveType::Int,
        PrimitiveType::Uint,
        PrimitiveType::Half,
        PrimitiveType::Half2,
        PrimitiveType::Half3,
        PrimitiveType::Half4,
        PrimitiveType::Bool,
        PrimitiveType::Texture2d,
    ];

    pub fn from_token(tok: &Token) -> Option<Self> {
        let ty = match tok {
            Token::KwVoid => Self::Void,
            Token::KwFloat => Self::Float,
            Token::KwFloat2 => Self::Float2,
            Token::KwFloat3 => Self::Float3,
            Token::KwFloat4 => Self::Float4,
            Token::KwFloat4x4 => Self::Float4x4,
            Token::KwInt => Self::Int,
            Token::KwUint => Self::Uint,
            Token::KwHalf => Self::Half,
            Token::KwHalf2 => Self::Half2,
            Token::KwHalf3 => Self::Half3,
            Token::KwHalf4 => Self::Half4,
            Token::KwBool => Self::Bool,
            Token::KwTexture2d => Self::Texture2d,
            _ => return None,
        };
        Some(ty)
    }
}

impl FromStr for PrimitiveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.to_string() == s)
            .ok_or(())
    }
}

impl IntegerType {
    pub fn from_token(tok: &Token) -> Option<Self> {
        match tok {
            Token::KwInt => Some(Self::Int),
            Token::KwUint => Some(Self::Uint),
            _ => None,
        }
    }
}

impl TypeSpecifier {
    pub fn name(&self) -> String {
        match self {
            TypeSpecifier::Primitive(ty) => ty.to_string(),
            TypeSpecifier::Named(name) => name.clone(),
        }
    }
}

impl From<&str> for TypeSpecifier {
    /// Decided lexically: built-in type names become [`TypeSpecifier::Primitive`].
    fn from(name: &str) -> Self {
        match name.parse::<PrimitiveType>() {
            Ok(ty) => Self::Primitive(ty),
            Err(()) => Self::Named(name.to_string()),
        }
    }
}

impl BinaryOperator {
    pub fn from_token(tok: &Token) -> Option<Self> {
        let op = match tok {
            Token::Plus => Self::Addition,
            Token::Minus => Self::Subtraction,
            Token::Star => Self::Multiplication,
            Token::Slash => Self::Division,
            Token::Percent => Self::Remainder,
            Token::EqualEqual => Self::Equality,
            Token::NotEqual => Self::Inequality,
            Token::LessThan => Self::LessThan,
            Token::GreaterThan => Self::GreaterThan,
            Token::LessThanEqual => Self::LessThanEqual,
            Token::GreaterThanEqual => Self::GreaterThanEqual,
            Token::AndAnd => Self::ShortCircuitAnd,
            Token::OrOr => Self::ShortCircuitOr,
            _ => return None,
        };
        Some(op)
    }
}

impl UnaryOperator {
    pub fn from_token(tok: &Token) -> Option<Self> {
        match tok {
            Token::Minus => Some(Self::Negation),
            Token::Bang => Some(Self::LogicalNegation),
            _ => None,
        }
    }
}

impl From<String> for IdentifierExpression {
    fn from(name: String) -> Self {
        Self { name }
    }
}

impl From<&str> for Expression {
    fn from(name: &str) -> Self {
        Self::Identifier(name.to_string().into())
    }
}

impl From<u64> for Expression {
    fn from(value: u64) -> Self {
        Self::IntegerLiteral(value)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Self::FloatLiteral(value)
    }
}

impl TranslationUnit {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.definitions.iter().filter_map(|def| match def.node() {
            Definition::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &Struct> {
        self.definitions.iter().filter_map(|def| match def.node() {
            Definition::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.definitions.iter().filter_map(|def| match def.node() {
            Definition::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.definitions.iter().filter_map(|def| match def.node() {
            Definition::Declaration(d) => Some(d),
            _ => None,
        })
    }

    /// Find a definition by name.
    pub fn definition(&self, name: &str) -> Option<&Spanned<Definition>> {
        self.definitions.iter().find(|def| def.name() == name)
    }
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Function(f) => &f.name,
            Definition::Struct(s) => &s.name,
            Definition::Enum(e) => &e.name,
            Definition::Declaration(d) => &d.name,
        }
    }
}
