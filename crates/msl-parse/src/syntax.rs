//! A syntax tree for shading-language files. The root of the tree is a
//! [`TranslationUnit`].
//!
//! ## Strictness
//!
//! This syntax tree is rather strict, meaning it cannot represent most syntactically
//! incorrect programs. But it is only syntactic: type names are not resolved,
//! attributes are not interpreted and enumerator values are not computed.
//!
//! Nodes which carry a source position are wrapped in [`Spanned`]. Spans are
//! ignored when comparing trees.

use derive_more::{Display, From, IsVariant};

use crate::span::Spanned;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type ExpressionNode = Spanned<Expression>;
pub type StatementNode = Spanned<Statement>;

#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranslationUnit {
    pub definitions: Vec<Spanned<Definition>>,
}

#[derive(Clone, Debug, PartialEq, From, IsVariant)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Definition {
    Function(Function),
    Struct(Struct),
    Enum(Enum),
    Declaration(Declaration),
}

#[derive(Clone, Debug, PartialEq, From, IsVariant)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeSpecifier {
    Primitive(PrimitiveType),
    /// A user-defined type. Whether it exists is not checked.
    Named(String),
}

/// The closed set of built-in type names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveType {
    #[display("void")]
    Void,
    #[display("float")]
    Float,
    #[display("float2")]
    Float2,
    #[display("float3")]
    Float3,
    #[display("float4")]
    Float4,
    #[display("float4x4")]
    Float4x4,
    #[display("int")]
    Int,
    #[display("uint")]
    Uint,
    #[display("half")]
    Half,
    #[display("half2")]
    Half2,
    #[display("half3")]
    Half3,
    #[display("half4")]
    Half4,
    #[display("bool")]
    Bool,
    #[display("texture2d")]
    Texture2d,
}

/// Underlying type of an enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegerType {
    #[display("int")]
    Int,
    #[display("uint")]
    Uint,
}

/// `[[name]]` or `[[name(argument)]]`. The meaning is left to consumers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    pub name: String,
    pub argument: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Function {
    pub return_type: Spanned<TypeSpecifier>,
    pub name: String,
    pub parameters: Vec<Spanned<Parameter>>,
    pub attribute: Option<Spanned<Attribute>>,
    pub body: Spanned<CompoundStatement>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    pub ty: Spanned<TypeSpecifier>,
    pub name: String,
    pub attribute: Option<Spanned<Attribute>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Struct {
    pub name: String,
    pub members: Vec<Spanned<StructMember>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructMember {
    pub ty: Spanned<TypeSpecifier>,
    pub name: String,
    pub array_size: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enum {
    pub name: String,
    pub underlying: IntegerType,
    pub enumerators: Vec<Spanned<Enumerator>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enumerator {
    pub name: String,
    /// Only explicit values are recorded, implicit ones are not computed.
    pub value: Option<u64>,
}

/// A variable declaration, at the top level or in a function body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    pub ty: Spanned<TypeSpecifier>,
    pub name: String,
    pub array_size: Option<u64>,
    pub initializer: Option<ExpressionNode>,
}

#[derive(Clone, Debug, PartialEq, From, IsVariant)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Call(CallExpression),
    Identifier(IdentifierExpression),
    #[from(skip)]
    IntegerLiteral(u64),
    #[from(skip)]
    FloatLiteral(f64),
    /// Only produced when the parser is configured to accept parentheses.
    Parenthesized(ParenthesizedExpression),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: ExpressionNode,
    pub right: ExpressionNode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOperator {
    #[display("+")]
    Addition,
    #[display("-")]
    Subtraction,
    #[display("*")]
    Multiplication,
    #[display("/")]
    Division,
    #[display("%")]
    Remainder,
    #[display("==")]
    Equality,
    #[display("!=")]
    Inequality,
    #[display("<")]
    LessThan,
    #[display(">")]
    GreaterThan,
    #[display("<=")]
    LessThanEqual,
    #[display(">=")]
    GreaterThanEqual,
    #[display("&&")]
    ShortCircuitAnd,
    #[display("||")]
    ShortCircuitOr,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: ExpressionNode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOperator {
    #[display("-")]
    Negation,
    #[display("!")]
    LogicalNegation,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallExpression {
    pub callee: String,
    pub arguments: Vec<ExpressionNode>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentifierExpression {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParenthesizedExpression {
    pub expression: ExpressionNode,
}

#[derive(Clone, Debug, PartialEq, From, IsVariant)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    Declaration(Declaration),
    #[from(skip)]
    Expression(ExpressionNode),
    Return(ReturnStatement),
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    Compound(CompoundStatement),
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompoundStatement {
    pub statements: Vec<StatementNode>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReturnStatement {
    pub expression: Option<ExpressionNode>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IfStatement {
    pub condition: ExpressionNode,
    pub then_block: Spanned<CompoundStatement>,
    pub else_block: Option<Spanned<CompoundStatement>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForStatement {
    pub initializer: Option<Spanned<Declaration>>,
    pub condition: Option<ExpressionNode>,
    pub increment: Option<ExpressionNode>,
    pub body: Spanned<CompoundStatement>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WhileStatement {
    pub condition: ExpressionNode,
    pub body: Spanned<CompoundStatement>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DoWhileStatement {
    pub body: Spanned<CompoundStatement>,
    pub condition: ExpressionNode,
}
