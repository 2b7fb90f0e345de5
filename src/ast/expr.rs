//! Expression nodes.

use super::{Declaration, GenericType, Statement, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeric, string, char and boolean literals, lexeme kept verbatim.
    Literal(Literal),
    Null,
    /// `T.class`.
    TypeLiteral(Type),
    /// A bare name, including `this` and `super` in reference position.
    Name(String),
    MemberAccess {
        object: Box<Expression>,
        name: String,
    },
    FunctionCall {
        object: Option<Box<Expression>>,
        type_args: Vec<Type>,
        name: String,
        args: Vec<Expression>,
    },
    ClassCreator {
        r#type: GenericType,
        args: Vec<Expression>,
        body: Option<Vec<Declaration>>,
    },
    ArrayCreator {
        element: Type,
        /// Sized dimensions (`new int[3][]` is `[Some(3), None]`).
        dims: Vec<Option<Expression>>,
        init: Option<Box<Expression>>,
    },
    /// `{ a, b, c }` in array-initialiser position.
    ArrayInitializer(Vec<Expression>),
    Binary {
        op: String,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Unary {
        op: String,
        operand: Box<Expression>,
    },
    /// `++x`, `x--`, ...
    Increment {
        op: String,
        prefix: bool,
        operand: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    Assignment {
        target: Box<Expression>,
        op: String,
        value: Box<Expression>,
    },
    Cast {
        target: Type,
        operand: Box<Expression>,
    },
    Parenthesis(Box<Expression>),
    Lambda(Lambda),
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    InstanceOf {
        operand: Box<Expression>,
        target: Type,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: String,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub params: LambdaParams,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaParams {
    /// `x -> ...`
    Single(String),
    /// `(x, y) -> ...`
    Inferred(Vec<String>),
    /// `(int x, int y) -> ...`
    Typed(Vec<super::FormalParameter>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expr(Box<Expression>),
    Block(Vec<Statement>),
}

impl Expression {
    pub fn literal(value: impl Into<String>) -> Expression {
        Expression::Literal(Literal::new(value))
    }

    /// Build a member-access chain from a dotted name: `java.util.List`
    /// becomes `Name(java).util.List`. Desugarings qualify their targets
    /// this way.
    pub fn dotted(qualname: &str) -> Expression {
        let mut parts = qualname.split('.');
        let mut expr = Expression::Name(parts.next().unwrap_or_default().to_string());
        for part in parts {
            expr = Expression::MemberAccess {
                object: Box::new(expr),
                name: part.to_string(),
            };
        }
        expr
    }

    /// A call `object.name(args)` where `object` is a dotted name.
    pub fn dotted_call(qualname: &str, name: &str, args: Vec<Expression>) -> Expression {
        Expression::FunctionCall {
            object: Some(Box::new(Expression::dotted(qualname))),
            type_args: Vec::new(),
            name: name.to_string(),
            args,
        }
    }

    /// Literal and null operands keep the primitive `==`/`!=` under the
    /// equality-operator rewrite.
    pub fn is_literal_operand(&self) -> bool {
        matches!(self, Expression::Literal(_) | Expression::Null)
    }

    /// "Simple" receiver test for the elvis rewrite: literals, null, type
    /// literals, bare names, and parenthesised simple expressions choose
    /// `requireNonNullElse` over the deferred `...ElseGet` form.
    pub fn is_simple_operand(&self) -> bool {
        match self {
            Expression::Literal(_)
            | Expression::Null
            | Expression::TypeLiteral(_)
            | Expression::Name(_) => true,
            Expression::Parenthesis(inner) => inner.is_simple_operand(),
            _ => false,
        }
    }
}
