//! Expression grammar and the expression-level desugarings.
//!
//! Collection and optional literals, the elvis and equality operators, the
//! class-creator extension, and regex/byte-string lowering all happen here,
//! in-production: the extended form is recognised, gated on the feature
//! registry, and immediately rewritten to the plain-Java call it stands for.
//!
//! `(` opens three different things — a cast, a lambda parameter list, or a
//! parenthesised expression — and is disambiguated speculatively in that
//! order under savepoints.

use super::{DeclarationParsing, ParseResult, Parser, StatementParsing, TypeParsing};
use crate::ast::{
    Expression, GenericType, Lambda, LambdaBody, LambdaParams, QualName, Type,
};
use crate::error::SyntaxErrorKind;
use crate::token::{is_primitive_type, Token, TokenKind};

pub trait ExpressionParsing {
    fn parse_expression(&mut self) -> ParseResult<Expression>;
    /// `( arg, ... )` including the parentheses.
    fn parse_args(&mut self) -> ParseResult<Vec<Expression>>;
    /// One argument; a `name :` prefix is accepted and discarded when
    /// argument annotations are enabled (position is authoritative).
    fn parse_arg(&mut self) -> ParseResult<Expression>;
    fn parse_ternary(&mut self) -> ParseResult<Expression>;
    fn parse_unary(&mut self) -> ParseResult<Expression>;
    fn parse_primary(&mut self) -> ParseResult<Expression>;
    /// `{ a, b }` / nested array initialisers; always allows a trailing
    /// comma, as plain Java does.
    fn parse_array_initializer(&mut self) -> ParseResult<Expression>;
}

impl ExpressionParsing for Parser {
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        if self.check_pair(TokenKind::Name, "->") {
            let name = self.advance().lexeme;
            self.advance();
            let body = self.parse_lambda_body()?;
            return Ok(Expression::Lambda(Lambda {
                params: LambdaParams::Single(name),
                body,
            }));
        }
        self.parse_assignment()
    }

    fn parse_args(&mut self) -> ParseResult<Vec<Expression>> {
        self.require("(")?;
        let mut args = Vec::new();
        if !self.check(")") {
            args.push(self.parse_arg()?);
            while self.accept(",") {
                if self.end_after_comma(")", self.features.trailing_argument_commas)? {
                    break;
                }
                args.push(self.parse_arg()?);
            }
        }
        self.require(")")?;
        Ok(args)
    }

    fn parse_arg(&mut self) -> ParseResult<Expression> {
        if self.features.argument_annotations && self.check_pair(TokenKind::Name, ":") {
            self.advance();
            self.advance();
        }
        self.parse_expression()
    }

    fn parse_ternary(&mut self) -> ParseResult<Expression> {
        let condition = self.parse_conditional_or()?;
        if self.features.elvis_operator && self.accept("?:") {
            let fallback = self.parse_ternary()?;
            return Ok(lower_elvis(condition, fallback));
        }
        if self.accept("?") {
            let then_branch = self.parse_expression()?;
            self.require(":")?;
            let else_branch = self.parse_ternary()?;
            return Ok(Expression::Conditional {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(condition)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        for op in ["+", "-", "!", "~"] {
            if self.check(op) {
                self.advance();
                return Ok(Expression::Unary {
                    op: op.to_string(),
                    operand: Box::new(self.parse_unary()?),
                });
            }
        }
        for op in ["++", "--"] {
            if self.check(op) {
                self.advance();
                return Ok(Expression::Increment {
                    op: op.to_string(),
                    prefix: true,
                    operand: Box::new(self.parse_unary()?),
                });
            }
        }
        self.parse_postfix()
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.peek().kind {
            TokenKind::Number => Ok(Expression::literal(self.advance().lexeme)),
            TokenKind::Str => {
                let token = self.advance();
                if token.lexeme.starts_with('b') || token.lexeme.starts_with('B') {
                    self.lower_byte_string(&token)
                } else {
                    Ok(Expression::literal(token.lexeme))
                }
            }
            TokenKind::Regex => {
                let token = self.advance();
                Ok(lower_regex(&token))
            }
            TokenKind::Keyword => self.parse_keyword_primary(),
            TokenKind::Name => {
                let name = self.advance().lexeme;
                if self.check("(") {
                    let args = self.parse_args()?;
                    Ok(Expression::FunctionCall {
                        object: None,
                        type_args: Vec::new(),
                        name,
                        args,
                    })
                } else {
                    Ok(Expression::Name(name))
                }
            }
            TokenKind::Op => match self.peek().lexeme.as_str() {
                "(" => self.parse_paren_cast_or_lambda(),
                "[" if self.features.collection_literals => self.parse_list_literal(),
                "{" if self.features.collection_literals => self.parse_brace_literal(),
                "?" if self.features.optional_literals => self.parse_empty_optional(),
                _ => Err(self.error(SyntaxErrorKind::ExpectedExpression { found: self.found() })),
            },
            TokenKind::EndMarker => {
                Err(self.error(SyntaxErrorKind::ExpectedExpression { found: self.found() }))
            }
        }
    }

    fn parse_array_initializer(&mut self) -> ParseResult<Expression> {
        self.require("{")?;
        let mut elements = Vec::new();
        while !self.check("}") {
            if self.check("{") {
                elements.push(self.parse_array_initializer()?);
            } else {
                elements.push(self.parse_expression()?);
            }
            if !self.accept(",") {
                break;
            }
        }
        self.require("}")?;
        Ok(Expression::ArrayInitializer(elements))
    }
}

impl Parser {
    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let target = self.parse_ternary()?;
        if let Some(op) = self.accept_assignment_op() {
            let value = self.parse_expression()?;
            return Ok(Expression::Assignment {
                target: Box::new(target),
                op,
                value: Box::new(value),
            });
        }
        Ok(target)
    }

    fn accept_assignment_op(&mut self) -> Option<String> {
        const SIMPLE: &[&str] = &["=", "+=", "-=", "*=", "/=", "&=", "|=", "^=", "%=", "<<="];
        for op in SIMPLE {
            if self.check(*op) {
                self.advance();
                return Some((*op).to_string());
            }
        }
        match self.peek_gt_op() {
            Some((op @ (">>=" | ">>>="), len)) => {
                for _ in 0..len {
                    self.advance();
                }
                Some(op.to_string())
            }
            _ => None,
        }
    }

    /// Classify a run of adjacent `>`-led tokens starting at the cursor.
    /// The lexer never merges `>`, so `>>`, `>>>`, `>>=` and `>>>=` are
    /// reassembled here from adjacency.
    fn peek_gt_op(&self) -> Option<(&'static str, usize)> {
        if !self.check(">") {
            return None;
        }
        let second_gt = self.check_at(1, ">") && self.adjacent(1);
        let second_ge = self.check_at(1, ">=") && self.adjacent(1);
        if second_gt {
            let third_gt = self.check_at(2, ">") && self.adjacent(2);
            let third_ge = self.check_at(2, ">=") && self.adjacent(2);
            if third_ge {
                Some((">>>=", 3))
            } else if third_gt {
                Some((">>>", 3))
            } else {
                Some((">>", 2))
            }
        } else if second_ge {
            Some((">>=", 2))
        } else {
            Some((">", 1))
        }
    }

    fn parse_conditional_or(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_conditional_and()?;
        while self.accept("||") {
            let rhs = self.parse_conditional_and()?;
            lhs = binary("||", lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_conditional_and(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_bit_or()?;
        while self.accept("&&") {
            let rhs = self.parse_bit_or()?;
            lhs = binary("&&", lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_bit_or(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_bit_xor()?;
        while self.accept("|") {
            let rhs = self.parse_bit_xor()?;
            lhs = binary("|", lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_bit_xor(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_bit_and()?;
        while self.accept("^") {
            let rhs = self.parse_bit_and()?;
            lhs = binary("^", lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_bit_and(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_equality()?;
        while self.accept("&") {
            let rhs = self.parse_equality()?;
            lhs = binary("&", lhs, rhs);
        }
        Ok(lhs)
    }

    /// `==` and `!=`, plus the `is`/`is!` reference comparison. With the
    /// equality-operator feature on, `==`/`!=` between two non-literal
    /// operands lowers to `Objects.deepEquals`; `is` always stays `==`.
    fn parse_equality(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_relational()?;
        loop {
            if self.features.equality_operator && self.check("is") {
                // `is!` is a single word: the `!` must touch `is`. A
                // detached `!` is a prefix on the right-hand operand.
                let negated = self.check_at(1, "!") && self.adjacent(1);
                self.advance();
                if negated {
                    self.advance();
                }
                let rhs = self.parse_relational()?;
                lhs = binary(if negated { "!=" } else { "==" }, lhs, rhs);
            } else if self.check("==") || self.check("!=") {
                let op = self.advance().lexeme;
                let rhs = self.parse_relational()?;
                if self.features.equality_operator
                    && !lhs.is_literal_operand()
                    && !rhs.is_literal_operand()
                {
                    let call = Expression::FunctionCall {
                        object: Some(Box::new(Expression::Name("Objects".into()))),
                        type_args: Vec::new(),
                        name: "deepEquals".into(),
                        args: vec![lhs, rhs],
                    };
                    lhs = if op == "!=" {
                        Expression::Unary {
                            op: "!".into(),
                            operand: Box::new(call),
                        }
                    } else {
                        call
                    };
                } else {
                    lhs = binary(&op, lhs, rhs);
                }
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_relational(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_shift()?;
        loop {
            if self.accept("instanceof") {
                let target = self.parse_type()?;
                lhs = Expression::InstanceOf {
                    operand: Box::new(lhs),
                    target,
                };
            } else if self.check("<") || self.check("<=") || self.check(">=") {
                let op = self.advance().lexeme;
                let rhs = self.parse_shift()?;
                lhs = binary(&op, lhs, rhs);
            } else if let Some((">", 1)) = self.peek_gt_op() {
                self.advance();
                let rhs = self.parse_shift()?;
                lhs = binary(">", lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_shift(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_additive()?;
        loop {
            if self.accept("<<") {
                let rhs = self.parse_additive()?;
                lhs = binary("<<", lhs, rhs);
            } else if let Some((op @ (">>" | ">>>"), len)) = self.peek_gt_op() {
                for _ in 0..len {
                    self.advance();
                }
                let rhs = self.parse_additive()?;
                lhs = binary(op, lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            if self.check("+") || self.check("-") {
                let op = self.advance().lexeme;
                let rhs = self.parse_multiplicative()?;
                lhs = binary(&op, lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_unary()?;
        loop {
            if self.check("*") || self.check("/") || self.check("%") {
                let op = self.advance().lexeme;
                let rhs = self.parse_unary()?;
                lhs = binary(&op, lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check_pair(".", "class") {
                self.advance();
                self.advance();
                let name = expression_to_type_name(&expr)
                    .ok_or_else(|| self.expected("a type name before '.class'"))?;
                expr = Expression::TypeLiteral(Type::Generic(GenericType { name, args: None }));
            } else if self.check_pair(".", "<") {
                self.advance();
                self.advance();
                let type_args = self.parse_type_args()?;
                let name = self.identifier()?;
                let args = self.parse_args()?;
                expr = Expression::FunctionCall {
                    object: Some(Box::new(expr)),
                    type_args,
                    name,
                    args,
                };
            } else if self.check_pair(".", TokenKind::Name)
                || self.check_pair(".", "this")
                || self.check_pair(".", "super")
            {
                self.advance();
                let name = self.advance().lexeme;
                if self.check("(") {
                    let args = self.parse_args()?;
                    expr = Expression::FunctionCall {
                        object: Some(Box::new(expr)),
                        type_args: Vec::new(),
                        name,
                        args,
                    };
                } else {
                    expr = Expression::MemberAccess {
                        object: Box::new(expr),
                        name,
                    };
                }
            } else if self.check("[") {
                self.advance();
                let index = self.parse_expression()?;
                self.require("]")?;
                expr = Expression::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.check("++") || self.check("--") {
                let op = self.advance().lexeme;
                expr = Expression::Increment {
                    op,
                    prefix: false,
                    operand: Box::new(expr),
                };
            } else if self.features.optional_literals && self.check("!") {
                self.advance();
                expr = Expression::FunctionCall {
                    object: Some(Box::new(expr)),
                    type_args: Vec::new(),
                    name: "orElseThrow".into(),
                    args: Vec::new(),
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_keyword_primary(&mut self) -> ParseResult<Expression> {
        let lexeme = self.peek().lexeme.clone();
        match lexeme.as_str() {
            "true" | "false" => {
                self.advance();
                Ok(Expression::literal(lexeme))
            }
            "null" => {
                self.advance();
                Ok(Expression::Null)
            }
            "this" | "super" => {
                self.advance();
                if self.check("(") {
                    let args = self.parse_args()?;
                    Ok(Expression::FunctionCall {
                        object: None,
                        type_args: Vec::new(),
                        name: lexeme,
                        args,
                    })
                } else {
                    Ok(Expression::Name(lexeme))
                }
            }
            "new" => {
                self.advance();
                self.parse_creator()
            }
            "void" => {
                self.advance();
                self.require(".")?;
                self.require("class")?;
                Ok(Expression::TypeLiteral(Type::Void))
            }
            word if is_primitive_type(word) => {
                let r#type = self.parse_type()?;
                self.require(".")?;
                self.require("class")?;
                Ok(Expression::TypeLiteral(r#type))
            }
            _ => Err(self.error(SyntaxErrorKind::ExpectedExpression { found: self.found() })),
        }
    }

    // ── Creators ───────────────────────────────────────────────────────

    fn parse_creator(&mut self) -> ParseResult<Expression> {
        if self.check(TokenKind::Keyword) && is_primitive_type(&self.peek().lexeme) {
            let element = Type::Primitive(self.advance().lexeme);
            return self.parse_array_creator_rest(element);
        }
        let class_type = self.parse_class_type()?;
        if self.check("[") {
            return self.parse_array_creator_rest(Type::Generic(class_type));
        }
        self.parse_class_creator_rest(class_type)
    }

    fn parse_array_creator_rest(&mut self, element: Type) -> ParseResult<Expression> {
        let mut dims: Vec<Option<Expression>> = Vec::new();
        if self.check_pair("[", "]") {
            while self.check_pair("[", "]") {
                self.advance();
                self.advance();
                dims.push(None);
            }
            let init = self.parse_array_initializer()?;
            return Ok(Expression::ArrayCreator {
                element,
                dims,
                init: Some(Box::new(init)),
            });
        }
        self.require("[")?;
        dims.push(Some(self.parse_expression()?));
        self.require("]")?;
        loop {
            if self.check_pair("[", "]") {
                self.advance();
                self.advance();
                dims.push(None);
            } else if self.check("[") {
                self.advance();
                dims.push(Some(self.parse_expression()?));
                self.require("]")?;
            } else {
                break;
            }
        }
        Ok(Expression::ArrayCreator {
            element,
            dims,
            init: None,
        })
    }

    /// After `new T`: either the brace literal extension, an argument list
    /// with an optional anonymous-class body, or (Java++ only) nothing.
    fn parse_class_creator_rest(&mut self, class_type: GenericType) -> ParseResult<Expression> {
        if self.features.class_creator_expressions && self.check("{") {
            self.advance();
            let first = self.parse_expression()?;
            let literal = if self.accept(":") {
                let mut entries = vec![(first, self.parse_expression()?)];
                while self.accept(",") {
                    if self.end_after_comma("}", self.features.trailing_other_commas)? {
                        break;
                    }
                    entries.push(self.parse_map_entry()?);
                }
                self.require("}")?;
                make_map_literal(entries)
            } else {
                let mut elements = vec![first];
                while self.accept(",") {
                    if self.end_after_comma("}", self.features.trailing_other_commas)? {
                        break;
                    }
                    elements.push(self.parse_expression()?);
                }
                self.require("}")?;
                make_list_literal(elements)
            };
            return Ok(Expression::ClassCreator {
                r#type: class_type,
                args: vec![literal],
                body: None,
            });
        }

        if self.check("(") {
            let args = self.parse_args()?;
            let body = if self.check("{") {
                let name = class_type.name.last().to_string();
                Some(self.parse_braced_class_body(&name)?)
            } else {
                None
            };
            return Ok(Expression::ClassCreator {
                r#type: class_type,
                args,
                body,
            });
        }

        if self.features.class_creator_expressions {
            Ok(Expression::ClassCreator {
                r#type: class_type,
                args: Vec::new(),
                body: None,
            })
        } else {
            Err(self.expected("'('"))
        }
    }

    // ── Collection literals ────────────────────────────────────────────

    fn parse_list_literal(&mut self) -> ParseResult<Expression> {
        self.require("[")?;
        let mut elements = Vec::new();
        if !self.check("]") {
            elements.push(self.parse_expression()?);
            while self.accept(",") {
                if self.end_after_comma("]", self.features.trailing_other_commas)? {
                    break;
                }
                elements.push(self.parse_expression()?);
            }
        }
        self.require("]")?;
        Ok(make_list_literal(elements))
    }

    /// `{ ... }` in expression position: a map if the first element is
    /// followed by `:`, otherwise a set. Empty braces make an empty map.
    fn parse_brace_literal(&mut self) -> ParseResult<Expression> {
        self.require("{")?;
        if self.accept("}") {
            return Ok(make_map_literal(Vec::new()));
        }
        let first = self.parse_expression()?;
        if self.accept(":") {
            let mut entries = vec![(first, self.parse_expression()?)];
            while self.accept(",") {
                if self.end_after_comma("}", self.features.trailing_other_commas)? {
                    break;
                }
                entries.push(self.parse_map_entry()?);
            }
            self.require("}")?;
            Ok(make_map_literal(entries))
        } else {
            let mut elements = vec![first];
            while self.accept(",") {
                if self.end_after_comma("}", self.features.trailing_other_commas)? {
                    break;
                }
                elements.push(self.parse_expression()?);
            }
            self.require("}")?;
            Ok(make_set_literal(elements))
        }
    }

    fn parse_map_entry(&mut self) -> ParseResult<(Expression, Expression)> {
        let key = self.parse_expression()?;
        self.require(":")?;
        let value = self.parse_expression()?;
        Ok((key, value))
    }

    // ── Optional literals ──────────────────────────────────────────────

    /// Prefix `?`, optionally typed: `?<Integer>` and the primitive
    /// variants map onto the matching `Optional*.empty()`.
    fn parse_empty_optional(&mut self) -> ParseResult<Expression> {
        self.require("?")?;
        if self.accept("<") {
            let r#type = self.parse_type()?;
            self.require(">")?;
            if let Type::Primitive(name) = &r#type {
                let host = match name.as_str() {
                    "int" => "OptionalInt",
                    "long" => "OptionalLong",
                    "double" => "OptionalDouble",
                    other => {
                        return Err(self.error(SyntaxErrorKind::ExpectedType {
                            found: format!("primitive type '{}'", other),
                        }))
                    }
                };
                return Ok(Expression::FunctionCall {
                    object: Some(Box::new(Expression::Name(host.into()))),
                    type_args: Vec::new(),
                    name: "empty".into(),
                    args: Vec::new(),
                });
            }
            return Ok(Expression::FunctionCall {
                object: Some(Box::new(Expression::Name("Optional".into()))),
                type_args: vec![r#type],
                name: "empty".into(),
                args: Vec::new(),
            });
        }
        Ok(Expression::FunctionCall {
            object: Some(Box::new(Expression::Name("Optional".into()))),
            type_args: Vec::new(),
            name: "empty".into(),
            args: Vec::new(),
        })
    }

    // ── Parenthesis disambiguation ─────────────────────────────────────

    /// Speculation order per the grammar: cast, then lambda, then a plain
    /// parenthesised expression.
    fn parse_paren_cast_or_lambda(&mut self) -> ParseResult<Expression> {
        if let Some(cast) = self.try_parse(|p| p.parse_cast_expression()) {
            return Ok(cast);
        }
        if let Some(lambda) = self.try_parse(|p| p.parse_paren_lambda()) {
            return Ok(lambda);
        }
        self.require("(")?;
        let inner = self.parse_expression()?;
        self.require(")")?;
        Ok(Expression::Parenthesis(Box::new(inner)))
    }

    fn parse_cast_expression(&mut self) -> ParseResult<Expression> {
        self.require("(")?;
        let target = self.parse_type()?;
        self.require(")")?;
        // `(a) - b` is subtraction; a sign only continues a cast of a
        // primitive or array type.
        let allow_sign = matches!(target, Type::Primitive(_) | Type::Array(_));
        let starts_operand = match self.peek().kind {
            TokenKind::Name | TokenKind::Number | TokenKind::Str | TokenKind::Regex => true,
            TokenKind::Keyword => matches!(
                self.peek().lexeme.as_str(),
                "this" | "super" | "new" | "true" | "false" | "null"
            ),
            TokenKind::Op => {
                let lexeme = self.peek().lexeme.as_str();
                matches!(lexeme, "(" | "!" | "~" | "++" | "--")
                    || (allow_sign && matches!(lexeme, "+" | "-"))
                    || (self.features.optional_literals && lexeme == "?")
            }
            TokenKind::EndMarker => false,
        };
        if !starts_operand {
            return Err(self.error(SyntaxErrorKind::ExpectedExpression { found: self.found() }));
        }
        let operand = self.parse_unary()?;
        Ok(Expression::Cast {
            target,
            operand: Box::new(operand),
        })
    }

    fn parse_paren_lambda(&mut self) -> ParseResult<Expression> {
        if let Some(params) = self.try_parse(|p| p.parse_inferred_lambda_params()) {
            let body = self.parse_lambda_body()?;
            return Ok(Expression::Lambda(Lambda { params, body }));
        }
        self.parse_typed_lambda_params()
    }

    fn parse_inferred_lambda_params(&mut self) -> ParseResult<LambdaParams> {
        self.require("(")?;
        if self.accept(")") {
            self.require("->")?;
            return Ok(LambdaParams::Inferred(Vec::new()));
        }
        let mut names = vec![self.identifier()?];
        while self.accept(",") {
            names.push(self.identifier()?);
        }
        self.require(")")?;
        self.require("->")?;
        Ok(LambdaParams::Inferred(names))
    }

    fn parse_typed_lambda_params(&mut self) -> ParseResult<Expression> {
        // Reuses the formal-parameter grammar from the declaration family.
        let params = super::decl::parse_lambda_parameter_list(self)?;
        self.require("->")?;
        let body = self.parse_lambda_body()?;
        Ok(Expression::Lambda(Lambda {
            params: LambdaParams::Typed(params),
            body,
        }))
    }

    fn parse_lambda_body(&mut self) -> ParseResult<LambdaBody> {
        if self.check("{") {
            Ok(LambdaBody::Block(self.parse_block()?))
        } else {
            Ok(LambdaBody::Expr(Box::new(self.parse_expression()?)))
        }
    }

    /// A declarator or default-argument initialiser. `{ ... }` is a plain
    /// array initialiser whenever it parses as one; a brace form that does
    /// not (a map literal's `:` entries) falls back to the expression
    /// grammar, where the collection-literal gate applies.
    pub(super) fn parse_variable_initializer(&mut self) -> ParseResult<Expression> {
        if self.check("{") {
            if let Some(init) = self.try_parse(|p| p.parse_array_initializer()) {
                return Ok(init);
            }
        }
        self.parse_expression()
    }

    // ── Literal lowerings ──────────────────────────────────────────────

    /// `b"hi"` becomes `new byte[] { 104, 105 }`.
    fn lower_byte_string(&self, token: &Token) -> ParseResult<Expression> {
        let inner = &token.lexeme[2..token.lexeme.len() - 1];
        let mut bytes: Vec<u8> = Vec::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                continue;
            }
            let escape = chars.next().unwrap_or('\\');
            let value = match escape {
                'n' => b'\n',
                't' => b'\t',
                'r' => b'\r',
                'b' => 8,
                'f' => 12,
                '0' => 0,
                '\\' => b'\\',
                '\'' => b'\'',
                '"' => b'"',
                'x' => {
                    let hi = chars.next().and_then(|c| c.to_digit(16));
                    let lo = chars.next().and_then(|c| c.to_digit(16));
                    match (hi, lo) {
                        (Some(hi), Some(lo)) => (hi * 16 + lo) as u8,
                        _ => {
                            return Err(crate::error::SyntaxError::new(
                                SyntaxErrorKind::InvalidEscape {
                                    escape: "\\x".into(),
                                },
                                token.span,
                            ))
                        }
                    }
                }
                other => {
                    return Err(crate::error::SyntaxError::new(
                        SyntaxErrorKind::InvalidEscape {
                            escape: format!("\\{}", other),
                        },
                        token.span,
                    ))
                }
            };
            bytes.push(value);
        }
        let elements = bytes
            .into_iter()
            .map(|b| Expression::literal(b.to_string()))
            .collect();
        Ok(Expression::ArrayCreator {
            element: Type::Primitive("byte".into()),
            dims: vec![None],
            init: Some(Box::new(Expression::ArrayInitializer(elements))),
        })
    }
}

fn binary(op: &str, lhs: Expression, rhs: Expression) -> Expression {
    Expression::Binary {
        op: op.to_string(),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn make_list_literal(elements: Vec<Expression>) -> Expression {
    Expression::dotted_call("java.util.List", "of", elements)
}

fn make_set_literal(elements: Vec<Expression>) -> Expression {
    Expression::dotted_call("java.util.Set", "of", elements)
}

/// Up to ten entries fit `Map.of(k1, v1, ...)`; larger maps fall back to
/// `Map.ofEntries(Map.entry(k, v), ...)`.
fn make_map_literal(entries: Vec<(Expression, Expression)>) -> Expression {
    if entries.len() <= 10 {
        let mut args = Vec::with_capacity(entries.len() * 2);
        for (key, value) in entries {
            args.push(key);
            args.push(value);
        }
        Expression::dotted_call("java.util.Map", "of", args)
    } else {
        let args = entries
            .into_iter()
            .map(|(key, value)| Expression::dotted_call("java.util.Map", "entry", vec![key, value]))
            .collect();
        Expression::dotted_call("java.util.Map", "ofEntries", args)
    }
}

/// `a ?: b` becomes `Objects.requireNonNullElse(a, b)` for simple `b`,
/// deferring the fallback behind a lambda otherwise.
fn lower_elvis(value: Expression, fallback: Expression) -> Expression {
    if fallback.is_simple_operand() {
        Expression::FunctionCall {
            object: Some(Box::new(Expression::Name("Objects".into()))),
            type_args: Vec::new(),
            name: "requireNonNullElse".into(),
            args: vec![value, fallback],
        }
    } else {
        let supplier = Expression::Lambda(Lambda {
            params: LambdaParams::Inferred(Vec::new()),
            body: LambdaBody::Expr(Box::new(fallback)),
        });
        Expression::FunctionCall {
            object: Some(Box::new(Expression::Name("Objects".into()))),
            type_args: Vec::new(),
            name: "requireNonNullElseGet".into(),
            args: vec![value, supplier],
        }
    }
}

/// `/ab\/c/` becomes `java.util.regex.Pattern.compile("ab/c")`, with the
/// escaping translated to Java string syntax (`\xHH` to `\u00HH`).
fn lower_regex(token: &Token) -> Expression {
    let inner = &token.lexeme[1..token.lexeme.len() - 1];
    let mut out = String::with_capacity(inner.len() + 2);
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('/') => out.push('/'),
                Some('x') => {
                    out.push_str("\\u00");
                    if let Some(hi) = chars.next() {
                        out.push(hi);
                    }
                    if let Some(lo) = chars.next() {
                        out.push(lo);
                    }
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    let pattern = Expression::literal(format!("\"{}\"", out));
    Expression::dotted_call("java.util.regex.Pattern", "compile", vec![pattern])
}

fn expression_to_type_name(expr: &Expression) -> Option<QualName> {
    match expr {
        Expression::Name(name) => Some(QualName::simple(name.clone())),
        Expression::MemberAccess { object, name } => {
            let mut qual = expression_to_type_name(object)?;
            qual.push(name.clone());
            Some(qual)
        }
        _ => None,
    }
}
