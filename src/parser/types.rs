//! Type references and type parameter lists.

use super::{ParseResult, Parser};
use crate::ast::{ArrayType, BoundKind, GenericType, Type, TypeParameter, WildcardType};
use crate::error::SyntaxErrorKind;
use crate::token::{is_primitive_type, TokenKind};

pub trait TypeParsing {
    fn parse_type(&mut self) -> ParseResult<Type>;
    fn parse_type_or_void(&mut self) -> ParseResult<Type>;
    /// A class or interface reference, as used after `new` and in extends
    /// clauses: qualified name plus optional type arguments.
    fn parse_class_type(&mut self) -> ParseResult<GenericType>;
    /// Type argument list; the opening `<` is already consumed.
    fn parse_type_args(&mut self) -> ParseResult<Vec<Type>>;
    /// `<T, U extends A & B>` on a declaration; assumes the cursor is at `<`.
    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParameter>>;
    /// Zero or more `[]` pairs.
    fn parse_dims(&mut self) -> usize;
}

impl TypeParsing for Parser {
    fn parse_type(&mut self) -> ParseResult<Type> {
        let base = if self.check(TokenKind::Keyword) && is_primitive_type(&self.peek().lexeme) {
            Type::Primitive(self.advance().lexeme)
        } else if self.check(TokenKind::Name) {
            Type::Generic(self.parse_class_type()?)
        } else {
            return Err(self.error(SyntaxErrorKind::ExpectedType { found: self.found() }));
        };
        let dims = self.parse_dims();
        if dims > 0 {
            Ok(Type::Array(ArrayType {
                element: Box::new(base),
                dims,
            }))
        } else {
            Ok(base)
        }
    }

    fn parse_type_or_void(&mut self) -> ParseResult<Type> {
        if self.accept("void") {
            Ok(Type::Void)
        } else {
            self.parse_type()
        }
    }

    fn parse_class_type(&mut self) -> ParseResult<GenericType> {
        let name = self.qual_name()?;
        let args = if self.accept("<") {
            Some(self.parse_type_args()?)
        } else {
            None
        };
        Ok(GenericType { name, args })
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<Type>> {
        // Diamond: `new ArrayList<>()`.
        if self.accept(">") {
            return Ok(Vec::new());
        }
        let mut args = Vec::new();
        loop {
            if self.check("?") {
                self.advance();
                let bound = if self.accept("extends") {
                    Some((BoundKind::Extends, Box::new(self.parse_type()?)))
                } else if self.accept("super") {
                    Some((BoundKind::Super, Box::new(self.parse_type()?)))
                } else {
                    None
                };
                args.push(Type::Wildcard(WildcardType { bound }));
            } else {
                args.push(self.parse_type()?);
            }
            if !self.accept(",") {
                break;
            }
            if self.end_after_comma(">", self.features.trailing_argument_commas)? {
                break;
            }
        }
        self.require(">")?;
        Ok(args)
    }

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParameter>> {
        self.require("<")?;
        let mut params = Vec::new();
        loop {
            let name = self.identifier()?;
            let mut bounds = Vec::new();
            if self.accept("extends") {
                bounds.push(self.parse_type()?);
                while self.accept("&") {
                    bounds.push(self.parse_type()?);
                }
            }
            params.push(TypeParameter { name, bounds });
            if !self.accept(",") {
                break;
            }
            if self.end_after_comma(">", self.features.trailing_argument_commas)? {
                break;
            }
        }
        self.require(">")?;
        Ok(params)
    }

    fn parse_dims(&mut self) -> usize {
        let mut dims = 0;
        while self.check_pair("[", "]") {
            self.advance();
            self.advance();
            dims += 1;
        }
        dims
    }
}
