//! Declarations: compilation unit, type declarations, members.
//!
//! The extended pieces living here: the default-modifiers directive
//! (`public static :` applied to every following declaration in scope), the
//! empty class body (`class A;`), and default-argument overload synthesis —
//! after a signature with defaulted parameters is parsed, one forwarding
//! overload per defaulted suffix is emitted alongside the canonical
//! declaration, each holding deep copies of the signature parts so later
//! rewrites cannot alias across overloads.

use super::{ExpressionParsing, ImportParsing, ParseResult, Parser, StatementParsing, TypeParsing};
use crate::ast::{
    merge_annotations, merge_modifiers, Annotation, AnnotationArgs, ArrayType, CompilationUnit,
    ConstructorDeclaration, Declaration, EnumConstant, Expression, FieldDeclaration,
    FormalParameter, FunctionDeclaration, InitializerBlock, Modifier, PackageDeclaration,
    Statement, ThisParameter, Type, TypeDeclaration, TypeKind, VariableDeclarator,
};
use crate::error::SyntaxErrorKind;
use crate::token::{is_modifier, TokenKind};

/// Base modifiers/annotations installed by a `mods :` directive, applied to
/// every declaration that follows in the same scope.
type BaseModifiers = (Vec<Modifier>, Vec<Annotation>);

pub trait DeclarationParsing {
    fn parse_compilation_unit(&mut self) -> ParseResult<CompilationUnit>;
    fn parse_type_declaration(&mut self) -> ParseResult<TypeDeclaration>;
    fn parse_modifiers_and_annotations(&mut self) -> ParseResult<(Vec<Modifier>, Vec<Annotation>)>;
    fn parse_annotation(&mut self) -> ParseResult<Annotation>;
    /// `{ members }` — also the body of an anonymous class.
    fn parse_braced_class_body(&mut self, class_name: &str) -> ParseResult<Vec<Declaration>>;
    fn parse_throws(&mut self) -> ParseResult<Vec<Type>>;
    /// `( [Type this,] param, ... )`. Threads the `req_default` rule: once a
    /// parameter declares a default, every later one must.
    fn parse_parameters(&mut self) -> ParseResult<(Option<ThisParameter>, Vec<FormalParameter>)>;
}

impl DeclarationParsing for Parser {
    fn parse_compilation_unit(&mut self) -> ParseResult<CompilationUnit> {
        let package = self.try_parse(|p| {
            let doc = p.pending_doc();
            let annotations = p.parse_annotations_only()?;
            p.require("package")?;
            let name = p.qual_name()?;
            p.require(";")?;
            Ok(PackageDeclaration {
                doc,
                annotations,
                name,
            })
        });

        let mut imports = self.parse_import_section(&[])?;
        let mut types = Vec::new();
        let mut base: Option<BaseModifiers> = None;

        while !self.at_end() {
            if self.accept(";") {
                continue;
            }
            if self.features.multiple_import_sections
                && self.check(["from", "import", "unimport"])
            {
                let section = self.parse_import_section(&imports)?;
                imports.extend(section);
                continue;
            }
            if self.features.default_modifiers {
                if let Some(new_base) = self.try_parse(|p| p.parse_default_modifiers_directive()) {
                    base = Some(new_base);
                    continue;
                }
            }
            let mut decl = self.parse_type_declaration()?;
            if let Some((base_mods, base_annos)) = &base {
                decl.modifiers = merge_modifiers(base_mods, &decl.modifiers);
                decl.annotations = merge_annotations(base_annos, &decl.annotations);
            }
            types.push(decl);
        }

        Ok(CompilationUnit {
            package,
            imports,
            types,
        })
    }

    fn parse_type_declaration(&mut self) -> ParseResult<TypeDeclaration> {
        let doc = self.pending_doc();
        let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;
        self.parse_type_declaration_rest(doc, modifiers, annotations)
    }

    fn parse_modifiers_and_annotations(
        &mut self,
    ) -> ParseResult<(Vec<Modifier>, Vec<Annotation>)> {
        let mut modifiers = Vec::new();
        let mut annotations = Vec::new();
        loop {
            if self.check(TokenKind::Keyword) && is_modifier(&self.peek().lexeme) {
                modifiers.push(Modifier(self.advance().lexeme));
            } else if self.check("@") && !self.check_at(1, "interface") {
                annotations.push(self.parse_annotation()?);
            } else {
                return Ok((modifiers, annotations));
            }
        }
    }

    fn parse_annotation(&mut self) -> ParseResult<Annotation> {
        self.require("@")?;
        let name = self.qual_name()?;
        if !self.accept("(") {
            return Ok(Annotation {
                name,
                args: AnnotationArgs::None,
            });
        }
        if self.accept(")") {
            return Ok(Annotation {
                name,
                args: AnnotationArgs::Pairs(Vec::new()),
            });
        }
        let args = if self.check_pair(TokenKind::Name, "=") {
            let mut pairs = Vec::new();
            loop {
                let key = self.identifier()?;
                self.require("=")?;
                pairs.push((key, self.parse_annotation_value()?));
                if !self.accept(",") {
                    break;
                }
                if self.end_after_comma(")", self.features.trailing_argument_commas)? {
                    break;
                }
            }
            AnnotationArgs::Pairs(pairs)
        } else {
            AnnotationArgs::Value(Box::new(self.parse_annotation_value()?))
        };
        self.require(")")?;
        Ok(Annotation { name, args })
    }

    fn parse_braced_class_body(&mut self, class_name: &str) -> ParseResult<Vec<Declaration>> {
        self.require("{")?;
        let members = self.parse_member_list(class_name)?;
        self.require("}")?;
        Ok(members)
    }

    fn parse_throws(&mut self) -> ParseResult<Vec<Type>> {
        let mut throws = Vec::new();
        if self.accept("throws") {
            throws.push(self.parse_type()?);
            while self.accept(",") {
                throws.push(self.parse_type()?);
            }
        }
        Ok(throws)
    }

    fn parse_parameters(
        &mut self,
    ) -> ParseResult<(Option<ThisParameter>, Vec<FormalParameter>)> {
        self.require("(")?;
        let mut this_param = None;
        let mut params = Vec::new();
        if !self.check(")") {
            this_param = self.try_parse(|p| {
                let annotations = p.parse_annotations_only()?;
                let r#type = p.parse_type()?;
                let qualifier = if p.check(TokenKind::Name)
                    && p.check_at(1, ".")
                    && p.check_at(2, "this")
                {
                    let qualifier = p.advance().lexeme;
                    p.advance();
                    Some(qualifier)
                } else {
                    None
                };
                p.require("this")?;
                Ok(ThisParameter {
                    annotations,
                    r#type,
                    qualifier,
                })
            });
            if this_param.is_some() && !self.check(")") {
                self.require(",")?;
            }
            if !self.check(")") {
                let mut req_default = false;
                loop {
                    params.push(self.parse_formal_parameter(&mut req_default)?);
                    if !self.accept(",") {
                        break;
                    }
                    if self.end_after_comma(")", self.features.trailing_argument_commas)? {
                        break;
                    }
                }
            }
        }
        self.require(")")?;
        Ok((this_param, params))
    }
}

impl Parser {
    fn parse_default_modifiers_directive(&mut self) -> ParseResult<BaseModifiers> {
        let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;
        if modifiers.is_empty() && annotations.is_empty() {
            return Err(self.expected("modifiers"));
        }
        self.require(":")?;
        Ok((modifiers, annotations))
    }

    fn parse_annotations_only(&mut self) -> ParseResult<Vec<Annotation>> {
        let mut annotations = Vec::new();
        while self.check("@") && !self.check_at(1, "interface") {
            annotations.push(self.parse_annotation()?);
        }
        Ok(annotations)
    }

    fn parse_annotation_value(&mut self) -> ParseResult<Expression> {
        if self.check("{") {
            self.parse_array_initializer()
        } else {
            self.parse_ternary()
        }
    }

    pub(super) fn parse_type_declaration_rest(
        &mut self,
        doc: Option<String>,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
    ) -> ParseResult<TypeDeclaration> {
        if self.accept("class") {
            let name = self.identifier()?;
            let type_params = if self.check("<") {
                self.parse_type_params()?
            } else {
                Vec::new()
            };
            let superclass = if self.accept("extends") {
                Some(self.parse_type()?)
            } else {
                None
            };
            let interfaces = if self.accept("implements") {
                self.parse_type_list()?
            } else {
                Vec::new()
            };
            let members = self.parse_class_body(&name)?;
            return Ok(TypeDeclaration {
                kind: TypeKind::Class,
                doc,
                modifiers,
                annotations,
                name,
                type_params,
                superclass,
                interfaces,
                constants: Vec::new(),
                members,
            });
        }

        if self.accept("interface") {
            let name = self.identifier()?;
            let type_params = if self.check("<") {
                self.parse_type_params()?
            } else {
                Vec::new()
            };
            let interfaces = if self.accept("extends") {
                self.parse_type_list()?
            } else {
                Vec::new()
            };
            let members = self.parse_class_body(&name)?;
            return Ok(TypeDeclaration {
                kind: TypeKind::Interface,
                doc,
                modifiers,
                annotations,
                name,
                type_params,
                superclass: None,
                interfaces,
                constants: Vec::new(),
                members,
            });
        }

        if self.accept("enum") {
            let name = self.identifier()?;
            let interfaces = if self.accept("implements") {
                self.parse_type_list()?
            } else {
                Vec::new()
            };
            let (constants, members) = self.parse_enum_body(&name)?;
            return Ok(TypeDeclaration {
                kind: TypeKind::Enum,
                doc,
                modifiers,
                annotations,
                name,
                type_params: Vec::new(),
                superclass: None,
                interfaces,
                constants,
                members,
            });
        }

        if self.check_pair("@", "interface") {
            self.advance();
            self.advance();
            let name = self.identifier()?;
            let members = self.parse_class_body(&name)?;
            return Ok(TypeDeclaration {
                kind: TypeKind::Annotation,
                doc,
                modifiers,
                annotations,
                name,
                type_params: Vec::new(),
                superclass: None,
                interfaces: Vec::new(),
                constants: Vec::new(),
                members,
            });
        }

        Err(self.error(SyntaxErrorKind::ExpectedDeclaration { found: self.found() }))
    }

    /// A class body, or — when the feature allows — a single `;`.
    fn parse_class_body(&mut self, class_name: &str) -> ParseResult<Vec<Declaration>> {
        if self.features.empty_class_body && self.accept(";") {
            return Ok(Vec::new());
        }
        self.parse_braced_class_body(class_name)
    }

    /// Member list up to the closing brace. Owns the per-scope
    /// default-modifiers state: a `mods :` directive rewrites the base for
    /// everything that follows in this scope only.
    fn parse_member_list(&mut self, class_name: &str) -> ParseResult<Vec<Declaration>> {
        let mut members = Vec::new();
        let mut base: Option<BaseModifiers> = None;
        while !self.check("}") && !self.at_end() {
            if self.accept(";") {
                continue;
            }
            if self.features.default_modifiers {
                if let Some(new_base) = self.try_parse(|p| p.parse_default_modifiers_directive()) {
                    base = Some(new_base);
                    continue;
                }
            }
            let start = members.len();
            self.parse_class_member(class_name, &mut members)?;
            if let Some((base_mods, base_annos)) = &base {
                for member in &mut members[start..] {
                    apply_base_modifiers(member, base_mods, base_annos);
                }
            }
        }
        Ok(members)
    }

    fn parse_enum_body(
        &mut self,
        enum_name: &str,
    ) -> ParseResult<(Vec<EnumConstant>, Vec<Declaration>)> {
        if self.features.empty_class_body && self.accept(";") {
            return Ok((Vec::new(), Vec::new()));
        }
        self.require("{")?;
        let mut constants = Vec::new();
        while !self.check("}") && !self.check(";") && !self.at_end() {
            let doc = self.pending_doc();
            let annotations = self.parse_annotations_only()?;
            let name = self.identifier()?;
            let args = if self.check("(") {
                self.parse_args()?
            } else {
                Vec::new()
            };
            let body = if self.check("{") {
                Some(self.parse_braced_class_body(enum_name)?)
            } else {
                None
            };
            constants.push(EnumConstant {
                doc,
                annotations,
                name,
                args,
                body,
            });
            if !self.accept(",") {
                break;
            }
            // Plain Java allows the trailing comma in a constant list.
            if self.check("}") || self.check(";") {
                break;
            }
        }
        let members = if self.accept(";") {
            self.parse_member_list(enum_name)?
        } else {
            Vec::new()
        };
        self.require("}")?;
        Ok((constants, members))
    }

    /// One class member. Pushes onto `out` rather than returning, because
    /// default-argument synthesis emits several declarations for one parsed
    /// signature.
    fn parse_class_member(
        &mut self,
        class_name: &str,
        out: &mut Vec<Declaration>,
    ) -> ParseResult<()> {
        let doc = self.pending_doc();
        let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;

        if self.check(["class", "interface", "enum"]) || self.check_pair("@", "interface") {
            let decl = self.parse_type_declaration_rest(doc, modifiers, annotations)?;
            out.push(Declaration::Type(decl));
            return Ok(());
        }

        if self.check("{") && annotations.is_empty() {
            let r#static = modifiers.iter().any(|m| m.0 == "static");
            let body = self.parse_block()?;
            out.push(Declaration::Initializer(InitializerBlock { r#static, body }));
            return Ok(());
        }

        let type_params = if self.check("<") {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        // Constructor: the class's own name followed by a parameter list.
        if self.check(TokenKind::Name)
            && self.peek().lexeme == class_name
            && self.check_at(1, "(")
        {
            let name = self.advance().lexeme;
            let (this_param, params) = self.parse_parameters()?;
            let throws = self.parse_throws()?;
            let body = self.parse_block()?;
            let ctor = ConstructorDeclaration {
                doc,
                modifiers,
                annotations,
                type_params,
                name,
                this_param,
                params,
                throws,
                body,
            };
            let overloads = synthesize_constructor_overloads(&ctor);
            let mut canonical = ctor;
            strip_defaults(&mut canonical.params);
            out.push(Declaration::Constructor(canonical));
            out.extend(overloads.into_iter().map(Declaration::Constructor));
            return Ok(());
        }

        let return_type = self.parse_type_or_void()?;
        let name = self.identifier()?;

        if self.check("(") {
            let (this_param, params) = self.parse_parameters()?;
            let throws = self.parse_throws()?;
            let annotation_default = if self.accept("default") {
                let value = self.parse_annotation_value()?;
                self.require(";")?;
                Some(value)
            } else {
                None
            };
            let body = if annotation_default.is_none() {
                if self.check("{") {
                    Some(self.parse_block()?)
                } else {
                    self.require(";")?;
                    None
                }
            } else {
                None
            };
            let func = FunctionDeclaration {
                doc,
                modifiers,
                annotations,
                type_params,
                return_type,
                name,
                this_param,
                params,
                throws,
                body,
                annotation_default,
            };
            let overloads = synthesize_function_overloads(&func);
            let mut canonical = func;
            strip_defaults(&mut canonical.params);
            out.push(Declaration::Function(canonical));
            out.extend(overloads.into_iter().map(Declaration::Function));
            return Ok(());
        }

        // Field declaration; the first declarator's name is already consumed.
        let dims = self.parse_dims();
        let init = if self.accept("=") {
            Some(self.parse_variable_initializer()?)
        } else {
            None
        };
        let mut declarators = vec![VariableDeclarator { name, dims, init }];
        while self.accept(",") {
            if self.end_after_comma(";", self.features.trailing_other_commas)? {
                break;
            }
            let name = self.identifier()?;
            let dims = self.parse_dims();
            let init = if self.accept("=") {
                Some(self.parse_variable_initializer()?)
            } else {
                None
            };
            declarators.push(VariableDeclarator { name, dims, init });
        }
        self.require(";")?;
        out.push(Declaration::Field(FieldDeclaration {
            doc,
            modifiers,
            annotations,
            r#type: return_type,
            declarators,
        }));
        Ok(())
    }

    fn parse_type_list(&mut self) -> ParseResult<Vec<Type>> {
        let mut types = vec![self.parse_type()?];
        while self.accept(",") {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    fn parse_formal_parameter(&mut self, req_default: &mut bool) -> ParseResult<FormalParameter> {
        let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;
        let r#type = self.parse_type()?;
        let variadic = self.accept("...");
        let name = self.identifier()?;
        let dims = self.parse_dims();
        let default = if self.features.default_arguments && self.accept("=") {
            Some(self.parse_variable_initializer()?)
        } else {
            None
        };
        if default.is_none() && *req_default {
            return Err(self.error(SyntaxErrorKind::DefaultParameterRequired { name }));
        }
        if default.is_some() {
            *req_default = true;
        }
        Ok(FormalParameter {
            modifiers,
            annotations,
            r#type,
            variadic,
            name,
            dims,
            default,
        })
    }
}

/// Typed lambda parameters reuse the formal-parameter grammar but never
/// carry defaults.
pub(super) fn parse_lambda_parameter_list(p: &mut Parser) -> ParseResult<Vec<FormalParameter>> {
    p.require("(")?;
    let mut params = Vec::new();
    if !p.check(")") {
        loop {
            let (modifiers, annotations) = p.parse_modifiers_and_annotations()?;
            let r#type = p.parse_type()?;
            let variadic = p.accept("...");
            let name = p.identifier()?;
            let dims = p.parse_dims();
            params.push(FormalParameter {
                modifiers,
                annotations,
                r#type,
                variadic,
                name,
                dims,
                default: None,
            });
            if !p.accept(",") {
                break;
            }
            if p.end_after_comma(")", p.features.trailing_argument_commas)? {
                break;
            }
        }
    }
    p.require(")")?;
    Ok(params)
}

fn apply_base_modifiers(member: &mut Declaration, base_mods: &[Modifier], base_annos: &[Annotation]) {
    let (modifiers, annotations) = match member {
        Declaration::Type(decl) => (&mut decl.modifiers, &mut decl.annotations),
        Declaration::Field(decl) => (&mut decl.modifiers, &mut decl.annotations),
        Declaration::Function(decl) => (&mut decl.modifiers, &mut decl.annotations),
        Declaration::Constructor(decl) => (&mut decl.modifiers, &mut decl.annotations),
        Declaration::Initializer(_) => return,
    };
    *modifiers = merge_modifiers(base_mods, modifiers);
    *annotations = merge_annotations(base_annos, annotations);
}

fn strip_defaults(params: &mut [FormalParameter]) {
    for param in params {
        param.default = None;
    }
}

/// An array-initialiser default is not an expression on its own; wrap it in
/// an `ArrayCreator` of the parameter's element type at the call site.
fn reify_default(param: &FormalParameter) -> Expression {
    let default = param.default.clone().expect("defaulted parameter");
    if !matches!(default, Expression::ArrayInitializer(_)) {
        return default;
    }
    let (element, mut dims) = match &param.r#type {
        Type::Array(ArrayType { element, dims }) => ((**element).clone(), *dims),
        other => (other.clone(), 0),
    };
    dims += param.dims;
    if param.variadic {
        dims += 1;
    }
    Expression::ArrayCreator {
        element,
        dims: vec![None; dims.max(1)],
        init: Some(Box::new(default)),
    }
}

/// One forwarding overload per defaulted suffix: the prefix signature whose
/// body calls the canonical method with the omitted defaults substituted.
/// Everything copied into an overload is a deep clone.
fn synthesize_function_overloads(func: &FunctionDeclaration) -> Vec<FunctionDeclaration> {
    let Some(first_default) = func.params.iter().position(|p| p.default.is_some()) else {
        return Vec::new();
    };
    let total = func.params.len();
    let mut overloads = Vec::with_capacity(total - first_default);
    for dropped in 1..=(total - first_default) {
        let kept = &func.params[..total - dropped];
        let call = forwarding_call(&func.name, kept, &func.params[total - dropped..]);
        let body_stmt = if func.return_type.is_void() {
            Statement::Expression(call)
        } else {
            Statement::Return(Some(call))
        };
        let mut params: Vec<FormalParameter> = kept.to_vec();
        strip_defaults(&mut params);
        overloads.push(FunctionDeclaration {
            doc: None,
            modifiers: func.modifiers.clone(),
            annotations: func.annotations.clone(),
            type_params: func.type_params.clone(),
            return_type: func.return_type.clone(),
            name: func.name.clone(),
            this_param: func.this_param.clone(),
            params,
            throws: func.throws.clone(),
            body: Some(vec![body_stmt]),
            annotation_default: None,
        });
    }
    overloads
}

fn synthesize_constructor_overloads(ctor: &ConstructorDeclaration) -> Vec<ConstructorDeclaration> {
    let Some(first_default) = ctor.params.iter().position(|p| p.default.is_some()) else {
        return Vec::new();
    };
    let total = ctor.params.len();
    let mut overloads = Vec::with_capacity(total - first_default);
    for dropped in 1..=(total - first_default) {
        let kept = &ctor.params[..total - dropped];
        let call = forwarding_call("this", kept, &ctor.params[total - dropped..]);
        let mut params: Vec<FormalParameter> = kept.to_vec();
        strip_defaults(&mut params);
        overloads.push(ConstructorDeclaration {
            doc: None,
            modifiers: ctor.modifiers.clone(),
            annotations: ctor.annotations.clone(),
            type_params: ctor.type_params.clone(),
            name: ctor.name.clone(),
            this_param: ctor.this_param.clone(),
            params,
            throws: ctor.throws.clone(),
            body: vec![Statement::Expression(call)],
        });
    }
    overloads
}

fn forwarding_call(
    name: &str,
    kept: &[FormalParameter],
    dropped: &[FormalParameter],
) -> Expression {
    let mut args: Vec<Expression> = kept
        .iter()
        .map(|p| Expression::Name(p.name.clone()))
        .collect();
    args.extend(dropped.iter().map(reify_default));
    Expression::FunctionCall {
        object: None,
        type_args: Vec::new(),
        name: name.to_string(),
        args,
    }
}
