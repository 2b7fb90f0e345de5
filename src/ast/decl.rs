//! Declaration nodes.

use super::{Expression, QualName, Statement, Type, TypeParameter};

/// Root of a parsed source file; owns the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub package: Option<PackageDeclaration>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDeclaration {
    pub doc: Option<String>,
    pub annotations: Vec<Annotation>,
    pub name: QualName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub name: QualName,
    pub r#static: bool,
    pub wildcard: bool,
}

impl Import {
    pub fn of_type(name: QualName) -> Self {
        Import {
            name,
            r#static: false,
            wildcard: false,
        }
    }

    /// The package part of the import, derived from the dotted name and the
    /// `static`/`wildcard` flags.
    ///
    /// `import a.b.*` covers package `a.b`; `import a.b.C` lives in `a.b`;
    /// `import static a.b.C.m` and `import static a.b.C.*` both live in
    /// `a.b` (the host type is not part of the package).
    pub fn imported_package(&self) -> String {
        if self.r#static {
            let n = self.name.len();
            self.name.0[..n.saturating_sub(2)].join(".")
        } else if self.wildcard {
            self.name.to_string()
        } else {
            self.name.qualifier()
        }
    }

    /// The simple type name brought in (for static imports, the host type).
    pub fn imported_type(&self) -> Option<&str> {
        if self.r#static {
            let n = self.name.len();
            if self.wildcard {
                self.name.0.last().map(String::as_str)
            } else {
                self.name.0.get(n.wrapping_sub(2)).map(String::as_str)
            }
        } else if self.wildcard {
            None
        } else {
            Some(self.name.last())
        }
    }

    /// The simple member or type name this import binds, if it binds one.
    pub fn imported_name(&self) -> Option<&str> {
        if self.wildcard {
            None
        } else {
            Some(self.name.last())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier(pub String);

impl Modifier {
    pub fn new(word: impl Into<String>) -> Self {
        Modifier(word.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: QualName,
    pub args: AnnotationArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArgs {
    /// `@Override`
    None,
    /// `@SuppressWarnings("unchecked")`
    Value(Box<Expression>),
    /// `@Target(value = ..., other = ...)`
    Pairs(Vec<(String, Expression)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Class, interface, enum or annotation declaration. The `kind` decides
/// which of the optional parts are meaningful (`constants` for enums,
/// `superclass` never for interfaces, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub kind: TypeKind,
    pub doc: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_params: Vec<TypeParameter>,
    pub superclass: Option<Type>,
    pub interfaces: Vec<Type>,
    pub constants: Vec<EnumConstant>,
    pub members: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub doc: Option<String>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub args: Vec<Expression>,
    pub body: Option<Vec<Declaration>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Type(TypeDeclaration),
    Field(FieldDeclaration),
    Function(FunctionDeclaration),
    Constructor(ConstructorDeclaration),
    Initializer(InitializerBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub doc: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub r#type: Type,
    pub declarators: Vec<super::VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub doc: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParameter>,
    pub return_type: Type,
    pub name: String,
    pub this_param: Option<ThisParameter>,
    pub params: Vec<FormalParameter>,
    pub throws: Vec<Type>,
    /// `None` for abstract/interface methods.
    pub body: Option<Vec<Statement>>,
    /// `default` clause of an annotation-type member.
    pub annotation_default: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDeclaration {
    pub doc: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParameter>,
    pub name: String,
    pub this_param: Option<ThisParameter>,
    pub params: Vec<FormalParameter>,
    pub throws: Vec<Type>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub r#type: Type,
    pub variadic: bool,
    pub name: String,
    pub dims: usize,
    /// Default-argument expression; consumed by the overload synthesis and
    /// always `None` in emitted trees.
    pub default: Option<Expression>,
}

/// Receiver parameter: `void f(Outer this)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThisParameter {
    pub annotations: Vec<Annotation>,
    pub r#type: Type,
    pub qualifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializerBlock {
    pub r#static: bool,
    pub body: Vec<Statement>,
}
