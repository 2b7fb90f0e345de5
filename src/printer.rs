//! Deterministic serialisation of the AST back to Java source text.
//!
//! Every node has a `write_to` method threading a `fmt::Write` sink, plus a
//! `Display` adapter. The output is structurally canonical (4-space indent,
//! one blank line between members, spaces around binary operators); byte
//! equality of printed output is the correctness criterion of the
//! equivalence tests, so the match here is exhaustive — a new node kind
//! fails to compile until it prints.

use std::fmt::{self, Write};

use crate::ast::{
    Annotation, AnnotationArgs, BoundKind, CatchClause, CompilationUnit, ConstructorDeclaration,
    Declaration, EnumConstant, Expression, FieldDeclaration, ForInit, FormalParameter,
    FunctionDeclaration, Import, InitializerBlock, Lambda, LambdaBody, LambdaParams, Modifier,
    Statement, SwitchCase, ThisParameter, TryResource, Type, TypeDeclaration, TypeKind,
    TypeParameter, VariableDeclaration,
};

const INDENT: &str = "    ";

fn pad<W: Write>(w: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        w.write_str(INDENT)?;
    }
    Ok(())
}

fn write_doc<W: Write>(w: &mut W, doc: &Option<String>, depth: usize) -> fmt::Result {
    if let Some(doc) = doc {
        for line in doc.lines() {
            pad(w, depth)?;
            writeln!(w, "{}", line.trim())?;
        }
    }
    Ok(())
}

fn write_annotations<W: Write>(w: &mut W, annotations: &[Annotation]) -> fmt::Result {
    for a in annotations {
        a.write_to(w)?;
        w.write_char(' ')?;
    }
    Ok(())
}

fn write_modifiers<W: Write>(w: &mut W, modifiers: &[Modifier]) -> fmt::Result {
    for m in modifiers {
        write!(w, "{} ", m.0)?;
    }
    Ok(())
}

fn write_comma_separated<W: Write, T>(
    w: &mut W,
    items: &[T],
    mut each: impl FnMut(&mut W, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        each(w, item)?;
    }
    Ok(())
}

// ── Compilation unit ───────────────────────────────────────────────────

impl CompilationUnit {
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        if let Some(package) = &self.package {
            write_doc(w, &package.doc, 0)?;
            write_annotations(w, &package.annotations)?;
            writeln!(w, "package {};", package.name)?;
            writeln!(w)?;
        }
        for import in &self.imports {
            import.write_to(w)?;
            writeln!(w)?;
        }
        if !self.imports.is_empty() {
            writeln!(w)?;
        }
        for (i, decl) in self.types.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            decl.write_to(w, 0)?;
        }
        Ok(())
    }
}

impl Import {
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("import ")?;
        if self.r#static {
            w.write_str("static ")?;
        }
        write!(w, "{}", self.name)?;
        if self.wildcard {
            w.write_str(".*")?;
        }
        w.write_char(';')
    }
}

// ── Declarations ───────────────────────────────────────────────────────

impl TypeDeclaration {
    pub fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        write_doc(w, &self.doc, depth)?;
        pad(w, depth)?;
        write_annotations(w, &self.annotations)?;
        write_modifiers(w, &self.modifiers)?;
        match self.kind {
            TypeKind::Class => w.write_str("class ")?,
            TypeKind::Interface => w.write_str("interface ")?,
            TypeKind::Enum => w.write_str("enum ")?,
            TypeKind::Annotation => w.write_str("@interface ")?,
        }
        w.write_str(&self.name)?;
        write_type_params(w, &self.type_params)?;
        if let Some(superclass) = &self.superclass {
            w.write_str(" extends ")?;
            superclass.write_to(w)?;
        }
        if !self.interfaces.is_empty() {
            if self.kind == TypeKind::Interface {
                w.write_str(" extends ")?;
            } else {
                w.write_str(" implements ")?;
            }
            write_comma_separated(w, &self.interfaces, |w, t| t.write_to(w))?;
        }
        writeln!(w, " {{")?;
        if self.kind == TypeKind::Enum {
            for (i, constant) in self.constants.iter().enumerate() {
                constant.write_to(w, depth + 1)?;
                if i + 1 < self.constants.len() {
                    w.write_char(',')?;
                }
                writeln!(w)?;
            }
            if !self.members.is_empty() {
                pad(w, depth + 1)?;
                writeln!(w, ";")?;
            }
        }
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            member.write_to(w, depth + 1)?;
        }
        pad(w, depth)?;
        writeln!(w, "}}")
    }
}

impl EnumConstant {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        write_doc(w, &self.doc, depth)?;
        pad(w, depth)?;
        write_annotations(w, &self.annotations)?;
        w.write_str(&self.name)?;
        if !self.args.is_empty() {
            w.write_char('(')?;
            write_comma_separated(w, &self.args, |w, a| a.write_to(w, depth))?;
            w.write_char(')')?;
        }
        if let Some(body) = &self.body {
            writeln!(w, " {{")?;
            for (i, member) in body.iter().enumerate() {
                if i > 0 {
                    writeln!(w)?;
                }
                member.write_to(w, depth + 1)?;
            }
            pad(w, depth)?;
            w.write_char('}')?;
        }
        Ok(())
    }
}

impl Declaration {
    pub fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        match self {
            Declaration::Type(decl) => decl.write_to(w, depth),
            Declaration::Field(decl) => decl.write_to(w, depth),
            Declaration::Function(decl) => decl.write_to(w, depth),
            Declaration::Constructor(decl) => decl.write_to(w, depth),
            Declaration::Initializer(decl) => decl.write_to(w, depth),
        }
    }
}

impl FieldDeclaration {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        write_doc(w, &self.doc, depth)?;
        pad(w, depth)?;
        write_annotations(w, &self.annotations)?;
        write_modifiers(w, &self.modifiers)?;
        self.r#type.write_to(w)?;
        w.write_char(' ')?;
        write_declarators(w, &self.declarators, depth)?;
        writeln!(w, ";")
    }
}

fn write_declarators<W: Write>(
    w: &mut W,
    declarators: &[crate::ast::VariableDeclarator],
    depth: usize,
) -> fmt::Result {
    write_comma_separated(w, declarators, |w, d| {
        w.write_str(&d.name)?;
        for _ in 0..d.dims {
            w.write_str("[]")?;
        }
        if let Some(init) = &d.init {
            w.write_str(" = ")?;
            init.write_to(w, depth)?;
        }
        Ok(())
    })
}

impl FunctionDeclaration {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        write_doc(w, &self.doc, depth)?;
        pad(w, depth)?;
        write_annotations(w, &self.annotations)?;
        write_modifiers(w, &self.modifiers)?;
        if !self.type_params.is_empty() {
            write_type_params(w, &self.type_params)?;
            w.write_char(' ')?;
        }
        self.return_type.write_to(w)?;
        write!(w, " {}(", self.name)?;
        write_signature_params(w, &self.this_param, &self.params, depth)?;
        w.write_char(')')?;
        write_throws(w, &self.throws)?;
        if let Some(default) = &self.annotation_default {
            w.write_str(" default ")?;
            default.write_to(w, depth)?;
            return writeln!(w, ";");
        }
        match &self.body {
            Some(body) => {
                writeln!(w, " {{")?;
                for stmt in body {
                    stmt.write_to(w, depth + 1)?;
                }
                pad(w, depth)?;
                writeln!(w, "}}")
            }
            None => writeln!(w, ";"),
        }
    }
}

impl ConstructorDeclaration {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        write_doc(w, &self.doc, depth)?;
        pad(w, depth)?;
        write_annotations(w, &self.annotations)?;
        write_modifiers(w, &self.modifiers)?;
        if !self.type_params.is_empty() {
            write_type_params(w, &self.type_params)?;
            w.write_char(' ')?;
        }
        write!(w, "{}(", self.name)?;
        write_signature_params(w, &self.this_param, &self.params, depth)?;
        w.write_char(')')?;
        write_throws(w, &self.throws)?;
        writeln!(w, " {{")?;
        for stmt in &self.body {
            stmt.write_to(w, depth + 1)?;
        }
        pad(w, depth)?;
        writeln!(w, "}}")
    }
}

fn write_signature_params<W: Write>(
    w: &mut W,
    this_param: &Option<ThisParameter>,
    params: &[FormalParameter],
    depth: usize,
) -> fmt::Result {
    let mut first = true;
    if let Some(this_param) = this_param {
        write_annotations(w, &this_param.annotations)?;
        this_param.r#type.write_to(w)?;
        w.write_char(' ')?;
        if let Some(qualifier) = &this_param.qualifier {
            write!(w, "{}.", qualifier)?;
        }
        w.write_str("this")?;
        first = false;
    }
    for param in params {
        if !first {
            w.write_str(", ")?;
        }
        first = false;
        param.write_to(w, depth)?;
    }
    Ok(())
}

impl FormalParameter {
    pub fn write_to<W: Write>(&self, w: &mut W, _depth: usize) -> fmt::Result {
        write_annotations(w, &self.annotations)?;
        write_modifiers(w, &self.modifiers)?;
        self.r#type.write_to(w)?;
        if self.variadic {
            w.write_str("...")?;
        }
        write!(w, " {}", self.name)?;
        for _ in 0..self.dims {
            w.write_str("[]")?;
        }
        Ok(())
    }
}

fn write_throws<W: Write>(w: &mut W, throws: &[Type]) -> fmt::Result {
    if !throws.is_empty() {
        w.write_str(" throws ")?;
        write_comma_separated(w, throws, |w, t| t.write_to(w))?;
    }
    Ok(())
}

impl InitializerBlock {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        pad(w, depth)?;
        if self.r#static {
            w.write_str("static ")?;
        }
        writeln!(w, "{{")?;
        for stmt in &self.body {
            stmt.write_to(w, depth + 1)?;
        }
        pad(w, depth)?;
        writeln!(w, "}}")
    }
}

impl Annotation {
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "@{}", self.name)?;
        match &self.args {
            AnnotationArgs::None => Ok(()),
            AnnotationArgs::Value(value) => {
                w.write_char('(')?;
                value.write_to(w, 0)?;
                w.write_char(')')
            }
            AnnotationArgs::Pairs(pairs) => {
                w.write_char('(')?;
                write_comma_separated(w, pairs, |w, (name, value)| {
                    write!(w, "{} = ", name)?;
                    value.write_to(w, 0)
                })?;
                w.write_char(')')
            }
        }
    }
}

fn write_type_params<W: Write>(w: &mut W, params: &[TypeParameter]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    w.write_char('<')?;
    write_comma_separated(w, params, |w, p| {
        w.write_str(&p.name)?;
        if !p.bounds.is_empty() {
            w.write_str(" extends ")?;
            for (i, bound) in p.bounds.iter().enumerate() {
                if i > 0 {
                    w.write_str(" & ")?;
                }
                bound.write_to(w)?;
            }
        }
        Ok(())
    })?;
    w.write_char('>')
}

// ── Statements ─────────────────────────────────────────────────────────

impl Statement {
    /// Write the statement at `depth`, including the trailing newline.
    pub fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        match self {
            Statement::Block(stmts) => {
                pad(w, depth)?;
                writeln!(w, "{{")?;
                for stmt in stmts {
                    stmt.write_to(w, depth + 1)?;
                }
                pad(w, depth)?;
                writeln!(w, "}}")
            }
            Statement::If { .. } => write_if_chain(w, depth, self),
            Statement::While { condition, body } => {
                pad(w, depth)?;
                w.write_str("while (")?;
                condition.write_to(w, depth)?;
                w.write_char(')')?;
                let braced = write_attached_body(w, depth, body)?;
                if braced {
                    writeln!(w)?;
                }
                Ok(())
            }
            Statement::DoWhile { body, condition } => {
                pad(w, depth)?;
                w.write_str("do")?;
                let braced = write_attached_body(w, depth, body)?;
                if braced {
                    w.write_char(' ')?;
                } else {
                    pad(w, depth)?;
                }
                w.write_str("while (")?;
                condition.write_to(w, depth)?;
                writeln!(w, ");")
            }
            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                pad(w, depth)?;
                w.write_str("for (")?;
                match init {
                    Some(ForInit::Var(decl)) => write_local_var(w, decl, depth)?,
                    Some(ForInit::Exprs(exprs)) => {
                        write_comma_separated(w, exprs, |w, e| e.write_to(w, depth))?
                    }
                    None => {}
                }
                w.write_char(';')?;
                if let Some(condition) = condition {
                    w.write_char(' ')?;
                    condition.write_to(w, depth)?;
                }
                w.write_char(';')?;
                if !update.is_empty() {
                    w.write_char(' ')?;
                    write_comma_separated(w, update, |w, e| e.write_to(w, depth))?;
                }
                w.write_char(')')?;
                let braced = write_attached_body(w, depth, body)?;
                if braced {
                    writeln!(w)?;
                }
                Ok(())
            }
            Statement::ForEach {
                modifiers,
                annotations,
                r#type,
                name,
                iterable,
                body,
            } => {
                pad(w, depth)?;
                w.write_str("for (")?;
                write_annotations(w, annotations)?;
                write_modifiers(w, modifiers)?;
                r#type.write_to(w)?;
                write!(w, " {} : ", name)?;
                iterable.write_to(w, depth)?;
                w.write_char(')')?;
                let braced = write_attached_body(w, depth, body)?;
                if braced {
                    writeln!(w)?;
                }
                Ok(())
            }
            Statement::Switch { selector, cases } => {
                pad(w, depth)?;
                w.write_str("switch (")?;
                selector.write_to(w, depth)?;
                writeln!(w, ") {{")?;
                for case in cases {
                    case.write_to(w, depth + 1)?;
                }
                pad(w, depth)?;
                writeln!(w, "}}")
            }
            Statement::Return(value) => {
                pad(w, depth)?;
                w.write_str("return")?;
                if let Some(value) = value {
                    w.write_char(' ')?;
                    value.write_to(w, depth)?;
                }
                writeln!(w, ";")
            }
            Statement::Throw(value) => {
                pad(w, depth)?;
                w.write_str("throw ")?;
                value.write_to(w, depth)?;
                writeln!(w, ";")
            }
            Statement::Break(label) => {
                pad(w, depth)?;
                match label {
                    Some(label) => writeln!(w, "break {};", label),
                    None => writeln!(w, "break;"),
                }
            }
            Statement::Continue(label) => {
                pad(w, depth)?;
                match label {
                    Some(label) => writeln!(w, "continue {};", label),
                    None => writeln!(w, "continue;"),
                }
            }
            Statement::Expression(expr) => {
                pad(w, depth)?;
                expr.write_to(w, depth)?;
                writeln!(w, ";")
            }
            Statement::LocalVar(decl) => {
                pad(w, depth)?;
                write_local_var(w, decl, depth)?;
                writeln!(w, ";")
            }
            Statement::LocalType(decl) => decl.write_to(w, depth),
            Statement::Try {
                resources,
                block,
                catches,
                finally,
            } => {
                pad(w, depth)?;
                w.write_str("try")?;
                if !resources.is_empty() {
                    w.write_str(" (")?;
                    for (i, resource) in resources.iter().enumerate() {
                        if i > 0 {
                            w.write_str("; ")?;
                        }
                        match resource {
                            TryResource::Var(decl) => write_local_var(w, decl, depth)?,
                            TryResource::Expr(expr) => expr.write_to(w, depth)?,
                        }
                    }
                    w.write_char(')')?;
                }
                writeln!(w, " {{")?;
                for stmt in block {
                    stmt.write_to(w, depth + 1)?;
                }
                pad(w, depth)?;
                w.write_char('}')?;
                for catch in catches {
                    catch.write_to(w, depth)?;
                }
                if let Some(finally) = finally {
                    writeln!(w, " finally {{")?;
                    for stmt in finally {
                        stmt.write_to(w, depth + 1)?;
                    }
                    pad(w, depth)?;
                    w.write_char('}')?;
                }
                writeln!(w)
            }
            Statement::Synchronized { lock, block } => {
                pad(w, depth)?;
                w.write_str("synchronized (")?;
                lock.write_to(w, depth)?;
                writeln!(w, ") {{")?;
                for stmt in block {
                    stmt.write_to(w, depth + 1)?;
                }
                pad(w, depth)?;
                writeln!(w, "}}")
            }
            Statement::Labeled { label, body } => {
                pad(w, depth)?;
                writeln!(w, "{}:", label)?;
                body.write_to(w, depth)
            }
            Statement::Assert { condition, message } => {
                pad(w, depth)?;
                w.write_str("assert ")?;
                condition.write_to(w, depth)?;
                if let Some(message) = message {
                    w.write_str(" : ")?;
                    message.write_to(w, depth)?;
                }
                writeln!(w, ";")
            }
            Statement::Empty => {
                pad(w, depth)?;
                writeln!(w, ";")
            }
        }
    }
}

fn write_local_var<W: Write>(w: &mut W, decl: &VariableDeclaration, depth: usize) -> fmt::Result {
    write_annotations(w, &decl.annotations)?;
    write_modifiers(w, &decl.modifiers)?;
    decl.r#type.write_to(w)?;
    w.write_char(' ')?;
    write_declarators(w, &decl.declarators, depth)
}

/// Attach a loop/if body after its header: blocks continue on the same line
/// and leave the cursor after `}` (returning `true`); other statements go on
/// their own indented line with a trailing newline (returning `false`).
fn write_attached_body<W: Write>(
    w: &mut W,
    depth: usize,
    body: &Statement,
) -> Result<bool, fmt::Error> {
    match body {
        Statement::Block(stmts) => {
            writeln!(w, " {{")?;
            for stmt in stmts {
                stmt.write_to(w, depth + 1)?;
            }
            pad(w, depth)?;
            w.write_char('}')?;
            Ok(true)
        }
        other => {
            writeln!(w)?;
            other.write_to(w, depth + 1)?;
            Ok(false)
        }
    }
}

fn write_if_chain<W: Write>(w: &mut W, depth: usize, stmt: &Statement) -> fmt::Result {
    pad(w, depth)?;
    let mut current = stmt;
    loop {
        let Statement::If {
            condition,
            then_branch,
            else_branch,
        } = current
        else {
            unreachable!("write_if_chain called on a non-if statement");
        };
        w.write_str("if (")?;
        condition.write_to(w, depth)?;
        w.write_char(')')?;
        let braced = write_attached_body(w, depth, then_branch)?;
        match else_branch {
            None => {
                if braced {
                    writeln!(w)?;
                }
                return Ok(());
            }
            Some(else_branch) => {
                if braced {
                    w.write_str(" else")?;
                } else {
                    pad(w, depth)?;
                    w.write_str("else")?;
                }
                if let Statement::If { .. } = **else_branch {
                    w.write_char(' ')?;
                    current = &**else_branch;
                    continue;
                }
                let braced = write_attached_body(w, depth, else_branch)?;
                if braced {
                    writeln!(w)?;
                }
                return Ok(());
            }
        }
    }
}

impl SwitchCase {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        pad(w, depth)?;
        if self.is_default {
            writeln!(w, "default:")?;
        } else {
            w.write_str("case ")?;
            write_comma_separated(w, &self.labels, |w, l| l.write_to(w, depth))?;
            writeln!(w, ":")?;
        }
        for stmt in &self.body {
            stmt.write_to(w, depth + 1)?;
        }
        Ok(())
    }
}

impl CatchClause {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        w.write_str(" catch (")?;
        write_modifiers(w, &self.modifiers)?;
        for (i, t) in self.types.iter().enumerate() {
            if i > 0 {
                w.write_str(" | ")?;
            }
            t.write_to(w)?;
        }
        writeln!(w, " {}) {{", self.name)?;
        for stmt in &self.block {
            stmt.write_to(w, depth + 1)?;
        }
        pad(w, depth)?;
        w.write_char('}')
    }
}

// ── Expressions ────────────────────────────────────────────────────────

impl Expression {
    pub fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        match self {
            Expression::Literal(literal) => w.write_str(&literal.value),
            Expression::Null => w.write_str("null"),
            Expression::TypeLiteral(t) => {
                t.write_to(w)?;
                w.write_str(".class")
            }
            Expression::Name(name) => w.write_str(name),
            Expression::MemberAccess { object, name } => {
                object.write_to(w, depth)?;
                write!(w, ".{}", name)
            }
            Expression::FunctionCall {
                object,
                type_args,
                name,
                args,
            } => {
                if let Some(object) = object {
                    object.write_to(w, depth)?;
                    w.write_char('.')?;
                }
                if !type_args.is_empty() {
                    w.write_char('<')?;
                    write_comma_separated(w, type_args, |w, t| t.write_to(w))?;
                    w.write_char('>')?;
                }
                write!(w, "{}(", name)?;
                write_comma_separated(w, args, |w, a| a.write_to(w, depth))?;
                w.write_char(')')
            }
            Expression::ClassCreator { r#type, args, body } => {
                w.write_str("new ")?;
                r#type.write_to(w)?;
                w.write_char('(')?;
                write_comma_separated(w, args, |w, a| a.write_to(w, depth))?;
                w.write_char(')')?;
                if let Some(body) = body {
                    writeln!(w, " {{")?;
                    for (i, member) in body.iter().enumerate() {
                        if i > 0 {
                            writeln!(w)?;
                        }
                        member.write_to(w, depth + 1)?;
                    }
                    pad(w, depth)?;
                    w.write_char('}')?;
                }
                Ok(())
            }
            Expression::ArrayCreator {
                element,
                dims,
                init,
            } => {
                w.write_str("new ")?;
                element.write_to(w)?;
                for dim in dims {
                    w.write_char('[')?;
                    if let Some(size) = dim {
                        size.write_to(w, depth)?;
                    }
                    w.write_char(']')?;
                }
                if let Some(init) = init {
                    w.write_char(' ')?;
                    init.write_to(w, depth)?;
                }
                Ok(())
            }
            Expression::ArrayInitializer(elements) => {
                if elements.is_empty() {
                    return w.write_str("{}");
                }
                w.write_str("{ ")?;
                write_comma_separated(w, elements, |w, e| e.write_to(w, depth))?;
                w.write_str(" }")
            }
            Expression::Binary { op, lhs, rhs } => {
                lhs.write_to(w, depth)?;
                write!(w, " {} ", op)?;
                rhs.write_to(w, depth)
            }
            Expression::Unary { op, operand } => {
                w.write_str(op)?;
                // `- -x` must not print as `--x`.
                match operand.as_ref() {
                    Expression::Unary { op: inner, .. }
                    | Expression::Increment {
                        op: inner,
                        prefix: true,
                        ..
                    } if inner.starts_with(op.as_str()) => w.write_char(' ')?,
                    _ => {}
                }
                operand.write_to(w, depth)
            }
            Expression::Increment {
                op,
                prefix,
                operand,
            } => {
                if *prefix {
                    w.write_str(op)?;
                    operand.write_to(w, depth)
                } else {
                    operand.write_to(w, depth)?;
                    w.write_str(op)
                }
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                condition.write_to(w, depth)?;
                w.write_str(" ? ")?;
                then_branch.write_to(w, depth)?;
                w.write_str(" : ")?;
                else_branch.write_to(w, depth)
            }
            Expression::Assignment { target, op, value } => {
                target.write_to(w, depth)?;
                write!(w, " {} ", op)?;
                value.write_to(w, depth)
            }
            Expression::Cast { target, operand } => {
                w.write_char('(')?;
                target.write_to(w)?;
                w.write_str(") ")?;
                operand.write_to(w, depth)
            }
            Expression::Parenthesis(inner) => {
                w.write_char('(')?;
                inner.write_to(w, depth)?;
                w.write_char(')')
            }
            Expression::Lambda(lambda) => lambda.write_to(w, depth),
            Expression::Index { object, index } => {
                object.write_to(w, depth)?;
                w.write_char('[')?;
                index.write_to(w, depth)?;
                w.write_char(']')
            }
            Expression::InstanceOf { operand, target } => {
                operand.write_to(w, depth)?;
                w.write_str(" instanceof ")?;
                target.write_to(w)
            }
        }
    }
}

impl Lambda {
    fn write_to<W: Write>(&self, w: &mut W, depth: usize) -> fmt::Result {
        match &self.params {
            LambdaParams::Single(name) => w.write_str(name)?,
            LambdaParams::Inferred(names) => {
                w.write_char('(')?;
                write_comma_separated(w, names, |w, n| w.write_str(n))?;
                w.write_char(')')?;
            }
            LambdaParams::Typed(params) => {
                w.write_char('(')?;
                write_comma_separated(w, params, |w, p| p.write_to(w, depth))?;
                w.write_char(')')?;
            }
        }
        w.write_str(" -> ")?;
        match &self.body {
            LambdaBody::Expr(expr) => expr.write_to(w, depth),
            LambdaBody::Block(stmts) => {
                writeln!(w, "{{")?;
                for stmt in stmts {
                    stmt.write_to(w, depth + 1)?;
                }
                pad(w, depth)?;
                w.write_char('}')
            }
        }
    }
}

// ── Types ──────────────────────────────────────────────────────────────

impl Type {
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            Type::Primitive(name) => w.write_str(name),
            Type::Generic(generic) => generic.write_to(w),
            Type::Array(array) => {
                array.element.write_to(w)?;
                for _ in 0..array.dims {
                    w.write_str("[]")?;
                }
                Ok(())
            }
            Type::Wildcard(wildcard) => {
                w.write_char('?')?;
                if let Some((kind, bound)) = &wildcard.bound {
                    match kind {
                        BoundKind::Extends => w.write_str(" extends ")?,
                        BoundKind::Super => w.write_str(" super ")?,
                    }
                    bound.write_to(w)?;
                }
                Ok(())
            }
            Type::Void => w.write_str("void"),
        }
    }
}

impl crate::ast::GenericType {
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "{}", self.name)?;
        if let Some(args) = &self.args {
            w.write_char('<')?;
            write_comma_separated(w, args, |w, t| t.write_to(w))?;
            w.write_char('>')?;
        }
        Ok(())
    }
}

// ── Display adapters ───────────────────────────────────────────────────

macro_rules! display_via_write_to {
    ($($ty:ty),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.write_to(f)
            }
        }
    )*};
}

macro_rules! display_via_depth_write_to {
    ($($ty:ty),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.write_to(f, 0)
            }
        }
    )*};
}

display_via_write_to!(CompilationUnit, Import, Annotation, Type, crate::ast::GenericType);
display_via_depth_write_to!(TypeDeclaration, Declaration, Statement, Expression, FormalParameter);
