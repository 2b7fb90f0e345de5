//! The Java abstract syntax tree.
//!
//! Nodes are plain owned data: every node owns its children through
//! `Box`/`Vec`, `Clone` is a deep copy, and `PartialEq` is structural
//! equality. The equivalence tests lean on both: a desugared Java++ unit
//! must compare equal to the plain-Java unit it stands for.

mod decl;
mod expr;
mod stmt;
mod types;

pub use decl::{
    Annotation, AnnotationArgs, CompilationUnit, ConstructorDeclaration, Declaration,
    EnumConstant, FieldDeclaration, FormalParameter, FunctionDeclaration, Import,
    InitializerBlock, Modifier, PackageDeclaration, ThisParameter, TypeDeclaration, TypeKind,
};
pub use expr::{Expression, Lambda, LambdaBody, LambdaParams, Literal};
pub use stmt::{
    CatchClause, ForInit, Statement, SwitchCase, TryResource, VariableDeclaration,
    VariableDeclarator,
};
pub use types::{ArrayType, BoundKind, GenericType, Type, TypeParameter, WildcardType};

use std::fmt;

/// A dotted name: `java.util.List`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualName(pub Vec<String>);

impl QualName {
    pub fn from_dotted(name: &str) -> Self {
        QualName(name.split('.').map(String::from).collect())
    }

    pub fn simple(name: impl Into<String>) -> Self {
        QualName(vec![name.into()])
    }

    /// The final segment.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// Everything before the final segment, dotted.
    pub fn qualifier(&self) -> String {
        self.0[..self.0.len().saturating_sub(1)].join(".")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub fn joined(&self, other: &QualName) -> QualName {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        QualName(segments)
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Merge two modifier lists, keeping first-occurrence order and dropping
/// duplicates by lexeme. Used by the default-modifiers directive.
pub fn merge_modifiers(base: &[Modifier], own: &[Modifier]) -> Vec<Modifier> {
    let mut merged: Vec<Modifier> = Vec::with_capacity(base.len() + own.len());
    for m in base.iter().chain(own) {
        if !merged.iter().any(|seen| seen.0 == m.0) {
            merged.push(m.clone());
        }
    }
    merged
}

/// Merge two annotation lists, dropping duplicates by annotation type name.
pub fn merge_annotations(base: &[Annotation], own: &[Annotation]) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::with_capacity(base.len() + own.len());
    for a in base.iter().chain(own) {
        if !merged.iter().any(|seen| seen.name == a.name) {
            merged.push(a.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qual_name_accessors() {
        let name = QualName::from_dotted("java.util.List");
        assert_eq!(name.last(), "List");
        assert_eq!(name.qualifier(), "java.util");
        assert_eq!(name.to_string(), "java.util.List");
    }

    #[test]
    fn merge_modifiers_drops_duplicates_in_order() {
        let base = vec![Modifier("public".into()), Modifier("static".into())];
        let own = vec![Modifier("static".into()), Modifier("final".into())];
        let merged = merge_modifiers(&base, &own);
        let words: Vec<&str> = merged.iter().map(|m| m.0.as_str()).collect();
        assert_eq!(words, ["public", "static", "final"]);
    }

    #[test]
    fn merge_annotations_dedups_by_type_name() {
        let override_ = Annotation {
            name: QualName::simple("Override"),
            args: AnnotationArgs::None,
        };
        let deprecated = Annotation {
            name: QualName::simple("Deprecated"),
            args: AnnotationArgs::None,
        };
        let merged = merge_annotations(
            &[override_.clone()],
            &[deprecated.clone(), override_.clone()],
        );
        assert_eq!(merged, vec![override_, deprecated]);
    }
}
