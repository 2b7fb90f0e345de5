//! The feature registry.
//!
//! Every syntactic extension is gated by a named flag that the source
//! program can flip from its import section (`from java++ import ...;`).
//! The recognised set is fixed at compile time; the name-to-field mapping
//! lives in one table so the dotted name and the struct field never drift
//! apart.

use std::fmt;

/// One boolean per recognised feature. `Features::java_plus_plus()` is the
/// dialect default; `Features::java()` turns everything off, which is
/// exactly the base-Java grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    pub print_statements: bool,
    pub class_creator_expressions: bool,
    pub collection_literals: bool,
    pub optional_literals: bool,
    pub trailing_argument_commas: bool,
    pub trailing_other_commas: bool,
    pub argument_annotations: bool,
    pub multiple_import_sections: bool,
    pub default_arguments: bool,
    pub default_modifiers: bool,
    pub empty_class_body: bool,
    pub vardecl_expressions: bool,
    pub elvis_operator: bool,
    pub equality_operator: bool,
    pub auto_import_types: bool,
    pub auto_import_statics: bool,
}

type Accessor = fn(&mut Features) -> &mut bool;

/// The single source of truth for recognised feature names.
pub const FEATURE_TABLE: &[(&str, Accessor)] = &[
    ("statements.print", |f| &mut f.print_statements),
    ("expressions.class_creator", |f| {
        &mut f.class_creator_expressions
    }),
    ("literals.collections", |f| &mut f.collection_literals),
    ("literals.optional", |f| &mut f.optional_literals),
    ("trailing_commas.argument", |f| {
        &mut f.trailing_argument_commas
    }),
    ("trailing_commas.other", |f| &mut f.trailing_other_commas),
    ("syntax.argument_annotations", |f| {
        &mut f.argument_annotations
    }),
    ("syntax.multiple_import_sections", |f| {
        &mut f.multiple_import_sections
    }),
    ("syntax.default_arguments", |f| &mut f.default_arguments),
    ("syntax.default_modifiers", |f| &mut f.default_modifiers),
    ("syntax.empty_class_body", |f| &mut f.empty_class_body),
    ("expressions.vardecl", |f| &mut f.vardecl_expressions),
    ("expressions.elvisoperator", |f| &mut f.elvis_operator),
    ("expressions.equalityoperator", |f| &mut f.equality_operator),
    ("auto_imports.types", |f| &mut f.auto_import_types),
    ("auto_imports.statics", |f| &mut f.auto_import_statics),
];

/// Raised by [`Features::set`] for a name outside the recognised set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeature {
    pub name: String,
}

impl fmt::Display for UnknownFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported feature '{}'", self.name)
    }
}

impl std::error::Error for UnknownFeature {}

impl Features {
    /// The Java++ defaults: everything on except `trailing_commas.other`.
    pub fn java_plus_plus() -> Self {
        let mut f = Features::all(true);
        f.trailing_other_commas = false;
        f
    }

    /// The base-Java dialect: every extension off.
    pub fn java() -> Self {
        Features::all(false)
    }

    fn all(enabled: bool) -> Self {
        Features {
            print_statements: enabled,
            class_creator_expressions: enabled,
            collection_literals: enabled,
            optional_literals: enabled,
            trailing_argument_commas: enabled,
            trailing_other_commas: enabled,
            argument_annotations: enabled,
            multiple_import_sections: enabled,
            default_arguments: enabled,
            default_modifiers: enabled,
            empty_class_body: enabled,
            vardecl_expressions: enabled,
            elvis_operator: enabled,
            equality_operator: enabled,
            auto_import_types: enabled,
            auto_import_statics: enabled,
        }
    }

    /// Set a feature by dotted name. `ns.*` sets every recognised descendant
    /// of the namespace, a bare `*` sets every recognised name. Setting is
    /// idempotent. Unknown names (and namespaces with no descendants) fail.
    pub fn set(&mut self, name: &str, enabled: bool) -> Result<(), UnknownFeature> {
        if name == "*" {
            for (_, accessor) in FEATURE_TABLE {
                *accessor(self) = enabled;
            }
            return Ok(());
        }
        if let Some(namespace) = name.strip_suffix(".*") {
            let prefix = format!("{}.", namespace);
            let mut matched = false;
            for (feature, accessor) in FEATURE_TABLE {
                if feature.starts_with(&prefix) {
                    *accessor(self) = enabled;
                    matched = true;
                }
            }
            return if matched {
                Ok(())
            } else {
                Err(UnknownFeature { name: name.into() })
            };
        }
        for (feature, accessor) in FEATURE_TABLE {
            if *feature == name {
                *accessor(self) = enabled;
                return Ok(());
            }
        }
        Err(UnknownFeature { name: name.into() })
    }

    /// Recognised names, in table order. `--list-features` sorts them.
    pub fn names() -> impl Iterator<Item = &'static str> {
        FEATURE_TABLE.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_sets_one_flag() {
        let mut f = Features::java();
        f.set("statements.print", true).unwrap();
        assert!(f.print_statements);
        assert!(!f.collection_literals);
    }

    #[test]
    fn namespace_wildcard_sets_descendants() {
        let mut f = Features::java();
        f.set("literals.*", true).unwrap();
        assert!(f.collection_literals);
        assert!(f.optional_literals);
        assert!(!f.print_statements);
    }

    #[test]
    fn star_sets_everything() {
        let mut f = Features::java();
        f.set("*", true).unwrap();
        assert!(f.trailing_other_commas);
        f.set("*", false).unwrap();
        assert_eq!(f, Features::java());
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut f = Features::java_plus_plus();
        assert!(f.set("print_statement", true).is_err());
        assert!(f.set("bogus.*", true).is_err());
        assert!(f.set("statements.bogus", false).is_err());
    }

    #[test]
    fn setting_is_idempotent() {
        let mut f = Features::java();
        f.set("expressions.vardecl", true).unwrap();
        let once = f.clone();
        f.set("expressions.vardecl", true).unwrap();
        assert_eq!(f, once);

        f.set("expressions.vardecl", false).unwrap();
        f.set("expressions.vardecl", true).unwrap();
        assert!(f.vardecl_expressions);
    }

    #[test]
    fn defaults_match_dialects() {
        let jpp = Features::java_plus_plus();
        assert!(jpp.print_statements);
        assert!(jpp.trailing_argument_commas);
        assert!(!jpp.trailing_other_commas);
        assert!(Features::java() == Features::all(false));
    }
}
