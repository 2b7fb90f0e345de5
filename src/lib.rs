//! javapp: a source-to-source translator from Java++ — a superset of Java
//! with feature-gated syntactic extensions — to plain Java.
//!
//! The pipeline is lexer → parser → printer. Every extension is lowered to
//! vanilla-Java AST shapes *during* parsing, so the tree that comes out is
//! always printable as standard Java. Which extensions are active is
//! decided by a per-parser feature registry that the source program itself
//! can mutate through `from java++ import ...;` directives in its import
//! section.

pub mod ast;
pub mod cli;
pub mod error;
pub mod features;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::CompilationUnit;
pub use error::{SyntaxError, SyntaxErrorKind};
pub use features::Features;
pub use lexer::Lexer;
pub use parser::{
    DeclarationParsing, ExpressionParsing, ImportParsing, Parser, StatementParsing, TypeParsing,
};

/// Parse a whole source file with the given feature settings.
pub fn parse_str(source: &str, features: Features) -> Result<CompilationUnit, SyntaxError> {
    let tokens = Lexer::tokenize(source)?;
    let mut parser = Parser::new(tokens, features);
    parser.parse_compilation_unit()
}

/// Translate Java++ source text to plain Java text, with the default
/// feature set.
pub fn translate(source: &str) -> Result<String, SyntaxError> {
    parse_str(source, Features::java_plus_plus()).map(|unit| unit.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_is_plain_java_text() {
        let out = translate("class A { void f() { println \"hi\"; } }").unwrap();
        assert!(out.contains("System.out.println(\"hi\");"));
    }

    #[test]
    fn syntax_errors_surface_from_parse_str() {
        let err = parse_str("class A {", Features::java()).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
