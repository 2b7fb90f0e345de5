//! CLI building blocks: the parse-method table and file conversion.

use javapp::cli::PARSE_METHODS;
use javapp::{Features, Lexer, Parser};

fn run_method(name: &str, source: &str) -> String {
    let (_, method) = PARSE_METHODS
        .iter()
        .find(|(n, _)| *n == name)
        .unwrap_or_else(|| panic!("no parse method named {}", name));
    let tokens = Lexer::tokenize(source).unwrap();
    let mut parser = Parser::new(tokens, Features::java_plus_plus());
    method(&mut parser).unwrap_or_else(|e| panic!("--parse {} failed: {}", name, e))
}

#[test]
fn parse_method_table_is_sorted_and_unique() {
    let names: Vec<&str> = PARSE_METHODS.iter().map(|(n, _)| *n).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(names, sorted);
}

#[test]
fn expression_method_prints_the_desugared_form() {
    assert_eq!(run_method("expression", "[1, 2]"), "java.util.List.of(1, 2)");
    assert_eq!(run_method("expression", "1 + 2"), "1 + 2");
}

#[test]
fn statement_and_type_methods_print_java() {
    assert_eq!(run_method("statement", "println x;"), "System.out.println(x);\n");
    assert_eq!(run_method("type", "Map<String, Integer>"), "Map<String, Integer>");
    assert_eq!(run_method("modifiers", "public static final"), "public static final");
    assert_eq!(run_method("parameters", "(int a, int b)"), "(int a, int b)");
    assert_eq!(run_method("annotation", "@Override"), "@Override");
    assert_eq!(run_method("literal", "42"), "42");
}

#[test]
fn converted_files_are_plain_java() {
    let dir = tempfile::tempdir().unwrap();
    let source = "class A { void f() { println \"hello\"; } }";
    let input = dir.path().join("A.javapp");
    std::fs::write(&input, source).unwrap();

    let text = std::fs::read_to_string(&input).unwrap();
    let java = javapp::translate(&text).unwrap();
    let output = input.with_extension("java");
    std::fs::write(&output, &java).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("System.out.println(\"hello\");"));
    // The emitted file must reparse as plain Java.
    javapp::parse_str(&written, Features::java()).unwrap();
}
