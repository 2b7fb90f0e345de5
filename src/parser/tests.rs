use super::*;
use crate::ast::{Declaration, Expression, Statement};
use crate::features::Features;
use crate::lexer::Lexer;

fn parser(source: &str) -> Parser {
    Parser::new(Lexer::tokenize(source).unwrap(), Features::java_plus_plus())
}

fn parser_with(source: &str, features: Features) -> Parser {
    Parser::new(Lexer::tokenize(source).unwrap(), features)
}

fn parse_expr(source: &str) -> Expression {
    let mut p = parser(source);
    let expr = p.parse_expression().unwrap();
    assert!(p.at_end(), "expression did not consume all input: {}", source);
    expr
}

fn parse_stmt(source: &str) -> Statement {
    let mut p = parser(source);
    let stmt = p.parse_block_statement().unwrap();
    assert!(p.at_end(), "statement did not consume all input: {}", source);
    stmt
}

fn expr_text(source: &str) -> String {
    parse_expr(source).to_string()
}

// ═══════════════════════════════════════════════════════════════════
// Cursor and savepoints
// ═══════════════════════════════════════════════════════════════════

#[test]
fn cursor_matches_lexemes_kinds_and_alternatives() {
    let mut p = parser("import static foo");
    assert!(p.check("import"));
    assert!(p.check(["from", "import"]));
    assert!(p.check_pair("import", "static"));
    assert!(p.accept("import"));
    assert!(p.accept_pair("static", crate::token::TokenKind::Name));
    assert!(p.at_end());
}

#[test]
fn cursor_never_advances_past_end_marker() {
    let mut p = parser("a");
    p.advance();
    assert!(p.at_end());
    let before = p.peek().clone();
    p.advance();
    p.advance();
    assert_eq!(p.peek(), &before);
}

#[test]
fn try_parse_rewinds_cursor_and_buffer_on_failure() {
    let mut p = parser("a b c");
    let result: Option<()> = p.try_parse(|p| {
        p.advance();
        p.push_pre_statement(Statement::Empty);
        Err(p.expected("something else"))
    });
    assert!(result.is_none());
    assert_eq!(p.peek().lexeme, "a");
    assert_eq!(p.pre_statement_mark(), 0);
}

#[test]
fn inner_savepoint_abort_keeps_outer_progress() {
    let mut p = parser("a b c");
    let outer: Option<()> = p.try_parse(|p| {
        p.advance(); // consume `a`
        let inner: Option<()> = p.try_parse(|p| {
            p.advance();
            Err(p.expected("unreachable"))
        });
        assert!(inner.is_none());
        assert_eq!(p.peek().lexeme, "b");
        Ok(())
    });
    assert!(outer.is_some());
    assert_eq!(p.peek().lexeme, "b");
}

#[test]
fn failed_speculation_leaves_token_consumption_identical() {
    // The cast attempt on `(x, y) -> x` fails and rolls back; the lambda
    // alternative must see the tokens exactly as if parsed directly.
    let lambda = parse_expr("(x, y) -> x");
    assert_eq!(lambda.to_string(), "(x, y) -> x");

    let cast = parse_expr("(String) value");
    assert_eq!(cast.to_string(), "(String) value");

    let grouped = parse_expr("(a + b) * c");
    assert_eq!(grouped.to_string(), "(a + b) * c");
}

// ═══════════════════════════════════════════════════════════════════
// Feature directives in the import section
// ═══════════════════════════════════════════════════════════════════

#[test]
fn directive_enables_namespace_before_following_tokens() {
    let mut features = Features::java();
    features.set("syntax.multiple_import_sections", true).unwrap();
    let mut p = parser_with(
        "from java++ import literals.*; class A { Object o = [1, 2]; }",
        features,
    );
    let unit = p.parse_compilation_unit().unwrap();
    assert!(p.features.collection_literals);
    assert!(!p.features.print_statements);
    let printed = unit.to_string();
    assert!(printed.contains("java.util.List.of(1, 2)"));
}

#[test]
fn directive_rejects_unknown_feature_names() {
    let mut p = parser("from java++ import no.such_feature; class A { }");
    let err = p.parse_compilation_unit().unwrap_err();
    assert!(matches!(
        err.kind,
        crate::error::SyntaxErrorKind::UnknownFeature { .. }
    ));
}

#[test]
fn unimport_directive_disables_features() {
    let mut p = parser("unimport java++.statements.print; class A { }");
    p.parse_compilation_unit().unwrap();
    assert!(!p.features.print_statements);
    assert!(p.features.collection_literals);
}

#[test]
fn namespaced_directive_prefix_applies_to_names() {
    let mut p = parser("from java++.trailing_commas import other; class A { }");
    p.parse_compilation_unit().unwrap();
    assert!(p.features.trailing_other_commas);
}

// ═══════════════════════════════════════════════════════════════════
// Print family
// ═══════════════════════════════════════════════════════════════════

#[test]
fn println_with_three_elements_expands_to_print_sequence() {
    let stmt = parse_stmt("println 1, 2, 3;");
    let Statement::Block(stmts) = &stmt else {
        panic!("expected a block, got {:?}", stmt)
    };
    assert_eq!(stmts.len(), 5);
    assert_eq!(stmts[0].to_string(), "System.out.print(1);\n");
    assert_eq!(stmts[1].to_string(), "System.out.print(' ');\n");
    assert_eq!(stmts[4].to_string(), "System.out.println(3);\n");
}

#[test]
fn print_single_argument_stays_single_call() {
    assert_eq!(parse_stmt("print x;").to_string(), "System.out.print(x);\n");
    assert_eq!(
        parse_stmt("println x;").to_string(),
        "System.out.println(x);\n"
    );
}

#[test]
fn bare_print_family_statements() {
    assert_eq!(parse_stmt("print;"), Statement::Empty);
    assert_eq!(
        parse_stmt("println;").to_string(),
        "System.out.println();\n"
    );
}

#[test]
fn print_accepts_whitespace_separated_elements() {
    let stmt = parse_stmt("print a b;");
    let Statement::Block(stmts) = &stmt else {
        panic!("expected a block")
    };
    assert_eq!(stmts.len(), 3);
    assert_eq!(stmts[2].to_string(), "System.out.print(b);\n");
}

#[test]
fn printfln_appends_line_separator_to_format() {
    assert_eq!(
        parse_stmt("printfln \"%d\", 1;").to_string(),
        "System.out.printf(\"%d\" + \"%n\", 1);\n"
    );
}

#[test]
fn printf_forwards_to_system_out() {
    assert_eq!(
        parse_stmt("printf \"%d%n\", 1;").to_string(),
        "System.out.printf(\"%d%n\", 1);\n"
    );
}

// ═══════════════════════════════════════════════════════════════════
// Collection literals
// ═══════════════════════════════════════════════════════════════════

#[test]
fn list_literal_lowers_to_list_of() {
    assert_eq!(expr_text("[1, 2, 3]"), "java.util.List.of(1, 2, 3)");
    assert_eq!(expr_text("[]"), "java.util.List.of()");
}

#[test]
fn list_literal_trailing_comma_requires_flag() {
    let mut features = Features::java_plus_plus();
    features.set("trailing_commas.other", true).unwrap();
    let mut p = parser_with("[1, 2, 3,]", features);
    assert_eq!(
        p.parse_expression().unwrap().to_string(),
        "java.util.List.of(1, 2, 3)"
    );

    let mut p = parser("[1, 2, 3,]");
    assert!(p.parse_expression().is_err());
}

#[test]
fn map_literal_lowers_to_map_of() {
    assert_eq!(
        expr_text("{ \"a\": 1, \"b\": 2 }"),
        "java.util.Map.of(\"a\", 1, \"b\", 2)"
    );
    assert_eq!(expr_text("{}"), "java.util.Map.of()");
}

#[test]
fn large_map_literal_uses_of_entries() {
    let entries: Vec<String> = (0..11).map(|i| format!("{}: {}", i, i)).collect();
    let text = format!("{{ {} }}", entries.join(", "));
    let printed = expr_text(&text);
    assert!(printed.starts_with("java.util.Map.ofEntries(java.util.Map.entry(0, 0)"));
    assert_eq!(printed.matches("Map.entry(").count(), 11);
}

#[test]
fn set_literal_lowers_to_set_of() {
    assert_eq!(expr_text("{ 1, 2 }"), "java.util.Set.of(1, 2)");
}

#[test]
fn class_creator_wraps_brace_literal() {
    assert_eq!(
        expr_text("new ArrayList { 1, 2 }"),
        "new ArrayList(java.util.List.of(1, 2))"
    );
    assert_eq!(
        expr_text("new HashMap { \"k\": \"v\" }"),
        "new HashMap(java.util.Map.of(\"k\", \"v\"))"
    );
}

#[test]
fn class_creator_with_args_keeps_anonymous_body() {
    let expr = parse_expr("new Runnable() { public void run() { } }");
    let Expression::ClassCreator { body, .. } = &expr else {
        panic!("expected a class creator")
    };
    assert!(body.is_some());
}

// ═══════════════════════════════════════════════════════════════════
// Optional literals, elvis, equality
// ═══════════════════════════════════════════════════════════════════

#[test]
fn optional_literals_lower_to_empty_and_or_else_throw() {
    assert_eq!(expr_text("?"), "Optional.empty()");
    assert_eq!(expr_text("?<String>"), "Optional.<String>empty()");
    assert_eq!(expr_text("?<int>"), "OptionalInt.empty()");
    assert_eq!(expr_text("?<double>"), "OptionalDouble.empty()");
    assert_eq!(expr_text("maybe!"), "maybe.orElseThrow()");
}

#[test]
fn elvis_uses_require_non_null_else_for_simple_fallbacks() {
    assert_eq!(
        expr_text("name ?: \"anon\""),
        "Objects.requireNonNullElse(name, \"anon\")"
    );
    assert_eq!(
        expr_text("name ?: other"),
        "Objects.requireNonNullElse(name, other)"
    );
    assert_eq!(
        expr_text("name ?: compute()"),
        "Objects.requireNonNullElseGet(name, () -> compute())"
    );
}

#[test]
fn equality_operator_lowers_to_deep_equals() {
    assert_eq!(expr_text("a == b"), "Objects.deepEquals(a, b)");
    assert_eq!(expr_text("a != b"), "!Objects.deepEquals(a, b)");
}

#[test]
fn equality_with_literal_operand_keeps_primitive_comparison() {
    assert_eq!(expr_text("a == 1"), "a == 1");
    assert_eq!(expr_text("1 == a"), "1 == a");
    assert_eq!(expr_text("x == null"), "x == null");
}

#[test]
fn is_operator_compares_references() {
    assert_eq!(expr_text("a is b"), "a == b");
    assert_eq!(expr_text("a is! b"), "a != b");
}

#[test]
fn detached_bang_after_is_negates_the_operand() {
    // `is!` only when the `!` touches `is`; `is !b` compares against `!b`.
    assert_eq!(expr_text("a is !b"), "a == !b");
    assert_eq!(expr_text("a is ! b"), "a == !b");
}

#[test]
fn equality_stays_primitive_when_feature_is_off() {
    let mut p = parser_with("a == b", Features::java());
    assert_eq!(p.parse_expression().unwrap().to_string(), "a == b");
}

// ═══════════════════════════════════════════════════════════════════
// Regex and byte-string literals
// ═══════════════════════════════════════════════════════════════════

#[test]
fn regex_literal_compiles_a_pattern() {
    assert_eq!(
        expr_text("/a+b/"),
        "java.util.regex.Pattern.compile(\"a+b\")"
    );
}

#[test]
fn regex_escapes_translate_to_java_string_syntax() {
    assert_eq!(
        expr_text(r"/a\/b/"),
        "java.util.regex.Pattern.compile(\"a/b\")"
    );
    assert_eq!(
        expr_text(r"/\x41\d+/"),
        "java.util.regex.Pattern.compile(\"\\u0041\\d+\")"
    );
}

#[test]
fn byte_string_lowers_to_byte_array() {
    assert_eq!(expr_text("b\"hi\""), "new byte[] { 104, 105 }");
    assert_eq!(expr_text("b\"\\x00\\xff\""), "new byte[] { 0, 255 }");
}

// ═══════════════════════════════════════════════════════════════════
// Vardecl in conditions
// ═══════════════════════════════════════════════════════════════════

#[test]
fn var_declaration_in_if_condition_hoists_whole_declaration() {
    let stmt = parse_stmt("if (var x = compute()) { use(x); }");
    let Statement::Block(stmts) = &stmt else {
        panic!("expected hoisted block, got {:?}", stmt)
    };
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[0].to_string(), "var x = compute();\n");
    let Statement::If { condition, .. } = &stmts[1] else {
        panic!("expected if statement")
    };
    assert_eq!(condition, &Expression::Name("x".into()));
}

#[test]
fn typed_declaration_in_condition_hoists_without_initialiser() {
    let stmt = parse_stmt("while (String line = next()) { handle(line); }");
    let Statement::Block(stmts) = &stmt else {
        panic!("expected hoisted block")
    };
    assert_eq!(stmts[0].to_string(), "String line;\n");
    let Statement::While { condition, .. } = &stmts[1] else {
        panic!("expected while statement")
    };
    assert_eq!(condition.to_string(), "line = next()");
}

#[test]
fn plain_conditions_do_not_hoist() {
    let stmt = parse_stmt("if (ready()) { go(); }");
    assert!(matches!(stmt, Statement::If { .. }));
}

// ═══════════════════════════════════════════════════════════════════
// Default arguments
// ═══════════════════════════════════════════════════════════════════

fn class_members(source: &str) -> Vec<Declaration> {
    let mut p = parser(source);
    let unit = p.parse_compilation_unit().unwrap();
    assert!(p.at_end());
    unit.types.into_iter().next().unwrap().members
}

#[test]
fn defaulted_parameters_synthesize_one_overload_per_suffix() {
    let members = class_members("class C { void f(int a, int b = 2, int c = 3) { } }");
    assert_eq!(members.len(), 3);
    let sigs: Vec<usize> = members
        .iter()
        .map(|m| match m {
            Declaration::Function(f) => f.params.len(),
            other => panic!("expected functions, got {:?}", other),
        })
        .collect();
    assert_eq!(sigs, [3, 2, 1]);

    let Declaration::Function(two) = &members[1] else { unreachable!() };
    assert_eq!(two.body.as_ref().unwrap()[0].to_string(), "f(a, b, 3);\n");
    let Declaration::Function(one) = &members[2] else { unreachable!() };
    assert_eq!(one.body.as_ref().unwrap()[0].to_string(), "f(a, 2, 3);\n");
}

#[test]
fn non_void_overloads_return_the_forwarded_call() {
    let members = class_members("class C { int f(int a, int b = 2) { return a + b; } }");
    let Declaration::Function(overload) = &members[1] else {
        panic!("expected overload")
    };
    assert_eq!(
        overload.body.as_ref().unwrap()[0].to_string(),
        "return f(a, 2);\n"
    );
}

#[test]
fn constructor_overloads_forward_through_this() {
    let members = class_members("class C { C(int a, int b = 1) { } }");
    assert_eq!(members.len(), 2);
    let Declaration::Constructor(overload) = &members[1] else {
        panic!("expected constructor overload")
    };
    assert_eq!(overload.body[0].to_string(), "this(a, 1);\n");
}

#[test]
fn array_initialiser_default_is_reified_with_array_creator() {
    let members = class_members("class C { void f(int[] xs = {1, 2}) { } }");
    let Declaration::Function(overload) = &members[1] else {
        panic!("expected overload")
    };
    assert_eq!(
        overload.body.as_ref().unwrap()[0].to_string(),
        "f(new int[] { 1, 2 });\n"
    );
}

#[test]
fn variadic_defaulted_tail_produces_both_forms() {
    let members = class_members("class C { void f(int a, int... rest = {1, 2}) { } }");
    assert_eq!(members.len(), 2);
    let Declaration::Function(canonical) = &members[0] else { unreachable!() };
    assert!(canonical.params[1].variadic);
    let Declaration::Function(overload) = &members[1] else { unreachable!() };
    assert_eq!(overload.params.len(), 1);
    assert_eq!(
        overload.body.as_ref().unwrap()[0].to_string(),
        "f(a, new int[] { 1, 2 });\n"
    );
}

#[test]
fn parameter_after_defaulted_parameter_must_have_default() {
    let mut p = parser("class C { void f(int a = 1, int b) { } }");
    let err = p.parse_compilation_unit().unwrap_err();
    assert!(matches!(
        err.kind,
        crate::error::SyntaxErrorKind::DefaultParameterRequired { .. }
    ));
}

#[test]
fn synthesized_overloads_do_not_alias_default_expressions() {
    let members =
        class_members("class C { void f(int a = make(), int b = make()) { } }");
    let Declaration::Function(one) = &members[1] else { unreachable!() };
    let Declaration::Function(two) = &members[2] else { unreachable!() };
    // Same default expression appears in both overloads as independent
    // deep copies.
    assert_eq!(one.body.as_ref().unwrap()[0].to_string(), "f(a, make());\n");
    assert_eq!(
        two.body.as_ref().unwrap()[0].to_string(),
        "f(make(), make());\n"
    );
}

// ═══════════════════════════════════════════════════════════════════
// Default modifiers, empty class body, argument annotations
// ═══════════════════════════════════════════════════════════════════

#[test]
fn default_modifiers_apply_to_following_members() {
    let members = class_members("class C { public static : int a; int b; }");
    for member in &members {
        let Declaration::Field(field) = member else {
            panic!("expected fields")
        };
        let words: Vec<&str> = field.modifiers.iter().map(|m| m.0.as_str()).collect();
        assert_eq!(words, ["public", "static"]);
    }
}

#[test]
fn default_modifiers_merge_without_duplicates() {
    let members = class_members("class C { public : public final int a = 1; }");
    let Declaration::Field(field) = &members[0] else {
        panic!("expected a field")
    };
    let words: Vec<&str> = field.modifiers.iter().map(|m| m.0.as_str()).collect();
    assert_eq!(words, ["public", "final"]);
}

#[test]
fn later_directive_rewrites_the_base() {
    let members = class_members("class C { public : int a; private : int b; }");
    let Declaration::Field(b) = &members[1] else { panic!() };
    assert_eq!(b.modifiers[0].0, "private");
    let Declaration::Field(a) = &members[0] else { panic!() };
    assert_eq!(a.modifiers[0].0, "public");
}

#[test]
fn empty_class_body_accepts_semicolon() {
    let mut p = parser("class A; interface B; enum E; @interface N;");
    let unit = p.parse_compilation_unit().unwrap();
    assert_eq!(unit.types.len(), 4);
    assert!(unit.types.iter().all(|t| t.members.is_empty()));
}

#[test]
fn named_arguments_are_discarded() {
    assert_eq!(expr_text("f(x: 1, y: 2)"), "f(1, 2)");
}

#[test]
fn trailing_argument_comma_is_accepted_by_default() {
    assert_eq!(expr_text("f(1, 2,)"), "f(1, 2)");

    let mut p = parser_with("f(1, 2,)", Features::java());
    assert!(p.parse_expression().is_err());
}

// ═══════════════════════════════════════════════════════════════════
// Base grammar spot checks
// ═══════════════════════════════════════════════════════════════════

#[test]
fn shift_operators_reassemble_from_single_gt_tokens() {
    assert_eq!(expr_text("a >> b"), "a >> b");
    assert_eq!(expr_text("a >>> b"), "a >>> b");
    assert_eq!(expr_text("a >>= b"), "a >>= b");
    assert_eq!(expr_text("x >> 2 > y"), "x >> 2 > y");
}

#[test]
fn nested_generics_close_without_shift_confusion() {
    let stmt = parse_stmt("Map<String, List<Integer>> m = make();");
    assert_eq!(stmt.to_string(), "Map<String, List<Integer>> m = make();\n");
}

#[test]
fn ternary_and_elvis_coexist() {
    assert_eq!(expr_text("a ? b : c"), "a ? b : c");
    assert_eq!(
        expr_text("flag ? x ?: y : z"),
        "flag ? Objects.requireNonNullElse(x, y) : z"
    );
}

#[test]
fn instanceof_parses_as_relational() {
    assert_eq!(expr_text("o instanceof String"), "o instanceof String");
}

#[test]
fn casts_of_reference_types_need_operand_position() {
    // `(a) - b` must stay a subtraction, `(int) - b` is a cast.
    assert_eq!(expr_text("(a) - b"), "(a) - b");
    assert_eq!(expr_text("(int) - b"), "(int) -b");
}

#[test]
fn labeled_statements_and_loops() {
    let stmt = parse_stmt("outer: while (true) { break outer; }");
    assert!(matches!(stmt, Statement::Labeled { .. }));
}

#[test]
fn switch_cases_allow_label_lists() {
    let stmt = parse_stmt("switch (x) { case 1, 2: f(); break; default: g(); }");
    let Statement::Switch { cases, .. } = &stmt else {
        panic!("expected switch")
    };
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].labels.len(), 2);
    assert!(cases[1].is_default);
}
