//! Auto-import synthesis rules.

use javapp::ast::Import;
use javapp::{parse_str, Features};

fn imports_of(source: &str, configure: impl Fn(&mut Features)) -> Vec<Import> {
    let mut features = Features::java();
    configure(&mut features);
    parse_str(source, features)
        .unwrap_or_else(|e| panic!("parse failed: {}", e))
        .imports
}

fn auto_types(features: &mut Features) {
    features.set("auto_imports.types", true).unwrap();
}

fn auto_statics(features: &mut Features) {
    features.set("auto_imports.statics", true).unwrap();
}

#[test]
fn synthesized_imports_precede_user_imports() {
    let imports = imports_of("import com.example.Widget;\nclass A { }", auto_types);
    assert!(imports.len() > 2);
    assert_eq!(imports.last().unwrap().name.to_string(), "com.example.Widget");
    assert!(imports.iter().any(|i| i.name.to_string() == "java.util.List"));
}

#[test]
fn synthesized_prefix_is_sorted_static_wildcard_name() {
    let imports = imports_of("class A { }", |f| {
        auto_types(f);
        auto_statics(f);
    });
    let keys: Vec<(bool, bool, String)> = imports
        .iter()
        .map(|i| (!i.r#static, !i.wildcard, i.name.to_string()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "synthesized imports are not in canonical order");
    // Statics sort first, then the one wildcard package import.
    assert!(imports[0].r#static);
    assert!(imports.iter().any(|i| i.wildcard && i.name.to_string() == "java.util.function"));
}

#[test]
fn wildcard_user_import_suppresses_whole_package() {
    let imports = imports_of("import java.util.*;\nclass A { }", auto_types);
    assert!(
        !imports
            .iter()
            .any(|i| !i.wildcard && i.imported_package() == "java.util"),
        "java.util types must not be auto-imported under a user wildcard"
    );
    // Other packages are unaffected.
    assert!(imports.iter().any(|i| i.name.to_string() == "java.io.IOException"));
}

#[test]
fn explicit_simple_name_suppresses_that_auto_import() {
    let imports = imports_of("import my.lib.List;\nclass A { }", auto_types);
    assert!(!imports.iter().any(|i| i.name.to_string() == "java.util.List"));
    assert!(imports.iter().any(|i| i.name.to_string() == "java.util.Set"));
    assert!(imports.iter().any(|i| i.name.to_string() == "my.lib.List"));
}

#[test]
fn static_member_import_suppresses_matching_member() {
    let imports = imports_of(
        "import static java.lang.Integer.parseInt;\nclass A { }",
        auto_statics,
    );
    let auto_parse_int = imports
        .iter()
        .filter(|i| i.name.to_string() == "java.lang.Integer.parseInt")
        .count();
    assert_eq!(auto_parse_int, 1, "only the user import survives");
    assert!(imports
        .iter()
        .any(|i| i.name.to_string() == "java.lang.Integer.parseUnsignedInt"));
}

#[test]
fn static_wildcard_import_suppresses_host_members() {
    let imports = imports_of(
        "import static java.lang.String.*;\nclass A { }",
        auto_statics,
    );
    assert!(!imports.iter().any(|i| i.name.to_string() == "java.lang.String.format"));
    assert!(!imports.iter().any(|i| i.name.to_string() == "java.lang.String.join"));
    assert!(imports.iter().any(|i| i.name.to_string() == "java.lang.Short.parseShort"));
}

#[test]
fn re_entered_sections_do_not_duplicate_auto_imports() {
    let imports = imports_of("class A { }\nimport com.example.Late;\nclass B { }", |f| {
        auto_types(f);
        f.set("syntax.multiple_import_sections", true).unwrap();
    });
    let list_count = imports
        .iter()
        .filter(|i| i.name.to_string() == "java.util.List")
        .count();
    assert_eq!(list_count, 1);
    assert!(imports.iter().any(|i| i.name.to_string() == "com.example.Late"));
}

#[test]
fn disabled_features_synthesize_nothing() {
    let imports = imports_of("class A { }", |_| {});
    assert!(imports.is_empty());
}

#[test]
fn import_accessors_follow_the_flags() {
    let imports = imports_of("import static java.lang.Integer.parseInt;\nclass A { }", |_| {});
    let import = &imports[0];
    assert!(import.r#static);
    assert_eq!(import.imported_package(), "java.lang");
    assert_eq!(import.imported_type(), Some("Integer"));
    assert_eq!(import.imported_name(), Some("parseInt"));
}
