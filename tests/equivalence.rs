//! The central equivalence property: a Java++ unit parsed with the extended
//! features must produce the same AST — and the same printed text — as the
//! plain-Java unit it desugars to, parsed with base settings.

use javapp::{parse_str, Features};

/// Java++ settings for a fixture: everything on except
/// `syntax.multiple_import_sections` and `statements.print`, which are
/// toggled per fixture.
fn jpp_features(enable: &[&str], disable: &[&str]) -> Features {
    let mut features = Features::java();
    features.set("*", true).unwrap();
    features.set("syntax.multiple_import_sections", false).unwrap();
    features.set("statements.print", false).unwrap();
    for name in enable {
        features.set(name, true).unwrap();
    }
    for name in disable {
        features.set(name, false).unwrap();
    }
    features
}

fn assert_equivalent(javapp_src: &str, java_src: &str, enable: &[&str], disable: &[&str]) {
    let jpp = parse_str(javapp_src, jpp_features(enable, disable))
        .unwrap_or_else(|e| panic!("Java++ parse failed: {}", e));
    let java = parse_str(java_src, Features::java())
        .unwrap_or_else(|e| panic!("Java parse failed: {}", e));
    assert_eq!(jpp, java, "ASTs differ");
    assert_eq!(jpp.to_string(), java.to_string(), "printed output differs");
}

#[test]
fn print_family_desugars_to_system_out() {
    assert_equivalent(
        r#"
class A {
    void f() {
        println 1, 2, 3;
        print;
        println;
        print "x";
        printf "%d%n", 42;
        printfln "%d", 42;
    }
}
"#,
        r#"
class A {
    void f() {
        {
            System.out.print(1);
            System.out.print(' ');
            System.out.print(2);
            System.out.print(' ');
            System.out.println(3);
        }
        ;
        System.out.println();
        System.out.print("x");
        System.out.printf("%d%n", 42);
        System.out.printf("%d" + "%n", 42);
    }
}
"#,
        &["statements.print"],
        &["auto_imports.types", "auto_imports.statics"],
    );
}

#[test]
fn collection_literals_desugar_to_factory_calls() {
    assert_equivalent(
        r#"
class B {
    Object list = [1, 2, 3,];
    Object map = { "a": 1, "b": 2 };
    Object created = new ArrayList { 1, 2 };
    int[] plainArray = {1, 2};

    void f() {
        use({ 1, 2 });
        use({});
        take([true, false]);
    }
}
"#,
        r#"
class B {
    Object list = java.util.List.of(1, 2, 3);
    Object map = java.util.Map.of("a", 1, "b", 2);
    Object created = new ArrayList(java.util.List.of(1, 2));
    int[] plainArray = {1, 2};

    void f() {
        use(java.util.Set.of(1, 2));
        use(java.util.Map.of());
        take(java.util.List.of(true, false));
    }
}
"#,
        &[],
        &["auto_imports.types", "auto_imports.statics"],
    );
}

#[test]
fn default_arguments_expand_to_forwarding_overloads() {
    assert_equivalent(
        r#"
class C {
    C(int a, int b = 1) {
    }

    void f(int a, int b = 2, int c = 3) {
    }

    int sum(int a, int... rest = {}) {
        return a;
    }
}
"#,
        r#"
class C {
    C(int a, int b) {
    }

    C(int a) {
        this(a, 1);
    }

    void f(int a, int b, int c) {
    }

    void f(int a, int b) {
        f(a, b, 3);
    }

    void f(int a) {
        f(a, 2, 3);
    }

    int sum(int a, int... rest) {
        return a;
    }

    int sum(int a) {
        return sum(a, new int[] {});
    }
}
"#,
        &[],
        &["auto_imports.types", "auto_imports.statics"],
    );
}

#[test]
fn expression_extensions_desugar_in_place() {
    assert_equivalent(
        r#"
class D {
    void g() {
        if (var x = compute()) {
            use(x);
        }
        while (String line = next()) {
            handle(line);
        }
        Object a = name ?: "anon";
        Object b = name ?: compute();
        boolean c = left == right;
        boolean d = left != right;
        boolean same = left is right;
        boolean isNull = x == null;
        Object opt = ?;
        Object opti = ?<int>;
        Object opts = ?<String>;
        Object thrown = maybe!;
        Object pattern = /a+b/;
        Object bytes = b"hi";
    }
}
"#,
        r#"
class D {
    void g() {
        {
            var x = compute();
            if (x) {
                use(x);
            }
        }
        {
            String line;
            while (line = next()) {
                handle(line);
            }
        }
        Object a = Objects.requireNonNullElse(name, "anon");
        Object b = Objects.requireNonNullElseGet(name, () -> compute());
        boolean c = Objects.deepEquals(left, right);
        boolean d = !Objects.deepEquals(left, right);
        boolean same = left == right;
        boolean isNull = x == null;
        Object opt = Optional.empty();
        Object opti = OptionalInt.empty();
        Object opts = Optional.<String>empty();
        Object thrown = maybe.orElseThrow();
        Object pattern = java.util.regex.Pattern.compile("a+b");
        Object bytes = new byte[] { 104, 105 };
    }
}
"#,
        &[],
        &["auto_imports.types", "auto_imports.statics"],
    );
}

#[test]
fn import_sections_default_modifiers_and_empty_bodies() {
    assert_equivalent(
        r#"
import java.util.List;

class E {
    public static :
    int a;
    int b;
}

from java.util import Map, Set;
from java.util.concurrent import *;

class F;
"#,
        r#"
import java.util.List;
import java.util.Map;
import java.util.Set;
import java.util.concurrent.*;

class E {
    public static int a;

    public static int b;
}

class F {
}
"#,
        &["syntax.multiple_import_sections"],
        &["auto_imports.types", "auto_imports.statics"],
    );
}

#[test]
fn argument_annotations_are_positional() {
    assert_equivalent(
        r#"
class G {
    void h() {
        call(x: 1, y: 2);
        int[] nums = {1, 2};
        Map<String, List<Integer>> m;
    }
}
"#,
        r#"
class G {
    void h() {
        call(1, 2);
        int[] nums = {1, 2};
        Map<String, List<Integer>> m;
    }
}
"#,
        &[],
        &["auto_imports.types", "auto_imports.statics"],
    );
}

#[test]
fn auto_static_imports_are_synthesized_sorted_and_first() {
    // Wildcard user imports cover every auto type package, so only the
    // static members are synthesized; they sort before the user imports.
    assert_equivalent(
        r#"
import java.util.*;
import java.io.*;
import java.util.stream.*;
import java.nio.file.*;
import java.math.*;
import java.nio.charset.*;
import java.util.concurrent.*;
import java.util.function.*;
import java.util.regex.*;

class H {
}
"#,
        r#"
import static java.lang.Boolean.parseBoolean;
import static java.lang.Byte.parseByte;
import static java.lang.Double.parseDouble;
import static java.lang.Float.parseFloat;
import static java.lang.Integer.parseInt;
import static java.lang.Integer.parseUnsignedInt;
import static java.lang.Long.parseLong;
import static java.lang.Long.parseUnsignedLong;
import static java.lang.Short.parseShort;
import static java.lang.String.format;
import static java.lang.String.join;
import java.util.*;
import java.io.*;
import java.util.stream.*;
import java.nio.file.*;
import java.math.*;
import java.nio.charset.*;
import java.util.concurrent.*;
import java.util.function.*;
import java.util.regex.*;

class H {
}
"#,
        &[],
        &[],
    );
}
