//! The import section: `import`, `from ... import`, the `java++` feature
//! directives, and auto-import synthesis.
//!
//! Feature directives mutate the parser's registry *while the imports are
//! being parsed*, so a directive at the top of the file governs every token
//! after it. Auto-imports are synthesized after the user's imports, skipped
//! when an existing import already covers them, and the synthesized prefix
//! is sorted by (static, wildcard, name) before being prepended.

use rustc_hash::FxHashSet;

use super::{ParseResult, Parser};
use crate::ast::{Import, QualName};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::TokenKind;

/// Types auto-imported per package; a lone `"*"` entry means the whole
/// package is imported with a wildcard.
const AUTO_IMPORTS: &[(&str, &[&str])] = &[
    (
        "java.util",
        &[
            "List",
            "Set",
            "Map",
            "ArrayList",
            "HashSet",
            "HashMap",
            "EnumSet",
            "Collection",
            "Iterator",
            "Collections",
            "Arrays",
            "Calendar",
            "Date",
            "EnumMap",
            "GregorianCalendar",
            "Locale",
            "Objects",
            "Optional",
            "OptionalDouble",
            "OptionalInt",
            "OptionalLong",
            "Properties",
            "Random",
            "Scanner",
            "Spliterators",
            "Spliterator",
            "Timer",
            "SimpleTimeZone",
            "TimeZone",
            "UUID",
            "ConcurrentModificationException",
            "NoSuchElementException",
        ],
    ),
    (
        "java.util.stream",
        &[
            "Collector",
            "DoubleStream",
            "IntStream",
            "LongStream",
            "Stream",
            "Collectors",
            "StreamSupport",
        ],
    ),
    (
        "java.io",
        &[
            "Closeable",
            "Serializable",
            "BufferedInputStream",
            "BufferedOutputStream",
            "BufferedReader",
            "BufferedWriter",
            "ByteArrayInputStream",
            "ByteArrayOutputStream",
            "CharArrayReader",
            "CharArrayWriter",
            "Console",
            "File",
            "FileInputStream",
            "FileOutputStream",
            "FileReader",
            "FileWriter",
            "InputStream",
            "InputStreamReader",
            "OutputStream",
            "OutputStreamWriter",
            "PrintStream",
            "PrintWriter",
            "Reader",
            "Writer",
            "StringReader",
            "StringWriter",
            "FileNotFoundException",
            "IOException",
            "IOError",
        ],
    ),
    (
        "java.nio.file",
        &[
            "Path",
            "Files",
            "Paths",
            "StandardCopyOption",
            "StandardOpenOption",
        ],
    ),
    (
        "java.math",
        &["BigDecimal", "BigInteger", "MathContext", "RoundingMode"],
    ),
    ("java.nio.charset", &["StandardCharsets"]),
    ("java.util.concurrent", &["Callable", "Executors", "TimeUnit"]),
    ("java.util.function", &["*"]),
    ("java.util.regex", &["Pattern"]),
];

/// Static members auto-imported per host type.
const AUTO_STATIC_IMPORTS: &[(&str, &str, &[&str])] = &[
    ("java.lang", "Boolean", &["parseBoolean"]),
    ("java.lang", "Byte", &["parseByte"]),
    ("java.lang", "Double", &["parseDouble"]),
    ("java.lang", "Float", &["parseFloat"]),
    ("java.lang", "Integer", &["parseInt", "parseUnsignedInt"]),
    ("java.lang", "Long", &["parseLong", "parseUnsignedLong"]),
    ("java.lang", "Short", &["parseShort"]),
    ("java.lang", "String", &["format", "join"]),
];

pub trait ImportParsing {
    /// Parse one import section and synthesize its auto-imports. `existing`
    /// holds imports from earlier sections of the same unit so a re-entered
    /// section never duplicates what is already covered.
    fn parse_import_section(&mut self, existing: &[Import]) -> ParseResult<Vec<Import>>;
}

impl ImportParsing for Parser {
    fn parse_import_section(&mut self, existing: &[Import]) -> ParseResult<Vec<Import>> {
        let mut imports = Vec::new();
        loop {
            if self.check("import") {
                imports.extend(self.parse_import_declarations()?);
            } else if self.check("from") {
                imports.extend(self.parse_from_import_declarations()?);
            } else if self.check("unimport") {
                self.parse_unimport_directive()?;
            } else if !self.accept(";") {
                break;
            }
        }
        let mut result = self.synthesize_auto_imports(existing, &imports);
        result.extend(imports);
        Ok(result)
    }
}

impl Parser {
    fn parse_import_declarations(&mut self) -> ParseResult<Vec<Import>> {
        self.require("import")?;
        let r#static = self.accept("static");
        let mut imports = Vec::new();
        loop {
            let (name, wildcard) = self.parse_import_name()?;
            imports.push(Import {
                name,
                r#static,
                wildcard,
            });
            if !self.accept(",") {
                break;
            }
            if self.end_after_comma(";", self.features.trailing_other_commas)? {
                break;
            }
        }
        self.require(";")?;
        Ok(imports)
    }

    /// `a.b.C` or `a.b.*`.
    fn parse_import_name(&mut self) -> ParseResult<(QualName, bool)> {
        let mut name = QualName(vec![self.identifier()?]);
        loop {
            if self.check_pair(".", "*") {
                self.advance();
                self.advance();
                return Ok((name, true));
            }
            if self.check_pair(".", TokenKind::Name) {
                self.advance();
                name.push(self.advance().lexeme);
            } else {
                return Ok((name, false));
            }
        }
    }

    fn parse_from_import_declarations(&mut self) -> ParseResult<Vec<Import>> {
        self.require("from")?;
        if self.check_pair("java", "++") {
            self.advance();
            self.advance();
            self.parse_feature_directive()?;
            return Ok(Vec::new());
        }

        let base = self.qual_name()?;
        self.require("import")?;
        let r#static = self.accept("static");
        let mut imports = Vec::new();
        loop {
            let (name, wildcard) = self.parse_from_import_name(&base)?;
            imports.push(Import {
                name,
                r#static,
                wildcard,
            });
            if !self.accept(",") {
                break;
            }
            if self.end_after_comma(";", self.features.trailing_other_commas)? {
                break;
            }
        }
        self.require(";")?;
        Ok(imports)
    }

    fn parse_from_import_name(&mut self, base: &QualName) -> ParseResult<(QualName, bool)> {
        if self.accept("*") {
            return Ok((base.clone(), true));
        }
        let (rest, wildcard) = self.parse_import_name()?;
        Ok((base.joined(&rest), wildcard))
    }

    /// `from java++ [.ns] import|unimport (* | feature, ...) ;` — mutates
    /// the feature registry instead of emitting imports.
    fn parse_feature_directive(&mut self) -> ParseResult<()> {
        let mut prefix = String::new();
        if self.check_pair(".", TokenKind::Name) {
            self.advance();
            prefix = self.advance().lexeme;
            while self.check_pair(".", TokenKind::Name) {
                self.advance();
                prefix.push('.');
                prefix.push_str(&self.advance().lexeme);
            }
        }
        let enable = if self.accept("import") {
            true
        } else {
            self.require("unimport")?;
            false
        };
        if self.accept("*") {
            let name = qualify(&prefix, "*");
            self.set_feature_at(&name, enable, self.current_span())?;
        } else {
            loop {
                let span = self.current_span();
                let name = qualify(&prefix, &self.parse_feature_name()?);
                self.set_feature_at(&name, enable, span)?;
                if !self.accept(",") {
                    break;
                }
                if self.end_after_comma(";", self.features.trailing_other_commas)? {
                    break;
                }
            }
        }
        self.require(";")?;
        Ok(())
    }

    /// `unimport java++.feature, other.feature ;` — shorthand for
    /// `from java++ unimport ...`.
    fn parse_unimport_directive(&mut self) -> ParseResult<()> {
        self.require("unimport")?;
        self.require("java")?;
        self.require("++")?;
        self.require(".")?;
        if self.accept("*") {
            self.set_feature_at("*", false, self.current_span())?;
        } else {
            loop {
                let span = self.current_span();
                let name = self.parse_feature_name()?;
                self.set_feature_at(&name, false, span)?;
                if !self.accept(",") {
                    break;
                }
                if self.end_after_comma(";", self.features.trailing_other_commas)? {
                    break;
                }
            }
        }
        self.require(";")?;
        Ok(())
    }

    /// A dotted feature name, possibly ending in `.*`.
    fn parse_feature_name(&mut self) -> ParseResult<String> {
        let mut name = self.identifier()?;
        loop {
            if self.check_pair(".", "*") {
                self.advance();
                self.advance();
                name.push_str(".*");
                return Ok(name);
            }
            if self.check_pair(".", TokenKind::Name) {
                self.advance();
                name.push('.');
                name.push_str(&self.advance().lexeme);
            } else {
                return Ok(name);
            }
        }
    }

    fn set_feature_at(
        &mut self,
        name: &str,
        enable: bool,
        span: crate::token::Span,
    ) -> ParseResult<()> {
        self.features
            .set(name, enable)
            .map_err(|err| SyntaxError::new(SyntaxErrorKind::UnknownFeature { name: err.name }, span))
    }

    /// Synthesize auto-imports not covered by any existing or just-parsed
    /// import, sorted (static, wildcard, name). User imports always win a
    /// collision; a wildcard package import suppresses the whole package; a
    /// static wildcard import suppresses every member of its host type.
    fn synthesize_auto_imports(&self, existing: &[Import], user: &[Import]) -> Vec<Import> {
        if !self.features.auto_import_types && !self.features.auto_import_statics {
            return Vec::new();
        }

        let mut wildcard_pkgs: FxHashSet<String> = FxHashSet::default();
        let mut exact_types: FxHashSet<String> = FxHashSet::default();
        let mut static_wildcards: FxHashSet<(String, String)> = FxHashSet::default();
        let mut static_names: FxHashSet<String> = FxHashSet::default();
        for import in existing.iter().chain(user) {
            if import.r#static {
                if import.wildcard {
                    static_wildcards.insert((
                        import.imported_package(),
                        import.imported_type().unwrap_or_default().to_string(),
                    ));
                } else if let Some(name) = import.imported_name() {
                    static_names.insert(name.to_string());
                }
            } else if import.wildcard {
                wildcard_pkgs.insert(import.imported_package());
            } else if let Some(name) = import.imported_type() {
                exact_types.insert(name.to_string());
            }
        }

        let mut auto = Vec::new();
        if self.features.auto_import_types {
            for (package, types) in AUTO_IMPORTS {
                if types.len() == 1 && types[0] == "*" {
                    if !wildcard_pkgs.contains(*package) {
                        auto.push(Import {
                            name: QualName::from_dotted(package),
                            r#static: false,
                            wildcard: true,
                        });
                    }
                    continue;
                }
                if wildcard_pkgs.contains(*package) {
                    continue;
                }
                for type_name in *types {
                    if !exact_types.contains(*type_name) {
                        auto.push(Import::of_type(QualName::from_dotted(&format!(
                            "{}.{}",
                            package, type_name
                        ))));
                    }
                }
            }
        }
        if self.features.auto_import_statics {
            for (package, host, members) in AUTO_STATIC_IMPORTS {
                if static_wildcards.contains(&(package.to_string(), host.to_string())) {
                    continue;
                }
                for member in *members {
                    if !static_names.contains(*member) {
                        auto.push(Import {
                            name: QualName::from_dotted(&format!(
                                "{}.{}.{}",
                                package, host, member
                            )),
                            r#static: true,
                            wildcard: false,
                        });
                    }
                }
            }
        }

        auto.sort_by_key(|import| {
            (
                !import.r#static,
                !import.wildcard,
                import.name.to_string(),
            )
        });
        auto
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
