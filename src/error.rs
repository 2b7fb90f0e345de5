//! Syntax errors with source-context rendering.
//!
//! A single error kind is surfaced to callers: [`SyntaxError`], carrying a
//! category and the source span it was raised at. Speculative parse regions
//! catch and rewind; every other error bubbles to the compilation-unit entry
//! point unchanged.

use std::fmt;

use crate::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    UnexpectedToken {
        expected: String,
        found: String,
    },
    ExpectedExpression {
        found: String,
    },
    ExpectedType {
        found: String,
    },
    ExpectedIdentifier {
        found: String,
    },
    ExpectedDeclaration {
        found: String,
    },
    /// A `java++` directive named a feature outside the recognised set.
    UnknownFeature {
        name: String,
    },
    /// A trailing comma appeared while the governing flag is disabled.
    TrailingComma,
    MalformedImport {
        detail: String,
    },
    /// A parameter without a default followed one with a default.
    DefaultParameterRequired {
        name: String,
    },
    UnterminatedLiteral {
        what: &'static str,
    },
    InvalidEscape {
        escape: String,
    },
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            SyntaxErrorKind::ExpectedExpression { found } => {
                write!(f, "expected an expression, found {}", found)
            }
            SyntaxErrorKind::ExpectedType { found } => {
                write!(f, "expected a type, found {}", found)
            }
            SyntaxErrorKind::ExpectedIdentifier { found } => {
                write!(f, "expected an identifier, found {}", found)
            }
            SyntaxErrorKind::ExpectedDeclaration { found } => {
                write!(f, "expected a declaration, found {}", found)
            }
            SyntaxErrorKind::UnknownFeature { name } => {
                write!(f, "unsupported feature '{}'", name)
            }
            SyntaxErrorKind::TrailingComma => {
                write!(f, "trailing comma is not enabled here")
            }
            SyntaxErrorKind::MalformedImport { detail } => {
                write!(f, "malformed import: {}", detail)
            }
            SyntaxErrorKind::DefaultParameterRequired { name } => {
                write!(
                    f,
                    "parameter '{}' must declare a default value because an earlier parameter does",
                    name
                )
            }
            SyntaxErrorKind::UnterminatedLiteral { what } => {
                write!(f, "unterminated {}", what)
            }
            SyntaxErrorKind::InvalidEscape { escape } => {
                write!(f, "invalid escape sequence '{}'", escape)
            }
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for SyntaxError {}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }

    /// Render the error with the offending source line and a caret underline,
    /// prefixed with `filename:line:col`.
    pub fn display_with_source(&self, filename: &str, source: &str) -> String {
        let (line_num, line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end.saturating_sub(self.span.start)).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let header = format!(
            "{}: {} at {}:{}:{}",
            bold_red("error"),
            self.kind,
            filename,
            line_num,
            col + 1
        );
        let line_num_str = blue(&format!("{:4}", line_num));
        let pipe = blue("|");

        format!(
            "{}\n\n{} {} {}\n     {} {}",
            header,
            line_num_str,
            pipe,
            line_content,
            pipe,
            red(&underline)
        )
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, usize, &'a str) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_num, line_start, &source[line_start..line_end])
    }
}

const RESET: &str = "\x1b[0m";

fn red(s: &str) -> String {
    format!("\x1b[31m{}{}", s, RESET)
}

fn blue(s: &str) -> String {
    format!("\x1b[34m{}{}", s, RESET)
}

fn bold_red(s: &str) -> String {
    format!("\x1b[1m\x1b[31m{}{}", s, RESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_expected_and_found() {
        let err = SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken {
                expected: "';'".into(),
                found: "'}'".into(),
            },
            Span::new(0, 1),
        );
        assert_eq!(err.to_string(), "expected ';', found '}'");
    }

    #[test]
    fn context_points_at_offending_line() {
        let source = "class A {\n    int x = ;\n}\n";
        let at = source.find(';').unwrap();
        let err = SyntaxError::new(
            SyntaxErrorKind::ExpectedExpression { found: "';'".into() },
            Span::new(at, at + 1),
        );
        let rendered = err.display_with_source("A.javapp", source);
        assert!(rendered.contains("int x = ;"));
        assert!(rendered.contains("A.javapp:2:"));
        assert!(rendered.contains('^'));
    }
}
