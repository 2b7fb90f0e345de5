//! Tokenizer for Java and Java++ source text.
//!
//! A single pass over the raw bytes producing a `Vec<Token>` terminated by
//! `EndMarker`. Whitespace and comments are skipped, except that a `/** */`
//! comment is attached to the token that follows it as documentation.
//!
//! Two departures from a plain Java scanner matter downstream:
//!
//! * `>` is always emitted as a single token. Shift operators and
//!   shift-assignments are merged by the expression grammar from adjacent
//!   `>`/`>=` tokens, which keeps nested generic closers unambiguous and
//!   token positions stable under speculative rollback.
//! * `/.../` lexes as a `Regex` token whenever the previous significant
//!   token cannot end an operand; otherwise `/` is division.

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{is_keyword, Span, Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    pending_doc: Option<String>,
    /// Previous significant token, for the regex-position rule.
    prev: Option<(TokenKind, String)>,
}

/// Multi-character operators, longest first. `>`-led compounds are absent
/// on purpose (see the module docs); `?:` is the elvis operator.
const OPERATORS: &[&str] = &[
    "<<=", "...", "->", "::", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "<<", "+=", "-=",
    "*=", "/=", "&=", "|=", "^=", "%=", "?:",
];

const SINGLE_OPS: &[u8] = b"+-*/%&|^!~=<>?:;,.()[]{}@";

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            pending_doc: None,
            prev: None,
        }
    }

    /// Tokenize the whole input. The result always ends with `EndMarker`.
    pub fn tokenize(source: &'a str) -> Result<Vec<Token>, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(mut token) = lexer.next_token()? {
            token.doc = lexer.pending_doc.take();
            lexer.prev = Some((token.kind, token.lexeme.clone()));
            tokens.push(token);
        }
        let mut end = Token::end_marker(source.len());
        end.doc = lexer.pending_doc.take();
        tokens.push(end);
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_trivia()?;
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }

        let start = self.pos;
        let c = self.bytes[self.pos];

        if c == b'"' || c == b'\'' {
            return self.scan_string(start, c).map(Some);
        }
        if c.is_ascii_digit() || (c == b'.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()))
        {
            return Ok(Some(self.scan_number(start)));
        }
        if is_ident_start(self.char_at(self.pos)) {
            return self.scan_word(start).map(Some);
        }
        if c == b'/' && self.regex_position() {
            return self.scan_regex(start).map(Some);
        }
        self.scan_operator(start).map(Some)
    }

    // ── Trivia ─────────────────────────────────────────────────────────

    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.starts_with("//") {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            if self.starts_with("/*") {
                let start = self.pos;
                let is_doc = self.starts_with("/**") && !self.starts_with("/**/");
                self.pos += 2;
                loop {
                    if self.pos + 1 >= self.bytes.len() {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::UnterminatedLiteral { what: "comment" },
                            Span::new(start, self.bytes.len()),
                        ));
                    }
                    if self.starts_with("*/") {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                if is_doc {
                    self.pending_doc = Some(self.source[start..self.pos].to_string());
                }
                continue;
            }
            return Ok(());
        }
    }

    // ── Scanners ───────────────────────────────────────────────────────

    fn scan_word(&mut self, start: usize) -> Result<Token, SyntaxError> {
        while self.pos < self.bytes.len() && is_ident_part(self.char_at(self.pos)) {
            self.pos += self.char_at(self.pos).map(char::len_utf8).unwrap_or(1);
        }
        let word = self.source[start..self.pos].to_string();

        // A byte-string prefix: `b"..."` / `B"..."`.
        if (word == "b" || word == "B") && self.peek_byte(0) == Some(b'"') {
            let string = self.scan_string(self.pos, b'"')?;
            let lexeme = format!("{}{}", word, string.lexeme);
            return Ok(Token::new(
                TokenKind::Str,
                lexeme,
                Span::new(start, string.span.end),
            ));
        }

        let kind = if is_keyword(&word) {
            TokenKind::Keyword
        } else {
            TokenKind::Name
        };
        Ok(Token::new(kind, word, Span::new(start, self.pos)))
    }

    fn scan_number(&mut self, start: usize) -> Token {
        if self.starts_with("0x") || self.starts_with("0X") || self.starts_with("0b")
            || self.starts_with("0B")
        {
            self.pos += 2;
            while self.pos < self.bytes.len()
                && (self.bytes[self.pos].is_ascii_hexdigit() || self.bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.peek_byte(0).is_some_and(|b| b == b'l' || b == b'L') {
                self.pos += 1;
            }
            return Token::new(
                TokenKind::Number,
                &self.source[start..self.pos],
                Span::new(start, self.pos),
            );
        }

        self.eat_digits();
        if self.peek_byte(0) == Some(b'.') && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
            self.eat_digits();
        }
        if self.peek_byte(0).is_some_and(|b| b == b'e' || b == b'E') {
            let mark = self.pos;
            self.pos += 1;
            if self.peek_byte(0).is_some_and(|b| b == b'+' || b == b'-') {
                self.pos += 1;
            }
            if self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
                self.eat_digits();
            } else {
                self.pos = mark;
            }
        }
        if self
            .peek_byte(0)
            .is_some_and(|b| matches!(b, b'l' | b'L' | b'f' | b'F' | b'd' | b'D'))
        {
            self.pos += 1;
        }
        Token::new(
            TokenKind::Number,
            &self.source[start..self.pos],
            Span::new(start, self.pos),
        )
    }

    fn eat_digits(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_digit() || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, start: usize, quote: u8) -> Result<Token, SyntaxError> {
        let what = if quote == b'"' {
            "string literal"
        } else {
            "character literal"
        };
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(Token::new(
                        TokenKind::Str,
                        &self.source[start..self.pos],
                        Span::new(start, self.pos),
                    ));
                }
                _ => self.pos += 1,
            }
        }
        Err(SyntaxError::new(
            SyntaxErrorKind::UnterminatedLiteral { what },
            Span::new(start, self.pos.min(self.bytes.len())),
        ))
    }

    fn scan_regex(&mut self, start: usize) -> Result<Token, SyntaxError> {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => break,
                b'/' => {
                    self.pos += 1;
                    return Ok(Token::new(
                        TokenKind::Regex,
                        &self.source[start..self.pos],
                        Span::new(start, self.pos),
                    ));
                }
                _ => self.pos += 1,
            }
        }
        Err(SyntaxError::new(
            SyntaxErrorKind::UnterminatedLiteral {
                what: "regex literal",
            },
            Span::new(start, self.pos.min(self.bytes.len())),
        ))
    }

    fn scan_operator(&mut self, start: usize) -> Result<Token, SyntaxError> {
        for op in OPERATORS {
            if self.starts_with(op) {
                self.pos += op.len();
                return Ok(Token::new(TokenKind::Op, *op, Span::new(start, self.pos)));
            }
        }
        let c = self.bytes[self.pos];
        if SINGLE_OPS.contains(&c) {
            self.pos += 1;
            return Ok(Token::new(
                TokenKind::Op,
                &self.source[start..self.pos],
                Span::new(start, self.pos),
            ));
        }
        Err(SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken {
                expected: "a token".into(),
                found: format!("'{}'", self.char_at(self.pos).unwrap_or('?')),
            },
            Span::new(start, start + 1),
        ))
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// True when a `/` here opens a regex literal: the previous significant
    /// token cannot end an operand.
    fn regex_position(&self) -> bool {
        if self.starts_with("//") || self.starts_with("/*") || self.starts_with("/=") {
            return false;
        }
        match &self.prev {
            None => true,
            Some((kind, lexeme)) => match kind {
                TokenKind::Name | TokenKind::Number | TokenKind::Str | TokenKind::Regex => false,
                TokenKind::Keyword => {
                    !matches!(lexeme.as_str(), "this" | "super" | "class" | "true" | "false" | "null")
                }
                TokenKind::Op => !matches!(lexeme.as_str(), ")" | "]" | "}" | "++" | "--"),
                TokenKind::EndMarker => false,
            },
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.source[pos..].chars().next()
    }
}

fn is_ident_start(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_alphabetic() || c == '_' || c == '$')
}

fn is_ident_part(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexemes(source: &str) -> Vec<String> {
        Lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.lexeme)
            .collect()
    }

    #[test]
    fn words_split_into_keywords_and_names() {
        let tokens = Lexer::tokenize("class Foo extends var").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[2].kind, TokenKind::Keyword);
        assert_eq!(tokens[3].kind, TokenKind::Name);
        assert_eq!(tokens[4].kind, TokenKind::EndMarker);
    }

    #[test]
    fn greater_than_is_never_merged() {
        assert_eq!(lexemes("a >> b"), vec!["a", ">", ">", "b", ""]);
    }

    #[test]
    fn shift_assign_lexes_as_gt_then_ge() {
        assert_eq!(lexemes("a >>= b"), vec!["a", ">", ">=", "b", ""]);
    }

    #[test]
    fn regex_only_in_expression_position() {
        let tokens = Lexer::tokenize("x = /a+b/;").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Regex);
        assert_eq!(tokens[2].lexeme, "/a+b/");

        let tokens = Lexer::tokenize("x = a / b;").unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Op);
        assert_eq!(tokens[3].lexeme, "/");
    }

    #[test]
    fn byte_string_keeps_prefix() {
        let tokens = Lexer::tokenize(r#"b"ab""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].lexeme, r#"b"ab""#);
    }

    #[test]
    fn doc_comment_attaches_to_next_token() {
        let tokens = Lexer::tokenize("/** doc */ class A {}").unwrap();
        assert_eq!(tokens[0].lexeme, "class");
        assert_eq!(tokens[0].doc.as_deref(), Some("/** doc */"));
        assert_eq!(tokens[1].doc, None);
    }

    #[test]
    fn numbers_keep_their_suffixes() {
        assert_eq!(
            lexemes("1 2.5f 0x1F 10L 1_000 .5"),
            vec!["1", "2.5f", "0x1F", "10L", "1_000", ".5", ""]
        );
    }

    #[test]
    fn elvis_lexes_as_one_token() {
        assert_eq!(lexemes("a ?: b"), vec!["a", "?:", "b", ""]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::tokenize("\"abc").is_err());
    }
}
