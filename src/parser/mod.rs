//! The recursive-descent parser.
//!
//! One `Parser` serves both dialects: every extended production consults the
//! feature registry at its decision point, so parsing with every feature off
//! is exactly the base-Java grammar. Productions are grouped into traits by
//! family (declarations, imports, statements, expressions, types), each
//! implemented on `Parser` in its own module.
//!
//! Speculation is transactional: [`Parser::try_parse`] snapshots the cursor
//! position and the pre-statement buffer length, and restores both when the
//! attempted production fails. Savepoints nest; an inner abort never
//! disturbs an outer region, and the cursor never advances past the
//! `EndMarker`.

mod decl;
mod expr;
mod imports;
mod stmt;
mod types;

#[cfg(test)]
mod tests;

pub use decl::DeclarationParsing;
pub use expr::ExpressionParsing;
pub use imports::ImportParsing;
pub use stmt::StatementParsing;
pub use types::TypeParsing;

use crate::ast::{QualName, Statement};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::features::Features;
use crate::token::{Span, Token, TokenKind};

pub type ParseResult<T> = Result<T, SyntaxError>;

/// A pattern the cursor can match a token against: a lexeme, a kind tag, or
/// a list of alternative lexemes.
pub trait TokenPattern: Copy {
    fn matches(&self, token: &Token) -> bool;
    fn expected(&self) -> String;
}

impl TokenPattern for &str {
    fn matches(&self, token: &Token) -> bool {
        token.kind != TokenKind::EndMarker && token.lexeme == *self
    }

    fn expected(&self) -> String {
        format!("'{}'", self)
    }
}

impl TokenPattern for TokenKind {
    fn matches(&self, token: &Token) -> bool {
        token.kind == *self
    }

    fn expected(&self) -> String {
        match self {
            TokenKind::Name => "an identifier".to_string(),
            TokenKind::Keyword => "a keyword".to_string(),
            TokenKind::Number => "a number".to_string(),
            TokenKind::Str => "a string literal".to_string(),
            TokenKind::Regex => "a regex literal".to_string(),
            TokenKind::Op => "an operator".to_string(),
            TokenKind::EndMarker => "end of input".to_string(),
        }
    }
}

impl TokenPattern for &[&str] {
    fn matches(&self, token: &Token) -> bool {
        token.kind != TokenKind::EndMarker && self.iter().any(|lexeme| token.lexeme == *lexeme)
    }

    fn expected(&self) -> String {
        let alternatives: Vec<String> = self.iter().map(|l| format!("'{}'", l)).collect();
        alternatives.join(" or ")
    }
}

impl<const N: usize> TokenPattern for [&str; N] {
    fn matches(&self, token: &Token) -> bool {
        self.as_slice().matches(token)
    }

    fn expected(&self) -> String {
        self.as_slice().expected()
    }
}

#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    pre_stmts_len: usize,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pub features: Features,
    /// Statements hoisted by a desugaring (vardecl-in-condition), spliced in
    /// front of the statement being parsed at the statement boundary.
    pre_stmts: Vec<Statement>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, features: Features) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(token) if token.kind == TokenKind::EndMarker
        ));
        Parser {
            tokens,
            pos: 0,
            features,
            pre_stmts: Vec::new(),
        }
    }

    // ── Cursor ─────────────────────────────────────────────────────────

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_at(&self, ahead: usize) -> &Token {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndMarker
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    pub fn check<P: TokenPattern>(&self, pattern: P) -> bool {
        pattern.matches(self.peek())
    }

    pub fn check_at<P: TokenPattern>(&self, ahead: usize, pattern: P) -> bool {
        pattern.matches(self.peek_at(ahead))
    }

    /// `would_accept(a, b)`: the next two tokens match in order, nothing is
    /// consumed.
    pub fn check_pair<A: TokenPattern, B: TokenPattern>(&self, first: A, second: B) -> bool {
        first.matches(self.peek()) && second.matches(self.peek_at(1))
    }

    /// Consume the next token iff it matches.
    pub fn accept<P: TokenPattern>(&mut self, pattern: P) -> bool {
        if self.check(pattern) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume two tokens iff both match in order.
    pub fn accept_pair<A: TokenPattern, B: TokenPattern>(&mut self, first: A, second: B) -> bool {
        if self.check_pair(first, second) {
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume and return the next token, or fail with a syntax error naming
    /// what was expected.
    pub fn require<P: TokenPattern>(&mut self, pattern: P) -> ParseResult<Token> {
        if self.check(pattern) {
            Ok(self.advance())
        } else {
            Err(self.expected(&pattern.expected()))
        }
    }

    /// Two adjacent tokens with no whitespace between them (`>` `>` forming
    /// a shift, `is` `!` forming the negated equality word).
    pub fn adjacent(&self, ahead: usize) -> bool {
        self.peek_at(ahead).span.start == self.peek_at(ahead.wrapping_sub(1)).span.end
    }

    pub fn current_span(&self) -> Span {
        self.peek().span
    }

    // ── Savepoints ─────────────────────────────────────────────────────

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            pre_stmts_len: self.pre_stmts.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.pre_stmts.truncate(checkpoint.pre_stmts_len);
    }

    /// Run a speculative parse. On `Err` the cursor and the pre-statement
    /// buffer are rewound to the entry snapshot and `None` is returned.
    pub fn try_parse<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> Option<T> {
        let checkpoint = self.checkpoint();
        match op(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(checkpoint);
                None
            }
        }
    }

    // ── Pre-statement buffer ───────────────────────────────────────────

    pub(crate) fn push_pre_statement(&mut self, stmt: Statement) {
        self.pre_stmts.push(stmt);
    }

    pub(crate) fn pre_statement_mark(&self) -> usize {
        self.pre_stmts.len()
    }

    pub(crate) fn drain_pre_statements(&mut self, mark: usize) -> Vec<Statement> {
        self.pre_stmts.split_off(mark)
    }

    // ── Shared small productions ───────────────────────────────────────

    /// Any `Name` token; contextual words are valid identifiers.
    pub fn identifier(&mut self) -> ParseResult<String> {
        if self.check(TokenKind::Name) {
            Ok(self.advance().lexeme)
        } else {
            Err(self.error(SyntaxErrorKind::ExpectedIdentifier { found: self.found() }))
        }
    }

    /// `a.b.c` — consumes a dot only when an identifier follows it.
    pub fn qual_name(&mut self) -> ParseResult<QualName> {
        let mut name = QualName(vec![self.identifier()?]);
        while self.check_pair(".", TokenKind::Name) {
            self.advance();
            name.push(self.advance().lexeme);
        }
        Ok(name)
    }

    /// The doc comment attached to the next token, if any.
    pub fn pending_doc(&self) -> Option<String> {
        self.peek().doc.clone()
    }

    // ── Trailing commas ────────────────────────────────────────────────

    /// Called right after a comma in an argument-like list. If the closer is
    /// next, either the list ends (flag on) or the comma is an error.
    pub fn end_after_comma<P: TokenPattern>(
        &mut self,
        closer: P,
        allowed: bool,
    ) -> ParseResult<bool> {
        if self.check(closer) {
            if allowed {
                Ok(true)
            } else {
                Err(self.error(SyntaxErrorKind::TrailingComma))
            }
        } else {
            Ok(false)
        }
    }

    // ── Errors ─────────────────────────────────────────────────────────

    pub fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.current_span())
    }

    pub fn expected(&self, what: &str) -> SyntaxError {
        self.error(SyntaxErrorKind::UnexpectedToken {
            expected: what.to_string(),
            found: self.found(),
        })
    }

    /// Describe the current token for an error message.
    pub fn found(&self) -> String {
        let token = self.peek();
        if token.kind == TokenKind::EndMarker {
            "end of input".to_string()
        } else {
            format!("'{}'", token.lexeme)
        }
    }
}
