//! Statement grammar.
//!
//! This module owns the statement boundary: desugarings that hoist a
//! declaration (vardecl-in-condition) push it onto the parser's
//! pre-statement buffer, and the boundary wrapper splices the buffered
//! statements in front of the statement that produced them, wrapping both
//! in a block. A speculative rollback discards the buffer together with the
//! cursor position.

use super::{DeclarationParsing, ExpressionParsing, ParseResult, Parser, TypeParsing};
use crate::ast::{
    Expression, ForInit, Statement, SwitchCase, TryResource, VariableDeclaration,
    VariableDeclarator,
};
use crate::token::TokenKind;

const PRINT_WORDS: [&str; 4] = ["print", "println", "printf", "printfln"];

pub trait StatementParsing {
    /// A statement, with the pre-statement buffer flushed around it.
    fn parse_statement(&mut self) -> ParseResult<Statement>;
    /// `{ ... }` including the braces.
    fn parse_block(&mut self) -> ParseResult<Vec<Statement>>;
    /// A statement in block position: also accepts local variable and local
    /// type declarations.
    fn parse_block_statement(&mut self) -> ParseResult<Statement>;
}

impl StatementParsing for Parser {
    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let mark = self.pre_statement_mark();
        let stmt = self.parse_statement_inner()?;
        Ok(self.flush_pre_statements(mark, stmt))
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.require("{")?;
        let mut stmts = Vec::new();
        while !self.check("}") && !self.at_end() {
            stmts.push(self.parse_block_statement()?);
        }
        self.require("}")?;
        Ok(stmts)
    }

    fn parse_block_statement(&mut self) -> ParseResult<Statement> {
        let mark = self.pre_statement_mark();
        // Print-family words are statement heads while the feature is on;
        // they must not be mistaken for a type named `print`.
        let print_head = self.features.print_statements && self.check(PRINT_WORDS);
        if !print_head {
            if let Some(decl) = self.try_parse(|p| {
                let decl = p.parse_local_var_declaration()?;
                p.require(";")?;
                Ok(decl)
            }) {
                return Ok(Statement::LocalVar(decl));
            }
            if self.starts_local_type_declaration() {
                let decl = self.parse_type_declaration()?;
                return Ok(Statement::LocalType(Box::new(decl)));
            }
        }
        let stmt = self.parse_statement_inner()?;
        Ok(self.flush_pre_statements(mark, stmt))
    }
}

impl Parser {
    fn flush_pre_statements(&mut self, mark: usize, stmt: Statement) -> Statement {
        if self.pre_statement_mark() > mark {
            let mut stmts = self.drain_pre_statements(mark);
            stmts.push(stmt);
            Statement::Block(stmts)
        } else {
            stmt
        }
    }

    fn starts_local_type_declaration(&self) -> bool {
        let mut ahead = 0;
        while self.check_at(ahead, ["final", "abstract", "static", "strictfp"]) {
            ahead += 1;
        }
        self.check_at(ahead, ["class", "interface", "enum"])
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Statement> {
        if self.check("{") {
            return Ok(Statement::Block(self.parse_block()?));
        }
        if self.accept(";") {
            return Ok(Statement::Empty);
        }
        if self.accept("if") {
            let condition = self.parse_condition_clause()?;
            let then_branch = Box::new(self.parse_statement()?);
            let else_branch = if self.accept("else") {
                Some(Box::new(self.parse_statement()?))
            } else {
                None
            };
            return Ok(Statement::If {
                condition,
                then_branch,
                else_branch,
            });
        }
        if self.accept("while") {
            let condition = self.parse_condition_clause()?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::While { condition, body });
        }
        if self.accept("do") {
            let body = Box::new(self.parse_statement()?);
            self.require("while")?;
            self.require("(")?;
            let condition = self.parse_expression()?;
            self.require(")")?;
            self.require(";")?;
            return Ok(Statement::DoWhile { body, condition });
        }
        if self.accept("for") {
            return self.parse_for();
        }
        if self.accept("switch") {
            return self.parse_switch();
        }
        if self.accept("return") {
            let value = if self.check(";") {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.require(";")?;
            return Ok(Statement::Return(value));
        }
        if self.accept("throw") {
            let value = self.parse_expression()?;
            self.require(";")?;
            return Ok(Statement::Throw(value));
        }
        if self.accept("break") {
            let label = if self.check(TokenKind::Name) {
                Some(self.advance().lexeme)
            } else {
                None
            };
            self.require(";")?;
            return Ok(Statement::Break(label));
        }
        if self.accept("continue") {
            let label = if self.check(TokenKind::Name) {
                Some(self.advance().lexeme)
            } else {
                None
            };
            self.require(";")?;
            return Ok(Statement::Continue(label));
        }
        if self.accept("try") {
            return self.parse_try();
        }
        if self.check_pair("synchronized", "(") {
            self.advance();
            self.require("(")?;
            let lock = self.parse_expression()?;
            self.require(")")?;
            let block = self.parse_block()?;
            return Ok(Statement::Synchronized { lock, block });
        }
        if self.accept("assert") {
            let condition = self.parse_expression()?;
            let message = if self.accept(":") {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.require(";")?;
            return Ok(Statement::Assert { condition, message });
        }
        if self.features.print_statements && self.check(PRINT_WORDS) {
            let word = self.advance().lexeme;
            return self.parse_print_statement(&word);
        }
        if self.check_pair(TokenKind::Name, ":") {
            let label = self.advance().lexeme;
            self.advance();
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::Labeled { label, body });
        }
        let expr = self.parse_expression()?;
        self.require(";")?;
        Ok(Statement::Expression(expr))
    }

    /// `( condition )` for `if`/`while`. With the vardecl feature on, the
    /// condition may open with a local declaration, which is hoisted into
    /// the pre-statement buffer: `var` declarations hoist whole and leave
    /// the bare name; typed declarations hoist uninitialised and leave the
    /// assignment. The speculation backs out cleanly on any mismatch.
    fn parse_condition_clause(&mut self) -> ParseResult<Expression> {
        self.require("(")?;
        if self.features.vardecl_expressions {
            if let Some(condition) = self.try_parse(|p| p.parse_condition_vardecl()) {
                return Ok(condition);
            }
        }
        let condition = self.parse_expression()?;
        self.require(")")?;
        Ok(condition)
    }

    fn parse_condition_vardecl(&mut self) -> ParseResult<Expression> {
        let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;
        let r#type = self.parse_type()?;
        let name = self.identifier()?;
        self.require("=")?;
        let init = self.parse_expression()?;
        self.require(")")?;

        if r#type.is_var() {
            self.push_pre_statement(Statement::LocalVar(VariableDeclaration {
                modifiers,
                annotations,
                r#type,
                declarators: vec![VariableDeclarator {
                    name: name.clone(),
                    dims: 0,
                    init: Some(init),
                }],
            }));
            Ok(Expression::Name(name))
        } else {
            self.push_pre_statement(Statement::LocalVar(VariableDeclaration {
                modifiers,
                annotations,
                r#type,
                declarators: vec![VariableDeclarator {
                    name: name.clone(),
                    dims: 0,
                    init: None,
                }],
            }));
            Ok(Expression::Assignment {
                target: Box::new(Expression::Name(name)),
                op: "=".into(),
                value: Box::new(init),
            })
        }
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.require("(")?;
        if let Some((modifiers, annotations, r#type, name, iterable)) = self.try_parse(|p| {
            let (modifiers, annotations) = p.parse_modifiers_and_annotations()?;
            let r#type = p.parse_type()?;
            let name = p.identifier()?;
            p.require(":")?;
            let iterable = p.parse_expression()?;
            p.require(")")?;
            Ok((modifiers, annotations, r#type, name, iterable))
        }) {
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::ForEach {
                modifiers,
                annotations,
                r#type,
                name,
                iterable,
                body,
            });
        }

        let init = if self.accept(";") {
            None
        } else if let Some(decl) = self.try_parse(|p| {
            let decl = p.parse_local_var_declaration()?;
            p.require(";")?;
            Ok(decl)
        }) {
            Some(ForInit::Var(decl))
        } else {
            let mut exprs = vec![self.parse_expression()?];
            while self.accept(",") {
                exprs.push(self.parse_expression()?);
            }
            self.require(";")?;
            Some(ForInit::Exprs(exprs))
        };

        let condition = if self.check(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.require(";")?;

        let mut update = Vec::new();
        if !self.check(")") {
            update.push(self.parse_expression()?);
            while self.accept(",") {
                update.push(self.parse_expression()?);
            }
        }
        self.require(")")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn parse_switch(&mut self) -> ParseResult<Statement> {
        self.require("(")?;
        let selector = self.parse_expression()?;
        self.require(")")?;
        self.require("{")?;
        let mut cases = Vec::new();
        while !self.check("}") && !self.at_end() {
            let case = if self.accept("case") {
                let mut labels = vec![self.parse_expression()?];
                while self.accept(",") {
                    if self.end_after_comma(":", self.features.trailing_other_commas)? {
                        break;
                    }
                    labels.push(self.parse_expression()?);
                }
                self.require(":")?;
                SwitchCase {
                    labels,
                    is_default: false,
                    body: Vec::new(),
                }
            } else {
                self.require("default")?;
                self.require(":")?;
                SwitchCase {
                    labels: Vec::new(),
                    is_default: true,
                    body: Vec::new(),
                }
            };
            let mut case = case;
            while !self.check("}") && !self.check("case") && !self.check("default") && !self.at_end()
            {
                case.body.push(self.parse_block_statement()?);
            }
            cases.push(case);
        }
        self.require("}")?;
        Ok(Statement::Switch { selector, cases })
    }

    fn parse_try(&mut self) -> ParseResult<Statement> {
        let mut resources = Vec::new();
        if self.accept("(") {
            loop {
                if let Some(decl) = self.try_parse(|p| p.parse_local_var_declaration()) {
                    resources.push(TryResource::Var(decl));
                } else {
                    resources.push(TryResource::Expr(self.parse_expression()?));
                }
                if !self.accept(";") || self.check(")") {
                    break;
                }
            }
            self.require(")")?;
        }
        let block = self.parse_block()?;
        let mut catches = Vec::new();
        while self.accept("catch") {
            catches.push(self.parse_catch_clause()?);
        }
        let finally = if self.accept("finally") {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Statement::Try {
            resources,
            block,
            catches,
            finally,
        })
    }

    fn parse_catch_clause(&mut self) -> ParseResult<crate::ast::CatchClause> {
        self.require("(")?;
        let (modifiers, _annotations) = self.parse_modifiers_and_annotations()?;
        let mut types = vec![self.parse_type()?];
        while self.accept("|") {
            types.push(self.parse_type()?);
        }
        let name = self.identifier()?;
        self.require(")")?;
        let block = self.parse_block()?;
        Ok(crate::ast::CatchClause {
            modifiers,
            types,
            name,
            block,
        })
    }

    /// A local declaration without its terminator: `final int x = 1, y[]`.
    /// Fails before consuming a declarator if the head does not look like a
    /// declaration, so speculative callers back out cheaply.
    pub(super) fn parse_local_var_declaration(&mut self) -> ParseResult<VariableDeclaration> {
        let (modifiers, annotations) = self.parse_modifiers_and_annotations()?;
        let r#type = self.parse_type()?;
        if !self.check(TokenKind::Name) {
            return Err(self.expected("a variable name"));
        }
        let declarators = self.parse_declarators()?;
        Ok(VariableDeclaration {
            modifiers,
            annotations,
            r#type,
            declarators,
        })
    }

    pub(super) fn parse_declarators(&mut self) -> ParseResult<Vec<VariableDeclarator>> {
        let mut declarators = Vec::new();
        loop {
            let name = self.identifier()?;
            let dims = self.parse_dims();
            let init = if self.accept("=") {
                Some(self.parse_variable_initializer()?)
            } else {
                None
            };
            declarators.push(VariableDeclarator { name, dims, init });
            if !self.accept(",") {
                break;
            }
            if self.end_after_comma(";", self.features.trailing_other_commas)? {
                break;
            }
        }
        Ok(declarators)
    }

    // ── Print family ───────────────────────────────────────────────────

    /// `print`/`println` statements expand to `System.out` calls, with `' '`
    /// separators between multiple elements; `printf`/`printfln` forward to
    /// `System.out.printf`, the latter appending `"%n"` to the format.
    fn parse_print_statement(&mut self, word: &str) -> ParseResult<Statement> {
        if word == "print" || word == "println" {
            if self.accept(";") {
                return Ok(if word == "println" {
                    make_print_call("println", None)
                } else {
                    Statement::Empty
                });
            }
            let elements = self.parse_print_elements()?;
            if elements.len() == 1 {
                let mut elements = elements;
                return Ok(make_print_call(word, Some(elements.pop().unwrap())));
            }
            let last = elements.len() - 1;
            let mut stmts = Vec::new();
            for (i, element) in elements.into_iter().enumerate() {
                if i > 0 {
                    stmts.push(make_print_call("print", Some(Expression::literal("' '"))));
                }
                let name = if i == last && word == "println" {
                    "println"
                } else {
                    "print"
                };
                stmts.push(make_print_call(name, Some(element)));
            }
            return Ok(Statement::Block(stmts));
        }

        // printf / printfln
        let mut args = vec![self.parse_arg()?];
        if word == "printfln" {
            let format = args.pop().unwrap();
            args.push(Expression::Binary {
                op: "+".into(),
                lhs: Box::new(format),
                rhs: Box::new(Expression::literal("\"%n\"")),
            });
        }
        args.extend(self.parse_print_rest()?);
        self.require(";")?;
        Ok(Statement::Expression(Expression::dotted_call(
            "System.out",
            "printf",
            args,
        )))
    }

    /// Elements of a `print`/`println`: either a comma-separated list or a
    /// whitespace-separated sequence, terminated by `;`.
    fn parse_print_elements(&mut self) -> ParseResult<Vec<Expression>> {
        let mut elements = vec![self.parse_arg()?];
        elements.extend(self.parse_print_rest()?);
        self.require(";")?;
        Ok(elements)
    }

    fn parse_print_rest(&mut self) -> ParseResult<Vec<Expression>> {
        let mut rest = Vec::new();
        if self.check(",") {
            while self.accept(",") {
                if self.features.trailing_other_commas && self.check(";") {
                    break;
                }
                rest.push(self.parse_arg()?);
            }
        } else if !self.check(";") {
            while !self.check(";") && !self.at_end() {
                rest.push(self.parse_arg()?);
            }
        }
        Ok(rest)
    }
}

fn make_print_call(name: &str, arg: Option<Expression>) -> Statement {
    let args = arg.into_iter().collect();
    Statement::Expression(Expression::dotted_call("System.out", name, args))
}
