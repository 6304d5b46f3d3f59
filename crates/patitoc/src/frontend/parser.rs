//! Recursive descent parser for Patito
//!
//! The parser builds no tree. Every construct is handed to the
//! [`SemanticAnalyzer`] as soon as it is recognized, and expression types
//! come back as the synthesized attribute of each production.

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::sema::{Analysis, FatalError, GLOBAL, SemanticAnalyzer};
use crate::types::{ExprType, ReturnType, Type, UnaryOp};

/// Name under which the `main` block is registered
pub const MAIN: &str = "main";

/// Recursive descent parser driving a semantic analyzer
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    analyzer: SemanticAnalyzer,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            analyzer: SemanticAnalyzer::new(),
        })
    }

    /// Parse a complete program and finish the analysis pass
    pub fn parse(mut self) -> CompileResult<Analysis> {
        self.parse_program()?;
        let end = self.current.span;
        self.analyzer.finish().map_err(|e| CompileError::fatal(e, end))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        if let TokenKind::Identifier(_) = self.current.kind {
            let token = self.advance()?;
            if let TokenKind::Identifier(name) = token.kind {
                return Ok((name, token.span));
            }
        }
        Err(self.unexpected("identifier"))
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::parser(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    fn fatal<T>(result: Result<T, FatalError>, span: Span) -> CompileResult<T> {
        result.map_err(|e| CompileError::fatal(e, span))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_program(&mut self) -> CompileResult<()> {
        let start = self.expect(TokenKind::Program)?.span;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(TokenKind::Semi)?;
        log::debug!("parsing program '{name}'");

        let header = start.merge(name_span);
        self.analyzer.locate(header);
        Self::fatal(self.analyzer.on_function_start(GLOBAL, ReturnType::Void), header)?;

        if self.check(&TokenKind::Vars) {
            self.parse_vars()?;
        }

        while !self.check(&TokenKind::Main) && !self.at_end() {
            self.parse_function()?;
        }

        let main = self.expect(TokenKind::Main)?.span;
        self.analyzer.locate(main);
        Self::fatal(self.analyzer.on_function_start(MAIN, ReturnType::Void), main)?;
        self.parse_body()?;
        Self::fatal(self.analyzer.on_function_end(), self.current.span)?;

        self.expect(TokenKind::End)?;
        self.expect(TokenKind::Eof)?;
        Ok(())
    }

    /// `vars` followed by one or more `a, b : type ;` groups
    fn parse_vars(&mut self) -> CompileResult<()> {
        self.expect(TokenKind::Vars)?;

        loop {
            let mut names = vec![self.expect_identifier()?];
            while self.match_token(&TokenKind::Comma)? {
                names.push(self.expect_identifier()?);
            }
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            self.expect(TokenKind::Semi)?;

            for (name, span) in names {
                self.analyzer.locate(span);
                self.analyzer.on_variable_declared(&name, ty);
            }

            if !matches!(self.current.kind, TokenKind::Identifier(_)) {
                return Ok(());
            }
        }
    }

    fn parse_type(&mut self) -> CompileResult<Type> {
        match self.current.kind.as_type() {
            Some(ty) => {
                self.advance()?;
                Ok(ty)
            }
            None => Err(self.unexpected("'int' or 'float'")),
        }
    }

    fn parse_return_type(&mut self) -> CompileResult<ReturnType> {
        if self.match_token(&TokenKind::Void)? {
            Ok(ReturnType::Void)
        } else {
            Ok(self.parse_type()?.into())
        }
    }

    /// `type id ( params ) [ vars? body ] ;`
    fn parse_function(&mut self) -> CompileResult<()> {
        let return_type = self.parse_return_type()?;
        let (name, name_span) = self.expect_identifier()?;

        self.analyzer.locate(name_span);
        Self::fatal(self.analyzer.on_function_start(&name, return_type), name_span)?;

        self.expect(TokenKind::LParen)?;
        if !self.check(&TokenKind::RParen) {
            loop {
                let (param, span) = self.expect_identifier()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                self.analyzer.locate(span);
                Self::fatal(self.analyzer.on_param_declared(Some(&param), ty), span)?;
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::LBracket)?;
        if self.check(&TokenKind::Vars) {
            self.parse_vars()?;
        }
        self.parse_body()?;
        let close = self.expect(TokenKind::RBracket)?.span;
        self.expect(TokenKind::Semi)?;

        Self::fatal(self.analyzer.on_function_end(), close)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_body(&mut self) -> CompileResult<()> {
        self.expect(TokenKind::LBrace)?;
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            self.parse_statement()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_statement(&mut self) -> CompileResult<()> {
        match self.current.kind {
            TokenKind::Identifier(_) => {
                let (name, span) = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    self.parse_call(&name, span)?;
                } else {
                    self.parse_assignment(&name, span)?;
                }
                self.expect(TokenKind::Semi)?;
            }
            TokenKind::If => {
                self.advance()?;
                self.parse_condition()?;
                self.parse_body()?;
                if self.match_token(&TokenKind::Else)? {
                    self.parse_body()?;
                }
                self.expect(TokenKind::Semi)?;
            }
            TokenKind::While => {
                self.advance()?;
                self.parse_condition()?;
                self.expect(TokenKind::Do)?;
                self.parse_body()?;
                self.expect(TokenKind::Semi)?;
            }
            TokenKind::Print => {
                self.advance()?;
                self.expect(TokenKind::LParen)?;
                if !self.check(&TokenKind::RParen) {
                    loop {
                        self.parse_expr()?;
                        if !self.match_token(&TokenKind::Comma)? {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::Semi)?;
            }
            _ => return Err(self.unexpected("statement")),
        }
        Ok(())
    }

    fn parse_condition(&mut self) -> CompileResult<()> {
        self.expect(TokenKind::LParen)?;
        self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(())
    }

    /// `id = expr`, after the identifier
    fn parse_assignment(&mut self, name: &str, span: Span) -> CompileResult<()> {
        self.expect(TokenKind::Eq)?;

        self.analyzer.locate(span);
        let target = self.analyzer.on_variable_used(name);
        let (value, value_span) = self.parse_expr()?;

        self.analyzer.locate(span.merge(value_span));
        self.analyzer.on_assignment(target, value);
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// `exp (relop exp)?`
    fn parse_expr(&mut self) -> CompileResult<(ExprType, Span)> {
        let (left, left_span) = self.parse_exp()?;
        let Some(op) = self.current.kind.relational_op() else {
            return Ok((left, left_span));
        };
        self.advance()?;
        let (right, right_span) = self.parse_exp()?;

        let span = left_span.merge(right_span);
        self.analyzer.locate(span);
        Ok((self.analyzer.on_operation(op, left, right), span))
    }

    /// `term (('+' | '-') term)*`
    fn parse_exp(&mut self) -> CompileResult<(ExprType, Span)> {
        let (mut ty, mut span) = self.parse_term()?;
        while let Some(op) = self.current.kind.additive_op() {
            self.advance()?;
            let (right, right_span) = self.parse_term()?;
            span = span.merge(right_span);
            self.analyzer.locate(span);
            ty = self.analyzer.on_operation(op, ty, right);
        }
        Ok((ty, span))
    }

    /// `factor (('*' | '/') factor)*`
    fn parse_term(&mut self) -> CompileResult<(ExprType, Span)> {
        let (mut ty, mut span) = self.parse_factor()?;
        while let Some(op) = self.current.kind.multiplicative_op() {
            self.advance()?;
            let (right, right_span) = self.parse_factor()?;
            span = span.merge(right_span);
            self.analyzer.locate(span);
            ty = self.analyzer.on_operation(op, ty, right);
        }
        Ok((ty, span))
    }

    /// `('+' | '-') factor | '(' expr ')' | atom`
    fn parse_factor(&mut self) -> CompileResult<(ExprType, Span)> {
        let sign = match self.current.kind {
            TokenKind::LParen => {
                let open = self.advance()?.span;
                let (ty, _) = self.parse_expr()?;
                let close = self.expect(TokenKind::RParen)?.span;
                return Ok((ty, open.merge(close)));
            }
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_atom(),
        };

        let sign_span = self.advance()?.span;
        let (operand, operand_span) = self.parse_factor()?;
        let span = sign_span.merge(operand_span);
        self.analyzer.locate(span);
        Ok((self.analyzer.on_unary(sign, operand), span))
    }

    fn parse_atom(&mut self) -> CompileResult<(ExprType, Span)> {
        let ty = match self.current.kind {
            TokenKind::Identifier(_) => {
                let (name, span) = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    return self.parse_call(&name, span);
                }
                self.analyzer.locate(span);
                return Ok((self.analyzer.on_variable_used(&name), span));
            }
            TokenKind::IntLiteral(_) => ExprType::Int,
            TokenKind::FloatLiteral(_) => ExprType::Float,
            TokenKind::StringLiteral(_) => ExprType::Str,
            _ => return Err(self.unexpected("expression")),
        };
        let span = self.advance()?.span;
        Ok((ty, span))
    }

    /// `id ( args? )`, after the identifier
    fn parse_call(&mut self, name: &str, span: Span) -> CompileResult<(ExprType, Span)> {
        self.expect(TokenKind::LParen)?;
        if !self.check(&TokenKind::RParen) {
            loop {
                self.parse_expr()?;
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RParen)?.span;

        self.analyzer.locate(span);
        Ok((self.analyzer.on_function_called(name), span.merge(close)))
    }
}
