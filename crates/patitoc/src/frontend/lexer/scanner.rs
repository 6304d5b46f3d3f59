//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Patito source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => Ok(Token::new(kind, self.inner.span().into())),
            Some(Err(())) => Err(CompileError::lexer(
                format!("unexpected character '{}'", self.inner.slice()),
                self.inner.span().into(),
            )),
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "program vars void int float main end if else while do print";
        let kinds: Vec<TokenKind> = Lexer::new(source)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Program,
                TokenKind::Vars,
                TokenKind::Void,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Main,
                TokenKind::End,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Do,
                TokenKind::Print,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_are_not_keywords() {
        let mut lexer = Lexer::new("programa mainly _x1");

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "programa"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "mainly"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_x1"
        ));
    }

    #[test]
    fn test_constants() {
        let mut lexer = Lexer::new(r#"42 3.14 2.5e3 "hola mundo""#);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "3.14"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "2.5e3"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "\"hola mundo\""
        ));
    }

    #[test]
    fn test_operators_and_punctuation() {
        let source = "+ - * / > < != = ( ) [ ] { } ; , :";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Plus));
        assert!(matches!(tokens[1].kind, TokenKind::Minus));
        assert!(matches!(tokens[2].kind, TokenKind::Star));
        assert!(matches!(tokens[3].kind, TokenKind::Slash));
        assert!(matches!(tokens[4].kind, TokenKind::Gt));
        assert!(matches!(tokens[5].kind, TokenKind::Lt));
        assert!(matches!(tokens[6].kind, TokenKind::NotEq));
        assert!(matches!(tokens[7].kind, TokenKind::Eq));
        assert!(matches!(tokens[8].kind, TokenKind::LParen));
        assert!(matches!(tokens[9].kind, TokenKind::RParen));
        assert!(matches!(tokens[10].kind, TokenKind::LBracket));
        assert!(matches!(tokens[11].kind, TokenKind::RBracket));
        assert!(matches!(tokens[12].kind, TokenKind::LBrace));
        assert!(matches!(tokens[13].kind, TokenKind::RBrace));
        assert!(matches!(tokens[14].kind, TokenKind::Semi));
        assert!(matches!(tokens[15].kind, TokenKind::Comma));
        assert!(matches!(tokens[16].kind, TokenKind::Colon));
        assert!(matches!(tokens[17].kind, TokenKind::Eof));
    }

    #[test]
    fn test_comments_and_spans() {
        let source = "x // ignored\n  y";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(15, 16));
        assert_eq!(tokens[2].span, Span::new(16, 16));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("a @ b");
        lexer.next_token().unwrap();

        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { span, .. } if span == Span::new(2, 3)));
    }
}
