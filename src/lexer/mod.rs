//! Lexical analysis module for the Crux language.
//!
//! This module is responsible for tokenizing Crux source code into a stream of tokens.

mod token;

pub use token::Token;

use logos::Logos;

/// Position tracking for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Self {
        Position { line: 1, column: 1 }
    }

    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// A token with its position information
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPosition {
    pub token: Token,
    pub position: Position,
    pub span: logos::Span,
}

/// Lexer for the Crux language
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Token>,
    position: Position,
    input: &'a str,
    last_end: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: Token::lexer(input),
            position: Position::new(),
            input,
            last_end: 0,
        }
    }

    /// Collect every remaining token into a vector
    pub fn collect_tokens(self) -> Vec<TokenWithPosition> {
        self.collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = TokenWithPosition;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let span = self.inner.span();

        // Update position for any skipped content since last token
        if span.start > self.last_end {
            for ch in self.input[self.last_end..span.start].chars() {
                self.position.advance(ch);
            }
        }

        let position = self.position;

        for ch in self.input[span.start..span.end].chars() {
            self.position.advance(ch);
        }
        self.last_end = span.end;

        let token = result.unwrap_or(Token::Error);
        Some(TokenWithPosition {
            token,
            position,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).map(|t| t.token).collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokens("if else loop break continue return true false"),
            vec![
                Token::If,
                Token::Else,
                Token::Loop,
                Token::Break,
                Token::Continue,
                Token::Return,
                Token::True,
                Token::False,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            tokens("iffy loops"),
            vec![
                Token::Identifier("iffy".to_string()),
                Token::Identifier("loops".to_string()),
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            tokens(">= <= != == > < ="),
            vec![
                Token::GreaterEqual,
                Token::LessEqual,
                Token::NotEqual,
                Token::Equal,
                Token::Greater,
                Token::Less,
                Token::Assign,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("x // comment\n;"),
            vec![Token::Identifier("x".to_string()), Token::Semicolon]
        );
    }

    #[test]
    fn test_position_tracking() {
        let toks: Vec<_> = Lexer::new("int x;\n  x = 1;").collect();
        assert_eq!(toks[0].position, Position { line: 1, column: 1 });
        assert_eq!(toks[3].position, Position { line: 2, column: 3 });
        assert_eq!(toks[3].span, 9..10);
    }

    #[test]
    fn test_unrecognized_input() {
        assert_eq!(tokens("x # y")[1], Token::Error);
    }

    #[test]
    fn test_integer_overflow_is_error() {
        assert_eq!(tokens("99999999999999999999999"), vec![Token::Error]);
    }
}
