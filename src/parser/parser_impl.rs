//! メインパーサー構造とユーティリティ

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::{Token, TokenWithPosition};

use super::symbol_table::SymbolTable;
use super::{ParseError, ParseResult};

/// Cruxパーサー
pub struct Parser {
    pub(super) tokens: Vec<TokenWithPosition>,
    pub(super) current: usize,
    pub(super) symbols: SymbolTable,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPosition>) -> Self {
        Self {
            tokens,
            current: 0,
            symbols: SymbolTable::new(),
        }
    }

    /// 翻訳単位全体を解析
    pub fn parse(&mut self) -> ParseResult<DeclarationList> {
        let start = self.current_span().start;
        let mut declarations = Vec::new();
        while !self.is_at_end() {
            declarations.push(self.parse_declaration()?);
        }

        Ok(DeclarationList {
            declarations,
            span: self.span_from(start),
        })
    }

    // ==================== ユーティリティメソッド ====================

    /// 現在のトークンを取得
    pub(super) fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|t| &t.token)
    }

    /// 特定のオフセット先のトークンを取得
    pub(super) fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset).map(|t| &t.token)
    }

    /// 現在のスパンを取得（終端では入力末尾の空スパン）
    pub(super) fn current_span(&self) -> Span {
        match self.tokens.get(self.current) {
            Some(t) => t.span.clone().into(),
            None => {
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                Span::new(end, end)
            }
        }
    }

    /// 開始位置から直前に消費したトークンまでのスパンを作成
    pub(super) fn span_from(&self, start: usize) -> Span {
        let end = if self.current > 0 {
            self.tokens
                .get(self.current - 1)
                .map(|t| t.span.end)
                .unwrap_or(start)
        } else {
            start
        };
        Span::new(start, end.max(start))
    }

    /// 次のトークンに進む
    pub(super) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// 終端に到達したかチェック
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// 特定のトークンをチェック（進まない）
    pub(super) fn check(&self, token_type: &Token) -> bool {
        if let Some(token) = self.current_token() {
            std::mem::discriminant(token) == std::mem::discriminant(token_type)
        } else {
            false
        }
    }

    /// 特定のトークンにマッチしたら進む
    pub(super) fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 特定のトークンを期待
    pub(super) fn expect(&mut self, token_type: Token) -> ParseResult<()> {
        if self.check(&token_type) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(token_type.to_string()))
        }
    }

    /// 識別子を期待し、名前とスパンを返す
    pub(super) fn expect_identifier(&mut self) -> ParseResult<(String, Span)> {
        match self.current_token() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                let span = self.current_span();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected("識別子".to_string())),
        }
    }

    /// 整数リテラルを期待
    pub(super) fn expect_integer(&mut self) -> ParseResult<i64> {
        match self.current_token() {
            Some(Token::Integer(value)) => {
                let value = *value;
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("整数リテラル".to_string())),
        }
    }

    /// 予期しないトークンエラーを作成
    pub(super) fn unexpected(&self, expected: String) -> ParseError {
        let span = self.current_span();
        match self.current_token() {
            Some(found) => ParserError::UnexpectedToken {
                expected,
                found: found.to_string(),
                span,
            },
            None => ParserError::UnexpectedEof { expected, span },
        }
    }
}
