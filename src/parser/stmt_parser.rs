//! 文の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser {
    /// `{ stmt* }` を新しいスコープで解析
    pub(super) fn parse_block(&mut self) -> ParseResult<StatementList> {
        self.symbols.enter();
        let result = self.parse_block_inner();
        self.symbols.exit();
        result
    }

    fn parse_block_inner(&mut self) -> ParseResult<StatementList> {
        let start = self.current_span().start;
        self.expect(Token::LeftBrace)?;
        let mut statements = Vec::new();
        while !self.check(&Token::RightBrace) {
            if self.is_at_end() {
                return Err(self.unexpected(Token::RightBrace.to_string()));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(Token::RightBrace)?;
        Ok(StatementList {
            statements,
            span: self.span_from(start),
        })
    }

    /// 文を解析
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;
        match self.current_token() {
            Some(Token::If) => self.parse_if_statement(),
            Some(Token::Loop) => {
                self.advance();
                let body = self.parse_block()?;
                Ok(Statement::Loop(Loop {
                    body,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Break) => {
                self.advance();
                self.expect(Token::Semicolon)?;
                Ok(Statement::Break(self.span_from(start)))
            }
            Some(Token::Continue) => {
                self.advance();
                self.expect(Token::Semicolon)?;
                Ok(Statement::Continue(self.span_from(start)))
            }
            Some(Token::Return) => {
                self.advance();
                let value = if self.check(&Token::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(Token::Semicolon)?;
                Ok(Statement::Return(Return {
                    value,
                    ty: None,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Identifier(_)) => match self.peek(1) {
                // `型名 名前;` はローカル変数宣言
                Some(Token::Identifier(_)) => self.parse_local_declaration(),
                Some(Token::LeftParen) => {
                    let call = self.parse_call()?;
                    self.expect(Token::Semicolon)?;
                    Ok(Statement::Call(call))
                }
                _ => self.parse_assignment(),
            },
            _ => Err(self.unexpected("文".to_string())),
        }
    }

    fn parse_local_declaration(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;
        let ty = self.parse_type()?;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(Token::Semicolon)?;
        let symbol = self.symbols.add(name_span, &name, ty)?;
        Ok(Statement::Variable(VariableDeclaration {
            symbol,
            ty: None,
            span: self.span_from(start),
        }))
    }

    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;
        let location = self.parse_designator()?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Assignment(Assignment {
            location,
            value,
            ty: None,
            span: self.span_from(start),
        }))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;
        self.expect(Token::If)?;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;
        let else_block = if self.match_token(&Token::Else) {
            self.parse_block()?
        } else {
            StatementList::empty(self.span_from(start))
        };
        Ok(Statement::IfElse(IfElseBranch {
            condition,
            then_block,
            else_block,
            ty: None,
            span: self.span_from(start),
        }))
    }
}
