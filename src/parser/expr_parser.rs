//! 式の解析
//!
//! 優先順位は低い方から
//! 比較（非結合）、加減算と `||`、乗除算と `&&`、単項 `!` と一次式。

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser {
    /// expr0: 比較演算
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        let left = self.parse_additive()?;
        let op = match self.current_token() {
            Some(Token::GreaterEqual) => Operation::Ge,
            Some(Token::LessEqual) => Operation::Le,
            Some(Token::NotEqual) => Operation::Ne,
            Some(Token::Equal) => Operation::Eq,
            Some(Token::Greater) => Operation::Gt,
            Some(Token::Less) => Operation::Lt,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        Ok(binary(op, left, right))
    }

    /// expr1: `+` `-` `||`（左結合）
    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Plus) => Operation::Add,
                Some(Token::Minus) => Operation::Sub,
                Some(Token::Or) => Operation::Or,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    /// expr2: `*` `/` `&&`（左結合）
    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Star) => Operation::Mul,
                Some(Token::Slash) => Operation::Div,
                Some(Token::And) => Operation::And,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    /// expr3: 単項否定、括弧、変数参照、呼び出し、リテラル
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        match self.current_token() {
            Some(Token::Not) => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expression::Op(OpExpr {
                    op: Operation::Not,
                    left: Box::new(operand),
                    right: None,
                    ty: None,
                    span: self.span_from(start),
                }))
            }
            Some(Token::LeftParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                Ok(inner)
            }
            Some(Token::Integer(value)) => {
                let value = *value;
                self.advance();
                Ok(Expression::LiteralInt(LiteralInt {
                    value,
                    ty: None,
                    span: self.span_from(start),
                }))
            }
            Some(Token::True) | Some(Token::False) => {
                let value = self.check(&Token::True);
                self.advance();
                Ok(Expression::LiteralBool(LiteralBool {
                    value,
                    ty: None,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Identifier(_)) => {
                if matches!(self.peek(1), Some(Token::LeftParen)) {
                    Ok(Expression::Call(self.parse_call()?))
                } else {
                    self.parse_designator()
                }
            }
            _ => Err(self.unexpected("式".to_string())),
        }
    }

    /// designator: `名前` または `名前[式]`
    pub(super) fn parse_designator(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        let (name, name_span) = self.expect_identifier()?;
        let symbol = self.symbols.lookup(name_span, &name)?;
        if self.match_token(&Token::LeftBracket) {
            let index = self.parse_expression()?;
            self.expect(Token::RightBracket)?;
            Ok(Expression::ArrayAccess(ArrayAccess {
                symbol,
                index: Box::new(index),
                ty: None,
                span: self.span_from(start),
            }))
        } else {
            Ok(Expression::VarAccess(VarAccess {
                symbol,
                ty: None,
                span: name_span,
            }))
        }
    }

    /// 関数呼び出し `名前(引数, ...)`
    pub(super) fn parse_call(&mut self) -> ParseResult<Call> {
        let start = self.current_span().start;
        let (name, name_span) = self.expect_identifier()?;
        let callee = self.symbols.lookup(name_span, &name)?;
        self.expect(Token::LeftParen)?;
        let mut arguments = Vec::new();
        if !self.check(&Token::RightParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RightParen)?;
        Ok(Call {
            callee,
            arguments,
            ty: None,
            span: self.span_from(start),
        })
    }
}

fn binary(op: Operation, left: Expression, right: Expression) -> Expression {
    let span = left.span().to(right.span());
    Expression::Op(OpExpr {
        op,
        left: Box::new(left),
        right: Some(Box::new(right)),
        ty: None,
        span,
    })
}
