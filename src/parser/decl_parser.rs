//! 宣言の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser {
    /// トップレベル宣言を解析
    pub(super) fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        let start = self.current_span().start;
        let ty = self.parse_type()?;
        let (name, name_span) = self.expect_identifier()?;

        match self.current_token() {
            Some(Token::LeftParen) => Ok(Declaration::Function(
                self.parse_function_rest(start, ty, name, name_span)?,
            )),
            Some(Token::LeftBracket) => {
                self.advance();
                let extent = self.expect_integer()?;
                self.expect(Token::RightBracket)?;
                self.expect(Token::Semicolon)?;
                let span = self.span_from(start);
                // 負の要素数は字句上現れないので u64 への変換は失われない
                let ty = Type::array(ty, extent.unsigned_abs());
                let symbol = self.symbols.add(name_span, &name, ty)?;
                Ok(Declaration::Array(ArrayDeclaration {
                    symbol,
                    ty: None,
                    span,
                }))
            }
            _ => {
                self.expect(Token::Semicolon)?;
                let span = self.span_from(start);
                let symbol = self.symbols.add(name_span, &name, ty)?;
                Ok(Declaration::Variable(VariableDeclaration {
                    symbol,
                    ty: None,
                    span,
                }))
            }
        }
    }

    /// 関数定義の引数リスト以降を解析
    ///
    /// 関数シンボルは本体の解析前に登録するため、再帰呼び出しが解決できる。
    fn parse_function_rest(
        &mut self,
        start: usize,
        ret: Type,
        name: String,
        name_span: Span,
    ) -> ParseResult<FunctionDefinition> {
        self.expect(Token::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&Token::RightParen) {
            loop {
                let ty = self.parse_type()?;
                let (param_name, param_span) = self.expect_identifier()?;
                params.push((param_name, param_span, ty));
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RightParen)?;

        let param_types = params.iter().map(|(_, _, ty)| ty.clone()).collect();
        let symbol = self
            .symbols
            .add(name_span, &name, Type::function(param_types, ret))?;

        self.symbols.enter();
        let parameters = params
            .into_iter()
            .map(|(param_name, param_span, ty)| self.symbols.add(param_span, &param_name, ty))
            .collect::<Result<Vec<_>, _>>();
        let result = parameters.and_then(|parameters| {
            let body = self.parse_block()?;
            Ok((parameters, body))
        });
        self.symbols.exit();
        let (parameters, body) = result?;

        Ok(FunctionDefinition {
            symbol,
            parameters,
            body,
            span: self.span_from(start),
        })
    }

    /// 型名を解析（int / bool / void、それ以外はエラー型）
    pub(super) fn parse_type(&mut self) -> ParseResult<Type> {
        let (name, _) = self.expect_identifier()?;
        Ok(Type::from_name(&name))
    }
}
