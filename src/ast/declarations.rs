//! 宣言の定義

use serde::{Deserialize, Serialize};

use super::{Span, StatementList, Symbol, Type};

/// ASTのルートノード（翻訳単位全体のトップレベル宣言列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationList {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

/// トップレベル宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Array(ArrayDeclaration),
    Function(FunctionDefinition),
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Variable(v) => v.span,
            Declaration::Array(a) => a.span,
            Declaration::Function(f) => f.span,
        }
    }
}

/// スカラー変数宣言（グローバルにもローカルにも現れる）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub symbol: Symbol,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 配列宣言（グローバルのみ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDeclaration {
    pub symbol: Symbol,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 関数定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub symbol: Symbol,
    pub parameters: Vec<Symbol>,
    pub body: StatementList,
    pub span: Span,
}
