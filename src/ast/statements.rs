//! 文の定義

use serde::{Deserialize, Serialize};

use super::{Call, Expression, Span, Type, VariableDeclaration};

/// 文の並び（ブロック）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementList {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl StatementList {
    pub fn empty(span: Span) -> Self {
        Self {
            statements: Vec::new(),
            span,
        }
    }
}

/// 文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Variable(VariableDeclaration),
    Assignment(Assignment),
    Call(Call),
    IfElse(IfElseBranch),
    Loop(Loop),
    Break(Span),
    Continue(Span),
    Return(Return),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Variable(v) => v.span,
            Statement::Assignment(a) => a.span,
            Statement::Call(c) => c.span,
            Statement::IfElse(i) => i.span,
            Statement::Loop(l) => l.span,
            Statement::Break(span) | Statement::Continue(span) => *span,
            Statement::Return(r) => r.span,
        }
    }
}

/// 代入文。`location` は `VarAccess` か `ArrayAccess`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub location: Expression,
    pub value: Expression,
    pub ty: Option<Type>,
    pub span: Span,
}

/// if文（else節がなければ空のブロック）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfElseBranch {
    pub condition: Expression,
    pub then_block: StatementList,
    pub else_block: StatementList,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 無限ループ。break で抜ける
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    pub body: StatementList,
    pub span: Span,
}

/// return文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub value: Option<Expression>,
    pub ty: Option<Type>,
    pub span: Span,
}
