//! 式の定義

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Span, Symbol, Type};

/// 式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    LiteralInt(LiteralInt),
    LiteralBool(LiteralBool),
    VarAccess(VarAccess),
    ArrayAccess(ArrayAccess),
    Call(Call),
    Op(OpExpr),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::LiteralInt(l) => l.span,
            Expression::LiteralBool(l) => l.span,
            Expression::VarAccess(v) => v.span,
            Expression::ArrayAccess(a) => a.span,
            Expression::Call(c) => c.span,
            Expression::Op(o) => o.span,
        }
    }

    /// 型チェック済みならその型
    pub fn ty(&self) -> Option<&Type> {
        match self {
            Expression::LiteralInt(l) => l.ty.as_ref(),
            Expression::LiteralBool(l) => l.ty.as_ref(),
            Expression::VarAccess(v) => v.ty.as_ref(),
            Expression::ArrayAccess(a) => a.ty.as_ref(),
            Expression::Call(c) => c.ty.as_ref(),
            Expression::Op(o) => o.ty.as_ref(),
        }
    }
}

/// 整数リテラル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralInt {
    pub value: i64,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 真偽値リテラル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralBool {
    pub value: bool,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 変数参照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarAccess {
    pub symbol: Symbol,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 配列要素参照 `a[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayAccess {
    pub symbol: Symbol,
    pub index: Box<Expression>,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 関数呼び出し（式としても文としても現れる）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub callee: Symbol,
    pub arguments: Vec<Expression>,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 演算式。単項の `!` では `right` が `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpExpr {
    pub op: Operation,
    pub left: Box<Expression>,
    pub right: Option<Box<Expression>>,
    pub ty: Option<Type>,
    pub span: Span,
}

/// 演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Not,
}

impl Operation {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operation::Ge | Operation::Gt | Operation::Le | Operation::Lt | Operation::Eq | Operation::Ne
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Ge => ">=",
            Operation::Gt => ">",
            Operation::Le => "<=",
            Operation::Lt => "<",
            Operation::Eq => "==",
            Operation::Ne => "!=",
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "*",
            Operation::Div => "/",
            Operation::And => "&&",
            Operation::Or => "||",
            Operation::Not => "!",
        };
        write!(f, "{}", s)
    }
}
