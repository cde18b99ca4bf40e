//! 命令の定義
//!
//! 命令は関数ごとのアリーナに格納され、後続命令は `InstId` で参照する。
//! 各命令は最大2つの後続を持つ。`next[0]` は通常のフォールスルー（条件分岐では偽）、
//! `next[1]` は条件分岐が真のときの飛び先。

use serde::Serialize;
use std::fmt;

use crate::ast::Symbol;

/// 命令アリーナ内の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InstId(pub usize);

/// 値変数（スカラー値を値として保持する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocalVar(pub usize);

/// アドレス変数（計算済みのメモリ位置を保持する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AddressVar(pub usize);

/// 定数プール内の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConstId(pub usize);

/// コピー命令の転送元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operand {
    Constant(ConstId),
    Local(LocalVar),
}

/// 算術演算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "addq",
            BinaryOp::Sub => "subq",
            BinaryOp::Mul => "imulq",
            BinaryOp::Div => "idivq",
        }
    }
}

/// 比較述語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Predicate {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
}

impl Predicate {
    /// 対応する条件付き転送命令
    pub fn cmov(self) -> &'static str {
        match self {
            Predicate::Ge => "cmovge",
            Predicate::Gt => "cmovg",
            Predicate::Le => "cmovle",
            Predicate::Lt => "cmovl",
            Predicate::Eq => "cmove",
            Predicate::Ne => "cmovne",
        }
    }
}

/// 命令の種類
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InstKind {
    /// 何もしない（合流点やループ出口）
    Nop,
    /// 無条件ジャンプ。飛び先は `next[0]`
    Jump,
    /// 条件分岐。真なら `next[1]`、偽なら `next[0]`
    Branch { condition: LocalVar },
    /// グローバル変数（または配列要素）のアドレス計算
    AddressAt {
        dst: AddressVar,
        base: Symbol,
        index: Option<LocalVar>,
    },
    Load {
        dst: LocalVar,
        address: AddressVar,
    },
    Store {
        address: AddressVar,
        value: LocalVar,
    },
    Copy {
        dst: LocalVar,
        src: Operand,
    },
    Binary {
        op: BinaryOp,
        dst: LocalVar,
        lhs: LocalVar,
        rhs: LocalVar,
    },
    Compare {
        predicate: Predicate,
        dst: LocalVar,
        lhs: LocalVar,
        rhs: LocalVar,
    },
    Not {
        dst: LocalVar,
        operand: LocalVar,
    },
    Call {
        callee: Symbol,
        args: Vec<LocalVar>,
        dst: Option<LocalVar>,
    },
    Return { value: Option<LocalVar> },
}

/// CFG上の1命令
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub kind: InstKind,
    pub next: [Option<InstId>; 2],
}

impl Instruction {
    pub fn new(kind: InstKind) -> Self {
        Self {
            kind,
            next: [None, None],
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, InstKind::Branch { .. })
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, InstKind::Return { .. })
    }
}

impl fmt::Display for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for AddressVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%a{}", self.0)
    }
}
