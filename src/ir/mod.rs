//! Control-flow-graph intermediate representation.
//!
//! A [`Program`] owns the global declarations, an interned constant pool and
//! one [`Function`] per definition. Each function stores its instructions in
//! an arena and links them through successor edges, so loops are ordinary
//! back edges rather than nested structure.

mod instruction;
pub mod printer;

pub use instruction::*;

use indexmap::IndexSet;
use serde::Serialize;

use crate::ast::{Symbol, Type};

/// 定数プールに格納される値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Constant {
    Int(i64),
    Bool(bool),
}

impl Constant {
    /// 機械語上の表現（bool は 0 / 1）
    pub fn as_i64(self) -> i64 {
        match self {
            Constant::Int(value) => value,
            Constant::Bool(value) => value as i64,
        }
    }
}

/// グローバル変数または配列の宣言
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Global {
    pub symbol: Symbol,
    /// 要素数（スカラーは1）
    pub count: u64,
}

impl Global {
    /// 確保するバイト数。アドレス空間に収まらなければ `None`
    pub fn size_in_bytes(&self) -> Option<u64> {
        crate::ast::types::storage_bytes(self.count)
    }
}

/// 翻訳単位全体
#[derive(Debug, Clone, Default, Serialize)]
pub struct Program {
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
    constants: IndexSet<Constant>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// 定数を登録して番号を返す。同じ値は同じ番号になる
    pub fn intern(&mut self, constant: Constant) -> ConstId {
        let (index, _) = self.constants.insert_full(constant);
        ConstId(index)
    }

    pub fn constant(&self, id: ConstId) -> Option<Constant> {
        self.constants.get_index(id.0).copied()
    }

    pub fn constants(&self) -> impl Iterator<Item = &Constant> {
        self.constants.iter()
    }

    pub fn add_global(&mut self, symbol: Symbol, count: u64) {
        self.globals.push(Global { symbol, count });
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// 値変数の付随情報
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalInfo {
    /// ソース上の変数に束縛されていればその名前
    pub name: Option<String>,
}

/// 1関数分のCFG
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub ty: Type,
    /// 引数に束縛された値変数（宣言順）
    pub arguments: Vec<LocalVar>,
    /// 入口命令
    pub start: InstId,
    instructions: Vec<Instruction>,
    locals: Vec<LocalInfo>,
    address_count: usize,
}

impl Function {
    /// 入口の Nop だけを持つ関数を作る
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            start: InstId(0),
            instructions: vec![Instruction::new(InstKind::Nop)],
            locals: Vec::new(),
            address_count: 0,
        }
    }

    pub fn returns_value(&self) -> bool {
        self.ty
            .return_type()
            .map_or(false, |ret| !ret.is_void() && !ret.is_error())
    }

    pub fn new_local(&mut self, name: Option<&str>) -> LocalVar {
        self.locals.push(LocalInfo {
            name: name.map(str::to_string),
        });
        LocalVar(self.locals.len() - 1)
    }

    pub fn new_address(&mut self) -> AddressVar {
        self.address_count += 1;
        AddressVar(self.address_count - 1)
    }

    pub fn local_info(&self, var: LocalVar) -> Option<&LocalInfo> {
        self.locals.get(var.0)
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    pub fn address_count(&self) -> usize {
        self.address_count
    }

    /// 命令をアリーナへ追加する（後続は未接続）
    pub fn push(&mut self, kind: InstKind) -> InstId {
        self.instructions.push(Instruction::new(kind));
        InstId(self.instructions.len() - 1)
    }

    /// `from.next[0] = to`
    pub fn link(&mut self, from: InstId, to: InstId) {
        self.instructions[from.0].next[0] = Some(to);
    }

    /// `from.next[1] = to`（条件が真のときの飛び先）
    pub fn link_taken(&mut self, from: InstId, to: InstId) {
        self.instructions[from.0].next[1] = Some(to);
    }

    pub fn get(&self, id: InstId) -> Option<&Instruction> {
        self.instructions.get(id.0)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// 入口から到達可能な命令（深さ優先、`next[0]` を先に辿る）
    pub fn reachable(&self) -> Vec<InstId> {
        let mut visited = vec![false; self.instructions.len()];
        let mut order = Vec::new();
        let mut stack = vec![self.start];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.0], true) {
                continue;
            }
            order.push(id);
            let [fall, taken] = self.instructions[id.0].next;
            stack.extend(taken);
            stack.extend(fall);
        }
        order
    }
}
