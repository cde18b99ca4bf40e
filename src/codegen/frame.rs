//! スタックフレームの管理

use std::collections::HashMap;

use crate::ir::{AddressVar, LocalVar};

/// スタック上に置かれる変数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Value(LocalVar),
    Address(AddressVar),
}

impl From<LocalVar> for Variable {
    fn from(var: LocalVar) -> Self {
        Variable::Value(var)
    }
}

impl From<AddressVar> for Variable {
    fn from(var: AddressVar) -> Self {
        Variable::Address(var)
    }
}

/// 1関数分のスタックフレーム
///
/// 変数は最初に参照されたときに次の8バイトスロットを受け取る。
/// スロットは再利用しない。
#[derive(Debug, Default)]
pub struct StackFrame {
    slots: HashMap<Variable, usize>,
}

impl StackFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// 変数のスロット番号（1始まり）。未割り当てなら割り当てる
    pub fn slot(&mut self, var: impl Into<Variable>) -> usize {
        let var = var.into();
        let next = self.slots.len() + 1;
        let slot = *self.slots.entry(var).or_insert(next);
        if slot == next {
            log::trace!("slot {} assigned to {:?}", slot, var);
        }
        slot
    }

    /// `%rbp` からの相対アドレス
    pub fn operand(&mut self, var: impl Into<Variable>) -> String {
        format!("-{}(%rbp)", self.slot(var) * 8)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// フレームに確保するバイト数（16バイト境界に揃える）
    pub fn size(&self) -> usize {
        let count = self.slots.len();
        (count + count % 2) * 8
    }
}
