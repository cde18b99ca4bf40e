//! 名前と値変数の束縛

use std::collections::HashMap;

use crate::ast::SymbolId;
use crate::ir::LocalVar;

/// ブロック1つ分の束縛
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<SymbolId, LocalVar>,
}

/// スコープマネージャー
///
/// ブロックに入るたびに新しいスコープを積み、抜けると破棄する。
/// ここに見つからないシンボルはグローバル変数として扱う。
#[derive(Debug, Default)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
}

impl ScopeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// 現在のスコープへ束縛を追加
    ///
    /// `push_scope` の前に呼ばれた束縛は保持しない
    pub fn bind(&mut self, symbol: SymbolId, var: LocalVar) {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.bindings.insert(symbol, var);
            }
            None => log::warn!("{:?} bound outside of any scope; binding dropped", symbol),
        }
    }

    /// 内側のスコープから順に検索
    pub fn lookup(&self, symbol: SymbolId) -> Option<LocalVar> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(&symbol).copied())
    }
}
