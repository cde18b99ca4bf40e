//! シンボルテーブル（名前解決）
//!
//! スコープのスタックとして実装する。最も外側のスコープにはランタイムの
//! 組み込み関数があらかじめ登録されている。

use std::collections::HashMap;

use crate::ast::{Span, Symbol, SymbolId, Type};
use crate::error::ParserError;

/// ランタイムが提供する組み込み関数（名前、引数型、戻り値型）
pub fn builtin_functions() -> Vec<(&'static str, Vec<Type>, Type)> {
    vec![
        ("readInt", vec![], Type::Int),
        ("readChar", vec![], Type::Int),
        ("printBool", vec![Type::Bool], Type::Void),
        ("printInt", vec![Type::Int], Type::Void),
        ("printChar", vec![Type::Int], Type::Void),
        ("println", vec![], Type::Void),
    ]
}

/// 1つのスコープ
#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<String, Symbol>,
}

/// スコープ付きシンボルテーブル
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    next_id: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self {
            scopes: vec![Scope::default()],
            next_id: 0,
        };
        for (name, params, ret) in builtin_functions() {
            table.declare(name, Type::function(params, ret));
        }
        table
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいスコープに入る
    pub fn enter(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// 現在のスコープを抜ける（グローバルスコープは残す）
    pub fn exit(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// 現在がグローバルスコープかどうか
    pub fn is_global(&self) -> bool {
        self.scopes.len() == 1
    }

    /// 現在のスコープにシンボルを追加する。同じスコープでの再定義はエラー
    pub fn add(&mut self, span: Span, name: &str, ty: Type) -> Result<Symbol, ParserError> {
        if self.current().symbols.contains_key(name) {
            return Err(ParserError::DuplicateSymbol {
                name: name.to_string(),
                span,
            });
        }
        Ok(self.declare(name, ty))
    }

    /// 内側のスコープから順に名前を検索する
    pub fn lookup(&self, span: Span, name: &str) -> Result<Symbol, ParserError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
            .cloned()
            .ok_or_else(|| ParserError::UndefinedSymbol {
                name: name.to_string(),
                span,
            })
    }

    fn declare(&mut self, name: &str, ty: Type) -> Symbol {
        let symbol = Symbol::new(SymbolId(self.next_id), name, ty);
        self.next_id += 1;
        log::trace!("declare symbol {} ({:?})", name, symbol.id);
        self.current_mut()
            .symbols
            .insert(name.to_string(), symbol.clone());
        symbol
    }

    fn current(&self) -> &Scope {
        // スコープスタックは常に1つ以上の要素を持つ
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}
