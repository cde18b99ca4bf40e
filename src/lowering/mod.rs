//! ASTからCFGへの変換
//!
//! 式と文を1つずつ「断片」（入口命令、出口命令、結果の値変数）へ変換し、
//! 現在の出口の `next[0]` を次の断片の入口へ繋ぐことで関数全体を組み立てる。
//! 関数ごとの状態（束縛、ループスタック、変数カウンタ）は [`FunctionBuilder`] が持ち、
//! 関数をまたいで共有されるのはプログラムの定数プールとグローバル宣言だけ。

mod expr_lowering;
mod scope;
mod stmt_lowering;

pub use scope::ScopeManager;

use crate::ast::*;
use crate::ir::{Constant, Function, InstId, InstKind, LocalVar, Operand, Program};

/// 翻訳単位全体をCFGへ変換する
///
/// 型エラーを含む部分木も構造的には変換される。
/// コード生成を行うかどうかは呼び出し側がエラー数で判断する。
pub fn lower_program(ast: &DeclarationList) -> Program {
    let mut program = Program::new();
    for declaration in &ast.declarations {
        match declaration {
            Declaration::Variable(decl) => program.add_global(decl.symbol.clone(), 1),
            Declaration::Array(decl) => {
                let count = match &decl.symbol.ty {
                    Type::Array { extent, .. } => *extent,
                    _ => 1,
                };
                program.add_global(decl.symbol.clone(), count);
            }
            Declaration::Function(func) => {
                let function = FunctionBuilder::new(&mut program, func).build(func);
                log::debug!(
                    "lowered function '{}' into {} instructions",
                    function.name,
                    function.instructions().len()
                );
                program.functions.push(function);
            }
        }
    }
    program
}

/// 変換済みの断片
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub entry: InstId,
    pub exit: InstId,
}

/// 囲んでいるループの継続先と脱出先
#[derive(Debug, Clone, Copy)]
struct LoopTarget {
    header: InstId,
    exit: InstId,
}

/// 1関数分の変換コンテキスト
pub struct FunctionBuilder<'a> {
    program: &'a mut Program,
    function: Function,
    scopes: ScopeManager,
    loops: Vec<LoopTarget>,
    /// 次の断片を繋ぐ位置
    exit: InstId,
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(program: &'a mut Program, def: &FunctionDefinition) -> Self {
        let function = Function::new(def.symbol.name.clone(), def.symbol.ty.clone());
        let exit = function.start;
        Self {
            program,
            function,
            scopes: ScopeManager::new(),
            loops: Vec::new(),
            exit,
        }
    }

    /// 引数を束縛し、本体を変換して関数を完成させる
    pub fn build(mut self, def: &FunctionDefinition) -> Function {
        self.scopes.push_scope();
        for param in &def.parameters {
            let var = self.function.new_local(Some(&param.name));
            self.scopes.bind(param.id, var);
            self.function.arguments.push(var);
        }
        self.lower_block(&def.body);
        self.scopes.pop_scope();
        self.function
    }

    // ==================== 断片の接続 ====================

    /// 現在の出口の `next[0]` を断片の入口へ繋ぎ、断片の出口を新しい出口とする
    fn splice(&mut self, fragment: Fragment) {
        self.function.link(self.exit, fragment.entry);
        self.exit = fragment.exit;
    }

    /// 単一命令の断片を作って接続する
    fn emit(&mut self, kind: InstKind) -> InstId {
        let id = self.function.push(kind);
        self.splice(Fragment {
            entry: id,
            exit: id,
        });
        id
    }

    /// 現在の出口から切り離した位置で `f` を変換し、その断片を返す
    fn detached(&mut self, f: impl FnOnce(&mut Self)) -> Fragment {
        let saved = self.exit;
        let entry = self.function.push(InstKind::Nop);
        self.exit = entry;
        f(self);
        let fragment = Fragment {
            entry,
            exit: self.exit,
        };
        self.exit = saved;
        fragment
    }

    /// 制御が戻らない命令の後ろに、どこからも到達しない出口を置く
    fn dangle(&mut self) {
        self.exit = self.function.push(InstKind::Nop);
    }

    fn constant(&mut self, constant: Constant) -> LocalVar {
        let id = self.program.intern(constant);
        let dst = self.function.new_local(None);
        self.emit(InstKind::Copy {
            dst,
            src: Operand::Constant(id),
        });
        dst
    }
}
