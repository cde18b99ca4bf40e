//! 式の変換

use crate::ast::*;
use crate::ir::{AddressVar, BinaryOp, Constant, InstKind, LocalVar, Operand, Predicate};

use super::FunctionBuilder;

impl FunctionBuilder<'_> {
    /// 式を現在の出口へ繋ぎ、結果を保持する値変数を返す
    pub(super) fn lower_expression(&mut self, expr: &Expression) -> LocalVar {
        match expr {
            Expression::LiteralInt(lit) => self.constant(Constant::Int(lit.value)),
            Expression::LiteralBool(lit) => self.constant(Constant::Bool(lit.value)),
            Expression::VarAccess(access) => match self.scopes.lookup(access.symbol.id) {
                Some(local) => local,
                None => {
                    let address = self.address_of(&access.symbol, None);
                    self.load(address)
                }
            },
            Expression::ArrayAccess(access) => {
                let index = self.lower_expression(&access.index);
                let address = self.address_of(&access.symbol, Some(index));
                self.load(address)
            }
            // void 関数を式として使うのは型エラーなので、結果には未使用の変数を充てる
            Expression::Call(call) => match self.lower_call(call) {
                Some(dst) => dst,
                None => self.function.new_local(None),
            },
            Expression::Op(op) => self.lower_operation(op),
        }
    }

    /// 引数を左から順に評価して呼び出す。戻り値がなければ `None`
    pub(super) fn lower_call(&mut self, call: &Call) -> Option<LocalVar> {
        let args: Vec<LocalVar> = call
            .arguments
            .iter()
            .map(|arg| self.lower_expression(arg))
            .collect();
        // 型チェック済みなら記録された型を、そうでなければ宣言上の戻り値型を使う
        let returns_value = match &call.ty {
            Some(ty) if !ty.is_error() => !ty.is_void(),
            _ => call
                .callee
                .ty
                .return_type()
                .map_or(false, |ret| !ret.is_void()),
        };
        let dst = returns_value.then(|| self.function.new_local(None));
        self.emit(InstKind::Call {
            callee: call.callee.clone(),
            args,
            dst,
        });
        dst
    }

    /// グローバル変数（添字があればその要素）のアドレスを計算する
    pub(super) fn address_of(&mut self, symbol: &Symbol, index: Option<LocalVar>) -> AddressVar {
        let dst = self.function.new_address();
        self.emit(InstKind::AddressAt {
            dst,
            base: symbol.clone(),
            index,
        });
        dst
    }

    fn load(&mut self, address: AddressVar) -> LocalVar {
        let dst = self.function.new_local(None);
        self.emit(InstKind::Load { dst, address });
        dst
    }

    fn lower_operation(&mut self, op: &OpExpr) -> LocalVar {
        match op.op {
            Operation::And | Operation::Or => self.lower_short_circuit(op),
            Operation::Not => {
                let operand = self.lower_expression(&op.left);
                let dst = self.function.new_local(None);
                self.emit(InstKind::Not { dst, operand });
                dst
            }
            Operation::Add => self.lower_binary(op, BinaryOp::Add),
            Operation::Sub => self.lower_binary(op, BinaryOp::Sub),
            Operation::Mul => self.lower_binary(op, BinaryOp::Mul),
            Operation::Div => self.lower_binary(op, BinaryOp::Div),
            Operation::Ge => self.lower_compare(op, Predicate::Ge),
            Operation::Gt => self.lower_compare(op, Predicate::Gt),
            Operation::Le => self.lower_compare(op, Predicate::Le),
            Operation::Lt => self.lower_compare(op, Predicate::Lt),
            Operation::Eq => self.lower_compare(op, Predicate::Eq),
            Operation::Ne => self.lower_compare(op, Predicate::Ne),
        }
    }

    /// 左右のオペランドを順に評価する（右辺の欠けた木では左辺を使い回す）
    fn operands(&mut self, op: &OpExpr) -> (LocalVar, LocalVar) {
        let lhs = self.lower_expression(&op.left);
        let rhs = match &op.right {
            Some(right) => self.lower_expression(right),
            None => lhs,
        };
        (lhs, rhs)
    }

    fn lower_binary(&mut self, op: &OpExpr, binary: BinaryOp) -> LocalVar {
        let (lhs, rhs) = self.operands(op);
        let dst = self.function.new_local(None);
        self.emit(InstKind::Binary {
            op: binary,
            dst,
            lhs,
            rhs,
        });
        dst
    }

    fn lower_compare(&mut self, op: &OpExpr, predicate: Predicate) -> LocalVar {
        let (lhs, rhs) = self.operands(op);
        let dst = self.function.new_local(None);
        self.emit(InstKind::Compare {
            predicate,
            dst,
            lhs,
            rhs,
        });
        dst
    }

    /// `&&` と `||` の短絡評価
    ///
    /// 左辺で分岐し、結果がまだ決まらない側でだけ右辺を評価する。
    /// 両側とも共有の結果変数へ真偽値をコピーして合流点へ進む。
    fn lower_short_circuit(&mut self, op: &OpExpr) -> LocalVar {
        let is_and = op.op == Operation::And;
        let condition = self.lower_expression(&op.left);
        let test = self.emit(InstKind::Branch { condition });
        let dst = self.function.new_local(None);

        let evaluate = self.detached(|b| {
            let value = match &op.right {
                Some(right) => b.lower_expression(right),
                None => condition,
            };
            b.emit(InstKind::Copy {
                dst,
                src: Operand::Local(value),
            });
        });
        // && は左辺が偽、|| は左辺が真のとき、それがそのまま結果になる
        let decided = self.detached(|b| {
            let id = b.program.intern(Constant::Bool(!is_and));
            b.emit(InstKind::Copy {
                dst,
                src: Operand::Constant(id),
            });
        });

        let (taken, fall) = if is_and {
            (evaluate, decided)
        } else {
            (decided, evaluate)
        };
        let join = self.function.push(InstKind::Nop);
        self.function.link_taken(test, taken.entry);
        self.function.link(test, fall.entry);
        self.function.link(taken.exit, join);
        self.function.link(fall.exit, join);
        self.exit = join;
        dst
    }
}
