//! 文の変換

use crate::ast::*;
use crate::ir::{InstKind, Operand};

use super::{FunctionBuilder, LoopTarget};

impl FunctionBuilder<'_> {
    /// ブロックを新しいスコープで変換
    pub(super) fn lower_block(&mut self, block: &StatementList) {
        self.scopes.push_scope();
        for statement in &block.statements {
            self.lower_statement(statement);
        }
        self.scopes.pop_scope();
    }

    fn lower_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Variable(decl) => {
                let var = self.function.new_local(Some(&decl.symbol.name));
                self.scopes.bind(decl.symbol.id, var);
            }
            Statement::Assignment(assignment) => self.lower_assignment(assignment),
            Statement::Call(call) => {
                self.lower_call(call);
            }
            Statement::IfElse(branch) => self.lower_if(branch),
            Statement::Loop(body) => self.lower_loop(body),
            Statement::Break(_) => {
                if let Some(target) = self.loops.last().copied() {
                    let jump = self.emit(InstKind::Jump);
                    self.function.link(jump, target.exit);
                    self.dangle();
                }
            }
            Statement::Continue(_) => {
                if let Some(target) = self.loops.last().copied() {
                    let jump = self.emit(InstKind::Jump);
                    self.function.link(jump, target.header);
                    self.dangle();
                }
            }
            Statement::Return(ret) => {
                let value = ret.value.as_ref().map(|value| self.lower_expression(value));
                self.emit(InstKind::Return { value });
                self.dangle();
            }
        }
    }

    /// 右辺、左辺のアドレス計算、格納の順に評価する
    fn lower_assignment(&mut self, assignment: &Assignment) {
        let value = self.lower_expression(&assignment.value);
        match &assignment.location {
            Expression::VarAccess(access) => match self.scopes.lookup(access.symbol.id) {
                Some(local) => {
                    self.emit(InstKind::Copy {
                        dst: local,
                        src: Operand::Local(value),
                    });
                }
                None => {
                    let address = self.address_of(&access.symbol, None);
                    self.emit(InstKind::Store { address, value });
                }
            },
            Expression::ArrayAccess(access) => {
                let index = self.lower_expression(&access.index);
                let address = self.address_of(&access.symbol, Some(index));
                self.emit(InstKind::Store { address, value });
            }
            other => {
                log::debug!("assignment target at {:?} is not a designator", other.span());
            }
        }
    }

    fn lower_if(&mut self, branch: &IfElseBranch) {
        let condition = self.lower_expression(&branch.condition);
        let test = self.emit(InstKind::Branch { condition });

        let then_fragment = self.detached(|b| b.lower_block(&branch.then_block));
        let else_fragment = self.detached(|b| b.lower_block(&branch.else_block));

        let join = self.function.push(InstKind::Nop);
        self.function.link_taken(test, then_fragment.entry);
        self.function.link(test, else_fragment.entry);
        self.function.link(then_fragment.exit, join);
        self.function.link(else_fragment.exit, join);
        self.exit = join;
    }

    fn lower_loop(&mut self, body: &Loop) {
        let header = self.emit(InstKind::Nop);
        let exit = self.function.push(InstKind::Nop);

        self.loops.push(LoopTarget { header, exit });
        self.lower_block(&body.body);
        self.loops.pop();

        // 本体の末尾から先頭へ戻る
        self.function.link(self.exit, header);
        self.exit = exit;
    }
}
