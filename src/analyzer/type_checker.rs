//! 型チェック機能
//!
//! 名前解決済みのASTを走査し、すべての式に型を割り当てて検証する。
//! 型エラーは例外として投げずに蓄積し、兄弟の宣言・文のチェックを続行する。
//! エラーは発生したノードで一度だけ記録され、それを消費する外側の式は
//! `Type::Error` を黙って伝播する。

use crate::ast::*;
use crate::error::TypeError;

/// 型チェッカー
#[derive(Debug, Default)]
pub struct TypeChecker {
    errors: Vec<TypeError>,
    /// 走査中の関数の戻り値型
    current_return_type: Option<Type>,
    /// 囲んでいるループの深さ
    loop_depth: usize,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 翻訳単位全体を検査し、各ノードの `ty` に型を書き込む
    pub fn check(&mut self, ast: &mut DeclarationList) {
        for declaration in &mut ast.declarations {
            match declaration {
                Declaration::Variable(decl) => self.check_variable_declaration(decl),
                Declaration::Array(decl) => self.check_array_declaration(decl),
                Declaration::Function(func) => self.check_function(func),
            }
        }
        log::debug!("type check finished with {} error(s)", self.errors.len());
    }

    /// 蓄積された型エラー
    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<TypeError> {
        self.errors
    }

    fn add_error(&mut self, span: Span, message: impl Into<String>) {
        let error = TypeError::new(message, span);
        log::debug!("type error at {:?}: {}", span, error.message);
        self.errors.push(error);
    }

    /// ノードの型を確定する。新たに生じたエラー型ならここで記録する
    fn resolve(&mut self, span: Span, ty: Type, operands: &[&Type]) -> Type {
        if let Type::Error { message } = &ty {
            if !operands.iter().any(|t| t.is_error()) {
                self.add_error(span, message.clone());
            }
        }
        ty
    }

    // ==================== 宣言 ====================

    fn check_variable_declaration(&mut self, decl: &mut VariableDeclaration) {
        let ty = match &decl.symbol.ty {
            ty if ty.is_scalar() => ty.clone(),
            Type::Error { message } => {
                self.add_error(decl.span, message.clone());
                decl.symbol.ty.clone()
            }
            ty => {
                let message = format!(
                    "変数 {} の型は int か bool でなければなりません（{}）",
                    decl.symbol.name, ty
                );
                self.add_error(decl.span, message.clone());
                Type::error(message)
            }
        };
        decl.ty = Some(ty);
    }

    fn check_array_declaration(&mut self, decl: &mut ArrayDeclaration) {
        let ty = match &decl.symbol.ty {
            Type::Array { base, extent } if base.is_scalar() => {
                if decl.symbol.ty.storage_size().is_some() {
                    decl.symbol.ty.clone()
                } else {
                    Type::error(format!(
                        "配列 {} の要素数 {} は大きすぎます",
                        decl.symbol.name, extent
                    ))
                }
            }
            Type::Array { base, .. } if base.is_error() => (**base).clone(),
            ty => Type::error(format!(
                "配列 {} の要素型は int か bool でなければなりません（{}）",
                decl.symbol.name, ty
            )),
        };
        if let Type::Error { message } = &ty {
            self.add_error(decl.span, message.clone());
        }
        decl.ty = Some(ty);
    }

    fn check_function(&mut self, func: &mut FunctionDefinition) {
        let Type::Function { params, ret } = &func.symbol.ty else {
            self.add_error(func.span, format!("{} は関数型ではありません", func.symbol.name));
            return;
        };

        if func.symbol.name == "main" {
            if !ret.is_void() {
                self.add_error(func.span, "main の戻り値型は void でなければなりません");
            }
            if !params.is_empty() {
                self.add_error(func.span, "main は引数を取ってはいけません");
            }
        }

        let mut problems = Vec::new();
        for (param, symbol) in params.iter().zip(&func.parameters) {
            if !param.is_scalar() {
                problems.push(format!(
                    "引数 {} の型は int か bool でなければなりません（{}）",
                    symbol.name, param
                ));
            }
        }
        if !(ret.is_scalar() || ret.is_void()) {
            problems.push(format!(
                "関数 {} の戻り値型 {} は使用できません",
                func.symbol.name, ret
            ));
        }
        for message in problems {
            self.add_error(func.span, message);
        }

        self.current_return_type = Some((**ret).clone());
        self.loop_depth = 0;
        self.check_block(&mut func.body);
        self.current_return_type = None;
    }

    // ==================== 文 ====================

    fn check_block(&mut self, block: &mut StatementList) {
        for statement in &mut block.statements {
            self.check_statement(statement);
        }
    }

    fn check_statement(&mut self, statement: &mut Statement) {
        match statement {
            Statement::Variable(decl) => self.check_variable_declaration(decl),
            Statement::Assignment(assignment) => {
                let location = self.check_expression(&mut assignment.location);
                let value = self.check_expression(&mut assignment.value);
                let ty = location.assign(&value);
                assignment.ty = Some(self.resolve(assignment.span, ty, &[&location, &value]));
            }
            Statement::Call(call) => {
                self.check_call(call);
            }
            Statement::IfElse(branch) => {
                let condition = self.check_expression(&mut branch.condition);
                let ty = if condition.is_error() || condition == Type::Bool {
                    Type::Void
                } else {
                    Type::error(format!("if の条件は bool でなければなりません（{}）", condition))
                };
                branch.ty = Some(self.resolve(branch.span, ty, &[&condition]));
                self.check_block(&mut branch.then_block);
                self.check_block(&mut branch.else_block);
            }
            Statement::Loop(body) => {
                self.loop_depth += 1;
                self.check_block(&mut body.body);
                self.loop_depth -= 1;
            }
            Statement::Break(span) => {
                if self.loop_depth == 0 {
                    self.add_error(*span, "ループの外で break は使えません");
                }
            }
            Statement::Continue(span) => {
                if self.loop_depth == 0 {
                    self.add_error(*span, "ループの外で continue は使えません");
                }
            }
            Statement::Return(ret) => self.check_return(ret),
        }
    }

    fn check_return(&mut self, ret: &mut Return) {
        let expected = self.current_return_type.clone().unwrap_or(Type::Void);
        let actual = match &mut ret.value {
            Some(value) => self.check_expression(value),
            None => Type::Void,
        };
        let ty = if actual.is_error() || expected.equivalent(&actual) {
            actual.clone()
        } else {
            Type::error(format!(
                "戻り値の型が一致しません: {}を期待しましたが、{}が見つかりました",
                expected, actual
            ))
        };
        ret.ty = Some(self.resolve(ret.span, ty, &[&actual]));
    }

    // ==================== 式 ====================

    /// 式の型を求め、そのノードに記録する
    pub fn check_expression(&mut self, expr: &mut Expression) -> Type {
        match expr {
            Expression::LiteralInt(lit) => lit.ty.insert(Type::Int).clone(),
            Expression::LiteralBool(lit) => lit.ty.insert(Type::Bool).clone(),
            Expression::VarAccess(access) => access.ty.insert(access.symbol.ty.clone()).clone(),
            Expression::ArrayAccess(access) => {
                let index = self.check_expression(&mut access.index);
                let ty = access.symbol.ty.index(&index);
                let ty = self.resolve(access.span, ty, &[&access.symbol.ty, &index]);
                access.ty.insert(ty).clone()
            }
            Expression::Call(call) => self.check_call(call),
            Expression::Op(op) => self.check_operation(op),
        }
    }

    fn check_call(&mut self, call: &mut Call) -> Type {
        let args: Vec<Type> = call
            .arguments
            .iter_mut()
            .map(|arg| self.check_expression(arg))
            .collect();
        let ty = call.callee.ty.call(&args);
        let operands: Vec<&Type> = std::iter::once(&call.callee.ty).chain(&args).collect();
        let ty = self.resolve(call.span, ty, &operands);
        call.ty.insert(ty).clone()
    }

    fn check_operation(&mut self, op: &mut OpExpr) -> Type {
        let left = self.check_expression(&mut op.left);
        let right = op
            .right
            .as_mut()
            .map(|right| self.check_expression(right));

        let ty = match (op.op, &right) {
            (Operation::Not, _) => left.not(),
            (_, None) => Type::error(format!("演算子 {} には右オペランドが必要です", op.op)),
            (Operation::Add, Some(r)) => left.add(r),
            (Operation::Sub, Some(r)) => left.sub(r),
            (Operation::Mul, Some(r)) => left.mul(r),
            (Operation::Div, Some(r)) => left.div(r),
            (Operation::And, Some(r)) => left.and(r),
            (Operation::Or, Some(r)) => left.or(r),
            (_, Some(r)) => left.compare(r),
        };

        let ty = match &right {
            Some(r) => self.resolve(op.span, ty, &[&left, r]),
            None => self.resolve(op.span, ty, &[&left]),
        };
        op.ty.insert(ty).clone()
    }
}
