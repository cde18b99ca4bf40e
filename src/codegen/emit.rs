//! 命令ごとのアセンブリ出力
//!
//! 各命令は固定の命令列へ直接変換する。
//! メモリ同士の転送はすべて `%r10` / `%r11` を経由する。

use std::fmt::Write;

use crate::error::{CodegenError, CruxResult};
use crate::ir::*;

use super::{Linearization, StackFrame, ARGUMENT_REGISTERS, RETURN_REGISTER};

/// 関数の入口で引数をそれぞれのスロットへ退避する
pub(super) fn copy_arguments(
    out: &mut String,
    frame: &mut StackFrame,
    function: &Function,
) -> CruxResult<()> {
    for (index, &arg) in function.arguments.iter().enumerate() {
        let slot = frame.operand(arg);
        match ARGUMENT_REGISTERS.get(index) {
            Some(register) => writeln!(out, "    movq {}, {}", register, slot)?,
            None => {
                // 呼び出し側が積んだ7番目以降の引数は戻りアドレスの上にある
                let offset = 16 + 8 * (index - ARGUMENT_REGISTERS.len());
                writeln!(out, "    movq {}(%rbp), %r10", offset)?;
                writeln!(out, "    movq %r10, {}", slot)?;
            }
        }
    }
    Ok(())
}

/// 関数の末尾
pub(super) fn epilogue(out: &mut String, value: Option<String>) -> CruxResult<()> {
    match value {
        Some(slot) => writeln!(out, "    movq {}, {}", slot, RETURN_REGISTER)?,
        None => writeln!(out, "    movq $0, {}", RETURN_REGISTER)?,
    }
    writeln!(out, "    leave")?;
    writeln!(out, "    ret")?;
    Ok(())
}

pub(super) fn instruction(
    out: &mut String,
    frame: &mut StackFrame,
    program: &Program,
    function: &Function,
    linear: &Linearization,
    id: InstId,
) -> CruxResult<()> {
    let inst = function.get(id).ok_or_else(|| CodegenError::MalformedGraph {
        function: function.name.clone(),
        message: format!("{} は存在しません", id),
    })?;

    match &inst.kind {
        InstKind::Nop | InstKind::Jump => {}
        InstKind::Branch { condition } => {
            let target = inst
                .next[1]
                .and_then(|taken| linear.label(taken))
                .ok_or_else(|| CodegenError::MalformedGraph {
                    function: function.name.clone(),
                    message: format!("条件分岐 {} の飛び先にラベルがありません", id),
                })?;
            writeln!(out, "    movq {}, %r10", frame.operand(*condition))?;
            writeln!(out, "    cmpq $0, %r10")?;
            writeln!(out, "    jne {}", target)?;
        }
        InstKind::AddressAt { dst, base, index } => {
            writeln!(out, "    leaq {}(%rip), %r11", base.name)?;
            if let Some(index) = index {
                writeln!(out, "    movq {}, %r10", frame.operand(*index))?;
                writeln!(
                    out,
                    "    imulq ${}, %r10",
                    crate::ast::types::ELEMENT_SIZE
                )?;
                writeln!(out, "    addq %r10, %r11")?;
            }
            writeln!(out, "    movq %r11, {}", frame.operand(*dst))?;
        }
        InstKind::Load { dst, address } => {
            writeln!(out, "    movq {}, %r11", frame.operand(*address))?;
            writeln!(out, "    movq (%r11), %r10")?;
            writeln!(out, "    movq %r10, {}", frame.operand(*dst))?;
        }
        InstKind::Store { address, value } => {
            writeln!(out, "    movq {}, %r11", frame.operand(*address))?;
            writeln!(out, "    movq {}, %r10", frame.operand(*value))?;
            writeln!(out, "    movq %r10, (%r11)")?;
        }
        InstKind::Copy { dst, src } => {
            match src {
                Operand::Local(var) => writeln!(out, "    movq {}, %r10", frame.operand(*var))?,
                Operand::Constant(cid) => {
                    let value = program
                        .constant(*cid)
                        .ok_or_else(|| CodegenError::Internal {
                            message: format!("定数 {} が定数プールにありません", cid.0),
                        })?
                        .as_i64();
                    if i32::try_from(value).is_ok() {
                        writeln!(out, "    movq ${}, %r10", value)?;
                    } else {
                        writeln!(out, "    movabsq ${}, %r10", value)?;
                    }
                }
            }
            writeln!(out, "    movq %r10, {}", frame.operand(*dst))?;
        }
        InstKind::Binary {
            op: BinaryOp::Div,
            dst,
            lhs,
            rhs,
        } => {
            writeln!(out, "    movq {}, %rax", frame.operand(*lhs))?;
            writeln!(out, "    cqto")?;
            writeln!(out, "    idivq {}", frame.operand(*rhs))?;
            writeln!(out, "    movq %rax, {}", frame.operand(*dst))?;
        }
        InstKind::Binary { op, dst, lhs, rhs } => {
            writeln!(out, "    movq {}, %r10", frame.operand(*lhs))?;
            writeln!(out, "    {} {}, %r10", op.mnemonic(), frame.operand(*rhs))?;
            writeln!(out, "    movq %r10, {}", frame.operand(*dst))?;
        }
        InstKind::Compare {
            predicate,
            dst,
            lhs,
            rhs,
        } => {
            writeln!(out, "    movq $0, %rax")?;
            writeln!(out, "    movq $1, %r11")?;
            writeln!(out, "    movq {}, %r10", frame.operand(*lhs))?;
            writeln!(out, "    cmpq {}, %r10", frame.operand(*rhs))?;
            writeln!(out, "    {} %r11, %rax", predicate.cmov())?;
            writeln!(out, "    movq %rax, {}", frame.operand(*dst))?;
        }
        InstKind::Not { dst, operand } => {
            writeln!(out, "    movq $1, %r10")?;
            writeln!(out, "    subq {}, %r10", frame.operand(*operand))?;
            writeln!(out, "    movq %r10, {}", frame.operand(*dst))?;
        }
        InstKind::Call { callee, args, dst } => {
            call(out, frame, &callee.name, args)?;
            if let Some(dst) = dst {
                writeln!(out, "    movq {}, {}", RETURN_REGISTER, frame.operand(*dst))?;
            }
        }
        InstKind::Return { value } => {
            let slot = value.map(|value| frame.operand(value));
            epilogue(out, slot)?;
        }
    }
    Ok(())
}

/// 呼び出し規約に従って引数を配置し、呼び出す
///
/// 7番目以降の引数は右から順に積む。個数が奇数なら先に8バイト空けて
/// `call` 時点の `%rsp` を16バイト境界に保つ。
fn call(out: &mut String, frame: &mut StackFrame, name: &str, args: &[LocalVar]) -> CruxResult<()> {
    let split = args.len().min(ARGUMENT_REGISTERS.len());
    let (in_registers, on_stack) = args.split_at(split);

    let padding = on_stack.len() % 2;
    if padding == 1 {
        writeln!(out, "    subq $8, %rsp")?;
    }
    for arg in on_stack.iter().rev() {
        writeln!(out, "    pushq {}", frame.operand(*arg))?;
    }
    for (arg, register) in in_registers.iter().zip(ARGUMENT_REGISTERS) {
        writeln!(out, "    movq {}, {}", frame.operand(*arg), register)?;
    }

    writeln!(out, "    call {}", name)?;

    let pushed = on_stack.len() + padding;
    if pushed > 0 {
        writeln!(out, "    addq ${}, %rsp", pushed * 8)?;
    }
    Ok(())
}
