//! Code generation module for the Crux language.
//!
//! This module turns the control-flow graph produced by the lowering stage
//! into x86-64 assembly in AT&T syntax. Every variable lives in its own stack
//! slot; registers are only used as scratch space inside one instruction.

mod emit;
mod frame;
mod linearize;

pub use frame::{StackFrame, Variable};
pub use linearize::{LinearItem, Linearization, Linearizer};

use std::fmt::Write;

use crate::error::{CodegenError, CruxResult};
use crate::ir::{Function, Program};

/// 整数引数を渡すレジスタ（順番どおり）
pub const ARGUMENT_REGISTERS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

/// 戻り値レジスタ
pub const RETURN_REGISTER: &str = "%rax";

/// Main code generator structure
pub struct CodeGenerator<'p> {
    program: &'p Program,
    linearizer: Linearizer,
}

impl<'p> CodeGenerator<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            linearizer: Linearizer::new(),
        }
    }

    /// プログラム全体のアセンブリを生成する
    pub fn generate(mut self) -> CruxResult<String> {
        let mut out = String::new();

        for global in &self.program.globals {
            let bytes = global
                .size_in_bytes()
                .ok_or_else(|| CodegenError::GlobalTooLarge {
                    name: global.symbol.name.clone(),
                    count: global.count,
                })?;
            writeln!(out, "    .comm {}, {}, 8", global.symbol.name, bytes)?;
        }
        writeln!(out, "    .text")?;

        for function in &self.program.functions {
            self.generate_function(&mut out, function)?;
        }
        if cfg!(target_os = "linux") {
            writeln!(out, "    .section .note.GNU-stack,\"\",@progbits")?;
        }
        Ok(out)
    }

    fn generate_function(&mut self, out: &mut String, function: &Function) -> CruxResult<()> {
        let linear = self.linearizer.linearize(function)?;
        let mut frame = StackFrame::new();

        // 本体を先に生成し、確定したスロット数でプロローグを書く
        let mut body = String::new();
        emit::copy_arguments(&mut body, &mut frame, function)?;
        for item in &linear.items {
            match item {
                LinearItem::Label(label) => writeln!(body, "{}:", label)?,
                LinearItem::Inst(id) => {
                    emit::instruction(&mut body, &mut frame, self.program, function, &linear, *id)?
                }
                LinearItem::Jump(label) => writeln!(body, "    jmp {}", label)?,
                LinearItem::FallOff => emit::epilogue(&mut body, None)?,
            }
        }

        log::debug!(
            "generated function '{}': {} instructions, {} stack slots",
            function.name,
            linear.instruction_count(),
            frame.slot_count()
        );

        writeln!(out)?;
        writeln!(out, "    .globl {}", function.name)?;
        writeln!(out, "{}:", function.name)?;
        writeln!(out, "    enter ${}, $0", frame.size())?;
        out.push_str(&body);
        Ok(())
    }
}

/// プログラムをアセンブリへ変換する
pub fn generate(program: &Program) -> CruxResult<String> {
    CodeGenerator::new(program).generate()
}
