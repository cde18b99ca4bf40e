//! IRのテキスト表示（`--emit ir` 用）

use std::fmt::{self, Write};

use super::*;

/// プログラム全体を文字列化する
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    // String への書き込みは失敗しない
    let _ = write_program(&mut out, program);
    out
}

pub fn write_program(out: &mut impl Write, program: &Program) -> fmt::Result {
    for global in &program.globals {
        write!(out, "global {} : {} ", global.symbol.name, global.symbol.ty)?;
        match global.size_in_bytes() {
            Some(bytes) => writeln!(out, "({} bytes)", bytes)?,
            None => writeln!(out, "(too large)")?,
        }
    }
    for function in &program.functions {
        writeln!(out)?;
        write_function(out, program, function)?;
    }
    Ok(())
}

pub fn write_function(out: &mut impl Write, program: &Program, function: &Function) -> fmt::Result {
    let args: Vec<String> = function
        .arguments
        .iter()
        .map(|&arg| local_name(function, arg))
        .collect();
    writeln!(
        out,
        "function {}({}) : {}  start {}",
        function.name,
        args.join(", "),
        function.ty,
        function.start
    )?;
    for (index, inst) in function.instructions().iter().enumerate() {
        write!(out, "  {:>4}: ", InstId(index).to_string())?;
        write_kind(out, program, function, &inst.kind)?;
        match inst.next {
            [None, None] => writeln!(out)?,
            [Some(fall), None] => writeln!(out, "  -> {}", fall)?,
            [None, Some(taken)] => writeln!(out, "  -> true {}", taken)?,
            [Some(fall), Some(taken)] => writeln!(out, "  -> {} | true {}", fall, taken)?,
        }
    }
    Ok(())
}

fn write_kind(
    out: &mut impl Write,
    program: &Program,
    function: &Function,
    kind: &InstKind,
) -> fmt::Result {
    let name = |var: LocalVar| local_name(function, var);
    match kind {
        InstKind::Nop => write!(out, "nop"),
        InstKind::Jump => write!(out, "jump"),
        InstKind::Branch { condition } => write!(out, "branch {}", name(*condition)),
        InstKind::AddressAt { dst, base, index } => match index {
            Some(index) => write!(out, "{} = &{}[{}]", dst, base.name, name(*index)),
            None => write!(out, "{} = &{}", dst, base.name),
        },
        InstKind::Load { dst, address } => write!(out, "{} = load {}", name(*dst), address),
        InstKind::Store { address, value } => write!(out, "store {}, {}", address, name(*value)),
        InstKind::Copy { dst, src } => {
            write!(out, "{} = ", name(*dst))?;
            match src {
                Operand::Local(var) => write!(out, "{}", name(*var)),
                Operand::Constant(id) => match program.constant(*id) {
                    Some(Constant::Int(value)) => write!(out, "{}", value),
                    Some(Constant::Bool(value)) => write!(out, "{}", value),
                    None => write!(out, "<const {}>", id.0),
                },
            }
        }
        InstKind::Binary { op, dst, lhs, rhs } => write!(
            out,
            "{} = {:?} {}, {}",
            name(*dst),
            op,
            name(*lhs),
            name(*rhs)
        ),
        InstKind::Compare {
            predicate,
            dst,
            lhs,
            rhs,
        } => write!(
            out,
            "{} = cmp.{:?} {}, {}",
            name(*dst),
            predicate,
            name(*lhs),
            name(*rhs)
        ),
        InstKind::Not { dst, operand } => write!(out, "{} = not {}", name(*dst), name(*operand)),
        InstKind::Call { callee, args, dst } => {
            if let Some(dst) = dst {
                write!(out, "{} = ", name(*dst))?;
            }
            let args: Vec<String> = args.iter().map(|&arg| name(arg)).collect();
            write!(out, "call {}({})", callee.name, args.join(", "))
        }
        InstKind::Return { value } => match value {
            Some(value) => write!(out, "return {}", name(*value)),
            None => write!(out, "return"),
        },
    }
}

fn local_name(function: &Function, var: LocalVar) -> String {
    match function.local_info(var).and_then(|info| info.name.as_deref()) {
        Some(name) => format!("${}", name),
        None => format!("$t{}", var.0),
    }
}
