//! コード生成テストの共通モジュール

use cruxc::compiler::{compile_source, parse_source};
use cruxc::ir::Program;
use cruxc::lowering::lower_program;

mod emission_test;
mod linearize_test;

/// ソースをCFGへ変換する（型チェックは行わない）
pub fn lower(source: &str) -> Program {
    let ast = parse_source(source).expect("parse should succeed");
    lower_program(&ast)
}

/// ソースをアセンブリまでコンパイルする
pub fn assemble(source: &str) -> String {
    compile_source(source).expect("compilation should succeed").output
}

/// 指定した関数のアセンブリ部分（ラベル行から次の .globl まで）
pub fn function_body<'a>(asm: &'a str, name: &str) -> &'a str {
    let header = format!("\n{}:\n", name);
    let start = asm.find(&header).map(|i| i + header.len()).unwrap_or(asm.len());
    let rest = &asm[start..];
    let end = rest.find(".globl").unwrap_or(rest.len());
    &rest[..end]
}

/// 前後の空白を除いた行
pub fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}
