//! アセンブリ出力のテスト

use super::*;
use cruxc::error::{CodegenError, CruxError};
use pretty_assertions::assert_eq;

#[test]
fn test_global_storage_directives() {
    let asm = assemble("int x; bool flags[3]; int a[10]; void main() { }");
    let directives: Vec<&str> = lines(&asm)
        .into_iter()
        .filter(|l| l.starts_with(".comm"))
        .collect();
    assert_eq!(
        directives,
        vec![".comm x, 8, 8", ".comm flags, 24, 8", ".comm a, 80, 8"]
    );
}

#[test]
fn test_function_header_and_frame() {
    let asm = assemble("void main() { int x; x = 2 + 3; return; }");
    assert!(asm.contains("    .globl main\nmain:\n"));
    let body = lines(function_body(&asm, "main"));
    assert_eq!(
        body,
        vec![
            "enter $32, $0",
            "movq $2, %r10",
            "movq %r10, -8(%rbp)",
            "movq $3, %r10",
            "movq %r10, -16(%rbp)",
            "movq -8(%rbp), %r10",
            "addq -16(%rbp), %r10",
            "movq %r10, -24(%rbp)",
            "movq -24(%rbp), %r10",
            "movq %r10, -32(%rbp)",
            "movq $0, %rax",
            "leave",
            "ret",
        ]
        .into_iter()
        .chain(
            // Linux では最後にスタック非実行の指定が付く
            cfg!(target_os = "linux").then_some(".section .note.GNU-stack,\"\",@progbits"),
        )
        .collect::<Vec<_>>()
    );
}

#[test]
fn test_frame_size_is_sixteen_byte_aligned() {
    let asm = assemble("void main() { int x; x = 1; }");
    // 変数2つ（定数の一時変数と x）
    assert!(function_body(&asm, "main").contains("enter $16, $0"));

    let asm = assemble("void main() { int x; x = 1 + 2; }");
    // 変数4つ
    assert!(function_body(&asm, "main").contains("enter $32, $0"));

    let asm = assemble("void main() { bool b; b = !true; }");
    // 変数3つ → 4スロット分
    assert!(function_body(&asm, "main").contains("enter $32, $0"));
}

#[test]
fn test_global_array_element_access() {
    let asm = assemble("int a[4]; void main() { a[2] = 7; printInt(a[2]); }");
    let body = function_body(&asm, "main");
    assert!(body.contains("leaq a(%rip), %r11"));
    assert!(body.contains("imulq $8, %r10"));
    assert!(body.contains("addq %r10, %r11"));
    assert!(body.contains("movq %r10, (%r11)"));
    assert!(body.contains("movq (%r11), %r10"));
}

#[test]
fn test_division_uses_rax_and_cqto() {
    let asm = assemble("void main() { int q; q = 17 / 5; }");
    let body = lines(function_body(&asm, "main"));
    let div = body.iter().position(|l| *l == "cqto").expect("cqto");
    assert!(body[div - 1].ends_with(", %rax"));
    assert!(body[div + 1].starts_with("idivq -"));
    assert!(body[div + 2].starts_with("movq %rax, "));
}

#[test]
fn test_comparison_uses_conditional_move() {
    let asm = assemble("void main() { bool b; b = 1 < 2; b = 3 >= 4; b = 5 != 6; }");
    let body = function_body(&asm, "main");
    assert!(body.contains("cmovl %r11, %rax"));
    assert!(body.contains("cmovge %r11, %rax"));
    assert!(body.contains("cmovne %r11, %rax"));
}

#[test]
fn test_not_subtracts_from_one() {
    let asm = assemble("void main() { bool b; b = !true; }");
    let body = lines(function_body(&asm, "main"));
    let one = body
        .iter()
        .position(|l| *l == "movq $1, %r10")
        .expect("movq $1");
    // 定数 true の読み込み（movq $1, %r10）の後に否定の movq $1 がもう一度現れる
    let not_start = body[one + 1..]
        .iter()
        .position(|l| *l == "movq $1, %r10")
        .map(|i| i + one + 1)
        .expect("negation");
    assert!(body[not_start + 1].starts_with("subq -"));
}

#[test]
fn test_branch_tests_condition_against_zero() {
    let asm = assemble("void main() { if true { println(); } }");
    let body = lines(function_body(&asm, "main"));
    let cmp = body.iter().position(|l| *l == "cmpq $0, %r10").expect("cmpq");
    assert!(body[cmp + 1].starts_with("jne .L"));
}

#[test]
fn test_stack_arguments_in_callee() {
    let asm = assemble(
        r#"
        int last(int a, int b, int c, int d, int e, int f, int g, int h) { return h; }
        void main() { }
        "#,
    );
    let body = lines(function_body(&asm, "last"));
    assert_eq!(body[1], "movq %rdi, -8(%rbp)");
    assert_eq!(body[6], "movq %r9, -48(%rbp)");
    assert_eq!(body[7], "movq 16(%rbp), %r10");
    assert_eq!(body[8], "movq %r10, -56(%rbp)");
    assert_eq!(body[9], "movq 24(%rbp), %r10");
    assert_eq!(body[10], "movq %r10, -64(%rbp)");
    assert_eq!(body[11], "movq -64(%rbp), %rax");
}

#[test]
fn test_stack_arguments_at_call_site() {
    let asm = assemble(
        r#"
        int seven(int a, int b, int c, int d, int e, int f, int g) { return g; }
        void main() { printInt(seven(1, 2, 3, 4, 5, 6, 7)); }
        "#,
    );
    let body = lines(function_body(&asm, "main"));
    let call = body.iter().position(|l| *l == "call seven").expect("call");
    let pad = body.iter().position(|l| *l == "subq $8, %rsp").expect("padding");
    assert!(pad < call);
    assert!(body[pad + 1].starts_with("pushq -"));
    assert_eq!(body[call - 1].split(", ").last(), Some("%r9"));
    assert_eq!(body[call + 1], "addq $16, %rsp");
    assert!(body[call + 2].starts_with("movq %rax, -"));
}

#[test]
fn test_void_call_does_not_store_result() {
    let asm = assemble("void main() { println(); }");
    let body = lines(function_body(&asm, "main"));
    let call = body.iter().position(|l| *l == "call println").expect("call");
    assert_eq!(body[call + 1], "movq $0, %rax");
}

#[test]
fn test_large_constants_use_movabsq() {
    let asm = assemble("void main() { int x; x = 10000000000; }");
    assert!(asm.contains("movabsq $10000000000, %r10"));
}

#[test]
fn test_type_errors_prevent_code_generation() {
    let err = compile_source_err("void main() { int x; x = true; }");
    assert!(matches!(err, CruxError::Type(_)));
}

#[test]
fn test_unaddressable_global_is_a_codegen_error() {
    // 型チェックを経ずに下ろした木でもパニックせずエラーになる
    let program = lower("int a[9223372036854775807]; void main() { }");
    let err = cruxc::codegen::generate(&program).unwrap_err();
    assert!(matches!(
        err,
        CruxError::Codegen(CodegenError::GlobalTooLarge { ref name, count })
            if name.as_str() == "a" && count == 9223372036854775807
    ));
}

fn compile_source_err(source: &str) -> CruxError {
    match cruxc::compiler::compile_source(source) {
        Ok(artifact) => panic!("expected an error, got:\n{}", artifact.output),
        Err(e) => e,
    }
}
