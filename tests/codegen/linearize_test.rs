//! 線形化のテスト

use super::*;
use cruxc::codegen::{self, LinearItem, Linearizer};
use cruxc::ir::InstId;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

const LOOP_PROGRAM: &str = r#"
    int a[8];
    void main() {
        int i;
        i = 0;
        loop {
            if i >= 8 { break; }
            if i == 3 { i = i + 1; continue; }
            a[i] = i * 2;
            i = i + 1;
        }
        printInt(a[7]);
    }
"#;

#[test]
fn test_linearization_is_idempotent() {
    let program = lower(LOOP_PROGRAM);
    let main = program.function("main").expect("main");

    let first = Linearizer::new().linearize(main).expect("linearize");
    let second = Linearizer::new().linearize(main).expect("linearize");
    assert_eq!(first, second);
    assert_eq!(first.instruction_count(), second.instruction_count());

    let asm1 = codegen::generate(&program).expect("generate");
    let asm2 = codegen::generate(&program).expect("generate");
    assert_eq!(asm1, asm2);
}

#[test]
fn test_each_reachable_instruction_is_emitted_once() {
    let program = lower(LOOP_PROGRAM);
    let main = program.function("main").expect("main");
    let linear = Linearizer::new().linearize(main).expect("linearize");

    let emitted: Vec<InstId> = linear
        .items
        .iter()
        .filter_map(|item| match item {
            LinearItem::Inst(id) => Some(*id),
            _ => None,
        })
        .collect();
    let unique: HashSet<InstId> = emitted.iter().copied().collect();
    assert_eq!(unique.len(), emitted.len());

    let reachable: HashSet<InstId> = main.reachable().into_iter().collect();
    assert_eq!(unique, reachable);
}

#[test]
fn test_every_jump_has_a_label() {
    let program = lower(LOOP_PROGRAM);
    let main = program.function("main").expect("main");
    let linear = Linearizer::new().linearize(main).expect("linearize");

    let defined: HashSet<&str> = linear
        .items
        .iter()
        .filter_map(|item| match item {
            LinearItem::Label(label) => Some(label.as_str()),
            _ => None,
        })
        .collect();
    for item in &linear.items {
        if let LinearItem::Jump(label) = item {
            assert!(defined.contains(label.as_str()), "undefined label {}", label);
        }
    }
    assert_eq!(defined.len(), linear.labels.len());
}

#[test]
fn test_if_else_labels_taken_branch_and_join() {
    let program = lower("void main() { if true { printInt(1); } else { printInt(2); } println(); }");
    let main = program.function("main").expect("main");
    let linear = Linearizer::new().linearize(main).expect("linearize");

    assert_eq!(linear.labels.len(), 2);
    let jumps = linear
        .items
        .iter()
        .filter(|item| matches!(item, LinearItem::Jump(_)))
        .count();
    // then 側の末尾から合流点へ戻る1本だけ
    assert_eq!(jumps, 1);
    assert_eq!(linear.items.last(), Some(&LinearItem::Jump(".L1".to_string())));
}

#[test]
fn test_loop_back_edge_jumps_to_header() {
    let program = lower("void main() { loop { println(); } }");
    let main = program.function("main").expect("main");
    let linear = Linearizer::new().linearize(main).expect("linearize");

    assert_eq!(linear.labels.len(), 1);
    let label = linear.labels.values().next().cloned().unwrap_or_default();
    assert_eq!(linear.items.last(), Some(&LinearItem::Jump(label)));
    assert!(!linear.items.contains(&LinearItem::FallOff));
}

#[test]
fn test_labels_are_unique_across_functions() {
    let asm = assemble(
        r#"
        void spin() { loop { break; } }
        void main() { loop { break; } spin(); }
        "#,
    );
    let labels: Vec<&str> = lines(&asm)
        .into_iter()
        .filter(|l| l.starts_with(".L") && l.ends_with(':'))
        .collect();
    let unique: HashSet<&&str> = labels.iter().collect();
    assert_eq!(unique.len(), labels.len());
}

#[test]
fn test_nested_break_jumps_to_inner_exit() {
    let program = lower("void main() { loop { loop { break; } println(); break; } printInt(0); }");
    let asm = codegen::generate(&program).expect("generate");
    let body = lines(function_body(&asm, "main"));

    // 内側の break の後には外側ループの本体（println）が続く
    let println_at = body.iter().position(|l| *l == "call println");
    let print_int_at = body.iter().position(|l| *l == "call printInt");
    assert!(println_at.is_some());
    assert!(print_int_at.is_some());
    assert!(println_at < print_int_at);
}
