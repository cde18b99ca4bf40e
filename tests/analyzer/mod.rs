//! 型チェックテストの共通モジュール

use cruxc::compiler::check_source;
use cruxc::error::TypeError;

mod declaration_test;
mod statement_test;
mod type_rules_test;

/// ソースを型チェックして型エラーを返す（構文は正しい前提）
pub fn type_errors(source: &str) -> Vec<TypeError> {
    check_source(source).expect("front end should accept the source")
}

/// 型エラーがないことを確認する
pub fn assert_well_typed(source: &str) {
    let errors = type_errors(source);
    assert!(errors.is_empty(), "expected no type errors, got {:?}", errors);
}

/// ちょうど `count` 個の型エラーが出ることを確認し、それらを返す
pub fn assert_type_errors(source: &str, count: usize) -> Vec<TypeError> {
    let errors = type_errors(source);
    assert_eq!(errors.len(), count, "unexpected type errors: {:?}", errors);
    errors
}
