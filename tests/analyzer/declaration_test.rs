//! 宣言と main シグネチャの型チェックテスト

use super::*;
use cruxc::analyzer::TypeChecker;
use cruxc::ast::*;

#[test]
fn test_scalar_and_array_globals() {
    assert_well_typed("int x; bool b; int a[10]; bool flags[3]; void main() { }");
}

#[test]
fn test_bool_array_indexing() {
    assert_well_typed(
        r#"
        bool x[3];
        void main() {
            x[0] = true;
            x[1] = !x[0];
            if x[1] || x[2] { printBool(x[0]); }
        }
        "#,
    );
}

#[test]
fn test_array_of_arrays_is_rejected_at_declaration() {
    let span = Span::new(4, 20);
    let inner = Type::array(Type::Int, 2);
    let mut ast = DeclarationList {
        declarations: vec![Declaration::Array(ArrayDeclaration {
            symbol: Symbol::new(SymbolId(100), "grid", Type::array(inner, 3)),
            ty: None,
            span,
        })],
        span: Span::new(0, 20),
    };

    let mut checker = TypeChecker::new();
    checker.check(&mut ast);
    let errors = checker.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].span, span);
    match &ast.declarations[0] {
        Declaration::Array(decl) => assert!(decl.ty.as_ref().map_or(false, Type::is_error)),
        other => panic!("unexpected declaration {:?}", other),
    }
}

#[test]
fn test_array_too_large_to_address() {
    let source = "int a[9223372036854775807]; void main() { }";
    let errors = assert_type_errors(source, 1);
    assert_eq!(errors[0].span.start, 0);
    assert!(errors[0].message.contains("a"));

    // コード生成まで進まず、型エラーとして返る
    let err = cruxc::compiler::compile_source(source).unwrap_err();
    assert!(matches!(err, cruxc::error::CruxError::Type(_)));
}

#[test]
fn test_largest_addressable_array_is_accepted() {
    // 要素数 × 8 が i64 に収まる上限
    assert_well_typed("bool big[1152921504606846975]; void main() { }");
    assert_type_errors("bool big[1152921504606846976]; void main() { }", 1);
}

#[test]
fn test_void_variable_is_rejected() {
    let errors = assert_type_errors("void v; void main() { }", 1);
    assert_eq!(errors[0].span.start, 0);
}

#[test]
fn test_unknown_type_is_reported_once() {
    assert_type_errors("void main() { string s; }", 1);
}

#[test]
fn test_void_array_is_rejected() {
    assert_type_errors("void a[4]; void main() { }", 1);
}

#[test]
fn test_main_without_parameters_returning_void() {
    assert_well_typed("void main() { }");
}

#[test]
fn test_main_with_parameter() {
    let source = "int helper() { return 1; }\nvoid main(int argc) { }";
    let errors = assert_type_errors(source, 1);
    assert!(errors[0].message.contains("main"));
    // 関数定義の先頭（戻り値型）を指す
    assert_eq!(errors[0].span.start, source.find("void main").unwrap_or(usize::MAX));
}

#[test]
fn test_main_returning_int() {
    let errors = assert_type_errors("int main() { return 0; }", 1);
    assert!(errors[0].message.contains("main"));
}

#[test]
fn test_main_errors_do_not_stop_checking() {
    // main の誤りの後ろにある関数の誤りも報告される
    let source = r#"
        int main(bool flag) { return 1; }
        void other() { int x; x = true; }
    "#;
    assert_type_errors(source, 3);
}

#[test]
fn test_void_parameter_is_rejected() {
    assert_type_errors("void f(void v) { } void main() { }", 1);
}

#[test]
fn test_local_declarations() {
    assert_well_typed("void main() { int i; bool done; i = 0; done = i > 3; }");
}
