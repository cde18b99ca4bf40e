//! 文と式の型チェックテスト

use super::*;
use cruxc::ast::*;
use cruxc::compiler::check_source_tree;

#[test]
fn test_well_typed_program() {
    assert_well_typed(
        r#"
        int a[10];
        int fact(int n) {
            if n <= 1 { return 1; }
            return n * fact(n - 1);
        }
        void main() {
            int i;
            i = 0;
            loop {
                if i >= 10 { break; }
                a[i] = fact(i);
                i = i + 1;
            }
            printInt(a[5]);
            println();
        }
        "#,
    );
}

#[test]
fn test_assignment_type_mismatch() {
    let errors = assert_type_errors("void main() { int x; x = true; }", 1);
    assert!(errors[0].message.contains("代入"));
}

#[test]
fn test_error_is_reported_once_at_origin() {
    // (1 + true) だけが誤りで、外側の * と代入は黙って伝播する
    let source = "void main() { int x; x = (1 + true) * 2; }";
    let errors = assert_type_errors(source, 1);
    let origin = source.find("1 + true").unwrap_or(usize::MAX);
    assert_eq!(errors[0].span.start, origin);
}

#[test]
fn test_sibling_errors_are_all_reported() {
    let source = r#"
        void main() {
            int x;
            bool b;
            x = b;
            b = x;
            x = 1 && 2;
        }
    "#;
    assert_type_errors(source, 3);
}

#[test]
fn test_if_condition_must_be_bool() {
    let errors = assert_type_errors("void main() { if 1 { } }", 1);
    assert!(errors[0].message.contains("if"));
}

#[test]
fn test_return_type_mismatch() {
    assert_type_errors("int f() { return true; } void main() { }", 1);
}

#[test]
fn test_missing_return_value() {
    assert_type_errors("int f() { return; } void main() { }", 1);
}

#[test]
fn test_value_returned_from_void_function() {
    assert_type_errors("void main() { return 1; }", 1);
}

#[test]
fn test_break_and_continue_outside_loop() {
    assert_type_errors("void main() { break; continue; }", 2);
    assert_well_typed("void main() { loop { if true { break; } continue; } }");
}

#[test]
fn test_call_arity_and_argument_types() {
    assert_type_errors("void main() { printInt(); }", 1);
    assert_type_errors("void main() { printInt(true); }", 1);
    assert_type_errors("void main() { printInt(1, 2); }", 1);
    assert_well_typed("void main() { printChar(readChar()); printBool(readInt() > 0); }");
}

#[test]
fn test_calling_a_variable() {
    assert_type_errors("int x; void main() { x(); }", 1);
}

#[test]
fn test_indexing() {
    assert_type_errors("int a[3]; void main() { a[true] = 1; }", 1);
    assert_type_errors("int s; void main() { s[0] = 1; }", 1);
    assert_type_errors("int a[3]; void main() { a = 1; }", 1);
}

#[test]
fn test_logical_and_comparison_operators() {
    assert_well_typed("void main() { bool b; b = !(1 < 2) && (true == false) || (3 != 4); }");
    assert_type_errors("void main() { bool b; b = 1 < true; }", 1);
    assert_type_errors("void main() { bool b; b = !1; }", 1);
}

/// main 本体の文を取り出す
fn main_statements(ast: &DeclarationList) -> &[Statement] {
    ast.declarations
        .iter()
        .find_map(|decl| match decl {
            Declaration::Function(func) if func.symbol.name == "main" => {
                Some(func.body.statements.as_slice())
            }
            _ => None,
        })
        .expect("main should exist")
}

#[test]
fn test_ill_typed_operation_carries_error_type() {
    let (ast, errors) = check_source_tree("void main() { int x; x = (1 + true) * 2; }")
        .expect("front end should accept the source");
    assert_eq!(errors.len(), 1);

    let Statement::Assignment(assignment) = &main_statements(&ast)[1] else {
        panic!("expected an assignment");
    };
    let Expression::Op(mul) = &assignment.value else {
        panic!("expected an operation");
    };
    assert!(mul.ty.as_ref().map_or(false, Type::is_error));
    let Expression::Op(add) = mul.left.as_ref() else {
        panic!("expected the inner addition");
    };
    assert!(add.ty.as_ref().map_or(false, Type::is_error));
    assert_eq!(add.left.ty(), Some(&Type::Int));
    assert_eq!(add.right.as_deref().and_then(Expression::ty), Some(&Type::Bool));
    // 代入も伝播した Error 型を持つ
    assert!(assignment.ty.as_ref().map_or(false, Type::is_error));
}

#[test]
fn test_well_typed_nodes_carry_their_types() {
    let source = r#"
        int a[4];
        int f(int n) { return n; }
        void main() {
            bool b;
            b = a[1] < f(2);
            if b { return; }
        }
    "#;
    let (ast, errors) = check_source_tree(source).expect("front end should accept the source");
    assert!(errors.is_empty(), "unexpected type errors: {:?}", errors);

    let Declaration::Array(array) = &ast.declarations[0] else {
        panic!("expected the array declaration");
    };
    assert_eq!(array.ty, Some(Type::array(Type::Int, 4)));

    let statements = main_statements(&ast);
    let Statement::Variable(decl) = &statements[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.ty, Some(Type::Bool));

    let Statement::Assignment(assignment) = &statements[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.ty, Some(Type::Bool));
    assert_eq!(assignment.location.ty(), Some(&Type::Bool));
    let Expression::Op(cmp) = &assignment.value else {
        panic!("expected a comparison");
    };
    assert_eq!(cmp.ty, Some(Type::Bool));
    assert_eq!(cmp.left.ty(), Some(&Type::Int));
    assert_eq!(cmp.right.as_deref().and_then(Expression::ty), Some(&Type::Int));

    let Statement::IfElse(branch) = &statements[2] else {
        panic!("expected an if statement");
    };
    assert_eq!(branch.ty, Some(Type::Void));
    assert_eq!(branch.condition.ty(), Some(&Type::Bool));
    let Statement::Return(ret) = &branch.then_block.statements[0] else {
        panic!("expected a return");
    };
    assert_eq!(ret.ty, Some(Type::Void));
}

#[test]
fn test_unchecked_tree_has_no_types() {
    let ast = cruxc::compiler::parse_source("void main() { int x; x = 1; }").expect("parse");
    let Statement::Assignment(assignment) = &main_statements(&ast)[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.ty, None);
    assert_eq!(assignment.value.ty(), None);
}
