//! 型演算規則のテスト

use cruxc::ast::Type;
use test_case::test_case;

fn err() -> Type {
    Type::error("earlier")
}

#[test_case(Type::Int, Type::Int => Type::Int ; "int assigned int")]
#[test_case(Type::Bool, Type::Bool => Type::Bool ; "bool assigned bool")]
fn test_assign_scalar(location: Type, value: Type) -> Type {
    location.assign(&value)
}

#[test_case(Type::Int, Type::Bool ; "int assigned bool")]
#[test_case(Type::Bool, Type::Int ; "bool assigned int")]
#[test_case(Type::array(Type::Int, 3), Type::array(Type::Int, 3) ; "array assigned array")]
#[test_case(Type::function(vec![], Type::Void), Type::function(vec![], Type::Void) ; "function assigned function")]
#[test_case(Type::Void, Type::Void ; "void assigned void")]
fn test_assign_rejected(location: Type, value: Type) {
    assert!(location.assign(&value).is_error());
}

#[test_case(Type::Int, Type::Int => Type::Int ; "int and int")]
#[test_case(Type::Int, Type::Bool => matches Type::Error { .. } ; "int and bool")]
#[test_case(Type::Bool, Type::Bool => matches Type::Error { .. } ; "bool and bool")]
fn test_arithmetic(lhs: Type, rhs: Type) -> Type {
    lhs.add(&rhs)
}

#[test_case(Type::Bool, Type::Bool => Type::Bool ; "bool and bool")]
#[test_case(Type::Int, Type::Int => matches Type::Error { .. } ; "int and int")]
fn test_logical(lhs: Type, rhs: Type) -> Type {
    lhs.and(&rhs)
}

#[test_case(Type::Int, Type::Int => Type::Bool ; "ints")]
#[test_case(Type::Bool, Type::Bool => Type::Bool ; "bools")]
#[test_case(Type::Int, Type::Bool => matches Type::Error { .. } ; "mixed")]
#[test_case(Type::array(Type::Int, 2), Type::array(Type::Int, 2) => matches Type::Error { .. } ; "arrays")]
fn test_compare(lhs: Type, rhs: Type) -> Type {
    lhs.compare(&rhs)
}

#[test_case(Type::Bool => Type::Bool ; "bool")]
#[test_case(Type::Int => matches Type::Error { .. } ; "int")]
fn test_not(operand: Type) -> Type {
    operand.not()
}

#[test_case(Type::array(Type::Bool, 3), Type::Int => Type::Bool ; "bool array with int index")]
#[test_case(Type::array(Type::Int, 3), Type::Bool => matches Type::Error { .. } ; "bool index")]
#[test_case(Type::Int, Type::Int => matches Type::Error { .. } ; "indexing a scalar")]
fn test_index(array: Type, subscript: Type) -> Type {
    array.index(&subscript)
}

#[test_case(vec![Type::Int, Type::Bool] => Type::Int ; "matching arguments")]
#[test_case(vec![Type::Int] => matches Type::Error { .. } ; "too few arguments")]
#[test_case(vec![Type::Int, Type::Bool, Type::Int] => matches Type::Error { .. } ; "too many arguments")]
#[test_case(vec![Type::Bool, Type::Int] => matches Type::Error { .. } ; "swapped arguments")]
fn test_call(args: Vec<Type>) -> Type {
    Type::function(vec![Type::Int, Type::Bool], Type::Int).call(&args)
}

#[test]
fn test_errors_infect_every_operation() {
    let e = err();
    let results = [
        e.add(&Type::Int),
        Type::Int.sub(&e),
        e.mul(&e),
        Type::Int.div(&e),
        e.and(&Type::Bool),
        Type::Bool.or(&e),
        e.not(),
        e.compare(&Type::Int),
        Type::Int.compare(&e),
        Type::Int.assign(&e),
        e.assign(&Type::Int),
        Type::array(Type::Int, 2).index(&e),
        Type::function(vec![Type::Int], Type::Int).call(&[e.clone()]),
        e.call(&[]),
    ];
    for result in results {
        assert_eq!(result, e);
    }
}

#[test]
fn test_equivalence() {
    assert!(Type::array(Type::Int, 3).equivalent(&Type::array(Type::Int, 10)));
    assert!(!Type::array(Type::Int, 3).equivalent(&Type::array(Type::Bool, 3)));
    assert!(!err().equivalent(&err()));
    assert!(Type::function(vec![Type::Int], Type::Void)
        .equivalent(&Type::function(vec![Type::Int], Type::Void)));
}

#[test]
fn test_display() {
    assert_eq!(Type::array(Type::Bool, 3).to_string(), "array[3,bool]");
    assert_eq!(
        Type::function(vec![Type::Int, Type::Bool], Type::Void).to_string(),
        "func(int,bool):void"
    );
}
