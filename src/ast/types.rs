//! 型の定義と型演算規則
//!
//! Crux の型は閉じた列挙型で表現され、各演算（加算、比較、代入、添字、呼び出しなど）は
//! 型ごとに規則が定義される。規則に当てはまらない組み合わせは `Type::Error` を返し、
//! `Error` はそれを消費するすべての演算へ伝播する。

use serde::{Deserialize, Serialize};
use std::fmt;

/// メモリ上の1要素あたりのバイト数（int も bool も8バイトで格納する）
pub const ELEMENT_SIZE: u64 = 8;

/// `count` 個の要素が占めるバイト数
pub fn storage_bytes(count: u64) -> Option<u64> {
    count
        .checked_mul(ELEMENT_SIZE)
        .filter(|&bytes| i64::try_from(bytes).is_ok())
}

/// 型の表現
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Bool,
    Void,
    Array { base: Box<Type>, extent: u64 },
    Function { params: Vec<Type>, ret: Box<Type> },
    Error { message: String },
}

impl Type {
    pub fn array(base: Type, extent: u64) -> Self {
        Type::Array {
            base: Box::new(base),
            extent,
        }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Type::Error {
            message: message.into(),
        }
    }

    /// 型名から型を解決する。未知の名前はエラー型になる。
    pub fn from_name(name: &str) -> Self {
        match name {
            "int" => Type::Int,
            "bool" => Type::Bool,
            "void" => Type::Void,
            _ => Type::error(format!("未知の型 '{}'", name)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error { .. })
    }

    /// int か bool か
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// 型の同値性
    ///
    /// 配列同士は要素型だけを比較し、要素数は比較しない。
    /// `Error` はどの型とも（自分自身とも）同値にならない。
    pub fn equivalent(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Int, Type::Int) | (Type::Bool, Type::Bool) | (Type::Void, Type::Void) => true,
            (Type::Array { base: a, .. }, Type::Array { base: b, .. }) => a.equivalent(b),
            (
                Type::Function { params: pa, ret: ra },
                Type::Function { params: pb, ret: rb },
            ) => {
                pa.len() == pb.len()
                    && pa.iter().zip(pb).all(|(a, b)| a.equivalent(b))
                    && ra.equivalent(rb)
            }
            _ => false,
        }
    }

    /// 格納に必要なバイト数（要素数 × 8）
    ///
    /// 符号付き64ビットのオフセットで表せない大きさなら `None`
    pub fn storage_size(&self) -> Option<u64> {
        match self {
            Type::Array { extent, .. } => storage_bytes(*extent),
            _ => Some(ELEMENT_SIZE),
        }
    }

    /// 関数型の戻り値型。関数でなければ `None`
    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Type::Function { ret, .. } => Some(ret),
            _ => None,
        }
    }

    // ==================== 演算規則 ====================

    pub fn add(&self, that: &Type) -> Type {
        self.arithmetic(that, "加算")
    }

    pub fn sub(&self, that: &Type) -> Type {
        self.arithmetic(that, "減算")
    }

    pub fn mul(&self, that: &Type) -> Type {
        self.arithmetic(that, "乗算")
    }

    pub fn div(&self, that: &Type) -> Type {
        self.arithmetic(that, "除算")
    }

    pub fn and(&self, that: &Type) -> Type {
        self.logical(that, "論理積")
    }

    pub fn or(&self, that: &Type) -> Type {
        self.logical(that, "論理和")
    }

    pub fn not(&self) -> Type {
        match self {
            Type::Error { .. } => self.clone(),
            Type::Bool => Type::Bool,
            _ => Type::error(format!("{} の否定はできません", self)),
        }
    }

    /// 比較：同じスカラー型同士なら bool
    pub fn compare(&self, that: &Type) -> Type {
        if let Some(infected) = self.infect(that) {
            return infected;
        }
        match (self, that) {
            (Type::Int, Type::Int) | (Type::Bool, Type::Bool) => Type::Bool,
            _ => self.cannot("比較", that),
        }
    }

    /// 代入：同値なスカラー型同士のみ許され、結果は代入先の型
    pub fn assign(&self, that: &Type) -> Type {
        if let Some(infected) = self.infect(that) {
            return infected;
        }
        match self {
            Type::Array { .. } | Type::Function { .. } => {
                Type::error(format!("{} には代入できません", self))
            }
            _ if self.is_scalar() && self.equivalent(that) => self.clone(),
            _ => self.cannot("代入", that),
        }
    }

    /// 添字アクセス：配列を int で添字付けすると要素型
    pub fn index(&self, that: &Type) -> Type {
        if let Some(infected) = self.infect(that) {
            return infected;
        }
        match (self, that) {
            (Type::Array { base, .. }, Type::Int) => (**base).clone(),
            (Type::Array { .. }, _) => {
                Type::error(format!("配列の添字は int でなければなりません（{}）", that))
            }
            _ => self.cannot("添字アクセス", that),
        }
    }

    /// 呼び出し：宣言された各引数について宣言順に同値性を確認し、戻り値型を返す
    pub fn call(&self, args: &[Type]) -> Type {
        if self.is_error() {
            return self.clone();
        }
        if let Some(err) = args.iter().find(|arg| arg.is_error()) {
            return err.clone();
        }
        let Type::Function { params, ret } = self else {
            return Type::error(format!("{} は呼び出せません", self));
        };
        if params.len() != args.len() {
            return Type::error(format!(
                "引数の数が一致しません: {}個を期待しましたが、{}個が渡されました",
                params.len(),
                args.len()
            ));
        }
        for (i, (param, arg)) in params.iter().zip(args).enumerate() {
            if !param.equivalent(arg) {
                return Type::error(format!(
                    "{}番目の引数の型が一致しません: {}を期待しましたが、{}が渡されました",
                    i + 1,
                    param,
                    arg
                ));
            }
        }
        (**ret).clone()
    }

    fn arithmetic(&self, that: &Type, op: &str) -> Type {
        if let Some(infected) = self.infect(that) {
            return infected;
        }
        match (self, that) {
            (Type::Int, Type::Int) => Type::Int,
            _ => self.cannot(op, that),
        }
    }

    fn logical(&self, that: &Type, op: &str) -> Type {
        if let Some(infected) = self.infect(that) {
            return infected;
        }
        match (self, that) {
            (Type::Bool, Type::Bool) => Type::Bool,
            _ => self.cannot(op, that),
        }
    }

    /// どちらかのオペランドがエラーなら、そのエラーをそのまま返す
    fn infect(&self, that: &Type) -> Option<Type> {
        if self.is_error() {
            Some(self.clone())
        } else if that.is_error() {
            Some(that.clone())
        } else {
            None
        }
    }

    fn cannot(&self, op: &str, that: &Type) -> Type {
        Type::error(format!("{} と {} の{}はできません", self, that, op))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Array { base, extent } => write!(f, "array[{},{}]", extent, base),
            Type::Function { params, ret } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "func({}):{}", params.join(","), ret)
            }
            Type::Error { message } => write!(f, "error({})", message),
        }
    }
}
