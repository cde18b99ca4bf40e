//! セマンティック解析モジュール
//!
//! このモジュールは名前解決済みのASTに対する型チェックを行います。

mod type_checker;

// 公開API
pub use type_checker::TypeChecker;
