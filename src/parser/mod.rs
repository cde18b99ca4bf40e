//! パーサーモジュール
//!
//! このモジュールはトークン列を名前解決済みの抽象構文木（AST）に変換します。
//! 再帰下降構文解析を使用し、解析と同時にシンボルテーブルで名前を束縛します。
//!
//! ## 文法
//!
//! ```crux
//! int counter;            // グローバル変数
//! bool flags[8];          // グローバル配列
//!
//! int add(int a, int b) {
//!     return a + b;
//! }
//!
//! void main() {
//!     int i;
//!     i = 0;
//!     loop {
//!         if i >= 8 { break; }
//!         flags[i] = i == 3 || i == 5;
//!         i = add(i, 1);
//!     }
//! }
//! ```
//!
//! 未定義の名前の参照と同一スコープでの再定義は致命的なエラーとして解析を中断します。

mod decl_parser;
mod expr_parser;
mod parser_impl;
mod stmt_parser;
mod symbol_table;

// 公開API
pub use parser_impl::Parser;
pub use symbol_table::{builtin_functions, SymbolTable};

use crate::error::ParserError;
pub type ParseError = ParserError;
pub type ParseResult<T> = Result<T, ParseError>;
