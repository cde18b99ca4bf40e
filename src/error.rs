//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、Cruxコンパイラ全体で使用される統一的なエラー型と
//! エラー報告システムを提供します。

use crate::ast::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// Cruxコンパイラの統一エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CruxError {
    /// レキサーエラー
    #[error("字句解析エラー: {0}")]
    Lexer(#[from] LexerError),

    /// パーサーエラー（名前解決の失敗を含む）
    #[error("構文解析エラー: {0}")]
    Parser(#[from] ParserError),

    /// 型エラー
    #[error("型エラー: {0}")]
    Type(#[from] TypeError),

    /// コード生成エラー
    #[error("コード生成エラー: {0}")]
    Codegen(#[from] CodegenError),

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("認識できないトークン: '{token}'")]
    UnrecognizedToken { token: String, span: Span },

    #[error("不正な数値リテラル: {message}")]
    InvalidNumber { message: String, span: Span },
}

/// パーサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("予期しないトークン: {expected}を期待しましたが、{found}が見つかりました")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("予期しない入力の終了: {expected}を期待していました")]
    UnexpectedEof { expected: String, span: Span },

    #[error("未定義のシンボル: {name}")]
    UndefinedSymbol { name: String, span: Span },

    #[error("シンボル {name} は既にこのスコープで定義されています")]
    DuplicateSymbol { name: String, span: Span },
}

/// 型エラー。発生したノードの位置とメッセージの組
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TypeError {
    pub message: String,
    pub span: Span,
}

impl TypeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// コード生成エラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    #[error("関数 {function} の制御フローグラフが不正です: {message}")]
    MalformedGraph { function: String, message: String },

    #[error("グローバル変数 {name} の大きさ（{count} 要素）はアドレス空間に収まりません")]
    GlobalTooLarge { name: String, count: u64 },

    #[error("内部エラー: {message}")]
    Internal { message: String },
}

/// エラー情報とソースコードの位置情報を含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: CruxError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: CruxError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let primary = |span: &Span| Label::primary(self.file_id, span.start..span.end);

        let (message, labels) = match &self.error {
            CruxError::Lexer(e) => match e {
                LexerError::UnrecognizedToken { span, .. } => (
                    e.to_string(),
                    vec![primary(span).with_message("ここに不正なトークンがあります")],
                ),
                LexerError::InvalidNumber { span, .. } => (e.to_string(), vec![primary(span)]),
            },
            CruxError::Parser(e) => match e {
                ParserError::UnexpectedToken { span, .. }
                | ParserError::UnexpectedEof { span, .. } => (e.to_string(), vec![primary(span)]),
                ParserError::UndefinedSymbol { span, .. } => (
                    e.to_string(),
                    vec![primary(span).with_message("この名前は定義されていません")],
                ),
                ParserError::DuplicateSymbol { span, .. } => (
                    e.to_string(),
                    vec![primary(span).with_message("重複した定義")],
                ),
            },
            CruxError::Type(e) => (
                format!("型エラー: {}", e.message),
                vec![primary(&e.span)],
            ),
            CruxError::Codegen(e) => (e.to_string(), vec![]),
            CruxError::Io(message) => (format!("ファイル操作エラー: {}", message), vec![]),
            CruxError::Other(message) => (message.clone(), vec![]),
        };

        Diagnostic::error()
            .with_message(message)
            .with_labels(labels)
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: CruxError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    /// エラーがあるかどうか
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// エラーの数
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    /// 最初のエラーを取得
    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }
}

/// Result型のエイリアス
pub type CruxResult<T> = Result<T, CruxError>;

impl From<std::io::Error> for CruxError {
    fn from(e: std::io::Error) -> Self {
        CruxError::Io(e.to_string())
    }
}

impl From<std::fmt::Error> for CruxError {
    fn from(e: std::fmt::Error) -> Self {
        CruxError::Codegen(CodegenError::Internal {
            message: format!("出力の書き込みに失敗しました: {}", e),
        })
    }
}
