//! コンパイラのメイン処理モジュール
//!
//! このモジュールは、コンパイルパイプライン全体を管理し、
//! 複数のエラーを蓄積しながら処理を進める機能を提供します。
//! 字句解析と構文解析のエラーは致命的で、型エラーは蓄積されます。
//! エラーが1つでもあればコード生成は行いません。

use crate::analyzer::TypeChecker;
use crate::ast::DeclarationList;
use crate::codegen;
use crate::error::{CruxError, CruxResult, ErrorCollector, LexerError, TypeError};
use crate::ir::{self, Program};
use crate::lexer::{Lexer, Token, TokenWithPosition};
use crate::lowering;
use crate::parser::Parser;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::fs;
use std::path::Path;

/// 出力の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmitKind {
    /// x86-64 アセンブリ
    #[default]
    Asm,
    /// 制御フローグラフのテキスト表現
    Ir,
}

impl EmitKind {
    /// 既定の出力ファイル拡張子
    pub fn extension(self) -> &'static str {
        match self {
            EmitKind::Asm => "s",
            EmitKind::Ir => "ir",
        }
    }
}

/// コンパイラの設定
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub emit: EmitKind,
    pub verbose: bool,
}

/// コンパイル結果
#[derive(Debug, Clone)]
pub struct CompilationArtifact {
    pub program: Program,
    /// `emit` に応じたアセンブリまたはIRのテキスト
    pub output: String,
}

/// コンパイル状態を管理する構造体
pub struct CompilationState {
    pub source_file: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl CompilationState {
    /// 新しいコンパイル状態を作成
    pub fn new<P: AsRef<Path>>(source_file: P) -> CruxResult<Self> {
        let source = fs::read_to_string(source_file.as_ref())
            .map_err(|e| CruxError::Io(format!("Failed to read source file: {}", e)))?;
        Ok(Self::new_from_string(
            &source_file.as_ref().display().to_string(),
            source,
        ))
    }

    /// 文字列からコンパイル状態を作成
    pub fn new_from_string(filename: &str, source: String) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(filename.to_string(), source.clone());
        Self {
            source_file: filename.to_string(),
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: CruxError) {
        self.error_collector.add_error(error, self.file_id);
    }

    /// 診断情報を標準エラーへ報告
    pub fn report_diagnostics(&self) -> CruxResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic();
            codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, &diagnostic)
                .map_err(|e| CruxError::Io(format!("Failed to emit diagnostic: {}", e)))?;
        }
        Ok(())
    }

    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }
}

/// コンパイルパイプライン
pub struct CompilationPipeline {
    state: CompilationState,
    options: CompileOptions,
    tokens: Vec<TokenWithPosition>,
    ast: Option<DeclarationList>,
}

impl CompilationPipeline {
    pub fn new(state: CompilationState, options: CompileOptions) -> Self {
        Self {
            state,
            options,
            tokens: Vec::new(),
            ast: None,
        }
    }

    pub fn state(&self) -> &CompilationState {
        &self.state
    }

    /// 字句解析の結果
    pub fn tokens(&self) -> &[TokenWithPosition] {
        &self.tokens
    }

    /// 構文解析に成功していれば名前解決済みのAST
    pub fn ast(&self) -> Option<&DeclarationList> {
        self.ast.as_ref()
    }

    fn step(&self, name: &str) {
        if self.options.verbose {
            log::info!("step: {}", name);
        } else {
            log::debug!("step: {}", name);
        }
    }

    /// レキシカル解析を実行
    pub fn tokenize(&mut self) {
        self.step("tokenize");
        let tokens = Lexer::new(&self.state.source).collect_tokens();
        for token in &tokens {
            if matches!(token.token, Token::Error) {
                let text = self
                    .state
                    .source
                    .get(token.span.clone())
                    .unwrap_or_default()
                    .to_string();
                self.state.add_error(CruxError::Lexer(LexerError::UnrecognizedToken {
                    token: text,
                    span: token.span.clone().into(),
                }));
            }
        }
        log::debug!("{} tokens", tokens.len());
        self.tokens = tokens;
    }

    /// 構文解析と名前解決を実行
    pub fn parse(&mut self) {
        self.step("parse");
        let mut parser = Parser::new(self.tokens.clone());
        match parser.parse() {
            Ok(ast) => self.ast = Some(ast),
            Err(e) => self.state.add_error(CruxError::Parser(e)),
        }
    }

    /// 型チェックを実行し、見つかった型エラーを返す
    pub fn type_check(&mut self) -> Vec<TypeError> {
        self.step("type check");
        let Some(ast) = &mut self.ast else {
            return Vec::new();
        };
        let mut checker = TypeChecker::new();
        checker.check(ast);
        let errors = checker.into_errors();
        for error in &errors {
            self.state.add_error(CruxError::Type(error.clone()));
        }
        errors
    }

    /// パイプライン全体を実行
    ///
    /// エラーがあった場合は `Ok(None)` を返す。診断は `report_errors` で出力する。
    pub fn run(&mut self) -> CruxResult<Option<CompilationArtifact>> {
        self.tokenize();
        if self.state.has_errors() {
            return Ok(None);
        }

        self.parse();
        if self.ast.is_none() {
            return Ok(None);
        }

        self.type_check();

        self.step("lower");
        let program = match &self.ast {
            Some(ast) => lowering::lower_program(ast),
            None => return Ok(None),
        };

        if self.state.has_errors() {
            log::debug!(
                "skipping code generation: {} error(s)",
                self.state.error_count()
            );
            return Ok(None);
        }

        let output = match self.options.emit {
            EmitKind::Asm => {
                self.step("codegen");
                codegen::generate(&program)?
            }
            EmitKind::Ir => ir::printer::print_program(&program),
        };
        Ok(Some(CompilationArtifact { program, output }))
    }

    /// エラーレポートを生成
    pub fn report_errors(&self) -> CruxResult<()> {
        self.state.report_diagnostics()?;
        if self.state.has_errors() {
            eprintln!(
                "\nコンパイルエラー: {} 個のエラーが見つかりました",
                self.state.error_count()
            );
        }
        Ok(())
    }

    pub fn state_mut(&mut self) -> &mut CompilationState {
        &mut self.state
    }
}

/// ソース文字列をアセンブリまでコンパイルする
///
/// エラーがあった場合は最初のエラーを返す。
pub fn compile_source(source: &str) -> CruxResult<CompilationArtifact> {
    compile_source_with(source, CompileOptions::default())
}

pub fn compile_source_with(source: &str, options: CompileOptions) -> CruxResult<CompilationArtifact> {
    let state = CompilationState::new_from_string("<input>", source.to_string());
    let mut pipeline = CompilationPipeline::new(state, options);
    match pipeline.run()? {
        Some(artifact) => Ok(artifact),
        None => Err(pipeline
            .state()
            .error_collector
            .first_error()
            .map(|e| e.error.clone())
            .unwrap_or_else(|| CruxError::Other("compilation failed".to_string()))),
    }
}

/// 型チェックまで行い、型エラーを返す
///
/// 字句解析・構文解析のエラーはそのまま `Err` になる。
pub fn check_source(source: &str) -> CruxResult<Vec<TypeError>> {
    let state = CompilationState::new_from_string("<input>", source.to_string());
    let mut pipeline = CompilationPipeline::new(state, CompileOptions::default());
    pipeline.tokenize();
    if let Some(error) = pipeline.state().error_collector.first_error() {
        return Err(error.error.clone());
    }
    pipeline.parse();
    if let Some(error) = pipeline.state().error_collector.first_error() {
        return Err(error.error.clone());
    }
    Ok(pipeline.type_check())
}

/// 型チェック済みのAST（各ノードの `ty` が埋まったもの）と型エラーを返す
pub fn check_source_tree(source: &str) -> CruxResult<(DeclarationList, Vec<TypeError>)> {
    let mut ast = parse_source(source)?;
    let mut checker = TypeChecker::new();
    checker.check(&mut ast);
    Ok((ast, checker.into_errors()))
}

/// AST を構文解析まで行って返す
pub fn parse_source(source: &str) -> CruxResult<DeclarationList> {
    let tokens = Lexer::new(source).collect_tokens();
    if let Some(bad) = tokens.iter().find(|t| matches!(t.token, Token::Error)) {
        return Err(CruxError::Lexer(LexerError::UnrecognizedToken {
            token: source.get(bad.span.clone()).unwrap_or_default().to_string(),
            span: bad.span.clone().into(),
        }));
    }
    Ok(Parser::new(tokens).parse()?)
}
