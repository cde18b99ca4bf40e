//! Crux Language Compiler Library
//!
//! This library provides the core functionality for the Crux compiler:
//! lexing, parsing with name resolution, type checking, lowering to a
//! control-flow graph and x86-64 code generation.

pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod runtime;

// Re-export commonly used types
pub use analyzer::TypeChecker;
pub use ast::{DeclarationList, Expression, Statement, Type};
pub use codegen::{CodeGenerator, LinearItem, Linearizer};
pub use compiler::{
    check_source, check_source_tree, compile_source, parse_source, CompilationArtifact,
    CompileOptions,
};
pub use error::{CruxError, CruxResult, ErrorCollector, TypeError};
pub use ir::Program;
pub use lexer::{Lexer, Token, TokenWithPosition};
pub use lowering::lower_program;
pub use parser::{ParseError, ParseResult, Parser};
