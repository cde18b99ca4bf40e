//! Abstract Syntax Tree (AST) definitions for the Crux language.
//!
//! The tree handed to the type checker and the lowering stage is already
//! name-resolved: every declaration and every use site carries the
//! [`Symbol`] the binder assigned to it. Expression, assignment, `if`,
//! `return` and declaration nodes also have a `ty` slot that stays `None`
//! until the type checker records the node's resolved type (possibly
//! `Type::Error`) there.

use serde::{Deserialize, Serialize};

mod declarations;
mod expressions;
mod statements;
pub mod types;

pub use declarations::*;
pub use expressions::*;
pub use statements::*;
pub use types::Type;

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Identity of a resolved symbol, unique within one compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub usize);

/// A resolved name: what the binder produced for a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub ty: Type,
}

impl Symbol {
    pub fn new(id: SymbolId, name: impl Into<String>, ty: Type) -> Self {
        Self {
            id,
            name: name.into(),
            ty,
        }
    }
}
