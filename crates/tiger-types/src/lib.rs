//! Shared types for the Tiger compiler.
//!
//! This crate defines the AST node types, source spans, diagnostics and the
//! opaque handles the translation backend threads through semantic analysis.

mod error;
mod span;
pub mod ast;
pub mod handle;

pub use error::{Diagnostic, Diagnostics, ErrorKind, Reporter, SemantError, MAX_ERRORS};
pub use span::Span;

/// Result type used throughout the Tiger compiler.
pub type Result<T> = std::result::Result<T, SemantError>;
