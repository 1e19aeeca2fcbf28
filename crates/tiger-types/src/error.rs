use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on stored diagnostics. Further errors are still counted.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Name not found in the relevant namespace.
    UndefinedName,
    /// A name or value used as the wrong category (not a record, not a function...).
    KindMismatch,
    /// Two types required to agree do not.
    TypeMismatch,
    /// Declared and supplied argument/field counts differ.
    ArityMismatch,
    /// `var x := nil` without annotation, or a void initializer.
    InvalidInitializer,
    /// A type alias chain that never reaches a concrete type.
    TypeCycle,
    /// Malformed AST. Fatal.
    UnexpectedNodeKind,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UndefinedName => "undefined name",
            Self::KindMismatch => "kind mismatch",
            Self::TypeMismatch => "type mismatch",
            Self::ArityMismatch => "arity mismatch",
            Self::InvalidInitializer => "invalid initializer",
            Self::TypeCycle => "type cycle",
            Self::UnexpectedNodeKind => "unexpected node",
        };
        f.write_str(s)
    }
}

/// Everything the semantic pass can complain about.
///
/// All variants except [`SemantError::UnexpectedNodeKind`] are recoverable:
/// the checker reports them and carries on with a fallback type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemantError {
    #[error("undefined {what} '{name}'")]
    UndefinedName { what: &'static str, name: String },

    #[error("not {expected}: found {found}")]
    KindMismatch { expected: &'static str, found: String },

    #[error("type mismatch{}: expected {expected}, found {found}", context(.name))]
    TypeMismatch {
        expected: String,
        found: String,
        name: Option<String>,
    },

    #[error("wrong number of {what}: expected {expected}, found {found}")]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid initializer for '{name}': {reason}")]
    InvalidInitializer { name: String, reason: &'static str },

    #[error("illegal type cycle: '{name}' never resolves to a concrete type")]
    TypeCycle { name: String },

    #[error("unexpected {node} node")]
    UnexpectedNodeKind { node: &'static str },
}

fn context(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" in '{name}'"),
        None => String::new(),
    }
}

impl SemantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UndefinedName { .. } => ErrorKind::UndefinedName,
            Self::KindMismatch { .. } => ErrorKind::KindMismatch,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::InvalidInitializer { .. } => ErrorKind::InvalidInitializer,
            Self::TypeCycle { .. } => ErrorKind::TypeCycle,
            Self::UnexpectedNodeKind { .. } => ErrorKind::UnexpectedNodeKind,
        }
    }

    /// Whether the pass must stop instead of reporting and continuing.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnexpectedNodeKind { .. })
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Reporting
// ══════════════════════════════════════════════════════════════════════════════

/// Sink for diagnostics. Fire-and-forget: the checker never asks for a
/// result back.
pub trait Reporter {
    fn report(&mut self, span: Span, error: &SemantError);
}

/// A reported diagnostic, flattened for rendering and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.span, self.kind, self.message)
    }
}

/// Collecting [`Reporter`]. Overall success is "zero diagnostics".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub total_errors: usize,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    MAX_ERRORS
}

impl Diagnostics {
    /// Create an empty collector storing at most [`MAX_ERRORS`] entries.
    pub fn new() -> Self {
        Self::with_limit(MAX_ERRORS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
            limit,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add a diagnostic, respecting the storage limit.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.errors.len() < self.limit {
            self.errors.push(diagnostic);
        }
        self.total_errors += 1;
    }

    /// Kinds of the stored diagnostics, in report order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(|d| d.kind).collect()
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|d| d.kind == kind)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, span: Span, error: &SemantError) {
        self.push(Diagnostic {
            kind: error.kind(),
            message: error.to_string(),
            span,
        });
    }
}
