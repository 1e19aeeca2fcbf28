//! Symbol tables with lexically scoped bindings.
//!
//! [`Env`] keeps every binding in one ordered list and remembers the list
//! length at each [`Env::begin_scope`]. Closing a scope truncates back to
//! that length, so scopes must be opened and closed in strict nesting order.
//!
//! The checker keeps two instances: one for type names, one shared by
//! variables and functions.

use log::trace;
use tiger_types::handle::{Access, Label, Level};
use tiger_types::SemantError;

use crate::stdlib;
use crate::translate::Translate;
use crate::ty::TypeId;

// ══════════════════════════════════════════════════════════════════════════════
// Entries
// ══════════════════════════════════════════════════════════════════════════════

/// Parameter types of a function, in calling-convention order.
pub type ArgList = Vec<TypeId>;

/// What a name is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A type name.
    Type(TypeId),
    Var(VarEntry),
    Func(FuncEntry),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarEntry {
    pub ty: TypeId,
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncEntry {
    pub params: ArgList,
    pub result: TypeId,
    pub level: Level,
    pub label: Label,
}

impl Entry {
    fn kind_name(&self) -> &'static str {
        match self {
            Entry::Type(_) => "a type",
            Entry::Var(_) => "a variable",
            Entry::Func(_) => "a function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("'{0}' not found")]
    NotFound(String),
    #[error("'{name}' is {found}, not {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl EnvError {
    /// Turn a lookup failure into the diagnostic for a `what` named `name`.
    pub fn into_semant(self, what: &'static str) -> SemantError {
        match self {
            EnvError::NotFound(name) => SemantError::UndefinedName { what, name },
            EnvError::WrongKind {
                name,
                expected,
                found,
            } => SemantError::KindMismatch {
                expected,
                found: format!("{} '{}'", found.trim_start_matches("a "), name),
            },
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Env
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    entry: Entry,
}

/// An ordered binding list with scope markers.
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: Vec<Binding>,
    marks: Vec<usize>,
}

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// The type namespace seeded with `int`, `string` and `void`.
    pub fn with_base_types() -> Self {
        let mut env = Self::new();
        env.enter("int", Entry::Type(TypeId::INT));
        env.enter("string", Entry::Type(TypeId::STRING));
        env.enter("void", Entry::Type(TypeId::VOID));
        env
    }

    /// The variable/function namespace seeded with the standard library.
    pub fn with_stdlib(tr: &mut dyn Translate) -> Self {
        let mut env = Self::new();
        let level = tr.outermost();
        for sig in stdlib::SIGNATURES {
            env.enter(
                sig.name,
                Entry::Func(FuncEntry {
                    params: sig.params.to_vec(),
                    result: sig.result,
                    level,
                    label: tr.new_label(),
                }),
            );
        }
        env
    }

    /// Bind `name` in the innermost scope.
    pub fn enter(&mut self, name: impl Into<String>, entry: Entry) {
        let name = name.into();
        trace!("enter '{}' as {} at depth {}", name, entry.kind_name(), self.depth());
        self.bindings.push(Binding { name, entry });
    }

    /// Look up the most recently entered binding of `name`.
    pub fn find(&self, name: &str) -> Result<&Entry, EnvError> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.entry)
            .ok_or_else(|| EnvError::NotFound(name.to_string()))
    }

    pub fn find_type(&self, name: &str) -> Result<TypeId, EnvError> {
        match self.find(name)? {
            Entry::Type(ty) => Ok(*ty),
            other => Err(wrong_kind(name, "a type", other)),
        }
    }

    pub fn find_var(&self, name: &str) -> Result<&VarEntry, EnvError> {
        match self.find(name)? {
            Entry::Var(var) => Ok(var),
            other => Err(wrong_kind(name, "a variable", other)),
        }
    }

    pub fn find_func(&self, name: &str) -> Result<&FuncEntry, EnvError> {
        match self.find(name)? {
            Entry::Func(func) => Ok(func),
            other => Err(wrong_kind(name, "a function", other)),
        }
    }

    /// Open a nested scope.
    pub fn begin_scope(&mut self) {
        self.marks.push(self.bindings.len());
    }

    /// Close the innermost scope, dropping everything entered since the
    /// matching [`begin_scope`](Self::begin_scope).
    pub fn end_scope(&mut self) {
        debug_assert!(!self.marks.is_empty(), "end_scope without begin_scope");
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    /// Number of open nested scopes.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// Number of live bindings, shadowed ones included.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Log every live binding, newest first.
    pub fn dump(&self) {
        for b in self.bindings.iter().rev() {
            trace!("  {} : {:?}", b.name, b.entry);
        }
    }
}

fn wrong_kind(name: &str, expected: &'static str, found: &Entry) -> EnvError {
    EnvError::WrongKind {
        name: name.to_string(),
        expected,
        found: found.kind_name(),
    }
}
