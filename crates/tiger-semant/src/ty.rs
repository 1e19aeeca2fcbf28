//! Type universe for the Tiger type checker.
//!
//! Types live in a [`TypeTable`] arena and are referred to by [`TypeId`].
//! Records, arrays and aliases point at other types by id, so recursive and
//! mutually recursive declarations are representable, and identity of two
//! record or array types is plain id equality.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tiger_types::Span;

// ══════════════════════════════════════════════════════════════════════════════
// TypeId / Type
// ══════════════════════════════════════════════════════════════════════════════

/// Stable handle into a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const STRING: TypeId = TypeId(1);
    pub const VOID: TypeId = TypeId(2);
    pub const NIL: TypeId = TypeId(3);
    /// Placeholder produced by error recovery. Compatible with everything.
    pub const ERROR: TypeId = TypeId(4);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    String,
    Void,
    Nil,
    /// Fields in declaration order.
    Record(Vec<RecordField>),
    Array(TypeId),
    /// A named reference to another type. `target` stays `None` while the
    /// declaring group is still being resolved.
    Alias {
        name: String,
        target: Option<TypeId>,
    },
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeId,
}

/// Why an alias chain did not reach a concrete type. `at` is the alias
/// where resolution stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("alias '{name}' is part of a cycle with no concrete type")]
    Cycle { name: String, at: TypeId },
    #[error("alias '{name}' was never resolved")]
    Unresolved { name: String, at: TypeId },
}

impl TypeError {
    pub fn at(&self) -> TypeId {
        match self {
            TypeError::Cycle { at, .. } | TypeError::Unresolved { at, .. } => *at,
        }
    }
}

/// Where a named type was declared.
#[derive(Debug, Clone)]
struct Declared {
    name: String,
    span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeTable
// ══════════════════════════════════════════════════════════════════════════════

/// Arena owning every type created during one program check.
#[derive(Debug, Clone)]
pub struct TypeTable {
    types: Vec<Type>,
    /// Declared placeholders, kept after they are defined.
    names: HashMap<TypeId, Declared>,
}

impl TypeTable {
    /// Create a table holding the built-in types at their fixed ids.
    pub fn new() -> Self {
        Self {
            types: vec![Type::Int, Type::String, Type::Void, Type::Nil, Type::Error],
            names: HashMap::new(),
        }
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    fn alloc(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// A forward declaration for `name`, to be filled in with [`define`](Self::define).
    /// Records and arrays get their identity from this id.
    pub fn new_placeholder(&mut self, name: impl Into<String>, span: Span) -> TypeId {
        let name = name.into();
        let id = self.alloc(Type::Alias {
            name: name.clone(),
            target: None,
        });
        self.names.insert(id, Declared { name, span });
        id
    }

    /// Replace the contents of `id` in place. Everything already pointing at
    /// `id` sees the new definition.
    pub fn define(&mut self, id: TypeId, ty: Type) {
        self.types[id.index()] = ty;
    }

    /// Follow alias chains down to a non-alias type.
    pub fn actual(&self, id: TypeId) -> Result<TypeId, TypeError> {
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            match self.get(current) {
                Type::Alias { name, target } => {
                    if !seen.insert(current) {
                        return Err(TypeError::Cycle {
                            name: name.clone(),
                            at: current,
                        });
                    }
                    match target {
                        Some(next) => current = *next,
                        None => {
                            return Err(TypeError::Unresolved {
                                name: name.clone(),
                                at: current,
                            })
                        }
                    }
                }
                _ => return Ok(current),
            }
        }
    }

    /// Like [`actual`](Self::actual), falling back to [`TypeId::ERROR`].
    /// Broken aliases are reported where they are declared, not at each use.
    pub fn resolve(&self, id: TypeId) -> TypeId {
        self.actual(id).unwrap_or(TypeId::ERROR)
    }

    /// The compatibility predicate used by every check.
    ///
    /// Primitives match by kind, records and arrays by identity, `nil` matches
    /// any record (in either position) and itself. The error placeholder,
    /// and any alias that cannot be resolved, matches everything so one
    /// mistake is reported once.
    pub fn matches(&self, a: TypeId, b: TypeId) -> bool {
        let (a, b) = (self.resolve(a), self.resolve(b));
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Nil, Type::Record(_)) | (Type::Record(_), Type::Nil) => true,
            _ => false,
        }
    }

    pub fn is_int(&self, id: TypeId) -> bool {
        matches!(self.get(self.resolve(id)), Type::Int | Type::Error)
    }

    pub fn is_nil(&self, id: TypeId) -> bool {
        matches!(self.get(self.resolve(id)), Type::Nil)
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        matches!(self.get(self.resolve(id)), Type::Void)
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        matches!(self.get(self.resolve(id)), Type::Error)
    }

    /// Fields of the record `id` resolves to.
    pub fn record_fields(&self, id: TypeId) -> Option<&[RecordField]> {
        match self.get(self.resolve(id)) {
            Type::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Element type of the array `id` resolves to.
    pub fn array_elem(&self, id: TypeId) -> Option<TypeId> {
        match self.get(self.resolve(id)) {
            Type::Array(elem) => Some(*elem),
            _ => None,
        }
    }

    /// Short human-readable name for error messages.
    pub fn describe(&self, id: TypeId) -> String {
        format!("{}", Describe { table: self, id })
    }

    /// Names for both sides of a mismatch. Distinct types declared under the
    /// same name get their declaration position appended.
    pub fn describe_pair(&self, expected: TypeId, found: TypeId) -> (String, String) {
        let (e, f) = (self.describe(expected), self.describe(found));
        if e != f {
            return (e, f);
        }
        (self.located(expected, e), self.located(found, f))
    }

    fn located(&self, id: TypeId, text: String) -> String {
        match self.names.get(&id) {
            Some(decl) => format!("{} (declared at {})", text, decl.span),
            None => text,
        }
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

struct Describe<'a> {
    table: &'a TypeTable,
    id: TypeId,
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(decl) = self.table.names.get(&self.id) {
            return write!(f, "{}", decl.name);
        }
        match self.table.get(self.id) {
            Type::Int => write!(f, "int"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Nil => write!(f, "nil"),
            Type::Error => write!(f, "<error>"),
            Type::Alias { name, .. } => write!(f, "{}", name),
            // Only one level deep: field types may point back at this record.
            Type::Record(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, self.table.shallow_name(field.ty))?;
                }
                write!(f, "}}")
            }
            Type::Array(elem) => write!(f, "array of {}", self.table.shallow_name(*elem)),
        }
    }
}

impl TypeTable {
    fn shallow_name(&self, id: TypeId) -> String {
        if let Some(decl) = self.names.get(&id) {
            return decl.name.clone();
        }
        match self.get(id) {
            Type::Record(_) => "{...}".to_string(),
            Type::Array(_) => "array of ...".to_string(),
            _ => self.describe(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: TypeId) -> RecordField {
        RecordField {
            name: name.to_string(),
            ty,
        }
    }

    #[test]
    fn test_primitive_matching() {
        let t = TypeTable::new();
        assert!(t.matches(TypeId::INT, TypeId::INT));
        assert!(!t.matches(TypeId::INT, TypeId::STRING));
        assert!(t.matches(TypeId::NIL, TypeId::NIL));
        assert!(!t.matches(TypeId::NIL, TypeId::INT));
        assert!(!t.matches(TypeId::VOID, TypeId::INT));
    }

    #[test]
    fn test_nil_matches_records_both_ways() {
        let mut t = TypeTable::new();
        let rec = t.alloc(Type::Record(vec![field("a", TypeId::INT)]));
        assert!(t.matches(TypeId::NIL, rec));
        assert!(t.matches(rec, TypeId::NIL));
        let arr = t.alloc(Type::Array(TypeId::INT));
        assert!(!t.matches(TypeId::NIL, arr));
    }

    #[test]
    fn test_nominal_identity() {
        let mut t = TypeTable::new();
        let a = t.alloc(Type::Array(TypeId::INT));
        let b = t.alloc(Type::Array(TypeId::INT));
        assert!(t.matches(a, a));
        assert!(!t.matches(a, b));

        let r1 = t.alloc(Type::Record(vec![field("x", TypeId::INT)]));
        let r2 = t.alloc(Type::Record(vec![field("x", TypeId::INT)]));
        assert!(!t.matches(r1, r2));
    }

    #[test]
    fn test_alias_resolution() {
        let mut t = TypeTable::new();
        let arr = t.alloc(Type::Array(TypeId::STRING));
        let alias = t.new_placeholder("names", Span::default());
        t.define(
            alias,
            Type::Alias {
                name: "names".into(),
                target: Some(arr),
            },
        );
        assert_eq!(t.actual(alias), Ok(arr));
        assert!(t.matches(alias, arr));
        assert_eq!(t.array_elem(alias), Some(TypeId::STRING));
    }

    #[test]
    fn test_alias_cycle_is_error_not_loop() {
        let mut t = TypeTable::new();
        let c = t.new_placeholder("c", Span::default());
        let d = t.new_placeholder("d", Span::default());
        t.define(c, Type::Alias { name: "c".into(), target: Some(d) });
        t.define(d, Type::Alias { name: "d".into(), target: Some(c) });
        assert!(matches!(t.actual(c), Err(TypeError::Cycle { at, .. }) if at == c));
        assert_eq!(t.resolve(d), TypeId::ERROR);
        // Reported where declared; uses stay quiet.
        assert!(t.matches(c, TypeId::INT));
    }

    #[test]
    fn test_unresolved_placeholder() {
        let mut t = TypeTable::new();
        let p = t.new_placeholder("p", Span::default());
        assert_eq!(
            t.actual(p),
            Err(TypeError::Unresolved {
                name: "p".into(),
                at: p
            })
        );
    }

    #[test]
    fn test_error_matches_anything() {
        let mut t = TypeTable::new();
        let rec = t.alloc(Type::Record(vec![]));
        assert!(t.matches(TypeId::ERROR, TypeId::STRING));
        assert!(t.matches(rec, TypeId::ERROR));
        assert!(t.is_int(TypeId::ERROR));
    }

    #[test]
    fn test_recursive_record_describe() {
        let mut t = TypeTable::new();
        let list = t.new_placeholder("list", Span::default());
        t.define(
            list,
            Type::Record(vec![field("head", TypeId::INT), field("tail", list)]),
        );
        assert_eq!(t.describe(list), "list");
        let anon = t.alloc(Type::Record(vec![field("head", TypeId::INT), field("tail", list)]));
        assert_eq!(t.describe(anon), "{head: int, tail: list}");
        let nested = t.alloc(Type::Array(anon));
        assert_eq!(t.describe(nested), "array of {...}");
        assert_eq!(t.describe(TypeId::VOID), "void");
    }

    #[test]
    fn test_cycle_stops_at_first_repeated_alias() {
        let mut t = TypeTable::new();
        let c = t.new_placeholder("c", Span::default());
        let d = t.new_placeholder("d", Span::default());
        let e = t.new_placeholder("e", Span::default());
        t.define(c, Type::Alias { name: "c".into(), target: Some(d) });
        t.define(d, Type::Alias { name: "d".into(), target: Some(c) });
        t.define(e, Type::Alias { name: "e".into(), target: Some(c) });
        assert_eq!(t.actual(e).map_err(|err| err.at()), Err(c));
    }

    #[test]
    fn test_same_name_distinct_types_are_located() {
        let mut t = TypeTable::new();
        let outer = t.new_placeholder("r", Span::point(2, 5));
        let inner = t.new_placeholder("r", Span::point(6, 9));
        t.define(outer, Type::Record(vec![field("a", TypeId::INT)]));
        t.define(inner, Type::Record(vec![field("a", TypeId::INT)]));
        assert_eq!(
            t.describe_pair(inner, outer),
            ("r (declared at 6:9)".to_string(), "r (declared at 2:5)".to_string())
        );
        assert_eq!(
            t.describe_pair(outer, TypeId::INT),
            ("r".to_string(), "int".to_string())
        );
    }
}
