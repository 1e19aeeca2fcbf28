//! AST node types for the Tiger language.
//!
//! Every node carries a [`Span`] for error reporting and a `kind`
//! discriminant. Recursive children are boxed to keep enum sizes reasonable.
//! Lists keep source order: declaration order inside a `let` is significant.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Variables (l-values)
// ══════════════════════════════════════════════════════════════════════════════

/// A variable reference: `x`, `p.next`, `a[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub kind: VarKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarKind {
    /// `x`
    Simple(Ident),
    /// `base.field`
    Field(Box<Var>, Ident),
    /// `base[index]`
    Subscript(Box<Var>, Box<Exp>),
}

impl Var {
    pub fn new(kind: VarKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Exp {
    pub kind: ExpKind,
    pub span: Span,
}

impl Exp {
    pub fn new(kind: ExpKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpKind {
    // ── Literals ──
    Nil,
    Int(i64),
    String(String),

    /// A variable used as an r-value.
    Var(Box<Var>),
    /// `f(a, b)`
    Call { func: Ident, args: Vec<Exp> },
    /// `left op right`
    Op {
        left: Box<Exp>,
        op: Oper,
        right: Box<Exp>,
    },
    /// `point { x = 1, y = 2 }`
    Record { typ: Ident, fields: Vec<EField> },
    /// `intArray [size] of init`
    Array {
        typ: Ident,
        size: Box<Exp>,
        init: Box<Exp>,
    },
    /// `(e1; e2; ...)`
    Seq(Vec<Exp>),
    /// `var := exp`
    Assign { var: Box<Var>, exp: Box<Exp> },
    /// `if test then a [else b]`
    If {
        test: Box<Exp>,
        then: Box<Exp>,
        els: Option<Box<Exp>>,
    },
    /// `while test do body`
    While { test: Box<Exp>, body: Box<Exp> },
    /// `for var := lo to hi do body`
    For {
        var: Ident,
        lo: Box<Exp>,
        hi: Box<Exp>,
        body: Box<Exp>,
    },
    Break,
    /// `let decs in body end`
    Let { decs: Vec<Dec>, body: Box<Exp> },

    /// Left behind by the parser's error recovery. Never valid input for
    /// semantic analysis.
    Error,
}

/// A field initializer inside a record construction: `name = exp`.
#[derive(Debug, Clone, PartialEq)]
pub struct EField {
    pub name: Ident,
    pub exp: Exp,
    pub span: Span,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oper {
    Plus,
    Minus,
    Times,
    Divide,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Oper {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Oper::Plus | Oper::Minus | Oper::Times | Oper::Divide)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Oper::Plus => "+",
            Oper::Minus => "-",
            Oper::Times => "*",
            Oper::Divide => "/",
            Oper::Eq => "=",
            Oper::Neq => "<>",
            Oper::Lt => "<",
            Oper::Le => "<=",
            Oper::Gt => ">",
            Oper::Ge => ">=",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Declarations
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Dec {
    pub kind: DecKind,
    pub span: Span,
}

impl Dec {
    pub fn new(kind: DecKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// One declaration inside a `let`.
///
/// The parser groups each maximal run of adjacent `function` (or `type`)
/// declarations into a single `Function` (or `Type`) node; members of one
/// group may refer to each other regardless of order.
#[derive(Debug, Clone, PartialEq)]
pub enum DecKind {
    Var(VarDec),
    Function(Vec<FunDec>),
    Type(Vec<TypeDec>),
}

/// `var name [: typ] := init`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDec {
    pub name: Ident,
    pub typ: Option<Ident>,
    pub init: Exp,
    pub span: Span,
}

/// `function name(params) [: result] = body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunDec {
    pub name: Ident,
    pub params: Vec<Field>,
    /// `None` declares a procedure.
    pub result: Option<Ident>,
    pub body: Exp,
    pub span: Span,
}

/// `name: typ`, used by parameter lists and record type fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Ident,
    pub typ: Ident,
    pub span: Span,
}

impl Field {
    pub fn new(name: Ident, typ: Ident, span: Span) -> Self {
        Self { name, typ, span }
    }
}

/// `type name = ty`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDec {
    pub name: Ident,
    pub ty: Ty,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Type References
// ══════════════════════════════════════════════════════════════════════════════

/// The right-hand side of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Ty {
    pub kind: TyKind,
    pub span: Span,
}

impl Ty {
    pub fn new(kind: TyKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TyKind {
    /// `type a = b`
    Name(Ident),
    /// `type a = { f: t, ... }`
    Record(Vec<Field>),
    /// `type a = array of t`
    Array(Ident),
}
