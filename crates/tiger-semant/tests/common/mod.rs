//! AST builders and assertions shared by the integration tests.
//!
//! Nodes get `Span::default()` unless a test pins one with [`At::at`].

#![allow(dead_code)]

use tiger_semant::translate::NullTranslate;
use tiger_semant::Checker;
use tiger_types::ast::*;
use tiger_types::{Diagnostics, ErrorKind, SemantError, Span};

// ══════════════════════════════════════════════════════════════════════════════
// Builders
// ══════════════════════════════════════════════════════════════════════════════

pub trait At {
    /// Place the node on `line`.
    fn at(self, line: u32) -> Self;
}

impl At for Exp {
    fn at(mut self, line: u32) -> Self {
        self.span = Span::point(line, 1);
        self
    }
}

impl At for Dec {
    fn at(mut self, line: u32) -> Self {
        self.span = Span::point(line, 1);
        if let DecKind::Type(group) = &mut self.kind {
            for dec in group {
                dec.span = self.span;
            }
        }
        self
    }
}

fn exp(kind: ExpKind) -> Exp {
    Exp::new(kind, Span::default())
}

pub fn ident(name: &str) -> Ident {
    Ident::new(name, Span::default())
}

pub fn int(n: i64) -> Exp {
    exp(ExpKind::Int(n))
}

pub fn string(s: &str) -> Exp {
    exp(ExpKind::String(s.to_string()))
}

pub fn nil() -> Exp {
    exp(ExpKind::Nil)
}

pub fn unit() -> Exp {
    seq(vec![])
}

pub fn brk() -> Exp {
    exp(ExpKind::Break)
}

pub fn bad() -> Exp {
    exp(ExpKind::Error)
}

pub fn simple(name: &str) -> Var {
    Var::new(VarKind::Simple(ident(name)), Span::default())
}

pub fn field(base: Var, name: &str) -> Var {
    Var::new(VarKind::Field(Box::new(base), ident(name)), Span::default())
}

pub fn subscript(base: Var, index: Exp) -> Var {
    Var::new(VarKind::Subscript(Box::new(base), Box::new(index)), Span::default())
}

pub fn var_exp(var: Var) -> Exp {
    exp(ExpKind::Var(Box::new(var)))
}

/// A simple variable used as an expression.
pub fn v(name: &str) -> Exp {
    var_exp(simple(name))
}

pub fn call(func: &str, args: Vec<Exp>) -> Exp {
    exp(ExpKind::Call {
        func: ident(func),
        args,
    })
}

pub fn op(left: Exp, op: Oper, right: Exp) -> Exp {
    exp(ExpKind::Op {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

pub fn record(typ: &str, fields: Vec<(&str, Exp)>) -> Exp {
    exp(ExpKind::Record {
        typ: ident(typ),
        fields: fields
            .into_iter()
            .map(|(name, exp)| EField {
                name: ident(name),
                exp,
                span: Span::default(),
            })
            .collect(),
    })
}

pub fn array(typ: &str, size: Exp, init: Exp) -> Exp {
    exp(ExpKind::Array {
        typ: ident(typ),
        size: Box::new(size),
        init: Box::new(init),
    })
}

pub fn seq(exps: Vec<Exp>) -> Exp {
    exp(ExpKind::Seq(exps))
}

pub fn assign(var: Var, value: Exp) -> Exp {
    exp(ExpKind::Assign {
        var: Box::new(var),
        exp: Box::new(value),
    })
}

pub fn if_then(test: Exp, then: Exp) -> Exp {
    exp(ExpKind::If {
        test: Box::new(test),
        then: Box::new(then),
        els: None,
    })
}

pub fn if_else(test: Exp, then: Exp, els: Exp) -> Exp {
    exp(ExpKind::If {
        test: Box::new(test),
        then: Box::new(then),
        els: Some(Box::new(els)),
    })
}

pub fn while_do(test: Exp, body: Exp) -> Exp {
    exp(ExpKind::While {
        test: Box::new(test),
        body: Box::new(body),
    })
}

pub fn for_do(var: &str, lo: Exp, hi: Exp, body: Exp) -> Exp {
    exp(ExpKind::For {
        var: ident(var),
        lo: Box::new(lo),
        hi: Box::new(hi),
        body: Box::new(body),
    })
}

pub fn let_in(decs: Vec<Dec>, body: Exp) -> Exp {
    exp(ExpKind::Let {
        decs,
        body: Box::new(body),
    })
}

pub fn var_dec(name: &str, typ: Option<&str>, init: Exp) -> Dec {
    Dec::new(
        DecKind::Var(VarDec {
            name: ident(name),
            typ: typ.map(ident),
            init,
            span: Span::default(),
        }),
        Span::default(),
    )
}

pub fn fun(name: &str, params: &[(&str, &str)], result: Option<&str>, body: Exp) -> FunDec {
    FunDec {
        name: ident(name),
        params: params
            .iter()
            .map(|(n, t)| Field::new(ident(n), ident(t), Span::default()))
            .collect(),
        result: result.map(ident),
        body,
        span: Span::default(),
    }
}

pub fn funs(group: Vec<FunDec>) -> Dec {
    Dec::new(DecKind::Function(group), Span::default())
}

pub fn types(group: Vec<(&str, Ty)>) -> Dec {
    Dec::new(
        DecKind::Type(
            group
                .into_iter()
                .map(|(name, ty)| TypeDec {
                    name: ident(name),
                    ty,
                    span: Span::default(),
                })
                .collect(),
        ),
        Span::default(),
    )
}

pub fn name_ty(name: &str) -> Ty {
    Ty::new(TyKind::Name(ident(name)), Span::default())
}

pub fn record_ty(fields: &[(&str, &str)]) -> Ty {
    Ty::new(
        TyKind::Record(
            fields
                .iter()
                .map(|(n, t)| Field::new(ident(n), ident(t), Span::default()))
                .collect(),
        ),
        Span::default(),
    )
}

pub fn array_ty(elem: &str) -> Ty {
    Ty::new(TyKind::Array(ident(elem)), Span::default())
}

// ══════════════════════════════════════════════════════════════════════════════
// Running the checker
// ══════════════════════════════════════════════════════════════════════════════

/// Check `program`; returns the described result type and the diagnostics.
pub fn run(program: &Exp) -> Result<(String, Diagnostics), SemantError> {
    let mut diagnostics = Diagnostics::with_limit(100);
    let mut tr = NullTranslate::new();
    let mut checker = Checker::new(&mut tr, &mut diagnostics);
    let result = checker.check_program(program)?;
    let ty = checker.types().describe(result.ty);
    drop(checker);
    Ok((ty, diagnostics))
}

pub fn check(program: &Exp) -> Diagnostics {
    run(program).expect("tree is well-formed").1
}

/// The program is error-free; returns its type.
pub fn assert_ok(program: &Exp) -> String {
    let (ty, diags) = run(program).expect("tree is well-formed");
    assert!(
        !diags.has_errors(),
        "expected no errors, got {}:\n{}",
        diags.total_errors,
        render(&diags)
    );
    ty
}

pub fn assert_error(program: &Exp, kind: ErrorKind) {
    let diags = check(program);
    assert!(
        diags.contains(kind),
        "expected {:?}, got:\n{}",
        kind,
        render(&diags)
    );
}

/// Exactly these diagnostics, in report order.
pub fn assert_kinds(program: &Exp, kinds: &[ErrorKind]) {
    let diags = check(program);
    assert_eq!(diags.kinds(), kinds, "diagnostics:\n{}", render(&diags));
}

pub fn render(diags: &Diagnostics) -> String {
    diags
        .errors
        .iter()
        .map(|d| format!("  {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}
