//! Tiger type checker: walks a parsed AST and validates names and types.
//!
//! Entry point: [`Checker::check_program`].
//!
//! Recoverable problems are sent to the [`Reporter`] and replaced with a
//! fallback type so the walk can go on. Only a malformed tree
//! ([`SemantError::UnexpectedNodeKind`]) stops the pass, as an `Err`.

use log::{debug, log_enabled, Level as LogLevel};
use tiger_types::ast::*;
use tiger_types::handle::{Level, TrExp};
use tiger_types::{Reporter, Result, SemantError, Span};

use crate::env::{Entry, Env, FuncEntry, VarEntry};
use crate::translate::Translate;
use crate::ty::{RecordField, Type, TypeId, TypeTable};

/// Result of checking a variable or expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpTy {
    /// Backend handle; always empty here.
    pub exp: TrExp,
    pub ty: TypeId,
}

impl ExpTy {
    pub fn new(ty: TypeId) -> Self {
        Self {
            exp: TrExp::empty(),
            ty,
        }
    }
}

/// Signature resolved in the first pass over a function group.
struct Signature {
    params: Vec<TypeId>,
    result: TypeId,
    level: Level,
}

// ══════════════════════════════════════════════════════════════════════════════
// Checker
// ══════════════════════════════════════════════════════════════════════════════

/// State for one program check: both namespaces, the type arena and the
/// current backend level.
pub struct Checker<'a> {
    types: TypeTable,
    /// Type namespace.
    tenv: Env,
    /// Variable/function namespace.
    venv: Env,
    level: Level,
    tr: &'a mut dyn Translate,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Checker<'a> {
    /// Create a checker with freshly seeded environments.
    pub fn new(tr: &'a mut dyn Translate, reporter: &'a mut dyn Reporter) -> Self {
        let venv = Env::with_stdlib(&mut *tr);
        let level = tr.outermost();
        Self {
            types: TypeTable::new(),
            tenv: Env::with_base_types(),
            venv,
            level,
            tr,
            reporter,
        }
    }

    /// Type-check a whole program (its root expression).
    pub fn check_program(&mut self, exp: &Exp) -> Result<ExpTy> {
        let result = self.check_exp(exp)?;
        debug!("program type: {}", self.types.describe(result.ty));
        Ok(result)
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn type_env(&self) -> &Env {
        &self.tenv
    }

    pub fn value_env(&self) -> &Env {
        &self.venv
    }

    // ══════════════════════════════════════════════════════════════════════
    // Variables
    // ══════════════════════════════════════════════════════════════════════

    pub fn check_var(&mut self, var: &Var) -> Result<ExpTy> {
        match &var.kind {
            VarKind::Simple(name) => match self.venv.find_var(&name.name) {
                Ok(entry) => Ok(ExpTy::new(entry.ty)),
                Err(e) => {
                    self.error(name.span, e.into_semant("variable"));
                    Ok(ExpTy::new(TypeId::INT))
                }
            },

            VarKind::Field(base, field) => {
                let base_ty = self.check_var(base)?.ty;
                if self.types.is_error(base_ty) {
                    return Ok(ExpTy::new(TypeId::ERROR));
                }
                let Some(fields) = self.types.record_fields(base_ty) else {
                    self.kind_mismatch("a record", base_ty, base.span);
                    return Ok(ExpTy::new(TypeId::ERROR));
                };
                match fields.iter().find(|f| f.name == field.name).map(|f| f.ty) {
                    Some(ty) => Ok(ExpTy::new(ty)),
                    None => {
                        self.error(
                            field.span,
                            SemantError::UndefinedName {
                                what: "field",
                                name: field.name.clone(),
                            },
                        );
                        Ok(ExpTy::new(TypeId::ERROR))
                    }
                }
            }

            VarKind::Subscript(base, index) => {
                let base_ty = self.check_var(base)?.ty;
                let index_ty = self.check_exp(index)?.ty;
                self.expect_int(index_ty, index.span, None);
                if self.types.is_error(base_ty) {
                    return Ok(ExpTy::new(TypeId::ERROR));
                }
                match self.types.array_elem(base_ty) {
                    Some(elem) => Ok(ExpTy::new(elem)),
                    None => {
                        self.kind_mismatch("an array", base_ty, base.span);
                        Ok(ExpTy::new(TypeId::ERROR))
                    }
                }
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    pub fn check_exp(&mut self, exp: &Exp) -> Result<ExpTy> {
        match &exp.kind {
            // ── Literals ──
            ExpKind::Nil => Ok(ExpTy::new(TypeId::NIL)),
            ExpKind::Int(_) => Ok(ExpTy::new(TypeId::INT)),
            ExpKind::String(_) => Ok(ExpTy::new(TypeId::STRING)),

            ExpKind::Var(var) => self.check_var(var),
            ExpKind::Call { func, args } => self.check_call(func, args, exp.span),
            ExpKind::Op { left, op, right } => self.check_op(left, *op, right),
            ExpKind::Record { typ, fields } => self.check_record(typ, fields, exp.span),
            ExpKind::Array { typ, size, init } => self.check_array(typ, size, init),

            ExpKind::Seq(exps) => {
                let mut last = ExpTy::new(TypeId::VOID);
                for e in exps {
                    last = self.check_exp(e)?;
                }
                Ok(last)
            }

            ExpKind::Assign { var, exp: value } => {
                let target = self.check_var(var)?.ty;
                let value_ty = self.check_exp(value)?.ty;
                self.expect_match(target, value_ty, value.span, None);
                Ok(ExpTy::new(TypeId::VOID))
            }

            ExpKind::If { test, then, els } => {
                let test_ty = self.check_exp(test)?.ty;
                self.expect_int(test_ty, test.span, None);
                let then_ty = self.check_exp(then)?.ty;
                let Some(els) = els else {
                    return Ok(ExpTy::new(TypeId::VOID));
                };
                let else_ty = self.check_exp(els)?.ty;
                self.expect_match(then_ty, else_ty, els.span, None);
                // `if c then nil else r` has the record's type.
                if self.types.is_nil(then_ty) {
                    Ok(ExpTy::new(else_ty))
                } else {
                    Ok(ExpTy::new(then_ty))
                }
            }

            ExpKind::While { test, body } => {
                let test_ty = self.check_exp(test)?.ty;
                self.expect_int(test_ty, test.span, None);
                self.check_exp(body)?;
                Ok(ExpTy::new(TypeId::VOID))
            }

            ExpKind::For { var, lo, hi, body } => {
                let lo_ty = self.check_exp(lo)?.ty;
                self.expect_int(lo_ty, lo.span, None);
                let hi_ty = self.check_exp(hi)?.ty;
                self.expect_int(hi_ty, hi.span, None);

                self.venv.begin_scope();
                let access = self.tr.alloc_local(self.level);
                self.venv.enter(
                    &var.name,
                    Entry::Var(VarEntry {
                        ty: TypeId::INT,
                        access,
                    }),
                );
                self.check_exp(body)?;
                self.venv.end_scope();
                Ok(ExpTy::new(TypeId::VOID))
            }

            // Whether a break sits inside a loop is not checked here.
            ExpKind::Break => Ok(ExpTy::new(TypeId::VOID)),

            ExpKind::Let { decs, body } => {
                self.tenv.begin_scope();
                self.venv.begin_scope();
                debug!("let at {}: {} declaration(s)", exp.span, decs.len());
                for dec in decs {
                    self.check_dec(dec)?;
                }
                let result = self.check_exp(body)?;
                if log_enabled!(LogLevel::Trace) {
                    self.venv.dump();
                }
                self.venv.end_scope();
                self.tenv.end_scope();
                Ok(result)
            }

            ExpKind::Error => Err(SemantError::UnexpectedNodeKind { node: "expression" }),
        }
    }

    fn check_call(&mut self, func: &Ident, args: &[Exp], span: Span) -> Result<ExpTy> {
        let sig = match self.venv.find_func(&func.name) {
            Ok(FuncEntry { params, result, .. }) => Some((params.clone(), *result)),
            Err(e) => {
                self.error(func.span, e.into_semant("function"));
                None
            }
        };

        let Some((params, result)) = sig else {
            for arg in args {
                self.check_exp(arg)?;
            }
            return Ok(ExpTy::new(TypeId::ERROR));
        };

        if params.len() != args.len() {
            self.error(
                span,
                SemantError::ArityMismatch {
                    what: "arguments",
                    expected: params.len(),
                    found: args.len(),
                },
            );
            for arg in args {
                self.check_exp(arg)?;
            }
            return Ok(ExpTy::new(result));
        }

        for (arg, param) in args.iter().zip(params) {
            let arg_ty = self.check_exp(arg)?.ty;
            self.expect_match(param, arg_ty, arg.span, Some(func.name.as_str()));
        }
        Ok(ExpTy::new(result))
    }

    fn check_op(&mut self, left: &Exp, op: Oper, right: &Exp) -> Result<ExpTy> {
        let left_ty = self.check_exp(left)?.ty;
        let right_ty = self.check_exp(right)?.ty;

        let symbol = Some(op.symbol());
        if op.is_arithmetic() {
            self.expect_int(left_ty, left.span, symbol);
            self.expect_int(right_ty, right.span, symbol);
        } else {
            // Equality and ordering share one rule: both sides must match,
            // with nil accepted against any record.
            self.expect_match(left_ty, right_ty, right.span, symbol);
        }
        Ok(ExpTy::new(TypeId::INT))
    }

    fn check_record(&mut self, typ: &Ident, fields: &[EField], span: Span) -> Result<ExpTy> {
        let declared = match self.tenv.find_type(&typ.name) {
            Ok(ty) => ty,
            Err(e) => {
                self.error(typ.span, e.into_semant("type"));
                for field in fields {
                    self.check_exp(&field.exp)?;
                }
                return Ok(ExpTy::new(TypeId::ERROR));
            }
        };

        let record_ty = self.types.resolve(declared);
        let Some(decl_fields) = self.types.record_fields(record_ty).map(<[_]>::to_vec) else {
            if !self.types.is_error(record_ty) {
                self.kind_mismatch("a record type", declared, typ.span);
            }
            for field in fields {
                self.check_exp(&field.exp)?;
            }
            return Ok(ExpTy::new(TypeId::ERROR));
        };

        if decl_fields.len() != fields.len() {
            self.error(
                span,
                SemantError::ArityMismatch {
                    what: "fields",
                    expected: decl_fields.len(),
                    found: fields.len(),
                },
            );
            for field in fields {
                self.check_exp(&field.exp)?;
            }
            return Ok(ExpTy::new(record_ty));
        }

        // Positional: the literal's field names are not consulted.
        for (field, decl) in fields.iter().zip(&decl_fields) {
            let value_ty = self.check_exp(&field.exp)?.ty;
            self.expect_match(decl.ty, value_ty, field.exp.span, Some(decl.name.as_str()));
        }
        Ok(ExpTy::new(record_ty))
    }

    fn check_array(&mut self, typ: &Ident, size: &Exp, init: &Exp) -> Result<ExpTy> {
        let size_ty = self.check_exp(size)?.ty;
        self.expect_int(size_ty, size.span, None);
        let init_ty = self.check_exp(init)?.ty;

        let declared = match self.tenv.find_type(&typ.name) {
            Ok(ty) => ty,
            Err(e) => {
                self.error(typ.span, e.into_semant("type"));
                return Ok(ExpTy::new(TypeId::ERROR));
            }
        };
        let array_ty = self.types.resolve(declared);
        match self.types.array_elem(array_ty) {
            Some(elem) => {
                self.expect_match(elem, init_ty, init.span, Some(typ.name.as_str()));
                Ok(ExpTy::new(array_ty))
            }
            None => {
                if !self.types.is_error(array_ty) {
                    self.kind_mismatch("an array type", declared, typ.span);
                }
                Ok(ExpTy::new(TypeId::ERROR))
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Declarations
    // ══════════════════════════════════════════════════════════════════════

    pub fn check_dec(&mut self, dec: &Dec) -> Result<()> {
        match &dec.kind {
            DecKind::Var(var_dec) => self.check_var_dec(var_dec),
            DecKind::Function(group) => self.check_function_group(group),
            DecKind::Type(group) => {
                self.check_type_group(group);
                Ok(())
            }
        }
    }

    fn check_var_dec(&mut self, dec: &VarDec) -> Result<()> {
        let init_ty = self.check_exp(&dec.init)?.ty;

        let ty = match &dec.typ {
            Some(ann) => match self.tenv.find_type(&ann.name) {
                Ok(declared) => {
                    let name = dec.name.name.as_str();
                    self.expect_match(declared, init_ty, dec.init.span, Some(name));
                    declared
                }
                Err(e) => {
                    self.error(ann.span, e.into_semant("type"));
                    TypeId::ERROR
                }
            },
            None if self.types.is_nil(init_ty) => {
                self.invalid_initializer(dec, "nil needs a record type annotation");
                TypeId::ERROR
            }
            None if self.types.is_void(init_ty) => {
                self.invalid_initializer(dec, "a void value cannot be stored");
                TypeId::ERROR
            }
            None => init_ty,
        };

        let access = self.tr.alloc_local(self.level);
        self.venv
            .enter(&dec.name.name, Entry::Var(VarEntry { ty, access }));
        Ok(())
    }

    /// Two passes: register every signature, then check every body, so
    /// members can call each other in any order.
    fn check_function_group(&mut self, group: &[FunDec]) -> Result<()> {
        debug!(
            "function group: {}",
            group.iter().map(|f| f.name.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let mut sigs = Vec::with_capacity(group.len());
        for fun in group {
            let result = match &fun.result {
                Some(name) => self.lookup_type(name),
                None => TypeId::VOID,
            };
            let params: Vec<TypeId> = fun.params.iter().map(|p| self.lookup_type(&p.typ)).collect();
            let label = self.tr.new_label();
            let level = self.tr.new_level(self.level, label, params.len());
            self.venv.enter(
                &fun.name.name,
                Entry::Func(FuncEntry {
                    params: params.clone(),
                    result,
                    level,
                    label,
                }),
            );
            sigs.push(Signature {
                params,
                result,
                level,
            });
        }

        for (fun, sig) in group.iter().zip(sigs) {
            self.venv.begin_scope();
            let outer = std::mem::replace(&mut self.level, sig.level);
            for (param, ty) in fun.params.iter().zip(&sig.params) {
                let access = self.tr.alloc_local(sig.level);
                self.venv
                    .enter(&param.name.name, Entry::Var(VarEntry { ty: *ty, access }));
            }
            let body_ty = self.check_exp(&fun.body)?.ty;
            self.expect_match(sig.result, body_ty, fun.span, Some(fun.name.name.as_str()));
            self.level = outer;
            self.venv.end_scope();
        }
        Ok(())
    }

    /// Two passes: install a placeholder per name, then define each one in
    /// place. Members may refer to each other (and themselves) freely; an
    /// alias chain that never reaches a real type is reported afterwards.
    fn check_type_group(&mut self, group: &[TypeDec]) {
        debug!(
            "type group: {}",
            group.iter().map(|t| t.name.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let ids: Vec<TypeId> = group
            .iter()
            .map(|dec| {
                let id = self.types.new_placeholder(&dec.name.name, dec.span);
                self.tenv.enter(&dec.name.name, Entry::Type(id));
                id
            })
            .collect();

        for (dec, &id) in group.iter().zip(&ids) {
            let ty = self.check_ty(&dec.ty, &dec.name.name);
            self.types.define(id, ty);
        }

        // Only chains that break inside this group are new. One that runs
        // into an earlier group's cycle was reported there.
        for (dec, &id) in group.iter().zip(&ids) {
            match self.types.actual(id) {
                Err(e) if ids.contains(&e.at()) => self.error(
                    dec.span,
                    SemantError::TypeCycle {
                        name: dec.name.name.clone(),
                    },
                ),
                Err(e) => debug!("'{}' resolves through broken alias: {}", dec.name.name, e),
                Ok(_) => {}
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Type References
    // ══════════════════════════════════════════════════════════════════════

    /// Translate the right-hand side of `type name = ty`.
    pub fn check_ty(&mut self, ty: &Ty, name: &str) -> Type {
        match &ty.kind {
            TyKind::Name(target) => match self.tenv.find_type(&target.name) {
                Ok(id) => Type::Alias {
                    name: name.to_string(),
                    target: Some(id),
                },
                Err(e) => {
                    self.error(target.span, e.into_semant("type"));
                    Type::Error
                }
            },
            TyKind::Record(fields) => Type::Record(
                fields
                    .iter()
                    .map(|f| RecordField {
                        name: f.name.name.clone(),
                        ty: self.lookup_type(&f.typ),
                    })
                    .collect(),
            ),
            TyKind::Array(elem) => Type::Array(self.lookup_type(elem)),
        }
    }

    /// Resolve a type name, reporting and falling back to the error type.
    fn lookup_type(&mut self, name: &Ident) -> TypeId {
        match self.tenv.find_type(&name.name) {
            Ok(id) => id,
            Err(e) => {
                self.error(name.span, e.into_semant("type"));
                TypeId::ERROR
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Error Reporting
    // ══════════════════════════════════════════════════════════════════════

    fn expect_int(&mut self, found: TypeId, span: Span, name: Option<&str>) {
        if !self.types.is_int(found) {
            self.expect_match(TypeId::INT, found, span, name);
        }
    }

    fn expect_match(&mut self, expected: TypeId, found: TypeId, span: Span, name: Option<&str>) {
        if !self.types.matches(expected, found) {
            let (expected, found) = self.types.describe_pair(expected, found);
            self.error(
                span,
                SemantError::TypeMismatch {
                    expected,
                    found,
                    name: name.map(str::to_string),
                },
            );
        }
    }

    fn kind_mismatch(&mut self, expected: &'static str, found: TypeId, span: Span) {
        self.error(
            span,
            SemantError::KindMismatch {
                expected,
                found: self.types.describe(found),
            },
        );
    }

    fn invalid_initializer(&mut self, dec: &VarDec, reason: &'static str) {
        self.error(
            dec.init.span,
            SemantError::InvalidInitializer {
                name: dec.name.name.clone(),
                reason,
            },
        );
    }

    fn error(&mut self, span: Span, err: SemantError) {
        debug!("{}: {}", span, err);
        self.reporter.report(span, &err);
    }
}
