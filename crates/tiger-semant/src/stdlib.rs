//! Standard library function signatures.
//!
//! Installed in the outermost scope of the variable/function namespace
//! before checking starts. The runtime provides the implementations.

use crate::ty::TypeId;

/// A built-in function signature.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub params: &'static [TypeId],
    pub result: TypeId,
}

const fn builtin(name: &'static str, params: &'static [TypeId], result: TypeId) -> Builtin {
    Builtin {
        name,
        params,
        result,
    }
}

pub const SIGNATURES: &[Builtin] = &[
    builtin("print", &[TypeId::STRING], TypeId::VOID),
    builtin("flush", &[], TypeId::VOID),
    builtin("getchar", &[], TypeId::STRING),
    builtin("ord", &[TypeId::STRING], TypeId::INT),
    builtin("chr", &[TypeId::INT], TypeId::STRING),
    builtin("size", &[TypeId::STRING], TypeId::INT),
    builtin(
        "substring",
        &[TypeId::STRING, TypeId::INT, TypeId::INT],
        TypeId::STRING,
    ),
    builtin("concat", &[TypeId::STRING, TypeId::STRING], TypeId::STRING),
    builtin("not", &[TypeId::INT], TypeId::INT),
    builtin("exit", &[TypeId::INT], TypeId::VOID),
];
