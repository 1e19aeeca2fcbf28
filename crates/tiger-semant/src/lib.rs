//! Tiger semantic analysis: scoped name resolution and static type checking.
//!
//! ```text
//! Tiger Source → Lexer → Parser → Semantic Analysis → Translate → ...
//! ```
//!
//! [`check_program`] runs the pass against any [`Reporter`];
//! [`type_check`] collects the diagnostics and is what most callers want.

pub mod checker;
pub mod config;
pub mod env;
pub mod stdlib;
pub mod translate;
pub mod ty;

pub use checker::{Checker, ExpTy};
pub use config::CheckerConfig;

use tiger_types::ast::Exp;
use tiger_types::{Diagnostics, Reporter, Result};

use crate::translate::NullTranslate;

/// Check `program`, streaming diagnostics to `reporter`.
///
/// Returns `Err` only for a malformed tree.
pub fn check_program(program: &Exp, reporter: &mut dyn Reporter) -> Result<ExpTy> {
    let mut tr = NullTranslate::new();
    Checker::new(&mut tr, reporter).check_program(program)
}

/// Check `program` and collect its diagnostics. No diagnostics means the
/// program is well-typed.
pub fn type_check(program: &Exp, config: &CheckerConfig) -> Result<Diagnostics> {
    let mut diagnostics = config.diagnostics();
    check_program(program, &mut diagnostics)?;
    Ok(diagnostics)
}
