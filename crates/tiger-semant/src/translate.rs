//! The seam between semantic analysis and the translation backend.
//!
//! The checker asks the backend for levels, labels and variable storage and
//! stores the returned handles on environment entries. It never inspects
//! them.

use tiger_types::handle::{Access, Label, Level};

pub trait Translate {
    /// The level enclosing the whole program; built-ins live here.
    fn outermost(&self) -> Level;

    /// A level for a function body nested inside `parent`.
    fn new_level(&mut self, parent: Level, name: Label, formals: usize) -> Level;

    /// Storage for a local variable (or parameter) of `level`.
    fn alloc_local(&mut self, level: Level) -> Access;

    fn new_label(&mut self) -> Label;
}

/// Backend stand-in that hands out sequential ids.
///
/// Used when the semantic pass runs on its own, e.g. for diagnostics only.
#[derive(Debug)]
pub struct NullTranslate {
    levels: Vec<u32>,
    labels: u32,
}

impl NullTranslate {
    pub fn new() -> Self {
        Self {
            levels: vec![0],
            labels: 0,
        }
    }
}

impl Default for NullTranslate {
    fn default() -> Self {
        Self::new()
    }
}

impl Translate for NullTranslate {
    fn outermost(&self) -> Level {
        Level::from_raw(0)
    }

    fn new_level(&mut self, _parent: Level, _name: Label, _formals: usize) -> Level {
        let id = self.levels.len() as u32;
        self.levels.push(0);
        Level::from_raw(id)
    }

    fn alloc_local(&mut self, level: Level) -> Access {
        let idx = level.raw() as usize;
        if idx >= self.levels.len() {
            self.levels.resize(idx + 1, 0);
        }
        let slot = self.levels[idx];
        self.levels[idx] += 1;
        Access::new(level, slot)
    }

    fn new_label(&mut self) -> Label {
        let label = Label::from_raw(self.labels);
        self.labels += 1;
        label
    }
}
