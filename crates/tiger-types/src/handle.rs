//! Opaque handles owned by the translation backend.
//!
//! The semantic pass stores these on variable and function bindings and
//! hands them back to the backend untouched. Only the backend gives the
//! numbers meaning.

use std::fmt;

/// A nesting level (stack frame context) a function body runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level(u32);

/// A code label, e.g. the entry point of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(u32);

/// Storage location of a variable within some level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Access {
    level: Level,
    slot: u32,
}

macro_rules! raw_handle {
    ($ty:ident) => {
        impl $ty {
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

raw_handle!(Level);
raw_handle!(Label);

impl Access {
    pub const fn new(level: Level, slot: u32) -> Self {
        Self { level, slot }
    }

    pub const fn level(self) -> Level {
        self.level
    }

    pub const fn slot(self) -> u32 {
        self.slot
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Translated-expression handle paired with every checked node.
///
/// Reserved for the backend; the semantic pass always produces the empty
/// handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrExp {
    _reserved: (),
}

impl TrExp {
    pub const fn empty() -> Self {
        Self { _reserved: () }
    }
}
