//! Handles of the bootstrap classes.
//!
//! `GlobalState::init_empty` synthesizes these in this exact order, so their
//! handles are compile-time constants.

use larch_ir::SymbolRef;

/// Namespace for the bootstrap class handles.
pub struct Symbols;

impl Symbols {
    pub const fn no_symbol() -> SymbolRef {
        SymbolRef::class_or_module(0)
    }

    /// The top type.
    pub const fn top() -> SymbolRef {
        SymbolRef::class_or_module(1)
    }

    /// The bottom type.
    pub const fn bottom() -> SymbolRef {
        SymbolRef::class_or_module(2)
    }

    /// Owner of every top-level constant.
    pub const fn root() -> SymbolRef {
        SymbolRef::class_or_module(3)
    }

    /// Placeholder superclass meaning "not decided yet".
    pub const fn todo() -> SymbolRef {
        SymbolRef::class_or_module(4)
    }

    pub const fn object() -> SymbolRef {
        SymbolRef::class_or_module(5)
    }

    pub const fn basic_object() -> SymbolRef {
        SymbolRef::class_or_module(6)
    }

    pub const fn class() -> SymbolRef {
        SymbolRef::class_or_module(7)
    }

    pub const fn module() -> SymbolRef {
        SymbolRef::class_or_module(8)
    }

    pub const fn kernel() -> SymbolRef {
        SymbolRef::class_or_module(9)
    }

    pub const fn untyped() -> SymbolRef {
        SymbolRef::class_or_module(10)
    }

    pub const fn enumerable() -> SymbolRef {
        SymbolRef::class_or_module(11)
    }

    /// Superclass given to modules that declare none.
    pub const fn implicit_module_superclass() -> SymbolRef {
        SymbolRef::class_or_module(12)
    }

    /// Superclass of a module whose definition was never seen.
    pub const fn stub_module() -> SymbolRef {
        SymbolRef::class_or_module(13)
    }

    /// Superclass of a class whose superclass could not be resolved.
    pub const fn stub_super_class() -> SymbolRef {
        SymbolRef::class_or_module(14)
    }

    /// Highest bootstrap class index.
    pub const LAST_BOOTSTRAP_CLASS: u32 = 14;
}
