//! A tiny namer for resolver integration tests.
//!
//! Classes and modules are declared with a `Hierarchy` builder and entered
//! at distinct locations of one source file, the way the namer would.

use std::sync::Arc;

use larch_diagnostic::{ErrorCode, ErrorQueue};
use larch_ir::{FileRef, Loc, LocOffsets, SymbolRef, Variance};
use larch_symbols::{GlobalState, StateOptions, Symbols};

#[allow(dead_code, reason = "not every test binary uses every helper")]
pub struct Hierarchy {
    pub gs: GlobalState,
    pub errors: Arc<ErrorQueue>,
    file: FileRef,
    offset: u32,
}

#[allow(dead_code, reason = "not every test binary uses every helper")]
impl Hierarchy {
    /// An initialized state, frozen the way a namer leaves it.
    pub fn new() -> Self {
        let errors = Arc::new(ErrorQueue::new());
        let mut gs = GlobalState::with_options(Arc::clone(&errors), StateOptions::for_tests());
        gs.init_empty();
        let file = gs.unfrozen(|gs| gs.enter_file("lib/shapes.rb", ""));
        Hierarchy {
            gs,
            errors,
            file,
            offset: 0,
        }
    }

    fn loc(&mut self) -> Loc {
        let begin = self.offset;
        self.offset += 8;
        Loc::new(self.file, LocOffsets::new(begin, begin + 4))
    }

    fn enter(&mut self, name: &str, is_module: bool) -> SymbolRef {
        let loc = self.loc();
        self.gs.unfrozen(|gs| {
            let name = gs.enter_name_constant(name);
            let sym = gs.enter_class_symbol(loc, Symbols::root(), name);
            gs.class_data_mut(sym).set_is_module(is_module);
            gs.singleton_class(sym);
            sym
        })
    }

    pub fn class(&mut self, name: &str) -> SymbolRef {
        self.enter(name, false)
    }

    pub fn module(&mut self, name: &str) -> SymbolRef {
        self.enter(name, true)
    }

    pub fn subclass(&mut self, name: &str, super_class: SymbolRef) -> SymbolRef {
        let sym = self.class(name);
        self.gs.class_data_mut(sym).super_class = super_class;
        sym
    }

    pub fn include(&mut self, sym: SymbolRef, mixin: SymbolRef) {
        self.gs.class_data_mut(sym).add_mixin(mixin);
    }

    pub fn type_member(&mut self, owner: SymbolRef, name: &str, variance: Variance) -> SymbolRef {
        let loc = self.loc();
        self.gs.unfrozen(|gs| {
            let name = gs.enter_name_constant(name);
            gs.enter_type_member(loc, owner, name, variance)
        })
    }

    pub fn ancestors(&mut self, sym: SymbolRef) -> Vec<String> {
        let order = self
            .gs
            .unfrozen(|gs| larch_resolver::full_linearization(gs, sym))
            .unwrap_or_else(|e| panic!("{e}"));
        order.iter().map(|&s| self.gs.show_full_name(s)).collect()
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.codes()
    }
}
