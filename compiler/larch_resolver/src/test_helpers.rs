//! Shared test utilities for the resolver passes.
//!
//! `Program` plays the namer: it enters classes, modules, mixins and type
//! members into an initialized state with every table open. Only compiled
//! in test builds.

use std::sync::Arc;

use larch_diagnostic::{ErrorCode, ErrorQueue};
use larch_ir::{FileRef, Loc, LocOffsets, SymbolRef, Variance};
use larch_symbols::{GlobalState, StateOptions, Symbols};

pub(crate) struct Program {
    pub gs: GlobalState,
    pub errors: Arc<ErrorQueue>,
    file: FileRef,
    next_offset: u32,
}

impl Program {
    pub(crate) fn new() -> Self {
        let errors = Arc::new(ErrorQueue::new());
        let mut gs = GlobalState::with_options(Arc::clone(&errors), StateOptions::for_tests());
        gs.init_empty();
        gs.unfreeze_name_table();
        gs.unfreeze_symbol_table();
        gs.unfreeze_file_table();
        let file = gs.enter_file("app.rb", "");
        Program {
            gs,
            errors,
            file,
            next_offset: 0,
        }
    }

    /// A fresh location in the program's file.
    pub(crate) fn loc(&mut self) -> Loc {
        let begin = self.next_offset;
        self.next_offset += 10;
        Loc::new(self.file, LocOffsets::new(begin, begin + 5))
    }

    fn enter(&mut self, name: &str, is_module: bool) -> SymbolRef {
        let name = self.gs.enter_name_constant(name);
        let loc = self.loc();
        let sym = self.gs.enter_class_symbol(loc, Symbols::root(), name);
        self.gs.class_data_mut(sym).set_is_module(is_module);
        sym
    }

    pub(crate) fn class(&mut self, name: &str) -> SymbolRef {
        self.enter(name, false)
    }

    pub(crate) fn module(&mut self, name: &str) -> SymbolRef {
        self.enter(name, true)
    }

    pub(crate) fn inherit(&mut self, sym: SymbolRef, super_class: SymbolRef) {
        self.gs.class_data_mut(sym).super_class = super_class;
    }

    pub(crate) fn include(&mut self, sym: SymbolRef, mixin: SymbolRef) {
        self.gs.class_data_mut(sym).add_mixin(mixin);
    }

    pub(crate) fn type_member(&mut self, owner: SymbolRef, name: &str, variance: Variance) -> SymbolRef {
        let name = self.gs.enter_name_constant(name);
        let loc = self.loc();
        self.gs.enter_type_member(loc, owner, name, variance)
    }

    pub(crate) fn names(&self, syms: &[SymbolRef]) -> Vec<String> {
        syms.iter().map(|&sym| self.gs.show_full_name(sym)).collect()
    }

    pub(crate) fn mixin_names(&self, sym: SymbolRef) -> Vec<String> {
        self.names(&self.gs.class_data(sym).mixins)
    }

    pub(crate) fn codes(&self) -> Vec<ErrorCode> {
        self.errors.codes()
    }
}
