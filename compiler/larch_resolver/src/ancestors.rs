//! Default superclasses.

use larch_ir::SymbolRef;
use larch_symbols::{FileType, GlobalState, Symbols};

/// Give every class and module without an explicit superclass its default
/// one.
///
/// - the implicit module superclass sits right under `BasicObject`;
/// - singleton classes chain to the singleton of their attached class's
///   superclass, bottoming out at `Class` (for `BasicObject`) and `Module`
///   (for modules);
/// - plain classes inherit from `Object`;
/// - plain modules inherit from the implicit module superclass.
///
/// Symbols never marked as class or module become modules. Singletons
/// created here are appended to the store and finalized in the same pass.
#[tracing::instrument(level = "debug", skip_all)]
pub fn finalize_ancestors(gs: &mut GlobalState) {
    let methods = (1..gs.methods_used())
        .filter(|&index| in_normal_file(gs, SymbolRef::method(index_u32(index))))
        .count();
    let mut classes = 0_usize;
    let mut modules = 0_usize;

    let mut index = 1;
    while index < gs.class_and_modules_used() {
        let sym = SymbolRef::class_or_module(index_u32(index));
        index += 1;

        if !gs.class_data(sym).is_class_module_set() {
            gs.class_data_mut(sym).set_is_module(true);
        }
        if in_normal_file(gs, sym) {
            if gs.class_data(sym).is_class() {
                classes += 1;
            } else {
                modules += 1;
            }
        }

        let super_class = gs.class_data(sym).super_class;
        if super_class.exists() && super_class != Symbols::todo() {
            continue;
        }
        let default = default_super_class(gs, sym);
        gs.class_data_mut(sym).super_class = default;
    }

    tracing::debug!(classes, modules, methods, "finalized ancestors",);
}

fn default_super_class(gs: &mut GlobalState, sym: SymbolRef) -> SymbolRef {
    if sym == Symbols::implicit_module_superclass() {
        return Symbols::basic_object();
    }

    let attached = gs.attached_class(sym);
    if attached.exists() && attached != Symbols::untyped() {
        if attached == Symbols::basic_object() {
            return Symbols::class();
        }
        let attached_super = gs.class_data(attached).super_class;
        if attached_super == Symbols::implicit_module_superclass() {
            return Symbols::module();
        }
        if !attached_super.exists() || attached_super == Symbols::todo() {
            return if gs.class_data(attached).is_module() {
                Symbols::module()
            } else {
                Symbols::class()
            };
        }
        return gs.singleton_class(attached_super);
    }

    if gs.class_data(sym).is_class() {
        if sym != Symbols::object() && !gs.derives_from(Symbols::object(), sym) {
            return Symbols::object();
        }
    } else if sym != Symbols::basic_object() && !gs.derives_from(Symbols::basic_object(), sym) {
        return Symbols::implicit_module_superclass();
    }
    SymbolRef::NONE
}

fn in_normal_file(gs: &GlobalState, sym: SymbolRef) -> bool {
    gs.file_type_of(gs.loc_of(sym)) == Some(FileType::Normal)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "store indices come from u32 handles"
)]
pub(crate) fn index_u32(index: usize) -> u32 {
    index as u32
}
