//! Symbol arena for the larch semantic core.
//!
//! [`GlobalState`] holds five append-only symbol stores (classes and
//! modules, methods, fields, type arguments, type members) addressed by
//! stable [`SymbolRef`](larch_ir::SymbolRef) handles, together with the
//! name table, the file table and the shared error sink.
//!
//! ```text
//! let errors = Arc::new(ErrorQueue::new());
//! let mut gs = GlobalState::new(errors);
//! gs.init_empty();
//! gs.unfrozen(|gs| {
//!     let name = gs.enter_name_constant("Foo");
//!     gs.enter_class_symbol(loc, Symbols::root(), name)
//! });
//! ```

pub mod files;
mod global_state;
mod options;
pub mod symbol;
mod symbols;

pub use files::{File, FileType};
pub use global_state::{CloneHistoryEntry, GlobalState, GlobalStateId};
pub use options::StateOptions;
pub use symbol::{ArgFlags, ArgInfo, ClassFlags, ClassOrModule, Field, Method, MethodFlags, TypeParam};
pub use symbols::Symbols;
