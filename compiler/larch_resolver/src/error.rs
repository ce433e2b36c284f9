//! Fatal resolver outcomes.

use larch_ir::SymbolRef;

/// Errors that stop resolution. Everything recoverable is reported as a
/// diagnostic instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The mixin or superclass graph loops back through `class`.
    #[error("loop in mixins: `{name}` is its own ancestor")]
    CyclicMixin { class: SymbolRef, name: String },
}
