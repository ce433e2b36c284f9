//! Global resolution passes for larch.
//!
//! Runs once every class, module and type member has been entered into the
//! [`GlobalState`]:
//!
//! 1. [`finalize_ancestors`] fills in default superclasses.
//! 2. [`compute_linearization`] orders each class's mixins.
//! 3. [`finalize_symbols`] checks and aliases type members against the
//!    ancestors that declare them.
//!
//! Problems in user code are reported as diagnostics to the state's error
//! sink; only a cyclic ancestry stops resolution with a [`ResolveError`].
//!
//! # Tracing
//!
//! Each stage is instrumented. Set `RUST_LOG=larch_resolver=debug` and
//! call [`init_tracing`] to see stage summaries.

mod ancestors;
mod error;
mod linearization;
mod type_members;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use ancestors::finalize_ancestors;
pub use error::ResolveError;
pub use linearization::{compute_linearization, full_linearization};
pub use type_members::{dealias_at, finalize_symbols, TypeAliases};

use larch_symbols::GlobalState;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

/// Run all three stages in order, with the symbol and name tables open.
///
/// Resolving an already resolved state changes nothing.
#[tracing::instrument(level = "debug", skip_all, fields(state = gs.id().raw()))]
pub fn resolve(gs: &mut GlobalState) -> Result<TypeAliases, ResolveError> {
    gs.unfrozen(|gs| {
        finalize_ancestors(gs);
        compute_linearization(gs)?;
        finalize_symbols(gs)
    })
}
