//! Mixin linearization.
//!
//! After this pass a class's `mixins` list holds every ancestor module in
//! method-lookup order (nearest first), minus what its superclass chain
//! already contributes. Together with the superclass chain this gives the
//! full ancestor order returned by [`full_linearization`].

use larch_diagnostic::{Diagnostic, ErrorCode};
use larch_ir::{well_known, SymbolRef};
use larch_symbols::{ClassFlags, GlobalState, Symbols};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::ancestors::{finalize_ancestors, index_u32};
use crate::ResolveError;

type Mixins = SmallVec<[SymbolRef; 4]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Per-class DFS marks. Classes appended after construction start out
/// unvisited.
struct Marks(Vec<Visit>);

impl Marks {
    fn new(gs: &GlobalState) -> Self {
        Marks(vec![Visit::Unvisited; gs.class_and_modules_used()])
    }

    fn get(&self, sym: SymbolRef) -> Visit {
        self.0.get(sym.index()).copied().unwrap_or(Visit::Unvisited)
    }

    fn set(&mut self, sym: SymbolRef, visit: Visit) {
        if self.0.len() <= sym.index() {
            self.0.resize(sym.index() + 1, Visit::Unvisited);
        }
        self.0[sym.index()] = visit;
    }
}

/// Linearize every class and module.
///
/// Before any class is linearized, each `<mixes-in-class-methods>` module
/// found on one of its mixins becomes a mixin of its singleton class.
/// Singletons created for that get their default superclasses right away.
/// Already linearized classes are left alone, so running this twice is a
/// no-op.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compute_linearization(gs: &mut GlobalState) -> Result<(), ResolveError> {
    let classes_before = gs.class_and_modules_used();
    let propagated = propagate_class_methods(gs);
    if gs.class_and_modules_used() > classes_before {
        finalize_ancestors(gs);
    }

    let linearized = gs
        .class_and_module_refs()
        .filter(|&sym| !gs.class_data(sym).is_linearization_computed())
        .count();
    let mut marks = Marks::new(gs);
    for index in 1..gs.class_and_modules_used() {
        linearize(gs, &mut marks, SymbolRef::class_or_module(index_u32(index)))?;
    }

    tracing::debug!(linearized, propagated, "computed linearization",);
    Ok(())
}

fn propagate_class_methods(gs: &mut GlobalState) -> usize {
    let mut propagated = 0;
    let mut index = 1;
    while index < gs.class_and_modules_used() {
        let sym = SymbolRef::class_or_module(index_u32(index));
        index += 1;
        if gs.class_data(sym).is_linearization_computed() {
            continue;
        }
        let mixins = gs.class_data(sym).mixins.clone();
        for mixin in mixins {
            let class_methods = gs.find_member(mixin, well_known::CLASS_METHODS);
            if !class_methods.exists() {
                continue;
            }
            let singleton = gs.singleton_class(sym);
            if gs.class_data_mut(singleton).add_mixin(class_methods) {
                propagated += 1;
            }
        }
    }
    propagated
}

fn cyclic(gs: &GlobalState, class: SymbolRef) -> ResolveError {
    ResolveError::CyclicMixin {
        class,
        name: gs.show_full_name(class),
    }
}

fn is_stub(gs: &GlobalState, sym: SymbolRef) -> bool {
    let super_class = gs.class_data(sym).super_class;
    super_class == Symbols::stub_super_class() || super_class == Symbols::stub_module()
}

fn linearize(gs: &mut GlobalState, marks: &mut Marks, sym: SymbolRef) -> Result<(), ResolveError> {
    if gs.class_data(sym).is_linearization_computed() {
        return Ok(());
    }
    match marks.get(sym) {
        Visit::Done => return Ok(()),
        Visit::InProgress => return Err(cyclic(gs, sym)),
        Visit::Unvisited => {}
    }
    marks.set(sym, Visit::InProgress);

    larch_stack::ensure_sufficient_stack(|| {
        let super_class = gs.class_data(sym).super_class;
        if super_class.exists() {
            linearize(gs, marks, super_class)?;
        }

        let declared = gs.class_data(sym).mixins.clone();
        let mut mixins = Mixins::new();
        for mixin in declared {
            if mixin == super_class {
                continue;
            }
            if is_stub(gs, mixin) {
                mixins.push(mixin);
                continue;
            }
            linearize(gs, marks, mixin)?;

            if gs.class_data(mixin).is_module() {
                let mut pos = place_mixin(gs, sym, &mut mixins, mixin, super_class, 0)?;
                let inherited = gs.class_data(mixin).mixins.clone();
                for component in inherited {
                    pos = place_mixin(gs, sym, &mut mixins, component, super_class, pos)?;
                }
            } else {
                if mixin != Symbols::basic_object() {
                    report_non_module(gs, sym, mixin);
                }
                let ancestors = full_linearization_of(gs, marks, mixin)?;
                mixins.insert_many(0, ancestors);
            }
        }

        let data = gs.class_data_mut(sym);
        data.mixins = mixins;
        data.flags.insert(ClassFlags::LINEARIZATION_COMPUTED);
        marks.set(sym, Visit::Done);
        Ok(())
    })
}

/// Place `mixin` at `pos` unless the superclass already provides it or it
/// is present at or after `pos`. Returns the next insertion point.
///
/// A mixin already present is never moved backwards.
fn place_mixin(
    gs: &GlobalState,
    for_sym: SymbolRef,
    mixins: &mut Mixins,
    mixin: SymbolRef,
    parent: SymbolRef,
    pos: usize,
) -> Result<usize, ResolveError> {
    if mixin == for_sym {
        return Err(cyclic(gs, for_sym));
    }
    if parent.exists() && gs.derives_from(parent, mixin) {
        return Ok(pos);
    }
    match mixins.iter().position(|&m| m == mixin) {
        Some(found) if found >= pos => Ok(found + 1),
        Some(_) => Ok(pos),
        None => {
            mixins.insert(pos, mixin);
            Ok(pos + 1)
        }
    }
}

fn report_non_module(gs: &GlobalState, sym: SymbolRef, mixin: SymbolRef) {
    gs.report(
        Diagnostic::error(ErrorCode::E4001)
            .with_message(format!(
                "Only modules can be `include`d, but `{}` is a class",
                gs.show_full_name(mixin)
            ))
            .with_label(gs.loc_of(sym), format!("included in `{}`", gs.show_full_name(sym)))
            .with_secondary_label(gs.loc_of(mixin), "declared as a class here"),
    );
}

/// Every ancestor of `sym` in method-lookup order, starting with `sym`.
///
/// Linearizes whatever it touches that is not linearized yet.
pub fn full_linearization(
    gs: &mut GlobalState,
    sym: SymbolRef,
) -> Result<Vec<SymbolRef>, ResolveError> {
    let mut marks = Marks::new(gs);
    full_linearization_of(gs, &mut marks, sym)
}

fn full_linearization_of(
    gs: &mut GlobalState,
    marks: &mut Marks,
    sym: SymbolRef,
) -> Result<Vec<SymbolRef>, ResolveError> {
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();
    collect_ancestors(gs, marks, sym, &mut order, &mut seen)?;
    Ok(order)
}

fn collect_ancestors(
    gs: &mut GlobalState,
    marks: &mut Marks,
    sym: SymbolRef,
    order: &mut Vec<SymbolRef>,
    seen: &mut FxHashSet<SymbolRef>,
) -> Result<(), ResolveError> {
    linearize(gs, marks, sym)?;
    seen.insert(sym);
    order.push(sym);

    larch_stack::ensure_sufficient_stack(|| {
        let (mixins, super_class) = {
            let data = gs.class_data(sym);
            (data.mixins.clone(), data.super_class)
        };
        for mixin in mixins {
            if seen.contains(&mixin) {
                continue;
            }
            if gs.class_data(mixin).is_module() {
                seen.insert(mixin);
                order.push(mixin);
            } else {
                collect_ancestors(gs, marks, mixin, order, seen)?;
            }
        }
        if super_class.exists() && !seen.contains(&super_class) {
            collect_ancestors(gs, marks, super_class, order, seen)?;
        }
        Ok(())
    })
}
