//! End-to-end resolution of small class hierarchies.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

mod common;

use common::Hierarchy;
use larch_diagnostic::ErrorCode;
use larch_ir::{well_known, SymbolKind, SymbolRef, Type, Variance};
use larch_resolver::{dealias_at, resolve, ResolveError};
use larch_symbols::Symbols;
use pretty_assertions::assert_eq;

fn shapes() -> (Hierarchy, SymbolRef, SymbolRef) {
    let mut h = Hierarchy::new();
    let comparable = h.module("Comparable");
    let drawable = h.module("Drawable");
    let shape = h.class("Shape");
    h.include(shape, drawable);
    let circle = h.subclass("Circle", shape);
    h.include(circle, comparable);
    (h, shape, circle)
}

#[test]
fn instance_ancestors() {
    let (mut h, _, circle) = shapes();
    resolve(&mut h.gs).unwrap();

    assert!(h.codes().is_empty(), "{:?}", h.codes());
    assert_eq!(
        h.ancestors(circle),
        ["Circle", "Comparable", "Shape", "Drawable", "Object", "BasicObject"]
    );
}

#[test]
fn singleton_ancestors_end_in_class() {
    let (mut h, _, circle) = shapes();
    resolve(&mut h.gs).unwrap();

    let singleton = h.gs.lookup_singleton_class(circle);
    assert_eq!(
        h.ancestors(singleton),
        [
            "<Class:Circle>",
            "<Class:Shape>",
            "<Class:Object>",
            "<Class:BasicObject>",
            "Class",
            "Module",
            "Object",
            "BasicObject",
        ]
    );
}

#[test]
fn tables_are_frozen_again_afterwards() {
    let (mut h, _, _) = shapes();
    resolve(&mut h.gs).unwrap();
    assert!(h.gs.is_symbol_table_frozen());
}

#[test]
fn resolving_twice_changes_nothing() {
    let (mut h, _, _) = shapes();
    resolve(&mut h.gs).unwrap();
    let dump = h.gs.to_string();
    let used = h.gs.symbols_used_total();

    resolve(&mut h.gs).unwrap();
    assert_eq!(h.gs.to_string(), dump);
    assert_eq!(h.gs.symbols_used_total(), used);
    assert!(h.codes().is_empty());
}

#[test]
fn resolving_twice_keeps_diagnostics_and_fallbacks() {
    let mut h = Hierarchy::new();
    let pair = h.class("Pair");
    h.type_member(pair, "Left", Variance::Invariant);
    h.type_member(pair, "Right", Variance::Invariant);
    let bare = h.subclass("Bare", pair);
    h.type_member(bare, "Right", Variance::Invariant);
    let source = h.module("Source");
    let out = h.type_member(source, "Out", Variance::CoVariant);
    let sink = h.module("Sink");
    h.include(sink, source);
    h.type_member(sink, "Out", Variance::ContraVariant);

    let first = resolve(&mut h.gs).unwrap();
    let dump = h.gs.to_string();
    let codes = h.codes();
    assert_eq!(codes, [ErrorCode::E4002, ErrorCode::E4005]);

    let second = resolve(&mut h.gs).unwrap();
    assert_eq!(h.codes(), codes);
    assert_eq!(h.gs.to_string(), dump);
    assert_eq!(second.len(), first.len());
    assert_eq!(dealias_at(&h.gs, out, sink, &second), SymbolRef::NONE);
}

#[test]
fn generic_hierarchy_is_aliased() {
    let mut h = Hierarchy::new();
    let collection = h.class("Collection");
    let elem = h.type_member(collection, "Elem", Variance::Invariant);
    let stack = h.subclass("Stack", collection);
    let stack_elem = h.type_member(stack, "Elem", Variance::Invariant);
    let aliases = resolve(&mut h.gs).unwrap();

    assert!(h.codes().is_empty(), "{:?}", h.codes());
    assert_eq!(dealias_at(&h.gs, elem, stack, &aliases), stack_elem);
    assert_eq!(
        h.gs.external_type(stack),
        Type::Applied {
            klass: stack,
            targs: vec![Type::Untyped],
        }
    );
}

#[test]
fn attached_class_is_bounded_by_the_instance_type() {
    let (mut h, shape, _) = shapes();
    resolve(&mut h.gs).unwrap();

    let singleton = h.gs.lookup_singleton_class(shape);
    let attached = h.gs.find_member(singleton, well_known::ATTACHED_CLASS);
    let bounds = h
        .gs
        .type_param(attached)
        .result_type
        .as_ref()
        .and_then(Type::as_lambda_param)
        .unwrap();
    assert_eq!(bounds.lower, Type::Bottom);
    assert_eq!(bounds.upper, Type::Class(shape));
}

#[test]
fn diagnostics_point_at_the_offending_declaration() {
    let mut h = Hierarchy::new();
    let source = h.module("Source");
    h.type_member(source, "Out", Variance::CoVariant);
    let sink = h.module("Sink");
    h.include(sink, source);
    let sink_out = h.type_member(sink, "Out", Variance::ContraVariant);
    let plain = h.class("Plain");
    let not_a_module = h.class("NotAModule");
    h.include(plain, not_a_module);
    resolve(&mut h.gs).unwrap();

    let diagnostics = h.errors.snapshot();
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E4001, ErrorCode::E4005]);
    let mismatch = &diagnostics[1];
    assert_eq!(mismatch.primary_loc(), Some(h.gs.loc_of(sink_out)));
    assert!(mismatch.message.contains("Source"), "{}", mismatch.message);
}

#[test]
fn missing_redeclarations_are_all_reported() {
    let mut h = Hierarchy::new();
    let pair = h.class("Pair");
    h.type_member(pair, "Left", Variance::Invariant);
    h.type_member(pair, "Right", Variance::Invariant);
    h.subclass("Bare", pair);
    resolve(&mut h.gs).unwrap();

    assert_eq!(h.codes(), [ErrorCode::E4002, ErrorCode::E4002]);
}

#[test]
fn cyclic_superclasses_stop_resolution() {
    let mut h = Hierarchy::new();
    let a = h.class("A");
    let b = h.subclass("B", a);
    h.gs.class_data_mut(a).super_class = b;

    let err = resolve(&mut h.gs).unwrap_err();
    assert!(matches!(err, ResolveError::CyclicMixin { .. }), "{err}");
    assert!(h.gs.is_symbol_table_frozen());
}

mod copies {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolving_a_copy_leaves_the_original_alone() {
        let (h, shape, _) = shapes();
        let mut copy = h.gs.deep_copy(false);
        resolve(&mut copy).unwrap();

        assert_eq!(copy.class_data(shape).super_class, Symbols::object());
        assert!(!h.gs.class_data(shape).super_class.exists());
        assert!(!h.gs.class_data(shape).is_linearization_computed());
    }

    #[test]
    fn copies_report_into_the_shared_queue() {
        let mut h = Hierarchy::new();
        let host = h.class("Host");
        let base = h.class("Base");
        h.include(host, base);
        let mut copy = h.gs.deep_copy(false);
        resolve(&mut copy).unwrap();

        assert_eq!(h.codes(), [ErrorCode::E4001]);
    }

    #[test]
    fn a_fresh_copy_matches_counts_and_mixins() {
        let (mut h, _, _) = shapes();
        resolve(&mut h.gs).unwrap();
        let copy = h.gs.deep_copy(false);

        assert_ne!(copy.id(), h.gs.id());
        for kind in SymbolKind::ALL {
            assert_eq!(copy.symbols_used(kind), h.gs.symbols_used(kind), "{kind}");
        }
        for sym in h.gs.class_and_module_refs() {
            assert_eq!(
                copy.class_data(sym).mixins.len(),
                h.gs.class_data(sym).mixins.len(),
                "{}",
                h.gs.show_full_name(sym)
            );
        }
    }

    #[test]
    fn a_resolved_copy_has_the_same_shape() {
        let (mut h, _, _) = shapes();
        resolve(&mut h.gs).unwrap();
        let copy = h.gs.deep_copy(true);

        assert_eq!(copy.id(), h.gs.id());
        assert_eq!(copy.to_string(), h.gs.to_string());
    }
}

#[test]
fn tracing_can_be_initialized_repeatedly() {
    larch_resolver::init_tracing();
    larch_resolver::init_tracing();
}
