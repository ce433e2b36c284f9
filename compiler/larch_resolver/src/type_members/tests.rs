#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use larch_diagnostic::ErrorCode;

use super::*;
use crate::finalize_ancestors;
use crate::test_helpers::Program;

fn finalized(p: &mut Program) -> TypeAliases {
    finalize_ancestors(&mut p.gs);
    finalize_symbols(&mut p.gs).unwrap()
}

fn member(p: &Program, owner: SymbolRef, name: &str) -> SymbolRef {
    let name = p.gs.names().lookup_constant_str(name).unwrap();
    p.gs.find_member(owner, name)
}

mod aliasing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn redeclared_member_is_aliased() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        let box_elem = p.type_member(boxed, "Elem", Variance::Invariant);
        let child = p.class("Child");
        p.inherit(child, boxed);
        let child_elem = p.type_member(child, "Elem", Variance::Invariant);
        let aliases = finalized(&mut p);

        assert!(p.codes().is_empty(), "{:?}", p.codes());
        assert_eq!(aliases.edges(child), [(box_elem, child_elem)]);
        assert_eq!(dealias_at(&p.gs, box_elem, child, &aliases), child_elem);
        assert_eq!(dealias_at(&p.gs, box_elem, boxed, &aliases), box_elem);
    }

    #[test]
    fn dealiasing_chains_through_generations() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        let box_elem = p.type_member(boxed, "Elem", Variance::Invariant);
        let child = p.class("Child");
        p.inherit(child, boxed);
        p.type_member(child, "Elem", Variance::Invariant);
        let grandchild = p.class("Grandchild");
        p.inherit(grandchild, child);
        let grandchild_elem = p.type_member(grandchild, "Elem", Variance::Invariant);
        let aliases = finalized(&mut p);

        assert_eq!(dealias_at(&p.gs, box_elem, grandchild, &aliases), grandchild_elem);
    }

    #[test]
    fn unrelated_classes_have_no_alias() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        let box_elem = p.type_member(boxed, "Elem", Variance::Invariant);
        let stranger = p.class("Stranger");
        let aliases = finalized(&mut p);

        assert_eq!(dealias_at(&p.gs, box_elem, stranger, &aliases), SymbolRef::NONE);
    }

    #[test]
    fn invariant_redeclaration_of_a_variant_member_is_allowed() {
        let mut p = Program::new();
        let producer = p.module("Producer");
        let out = p.type_member(producer, "Out", Variance::CoVariant);
        let reader = p.module("Reader");
        p.include(reader, producer);
        let reader_out = p.type_member(reader, "Out", Variance::Invariant);
        let aliases = finalized(&mut p);

        assert!(p.codes().is_empty(), "{:?}", p.codes());
        assert_eq!(dealias_at(&p.gs, out, reader, &aliases), reader_out);
    }
}

mod diagnostics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_redeclaration_installs_a_placeholder() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        p.type_member(boxed, "Elem", Variance::Invariant);
        let child = p.class("Child");
        p.inherit(child, boxed);
        finalized(&mut p);

        assert_eq!(p.codes(), [ErrorCode::E4002]);
        let placeholder = member(&p, child, "Elem");
        assert!(placeholder.is_type_member());
        let param = p.gs.type_param(placeholder);
        assert!(param.fixed);
        assert_eq!(param.variance, Variance::Invariant);
        let bounds = param.result_type.as_ref().and_then(Type::as_lambda_param).unwrap();
        assert_eq!((&bounds.lower, &bounds.upper), (&Type::Untyped, &Type::Untyped));
    }

    #[test]
    fn enumerable_element_type_has_its_own_code() {
        let mut p = Program::new();
        p.type_member(Symbols::enumerable(), "Elem", Variance::CoVariant);
        let list = p.class("List");
        p.include(list, Symbols::enumerable());
        finalized(&mut p);

        assert_eq!(p.codes(), [ErrorCode::E4003]);
    }

    #[test]
    fn non_type_member_with_the_same_name() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        p.type_member(boxed, "Elem", Variance::Invariant);
        let child = p.class("Child");
        p.inherit(child, boxed);
        let name = p.gs.enter_name_constant("Elem");
        let loc = p.loc();
        let constant = p.gs.enter_static_field_symbol(loc, child, name);
        finalized(&mut p);

        assert_eq!(p.codes(), [ErrorCode::E4004]);
        assert_eq!(member(&p, child, "Elem"), constant);
        let synthesized = p
            .gs
            .names()
            .lookup_unique(UniqueNameKind::TypeVarName, name, 1)
            .unwrap();
        assert!(p.gs.find_member(child, synthesized).is_type_member());
    }

    #[test]
    fn variance_mismatch_leaves_member_invariant_and_unaliased() {
        let mut p = Program::new();
        let producer = p.module("Producer");
        let out = p.type_member(producer, "Out", Variance::CoVariant);
        let consumer = p.module("Consumer");
        p.include(consumer, producer);
        let consumer_out = p.type_member(consumer, "Out", Variance::ContraVariant);
        let aliases = finalized(&mut p);

        assert_eq!(p.codes(), [ErrorCode::E4005]);
        assert_eq!(p.gs.type_param(consumer_out).variance, Variance::Invariant);
        assert_eq!(dealias_at(&p.gs, out, consumer, &aliases), SymbolRef::NONE);
    }

    #[test]
    fn members_are_reordered_to_match_the_parent() {
        let mut p = Program::new();
        let pair = p.class("Pair");
        p.type_member(pair, "X", Variance::Invariant);
        p.type_member(pair, "Y", Variance::Invariant);
        let swapped = p.class("Swapped");
        p.inherit(swapped, pair);
        let y = p.type_member(swapped, "Y", Variance::Invariant);
        let x = p.type_member(swapped, "X", Variance::Invariant);
        finalized(&mut p);

        assert_eq!(p.codes(), [ErrorCode::E4006]);
        assert_eq!(p.gs.class_data(swapped).type_members, [x, y]);
    }

    #[test]
    fn classes_reject_variant_members() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        p.type_member(boxed, "Elem", Variance::CoVariant);
        finalized(&mut p);

        assert_eq!(p.codes(), [ErrorCode::E4007]);
    }

    #[test]
    fn payload_classes_may_have_variant_members() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        p.type_member(boxed, "Elem", Variance::CoVariant);
        p.gs.mark_as_payload();
        finalized(&mut p);

        assert!(p.codes().is_empty(), "{:?}", p.codes());
    }

    #[test]
    fn modules_may_have_variant_members() {
        let mut p = Program::new();
        let producer = p.module("Producer");
        p.type_member(producer, "Out", Variance::CoVariant);
        finalized(&mut p);

        assert!(p.codes().is_empty(), "{:?}", p.codes());
    }
}

mod rerun {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn placeholder_order_survives_a_second_pass() {
        let mut p = Program::new();
        let pair = p.class("Pair");
        p.type_member(pair, "Left", Variance::Invariant);
        p.type_member(pair, "Right", Variance::Invariant);
        let bare = p.class("Bare");
        p.inherit(bare, pair);
        p.type_member(bare, "Right", Variance::Invariant);
        finalized(&mut p);
        let order = p.gs.class_data(bare).type_members.clone();

        finalized(&mut p);
        assert_eq!(p.codes(), [ErrorCode::E4002]);
        assert_eq!(p.gs.class_data(bare).type_members, order);
        assert!(p.gs.class_data(bare).is_type_members_resolved());
    }

    #[test]
    fn rejected_variance_stays_unaliased() {
        let mut p = Program::new();
        let source = p.module("Source");
        let out = p.type_member(source, "Out", Variance::CoVariant);
        let sink = p.module("Sink");
        p.include(sink, source);
        p.type_member(sink, "Out", Variance::ContraVariant);
        finalized(&mut p);

        let aliases = finalized(&mut p);
        assert_eq!(p.codes(), [ErrorCode::E4005]);
        assert_eq!(dealias_at(&p.gs, out, sink, &aliases), SymbolRef::NONE);
    }

    #[test]
    fn accepted_edges_are_returned_again() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        let box_elem = p.type_member(boxed, "Elem", Variance::Invariant);
        let child = p.class("Child");
        p.inherit(child, boxed);
        let child_elem = p.type_member(child, "Elem", Variance::Invariant);
        let first = finalized(&mut p);

        let second = finalized(&mut p);
        assert_eq!(second.len(), first.len());
        assert_eq!(second.edges(child), [(box_elem, child_elem)]);
        assert_eq!(p.gs.class_data(child).type_aliases.as_slice(), [(box_elem, child_elem)]);
    }
}

mod attached_class {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bounds(p: &Program, klass: SymbolRef) -> (Type, Type) {
        let singleton = p.gs.lookup_singleton_class(klass);
        let attached = p.gs.find_member(singleton, well_known::ATTACHED_CLASS);
        let bounds = p
            .gs
            .type_param(attached)
            .result_type
            .as_ref()
            .and_then(Type::as_lambda_param)
            .unwrap();
        (bounds.lower.clone(), bounds.upper.clone())
    }

    #[test]
    fn plain_class_bounds_its_attached_class() {
        let mut p = Program::new();
        let foo = p.class("Foo");
        p.gs.singleton_class(foo);
        finalized(&mut p);

        assert_eq!(bounds(&p, foo), (Type::Bottom, Type::Class(foo)));
    }

    #[test]
    fn generic_class_keeps_placeholder_bounds() {
        let mut p = Program::new();
        let boxed = p.class("Box");
        p.type_member(boxed, "Elem", Variance::Invariant);
        p.gs.singleton_class(boxed);
        finalized(&mut p);

        let todo = Type::Class(Symbols::todo());
        assert_eq!(bounds(&p, boxed), (todo.clone(), todo));
    }
}
