#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;
use crate::visitor::{walk_send, Visitor};
use crate::{LiteralValue, Loc, NameTable, SymbolRef};

fn loc(begin: u32, end: u32) -> LocOffsets {
    LocOffsets::new(begin, end)
}

fn sample_send(names: &mut NameTable) -> TreePtr {
    let foo = names.intern_utf8("foo");
    let key = names.intern_utf8("key");
    let mut args = SendArgs::new();
    args.push(mk::int(loc(4, 5), 1));
    args.push(mk::symbol(loc(6, 9), key));
    args.push(mk::true_lit(loc(10, 14)));
    mk::send(loc(0, 15), mk::self_ref(loc(0, 0)), foo, 1, args)
}

#[test]
fn tags_are_recoverable() {
    let mut names = NameTable::new();
    let send = sample_send(&mut names);
    assert_eq!(send.tag(), Some(Tag::Send));
    assert!(send.is_a::<Send>());
    assert!(!send.is_a::<Hash>());
    assert_eq!(send.node_name(), "Send");
    assert_eq!(TreePtr::empty_tree().tag(), Some(Tag::EmptyTree));
    assert_eq!(Tag::EmptyTree as u8, 1);
    assert_eq!(Tag::InsSeq.name(), "InsSeq");
}

#[test]
fn cast_returns_payload_of_matching_variant() {
    let mut tree = mk::int(loc(1, 2), 7);
    assert_eq!(
        tree.cast::<Literal>().map(|l| l.value),
        Some(LiteralValue::Integer(7))
    );
    assert!(tree.cast::<Send>().is_none());
    tree.cast_mut::<Literal>().unwrap().value = LiteralValue::Nil;
    assert_eq!(tree.cast_nonnull::<Literal>().value, LiteralValue::Nil);
}

#[test]
#[should_panic(expected = "cast_nonnull::<Send> on a Literal node")]
fn cast_nonnull_mismatch_panics() {
    let tree = mk::nil(loc(0, 3));
    let _ = tree.cast_nonnull::<Send>();
}

#[test]
fn take_leaves_empty_handle() {
    let mut names = NameTable::new();
    let mut original = sample_send(&mut names);
    let moved = original.take();
    assert!(original.is_none());
    assert_eq!(original.tag(), None);
    assert!(moved.is_a::<Send>());
    // Dropping the emptied handle is a no-op.
    drop(original);
    assert!(moved.is_some());
}

#[test]
fn empty_tree_is_not_none() {
    let empty = TreePtr::empty_tree();
    assert!(empty.is_some());
    assert!(empty.is_empty_tree());
    assert_eq!(empty.loc(), LocOffsets::NONE);
    assert!(TreePtr::none().is_none());
    assert!(!TreePtr::none().is_empty_tree());
}

#[test]
fn deep_copy_is_equal_but_distinct() {
    let mut names = NameTable::new();
    let original = sample_send(&mut names);
    let mut copy = original.deep_copy();
    assert_eq!(copy, original);
    assert!(!std::ptr::eq(
        original.cast::<Send>().unwrap(),
        copy.cast::<Send>().unwrap()
    ));

    copy.cast_mut::<Send>().unwrap().args.clear();
    assert_ne!(copy, original);
    assert_eq!(original.cast::<Send>().unwrap().args.len(), 3);
    drop(copy);
    assert!(original.is_a::<Send>());
}

#[test]
fn deep_copy_of_none_is_none() {
    assert!(TreePtr::none().deep_copy().is_none());
}

#[test]
fn deep_copy_handles_deep_nesting() {
    let mut tree = mk::int(loc(0, 1), 0);
    for _ in 0..10_000 {
        tree = mk::return_expr(loc(0, 1), tree);
    }
    let copy = tree.deep_copy();
    assert_eq!(copy.tag(), Some(Tag::Return));

    // Dismantle iteratively so the test does not depend on recursive drop.
    for mut t in [tree, copy] {
        while let Some(ret) = t.cast_mut::<Return>() {
            let inner = ret.expr.take();
            t = inner;
        }
    }
}

#[test]
fn keyword_argument_layout() {
    let mut names = NameTable::new();
    let send = sample_send(&mut names);
    let send = send.cast_nonnull::<Send>();
    assert_eq!(send.pos_args().len(), 1);
    assert_eq!(send.kw_args_range(), 1..3);
    assert!(send.has_kw_args());
    assert!(!send.has_kw_splat());
    assert!(send.kw_splat().is_none());
    assert!(!send.has_block());

    let mut with_splat = sample_send(&mut names);
    with_splat
        .cast_mut::<Send>()
        .unwrap()
        .args
        .push(mk::hash0(loc(15, 17)));
    let with_splat = with_splat.cast_nonnull::<Send>();
    assert!(with_splat.has_kw_splat());
    assert_eq!(with_splat.kw_args_range(), 1..3);
    assert!(with_splat.kw_splat().unwrap().is_a::<Hash>());
}

#[test]
fn self_reference() {
    assert!(mk::self_ref(loc(0, 4)).is_self_reference());
    assert!(mk::unresolved_ident(loc(0, 4), IdentKind::Local, crate::well_known::SELF)
        .is_self_reference());
    assert!(!mk::unresolved_ident(loc(0, 4), IdentKind::Instance, crate::well_known::SELF)
        .is_self_reference());
    assert!(!mk::nil(loc(0, 3)).is_self_reference());
}

#[test]
fn categories() {
    let mut names = NameTable::new();
    let x = names.intern_utf8("x");
    assert!(mk::local(loc(0, 1), x).is_reference());
    assert!(mk::rest_arg(loc(0, 2), mk::local(loc(1, 2), x)).is_reference());
    let method = mk::method(
        loc(0, 10),
        Loc::NONE,
        x,
        MethodArgs::new(),
        mk::nil(loc(5, 8)),
        MethodDefFlags::empty(),
    );
    assert!(method.is_declaration());
    assert!(!method.is_reference());
}

#[test]
fn ins_seq_without_statements_is_the_expression() {
    let tree = mk::ins_seq(loc(0, 3), Vec::new(), mk::nil(loc(0, 3)));
    assert!(tree.is_a::<Literal>());
}

#[test]
fn show_raw_dump() {
    let names = NameTable::new();
    let tree = mk::if_expr(
        loc(0, 20),
        mk::true_lit(loc(3, 7)),
        mk::int(loc(8, 9), 1),
        mk::empty(),
    );
    assert_eq!(
        tree.show_raw(&names),
        "If{\n  cond = Literal{ true }\n  then = Literal{ 1 }\n  else = EmptyTree\n}"
    );
    assert_eq!(
        mk::self_ref(loc(0, 4)).show_raw(&names),
        "Local{ <U self>$0 }"
    );
    assert_eq!(TreePtr::none().show_raw(&names), "<null>");
}

#[test]
fn visitor_reaches_nested_sends() {
    struct CountSends {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for CountSends {
        fn visit_send(&mut self, send: &'ast Send) {
            self.count += 1;
            walk_send(self, send);
        }
    }

    let mut names = NameTable::new();
    let inner = sample_send(&mut names);
    let bar = names.intern_utf8("bar");
    let outer = mk::send1(loc(0, 30), mk::self_ref(loc(0, 0)), bar, inner);
    let tree = mk::ins_seq(
        loc(0, 40),
        vec![outer],
        mk::array(loc(31, 40), vec![sample_send(&mut names)]),
    );

    let mut counter = CountSends { count: 0 };
    counter.visit_tree(&tree);
    assert_eq!(counter.count, 3);
}

#[test]
fn sanity_check_accepts_well_formed_trees() {
    let mut names = NameTable::new();
    let tree = mk::ins_seq(loc(0, 40), vec![sample_send(&mut names)], mk::empty());
    tree.sanity_check();
}

#[test]
#[should_panic(expected = "hash key and value counts differ")]
fn sanity_check_rejects_ragged_hash() {
    let mut tree = mk::hash0(loc(0, 2));
    tree.cast_mut::<Hash>().unwrap().keys.push(mk::nil(loc(0, 1)));
    tree.sanity_check();
}

mod util_helpers {
    use pretty_assertions::assert_eq;

    use super::super::util::{
        cast_sig, dup_type, extract_hash_value, has_hash_value, has_truthy_hash_value,
        mk_kw_args_hash,
    };
    use super::super::*;
    use super::{loc, sample_send};
    use crate::{well_known, NameTable, SymbolRef};

    fn keyed_hash(names: &mut NameTable) -> TreePtr {
        let a = names.intern_utf8("a");
        let b = names.intern_utf8("b");
        let c = names.intern_utf8("c");
        let mut keys = HashEntries::new();
        let mut values = HashEntries::new();
        keys.push(mk::symbol(loc(0, 2), a));
        values.push(mk::false_lit(loc(3, 8)));
        keys.push(mk::symbol(loc(9, 11), b));
        values.push(mk::local(loc(12, 13), a));
        keys.push(mk::symbol(loc(14, 16), c));
        values.push(mk::int(loc(17, 18), 0));
        mk::hash(loc(0, 20), keys, values)
    }

    #[test]
    fn hash_value_queries() {
        let mut names = NameTable::new();
        let tree = keyed_hash(&mut names);
        let hash = tree.cast_nonnull::<Hash>();
        let a = names.lookup_utf8("a").unwrap();
        let b = names.lookup_utf8("b").unwrap();
        let c = names.lookup_utf8("c").unwrap();
        let missing = names.intern_utf8("missing");

        assert!(has_hash_value(hash, a));
        assert!(!has_hash_value(hash, missing));
        assert!(!has_truthy_hash_value(hash, a));
        assert!(has_truthy_hash_value(hash, b));
        assert!(has_truthy_hash_value(hash, c));
        assert!(!has_truthy_hash_value(hash, missing));
    }

    #[test]
    fn extract_removes_entry() {
        let mut names = NameTable::new();
        let mut tree = keyed_hash(&mut names);
        let b = names.lookup_utf8("b").unwrap();
        let hash = tree.cast_nonnull_mut::<Hash>();
        let (key, value) = extract_hash_value(hash, b).unwrap();
        assert!(key.is_a::<Literal>());
        assert!(value.is_a::<Local>());
        assert_eq!(hash.keys.len(), 2);
        assert_eq!(hash.values.len(), 2);
        assert!(!has_hash_value(hash, b));
        assert!(extract_hash_value(hash, b).is_none());
    }

    #[test]
    fn dup_type_copies_constant_paths() {
        let mut names = NameTable::new();
        let nilable = names.intern_utf8("nilable");
        let t = names.intern_constant_str("T");
        let foo = names.intern_constant_str("Foo");
        let bar = names.intern_constant_str("Bar");
        let path = mk::unresolved_constant(
            loc(10, 18),
            mk::unresolved_constant(loc(10, 13), mk::empty(), foo),
            bar,
        );
        let ty = mk::send1(
            loc(0, 19),
            mk::constant_with_original(
                loc(0, 1),
                SymbolRef::class_or_module(9),
                mk::unresolved_constant(loc(0, 1), mk::empty(), t),
            ),
            nilable,
            path,
        );
        let dup = dup_type(&ty).unwrap();
        assert_eq!(dup, ty);
    }

    #[test]
    fn dup_type_rejects_non_type_shapes() {
        let mut names = NameTable::new();
        assert!(dup_type(&mk::int(loc(0, 1), 3)).is_none());
        // `self.foo(...)` has a non-type receiver.
        assert!(dup_type(&sample_send(&mut names)).is_none());
    }

    #[test]
    fn dup_type_copies_enum_values_verbatim() {
        let mut names = NameTable::new();
        let t = names.intern_constant_str("T");
        let ty = mk::send1(
            loc(0, 10),
            mk::unresolved_constant(loc(0, 1), mk::empty(), t),
            well_known::ENUM,
            mk::array(loc(7, 9), vec![mk::int(loc(7, 8), 1)]),
        );
        assert_eq!(dup_type(&ty).unwrap(), ty);
    }

    #[test]
    fn sig_shapes() {
        let mut names = NameTable::new();
        let t = names.intern_constant_str("Integer");
        let returns = mk::send1(
            loc(6, 20),
            mk::self_ref(loc(6, 6)),
            well_known::RETURNS,
            mk::unresolved_constant(loc(14, 21), mk::empty(), t),
        );
        let checked = mk::send1(
            loc(6, 30),
            returns,
            well_known::CHECKED,
            mk::symbol(loc(26, 30), names.intern_utf8("never")),
        );
        let body = mk::block(loc(4, 32), MethodArgs::new(), checked);
        let sig = mk::send_with_block(
            loc(0, 32),
            mk::self_ref(loc(0, 0)),
            well_known::SIG,
            0,
            SendArgs::new(),
            body,
        );
        assert!(cast_sig(&sig).is_some());

        let no_block = mk::send0(loc(0, 3), mk::self_ref(loc(0, 0)), well_known::SIG);
        assert!(cast_sig(&no_block).is_none());
        assert!(cast_sig(&mk::nil(loc(0, 3))).is_none());
    }

    #[test]
    fn kw_args_hash_collects_pairs() {
        let mut names = NameTable::new();
        let send = sample_send(&mut names);
        let hash = mk_kw_args_hash(send.cast_nonnull::<Send>()).unwrap();
        let hash = hash.cast_nonnull::<Hash>();
        assert_eq!(hash.keys.len(), 1);
        assert!(hash.values[0].is_a::<Literal>());

        let foo = names.intern_utf8("foo");
        let bare = mk::send0(loc(0, 3), mk::self_ref(loc(0, 0)), foo);
        assert!(mk_kw_args_hash(bare.cast_nonnull::<Send>()).is_none());

        let trailing = mk::send1(loc(0, 6), mk::self_ref(loc(0, 0)), foo, mk::hash0(loc(4, 6)));
        // Positional trailing `{}` still yields an explicit empty hash.
        let collected = mk_kw_args_hash(trailing.cast_nonnull::<Send>()).unwrap();
        assert!(collected.cast_nonnull::<Hash>().keys.is_empty());
    }
}

#[test]
fn class_def_carries_symbol() {
    let mut names = NameTable::new();
    let foo = names.intern_constant_str("Foo");
    let sym = SymbolRef::class_or_module(20);
    let tree = mk::class_def(
        loc(0, 20),
        Loc::NONE,
        sym,
        ClassDefKind::Class,
        mk::unresolved_constant(loc(6, 9), mk::empty(), foo),
        vec![mk::constant(loc(12, 18), SymbolRef::class_or_module(5))],
        vec![],
    );
    let class_def = tree.cast_nonnull::<ClassDef>();
    assert_eq!(class_def.symbol, sym);
    assert_eq!(class_def.ancestors.len(), 1);
    tree.sanity_check();
}
