#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::well_known;
use super::*;

#[test]
fn well_known_ids_are_fixed() {
    let table = NameTable::new();
    assert_eq!(table.lookup_utf8("initialize"), Some(well_known::INITIALIZE));
    assert_eq!(table.lookup_utf8("<blk>"), Some(well_known::BLK_ARG));
    assert_eq!(table.lookup_constant_str("Object"), Some(well_known::OBJECT));
    assert_eq!(
        table.lookup_constant_str("<AttachedClass>"),
        Some(well_known::ATTACHED_CLASS)
    );
    assert_eq!(table.len(), well_known::COUNT + 1);
    assert_eq!(well_known::LAST.index(), well_known::COUNT);
    table.sanity_check();
}

#[test]
fn interning_is_idempotent() {
    let mut table = NameTable::new();
    let a = table.intern_utf8("foo");
    let b = table.intern_utf8("foo");
    let c = table.intern_utf8("bar");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.as_str(a), Some("foo"));
    assert_eq!(table.kind(a), NameKind::Utf8);
}

#[test]
fn lookup_does_not_allocate() {
    let table = NameTable::new();
    let before = table.len();
    assert_eq!(table.lookup_utf8("never_seen"), None);
    assert_eq!(table.lookup_constant_str("NeverSeen"), None);
    assert_eq!(table.len(), before);
}

#[test]
fn constant_names_wrap_utf8() {
    let mut table = NameTable::new();
    let raw = table.intern_utf8("Foo");
    let cnst = table.intern_constant(raw);
    assert_ne!(raw, cnst);
    assert_eq!(table.get(cnst), NameView::Constant(raw));
    assert_eq!(table.intern_constant_str("Foo"), cnst);
    assert_eq!(table.show(cnst), "Foo");
    assert_eq!(table.show_raw(cnst), "<C <U Foo>>");
    assert!(table.is_class_name(cnst));
    assert!(!table.is_class_name(raw));
}

#[test]
#[should_panic(expected = "wrong kind of name")]
fn constant_of_constant_panics() {
    let mut table = NameTable::new();
    let cnst = table.intern_constant_str("Foo");
    table.intern_constant(cnst);
}

#[test]
fn unique_names_show_by_kind() {
    let mut table = NameTable::new();
    let foo = table.intern_constant_str("Foo");
    let singleton = table.fresh_unique(UniqueNameKind::Singleton, foo, 1);
    let mangled = table.fresh_unique(UniqueNameKind::MangleRename, foo, 2);
    assert_eq!(table.show(singleton), "<Class:Foo>");
    assert_eq!(table.show(mangled), "Foo$2");
    assert!(table.is_class_name(singleton));
    assert_eq!(
        table.lookup_unique(UniqueNameKind::Singleton, foo, 1),
        Some(singleton)
    );
    assert_eq!(table.lookup_unique(UniqueNameKind::Singleton, foo, 2), None);
    assert_eq!(
        table.as_unique(mangled),
        Some(UniqueName {
            kind: UniqueNameKind::MangleRename,
            original: foo,
            num: 2,
        })
    );
}

#[test]
#[should_panic(expected = "counter must start at 1")]
fn unique_num_zero_panics() {
    let mut table = NameTable::new();
    let foo = table.intern_utf8("foo");
    table.fresh_unique(UniqueNameKind::Namer, foo, 0);
}

#[test]
fn derived_hashes_ignore_text() {
    let mut table = NameTable::new();
    let foo = table.intern_utf8("foo");
    let cnst = table.intern_constant(foo);
    assert_eq!(table.hash_of(cnst), hash_constant(foo));
    let unique = table.fresh_unique(UniqueNameKind::Desugar, foo, 3);
    assert_eq!(
        table.hash_of(unique),
        hash_unique(UniqueNameKind::Desugar, foo, 3)
    );
}

#[test]
fn growth_keeps_ids_stable() {
    let mut table = NameTable::with_capacity(64);
    let start_capacity = table.capacity();
    let ids: Vec<_> = (0..1000)
        .map(|i| table.intern_utf8(&format!("name_{i}")))
        .collect();
    assert!(table.capacity() > start_capacity);
    assert_eq!(table.bucket_count(), table.capacity() * 2);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(table.lookup_utf8(&format!("name_{i}")), Some(*id));
        assert_eq!(table.show(*id), format!("name_{i}"));
    }
    table.sanity_check();
}

#[test]
fn probing_a_full_bucket_array_fails() {
    let taken = Bucket {
        hash: 0,
        name: NameId::from_raw(1),
    };
    let buckets = [taken; 8];
    assert!(matches!(
        NameTable::vacant_bucket(&buckets, 5),
        Err(NameTableError::Full { buckets: 8 })
    ));

    let mut one_free = buckets;
    one_free[3] = Bucket::default();
    assert_eq!(NameTable::vacant_bucket(&one_free, 5).unwrap(), 3);
}

#[test]
fn growth_rehashes_every_live_bucket() {
    let mut table = NameTable::with_capacity(64);
    for i in 0..500 {
        table.intern_utf8(&format!("entry_{i}"));
    }
    let live = table.buckets.iter().filter(|b| b.name.exists()).count();
    assert_eq!(live, table.len() - 1);
}

#[test]
fn reserve_rounds_to_power_of_two() {
    let mut table = NameTable::new();
    table.reserve(3000);
    assert_eq!(table.capacity(), 4096);
    assert_eq!(table.bucket_count(), 8192);
    table.sanity_check();
}

#[test]
fn long_strings_get_their_own_page() {
    let mut table = NameTable::new();
    let small = table.intern_utf8("small");
    let pages = table.page_count();
    let long = "x".repeat(STRINGS_PAGE_SIZE + 10);
    let long_id = table.intern_utf8(&long);
    assert_eq!(table.page_count(), pages + 1);
    let after = table.intern_utf8("after");
    // The open page keeps receiving short strings.
    assert_eq!(table.page_count(), pages + 1);
    assert_eq!(table.as_str(long_id), Some(long.as_str()));
    assert_eq!(table.as_str(small), Some("small"));
    assert_eq!(table.as_str(after), Some("after"));
}

#[test]
fn pages_roll_over_when_full() {
    let mut table = NameTable::new();
    let chunk = "y".repeat(STRINGS_PAGE_SIZE / 2);
    let pages = table.page_count();
    let ids: Vec<_> = (0..4)
        .map(|i| table.intern_utf8(&format!("{chunk}{i}")))
        .collect();
    assert!(table.page_count() > pages);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(table.show(*id), format!("{chunk}{i}"));
    }
}

#[test]
fn frozen_table_rejects_new_names() {
    let mut table = NameTable::new();
    let foo = table.intern_utf8("foo");
    assert!(!table.freeze());
    assert!(table.is_frozen());
    assert_eq!(table.try_intern_utf8("foo"), Ok(foo));
    assert_eq!(table.try_intern_utf8("bar"), Err(NameTableError::Frozen));
    assert!(table.unfreeze());
    assert!(table.try_intern_utf8("bar").is_ok());
}

#[test]
#[should_panic(expected = "frozen")]
fn frozen_intern_panics() {
    let mut table = NameTable::new();
    table.freeze();
    table.intern_utf8("brand_new");
}

#[test]
fn clones_are_independent() {
    let mut table = NameTable::new();
    let foo = table.intern_utf8("foo");
    let mut copy = table.clone();
    let bar = copy.intern_utf8("bar");
    assert_eq!(copy.lookup_utf8("foo"), Some(foo));
    assert_eq!(table.lookup_utf8("bar"), None);
    assert_eq!(copy.show(bar), "bar");
}

#[test]
fn error_messages() {
    assert_eq!(
        NameTableError::Frozen.to_string(),
        "cannot enter a new name: name table is frozen"
    );
    assert!(NameTableError::Full { buckets: 8 }
        .to_string()
        .contains("8 buckets"));
}

// === Property tests ===

mod proptest_interning {
    use super::super::NameTable;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn intern_then_lookup(words in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,12}", 0..200)) {
            let mut table = NameTable::new();
            let ids: Vec<_> = words.iter().map(|w| table.intern_utf8(w)).collect();
            for (word, id) in words.iter().zip(&ids) {
                prop_assert_eq!(table.lookup_utf8(word), Some(*id));
                prop_assert_eq!(table.show(*id), word.clone());
            }
            table.sanity_check();
        }

        #[test]
        fn equal_text_equal_id(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
            let mut table = NameTable::new();
            let ia = table.intern_utf8(&a);
            let ib = table.intern_utf8(&b);
            prop_assert_eq!(ia == ib, a == b);
        }
    }
}
