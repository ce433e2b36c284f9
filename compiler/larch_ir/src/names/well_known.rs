//! Names every table starts with, at fixed ids.
//!
//! Registration order is the id order; [`register`] checks each id as it
//! goes, so a reordering here is caught the first time a table is built.

use super::NameTable;
use crate::NameId;

macro_rules! well_known_names {
    (
        utf8 { $($u_const:ident = $u_id:literal => $u_text:literal,)* }
        raw { $($r_const:ident = $r_id:literal => $r_text:literal,)* }
        constants { $($c_const:ident = $c_id:literal => $c_raw:ident,)* }
    ) => {
        $(pub const $u_const: NameId = NameId::from_raw($u_id);)*
        $(pub const $r_const: NameId = NameId::from_raw($r_id);)*
        $(pub const $c_const: NameId = NameId::from_raw($c_id);)*

        /// Number of well-known names, not counting the reserved slot.
        pub const COUNT: usize = [$($u_id,)* $($r_id,)* $($c_id,)*].len();

        pub(super) fn register(table: &mut NameTable) {
            $(
                let id = table.intern_utf8($u_text);
                assert_eq!(id, $u_const, "well-known name {:?} registered out of order", $u_text);
            )*
            $(
                let id = table.intern_utf8($r_text);
                assert_eq!(id, $r_const, "well-known name {:?} registered out of order", $r_text);
            )*
            $(
                let id = table.intern_constant($c_raw);
                assert_eq!(id, $c_const, "well-known constant {:?} registered out of order", $c_raw);
            )*
        }
    };
}

well_known_names! {
    utf8 {
        INITIALIZE = 1 => "initialize",
        SELF = 2 => "self",
        BLK_ARG = 3 => "<blk>",
        CLASS_METHODS = 4 => "<mixes-in-class-methods>",
        SIG = 5 => "sig",
        RETURNS = 6 => "returns",
        VOID = 7 => "void",
        CHECKED = 8 => "checked",
        ON_FAILURE = 9 => "on_failure",
        PARAMS = 10 => "params",
        ENUM = 11 => "enum",
    }
    raw {
        NO_SYMBOL_RAW = 12 => "<none>",
        TOP_RAW = 13 => "<any>",
        BOTTOM_RAW = 14 => "<impossible>",
        ROOT_RAW = 15 => "<root>",
        TODO_RAW = 16 => "<todo sym>",
        OBJECT_RAW = 17 => "Object",
        BASIC_OBJECT_RAW = 18 => "BasicObject",
        CLASS_RAW = 19 => "Class",
        MODULE_RAW = 20 => "Module",
        KERNEL_RAW = 21 => "Kernel",
        UNTYPED_RAW = 22 => "<untyped>",
        ENUMERABLE_RAW = 23 => "Enumerable",
        IMPLICIT_MODULE_SUPERCLASS_RAW = 24 => "ImplicitModuleSuperClass",
        STUB_MODULE_RAW = 25 => "StubModule",
        STUB_SUPERCLASS_RAW = 26 => "StubSuperClass",
        ATTACHED_CLASS_RAW = 27 => "<AttachedClass>",
    }
    constants {
        NO_SYMBOL = 28 => NO_SYMBOL_RAW,
        TOP = 29 => TOP_RAW,
        BOTTOM = 30 => BOTTOM_RAW,
        ROOT = 31 => ROOT_RAW,
        TODO = 32 => TODO_RAW,
        OBJECT = 33 => OBJECT_RAW,
        BASIC_OBJECT = 34 => BASIC_OBJECT_RAW,
        CLASS = 35 => CLASS_RAW,
        MODULE = 36 => MODULE_RAW,
        KERNEL = 37 => KERNEL_RAW,
        UNTYPED = 38 => UNTYPED_RAW,
        ENUMERABLE = 39 => ENUMERABLE_RAW,
        IMPLICIT_MODULE_SUPERCLASS = 40 => IMPLICIT_MODULE_SUPERCLASS_RAW,
        STUB_MODULE = 41 => STUB_MODULE_RAW,
        STUB_SUPERCLASS = 42 => STUB_SUPERCLASS_RAW,
        ATTACHED_CLASS = 43 => ATTACHED_CLASS_RAW,
    }
}

/// Last well-known id.
pub const LAST: NameId = ATTACHED_CLASS;
