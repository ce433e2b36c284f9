//! Per-kind symbol records.
//!
//! Every store holds one record type. The shared header ([`SymbolHeader`])
//! carries what all symbols have; everything else is specific to the kind.
//! Flag sets only hold attributes that are orthogonal booleans; the kind of
//! a symbol is fixed by the store it lives in.

use std::collections::BTreeMap;

use bitflags::bitflags;
use larch_ir::{Loc, NameId, SymbolRef, Type, Variance};
use smallvec::SmallVec;

/// Member map of a class, module or method, ordered by name id.
pub type Members = BTreeMap<NameId, SymbolRef>;

/// Mixins of a class or module. Before linearization these are the declared
/// mixins in declaration order; afterwards the linearized list.
pub type Mixins = SmallVec<[SymbolRef; 4]>;

/// Fields every symbol has.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolHeader {
    pub name: NameId,
    /// Lexical parent.
    pub owner: SymbolRef,
    /// Declaration sites; the first is the canonical location.
    pub locs: SmallVec<[Loc; 2]>,
}

impl SymbolHeader {
    pub(crate) fn new(name: NameId, owner: SymbolRef) -> Self {
        SymbolHeader {
            name,
            owner,
            locs: SmallVec::new(),
        }
    }

    /// Canonical location, or `Loc::NONE` for synthesized symbols.
    pub fn loc(&self) -> Loc {
        self.locs.first().copied().unwrap_or(Loc::NONE)
    }

    /// Record another declaration site. Missing and repeated locations are
    /// ignored.
    pub fn add_loc(&mut self, loc: Loc) {
        if loc.exists() && !self.locs.contains(&loc) {
            self.locs.push(loc);
        }
    }
}

bitflags! {
    /// Orthogonal attributes of a class or module.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ClassFlags: u16 {
        /// Declared (or defaulted) as a class.
        const CLASS = 1 << 0;
        /// Declared (or defaulted) as a module.
        const MODULE = 1 << 1;
        /// `mixins` holds the linearized list.
        const LINEARIZATION_COMPUTED = 1 << 2;
        const ABSTRACT = 1 << 3;
        const INTERFACE = 1 << 4;
        const FINAL = 1 << 5;
        const SEALED = 1 << 6;
        const PRIVATE = 1 << 7;
        /// Type members checked against every ancestor; `type_aliases` is final.
        const TYPE_MEMBERS_RESOLVED = 1 << 8;
    }
}

bitflags! {
    /// Orthogonal attributes of a method.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u16 {
        const PROTECTED = 1 << 0;
        const PRIVATE = 1 << 1;
        const OVERLOADED = 1 << 2;
        const ABSTRACT = 1 << 3;
        const GENERIC = 1 << 4;
        const OVERRIDABLE = 1 << 5;
        const FINAL = 1 << 6;
        const OVERRIDE = 1 << 7;
        const INCOMPATIBLE_OVERRIDE = 1 << 8;
        /// Entered by a rewriting pass rather than by source.
        const REWRITER_SYNTHESIZED = 1 << 9;
    }
}

bitflags! {
    /// Shape of a method argument.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ArgFlags: u8 {
        const KEYWORD = 1 << 0;
        const REPEATED = 1 << 1;
        const DEFAULT = 1 << 2;
        const SHADOW = 1 << 3;
        const BLOCK = 1 << 4;
    }
}

/// A class or module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassOrModule {
    pub header: SymbolHeader,
    pub members: Members,
    pub mixins: Mixins,
    /// `SymbolRef::NONE` until set by the namer or by ancestor finalization.
    pub super_class: SymbolRef,
    /// Declared type members, in positional order.
    pub type_members: Vec<SymbolRef>,
    /// `(ancestor member, own member)` pairs accepted by type member
    /// resolution.
    pub type_aliases: SmallVec<[(SymbolRef, SymbolRef); 2]>,
    /// The `<Class:X>` symbol for this class, once created.
    pub singleton: SymbolRef,
    /// For a singleton class, the class it is attached to.
    pub attached: SymbolRef,
    pub flags: ClassFlags,
    pub result_type: Option<Type>,
}

impl ClassOrModule {
    pub(crate) fn new(name: NameId, owner: SymbolRef) -> Self {
        ClassOrModule {
            header: SymbolHeader::new(name, owner),
            ..ClassOrModule::default()
        }
    }

    /// True once a class-vs-module decision has been made.
    pub fn is_class_module_set(&self) -> bool {
        self.flags.intersects(ClassFlags::CLASS | ClassFlags::MODULE)
    }

    pub fn is_class(&self) -> bool {
        self.flags.contains(ClassFlags::CLASS)
    }

    pub fn is_module(&self) -> bool {
        self.flags.contains(ClassFlags::MODULE)
    }

    pub fn set_is_module(&mut self, is_module: bool) {
        self.flags.remove(ClassFlags::CLASS | ClassFlags::MODULE);
        self.flags.insert(if is_module {
            ClassFlags::MODULE
        } else {
            ClassFlags::CLASS
        });
    }

    pub fn is_singleton_class(&self) -> bool {
        self.attached.exists()
    }

    pub fn is_linearization_computed(&self) -> bool {
        self.flags.contains(ClassFlags::LINEARIZATION_COMPUTED)
    }

    pub fn is_type_members_resolved(&self) -> bool {
        self.flags.contains(ClassFlags::TYPE_MEMBERS_RESOLVED)
    }

    /// Append a mixin unless it is already listed.
    pub fn add_mixin(&mut self, mixin: SymbolRef) -> bool {
        if self.mixins.contains(&mixin) {
            return false;
        }
        self.mixins.push(mixin);
        true
    }
}

/// A declared method argument.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgInfo {
    pub name: NameId,
    pub loc: Loc,
    pub flags: ArgFlags,
    pub result_type: Option<Type>,
}

impl ArgInfo {
    pub fn is_block(&self) -> bool {
        self.flags.contains(ArgFlags::BLOCK)
    }

    pub fn is_keyword(&self) -> bool {
        self.flags.contains(ArgFlags::KEYWORD)
    }
}

/// A method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Method {
    pub header: SymbolHeader,
    pub arguments: Vec<ArgInfo>,
    pub type_arguments: Vec<SymbolRef>,
    /// Holds the method's type arguments by name.
    pub members: Members,
    pub flags: MethodFlags,
    pub result_type: Option<Type>,
}

impl Method {
    pub(crate) fn new(name: NameId, owner: SymbolRef) -> Self {
        Method {
            header: SymbolHeader::new(name, owner),
            ..Method::default()
        }
    }
}

/// An instance or static field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    pub header: SymbolHeader,
    pub is_static: bool,
    pub result_type: Option<Type>,
}

/// A type member (owned by a class) or type argument (owned by a method).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeParam {
    pub header: SymbolHeader,
    pub variance: Variance,
    /// Bound to a single type rather than a range.
    pub fixed: bool,
    /// Bounds, as a `Type::LambdaParam`, once known.
    pub result_type: Option<Type>,
}

impl TypeParam {
    pub(crate) fn new(name: NameId, owner: SymbolRef, variance: Variance) -> Self {
        TypeParam {
            header: SymbolHeader::new(name, owner),
            variance,
            ..TypeParam::default()
        }
    }
}
