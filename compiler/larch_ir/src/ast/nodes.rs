//! Payload types, one per tree variant.
//!
//! Every payload carries its `loc`. Children are [`TreePtr`]s owned by the
//! payload; variable-length child lists are inline `SmallVec`s sized for
//! the common case.

use bitflags::bitflags;
use smallvec::SmallVec;

use super::TreePtr;
use crate::{LiteralValue, Loc, LocOffsets, NameId, SymbolRef, Type};

/// Canonical "no expression". Carries nothing and never allocates.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct EmptyTree;

// Definitions

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassDefKind {
    Module,
    Class,
}

pub type ClassRhs = SmallVec<[TreePtr; 4]>;
pub type Ancestors = SmallVec<[TreePtr; 2]>;
pub type MethodArgs = SmallVec<[TreePtr; 4]>;

#[derive(Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub loc: LocOffsets,
    pub decl_loc: Loc,
    pub symbol: SymbolRef,
    pub kind: ClassDefKind,
    pub rhs: ClassRhs,
    /// Unresolved constant naming the class, then its `ConstantLit`.
    pub name: TreePtr,
    pub ancestors: Ancestors,
    pub singleton_ancestors: Ancestors,
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodDefFlags: u8 {
        /// `def self.foo`
        const SELF_METHOD = 1 << 0;
        const REWRITER_SYNTHESIZED = 1 << 1;
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub loc: LocOffsets,
    pub decl_loc: Loc,
    pub symbol: SymbolRef,
    pub name: NameId,
    pub args: MethodArgs,
    pub rhs: TreePtr,
    pub flags: MethodDefFlags,
}

// Control flow

#[derive(Debug, PartialEq, Eq)]
pub struct If {
    pub loc: LocOffsets,
    pub cond: TreePtr,
    pub then_branch: TreePtr,
    pub else_branch: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct While {
    pub loc: LocOffsets,
    pub cond: TreePtr,
    pub body: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Break {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Retry {
    pub loc: LocOffsets,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Next {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Return {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RescueCase {
    pub loc: LocOffsets,
    pub exceptions: SmallVec<[TreePtr; 2]>,
    /// The variable the exception is bound to.
    pub var: TreePtr,
    pub body: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Rescue {
    pub loc: LocOffsets,
    pub body: TreePtr,
    /// Each entry is a `RescueCase`.
    pub rescue_cases: SmallVec<[TreePtr; 2]>,
    pub else_branch: TreePtr,
    pub ensure: TreePtr,
}

// References

/// A local variable: source name plus a disambiguating counter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct LocalVariable {
    pub name: NameId,
    pub unique: u32,
}

impl LocalVariable {
    pub const fn new(name: NameId, unique: u32) -> Self {
        LocalVariable { name, unique }
    }

    pub const fn exists(self) -> bool {
        self.name.exists()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Local {
    pub loc: LocOffsets,
    pub local_variable: LocalVariable,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IdentKind {
    Local,
    Instance,
    Class,
    Global,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnresolvedIdent {
    pub loc: LocOffsets,
    pub kind: IdentKind,
    pub name: NameId,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RestArg {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct KeywordArg {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct OptionalArg {
    pub loc: LocOffsets,
    pub expr: TreePtr,
    pub default: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BlockArg {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ShadowArg {
    pub loc: LocOffsets,
    pub expr: TreePtr,
}

// Instructions

#[derive(Debug, PartialEq, Eq)]
pub struct Assign {
    pub loc: LocOffsets,
    pub lhs: TreePtr,
    pub rhs: TreePtr,
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SendFlags: u8 {
        /// Call may target a private method.
        const PRIVATE_OK = 1 << 0;
        const REWRITER_SYNTHESIZED = 1 << 1;
    }
}

pub type SendArgs = SmallVec<[TreePtr; 2]>;

/// A method call.
///
/// `args` holds the positional arguments, then keyword arguments as
/// alternating key/value entries, then an optional trailing keyword splat.
#[derive(Debug, PartialEq, Eq)]
pub struct Send {
    pub loc: LocOffsets,
    pub fun: NameId,
    pub flags: SendFlags,
    pub num_pos_args: u16,
    pub recv: TreePtr,
    pub args: SendArgs,
    /// A `Block`, or none when no block was passed.
    pub block: TreePtr,
}

impl Send {
    pub fn pos_args(&self) -> &[TreePtr] {
        &self.args[..usize::from(self.num_pos_args)]
    }

    fn num_trailing(&self) -> usize {
        self.args.len() - usize::from(self.num_pos_args)
    }

    /// Range of `args` holding keyword key/value pairs, splat excluded.
    pub fn kw_args_range(&self) -> std::ops::Range<usize> {
        let start = usize::from(self.num_pos_args);
        let mut end = self.args.len();
        if self.has_kw_splat() {
            end -= 1;
        }
        start..end
    }

    pub fn has_kw_args(&self) -> bool {
        self.num_trailing() & !1 != 0
    }

    pub fn has_kw_splat(&self) -> bool {
        self.num_trailing() & 1 != 0
    }

    pub fn kw_splat(&self) -> Option<&TreePtr> {
        if self.has_kw_splat() {
            self.args.last()
        } else {
            None
        }
    }

    pub fn has_block(&self) -> bool {
        self.block.is_some()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Cast {
    pub loc: LocOffsets,
    /// `let`, `cast`, `must` and friends.
    pub cast: NameId,
    pub ty: Type,
    pub arg: TreePtr,
    pub type_expr: TreePtr,
}

pub type HashEntries = SmallVec<[TreePtr; 4]>;

/// Hash literal. `keys` and `values` are parallel.
#[derive(Debug, PartialEq, Eq)]
pub struct Hash {
    pub loc: LocOffsets,
    pub keys: HashEntries,
    pub values: HashEntries,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Array {
    pub loc: LocOffsets,
    pub elems: SmallVec<[TreePtr; 4]>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Literal {
    pub loc: LocOffsets,
    pub value: LiteralValue,
}

impl Literal {
    pub fn as_symbol(&self) -> Option<NameId> {
        match self.value {
            LiteralValue::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<NameId> {
        match self.value {
            LiteralValue::String(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnresolvedConstantLit {
    pub loc: LocOffsets,
    pub cnst: NameId,
    /// Enclosing scope, or `EmptyTree` for a bare constant.
    pub scope: TreePtr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ConstantLit {
    pub loc: LocOffsets,
    pub symbol: SymbolRef,
    /// Scopes tried when the constant failed to resolve.
    pub resolution_scopes: SmallVec<[SymbolRef; 1]>,
    /// The `UnresolvedConstantLit` this came from, if any.
    pub original: TreePtr,
}

/// Marker for the implicit arguments of a bare `super`.
#[derive(Debug, PartialEq, Eq)]
pub struct ZSuperArgs {
    pub loc: LocOffsets,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Block {
    pub loc: LocOffsets,
    pub args: MethodArgs,
    pub body: TreePtr,
}

/// A sequence of statements followed by the value-producing expression.
#[derive(Debug, PartialEq, Eq)]
pub struct InsSeq {
    pub loc: LocOffsets,
    pub stats: SmallVec<[TreePtr; 4]>,
    pub expr: TreePtr,
}
