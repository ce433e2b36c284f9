//! Interned name handles.

use std::fmt;

/// Handle into a [`NameTable`](crate::NameTable).
///
/// Equal content always interns to the same id, so comparing names is a
/// 32-bit integer compare. Id 0 is the reserved "no name" slot.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NameId(u32);

impl NameId {
    /// The reserved "no name" id.
    pub const NONE: NameId = NameId(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NameId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn exists(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({})", self.0)
    }
}

/// The three shapes a name can take.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum NameKind {
    /// An interned UTF-8 string.
    Utf8 = 1,
    /// Wraps another name; marks it as naming a class, module or constant.
    Constant = 2,
    /// A synthesized name: original + disambiguation tag + counter.
    Unique = 3,
}

/// Why a unique name was synthesized.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum UniqueNameKind {
    Parser = 1,
    Desugar = 2,
    Namer = 3,
    /// Displaced by an incompatible redefinition.
    MangleRename = 4,
    /// Name of a singleton class.
    Singleton = 5,
    Overload = 6,
    /// Fallback for a member that should have been a type variable.
    TypeVarName = 7,
    ResolverMissingClass = 8,
}

/// Fields of a unique name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct UniqueName {
    pub kind: UniqueNameKind,
    pub original: NameId,
    pub num: u32,
}
