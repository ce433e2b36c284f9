//! Symbol handles.
//!
//! A [`SymbolRef`] names one slot in one of the five symbol stores. The
//! store is picked by [`SymbolKind`]; the index is stable for the lifetime of
//! the owning state and never reused. Index 0 of every store is reserved, so
//! `exists()` is a plain compare.

use std::fmt;

/// Which store a symbol lives in.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SymbolKind {
    ClassOrModule = 0,
    Method = 1,
    Field = 2,
    TypeArgument = 3,
    TypeMember = 4,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 5] = [
        SymbolKind::ClassOrModule,
        SymbolKind::Method,
        SymbolKind::Field,
        SymbolKind::TypeArgument,
        SymbolKind::TypeMember,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SymbolKind::ClassOrModule => "ClassOrModule",
            SymbolKind::Method => "Method",
            SymbolKind::Field => "Field",
            SymbolKind::TypeArgument => "TypeArgument",
            SymbolKind::TypeMember => "TypeMember",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a symbol: `(kind, index)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolRef {
    kind: SymbolKind,
    index: u32,
}

impl SymbolRef {
    /// The reserved "no symbol" handle.
    pub const NONE: SymbolRef = SymbolRef::class_or_module(0);

    #[inline]
    pub const fn new(kind: SymbolKind, index: u32) -> Self {
        SymbolRef { kind, index }
    }

    #[inline]
    pub const fn class_or_module(index: u32) -> Self {
        Self::new(SymbolKind::ClassOrModule, index)
    }

    #[inline]
    pub const fn method(index: u32) -> Self {
        Self::new(SymbolKind::Method, index)
    }

    #[inline]
    pub const fn field(index: u32) -> Self {
        Self::new(SymbolKind::Field, index)
    }

    #[inline]
    pub const fn type_argument(index: u32) -> Self {
        Self::new(SymbolKind::TypeArgument, index)
    }

    #[inline]
    pub const fn type_member(index: u32) -> Self {
        Self::new(SymbolKind::TypeMember, index)
    }

    #[inline]
    pub const fn kind(self) -> SymbolKind {
        self.kind
    }

    /// Raw index into the kind's store.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn exists(self) -> bool {
        self.index != 0
    }

    #[inline]
    pub const fn is_class_or_module(self) -> bool {
        matches!(self.kind, SymbolKind::ClassOrModule)
    }

    #[inline]
    pub const fn is_method(self) -> bool {
        matches!(self.kind, SymbolKind::Method)
    }

    #[inline]
    pub const fn is_field(self) -> bool {
        matches!(self.kind, SymbolKind::Field)
    }

    #[inline]
    pub const fn is_type_member(self) -> bool {
        matches!(self.kind, SymbolKind::TypeMember)
    }

    #[inline]
    pub const fn is_type_argument(self) -> bool {
        matches!(self.kind, SymbolKind::TypeArgument)
    }

    /// Type members and type arguments.
    #[inline]
    pub const fn is_type_parameter(self) -> bool {
        self.is_type_member() || self.is_type_argument()
    }
}

impl Default for SymbolRef {
    fn default() -> Self {
        SymbolRef::NONE
    }
}

impl fmt::Debug for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists() {
            write!(f, "{}({})", self.kind, self.index)
        } else {
            write!(f, "SymbolRef(none)")
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::SymbolRef;
    crate::static_assert_size!(SymbolRef, 8);
}
