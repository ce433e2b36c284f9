//! Larch IR - names, handles and trees
//!
//! This crate contains the core data structures shared by every pass:
//! - Locations and file handles
//! - The name table and interned [`NameId`]s
//! - [`SymbolRef`] handles into the symbol stores
//! - The small type language stored on symbols
//! - The expression tree ([`ast::TreePtr`]) and its visitor
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings become `NameId(u32)`, symbols `SymbolRef`
//! - **Exclusive Ownership**: every tree node has one owner; copies are explicit
//! - **Stable Handles**: ids are never reused or compacted
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod name;
pub mod names;
mod span;
mod symbol_ref;
mod types;
pub mod visitor;

pub use ast::TreePtr;
pub use name::{NameId, NameKind, UniqueName, UniqueNameKind};
pub use names::{well_known, NameTable, NameTableError, NameView};
pub use span::{FileRef, Loc, LocError, LocOffsets};
pub use symbol_ref::{SymbolKind, SymbolRef};
pub use types::{LambdaParam, LiteralValue, Type, Variance};
