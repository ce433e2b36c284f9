//! Source locations.
//!
//! A [`LocOffsets`] is a byte range inside some file and is what tree nodes
//! carry. A [`Loc`] pairs offsets with the [`FileRef`] they belong to and is
//! what symbols and diagnostics carry.

use std::fmt;

/// Error when a byte range does not fit the 32-bit offset encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocError {
    /// Range start exceeds `u32::MAX`.
    BeginTooLarge(usize),
    /// Range end exceeds `u32::MAX`.
    EndTooLarge(usize),
    /// Range end precedes its start.
    Inverted { begin: usize, end: usize },
}

impl fmt::Display for LocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocError::BeginTooLarge(v) => {
                write!(f, "location begin {v} (0x{v:X}) exceeds u32::MAX")
            }
            LocError::EndTooLarge(v) => write!(f, "location end {v} (0x{v:X}) exceeds u32::MAX"),
            LocError::Inverted { begin, end } => {
                write!(f, "location end {end} precedes begin {begin}")
            }
        }
    }
}

impl std::error::Error for LocError {}

/// Handle into the file table. `FileRef::NONE` (0) is never a real file.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FileRef(u32);

impl FileRef {
    pub const NONE: FileRef = FileRef(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FileRef(raw)
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

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists() {
            write!(f, "FileRef({})", self.0)
        } else {
            write!(f, "FileRef(none)")
        }
    }
}

/// Byte range within a file.
///
/// Layout: 8 bytes, `begin` inclusive and `end` exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct LocOffsets {
    pub begin: u32,
    pub end: u32,
}

impl LocOffsets {
    /// Offsets for synthesized nodes with no source text.
    pub const NONE: LocOffsets = LocOffsets { begin: 0, end: 0 };

    #[inline]
    pub const fn new(begin: u32, end: u32) -> Self {
        LocOffsets { begin, end }
    }

    /// Try to build offsets from a byte range.
    pub fn try_from_range(range: std::ops::Range<usize>) -> Result<Self, LocError> {
        let begin = u32::try_from(range.start).map_err(|_| LocError::BeginTooLarge(range.start))?;
        let end = u32::try_from(range.end).map_err(|_| LocError::EndTooLarge(range.end))?;
        if end < begin {
            return Err(LocError::Inverted {
                begin: range.start,
                end: range.end,
            });
        }
        Ok(LocOffsets { begin, end })
    }

    /// Build offsets from a byte range.
    ///
    /// # Panics
    /// Panics if the range is inverted or exceeds `u32::MAX`.
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::try_from_range(range).unwrap_or_else(|e| panic!("{}", e))
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.begin
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.begin == self.end
    }

    #[inline]
    pub const fn exists(self) -> bool {
        self.begin != 0 || self.end != 0
    }

    /// Smallest range covering both.
    #[inline]
    #[must_use]
    pub fn join(self, other: LocOffsets) -> LocOffsets {
        LocOffsets {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Zero-width offsets at the start of this range.
    #[inline]
    #[must_use]
    pub const fn copy_with_zero_length(self) -> LocOffsets {
        LocOffsets {
            begin: self.begin,
            end: self.begin,
        }
    }
}

impl fmt::Debug for LocOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// A file plus a byte range inside it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Loc {
    pub file: FileRef,
    pub offsets: LocOffsets,
}

impl Loc {
    pub const NONE: Loc = Loc {
        file: FileRef::NONE,
        offsets: LocOffsets::NONE,
    };

    #[inline]
    pub const fn new(file: FileRef, offsets: LocOffsets) -> Self {
        Loc { file, offsets }
    }

    #[inline]
    pub const fn begin(self) -> u32 {
        self.offsets.begin
    }

    #[inline]
    pub const fn end(self) -> u32 {
        self.offsets.end
    }

    /// A location exists when it points into a real file.
    #[inline]
    pub const fn exists(self) -> bool {
        self.file.exists()
    }

    /// Join two locations in the same file. A missing side yields the other.
    #[must_use]
    pub fn join(self, other: Loc) -> Loc {
        if !self.exists() {
            return other;
        }
        if !other.exists() || self.file != other.file {
            return self;
        }
        Loc::new(self.file, self.offsets.join(other.offsets))
    }
}

impl fmt::Debug for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists() {
            write!(f, "Loc({}, {:?})", self.file.raw(), self.offsets)
        } else {
            write!(f, "Loc(none)")
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Loc, LocOffsets};
    crate::static_assert_size!(LocOffsets, 8);
    crate::static_assert_size!(Loc, 12);
}
