//! Open-addressed name table.
//!
//! Every identifier the semantic core touches is interned here once and
//! referred to by [`NameId`] afterwards. Three shapes share one table:
//! UTF-8 strings, constant names wrapping another name, and unique names
//! synthesized from an original name, a [`UniqueNameKind`] tag and a counter.
//!
//! # Layout
//!
//! - `names`: one entry per name, index = `NameId`. Slot 0 is reserved.
//! - `buckets`: `(hash, id)` pairs, exactly twice the name capacity, always
//!   a power of two. An id of 0 marks an empty bucket.
//! - `pages`: string bytes, in pages of [`STRINGS_PAGE_SIZE`]. A string
//!   longer than a page gets its own allocation and the open page stays open.
//!
//! Probing starts at `hash & mask` and advances by 1, 2, 3, ... Growth
//! doubles the capacity and rehashes every live bucket into a fresh table.
//! Nothing is ever removed.
//!
//! Derived names are hashed from the wrapped id and tag fields only, so
//! interning `Constant(x)` never re-reads the bytes of `x`.

use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::{NameId, NameKind, UniqueName, UniqueNameKind};

pub mod well_known;

/// Bytes per string page.
pub const STRINGS_PAGE_SIZE: usize = 4096;

/// Name capacity of a fresh table.
const DEFAULT_CAPACITY: usize = 512;

/// Error when a name cannot be entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTableError {
    /// The table is frozen and the name is not already present.
    Frozen,
    /// Every bucket was probed without finding a free slot.
    Full { buckets: usize },
    /// More names than a 32-bit id can address.
    Overflow { count: usize },
}

impl fmt::Display for NameTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameTableError::Frozen => write!(f, "cannot enter a new name: name table is frozen"),
            NameTableError::Full { buckets } => {
                write!(f, "name hash table is full after probing all {buckets} buckets")
            }
            NameTableError::Overflow { count } => write!(
                f,
                "name table exceeded capacity: {count} entries, max is {} (0x{:X})",
                u32::MAX,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for NameTableError {}

/// Borrowed view of one name.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NameView<'a> {
    Utf8(&'a str),
    Constant(NameId),
    Unique(UniqueName),
}

#[derive(Copy, Clone, Debug, Default)]
struct Bucket {
    hash: u32,
    name: NameId,
}

#[derive(Copy, Clone, Debug)]
enum NameData {
    Utf8 { page: u32, start: u32, len: u32 },
    Constant { original: NameId },
    Unique(UniqueName),
}

enum Probe {
    Found(NameId),
    Vacant,
}

/// The interning table.
#[derive(Clone, Debug)]
pub struct NameTable {
    names: Vec<NameData>,
    /// Logical capacity. `buckets.len() == 2 * capacity`.
    capacity: usize,
    buckets: Vec<Bucket>,
    pages: Vec<String>,
    /// Index of the page that receives small strings.
    open_page: usize,
    frozen: bool,
}

// Hashing

#[inline]
const fn mix(acc: u32, value: u32) -> u32 {
    (acc.rotate_left(5) ^ value).wrapping_mul(0x9E37_79B9)
}

/// Hash of a UTF-8 name.
pub fn hash_utf8(text: &str) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    let full = hasher.finish();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "folding a 64-bit hash into the 32-bit bucket hash"
    )]
    let folded = (full ^ (full >> 32)) as u32;
    folded
}

/// Hash of `Constant(original)`. Depends only on the wrapped id.
pub const fn hash_constant(original: NameId) -> u32 {
    mix(mix(0, NameKind::Constant as u32), original.raw())
}

/// Hash of `Unique(kind, original, num)`. Depends only on the fields.
pub const fn hash_unique(kind: UniqueNameKind, original: NameId, num: u32) -> u32 {
    mix(
        mix(mix(mix(0, NameKind::Unique as u32), kind as u32), num),
        original.raw(),
    )
}

fn to_u32(value: usize) -> Result<u32, NameTableError> {
    u32::try_from(value).map_err(|_| NameTableError::Overflow { count: value })
}

impl NameTable {
    /// Create a table with the well-known names registered.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a table sized for at least `capacity` names.
    ///
    /// The capacity is rounded up to a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(well_known::COUNT + 1).next_power_of_two();
        let mut table = NameTable {
            names: Vec::with_capacity(capacity),
            capacity,
            buckets: vec![Bucket::default(); capacity * 2],
            pages: vec![String::with_capacity(STRINGS_PAGE_SIZE)],
            open_page: 0,
            frozen: false,
        };
        // Slot 0 is "no name"; it is never placed in a bucket.
        table.names.push(NameData::Utf8 {
            page: 0,
            start: 0,
            len: 0,
        });
        well_known::register(&mut table);
        table
    }

    // Probing

    fn probe(&self, hash: u32, is_match: impl Fn(&NameData) -> bool) -> Probe {
        let size = self.buckets.len();
        let mask = size - 1;
        let mut bucket = hash as usize & mask;
        let mut probe_count = 1;
        while probe_count <= size {
            let entry = self.buckets[bucket];
            if !entry.name.exists() {
                return Probe::Vacant;
            }
            if entry.hash == hash && is_match(&self.names[entry.name.index()]) {
                return Probe::Found(entry.name);
            }
            bucket = (bucket + probe_count) & mask;
            probe_count += 1;
        }
        Probe::Vacant
    }

    fn vacant_bucket(buckets: &[Bucket], hash: u32) -> Result<usize, NameTableError> {
        let size = buckets.len();
        let mask = size - 1;
        let mut bucket = hash as usize & mask;
        let mut probe_count = 1;
        while buckets[bucket].name.exists() {
            if probe_count == size {
                return Err(NameTableError::Full { buckets: size });
            }
            bucket = (bucket + probe_count) & mask;
            probe_count += 1;
        }
        Ok(bucket)
    }

    fn insert(
        &mut self,
        hash: u32,
        make: impl FnOnce(&mut Self) -> Result<NameData, NameTableError>,
    ) -> Result<NameId, NameTableError> {
        if self.frozen {
            return Err(NameTableError::Frozen);
        }
        if self.names.len() == self.capacity {
            self.grow(self.capacity * 2);
        }
        let bucket = Self::vacant_bucket(&self.buckets, hash)?;
        let id = NameId::from_raw(to_u32(self.names.len())?);
        let data = make(self)?;
        self.buckets[bucket] = Bucket { hash, name: id };
        self.names.push(data);
        debug_assert_eq!(self.hash_of(id), hash, "stored hash disagrees with name");
        Ok(id)
    }

    fn grow(&mut self, new_capacity: usize) {
        if new_capacity <= self.capacity {
            return;
        }
        debug_assert!(new_capacity.is_power_of_two());
        let mut buckets = vec![Bucket::default(); new_capacity * 2];
        for entry in self.buckets.iter().filter(|b| b.name.exists()) {
            // A table twice the name capacity always has room.
            let slot = Self::vacant_bucket(&buckets, entry.hash)
                .unwrap_or_else(|e| panic!("rehashing {:?}: {e}", entry.name));
            buckets[slot] = *entry;
        }
        self.buckets = buckets;
        self.names.reserve(new_capacity - self.names.len());
        tracing::trace!(from = self.capacity, to = new_capacity, "name table grew");
        self.capacity = new_capacity;
    }

    /// Make room for at least `capacity` names without further rehashing.
    pub fn reserve(&mut self, capacity: usize) {
        self.grow(capacity.next_power_of_two());
    }

    fn store_str(&mut self, text: &str) -> Result<NameData, NameTableError> {
        let len = to_u32(text.len())?;
        if text.len() > STRINGS_PAGE_SIZE {
            self.pages.push(text.to_owned());
            let page = to_u32(self.pages.len() - 1)?;
            return Ok(NameData::Utf8 {
                page,
                start: 0,
                len,
            });
        }
        if self.pages[self.open_page].len() + text.len() > STRINGS_PAGE_SIZE {
            self.pages.push(String::with_capacity(STRINGS_PAGE_SIZE));
            self.open_page = self.pages.len() - 1;
        }
        let page = &mut self.pages[self.open_page];
        let start = to_u32(page.len())?;
        page.push_str(text);
        Ok(NameData::Utf8 {
            page: to_u32(self.open_page)?,
            start,
            len,
        })
    }

    fn utf8_of(&self, data: &NameData) -> Option<&str> {
        match *data {
            NameData::Utf8 { page, start, len } => {
                let start = start as usize;
                Some(&self.pages[page as usize][start..start + len as usize])
            }
            _ => None,
        }
    }

    // UTF-8 names

    /// Look up a UTF-8 name without allocating.
    pub fn lookup_utf8(&self, text: &str) -> Option<NameId> {
        match self.probe(hash_utf8(text), |d| self.utf8_of(d) == Some(text)) {
            Probe::Found(id) => Some(id),
            Probe::Vacant => None,
        }
    }

    /// Try to intern a UTF-8 name.
    pub fn try_intern_utf8(&mut self, text: &str) -> Result<NameId, NameTableError> {
        let hash = hash_utf8(text);
        if let Probe::Found(id) = self.probe(hash, |d| self.utf8_of(d) == Some(text)) {
            return Ok(id);
        }
        self.insert(hash, |table| table.store_str(text))
    }

    /// Intern a UTF-8 name.
    ///
    /// # Panics
    /// Panics if the name is new and the table is frozen or exhausted.
    pub fn intern_utf8(&mut self, text: &str) -> NameId {
        self.try_intern_utf8(text).unwrap_or_else(|e| panic!("{}", e))
    }

    // Constant names

    fn assert_constant_original(&self, original: NameId) {
        assert!(original.exists(), "making a constant name over a missing name");
        let valid = match self.names[original.index()] {
            NameData::Utf8 { .. } => true,
            NameData::Unique(u) => u.kind == UniqueNameKind::ResolverMissingClass,
            NameData::Constant { .. } => false,
        };
        assert!(valid, "making a constant name over the wrong kind of name");
    }

    /// Look up `Constant(original)` without allocating.
    pub fn lookup_constant(&self, original: NameId) -> Option<NameId> {
        if !original.exists() {
            return None;
        }
        let is_match =
            |d: &NameData| matches!(d, NameData::Constant { original: o } if *o == original);
        match self.probe(hash_constant(original), is_match) {
            Probe::Found(id) => Some(id),
            Probe::Vacant => None,
        }
    }

    /// Look up the constant wrapping the UTF-8 name `text`.
    pub fn lookup_constant_str(&self, text: &str) -> Option<NameId> {
        self.lookup_utf8(text)
            .and_then(|utf8| self.lookup_constant(utf8))
    }

    /// Try to intern `Constant(original)`.
    pub fn try_intern_constant(&mut self, original: NameId) -> Result<NameId, NameTableError> {
        self.assert_constant_original(original);
        if let Some(id) = self.lookup_constant(original) {
            return Ok(id);
        }
        self.insert(hash_constant(original), |_| {
            Ok(NameData::Constant { original })
        })
    }

    /// Intern `Constant(original)`.
    ///
    /// # Panics
    /// Panics if `original` is not a UTF-8 name, or if the name is new and
    /// the table is frozen or exhausted.
    pub fn intern_constant(&mut self, original: NameId) -> NameId {
        self.try_intern_constant(original)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Intern the constant wrapping the UTF-8 name `text`.
    pub fn intern_constant_str(&mut self, text: &str) -> NameId {
        let utf8 = self.intern_utf8(text);
        self.intern_constant(utf8)
    }

    // Unique names

    /// Look up `Unique(kind, original, num)` without allocating.
    pub fn lookup_unique(&self, kind: UniqueNameKind, original: NameId, num: u32) -> Option<NameId> {
        assert!(num > 0, "unique name counter must start at 1");
        let wanted = UniqueName {
            kind,
            original,
            num,
        };
        let is_match = |d: &NameData| matches!(d, NameData::Unique(u) if *u == wanted);
        match self.probe(hash_unique(kind, original, num), is_match) {
            Probe::Found(id) => Some(id),
            Probe::Vacant => None,
        }
    }

    /// Try to intern `Unique(kind, original, num)`.
    pub fn try_intern_unique(
        &mut self,
        kind: UniqueNameKind,
        original: NameId,
        num: u32,
    ) -> Result<NameId, NameTableError> {
        if let Some(id) = self.lookup_unique(kind, original, num) {
            return Ok(id);
        }
        let unique = UniqueName {
            kind,
            original,
            num,
        };
        self.insert(hash_unique(kind, original, num), |_| {
            Ok(NameData::Unique(unique))
        })
    }

    /// Intern `Unique(kind, original, num)`, allocating it if absent.
    ///
    /// # Panics
    /// Panics if `num` is 0, or if the name is new and the table is frozen
    /// or exhausted.
    pub fn fresh_unique(&mut self, kind: UniqueNameKind, original: NameId, num: u32) -> NameId {
        self.try_intern_unique(kind, original, num)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Same as [`NameTable::fresh_unique`].
    pub fn intern_unique(&mut self, kind: UniqueNameKind, original: NameId, num: u32) -> NameId {
        self.fresh_unique(kind, original, num)
    }

    // Queries

    /// Names used, counting the reserved slot.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when only the reserved slot is present.
    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of hash buckets (twice the capacity).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of string pages, dedicated oversized pages included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn get(&self, id: NameId) -> NameView<'_> {
        let data = &self.names[id.index()];
        match *data {
            NameData::Utf8 { .. } => NameView::Utf8(self.utf8_of(data).unwrap_or_default()),
            NameData::Constant { original } => NameView::Constant(original),
            NameData::Unique(unique) => NameView::Unique(unique),
        }
    }

    pub fn kind(&self, id: NameId) -> NameKind {
        match self.names[id.index()] {
            NameData::Utf8 { .. } => NameKind::Utf8,
            NameData::Constant { .. } => NameKind::Constant,
            NameData::Unique(_) => NameKind::Unique,
        }
    }

    /// The text of a UTF-8 name.
    pub fn as_str(&self, id: NameId) -> Option<&str> {
        self.utf8_of(&self.names[id.index()])
    }

    /// The fields of a unique name.
    pub fn as_unique(&self, id: NameId) -> Option<UniqueName> {
        match self.names[id.index()] {
            NameData::Unique(unique) => Some(unique),
            _ => None,
        }
    }

    /// The hash this name is stored under.
    pub fn hash_of(&self, id: NameId) -> u32 {
        let data = &self.names[id.index()];
        match *data {
            NameData::Utf8 { .. } => hash_utf8(self.utf8_of(data).unwrap_or_default()),
            NameData::Constant { original } => hash_constant(original),
            NameData::Unique(u) => hash_unique(u.kind, u.original, u.num),
        }
    }

    /// Whether this name can name a class or module.
    pub fn is_class_name(&self, id: NameId) -> bool {
        match self.names[id.index()] {
            NameData::Constant { .. } => true,
            NameData::Unique(u) => {
                matches!(
                    u.kind,
                    UniqueNameKind::Singleton
                        | UniqueNameKind::MangleRename
                        | UniqueNameKind::TypeVarName
                ) && self.is_class_name(u.original)
            }
            NameData::Utf8 { .. } => false,
        }
    }

    /// Human-readable form.
    pub fn show(&self, id: NameId) -> String {
        match self.get(id) {
            NameView::Utf8(text) => text.to_owned(),
            NameView::Constant(original) => self.show(original),
            NameView::Unique(u) => match u.kind {
                UniqueNameKind::Singleton => format!("<Class:{}>", self.show(u.original)),
                UniqueNameKind::Overload => {
                    format!("{} (overload.{})", self.show(u.original), u.num)
                }
                _ => format!("{}${}", self.show(u.original), u.num),
            },
        }
    }

    /// Form that exposes the name's shape.
    pub fn show_raw(&self, id: NameId) -> String {
        match self.get(id) {
            NameView::Utf8(text) => format!("<U {text}>"),
            NameView::Constant(original) => format!("<C {}>", self.show_raw(original)),
            NameView::Unique(u) => format!("<N {} ${}>", self.show_raw(u.original), u.num),
        }
    }

    // Freezing

    /// Forbid new names. Returns the previous state.
    pub fn freeze(&mut self) -> bool {
        std::mem::replace(&mut self.frozen, true)
    }

    /// Allow new names again. Returns the previous state.
    pub fn unfreeze(&mut self) -> bool {
        std::mem::replace(&mut self.frozen, false)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Check the table's structural invariants.
    ///
    /// # Panics
    /// Panics on the first violated invariant.
    pub fn sanity_check(&self) {
        assert!(!self.names.is_empty(), "empty name table");
        assert!(!self.pages.is_empty(), "empty string table");
        assert!(
            self.buckets.len().is_power_of_two(),
            "name hash table size is not a power of two"
        );
        assert_eq!(
            self.capacity * 2,
            self.buckets.len(),
            "name table and hash table sizes out of sync"
        );
        assert!(self.names.len() <= self.capacity, "name table over capacity");
        let mut occupied = 0;
        for bucket in self.buckets.iter().filter(|b| b.name.exists()) {
            occupied += 1;
            assert_eq!(
                bucket.hash,
                self.hash_of(bucket.name),
                "name hash table corruption at {:?}",
                bucket.name
            );
        }
        assert_eq!(occupied, self.names.len() - 1, "name missing from hash table");
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
