//! The file table.
//!
//! Files are shared between a state and its clones through `Arc`; changing
//! a file's type copies it first, so a clone never sees the change.

use std::sync::Arc;

use larch_ir::FileRef;
use rustc_hash::FxHashMap;

/// Where a file came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum FileType {
    #[default]
    Normal,
    /// Trusted standard-library payload.
    Payload,
    /// Reserved by path; contents not read yet.
    NotYetRead,
    /// Deleted; kept so its `FileRef` stays valid.
    TombStone,
}

/// A source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    path: String,
    source: String,
    pub file_type: FileType,
}

impl File {
    pub fn new(path: impl Into<String>, source: impl Into<String>, file_type: FileType) -> Self {
        File {
            path: path.into(),
            source: source.into(),
            file_type,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_payload(&self) -> bool {
        self.file_type == FileType::Payload
    }
}

/// Files by `FileRef`, plus a path index. Slot 0 is the reserved "no file".
#[derive(Clone, Debug)]
pub struct FileTable {
    files: Vec<Option<Arc<File>>>,
    by_path: FxHashMap<String, FileRef>,
    frozen: bool,
}

impl Default for FileTable {
    fn default() -> Self {
        FileTable {
            files: vec![None],
            by_path: FxHashMap::default(),
            frozen: false,
        }
    }
}

impl FileTable {
    /// Append a file.
    ///
    /// # Panics
    /// Panics if the table is frozen or the path was entered before.
    pub fn enter(&mut self, file: File) -> FileRef {
        assert!(!self.frozen, "cannot enter a file: file table is frozen");
        assert!(
            !self.by_path.contains_key(file.path()),
            "file `{}` entered twice",
            file.path()
        );
        let raw = u32::try_from(self.files.len())
            .unwrap_or_else(|_| panic!("file table overflow: {} files", self.files.len()));
        let fref = FileRef::from_raw(raw);
        self.by_path.insert(file.path.clone(), fref);
        self.files.push(Some(Arc::new(file)));
        fref
    }

    /// Replace a reserved slot with the file's real contents.
    ///
    /// # Panics
    /// Panics unless `fref` was reserved for the same path and not read yet.
    pub fn enter_at(&mut self, file: File, fref: FileRef) -> FileRef {
        assert!(!self.frozen, "cannot enter a file: file table is frozen");
        let slot = self.slot_mut(fref);
        assert_eq!(
            slot.file_type,
            FileType::NotYetRead,
            "file slot {fref:?} was not reserved"
        );
        assert_eq!(slot.path, file.path, "reserved path differs");
        *slot = file;
        fref
    }

    pub fn find_by_path(&self, path: &str) -> FileRef {
        self.by_path.get(path).copied().unwrap_or(FileRef::NONE)
    }

    pub fn get(&self, fref: FileRef) -> Option<&File> {
        self.files.get(fref.index()).and_then(|f| f.as_deref())
    }

    /// Mark every file entered so far as payload.
    pub fn mark_all_as_payload(&mut self) {
        assert!(!self.frozen, "cannot mark payload: file table is frozen");
        for file in self.files.iter_mut().flatten() {
            Arc::make_mut(file).file_type = FileType::Payload;
        }
    }

    pub fn set_file_type(&mut self, fref: FileRef, file_type: FileType) {
        assert!(!self.frozen, "cannot retype {fref:?}: file table is frozen");
        self.slot_mut(fref).file_type = file_type;
    }

    /// Number of slots, counting the reserved one.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.len() <= 1
    }

    pub fn freeze(&mut self) -> bool {
        std::mem::replace(&mut self.frozen, true)
    }

    pub fn unfreeze(&mut self) -> bool {
        std::mem::replace(&mut self.frozen, false)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn slot_mut(&mut self, fref: FileRef) -> &mut File {
        match self.files.get_mut(fref.index()) {
            Some(Some(file)) => Arc::make_mut(file),
            _ => panic!("no file at {fref:?}"),
        }
    }
}
