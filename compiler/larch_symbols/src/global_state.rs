//! The whole-program symbol universe.
//!
//! A [`GlobalState`] owns the name table, the five symbol stores, the file
//! table and the error sink. Symbols are addressed by [`SymbolRef`]; index
//! 0 of every store is a reserved "none" slot.
//!
//! # Phases
//!
//! Each table carries a frozen flag. Every mutating entry point asserts the
//! relevant table is unfrozen, so a pass that adds names or symbols after
//! its phase closed fails immediately. `init_empty` leaves all three tables
//! frozen; passes that populate the state run inside
//! [`GlobalState::unfrozen`].

mod enter;
mod hierarchy;
mod rename;
mod show;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use larch_diagnostic::{Diagnostic, DiagnosticSink, ErrorQueue};
use larch_ir::{well_known, FileRef, Loc, NameId, NameTable, SymbolKind, SymbolRef, Type};

use crate::files::{File, FileTable, FileType};
use crate::symbol::{ClassOrModule, Field, Members, Method, SymbolHeader, TypeParam};
use crate::{StateOptions, Symbols};

static NEXT_STATE_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a state, kept or refreshed by `deep_copy`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct GlobalStateId(u32);

impl GlobalStateId {
    fn fresh() -> Self {
        GlobalStateId(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One `deep_copy` this state descends from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CloneHistoryEntry {
    pub source: GlobalStateId,
    /// Names the source had when it was copied.
    pub names_used: usize,
}

/// Names, symbols and files of one compilation.
#[derive(Debug)]
pub struct GlobalState {
    id: GlobalStateId,
    pub(crate) names: NameTable,
    pub(crate) class_and_modules: Vec<ClassOrModule>,
    pub(crate) methods: Vec<Method>,
    pub(crate) fields: Vec<Field>,
    pub(crate) type_arguments: Vec<TypeParam>,
    pub(crate) type_members: Vec<TypeParam>,
    pub(crate) files: FileTable,
    symbol_table_frozen: bool,
    errors: Arc<ErrorQueue>,
    pub options: StateOptions,
    clone_history: Vec<CloneHistoryEntry>,
    /// Opaque key of the external cache this state was loaded from.
    pub kvstore_uuid: u32,
    was_modified: bool,
}

fn slot<T>(store: &[T], sym: SymbolRef) -> &T {
    store
        .get(sym.index())
        .unwrap_or_else(|| panic!("{sym:?} is out of range ({} slots)", store.len()))
}

fn slot_mut<T>(store: &mut [T], sym: SymbolRef) -> &mut T {
    let len = store.len();
    store
        .get_mut(sym.index())
        .unwrap_or_else(|| panic!("{sym:?} is out of range ({len} slots)"))
}

fn next_index<T>(store: &[T]) -> u32 {
    u32::try_from(store.len())
        .unwrap_or_else(|_| panic!("symbol store overflow: {} symbols", store.len()))
}

impl GlobalState {
    /// Create an empty state reporting into `errors`.
    ///
    /// The symbol stores stay empty until [`GlobalState::init_empty`].
    pub fn new(errors: Arc<ErrorQueue>) -> Self {
        Self::with_options(errors, StateOptions::default())
    }

    pub fn with_options(errors: Arc<ErrorQueue>, options: StateOptions) -> Self {
        let mut names = NameTable::new();
        names.reserve(options.name_capacity);
        GlobalState {
            id: GlobalStateId::fresh(),
            names,
            class_and_modules: Vec::with_capacity(options.class_capacity),
            methods: Vec::with_capacity(options.method_capacity),
            fields: Vec::new(),
            type_arguments: Vec::new(),
            type_members: Vec::new(),
            files: FileTable::default(),
            symbol_table_frozen: false,
            errors,
            options,
            clone_history: Vec::new(),
            kvstore_uuid: 0,
            was_modified: false,
        }
    }

    fn synthesize_class(&mut self, name: NameId, super_class: SymbolRef, is_module: bool) -> SymbolRef {
        let sym = SymbolRef::class_or_module(next_index(&self.class_and_modules));
        let mut data = ClassOrModule::new(name, Symbols::root());
        data.set_is_module(is_module);
        data.super_class = super_class;
        self.class_and_modules.push(data);
        if sym.raw() > Symbols::root().raw() {
            self.class_data_mut(Symbols::root()).members.insert(name, sym);
        }
        sym
    }

    /// Synthesize the bootstrap symbols at their fixed handles, then freeze
    /// every table.
    ///
    /// # Panics
    /// Panics if called twice.
    pub fn init_empty(&mut self) {
        assert!(
            self.class_and_modules.is_empty(),
            "init_empty on an initialized state"
        );
        self.unfreeze_name_table();
        self.unfreeze_symbol_table();
        self.unfreeze_file_table();

        let bootstrap = [
            (well_known::NO_SYMBOL, Symbols::no_symbol(), SymbolRef::NONE, false),
            (well_known::TOP, Symbols::top(), SymbolRef::NONE, false),
            (well_known::BOTTOM, Symbols::bottom(), SymbolRef::NONE, false),
            (well_known::ROOT, Symbols::root(), SymbolRef::NONE, false),
            (well_known::TODO, Symbols::todo(), SymbolRef::NONE, false),
            (well_known::OBJECT, Symbols::object(), Symbols::basic_object(), false),
            (well_known::BASIC_OBJECT, Symbols::basic_object(), SymbolRef::NONE, false),
            (well_known::CLASS, Symbols::class(), Symbols::module(), false),
            (well_known::MODULE, Symbols::module(), Symbols::object(), false),
            (well_known::KERNEL, Symbols::kernel(), SymbolRef::NONE, true),
            (well_known::UNTYPED, Symbols::untyped(), SymbolRef::NONE, false),
            (well_known::ENUMERABLE, Symbols::enumerable(), SymbolRef::NONE, true),
            (
                well_known::IMPLICIT_MODULE_SUPERCLASS,
                Symbols::implicit_module_superclass(),
                SymbolRef::NONE,
                false,
            ),
            (well_known::STUB_MODULE, Symbols::stub_module(), SymbolRef::NONE, true),
            (
                well_known::STUB_SUPERCLASS,
                Symbols::stub_super_class(),
                Symbols::object(),
                false,
            ),
        ];
        for (name, expected, super_class, is_module) in bootstrap {
            let sym = self.synthesize_class(name, super_class, is_module);
            assert_eq!(sym, expected, "bootstrap class {} out of order", self.names.show(name));
        }

        // The "none" slot of every other store.
        self.methods.push(Method::default());
        self.fields.push(Field::default());
        self.type_arguments.push(TypeParam::default());
        self.type_members.push(TypeParam::default());

        for index in 1..=Symbols::LAST_BOOTSTRAP_CLASS {
            self.singleton_class(SymbolRef::class_or_module(index));
        }

        self.class_data_mut(Symbols::top()).result_type = Some(Type::Top);
        self.class_data_mut(Symbols::bottom()).result_type = Some(Type::Bottom);
        self.class_data_mut(Symbols::untyped()).result_type = Some(Type::Untyped);

        self.freeze_name_table();
        self.freeze_symbol_table();
        self.freeze_file_table();
        self.was_modified = false;
        self.sanity_check();
        tracing::debug!(
            classes = self.class_and_modules_used(),
            names = self.names.len(),
            "initialized empty state",
        );
    }

    /// Reserve room for the given number of symbols and names. Each count
    /// is rounded up to a power of two.
    pub fn preallocate_tables(
        &mut self,
        class_and_modules: usize,
        methods: usize,
        fields: usize,
        type_arguments: usize,
        type_members: usize,
        names: usize,
    ) {
        fn reserve_to<T>(store: &mut Vec<T>, wanted: usize) {
            let wanted = wanted.next_power_of_two();
            store.reserve(wanted.saturating_sub(store.len()));
        }
        reserve_to(&mut self.class_and_modules, class_and_modules);
        reserve_to(&mut self.methods, methods);
        reserve_to(&mut self.fields, fields);
        reserve_to(&mut self.type_arguments, type_arguments);
        reserve_to(&mut self.type_members, type_members);
        self.names.reserve(names);
    }

    pub fn id(&self) -> GlobalStateId {
        self.id
    }

    // Names

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Mutable access to the name table. Interning still honors the frozen
    /// flag.
    pub fn names_mut(&mut self) -> &mut NameTable {
        &mut self.names
    }

    /// Intern a user-visible UTF-8 name.
    ///
    /// # Panics
    /// Panics if the name table is frozen, or if `ensure_clean_strings` is
    /// set and the text looks like a synthesized name.
    pub fn enter_name_utf8(&mut self, text: &str) -> NameId {
        if self.options.ensure_clean_strings {
            assert!(
                is_clean_name(text),
                "name `{text}` looks synthesized; use a unique name instead"
            );
        }
        self.names.intern_utf8(text)
    }

    /// Intern the constant name wrapping `text`.
    pub fn enter_name_constant(&mut self, text: &str) -> NameId {
        let utf8 = self.enter_name_utf8(text);
        self.names.intern_constant(utf8)
    }

    // Symbol data

    pub fn class_data(&self, sym: SymbolRef) -> &ClassOrModule {
        assert!(sym.is_class_or_module(), "{sym:?} is not a class or module");
        slot(&self.class_and_modules, sym)
    }

    pub fn class_data_mut(&mut self, sym: SymbolRef) -> &mut ClassOrModule {
        assert!(sym.is_class_or_module(), "{sym:?} is not a class or module");
        slot_mut(&mut self.class_and_modules, sym)
    }

    pub fn method_data(&self, sym: SymbolRef) -> &Method {
        assert!(sym.is_method(), "{sym:?} is not a method");
        slot(&self.methods, sym)
    }

    pub fn method_data_mut(&mut self, sym: SymbolRef) -> &mut Method {
        assert!(sym.is_method(), "{sym:?} is not a method");
        slot_mut(&mut self.methods, sym)
    }

    pub fn field_data(&self, sym: SymbolRef) -> &Field {
        assert!(sym.is_field(), "{sym:?} is not a field");
        slot(&self.fields, sym)
    }

    pub fn field_data_mut(&mut self, sym: SymbolRef) -> &mut Field {
        assert!(sym.is_field(), "{sym:?} is not a field");
        slot_mut(&mut self.fields, sym)
    }

    /// A type member or type argument.
    pub fn type_param(&self, sym: SymbolRef) -> &TypeParam {
        match sym.kind() {
            SymbolKind::TypeMember => slot(&self.type_members, sym),
            SymbolKind::TypeArgument => slot(&self.type_arguments, sym),
            _ => panic!("{sym:?} is not a type parameter"),
        }
    }

    pub fn type_param_mut(&mut self, sym: SymbolRef) -> &mut TypeParam {
        match sym.kind() {
            SymbolKind::TypeMember => slot_mut(&mut self.type_members, sym),
            SymbolKind::TypeArgument => slot_mut(&mut self.type_arguments, sym),
            _ => panic!("{sym:?} is not a type parameter"),
        }
    }

    pub fn header(&self, sym: SymbolRef) -> &SymbolHeader {
        match sym.kind() {
            SymbolKind::ClassOrModule => &slot(&self.class_and_modules, sym).header,
            SymbolKind::Method => &slot(&self.methods, sym).header,
            SymbolKind::Field => &slot(&self.fields, sym).header,
            SymbolKind::TypeArgument | SymbolKind::TypeMember => &self.type_param(sym).header,
        }
    }

    pub fn header_mut(&mut self, sym: SymbolRef) -> &mut SymbolHeader {
        match sym.kind() {
            SymbolKind::ClassOrModule => &mut slot_mut(&mut self.class_and_modules, sym).header,
            SymbolKind::Method => &mut slot_mut(&mut self.methods, sym).header,
            SymbolKind::Field => &mut slot_mut(&mut self.fields, sym).header,
            SymbolKind::TypeArgument | SymbolKind::TypeMember => {
                &mut self.type_param_mut(sym).header
            }
        }
    }

    #[inline]
    pub fn name_of(&self, sym: SymbolRef) -> NameId {
        self.header(sym).name
    }

    #[inline]
    pub fn owner_of(&self, sym: SymbolRef) -> SymbolRef {
        self.header(sym).owner
    }

    #[inline]
    pub fn loc_of(&self, sym: SymbolRef) -> Loc {
        self.header(sym).loc()
    }

    /// Member map of a class, module or method.
    pub fn members(&self, sym: SymbolRef) -> Option<&Members> {
        match sym.kind() {
            SymbolKind::ClassOrModule => Some(&self.class_data(sym).members),
            SymbolKind::Method => Some(&self.method_data(sym).members),
            _ => None,
        }
    }

    pub(crate) fn members_mut(&mut self, sym: SymbolRef) -> &mut Members {
        match sym.kind() {
            SymbolKind::ClassOrModule => &mut self.class_data_mut(sym).members,
            SymbolKind::Method => &mut self.method_data_mut(sym).members,
            kind => panic!("a {kind} symbol has no members"),
        }
    }

    /// Every class and module handle, skipping the "none" slot.
    pub fn class_and_module_refs(&self) -> impl Iterator<Item = SymbolRef> {
        (1..next_index(&self.class_and_modules)).map(SymbolRef::class_or_module)
    }

    // Counters

    pub fn class_and_modules_used(&self) -> usize {
        self.class_and_modules.len()
    }

    pub fn methods_used(&self) -> usize {
        self.methods.len()
    }

    pub fn fields_used(&self) -> usize {
        self.fields.len()
    }

    pub fn type_arguments_used(&self) -> usize {
        self.type_arguments.len()
    }

    pub fn type_members_used(&self) -> usize {
        self.type_members.len()
    }

    pub fn files_used(&self) -> usize {
        self.files.len()
    }

    pub fn names_used(&self) -> usize {
        self.names.len()
    }

    pub fn symbols_used_total(&self) -> usize {
        self.class_and_modules_used()
            + self.methods_used()
            + self.fields_used()
            + self.type_arguments_used()
            + self.type_members_used()
    }

    /// Whether any symbol was entered since the state was initialized.
    pub fn was_modified(&self) -> bool {
        self.was_modified
    }

    // Freezing

    pub fn freeze_name_table(&mut self) -> bool {
        self.names.freeze()
    }

    pub fn unfreeze_name_table(&mut self) -> bool {
        self.names.unfreeze()
    }

    pub fn freeze_symbol_table(&mut self) -> bool {
        std::mem::replace(&mut self.symbol_table_frozen, true)
    }

    pub fn unfreeze_symbol_table(&mut self) -> bool {
        std::mem::replace(&mut self.symbol_table_frozen, false)
    }

    pub fn freeze_file_table(&mut self) -> bool {
        self.files.freeze()
    }

    pub fn unfreeze_file_table(&mut self) -> bool {
        self.files.unfreeze()
    }

    pub fn is_symbol_table_frozen(&self) -> bool {
        self.symbol_table_frozen
    }

    /// Run `f` with every table unfrozen, then restore the previous flags.
    pub fn unfrozen<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let names = self.unfreeze_name_table();
        let symbols = self.unfreeze_symbol_table();
        let files = self.unfreeze_file_table();
        let result = f(self);
        if names {
            self.freeze_name_table();
        }
        if symbols {
            self.freeze_symbol_table();
        }
        if files {
            self.freeze_file_table();
        }
        result
    }

    pub(crate) fn assert_symbol_table_unfrozen(&self) {
        assert!(
            !self.symbol_table_frozen,
            "cannot change symbols: symbol table is frozen"
        );
    }

    // Files

    pub fn enter_file(&mut self, path: &str, source: &str) -> FileRef {
        self.files.enter(File::new(path, source, FileType::Normal))
    }

    /// Reserve a `FileRef` for a file whose contents are read later.
    pub fn reserve_file_ref(&mut self, path: &str) -> FileRef {
        self.files.enter(File::new(path, "", FileType::NotYetRead))
    }

    /// Fill a slot reserved by [`GlobalState::reserve_file_ref`].
    pub fn enter_new_file_at(&mut self, file: File, fref: FileRef) -> FileRef {
        self.files.enter_at(file, fref)
    }

    /// The file at `path`, or `FileRef::NONE`.
    pub fn find_file_by_path(&self, path: &str) -> FileRef {
        self.files.find_by_path(path)
    }

    pub fn mark_file_as_tombstone(&mut self, fref: FileRef) {
        self.files.set_file_type(fref, FileType::TombStone);
    }

    /// Flag every file entered so far as trusted payload.
    pub fn mark_as_payload(&mut self) {
        self.files.mark_all_as_payload();
    }

    pub fn file(&self, fref: FileRef) -> Option<&File> {
        self.files.get(fref)
    }

    /// Type of the file `loc` points into, if it points into one.
    pub fn file_type_of(&self, loc: Loc) -> Option<FileType> {
        self.files.get(loc.file).map(|f| f.file_type)
    }

    // Diagnostics

    pub fn errors(&self) -> &Arc<ErrorQueue> {
        &self.errors
    }

    /// Push a diagnostic unless errors are silenced. Returns whether it was
    /// recorded.
    pub fn report(&self, diagnostic: Diagnostic) -> bool {
        if self.options.silence_errors {
            return false;
        }
        self.errors.push(diagnostic)
    }

    // Cloning

    /// Copies of this state this one descends from, oldest first.
    pub fn clone_history(&self) -> &[CloneHistoryEntry] {
        &self.clone_history
    }

    /// Copy every table into an independent state.
    ///
    /// Handles are index-identical in the copy. With `keep_id` the copy
    /// keeps this state's id; otherwise it gets a fresh one. The error sink
    /// is shared.
    #[tracing::instrument(level = "debug", skip(self), fields(source = self.id.raw()))]
    pub fn deep_copy(&self, keep_id: bool) -> GlobalState {
        self.sanity_check();
        let mut clone_history = self.clone_history.clone();
        clone_history.push(CloneHistoryEntry {
            source: self.id,
            names_used: self.names_used(),
        });
        let result = GlobalState {
            id: if keep_id { self.id } else { GlobalStateId::fresh() },
            names: self.names.clone(),
            class_and_modules: self.class_and_modules.clone(),
            methods: self.methods.clone(),
            fields: self.fields.clone(),
            type_arguments: self.type_arguments.clone(),
            type_members: self.type_members.clone(),
            files: self.files.clone(),
            symbol_table_frozen: self.symbol_table_frozen,
            errors: Arc::clone(&self.errors),
            options: self.options.clone(),
            clone_history,
            kvstore_uuid: self.kvstore_uuid,
            was_modified: self.was_modified,
        };
        result.sanity_check();
        result
    }

    pub(crate) fn mark_modified(&mut self) {
        self.was_modified = true;
    }
}

/// Names a user can write never contain `<`, except for the comparison
/// operators.
fn is_clean_name(text: &str) -> bool {
    matches!(text, "<" | "<<" | "<=" | "<=>" | ">" | ">>" | ">=") || !text.contains('<')
}
