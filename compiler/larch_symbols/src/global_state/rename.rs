//! Renaming symbols out of the way of incompatible redefinitions.
//!
//! A displaced symbol `x` becomes `x$1`, then `x$2`, and so on; the counter
//! is the `MangleRename` unique name's `num`.

use larch_ir::{NameId, NameView, SymbolKind, SymbolRef, UniqueNameKind};

use super::GlobalState;

impl GlobalState {
    /// Rename `sym` (currently called `old_name` in its owner) to the next
    /// free mangled name. A class's singleton is renamed with it.
    ///
    /// # Panics
    /// Panics if the symbol table is frozen, or if `sym` is not the owner's
    /// member under `old_name`.
    pub fn mangle_rename_symbol(&mut self, sym: SymbolRef, old_name: NameId) {
        self.assert_symbol_table_unfrozen();
        let owner = self.owner_of(sym);
        assert_eq!(
            self.find_member(owner, old_name),
            sym,
            "{sym:?} is not the member `{}` of its owner",
            self.names.show(old_name)
        );
        assert_eq!(self.name_of(sym), old_name, "{sym:?} is not called `{}`", self.names.show(old_name));

        let mut num = 1;
        let new_name = loop {
            let candidate = self
                .names
                .fresh_unique(UniqueNameKind::MangleRename, old_name, num);
            if !self.find_member(owner, candidate).exists() {
                break candidate;
            }
            num += 1;
        };
        let members = self.members_mut(owner);
        members.remove(&old_name);
        members.insert(new_name, sym);
        self.header_mut(sym).name = new_name;
        self.mark_modified();
        tracing::trace!(?sym, num, "mangle-renamed symbol");

        if sym.is_class_or_module() {
            let singleton = self.lookup_singleton_class(sym);
            if singleton.exists() {
                let singleton_name = self.name_of(singleton);
                self.mangle_rename_symbol(singleton, singleton_name);
            }
        }
    }

    /// The symbol that held `sym`'s name before the most recent rename.
    ///
    /// For `x$n` with `n > 1` that is `x$(n-1)`. For a plain `x` it is the
    /// highest-numbered `x$n` sibling. Otherwise there is none.
    pub fn find_renamed_symbol(&self, owner: SymbolRef, sym: SymbolRef) -> SymbolRef {
        assert!(sym.exists(), "looking up the previous name of a missing symbol");
        let name = self.name_of(sym);
        match self.names.get(name) {
            NameView::Unique(unique) => {
                if unique.kind != UniqueNameKind::MangleRename || unique.num == 1 {
                    return SymbolRef::NONE;
                }
                self.names
                    .lookup_unique(UniqueNameKind::MangleRename, unique.original, unique.num - 1)
                    .map_or(SymbolRef::NONE, |previous| self.find_member(owner, previous))
            }
            _ => {
                let mut found = SymbolRef::NONE;
                let mut num = 1;
                while let Some(mangled) =
                    self.names.lookup_unique(UniqueNameKind::MangleRename, name, num)
                {
                    let member = self.find_member(owner, mangled);
                    if !member.exists() {
                        break;
                    }
                    found = member;
                    num += 1;
                }
                found
            }
        }
    }

    /// The member of `owner` called `name` (or one of its mangled renames)
    /// whose kind is `kind`.
    pub fn lookup_symbol_of_kind(&self, owner: SymbolRef, name: NameId, kind: SymbolKind) -> SymbolRef {
        assert!(owner.exists(), "looking up a symbol in a missing owner");
        assert!(name.exists(), "looking up a symbol with no name");
        let mut lookup = name;
        let mut num = 1;
        loop {
            let member = self.find_member(owner, lookup);
            if !member.exists() {
                return SymbolRef::NONE;
            }
            if member.kind() == kind {
                return member;
            }
            match self.names.lookup_unique(UniqueNameKind::MangleRename, name, num) {
                Some(next) => lookup = next,
                None => return SymbolRef::NONE,
            }
            num += 1;
        }
    }
}
