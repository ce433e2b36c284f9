//! Entering symbols.
//!
//! Every `enter_*` operation has the same shape: if `owner` already has a
//! member called `name`, check it is of the requested kind and return it
//! (reopening); otherwise append a fresh slot to the kind's store and
//! register it in the owner's member map. Re-entering a name under an
//! incompatible kind is an internal error: redefinitions must go through
//! `mangle_rename_symbol` first.

use larch_ir::{well_known, Loc, NameId, SymbolKind, SymbolRef, Type, UniqueNameKind, Variance};

use super::{next_index, GlobalState};
use crate::symbol::{ArgInfo, ClassOrModule, Field, Method, TypeParam};
use crate::Symbols;

impl GlobalState {
    /// The member `name` of `owner`, if present, after checking it is
    /// compatible with the requested kind.
    fn reopen(
        &mut self,
        loc: Loc,
        owner: SymbolRef,
        name: NameId,
        compatible: impl FnOnce(&Self, SymbolRef) -> bool,
    ) -> Option<SymbolRef> {
        let existing = self.members(owner)?.get(&name).copied()?;
        assert!(
            compatible(self, existing),
            "existing symbol {existing:?} named `{}` has the wrong kind",
            self.names.show(name)
        );
        self.header_mut(existing).add_loc(loc);
        tracing::trace!(?existing, "symbol table hit");
        Some(existing)
    }

    fn register_member(&mut self, owner: SymbolRef, name: NameId, sym: SymbolRef) {
        self.members_mut(owner).insert(name, sym);
        self.mark_modified();
    }

    /// Enter a class or module.
    ///
    /// `owner` may be `Symbols::no_symbol()` for fully synthetic classes.
    ///
    /// # Panics
    /// Panics if `name` cannot name a class, if `owner` already has a
    /// non-class member called `name`, or if the symbol table is frozen.
    pub fn enter_class_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameId) -> SymbolRef {
        assert!(
            owner.is_class_or_module(),
            "entering class symbol into {owner:?}"
        );
        assert!(
            self.names.is_class_name(name),
            "`{}` cannot name a class",
            self.names.show(name)
        );
        if let Some(existing) = self.reopen(loc, owner, name, |_, sym| sym.is_class_or_module()) {
            return existing;
        }

        self.assert_symbol_table_unfrozen();
        let sym = SymbolRef::class_or_module(next_index(&self.class_and_modules));
        let mut data = ClassOrModule::new(name, owner);
        data.header.add_loc(loc);
        self.class_and_modules.push(data);
        self.register_member(owner, name, sym);
        sym
    }

    /// Enter a type member of a class or module. It is also appended to the
    /// owner's positional type member list.
    pub fn enter_type_member(
        &mut self,
        loc: Loc,
        owner: SymbolRef,
        name: NameId,
        variance: Variance,
    ) -> SymbolRef {
        assert!(
            owner.is_class_or_module() && owner.exists(),
            "entering type member into {owner:?}"
        );
        assert!(name.exists(), "entering type member with no name");
        let compatible =
            |gs: &Self, sym: SymbolRef| sym.is_type_member() && gs.type_param(sym).variance == variance;
        if let Some(existing) = self.reopen(loc, owner, name, compatible) {
            return existing;
        }

        self.assert_symbol_table_unfrozen();
        let sym = SymbolRef::type_member(next_index(&self.type_members));
        let mut data = TypeParam::new(name, owner, variance);
        data.header.add_loc(loc);
        self.type_members.push(data);
        self.register_member(owner, name, sym);
        let list = &mut self.class_data_mut(owner).type_members;
        if !list.contains(&sym) {
            list.push(sym);
        }
        sym
    }

    /// Enter a type argument of a method. It is also appended to the
    /// method's type argument list.
    pub fn enter_type_argument(
        &mut self,
        loc: Loc,
        owner: SymbolRef,
        name: NameId,
        variance: Variance,
    ) -> SymbolRef {
        assert!(
            owner.is_method() && owner.exists(),
            "entering type argument into {owner:?}"
        );
        assert!(name.exists(), "entering type argument with no name");
        let compatible = |gs: &Self, sym: SymbolRef| {
            sym.is_type_argument() && gs.type_param(sym).variance == variance
        };
        if let Some(existing) = self.reopen(loc, owner, name, compatible) {
            return existing;
        }

        self.assert_symbol_table_unfrozen();
        let sym = SymbolRef::type_argument(next_index(&self.type_arguments));
        let mut data = TypeParam::new(name, owner, variance);
        data.header.add_loc(loc);
        self.type_arguments.push(data);
        self.register_member(owner, name, sym);
        self.method_data_mut(owner).type_arguments.push(sym);
        sym
    }

    pub fn enter_method_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameId) -> SymbolRef {
        assert!(
            owner.is_class_or_module(),
            "entering method symbol into {owner:?}"
        );
        if let Some(existing) = self.reopen(loc, owner, name, |_, sym| sym.is_method()) {
            return existing;
        }

        self.assert_symbol_table_unfrozen();
        let sym = SymbolRef::method(next_index(&self.methods));
        let mut data = Method::new(name, owner);
        data.header.add_loc(loc);
        self.methods.push(data);
        self.register_member(owner, name, sym);
        sym
    }

    fn enter_field(&mut self, loc: Loc, owner: SymbolRef, name: NameId, is_static: bool) -> SymbolRef {
        assert!(
            owner.is_class_or_module() && owner.exists(),
            "entering field symbol into {owner:?}"
        );
        assert!(name.exists(), "entering field with no name");
        let compatible =
            |gs: &Self, sym: SymbolRef| sym.is_field() && gs.field_data(sym).is_static == is_static;
        if let Some(existing) = self.reopen(loc, owner, name, compatible) {
            return existing;
        }

        self.assert_symbol_table_unfrozen();
        let sym = SymbolRef::field(next_index(&self.fields));
        let mut data = Field {
            is_static,
            ..Field::default()
        };
        data.header.name = name;
        data.header.owner = owner;
        data.header.add_loc(loc);
        self.fields.push(data);
        self.register_member(owner, name, sym);
        sym
    }

    /// Enter an instance field (`@x`) or class variable.
    pub fn enter_field_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameId) -> SymbolRef {
        self.enter_field(loc, owner, name, false)
    }

    /// Enter a constant that is not a class or module.
    pub fn enter_static_field_symbol(&mut self, loc: Loc, owner: SymbolRef, name: NameId) -> SymbolRef {
        self.enter_field(loc, owner, name, true)
    }

    /// Find or add the argument `name` of `method`.
    pub fn enter_method_argument(&mut self, loc: Loc, method: SymbolRef, name: NameId) -> &mut ArgInfo {
        assert!(
            method.is_method() && method.exists(),
            "entering method argument into {method:?}"
        );
        assert!(name.exists(), "entering method argument with no name");
        let position = self
            .method_data(method)
            .arguments
            .iter()
            .position(|arg| arg.name == name);
        let index = if let Some(index) = position {
            index
        } else {
            self.assert_symbol_table_unfrozen();
            self.mark_modified();
            let arguments = &mut self.method_data_mut(method).arguments;
            arguments.push(ArgInfo {
                name,
                loc,
                ..ArgInfo::default()
            });
            arguments.len() - 1
        };
        &mut self.method_data_mut(method).arguments[index]
    }

    /// Record that including `owner` also extends the includer's singleton
    /// with `module`.
    ///
    /// The entry lives under `<mixes-in-class-methods>` in `owner`'s member
    /// map and points at a symbol with a different name and owner.
    pub fn set_class_methods_mixin(&mut self, owner: SymbolRef, module: SymbolRef) {
        self.assert_symbol_table_unfrozen();
        assert!(
            owner.is_class_or_module() && module.is_class_or_module() && module.exists(),
            "mixes_in_class_methods between {owner:?} and {module:?}"
        );
        self.register_member(owner, well_known::CLASS_METHODS, module);
    }

    /// The singleton class of `sym`, created on first use.
    ///
    /// A new singleton `<Class:X>` lives next to `X`, is attached to it, and
    /// carries the covariant `<AttachedClass>` type member. Its superclass
    /// stays `Symbols::todo()` until ancestors are finalized.
    pub fn singleton_class(&mut self, sym: SymbolRef) -> SymbolRef {
        let existing = self.lookup_singleton_class(sym);
        if existing.exists() {
            return existing;
        }

        let (name, owner, loc) = {
            let data = self.class_data(sym);
            (data.header.name, data.header.owner, data.header.loc())
        };
        let singleton_name = self.names.fresh_unique(UniqueNameKind::Singleton, name, 1);
        let singleton = self.enter_class_symbol(loc, owner, singleton_name);
        {
            let data = self.class_data_mut(singleton);
            data.attached = sym;
            data.super_class = Symbols::todo();
            data.set_is_module(false);
        }

        let attached_class =
            self.enter_type_member(loc, singleton, well_known::ATTACHED_CLASS, Variance::CoVariant);
        let todo = Type::Class(Symbols::todo());
        self.type_param_mut(attached_class).result_type =
            Some(Type::lambda_param(attached_class, todo.clone(), todo));

        self.class_data_mut(sym).singleton = singleton;
        tracing::trace!(?sym, ?singleton, "created singleton class");
        singleton
    }

    /// The singleton class of `sym`, or `Symbols::no_symbol()`.
    pub fn lookup_singleton_class(&self, sym: SymbolRef) -> SymbolRef {
        self.class_data(sym).singleton
    }

    /// For a singleton class, the class it belongs to; otherwise
    /// `Symbols::no_symbol()`.
    pub fn attached_class(&self, sym: SymbolRef) -> SymbolRef {
        self.class_data(sym).attached
    }

    /// The member `name` of `owner`, or `Symbols::no_symbol()`.
    pub fn find_member(&self, owner: SymbolRef, name: NameId) -> SymbolRef {
        self.members(owner)
            .and_then(|members| members.get(&name).copied())
            .unwrap_or(SymbolRef::NONE)
    }

    /// Number of symbols of `kind` in use.
    pub fn symbols_used(&self, kind: SymbolKind) -> usize {
        match kind {
            SymbolKind::ClassOrModule => self.class_and_modules_used(),
            SymbolKind::Method => self.methods_used(),
            SymbolKind::Field => self.fields_used(),
            SymbolKind::TypeArgument => self.type_arguments_used(),
            SymbolKind::TypeMember => self.type_members_used(),
        }
    }
}
