//! Type member resolution.
//!
//! A generic ancestor's type members must be re-declared by every
//! descendant, under the same name and (for plain classes) the same
//! variance. Each re-declaration is recorded as an alias edge from the
//! ancestor's member to the descendant's; [`dealias_at`] follows those
//! edges to find which member of a given class stands for an ancestor's.

use larch_diagnostic::{Diagnostic, ErrorCode};
use larch_ir::{well_known, NameId, SymbolRef, Type, UniqueNameKind, Variance};
use larch_symbols::{ClassFlags, FileType, GlobalState, Symbols};
use smallvec::SmallVec;

use crate::linearization::compute_linearization;
use crate::ResolveError;

/// Alias edges, grouped by the class that re-declares the member.
#[derive(Clone, Debug, Default)]
pub struct TypeAliases {
    edges: Vec<SmallVec<[(SymbolRef, SymbolRef); 2]>>,
}

impl TypeAliases {
    fn with_classes(count: usize) -> Self {
        TypeAliases {
            edges: vec![SmallVec::new(); count],
        }
    }

    fn register(&mut self, class: SymbolRef, ancestor_member: SymbolRef, member: SymbolRef) {
        if self.edges.len() <= class.index() {
            self.edges.resize(class.index() + 1, SmallVec::new());
        }
        self.edges[class.index()].push((ancestor_member, member));
    }

    /// `(ancestor member, own member)` pairs registered for `class`.
    pub fn edges(&self, class: SymbolRef) -> &[(SymbolRef, SymbolRef)] {
        self.edges.get(class.index()).map_or(&[], |edges| edges.as_slice())
    }

    /// Total number of alias edges.
    pub fn len(&self) -> usize {
        self.edges.iter().map(SmallVec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The member of `klass` that `tparam` resolves to, following alias edges
/// up the superclass chain. `Symbols::no_symbol()` when `klass` and
/// `tparam`'s owner are unrelated.
pub fn dealias_at(
    gs: &GlobalState,
    tparam: SymbolRef,
    klass: SymbolRef,
    aliases: &TypeAliases,
) -> SymbolRef {
    assert!(tparam.is_type_member(), "dealiasing {tparam:?}, which is not a type member");
    let mut tparam = tparam;
    'chase: loop {
        let owner = gs.owner_of(tparam);
        if owner == klass {
            return tparam;
        }
        let mut cursor = if gs.derives_from(owner, klass) {
            owner
        } else if gs.derives_from(klass, owner) {
            klass
        } else {
            SymbolRef::NONE
        };
        while cursor.exists() {
            let edge = aliases.edges(cursor).iter().find(|(from, _)| *from == tparam);
            if let Some(&(_, to)) = edge {
                tparam = to;
                continue 'chase;
            }
            cursor = gs.class_data(cursor).super_class;
        }
        return SymbolRef::NONE;
    }
}

/// Linearize (if not done yet) and resolve the type members of every
/// class and module.
///
/// Classes resolved by an earlier run are not checked again; their
/// recorded alias edges are returned as they were.
#[tracing::instrument(level = "debug", skip_all)]
pub fn finalize_symbols(gs: &mut GlobalState) -> Result<TypeAliases, ResolveError> {
    compute_linearization(gs)?;

    let classes: Vec<_> = gs.class_and_module_refs().collect();
    let mut resolver = MemberResolver {
        aliases: TypeAliases::with_classes(gs.class_and_modules_used()),
        resolved: vec![false; gs.class_and_modules_used()],
    };
    for sym in classes {
        resolver.resolve_class(gs, sym);
    }

    tracing::debug!(aliases = resolver.aliases.len(), "resolved type members",);
    Ok(resolver.aliases)
}

struct MemberResolver {
    aliases: TypeAliases,
    resolved: Vec<bool>,
}

impl MemberResolver {
    fn resolve_class(&mut self, gs: &mut GlobalState, sym: SymbolRef) {
        if self.resolved.len() <= sym.index() {
            self.resolved.resize(sym.index() + 1, false);
        }
        if std::mem::replace(&mut self.resolved[sym.index()], true) {
            return;
        }
        if gs.class_data(sym).is_type_members_resolved() {
            for &(ancestor_member, member) in &gs.class_data(sym).type_aliases {
                self.aliases.register(sym, ancestor_member, member);
            }
            return;
        }

        larch_stack::ensure_sufficient_stack(|| self.resolve_type_members(gs, sym));
        let accepted = self.aliases.edges(sym).iter().copied().collect();
        let data = gs.class_data_mut(sym);
        data.type_aliases = accepted;
        data.flags.insert(ClassFlags::TYPE_MEMBERS_RESOLVED);
    }

    fn resolve_type_members(&mut self, gs: &mut GlobalState, sym: SymbolRef) {
        let parent = gs.class_data(sym).super_class;
        if parent.exists() {
            self.resolve_class(gs, parent);
            let inherited = gs.class_data(parent).type_members.clone();
            let mut found_all = true;
            for &member in &inherited {
                found_all &= self.resolve_member(gs, parent, member, sym);
            }
            if found_all {
                self.check_order(gs, sym, &inherited);
            }
        }

        let mixins = gs.class_data(sym).mixins.clone();
        for mixin in mixins {
            self.resolve_class(gs, mixin);
            let inherited = gs.class_data(mixin).type_members.clone();
            for member in inherited {
                self.resolve_member(gs, mixin, member, sym);
            }
        }

        if gs.class_data(sym).is_class() && !check_class_variance(gs, sym) {
            return;
        }

        if gs.class_data(sym).type_members.is_empty() {
            bound_attached_class(gs, sym);
        }
    }

    /// Match `parent_member` against `sym`'s re-declaration. Returns whether
    /// an alias edge was registered.
    fn resolve_member(
        &mut self,
        gs: &mut GlobalState,
        parent: SymbolRef,
        parent_member: SymbolRef,
        sym: SymbolRef,
    ) -> bool {
        let name = gs.name_of(parent_member);
        let member = gs.find_member(sym, name);

        if !member.exists() {
            let enumerable = Symbols::enumerable();
            let code = if parent == enumerable || gs.derives_from(parent, enumerable) {
                ErrorCode::E4003
            } else {
                ErrorCode::E4002
            };
            let shown = gs.names().show(name);
            gs.report(
                Diagnostic::error(code)
                    .with_message(format!(
                        "Type `{shown}` declared by parent `{}` must be re-declared in `{}`",
                        gs.show_full_name(parent),
                        gs.show_full_name(sym)
                    ))
                    .with_label(gs.loc_of(sym), format!("`{shown}` is not declared here"))
                    .with_secondary_label(
                        gs.loc_of(parent_member),
                        format!("`{shown}` declared in parent here"),
                    ),
            );
            install_placeholder(gs, sym, name);
            return false;
        }

        if !member.is_type_member() {
            let shown = gs.names().show(name);
            gs.report(
                Diagnostic::error(ErrorCode::E4004)
                    .with_message(format!(
                        "Type variable `{shown}` needs to be declared as a type member"
                    ))
                    .with_label(gs.loc_of(member), format!("`{shown}` is not a type member"))
                    .with_secondary_label(
                        gs.loc_of(parent_member),
                        format!("`{shown}` declared in parent here"),
                    ),
            );
            let synthesized = gs.names_mut().fresh_unique(UniqueNameKind::TypeVarName, name, 1);
            install_placeholder(gs, sym, synthesized);
            return false;
        }

        let variance = gs.type_param(member).variance;
        let parent_variance = gs.type_param(parent_member).variance;
        if !gs.derives_from(sym, Symbols::class())
            && variance != parent_variance
            && variance != Variance::Invariant
        {
            gs.report(
                Diagnostic::error(ErrorCode::E4005)
                    .with_message(format!(
                        "Type variance mismatch with parent `{}`",
                        gs.show_full_name(parent)
                    ))
                    .with_label(gs.loc_of(member), format!("declared {}", variance.as_str()))
                    .with_secondary_label(
                        gs.loc_of(parent_member),
                        format!("parent declares it {}", parent_variance.as_str()),
                    ),
            );
            gs.type_param_mut(member).variance = Variance::Invariant;
            return false;
        }

        self.aliases.register(sym, parent_member, member);
        true
    }

    /// Put `sym`'s type members in the same positions as the parent's.
    fn check_order(&self, gs: &mut GlobalState, sym: SymbolRef, inherited: &[SymbolRef]) {
        for (index, &parent_member) in inherited.iter().enumerate() {
            let member = dealias_at(gs, parent_member, sym, &self.aliases);
            assert!(member.exists(), "no alias registered for {parent_member:?} in {sym:?}");
            let members = &gs.class_data(sym).type_members;
            if members.get(index) == Some(&member) {
                continue;
            }
            let Some(found) = members.iter().position(|&m| m == member) else {
                panic!("{member:?} is not a type member of {sym:?}");
            };
            gs.report(
                Diagnostic::error(ErrorCode::E4006)
                    .with_message("Type members in wrong order")
                    .with_label(
                        gs.loc_of(member),
                        format!(
                            "expected at position {index}, as in `{}`",
                            gs.show_full_name(gs.owner_of(parent_member))
                        ),
                    ),
            );
            gs.class_data_mut(sym).type_members.swap(found, index);
        }
    }
}

/// Install an invariant fixed member `name` on `sym` so later phases have
/// something to point at.
fn install_placeholder(gs: &mut GlobalState, sym: SymbolRef, name: NameId) {
    let loc = gs.loc_of(sym);
    let member = gs.enter_type_member(loc, sym, name, Variance::Invariant);
    let param = gs.type_param_mut(member);
    param.fixed = true;
    param.result_type = Some(Type::lambda_param(member, Type::Untyped, Type::Untyped));
}

/// Classes (as opposed to modules) may only have invariant type members,
/// `<AttachedClass>` and payload declarations aside. Returns false after
/// reporting the first offender.
fn check_class_variance(gs: &GlobalState, sym: SymbolRef) -> bool {
    for &member in &gs.class_data(sym).type_members {
        if gs.name_of(member) == well_known::ATTACHED_CLASS {
            continue;
        }
        let variance = gs.type_param(member).variance;
        if variance == Variance::Invariant {
            continue;
        }
        let loc = gs.loc_of(member);
        if gs.file_type_of(loc) == Some(FileType::Payload) {
            continue;
        }
        gs.report(
            Diagnostic::error(ErrorCode::E4007)
                .with_message("Classes can only have invariant type members")
                .with_label(loc, format!("`{}` is declared {}", gs.show(member), variance.as_str())),
        );
        return false;
    }
    true
}

/// A non-generic class's singleton knows exactly what `<AttachedClass>` is:
/// anything between the bottom type and the class itself.
fn bound_attached_class(gs: &mut GlobalState, sym: SymbolRef) {
    let singleton = gs.lookup_singleton_class(sym);
    if !singleton.exists() {
        return;
    }
    let attached_class = gs.find_member(singleton, well_known::ATTACHED_CLASS);
    if !attached_class.is_type_member() || !attached_class.exists() {
        return;
    }
    let upper = gs.external_type(sym);
    if let Some(bounds) = gs
        .type_param_mut(attached_class)
        .result_type
        .as_mut()
        .and_then(Type::as_lambda_param_mut)
    {
        bounds.lower = Type::Bottom;
        bounds.upper = upper;
    }
}

#[cfg(test)]
mod tests;
