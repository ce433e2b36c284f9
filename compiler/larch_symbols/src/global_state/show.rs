//! Printing and self-checks.

use std::fmt::{self, Write as _};

use larch_ir::{well_known, SymbolKind, SymbolRef, Variance};

use super::GlobalState;
use crate::files::FileType;
use crate::Symbols;

impl GlobalState {
    /// Short name of a symbol.
    pub fn show(&self, sym: SymbolRef) -> String {
        self.names.show(self.name_of(sym))
    }

    /// Name qualified by its owners, e.g. `Foo::Bar` or `Foo#baz`.
    pub fn show_full_name(&self, sym: SymbolRef) -> String {
        let owner = self.owner_of(sym);
        if sym == Symbols::root() || !owner.exists() || owner == Symbols::root() {
            return self.show(sym);
        }
        let separator = if sym.is_method() { "#" } else { "::" };
        format!("{}{separator}{}", self.show_full_name(owner), self.show(sym))
    }

    fn describe(&self, sym: SymbolRef) -> String {
        let mut line = String::new();
        match sym.kind() {
            SymbolKind::ClassOrModule => {
                let data = self.class_data(sym);
                let word = if data.is_module() { "module" } else { "class" };
                let _ = write!(line, "{word} {}", self.show_full_name(sym));
                if data.super_class.exists() {
                    let _ = write!(line, " < {}", self.show_full_name(data.super_class));
                }
                if !data.mixins.is_empty() {
                    let mixins: Vec<_> = data.mixins.iter().map(|&m| self.show_full_name(m)).collect();
                    let _ = write!(line, " ({})", mixins.join(", "));
                }
            }
            SymbolKind::Method => {
                let data = self.method_data(sym);
                let args: Vec<_> = data
                    .arguments
                    .iter()
                    .map(|arg| self.names.show(arg.name))
                    .collect();
                let _ = write!(line, "method {} ({})", self.show_full_name(sym), args.join(", "));
            }
            SymbolKind::Field => {
                let word = if self.field_data(sym).is_static {
                    "static-field"
                } else {
                    "field"
                };
                let _ = write!(line, "{word} {}", self.show_full_name(sym));
            }
            SymbolKind::TypeMember | SymbolKind::TypeArgument => {
                let word = if sym.is_type_member() {
                    "type-member"
                } else {
                    "type-argument"
                };
                let sign = match self.type_param(sym).variance {
                    Variance::CoVariant => '+',
                    Variance::ContraVariant => '-',
                    Variance::Invariant => '=',
                };
                let _ = write!(line, "{word}({sign}) {}", self.show_full_name(sym));
            }
        }
        let loc = self.loc_of(sym);
        if loc.exists() {
            let censored = self.options.censor_for_snapshot_tests
                && self.file_type_of(loc) == Some(FileType::Payload);
            if censored {
                line.push_str(" @ ??");
            } else {
                let path = self.file(loc.file).map_or("?", |f| f.path());
                let _ = write!(line, " @ {path}:{}..{}", loc.begin(), loc.end());
            }
        }
        line
    }

    fn dump_into(&self, out: &mut String, sym: SymbolRef, depth: usize) {
        larch_stack::ensure_sufficient_stack(|| {
            if depth > 0 {
                let _ = writeln!(out, "{:indent$}{}", "", self.describe(sym), indent = (depth - 1) * 2);
            }
            let Some(members) = self.members(sym) else {
                return;
            };
            for (&name, &member) in members {
                if name != well_known::CLASS_METHODS && member != sym && self.owner_of(member) == sym {
                    self.dump_into(out, member, depth + 1);
                }
            }
        });
    }

    /// Check the cross-links between stores.
    ///
    /// Only runs in debug builds.
    ///
    /// # Panics
    /// Panics on the first violated invariant.
    pub fn sanity_check(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        self.names.sanity_check();
        for sym in self.class_and_module_refs() {
            let data = self.class_data(sym);
            assert!(
                data.header.owner.is_class_or_module(),
                "owner of {sym:?} is not a class"
            );
            for (&name, &member) in &data.members {
                if name == well_known::CLASS_METHODS {
                    assert!(member.is_class_or_module(), "{sym:?} mixes in class methods from {member:?}");
                    continue;
                }
                assert_eq!(
                    self.name_of(member),
                    name,
                    "member map of {sym:?} is out of sync with {member:?}"
                );
            }
            for &member in &data.type_members {
                assert!(member.is_type_member(), "{member:?} listed as a type member");
                assert_eq!(self.owner_of(member), sym, "{member:?} listed on a foreign class");
            }
            if data.singleton.exists() {
                assert_eq!(
                    self.attached_class(data.singleton),
                    sym,
                    "singleton of {sym:?} is attached elsewhere"
                );
            }
        }
        for (index, method) in self.methods.iter().enumerate().skip(1) {
            assert!(
                method.header.owner.is_class_or_module(),
                "owner of method {index} is not a class"
            );
            for &targ in &method.type_arguments {
                assert!(targ.is_type_argument(), "{targ:?} listed as a type argument");
            }
        }
        for member in self.type_members.iter().skip(1) {
            assert!(
                member.header.owner.is_class_or_module(),
                "type member owned by a non-class"
            );
        }
        for targ in self.type_arguments.iter().skip(1) {
            assert!(targ.header.owner.is_method(), "type argument owned by a non-method");
        }
    }
}

/// Dump of the symbol tree under the root, one symbol per line.
impl fmt::Display for GlobalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class_and_modules.len() <= Symbols::root().index() {
            return Ok(());
        }
        let mut out = String::new();
        self.dump_into(&mut out, Symbols::root(), 0);
        f.write_str(&out)
    }
}
