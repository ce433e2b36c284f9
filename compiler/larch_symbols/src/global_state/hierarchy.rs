//! Ancestry queries.

use larch_ir::{SymbolRef, Type, Variance};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::GlobalState;

impl GlobalState {
    /// Whether `target` is a proper ancestor of `sym`: reachable through
    /// mixins or the superclass chain.
    ///
    /// Works both before and after linearization. Iterative, and safe on
    /// cyclic mixin graphs.
    pub fn derives_from(&self, sym: SymbolRef, target: SymbolRef) -> bool {
        let mut seen = FxHashSet::default();
        let mut pending: SmallVec<[SymbolRef; 8]> = SmallVec::new();
        pending.push(sym);
        seen.insert(sym);
        while let Some(current) = pending.pop() {
            let data = self.class_data(current);
            let parents = data
                .mixins
                .iter()
                .copied()
                .chain(std::iter::once(data.super_class));
            for parent in parents.filter(|p| p.exists()) {
                if parent == target {
                    return true;
                }
                if seen.insert(parent) {
                    pending.push(parent);
                }
            }
        }
        false
    }

    /// The type of an instance of `sym` as seen from outside the class.
    ///
    /// Classes with a stored result type return it. Generic classes are
    /// applied to their type members: fixed and covariant members
    /// contribute their upper bound, the rest are untyped.
    pub fn external_type(&self, sym: SymbolRef) -> Type {
        let data = self.class_data(sym);
        if let Some(ty) = &data.result_type {
            return ty.clone();
        }
        if data.type_members.is_empty() {
            return Type::Class(sym);
        }
        let targs = data
            .type_members
            .iter()
            .map(|&member| {
                let param = self.type_param(member);
                let upper = param
                    .result_type
                    .as_ref()
                    .and_then(Type::as_lambda_param)
                    .map(|bounds| bounds.upper.clone());
                match upper {
                    Some(upper) if param.fixed || param.variance == Variance::CoVariant => {
                        upper
                    }
                    _ => Type::Untyped,
                }
            })
            .collect();
        Type::Applied { klass: sym, targs }
    }
}
