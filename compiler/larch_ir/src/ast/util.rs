//! Helpers shared by tree-rewriting passes.

use super::{
    mk, Block, ConstantLit, Hash, HashEntries, Literal, Send, SendArgs, TreePtr,
    UnresolvedConstantLit,
};
use crate::names::well_known;
use crate::NameId;

/// Duplicate a type annotation.
///
/// Only calls, resolved constants and constant paths are type shapes.
/// Returns `None` as soon as anything else is found, so a caller can tell a
/// signature apart from arbitrary code.
pub fn dup_type(orig: &TreePtr) -> Option<TreePtr> {
    larch_stack::ensure_sufficient_stack(|| dup_type_inner(orig))
}

fn dup_type_inner(orig: &TreePtr) -> Option<TreePtr> {
    if let Some(send) = orig.cast::<Send>() {
        let recv = dup_type(&send.recv)?;
        if send.fun == well_known::ENUM {
            // Enum arguments are values, not types.
            return Some(orig.deep_copy());
        }
        if send.fun == well_known::PARAMS && send.num_pos_args == 0 && send.args.len() % 2 == 0 {
            // Inlined keyword pairs; no splat allowed.
            let mut args = SendArgs::new();
            for pair in send.args.chunks(2) {
                assert!(pair[0].is_a::<Literal>(), "params key is not a literal");
                args.push(pair[0].deep_copy());
                args.push(dup_type(&pair[1])?);
            }
            return Some(mk::send(send.loc, recv, send.fun, 0, args));
        }
        let args = send.args.iter().map(dup_type).collect::<Option<SendArgs>>()?;
        return Some(mk::send(send.loc, recv, send.fun, send.num_pos_args, args));
    }

    if let Some(cnst) = orig.cast::<ConstantLit>() {
        let original = if cnst.original.is_some() {
            dup_type(&cnst.original)?
        } else {
            TreePtr::none()
        };
        return Some(mk::constant_with_original(cnst.loc, cnst.symbol, original));
    }

    let cons = orig.cast::<UnresolvedConstantLit>()?;
    if cons.scope.is_empty_tree() {
        return Some(mk::unresolved_constant(cons.loc, mk::empty(), cons.cnst));
    }
    if cons.scope.is_a::<UnresolvedConstantLit>() || cons.scope.is_a::<ConstantLit>() {
        let scope = dup_type(&cons.scope)?;
        return Some(mk::unresolved_constant(cons.loc, scope, cons.cnst));
    }
    None
}

fn find_symbol_key(hash: &Hash, name: NameId) -> Option<usize> {
    hash.keys.iter().position(|key| {
        key.cast::<Literal>()
            .and_then(Literal::as_symbol)
            .is_some_and(|sym| sym == name)
    })
}

/// Whether the hash literal has the symbol key `name`.
pub fn has_hash_value(hash: &Hash, name: NameId) -> bool {
    find_symbol_key(hash, name).is_some()
}

/// Whether the hash literal maps `name` to a truthy value.
///
/// Any non-literal value counts as truthy.
pub fn has_truthy_hash_value(hash: &Hash, name: NameId) -> bool {
    let Some(index) = find_symbol_key(hash, name) else {
        return false;
    };
    match hash.values[index].cast::<Literal>() {
        Some(literal) => literal.value.is_truthy(),
        None => true,
    }
}

/// Remove the entry for symbol key `name`, returning `(key, value)`.
pub fn extract_hash_value(hash: &mut Hash, name: NameId) -> Option<(TreePtr, TreePtr)> {
    let index = find_symbol_key(hash, name)?;
    let key = hash.keys.remove(index);
    let value = hash.values.remove(index);
    Some((key, value))
}

/// The send itself, if `expr` is a signature.
pub fn cast_sig(expr: &TreePtr) -> Option<&Send> {
    cast_sig_send(expr.cast::<Send>()?)
}

/// A signature is a call to `sig` with at most two arguments and a block
/// whose body, after peeling `checked` and `on_failure`, ends in `returns`
/// or `void`.
pub fn cast_sig_send(send: &Send) -> Option<&Send> {
    if send.fun != well_known::SIG || send.block.is_none() || send.args.len() > 2 {
        return None;
    }
    let block = send.block.cast_nonnull::<Block>();
    let mut body = block.body.cast::<Send>();
    while let Some(call) = body {
        if call.fun != well_known::CHECKED && call.fun != well_known::ON_FAILURE {
            break;
        }
        body = call.recv.cast::<Send>();
    }
    match body {
        Some(call) if call.fun == well_known::VOID || call.fun == well_known::RETURNS => Some(send),
        _ => None,
    }
}

/// Collect a call's keyword arguments into a fresh hash literal.
///
/// A trailing keyword splat or hash literal argument is merged in. Returns
/// `None` when there is nothing to collect.
pub fn mk_kw_args_hash(send: &Send) -> Option<TreePtr> {
    let last = send.args.last()?;

    let mut keys = HashEntries::new();
    let mut values = HashEntries::new();
    for pair in send.args[send.kw_args_range()].chunks(2) {
        keys.push(pair[0].deep_copy());
        values.push(pair[1].deep_copy());
    }

    let mut explicit_empty_hash = false;
    if send.has_kw_splat() || !send.has_kw_args() {
        if let Some(hash) = last.cast::<Hash>() {
            explicit_empty_hash = hash.keys.is_empty();
            keys.extend(hash.keys.iter().map(TreePtr::deep_copy));
            values.extend(hash.values.iter().map(TreePtr::deep_copy));
        }
    }

    if keys.is_empty() && !explicit_empty_hash {
        return None;
    }
    Some(mk::hash(send.loc, keys, values))
}
