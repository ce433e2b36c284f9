//! Constructor helpers.
//!
//! Thin wrappers that fill in defaults (no flags, no block, empty scope) so
//! rewriting passes can build trees without spelling out every field.

use smallvec::SmallVec;

use super::{
    Array, Assign, Block, BlockArg, Break, Cast, ClassDef, ClassDefKind, ConstantLit, Hash,
    HashEntries, IdentKind, If, InsSeq, KeywordArg, Literal, Local, LocalVariable, MethodArgs,
    MethodDef, MethodDefFlags, Next, OptionalArg, Rescue, RescueCase, RestArg, Retry, Return,
    Send, SendArgs, SendFlags, ShadowArg, TreePtr, UnresolvedConstantLit, UnresolvedIdent, While,
    ZSuperArgs,
};
use crate::names::well_known;
use crate::{LiteralValue, Loc, LocOffsets, NameId, SymbolRef, Type};

pub fn empty() -> TreePtr {
    TreePtr::empty_tree()
}

// Calls

pub fn send(
    loc: LocOffsets,
    recv: TreePtr,
    fun: NameId,
    num_pos_args: u16,
    args: SendArgs,
) -> TreePtr {
    send_with_block(loc, recv, fun, num_pos_args, args, TreePtr::none())
}

pub fn send_with_block(
    loc: LocOffsets,
    recv: TreePtr,
    fun: NameId,
    num_pos_args: u16,
    args: SendArgs,
    block: TreePtr,
) -> TreePtr {
    TreePtr::new(Send {
        loc,
        fun,
        flags: SendFlags::empty(),
        num_pos_args,
        recv,
        args,
        block,
    })
}

pub fn send0(loc: LocOffsets, recv: TreePtr, fun: NameId) -> TreePtr {
    send(loc, recv, fun, 0, SendArgs::new())
}

pub fn send1(loc: LocOffsets, recv: TreePtr, fun: NameId, arg: TreePtr) -> TreePtr {
    let mut args = SendArgs::new();
    args.push(arg);
    send(loc, recv, fun, 1, args)
}

/// Call with positional arguments only.
pub fn send_n(loc: LocOffsets, recv: TreePtr, fun: NameId, args: Vec<TreePtr>) -> TreePtr {
    let num_pos_args = u16::try_from(args.len())
        .unwrap_or_else(|_| panic!("too many positional arguments: {}", args.len()));
    send(loc, recv, fun, num_pos_args, args.into_iter().collect())
}

pub fn block(loc: LocOffsets, args: MethodArgs, body: TreePtr) -> TreePtr {
    TreePtr::new(Block { loc, args, body })
}

pub fn zsuper_args(loc: LocOffsets) -> TreePtr {
    TreePtr::new(ZSuperArgs { loc })
}

// References

pub fn local(loc: LocOffsets, name: NameId) -> TreePtr {
    TreePtr::new(Local {
        loc,
        local_variable: LocalVariable::new(name, 0),
    })
}

pub fn self_ref(loc: LocOffsets) -> TreePtr {
    local(loc, well_known::SELF)
}

pub fn unresolved_ident(loc: LocOffsets, kind: IdentKind, name: NameId) -> TreePtr {
    TreePtr::new(UnresolvedIdent { loc, kind, name })
}

pub fn rest_arg(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(RestArg { loc, expr })
}

pub fn keyword_arg(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(KeywordArg { loc, expr })
}

pub fn optional_arg(loc: LocOffsets, expr: TreePtr, default: TreePtr) -> TreePtr {
    TreePtr::new(OptionalArg { loc, expr, default })
}

pub fn block_arg(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(BlockArg { loc, expr })
}

pub fn shadow_arg(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(ShadowArg { loc, expr })
}

// Constants

pub fn unresolved_constant(loc: LocOffsets, scope: TreePtr, cnst: NameId) -> TreePtr {
    TreePtr::new(UnresolvedConstantLit { loc, cnst, scope })
}

/// A resolved constant with no unresolved original.
pub fn constant(loc: LocOffsets, symbol: SymbolRef) -> TreePtr {
    constant_with_original(loc, symbol, TreePtr::none())
}

pub fn constant_with_original(loc: LocOffsets, symbol: SymbolRef, original: TreePtr) -> TreePtr {
    TreePtr::new(ConstantLit {
        loc,
        symbol,
        resolution_scopes: SmallVec::new(),
        original,
    })
}

// Literals

pub fn literal(loc: LocOffsets, value: LiteralValue) -> TreePtr {
    TreePtr::new(Literal { loc, value })
}

pub fn int(loc: LocOffsets, value: i64) -> TreePtr {
    literal(loc, LiteralValue::Integer(value))
}

pub fn string(loc: LocOffsets, value: NameId) -> TreePtr {
    literal(loc, LiteralValue::String(value))
}

pub fn symbol(loc: LocOffsets, value: NameId) -> TreePtr {
    literal(loc, LiteralValue::Symbol(value))
}

pub fn nil(loc: LocOffsets) -> TreePtr {
    literal(loc, LiteralValue::Nil)
}

pub fn true_lit(loc: LocOffsets) -> TreePtr {
    literal(loc, LiteralValue::True)
}

pub fn false_lit(loc: LocOffsets) -> TreePtr {
    literal(loc, LiteralValue::False)
}

pub fn hash(loc: LocOffsets, keys: HashEntries, values: HashEntries) -> TreePtr {
    assert_eq!(keys.len(), values.len(), "hash key and value counts differ");
    TreePtr::new(Hash { loc, keys, values })
}

pub fn hash0(loc: LocOffsets) -> TreePtr {
    hash(loc, HashEntries::new(), HashEntries::new())
}

pub fn array(loc: LocOffsets, elems: Vec<TreePtr>) -> TreePtr {
    TreePtr::new(Array {
        loc,
        elems: elems.into_iter().collect(),
    })
}

// Instructions and control flow

pub fn assign(loc: LocOffsets, lhs: TreePtr, rhs: TreePtr) -> TreePtr {
    TreePtr::new(Assign { loc, lhs, rhs })
}

pub fn cast(loc: LocOffsets, cast: NameId, ty: Type, arg: TreePtr, type_expr: TreePtr) -> TreePtr {
    TreePtr::new(Cast {
        loc,
        cast,
        ty,
        arg,
        type_expr,
    })
}

pub fn if_expr(loc: LocOffsets, cond: TreePtr, then_branch: TreePtr, else_branch: TreePtr) -> TreePtr {
    TreePtr::new(If {
        loc,
        cond,
        then_branch,
        else_branch,
    })
}

pub fn while_loop(loc: LocOffsets, cond: TreePtr, body: TreePtr) -> TreePtr {
    TreePtr::new(While { loc, cond, body })
}

pub fn break_expr(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(Break { loc, expr })
}

pub fn next_expr(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(Next { loc, expr })
}

pub fn return_expr(loc: LocOffsets, expr: TreePtr) -> TreePtr {
    TreePtr::new(Return { loc, expr })
}

pub fn retry(loc: LocOffsets) -> TreePtr {
    TreePtr::new(Retry { loc })
}

pub fn rescue_case(
    loc: LocOffsets,
    exceptions: Vec<TreePtr>,
    var: TreePtr,
    body: TreePtr,
) -> TreePtr {
    TreePtr::new(RescueCase {
        loc,
        exceptions: exceptions.into_iter().collect(),
        var,
        body,
    })
}

pub fn rescue(
    loc: LocOffsets,
    body: TreePtr,
    rescue_cases: Vec<TreePtr>,
    else_branch: TreePtr,
    ensure: TreePtr,
) -> TreePtr {
    TreePtr::new(Rescue {
        loc,
        body,
        rescue_cases: rescue_cases.into_iter().collect(),
        else_branch,
        ensure,
    })
}

/// Statements followed by a value. With no statements this is just `expr`.
pub fn ins_seq(loc: LocOffsets, stats: Vec<TreePtr>, expr: TreePtr) -> TreePtr {
    if stats.is_empty() {
        return expr;
    }
    TreePtr::new(InsSeq {
        loc,
        stats: stats.into_iter().collect(),
        expr,
    })
}

// Definitions

pub fn method(
    loc: LocOffsets,
    decl_loc: Loc,
    name: NameId,
    args: MethodArgs,
    rhs: TreePtr,
    flags: MethodDefFlags,
) -> TreePtr {
    TreePtr::new(MethodDef {
        loc,
        decl_loc,
        symbol: SymbolRef::NONE,
        name,
        args,
        rhs,
        flags,
    })
}

/// A method synthesized by a rewriting pass.
pub fn synthetic_method(
    loc: LocOffsets,
    decl_loc: Loc,
    name: NameId,
    args: MethodArgs,
    rhs: TreePtr,
) -> TreePtr {
    method(
        loc,
        decl_loc,
        name,
        args,
        rhs,
        MethodDefFlags::REWRITER_SYNTHESIZED,
    )
}

pub fn class_def(
    loc: LocOffsets,
    decl_loc: Loc,
    symbol: SymbolRef,
    kind: ClassDefKind,
    name: TreePtr,
    ancestors: Vec<TreePtr>,
    rhs: Vec<TreePtr>,
) -> TreePtr {
    TreePtr::new(ClassDef {
        loc,
        decl_loc,
        symbol,
        kind,
        rhs: rhs.into_iter().collect(),
        name,
        ancestors: ancestors.into_iter().collect(),
        singleton_ancestors: SmallVec::new(),
    })
}
