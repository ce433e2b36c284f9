//! Deep copy.

use smallvec::SmallVec;

use super::{
    Array, Assign, Block, BlockArg, Break, Cast, ClassDef, ConstantLit, Expr, Hash, If, InsSeq,
    KeywordArg, Literal, Local, MethodDef, Next, OptionalArg, Rescue, RescueCase, RestArg, Retry,
    Return, Send, ShadowArg, TreePtr, UnresolvedConstantLit, UnresolvedIdent, While, ZSuperArgs,
};

fn copy_all<const N: usize>(trees: &SmallVec<[TreePtr; N]>) -> SmallVec<[TreePtr; N]> {
    trees.iter().map(TreePtr::deep_copy).collect()
}

impl TreePtr {
    /// Clone the whole subtree into freshly owned nodes.
    ///
    /// An empty handle copies to an empty handle.
    #[must_use]
    pub fn deep_copy(&self) -> TreePtr {
        match &self.0 {
            None => TreePtr::none(),
            Some(expr) => larch_stack::ensure_sufficient_stack(|| TreePtr(Some(expr.deep_copy()))),
        }
    }
}

impl Expr {
    #[must_use]
    pub fn deep_copy(&self) -> Expr {
        match self {
            Expr::EmptyTree(empty) => Expr::EmptyTree(*empty),
            Expr::Send(n) => Expr::Send(Box::new(Send {
                loc: n.loc,
                fun: n.fun,
                flags: n.flags,
                num_pos_args: n.num_pos_args,
                recv: n.recv.deep_copy(),
                args: copy_all(&n.args),
                block: n.block.deep_copy(),
            })),
            Expr::ClassDef(n) => Expr::ClassDef(Box::new(ClassDef {
                loc: n.loc,
                decl_loc: n.decl_loc,
                symbol: n.symbol,
                kind: n.kind,
                rhs: copy_all(&n.rhs),
                name: n.name.deep_copy(),
                ancestors: copy_all(&n.ancestors),
                singleton_ancestors: copy_all(&n.singleton_ancestors),
            })),
            Expr::MethodDef(n) => Expr::MethodDef(Box::new(MethodDef {
                loc: n.loc,
                decl_loc: n.decl_loc,
                symbol: n.symbol,
                name: n.name,
                args: copy_all(&n.args),
                rhs: n.rhs.deep_copy(),
                flags: n.flags,
            })),
            Expr::If(n) => Expr::If(Box::new(If {
                loc: n.loc,
                cond: n.cond.deep_copy(),
                then_branch: n.then_branch.deep_copy(),
                else_branch: n.else_branch.deep_copy(),
            })),
            Expr::While(n) => Expr::While(Box::new(While {
                loc: n.loc,
                cond: n.cond.deep_copy(),
                body: n.body.deep_copy(),
            })),
            Expr::Break(n) => Expr::Break(Box::new(Break {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::Retry(n) => Expr::Retry(Box::new(Retry { loc: n.loc })),
            Expr::Next(n) => Expr::Next(Box::new(Next {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::Return(n) => Expr::Return(Box::new(Return {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::RescueCase(n) => Expr::RescueCase(Box::new(RescueCase {
                loc: n.loc,
                exceptions: copy_all(&n.exceptions),
                var: n.var.deep_copy(),
                body: n.body.deep_copy(),
            })),
            Expr::Rescue(n) => Expr::Rescue(Box::new(Rescue {
                loc: n.loc,
                body: n.body.deep_copy(),
                rescue_cases: copy_all(&n.rescue_cases),
                else_branch: n.else_branch.deep_copy(),
                ensure: n.ensure.deep_copy(),
            })),
            Expr::Local(n) => Expr::Local(Box::new(Local {
                loc: n.loc,
                local_variable: n.local_variable,
            })),
            Expr::UnresolvedIdent(n) => Expr::UnresolvedIdent(Box::new(UnresolvedIdent {
                loc: n.loc,
                kind: n.kind,
                name: n.name,
            })),
            Expr::RestArg(n) => Expr::RestArg(Box::new(RestArg {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::KeywordArg(n) => Expr::KeywordArg(Box::new(KeywordArg {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::OptionalArg(n) => Expr::OptionalArg(Box::new(OptionalArg {
                loc: n.loc,
                expr: n.expr.deep_copy(),
                default: n.default.deep_copy(),
            })),
            Expr::BlockArg(n) => Expr::BlockArg(Box::new(BlockArg {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::ShadowArg(n) => Expr::ShadowArg(Box::new(ShadowArg {
                loc: n.loc,
                expr: n.expr.deep_copy(),
            })),
            Expr::Assign(n) => Expr::Assign(Box::new(Assign {
                loc: n.loc,
                lhs: n.lhs.deep_copy(),
                rhs: n.rhs.deep_copy(),
            })),
            Expr::Cast(n) => Expr::Cast(Box::new(Cast {
                loc: n.loc,
                cast: n.cast,
                ty: n.ty.clone(),
                arg: n.arg.deep_copy(),
                type_expr: n.type_expr.deep_copy(),
            })),
            Expr::Hash(n) => Expr::Hash(Box::new(Hash {
                loc: n.loc,
                keys: copy_all(&n.keys),
                values: copy_all(&n.values),
            })),
            Expr::Array(n) => Expr::Array(Box::new(Array {
                loc: n.loc,
                elems: copy_all(&n.elems),
            })),
            Expr::Literal(n) => Expr::Literal(Box::new(Literal {
                loc: n.loc,
                value: n.value,
            })),
            Expr::UnresolvedConstantLit(n) => {
                Expr::UnresolvedConstantLit(Box::new(UnresolvedConstantLit {
                    loc: n.loc,
                    cnst: n.cnst,
                    scope: n.scope.deep_copy(),
                }))
            }
            Expr::ConstantLit(n) => Expr::ConstantLit(Box::new(ConstantLit {
                loc: n.loc,
                symbol: n.symbol,
                resolution_scopes: n.resolution_scopes.clone(),
                original: n.original.deep_copy(),
            })),
            Expr::ZSuperArgs(n) => Expr::ZSuperArgs(Box::new(ZSuperArgs { loc: n.loc })),
            Expr::Block(n) => Expr::Block(Box::new(Block {
                loc: n.loc,
                args: copy_all(&n.args),
                body: n.body.deep_copy(),
            })),
            Expr::InsSeq(n) => Expr::InsSeq(Box::new(InsSeq {
                loc: n.loc,
                stats: copy_all(&n.stats),
                expr: n.expr.deep_copy(),
            })),
        }
    }
}
