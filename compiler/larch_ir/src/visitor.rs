//! Tree Visitor Pattern
//!
//! Read-only traversal of [`TreePtr`] trees.
//!
//! Default implementations call `walk_*` functions that traverse children in
//! source order. Override `visit_*` methods to add behavior at specific
//! nodes, and call the matching `walk_*` function to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountSends {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountSends {
//!     fn visit_send(&mut self, send: &'ast Send) {
//!         self.count += 1;
//!         walk_send(self, send);
//!     }
//! }
//! ```

use crate::ast::{ClassDef, ConstantLit, Expr, Local, MethodDef, Send, TreePtr};

/// Tree visitor trait.
pub trait Visitor<'ast> {
    /// Visit any tree handle, empty ones included.
    fn visit_tree(&mut self, tree: &'ast TreePtr) {
        walk_tree(self, tree);
    }

    fn visit_class_def(&mut self, class_def: &'ast ClassDef) {
        walk_class_def(self, class_def);
    }

    fn visit_method_def(&mut self, method_def: &'ast MethodDef) {
        walk_method_def(self, method_def);
    }

    fn visit_send(&mut self, send: &'ast Send) {
        walk_send(self, send);
    }

    fn visit_constant_lit(&mut self, lit: &'ast ConstantLit) {
        walk_constant_lit(self, lit);
    }

    /// Locals have no children.
    fn visit_local(&mut self, local: &'ast Local) {
        let _ = local;
    }
}

fn visit_all<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, trees: &'ast [TreePtr]) {
    for tree in trees {
        visitor.visit_tree(tree);
    }
}

/// Dispatch on the node kind and visit its children.
pub fn walk_tree<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, tree: &'ast TreePtr) {
    let Some(expr) = tree.expr() else {
        return;
    };
    larch_stack::ensure_sufficient_stack(|| walk_expr(visitor, expr));
}

fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::EmptyTree(_)
        | Expr::Retry(_)
        | Expr::ZSuperArgs(_)
        | Expr::UnresolvedIdent(_)
        | Expr::Literal(_) => {}
        Expr::Send(n) => visitor.visit_send(n),
        Expr::ClassDef(n) => visitor.visit_class_def(n),
        Expr::MethodDef(n) => visitor.visit_method_def(n),
        Expr::ConstantLit(n) => visitor.visit_constant_lit(n),
        Expr::Local(n) => visitor.visit_local(n),
        Expr::If(n) => {
            visitor.visit_tree(&n.cond);
            visitor.visit_tree(&n.then_branch);
            visitor.visit_tree(&n.else_branch);
        }
        Expr::While(n) => {
            visitor.visit_tree(&n.cond);
            visitor.visit_tree(&n.body);
        }
        Expr::Break(n) => visitor.visit_tree(&n.expr),
        Expr::Next(n) => visitor.visit_tree(&n.expr),
        Expr::Return(n) => visitor.visit_tree(&n.expr),
        Expr::RescueCase(n) => {
            visit_all(visitor, &n.exceptions);
            visitor.visit_tree(&n.var);
            visitor.visit_tree(&n.body);
        }
        Expr::Rescue(n) => {
            visitor.visit_tree(&n.body);
            visit_all(visitor, &n.rescue_cases);
            visitor.visit_tree(&n.else_branch);
            visitor.visit_tree(&n.ensure);
        }
        Expr::RestArg(n) => visitor.visit_tree(&n.expr),
        Expr::KeywordArg(n) => visitor.visit_tree(&n.expr),
        Expr::OptionalArg(n) => {
            visitor.visit_tree(&n.expr);
            visitor.visit_tree(&n.default);
        }
        Expr::BlockArg(n) => visitor.visit_tree(&n.expr),
        Expr::ShadowArg(n) => visitor.visit_tree(&n.expr),
        Expr::Assign(n) => {
            visitor.visit_tree(&n.lhs);
            visitor.visit_tree(&n.rhs);
        }
        Expr::Cast(n) => {
            visitor.visit_tree(&n.arg);
            visitor.visit_tree(&n.type_expr);
        }
        Expr::Hash(n) => {
            for (key, value) in n.keys.iter().zip(&n.values) {
                visitor.visit_tree(key);
                visitor.visit_tree(value);
            }
        }
        Expr::Array(n) => visit_all(visitor, &n.elems),
        Expr::UnresolvedConstantLit(n) => visitor.visit_tree(&n.scope),
        Expr::Block(n) => {
            visit_all(visitor, &n.args);
            visitor.visit_tree(&n.body);
        }
        Expr::InsSeq(n) => {
            visit_all(visitor, &n.stats);
            visitor.visit_tree(&n.expr);
        }
    }
}

pub fn walk_class_def<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, class_def: &'ast ClassDef) {
    visitor.visit_tree(&class_def.name);
    visit_all(visitor, &class_def.ancestors);
    visit_all(visitor, &class_def.singleton_ancestors);
    visit_all(visitor, &class_def.rhs);
}

pub fn walk_method_def<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    method_def: &'ast MethodDef,
) {
    visit_all(visitor, &method_def.args);
    visitor.visit_tree(&method_def.rhs);
}

pub fn walk_send<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, send: &'ast Send) {
    visitor.visit_tree(&send.recv);
    visit_all(visitor, &send.args);
    visitor.visit_tree(&send.block);
}

pub fn walk_constant_lit<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, lit: &'ast ConstantLit) {
    visitor.visit_tree(&lit.original);
}
