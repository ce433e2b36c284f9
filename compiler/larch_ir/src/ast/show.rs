//! `show_raw`: structural dump of a tree for tests and debugging.

use std::fmt::Write;

use super::{Expr, TreePtr};
use crate::{LiteralValue, NameTable};

struct RawPrinter<'a> {
    names: &'a NameTable,
    out: String,
}

impl RawPrinter<'_> {
    fn indent(&mut self, tabs: usize) {
        for _ in 0..tabs {
            self.out.push_str("  ");
        }
    }

    fn field(&mut self, tabs: usize, label: &str, tree: &TreePtr) {
        self.indent(tabs + 1);
        let _ = write!(self.out, "{label} = ");
        self.tree(tree, tabs + 1);
        self.out.push('\n');
    }

    fn value(&mut self, tabs: usize, label: &str, value: &str) {
        self.indent(tabs + 1);
        let _ = writeln!(self.out, "{label} = {value}");
    }

    fn list(&mut self, tabs: usize, label: &str, trees: &[TreePtr]) {
        self.indent(tabs + 1);
        let _ = writeln!(self.out, "{label} = [");
        for tree in trees {
            self.indent(tabs + 2);
            self.tree(tree, tabs + 2);
            self.out.push('\n');
        }
        self.indent(tabs + 1);
        self.out.push_str("]\n");
    }

    fn open(&mut self, name: &str) {
        let _ = writeln!(self.out, "{name}{{");
    }

    fn close(&mut self, tabs: usize) {
        self.indent(tabs);
        self.out.push('}');
    }

    fn literal(&self, value: LiteralValue) -> String {
        match value {
            LiteralValue::Integer(v) => v.to_string(),
            LiteralValue::Float(bits) => f64::from_bits(bits).to_string(),
            LiteralValue::String(name) => format!("{:?}", self.names.show(name)),
            LiteralValue::Symbol(name) => format!(":{}", self.names.show(name)),
            LiteralValue::True => "true".to_owned(),
            LiteralValue::False => "false".to_owned(),
            LiteralValue::Nil => "nil".to_owned(),
        }
    }

    fn tree(&mut self, tree: &TreePtr, tabs: usize) {
        let Some(expr) = tree.expr() else {
            self.out.push_str("<null>");
            return;
        };
        larch_stack::ensure_sufficient_stack(|| self.expr(expr, tabs));
    }

    fn expr(&mut self, expr: &Expr, tabs: usize) {
        let names = self.names;
        match expr {
            Expr::EmptyTree(_) => self.out.push_str("EmptyTree"),
            Expr::Send(n) => {
                self.open("Send");
                self.value(tabs, "flags", &format!("{:?}", n.flags));
                self.field(tabs, "recv", &n.recv);
                self.value(tabs, "fun", &names.show_raw(n.fun));
                self.value(tabs, "num_pos_args", &n.num_pos_args.to_string());
                self.list(tabs, "args", &n.args);
                if n.block.is_some() {
                    self.field(tabs, "block", &n.block);
                }
                self.close(tabs);
            }
            Expr::ClassDef(n) => {
                self.open("ClassDef");
                self.value(tabs, "kind", &format!("{:?}", n.kind));
                self.value(tabs, "symbol", &format!("{:?}", n.symbol));
                self.field(tabs, "name", &n.name);
                self.list(tabs, "ancestors", &n.ancestors);
                self.list(tabs, "singleton_ancestors", &n.singleton_ancestors);
                self.list(tabs, "rhs", &n.rhs);
                self.close(tabs);
            }
            Expr::MethodDef(n) => {
                self.open("MethodDef");
                self.value(tabs, "flags", &format!("{:?}", n.flags));
                self.value(tabs, "name", &names.show_raw(n.name));
                self.list(tabs, "args", &n.args);
                self.field(tabs, "rhs", &n.rhs);
                self.close(tabs);
            }
            Expr::If(n) => {
                self.open("If");
                self.field(tabs, "cond", &n.cond);
                self.field(tabs, "then", &n.then_branch);
                self.field(tabs, "else", &n.else_branch);
                self.close(tabs);
            }
            Expr::While(n) => {
                self.open("While");
                self.field(tabs, "cond", &n.cond);
                self.field(tabs, "body", &n.body);
                self.close(tabs);
            }
            Expr::Break(n) => {
                self.open("Break");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::Retry(_) => self.out.push_str("Retry{}"),
            Expr::Next(n) => {
                self.open("Next");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::Return(n) => {
                self.open("Return");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::RescueCase(n) => {
                self.open("RescueCase");
                self.list(tabs, "exceptions", &n.exceptions);
                self.field(tabs, "var", &n.var);
                self.field(tabs, "body", &n.body);
                self.close(tabs);
            }
            Expr::Rescue(n) => {
                self.open("Rescue");
                self.field(tabs, "body", &n.body);
                self.list(tabs, "rescue_cases", &n.rescue_cases);
                self.field(tabs, "else", &n.else_branch);
                self.field(tabs, "ensure", &n.ensure);
                self.close(tabs);
            }
            Expr::Local(n) => {
                let var = n.local_variable;
                let _ = write!(
                    self.out,
                    "Local{{ {}${} }}",
                    names.show_raw(var.name),
                    var.unique
                );
            }
            Expr::UnresolvedIdent(n) => {
                let _ = write!(
                    self.out,
                    "UnresolvedIdent{{ {:?} {} }}",
                    n.kind,
                    names.show_raw(n.name)
                );
            }
            Expr::RestArg(n) => {
                self.open("RestArg");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::KeywordArg(n) => {
                self.open("KeywordArg");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::OptionalArg(n) => {
                self.open("OptionalArg");
                self.field(tabs, "expr", &n.expr);
                self.field(tabs, "default", &n.default);
                self.close(tabs);
            }
            Expr::BlockArg(n) => {
                self.open("BlockArg");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::ShadowArg(n) => {
                self.open("ShadowArg");
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
            Expr::Assign(n) => {
                self.open("Assign");
                self.field(tabs, "lhs", &n.lhs);
                self.field(tabs, "rhs", &n.rhs);
                self.close(tabs);
            }
            Expr::Cast(n) => {
                self.open("Cast");
                self.value(tabs, "cast", &names.show_raw(n.cast));
                self.value(tabs, "type", &format!("{:?}", n.ty));
                self.field(tabs, "arg", &n.arg);
                self.close(tabs);
            }
            Expr::Hash(n) => {
                self.open("Hash");
                self.list(tabs, "keys", &n.keys);
                self.list(tabs, "values", &n.values);
                self.close(tabs);
            }
            Expr::Array(n) => {
                self.open("Array");
                self.list(tabs, "elems", &n.elems);
                self.close(tabs);
            }
            Expr::Literal(n) => {
                let shown = self.literal(n.value);
                let _ = write!(self.out, "Literal{{ {shown} }}");
            }
            Expr::UnresolvedConstantLit(n) => {
                self.open("UnresolvedConstantLit");
                self.value(tabs, "cnst", &names.show_raw(n.cnst));
                self.field(tabs, "scope", &n.scope);
                self.close(tabs);
            }
            Expr::ConstantLit(n) => {
                self.open("ConstantLit");
                self.value(tabs, "symbol", &format!("{:?}", n.symbol));
                if n.original.is_some() {
                    self.field(tabs, "original", &n.original);
                }
                self.close(tabs);
            }
            Expr::ZSuperArgs(_) => self.out.push_str("ZSuperArgs{}"),
            Expr::Block(n) => {
                self.open("Block");
                self.list(tabs, "args", &n.args);
                self.field(tabs, "body", &n.body);
                self.close(tabs);
            }
            Expr::InsSeq(n) => {
                self.open("InsSeq");
                self.list(tabs, "stats", &n.stats);
                self.field(tabs, "expr", &n.expr);
                self.close(tabs);
            }
        }
    }
}

impl TreePtr {
    /// Structural dump, names shown with [`NameTable::show_raw`].
    pub fn show_raw(&self, names: &NameTable) -> String {
        let mut printer = RawPrinter {
            names,
            out: String::new(),
        };
        printer.tree(self, 0);
        printer.out
    }
}
