//! Tree representation.
//!
//! A tree is built from [`TreePtr`] handles. Each handle exclusively owns its
//! node; there is no `Clone`, so duplicating a subtree goes through
//! [`TreePtr::deep_copy`]. Moving a node out with [`TreePtr::take`] leaves an
//! empty handle behind.
//!
//! # Layout
//!
//! [`Expr`] is a closed enum: `EmptyTree` is stored inline and every other
//! variant boxes its payload. The variant tag sits next to the pointer, so
//! [`TreePtr::tag`] never dereferences the payload. A handle is 16 bytes.
//!
//! # Module Structure
//!
//! - `nodes`: payload structs, one per variant
//! - `copy`: deep copy
//! - `show`: `show_raw` debug printer
//! - `mk`: constructor helpers
//! - `util`: rewriter helpers over type annotations and hash literals

mod copy;
pub mod mk;
mod nodes;
mod show;
pub mod util;

pub use nodes::{
    Ancestors, Array, Assign, Block, BlockArg, Break, Cast, ClassDef, ClassDefKind, ClassRhs,
    ConstantLit, EmptyTree, Hash, HashEntries, IdentKind, If, InsSeq, KeywordArg, Literal, Local,
    LocalVariable, MethodArgs, MethodDef, MethodDefFlags, Next, OptionalArg, Rescue, RescueCase,
    RestArg, Retry, Return, Send, SendArgs, SendFlags, ShadowArg, UnresolvedConstantLit,
    UnresolvedIdent, While, ZSuperArgs,
};

use crate::names::well_known;
use crate::LocOffsets;

/// Variant tag. `0` is never a valid tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Tag {
    EmptyTree = 1,
    Send,
    ClassDef,
    MethodDef,
    If,
    While,
    Break,
    Retry,
    Next,
    Return,
    RescueCase,
    Rescue,
    Local,
    UnresolvedIdent,
    RestArg,
    KeywordArg,
    OptionalArg,
    BlockArg,
    ShadowArg,
    Assign,
    Cast,
    Hash,
    Array,
    Literal,
    UnresolvedConstantLit,
    ConstantLit,
    ZSuperArgs,
    Block,
    InsSeq,
}

macro_rules! define_tree {
    ($($name:ident),* $(,)?) => {
        /// A tree node.
        #[derive(Debug, PartialEq, Eq)]
        pub enum Expr {
            EmptyTree(EmptyTree),
            $($name(Box<$name>),)*
        }

        impl Expr {
            pub const fn tag(&self) -> Tag {
                match self {
                    Expr::EmptyTree(_) => Tag::EmptyTree,
                    $(Expr::$name(_) => Tag::$name,)*
                }
            }

            pub fn loc(&self) -> LocOffsets {
                match self {
                    Expr::EmptyTree(_) => LocOffsets::NONE,
                    $(Expr::$name(node) => node.loc,)*
                }
            }
        }

        impl Tag {
            pub const fn name(self) -> &'static str {
                match self {
                    Tag::EmptyTree => "EmptyTree",
                    $(Tag::$name => stringify!($name),)*
                }
            }
        }

        $(
            impl TreeNode for $name {
                const TAG: Tag = Tag::$name;

                fn into_expr(self) -> Expr {
                    Expr::$name(Box::new(self))
                }

                fn from_expr(expr: &Expr) -> Option<&Self> {
                    match expr {
                        Expr::$name(node) => Some(node),
                        _ => None,
                    }
                }

                fn from_expr_mut(expr: &mut Expr) -> Option<&mut Self> {
                    match expr {
                        Expr::$name(node) => Some(node),
                        _ => None,
                    }
                }
            }
        )*
    };
}

define_tree!(
    Send,
    ClassDef,
    MethodDef,
    If,
    While,
    Break,
    Retry,
    Next,
    Return,
    RescueCase,
    Rescue,
    Local,
    UnresolvedIdent,
    RestArg,
    KeywordArg,
    OptionalArg,
    BlockArg,
    ShadowArg,
    Assign,
    Cast,
    Hash,
    Array,
    Literal,
    UnresolvedConstantLit,
    ConstantLit,
    ZSuperArgs,
    Block,
    InsSeq,
);

/// A payload type that can live behind a [`TreePtr`].
pub trait TreeNode: Sized {
    const TAG: Tag;

    fn into_expr(self) -> Expr;

    fn from_expr(expr: &Expr) -> Option<&Self>;

    fn from_expr_mut(expr: &mut Expr) -> Option<&mut Self>;
}

impl TreeNode for EmptyTree {
    const TAG: Tag = Tag::EmptyTree;

    fn into_expr(self) -> Expr {
        Expr::EmptyTree(self)
    }

    fn from_expr(expr: &Expr) -> Option<&Self> {
        match expr {
            Expr::EmptyTree(node) => Some(node),
            _ => None,
        }
    }

    fn from_expr_mut(expr: &mut Expr) -> Option<&mut Self> {
        match expr {
            Expr::EmptyTree(node) => Some(node),
            _ => None,
        }
    }
}

/// Owning handle to a tree node, or to nothing.
///
/// An empty handle (`is_none()`) is what a move leaves behind. It is distinct
/// from [`TreePtr::empty_tree`], which is a real node meaning "no expression".
#[derive(Debug, PartialEq, Eq, Default)]
pub struct TreePtr(Option<Expr>);

impl TreePtr {
    /// A handle that owns nothing.
    #[inline]
    pub const fn none() -> Self {
        TreePtr(None)
    }

    /// The canonical "no expression" node. Does not allocate.
    #[inline]
    pub const fn empty_tree() -> Self {
        TreePtr(Some(Expr::EmptyTree(EmptyTree)))
    }

    pub fn new<T: TreeNode>(node: T) -> Self {
        TreePtr(Some(node.into_expr()))
    }

    pub fn from_expr(expr: Expr) -> Self {
        TreePtr(Some(expr))
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub const fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.0.as_ref()
    }

    pub fn expr_mut(&mut self) -> Option<&mut Expr> {
        self.0.as_mut()
    }

    pub fn into_expr(self) -> Option<Expr> {
        self.0
    }

    /// Variant tag, or `None` for an empty handle.
    #[inline]
    pub fn tag(&self) -> Option<Tag> {
        self.0.as_ref().map(Expr::tag)
    }

    #[inline]
    pub fn is_a<T: TreeNode>(&self) -> bool {
        self.tag() == Some(T::TAG)
    }

    pub fn is_empty_tree(&self) -> bool {
        self.is_a::<EmptyTree>()
    }

    pub fn cast<T: TreeNode>(&self) -> Option<&T> {
        self.0.as_ref().and_then(T::from_expr)
    }

    pub fn cast_mut<T: TreeNode>(&mut self) -> Option<&mut T> {
        self.0.as_mut().and_then(T::from_expr_mut)
    }

    /// Cast where the caller already knows the variant.
    ///
    /// # Panics
    /// Panics if the handle is empty or holds another variant.
    #[track_caller]
    pub fn cast_nonnull<T: TreeNode>(&self) -> &T {
        match self.cast::<T>() {
            Some(node) => node,
            None => panic!(
                "cast_nonnull::<{}> on a {} node",
                T::TAG.name(),
                self.node_name()
            ),
        }
    }

    /// Mutable form of [`TreePtr::cast_nonnull`].
    ///
    /// # Panics
    /// Panics if the handle is empty or holds another variant.
    #[track_caller]
    pub fn cast_nonnull_mut<T: TreeNode>(&mut self) -> &mut T {
        let found = self.node_name();
        match self.cast_mut::<T>() {
            Some(node) => node,
            None => panic!("cast_nonnull::<{}> on a {} node", T::TAG.name(), found),
        }
    }

    /// Move the node out, leaving this handle empty.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> TreePtr {
        std::mem::take(self)
    }

    /// Replace the node, returning the old one.
    pub fn replace(&mut self, tree: TreePtr) -> TreePtr {
        std::mem::replace(self, tree)
    }

    pub fn loc(&self) -> LocOffsets {
        self.0.as_ref().map_or(LocOffsets::NONE, Expr::loc)
    }

    pub fn node_name(&self) -> &'static str {
        self.tag().map_or("<null>", Tag::name)
    }

    /// Argument shapes and the two identifier forms.
    pub fn is_reference(&self) -> bool {
        matches!(
            self.tag(),
            Some(
                Tag::Local
                    | Tag::UnresolvedIdent
                    | Tag::RestArg
                    | Tag::KeywordArg
                    | Tag::OptionalArg
                    | Tag::BlockArg
                    | Tag::ShadowArg
            )
        )
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.tag(), Some(Tag::ClassDef | Tag::MethodDef))
    }

    /// `self`, as a local or as a bare identifier.
    pub fn is_self_reference(&self) -> bool {
        if let Some(local) = self.cast::<Local>() {
            return local.local_variable.name == well_known::SELF;
        }
        if let Some(ident) = self.cast::<UnresolvedIdent>() {
            return ident.kind == IdentKind::Local && ident.name == well_known::SELF;
        }
        false
    }

    /// Check per-node shape invariants over the whole subtree.
    ///
    /// # Panics
    /// Panics at the first malformed node.
    pub fn sanity_check(&self) {
        struct Checker;
        impl<'a> crate::visitor::Visitor<'a> for Checker {
            fn visit_tree(&mut self, tree: &'a TreePtr) {
                tree.check_node();
                crate::visitor::walk_tree(self, tree);
            }
        }
        crate::visitor::Visitor::visit_tree(&mut Checker, self);
    }

    fn check_node(&self) {
        let Some(expr) = &self.0 else {
            return;
        };
        match expr {
            Expr::ClassDef(node) => {
                assert!(node.symbol.exists(), "class definition without a symbol");
                assert!(node.name.is_some(), "class definition without a name");
            }
            Expr::MethodDef(node) => {
                assert!(node.name.exists(), "method definition without a name");
                assert!(node.rhs.is_some(), "method definition without a body");
            }
            Expr::Send(node) => {
                assert!(node.recv.is_some(), "send without a receiver");
                assert!(
                    usize::from(node.num_pos_args) <= node.args.len(),
                    "send claims more positional args than it has"
                );
                assert!(
                    node.block.is_none() || node.block.is_a::<Block>(),
                    "send block is not a Block"
                );
            }
            Expr::Hash(node) => {
                assert_eq!(
                    node.keys.len(),
                    node.values.len(),
                    "hash key and value counts differ"
                );
            }
            Expr::Rescue(node) => {
                assert!(
                    node.rescue_cases.iter().all(|c| c.is_a::<RescueCase>()),
                    "rescue case is not a RescueCase"
                );
            }
            Expr::InsSeq(node) => {
                assert!(!node.stats.is_empty(), "instruction sequence without statements");
            }
            _ => {}
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::TreePtr;
    crate::static_assert_size!(TreePtr, 16);
}

#[cfg(test)]
mod tests;
