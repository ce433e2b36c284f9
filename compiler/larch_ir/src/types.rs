//! The small type language stored on symbols and in trees.
//!
//! This is only what the semantic core itself has to record: class types,
//! generic applications, bounded type parameters and literal values. Type
//! inference lives elsewhere and builds on these shapes.

use std::fmt;

use crate::{NameId, SymbolRef};

/// Declared variance of a type parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Variance {
    CoVariant,
    ContraVariant,
    #[default]
    Invariant,
}

impl Variance {
    #[inline]
    pub const fn is_invariant(self) -> bool {
        matches!(self, Variance::Invariant)
    }

    /// Source spelling: `:out`, `:in` or `:invariant`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Variance::CoVariant => ":out",
            Variance::ContraVariant => ":in",
            Variance::Invariant => ":invariant",
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a literal node or literal type.
///
/// Floats are stored as bits so the whole type stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LiteralValue {
    Integer(i64),
    Float(u64),
    String(NameId),
    Symbol(NameId),
    True,
    False,
    Nil,
}

impl LiteralValue {
    pub fn float(value: f64) -> Self {
        LiteralValue::Float(value.to_bits())
    }

    pub fn as_float(self) -> Option<f64> {
        match self {
            LiteralValue::Float(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    /// Everything except `nil` and `false` is truthy.
    pub const fn is_truthy(self) -> bool {
        !matches!(self, LiteralValue::Nil | LiteralValue::False)
    }
}

/// Bounds of a type parameter, attached as its result type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct LambdaParam {
    /// The type member or type argument these bounds belong to.
    pub definition: SymbolRef,
    pub lower: Type,
    pub upper: Type,
}

/// A type.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Type {
    #[default]
    Untyped,
    Top,
    Bottom,
    /// A class or module with no type arguments.
    Class(SymbolRef),
    /// A generic class applied to positional type arguments.
    Applied { klass: SymbolRef, targs: Vec<Type> },
    /// Reference to a type parameter.
    TypeVar(SymbolRef),
    LambdaParam(Box<LambdaParam>),
    Literal(LiteralValue),
}

impl Type {
    pub fn lambda_param(definition: SymbolRef, lower: Type, upper: Type) -> Self {
        Type::LambdaParam(Box::new(LambdaParam {
            definition,
            lower,
            upper,
        }))
    }

    #[inline]
    pub fn is_untyped(&self) -> bool {
        matches!(self, Type::Untyped)
    }

    pub fn as_lambda_param(&self) -> Option<&LambdaParam> {
        match self {
            Type::LambdaParam(param) => Some(param),
            _ => None,
        }
    }

    pub fn as_lambda_param_mut(&mut self) -> Option<&mut LambdaParam> {
        match self {
            Type::LambdaParam(param) => Some(param),
            _ => None,
        }
    }

    /// The class this type is an instance of, if it names one directly.
    pub fn class_symbol(&self) -> Option<SymbolRef> {
        match self {
            Type::Class(klass) | Type::Applied { klass, .. } => Some(*klass),
            _ => None,
        }
    }
}
