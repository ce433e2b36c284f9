//! Error codes for the semantic core's diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E4001`) with the first
//! digit indicating the phase that reports it.

use std::fmt;
use std::str::FromStr;

/// Error codes for all semantic-core diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E4xxx: Resolver errors (ancestry and generics)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Resolver Errors (E4xxx)
    /// A class was mixed in where only modules may be
    E4001,
    /// A type member of an ancestor is not re-declared
    E4002,
    /// As E4002, for the enumerable root's element type
    E4003,
    /// A member named like an ancestor's type member is not a type member
    E4004,
    /// Re-declared type member has a different variance
    E4005,
    /// Type members declared in a different order than the parent's
    E4006,
    /// A class declares a covariant or contravariant type member
    E4007,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E4003,
        ErrorCode::E4004,
        ErrorCode::E4005,
        ErrorCode::E4006,
        ErrorCode::E4007,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E4007 => "E4007",
        }
    }

    /// Short descriptive name, stable across releases.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E4001 => "IncludesNonModule",
            ErrorCode::E4002 => "ParentTypeNotDeclared",
            ErrorCode::E4003 => "EnumerableParentTypeNotDeclared",
            ErrorCode::E4004 => "NotATypeVariable",
            ErrorCode::E4005 => "ParentVarianceMismatch",
            ErrorCode::E4006 => "TypeMembersInWrongOrder",
            ErrorCode::E4007 => "VariantTypeMemberInClass",
        }
    }

    pub fn is_resolver_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when a string is not a known error code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseErrorCodeError(pub String);

impl fmt::Display for ParseErrorCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code `{}`", self.0)
    }
}

impl std::error::Error for ParseErrorCodeError {}

/// Parse an error code string like `"E4002"`. Case-insensitive.
impl FromStr for ErrorCode {
    type Err = ParseErrorCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseErrorCodeError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests;
