//! Diagnostic system for the semantic core.
//!
//! The core never renders text. Every reportable condition becomes a
//! [`Diagnostic`]: a stable [`ErrorCode`], a primary location, a message and
//! optional secondary locations. Diagnostics are pushed into a
//! [`DiagnosticSink`]; [`ErrorQueue`] is the sink a symbol state carries.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{ErrorCode, ParseErrorCodeError};
pub use queue::{DiagnosticSink, ErrorQueue};
