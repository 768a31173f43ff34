//! Diagnostic system for the Keel compiler.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Notes and suggestions (how to fix)
//!
//! Compile-time failures (shape recognition, pattern binding) are reported
//! as [`Diagnostic`]s through a [`DiagnosticQueue`]. A unit that failed
//! returns [`ErrorGuaranteed`], which can only be obtained by emitting an
//! error.

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{
    pattern_arity_mismatch, too_many_errors, unknown_deconstructor, Diagnostic, Label,
};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
