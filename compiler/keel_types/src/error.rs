//! Runtime error taxonomy for descriptors and reflective construction.
//!
//! Errors are `Clone` because a failed shape discovery is recorded once in
//! the descriptor cache and handed to every later caller. Any error the
//! discovery returns is recorded; per-call errors (`ArityMismatch`,
//! `ReflectiveInvocation`, `ComponentAccess`) only arise after a descriptor
//! exists and never reach the cache.

use thiserror::Error;

use crate::ShapeError;

/// Failure reported by a reflection host while invoking a constructor or
/// accessor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("argument {index} (`{param}`) expected `{expected}`, found {found}")]
    ArgumentType {
        index: usize,
        param: String,
        expected: String,
        found: String,
    },

    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("receiver is not an instance of `{expected}` (found {found})")]
    Receiver { expected: String, found: String },

    #[error("access to `{member}` denied")]
    AccessDenied { member: String },

    #[error("{message}")]
    Other { message: String },
}

/// Errors from building or using a type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MirrorError {
    /// A metadata producer broke the descriptor invariants.
    #[error("malformed metadata for `{ty}`: {detail}")]
    MalformedMetadata { ty: String, detail: String },

    /// A native declaration that fails structural product recognition.
    #[error("`{ty}` is not a structural product type ({})", shape_codes(.problems))]
    NotAProduct {
        ty: String,
        problems: Vec<ShapeError>,
    },

    #[error("type `{ty}` could not be resolved")]
    TypeNotFound { ty: String },

    #[error("type `{ty}` has {found} canonical constructors, expected exactly one")]
    NoCanonicalConstructor { ty: String, found: usize },

    #[error("canonical constructor parameter `{param}` of `{ty}` has no matching zero-argument accessor")]
    AccessorMismatch { ty: String, param: String },

    #[error("`{ty}` takes {expected} component values, got {got}")]
    ArityMismatch {
        ty: String,
        expected: usize,
        got: usize,
    },

    #[error("reflective invocation on `{ty}` failed: {cause}")]
    ReflectiveInvocation {
        ty: String,
        #[source]
        cause: InvokeError,
    },

    #[error("cannot read component of `{ty}`: {detail}")]
    ComponentAccess { ty: String, detail: String },

    /// The descriptor cache holds identities of another interner.
    #[error("`{ty}` belongs to a different interning session than the descriptor cache")]
    SessionMismatch { ty: String },
}

fn shape_codes(problems: &[ShapeError]) -> String {
    let codes: Vec<&str> = problems.iter().map(|p| p.code().as_str()).collect();
    codes.join(", ")
}

impl MirrorError {
    /// Path of the type the error is about.
    pub fn type_path(&self) -> &str {
        match self {
            MirrorError::MalformedMetadata { ty, .. }
            | MirrorError::NotAProduct { ty, .. }
            | MirrorError::TypeNotFound { ty }
            | MirrorError::NoCanonicalConstructor { ty, .. }
            | MirrorError::AccessorMismatch { ty, .. }
            | MirrorError::ArityMismatch { ty, .. }
            | MirrorError::ReflectiveInvocation { ty, .. }
            | MirrorError::ComponentAccess { ty, .. }
            | MirrorError::SessionMismatch { ty } => ty,
        }
    }
}
