//! Keel IR - shared primitives for the Keel compiler crates.
//!
//! - [`Name`] / [`StringInterner`]: interned identifiers shared by the
//!   compile-time passes and the runtime reflection bridge
//! - [`Span`]: source locations for diagnostics
//! - [`TypeIdent`] / [`Ty`]: type identities and component types
//! - [`TypeDecl`]: raw type metadata from the frontend or foreign binaries
//! - [`MatchPattern`]: the pattern AST the binder compiles

pub mod ast;
mod decl;
mod interner;
mod name;
mod span;
mod ty;

pub use ast::{Literal, MatchPattern};
pub use decl::{AccessorDecl, ComponentDecl, CtorDecl, DeclOrigin, TypeDecl};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use ty::{Ty, TyDisplay, TypeIdent};
