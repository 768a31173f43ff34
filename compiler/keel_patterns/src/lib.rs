//! Keel Patterns - compiling and running deconstruction patterns.
//!
//! `TypeName(p1, ..., pn)` deconstructs a value through the type's
//! destructuring contract. The [`Binder`] resolves each such pattern to a
//! contract (user-supplied, or synthesized once per unit), checks arity and
//! sub-pattern types, and lowers the unit's `let`, `match` and parameter
//! sites to [`FlatPattern`]s. The [`Matcher`] runs compiled sites against
//! runtime values.

mod binder;
mod contracts;
mod flat;
mod matcher;

#[cfg(test)]
mod test_helpers;

pub use binder::{
    compile_unit, BindFailure, Binder, BinderConfig, CompiledArm, CompiledSite, CompiledUnit,
    PatternUnit, SiteDecl, SiteKind,
};
pub use contracts::{ContractId, ContractTable};
pub use flat::{FlatPattern, PathInstruction, ScrutineePath};
pub use matcher::{Bindings, Matcher};
