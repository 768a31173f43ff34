//! Keel Types - structural product shapes, descriptors and contracts.
//!
//! This crate provides:
//! - Runtime values (`Value`, `RecordValue`)
//! - The runtime error taxonomy (`MirrorError`, `InvokeError`)
//! - The Type Metadata Model (`TypeMetadata`): one descriptor type for
//!   both the native and the reflective path
//! - Structural product recognition (`ProductShape`)
//! - Destructuring contract synthesis (`synthesize_contract`)
//! - The session registry of declarations and user contracts
//!   (`ProductRegistry`)

mod contract;
mod error;
mod metadata;
pub mod native;
mod registry;
mod shape;
mod value;

pub use contract::{
    synthesize_contract, BindFn, ContractOrigin, DestructuringContract, SynthesisError,
    SynthesizedContract,
};
pub use error::{InvokeError, MirrorError};
pub use metadata::{AccessFn, ConstructFn, MetadataParts, TypeMetadata};
pub use registry::{ProductRegistry, Resolution};
pub use shape::{ProductShape, ShapeComponent, ShapeError};
pub use value::{RecordValue, Value, ValueDisplay};
