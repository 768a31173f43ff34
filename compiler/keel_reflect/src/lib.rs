//! Keel Reflect - descriptors for types known only at run time.
//!
//! Types loaded from foreign binaries carry no compile-time metadata the
//! compiler trusts. For those, this crate provides:
//! - [`ReflectHost`]: the host's reflection capability
//! - [`SymbolTableHost`]: an in-memory host over loaded class symbols
//! - [`ReflectiveBridge`]: builds a `TypeMetadata` through the host
//! - [`DescriptorCache`]: at most one introspection per type identity,
//!   shared by every thread

mod bridge;
mod cache;
mod host;

pub use bridge::ReflectiveBridge;
pub use cache::{CacheStats, DescriptorCache, EntryState};
pub use host::{
    AccessorHandle, AccessorInfo, ClassHandle, CtorHandle, CtorInfo, ForeignClass, ParamInfo,
    ReflectHost, SymbolTableHost,
};
