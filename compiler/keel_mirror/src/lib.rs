//! Keel Mirror - one descriptor for every structural product type.
//!
//! [`MirrorSynthesizer::mirror_of`] returns the [`TypeMetadata`] of a type:
//! - **native** types (compile-time metadata in the session registry) are
//!   synthesized directly, without reflection or caching;
//! - everything else goes through the [`DescriptorCache`], which runs the
//!   reflective bridge at most once per type.
//!
//! Both paths produce descriptors that compare equal for the same shape.
//!
//! This crate also re-exports the pieces a driver needs to compile pattern
//! units against the same registry.

mod synthesizer;

use std::sync::Once;

pub use keel_diagnostic::{Diagnostic, ErrorCode};
pub use keel_patterns::{compile_unit, BinderConfig, CompiledUnit, PatternUnit, SiteDecl};
pub use keel_reflect::{DescriptorCache, ForeignClass, ReflectHost, SymbolTableHost};
pub use keel_types::{MirrorError, ProductRegistry, TypeMetadata, Value};
pub use synthesizer::MirrorSynthesizer;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=keel_reflect=debug` or `RUST_LOG=keel=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
