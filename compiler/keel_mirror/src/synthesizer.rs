//! Choosing between direct synthesis and cached reflection.

use std::sync::Arc;

use keel_ir::{TypeDecl, TypeIdent};
use keel_reflect::{DescriptorCache, ReflectHost, ReflectiveBridge};
use keel_types::{native, MirrorError, ProductRegistry, ProductShape, TypeMetadata};

/// Produces descriptors for a session.
pub struct MirrorSynthesizer<'c> {
    registry: Arc<ProductRegistry>,
    bridge: ReflectiveBridge,
    cache: &'c DescriptorCache,
}

impl<'c> MirrorSynthesizer<'c> {
    /// Foreign descriptors are cached in `cache`.
    pub fn new(
        registry: Arc<ProductRegistry>,
        host: Arc<dyn ReflectHost>,
        cache: &'c DescriptorCache,
    ) -> Self {
        let bridge = ReflectiveBridge::new(host, registry.interner().clone());
        MirrorSynthesizer {
            registry,
            bridge,
            cache,
        }
    }

    pub fn registry(&self) -> &ProductRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &'c DescriptorCache {
        self.cache
    }

    /// The descriptor of `ident`.
    ///
    /// Foreign lookups fail with `SessionMismatch` when the cache already
    /// serves identities from another interner.
    pub fn mirror_of(&self, ident: TypeIdent) -> Result<Arc<TypeMetadata>, MirrorError> {
        match self.registry.decl(ident) {
            Some(decl) if decl.is_native() => self.native(decl),
            _ => {
                self.cache.bind_session(self.registry.interner(), ident)?;
                self.cache
                    .get_or_compute(ident, || self.bridge.introspect(ident))
            }
        }
    }

    /// The descriptor of the type at `path`.
    pub fn mirror_of_path(&self, path: &str) -> Result<Arc<TypeMetadata>, MirrorError> {
        self.mirror_of(TypeIdent::intern(self.registry.interner(), path))
    }

    fn native(&self, decl: &TypeDecl) -> Result<Arc<TypeMetadata>, MirrorError> {
        let interner = self.registry.interner();
        let shape = ProductShape::recognize(decl).map_err(|problems| MirrorError::NotAProduct {
            ty: decl.ident.path(interner).to_owned(),
            problems,
        })?;
        let metadata = native::synthesize_metadata(&shape, interner)?;
        tracing::debug!(ty = metadata.path(), "native mirror");
        Ok(Arc::new(metadata))
    }
}

impl MirrorSynthesizer<'static> {
    /// A synthesizer backed by the process-wide descriptor cache.
    pub fn with_global_cache(registry: Arc<ProductRegistry>, host: Arc<dyn ReflectHost>) -> Self {
        MirrorSynthesizer::new(registry, host, DescriptorCache::global())
    }
}

impl std::fmt::Debug for MirrorSynthesizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorSynthesizer")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
