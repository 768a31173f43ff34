//! Reflective introspection: building a descriptor from what the host
//! runtime knows about a loaded type.
//!
//! The bridge performs every lookup once, up front, and captures the
//! resolved handles in the descriptor's constructor and accessors. It does
//! not cache; [`DescriptorCache`](crate::DescriptorCache) decides how often
//! it runs.

use std::sync::Arc;

use keel_ir::{SharedInterner, TypeIdent};
use keel_types::{AccessFn, ConstructFn, MetadataParts, MirrorError, TypeMetadata, Value};

use crate::{AccessorInfo, ReflectHost};

/// Builds descriptors through a [`ReflectHost`].
#[derive(Clone)]
pub struct ReflectiveBridge {
    host: Arc<dyn ReflectHost>,
    interner: SharedInterner,
}

impl ReflectiveBridge {
    pub fn new(host: Arc<dyn ReflectHost>, interner: SharedInterner) -> Self {
        ReflectiveBridge { host, interner }
    }

    pub fn host(&self) -> &Arc<dyn ReflectHost> {
        &self.host
    }

    /// Discover the shape of `ident` reflectively.
    ///
    /// Fails with `TypeNotFound` when the host cannot resolve the type,
    /// `NoCanonicalConstructor` unless exactly one constructor is canonical,
    /// `AccessorMismatch` when a canonical parameter has no zero-argument
    /// accessor of the same name, and `MalformedMetadata` when the host
    /// cannot give a parameter's type.
    pub fn introspect(&self, ident: TypeIdent) -> Result<TypeMetadata, MirrorError> {
        let path = ident.path(&self.interner);
        let ty = || path.to_owned();

        let class = self
            .host
            .resolve(path)
            .ok_or_else(|| MirrorError::TypeNotFound { ty: ty() })?;
        tracing::trace!(ty = path, ?class, "resolved foreign type");

        let mut canonical = self
            .host
            .constructors(class)
            .into_iter()
            .filter(|c| c.canonical);
        let ctor = match (canonical.next(), canonical.next()) {
            (Some(ctor), None) => ctor,
            (None, _) => {
                return Err(MirrorError::NoCanonicalConstructor { ty: ty(), found: 0 });
            }
            (Some(_), Some(_)) => {
                return Err(MirrorError::NoCanonicalConstructor {
                    ty: ty(),
                    found: 2 + canonical.count(),
                });
            }
        };

        let mut accessors = Vec::with_capacity(ctor.params.len());
        for param in &ctor.params {
            let accessor = self
                .host
                .find_accessor(class, &param.name)
                .into_iter()
                .find(|a: &AccessorInfo| a.param_count == 0)
                .ok_or_else(|| MirrorError::AccessorMismatch {
                    ty: ty(),
                    param: param.name.clone(),
                })?;
            tracing::trace!(ty = path, param = %param.name, "matched accessor");
            accessors.push(accessor.handle);
        }

        let labels = ctor
            .params
            .iter()
            .map(|p| self.interner.intern(&p.name))
            .collect();
        let types = ctor
            .params
            .iter()
            .map(|p| {
                p.ty.clone().ok_or_else(|| MirrorError::MalformedMetadata {
                    ty: ty(),
                    detail: format!("canonical parameter `{}` has no declared type", p.name),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let shared_path: Arc<str> = Arc::from(path);

        let constructor: ConstructFn = {
            let host = Arc::clone(&self.host);
            let path = Arc::clone(&shared_path);
            let handle = ctor.handle;
            Arc::new(move |values: &[Value]| {
                host.invoke(handle, values)
                    .map_err(|cause| MirrorError::ReflectiveInvocation {
                        ty: path.to_string(),
                        cause,
                    })
            })
        };

        let accessors = accessors
            .into_iter()
            .map(|handle| {
                let host = Arc::clone(&self.host);
                let path = Arc::clone(&shared_path);
                let read: AccessFn = Arc::new(move |value: &Value| {
                    host.read(handle, value)
                        .map_err(|cause| MirrorError::ReflectiveInvocation {
                            ty: path.to_string(),
                            cause,
                        })
                });
                read
            })
            .collect();

        let metadata = TypeMetadata::new(MetadataParts {
            ident,
            path: shared_path,
            labels,
            types,
            constructor_arity: ctor.params.len(),
            constructor,
            accessors,
        })?;
        tracing::debug!(ty = path, arity = metadata.arity(), "introspected foreign descriptor");
        Ok(metadata)
    }
}

impl std::fmt::Debug for ReflectiveBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectiveBridge").finish_non_exhaustive()
    }
}
