//! Type Metadata Model: the uniform descriptor ("mirror") of a structural
//! product type.
//!
//! One type, two producers: direct synthesis from compile-time metadata
//! (`crate::native`) and reflective introspection (`keel_reflect`). Generic
//! derivation code only ever sees a [`TypeMetadata`] and cannot tell which
//! producer built it.
//!
//! # Cached accessors
//!
//! Besides the constructor, a descriptor carries one accessor handle per
//! component, resolved once when the descriptor is built. Component access
//! through the descriptor therefore never repeats a lookup, whichever path
//! produced it.
//!
//! # Equality
//!
//! Two descriptors are equal when identity, labels and types are equal.
//! Constructor and accessor closures do not take part.

use std::fmt;
use std::sync::Arc;

use keel_ir::{Name, Ty, TypeIdent};
use rustc_hash::FxHashMap;

use crate::{MirrorError, Value};

/// Constructor operation: ordered component values to instance.
///
/// Callers go through [`TypeMetadata::construct`], which checks arity first.
pub type ConstructFn = Arc<dyn Fn(&[Value]) -> Result<Value, MirrorError> + Send + Sync>;

/// Accessor handle: instance to one component value.
pub type AccessFn = Arc<dyn Fn(&Value) -> Result<Value, MirrorError> + Send + Sync>;

/// Descriptor of a structural product type.
#[derive(Clone)]
pub struct TypeMetadata {
    ident: TypeIdent,
    path: Arc<str>,
    labels: Vec<Name>,
    types: Vec<Ty>,
    constructor_arity: usize,
    constructor: ConstructFn,
    accessors: Vec<AccessFn>,
    label_index: FxHashMap<Name, usize>,
}

/// Parts a producer hands to [`TypeMetadata::new`].
pub struct MetadataParts {
    pub ident: TypeIdent,
    pub path: Arc<str>,
    pub labels: Vec<Name>,
    pub types: Vec<Ty>,
    pub constructor_arity: usize,
    pub constructor: ConstructFn,
    pub accessors: Vec<AccessFn>,
}

impl TypeMetadata {
    /// Validate the parts and build a descriptor.
    ///
    /// Fails with `MalformedMetadata` when labels, types, constructor arity
    /// and accessor count disagree, or when a label repeats.
    pub fn new(parts: MetadataParts) -> Result<Self, MirrorError> {
        let MetadataParts {
            ident,
            path,
            labels,
            types,
            constructor_arity,
            constructor,
            accessors,
        } = parts;

        let malformed = |detail: String| MirrorError::MalformedMetadata {
            ty: path.to_string(),
            detail,
        };

        if labels.len() != types.len() {
            return Err(malformed(format!(
                "{} component labels but {} component types",
                labels.len(),
                types.len()
            )));
        }
        if constructor_arity != labels.len() {
            return Err(malformed(format!(
                "constructor takes {constructor_arity} values but there are {} components",
                labels.len()
            )));
        }
        if accessors.len() != labels.len() {
            return Err(malformed(format!(
                "{} accessors for {} components",
                accessors.len(),
                labels.len()
            )));
        }

        let mut label_index = FxHashMap::default();
        for (i, label) in labels.iter().enumerate() {
            if label_index.insert(*label, i).is_some() {
                return Err(malformed(format!("component {i} repeats an earlier label")));
            }
        }

        Ok(TypeMetadata {
            ident,
            path,
            labels,
            types,
            constructor_arity,
            constructor,
            accessors,
            label_index,
        })
    }

    #[inline]
    pub fn ident(&self) -> TypeIdent {
        self.ident
    }

    /// Fully qualified path, for messages.
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[Name] {
        &self.labels
    }

    pub fn types(&self) -> &[Ty] {
        &self.types
    }

    pub fn label(&self, index: usize) -> Option<Name> {
        self.labels.get(index).copied()
    }

    pub fn component_type(&self, index: usize) -> Option<&Ty> {
        self.types.get(index)
    }

    /// Position of the component labelled `label`.
    pub fn position_of(&self, label: Name) -> Option<usize> {
        self.label_index.get(&label).copied()
    }

    /// Build an instance from component values in canonical order.
    pub fn construct(&self, values: &[Value]) -> Result<Value, MirrorError> {
        if values.len() != self.constructor_arity {
            return Err(MirrorError::ArityMismatch {
                ty: self.path.to_string(),
                expected: self.constructor_arity,
                got: values.len(),
            });
        }
        (self.constructor)(values)
    }

    /// Read component `index` of `value`.
    pub fn component(&self, value: &Value, index: usize) -> Result<Value, MirrorError> {
        let accessor = self
            .accessors
            .get(index)
            .ok_or_else(|| MirrorError::ComponentAccess {
                ty: self.path.to_string(),
                detail: format!("index {index} out of range for arity {}", self.arity()),
            })?;
        accessor(value)
    }

    /// Read every component of `value`, in canonical order.
    pub fn components(&self, value: &Value) -> Result<Vec<Value>, MirrorError> {
        self.accessors.iter().map(|read| read(value)).collect()
    }

    /// Accessor handles in canonical order.
    pub fn accessors(&self) -> &[AccessFn] {
        &self.accessors
    }
}

impl PartialEq for TypeMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident && self.labels == other.labels && self.types == other.types
    }
}

impl Eq for TypeMetadata {}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("path", &self.path)
            .field("labels", &self.labels)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}
